use std::process::{Command, Output};

use tempfile::TempDir;

/// Run the speechbox binary with a scrubbed environment: a temporary working
/// directory (so no stray `.env` leaks in) and no model-path variables.
pub fn run_speechbox(args: &[&str]) -> Output {
    let workdir = TempDir::new().expect("create temporary working dir");

    Command::new(env!("CARGO_BIN_EXE_speechbox"))
        .args(args)
        .current_dir(workdir.path())
        .env_remove("WHISPER_MODEL_PATH")
        .env_remove("SEGMENTATION_MODEL_PATH")
        .env_remove("EMBEDDING_MODEL_PATH")
        .env_remove("PORT")
        .output()
        .expect("run speechbox binary")
}

/// Same, but with the given extra environment variables set.
pub fn run_speechbox_with_env(args: &[&str], envs: &[(&str, &str)]) -> Output {
    let workdir = TempDir::new().expect("create temporary working dir");

    let mut cmd = Command::new(env!("CARGO_BIN_EXE_speechbox"));
    cmd.args(args)
        .current_dir(workdir.path())
        .env_remove("WHISPER_MODEL_PATH")
        .env_remove("SEGMENTATION_MODEL_PATH")
        .env_remove("EMBEDDING_MODEL_PATH")
        .env_remove("PORT");
    for (key, value) in envs {
        cmd.env(key, value);
    }
    cmd.output().expect("run speechbox binary")
}
