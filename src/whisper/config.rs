use anyhow::{Context, Result};
use dotenv::dotenv;
use std::path::PathBuf;

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct WhisperConfig {
    pub model_path: PathBuf,
    pub use_gpu: bool,
    /// Beam width for decoding. The service always decodes with a fixed beam.
    pub beam_size: i32,
    pub no_speech_threshold: f32,
    pub num_threads: i32,
}

impl WhisperConfig {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let model_path =
            std::env::var("WHISPER_MODEL_PATH").context("WHISPER_MODEL_PATH is not set")?;
        Ok(Self {
            model_path: PathBuf::from(model_path),
            use_gpu: true,
            beam_size: 5,
            no_speech_threshold: 0.5,
            num_threads: 2,
        })
    }
}
