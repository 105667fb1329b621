use anyhow::{Result, anyhow};
use std::path::Path;
use std::process::Command;

const AVAILABLE_WHISPER_MODELS: &[&str] = &[
    "tiny",
    "tiny.en",
    "tiny-q5_1",
    "tiny.en-q5_1",
    "tiny-q8_0",
    "base",
    "base.en",
    "base-q5_1",
    "base.en-q5_1",
    "base-q8_0",
    "small",
    "small.en",
    "small-q5_1",
    "small.en-q5_1",
    "small-q8_0",
    "medium",
    "medium.en",
    "medium-q5_0",
    "medium.en-q5_0",
    "medium-q8_0",
    "large-v1",
    "large-v2",
    "large-v2-q5_0",
    "large-v2-q8_0",
    "large-v3",
    "large-v3-q5_0",
    "large-v3-turbo",
    "large-v3-turbo-q5_0",
    "large-v3-turbo-q8_0",
];

const WHISPER_MODEL_BASE_URL: &str =
    "https://huggingface.co/ggerganov/whisper.cpp/resolve/main/ggml";

const SEGMENTATION_MODEL_URL: &str =
    "https://github.com/thewh1teagle/pyannote-rs/releases/download/v0.1.0/segmentation-3.0.onnx";
const EMBEDDING_MODEL_URL: &str = "https://github.com/thewh1teagle/pyannote-rs/releases/download/v0.1.0/wespeaker_en_voxceleb_CAM++.onnx";

pub const SEGMENTATION_MODEL_NAME: &str = "segmentation-3.0.onnx";
pub const EMBEDDING_MODEL_NAME: &str = "wespeaker_en_voxceleb_CAM++.onnx";

pub fn list_available_models() -> String {
    let mut output = String::new();
    output.push_str("\nAvailable whisper models:");

    let mut current_class = "";
    for model in AVAILABLE_WHISPER_MODELS {
        let model_class = model.split(&['.', '-'][..]).next().unwrap_or("");
        if model_class != current_class {
            output.push_str(&format!("\n {model_class}"));
            current_class = model_class;
        }
        output.push_str(&format!(" {model}"));
    }

    output.push_str("\n\n.en = english-only  -q5_[01] = quantized\n");

    output
}

pub fn validate_model(model: &str) -> Result<()> {
    if AVAILABLE_WHISPER_MODELS.contains(&model) {
        Ok(())
    } else {
        Err(anyhow!(
            "Invalid model: {}\n{}",
            model,
            list_available_models()
        ))
    }
}

fn check_download_tool() -> Result<String> {
    let tools = ["wget2", "wget", "curl"];

    for tool in &tools {
        if Command::new("which")
            .arg(tool)
            .output()
            .map(|output| output.status.success())
            .unwrap_or(false)
        {
            return Ok(tool.to_string());
        }
    }

    Err(anyhow!(
        "Either wget, wget2, or curl is required to download models. Please install one of them."
    ))
}

fn download_with_tool(tool: &str, url: &str, output_path: &str) -> Result<()> {
    let mut cmd = Command::new(tool);

    match tool {
        "wget2" => {
            cmd.args(["--no-config", "--progress", "bar", "-O", output_path, url]);
        }
        "wget" => {
            cmd.args([
                "--no-config",
                "--quiet",
                "--show-progress",
                "-O",
                output_path,
                url,
            ]);
        }
        "curl" => {
            cmd.args(["-L", "--output", output_path, url]);
        }
        _ => return Err(anyhow!("Unsupported download tool: {}", tool)),
    }

    let status = cmd
        .status()
        .map_err(|e| anyhow!("Failed to execute {}: {}", tool, e))?;

    if !status.success() {
        return Err(anyhow!("Download failed with {}", tool));
    }

    Ok(())
}

fn fetch(url: &str, file_path: &Path) -> Result<()> {
    if file_path.exists() {
        println!(
            "Model '{}' already exists. Skipping download.",
            file_path.display()
        );
        return Ok(());
    }

    let tool = check_download_tool()?;

    if let Some(parent) = file_path.parent() {
        std::fs::create_dir_all(parent)
            .map_err(|e| anyhow!("Failed to create directory: {}", e))?;
    }

    let path_str = file_path
        .to_str()
        .ok_or_else(|| anyhow!("Model path is not valid UTF-8"))?;

    download_with_tool(&tool, url, path_str)?;
    println!("Done! Saved '{}'", file_path.display());

    Ok(())
}

/// Download a ggml whisper model for the transcription service.
pub fn download_whisper_model(model: &str, models_path: Option<String>) -> Result<()> {
    validate_model(model)?;

    let download_path = models_path.unwrap_or_else(|| ".".to_string());
    let file_path = Path::new(&download_path).join(format!("ggml-{model}.bin"));

    println!("Downloading ggml model '{model}'...");
    fetch(&format!("{WHISPER_MODEL_BASE_URL}-{model}.bin"), &file_path)?;

    println!("Point WHISPER_MODEL_PATH at it before starting the service:");
    println!("  $ WHISPER_MODEL_PATH={} speechbox serve-transcribe", file_path.display());

    Ok(())
}

/// Download the segmentation and speaker-embedding ONNX models for the
/// diarization service.
pub fn download_diarizer_models(models_path: Option<String>) -> Result<()> {
    let download_path = models_path.unwrap_or_else(|| ".".to_string());
    let seg_path = Path::new(&download_path).join(SEGMENTATION_MODEL_NAME);
    let emb_path = Path::new(&download_path).join(EMBEDDING_MODEL_NAME);

    println!("Downloading diarization models...");
    fetch(SEGMENTATION_MODEL_URL, &seg_path)?;
    fetch(EMBEDDING_MODEL_URL, &emb_path)?;

    println!("Point the service at them before starting:");
    println!(
        "  $ SEGMENTATION_MODEL_PATH={} EMBEDDING_MODEL_PATH={} speechbox serve-diarize",
        seg_path.display(),
        emb_path.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_model_validates() {
        assert!(validate_model("base.en").is_ok());
    }

    #[test]
    fn unknown_model_is_rejected_with_listing() {
        let err = validate_model("gigantic-v9").unwrap_err();
        assert!(err.to_string().contains("Invalid model"));
        assert!(err.to_string().contains("base.en"));
    }
}
