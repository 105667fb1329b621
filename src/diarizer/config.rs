use anyhow::{Context, Result};
use dotenv::dotenv;
use std::path::PathBuf;

#[derive(Clone, Debug, serde::Deserialize, serde::Serialize)]
pub struct DiarizerConfig {
    /// Path to the segmentation model (segmentation-3.0.onnx).
    pub segmentation_model_path: PathBuf,
    /// Path to the speaker embedding model (wespeaker CAM++).
    pub embedding_model_path: PathBuf,
    /// Maximum number of distinct speakers tracked per request.
    pub max_speakers: usize,
    /// Cosine-similarity threshold for assigning a segment to a known speaker.
    pub similarity_threshold: f32,
}

impl DiarizerConfig {
    pub fn from_env() -> Result<Self> {
        dotenv().ok();
        let segmentation = std::env::var("SEGMENTATION_MODEL_PATH")
            .context("SEGMENTATION_MODEL_PATH is not set")?;
        let embedding =
            std::env::var("EMBEDDING_MODEL_PATH").context("EMBEDDING_MODEL_PATH is not set")?;
        Ok(Self {
            segmentation_model_path: PathBuf::from(segmentation),
            embedding_model_path: PathBuf::from(embedding),
            max_speakers: 10,
            similarity_threshold: 0.85,
        })
    }
}
