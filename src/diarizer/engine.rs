use anyhow::{Result, anyhow};
use log::{debug, info, warn};
use pyannote_rs::{EmbeddingExtractor, EmbeddingManager, get_segments};
use std::sync::{Arc, Mutex};

use crate::audio;
use crate::diarizer::config::DiarizerConfig;
use crate::dto::SpeakerSegment;

/// Seam the diarization surfaces (CLI and HTTP) talk through.
pub trait Diarize: Send + Sync {
    /// Run diarization over mono f32 samples. Silent or empty audio yields
    /// an empty segment list, not an error.
    fn diarize(&self, samples: &[f32], sample_rate: u32) -> Result<Vec<SpeakerSegment>>;
}

pub struct SpeakerDiarizer {
    inner: Arc<Mutex<DiarizerInner>>,
    config: DiarizerConfig,
}

struct DiarizerInner {
    extractor: EmbeddingExtractor,
}

impl SpeakerDiarizer {
    /// Load the embedding model once; segmentation runs against the on-disk
    /// model per request (pyannote-rs is path-driven there).
    pub fn new(config: DiarizerConfig) -> Result<Self> {
        if !config.segmentation_model_path.exists() {
            return Err(anyhow!(
                "Segmentation model not found: {:?}",
                config.segmentation_model_path
            ));
        }
        if !config.embedding_model_path.exists() {
            return Err(anyhow!(
                "Embedding model not found: {:?}",
                config.embedding_model_path
            ));
        }

        // pyannote-rs reports errors through eyre; convert at the boundary.
        let extractor = EmbeddingExtractor::new(&config.embedding_model_path)
            .map_err(|e| anyhow!("Failed to create embedding extractor: {}", e))?;

        info!("Diarization models loaded");

        Ok(Self {
            inner: Arc::new(Mutex::new(DiarizerInner { extractor })),
            config,
        })
    }
}

impl Diarize for SpeakerDiarizer {
    fn diarize(&self, samples: &[f32], sample_rate: u32) -> Result<Vec<SpeakerSegment>> {
        info!(
            "Running diarization on {} samples at {}Hz",
            samples.len(),
            sample_rate
        );

        if samples.is_empty() {
            return Ok(Vec::new());
        }

        let samples_i16 = audio::to_i16(samples);

        let mut inner = self
            .inner
            .lock()
            .map_err(|_| anyhow!("Failed to acquire diarizer lock"))?;

        let segments_iter = get_segments(
            &samples_i16,
            sample_rate,
            &self.config.segmentation_model_path,
        )
        .map_err(|e| anyhow!("Failed to run segmentation: {}", e))?;

        // Speaker labels are per-request; a fresh manager keeps requests
        // independent of one another.
        let mut manager = EmbeddingManager::new(self.config.max_speakers);
        let mut speaker_segments = Vec::new();

        for segment_result in segments_iter {
            let segment =
                segment_result.map_err(|e| anyhow!("Failed to process segment: {}", e))?;

            let embedding: Vec<f32> = inner
                .extractor
                .compute(&segment.samples)
                .map_err(|e| anyhow!("Failed to compute speaker embedding: {}", e))?
                .collect();

            let speaker =
                match manager.search_speaker(embedding, self.config.similarity_threshold) {
                    Some(idx) => format!("SPEAKER_{idx:02}"),
                    None => {
                        warn!(
                            "Max speakers ({}) reached, labelling segment as unknown",
                            self.config.max_speakers
                        );
                        "SPEAKER_UNKNOWN".to_string()
                    }
                };

            debug!(
                "Segment {:.2}s-{:.2}s -> {}",
                segment.start, segment.end, speaker
            );

            speaker_segments.push(SpeakerSegment {
                start: segment.start,
                end: segment.end,
                speaker,
            });
        }

        info!("Diarization complete: {} segments", speaker_segments.len());

        Ok(speaker_segments)
    }
}
