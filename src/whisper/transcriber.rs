use anyhow::Result;
use std::sync::{Arc, Mutex};
use whisper_rs::{FullParams, SamplingStrategy, WhisperContext, WhisperContextParameters};

use crate::whisper::config::WhisperConfig;
use crate::whisper::resampler;

pub struct InputAudio<'a> {
    pub data: &'a [f32],
    pub sample_rate: u32,
    pub channels: usize,
}

/// One decoded text segment. Times are in seconds.
#[derive(Clone, Debug)]
pub struct TextSegment {
    pub start: f64,
    pub end: f64,
    pub text: String,
}

pub struct TranscribeOutput {
    /// In-order concatenation of every segment's text.
    pub transcript: String,
    pub detected_language: String,
    pub confidence: f32,
    pub segments: Vec<TextSegment>,
}

/// Seam the HTTP handlers talk through; lets tests stand in for the model.
pub trait SpeechToText: Send + Sync {
    fn transcribe(&self, audio: &InputAudio) -> Result<TranscribeOutput>;
}

#[derive(Clone)]
pub struct WhisperTranscriber {
    inner: Arc<Mutex<TranscriberInner>>,
    config: WhisperConfig,
}

struct TranscriberInner {
    ctx: WhisperContext,
}

impl WhisperTranscriber {
    /// Load the model once; the instance is then shared across requests.
    pub fn new(config: WhisperConfig) -> Result<Self> {
        let mut ctx_params = WhisperContextParameters::default();
        ctx_params.use_gpu(config.use_gpu);

        let model_path = config
            .model_path
            .to_str()
            .ok_or_else(|| anyhow::anyhow!("Model path is not valid UTF-8"))?;

        let ctx = WhisperContext::new_with_params(model_path, ctx_params)
            .map_err(|e| anyhow::anyhow!("Failed to load model: {}", e))?;

        Ok(Self {
            inner: Arc::new(Mutex::new(TranscriberInner { ctx })),
            config,
        })
    }

    fn segment_confidence(state: &whisper_rs::WhisperState, segment_idx: i32) -> Result<f32> {
        let n_tokens = state.full_n_tokens(segment_idx)?;
        if n_tokens == 0 {
            return Ok(0.0);
        }

        let mut sum_logprob = 0.0_f32;
        for token_idx in 0..n_tokens {
            let token_data = state.full_get_token_data(segment_idx, token_idx)?;
            sum_logprob += token_data.plog;
        }

        Ok((sum_logprob / n_tokens as f32).exp())
    }
}

impl SpeechToText for WhisperTranscriber {
    fn transcribe(&self, audio: &InputAudio) -> Result<TranscribeOutput> {
        // Downmix before resampling so every later stage sees mono frames,
        // whatever channel count the container carried.
        let mono = crate::audio::downmix_mono(audio.data, audio.channels);
        let mono_audio = resampler::resample_to_16khz(&mono, audio.sample_rate, 1)?;

        if mono_audio.len() < resampler::WHISPER_SAMPLE_RATE as usize {
            return Err(anyhow::anyhow!("Audio is too short (less than 1 second)"));
        }

        let mut params = FullParams::new(SamplingStrategy::BeamSearch {
            beam_size: self.config.beam_size,
            patience: -1.0,
        });
        // "auto" makes whisper.cpp detect the spoken language.
        params.set_language(Some("auto"));
        params.set_print_special(false);
        params.set_print_progress(false);
        params.set_print_realtime(false);
        params.set_print_timestamps(false);
        params.set_no_speech_thold(self.config.no_speech_threshold);
        params.set_n_threads(self.config.num_threads);

        let inner = self
            .inner
            .lock()
            .map_err(|_| anyhow::anyhow!("Failed to acquire transcriber lock"))?;

        let mut state = inner
            .ctx
            .create_state()
            .map_err(|e| anyhow::anyhow!("Failed to create whisper state: {}", e))?;

        state
            .full(params, &mono_audio)
            .map_err(|e| anyhow::anyhow!("Failed to run transcription: {}", e))?;

        let num_segments = state
            .full_n_segments()
            .map_err(|e| anyhow::anyhow!("Failed to get segment count: {}", e))?;

        let mut transcript = String::new();
        let mut segments = Vec::with_capacity(num_segments as usize);
        let mut confidence_sum = 0.0_f32;

        for i in 0..num_segments {
            let text = state
                .full_get_segment_text(i)
                .map_err(|e| anyhow::anyhow!("Failed to get segment text: {}", e))?;

            // Timestamps come back in centiseconds.
            let start = state
                .full_get_segment_t0(i)
                .map_err(|e| anyhow::anyhow!("Failed to get segment start: {}", e))?
                as f64
                / 100.0;
            let end = state
                .full_get_segment_t1(i)
                .map_err(|e| anyhow::anyhow!("Failed to get segment end: {}", e))?
                as f64
                / 100.0;

            confidence_sum += Self::segment_confidence(&state, i)?;

            transcript.push_str(&text);
            segments.push(TextSegment { start, end, text });
        }

        let detected_language = state
            .full_lang_id_from_state()
            .ok()
            .and_then(whisper_rs::get_lang_str)
            .unwrap_or("en")
            .to_string();

        let confidence = if segments.is_empty() {
            0.0
        } else {
            confidence_sum / segments.len() as f32
        };

        Ok(TranscribeOutput {
            transcript,
            detected_language,
            confidence,
            segments,
        })
    }
}
