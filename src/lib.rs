//! speechbox - HTTP/CLI wrappers around pre-trained speech models.
//!
//! Two independent services: speaker diarization (pyannote-style ONNX
//! pipeline) and speech-to-text transcription (whisper.cpp). Each loads its
//! model once at startup and answers requests with flat JSON.

pub mod audio;
pub mod cli;
pub mod diarize_server;
pub mod diarizer;
pub mod download;
pub mod dto;
pub mod error;
pub mod transcribe_server;
pub mod upload;
pub mod whisper;
