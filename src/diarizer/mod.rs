pub mod config;
pub mod engine;

pub use config::DiarizerConfig;
pub use engine::{Diarize, SpeakerDiarizer};
