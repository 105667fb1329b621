use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "speechbox",
    version,
    about = "Speechbox - Speaker Diarization & Transcription Services",
    long_about = "HTTP and CLI wrappers around pre-trained speech models: a speaker-diarization pipeline and a speech-to-text transcription model, both returning JSON.",
    after_help = "EXAMPLES:\n    # Diarize an audio file from the command line\n    speechbox diarize meeting.wav\n\n    # Start the diarization HTTP service (PORT env selects the port, default 8000)\n    speechbox serve-diarize\n\n    # Start the transcription HTTP service (port 5001)\n    speechbox serve-transcribe\n\n    # Download the models\n    speechbox download whisper base.en\n    speechbox download diarizer"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Run diarization over one audio file and print the segments as JSON
    #[command(name = "diarize")]
    Diarize { audio_file: String },

    /// Start the diarization HTTP service
    #[command(name = "serve-diarize")]
    ServeDiarize {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
    },

    /// Start the transcription HTTP service
    #[command(name = "serve-transcribe")]
    ServeTranscribe {
        #[arg(long, default_value = "0.0.0.0")]
        host: String,
    },

    /// Download model files
    #[command(name = "download")]
    Download {
        #[command(subcommand)]
        target: DownloadTarget,
    },
}

#[derive(Subcommand)]
pub enum DownloadTarget {
    /// Fetch a ggml whisper model by name (e.g. base.en)
    #[command(name = "whisper")]
    Whisper {
        model: String,

        #[arg(long)]
        models_path: Option<String>,
    },

    /// Fetch the diarization ONNX models (segmentation + speaker embedding)
    #[command(name = "diarizer")]
    Diarizer {
        #[arg(long)]
        models_path: Option<String>,
    },
}
