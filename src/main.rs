use clap::Parser;
use std::path::Path;

use speechbox::audio;
use speechbox::cli::{Cli, Commands, DownloadTarget};
use speechbox::diarize_server::run_diarize_server;
use speechbox::diarizer::config::DiarizerConfig;
use speechbox::diarizer::engine::{Diarize, SpeakerDiarizer};
use speechbox::download;
use speechbox::transcribe_server::run_transcribe_server;

/// One-shot diarization: load the models, run the file, return the JSON
/// segment array ready for stdout.
fn diarize_file(audio_file: &str) -> anyhow::Result<String> {
    let config = DiarizerConfig::from_env()?;
    let engine = SpeakerDiarizer::new(config)?;

    let decoded = audio::load_wav(Path::new(audio_file))?;
    let mono = audio::downmix_mono(&decoded.samples, decoded.channels);
    let segments = engine.diarize(&mono, decoded.sample_rate)?;

    Ok(serde_json::to_string(&segments)?)
}

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    env_logger::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::ServeTranscribe { host } => run_transcribe_server(host).await,
        Commands::ServeDiarize { host } => run_diarize_server(host).await,
        Commands::Diarize { audio_file } => {
            // CLI failures surface as a JSON error object and exit code 1,
            // mirroring the HTTP error body.
            match diarize_file(&audio_file) {
                Ok(json) => {
                    println!("{json}");
                    Ok(())
                }
                Err(e) => {
                    println!("{}", serde_json::json!({ "error": e.to_string() }));
                    std::process::exit(1);
                }
            }
        }
        Commands::Download { target } => {
            let result = match target {
                DownloadTarget::Whisper { model, models_path } => {
                    download::download_whisper_model(&model, models_path)
                }
                DownloadTarget::Diarizer { models_path } => {
                    download::download_diarizer_models(models_path)
                }
            };
            if let Err(e) = result {
                eprintln!("{e}");
                std::process::exit(1);
            }
            Ok(())
        }
    }
}
