use actix_cors::Cors;
use actix_multipart::Multipart;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, post, web};
use log::{debug, error, info};
use std::sync::Arc;

use crate::audio;
use crate::dto::TranscriptionDto;
use crate::error::ApiError;
use crate::upload;
use crate::whisper::config::WhisperConfig;
use crate::whisper::transcriber::{InputAudio, SpeechToText, WhisperTranscriber};

/// The transcription service binds a fixed port.
pub const TRANSCRIBE_PORT: u16 = 5001;

pub struct TranscribeState {
    pub engine: Arc<dyn SpeechToText>,
}

#[get("/health")]
async fn health_check() -> impl Responder {
    debug!("Health check endpoint called");
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "message": "Transcription service is running"
    }))
}

#[post("/transcribe")]
async fn transcribe_upload(
    data: web::Data<TranscribeState>,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    debug!("Transcription request received");

    let upload = upload::read_file_upload(&mut payload).await?;
    info!(
        "Processing upload '{}' ({} bytes)",
        upload.filename,
        upload.data.len()
    );

    // Spool lives until the response is built; drop deletes the file on
    // success and on every early return.
    let (_spool, path) = upload::spool_to_temp(&upload)?;

    let decoded = audio::load_wav(&path)?;
    let mono = audio::downmix_mono(&decoded.samples, decoded.channels);

    let input = InputAudio {
        data: &mono,
        sample_rate: decoded.sample_rate,
        channels: 1,
    };

    let output = data.engine.transcribe(&input).map_err(|e| {
        error!("Transcription failed: {e}");
        ApiError::Internal(format!("Transcription failed: {e}"))
    })?;

    info!(
        "Detected language '{}' with confidence {:.2}; transcribed {} segments for '{}'",
        output.detected_language,
        output.confidence,
        output.segments.len(),
        upload.filename
    );

    Ok(HttpResponse::Ok().json(TranscriptionDto {
        transcript: output.transcript,
        detected_language: output.detected_language,
        confidence: output.confidence,
    }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check).service(transcribe_upload);
}

pub async fn run_transcribe_server(host: String) -> std::io::Result<()> {
    info!("Starting transcription service");

    let config = match WhisperConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid transcription configuration: {e}");
            std::process::exit(1);
        }
    };
    info!(
        "Using configuration: model_path={:?}, use_gpu={}, beam_size={}, num_threads={}",
        config.model_path, config.use_gpu, config.beam_size, config.num_threads
    );

    let engine = match WhisperTranscriber::new(config) {
        Ok(t) => {
            info!("Whisper model loaded");
            t
        }
        Err(e) => {
            error!("Failed to initialize transcriber: {e}");
            std::process::exit(1);
        }
    };

    let app_state = web::Data::new(TranscribeState {
        engine: Arc::new(engine),
    });

    info!("Starting HTTP server on {host}:{TRANSCRIBE_PORT}");

    HttpServer::new(move || {
        App::new()
            .app_data(app_state.clone())
            .app_data(
                actix_multipart::form::MultipartFormConfig::default()
                    .total_limit(100 * 1024 * 1024), // 100MB
            )
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_method()
                    .allow_any_header()
                    .max_age(3600),
            )
            .wrap(Logger::default())
            .configure(configure)
    })
    .bind((host.as_str(), TRANSCRIBE_PORT))?
    .run()
    .await
}
