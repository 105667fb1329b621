use actix_cors::Cors;
use actix_multipart::Multipart;
use actix_web::{App, HttpResponse, HttpServer, Responder, get, middleware::Logger, post, web};
use log::{debug, error, info};
use std::sync::Arc;

use crate::audio;
use crate::diarizer::config::DiarizerConfig;
use crate::diarizer::engine::{Diarize, SpeakerDiarizer};
use crate::dto::DiarizationDto;
use crate::error::ApiError;
use crate::upload;

pub const DEFAULT_DIARIZE_PORT: u16 = 8000;

/// The diarization service reads its bind port from `PORT`.
pub fn diarize_port() -> u16 {
    std::env::var("PORT")
        .ok()
        .and_then(|p| p.parse().ok())
        .unwrap_or(DEFAULT_DIARIZE_PORT)
}

pub struct DiarizeState {
    pub engine: Arc<dyn Diarize>,
}

#[get("/health")]
async fn health_check() -> impl Responder {
    debug!("Health check endpoint called");
    HttpResponse::Ok().json(serde_json::json!({
        "status": "ok",
        "message": "Diarization service is running"
    }))
}

#[post("/diarize")]
async fn diarize_upload(
    data: web::Data<DiarizeState>,
    mut payload: Multipart,
) -> Result<HttpResponse, ApiError> {
    debug!("Diarization request received");

    let upload = upload::read_file_upload(&mut payload).await?;
    info!(
        "Processing upload '{}' ({} bytes)",
        upload.filename,
        upload.data.len()
    );

    let (_spool, path) = upload::spool_to_temp(&upload)?;

    let decoded = audio::load_wav(&path)?;
    let mono = audio::downmix_mono(&decoded.samples, decoded.channels);

    let segments = data
        .engine
        .diarize(&mono, decoded.sample_rate)
        .map_err(|e| {
            error!("Diarization failed: {e}");
            ApiError::Internal(format!("Diarization failed: {e}"))
        })?;

    info!(
        "Diarized '{}' into {} segments",
        upload.filename,
        segments.len()
    );

    Ok(HttpResponse::Ok().json(DiarizationDto { segments }))
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(health_check).service(diarize_upload);
}

pub async fn run_diarize_server(host: String) -> std::io::Result<()> {
    info!("Starting diarization service");

    let config = match DiarizerConfig::from_env() {
        Ok(c) => c,
        Err(e) => {
            error!("Invalid diarization configuration: {e}");
            std::process::exit(1);
        }
    };
    info!(
        "Using configuration: segmentation={:?}, embedding={:?}, max_speakers={}",
        config.segmentation_model_path, config.embedding_model_path, config.max_speakers
    );

    let engine = match SpeakerDiarizer::new(config) {
        Ok(d) => d,
        Err(e) => {
            error!("Failed to initialize diarizer: {e}");
            std::process::exit(1);
        }
    };

    let app_state = web::Data::new(DiarizeState {
        engine: Arc::new(engine),
    });

    let port = diarize_port();
    info!("Starting HTTP server on {host}:{port}");

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
    .bind((host.as_str(), port))?
    .run()
    .await
}
