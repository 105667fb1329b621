use actix_web::{App, test, web};
use std::io::Cursor;
use std::sync::Arc;

use speechbox::transcribe_server::{self, TranscribeState};
use speechbox::whisper::transcriber::{InputAudio, SpeechToText, TranscribeOutput};

const BOUNDARY: &str = "----speechboxspoolboundary";

fn multipart_file(data: &[u8]) -> Vec<u8> {
    let mut body = Vec::new();
    body.extend_from_slice(format!("--{BOUNDARY}\r\n").as_bytes());
    body.extend_from_slice(
        b"Content-Disposition: form-data; name=\"file\"; filename=\"meeting.wav\"\r\n",
    );
    body.extend_from_slice(b"Content-Type: application/octet-stream\r\n\r\n");
    body.extend_from_slice(data);
    body.extend_from_slice(format!("\r\n--{BOUNDARY}--\r\n").as_bytes());
    body
}

fn silent_wav() -> Vec<u8> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: 16000,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };
    let mut cursor = Cursor::new(Vec::new());
    {
        let mut writer = hound::WavWriter::new(&mut cursor, spec).unwrap();
        for _ in 0..16000 {
            writer.write_sample(0i16).unwrap();
        }
        writer.finalize().unwrap();
    }
    cursor.into_inner()
}

struct FailingEngine;

impl SpeechToText for FailingEngine {
    fn transcribe(&self, _audio: &InputAudio) -> anyhow::Result<TranscribeOutput> {
        anyhow::bail!("model exploded")
    }
}

struct SilentEngine;

impl SpeechToText for SilentEngine {
    fn transcribe(&self, _audio: &InputAudio) -> anyhow::Result<TranscribeOutput> {
        Ok(TranscribeOutput {
            transcript: String::new(),
            detected_language: "en".to_string(),
            confidence: 0.0,
            segments: Vec::new(),
        })
    }
}

fn assert_no_leftovers(root: &tempfile::TempDir, phase: &str) {
    let leftovers: Vec<_> = std::fs::read_dir(root.path())
        .unwrap()
        .map(|e| e.unwrap().path())
        .collect();
    assert!(
        leftovers.is_empty(),
        "spool files must be deleted after the {phase} response, found: {leftovers:?}"
    );
}

// Lives in its own test binary: the TMPDIR override below is process-wide,
// and nothing else in this process creates temp files concurrently.
#[actix_web::test]
async fn spooled_uploads_are_deleted_after_response_success_or_failure() {
    let spool_root = tempfile::tempdir().unwrap();
    unsafe { std::env::set_var("TMPDIR", spool_root.path()) };

    let failing = test::init_service(
        App::new()
            .app_data(web::Data::new(TranscribeState {
                engine: Arc::new(FailingEngine),
            }))
            .configure(transcribe_server::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/transcribe")
        .insert_header((
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart_file(&silent_wav()))
        .to_request();
    let resp = test::call_service(&failing, req).await;
    assert_eq!(resp.status(), 500);
    assert_no_leftovers(&spool_root, "failure");

    let succeeding = test::init_service(
        App::new()
            .app_data(web::Data::new(TranscribeState {
                engine: Arc::new(SilentEngine),
            }))
            .configure(transcribe_server::configure),
    )
    .await;

    let req = test::TestRequest::post()
        .uri("/transcribe")
        .insert_header((
            "content-type",
            format!("multipart/form-data; boundary={BOUNDARY}"),
        ))
        .set_payload(multipart_file(&silent_wav()))
        .to_request();
    let resp = test::call_service(&succeeding, req).await;
    assert_eq!(resp.status(), 200);
    assert_no_leftovers(&spool_root, "success");
}
