use serde::{Deserialize, Serialize};

/// One speaker turn produced by diarization. Times are in seconds.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct SpeakerSegment {
    pub start: f64,
    pub end: f64,
    pub speaker: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct DiarizationDto {
    pub segments: Vec<SpeakerSegment>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TranscriptionDto {
    pub transcript: String,
    pub detected_language: String,
    pub confidence: f32,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorDto {
    pub error: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speaker_segment_serializes_flat() {
        let seg = SpeakerSegment {
            start: 0.5,
            end: 2.25,
            speaker: "SPEAKER_00".to_string(),
        };
        let json = serde_json::to_value(&seg).unwrap();
        assert_eq!(json["start"], 0.5);
        assert_eq!(json["end"], 2.25);
        assert_eq!(json["speaker"], "SPEAKER_00");
    }

    #[test]
    fn diarization_dto_wraps_segments_array() {
        let dto = DiarizationDto { segments: vec![] };
        let json = serde_json::to_value(&dto).unwrap();
        assert!(json["segments"].as_array().unwrap().is_empty());
    }

    #[test]
    fn error_dto_is_flat_error_field() {
        let dto = ErrorDto {
            error: "No file selected".to_string(),
        };
        let json = serde_json::to_value(&dto).unwrap();
        assert_eq!(json, serde_json::json!({"error": "No file selected"}));
    }
}
