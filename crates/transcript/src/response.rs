//! Transcript JSON as returned by the transcription service.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

const PREVIEW_CHARS: usize = 200;

#[derive(Debug, thiserror::Error)]
pub enum TranscriptParseError {
    #[error("empty transcript response")]
    Empty,
    #[error("received HTML instead of JSON, response starts with: {preview}")]
    Html { preview: String },
    #[error("invalid transcript JSON: {0}")]
    Json(#[from] serde_json::Error),
}

/// One recognized word. Times are `None` when the service gave no usable number.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawWord {
    #[serde(rename = "word", default, deserialize_with = "lenient_text")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub start: Option<f64>,
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub end: Option<f64>,
}

impl RawWord {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start: Some(start),
            end: Some(end),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct RawSegment {
    #[serde(default, deserialize_with = "lenient_text")]
    pub text: String,
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub start: Option<f64>,
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub end: Option<f64>,
    #[serde(default)]
    pub words: Option<Vec<RawWord>>,
    /// Alignment failed for this segment; the service may send a message here.
    #[serde(default, deserialize_with = "truthy")]
    pub words_error: bool,
}

impl RawSegment {
    pub fn new(text: impl Into<String>, start: f64, end: f64) -> Self {
        Self {
            text: text.into(),
            start: Some(start),
            end: Some(end),
            words: None,
            words_error: false,
        }
    }

    pub fn with_words(mut self, words: Vec<RawWord>) -> Self {
        self.words = Some(words);
        self
    }

    /// Word list, empty when the segment carries none.
    pub fn words(&self) -> &[RawWord] {
        self.words.as_deref().unwrap_or_default()
    }

    /// Whether this segment can contribute word-level tokens.
    pub fn has_usable_words(&self) -> bool {
        !self.words_error && !self.words().is_empty()
    }
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TranscriptResponse {
    #[serde(default)]
    pub language: Option<String>,
    #[serde(default, deserialize_with = "lenient_seconds")]
    pub duration_seconds: Option<f64>,
    #[serde(default)]
    pub full_text: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
    #[serde(default, deserialize_with = "lenient_segments")]
    pub segments: Vec<RawSegment>,
    #[serde(default)]
    pub transcription_level: Option<String>,
}

impl TranscriptResponse {
    /// Validate and decode a raw response body.
    pub fn parse(body: &str) -> Result<Self, TranscriptParseError> {
        let body = body.trim_start();
        if body.is_empty() {
            return Err(TranscriptParseError::Empty);
        }
        if body.starts_with('<') {
            return Err(TranscriptParseError::Html {
                preview: body.chars().take(PREVIEW_CHARS).collect(),
            });
        }
        Ok(serde_json::from_str(body)?)
    }

    pub fn from_segments(segments: Vec<RawSegment>) -> Self {
        Self {
            segments,
            ..Self::default()
        }
    }
}

fn seconds_from_value(value: &Value) -> Option<f64> {
    let seconds = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    seconds.filter(|s| s.is_finite())
}

fn lenient_seconds<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.as_ref().and_then(seconds_from_value))
}

fn lenient_text<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

fn lenient_segments<'de, D>(deserializer: D) -> Result<Vec<RawSegment>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<RawSegment>>::deserialize(deserializer)?.unwrap_or_default())
}

fn truthy<'de, D>(deserializer: D) -> Result<bool, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(match value {
        None | Some(Value::Null) => false,
        Some(Value::Bool(b)) => b,
        Some(Value::String(s)) => !s.is_empty(),
        Some(Value::Number(n)) => n.as_f64().is_some_and(|n| n != 0.0),
        Some(_) => true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = r#"{
        "language": "en",
        "duration_seconds": 1.88,
        "full_text": "Hello world.",
        "segments": [
            { "start": 1.02, "end": 1.88, "text": "Hello world.",
              "words_error": false,
              "words": [ { "word": "Hello", "start": 1.02, "end": 1.40 },
                         { "word": "world.", "start": 1.40, "end": 1.88 } ] }
        ],
        "transcription_level": "word"
    }"#;

    #[test]
    fn parses_service_response() {
        let response = TranscriptResponse::parse(SAMPLE).unwrap();
        assert_eq!(response.language.as_deref(), Some("en"));
        assert_eq!(response.segments.len(), 1);
        let words = response.segments[0].words();
        assert_eq!(words.len(), 2);
        assert_eq!(words[1].text, "world.");
        assert_eq!(words[1].start, Some(1.40));
        assert!(response.segments[0].has_usable_words());
    }

    #[test]
    fn rejects_html_body() {
        let err = TranscriptResponse::parse("\n<!DOCTYPE html><html>500</html>").unwrap_err();
        match err {
            TranscriptParseError::Html { preview } => assert!(preview.starts_with("<!DOCTYPE")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn rejects_empty_and_malformed() {
        assert!(matches!(
            TranscriptResponse::parse("   "),
            Err(TranscriptParseError::Empty)
        ));
        assert!(matches!(
            TranscriptResponse::parse("{\"segments\": [}"),
            Err(TranscriptParseError::Json(_))
        ));
    }

    #[test]
    fn words_error_message_marks_segment() {
        let body = r#"{"segments": [{"text": "hola", "start": 0, "end": 1,
            "words_error": "Alignment failed for language xx: no model"}]}"#;
        let response = TranscriptResponse::parse(body).unwrap();
        assert!(response.segments[0].words_error);
        assert!(!response.segments[0].has_usable_words());
    }

    #[test]
    fn lenient_word_times() {
        let body = r#"{"segments": [{"text": "a b c", "start": 0, "end": 3, "words": [
            {"word": "a", "start": "0.5", "end": "0.9"},
            {"word": "b"},
            {"word": "c", "start": null, "end": "later"}
        ]}]}"#;
        let response = TranscriptResponse::parse(body).unwrap();
        let words = response.segments[0].words();
        assert_eq!(words[0].start, Some(0.5));
        assert_eq!(words[1].start, None);
        assert_eq!(words[2].end, None);
    }

    #[test]
    fn error_only_response() {
        let response =
            TranscriptResponse::parse(r#"{"error": "No audio file part in the request"}"#).unwrap();
        assert!(response.segments.is_empty());
        assert_eq!(
            response.error.as_deref(),
            Some("No audio file part in the request")
        );
    }

    #[test]
    fn null_segments_are_empty() {
        let response =
            TranscriptResponse::parse(r#"{"segments": null, "full_text": "hi"}"#).unwrap();
        assert!(response.segments.is_empty());
        assert_eq!(response.full_text.as_deref(), Some("hi"));
    }
}
