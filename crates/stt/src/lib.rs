mod http;

pub use http::{HealthStatus, HttpTranscriptSource, DEFAULT_BASE_URL};

use std::path::{Path, PathBuf};
use subburn_transcript::TranscriptionLevel;

/// Audio containers the transcription service accepts.
pub const ALLOWED_EXTENSIONS: &[&str] = &["wav", "mp3", "m4a", "ogg", "flac", "aac", "opus"];

#[derive(Debug, thiserror::Error)]
pub enum SttError {
    #[error("audio file not found: {0}")]
    AudioNotFound(PathBuf),
    #[error("unsupported audio format: {0}")]
    UnsupportedAudioFormat(String),
    #[error("transcription request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, SttError>;

/// One call to the transcription service.
#[derive(Debug, Clone)]
pub struct TranscriptRequest {
    pub audio: PathBuf,
    pub level: TranscriptionLevel,
    /// Key for the optional sentence re-splitting pass.
    pub gemini_api_key: Option<String>,
}

impl TranscriptRequest {
    pub fn new(audio: impl Into<PathBuf>, level: TranscriptionLevel) -> Self {
        Self {
            audio: audio.into(),
            level,
            gemini_api_key: None,
        }
    }

    pub fn with_level(&self, level: TranscriptionLevel) -> Self {
        Self {
            level,
            ..self.clone()
        }
    }

    /// Check the audio file before anything is sent.
    pub fn validate(&self) -> Result<()> {
        if !is_allowed_audio(&self.audio) {
            let ext = self
                .audio
                .extension()
                .and_then(|e| e.to_str())
                .unwrap_or_default()
                .to_string();
            return Err(SttError::UnsupportedAudioFormat(ext));
        }
        if !self.audio.is_file() {
            return Err(SttError::AudioNotFound(self.audio.clone()));
        }
        Ok(())
    }
}

pub fn is_allowed_audio(path: &Path) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| e.to_ascii_lowercase())
        .is_some_and(|e| ALLOWED_EXTENSIONS.contains(&e.as_str()))
}

/// Anything that can turn an audio file into transcript JSON.
///
/// Calls block until the service answers; timeouts are the source's concern.
pub trait TranscriptSource: Send + Sync {
    /// Human-readable name of the source (e.g. the service URL).
    fn name(&self) -> &str;

    /// Raw response body. Failure bodies the service still answers with
    /// (JSON `error`, HTML pages) are returned as-is for the parse step.
    fn fetch(&self, request: &TranscriptRequest) -> Result<String>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allowed_extensions() {
        assert!(is_allowed_audio(Path::new("take1.wav")));
        assert!(is_allowed_audio(Path::new("/tmp/Interview.M4A")));
        assert!(!is_allowed_audio(Path::new("notes.txt")));
        assert!(!is_allowed_audio(Path::new("no_extension")));
    }

    #[test]
    fn test_validate_missing_file() {
        let request = TranscriptRequest::new("/nonexistent/voice.mp3", TranscriptionLevel::Word);
        assert!(matches!(request.validate(), Err(SttError::AudioNotFound(_))));
    }

    #[test]
    fn test_validate_extension_first() {
        let request = TranscriptRequest::new("/nonexistent/voice.doc", TranscriptionLevel::Word);
        assert!(matches!(
            request.validate(),
            Err(SttError::UnsupportedAudioFormat(ext)) if ext == "doc"
        ));
    }

    #[test]
    fn test_validate_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        let audio = dir.path().join("clip.flac");
        std::fs::write(&audio, b"fLaC").unwrap();

        let request = TranscriptRequest::new(&audio, TranscriptionLevel::Sentence);
        assert!(request.validate().is_ok());
        assert_eq!(
            request.with_level(TranscriptionLevel::Word).level,
            TranscriptionLevel::Word
        );
    }
}
