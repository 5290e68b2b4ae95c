use crate::{Result, TranscriptRequest, TranscriptSource};
use reqwest::blocking::{multipart, Client};
use serde::{Deserialize, Serialize};
use std::time::{Duration, Instant};

/// Where the local WhisperX service listens by default.
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Transcription plus alignment of long audio on CPU can take minutes.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(600);
const HEALTH_TIMEOUT: Duration = Duration::from_secs(5);

/// Body of the service's `/health` endpoint.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthStatus {
    pub status: String,
    #[serde(default)]
    pub model_loaded: bool,
    #[serde(default)]
    pub model_type: Option<String>,
    #[serde(default)]
    pub model_size: Option<String>,
    #[serde(default)]
    pub language_setting: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

/// Blocking client for the `/transcribe` endpoint.
pub struct HttpTranscriptSource {
    base_url: String,
    client: Client,
}

impl HttpTranscriptSource {
    pub fn new(base_url: impl Into<String>) -> Result<Self> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    pub fn with_timeout(base_url: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client,
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path)
    }

    /// Probe whether the service is up and has its model loaded.
    ///
    /// The service answers 500 with a JSON body when the model failed to
    /// load, so the body is decoded regardless of status.
    pub fn health(&self) -> Result<HealthStatus> {
        let response = self
            .client
            .get(self.endpoint("health"))
            .timeout(HEALTH_TIMEOUT)
            .send()?;
        tracing::debug!(status = %response.status(), "health_check");
        Ok(response.json()?)
    }
}

impl TranscriptSource for HttpTranscriptSource {
    fn name(&self) -> &str {
        &self.base_url
    }

    fn fetch(&self, request: &TranscriptRequest) -> Result<String> {
        request.validate()?;

        let mut form = multipart::Form::new()
            .file("audio", &request.audio)?
            .text("transcription_level", request.level.as_str());
        if let Some(key) = request.gemini_api_key.as_deref().filter(|k| !k.trim().is_empty()) {
            form = form.text("gemini_api_key", key.trim().to_string());
        }

        tracing::info!(
            url = %self.endpoint("transcribe"),
            audio = %request.audio.display(),
            level = %request.level,
            "Sending transcription request"
        );
        let started = Instant::now();
        let response = self
            .client
            .post(self.endpoint("transcribe"))
            .multipart(form)
            .send()
            .map_err(|e| {
                tracing::error!("Transcription request failed: {}", e);
                e
            })?;

        let status = response.status();
        let body = response.text()?;
        tracing::info!(
            status = %status,
            bytes = body.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "transcription_response"
        );
        if !status.is_success() {
            tracing::warn!(status = %status, "Service answered with an error status");
        }
        Ok(body)
    }
}
