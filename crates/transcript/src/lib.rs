mod config;
mod response;
mod token;

pub use config::{
    AnchorPolicy, Config, ConfigError, Direction, TranscriptionLevel, DEFAULT_FRAME_DURATION,
    MIN_DURATION_FALLBACK,
};
pub use response::{RawSegment, RawWord, TranscriptParseError, TranscriptResponse};
pub use token::TimedToken;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A named configuration record, as kept by a settings store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Preset {
    pub name: String,
    pub config: Config,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Preset {
    pub fn new(name: impl Into<String>, config: Config) -> Self {
        let now = Utc::now();
        Self {
            name: name.into(),
            config,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Repository trait for preset persistence.
/// Implemented by storage layer, so the pipeline never touches persisted state.
pub trait PresetRepository: Send + Sync {
    type Error: std::error::Error + Send + Sync + 'static;

    fn save(&self, preset: &Preset) -> Result<(), Self::Error>;
    fn get(&self, name: &str) -> Result<Preset, Self::Error>;
    fn list(&self) -> Result<Vec<Preset>, Self::Error>;
    fn delete(&self, name: &str) -> Result<(), Self::Error>;
}
