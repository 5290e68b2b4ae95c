mod builder;
pub mod time;

pub use builder::{Timeline, TimelineBuilder};

use subburn_transcript::{Config, ConfigError, RawSegment, TranscriptionLevel};

#[derive(Debug, thiserror::Error)]
pub enum TimelineError {
    /// The service reported a failure and returned nothing usable.
    #[error("transcription service error: {0}")]
    Service(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}

pub type Result<T> = std::result::Result<T, TimelineError>;

/// Build the token timeline for `segments` at the given granularity.
pub fn build_timeline(
    segments: &[RawSegment],
    level: TranscriptionLevel,
    config: &Config,
) -> Result<Timeline> {
    config.validate()?;
    Ok(TimelineBuilder::new(config).build(segments, level))
}
