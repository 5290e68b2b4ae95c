use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Frame duration used when the host does not report one (25 fps).
pub const DEFAULT_FRAME_DURATION: f64 = 1.0 / 25.0;

/// Minimum token duration applied when the frame duration is unknown.
pub const MIN_DURATION_FALLBACK: f64 = 0.04;

const DEFAULT_MAX_CHARS_PER_LINE: usize = 20;
const DEFAULT_MAX_WORDS_PER_LINE: usize = 3;
const DEFAULT_TIME_OFFSET_FRAMES: f64 = 3.0;
const DEFAULT_LINE_HEIGHT_FACTOR: f64 = 1.2;
const DEFAULT_INTER_TOKEN_SPACE_FACTOR: f64 = 0.5;
const DEFAULT_FONT_SIZE: f64 = 60.0;
const DEFAULT_CANVAS_WIDTH: f64 = 1920.0;
const DEFAULT_CANVAS_HEIGHT: f64 = 1080.0;
const DEFAULT_FALLBACK_DURATION: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Direction {
    #[default]
    Ltr,
    Rtl,
}

impl FromStr for Direction {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "ltr" => Ok(Self::Ltr),
            "rtl" => Ok(Self::Rtl),
            other => Err(ConfigError::UnknownValue {
                field: "direction",
                value: other.to_string(),
            }),
        }
    }
}

/// Granularity requested from the transcription service.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TranscriptionLevel {
    #[default]
    Word,
    Sentence,
}

impl TranscriptionLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Word => "word",
            Self::Sentence => "sentence",
        }
    }
}

impl fmt::Display for TranscriptionLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TranscriptionLevel {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "word" => Ok(Self::Word),
            "sentence" => Ok(Self::Sentence),
            other => Err(ConfigError::UnknownValue {
                field: "level",
                value: other.to_string(),
            }),
        }
    }
}

/// Point inside a glyph box used as the origin for position and scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnchorPolicy {
    /// Horizontal centre on the text baseline, for per-word pop-in.
    #[default]
    Baseline,
    /// Geometric centre of the glyph box, as combined captions are anchored.
    Center,
}

impl FromStr for AnchorPolicy {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "baseline" => Ok(Self::Baseline),
            "center" | "centre" => Ok(Self::Center),
            other => Err(ConfigError::UnknownValue {
                field: "anchor",
                value: other.to_string(),
            }),
        }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {field}: {value}")]
    InvalidValue { field: &'static str, value: f64 },
    #[error("{field} must be at least 1")]
    ZeroLimit { field: &'static str },
    #[error("unknown {field}: {value}")]
    UnknownValue { field: &'static str, value: String },
}

/// Immutable settings for one pipeline run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub max_chars_per_line: usize,
    pub max_words_per_line: usize,
    pub direction: Direction,
    /// Seconds per frame of the target composition; `<= 0` means unknown.
    pub frame_duration: f64,
    /// Recognition latency to compensate for, in frames.
    pub time_offset_frames: f64,
    pub line_height_factor: f64,
    pub inter_token_space_factor: f64,
    pub font_size: f64,
    pub canvas_width: f64,
    pub canvas_height: f64,
    /// First line baseline; the canvas vertical centre when unset.
    pub baseline_y: Option<f64>,
    pub anchor: AnchorPolicy,
    pub level: TranscriptionLevel,
    /// Request both levels and fuse word timing with sentence text.
    pub fuse: bool,
    /// Keep every placed token visible until the last one ends.
    pub hold_until_last: bool,
    /// Duration given to a `full_text`-only transcript with no known length.
    pub fallback_duration: f64,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            max_chars_per_line: DEFAULT_MAX_CHARS_PER_LINE,
            max_words_per_line: DEFAULT_MAX_WORDS_PER_LINE,
            direction: Direction::Ltr,
            frame_duration: DEFAULT_FRAME_DURATION,
            time_offset_frames: DEFAULT_TIME_OFFSET_FRAMES,
            line_height_factor: DEFAULT_LINE_HEIGHT_FACTOR,
            inter_token_space_factor: DEFAULT_INTER_TOKEN_SPACE_FACTOR,
            font_size: DEFAULT_FONT_SIZE,
            canvas_width: DEFAULT_CANVAS_WIDTH,
            canvas_height: DEFAULT_CANVAS_HEIGHT,
            baseline_y: None,
            anchor: AnchorPolicy::Baseline,
            level: TranscriptionLevel::Word,
            fuse: false,
            hold_until_last: false,
            fallback_duration: DEFAULT_FALLBACK_DURATION,
        }
    }
}

fn positive(value: f64) -> bool {
    value.is_finite() && value > 0.0
}

fn non_negative(value: f64) -> bool {
    value.is_finite() && value >= 0.0
}

impl Config {
    /// Baseline of the first line.
    pub fn first_baseline(&self) -> f64 {
        self.baseline_y.unwrap_or(self.canvas_height / 2.0)
    }

    /// Check every field, reporting the first invalid one.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_chars_per_line == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "max_chars_per_line",
            });
        }
        if self.max_words_per_line == 0 {
            return Err(ConfigError::ZeroLimit {
                field: "max_words_per_line",
            });
        }
        let checks: [(&'static str, f64, fn(f64) -> bool); 7] = [
            ("time_offset_frames", self.time_offset_frames, non_negative),
            ("line_height_factor", self.line_height_factor, non_negative),
            (
                "inter_token_space_factor",
                self.inter_token_space_factor,
                non_negative,
            ),
            ("font_size", self.font_size, positive),
            ("canvas_width", self.canvas_width, positive),
            ("canvas_height", self.canvas_height, positive),
            ("fallback_duration", self.fallback_duration, positive),
        ];
        for (field, value, ok) in checks {
            if !ok(value) {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        if !self.frame_duration.is_finite() {
            return Err(ConfigError::InvalidValue {
                field: "frame_duration",
                value: self.frame_duration,
            });
        }
        Ok(())
    }

    /// Replace every invalid field with its default, logging each replacement.
    ///
    /// A non-positive frame duration is left alone: it only disables the
    /// latency correction downstream. A non-finite one becomes 0 (unknown).
    pub fn sanitized(mut self) -> Self {
        let defaults = Self::default();

        if self.max_chars_per_line == 0 {
            tracing::warn!(
                default = defaults.max_chars_per_line,
                "Invalid max characters per line, using default"
            );
            self.max_chars_per_line = defaults.max_chars_per_line;
        }
        if self.max_words_per_line == 0 {
            tracing::warn!(
                default = defaults.max_words_per_line,
                "Invalid max words per line, using default"
            );
            self.max_words_per_line = defaults.max_words_per_line;
        }

        let fields: [(&'static str, &mut f64, f64, fn(f64) -> bool); 7] = [
            (
                "time_offset_frames",
                &mut self.time_offset_frames,
                defaults.time_offset_frames,
                non_negative,
            ),
            (
                "line_height_factor",
                &mut self.line_height_factor,
                defaults.line_height_factor,
                non_negative,
            ),
            (
                "inter_token_space_factor",
                &mut self.inter_token_space_factor,
                defaults.inter_token_space_factor,
                non_negative,
            ),
            (
                "font_size",
                &mut self.font_size,
                defaults.font_size,
                positive,
            ),
            (
                "canvas_width",
                &mut self.canvas_width,
                defaults.canvas_width,
                positive,
            ),
            (
                "canvas_height",
                &mut self.canvas_height,
                defaults.canvas_height,
                positive,
            ),
            (
                "fallback_duration",
                &mut self.fallback_duration,
                defaults.fallback_duration,
                positive,
            ),
        ];
        for (field, value, default, ok) in fields {
            if !ok(*value) {
                tracing::warn!(field, value = *value, default, "Invalid config value, using default");
                *value = default;
            }
        }

        if !self.frame_duration.is_finite() {
            tracing::warn!(
                value = self.frame_duration,
                "Invalid frame duration, treating it as unknown"
            );
            self.frame_duration = 0.0;
        }
        if matches!(self.baseline_y, Some(y) if !y.is_finite()) {
            tracing::warn!("Invalid baseline, using canvas centre");
            self.baseline_y = None;
        }
        self
    }
}
