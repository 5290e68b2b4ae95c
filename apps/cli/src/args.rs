use clap::Args;
use subburn_transcript::{AnchorPolicy, Config, Direction, TranscriptionLevel};

/// Flags that override individual config fields.
#[derive(Args, Debug, Default, Clone)]
pub struct ConfigArgs {
    /// Start from a stored preset instead of the defaults
    #[arg(long, global = true)]
    pub preset: Option<String>,

    /// Maximum characters per line, separators included
    #[arg(long, global = true)]
    pub max_chars: Option<usize>,

    /// Maximum words per line
    #[arg(long, global = true)]
    pub max_words: Option<usize>,

    /// Reading direction: ltr or rtl
    #[arg(long, global = true)]
    pub direction: Option<Direction>,

    /// Composition frame rate, 0 when unknown
    #[arg(long, global = true)]
    pub fps: Option<f64>,

    /// Frames to show each token before it is spoken
    #[arg(long, global = true)]
    pub offset_frames: Option<f64>,

    #[arg(long, global = true)]
    pub font_size: Option<f64>,

    /// Line spacing as a multiple of the font size
    #[arg(long, global = true)]
    pub line_height: Option<f64>,

    /// Gap between tokens as a multiple of the font size
    #[arg(long, global = true)]
    pub space_factor: Option<f64>,

    #[arg(long, global = true)]
    pub canvas_width: Option<f64>,

    #[arg(long, global = true)]
    pub canvas_height: Option<f64>,

    /// Baseline of the first line (defaults to the vertical centre)
    #[arg(long, global = true)]
    pub baseline_y: Option<f64>,

    /// Token anchor: baseline or center
    #[arg(long, global = true)]
    pub anchor: Option<AnchorPolicy>,

    /// Transcript granularity: word or sentence
    #[arg(long, global = true)]
    pub level: Option<TranscriptionLevel>,

    /// Fuse word timing with sentence text
    #[arg(long, global = true)]
    pub fuse: bool,

    /// Keep every token on screen until the last one ends
    #[arg(long, global = true)]
    pub hold: bool,
}

impl ConfigArgs {
    pub fn apply(&self, mut config: Config) -> Config {
        if let Some(v) = self.max_chars {
            config.max_chars_per_line = v;
        }
        if let Some(v) = self.max_words {
            config.max_words_per_line = v;
        }
        if let Some(v) = self.direction {
            config.direction = v;
        }
        if let Some(fps) = self.fps {
            match frame_duration_for(fps) {
                Some(duration) => config.frame_duration = duration,
                None => tracing::warn!(fps, "Ignoring invalid frame rate"),
            }
        }
        if let Some(v) = self.line_height {
            config.line_height_factor = v;
        }
        if let Some(v) = self.space_factor {
            config.inter_token_space_factor = v;
        }
        if let Some(v) = self.offset_frames {
            config.time_offset_frames = v;
        }
        if let Some(v) = self.font_size {
            config.font_size = v;
        }
        if let Some(v) = self.canvas_width {
            config.canvas_width = v;
        }
        if let Some(v) = self.canvas_height {
            config.canvas_height = v;
        }
        if self.baseline_y.is_some() {
            config.baseline_y = self.baseline_y;
        }
        if let Some(v) = self.anchor {
            config.anchor = v;
        }
        if let Some(v) = self.level {
            config.level = v;
        }
        config.fuse |= self.fuse;
        config.hold_until_last |= self.hold;

        config.sanitized()
    }
}

/// Seconds per frame for `fps`; 0 marks the frame duration unknown.
fn frame_duration_for(fps: f64) -> Option<f64> {
    if fps == 0.0 {
        return Some(0.0);
    }
    let duration = 1.0 / fps;
    (fps > 0.0 && duration.is_finite()).then_some(duration)
}
