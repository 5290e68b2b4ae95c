use serde::Serialize;
use subburn_transcript::TimedToken;

/// Glyph box of a rendered token, relative to its layer origin.
/// `top` is negative above the baseline.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BoundingBox {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl BoundingBox {
    /// Zero-area or non-finite boxes cannot be positioned.
    pub fn is_degenerate(&self) -> bool {
        !(self.width > 0.0 && self.height > 0.0 && self.left.is_finite() && self.top.is_finite())
    }
}

#[derive(Debug, thiserror::Error)]
pub enum MeasureError {
    #[error("text measurement failed: {0}")]
    Failed(String),
}

/// Glyph metrics, supplied by whatever renders the text.
pub trait TextMeasure {
    fn measure(&self, token: &TimedToken) -> Result<BoundingBox, MeasureError>;
}

impl<F> TextMeasure for F
where
    F: Fn(&TimedToken) -> Result<BoundingBox, MeasureError>,
{
    fn measure(&self, token: &TimedToken) -> Result<BoundingBox, MeasureError> {
        self(token)
    }
}

/// Approximate metrics for hosts without a text engine: every character
/// advances half the font size and each extra line adds one font size.
#[derive(Debug, Clone, Copy)]
pub struct EstimatedMeasure {
    pub font_size: f64,
    pub char_width_factor: f64,
}

const ESTIMATED_CHAR_WIDTH_FACTOR: f64 = 0.5;
const ESTIMATED_ASCENT_FACTOR: f64 = 0.8;

impl EstimatedMeasure {
    pub fn new(font_size: f64) -> Self {
        Self {
            font_size,
            char_width_factor: ESTIMATED_CHAR_WIDTH_FACTOR,
        }
    }
}

impl TextMeasure for EstimatedMeasure {
    fn measure(&self, token: &TimedToken) -> Result<BoundingBox, MeasureError> {
        let text = token.text.trim();
        let widest = text.lines().map(|l| l.trim().chars().count()).max().unwrap_or(0);
        let lines = text.lines().count().max(1);
        Ok(BoundingBox {
            left: 0.0,
            top: -ESTIMATED_ASCENT_FACTOR * self.font_size,
            width: widest as f64 * self.char_width_factor * self.font_size,
            height: lines as f64 * self.font_size,
        })
    }
}
