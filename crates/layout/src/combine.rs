use crate::measure::TextMeasure;
use crate::place::{box_centre, measure_token, LayoutParams, Point};
use crate::wrap::{greedy_wrap, WrapLimits};
use serde::Serialize;
use subburn_transcript::TimedToken;

/// Several tokens merged into one wrapped caption block.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CombinedCaption {
    /// Words joined by spaces, lines by `\n`.
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub line_count: usize,
}

/// Merge `tokens` into a single caption, re-wrapping word by word.
///
/// Sentence tokens are split on whitespace first, so the limits apply to
/// words regardless of how the tokens were grouped. Spans from the first
/// token's start to the last token's end.
pub fn combine(tokens: &[TimedToken], limits: WrapLimits) -> Option<CombinedCaption> {
    let first = tokens.first()?;
    let last = tokens.last()?;

    let words = tokens
        .iter()
        .flat_map(|t| t.text.split_whitespace())
        .map(|w| (w, w.chars().count()));
    let lines = greedy_wrap(words, limits);
    if lines.is_empty() {
        return None;
    }

    let text = lines
        .iter()
        .map(|(words, _)| words.join(" "))
        .collect::<Vec<_>>()
        .join("\n");

    Some(CombinedCaption {
        text,
        start: first.start,
        end: last.end,
        line_count: lines.len(),
    })
}

/// A combined caption positioned on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedCaption {
    #[serde(flatten)]
    pub caption: CombinedCaption,
    pub x: f64,
    pub y: f64,
    /// Geometric centre of the whole block, whatever the token anchor policy.
    pub anchor: Point,
    pub measured: bool,
}

/// Centre the caption block on the canvas, anchored at its own centre.
///
/// The block is measured as one multi-line text. If that fails the anchor
/// stays at the layer origin.
pub fn place_combined(
    caption: CombinedCaption,
    params: &LayoutParams,
    measure: &dyn TextMeasure,
) -> PlacedCaption {
    let block = TimedToken {
        text: caption.text.clone(),
        start: caption.start,
        end: caption.end,
        segment_index: 0,
        token_index: 0,
    };
    let (anchor, measured) = match measure_token(measure, &block) {
        Some(rect) => (box_centre(&rect), true),
        None => (Point::default(), false),
    };
    let position = params.default_position();

    PlacedCaption {
        caption,
        x: position.x,
        y: position.y,
        anchor,
        measured,
    }
}
