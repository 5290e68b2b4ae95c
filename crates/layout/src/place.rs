//! Horizontal and vertical placement of wrapped lines.

use crate::measure::{BoundingBox, TextMeasure};
use crate::wrap::Line;
use serde::Serialize;
use subburn_transcript::{AnchorPolicy, Config, Direction, TimedToken};

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutParams {
    pub canvas_width: f64,
    pub canvas_height: f64,
    pub baseline_y: f64,
    pub font_size: f64,
    pub line_height_factor: f64,
    pub inter_token_space_factor: f64,
    pub direction: Direction,
    pub anchor: AnchorPolicy,
    pub hold_until_last: bool,
}

impl LayoutParams {
    pub fn from_config(config: &Config) -> Self {
        Self {
            canvas_width: config.canvas_width,
            canvas_height: config.canvas_height,
            baseline_y: config.first_baseline(),
            font_size: config.font_size,
            line_height_factor: config.line_height_factor,
            inter_token_space_factor: config.inter_token_space_factor,
            direction: config.direction,
            anchor: config.anchor,
            hold_until_last: config.hold_until_last,
        }
    }

    fn line_height(&self) -> f64 {
        self.font_size * self.line_height_factor
    }

    fn space(&self) -> f64 {
        self.font_size * self.inter_token_space_factor
    }

    /// Where a token sits before layout, and stays if it cannot be measured.
    pub(crate) fn default_position(&self) -> Point {
        Point {
            x: self.canvas_width / 2.0,
            y: self.canvas_height / 2.0,
        }
    }

    fn anchor_for(&self, rect: &BoundingBox) -> Point {
        match self.anchor {
            AnchorPolicy::Baseline => Point {
                x: rect.left + rect.width / 2.0,
                y: 0.0,
            },
            AnchorPolicy::Center => box_centre(rect),
        }
    }
}

pub(crate) fn box_centre(rect: &BoundingBox) -> Point {
    Point {
        x: rect.left + rect.width / 2.0,
        y: rect.top + rect.height / 2.0,
    }
}

/// Final render instruction for one token.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PlacedToken {
    pub token: TimedToken,
    /// Renderer node name, see [`TimedToken::layer_name`].
    pub layer: String,
    pub x: f64,
    pub y: f64,
    pub anchor: Point,
    pub line: usize,
    /// When the token leaves the screen; later than `token.end` when holding.
    pub visible_until: f64,
    /// False when measurement failed and the default position was kept.
    pub measured: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct LineMetrics {
    pub y: f64,
    pub total_width: f64,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct Layout {
    pub tokens: Vec<PlacedToken>,
    pub lines: Vec<LineMetrics>,
}

impl Layout {
    pub fn unmeasured(&self) -> usize {
        self.tokens.iter().filter(|t| !t.measured).count()
    }
}

pub(crate) fn measure_token(measure: &dyn TextMeasure, token: &TimedToken) -> Option<BoundingBox> {
    match measure.measure(token) {
        Ok(rect) if !rect.is_degenerate() => Some(rect),
        Ok(rect) => {
            tracing::warn!(text = %token.text, ?rect, "Degenerate glyph box, keeping default position");
            None
        }
        Err(e) => {
            tracing::warn!(text = %token.text, "Measurement failed, keeping default position: {}", e);
            None
        }
    }
}

/// Centre each line on the canvas and stack lines downward.
///
/// Right-to-left lines are the exact mirror of left-to-right ones about the
/// canvas centreline.
pub fn layout(lines: &[Line<'_>], params: &LayoutParams, measure: &dyn TextMeasure) -> Layout {
    let hold_end = lines
        .iter()
        .flat_map(|l| l.tokens.iter())
        .map(|t| t.end)
        .fold(f64::NEG_INFINITY, f64::max);
    let space = params.space();
    let centre = params.canvas_width / 2.0;

    let mut layout = Layout::default();
    for (i, line) in lines.iter().enumerate() {
        let y = params.baseline_y + i as f64 * params.line_height();
        let rects: Vec<Option<BoundingBox>> = line
            .tokens
            .iter()
            .map(|t| measure_token(measure, t))
            .collect();

        let widths: Vec<f64> = rects.iter().flatten().map(|r| r.width).collect();
        let total_width =
            widths.iter().sum::<f64>() + widths.len().saturating_sub(1) as f64 * space;

        let mut cursor = match params.direction {
            Direction::Ltr => centre - total_width / 2.0,
            Direction::Rtl => centre + total_width / 2.0,
        };

        for (token, rect) in line.tokens.iter().zip(&rects) {
            let visible_until = if params.hold_until_last {
                hold_end
            } else {
                token.end
            };

            let placed = match rect {
                Some(rect) => {
                    let x = match params.direction {
                        Direction::Ltr => {
                            let x = cursor + rect.width / 2.0;
                            cursor += rect.width + space;
                            x
                        }
                        Direction::Rtl => {
                            let x = cursor - rect.width / 2.0;
                            cursor -= rect.width + space;
                            x
                        }
                    };
                    PlacedToken {
                        token: (*token).clone(),
                        layer: token.layer_name(),
                        x,
                        y,
                        anchor: params.anchor_for(rect),
                        line: i,
                        visible_until,
                        measured: true,
                    }
                }
                None => {
                    let fallback = params.default_position();
                    PlacedToken {
                        token: (*token).clone(),
                        layer: token.layer_name(),
                        x: fallback.x,
                        y: fallback.y,
                        anchor: Point::default(),
                        line: i,
                        visible_until,
                        measured: false,
                    }
                }
            };
            layout.tokens.push(placed);
        }

        layout.lines.push(LineMetrics { y, total_width });
    }

    tracing::debug!(
        lines = layout.lines.len(),
        tokens = layout.tokens.len(),
        unmeasured = layout.unmeasured(),
        direction = ?params.direction,
        "layout_complete"
    );
    layout
}
