mod combine;
mod measure;
mod place;
mod wrap;

pub use combine::{combine, place_combined, CombinedCaption, PlacedCaption};
pub use measure::{BoundingBox, EstimatedMeasure, MeasureError, TextMeasure};
pub use place::{layout, Layout, LayoutParams, LineMetrics, PlacedToken, Point};
pub use wrap::{wrap_lines, Line, WrapLimits};
