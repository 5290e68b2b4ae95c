mod pipeline;

pub use pipeline::{CaptionPipeline, PipelineError, RenderPlan, Result};
