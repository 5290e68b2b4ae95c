use serde::Serialize;
use subburn_fusion::{fuse, retime};
use subburn_layout::{
    combine, layout, place_combined, wrap_lines, LayoutParams, LineMetrics, PlacedCaption,
    PlacedToken, TextMeasure, WrapLimits,
};
use subburn_stt::{SttError, TranscriptRequest, TranscriptSource};
use subburn_timeline::{Timeline, TimelineBuilder, TimelineError};
use subburn_transcript::{
    Config, ConfigError, TranscriptParseError, TranscriptResponse, TranscriptionLevel,
};

#[derive(Debug, thiserror::Error)]
pub enum PipelineError {
    #[error("invalid configuration: {0}")]
    Config(#[from] ConfigError),
    #[error("transcription source failed: {0}")]
    Source(#[from] SttError),
    #[error("could not parse transcript: {0}")]
    Parse(#[from] TranscriptParseError),
    #[error(transparent)]
    Timeline(#[from] TimelineError),
}

pub type Result<T> = std::result::Result<T, PipelineError>;

/// Everything the renderer needs for one transcript.
#[derive(Debug, Clone, Default, Serialize)]
pub struct RenderPlan {
    pub language: Option<String>,
    pub tokens: Vec<PlacedToken>,
    pub lines: Vec<LineMetrics>,
    /// The same tokens as a single wrapped text block.
    pub combined: Option<PlacedCaption>,
    pub skipped_segments: usize,
    pub skipped_tokens: usize,
    /// Sentence words lost to a word-count mismatch during fusion.
    pub dropped_words: usize,
}

/// Runs transcript → timeline → lines → placed tokens for one config.
pub struct CaptionPipeline<'m> {
    config: Config,
    measure: &'m dyn TextMeasure,
}

impl<'m> CaptionPipeline<'m> {
    pub fn new(config: Config, measure: &'m dyn TextMeasure) -> Result<Self> {
        config.validate()?;
        Ok(Self { config, measure })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Lay out a single transcript at the configured granularity.
    pub fn render_response(&self, response: &TranscriptResponse) -> Result<RenderPlan> {
        let timeline =
            TimelineBuilder::new(&self.config).build_response(response, self.config.level)?;
        Ok(self.render_timeline(timeline, response.language.clone(), 0))
    }

    /// Word timing from `words`, text from `sentences`.
    ///
    /// If the two cannot be fused the sentence transcript is rendered on its
    /// own, one token per sentence.
    pub fn render_fused(
        &self,
        words: &TranscriptResponse,
        sentences: &TranscriptResponse,
    ) -> Result<RenderPlan> {
        let builder = TimelineBuilder::new(&self.config);
        let language = sentences.language.clone().or_else(|| words.language.clone());

        match fuse(&words.segments, &sentences.segments) {
            Ok(fusion) => {
                let timeline = builder.build(&fusion.segments, TranscriptionLevel::Word);
                Ok(self.render_timeline(timeline, language, fusion.dropped_words))
            }
            Err(e) => {
                tracing::warn!("Fusion failed, using sentence transcript alone: {}", e);
                let timeline = builder.build_response(sentences, TranscriptionLevel::Sentence)?;
                Ok(self.render_timeline(timeline, language, 0))
            }
        }
    }

    /// Render `sentences` as one token each, timed by their share of the
    /// characters in `response`'s segments.
    ///
    /// For sentence boundaries produced outside the transcription service.
    pub fn render_resplit(
        &self,
        response: &TranscriptResponse,
        sentences: &[String],
    ) -> Result<RenderPlan> {
        let resplit = TranscriptResponse {
            segments: retime(&response.segments, sentences),
            ..response.clone()
        };
        let timeline = TimelineBuilder::new(&self.config)
            .build_response(&resplit, TranscriptionLevel::Sentence)?;
        Ok(self.render_timeline(timeline, response.language.clone(), 0))
    }

    /// Fetch and render. With `fuse` set, the word transcript is requested
    /// first and the sentence transcript second, never concurrently.
    pub fn transcribe(
        &self,
        source: &dyn TranscriptSource,
        request: &TranscriptRequest,
    ) -> Result<RenderPlan> {
        tracing::info!(source = source.name(), fuse = self.config.fuse, "transcribe_start");

        if self.config.fuse {
            let words = fetch_parsed(source, &request.with_level(TranscriptionLevel::Word))?;
            let sentences =
                fetch_parsed(source, &request.with_level(TranscriptionLevel::Sentence))?;
            return self.render_fused(&words, &sentences);
        }

        let response = fetch_parsed(source, &request.with_level(self.config.level))?;
        self.render_response(&response)
    }

    fn render_timeline(
        &self,
        timeline: Timeline,
        language: Option<String>,
        dropped_words: usize,
    ) -> RenderPlan {
        let limits = WrapLimits::new(
            self.config.max_chars_per_line,
            self.config.max_words_per_line,
        );
        let params = LayoutParams::from_config(&self.config);
        let lines = wrap_lines(&timeline.tokens, limits.max_chars, limits.max_words);
        let placed = layout(&lines, &params, self.measure);
        let combined = combine(&timeline.tokens, limits)
            .map(|caption| place_combined(caption, &params, self.measure));

        tracing::info!(
            tokens = placed.tokens.len(),
            lines = placed.lines.len(),
            skipped_segments = timeline.skipped_segments,
            skipped_tokens = timeline.skipped_tokens,
            dropped_words,
            unmeasured = placed.unmeasured(),
            "render_plan_ready"
        );

        RenderPlan {
            language,
            tokens: placed.tokens,
            lines: placed.lines,
            combined,
            skipped_segments: timeline.skipped_segments,
            skipped_tokens: timeline.skipped_tokens,
            dropped_words,
        }
    }
}

fn fetch_parsed(
    source: &dyn TranscriptSource,
    request: &TranscriptRequest,
) -> Result<TranscriptResponse> {
    let body = source.fetch(request)?;
    TranscriptResponse::parse(&body).map_err(|e| {
        tracing::error!(level = %request.level, "Unreadable transcript response: {}", e);
        PipelineError::from(e)
    })
}
