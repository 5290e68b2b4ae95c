use crate::time::{adjust, enforce_min_duration, quantize_offset};
use crate::TimelineError;
use serde::Serialize;
use subburn_transcript::{Config, RawSegment, TimedToken, TranscriptResponse, TranscriptionLevel};

/// Ordered tokens plus the count of input that could not be used.
#[derive(Debug, Clone, Default, Serialize)]
pub struct Timeline {
    pub tokens: Vec<TimedToken>,
    /// Segments without usable words (word mode) or text (sentence mode).
    pub skipped_segments: usize,
    /// Individual words or sentences rejected for empty text or bad times.
    pub skipped_tokens: usize,
}

/// Turns raw segments into non-overlapping, gap-filled tokens.
pub struct TimelineBuilder {
    offset: f64,
    frame_duration: f64,
    fallback_duration: f64,
}

/// Word text as displayed: trimmed, one trailing period removed.
fn display_word(raw: &str) -> Option<&str> {
    let text = raw.trim();
    let text = text.strip_suffix('.').unwrap_or(text);
    (!text.is_empty()).then_some(text)
}

impl TimelineBuilder {
    pub fn new(config: &Config) -> Self {
        Self {
            offset: quantize_offset(config.frame_duration, config.time_offset_frames),
            frame_duration: config.frame_duration,
            fallback_duration: config.fallback_duration,
        }
    }

    pub fn build(&self, segments: &[RawSegment], level: TranscriptionLevel) -> Timeline {
        let timeline = match level {
            TranscriptionLevel::Word => self.build_words(segments),
            TranscriptionLevel::Sentence => self.build_sentences(segments),
        };

        tracing::info!(
            level = %level,
            segments = segments.len(),
            tokens = timeline.tokens.len(),
            skipped_segments = timeline.skipped_segments,
            skipped_tokens = timeline.skipped_tokens,
            offset = self.offset,
            "timeline_built"
        );
        if !segments.is_empty() && timeline.skipped_segments == segments.len() {
            tracing::warn!("No segment carried usable data; check the service alignment models");
        }
        timeline
    }

    /// Build from a whole service response, honouring its `full_text` and
    /// `error` fallbacks when it has no segments.
    pub fn build_response(
        &self,
        response: &TranscriptResponse,
        level: TranscriptionLevel,
    ) -> Result<Timeline, TimelineError> {
        if !response.segments.is_empty() {
            return Ok(self.build(&response.segments, level));
        }

        let full_text = response
            .full_text
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty());
        if let Some(text) = full_text {
            let duration = response
                .duration_seconds
                .filter(|d| *d > 0.0)
                .unwrap_or(self.fallback_duration);
            tracing::info!(duration, "No segments in response, using full text");
            return Ok(Timeline {
                tokens: vec![TimedToken {
                    text: text.to_string(),
                    start: 0.0,
                    end: duration,
                    segment_index: 0,
                    token_index: 0,
                }],
                ..Timeline::default()
            });
        }

        if let Some(error) = &response.error {
            return Err(TimelineError::Service(error.clone()));
        }

        tracing::debug!("Response carried no segments and no text");
        Ok(Timeline::default())
    }

    fn build_words(&self, segments: &[RawSegment]) -> Timeline {
        let mut timeline = Timeline::default();

        for (i, segment) in segments.iter().enumerate() {
            if !segment.has_usable_words() {
                tracing::debug!(
                    segment = i,
                    words_error = segment.words_error,
                    "Skipping segment without word alignment"
                );
                timeline.skipped_segments += 1;
                continue;
            }

            let words = segment.words();
            for (j, word) in words.iter().enumerate() {
                let Some(text) = display_word(&word.text) else {
                    timeline.skipped_tokens += 1;
                    continue;
                };
                let (Some(raw_start), Some(raw_end)) = (word.start, word.end) else {
                    tracing::debug!(segment = i, word = j, text, "Skipping word without times");
                    timeline.skipped_tokens += 1;
                    continue;
                };
                if raw_end <= raw_start {
                    tracing::debug!(
                        segment = i,
                        word = j,
                        raw_start,
                        raw_end,
                        "Skipping word with non-positive duration"
                    );
                    timeline.skipped_tokens += 1;
                    continue;
                }

                let start = adjust(raw_start, self.offset);

                // Hand off to whatever appears next so words never leave a blank frame.
                let next_start = if j + 1 < words.len() {
                    words[j + 1].start
                } else {
                    segments
                        .get(i + 1)
                        .and_then(|next| next.words().first())
                        .and_then(|w| w.start)
                };
                let end = next_start
                    .map(|t| adjust(t, self.offset))
                    .filter(|t| *t > start)
                    .unwrap_or_else(|| adjust(raw_end, self.offset));

                timeline.tokens.push(TimedToken {
                    text: text.to_string(),
                    start,
                    end: enforce_min_duration(start, end, self.frame_duration),
                    segment_index: i,
                    token_index: j,
                });
            }
        }

        timeline
    }

    fn build_sentences(&self, segments: &[RawSegment]) -> Timeline {
        let mut timeline = Timeline::default();

        for (i, segment) in segments.iter().enumerate() {
            let text = segment.text.trim();
            if text.is_empty() {
                timeline.skipped_segments += 1;
                continue;
            }
            let (Some(raw_start), Some(raw_end)) = (segment.start, segment.end) else {
                tracing::debug!(segment = i, "Skipping sentence without times");
                timeline.skipped_tokens += 1;
                continue;
            };
            if raw_end <= raw_start {
                tracing::debug!(segment = i, raw_start, raw_end, "Skipping empty sentence interval");
                timeline.skipped_tokens += 1;
                continue;
            }

            let start = adjust(raw_start, self.offset);
            let end = adjust(raw_end, self.offset);
            timeline.tokens.push(TimedToken {
                text: text.to_string(),
                start,
                end: enforce_min_duration(start, end, self.frame_duration),
                segment_index: i,
                token_index: 0,
            });
        }

        timeline
    }
}
