//! Reconciles a word-timed transcript with a sentence-texted one.

mod retime;

pub use retime::retime;

use subburn_transcript::{RawSegment, RawWord};

#[derive(Debug, thiserror::Error)]
pub enum DataFusionError {
    #[error("word-level transcript is missing or has no segments")]
    MissingWordTranscript,
    #[error("sentence-level transcript is missing or has no segments")]
    MissingSentenceTranscript,
}

pub type Result<T> = std::result::Result<T, DataFusionError>;

/// Hybrid segments plus how much of either side went unpaired.
#[derive(Debug, Clone, Default)]
pub struct Fusion {
    pub segments: Vec<RawSegment>,
    /// Sentence words left without timing once the word timings ran out.
    pub dropped_words: usize,
    /// Word timings never claimed by a sentence word.
    pub unused_timings: usize,
}

impl Fusion {
    pub fn word_count(&self) -> usize {
        self.segments.iter().map(|s| s.words().len()).sum()
    }

    pub fn is_complete(&self) -> bool {
        self.dropped_words == 0 && self.unused_timings == 0
    }
}

/// Pair sentence words with word timings positionally.
///
/// Each sentence keeps its own text and bounds; its words borrow `start`/`end`
/// from the next unconsumed word of `word_segments`. Text is never re-matched.
/// When the timings run out the remaining sentence words are dropped.
pub fn fuse(word_segments: &[RawSegment], sentence_segments: &[RawSegment]) -> Result<Fusion> {
    if word_segments.is_empty() {
        return Err(DataFusionError::MissingWordTranscript);
    }
    if sentence_segments.is_empty() {
        return Err(DataFusionError::MissingSentenceTranscript);
    }

    let timings: Vec<&RawWord> = word_segments.iter().flat_map(|s| s.words()).collect();
    let mut timings = timings.into_iter();

    let mut fusion = Fusion::default();
    for sentence in sentence_segments {
        let mut words = Vec::new();
        for text in sentence.text.split_whitespace() {
            match timings.next() {
                Some(timing) => words.push(RawWord {
                    text: text.to_string(),
                    start: timing.start,
                    end: timing.end,
                }),
                None => fusion.dropped_words += 1,
            }
        }

        fusion.segments.push(RawSegment {
            text: sentence.text.clone(),
            start: sentence.start,
            end: sentence.end,
            words: Some(words),
            words_error: false,
        });
    }
    fusion.unused_timings = timings.len();

    if fusion.dropped_words > 0 {
        tracing::warn!(
            dropped = fusion.dropped_words,
            "Word timings exhausted; trailing sentence words will not be rendered"
        );
    }
    if fusion.unused_timings > 0 {
        tracing::warn!(
            unused = fusion.unused_timings,
            "Sentence transcript has fewer words than the word transcript"
        );
    }
    tracing::debug!(
        sentences = fusion.segments.len(),
        words = fusion.word_count(),
        "fusion_complete"
    );

    Ok(fusion)
}
