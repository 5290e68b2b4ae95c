//! Integration tests for timeline reconstruction from service JSON.

use subburn_timeline::{build_timeline, TimelineBuilder, TimelineError};
use subburn_transcript::{Config, RawSegment, RawWord, TranscriptResponse, TranscriptionLevel};

fn config_30fps() -> Config {
    Config {
        frame_duration: 1.0 / 30.0,
        ..Config::default()
    }
}

fn parse(body: &str) -> TranscriptResponse {
    TranscriptResponse::parse(body).expect("fixture should parse")
}

const TWO_SEGMENTS: &str = r#"{
    "language": "en",
    "segments": [
        { "start": 0.0, "end": 1.2, "text": "The quick brown",
          "words": [ { "word": "The", "start": 0.05, "end": 0.2 },
                     { "word": "quick", "start": 0.25, "end": 0.6 },
                     { "word": "brown", "start": 0.6, "end": 1.2 } ] },
        { "start": 1.5, "end": 2.6, "text": "fox jumps.",
          "words": [ { "word": "fox", "start": 1.5, "end": 1.9 },
                     { "word": "jumps.", "start": 1.95, "end": 2.6 } ] }
    ]
}"#;

// =============================================================================
// Invariants
// =============================================================================

mod invariants {
    use super::*;

    #[test]
    fn test_tokens_have_positive_duration() {
        let response = parse(TWO_SEGMENTS);
        let timeline = build_timeline(&response.segments, TranscriptionLevel::Word, &config_30fps())
            .unwrap();

        assert_eq!(timeline.tokens.len(), 5);
        for token in &timeline.tokens {
            assert!(token.start >= 0.0, "start must be non-negative: {token:?}");
            assert!(token.end > token.start, "end must follow start: {token:?}");
        }
    }

    #[test]
    fn test_order_is_segment_then_word() {
        let response = parse(TWO_SEGMENTS);
        let timeline = build_timeline(&response.segments, TranscriptionLevel::Word, &config_30fps())
            .unwrap();

        let order: Vec<(usize, usize)> = timeline
            .tokens
            .iter()
            .map(|t| (t.segment_index, t.token_index))
            .collect();
        assert_eq!(order, vec![(0, 0), (0, 1), (0, 2), (1, 0), (1, 1)]);
        assert!(timeline.tokens.windows(2).all(|w| w[0].start <= w[1].start));
    }

    #[test]
    fn test_segment_boundary_is_gapless() {
        let response = parse(TWO_SEGMENTS);
        let timeline = build_timeline(&response.segments, TranscriptionLevel::Word, &config_30fps())
            .unwrap();

        let brown = &timeline.tokens[2];
        let fox = &timeline.tokens[3];
        assert_eq!(brown.end, fox.start);
        assert_eq!(timeline.tokens[4].text, "jumps");
    }

    #[test]
    fn test_unknown_frame_duration_disables_offset() {
        let config = Config {
            frame_duration: 0.0,
            ..Config::default()
        };
        let response = parse(TWO_SEGMENTS);
        let timeline = build_timeline(&response.segments, TranscriptionLevel::Word, &config).unwrap();
        assert_eq!(timeline.tokens[0].start, 0.05);
    }
}

// =============================================================================
// Recovered defects
// =============================================================================

mod defects {
    use super::*;

    #[test]
    fn test_all_segments_without_alignment() {
        let segments: Vec<RawSegment> = (0..4)
            .map(|i| RawSegment {
                words_error: true,
                ..RawSegment::new(format!("segment {i}"), i as f64, i as f64 + 1.0)
            })
            .collect();

        let timeline = build_timeline(&segments, TranscriptionLevel::Word, &config_30fps()).unwrap();
        assert!(timeline.tokens.is_empty());
        assert_eq!(timeline.skipped_segments, 4);
    }

    #[test]
    fn test_erroneous_segment_still_yields_sentence() {
        let segment = RawSegment {
            words_error: true,
            ..RawSegment::new("Still readable.", 1.0, 2.0)
        };
        let timeline =
            build_timeline(&[segment], TranscriptionLevel::Sentence, &config_30fps()).unwrap();
        assert_eq!(timeline.tokens.len(), 1);
        assert_eq!(timeline.tokens[0].text, "Still readable.");
    }

    #[test]
    fn test_next_segment_first_word_used_even_when_flagged() {
        let segments = vec![
            RawSegment::new("a", 0.0, 1.0).with_words(vec![RawWord::new("a", 0.0, 0.5)]),
            RawSegment {
                words_error: true,
                ..RawSegment::new("b", 3.0, 4.0).with_words(vec![RawWord::new("b", 3.0, 3.5)])
            },
        ];
        let config = Config {
            frame_duration: 0.0,
            ..Config::default()
        };
        let timeline = build_timeline(&segments, TranscriptionLevel::Word, &config).unwrap();
        assert_eq!(timeline.tokens.len(), 1);
        assert_eq!(timeline.tokens[0].end, 3.0);
        assert_eq!(timeline.skipped_segments, 1);
    }

    #[test]
    fn test_invalid_config_is_rejected() {
        let config = Config {
            max_chars_per_line: 0,
            ..Config::default()
        };
        let result = build_timeline(&[], TranscriptionLevel::Word, &config);
        assert!(matches!(result, Err(TimelineError::Config(_))));
    }

    #[test]
    fn test_infinite_frame_duration_is_rejected() {
        let config = Config {
            frame_duration: 1.0 / 1e-309,
            ..Config::default()
        };
        let result = build_timeline(&parse(TWO_SEGMENTS).segments, TranscriptionLevel::Word, &config);
        assert!(matches!(result, Err(TimelineError::Config(_))));
    }

    #[test]
    fn test_infinite_frame_duration_treated_as_unknown_by_builder() {
        let config = Config {
            frame_duration: f64::INFINITY,
            ..Config::default()
        };
        let timeline = TimelineBuilder::new(&config)
            .build(&parse(TWO_SEGMENTS).segments, TranscriptionLevel::Word);

        assert_eq!(timeline.tokens.len(), 5);
        assert_eq!(timeline.tokens[0].start, 0.05);
        for token in &timeline.tokens {
            assert!(token.end.is_finite(), "end must be finite: {token:?}");
            assert!(token.end > token.start);
        }
    }
}

// =============================================================================
// Response fallbacks
// =============================================================================

mod responses {
    use super::*;

    #[test]
    fn test_segments_win_over_full_text() {
        let response = parse(TWO_SEGMENTS);
        let timeline = TimelineBuilder::new(&config_30fps())
            .build_response(&response, TranscriptionLevel::Sentence)
            .unwrap();
        assert_eq!(timeline.tokens.len(), 2);
        assert_eq!(timeline.tokens[1].text, "fox jumps.");
    }

    #[test]
    fn test_full_text_only() {
        let response = parse(r#"{"full_text": "  all of it  ", "segments": []}"#);
        let timeline = TimelineBuilder::new(&config_30fps())
            .build_response(&response, TranscriptionLevel::Word)
            .unwrap();
        assert_eq!(timeline.tokens.len(), 1);
        assert_eq!(timeline.tokens[0].text, "all of it");
    }

    #[test]
    fn test_empty_full_text_with_error() {
        let response = parse(r#"{"full_text": "", "error": "Transcription failed: boom"}"#);
        let result = TimelineBuilder::new(&config_30fps())
            .build_response(&response, TranscriptionLevel::Word);
        assert!(matches!(result, Err(TimelineError::Service(_))));
    }
}
