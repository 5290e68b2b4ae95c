//! Time arithmetic shared by the timeline stages. All values are seconds.

use subburn_transcript::MIN_DURATION_FALLBACK;

/// Latency correction for `offset_frames` frames.
///
/// An unknown frame duration (`<= 0` or non-finite) disables the correction.
pub fn quantize_offset(frame_duration: f64, offset_frames: f64) -> f64 {
    if known_frame(frame_duration) {
        offset_frames * frame_duration
    } else {
        0.0
    }
}

fn known_frame(frame_duration: f64) -> bool {
    frame_duration.is_finite() && frame_duration > 0.0
}

/// Shift a raw service timestamp back by `offset`, clamped at zero.
pub fn adjust(raw_time: f64, offset: f64) -> f64 {
    (raw_time - offset).max(0.0)
}

/// Ensure `end` lies strictly after `start` by at least one frame.
pub fn enforce_min_duration(start: f64, end: f64, frame_duration: f64) -> f64 {
    if end > start {
        return end;
    }
    if known_frame(frame_duration) {
        start + frame_duration
    } else {
        start + MIN_DURATION_FALLBACK
    }
}
