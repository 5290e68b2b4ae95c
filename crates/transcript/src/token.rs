use serde::{Deserialize, Serialize};

const MAX_LAYER_NAME_WORD_LENGTH: usize = 15;

/// A word or sentence with resolved on-screen interval, in seconds.
///
/// `start >= 0` and `end > start` hold for every token a builder emits.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimedToken {
    pub text: String,
    pub start: f64,
    pub end: f64,
    pub segment_index: usize,
    pub token_index: usize,
}

impl TimedToken {
    pub fn duration(&self) -> f64 {
        self.end - self.start
    }

    /// Node name the renderer gives this token: `W_<segment><token><text>`,
    /// with the text reduced to ASCII alphanumerics and underscores.
    pub fn layer_name(&self) -> String {
        let safe: String = self
            .text
            .chars()
            .filter(|c| c.is_ascii_alphanumeric() || *c == '_')
            .take(MAX_LAYER_NAME_WORD_LENGTH)
            .collect();
        format!("W_{}{}{}", self.segment_index, self.token_index, safe)
    }
}
