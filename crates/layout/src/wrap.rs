//! Greedy line wrapping.
//!
//! Always sweeps the tokens in timeline order; visual direction only
//! matters once lines are placed.

use subburn_transcript::TimedToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WrapLimits {
    pub max_chars: usize,
    pub max_words: usize,
}

impl WrapLimits {
    pub fn new(max_chars: usize, max_words: usize) -> Self {
        Self {
            max_chars,
            max_words,
        }
    }
}

/// A run of consecutive tokens shown together. Borrows the tokens.
#[derive(Debug, Clone, PartialEq)]
pub struct Line<'a> {
    pub tokens: Vec<&'a TimedToken>,
    /// Characters on the line, counting one separator between words.
    pub char_count: usize,
}

impl Line<'_> {
    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn text(&self) -> String {
        self.tokens
            .iter()
            .map(|t| t.text.trim())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// Word and character counts of the line being filled.
#[derive(Debug)]
struct LineCounter {
    limits: WrapLimits,
    words: usize,
    chars: usize,
}

impl LineCounter {
    fn new(limits: WrapLimits) -> Self {
        Self {
            limits,
            words: 0,
            chars: 0,
        }
    }

    /// Account for a word of `len` characters. Returns true when the word
    /// has to open a new line. The first word of a line is always admitted.
    fn place(&mut self, len: usize) -> bool {
        let breaks = self.words > 0
            && (self.words + 1 > self.limits.max_words
                || self.chars + 1 + len > self.limits.max_chars);
        if breaks || self.words == 0 {
            self.words = 1;
            self.chars = len;
        } else {
            self.words += 1;
            self.chars += 1 + len;
        }
        breaks
    }
}

/// Group `(item, char_len)` pairs into lines. Items with zero length are skipped.
pub(crate) fn greedy_wrap<T>(
    items: impl IntoIterator<Item = (T, usize)>,
    limits: WrapLimits,
) -> Vec<(Vec<T>, usize)> {
    let mut counter = LineCounter::new(limits);
    let mut lines = Vec::new();
    let mut current = Vec::new();
    let mut current_chars = 0;

    for (item, len) in items {
        if len == 0 {
            continue;
        }
        if counter.place(len) {
            lines.push((std::mem::take(&mut current), current_chars));
        }
        current.push(item);
        current_chars = counter.chars;
    }
    if !current.is_empty() {
        lines.push((current, current_chars));
    }

    lines
}

/// Greedily group tokens into lines bounded by `max_chars` and `max_words`.
///
/// Limits bound growth, not admission: an over-long token still gets a line
/// of its own. Tokens whose trimmed text is empty are skipped.
pub fn wrap_lines(tokens: &[TimedToken], max_chars: usize, max_words: usize) -> Vec<Line<'_>> {
    let limits = WrapLimits::new(max_chars, max_words);
    let items = tokens.iter().map(|t| (t, t.text.trim().chars().count()));

    let lines: Vec<Line<'_>> = greedy_wrap(items, limits)
        .into_iter()
        .map(|(tokens, char_count)| Line { tokens, char_count })
        .collect();

    tracing::debug!(
        tokens = tokens.len(),
        lines = lines.len(),
        max_chars,
        max_words,
        "lines_wrapped"
    );
    lines
}
