//! Word-by-word reveal of a received answer.
//!
//! [`WordReveal`] owns the full answer and exposes a growing prefix of it.
//! The prefix always ends on a word boundary of the original text, so the
//! original spacing and line breaks show up unchanged while revealing.

/// Progressive disclosure of an already received answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WordReveal {
    /// The complete answer text.
    text: String,
    /// Byte offset of the end of each word in `text`.
    word_ends: Vec<usize>,
    /// Number of words revealed so far.
    revealed: usize,
}

impl WordReveal {
    /// Split `text` into whitespace-separated words.
    pub fn new(text: impl Into<String>) -> Self {
        let text = text.into();
        let word_ends = word_ends(&text);
        Self {
            text,
            word_ends,
            revealed: 0,
        }
    }

    /// Total number of words.
    pub fn word_count(&self) -> usize {
        self.word_ends.len()
    }

    /// Number of words revealed so far.
    pub fn revealed_words(&self) -> usize {
        self.revealed
    }

    /// Reveal up to `words` more words (at least one).
    ///
    /// Returns `true` once every word has been revealed.
    pub fn advance(&mut self, words: usize) -> bool {
        self.revealed = self
            .revealed
            .saturating_add(words.max(1))
            .min(self.word_ends.len());
        self.is_complete()
    }

    /// Whether every word has been revealed.
    pub fn is_complete(&self) -> bool {
        self.revealed >= self.word_ends.len()
    }

    /// The revealed prefix of the answer.
    pub fn buffer(&self) -> &str {
        match self.revealed.checked_sub(1) {
            Some(last) => &self.text[..self.word_ends[last]],
            None => "",
        }
    }

    /// The complete answer text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Consume the reveal, returning the complete answer text.
    pub fn into_text(self) -> String {
        self.text
    }
}

fn word_ends(text: &str) -> Vec<usize> {
    let mut ends = Vec::new();
    let mut in_word = false;
    for (idx, ch) in text.char_indices() {
        if ch.is_whitespace() {
            if in_word {
                ends.push(idx);
                in_word = false;
            }
        } else {
            in_word = true;
        }
    }
    if in_word {
        ends.push(text.len());
    }
    ends
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_word_count_ignores_extra_whitespace() {
        let reveal = WordReveal::new("  Deep   dish\npizza  ");
        assert_eq!(reveal.word_count(), 3);
        assert_eq!(WordReveal::new("   ").word_count(), 0);
        assert_eq!(WordReveal::new("").word_count(), 0);
    }

    #[test]
    fn test_buffer_is_prefix_ending_on_word() {
        let mut reveal = WordReveal::new("Deep dish,\n  with  sausage.");
        assert_eq!(reveal.buffer(), "");

        assert!(!reveal.advance(1));
        assert_eq!(reveal.buffer(), "Deep");

        assert!(!reveal.advance(2));
        assert_eq!(reveal.buffer(), "Deep dish,\n  with");

        assert!(reveal.advance(4));
        assert_eq!(reveal.buffer(), "Deep dish,\n  with  sausage.");
        assert!(reveal.is_complete());
    }

    #[test]
    fn test_advance_zero_still_progresses() {
        let mut reveal = WordReveal::new("one two");
        reveal.advance(0);
        assert_eq!(reveal.revealed_words(), 1);
    }

    #[test]
    fn test_huge_advance_saturates() {
        let mut reveal = WordReveal::new("a b c");
        assert!(!reveal.advance(1));
        assert!(reveal.advance(usize::MAX));
        assert_eq!(reveal.revealed_words(), 3);
        assert_eq!(reveal.buffer(), "a b c");
    }

    #[test]
    fn test_multibyte_words() {
        let mut reveal = WordReveal::new("café crème brûlée");
        reveal.advance(2);
        assert_eq!(reveal.buffer(), "café crème");
        assert!(reveal.text().starts_with(reveal.buffer()));
    }

    #[test]
    fn test_every_intermediate_buffer_is_strict_prefix() {
        let text = "Chicago style deep dish is baked in a pan";
        let mut reveal = WordReveal::new(text);
        while !reveal.advance(1) {
            assert!(text.starts_with(reveal.buffer()));
            assert!(reveal.buffer().len() < text.len());
        }
        assert_eq!(reveal.into_text(), text);
    }
}
