//! Rolling type-ahead buffer.

use std::time::{Duration, Instant};

/// Keystrokes further apart than this start a fresh search
pub(crate) const SEARCH_TIMEOUT: Duration = Duration::from_millis(1500);

/// Accumulates printable keystrokes into a lowercase search prefix.
#[derive(Debug, Default)]
pub(crate) struct SearchBuffer {
    text: String,
    last_keystroke: Option<Instant>,
}

impl SearchBuffer {
    /// Append a keystroke and return the current prefix.
    ///
    /// A stale buffer is cleared first. A buffer made of one repeated
    /// character collapses to that character, so hammering the same key
    /// cycles through members sharing an initial instead of demanding an
    /// ever-longer prefix.
    pub(crate) fn push(&mut self, ch: char, now: Instant) -> &str {
        if let Some(last) = self.last_keystroke {
            if now.duration_since(last) > SEARCH_TIMEOUT {
                self.text.clear();
            }
        }
        self.last_keystroke = Some(now);
        for lower in ch.to_lowercase() {
            self.text.push(lower);
        }
        if self.text.chars().count() > 1 {
            let mut chars = self.text.chars();
            let first = chars.next().unwrap_or_default();
            if chars.all(|c| c == first) {
                self.text = first.to_string();
            }
        }
        &self.text
    }

    pub(crate) fn clear(&mut self) {
        self.text.clear();
        self.last_keystroke = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_buffer_accumulates() {
        let mut buffer = SearchBuffer::default();
        let start = Instant::now();
        assert_eq!(buffer.push('G', start), "g");
        assert_eq!(buffer.push('r', start + Duration::from_millis(200)), "gr");
    }

    #[test]
    fn test_stale_buffer_resets() {
        let mut buffer = SearchBuffer::default();
        let start = Instant::now();
        buffer.push('g', start);
        assert_eq!(buffer.push('r', start + Duration::from_millis(1600)), "r");
    }

    #[test]
    fn test_repeated_char_collapses() {
        let mut buffer = SearchBuffer::default();
        let start = Instant::now();
        buffer.push('a', start);
        assert_eq!(buffer.push('a', start + Duration::from_millis(100)), "a");
        assert_eq!(buffer.push('a', start + Duration::from_millis(200)), "a");
    }

    #[test]
    fn test_distinct_chars_keep_accumulating() {
        let mut buffer = SearchBuffer::default();
        let start = Instant::now();
        buffer.push('a', start);
        buffer.push('a', start + Duration::from_millis(100));
        assert_eq!(buffer.push('v', start + Duration::from_millis(200)), "av");
    }
}
