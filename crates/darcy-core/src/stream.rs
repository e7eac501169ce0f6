//! Line stream for the block-oriented reader.
//!
//! The input format is line-structured: every construct starts at a line
//! boundary and the block reader frequently peeks at a line, decides which
//! parameter it belongs to, and rewinds so the parameter's own loader can
//! consume it from the start. [`LineStream`] supports exactly that: cheap
//! lookahead, positional rewind, and blank/comment skipping.

use crate::error::{Error, Result};

/// Line stream with lookahead and position tracking.
///
/// Holds the whole source and exposes a cursor over its lines. Positions
/// are plain line indices, so a saved position can be rewound to at any
/// time (the original `tell`/`seek` idiom).
pub struct LineStream<'src> {
    lines: Vec<&'src str>,
    pos: usize,
}

impl<'src> LineStream<'src> {
    /// Create a line stream over the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            lines: source.lines().collect(),
            pos: 0,
        }
    }

    /// Peek at the current line without consuming it.
    pub fn peek(&self) -> Option<&'src str> {
        self.lines.get(self.pos).copied()
    }

    /// Advance to the next line and return the current one.
    pub fn advance(&mut self) -> Option<&'src str> {
        let line = self.lines.get(self.pos).copied();
        if line.is_some() {
            self.pos += 1;
        }
        line
    }

    /// Get the current position.
    pub fn pos(&self) -> usize {
        self.pos
    }

    /// Rewind to a previously saved position.
    pub fn rewind(&mut self, pos: usize) {
        self.pos = pos.min(self.lines.len());
    }

    /// Check if the stream is exhausted.
    pub fn at_end(&self) -> bool {
        self.pos >= self.lines.len()
    }

    /// Advance past blank and comment lines to the next content line.
    ///
    /// Returns the position of the returned line so the caller can rewind
    /// to it.
    pub fn next_content(&mut self) -> Option<(usize, &'src str)> {
        while let Some(line) = self.peek() {
            if is_content(line) {
                let pos = self.pos;
                self.pos += 1;
                return Some((pos, line));
            }
            self.pos += 1;
        }
        None
    }

    /// Like [`next_content`](Self::next_content) but premature end of
    /// stream is an error naming what was being read.
    pub fn expect_content(&mut self, context: &str) -> Result<(usize, &'src str)> {
        self.next_content()
            .ok_or_else(|| Error::Eof(context.to_string()))
    }
}

/// Check whether a line carries content (not blank, not a `#` comment).
pub fn is_content(line: &str) -> bool {
    let trimmed = line.trim_start();
    !trimmed.is_empty() && !trimmed.starts_with('#')
}

/// Split a line into whitespace-delimited tokens.
pub fn words(line: &str) -> Vec<&str> {
    line.split_whitespace().collect()
}

/// Split a line into at most `n` tokens: `n - 1` whitespace-delimited
/// tokens followed by the trimmed remainder of the line as one token.
///
/// Used for layouts whose trailing column swallows the rest of the line.
pub fn words_maxsplit(line: &str, n: usize) -> Vec<&str> {
    if n == 0 {
        return Vec::new();
    }
    let mut out = Vec::with_capacity(n);
    let mut rest = line.trim();
    while out.len() + 1 < n && !rest.is_empty() {
        match rest.find(char::is_whitespace) {
            Some(cut) => {
                out.push(&rest[..cut]);
                rest = rest[cut..].trim_start();
            }
            None => {
                out.push(rest);
                rest = "";
            }
        }
    }
    if !rest.is_empty() {
        out.push(rest);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_peek_and_advance() {
        let mut s = LineStream::new("one\ntwo\n");
        assert_eq!(s.peek(), Some("one"));
        assert_eq!(s.advance(), Some("one"));
        assert_eq!(s.advance(), Some("two"));
        assert_eq!(s.advance(), None);
        assert!(s.at_end());
    }

    #[test]
    fn test_rewind() {
        let mut s = LineStream::new("a\nb\nc\n");
        let pos = s.pos();
        s.advance();
        s.advance();
        s.rewind(pos);
        assert_eq!(s.peek(), Some("a"));
    }

    #[test]
    fn test_next_content_skips_blanks_and_comments() {
        let mut s = LineStream::new("\n# header\n  \nBEGIN OPTIONS\n");
        let (pos, line) = s.next_content().unwrap();
        assert_eq!(pos, 3);
        assert_eq!(line, "BEGIN OPTIONS");
    }

    #[test]
    fn test_expect_content_eof() {
        let mut s = LineStream::new("\n\n");
        let err = s.expect_content("block body").unwrap_err();
        assert!(matches!(err, Error::Eof(_)));
    }

    #[test]
    fn test_words_maxsplit() {
        assert_eq!(words_maxsplit("1 2 3 four five", 4), vec!["1", "2", "3", "four five"]);
        assert_eq!(words_maxsplit("1 2", 4), vec!["1", "2"]);
    }
}
