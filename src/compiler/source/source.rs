//! Represents the contents of a unit of source code.

use super::{Position, Span};

/// The complete text of one compilation unit along with an index of where
/// each line begins, so that spans can be turned back into source text.
#[derive(Debug, Clone, PartialEq)]
pub struct Source {
    text: String,

    /// Byte offset of the first character of every line
    line_starts: Vec<usize>,
}

impl Source {
    pub fn new(text: &str) -> Source {
        let mut line_starts = vec![0];
        for (idx, c) in text.char_indices() {
            if c == '\n' {
                line_starts.push(idx + 1);
            }
        }

        Source {
            text: text.into(),
            line_starts,
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }

    /// Returns the text of the given zero based line without its line break.
    pub fn line(&self, line: u32) -> Option<&str> {
        let line = line as usize;
        let start = *self.line_starts.get(line)?;
        let end = self
            .line_starts
            .get(line + 1)
            .map(|next| next - 1)
            .unwrap_or_else(|| self.text.len());
        self.text.get(start..end).map(|l| l.trim_end_matches('\r'))
    }

    /// Returns the source text covered by `span`.  A span which crosses line
    /// boundaries is cut off at the end of its first line.
    pub fn snippet(&self, span: Span) -> Option<String> {
        let line = self.line(span.from().line)?;
        let start = span.from().column as usize;
        let end = if span.to().line == span.from().line {
            span.to().column as usize
        } else {
            line.chars().count()
        };

        if start > end {
            return None;
        }

        Some(line.chars().skip(start).take(end - start).collect())
    }

    /// Returns the position just past the last character of the text.
    pub fn end(&self) -> Position {
        let last = self.line_starts.len() - 1;
        let column = self.text[self.line_starts[last]..].chars().count();
        Position::new(last as u32, column as u32)
    }
}
