//! Byte offset → line/character mapping for rule source text.
//!
//! Validators work on byte offsets produced by `regex`; the editor protocol
//! wants zero-based lines and UTF-16 code unit columns. [`LineIndex`] bridges
//! the two.

use serde::Serialize;

/// A zero-based line/character position. `character` counts UTF-16 code units.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Position {
    pub line: u32,
    pub character: u32,
}

impl Position {
    pub const fn new(line: u32, character: u32) -> Self {
        Self { line, character }
    }
}

/// A half-open range between two positions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }
}

/// A pre-computed line index for fast offset → line/col lookups.
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset of the start of each line.
    line_starts: Vec<usize>,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0usize];
        for (i, b) in text.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    /// Convert a byte offset in `text` to a [`Position`].
    ///
    /// `text` must be the string this index was built from. Offsets past the
    /// end clamp to the end; offsets inside a multi-byte character round down
    /// to the character start.
    pub fn position_of(&self, text: &str, offset: usize) -> Position {
        let mut offset = offset.min(text.len());
        while !text.is_char_boundary(offset) {
            offset -= 1;
        }

        let line = self
            .line_starts
            .partition_point(|&start| start <= offset)
            .saturating_sub(1);
        let line_start = self.line_starts[line];
        let character: usize = text[line_start..offset]
            .chars()
            .map(char::len_utf16)
            .sum();
        Position::new(line as u32, character as u32)
    }

    /// Convert a byte span to a [`Range`].
    pub fn range_of(&self, text: &str, span: std::ops::Range<usize>) -> Range {
        Range::new(
            self.position_of(text, span.start),
            self.position_of(text, span.end),
        )
    }
}
