//! Read-only document snapshots handed to validators.

use std::sync::OnceLock;

use crate::position::{LineIndex, Position, Range};

/// Dialect identifier of correlation rules, the primary rule dialect.
pub const CORRELATION: &str = "co";
/// Dialect identifier of enrichment rules.
pub const ENRICHMENT: &str = "en";
/// Dialect identifier of normalization formulas.
pub const NORMALIZATION: &str = "xp";

/// Map a file extension to its dialect identifier.
pub fn language_for_extension(ext: &str) -> Option<&'static str> {
    match ext {
        "co" => Some(CORRELATION),
        "en" => Some(ENRICHMENT),
        "xp" => Some(NORMALIZATION),
        _ => None,
    }
}

/// A snapshot of one open document.
///
/// The line index is built on first use and lives as long as the snapshot, so
/// every validator in a pass shares it.
#[derive(Debug)]
pub struct TextDocument {
    uri: String,
    language_id: String,
    version: i32,
    text: String,
    index: OnceLock<LineIndex>,
}

impl TextDocument {
    pub fn new(
        uri: impl Into<String>,
        language_id: impl Into<String>,
        version: i32,
        text: impl Into<String>,
    ) -> Self {
        Self {
            uri: uri.into(),
            language_id: language_id.into(),
            version,
            text: text.into(),
            index: OnceLock::new(),
        }
    }

    pub fn uri(&self) -> &str {
        &self.uri
    }

    pub fn language_id(&self) -> &str {
        &self.language_id
    }

    pub fn version(&self) -> i32 {
        self.version
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    /// Convert a byte offset into a line/character position.
    pub fn position_at(&self, offset: usize) -> Position {
        self.line_index().position_of(&self.text, offset)
    }

    /// Convert a byte span into a range.
    pub fn range_at(&self, span: std::ops::Range<usize>) -> Range {
        self.line_index().range_of(&self.text, span)
    }

    /// Same URI and dialect, new content.
    pub fn with_text(&self, version: i32, text: impl Into<String>) -> Self {
        Self::new(self.uri.clone(), self.language_id.clone(), version, text)
    }

    fn line_index(&self) -> &LineIndex {
        self.index.get_or_init(|| LineIndex::new(&self.text))
    }
}

impl Clone for TextDocument {
    fn clone(&self) -> Self {
        Self::new(
            self.uri.clone(),
            self.language_id.clone(),
            self.version,
            self.text.clone(),
        )
    }
}
