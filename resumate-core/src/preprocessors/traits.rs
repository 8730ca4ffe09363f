// Preprocessor abstraction for resume ingestion
//
// This module defines the boundary between file decoding (bytes -> text)
// and resume parsing (text -> StructuredResume). Everything after this
// point works with plain text and is format-agnostic.

use anyhow::{Context, Result};
use std::path::Path;

/// Preprocessor trait - converts uploaded file bytes to raw document text
pub trait Preprocessor {
    /// Decode the bytes into the text the rule engine parses.
    ///
    /// Paginated formats must return pages in order, each followed by a
    /// blank line.
    fn extract_text(&self, bytes: &[u8]) -> Result<String>;

    /// Convenience method: Process from file path
    fn process_file(&self, input: &Path) -> Result<String> {
        let bytes = std::fs::read(input)
            .with_context(|| format!("reading {}", input.display()))?;
        self.extract_text(&bytes)
    }

    /// Get preprocessor name for debugging/logging
    fn name(&self) -> &str;

    /// Check if preprocessor supports the given file type
    fn supports_file_type(&self, path: &Path) -> bool;
}
