use crate::preprocessors::traits::Preprocessor;
use anyhow::Result;
use std::path::Path;

/// Plain-text files, and the catch-all for any extension without a
/// dedicated preprocessor. Invalid UTF-8 sequences become U+FFFD.
#[derive(Debug, Default)]
pub struct PlainTextPreprocessor;

impl PlainTextPreprocessor {
    pub fn new() -> Self {
        Self
    }
}

impl Preprocessor for PlainTextPreprocessor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String> {
        Ok(String::from_utf8_lossy(bytes).into_owned())
    }

    fn name(&self) -> &str {
        "PlainTextPreprocessor"
    }

    fn supports_file_type(&self, _path: &Path) -> bool {
        true
    }
}
