//! `pdf-extract` backend
//!
//! Pure Rust extraction, no runtime to install. The crate decodes the whole
//! document up front, so every failure surfaces from `open`.

use super::{PageSource, PdfBackend};
use anyhow::{anyhow, Result};
use tracing::debug;

#[derive(Debug, Default)]
pub struct PdfExtractBackend;

impl PdfExtractBackend {
    pub fn new() -> Self {
        Self
    }
}

impl PdfBackend for PdfExtractBackend {
    fn open(&self, pdf_bytes: &[u8]) -> Result<Box<dyn PageSource>> {
        let pages = ::pdf_extract::extract_text_from_mem_by_pages(pdf_bytes)
            .map_err(|e| anyhow!("pdf-extract could not read document: {e}"))?;
        debug!("pdf-extract decoded {} pages", pages.len());
        Ok(Box::new(ExtractedPages { pages }))
    }

    fn name(&self) -> &str {
        "pdf-extract"
    }
}

struct ExtractedPages {
    pages: Vec<String>,
}

impl PageSource for ExtractedPages {
    fn page_count(&self) -> usize {
        self.pages.len()
    }

    fn page_text(&mut self, index: usize) -> Result<String> {
        self.pages
            .get(index)
            .cloned()
            .ok_or_else(|| anyhow!("page index {index} out of range"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_garbage_bytes_fail_to_open() {
        assert!(PdfExtractBackend::new().open(b"definitely not a pdf").is_err());
    }
}
