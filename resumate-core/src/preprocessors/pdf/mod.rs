//! PDF Preprocessor
//!
//! Main preprocessor for paginated documents. Uses pluggable backends to
//! read page text, then stitches pages together for the rule engine.

pub mod backends;

use crate::preprocessors::traits::Preprocessor;
use anyhow::{Context, Result};
use std::path::Path;
use tracing::debug;

pub use backends::{PageSource, PdfBackend};

#[cfg(feature = "pdf-backend")]
pub use backends::PdfExtractBackend;

/// Separator appended after every page, so page breaks read as paragraph breaks.
pub const PAGE_SEPARATOR: &str = "\n\n";

/// Backend enum for runtime backend selection
pub enum PdfBackendImpl {
    #[cfg(feature = "pdf-backend")]
    PdfExtract(PdfExtractBackend),
    /// Caller-supplied backend (alternative extractors, test doubles)
    Custom(Box<dyn PdfBackend>),
}

impl PdfBackend for PdfBackendImpl {
    fn open(&self, pdf_bytes: &[u8]) -> Result<Box<dyn PageSource>> {
        match self {
            #[cfg(feature = "pdf-backend")]
            PdfBackendImpl::PdfExtract(backend) => backend.open(pdf_bytes),
            PdfBackendImpl::Custom(backend) => backend.open(pdf_bytes),
        }
    }

    fn name(&self) -> &str {
        match self {
            #[cfg(feature = "pdf-backend")]
            PdfBackendImpl::PdfExtract(backend) => backend.name(),
            PdfBackendImpl::Custom(backend) => backend.name(),
        }
    }
}

/// PDF Preprocessor with pluggable backend
///
/// Pages are read strictly in order, one at a time; page N+1 is not
/// requested before page N's text is in hand. The first failing page
/// aborts the whole extraction.
pub struct PdfPreprocessor {
    backend: PdfBackendImpl,
}

impl PdfPreprocessor {
    /// Create PdfPreprocessor with the pdf-extract backend
    #[cfg(feature = "pdf-backend")]
    pub fn new_with_pdf_extract() -> Self {
        Self {
            backend: PdfBackendImpl::PdfExtract(PdfExtractBackend::new()),
        }
    }

    /// Create PdfPreprocessor with any backend
    pub fn new_with_backend(backend: Box<dyn PdfBackend>) -> Self {
        Self {
            backend: PdfBackendImpl::Custom(backend),
        }
    }

    /// Get the backend name for logging
    pub fn backend_name(&self) -> &str {
        self.backend.name()
    }
}

impl Preprocessor for PdfPreprocessor {
    fn extract_text(&self, bytes: &[u8]) -> Result<String> {
        let mut pages = self
            .backend
            .open(bytes)
            .with_context(|| format!("{} failed to open document", self.backend.name()))?;

        let page_count = pages.page_count();
        let mut full_text = String::new();
        for index in 0..page_count {
            let text = pages
                .page_text(index)
                .with_context(|| format!("extracting page {} of {}", index + 1, page_count))?;
            debug!("page {}/{}: {} chars", index + 1, page_count, text.len());
            full_text.push_str(&text);
            full_text.push_str(PAGE_SEPARATOR);
        }
        Ok(full_text)
    }

    fn name(&self) -> &str {
        "PdfPreprocessor"
    }

    fn supports_file_type(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"))
    }
}
