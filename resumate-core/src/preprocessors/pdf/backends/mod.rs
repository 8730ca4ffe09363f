//! PDF Backend traits
//!
//! Defines the interface every page-text extraction backend implements.
//! The preprocessor only needs two things from a backend: how many pages
//! a document has and the flattened text of page `i`.

use anyhow::Result;

/// An opened paginated document.
pub trait PageSource {
    /// Number of pages in the document
    fn page_count(&self) -> usize;

    /// Flattened text of the page at `index` (0-based)
    fn page_text(&mut self, index: usize) -> Result<String>;
}

/// Backend trait for PDF extraction
pub trait PdfBackend: Send + Sync {
    /// Open the document bytes. Fails on corrupt or unsupported input.
    fn open(&self, pdf_bytes: &[u8]) -> Result<Box<dyn PageSource>>;

    /// Backend identifier for logging/debugging
    fn name(&self) -> &str;
}

// Re-export backends
#[cfg(feature = "pdf-backend")]
pub mod pdf_extract;

#[cfg(feature = "pdf-backend")]
pub use self::pdf_extract::PdfExtractBackend;
