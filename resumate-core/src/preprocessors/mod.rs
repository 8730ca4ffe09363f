//! Document Preprocessors
//!
//! This module turns uploaded file bytes into the raw text the rule engine
//! parses.
//!
//! ## Architecture
//!
//! ```text
//! File bytes (TXT, PDF)
//!     ↓
//! [Format-specific Preprocessor]
//!     ↓
//! Raw document text
//!     ↓
//! [RuleEngine]
//!     ↓
//! StructuredResume
//! ```
//!
//! ## Available Preprocessors
//!
//! - `PdfPreprocessor` - paginated documents through a `PdfBackend`
//! - `PlainTextPreprocessor` - everything else, decoded as UTF-8

pub mod pdf;
pub mod text;
pub mod traits;

// Re-export main types
pub use pdf::{PageSource, PdfBackend, PdfBackendImpl, PdfPreprocessor};
pub use text::PlainTextPreprocessor;
pub use traits::Preprocessor;

// Re-export backends
#[cfg(feature = "pdf-backend")]
pub use pdf::PdfExtractBackend;
