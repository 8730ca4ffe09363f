// Resumate Core Library
//
// Heuristic resume parsing with pluggable preprocessors and stores.
// Main interface for turning uploaded resumes into structured fields.

pub mod types;
pub mod error;
pub mod preprocessors;
pub mod processor;
pub mod serialization;
pub mod cache;
pub mod config;
pub mod rules;
pub mod storage;
pub mod editor;
pub mod session;

// Re-export main types and functions for easy use
pub use types::*;
pub use error::ResumeError;
pub use preprocessors::{PdfPreprocessor, PlainTextPreprocessor, Preprocessor};
pub use processor::{ProcessOptions, ResumeProcessor};
pub use config::ParsingConfig;
pub use rules::RuleEngine;
pub use storage::{FileStorage, MemoryStorage, NoOpStorage, ResumeStore};
pub use editor::{EducationForm, ResumeEditor};
pub use session::Session;

// Re-export backends for direct use
#[cfg(feature = "pdf-backend")]
pub use preprocessors::PdfExtractBackend;
