use thiserror::Error;

/// Failures a caller may need to tell apart.
///
/// Everything travels as `anyhow::Error`; match on these with
/// `err.downcast_ref::<ResumeError>()`.
#[derive(Debug, Error)]
pub enum ResumeError {
    /// Text extraction from a binary document failed. Nothing was persisted.
    #[error("failed to extract text from {source_name}: {message}")]
    Extraction { source_name: String, message: String },

    #[error("storage error for key '{key}': {message}")]
    Storage { key: String, message: String },

    #[error("invalid parsing config: {0}")]
    Config(String),

    #[error("no preprocessor accepts '{0}'")]
    UnsupportedInput(String),
}

impl ResumeError {
    pub fn extraction(source_name: impl Into<String>, message: impl ToString) -> Self {
        Self::Extraction {
            source_name: source_name.into(),
            message: message.to_string(),
        }
    }

    pub fn storage(key: impl Into<String>, message: impl ToString) -> Self {
        Self::Storage {
            key: key.into(),
            message: message.to_string(),
        }
    }
}
