use crate::types::StructuredResume;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Version constants for cache invalidation
pub mod versions {
    pub const RESUMATE_VERSION: &str = env!("CARGO_PKG_VERSION");
    /// Bump when parsing behaviour changes for identical input and config
    pub const PROCESSING_VERSION: &str = "1.0.0";
}

/// Cache key: document bytes + config + decoding preprocessor → resume
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct ParseCacheKey {
    pub document_hash: String,
    pub config_hash: String,
    /// Same bytes decode differently (or not at all) under another preprocessor
    pub preprocessor: String,
    pub resumate_version: String,
    pub processing_version: String,
}

impl ParseCacheKey {
    pub fn new(document_hash: String, config_hash: String, preprocessor: String) -> Self {
        Self {
            document_hash,
            config_hash,
            preprocessor,
            resumate_version: versions::RESUMATE_VERSION.to_string(),
            processing_version: versions::PROCESSING_VERSION.to_string(),
        }
    }

    /// Compute cache key hash for storage
    pub fn to_cache_hash(&self) -> String {
        use sha2::{Digest, Sha256};
        let mut hasher = Sha256::new();
        hasher.update(&self.document_hash);
        hasher.update(&self.config_hash);
        hasher.update(&self.preprocessor);
        hasher.update(&self.resumate_version);
        hasher.update(&self.processing_version);
        format!("{:x}", hasher.finalize())
    }
}

/// Cached parse result with metadata
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParseCacheValue {
    pub resume: StructuredResume,
    pub created_at: DateTime<Utc>,
    pub processing_time_ms: u64,
    pub cache_version: String,
}

impl ParseCacheValue {
    pub fn new(resume: StructuredResume, processing_time_ms: u64) -> Self {
        Self {
            resume,
            created_at: Utc::now(),
            processing_time_ms,
            cache_version: versions::RESUMATE_VERSION.to_string(),
        }
    }
}
