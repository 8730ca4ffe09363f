//! Where the CLI keeps its store and parse cache between invocations.

use anyhow::{anyhow, Result};
use std::path::{Path, PathBuf};

/// Per-user data directory layout
pub struct DataDir {
    /// Base directory for resumate data (e.g., ~/.local/share/resumate)
    root: PathBuf,
}

impl DataDir {
    /// Use the platform data directory
    pub fn new() -> Result<Self> {
        let base = dirs::data_local_dir()
            .or_else(|| dirs::home_dir().map(|home| home.join(".local").join("share")))
            .ok_or_else(|| anyhow!("Could not determine a data directory"))?;
        Ok(Self::at(base.join("resumate")))
    }

    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// JSON file backing the resume store
    pub fn store_path(&self) -> PathBuf {
        self.root.join("store.json")
    }

    pub fn cache_dir(&self) -> PathBuf {
        self.root.join("cache")
    }
}
