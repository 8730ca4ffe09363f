use crate::cache::{ParseCacheKey, ParseCacheValue};
use crate::error::ResumeError;
use crate::types::*;
use anyhow::{anyhow, Result};
use serde::de::DeserializeOwned;
use sha2::{Digest, Sha256};
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use tracing::warn;

/// Persisted key layout shared with every renderer that reads the store
pub mod keys {
    pub const NAME: &str = "resume_name";
    pub const EMAIL: &str = "resume_email";
    pub const PHONE: &str = "resume_phone";
    pub const ADDRESS: &str = "resume_address";
    pub const SUMMARY: &str = "resume_summary";
    pub const SKILLS: &str = "resume_skills";
    pub const EXPERIENCE: &str = "resume_experience";
    pub const EDUCATION: &str = "resume_education";
    pub const CERTIFICATIONS: &str = "resume_certifications";
    pub const CUSTOM_SECTIONS: &str = "resume_customSections";
    /// Session stub: presence means "logged in"
    pub const USER: &str = "resumeai_user";

    /// Keys a parse overwrites. Custom sections belong to the editor.
    pub const PARSER_OWNED: [&str; 9] = [
        NAME,
        EMAIL,
        PHONE,
        ADDRESS,
        SUMMARY,
        SKILLS,
        EXPERIENCE,
        EDUCATION,
        CERTIFICATIONS,
    ];
}

/// String-keyed, single-user key-value store. Writes are last-write-wins.
pub trait ResumeStore {
    fn get(&self, key: &str) -> Result<Option<String>>;
    fn set(&self, key: &str, value: &str) -> Result<()>;
    fn remove(&self, key: &str) -> Result<()>;

    /// Write several keys as one operation where the backend allows it
    fn set_many(&self, entries: &[(&str, String)]) -> Result<()> {
        for (key, value) in entries {
            self.set(key, value)?;
        }
        Ok(())
    }
}

/// File-based store: one JSON object on disk, rewritten on every write
pub struct FileStorage {
    path: PathBuf,
}

impl FileStorage {
    pub fn new(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<BTreeMap<String, String>> {
        if !self.path.exists() {
            return Ok(BTreeMap::new());
        }
        let json_str = fs::read_to_string(&self.path)?;
        if json_str.trim().is_empty() {
            return Ok(BTreeMap::new());
        }
        serde_json::from_str(&json_str).map_err(|e| {
            ResumeError::storage(self.path.display().to_string(), format!("corrupt store file: {e}"))
                .into()
        })
    }

    fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<()> {
        let json_str = serde_json::to_string_pretty(entries)
            .map_err(|e| anyhow!("Failed to serialize store: {}", e))?;
        // Write beside the target and rename so a crash never leaves half a file
        let tmp_path = self.path.with_extension("json.tmp");
        fs::write(&tmp_path, json_str)?;
        fs::rename(&tmp_path, &self.path)?;
        Ok(())
    }
}

impl ResumeStore for FileStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_all()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        entries.insert(key.to_string(), value.to_string());
        self.write_all(&entries)
    }

    fn remove(&self, key: &str) -> Result<()> {
        let mut entries = self.read_all()?;
        if entries.remove(key).is_some() {
            self.write_all(&entries)?;
        }
        Ok(())
    }

    fn set_many(&self, new_entries: &[(&str, String)]) -> Result<()> {
        let mut entries = self.read_all()?;
        for (key, value) in new_entries {
            entries.insert(key.to_string(), value.clone());
        }
        self.write_all(&entries)
    }
}

/// In-process store. Clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<BTreeMap<String, String>>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of every stored entry
    pub fn snapshot(&self) -> BTreeMap<String, String> {
        self.entries
            .lock()
            .map(|entries| entries.clone())
            .unwrap_or_default()
    }

    fn with_entries<R>(&self, key: &str, f: impl FnOnce(&mut BTreeMap<String, String>) -> R) -> Result<R> {
        let mut entries = self
            .entries
            .lock()
            .map_err(|e| ResumeError::storage(key, format!("store lock poisoned: {e}")))?;
        Ok(f(&mut entries))
    }
}

impl ResumeStore for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        self.with_entries(key, |entries| entries.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.with_entries(key, |entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.with_entries(key, |entries| {
            entries.remove(key);
        })
    }
}

/// No-op store implementation that never persists anything
#[derive(Debug, Default)]
pub struct NoOpStorage;

impl NoOpStorage {
    pub fn new() -> Self {
        Self
    }
}

impl ResumeStore for NoOpStorage {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None) // Always empty
    }

    fn set(&self, _key: &str, _value: &str) -> Result<()> {
        Ok(()) // No-op
    }

    fn remove(&self, _key: &str) -> Result<()> {
        Ok(()) // No-op
    }
}

// ===== RESUME <-> KEY LAYOUT =====

/// Key/value pairs a parse writes: raw strings for text fields, JSON for structures
pub fn resume_entries(resume: &StructuredResume) -> Result<Vec<(&'static str, String)>> {
    let header = &resume.header;
    Ok(vec![
        (keys::NAME, header.name.clone()),
        (keys::EMAIL, header.email.clone()),
        (keys::PHONE, header.phone.clone()),
        (keys::ADDRESS, header.address.clone()),
        (keys::SUMMARY, resume.summary.clone()),
        (keys::SKILLS, serde_json::to_string(&resume.skills)?),
        (keys::EXPERIENCE, serde_json::to_string(&resume.experience)?),
        (keys::EDUCATION, serde_json::to_string(&resume.education)?),
        (keys::CERTIFICATIONS, serde_json::to_string(&resume.certifications)?),
    ])
}

/// Persist the parser-owned keys. Custom sections are left untouched.
pub fn save_resume(store: &dyn ResumeStore, resume: &StructuredResume) -> Result<()> {
    store.set_many(&resume_entries(resume)?)
}

/// Read a resume back from the store. Missing keys load as `""` or `[]`.
pub fn load_resume(store: &dyn ResumeStore) -> Result<StructuredResume> {
    let text = |key: &str| -> Result<String> { Ok(store.get(key)?.unwrap_or_default()) };

    Ok(StructuredResume {
        header: HeaderFields {
            name: text(keys::NAME)?,
            email: text(keys::EMAIL)?,
            phone: text(keys::PHONE)?,
            address: text(keys::ADDRESS)?,
        },
        summary: text(keys::SUMMARY)?,
        skills: load_json_list(store, keys::SKILLS)?,
        experience: load_json_list(store, keys::EXPERIENCE)?,
        education: load_json_list(store, keys::EDUCATION)?,
        certifications: load_json_list(store, keys::CERTIFICATIONS)?,
        custom_sections: load_json_list(store, keys::CUSTOM_SECTIONS)?,
    })
}

/// JSON array under `key`; absent or malformed values load as an empty list.
pub fn load_json_list<T: DeserializeOwned>(store: &dyn ResumeStore, key: &str) -> Result<Vec<T>> {
    let Some(raw) = store.get(key)? else {
        return Ok(Vec::new());
    };
    match serde_json::from_str(&raw) {
        Ok(items) => Ok(items),
        Err(e) => {
            warn!("ignoring malformed JSON under '{key}': {e}");
            Ok(Vec::new())
        }
    }
}

/// Store a structure as JSON under `key`
pub fn save_json<T: serde::Serialize + ?Sized>(store: &dyn ResumeStore, key: &str, value: &T) -> Result<()> {
    let json = serde_json::to_string(value)
        .map_err(|e| ResumeError::storage(key, format!("serialization failed: {e}")))?;
    store.set(key, &json)
}

// ===== PARSE CACHE =====

/// Cache of finished parses keyed by document + config
pub trait ParseCache {
    fn get_parse_output(&self, cache_key: &ParseCacheKey) -> Result<Option<ParseCacheValue>>;
    fn store_parse_output(&self, cache_key: &ParseCacheKey, cache_value: &ParseCacheValue) -> Result<()>;
}

/// File-based cache: one JSON file per cache key under `cache_dir/parse`
pub struct FileParseCache {
    cache_dir: PathBuf,
}

impl FileParseCache {
    pub fn new(cache_dir: impl AsRef<Path>) -> Result<Self> {
        let cache_dir = cache_dir.as_ref().to_path_buf();
        fs::create_dir_all(cache_dir.join("parse"))?;
        Ok(Self { cache_dir })
    }

    fn parse_path(&self, cache_key: &ParseCacheKey) -> PathBuf {
        self.cache_dir
            .join("parse")
            .join(format!("{}.json", cache_key.to_cache_hash()))
    }
}

impl ParseCache for FileParseCache {
    fn get_parse_output(&self, cache_key: &ParseCacheKey) -> Result<Option<ParseCacheValue>> {
        let path = self.parse_path(cache_key);
        if path.exists() {
            let json_str = fs::read_to_string(path)?;
            let cache_value: ParseCacheValue = serde_json::from_str(&json_str)
                .map_err(|e| anyhow!("Failed to deserialize cached ParseCacheValue: {}", e))?;
            Ok(Some(cache_value))
        } else {
            Ok(None)
        }
    }

    fn store_parse_output(&self, cache_key: &ParseCacheKey, cache_value: &ParseCacheValue) -> Result<()> {
        let path = self.parse_path(cache_key);
        let json_str = serde_json::to_string_pretty(cache_value)
            .map_err(|e| anyhow!("Failed to serialize ParseCacheValue: {}", e))?;
        fs::write(path, json_str)?;
        Ok(())
    }
}

/// No-op cache implementation that disables all caching
#[derive(Debug, Default)]
pub struct NoOpParseCache;

impl ParseCache for NoOpParseCache {
    fn get_parse_output(&self, _cache_key: &ParseCacheKey) -> Result<Option<ParseCacheValue>> {
        Ok(None) // Always cache miss
    }

    fn store_parse_output(&self, _cache_key: &ParseCacheKey, _cache_value: &ParseCacheValue) -> Result<()> {
        Ok(()) // No-op
    }
}

/// SHA-256 of the uploaded document bytes
pub fn calculate_document_hash(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes.len().to_le_bytes());
    hasher.update(bytes);
    format!("{:x}", hasher.finalize())
}

/// Calculate hash for configuration data (for the cache key)
pub fn calculate_config_hash<T: serde::Serialize>(config: &T) -> Result<String> {
    let config_json = serde_json::to_string(config)
        .map_err(|e| anyhow!("Failed to serialize config for hashing: {}", e))?;

    let mut hasher = Sha256::new();
    hasher.update(config_json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}
