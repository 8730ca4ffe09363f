use crate::cache::{ParseCacheKey, ParseCacheValue};
use crate::config::ParsingConfig;
use crate::error::ResumeError;
use crate::preprocessors::{PlainTextPreprocessor, Preprocessor};
use crate::rules::RuleEngine;
use crate::storage::{
    calculate_config_hash, calculate_document_hash, load_resume, save_resume, FileParseCache,
    FileStorage, NoOpParseCache, ParseCache, ResumeStore,
};
use crate::types::*;
use anyhow::{Context, Result};
use std::path::Path;
use std::time::{Duration, Instant};
use tracing::{info, warn};

#[cfg(feature = "pdf-backend")]
use crate::preprocessors::PdfPreprocessor;

/// Simple profiler that collects timings for pipeline steps
pub struct StepProfiler {
    enabled: bool,
    timings: Vec<(String, Duration)>,
}

impl StepProfiler {
    pub fn new(enabled: bool) -> Self {
        Self {
            enabled,
            timings: Vec::new(),
        }
    }

    pub fn time_step<F, R>(&mut self, step_name: &str, f: F) -> R
    where
        F: FnOnce() -> R,
    {
        if !self.enabled {
            return f();
        }

        let start = Instant::now();
        let result = f();
        let elapsed = start.elapsed();

        self.timings.push((step_name.to_string(), elapsed));
        println!("⏱️  {}: {:.0}ms", step_name, elapsed.as_millis());

        result
    }

    pub fn print_summary(&self) {
        if !self.enabled || self.timings.is_empty() {
            return;
        }

        println!("\n📊 Performance Summary:");
        let total: Duration = self.timings.iter().map(|(_, d)| *d).sum();

        for (step, duration) in &self.timings {
            let percentage = if total.is_zero() {
                0.0
            } else {
                (duration.as_secs_f64() / total.as_secs_f64()) * 100.0
            };
            println!(
                "   {:.<35} {:.0}ms ({:.1}%)",
                step,
                duration.as_millis(),
                percentage
            );
        }
        println!("   {:.<35} {:.0}ms", "Total", total.as_millis());
    }
}

/// Switches for a single `process_*` call
#[derive(Debug, Clone, Copy)]
pub struct ProcessOptions {
    /// Neither read nor write the parse cache
    pub skip_cache: bool,
    /// Time each step and print a summary
    pub profile: bool,
    /// Write the parsed resume to the store
    pub persist: bool,
}

impl Default for ProcessOptions {
    fn default() -> Self {
        Self {
            skip_cache: false,
            profile: false,
            persist: true,
        }
    }
}

/// Preprocessors tried in order: PDF first, plain text as the catch-all
pub fn default_preprocessors() -> Vec<Box<dyn Preprocessor>> {
    let mut preprocessors: Vec<Box<dyn Preprocessor>> = Vec::new();
    #[cfg(feature = "pdf-backend")]
    preprocessors.push(Box::new(PdfPreprocessor::new_with_pdf_extract()));
    preprocessors.push(Box::new(PlainTextPreprocessor::new()));
    preprocessors
}

/// Uploaded file → text → StructuredResume → store.
///
/// The store is written only after extraction and parsing have both
/// succeeded, so a failed upload leaves earlier data untouched.
pub struct ResumeProcessor {
    preprocessors: Vec<Box<dyn Preprocessor>>,
    store: Box<dyn ResumeStore + Send + Sync>,
    cache: Box<dyn ParseCache>,
    rule_engine: RuleEngine,
    config: ParsingConfig,
    config_hash: String,
}

impl ResumeProcessor {
    /// Create ResumeProcessor with full dependency injection
    pub fn new_with_dependencies(
        preprocessors: Vec<Box<dyn Preprocessor>>,
        store: Box<dyn ResumeStore + Send + Sync>,
        cache: Box<dyn ParseCache>,
        config: ParsingConfig,
    ) -> Result<Self> {
        let rule_engine = RuleEngine::new(&config)?;
        let config_hash = calculate_config_hash(&config)?;
        Ok(Self {
            preprocessors,
            store,
            cache,
            rule_engine,
            config,
            config_hash,
        })
    }

    /// Default preprocessors over the given store, no parse cache
    pub fn new(store: Box<dyn ResumeStore + Send + Sync>, config: ParsingConfig) -> Result<Self> {
        Self::new_with_dependencies(
            default_preprocessors(),
            store,
            Box::new(NoOpParseCache),
            config,
        )
    }

    /// Convenience constructor for CLI usage: file store, optional file cache
    pub fn new_cli(
        store_path: &Path,
        cache_dir: Option<&Path>,
        config: ParsingConfig,
    ) -> Result<Self> {
        let store = Box::new(FileStorage::new(store_path)?);
        let cache: Box<dyn ParseCache> = match cache_dir {
            Some(dir) => Box::new(FileParseCache::new(dir)?),
            None => Box::new(NoOpParseCache),
        };
        Self::new_with_dependencies(default_preprocessors(), store, cache, config)
    }

    pub fn config(&self) -> &ParsingConfig {
        &self.config
    }

    pub fn store(&self) -> &dyn ResumeStore {
        self.store.as_ref()
    }

    /// Parse raw text. Pure: nothing is cached or persisted.
    pub fn parse_text(&self, raw_text: &str) -> StructuredResume {
        self.rule_engine.parse(raw_text)
    }

    /// Extract, parse and persist an uploaded document
    pub fn process_bytes(&mut self, bytes: &[u8], file_name: &str) -> Result<StructuredResume> {
        self.process_bytes_with_options(bytes, file_name, ProcessOptions::default())
    }

    pub fn process_file(&mut self, path: &Path) -> Result<StructuredResume> {
        self.process_file_with_options(path, ProcessOptions::default())
    }

    pub fn process_file_with_options(
        &mut self,
        path: &Path,
        options: ProcessOptions,
    ) -> Result<StructuredResume> {
        let bytes = std::fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        self.process_bytes_with_options(&bytes, &path.to_string_lossy(), options)
    }

    pub fn process_bytes_with_options(
        &mut self,
        bytes: &[u8],
        file_name: &str,
        options: ProcessOptions,
    ) -> Result<StructuredResume> {
        let start_time = Instant::now();
        let mut profiler = StepProfiler::new(options.profile);

        let preprocessor = self.select_preprocessor(file_name)?;
        let cache_key = profiler.time_step("Cache Key Generation", || {
            ParseCacheKey::new(
                calculate_document_hash(bytes),
                self.config_hash.clone(),
                preprocessor.name().to_string(),
            )
        });

        let cached = if options.skip_cache {
            info!("skipping cache lookup for {file_name}");
            None
        } else {
            profiler.time_step("Cache Lookup", || self.cached_parse(&cache_key))
        };

        let resume = match cached {
            Some(cached) => {
                info!(
                    "cache hit for {file_name} (parsed {} in {}ms)",
                    cached.created_at, cached.processing_time_ms
                );
                cached.resume
            }
            None => {
                info!("processing {file_name}");
                let text =
                    profiler.time_step("1. Text Extraction", || {
                        extract_with(preprocessor, bytes, file_name)
                    })?;
                let resume = profiler.time_step("2. Rule Processing", || self.rule_engine.parse(&text));

                if !options.skip_cache {
                    let processing_time = start_time.elapsed().as_millis() as u64;
                    profiler.time_step("Cache Storage", || {
                        self.cache_parse(&cache_key, &resume, processing_time)
                    });
                }
                resume
            }
        };

        if options.persist {
            profiler.time_step("3. Persist", || save_resume(self.store.as_ref(), &resume))?;
        }

        profiler.print_summary();
        info!(
            "finished {file_name} in {}ms",
            start_time.elapsed().as_millis()
        );
        Ok(resume)
    }

    /// Run the pipeline without cache or store and keep every intermediate result
    pub fn capture_stages(&self, bytes: &[u8], file_name: &str) -> Result<ParseStages> {
        let text = extract_with(self.select_preprocessor(file_name)?, bytes, file_name)?;
        info!("stage 1: {} chars of raw text", text.len());

        let stages = self.rule_engine.parse_with_stages(&text);
        info!(
            "stage 2: {} lines, header ends at {}",
            stages.lines.len(),
            stages.boundary.index
        );
        info!("stage 3: {} segments", stages.segments.len());
        Ok(stages)
    }

    /// Resume as currently persisted, edits included
    pub fn load_stored(&self) -> Result<StructuredResume> {
        load_resume(self.store.as_ref())
    }

    /// First preprocessor claiming the file name
    fn select_preprocessor(&self, file_name: &str) -> Result<&dyn Preprocessor> {
        let path = Path::new(file_name);
        let preprocessor = self
            .preprocessors
            .iter()
            .find(|p| p.supports_file_type(path))
            .ok_or_else(|| ResumeError::UnsupportedInput(file_name.to_string()))?;
        Ok(preprocessor.as_ref())
    }

    fn cached_parse(&self, cache_key: &ParseCacheKey) -> Option<ParseCacheValue> {
        self.cache.get_parse_output(cache_key).unwrap_or_else(|e| {
            warn!("parse cache lookup failed, parsing from scratch: {e:#}");
            None
        })
    }

    fn cache_parse(&self, cache_key: &ParseCacheKey, resume: &StructuredResume, processing_time: u64) {
        let cache_value = ParseCacheValue::new(resume.clone(), processing_time);
        if let Err(e) = self.cache.store_parse_output(cache_key, &cache_value) {
            warn!("failed to store parse in cache: {e:#}");
        }
    }
}

/// Any preprocessor failure surfaces as a single `ResumeError::Extraction`.
fn extract_with(preprocessor: &dyn Preprocessor, bytes: &[u8], file_name: &str) -> Result<String> {
    info!("extracting {file_name} with {}", preprocessor.name());
    let text = preprocessor
        .extract_text(bytes)
        .map_err(|e| ResumeError::extraction(file_name, format!("{e:#}")))?;
    Ok(text)
}
