use crate::types::SectionCategory;
use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use tracing::warn;

// Default value functions for serde
fn default_fallback_window() -> usize {
    8 // header lines scanned when no section heading exists
}

fn default_name_max_position() -> usize {
    4 // only header lines 0..=3 may hold the name
}

fn default_name_min_words() -> usize {
    2
}

fn default_name_max_words() -> usize {
    4
}

fn default_name_max_chars() -> usize {
    40 // exclusive upper bound
}

fn default_place_keywords() -> Vec<String> {
    vec![
        "street".to_string(),
        "road".to_string(),
        "city".to_string(),
        "state".to_string(),
    ]
}

fn default_name_excluded_terms() -> Vec<String> {
    vec![
        "summary".to_string(),
        "objective".to_string(),
        "profile".to_string(),
        "skills".to_string(),
        "experience".to_string(),
        "education".to_string(),
    ]
}

fn default_email_pattern() -> String {
    r"[a-z0-9._%+-]+@[a-z0-9.-]+\.[a-z]{2,}".to_string()
}

// Digit and word classes are ASCII; `\d` and `\w` would also accept other scripts.
fn default_phone_pattern() -> String {
    r"\+?[0-9][0-9\s\-()]{7,}".to_string()
}

fn default_street_number_pattern() -> String {
    r"[0-9]+\s+[A-Za-z0-9_]+".to_string()
}

fn default_list_delimiters() -> String {
    r"[,;•\n]+".to_string()
}

fn default_block_separator() -> String {
    r"\n{2,}|•".to_string()
}

fn default_headings() -> Vec<HeadingRule> {
    use SectionCategory::*;
    [
        ("summary", Summary),
        ("objective", Summary),
        ("profile", Summary),
        ("skills", Skills),
        ("technologies", Skills),
        ("technical skills", Skills),
        ("experience", Experience),
        ("employment", Experience),
        ("work history", Experience),
        ("professional experience", Experience),
        ("education", Education),
        ("degree", Education),
        ("academic", Education),
        ("certifications", Certifications),
        ("awards", Certifications),
    ]
    .into_iter()
    .map(|(keyword, category)| HeadingRule::new(keyword, category))
    .collect()
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ParsingConfig {
    /// Header block detection and field classification
    #[serde(default)]
    pub header: HeaderConfig,
    /// Section heading keywords
    #[serde(default)]
    pub sections: SectionConfig,
    /// Delimiters used when flushing list and block sections
    #[serde(default)]
    pub splitting: SplittingConfig,
    /// Minimal parse mode - extracts the header block only, body sections stay empty
    #[serde(default)]
    pub minimal_parse: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HeaderConfig {
    /// Header size when the document has no recognizable section heading
    #[serde(default = "default_fallback_window")]
    pub fallback_window: usize,
    /// Header positions below this index may be classified as the name
    #[serde(default = "default_name_max_position")]
    pub name_max_position: usize,
    #[serde(default = "default_name_min_words")]
    pub name_min_words: usize,
    #[serde(default = "default_name_max_words")]
    pub name_max_words: usize,
    /// Name lines must be strictly shorter than this many characters
    #[serde(default = "default_name_max_chars")]
    pub name_max_chars: usize,
    /// Whole-word place nouns that mark a line as an address.
    /// Locale-specific city or country names belong here.
    #[serde(default = "default_place_keywords")]
    pub place_keywords: Vec<String>,
    /// Lines containing any of these (lowercased) are never a name
    #[serde(default = "default_name_excluded_terms")]
    pub name_excluded_terms: Vec<String>,
    /// Regex applied to the lowercased line
    #[serde(default = "default_email_pattern")]
    pub email_pattern: String,
    #[serde(default = "default_phone_pattern")]
    pub phone_pattern: String,
    /// `<digits><whitespace><word>` street-number heuristic
    #[serde(default = "default_street_number_pattern")]
    pub street_number_pattern: String,
}

impl Default for HeaderConfig {
    fn default() -> Self {
        Self {
            fallback_window: default_fallback_window(),
            name_max_position: default_name_max_position(),
            name_min_words: default_name_min_words(),
            name_max_words: default_name_max_words(),
            name_max_chars: default_name_max_chars(),
            place_keywords: default_place_keywords(),
            name_excluded_terms: default_name_excluded_terms(),
            email_pattern: default_email_pattern(),
            phone_pattern: default_phone_pattern(),
            street_number_pattern: default_street_number_pattern(),
        }
    }
}

/// One heading keyword and the category it opens.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeadingRule {
    pub keyword: String,
    pub category: SectionCategory,
}

impl HeadingRule {
    pub fn new(keyword: &str, category: SectionCategory) -> Self {
        Self {
            keyword: keyword.to_lowercase(),
            category,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SectionConfig {
    /// Checked in order; the first keyword the lowercased line starts with wins
    #[serde(default = "default_headings")]
    pub headings: Vec<HeadingRule>,
}

impl Default for SectionConfig {
    fn default() -> Self {
        Self {
            headings: default_headings(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SplittingConfig {
    /// Regex splitting skills and certifications into tokens
    #[serde(default = "default_list_delimiters")]
    pub list_delimiters: String,
    /// Regex splitting experience and education text into entry blocks
    #[serde(default = "default_block_separator")]
    pub block_separator: String,
}

impl Default for SplittingConfig {
    fn default() -> Self {
        Self {
            list_delimiters: default_list_delimiters(),
            block_separator: default_block_separator(),
        }
    }
}

impl ParsingConfig {
    /// Load config from a YAML file
    pub fn load_from_file(path: &str) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("reading config file {path}"))?;
        let config: ParsingConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("parsing config file {path}"))?;
        Ok(config)
    }

    /// Load config with fallback to default
    pub fn load_with_fallback(path: Option<&str>) -> Self {
        match path {
            Some(p) => Self::load_from_file(p).unwrap_or_else(|e| {
                warn!("failed to load config from {p}, using defaults: {e:#}");
                Self::default()
            }),
            None => Self::default(),
        }
    }
}
