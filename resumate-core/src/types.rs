use serde::{Deserialize, Serialize};
use std::fmt;

/// Name used when no header line qualifies as a person's name.
pub const PLACEHOLDER_NAME: &str = "FIRST NAME SURNAME";

/// The schema version stamped on every serialized resume output.
/// Bump this when the output shape changes.
pub const SCHEMA_VERSION: &str = "0.1.0";

// ===== SECTION CATEGORIES =====

/// Closed set of body sections the segmenter can route lines into.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum SectionCategory {
    Summary,
    Skills,
    Experience,
    Education,
    Certifications,
    Unrecognized,
}

impl fmt::Display for SectionCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            SectionCategory::Summary => "summary",
            SectionCategory::Skills => "skills",
            SectionCategory::Experience => "experience",
            SectionCategory::Education => "education",
            SectionCategory::Certifications => "certifications",
            SectionCategory::Unrecognized => "unrecognized",
        };
        f.write_str(label)
    }
}

// ===== HEADER =====

/// Identity and contact block found above the first section heading.
///
/// Absent fields are empty strings, never `None`: downstream renderers read
/// them straight out of the store.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeaderFields {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
}

impl Default for HeaderFields {
    fn default() -> Self {
        Self {
            name: PLACEHOLDER_NAME.to_string(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
        }
    }
}

/// Where the header block ends inside the normalized line sequence.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeaderBoundary {
    /// Index of the first body line (exclusive end of the header block)
    pub index: usize,
    /// True when a section heading ended the header, false for the fallback window
    pub detected_heading: bool,
}

// ===== BODY RECORDS =====

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct ExperienceEntry {
    pub title: String,
    pub company: String,
    pub duration: String,
    pub description: Vec<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EducationEntry {
    pub degree: String,
    pub institution: String,
    pub year: String,
}

/// User-authored section with free-form content. Never produced by the parser.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct CustomSection {
    pub id: String,
    pub name: String,
    pub content: String,
}

/// A finished segmenter buffer: the raw body lines collected under one heading.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SectionSegment {
    pub category: SectionCategory,
    pub lines: Vec<String>,
}

impl SectionSegment {
    /// Buffer joined with newlines and trimmed; empty means the flush is a no-op.
    pub fn joined_text(&self) -> String {
        self.lines.join("\n").trim().to_string()
    }
}

// ===== AGGREGATE =====

/// The fully parsed, field-typed representation of a resume document.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct StructuredResume {
    #[serde(flatten)]
    pub header: HeaderFields,
    pub summary: String,
    pub skills: Vec<String>,
    pub experience: Vec<ExperienceEntry>,
    pub education: Vec<EducationEntry>,
    pub certifications: Vec<String>,
    #[serde(rename = "customSections", default)]
    pub custom_sections: Vec<CustomSection>,
}

impl Default for StructuredResume {
    fn default() -> Self {
        Self::with_header(HeaderFields::default())
    }
}

impl StructuredResume {
    pub fn with_header(header: HeaderFields) -> Self {
        Self {
            header,
            summary: String::new(),
            skills: Vec::new(),
            experience: Vec::new(),
            education: Vec::new(),
            certifications: Vec::new(),
            custom_sections: Vec::new(),
        }
    }

    /// True when no body section received any content.
    pub fn has_empty_body(&self) -> bool {
        self.summary.is_empty()
            && self.skills.is_empty()
            && self.experience.is_empty()
            && self.education.is_empty()
            && self.certifications.is_empty()
    }
}

/// The serialization-ready output format. Carries a schema version
/// so consumers can detect and handle shape changes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VersionedResume {
    pub schema_version: String,
    #[serde(flatten)]
    pub resume: StructuredResume,
}

impl From<StructuredResume> for VersionedResume {
    fn from(resume: StructuredResume) -> Self {
        Self {
            schema_version: SCHEMA_VERSION.to_string(),
            resume,
        }
    }
}

/// Captured intermediate outputs from each pipeline stage.
/// Used for testing and diagnostics: lets you inspect each boundary.
#[derive(Debug, Clone, Serialize)]
pub struct ParseStages {
    pub raw_text: String,
    pub lines: Vec<String>,
    pub boundary: HeaderBoundary,
    pub header: HeaderFields,
    pub segments: Vec<SectionSegment>,
    pub resume: StructuredResume,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_resume_uses_placeholder_name() {
        let resume = StructuredResume::default();
        assert_eq!(resume.header.name, PLACEHOLDER_NAME);
        assert_eq!(resume.header.email, "");
        assert!(resume.has_empty_body());
    }

    #[test]
    fn test_resume_serializes_flat_header_and_camel_case_custom_sections() {
        let value = serde_json::to_value(StructuredResume::default()).unwrap();
        assert_eq!(value["name"], PLACEHOLDER_NAME);
        assert!(value["customSections"].is_array());
        assert!(value.get("header").is_none());
    }

    #[test]
    fn test_segment_joined_text_trims() {
        let segment = SectionSegment {
            category: SectionCategory::Summary,
            lines: vec!["  ".to_string(), "Builds things.".to_string()],
        };
        assert_eq!(segment.joined_text(), "Builds things.");
    }
}
