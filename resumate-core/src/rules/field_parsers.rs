use crate::config::SplittingConfig;
use crate::error::ResumeError;
use crate::types::{EducationEntry, ExperienceEntry, SectionCategory, SectionSegment, StructuredResume};
use anyhow::Result;
use regex::Regex;
use tracing::debug;

/// Turns finished segments into typed resume fields.
pub struct FieldParsers {
    list_delimiters: Regex,
    block_separator: Regex,
}

impl FieldParsers {
    pub fn new(config: &SplittingConfig) -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| ResumeError::Config(format!("pattern '{pattern}': {e}")))
        };
        Ok(Self {
            list_delimiters: compile(&config.list_delimiters)?,
            block_separator: compile(&config.block_separator)?,
        })
    }

    /// Flush one segment into the resume.
    ///
    /// A segment whose joined text is blank changes nothing. Otherwise the
    /// category's field is replaced, so the last non-empty segment of a
    /// repeated heading wins.
    pub fn apply(&self, resume: &mut StructuredResume, segment: &SectionSegment) {
        let text = segment.joined_text();
        if text.is_empty() {
            return;
        }
        debug!("flushing {} ({} lines)", segment.category, segment.lines.len());
        match segment.category {
            SectionCategory::Summary => resume.summary = text,
            SectionCategory::Skills => resume.skills = self.parse_list(&text),
            SectionCategory::Certifications => resume.certifications = self.parse_list(&text),
            SectionCategory::Experience => resume.experience = self.parse_experience(&text),
            SectionCategory::Education => resume.education = self.parse_education(&text),
            SectionCategory::Unrecognized => {}
        }
    }

    /// Split on runs of list delimiters, trimming and dropping empty tokens.
    pub fn parse_list(&self, text: &str) -> Vec<String> {
        self.list_delimiters
            .split(text)
            .map(str::trim)
            .filter(|token| !token.is_empty())
            .map(str::to_string)
            .collect()
    }

    /// Title, company, duration, then every further line as description.
    pub fn parse_experience(&self, text: &str) -> Vec<ExperienceEntry> {
        self.blocks(text)
            .into_iter()
            .map(|lines| {
                let description = match lines.len() {
                    0..=3 => Vec::new(),
                    _ => lines[3..].to_vec(),
                };
                ExperienceEntry {
                    title: slot(&lines, 0),
                    company: slot(&lines, 1),
                    duration: slot(&lines, 2),
                    description,
                }
            })
            .collect()
    }

    /// Degree, institution, year; anything past the third line is ignored.
    pub fn parse_education(&self, text: &str) -> Vec<EducationEntry> {
        self.blocks(text)
            .into_iter()
            .map(|lines| EducationEntry {
                degree: slot(&lines, 0),
                institution: slot(&lines, 1),
                year: slot(&lines, 2),
            })
            .collect()
    }

    /// Entry blocks, each already split into trimmed, non-empty sub-lines.
    fn blocks(&self, text: &str) -> Vec<Vec<String>> {
        self.block_separator
            .split(text)
            .map(str::trim)
            .filter(|block| !block.is_empty())
            .map(|block| {
                block
                    .split('\n')
                    .map(str::trim)
                    .filter(|line| !line.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .collect()
    }
}

fn slot(lines: &[String], index: usize) -> String {
    lines.get(index).cloned().unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parsers() -> FieldParsers {
        FieldParsers::new(&SplittingConfig::default()).unwrap()
    }

    fn segment(category: SectionCategory, lines: &[&str]) -> SectionSegment {
        SectionSegment {
            category,
            lines: lines.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_list_splits_on_delimiter_runs() {
        assert_eq!(
            parsers().parse_list("Go, Rust; Python"),
            vec!["Go", "Rust", "Python"]
        );
        assert_eq!(
            parsers().parse_list("A,,; B\n• C •\n\nD"),
            vec!["A", "B", "C", "D"]
        );
        assert!(parsers().parse_list(" , ; ").is_empty());
    }

    #[test]
    fn test_experience_positional_mapping() {
        let entries = parsers().parse_experience("Engineer\nAcme Corp\n2020-2022\nDid X\nDid Y");
        assert_eq!(
            entries,
            vec![ExperienceEntry {
                title: "Engineer".to_string(),
                company: "Acme Corp".to_string(),
                duration: "2020-2022".to_string(),
                description: vec!["Did X".to_string(), "Did Y".to_string()],
            }]
        );
    }

    #[test]
    fn test_two_line_experience_has_empty_description() {
        let entries = parsers().parse_experience("Engineer\nAcme Corp");
        assert_eq!(entries[0].company, "Acme Corp");
        assert_eq!(entries[0].duration, "");
        assert!(entries[0].description.is_empty());
    }

    #[test]
    fn test_experience_blocks_split_on_bullets_and_blank_lines() {
        let entries = parsers().parse_experience("• Engineer\nAcme\n• Manager\nGlobex\n2019\n\nIntern");
        let titles: Vec<_> = entries.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Engineer", "Manager", "Intern"]);
        assert_eq!(entries[1].duration, "2019");
    }

    #[test]
    fn test_education_ignores_fourth_line() {
        let entries = parsers().parse_education("BSc Computer Science\nMIT\n2020\nGPA 4.0");
        assert_eq!(
            entries,
            vec![EducationEntry {
                degree: "BSc Computer Science".to_string(),
                institution: "MIT".to_string(),
                year: "2020".to_string(),
            }]
        );
    }

    #[test]
    fn test_apply_routes_by_category_and_last_segment_wins() {
        let p = parsers();
        let mut resume = StructuredResume::default();
        p.apply(&mut resume, &segment(SectionCategory::Summary, &["Builds", "things."]));
        p.apply(&mut resume, &segment(SectionCategory::Skills, &["Go"]));
        p.apply(&mut resume, &segment(SectionCategory::Skills, &["Rust, Zig"]));
        p.apply(&mut resume, &segment(SectionCategory::Certifications, &["AWS SA; CKA"]));
        assert_eq!(resume.summary, "Builds\nthings.");
        assert_eq!(resume.skills, vec!["Rust", "Zig"]);
        assert_eq!(resume.certifications, vec!["AWS SA", "CKA"]);
    }

    #[test]
    fn test_empty_segment_does_not_overwrite() {
        let p = parsers();
        let mut resume = StructuredResume::default();
        p.apply(&mut resume, &segment(SectionCategory::Skills, &["Go"]));
        p.apply(&mut resume, &segment(SectionCategory::Skills, &[]));
        assert_eq!(resume.skills, vec!["Go"]);
    }

    #[test]
    fn test_unrecognized_segment_is_ignored() {
        let mut resume = StructuredResume::default();
        parsers().apply(&mut resume, &segment(SectionCategory::Unrecognized, &["whatever"]));
        assert_eq!(resume, StructuredResume::default());
    }
}
