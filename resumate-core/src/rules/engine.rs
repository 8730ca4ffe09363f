use super::field_parsers::FieldParsers;
use super::header_extraction::HeaderExtractor;
use super::normalizer::normalize_lines;
use super::section_segmentation::segment_sections;
use crate::config::{HeadingRule, ParsingConfig, SectionConfig};
use crate::types::*;
use anyhow::Result;
use tracing::info;

/// Case-insensitive prefix lookup from heading keyword to section category.
#[derive(Debug, Clone)]
pub struct HeadingMatcher {
    rules: Vec<HeadingRule>,
}

impl HeadingMatcher {
    pub fn new(config: &SectionConfig) -> Self {
        Self {
            rules: config
                .headings
                .iter()
                .map(|rule| HeadingRule::new(&rule.keyword, rule.category))
                .collect(),
        }
    }

    /// Category of the first keyword the lowercased line starts with.
    pub fn match_line(&self, line: &str) -> Option<SectionCategory> {
        let lower = line.to_lowercase();
        self.rules
            .iter()
            .find(|rule| lower.starts_with(rule.keyword.as_str()))
            .map(|rule| rule.category)
    }
}

/// The parse pipeline: normalize, bound the header, extract it, segment the
/// body, flush each segment into fields.
///
/// Immutable once built, so one engine serves any number of parses.
pub struct RuleEngine {
    headings: HeadingMatcher,
    header: HeaderExtractor,
    fields: FieldParsers,
    minimal_parse: bool,
}

impl RuleEngine {
    pub fn new(config: &ParsingConfig) -> Result<Self> {
        Ok(Self {
            headings: HeadingMatcher::new(&config.sections),
            header: HeaderExtractor::new(&config.header)?,
            fields: FieldParsers::new(&config.splitting)?,
            minimal_parse: config.minimal_parse,
        })
    }

    pub fn headings(&self) -> &HeadingMatcher {
        &self.headings
    }

    /// Parse raw resume text into structured fields. Never fails: missing
    /// fields fall back to their defaults.
    pub fn parse(&self, raw_text: &str) -> StructuredResume {
        let lines = normalize_lines(raw_text);
        let (_, _, _, resume) = self.run(&lines);
        resume
    }

    /// Same as [`RuleEngine::parse`], keeping every intermediate result.
    pub fn parse_with_stages(&self, raw_text: &str) -> ParseStages {
        let lines = normalize_lines(raw_text);
        let (boundary, header, segments, resume) = self.run(&lines);
        ParseStages {
            raw_text: raw_text.to_string(),
            lines,
            boundary,
            header,
            segments,
            resume,
        }
    }

    fn run(
        &self,
        lines: &[String],
    ) -> (HeaderBoundary, HeaderFields, Vec<SectionSegment>, StructuredResume) {
        let boundary = self.header.find_boundary(lines, &self.headings);
        let (header_lines, body_lines) = lines.split_at(boundary.index);

        let header = self.header.extract(header_lines);

        let segments = if self.minimal_parse {
            info!("minimal parse mode - skipping section segmentation");
            Vec::new()
        } else {
            segment_sections(body_lines, &self.headings)
        };

        let resume = segments.iter().fold(
            StructuredResume::with_header(header.clone()),
            |mut resume, segment| {
                self.fields.apply(&mut resume, segment);
                resume
            },
        );

        info!(
            "parsed {} lines: header ends at {} (heading: {}), {} segments, {} skills, {} experience, {} education",
            lines.len(),
            boundary.index,
            boundary.detected_heading,
            segments.len(),
            resume.skills.len(),
            resume.experience.len(),
            resume.education.len()
        );

        (boundary, header, segments, resume)
    }
}
