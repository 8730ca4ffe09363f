use super::engine::HeadingMatcher;
use crate::config::HeaderConfig;
use crate::error::ResumeError;
use crate::types::{HeaderBoundary, HeaderFields, PLACEHOLDER_NAME};
use anyhow::Result;
use regex::Regex;
use tracing::debug;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum HeaderField {
    Email,
    Phone,
    Address,
    Name,
}

/// Header fields collected so far. `None` means still open for assignment.
#[derive(Debug, Default)]
struct PartialHeader {
    name: Option<String>,
    email: Option<String>,
    phone: Option<String>,
    address: Option<String>,
}

impl PartialHeader {
    fn assign(mut self, field: HeaderField, line: &str) -> Self {
        let slot = match field {
            HeaderField::Email => &mut self.email,
            HeaderField::Phone => &mut self.phone,
            HeaderField::Address => &mut self.address,
            HeaderField::Name => &mut self.name,
        };
        slot.get_or_insert_with(|| line.to_string());
        self
    }

    fn into_fields(self) -> HeaderFields {
        HeaderFields {
            name: self.name.unwrap_or_else(|| PLACEHOLDER_NAME.to_string()),
            email: self.email.unwrap_or_default(),
            phone: self.phone.unwrap_or_default(),
            address: self.address.unwrap_or_default(),
        }
    }
}

/// Classifies the leading block of a resume into name, email, phone and address.
pub struct HeaderExtractor {
    email: Regex,
    phone: Regex,
    street_number: Regex,
    place_keywords: Option<Regex>,
    name_excluded_terms: Vec<String>,
    fallback_window: usize,
    name_max_position: usize,
    name_min_words: usize,
    name_max_words: usize,
    name_max_chars: usize,
}

impl HeaderExtractor {
    pub fn new(config: &HeaderConfig) -> Result<Self> {
        let compile = |pattern: &str| {
            Regex::new(pattern).map_err(|e| ResumeError::Config(format!("pattern '{pattern}': {e}")))
        };

        let place_keywords = if config.place_keywords.is_empty() {
            None
        } else {
            let alternatives = config
                .place_keywords
                .iter()
                .map(|k| regex::escape(&k.to_lowercase()))
                .collect::<Vec<_>>()
                .join("|");
            Some(compile(&format!(r"(?-u:\b)({alternatives})(?-u:\b)"))?)
        };

        Ok(Self {
            email: compile(&config.email_pattern)?,
            phone: compile(&config.phone_pattern)?,
            street_number: compile(&config.street_number_pattern)?,
            place_keywords,
            name_excluded_terms: config
                .name_excluded_terms
                .iter()
                .map(|t| t.to_lowercase())
                .collect(),
            fallback_window: config.fallback_window,
            name_max_position: config.name_max_position,
            name_min_words: config.name_min_words,
            name_max_words: config.name_max_words,
            name_max_chars: config.name_max_chars,
        })
    }

    /// Index of the first line that opens a section, or the fallback window.
    pub fn find_boundary(&self, lines: &[String], headings: &HeadingMatcher) -> HeaderBoundary {
        match lines.iter().position(|line| headings.match_line(line).is_some()) {
            Some(index) => HeaderBoundary {
                index,
                detected_heading: true,
            },
            None => HeaderBoundary {
                index: lines.len().min(self.fallback_window),
                detected_heading: false,
            },
        }
    }

    /// Fold the header lines into fields; the first qualifying line wins each field.
    pub fn extract(&self, header_lines: &[String]) -> HeaderFields {
        header_lines
            .iter()
            .enumerate()
            .fold(PartialHeader::default(), |partial, (position, line)| {
                match self.classify(position, line, &partial) {
                    Some(field) => {
                        debug!("header line {position} -> {field:?}: {line}");
                        partial.assign(field, line)
                    }
                    None => partial,
                }
            })
            .into_fields()
    }

    // Precedence: EMAIL > PHONE > ADDRESS > NAME, only for fields still open.
    fn classify(&self, position: usize, line: &str, partial: &PartialHeader) -> Option<HeaderField> {
        let lower = line.to_lowercase();
        if partial.email.is_none() && self.is_email(&lower) {
            Some(HeaderField::Email)
        } else if partial.phone.is_none() && self.is_phone(&lower) {
            Some(HeaderField::Phone)
        } else if partial.address.is_none() && self.is_address(&lower) {
            Some(HeaderField::Address)
        } else if partial.name.is_none() && self.is_name(position, line, &lower) {
            Some(HeaderField::Name)
        } else {
            None
        }
    }

    fn is_email(&self, lower: &str) -> bool {
        self.email.is_match(lower)
    }

    fn is_phone(&self, lower: &str) -> bool {
        self.phone.is_match(lower)
    }

    fn is_address(&self, lower: &str) -> bool {
        lower.contains("address")
            || self.street_number.is_match(lower)
            || self
                .place_keywords
                .as_ref()
                .is_some_and(|re| re.is_match(lower))
    }

    fn is_name(&self, position: usize, line: &str, lower: &str) -> bool {
        if position >= self.name_max_position {
            return false;
        }
        if self.is_email(lower) || self.is_phone(lower) || self.is_address(lower) {
            return false;
        }
        if self.name_excluded_terms.iter().any(|t| lower.contains(t.as_str())) {
            return false;
        }
        let words = line.split(' ').count();
        (self.name_min_words..=self.name_max_words).contains(&words)
            && line.chars().count() < self.name_max_chars
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{HeaderConfig, SectionConfig};

    fn extractor() -> HeaderExtractor {
        HeaderExtractor::new(&HeaderConfig::default()).unwrap()
    }

    fn headings() -> HeadingMatcher {
        HeadingMatcher::new(&SectionConfig::default())
    }

    fn lines(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_boundary_stops_at_first_heading() {
        let doc = lines(&["Jane Doe", "jane@x.com", "Summary", "Builds things."]);
        let boundary = extractor().find_boundary(&doc, &headings());
        assert_eq!(boundary, HeaderBoundary { index: 2, detected_heading: true });
    }

    #[test]
    fn test_boundary_heading_match_is_case_insensitive_prefix() {
        let doc = lines(&["Jane Doe", "PROFESSIONAL EXPERIENCE:", "Engineer"]);
        assert_eq!(extractor().find_boundary(&doc, &headings()).index, 1);
    }

    #[test]
    fn test_boundary_falls_back_to_window() {
        let short = lines(&["a", "b", "c"]);
        let boundary = extractor().find_boundary(&short, &headings());
        assert_eq!(boundary, HeaderBoundary { index: 3, detected_heading: false });

        let long: Vec<String> = (0..20).map(|i| format!("line {i}")).collect();
        assert_eq!(extractor().find_boundary(&long, &headings()).index, 8);
    }

    #[test]
    fn test_classifies_each_field() {
        let header = extractor().extract(&lines(&[
            "Jane Doe",
            "jane@x.com",
            "555-123-4567",
            "42 Elm Street",
        ]));
        assert_eq!(header.name, "Jane Doe");
        assert_eq!(header.email, "jane@x.com");
        assert_eq!(header.phone, "555-123-4567");
        assert_eq!(header.address, "42 Elm Street");
    }

    #[test]
    fn test_email_keeps_the_whole_line() {
        let header = extractor().extract(&lines(&["Email: Jane.Doe@Example.COM | github"]));
        assert_eq!(header.email, "Email: Jane.Doe@Example.COM | github");
    }

    #[test]
    fn test_first_qualifying_line_wins() {
        let header = extractor().extract(&lines(&["first@x.com", "second@y.org"]));
        assert_eq!(header.email, "first@x.com");
    }

    #[test]
    fn test_empty_header_yields_defaults() {
        assert_eq!(extractor().extract(&[]), HeaderFields::default());
    }

    #[test]
    fn test_unclassifiable_lines_yield_only_placeholder() {
        let header = extractor().extract(&lines(&["Hello", "Curriculum", "vitae of a very long line that has many words"]));
        assert_eq!(header, HeaderFields::default());
    }

    #[test]
    fn test_name_only_in_first_four_positions() {
        let header = extractor().extract(&lines(&["x", "y", "z", "w", "Jane Doe"]));
        assert_eq!(header.name, PLACEHOLDER_NAME);

        let header = extractor().extract(&lines(&["x", "y", "z", "Jane Doe"]));
        assert_eq!(header.name, "Jane Doe");
    }

    #[test]
    fn test_name_word_count_and_length_limits() {
        assert_eq!(extractor().extract(&lines(&["Cher"])).name, PLACEHOLDER_NAME);
        assert_eq!(
            extractor().extract(&lines(&["Anna Maria Louisa De Medici"])).name,
            PLACEHOLDER_NAME
        );
        assert_eq!(
            extractor().extract(&lines(&["Bartholomew Maximilian Featherstonehaugh"])).name,
            PLACEHOLDER_NAME
        );
        assert_eq!(extractor().extract(&lines(&["Anna Maria De Medici"])).name, "Anna Maria De Medici");
    }

    #[test]
    fn test_name_rejects_section_words() {
        let header = extractor().extract(&lines(&["Career Objective", "Jane Doe"]));
        assert_eq!(header.name, "Jane Doe");
    }

    #[test]
    fn test_address_heuristics() {
        let e = extractor();
        assert_eq!(e.extract(&lines(&["Address: somewhere"])).address, "Address: somewhere");
        assert_eq!(e.extract(&lines(&["12 Baker"])).address, "12 Baker");
        assert_eq!(e.extract(&lines(&["Springfield, State"])).address, "Springfield, State");
        assert_eq!(e.extract(&lines(&["Streetwise Jane"])).address, "");
    }

    #[test]
    fn test_place_keywords_are_configurable() {
        let config = HeaderConfig {
            place_keywords: vec!["Istanbul".to_string()],
            ..HeaderConfig::default()
        };
        let e = HeaderExtractor::new(&config).unwrap();
        assert_eq!(e.extract(&lines(&["Kadikoy, Istanbul"])).address, "Kadikoy, Istanbul");
        assert_eq!(e.extract(&lines(&["Main Street"])).address, "");
    }

    #[test]
    fn test_digits_and_word_boundaries_are_ascii() {
        let e = extractor();
        assert_eq!(e.extract(&lines(&["٥٥٥١٢٣٤٥٦٧٨"])).phone, "");
        assert_eq!(e.extract(&lines(&["١٢ Baker"])).address, "");

        let config = HeaderConfig {
            place_keywords: vec!["Istanbul".to_string()],
            ..HeaderConfig::default()
        };
        let e = HeaderExtractor::new(&config).unwrap();
        assert_eq!(e.extract(&lines(&["Istanbulçu"])).address, "Istanbulçu");
    }

    #[test]
    fn test_line_claimed_by_email_is_not_reused_for_phone() {
        let header = extractor().extract(&lines(&["jane@x.com +1 555 123 4567", "+44 20 7946 0958"]));
        assert_eq!(header.email, "jane@x.com +1 555 123 4567");
        assert_eq!(header.phone, "+44 20 7946 0958");
    }

    #[test]
    fn test_invalid_pattern_is_a_config_error() {
        let config = HeaderConfig {
            email_pattern: "([".to_string(),
            ..HeaderConfig::default()
        };
        let err = HeaderExtractor::new(&config).err().unwrap();
        assert!(matches!(err.downcast_ref::<ResumeError>(), Some(ResumeError::Config(_))));
    }
}
