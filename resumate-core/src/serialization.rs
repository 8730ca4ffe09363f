use crate::storage::{keys, resume_entries};
use crate::types::*;
use anyhow::Result;
use std::collections::BTreeMap;

impl StructuredResume {
    pub fn to_versioned(&self) -> VersionedResume {
        VersionedResume::from(self.clone())
    }

    /// The resume exactly as the store would hold it: key → stored string
    pub fn to_key_layout(&self) -> Result<BTreeMap<String, String>> {
        let mut layout: BTreeMap<String, String> = resume_entries(self)?
            .into_iter()
            .map(|(key, value)| (key.to_string(), value))
            .collect();
        layout.insert(
            keys::CUSTOM_SECTIONS.to_string(),
            serde_json::to_string(&self.custom_sections)?,
        );
        Ok(layout)
    }

    pub fn render(&self, format: &str) -> Result<String> {
        let rendered = match format {
            "keys" => serde_json::to_string_pretty(&self.to_key_layout()?)?,
            "yaml" => serde_yaml::to_string(&self.to_versioned())?,
            "json" | _ => serde_json::to_string_pretty(&self.to_versioned())?,
        };
        Ok(rendered)
    }

    pub fn save_with_format(&self, path: &str, format: &str) -> Result<()> {
        std::fs::write(path, self.render(format)?)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_json_output_is_versioned_and_flat() {
        let rendered = StructuredResume::default().render("json").unwrap();
        let value: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        assert_eq!(value["schema_version"], SCHEMA_VERSION);
        assert_eq!(value["name"], PLACEHOLDER_NAME);
        assert!(value["skills"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_key_layout_holds_every_persisted_key() {
        let mut resume = StructuredResume::default();
        resume.skills = vec!["Rust".to_string()];
        let layout = resume.to_key_layout().unwrap();
        assert_eq!(layout.len(), keys::PARSER_OWNED.len() + 1);
        assert_eq!(layout[keys::SKILLS], r#"["Rust"]"#);
        assert_eq!(layout[keys::CUSTOM_SECTIONS], "[]");
    }

    #[test]
    fn test_yaml_output_parses_back() {
        let mut resume = StructuredResume::default();
        resume.summary = "Builds things.".to_string();
        let rendered = resume.render("yaml").unwrap();
        let back: VersionedResume = serde_yaml::from_str(&rendered).unwrap();
        assert_eq!(back.resume, resume);
    }

    #[test]
    fn test_unknown_format_falls_back_to_json() {
        let resume = StructuredResume::default();
        assert_eq!(resume.render("xml").unwrap(), resume.render("json").unwrap());
    }
}
