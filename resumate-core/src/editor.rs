//! Per-section edits applied straight to the store.
//!
//! Each operation rewrites only the keys of the section it edits; nothing here
//! reads or rewrites the whole resume.

use crate::storage::{keys, load_json_list, save_json, ResumeStore};
use crate::types::*;
use anyhow::Result;
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

/// Education form as a user fills it in. Empty strings mean "not given".
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct EducationForm {
    pub school_name: String,
    pub school_location: String,
    pub degree: String,
    pub grad_month: String,
    pub grad_year: String,
    pub still_enrolled: bool,
}

impl EducationForm {
    pub fn to_entry(&self) -> EducationEntry {
        let institution = if self.school_location.is_empty() {
            self.school_name.clone()
        } else {
            format!("{}, {}", self.school_name, self.school_location)
        };

        let year = if self.still_enrolled {
            "Present".to_string()
        } else if !self.grad_month.is_empty() && !self.grad_year.is_empty() {
            format!("{} {}", self.grad_month, self.grad_year)
        } else {
            String::new()
        };

        EducationEntry {
            degree: self.degree.clone(),
            institution,
            year,
        }
    }
}

pub struct ResumeEditor<'a> {
    store: &'a dyn ResumeStore,
}

impl<'a> ResumeEditor<'a> {
    pub fn new(store: &'a dyn ResumeStore) -> Self {
        Self { store }
    }

    pub fn update_header(&self, header: &HeaderFields) -> Result<()> {
        self.store.set_many(&[
            (keys::NAME, header.name.clone()),
            (keys::EMAIL, header.email.clone()),
            (keys::PHONE, header.phone.clone()),
            (keys::ADDRESS, header.address.clone()),
        ])?;
        debug!("header updated");
        Ok(())
    }

    pub fn update_summary(&self, summary: &str) -> Result<()> {
        self.store.set(keys::SUMMARY, summary)
    }

    /// Comma-separated input; blank items are dropped. Returns what was stored.
    pub fn update_skills_from_input(&self, input: &str) -> Result<Vec<String>> {
        let skills: Vec<String> = input
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        save_json(self.store, keys::SKILLS, &skills)?;
        Ok(skills)
    }

    pub fn update_experience(&self, entries: &[ExperienceEntry]) -> Result<()> {
        save_json(self.store, keys::EXPERIENCE, entries)
    }

    pub fn update_certifications(&self, certifications: &[String]) -> Result<()> {
        save_json(self.store, keys::CERTIFICATIONS, certifications)
    }

    /// Replaces the stored education list with the single entry the form describes.
    pub fn update_education_from_form(&self, form: &EducationForm) -> Result<EducationEntry> {
        let entry = form.to_entry();
        save_json(self.store, keys::EDUCATION, std::slice::from_ref(&entry))?;
        Ok(entry)
    }

    pub fn custom_sections(&self) -> Result<Vec<CustomSection>> {
        load_json_list(self.store, keys::CUSTOM_SECTIONS)
    }

    /// Append a new, empty section with a fresh id.
    pub fn add_custom_section(&self, name: &str) -> Result<CustomSection> {
        let section = CustomSection {
            id: Uuid::new_v4().to_string(),
            name: name.to_string(),
            content: String::new(),
        };
        let mut sections = self.custom_sections()?;
        sections.push(section.clone());
        save_json(self.store, keys::CUSTOM_SECTIONS, &sections)?;
        info!("added custom section '{}' ({})", section.name, section.id);
        Ok(section)
    }

    /// Replace the section with the same id, or append it when the id is new.
    pub fn upsert_custom_section(&self, section: &CustomSection) -> Result<()> {
        let mut sections = self.custom_sections()?;
        match sections.iter_mut().find(|s| s.id == section.id) {
            Some(existing) => *existing = section.clone(),
            None => sections.push(section.clone()),
        }
        save_json(self.store, keys::CUSTOM_SECTIONS, &sections)
    }

    /// Returns false when no section had that id.
    pub fn remove_custom_section(&self, id: &str) -> Result<bool> {
        let mut sections = self.custom_sections()?;
        let before = sections.len();
        sections.retain(|s| s.id != id);
        if sections.len() == before {
            return Ok(false);
        }
        save_json(self.store, keys::CUSTOM_SECTIONS, &sections)?;
        Ok(true)
    }
}
