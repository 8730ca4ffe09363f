//! Pipeline tests: fixture resumes in, structured fields and store keys out.
//!
//! Fixtures live in `test_fixtures/`:
//!
//! - `resumes/`: plain-text resumes fed through the full processor
//! - `expected/`: the StructuredResume each resume must produce
//! - `configs/`: YAML overrides
//!
//! Everything runs against text inputs and in-memory or temp-dir stores.

use resumate_core::storage::{keys, load_resume};
use resumate_core::*;
use std::path::PathBuf;

// ============================================================================
// Fixture helpers
// ============================================================================

fn fixtures_dir() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("test_fixtures")
}

fn resume_path(name: &str) -> PathBuf {
    fixtures_dir().join("resumes").join(format!("{name}.txt"))
}

fn load_resume_text(name: &str) -> String {
    let path = resume_path(name);
    std::fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("Missing fixture: {}", path.display()))
}

fn load_expected(name: &str) -> StructuredResume {
    let path = fixtures_dir().join("expected").join(format!("{name}.json"));
    let contents = std::fs::read_to_string(&path)
        .unwrap_or_else(|_| panic!("Missing fixture: {}", path.display()));
    serde_json::from_str(&contents).expect("Invalid expected resume JSON")
}

fn memory_processor(config: ParsingConfig) -> (ResumeProcessor, MemoryStorage) {
    let store = MemoryStorage::new();
    let processor = ResumeProcessor::new(Box::new(store.clone()), config).unwrap();
    (processor, store)
}

// ============================================================================
// Parsing: fixture resumes
// ============================================================================

mod parsing {
    use super::*;

    #[test]
    fn test_software_engineer_matches_expected() {
        let (processor, _) = memory_processor(ParsingConfig::default());
        let resume = processor.parse_text(&load_resume_text("software_engineer"));
        assert_eq!(resume, load_expected("software_engineer"));
    }

    #[test]
    fn test_no_headings_is_header_only() {
        let (processor, _) = memory_processor(ParsingConfig::default());
        let resume = processor.parse_text(&load_resume_text("no_headings"));
        assert_eq!(resume, load_expected("no_headings"));
        assert!(resume.has_empty_body());
    }

    #[test]
    fn test_fallback_window_excludes_ninth_line() {
        let (processor, _) = memory_processor(ParsingConfig::default());
        let stages = processor
            .capture_stages(load_resume_text("no_headings").as_bytes(), "no_headings.txt")
            .unwrap();
        assert_eq!(stages.lines.len(), 9);
        assert_eq!(stages.boundary.index, 8);
        assert!(!stages.boundary.detected_heading);
        assert!(stages.segments.is_empty());
    }

    #[test]
    fn test_crlf_and_lf_inputs_parse_identically() {
        let (processor, _) = memory_processor(ParsingConfig::default());
        let lf = load_resume_text("software_engineer");
        let crlf = lf.replace('\n', "\r\n");
        assert_eq!(processor.parse_text(&lf), processor.parse_text(&crlf));
    }

    #[test]
    fn test_heading_on_first_line_gives_placeholder_header() {
        let (processor, _) = memory_processor(ParsingConfig::default());
        let resume = processor.parse_text("SUMMARY\nJane Doe\njane@x.com");
        assert_eq!(resume.header, HeaderFields::default());
        assert_eq!(resume.header.name, "FIRST NAME SURNAME");
        assert_eq!(resume.summary, "Jane Doe\njane@x.com");
    }

    #[test]
    fn test_repeated_heading_last_segment_wins() {
        let (processor, _) = memory_processor(ParsingConfig::default());
        let resume = processor.parse_text(
            "Jane Doe\nSkills\nGo, Rust\nExperience\nEngineer\nAcme\nSkills\nPython\nEducation\nBSc\nMIT\nExperience\nManager\nGlobex",
        );
        assert_eq!(resume.skills, vec!["Python"]);
        assert_eq!(resume.experience.len(), 1);
        assert_eq!(resume.experience[0].title, "Manager");
        assert_eq!(resume.experience[0].company, "Globex");
        assert_eq!(resume.education[0].institution, "MIT");
    }

    #[test]
    fn test_yaml_config_extends_address_keywords() {
        let text = load_resume_text("istanbul");

        let (default_processor, _) = memory_processor(ParsingConfig::default());
        let default_resume = default_processor.parse_text(&text);
        assert_eq!(default_resume.header.address, "");

        let config_path = fixtures_dir().join("configs").join("istanbul.yaml");
        let config = ParsingConfig::load_from_file(config_path.to_str().unwrap()).unwrap();
        let (processor, _) = memory_processor(config);
        let resume = processor.parse_text(&text);

        assert_eq!(resume.header.name, "Ayse Yilmaz");
        assert_eq!(resume.header.email, "ayse@example.com.tr");
        assert_eq!(resume.header.address, "Kadikoy, Istanbul");
        assert_eq!(resume.skills, vec!["Python", "Django"]);
    }
}

// ============================================================================
// Persistence: processor + store + editor
// ============================================================================

mod persistence {
    use super::*;

    #[test]
    fn test_processed_file_round_trips_through_file_store() {
        let temp_dir = tempfile::tempdir().unwrap();
        let store_path = temp_dir.path().join("store.json");

        let mut processor =
            ResumeProcessor::new_cli(&store_path, None, ParsingConfig::default()).unwrap();
        let resume = processor.process_file(&resume_path("software_engineer")).unwrap();

        let reopened = FileStorage::new(&store_path).unwrap();
        assert_eq!(load_resume(&reopened).unwrap(), resume);
        assert_eq!(
            reopened.get(keys::CERTIFICATIONS).unwrap().as_deref(),
            Some(r#"["AWS Solutions Architect","CKA"]"#)
        );
    }

    #[test]
    fn test_reupload_overwrites_parser_keys_but_keeps_edits_elsewhere() {
        let (mut processor, store) = memory_processor(ParsingConfig::default());
        processor
            .process_bytes(load_resume_text("software_engineer").as_bytes(), "a.txt")
            .unwrap();

        let editor = ResumeEditor::new(&store);
        let section = editor.add_custom_section("Open Source").unwrap();
        editor
            .upsert_custom_section(&CustomSection {
                content: "resumate maintainer".to_string(),
                ..section
            })
            .unwrap();
        Session::new(&store).login("alex.morgan@example.com").unwrap();

        processor
            .process_bytes(load_resume_text("no_headings").as_bytes(), "b.txt")
            .unwrap();

        let stored = processor.load_stored().unwrap();
        assert_eq!(stored.header.name, "Jordan Lee");
        assert!(stored.experience.is_empty());
        assert_eq!(stored.custom_sections.len(), 1);
        assert_eq!(stored.custom_sections[0].content, "resumate maintainer");
        assert_eq!(
            Session::new(&store).display_name().unwrap(),
            "alex.morgan@example.com"
        );
    }

    #[test]
    fn test_editor_changes_are_visible_to_load_stored() {
        let (mut processor, store) = memory_processor(ParsingConfig::default());
        processor
            .process_bytes(load_resume_text("software_engineer").as_bytes(), "cv.txt")
            .unwrap();

        let editor = ResumeEditor::new(&store);
        editor.update_summary("Payments and ledgers.").unwrap();
        editor.update_skills_from_input("Rust, Kafka").unwrap();
        editor
            .update_education_from_form(&EducationForm {
                school_name: "University of Toronto".to_string(),
                school_location: "Toronto".to_string(),
                degree: "BSc Computer Science".to_string(),
                grad_month: "May".to_string(),
                grad_year: "2015".to_string(),
                still_enrolled: false,
            })
            .unwrap();

        let stored = processor.load_stored().unwrap();
        assert_eq!(stored.summary, "Payments and ledgers.");
        assert_eq!(stored.skills, vec!["Rust", "Kafka"]);
        assert_eq!(stored.education[0].institution, "University of Toronto, Toronto");
        assert_eq!(stored.education[0].year, "May 2015");
        // Untouched by the edits
        assert_eq!(stored.experience.len(), 2);
        assert_eq!(stored.header.name, "Alex Morgan");
    }

    #[test]
    fn test_key_layout_output_matches_store() {
        let (mut processor, store) = memory_processor(ParsingConfig::default());
        let resume = processor
            .process_bytes(load_resume_text("software_engineer").as_bytes(), "cv.txt")
            .unwrap();

        let mut layout = resume.to_key_layout().unwrap();
        layout.remove(keys::CUSTOM_SECTIONS);
        assert_eq!(layout, store.snapshot());
    }
}
