// Main rules module - delegates to the pipeline stages
// - normalizer.rs: raw text -> trimmed non-empty lines
// - header_extraction.rs: header boundary + name/email/phone/address
// - section_segmentation.rs: body lines -> per-category segments
// - field_parsers.rs: segment flush into typed fields
// - engine.rs: RuleEngine wiring the stages together

pub mod engine;
pub mod field_parsers;
pub mod header_extraction;
pub mod normalizer;
pub mod section_segmentation;

pub use engine::{HeadingMatcher, RuleEngine};
pub use normalizer::normalize_lines;
