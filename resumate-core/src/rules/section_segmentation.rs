use super::engine::HeadingMatcher;
use crate::types::{SectionCategory, SectionSegment};
use tracing::debug;

/// Fold state threaded through the body lines.
#[derive(Debug, Default)]
struct SegmenterState {
    active: Option<SectionCategory>,
    buffer: Vec<String>,
    finished: Vec<SectionSegment>,
}

impl SegmenterState {
    fn step(mut self, line: &str, headings: &HeadingMatcher) -> Self {
        if let Some(category) = headings.match_line(line) {
            debug!("section heading '{line}' -> {category}");
            self.close_active();
            self.active = Some(category);
        } else if self.active.is_some() {
            self.buffer.push(line.to_string());
        } else {
            debug!("dropping line outside any section: {line}");
        }
        self
    }

    fn close_active(&mut self) {
        let lines = std::mem::take(&mut self.buffer);
        if let Some(category) = self.active {
            self.finished.push(SectionSegment { category, lines });
        }
    }

    fn finish(mut self) -> Vec<SectionSegment> {
        self.close_active();
        self.finished
    }
}

/// Route body lines into per-category segments.
///
/// Heading lines switch the active category and are never buffered. Lines
/// seen before the first heading are dropped. Every heading closes the
/// previous buffer, so one category may appear in several segments; the
/// field parsers decide how repeats combine.
pub fn segment_sections(body_lines: &[String], headings: &HeadingMatcher) -> Vec<SectionSegment> {
    body_lines
        .iter()
        .fold(SegmenterState::default(), |state, line| state.step(line, headings))
        .finish()
}
