//! Narration script parsing.
//!
//! Sections are delimited by `##` (or deeper) markdown headings. A top-level
//! `#` line is treated as a comment. Body text before the first heading is
//! collected under a sentinel title.

/// Title given to body text that appears before any heading.
pub const DEFAULT_SECTION_TITLE: &str = "Introduction";

/// A titled block of narration text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Section {
    pub title: String,
    pub text: String,
}

/// Split narration text into ordered sections.
///
/// A section is emitted when the next heading starts, or at end of input if
/// it accumulated any text. Empty input yields no sections.
pub fn parse_narration(content: &str) -> Vec<Section> {
    let mut sections = Vec::new();
    let mut current_title = DEFAULT_SECTION_TITLE.to_string();
    let mut current_text: Vec<&str> = Vec::new();

    for raw in content.split('\n') {
        let line = raw.trim();

        if line.starts_with("##") {
            if !current_text.is_empty() {
                sections.push(Section {
                    title: current_title,
                    text: current_text.join("\n"),
                });
                current_text = Vec::new();
            }
            current_title = line.trim_start_matches('#').trim().to_string();
        } else if line.starts_with('#') {
            // Top-level heading, treated as a comment.
            continue;
        } else if !line.is_empty() {
            current_text.push(line);
        }
    }

    if !current_text.is_empty() {
        sections.push(Section {
            title: current_title,
            text: current_text.join("\n"),
        });
    }

    sections
}
