//! Dialogue script parsing.

use std::collections::BTreeSet;
use std::sync::OnceLock;

use regex::Regex;

use crate::normalize::normalize_dialects;

/// A single spoken line, immutable once parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DialogueLine {
    pub speaker: String,
    pub text: String,
    /// 1-based position in the original input, counting skipped lines too.
    pub line_number: u32,
}

/// A parsed dialogue script in document order.
#[derive(Debug, Clone, Default)]
pub struct DialogueScript {
    pub lines: Vec<DialogueLine>,
    pub speakers: BTreeSet<String>,
}

impl DialogueScript {
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn lines_by_speaker<'a>(&'a self, speaker: &'a str) -> impl Iterator<Item = &'a DialogueLine> {
        self.lines.iter().filter(move |l| l.speaker == speaker)
    }
}

/// Line patterns in precedence order; first match wins.
fn patterns() -> &'static [Regex] {
    static PATTERNS: OnceLock<Vec<Regex>> = OnceLock::new();
    PATTERNS.get_or_init(|| {
        vec![
            Regex::new(r"^\[([^\]]+)\]\s*[:：]\s*(.+)$").unwrap(),
            Regex::new(r"^【([^】]+)】\s*[:：]\s*(.+)$").unwrap(),
            Regex::new(r"^([^:：\[\]【】]+)\s*[:：]\s*(.+)$").unwrap(),
        ]
    })
}

/// Parse a dialogue script.
///
/// Lines that are empty, start with `#`, or match no speaker pattern are
/// skipped. Matches with an empty speaker or empty text are discarded rather
/// than stored. Empty input yields an empty script; deciding whether that is
/// an error is the caller's job.
pub fn parse_dialogue(content: &str) -> DialogueScript {
    let content = normalize_dialects(content);

    let mut script = DialogueScript::default();

    for (index, raw) in content.split('\n').enumerate() {
        let line = raw.trim();
        if line.is_empty() || line.starts_with('#') {
            continue;
        }

        for pattern in patterns() {
            if let Some(captures) = pattern.captures(line) {
                let speaker = captures[1].trim();
                let text = captures[2].trim();
                if !speaker.is_empty() && !text.is_empty() {
                    script.speakers.insert(speaker.to_string());
                    script.lines.push(DialogueLine {
                        speaker: speaker.to_string(),
                        text: text.to_string(),
                        line_number: index as u32 + 1,
                    });
                }
                break;
            }
        }
    }

    script
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_bracketed_lines_in_order() {
        let script = parse_dialogue("[A]: hi\n[B]: bye\n[A]: ok");
        assert_eq!(script.lines.len(), 3);
        assert_eq!(
            script.speakers.iter().collect::<Vec<_>>(),
            vec!["A", "B"]
        );
        let numbers: Vec<u32> = script.lines.iter().map(|l| l.line_number).collect();
        assert_eq!(numbers, vec![1, 2, 3]);
        assert_eq!(script.lines[1].speaker, "B");
        assert_eq!(script.lines[1].text, "bye");
    }

    #[test]
    fn empty_input_is_an_empty_script() {
        assert!(parse_dialogue("").is_empty());
    }

    #[test]
    fn skips_comments_blanks_and_prose() {
        let script = parse_dialogue("# title\n\njust prose without a tag\n[A]: hi");
        assert_eq!(script.lines.len(), 1);
        // line_number counts every input line, including the skipped ones
        assert_eq!(script.lines[0].line_number, 4);
    }

    #[test]
    fn full_width_brackets_and_colons() {
        let script = parse_dialogue("【話者1】: こんにちは\n[話者2]：やあ");
        assert_eq!(script.lines.len(), 2);
        assert!(script.speakers.contains("話者1"));
        assert!(script.speakers.contains("話者2"));
    }

    #[test]
    fn bare_speaker_must_not_contain_delimiters() {
        let script = parse_dialogue("ナレーター: 昔々あるところに");
        assert_eq!(script.lines[0].speaker, "ナレーター");
    }

    #[test]
    fn empty_speaker_or_text_is_discarded() {
        let script = parse_dialogue("[ ]: hi\n[A]:   ");
        assert!(script.is_empty());
    }

    #[test]
    fn dialect_invariance() {
        let expected = parse_dialogue("[話者1]: こんにちは\n[話者2]: やあ");
        for dialect in [
            "Speaker 1: こんにちは\nSpeaker 2: やあ",
            "話者1: こんにちは\n話者2: やあ",
            "（話者1）こんにちは\n（話者2）やあ",
            "(話者1): こんにちは\n(話者2): やあ",
            "話者１：こんにちは\n話者２：やあ",
        ] {
            let script = parse_dialogue(dialect);
            assert_eq!(script.speakers, expected.speakers, "dialect: {dialect}");
            let texts: Vec<&str> = script.lines.iter().map(|l| l.text.as_str()).collect();
            assert_eq!(texts, vec!["こんにちは", "やあ"], "dialect: {dialect}");
        }
    }

    #[test]
    fn lines_by_speaker_filters_in_order() {
        let script = parse_dialogue("[A]: one\n[B]: two\n[A]: three");
        let texts: Vec<&str> = script.lines_by_speaker("A").map(|l| l.text.as_str()).collect();
        assert_eq!(texts, vec!["one", "three"]);
    }
}
