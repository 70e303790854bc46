//! Dialect normalization for dialogue scripts.
//!
//! Authors hand in speaker tags in several spellings (`Speaker 1:`,
//! `（話者１）`, bare `話者1:`, `A:`). One rewrite pass folds them all into
//! the canonical `[speaker]:` form. The pass is an ordered rule table so new
//! dialects are added as data, and it is idempotent: canonical text is left
//! untouched.

use std::sync::OnceLock;

use regex::Regex;

enum Rule {
    /// Regex rewrite applied to the whole text.
    Rewrite(Regex, &'static str),
    /// Fold full-width digits １..５ to their ASCII equivalents.
    FoldDigits,
}

fn rules() -> &'static [Rule] {
    static RULES: OnceLock<Vec<Rule>> = OnceLock::new();
    RULES.get_or_init(|| {
        vec![
            // Literal English speaker tags for two-person scripts.
            Rule::Rewrite(Regex::new(r"Speaker\s*([12]):").unwrap(), "[話者${1}]:"),
            // Parenthesized speaker markers, full-width and ASCII parens,
            // with or without a trailing colon.
            Rule::Rewrite(Regex::new(r"（(話者\d+)）[:：]?\s*").unwrap(), "[${1}]: "),
            Rule::Rewrite(Regex::new(r"\((話者\d+)\)[:：]?\s*").unwrap(), "[${1}]: "),
            // Speaker tags use digits, so digits are folded text-wide before
            // the remaining tag rules run.
            Rule::FoldDigits,
            // Bare tags at line start. Anchored because the regex crate has
            // no look-behind to exclude tags that are already bracketed.
            Rule::Rewrite(Regex::new(r"(?m)^(話者\d+)[:：]\s*").unwrap(), "[${1}]: "),
            Rule::Rewrite(Regex::new(r"(?m)^([A-Za-z])[:：]\s*").unwrap(), "[${1}]: "),
        ]
    })
}

const DIGIT_FOLDS: [(char, char); 5] = [
    ('１', '1'),
    ('２', '2'),
    ('３', '3'),
    ('４', '4'),
    ('５', '5'),
];

/// Rewrite dialect speaker tags into the canonical `[speaker]:` form.
pub fn normalize_dialects(text: &str) -> String {
    let mut out = text.to_string();
    for rule in rules() {
        match rule {
            Rule::Rewrite(pattern, replacement) => {
                out = pattern.replace_all(&out, *replacement).into_owned();
            }
            Rule::FoldDigits => {
                out = out
                    .chars()
                    .map(|c| {
                        DIGIT_FOLDS
                            .iter()
                            .find(|(wide, _)| *wide == c)
                            .map(|(_, ascii)| *ascii)
                            .unwrap_or(c)
                    })
                    .collect();
            }
        }
    }
    out
}
