//! Keyword scanner for skills and experience lines.
//!
//! Deliberately simple: a static vocabulary matched as substrings of the lowercased
//! text. The same scanner runs over CV text at upload and over JD text at match
//! time, so both sides of the overlap use one vocabulary.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use aho_corasick::AhoCorasick;

pub const SKILL_KEYWORDS: &[&str] = &[
    "python",
    "fastapi",
    "react",
    "javascript",
    "typescript",
    "html",
    "css",
    "linux",
    "sql",
    "mongodb",
    "docker",
    "git",
    "jira",
    "power bi",
    "excel",
    "data analysis",
    "networking",
    "troubleshooting",
    "azure",
    "aws",
];

const EXPERIENCE_MARKERS: &[&str] = &["assistant", "engineer", "developer", "intern", "manager"];

static SKILL_MATCHER: LazyLock<AhoCorasick> = LazyLock::new(|| {
    AhoCorasick::new(SKILL_KEYWORDS).expect("skill vocabulary builds a valid automaton")
});

/// Returns vocabulary skills found in `text`, in vocabulary order, capitalized.
///
/// Overlapping search: every keyword present is reported, even when its match
/// shares characters with another keyword's match.
pub fn extract_skills(text: &str) -> Vec<String> {
    let lowered = text.to_lowercase();
    let found: BTreeSet<usize> = SKILL_MATCHER
        .find_overlapping_iter(&lowered)
        .map(|m| m.pattern().as_usize())
        .collect();

    found
        .into_iter()
        .map(|idx| capitalize(SKILL_KEYWORDS[idx]))
        .collect()
}

/// Lines that look like job titles.
pub fn extract_experience(text: &str) -> Vec<String> {
    text.lines()
        .filter(|line| {
            let lowered = line.to_lowercase();
            EXPERIENCE_MARKERS.iter().any(|m| lowered.contains(m))
        })
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(String::from)
        .collect()
}

/// First character uppercase, the rest lowercase ("power bi" → "Power bi").
fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}
