//! Local skill-keyword matching. Deterministic, no model call.

/// Reference skill vocabulary used when none is configured.
pub const DEFAULT_SKILL_VOCABULARY: [&str; 11] = [
    "python",
    "javascript",
    "html",
    "css",
    "sql",
    "java",
    "c++",
    "react",
    "node.js",
    "git",
    "linux",
];

pub fn default_vocabulary() -> Vec<String> {
    DEFAULT_SKILL_VOCABULARY
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// Result of matching a resume against the vocabulary.
#[derive(Debug, Clone, PartialEq)]
pub struct KeywordMatch {
    /// `matched.len() / vocabulary.len()`, or 0.0 for an empty vocabulary.
    pub score: f64,
    pub matched: Vec<String>,
}

impl KeywordMatch {
    pub fn rationale(&self) -> String {
        if self.matched.is_empty() {
            "No reference skills found".to_string()
        } else {
            format!("Matched: {}", self.matched.join(", "))
        }
    }
}

/// Counts vocabulary terms present as case-insensitive substrings of `text`.
pub fn keyword_match(text: &str, vocabulary: &[String]) -> KeywordMatch {
    if vocabulary.is_empty() {
        return KeywordMatch {
            score: 0.0,
            matched: vec![],
        };
    }

    let text_lower = text.to_lowercase();
    let matched: Vec<String> = vocabulary
        .iter()
        .filter(|term| text_lower.contains(&term.to_lowercase()))
        .cloned()
        .collect();

    KeywordMatch {
        score: matched.len() as f64 / vocabulary.len() as f64,
        matched,
    }
}
