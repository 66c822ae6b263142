//! Validated question text
//!
//! Questions arrive as free text from the messenger and end up inside a
//! generation prompt, so they are checked for markup injection and stripped of
//! control characters before use.

use std::{fmt, sync::LazyLock};

use aho_corasick::{AhoCorasick, AhoCorasickBuilder, MatchKind};
use serde::{Deserialize, Serialize};

use crate::errors::DomainError;

/// Markup and script-handler fragments that are never accepted
const DANGEROUS_PATTERNS: [&str; 7] = [
    "<script",
    "javascript:",
    "data:text/html",
    "vbscript:",
    "onload=",
    "onerror=",
    "onclick=",
];

static DANGEROUS_MATCHER: LazyLock<Option<AhoCorasick>> = LazyLock::new(|| {
    AhoCorasickBuilder::new()
        .ascii_case_insensitive(true)
        .match_kind(MatchKind::LeftmostFirst)
        .build(DANGEROUS_PATTERNS)
        .ok()
});

/// A question that passed validation and sanitisation
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QuestionText(String);

impl QuestionText {
    /// Maximum accepted length in characters
    pub const MAX_CHARS: usize = 1000;

    /// Validate and sanitise raw input
    pub fn parse(raw: &str) -> Result<Self, DomainError> {
        if raw.chars().count() > Self::MAX_CHARS {
            return Err(DomainError::InvalidQuestion(format!(
                "longer than {} characters",
                Self::MAX_CHARS
            )));
        }
        if raw.trim().is_empty() {
            return Err(DomainError::InvalidQuestion("empty".to_string()));
        }
        if contains_dangerous_pattern(raw) {
            return Err(DomainError::InvalidQuestion(
                "contains disallowed markup".to_string(),
            ));
        }
        if let Some(c) = raw.chars().find(|c| !is_allowed_char(*c)) {
            return Err(DomainError::InvalidQuestion(format!(
                "unsupported character {c:?}"
            )));
        }

        let sanitized = sanitize_text(raw);
        if sanitized.is_empty() {
            return Err(DomainError::InvalidQuestion("empty".to_string()));
        }
        Ok(Self(sanitized))
    }

    /// The sanitised text
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for QuestionText {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for QuestionText {
    type Error = DomainError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value)
    }
}

impl From<QuestionText> for String {
    fn from(q: QuestionText) -> Self {
        q.0
    }
}

/// Strip control characters (keeping tab and line breaks), cap the length and
/// trim surrounding whitespace
#[must_use]
pub fn sanitize_text(raw: &str) -> String {
    let cleaned: String = raw
        .chars()
        .filter(|c| !c.is_control() || matches!(c, '\t' | '\n' | '\r'))
        .take(QuestionText::MAX_CHARS)
        .collect();
    cleaned.trim().to_string()
}

fn contains_dangerous_pattern(raw: &str) -> bool {
    // "onclick =" must match the same as "onclick="
    let mut collapsed = String::with_capacity(raw.len());
    for c in raw.chars() {
        if c == '=' {
            while collapsed.ends_with(char::is_whitespace) {
                collapsed.pop();
            }
        }
        collapsed.push(c);
    }

    match DANGEROUS_MATCHER.as_ref() {
        Some(matcher) => matcher.is_match(&collapsed),
        None => {
            let lowered = collapsed.to_ascii_lowercase();
            DANGEROUS_PATTERNS.iter().any(|p| lowered.contains(p))
        },
    }
}

fn is_allowed_char(c: char) -> bool {
    c.is_alphanumeric() || c.is_whitespace() || c.is_ascii_punctuation()
}
