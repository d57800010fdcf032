//! Element descriptions to DOM selectors
//!
//! "the submit button" or "email field" become selector expressions the
//! executor's query layer can try. Keyword detection is case-insensitive but
//! the residual text keeps the speaker's casing.

use regex::Regex;
use std::sync::LazyLock;

static BUTTON_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)button").expect("static regex must compile"));
static LINK_WORD: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)link").expect("static regex must compile"));
static INPUT_WORDS: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(input|field|box)").expect("static regex must compile"));

/// Element kinds recognized from a description
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementKind {
    Button,
    Link,
    Input,
    /// No keyword found, description is used as-is
    Raw,
}

impl ElementKind {
    /// Classify a description by its first matching keyword family
    pub fn detect(description: &str) -> Self {
        let lower = description.to_lowercase();
        if lower.contains("button") {
            ElementKind::Button
        } else if lower.contains("link") {
            ElementKind::Link
        } else if ["input", "field", "box"].iter().any(|k| lower.contains(k)) {
            ElementKind::Input
        } else {
            ElementKind::Raw
        }
    }
}

/// Build a selector expression for a spoken element description
///
/// Never fails. Unrecognized descriptions pass through trimmed, and the
/// caller's query layer decides whether anything matches.
pub fn element_to_selector(description: &str) -> String {
    match ElementKind::detect(description) {
        ElementKind::Button => {
            let text = residual(&BUTTON_WORD, description);
            if text.is_empty() {
                "button".to_string()
            } else {
                format!(
                    r#"button:contains("{t}"), [aria-label*="{t}"], button[title*="{t}"]"#,
                    t = text
                )
            }
        }
        ElementKind::Link => {
            let text = residual(&LINK_WORD, description);
            if text.is_empty() {
                "a".to_string()
            } else {
                format!(r#"a:contains("{t}"), a[aria-label*="{t}"]"#, t = text)
            }
        }
        ElementKind::Input => {
            let text = residual(&INPUT_WORDS, description);
            if text.is_empty() {
                "input".to_string()
            } else {
                format!(
                    r#"input[name*="{t}"], input[placeholder*="{t}"], input[aria-label*="{t}"]"#,
                    t = text
                )
            }
        }
        ElementKind::Raw => description.trim().to_string(),
    }
}

/// Description with every trigger keyword removed, trimmed
fn residual(keyword: &Regex, description: &str) -> String {
    keyword.replace_all(description, "").trim().to_string()
}
