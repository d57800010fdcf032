//! Intent matcher - maps a transcript to at most one browser intent
//!
//! Matching runs over the lowercased, trimmed transcript. Families from the
//! registry are tried in order and the first intent produced wins. No match
//! is a normal outcome and is returned as `None`.

use tracing::debug;

use crate::intent::Intent;
use crate::registry::REGISTRY;

/// Stateless transcript parser
#[derive(Debug, Clone, Copy, Default)]
pub struct IntentParser;

impl IntentParser {
    pub fn new() -> Self {
        Self
    }

    /// Parse a transcript into an intent
    pub fn parse(&self, transcript: &str) -> Option<Intent> {
        parse(transcript)
    }
}

/// Parse a transcript into an intent, `None` when nothing matches
pub fn parse(transcript: &str) -> Option<Intent> {
    let normalized = transcript.to_lowercase();
    let normalized = normalized.trim();
    if normalized.is_empty() {
        return None;
    }

    for family in &REGISTRY {
        if let Some(intent) = family.try_match(normalized) {
            debug!(family = %family.command, %intent, "transcript matched");
            return Some(intent);
        }
    }

    debug!(transcript = normalized, "no command family matched");
    None
}
