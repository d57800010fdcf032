//! Speech output boundary
//!
//! The pipeline only needs somewhere to send spoken feedback. Synthesis
//! itself lives outside this crate; `ConsoleSpeech` prints instead.

use std::sync::Mutex;

/// Spoken when a transcript matches no command family
pub const NOT_RECOGNIZED: &str = "Command not recognized. Please try again.";

/// Spoken when a command still fails after its retries
pub const COMMAND_FAILED: &str = "Command failed. Please try again.";

pub trait SpeechOutput: Send + Sync {
    /// Speak `text`, replacing anything currently being spoken
    fn speak(&self, text: &str);
}

/// Prints spoken feedback to stdout
#[derive(Debug, Clone)]
pub struct ConsoleSpeech {
    enabled: bool,
}

impl ConsoleSpeech {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }
}

impl SpeechOutput for ConsoleSpeech {
    fn speak(&self, text: &str) {
        if self.enabled {
            println!("  🔊 {}", text);
        }
    }
}

/// Keeps everything spoken, in order
#[derive(Debug, Default)]
pub struct MemorySpeech {
    spoken: Mutex<Vec<String>>,
}

impl MemorySpeech {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn spoken(&self) -> Vec<String> {
        self.spoken
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

impl SpeechOutput for MemorySpeech {
    fn speak(&self, text: &str) {
        self.spoken
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(text.to_string());
    }
}
