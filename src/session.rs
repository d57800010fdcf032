//! Session context - listening state shared by the speech and dispatch sides
//!
//! Holds the only process-wide state: whether we are listening, the
//! recognition language, and the cancel signal observed by in-flight retry
//! sequences. Pass `SharedSession` to whatever needs it.

use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::config::Config;

/// Cloneable flag checked between dispatch attempts
#[derive(Debug, Clone, Default)]
pub struct CancelSignal(Arc<AtomicBool>);

impl CancelSignal {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn raise(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn clear(&self) {
        self.0.store(false, Ordering::SeqCst);
    }

    pub fn is_raised(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

pub struct SessionContext {
    listening: AtomicBool,
    language: String,
    /// Raise the cancel signal when listening stops
    cancel_on_stop: bool,
    cancel: CancelSignal,
}

impl SessionContext {
    /// Create the session from config
    pub fn new(config: &Config) -> Arc<Self> {
        Arc::new(Self {
            listening: AtomicBool::new(config.session.start_listening),
            language: config.speech.language.clone(),
            cancel_on_stop: config.dispatch.cancel_on_stop,
            cancel: CancelSignal::new(),
        })
    }

    /// Start listening, returns true if the state changed
    pub fn start_listening(&self) -> bool {
        self.cancel.clear();
        !self.listening.swap(true, Ordering::SeqCst)
    }

    /// Stop listening, returns true if the state changed
    pub fn stop_listening(&self) -> bool {
        let was_listening = self.listening.swap(false, Ordering::SeqCst);
        if self.cancel_on_stop {
            self.cancel.raise();
        }
        was_listening
    }

    /// Toggle listening, returns the new state
    pub fn toggle_listening(&self) -> bool {
        if self.is_listening() {
            self.stop_listening();
            false
        } else {
            self.start_listening();
            true
        }
    }

    pub fn is_listening(&self) -> bool {
        self.listening.load(Ordering::SeqCst)
    }

    /// Recognition language code, e.g. "en-US"
    pub fn language(&self) -> &str {
        &self.language
    }

    pub fn cancel_signal(&self) -> CancelSignal {
        self.cancel.clone()
    }

    /// One-line status for display
    pub fn status(&self) -> String {
        format!(
            "Listening: {}, Language: {}, Cancel on stop: {}",
            if self.is_listening() { "on" } else { "off" },
            self.language,
            if self.cancel_on_stop { "yes" } else { "no" },
        )
    }
}

impl fmt::Debug for SessionContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SessionContext")
            .field("listening", &self.is_listening())
            .field("language", &self.language)
            .field("cancel_on_stop", &self.cancel_on_stop)
            .field("cancel_raised", &self.cancel.is_raised())
            .finish()
    }
}

/// Type alias for shared session
pub type SharedSession = Arc<SessionContext>;
