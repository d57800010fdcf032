use serde::Deserialize;
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::warn;

pub const DEFAULT_CONFIG_PATH: &str = "config.toml";

#[derive(Debug, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub speech: SpeechConfig,
    #[serde(default)]
    pub dispatch: DispatchConfig,
    #[serde(default)]
    pub session: SessionConfig,
    #[serde(default)]
    pub browser: BrowserConfig,
}

// ============================================================================
// Speech Config
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SpeechConfig {
    /// Recognition language code
    #[serde(default = "default_language")]
    pub language: String,

    /// Speak outcome messages back to the user
    #[serde(default = "default_feedback")]
    pub feedback: bool,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            feedback: default_feedback(),
        }
    }
}

fn default_language() -> String {
    "en-US".into()
}

fn default_feedback() -> bool {
    true
}

// ============================================================================
// Dispatch Config
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct DispatchConfig {
    /// Attempts per intent, including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Pause between attempts
    #[serde(default = "default_retry_delay_ms")]
    pub retry_delay_ms: u64,

    /// Abandon pending retries when listening stops
    #[serde(default = "default_cancel_on_stop")]
    pub cancel_on_stop: bool,
}

impl Default for DispatchConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            cancel_on_stop: default_cancel_on_stop(),
        }
    }
}

impl DispatchConfig {
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }
}

fn default_max_attempts() -> u32 {
    2
}

fn default_retry_delay_ms() -> u64 {
    500
}

fn default_cancel_on_stop() -> bool {
    true
}

// ============================================================================
// Session Config
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct SessionConfig {
    /// Begin listening as soon as the session starts
    #[serde(default = "default_start_listening")]
    pub start_listening: bool,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            start_listening: default_start_listening(),
        }
    }
}

fn default_start_listening() -> bool {
    true
}

// ============================================================================
// Browser Config
// ============================================================================

#[derive(Debug, Deserialize)]
pub struct BrowserConfig {
    /// URL of the tab the simulated browser starts with
    #[serde(default = "default_home_url")]
    pub home_url: String,
}

impl Default for BrowserConfig {
    fn default() -> Self {
        Self {
            home_url: default_home_url(),
        }
    }
}

fn default_home_url() -> String {
    "https://www.google.com".into()
}

impl Config {
    /// Load from `config.toml` in the working directory
    pub fn load() -> Self {
        Self::load_from(Path::new(DEFAULT_CONFIG_PATH))
    }

    /// Load from a file, falling back to defaults if it is missing or invalid
    pub fn load_from(path: &Path) -> Self {
        if !path.exists() {
            return Config::default();
        }

        match fs::read_to_string(path) {
            Ok(text) => Self::parse(&text).unwrap_or_else(|e| {
                warn!(path = %path.display(), error = %e, "invalid config, using defaults");
                Config::default()
            }),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "unreadable config, using defaults");
                Config::default()
            }
        }
    }

    pub fn parse(text: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(text)
    }
}
