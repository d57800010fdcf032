//! Voice-driven browser control
//!
//! Turns a spoken transcript into at most one browser intent, dispatches it
//! to an executor with retries, and speaks the result back.

pub mod browser;
pub mod config;
pub mod console;
pub mod executor;
pub mod intent;
pub mod matcher;
pub mod pipeline;
pub mod registry;
pub mod retry;
pub mod selector;
pub mod session;
pub mod speech;
pub mod url;

pub use browser::SimulatedBrowser;
pub use config::Config;
pub use executor::{CommandExecutor, ExecutionError, ExecutionOutcome, ExecutionResult};
pub use intent::{Command, Intent, WireIntent};
pub use matcher::{IntentParser, parse};
pub use pipeline::{Pipeline, PipelineEvent};
pub use retry::{RetryPolicy, execute_with_retry};
pub use session::{CancelSignal, SessionContext, SharedSession};
pub use speech::SpeechOutput;
