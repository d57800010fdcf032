//! Retry wrapper around command execution
//!
//! Replays one already-parsed intent against an executor. The transcript is
//! never parsed again. The first attempt always runs; between attempts the
//! cancel signal is checked on both sides of the delay.

use std::time::Duration;
use tracing::{info, warn};

use crate::config::DispatchConfig;
use crate::executor::{CommandExecutor, ExecutionResult};
use crate::intent::Intent;
use crate::session::CancelSignal;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RetryPolicy {
    /// Total attempts including the first; zero behaves as one
    pub max_attempts: u32,
    /// Fixed pause between attempts
    pub delay: Duration,
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self {
            max_attempts: 2,
            delay: Duration::from_millis(500),
        }
    }
}

impl From<&DispatchConfig> for RetryPolicy {
    fn from(config: &DispatchConfig) -> Self {
        Self {
            max_attempts: config.max_attempts,
            delay: config.retry_delay(),
        }
    }
}

/// Execute `intent`, retrying on failure
///
/// Returns the first success, or the last failure once attempts run out or
/// the cancel signal is raised.
pub async fn execute_with_retry<E>(
    executor: &E,
    intent: &Intent,
    policy: &RetryPolicy,
    cancel: &CancelSignal,
) -> ExecutionResult
where
    E: CommandExecutor + ?Sized,
{
    let attempts = policy.max_attempts.max(1);
    let mut attempt = 1;

    loop {
        let error = match executor.execute(intent).await {
            Ok(outcome) => return Ok(outcome),
            Err(e) => e,
        };

        if attempt >= attempts {
            return Err(error);
        }
        warn!(attempt, command = %intent.command(), error = %error, "command attempt failed");

        if cancel.is_raised() {
            info!(attempt, "retry cancelled");
            return Err(error);
        }
        tokio::time::sleep(policy.delay).await;
        if cancel.is_raised() {
            info!(attempt, "retry cancelled");
            return Err(error);
        }

        attempt += 1;
    }
}
