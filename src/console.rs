//! Console front end - stdin transcripts, slash commands, event lines
//!
//! Each stdin line stands in for one final transcript from the recognizer.
//! Lines starting with `/` are session controls instead.

use chrono::{DateTime, Local};
use std::io::{self, BufRead, Write};
use std::thread;

use crate::pipeline::PipelineEvent;
use crate::registry::help_text;
use crate::session::SharedSession;

/// Result of a slash command
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConsoleAction {
    /// Handled, with a line to show the user
    Handled(String),
    /// Leave the session
    Shutdown,
}

/// Handle `/start`, `/stop`, `/status`, `/help` and `/quit`
///
/// Returns `None` when the input is not a slash command.
pub fn process_slash_command(input: &str, session: &SharedSession) -> Option<ConsoleAction> {
    let input = input.trim();
    let cmd = input.strip_prefix('/')?.to_lowercase();

    let action = match cmd.as_str() {
        "start" | "listen" => ConsoleAction::Handled(if session.start_listening() {
            "Listening".to_string()
        } else {
            "Already listening".to_string()
        }),
        "stop" => ConsoleAction::Handled(if session.stop_listening() {
            "Stopped listening".to_string()
        } else {
            "Not listening".to_string()
        }),
        "status" => ConsoleAction::Handled(session.status()),
        "help" | "?" => ConsoleAction::Handled(format!(
            "{}\nSession: /start /stop /status /help /quit",
            help_text().trim_end()
        )),
        "quit" | "exit" | "q" => ConsoleAction::Shutdown,
        _ => ConsoleAction::Handled(format!("Unknown command: {}. Try /help", input)),
    };
    Some(action)
}

/// Read stdin lines on a background thread
///
/// The channel disconnects at end of input.
pub fn spawn_stdin_reader() -> flume::Receiver<String> {
    let (tx, rx) = flume::unbounded();
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            let line = line.trim().to_string();
            if line.is_empty() {
                continue;
            }
            if tx.send(line).is_err() {
                break;
            }
        }
    });
    rx
}

/// One display line for a pipeline event
pub fn format_event(event: &PipelineEvent, at: DateTime<Local>) -> String {
    let stamp = at.format("%H:%M:%S");
    match event {
        PipelineEvent::Heard(text) => format!("\x1b[90m[{}]\x1b[0m > {}", stamp, text),
        PipelineEvent::Ignored(text) => {
            format!("\x1b[90m[{}] (not listening) {}\x1b[0m", stamp, text)
        }
        PipelineEvent::NotRecognized(_) => {
            format!("\x1b[90m[{}]\x1b[0m \x1b[33m? not recognized\x1b[0m", stamp)
        }
        PipelineEvent::Executed { intent, outcome } => format!(
            "\x1b[90m[{}]\x1b[0m \x1b[32m✓ {}\x1b[0m \x1b[90m({})\x1b[0m",
            stamp, outcome.message, intent
        ),
        PipelineEvent::Failed { intent, error } => format!(
            "\x1b[90m[{}]\x1b[0m \x1b[31m✗ {}\x1b[0m \x1b[90m({})\x1b[0m",
            stamp, error, intent
        ),
    }
}

pub fn render_event(event: &PipelineEvent) {
    println!("{}", format_event(event, Local::now()));
    io::stdout().flush().ok();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Config;
    use crate::executor::{ExecutionError, ExecutionOutcome};
    use crate::intent::Intent;
    use crate::session::SessionContext;
    use chrono::TimeZone;

    #[test]
    fn test_not_a_slash_command() {
        let session = SessionContext::new(&Config::default());
        assert_eq!(process_slash_command("open github", &session), None);
    }

    #[test]
    fn test_start_stop() {
        let session = SessionContext::new(&Config::default());
        assert_eq!(
            process_slash_command("/stop", &session),
            Some(ConsoleAction::Handled("Stopped listening".to_string()))
        );
        assert!(!session.is_listening());
        assert_eq!(
            process_slash_command("/STOP", &session),
            Some(ConsoleAction::Handled("Not listening".to_string()))
        );
        assert_eq!(
            process_slash_command(" /start ", &session),
            Some(ConsoleAction::Handled("Listening".to_string()))
        );
        assert!(session.is_listening());
    }

    #[test]
    fn test_quit_and_unknown() {
        let session = SessionContext::new(&Config::default());
        assert_eq!(
            process_slash_command("/quit", &session),
            Some(ConsoleAction::Shutdown)
        );
        assert_eq!(
            process_slash_command("/dance", &session),
            Some(ConsoleAction::Handled(
                "Unknown command: /dance. Try /help".to_string()
            ))
        );
    }

    #[test]
    fn test_help_lists_families() {
        let session = SessionContext::new(&Config::default());
        let Some(ConsoleAction::Handled(text)) = process_slash_command("/help", &session) else {
            panic!("expected help text");
        };
        assert!(text.contains("openTab"));
        assert!(text.contains("/quit"));
    }

    #[test]
    fn test_format_event() {
        let at = Local.with_ymd_and_hms(2024, 5, 1, 9, 30, 5).single().unwrap();
        let line = format_event(
            &PipelineEvent::Executed {
                intent: Intent::ReloadTab,
                outcome: ExecutionOutcome::new("Tab reloaded"),
            },
            at,
        );
        assert!(line.contains("[09:30:05]"));
        assert!(line.contains("Tab reloaded"));
        assert!(line.contains("reloadTab"));

        let line = format_event(
            &PipelineEvent::Failed {
                intent: Intent::CloseTab,
                error: ExecutionError::failed("No tab to close"),
            },
            at,
        );
        assert!(line.contains("No tab to close"));
    }
}
