//! Command execution contract
//!
//! An executor performs the side effect behind each intent. The dispatch
//! table is the exhaustive match in [`CommandExecutor::execute`]; string
//! command names only exist at the wire boundary.

use async_trait::async_trait;
use thiserror::Error;

use crate::intent::{
    BookmarkAction, Intent, ScrollDirection, SearchEngine, TabDirection, WindowAction, WireIntent,
};

/// Successful execution, with a message fit for display and speech
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    pub message: String,
}

impl ExecutionOutcome {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

impl Default for ExecutionOutcome {
    fn default() -> Self {
        Self::new("Command executed successfully")
    }
}

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ExecutionError {
    #[error("Unknown command: {0}")]
    UnknownCommand(String),

    #[error("Missing parameter '{param}' for {command}")]
    MissingParam {
        command: &'static str,
        param: &'static str,
    },

    #[error("Invalid value for '{param}': {value}")]
    InvalidParam { param: &'static str, value: String },

    /// Executor-side failure with a human readable reason
    #[error("{0}")]
    Failed(String),
}

impl ExecutionError {
    pub fn failed(message: impl Into<String>) -> Self {
        ExecutionError::Failed(message.into())
    }
}

pub type ExecutionResult = Result<ExecutionOutcome, ExecutionError>;

/// Something that can carry out browser intents
///
/// Implementors provide one handler per command. Handlers may be called
/// concurrently from independent dispatch tasks.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    async fn open_tab(&self, url: &str) -> ExecutionResult;
    async fn close_tab(&self) -> ExecutionResult;
    async fn switch_tab(&self, direction: TabDirection) -> ExecutionResult;
    async fn reload_tab(&self) -> ExecutionResult;
    async fn navigate(&self, url: &str) -> ExecutionResult;
    async fn search(&self, query: &str, engine: SearchEngine) -> ExecutionResult;
    async fn scroll(&self, direction: ScrollDirection, amount: u32) -> ExecutionResult;
    async fn click(&self, selector: &str) -> ExecutionResult;
    async fn fill(&self, selector: &str, value: &str) -> ExecutionResult;
    async fn bookmark(&self, action: BookmarkAction) -> ExecutionResult;
    async fn window(&self, action: WindowAction) -> ExecutionResult;

    /// Route an intent to its handler
    async fn execute(&self, intent: &Intent) -> ExecutionResult {
        match intent {
            Intent::OpenTab { url } => self.open_tab(url).await,
            Intent::CloseTab => self.close_tab().await,
            Intent::SwitchTab { direction } => self.switch_tab(*direction).await,
            Intent::ReloadTab => self.reload_tab().await,
            Intent::Navigate { url } => self.navigate(url).await,
            Intent::Search { query, engine } => self.search(query, *engine).await,
            Intent::Scroll { direction, amount } => self.scroll(*direction, *amount).await,
            Intent::Click { selector } => self.click(selector).await,
            Intent::Fill { selector, value } => self.fill(selector, value).await,
            Intent::Bookmark { action } => self.bookmark(*action).await,
            Intent::Window { action } => self.window(*action).await,
        }
    }

    /// Execute an untyped intent received from a host
    async fn execute_wire(&self, wire: WireIntent) -> ExecutionResult {
        let intent = Intent::try_from(wire)?;
        self.execute(&intent).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Records the handler name for each call
    #[derive(Default)]
    struct Recorder {
        calls: Mutex<Vec<String>>,
    }

    impl Recorder {
        fn hit(&self, name: &str) -> ExecutionResult {
            self.calls.lock().unwrap().push(name.to_string());
            Ok(ExecutionOutcome::new(name))
        }
    }

    #[async_trait]
    impl CommandExecutor for Recorder {
        async fn open_tab(&self, url: &str) -> ExecutionResult {
            self.hit(&format!("open_tab {}", url))
        }
        async fn close_tab(&self) -> ExecutionResult {
            self.hit("close_tab")
        }
        async fn switch_tab(&self, direction: TabDirection) -> ExecutionResult {
            self.hit(&format!("switch_tab {}", direction))
        }
        async fn reload_tab(&self) -> ExecutionResult {
            self.hit("reload_tab")
        }
        async fn navigate(&self, url: &str) -> ExecutionResult {
            self.hit(&format!("navigate {}", url))
        }
        async fn search(&self, query: &str, engine: SearchEngine) -> ExecutionResult {
            self.hit(&format!("search {} {}", engine, query))
        }
        async fn scroll(&self, direction: ScrollDirection, amount: u32) -> ExecutionResult {
            self.hit(&format!("scroll {} {}", direction, amount))
        }
        async fn click(&self, selector: &str) -> ExecutionResult {
            self.hit(&format!("click {}", selector))
        }
        async fn fill(&self, selector: &str, value: &str) -> ExecutionResult {
            self.hit(&format!("fill {} {}", selector, value))
        }
        async fn bookmark(&self, action: BookmarkAction) -> ExecutionResult {
            self.hit(&format!("bookmark {}", action))
        }
        async fn window(&self, action: WindowAction) -> ExecutionResult {
            self.hit(&format!("window {}", action))
        }
    }

    #[tokio::test]
    async fn test_dispatch_routes_to_handler() {
        let recorder = Recorder::default();
        let outcome = recorder
            .execute(&Intent::Scroll {
                direction: ScrollDirection::Up,
                amount: 500,
            })
            .await
            .unwrap();
        assert_eq!(outcome.message, "scroll up 500");

        recorder.execute(&Intent::CloseTab).await.unwrap();
        assert_eq!(
            *recorder.calls.lock().unwrap(),
            vec!["scroll up 500".to_string(), "close_tab".to_string()]
        );
    }

    #[tokio::test]
    async fn test_execute_wire_unknown_command() {
        let recorder = Recorder::default();
        let wire = WireIntent {
            command: "print".to_string(),
            params: Default::default(),
        };
        let err = recorder.execute_wire(wire).await.unwrap_err();
        assert_eq!(err, ExecutionError::UnknownCommand("print".to_string()));
        assert_eq!(err.to_string(), "Unknown command: print");
        assert!(recorder.calls.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_execute_wire_known_command() {
        let recorder = Recorder::default();
        let wire = Intent::Window {
            action: WindowAction::Minimize,
        }
        .to_wire();
        let outcome = recorder.execute_wire(wire).await.unwrap();
        assert_eq!(outcome.message, "window minimize");
    }

    #[test]
    fn test_default_outcome_message() {
        assert_eq!(
            ExecutionOutcome::default().message,
            "Command executed successfully"
        );
    }
}
