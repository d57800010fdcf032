//! Transcript pipeline - parse, dispatch, speak
//!
//! Each final transcript is parsed once. A recognised intent is dispatched
//! on its own tokio task through the retry wrapper; nothing is queued or
//! deduplicated, so overlapping commands run concurrently. Progress is
//! reported as `PipelineEvent`s for whoever renders the session.

use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::{info, warn};

use crate::executor::{CommandExecutor, ExecutionError, ExecutionOutcome};
use crate::intent::Intent;
use crate::matcher::IntentParser;
use crate::retry::{RetryPolicy, execute_with_retry};
use crate::session::SharedSession;
use crate::speech::{COMMAND_FAILED, NOT_RECOGNIZED, SpeechOutput};

#[derive(Debug, Clone, PartialEq)]
pub enum PipelineEvent {
    /// Transcript accepted for parsing
    Heard(String),
    /// Transcript dropped because the session is not listening
    Ignored(String),
    NotRecognized(String),
    Executed {
        intent: Intent,
        outcome: ExecutionOutcome,
    },
    Failed {
        intent: Intent,
        error: ExecutionError,
    },
}

pub struct Pipeline {
    parser: IntentParser,
    executor: Arc<dyn CommandExecutor>,
    speech: Arc<dyn SpeechOutput>,
    session: SharedSession,
    policy: RetryPolicy,
    events: mpsc::UnboundedSender<PipelineEvent>,
}

impl Pipeline {
    /// Build a pipeline and the receiving end of its event stream
    pub fn new(
        executor: Arc<dyn CommandExecutor>,
        speech: Arc<dyn SpeechOutput>,
        session: SharedSession,
        policy: RetryPolicy,
    ) -> (Self, mpsc::UnboundedReceiver<PipelineEvent>) {
        let (events, rx) = mpsc::unbounded_channel();
        let pipeline = Self {
            parser: IntentParser::new(),
            executor,
            speech,
            session,
            policy,
            events,
        };
        (pipeline, rx)
    }

    pub fn session(&self) -> &SharedSession {
        &self.session
    }

    /// Handle one final transcript
    ///
    /// Returns the dispatch task when an intent was recognised. Must be
    /// called from within a tokio runtime.
    pub fn handle_transcript(&self, transcript: &str) -> Option<JoinHandle<()>> {
        if !self.session.is_listening() {
            self.emit(PipelineEvent::Ignored(transcript.to_string()));
            return None;
        }
        self.emit(PipelineEvent::Heard(transcript.to_string()));

        let Some(intent) = self.parser.parse(transcript) else {
            info!(transcript, "command not recognized");
            self.speech.speak(NOT_RECOGNIZED);
            self.emit(PipelineEvent::NotRecognized(transcript.to_string()));
            return None;
        };

        info!(%intent, "dispatching");
        let executor = Arc::clone(&self.executor);
        let speech = Arc::clone(&self.speech);
        let events = self.events.clone();
        let policy = self.policy;
        let cancel = self.session.cancel_signal();

        Some(tokio::spawn(async move {
            let event = match execute_with_retry(executor.as_ref(), &intent, &policy, &cancel).await {
                Ok(outcome) => {
                    speech.speak(&outcome.message);
                    PipelineEvent::Executed { intent, outcome }
                }
                Err(error) => {
                    warn!(%intent, %error, "command failed");
                    speech.speak(COMMAND_FAILED);
                    PipelineEvent::Failed { intent, error }
                }
            };
            let _ = events.send(event);
        }))
    }

    fn emit(&self, event: PipelineEvent) {
        // Receiver gone means nobody is rendering; keep going
        let _ = self.events.send(event);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::SimulatedBrowser;
    use crate::config::Config;
    use crate::session::SessionContext;
    use crate::speech::MemorySpeech;
    use std::time::Duration;

    struct Harness {
        pipeline: Pipeline,
        events: mpsc::UnboundedReceiver<PipelineEvent>,
        browser: Arc<SimulatedBrowser>,
        speech: Arc<MemorySpeech>,
    }

    fn harness() -> Harness {
        let browser = Arc::new(SimulatedBrowser::with_home("https://www.google.com"));
        let speech = Arc::new(MemorySpeech::new());
        let session = SessionContext::new(&Config::default());
        let policy = RetryPolicy {
            max_attempts: 2,
            delay: Duration::from_millis(10),
        };
        let (pipeline, events) = Pipeline::new(browser.clone(), speech.clone(), session, policy);
        Harness {
            pipeline,
            events,
            browser,
            speech,
        }
    }

    #[tokio::test]
    async fn test_recognized_transcript_executes() {
        let mut h = harness();
        let task = h.pipeline.handle_transcript("Open YouTube").unwrap();
        task.await.unwrap();

        assert_eq!(
            h.events.recv().await,
            Some(PipelineEvent::Heard("Open YouTube".to_string()))
        );
        match h.events.recv().await {
            Some(PipelineEvent::Executed { intent, outcome }) => {
                assert_eq!(
                    intent,
                    Intent::OpenTab {
                        url: "https://www.youtube.com".to_string()
                    }
                );
                assert_eq!(outcome.message, "Opened new tab: https://www.youtube.com");
            }
            other => panic!("expected Executed, got {:?}", other),
        }
        assert_eq!(h.browser.snapshot().tabs.len(), 2);
        assert_eq!(
            h.speech.spoken(),
            vec!["Opened new tab: https://www.youtube.com".to_string()]
        );
    }

    #[tokio::test]
    async fn test_unrecognized_transcript() {
        let mut h = harness();
        assert!(h.pipeline.handle_transcript("hello there").is_none());

        assert_eq!(
            h.events.recv().await,
            Some(PipelineEvent::Heard("hello there".to_string()))
        );
        assert_eq!(
            h.events.recv().await,
            Some(PipelineEvent::NotRecognized("hello there".to_string()))
        );
        assert_eq!(h.speech.spoken(), vec![NOT_RECOGNIZED.to_string()]);
        assert_eq!(h.browser.calls(), 0);
    }

    #[tokio::test]
    async fn test_not_listening_ignores() {
        let mut h = harness();
        h.pipeline.session().stop_listening();

        assert!(h.pipeline.handle_transcript("reload").is_none());
        assert_eq!(
            h.events.recv().await,
            Some(PipelineEvent::Ignored("reload".to_string()))
        );
        assert!(h.speech.spoken().is_empty());
        assert_eq!(h.browser.calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failure_after_retries() {
        let mut h = harness();
        h.browser.fail_next(2);

        let task = h.pipeline.handle_transcript("reload the page").unwrap();
        task.await.unwrap();

        let _heard = h.events.recv().await;
        match h.events.recv().await {
            Some(PipelineEvent::Failed { intent, error }) => {
                assert_eq!(intent, Intent::ReloadTab);
                assert_eq!(error, ExecutionError::failed("Simulated failure"));
            }
            other => panic!("expected Failed, got {:?}", other),
        }
        assert_eq!(h.browser.calls(), 2);
        assert_eq!(h.speech.spoken(), vec![COMMAND_FAILED.to_string()]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_retry_recovers() {
        let mut h = harness();
        h.browser.fail_next(1);

        h.pipeline.handle_transcript("scroll down").unwrap().await.unwrap();

        let _heard = h.events.recv().await;
        assert!(matches!(
            h.events.recv().await,
            Some(PipelineEvent::Executed { .. })
        ));
        assert_eq!(h.browser.snapshot().active_tab().unwrap().scroll_y, 500);
    }

    #[tokio::test]
    async fn test_overlapping_commands_all_run() {
        let h = harness();
        let first = h.pipeline.handle_transcript("open github").unwrap();
        let second = h.pipeline.handle_transcript("open reddit").unwrap();
        first.await.unwrap();
        second.await.unwrap();
        assert_eq!(h.browser.snapshot().tabs.len(), 3);
    }
}
