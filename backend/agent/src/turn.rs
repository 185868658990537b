//! The turn driver: the state machine that resolves one user query.
//!
//! Per attempt: append the query, start a run, poll until the run completes,
//! fails, or requests local actions; dispatched action results are submitted
//! back to the same run. The whole exchange is wrapped in a bounded retry
//! that carries the previous error forward in the rewritten query, so the
//! remote reasoning can adapt. The failed attempt's messages stay in the
//! thread; retries are conversation-preserving, not a rollback.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use codedesk_core::{AssistantService, CoreError, RunStatus};

use crate::progress::{ProgressReporter, SilentReporter};
use crate::session::Session;
use crate::tool_dispatcher::ToolDispatcher;

/// Maximum submission attempts per turn.
const MAX_ATTEMPTS: u32 = 3;

const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(750);

/// Terminal result of one turn. A turn never raises past this boundary:
/// exhausted retries surface as `Failed` with a descriptive message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TurnOutcome {
    /// The assistant's final answer.
    Response(String),
    /// All attempts failed; the message names the attempt count and the
    /// last error.
    Failed(String),
}

pub struct TurnDriver {
    service: Arc<dyn AssistantService>,
    dispatcher: ToolDispatcher,
    poll_interval: Duration,
    reporter: Arc<dyn ProgressReporter>,
}

impl TurnDriver {
    pub fn new(service: Arc<dyn AssistantService>, dispatcher: ToolDispatcher) -> Self {
        Self {
            service,
            dispatcher,
            poll_interval: DEFAULT_POLL_INTERVAL,
            reporter: Arc::new(SilentReporter),
        }
    }

    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    pub fn with_reporter(mut self, reporter: Arc<dyn ProgressReporter>) -> Self {
        self.reporter = reporter;
        self
    }

    /// Resolve one user query to a final outcome.
    pub async fn run_turn(&self, session: &Session, query: &str) -> TurnOutcome {
        let mut current_query = query.to_string();
        let mut last_error = String::new();

        for attempt in 1..=MAX_ATTEMPTS {
            if attempt > 1 {
                info!(attempt, max = MAX_ATTEMPTS, error = %last_error, "Retrying turn");
                self.reporter.retrying(attempt, MAX_ATTEMPTS, &last_error);
                current_query = format!(
                    "Previous attempt failed with error: {last_error}\n\
                     Please try again with a different approach.\n\
                     Original query: {query}"
                );
            }

            match self.attempt(session, &current_query).await {
                Ok(text) => {
                    self.reporter.turn_completed();
                    return TurnOutcome::Response(text);
                }
                Err(error) => {
                    last_error = format!("{error:#}");
                    warn!(attempt, error = %last_error, "Turn attempt failed");
                }
            }
        }

        TurnOutcome::Failed(format!(
            "Error: Operation failed after {MAX_ATTEMPTS} attempts. Last error: {last_error}"
        ))
    }

    async fn attempt(&self, session: &Session, query: &str) -> Result<String> {
        self.service
            .append_message(&session.thread_id, query)
            .await?;
        let run_id = self
            .service
            .create_run(&session.thread_id, &session.assistant_id)
            .await?;

        loop {
            let state = self
                .service
                .run_state(&session.thread_id, &run_id)
                .await?;

            match state.status {
                RunStatus::RequiresAction => {
                    debug!(run_id = %run_id, pending = state.pending.len(), "Run requires action");
                    self.reporter.executing_actions(state.pending.len());
                    let results = self
                        .dispatcher
                        .dispatch_batch(&state.pending, self.reporter.as_ref())
                        .await;
                    self.service
                        .submit_action_results(&session.thread_id, &run_id, results)
                        .await?;
                }
                RunStatus::Completed => {
                    return self.service.latest_message(&session.thread_id).await;
                }
                status if status.is_terminal_failure() => {
                    return Err(CoreError::RunFailed(status).into());
                }
                // Queued, InProgress, or a status this build doesn't know.
                _ => sleep(self.poll_interval).await,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codedesk_core::{ActionRequest, RunState};
    use codedesk_provider::MockAssistant;
    use codedesk_tools::builtin_tools;
    use std::sync::Mutex;

    fn session(root: &std::path::Path) -> Session {
        Session {
            assistant_id: "asst_mock".to_string(),
            thread_id: "thread_mock".to_string(),
            root_dir: root.to_path_buf(),
        }
    }

    fn driver(service: Arc<MockAssistant>, root: &std::path::Path) -> TurnDriver {
        TurnDriver::new(service, ToolDispatcher::new(builtin_tools(root)))
            .with_poll_interval(Duration::from_millis(1))
    }

    fn write_notes_request() -> ActionRequest {
        ActionRequest {
            id: "call_write".to_string(),
            name: "write_file".to_string(),
            arguments: r#"{"file_path": "notes.txt", "content": "hello"}"#.to_string(),
        }
    }

    fn expect_failed(outcome: TurnOutcome) -> String {
        match outcome {
            TurnOutcome::Failed(message) => message,
            other => panic!("expected failed turn, got {other:?}"),
        }
    }

    #[derive(Default)]
    struct RecordingReporter {
        events: Mutex<Vec<String>>,
    }

    impl RecordingReporter {
        fn events(&self) -> Vec<String> {
            self.events.lock().unwrap().clone()
        }
    }

    impl ProgressReporter for RecordingReporter {
        fn executing_actions(&self, count: usize) {
            self.events.lock().unwrap().push(format!("actions:{count}"));
        }
        fn action_started(&self, request: &ActionRequest) {
            self.events
                .lock()
                .unwrap()
                .push(format!("action:{}", request.name));
        }
        fn retrying(&self, attempt: u32, max_attempts: u32, _error: &str) {
            self.events
                .lock()
                .unwrap()
                .push(format!("retry:{attempt}/{max_attempts}"));
        }
        fn turn_completed(&self) {
            self.events.lock().unwrap().push("done".to_string());
        }
    }

    #[tokio::test]
    async fn completes_after_tool_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(
            MockAssistant::new()
                .with_run(vec![
                    RunState::status(RunStatus::Queued),
                    RunState::status(RunStatus::InProgress),
                    RunState {
                        status: RunStatus::RequiresAction,
                        pending: vec![write_notes_request()],
                    },
                    RunState::status(RunStatus::Completed),
                ])
                .with_final_message("Created notes.txt with 'hello'."),
        );
        let driver = driver(Arc::clone(&mock), dir.path());

        let outcome = driver
            .run_turn(
                &session(dir.path()),
                "create a file notes.txt with content 'hello'",
            )
            .await;

        assert_eq!(
            outcome,
            TurnOutcome::Response("Created notes.txt with 'hello'.".to_string())
        );
        assert_eq!(
            std::fs::read_to_string(dir.path().join("notes.txt")).unwrap(),
            "hello"
        );

        let submitted = mock.submitted_results();
        assert_eq!(submitted.len(), 1);
        assert_eq!(submitted[0].len(), 1);
        assert_eq!(submitted[0][0].request_id, "call_write");
        assert_eq!(submitted[0][0].output, "File written successfully");
    }

    #[tokio::test]
    async fn retries_carry_error_and_original_query() {
        let dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(
            MockAssistant::new()
                .with_run(vec![RunState::status(RunStatus::Failed)])
                .with_run(vec![RunState::status(RunStatus::Expired)])
                .with_run(vec![RunState::status(RunStatus::Completed)])
                .with_final_message("done on the third try"),
        );
        let driver = driver(Arc::clone(&mock), dir.path());

        let outcome = driver.run_turn(&session(dir.path()), "list the files").await;

        assert_eq!(
            outcome,
            TurnOutcome::Response("done on the third try".to_string())
        );
        assert_eq!(mock.runs_created(), 3);

        let appended = mock.appended_messages();
        assert_eq!(appended.len(), 3);
        assert_eq!(appended[0], "list the files");
        assert!(appended[1].contains("Previous attempt failed with error:"));
        assert!(appended[1].contains("Run failed"));
        assert!(appended[1].contains("Original query: list the files"));
        assert!(appended[2].contains("Run expired"));
        assert!(appended[2].contains("Original query: list the files"));
    }

    #[tokio::test]
    async fn exhausted_retries_return_terminal_error() {
        let dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(
            MockAssistant::new()
                .with_run(vec![RunState::status(RunStatus::Failed)])
                .with_run(vec![RunState::status(RunStatus::Cancelled)])
                .with_run(vec![RunState::status(RunStatus::Failed)]),
        );
        let driver = driver(Arc::clone(&mock), dir.path());

        let message = expect_failed(driver.run_turn(&session(dir.path()), "do something").await);

        assert_eq!(mock.runs_created(), 3);
        assert!(message.starts_with("Error: Operation failed after 3 attempts."));
        assert!(message.contains("Last error: Run failed"));
    }

    #[tokio::test]
    async fn transport_errors_drive_the_same_retry_path() {
        let dir = tempfile::tempdir().unwrap();
        // No scripted runs: every create_run fails like an unreachable service.
        let mock = Arc::new(MockAssistant::new());
        let driver = driver(Arc::clone(&mock), dir.path());

        let message = expect_failed(driver.run_turn(&session(dir.path()), "anything").await);

        assert_eq!(mock.runs_created(), 3);
        assert!(message.starts_with("Error: Operation failed after 3 attempts."));
        assert!(message.contains("no scripted run"));
    }

    #[tokio::test]
    async fn response_beginning_with_error_is_still_a_response() {
        let dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(
            MockAssistant::new()
                .with_run(vec![RunState::status(RunStatus::Completed)])
                .with_final_message("Error: handling in your script looks wrong on line 3."),
        );
        let driver = driver(Arc::clone(&mock), dir.path());

        let outcome = driver.run_turn(&session(dir.path()), "review my script").await;

        assert_eq!(
            outcome,
            TurnOutcome::Response(
                "Error: handling in your script looks wrong on line 3.".to_string()
            )
        );
    }

    #[tokio::test]
    async fn progress_reporter_sees_turn_milestones() {
        let dir = tempfile::tempdir().unwrap();
        let mock = Arc::new(
            MockAssistant::new()
                .with_run(vec![RunState::status(RunStatus::Failed)])
                .with_run(vec![
                    RunState {
                        status: RunStatus::RequiresAction,
                        pending: vec![write_notes_request()],
                    },
                    RunState::status(RunStatus::Completed),
                ])
                .with_final_message("wrote the file"),
        );
        let reporter = Arc::new(RecordingReporter::default());
        let driver = driver(Arc::clone(&mock), dir.path())
            .with_reporter(Arc::clone(&reporter) as Arc<dyn ProgressReporter>);

        let outcome = driver.run_turn(&session(dir.path()), "write notes").await;

        assert_eq!(outcome, TurnOutcome::Response("wrote the file".to_string()));
        assert_eq!(
            reporter.events(),
            vec!["retry:2/3", "actions:1", "action:write_file", "done"]
        );
    }
}
