use anyhow::Result;
use async_trait::async_trait;

use crate::types::{ActionResult, AssistantDefinition, RunState};

/// A local capability the remote assistant can invoke.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Unique name of the tool (e.g., "read_file").
    fn name(&self) -> &str;

    /// Description for the assistant's tool declaration.
    fn description(&self) -> &str;

    /// JSON Schema for the tool's parameters.
    fn parameters(&self) -> serde_json::Value;

    /// Execute the tool with the given arguments.
    ///
    /// Errors are converted to descriptive result strings by the dispatcher;
    /// they never propagate past it.
    async fn execute(&self, args: serde_json::Value) -> Result<String>;
}

/// The remote assistant service boundary.
///
/// One conversation lives in a thread; each submitted message is processed
/// as a run that is polled until it completes, fails, or asks for local
/// action. The HTTP client and the scripted test double both implement this.
#[async_trait]
pub trait AssistantService: Send + Sync {
    /// Register an assistant configuration, returning its id.
    async fn create_assistant(&self, definition: &AssistantDefinition) -> Result<String>;

    /// Open a new conversation thread, returning its id.
    async fn create_thread(&self) -> Result<String>;

    /// Append a user message to the thread.
    async fn append_message(&self, thread_id: &str, text: &str) -> Result<()>;

    /// Start processing the thread's latest state, returning the run id.
    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<String>;

    /// Observe the run's current status and any pending action requests.
    async fn run_state(&self, thread_id: &str, run_id: &str) -> Result<RunState>;

    /// Submit the outputs for a batch of action requests back to the run.
    async fn submit_action_results(
        &self,
        thread_id: &str,
        run_id: &str,
        results: Vec<ActionResult>,
    ) -> Result<()>;

    /// Fetch the text of the most recent assistant message in the thread.
    async fn latest_message(&self, thread_id: &str) -> Result<String>;
}
