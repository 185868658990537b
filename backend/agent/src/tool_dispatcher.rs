//! Dispatcher for remote-requested actions.
//!
//! Routes each action request to the matching local tool and converts every
//! outcome, including failures, into a result string tagged with the request
//! id. The remote reasoning layer reads error text and adapts on its own, so
//! nothing here propagates as an exception.

use anyhow::{anyhow, Context, Result};
use tracing::{debug, warn};

use codedesk_core::{ActionRequest, ActionResult, ToolRegistry};

use crate::progress::ProgressReporter;

pub struct ToolDispatcher {
    registry: ToolRegistry,
}

impl ToolDispatcher {
    pub fn new(registry: ToolRegistry) -> Self {
        Self { registry }
    }

    /// Execute a batch of action requests, yielding exactly one result per
    /// request in order. Unknown tool names and malformed arguments become
    /// error-describing results rather than being dropped; the run cannot
    /// progress unless every pending request is answered.
    ///
    /// The reporter is told about each action as it starts, so the user sees
    /// what is running while it runs.
    pub async fn dispatch_batch(
        &self,
        requests: &[ActionRequest],
        reporter: &dyn ProgressReporter,
    ) -> Vec<ActionResult> {
        let mut results = Vec::with_capacity(requests.len());
        for request in requests {
            reporter.action_started(request);
            let output = match self.execute(request).await {
                Ok(output) => output,
                Err(error) => {
                    warn!(tool = %request.name, %error, "Tool execution failed");
                    format!("Error: {error:#}")
                }
            };
            results.push(ActionResult::new(&request.id, output));
        }
        results
    }

    async fn execute(&self, request: &ActionRequest) -> Result<String> {
        let tool = self
            .registry
            .get(&request.name)
            .ok_or_else(|| anyhow!("unknown tool: {}", request.name))?;
        let args: serde_json::Value = serde_json::from_str(&request.arguments)
            .with_context(|| format!("arguments for {} are not valid JSON", request.name))?;

        debug!(tool = %request.name, request_id = %request.id, "Dispatching tool call");
        tool.execute(args).await
    }
}
