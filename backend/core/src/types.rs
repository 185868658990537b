use std::fmt;

use serde::{Deserialize, Serialize};

/// Remote-reported status of a run within a conversation thread.
///
/// Modeled as a closed enum so the polling loop branches on variants rather
/// than scattered string comparisons. Statuses the service may add later fall
/// into `Unknown` and are treated as still-in-progress.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    Queued,
    InProgress,
    RequiresAction,
    Completed,
    Failed,
    Cancelled,
    Expired,
    #[serde(other)]
    Unknown,
}

impl RunStatus {
    /// True for statuses that end a run without a usable response.
    pub fn is_terminal_failure(&self) -> bool {
        matches!(self, Self::Failed | Self::Cancelled | Self::Expired)
    }
}

impl fmt::Display for RunStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Queued => "queued",
            Self::InProgress => "in_progress",
            Self::RequiresAction => "requires_action",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
            Self::Expired => "expired",
            Self::Unknown => "unknown",
        };
        f.write_str(name)
    }
}

/// One local action the remote service asked for within a run.
///
/// `arguments` is the raw JSON-encoded argument object exactly as the wire
/// carries it; strict decoding happens in the tool that executes the request.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionRequest {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

/// The string output produced for one [`ActionRequest`], matched by id.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionResult {
    pub request_id: String,
    pub output: String,
}

impl ActionResult {
    pub fn new(request_id: impl Into<String>, output: impl Into<String>) -> Self {
        Self {
            request_id: request_id.into(),
            output: output.into(),
        }
    }
}

/// What one poll of a run observes: the status plus, when the status is
/// `RequiresAction`, the batch of pending requests.
#[derive(Debug, Clone)]
pub struct RunState {
    pub status: RunStatus,
    pub pending: Vec<ActionRequest>,
}

impl RunState {
    pub fn status(status: RunStatus) -> Self {
        Self {
            status,
            pending: Vec::new(),
        }
    }
}

/// JSON Schema declaration for one callable tool, sent to the service when
/// the assistant is created.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolSchema {
    pub name: String,
    pub description: String,
    pub parameters: serde_json::Value,
}

/// Static configuration of the remote assistant: behavioral instructions,
/// model selection, and the declared tool surface.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssistantDefinition {
    pub name: String,
    pub instructions: String,
    pub model: String,
    pub tools: Vec<ToolSchema>,
}
