//! User-facing progress notifications.
//!
//! Library code logs through `tracing`; anything the person at the terminal
//! should see while a turn is running flows through this trait instead. The
//! CLI wires it to its note printer; headless callers keep the silent
//! default.

use codedesk_core::ActionRequest;

/// Observer for the user-visible milestones of a turn.
///
/// Every method defaults to a no-op so implementations override only what
/// they surface.
pub trait ProgressReporter: Send + Sync {
    /// The remote service requested a batch of local actions.
    fn executing_actions(&self, _count: usize) {}

    /// One action is about to execute.
    fn action_started(&self, _request: &ActionRequest) {}

    /// A failed attempt is about to be retried.
    fn retrying(&self, _attempt: u32, _max_attempts: u32, _error: &str) {}

    /// The turn produced its final response.
    fn turn_completed(&self) {}
}

/// Reporter that surfaces nothing.
pub struct SilentReporter;

impl ProgressReporter for SilentReporter {}
