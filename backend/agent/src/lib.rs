//! The codedesk agent core: one long-lived session against the remote
//! assistant service, a turn driver that resolves each user query through
//! the poll/act/resubmit state machine with bounded retry, and the
//! dispatcher that routes requested actions to local tools.

pub mod progress;
pub mod session;
pub mod tool_dispatcher;
pub mod turn;

pub use progress::{ProgressReporter, SilentReporter};
pub use session::{assistant_definition, Session};
pub use tool_dispatcher::ToolDispatcher;
pub use turn::{TurnDriver, TurnOutcome};
