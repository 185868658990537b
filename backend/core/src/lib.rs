pub mod error;
pub mod tools;
pub mod traits;
pub mod types;

pub use error::CoreError;
pub use tools::ToolRegistry;
pub use traits::{AssistantService, Tool};
pub use types::{
    ActionRequest, ActionResult, AssistantDefinition, RunState, RunStatus, ToolSchema,
};
