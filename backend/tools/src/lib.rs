//! Standard tool library for codedesk: the three local action executors
//! (shell command, file read, file write), each scoped to the session's
//! root directory.

pub mod file;
pub mod shell;

use std::path::Path;
use std::sync::Arc;

use codedesk_core::ToolRegistry;

pub use file::{ReadFileTool, WriteFileTool};
pub use shell::ShellTool;

/// Build the registry of built-in tools, all resolving paths and commands
/// against `root`.
pub fn builtin_tools(root: &Path) -> ToolRegistry {
    let mut registry = ToolRegistry::new();
    registry.register(Arc::new(ShellTool::new(root)));
    registry.register(Arc::new(ReadFileTool::new(root)));
    registry.register(Arc::new(WriteFileTool::new(root)));
    registry
}
