use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::process::Command;
use tracing::info;

use codedesk_core::Tool;

/// Arguments for `execute_command`. Remote-supplied, so decoding is strict:
/// unexpected fields are rejected rather than ignored.
#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ExecuteCommandArgs {
    command: String,
}

/// Runs a shell command in the session root, capturing stdout and stderr
/// regardless of exit code. The command is unsandboxed; whatever it does to
/// the environment is the caller's to expect.
pub struct ShellTool {
    root: PathBuf,
}

impl ShellTool {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

#[async_trait]
impl Tool for ShellTool {
    fn name(&self) -> &str {
        "execute_command"
    }

    fn description(&self) -> &str {
        "Execute a system command"
    }

    fn parameters(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "command": {
                    "type": "string",
                    "description": "The command to execute"
                }
            },
            "required": ["command"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let args: ExecuteCommandArgs =
            serde_json::from_value(args).context("invalid execute_command arguments")?;

        info!(command = %args.command, "Executing shell command");

        let output = Command::new("sh")
            .arg("-c")
            .arg(&args.command)
            .current_dir(&self.root)
            .output()
            .await
            .with_context(|| format!("Error executing command: {}", args.command))?;

        let stdout = String::from_utf8_lossy(&output.stdout);
        let stderr = String::from_utf8_lossy(&output.stderr);

        // Both segments are always present, even when empty; the remote side
        // reads this text to decide its next step.
        Ok(format!("Output: {stdout}\nErrors: {stderr}"))
    }
}
