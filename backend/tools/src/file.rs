use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use serde::Deserialize;
use serde_json::Value;
use tokio::fs;
use tracing::info;

use codedesk_core::Tool;

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ReadFileArgs {
    file_path: String,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WriteFileArgs {
    file_path: String,
    content: String,
}

/// Reads a text file resolved against the session root.
pub struct ReadFileTool {
    root: PathBuf,
}

impl ReadFileTool {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

#[async_trait]
impl Tool for ReadFileTool {
    fn name(&self) -> &str {
        "read_file"
    }

    fn description(&self) -> &str {
        "Read content of a file relative to root directory"
    }

    fn parameters(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "Path to the file relative to root directory"
                }
            },
            "required": ["file_path"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let args: ReadFileArgs =
            serde_json::from_value(args).context("invalid read_file arguments")?;
        let full_path = self.root.join(&args.file_path);
        fs::read_to_string(&full_path)
            .await
            .with_context(|| format!("Error reading file: {}", args.file_path))
    }
}

/// Writes a text file resolved against the session root, creating missing
/// parent directories and overwriting any existing file.
pub struct WriteFileTool {
    root: PathBuf,
}

impl WriteFileTool {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }
}

#[async_trait]
impl Tool for WriteFileTool {
    fn name(&self) -> &str {
        "write_file"
    }

    fn description(&self) -> &str {
        "Write content to a file relative to root directory"
    }

    fn parameters(&self) -> Value {
        serde_json::json!({
            "type": "object",
            "properties": {
                "file_path": {
                    "type": "string",
                    "description": "Path to the file relative to root directory"
                },
                "content": {
                    "type": "string",
                    "description": "Content to write to the file"
                }
            },
            "required": ["file_path", "content"]
        })
    }

    async fn execute(&self, args: Value) -> Result<String> {
        let args: WriteFileArgs =
            serde_json::from_value(args).context("invalid write_file arguments")?;
        let full_path = self.root.join(&args.file_path);

        info!(path = %args.file_path, "Updating file");

        if let Some(parent) = full_path.parent() {
            fs::create_dir_all(parent)
                .await
                .with_context(|| format!("Error writing file: {}", args.file_path))?;
        }

        fs::write(&full_path, &args.content)
            .await
            .with_context(|| format!("Error writing file: {}", args.file_path))?;

        Ok("File written successfully".to_string())
    }
}
