mod config;
mod terminal_output;

use std::io::BufRead;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use tracing::debug;

use codedesk_agent::{
    assistant_definition, ProgressReporter, Session, ToolDispatcher, TurnDriver, TurnOutcome,
};
use codedesk_core::{ActionRequest, AssistantService, CoreError};
use codedesk_provider::OpenAiAssistants;
use codedesk_tools::builtin_tools;

use config::Config;
use terminal_output::{note_error, note_info, note_response, note_warn, prompt};

#[tokio::main]
async fn main() -> Result<()> {
    // .env loading is a convenience; a missing file is not an error.
    dotenvy::dotenv().ok();
    let config = Config::from_env();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log_level)),
        )
        .with_writer(std::io::stderr)
        .init();

    let api_key = config.openai_api_key.clone().ok_or_else(|| {
        CoreError::ConfigError("OPENAI_API_KEY must be set (environment or .env file)".to_string())
    })?;

    let root_dir = prompt_root_directory()?;
    note_info(&format!("Root directory set to: {}", root_dir.display()));

    let registry = builtin_tools(&root_dir);
    let definition = assistant_definition(config.model.as_str(), &registry);

    let service: Arc<dyn AssistantService> =
        Arc::new(OpenAiAssistants::new(api_key).with_base_url(config.base_url.clone()));
    let session = Session::open(service.as_ref(), &definition, root_dir).await?;
    let driver = TurnDriver::new(Arc::clone(&service), ToolDispatcher::new(registry))
        .with_poll_interval(Duration::from_millis(config.poll_interval_ms))
        .with_reporter(Arc::new(TerminalReporter));

    note_info("Enter your commands in natural language (type 'exit' to quit):");

    let stdin = std::io::stdin();
    loop {
        prompt("Command:");
        let mut line = String::new();
        if stdin.lock().read_line(&mut line)? == 0 {
            break;
        }
        let query = line.trim();
        if query.is_empty() {
            continue;
        }
        if query.eq_ignore_ascii_case("exit") {
            note_info("Goodbye!");
            break;
        }

        debug!(%query, "Processing turn");
        note_info("Understanding your request...");
        match driver.run_turn(&session, query).await {
            TurnOutcome::Response(text) => note_response(&text),
            TurnOutcome::Failed(message) => note_error(&message),
        }
    }

    Ok(())
}

/// Prints turn progress as terminal notes, so the user sees what is running
/// while the remote service works.
struct TerminalReporter;

impl ProgressReporter for TerminalReporter {
    fn executing_actions(&self, _count: usize) {
        note_info("Executing commands...");
    }

    fn action_started(&self, request: &ActionRequest) {
        note_info(&describe_action(request));
    }

    fn retrying(&self, attempt: u32, max_attempts: u32, error: &str) {
        note_warn(&format!(
            "Attempt {attempt}/{max_attempts} - Retrying due to: {error}"
        ));
    }

    fn turn_completed(&self) {
        note_info("Done!");
    }
}

/// Human-readable line for one requested action, e.g. "Running: cargo test".
fn describe_action(request: &ActionRequest) -> String {
    let args: serde_json::Value = serde_json::from_str(&request.arguments).unwrap_or_default();
    match request.name.as_str() {
        "execute_command" => format!("Running: {}", args["command"].as_str().unwrap_or("?")),
        "read_file" => format!("Reading file: {}", args["file_path"].as_str().unwrap_or("?")),
        "write_file" => format!("Updating file: {}", args["file_path"].as_str().unwrap_or("?")),
        other => format!("Executing: {other}"),
    }
}

/// Ask for the root directory all file and command operations are scoped to.
/// Blank input or a path that does not exist falls back to the current
/// directory.
fn prompt_root_directory() -> Result<PathBuf> {
    println!("Enter the root directory path (press Enter to use current directory):");
    let mut line = String::new();
    std::io::stdin()
        .read_line(&mut line)
        .context("failed to read root directory")?;
    let path = line.trim();

    if !path.is_empty() {
        let candidate = PathBuf::from(path);
        if candidate.is_dir() {
            return Ok(candidate);
        }
        note_warn("Directory not found. Using current directory instead.");
    }
    std::env::current_dir().context("failed to resolve current directory")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(name: &str, arguments: &str) -> ActionRequest {
        ActionRequest {
            id: "call_1".to_string(),
            name: name.to_string(),
            arguments: arguments.to_string(),
        }
    }

    #[test]
    fn action_descriptions_name_the_operation_target() {
        assert_eq!(
            describe_action(&request("execute_command", r#"{"command": "cargo test"}"#)),
            "Running: cargo test"
        );
        assert_eq!(
            describe_action(&request("write_file", r#"{"file_path": "src/main.rs", "content": ""}"#)),
            "Updating file: src/main.rs"
        );
        assert_eq!(
            describe_action(&request("read_file", r#"{"file_path": "Cargo.toml"}"#)),
            "Reading file: Cargo.toml"
        );
        assert_eq!(
            describe_action(&request("mystery_tool", "{}")),
            "Executing: mystery_tool"
        );
        // Malformed arguments still produce a line rather than a panic.
        assert_eq!(
            describe_action(&request("execute_command", "not json")),
            "Running: ?"
        );
    }
}
