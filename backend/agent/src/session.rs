use std::path::PathBuf;

use anyhow::Result;
use tracing::info;

use codedesk_core::{AssistantDefinition, AssistantService, ToolRegistry};

/// Behavioral instructions sent with the assistant definition. They constrain
/// the model to the three declared functions for all file and command work.
const INSTRUCTIONS: &str = "You are a coding assistant that helps users with programming tasks.
When working with files and commands:
1. Always use the provided file system functions (read_file, write_file) instead of the code interpreter
2. Use the execute_command function for system commands
3. All paths should be relative to the user's root directory
4. Do not create files in the sandbox environment
5. When modifying or creating files, use the write_file function
6. When reading files, use the read_file function
7. Provide clear, concise responses about what actions were taken

Important: Never use the sandbox environment for file operations - always use the provided functions.";

/// Build the static assistant configuration from the registered tools.
pub fn assistant_definition(model: impl Into<String>, registry: &ToolRegistry) -> AssistantDefinition {
    AssistantDefinition {
        name: "Coding Assistant".to_string(),
        instructions: INSTRUCTIONS.to_string(),
        model: model.into(),
        tools: registry.schemas(),
    }
}

/// One continuous conversation with the remote service, bound to the root
/// directory all file and command operations are scoped to. Created once at
/// program start and never mutated afterwards.
#[derive(Debug, Clone)]
pub struct Session {
    pub assistant_id: String,
    pub thread_id: String,
    pub root_dir: PathBuf,
}

impl Session {
    /// Register the assistant and open a conversation thread.
    pub async fn open(
        service: &dyn AssistantService,
        definition: &AssistantDefinition,
        root_dir: PathBuf,
    ) -> Result<Self> {
        let assistant_id = service.create_assistant(definition).await?;
        let thread_id = service.create_thread().await?;

        info!(%assistant_id, %thread_id, root = %root_dir.display(), "Session opened");

        Ok(Self {
            assistant_id,
            thread_id,
            root_dir,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use codedesk_provider::MockAssistant;
    use codedesk_tools::builtin_tools;

    #[tokio::test]
    async fn open_registers_assistant_and_thread() {
        let dir = tempfile::tempdir().unwrap();
        let registry = builtin_tools(dir.path());
        let definition = assistant_definition("gpt-4o-mini", &registry);
        let service = MockAssistant::new();

        let session = Session::open(&service, &definition, dir.path().to_path_buf())
            .await
            .unwrap();
        assert_eq!(session.assistant_id, "asst_mock");
        assert_eq!(session.thread_id, "thread_mock");
    }

    #[test]
    fn definition_declares_the_three_functions() {
        let dir = tempfile::tempdir().unwrap();
        let registry = builtin_tools(dir.path());
        let definition = assistant_definition("gpt-4o-mini", &registry);

        let names: Vec<_> = definition.tools.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["execute_command", "read_file", "write_file"]);
        assert!(definition.instructions.contains("read_file"));
        assert!(definition.instructions.contains("execute_command"));
    }
}
