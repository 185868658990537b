use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use codedesk_core::{
    ActionRequest, ActionResult, AssistantDefinition, AssistantService, CoreError, RunState,
    RunStatus,
};

const ASSISTANTS_BETA_HEADER: &str = "assistants=v2";

/// OpenAI Assistants API client.
pub struct OpenAiAssistants {
    client: Client,
    api_key: String,
    base_url: String,
}

impl OpenAiAssistants {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.openai.com/v1".to_string(),
        }
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    fn request(&self, method: reqwest::Method, path: &str) -> reqwest::RequestBuilder {
        self.client
            .request(method, format!("{}{}", self.base_url, path))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("OpenAI-Beta", ASSISTANTS_BETA_HEADER)
    }

    async fn decode<T: serde::de::DeserializeOwned>(
        response: reqwest::Response,
        what: &str,
    ) -> Result<T> {
        let status = response.status();
        if !status.is_success() {
            let error_body = response.text().await.unwrap_or_default();
            return Err(CoreError::Service(format!("{what} returned {status}: {error_body}")).into());
        }
        response
            .json()
            .await
            .with_context(|| format!("failed to parse {what} response"))
    }
}

// ---------------------------------------------------------------------------
// Wire DTOs
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct CreateAssistantRequest<'a> {
    name: &'a str,
    instructions: &'a str,
    model: &'a str,
    tools: Vec<ToolDeclaration<'a>>,
}

#[derive(Serialize)]
struct ToolDeclaration<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: FunctionDeclaration<'a>,
}

#[derive(Serialize)]
struct FunctionDeclaration<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a serde_json::Value,
}

#[derive(Deserialize)]
struct ObjectHandle {
    id: String,
}

#[derive(Serialize)]
struct CreateMessageRequest<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Serialize)]
struct CreateRunRequest<'a> {
    assistant_id: &'a str,
}

#[derive(Deserialize)]
struct RunObject {
    id: String,
    status: RunStatus,
    required_action: Option<RequiredAction>,
}

#[derive(Deserialize)]
struct RequiredAction {
    submit_tool_outputs: SubmitToolOutputs,
}

#[derive(Deserialize)]
struct SubmitToolOutputs {
    tool_calls: Vec<ToolCallObject>,
}

#[derive(Deserialize)]
struct ToolCallObject {
    id: String,
    function: FunctionCall,
}

#[derive(Deserialize)]
struct FunctionCall {
    name: String,
    arguments: String,
}

#[derive(Serialize)]
struct SubmitToolOutputsRequest {
    tool_outputs: Vec<ToolOutput>,
}

#[derive(Serialize)]
struct ToolOutput {
    tool_call_id: String,
    output: String,
}

#[derive(Deserialize)]
struct MessageList {
    data: Vec<MessageObject>,
}

#[derive(Deserialize)]
struct MessageObject {
    content: Vec<ContentPart>,
}

#[derive(Deserialize)]
struct ContentPart {
    text: Option<TextContent>,
}

#[derive(Deserialize)]
struct TextContent {
    value: String,
}

impl From<RunObject> for RunState {
    fn from(run: RunObject) -> Self {
        let pending = run
            .required_action
            .map(|action| {
                action
                    .submit_tool_outputs
                    .tool_calls
                    .into_iter()
                    .map(|call| ActionRequest {
                        id: call.id,
                        name: call.function.name,
                        arguments: call.function.arguments,
                    })
                    .collect()
            })
            .unwrap_or_default();
        RunState {
            status: run.status,
            pending,
        }
    }
}

#[async_trait]
impl AssistantService for OpenAiAssistants {
    async fn create_assistant(&self, definition: &AssistantDefinition) -> Result<String> {
        let body = CreateAssistantRequest {
            name: &definition.name,
            instructions: &definition.instructions,
            model: &definition.model,
            tools: definition
                .tools
                .iter()
                .map(|schema| ToolDeclaration {
                    kind: "function",
                    function: FunctionDeclaration {
                        name: &schema.name,
                        description: &schema.description,
                        parameters: &schema.parameters,
                    },
                })
                .collect(),
        };

        debug!(model = %definition.model, "Creating assistant");

        let response = self
            .request(reqwest::Method::POST, "/assistants")
            .json(&body)
            .send()
            .await
            .context("assistant creation request failed")?;
        let handle: ObjectHandle = Self::decode(response, "assistant creation").await?;
        Ok(handle.id)
    }

    async fn create_thread(&self) -> Result<String> {
        let response = self
            .request(reqwest::Method::POST, "/threads")
            .json(&serde_json::json!({}))
            .send()
            .await
            .context("thread creation request failed")?;
        let handle: ObjectHandle = Self::decode(response, "thread creation").await?;
        Ok(handle.id)
    }

    async fn append_message(&self, thread_id: &str, text: &str) -> Result<()> {
        let body = CreateMessageRequest {
            role: "user",
            content: text,
        };
        let response = self
            .request(
                reqwest::Method::POST,
                &format!("/threads/{thread_id}/messages"),
            )
            .json(&body)
            .send()
            .await
            .context("message append request failed")?;
        let _: ObjectHandle = Self::decode(response, "message append").await?;
        Ok(())
    }

    async fn create_run(&self, thread_id: &str, assistant_id: &str) -> Result<String> {
        let body = CreateRunRequest { assistant_id };
        let response = self
            .request(reqwest::Method::POST, &format!("/threads/{thread_id}/runs"))
            .json(&body)
            .send()
            .await
            .context("run creation request failed")?;
        let run: RunObject = Self::decode(response, "run creation").await?;
        Ok(run.id)
    }

    async fn run_state(&self, thread_id: &str, run_id: &str) -> Result<RunState> {
        let response = self
            .request(
                reqwest::Method::GET,
                &format!("/threads/{thread_id}/runs/{run_id}"),
            )
            .send()
            .await
            .context("run status request failed")?;
        let run: RunObject = Self::decode(response, "run status").await?;
        debug!(run_id = %run.id, status = %run.status, "Polled run");
        Ok(run.into())
    }

    async fn submit_action_results(
        &self,
        thread_id: &str,
        run_id: &str,
        results: Vec<ActionResult>,
    ) -> Result<()> {
        let body = SubmitToolOutputsRequest {
            tool_outputs: results
                .into_iter()
                .map(|result| ToolOutput {
                    tool_call_id: result.request_id,
                    output: result.output,
                })
                .collect(),
        };
        let response = self
            .request(
                reqwest::Method::POST,
                &format!("/threads/{thread_id}/runs/{run_id}/submit_tool_outputs"),
            )
            .json(&body)
            .send()
            .await
            .context("tool output submission failed")?;
        let _: RunObject = Self::decode(response, "tool output submission").await?;
        Ok(())
    }

    async fn latest_message(&self, thread_id: &str) -> Result<String> {
        let response = self
            .request(
                reqwest::Method::GET,
                &format!("/threads/{thread_id}/messages"),
            )
            .send()
            .await
            .context("message list request failed")?;
        let list: MessageList = Self::decode(response, "message list").await?;

        // The service returns messages newest-first.
        let text = list
            .data
            .first()
            .and_then(|message| {
                message
                    .content
                    .iter()
                    .find_map(|part| part.text.as_ref().map(|t| t.value.clone()))
            })
            .context("no assistant message in thread")?;
        Ok(text)
    }
}
