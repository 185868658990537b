use std::collections::VecDeque;
use std::sync::Mutex;

use anyhow::{bail, Result};
use async_trait::async_trait;

use codedesk_core::{ActionResult, AssistantDefinition, AssistantService, RunState};

/// A scripted assistant service for tests.
///
/// Each call to `create_run` consumes the next script: the sequence of
/// `RunState`s that successive polls of that run will observe. When no
/// script remains, run creation fails, which doubles as transport-error
/// injection for retry tests. Appended messages and submitted results are
/// recorded for assertions.
pub struct MockAssistant {
    state: Mutex<MockState>,
}

struct MockState {
    scripts: VecDeque<VecDeque<RunState>>,
    active: Option<VecDeque<RunState>>,
    final_message: String,
    appended: Vec<String>,
    submitted: Vec<Vec<ActionResult>>,
    runs_created: usize,
}

impl MockAssistant {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(MockState {
                scripts: VecDeque::new(),
                active: None,
                final_message: "Mock final response".to_string(),
                appended: Vec::new(),
                submitted: Vec::new(),
                runs_created: 0,
            }),
        }
    }

    /// Queue the poll states one future run will report, in order.
    pub fn with_run(self, states: Vec<RunState>) -> Self {
        self.state
            .lock()
            .unwrap()
            .scripts
            .push_back(states.into());
        self
    }

    pub fn with_final_message(self, text: impl Into<String>) -> Self {
        self.state.lock().unwrap().final_message = text.into();
        self
    }

    pub fn appended_messages(&self) -> Vec<String> {
        self.state.lock().unwrap().appended.clone()
    }

    pub fn submitted_results(&self) -> Vec<Vec<ActionResult>> {
        self.state.lock().unwrap().submitted.clone()
    }

    pub fn runs_created(&self) -> usize {
        self.state.lock().unwrap().runs_created
    }
}

impl Default for MockAssistant {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl AssistantService for MockAssistant {
    async fn create_assistant(&self, _definition: &AssistantDefinition) -> Result<String> {
        Ok("asst_mock".to_string())
    }

    async fn create_thread(&self) -> Result<String> {
        Ok("thread_mock".to_string())
    }

    async fn append_message(&self, _thread_id: &str, text: &str) -> Result<()> {
        self.state.lock().unwrap().appended.push(text.to_string());
        Ok(())
    }

    async fn create_run(&self, _thread_id: &str, _assistant_id: &str) -> Result<String> {
        let mut state = self.state.lock().unwrap();
        state.runs_created += 1;
        let run_number = state.runs_created;
        match state.scripts.pop_front() {
            Some(script) => {
                state.active = Some(script);
                Ok(format!("run_mock_{run_number}"))
            }
            None => bail!("mock service has no scripted run"),
        }
    }

    async fn run_state(&self, _thread_id: &str, _run_id: &str) -> Result<RunState> {
        let mut state = self.state.lock().unwrap();
        match state.active.as_mut().and_then(VecDeque::pop_front) {
            Some(run_state) => Ok(run_state),
            None => bail!("mock run script exhausted"),
        }
    }

    async fn submit_action_results(
        &self,
        _thread_id: &str,
        _run_id: &str,
        results: Vec<ActionResult>,
    ) -> Result<()> {
        self.state.lock().unwrap().submitted.push(results);
        Ok(())
    }

    async fn latest_message(&self, _thread_id: &str) -> Result<String> {
        Ok(self.state.lock().unwrap().final_message.clone())
    }
}
