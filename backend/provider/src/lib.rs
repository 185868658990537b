//! Clients for the remote assistant service boundary.
//!
//! `OpenAiAssistants` talks to an OpenAI Assistants-compatible HTTP API;
//! `MockAssistant` is a scripted in-memory double used by the agent tests.

pub mod mock;
pub mod openai;

pub use mock::MockAssistant;
pub use openai::OpenAiAssistants;
