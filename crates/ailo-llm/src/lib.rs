//! ailo-llm
//!
//! The seam between retrieval and the language model. The chat layer only
//! sees [`CompletionModel`]; [`OpenAiCompatibleClient`] talks to a local
//! OpenAI-style server such as LM Studio and [`FakeModel`] answers offline.

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

use ailo_core::config::LlmSettings;

pub mod fake;
pub mod openai;

pub use fake::FakeModel;
pub use openai::OpenAiCompatibleClient;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self { Self { role: Role::System, content: content.into() } }
    pub fn user(content: impl Into<String>) -> Self { Self { role: Role::User, content: content.into() } }
    pub fn assistant(content: impl Into<String>) -> Self { Self { role: Role::Assistant, content: content.into() } }
}

#[derive(Debug, thiserror::Error)]
pub enum LlmError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),
    #[error("could not reach language model at {url}: {source}")]
    Connection { url: String, #[source] source: reqwest::Error },
    #[error("language model returned HTTP {status}: {body}")]
    Status { status: u16, body: String },
    #[error("no answer from language model within {0:?}")]
    Timeout(Duration),
    #[error("malformed response from language model: {0}")]
    InvalidResponse(String),
}

#[async_trait]
pub trait CompletionModel: Send + Sync {
    fn name(&self) -> &str;

    /// Send the full conversation and return the assistant's reply.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError>;

    /// Check that the model server is reachable.
    async fn health_check(&self) -> Result<(), LlmError>;
}

/// The configured model client, or [`FakeModel`] when `APP_USE_FAKE_LLM` is `1`/`true`.
pub fn get_default_model(settings: &LlmSettings) -> Result<Box<dyn CompletionModel>, LlmError> {
    let use_fake = std::env::var("APP_USE_FAKE_LLM").ok().map(|v| v == "1" || v.eq_ignore_ascii_case("true")).unwrap_or(false);
    if use_fake { info!("using fake language model"); return Ok(Box::new(FakeModel::new())); }
    info!(base_url = %settings.base_url, model = %settings.model, "using OpenAI-compatible language model");
    Ok(Box::new(OpenAiCompatibleClient::new(settings)?))
}
