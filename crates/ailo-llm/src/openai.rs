//! Client for OpenAI-compatible chat completion servers (LM Studio, llama.cpp, Ollama).

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use tracing::debug;

use ailo_core::config::LlmSettings;

use crate::{ChatMessage, CompletionModel, LlmError};

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    temperature: f32,
    max_tokens: u32,
    stream: bool,
}

pub struct OpenAiCompatibleClient {
    base_url: String,
    model: String,
    api_key: Option<String>,
    temperature: f32,
    max_tokens: u32,
    timeout: Duration,
    client: reqwest::Client,
}

impl OpenAiCompatibleClient {
    pub fn new(settings: &LlmSettings) -> Result<Self, LlmError> {
        let timeout = Duration::from_secs(settings.timeout_secs);
        let client = reqwest::Client::builder().timeout(timeout).build().map_err(LlmError::Client)?;
        Ok(Self {
            base_url: settings.base_url.trim_end_matches('/').to_string(),
            model: settings.model.clone(),
            api_key: settings.api_key.clone().filter(|k| !k.is_empty()),
            temperature: settings.temperature,
            max_tokens: settings.max_tokens,
            timeout,
            client,
        })
    }

    pub fn base_url(&self) -> &str { &self.base_url }

    fn apply_auth(&self, req: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => req.bearer_auth(key),
            None => req,
        }
    }

    fn transport_error(&self, url: &str, e: reqwest::Error) -> LlmError {
        if e.is_timeout() { LlmError::Timeout(self.timeout) } else { LlmError::Connection { url: url.to_string(), source: e } }
    }
}

#[async_trait]
impl CompletionModel for OpenAiCompatibleClient {
    fn name(&self) -> &str { &self.model }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        let url = format!("{}/chat/completions", self.base_url);
        let body = ChatRequest { model: &self.model, messages, temperature: self.temperature, max_tokens: self.max_tokens, stream: false };
        debug!(%url, messages = messages.len(), "sending chat completion request");

        let resp = self.apply_auth(self.client.post(&url).json(&body)).send().await.map_err(|e| self.transport_error(&url, e))?;
        let status = resp.status();
        if !status.is_success() {
            let text = resp.text().await.unwrap_or_default();
            return Err(LlmError::Status { status: status.as_u16(), body: text });
        }
        let json: Value = resp.json().await.map_err(|e| LlmError::InvalidResponse(e.to_string()))?;
        parse_completion(&json)
    }

    async fn health_check(&self) -> Result<(), LlmError> {
        let url = format!("{}/models", self.base_url);
        let resp = self.apply_auth(self.client.get(&url)).send().await.map_err(|e| self.transport_error(&url, e))?;
        if resp.status().is_success() { Ok(()) } else { Err(LlmError::Status { status: resp.status().as_u16(), body: String::new() }) }
    }
}

/// Reads `choices[0].message.content`.
fn parse_completion(json: &Value) -> Result<String, LlmError> {
    let choice = json["choices"].get(0).ok_or_else(|| LlmError::InvalidResponse("no choices in response".into()))?;
    choice["message"]["content"]
        .as_str()
        .map(|s| s.trim().to_string())
        .ok_or_else(|| LlmError::InvalidResponse("choice has no message content".into()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn reads_first_choice() {
        let body = json!({"choices": [{"message": {"role": "assistant", "content": " Hei! "}}, {"message": {"content": "nei"}}]});
        assert_eq!(parse_completion(&body).unwrap(), "Hei!");
    }

    #[test]
    fn rejects_empty_choices() {
        assert!(matches!(parse_completion(&json!({"choices": []})), Err(LlmError::InvalidResponse(_))));
        assert!(matches!(parse_completion(&json!({"choices": [{"message": {}}]})), Err(LlmError::InvalidResponse(_))));
    }
}
