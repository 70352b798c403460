use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use ailo_context::SourceReference;
use ailo_core::config::LlmSettings;
use ailo_core::Intent;
use ailo_llm::{ChatMessage, CompletionModel, LlmError};

use crate::citations::check_citations;
use crate::prompt::{build_messages, EMPTY_STORE_REPLY, NO_DATA_REPLY, SYSTEM_PROMPT};
use crate::retrieve::RetrievalEngine;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatReply {
    pub answer: String,
    pub intent: Intent,
    pub sources: Vec<SourceReference>,
    pub citations: usize,
    /// The missing-citation note was appended.
    pub note_added: bool,
    /// The model was asked; false for the canned no-data replies.
    pub grounded: bool,
}

impl ChatReply {
    fn canned(answer: &str, intent: Intent) -> Self {
        Self { answer: answer.to_string(), intent, sources: Vec::new(), citations: 0, note_added: false, grounded: false }
    }
}

/// A conversation with the counsellor: retrieval per turn, bounded history,
/// model call under a timeout.
pub struct ChatSession {
    engine: RetrievalEngine,
    model: Arc<dyn CompletionModel>,
    system_prompt: String,
    history: Vec<ChatMessage>,
    history_limit: usize,
    timeout: Duration,
}

impl ChatSession {
    pub fn new(engine: RetrievalEngine, model: Arc<dyn CompletionModel>, settings: &LlmSettings) -> Self {
        Self {
            engine,
            model,
            system_prompt: SYSTEM_PROMPT.to_string(),
            history: Vec::new(),
            history_limit: settings.history_messages,
            timeout: Duration::from_secs(settings.timeout_secs),
        }
    }

    pub fn with_system_prompt(mut self, prompt: impl Into<String>) -> Self { self.system_prompt = prompt.into(); self }

    pub fn with_timeout(mut self, timeout: Duration) -> Self { self.timeout = timeout; self }

    pub fn engine(&self) -> &RetrievalEngine { &self.engine }

    pub fn model_name(&self) -> &str { self.model.name() }

    /// The most recent messages, at most `history_messages` of them.
    pub fn history(&self) -> &[ChatMessage] { &self.history }

    pub fn clear_history(&mut self) {
        info!(removed = self.history.len(), "conversation history cleared");
        self.history.clear();
    }

    pub async fn health_check(&self) -> Result<(), LlmError> { self.model.health_check().await }

    /// Answer one question. Questions with no relevant documents, or none that
    /// fit the context budget, get an honest canned reply without a model call
    /// and are not added to history. Only the last `history_limit` messages
    /// are kept.
    pub async fn ask(&mut self, question: &str) -> Result<ChatReply, LlmError> {
        info!(question, "chat request");
        if self.engine.store().is_empty() {
            warn!("document store is empty");
            return Ok(ChatReply::canned(EMPTY_STORE_REPLY, Intent::General));
        }

        let retrieval = self.engine.retrieve(question);
        if retrieval.is_empty() || retrieval.sources().is_empty() {
            warn!(intent = %retrieval.intent, selected = retrieval.selected.len(), "no relevant documents in context");
            return Ok(ChatReply::canned(NO_DATA_REPLY, retrieval.intent));
        }

        let recent = &self.history[self.history.len().saturating_sub(self.history_limit)..];
        let messages = build_messages(&self.system_prompt, &retrieval.context, recent, question);
        debug!(messages = messages.len(), history = recent.len(), "calling language model");

        let answer = match tokio::time::timeout(self.timeout, self.model.complete(&messages)).await {
            Ok(result) => result?,
            Err(_) => return Err(LlmError::Timeout(self.timeout)),
        };
        info!(chars = answer.chars().count(), "answer received");

        let check = check_citations(answer, retrieval.context.char_count());
        let reply = ChatReply {
            answer: check.answer,
            intent: retrieval.intent,
            sources: retrieval.context.sources.clone(),
            citations: check.citations,
            note_added: check.note_added,
            grounded: true,
        };
        self.history.push(ChatMessage::user(question));
        self.history.push(ChatMessage::assistant(reply.answer.clone()));
        let excess = self.history.len().saturating_sub(self.history_limit);
        self.history.drain(..excess);
        Ok(reply)
    }
}
