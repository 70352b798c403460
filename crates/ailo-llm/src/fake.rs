use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use crate::{ChatMessage, CompletionModel, LlmError};

const URL_PREFIX: &str = "**URL: ";
const DOC_PREFIX: &str = "**Dokument 1: ";

/// Deterministic offline model. Without a fixed reply it answers from the
/// most recent message carrying a context block and cites its first URL.
#[derive(Debug, Default)]
pub struct FakeModel {
    reply: Option<String>,
    calls: AtomicUsize,
}

impl FakeModel {
    pub fn new() -> Self { Self::default() }

    /// Always answer with `reply`.
    pub fn with_reply(reply: impl Into<String>) -> Self { Self { reply: Some(reply.into()), calls: AtomicUsize::new(0) } }

    /// Number of `complete` calls so far.
    pub fn calls(&self) -> usize { self.calls.load(Ordering::SeqCst) }
}

#[async_trait]
impl CompletionModel for FakeModel {
    fn name(&self) -> &str { "fake" }

    async fn complete(&self, messages: &[ChatMessage]) -> Result<String, LlmError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if let Some(reply) = &self.reply { return Ok(reply.clone()); }
        let prompt = messages.iter().rev().map(|m| m.content.as_str()).find(|c| c.contains(URL_PREFIX)).unwrap_or_default();
        Ok(match (first_field(prompt, DOC_PREFIX), first_field(prompt, URL_PREFIX)) {
            (Some(title), Some(url)) => format!("Her er det jeg fant om {title} i dataene fra utdanning.no. (Kilde: {url})"),
            (None, Some(url)) => format!("Her er det jeg fant i dataene fra utdanning.no. (Kilde: {url})"),
            _ => "Jeg har dessverre ikke informasjon om dette i databasen min.".to_string(),
        })
    }

    async fn health_check(&self) -> Result<(), LlmError> { Ok(()) }
}

/// Text between `prefix` and the closing `**` on the first matching line.
fn first_field<'a>(text: &'a str, prefix: &str) -> Option<&'a str> {
    text.lines().find_map(|line| line.strip_prefix(prefix)?.split("**").next()).map(str::trim).filter(|s| !s.is_empty())
}
