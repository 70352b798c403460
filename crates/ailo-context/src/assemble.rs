use serde::Serialize;
use tracing::{debug, info};

use ailo_core::config::RetrievalSettings;
use ailo_core::Document;
use ailo_search::ScoredDocument;

use crate::sources::SourceResolver;

/// Appended to any text that was cut; counted inside the budget.
pub const TRUNCATION_MARKER: &str = "...";
/// A document that would be cut is still included if at least this much of
/// its text fits after the header.
pub const MIN_PARTIAL_TEXT_CHARS: usize = 200;
pub const UNTITLED: &str = "Ukjent";
const BLOCK_SEPARATOR: &str = "\n\n";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContextLimits {
    /// Upper bound for the whole context, in characters.
    pub max_chars: usize,
    /// Upper bound for one document's text, marker included.
    pub per_document_chars: usize,
}

impl Default for ContextLimits {
    fn default() -> Self { Self { max_chars: 4000, per_document_chars: 1000 } }
}

impl ContextLimits {
    pub fn from_settings(settings: &RetrievalSettings) -> Self {
        Self { max_chars: settings.max_context_chars, per_document_chars: settings.per_document_chars }
    }
}

/// Citation data for one document that made it into the context.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SourceReference {
    pub doc_id: String,
    pub title: String,
    pub url: String,
    pub api_reference: String,
    pub score: f32,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct AssembledContext {
    pub text: String,
    /// One entry per emitted document, in rank order.
    pub sources: Vec<SourceReference>,
    /// Some text was cut or some selected documents did not fit.
    pub truncated: bool,
}

impl AssembledContext {
    pub fn is_empty(&self) -> bool { self.sources.is_empty() }

    pub fn char_count(&self) -> usize { self.text.chars().count() }
}

#[derive(Debug, Clone, Default)]
pub struct ContextAssembler {
    resolver: SourceResolver,
    limits: ContextLimits,
}

impl ContextAssembler {
    pub fn new(resolver: SourceResolver, limits: ContextLimits) -> Self { Self { resolver, limits } }

    pub fn resolver(&self) -> &SourceResolver { &self.resolver }

    pub fn limits(&self) -> ContextLimits { self.limits }

    /// Render the selected documents in rank order without exceeding the
    /// character budget. Same input, same output.
    pub fn assemble(&self, selected: &[ScoredDocument<'_>]) -> AssembledContext {
        let mut out = AssembledContext::default();
        let mut used = 0usize;

        for (i, hit) in selected.iter().enumerate() {
            let doc = hit.document;
            let url = self.resolver.resolve(doc);
            let api_reference = self.resolver.api_reference(doc);
            let header = block_header(i + 1, doc, &url, &api_reference);
            let header_chars = header.chars().count();
            let separator = if out.text.is_empty() { "" } else { BLOCK_SEPARATOR };
            let room = self.limits.max_chars.saturating_sub(used + separator.len());

            let mut body = truncate_chars(doc.text.trim(), self.limits.per_document_chars);
            if body.cut { out.truncated = true; }
            let fits = header_chars + body.chars <= room;
            if !fits {
                if room < header_chars + MIN_PARTIAL_TEXT_CHARS {
                    debug!(rank = i + 1, id = %doc.id, room, "context budget exhausted");
                    out.truncated = true;
                    break;
                }
                body = truncate_chars(doc.text.trim(), room - header_chars);
                out.truncated = true;
            }

            out.text.push_str(separator);
            out.text.push_str(&header);
            out.text.push_str(&body.text);
            used += separator.len() + header_chars + body.chars;
            debug!(rank = i + 1, id = %doc.id, chars = body.chars, cut = body.cut, %url, "document added to context");
            out.sources.push(SourceReference { doc_id: doc.id.clone(), title: display_title(doc).to_string(), url, api_reference, score: hit.score });

            if !fits { break; }
        }

        if out.sources.len() < selected.len() { out.truncated = true; }
        info!(selected = selected.len(), emitted = out.sources.len(), chars = used, truncated = out.truncated, "context assembled");
        out
    }
}

/// Assemble with the default resolver and per-document budget.
pub fn assemble(selected: &[ScoredDocument<'_>], max_chars: usize) -> AssembledContext {
    let limits = ContextLimits { max_chars, ..ContextLimits::default() };
    ContextAssembler::new(SourceResolver::default(), limits).assemble(selected)
}

fn display_title(doc: &Document) -> &str {
    let title = doc.title.trim();
    if title.is_empty() { UNTITLED } else { title }
}

fn block_header(rank: usize, doc: &Document, url: &str, api_reference: &str) -> String {
    format!(
        "**Dokument {rank}: {}**\n**URL: {url}** (OPPGI DENNE KILDEN I SVARET DITT)\n**Datakilde:** {api_reference}\n\n",
        display_title(doc)
    )
}

struct Truncated {
    text: String,
    chars: usize,
    cut: bool,
}

/// Cut `text` to at most `budget` characters, marker included.
fn truncate_chars(text: &str, budget: usize) -> Truncated {
    let total = text.chars().count();
    if total <= budget { return Truncated { text: text.to_string(), chars: total, cut: false }; }
    let keep = budget.saturating_sub(TRUNCATION_MARKER.len());
    let mut cut: String = text.chars().take(keep).collect();
    cut.truncate(cut.trim_end().len());
    cut.push_str(TRUNCATION_MARKER);
    let chars = cut.chars().count();
    Truncated { text: cut, chars, cut: true }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncation_counts_the_marker() {
        let t = truncate_chars(&"æ".repeat(50), 20);
        assert!(t.cut);
        assert_eq!(t.chars, 20);
        assert!(t.text.ends_with("..."));
        assert_eq!(truncate_chars("kort", 20).text, "kort");
    }

    #[test]
    fn trailing_space_is_dropped_before_marker() {
        let t = truncate_chars("aaaa bbbb cccc", 8);
        assert_eq!(t.text, "aaaa...");
        assert_eq!(t.chars, 7);
    }
}
