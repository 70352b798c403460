use std::sync::Arc;

use serde::Serialize;
use tracing::info;

use ailo_context::{AssembledContext, ContextAssembler, ContextLimits, SourceReference, SourceResolver};
use ailo_core::config::Settings;
use ailo_core::{DocumentStore, Intent};
use ailo_search::{classify, Ranker, ScoredDocument, Scorer};

/// Everything one question produced: the ranked documents, the context built
/// from them and the sources that made it into that context.
#[derive(Debug, Clone, Serialize)]
pub struct Retrieval<'a> {
    pub intent: Intent,
    pub selected: Vec<ScoredDocument<'a>>,
    pub context: AssembledContext,
}

impl Retrieval<'_> {
    /// No document scored above the threshold.
    pub fn is_empty(&self) -> bool { self.selected.is_empty() }

    pub fn sources(&self) -> &[SourceReference] { &self.context.sources }
}

/// Classify, rank and assemble over a shared, read-only store.
#[derive(Debug, Clone)]
pub struct RetrievalEngine {
    store: Arc<DocumentStore>,
    ranker: Ranker,
    assembler: ContextAssembler,
}

impl RetrievalEngine {
    pub fn new(store: Arc<DocumentStore>, ranker: Ranker, assembler: ContextAssembler) -> Self { Self { store, ranker, assembler } }

    pub fn from_settings(store: Arc<DocumentStore>, settings: &Settings) -> Self {
        let ranker = Ranker::from_settings(&settings.retrieval);
        let assembler = ContextAssembler::new(SourceResolver::new(&settings.sources), ContextLimits::from_settings(&settings.retrieval));
        Self::new(store, ranker, assembler)
    }

    pub fn store(&self) -> &DocumentStore { &self.store }

    pub fn ranker(&self) -> &Ranker { &self.ranker }

    pub fn retrieve(&self, question: &str) -> Retrieval<'_> { run(question, &self.store, &self.ranker, &self.assembler) }

    pub fn retrieve_top(&self, question: &str, top_n: usize) -> Retrieval<'_> {
        run(question, &self.store, &self.ranker.clone().with_top_n(top_n), &self.assembler)
    }
}

/// Retrieve with default weights, limits and origins.
pub fn retrieve<'a>(question: &str, store: &'a DocumentStore, top_n: usize) -> Retrieval<'a> {
    let ranker = Ranker::new(Scorer::default(), top_n, 0.0);
    run(question, store, &ranker, &ContextAssembler::default())
}

fn run<'a>(question: &str, store: &'a DocumentStore, ranker: &Ranker, assembler: &ContextAssembler) -> Retrieval<'a> {
    let intent = classify(question);
    let selected = ranker.select(question, intent, store.documents());
    let context = assembler.assemble(&selected);
    info!(%intent, selected = selected.len(), sources = context.sources.len(), context_chars = context.char_count(), "retrieval complete");
    Retrieval { intent, selected, context }
}
