use rayon::prelude::*;
use serde::Serialize;
use tracing::{debug, info};

use ailo_core::config::RetrievalSettings;
use ailo_core::{Document, Intent};

use crate::score::{Query, ScoreBreakdown, Scorer};

/// Log per-document breakdowns above this score at debug level.
const DEBUG_SCORE_THRESHOLD: f32 = 5.0;

/// A selected document with its score. Higher is always better.
#[derive(Debug, Clone, Serialize)]
pub struct ScoredDocument<'a> {
    pub document: &'a Document,
    pub score: f32,
    pub breakdown: ScoreBreakdown,
}

/// Scores every document, keeps positive scores at or above `min_score`, and
/// returns the best `top_n` in descending order. Equal scores keep their
/// store order.
#[derive(Debug, Clone)]
pub struct Ranker {
    scorer: Scorer,
    top_n: usize,
    min_score: f32,
}

impl Ranker {
    pub fn new(scorer: Scorer, top_n: usize, min_score: f32) -> Self { Self { scorer, top_n, min_score } }

    pub fn from_settings(settings: &RetrievalSettings) -> Self {
        Self::new(Scorer::new(settings.weights.clone()), settings.top_n, settings.min_score)
    }

    pub fn with_top_n(mut self, top_n: usize) -> Self { self.top_n = top_n; self }

    pub fn top_n(&self) -> usize { self.top_n }

    pub fn select<'a>(&self, question: &str, intent: Intent, documents: &'a [Document]) -> Vec<ScoredDocument<'a>> {
        let query = Query::new(question, intent);
        debug!(terms = ?query.terms, %intent, "scoring documents");

        // collect() keeps input order, so the stable sort below ties on store order
        let mut hits: Vec<ScoredDocument<'a>> = documents
            .par_iter()
            .filter_map(|doc| {
                let breakdown = self.scorer.breakdown(&query, doc);
                let score = breakdown.total();
                if score > DEBUG_SCORE_THRESHOLD { debug!(id = %doc.id, score, ?breakdown, "scored document"); }
                (score > 0.0 && score >= self.min_score).then_some(ScoredDocument { document: doc, score, breakdown })
            })
            .collect();
        let matched = hits.len();

        hits.sort_by(|a, b| b.score.total_cmp(&a.score));
        hits.truncate(self.top_n);

        info!(question, %intent, scanned = documents.len(), matched, returned = hits.len(), "selection complete");
        for (rank, hit) in hits.iter().enumerate() {
            debug!(rank = rank + 1, id = %hit.document.id, score = hit.score, title = %hit.document.title, "selected");
        }
        hits
    }
}

/// Select with the default weights.
pub fn select<'a>(question: &str, intent: Intent, documents: &'a [Document], top_n: usize, min_score: f32) -> Vec<ScoredDocument<'a>> {
    Ranker::new(Scorer::default(), top_n, min_score).select(question, intent, documents)
}
