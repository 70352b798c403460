//! Rule-based relevance scoring.
//!
//! Every rule is a pure function of the prepared [`Query`], the document and
//! the weights, returning a non-negative contribution. The document score is
//! the sum of the relevance rules plus a small quality bonus that is only
//! awarded when at least one relevance rule fired, so a document with no
//! overlap and no alignment scores exactly zero.

use serde::Serialize;
use tracing::trace;

use ailo_core::config::ScoreWeights;
use ailo_core::{Category, Document, Intent};

use crate::terms::extract_key_terms;

/// A question prepared for scoring: key terms are extracted once, not per document.
#[derive(Debug, Clone)]
pub struct Query {
    pub terms: Vec<String>,
    pub intent: Intent,
}

impl Query {
    pub fn new(question: &str, intent: Intent) -> Self {
        Self { terms: extract_key_terms(question), intent }
    }
}

pub type RuleFn = fn(&Query, &Document, &ScoreWeights) -> f32;

pub struct ScoringRule {
    pub name: &'static str,
    pub apply: RuleFn,
}

/// Relevance rules in evaluation order.
pub const RULES: [ScoringRule; 4] = [
    ScoringRule { name: "title", apply: title_match },
    ScoringRule { name: "text", apply: text_match },
    ScoringRule { name: "intent", apply: intent_alignment },
    ScoringRule { name: "endpoint", apply: endpoint_terms },
];

/// Categories and endpoint markers that count as aligned with an intent.
pub const ALIGNMENT: &[(Intent, &[Category], &[&str])] = &[
    (Intent::Salary, &[Category::Salary], &["lonn", "lønn", "salary", "wage"]),
    (Intent::EducationPath, &[Category::Education, Category::Apprenticeship], &["utdanning", "studie", "bachelor", "master", "fagbrev"]),
    (Intent::JobDuties, &[Category::Occupation], &["beskrivelse", "oppgaver", "arbeidsoppgaver"]),
    (Intent::Comparison, &[Category::Comparison, Category::Salary], &["sammenligning", "comparison"]),
    (Intent::Definition, &[], &["beskrivelse", "info", "information"]),
    (Intent::Location, &[Category::School], &["sted", "location", "skoler", "studere"]),
    (Intent::Duration, &[], &["studiepoeng", "duration", "varighet"]),
];

/// +title_match for every key term found in the title.
pub fn title_match(query: &Query, doc: &Document, w: &ScoreWeights) -> f32 {
    let title = &doc.folded().title;
    query.terms.iter().filter(|t| title.contains(t.as_str())).count() as f32 * w.title_match
}

/// +text_occurrence per occurrence, capped per term.
pub fn text_match(query: &Query, doc: &Document, w: &ScoreWeights) -> f32 {
    let text = &doc.folded().text;
    query
        .terms
        .iter()
        .map(|t| text.matches(t.as_str()).count().min(w.text_cap_per_term) as f32 * w.text_occurrence)
        .sum()
}

/// Flat bonus, once, when the document's category or endpoint fits the intent.
pub fn intent_alignment(query: &Query, doc: &Document, w: &ScoreWeights) -> f32 {
    if query.intent == Intent::General { return 0.0; }
    let Some((_, categories, markers)) = ALIGNMENT.iter().find(|(intent, _, _)| *intent == query.intent) else {
        return 0.0;
    };
    let endpoint = &doc.folded().endpoint;
    if categories.contains(&doc.category) || markers.iter().any(|m| endpoint.contains(m)) { w.intent_alignment } else { 0.0 }
}

/// +endpoint_term for every key term found in the source endpoint.
pub fn endpoint_terms(query: &Query, doc: &Document, w: &ScoreWeights) -> f32 {
    let endpoint = &doc.folded().endpoint;
    query.terms.iter().filter(|t| endpoint.contains(t.as_str())).count() as f32 * w.endpoint_term
}

/// Mild preference for substantive documents over stubs. A single threshold
/// keeps the score monotone in the amount of matching text.
pub fn quality_bonus(doc: &Document, w: &ScoreWeights) -> f32 {
    if doc.folded().text_chars > w.min_informative_chars { w.quality_bonus } else { 0.0 }
}

/// Per-rule contributions for one document.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct ScoreBreakdown {
    pub title: f32,
    pub text: f32,
    pub intent: f32,
    pub endpoint: f32,
    pub quality: f32,
}

impl ScoreBreakdown {
    pub fn relevance(&self) -> f32 { self.title + self.text + self.intent + self.endpoint }

    pub fn total(&self) -> f32 { self.relevance() + self.quality }
}

#[derive(Debug, Clone, Default)]
pub struct Scorer {
    weights: ScoreWeights,
}

impl Scorer {
    pub fn new(weights: ScoreWeights) -> Self { Self { weights } }

    pub fn weights(&self) -> &ScoreWeights { &self.weights }

    pub fn breakdown(&self, query: &Query, doc: &Document) -> ScoreBreakdown {
        let [title, text, intent, endpoint] = RULES.map(|rule| {
            let points = (rule.apply)(query, doc, &self.weights);
            if points > 0.0 { trace!(id = %doc.id, rule = rule.name, points, "rule matched"); }
            points
        });
        let mut breakdown = ScoreBreakdown { title, text, intent, endpoint, quality: 0.0 };
        if breakdown.relevance() > 0.0 { breakdown.quality = quality_bonus(doc, &self.weights); }
        breakdown
    }

    pub fn score(&self, query: &Query, doc: &Document) -> f32 { self.breakdown(query, doc).total() }
}

/// Score one document with the default weights.
pub fn score(question: &str, intent: Intent, document: &Document) -> f32 {
    Scorer::default().score(&Query::new(question, intent), document)
}
