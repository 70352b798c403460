//! ailo-search
//!
//! Lexical relevance search over an in-memory [`DocumentStore`]: key-term
//! extraction, question intent classification, rule-based scoring and top-N
//! selection.
//!
//! [`DocumentStore`]: ailo_core::DocumentStore

pub mod intent;
pub mod rank;
pub mod score;
pub mod terms;

pub use intent::classify;
pub use rank::{select, Ranker, ScoredDocument};
pub use score::{score, Query, ScoreBreakdown, Scorer};
pub use terms::extract_key_terms;
