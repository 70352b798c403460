pub mod config;
pub mod corpus;
pub mod error;
pub mod store;
pub mod types;

pub use store::{CategoryIndex, DocumentStore, LoadReport, SkipReason};
pub use types::{Category, DocId, Document, Intent, MetaValue, Metadata};
