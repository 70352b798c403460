//! ailo-rag
//!
//! End-to-end question answering: retrieve from the document store, build the
//! prompt, call the model and check the answer for citations.

pub mod chat;
pub mod citations;
pub mod prompt;
pub mod retrieve;

pub use chat::{ChatReply, ChatSession};
pub use citations::{check_citations, count_citations, CitationCheck};
pub use retrieve::{retrieve, Retrieval, RetrievalEngine};
