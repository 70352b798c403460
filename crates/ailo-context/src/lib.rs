//! ailo-context
//!
//! Turns ranked documents into the bounded, citation-annotated context block
//! handed to the language model.

pub mod assemble;
pub mod sources;

pub use assemble::{assemble, AssembledContext, ContextAssembler, ContextLimits, SourceReference};
pub use sources::SourceResolver;
