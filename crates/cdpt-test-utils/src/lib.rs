//! Test helpers shared across cdpt crates.

pub mod model;
pub mod retriever;
pub mod store;

pub use model::ScriptedModel;
pub use retriever::StaticRetriever;
pub use store::InMemoryTranscriptStore;
