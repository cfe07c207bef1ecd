//! cdpt-pipeline
//!
//! The per-turn pipeline: sanitize, gate, merge history, retrieve, assemble
//! context, generate with retry/repair, gate output, strip citations, and
//! persist the transcript.

pub mod error;
pub mod generation;
pub mod orchestrator;
pub mod persist;
pub mod reformulate;
pub mod retry;
pub mod settings;
