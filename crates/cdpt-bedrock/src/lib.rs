//! cdpt-bedrock
//!
//! Bedrock adapters for the turn pipeline: Converse for generation and
//! Knowledge Base Retrieve for reference passages.

pub mod client;
pub mod converse;
pub mod error;
pub mod retrieve;
pub mod tokens;
