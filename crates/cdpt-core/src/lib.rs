//! cdpt-core
//!
//! Pure domain types, text transforms, policy gates, and prompt templates
//! for the cDPT assistant turn pipeline. No AWS SDK dependency; the
//! collaborator traits in [`ports`] are implemented by the adapter crates.

pub mod error;
pub mod models;
pub mod policy;
pub mod ports;
pub mod prompt;
pub mod references;
pub mod sanitize;
pub mod structured;
