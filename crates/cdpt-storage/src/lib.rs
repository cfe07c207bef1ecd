//! cdpt-storage
//!
//! S3-backed conversation transcripts. Thin wrapper around the AWS S3 SDK.

pub mod client;
pub mod error;
pub mod keys;
pub mod objects;
pub mod transcripts;
