pub mod document;
pub mod generation;
pub mod history;
pub mod message;
pub mod token_count;
pub mod transcript;
