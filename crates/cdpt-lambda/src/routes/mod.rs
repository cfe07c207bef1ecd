pub mod fallback;
pub mod health;
pub mod preflight;
pub mod turn;
