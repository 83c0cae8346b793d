//! Agora Matching
//!
//! The price-time priority matching algorithm for the Agora economy
//! simulation. Order books drive the level-by-level walk; this crate owns
//! the per-level fill loop.

mod price_time;

pub use price_time::{LevelFill, MatchingAlgorithm, PriceTimeMatching};
