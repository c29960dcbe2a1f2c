//! Cleaning rules for vital-sign tables.

mod engine;
mod operations;
mod timestamp;

pub use engine::{Cleaner, CleanerConfig};
pub use operations::{CleaningAction, CleaningReport};
pub use timestamp::parse_timestamp;
