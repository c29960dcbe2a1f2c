//! Loading the cleaned table into a relational database.
//!
//! A load **replaces** the target table: it is dropped and recreated with
//! column types inferred from the cleaned data, then filled in batches.
//! There is no upsert or append mode.

mod loader;
mod memory;
mod postgres;

pub use loader::{LoadSummary, Loader};
pub use memory::MemoryLoader;
pub use postgres::PostgresLoader;
