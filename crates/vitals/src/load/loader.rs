//! Loader trait and types.

use std::future::Future;

use serde::Serialize;

use crate::config::DatabaseTarget;
use crate::error::Result;
use crate::input::DataTable;

/// Outcome of a successful load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadSummary {
    /// Table that was replaced.
    pub table: String,
    /// Rows inserted.
    pub rows: usize,
    /// INSERT statements issued.
    pub batches: usize,
}

/// Writes the cleaned table to the target database.
///
/// Loading replaces the whole target table: any existing table of the same
/// name is dropped and recreated from the data. Implementations must verify
/// connectivity before writing and report failures to reach the database as
/// [`VitalsError::Connectivity`](crate::VitalsError::Connectivity).
pub trait Loader {
    fn load(
        &self,
        target: &DatabaseTarget,
        table: &str,
        data: &DataTable,
    ) -> impl Future<Output = Result<LoadSummary>>;
}
