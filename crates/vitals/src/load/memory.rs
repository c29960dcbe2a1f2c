//! In-memory loader for testing.

use std::collections::HashMap;
use std::sync::{Mutex, PoisonError};
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::config::DatabaseTarget;
use crate::error::{Result, Service, VitalsError};
use crate::input::DataTable;

use super::loader::{LoadSummary, Loader};

/// Loader that keeps loaded tables in memory, replacing by name like the
/// real database does.
#[derive(Debug, Default)]
pub struct MemoryLoader {
    tables: Mutex<HashMap<String, DataTable>>,
    calls: AtomicUsize,
    unreachable: bool,
}

impl MemoryLoader {
    /// Create an empty loader.
    pub fn new() -> Self {
        Self::default()
    }

    /// Behave like an unreachable database.
    pub fn unreachable() -> Self {
        Self {
            unreachable: true,
            ..Self::default()
        }
    }

    /// Number of times [`Loader::load`] was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Current contents of a loaded table.
    pub fn table(&self, name: &str) -> Option<DataTable> {
        let tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        tables.get(name).cloned()
    }
}

impl Loader for MemoryLoader {
    async fn load(&self, _target: &DatabaseTarget, table: &str, data: &DataTable) -> Result<LoadSummary> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        if self.unreachable {
            return Err(VitalsError::connectivity(
                Service::Database,
                std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "connection refused"),
            ));
        }

        let mut tables = self.tables.lock().unwrap_or_else(PoisonError::into_inner);
        tables.insert(table.to_string(), data.clone());

        Ok(LoadSummary {
            table: table.to_string(),
            rows: data.row_count(),
            batches: usize::from(!data.is_empty()),
        })
    }
}
