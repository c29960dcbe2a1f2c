//! Extractors that do not contact object storage.

use std::sync::atomic::{AtomicUsize, Ordering};

use tracing::info;

use crate::config::SourceLocation;
use crate::error::{Result, Service, VitalsError};
use crate::input::{DataTable, Parser, SourceMetadata};

use super::extractor::Extractor;

/// Reads an already-staged file at `source.local_path`, skipping the download.
#[derive(Debug, Clone, Default)]
pub struct LocalFileExtractor {
    parser: Parser,
}

impl LocalFileExtractor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Extractor for LocalFileExtractor {
    async fn extract(&self, source: &SourceLocation) -> Result<(DataTable, SourceMetadata)> {
        let (table, metadata) = self.parser.parse_file(&source.local_path)?;
        info!(
            path = %source.local_path.display(),
            rows = table.row_count(),
            "extract complete (staged file)"
        );
        Ok((table, metadata))
    }
}

/// Serves a fixed table from memory. Intended for tests.
#[derive(Debug)]
pub struct MemoryExtractor {
    table: Option<DataTable>,
    calls: AtomicUsize,
}

impl MemoryExtractor {
    /// Serve a copy of `table` on every call.
    pub fn new(table: DataTable) -> Self {
        Self {
            table: Some(table),
            calls: AtomicUsize::new(0),
        }
    }

    /// Behave like an unreachable store: every call fails with a
    /// connectivity error.
    pub fn unreachable() -> Self {
        Self {
            table: None,
            calls: AtomicUsize::new(0),
        }
    }

    /// Number of times [`Extractor::extract`] was called.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

impl Extractor for MemoryExtractor {
    async fn extract(&self, source: &SourceLocation) -> Result<(DataTable, SourceMetadata)> {
        self.calls.fetch_add(1, Ordering::SeqCst);

        let table = self.table.clone().ok_or_else(|| {
            VitalsError::connectivity(
                Service::Storage,
                std::io::Error::new(std::io::ErrorKind::TimedOut, "connection timed out"),
            )
        })?;

        let metadata = SourceMetadata::new(
            source.local_path.clone(),
            String::new(),
            0,
            "memory".to_string(),
            table.row_count(),
            table.column_count(),
        );
        Ok((table, metadata))
    }
}
