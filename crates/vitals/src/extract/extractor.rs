//! Extractor trait.

use std::future::Future;

use crate::config::SourceLocation;
use crate::error::Result;
use crate::input::{DataTable, SourceMetadata};

/// Delivers the raw table for a run.
///
/// Implementations stage the source file at `source.local_path` and parse
/// it. Failures to reach the storage service must be reported as
/// [`VitalsError::Connectivity`](crate::VitalsError::Connectivity).
pub trait Extractor {
    fn extract(
        &self,
        source: &SourceLocation,
    ) -> impl Future<Output = Result<(DataTable, SourceMetadata)>>;
}
