//! Vitals: batch ETL for biomedical vital-sign tables.
//!
//! A run downloads a CSV from object storage, cleans it with a fixed set of
//! deterministic rules, and replaces a table in PostgreSQL with the result.
//!
//! # Cleaning rules
//!
//! Columns are located by name heuristics rather than a fixed schema (see
//! [`ColumnResolver`]). The rules then run in this order:
//!
//! - **Deduplicate**: drop exact duplicate rows, keeping the first
//! - **Impute**: fill missing heart rate and oxygen saturation with the median
//! - **Reject outliers**: drop heart rates outside 30-200 bpm
//! - **Normalize timestamps**: parse timestamps, dropping rows that fail
//!
//! # Example
//!
//! ```no_run
//! use vitals::{Cleaner, Parser};
//!
//! let (table, _source) = Parser::new().parse_file("messy_health_data.csv").unwrap();
//! let (cleaned, report) = Cleaner::new().clean(table);
//!
//! println!("Rows: {} -> {}", report.rows_before, cleaned.row_count());
//! ```

pub mod config;
pub mod error;
pub mod extract;
pub mod input;
pub mod jumble;
pub mod load;
pub mod schema;
pub mod transform;

mod pipeline;

pub use crate::pipeline::{Pipeline, RunSummary, Stage, run_with_settings};
pub use config::{DatabaseTarget, EtlConfig, EtlSettings, SourceLocation};
pub use error::{Result, Service, VitalsError};
pub use extract::{Extractor, LocalFileExtractor, MemoryExtractor, S3Extractor};
pub use input::{DataTable, Parser, ParserConfig, SourceMetadata, Value, write_csv};
pub use jumble::{JumbleConfig, JumbleReport, Jumbler};
pub use load::{LoadSummary, Loader, MemoryLoader, PostgresLoader};
pub use schema::{ColumnResolver, ColumnType, NamePattern, ResolvedColumns, VitalRole};
pub use transform::{Cleaner, CleanerConfig, CleaningAction, CleaningReport};
