//! Extraction of the raw table from object storage.
//!
//! # Available extractors
//!
//! - [`S3Extractor`] - downloads from S3 into the staging path (credentials
//!   from the standard AWS environment)
//! - [`LocalFileExtractor`] - reads a file that is already staged
//! - [`MemoryExtractor`] - serves a fixed table, for tests

mod extractor;
mod local;
mod s3;

pub use extractor::Extractor;
pub use local::{LocalFileExtractor, MemoryExtractor};
pub use s3::S3Extractor;
