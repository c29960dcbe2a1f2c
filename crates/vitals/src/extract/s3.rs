//! Extraction from Amazon S3.

use object_store::aws::AmazonS3Builder;
use object_store::path::Path as ObjectPath;
use object_store::ObjectStore;
use tracing::{info, instrument};

use crate::config::SourceLocation;
use crate::error::{Result, Service, VitalsError};
use crate::input::{DataTable, Parser, SourceMetadata};

use super::extractor::Extractor;

/// Error text fragments that mean the store could not be reached or refused
/// access, as opposed to e.g. a missing object. Checked after the structured
/// permission variants.
const CONNECTIVITY_MARKERS: &[&str] = &[
    "timeout",
    "timed out",
    "access denied",
    "accessdenied",
    "forbidden",
    "permission denied",
    "unauthenticated",
    "invalidaccesskeyid",
    "signaturedoesnotmatch",
    "error sending request",
    "connection refused",
    "dns error",
];

/// Downloads the source object with the standard AWS credential chain
/// (`AWS_*` environment variables, profiles, instance metadata).
#[derive(Debug, Clone, Default)]
pub struct S3Extractor {
    parser: Parser,
}

impl S3Extractor {
    /// Create an extractor with the default parser.
    pub fn new() -> Self {
        Self::default()
    }

    /// Use a custom parser for the downloaded file.
    pub fn with_parser(parser: Parser) -> Self {
        Self { parser }
    }
}

impl Extractor for S3Extractor {
    #[instrument(skip_all, fields(source = %source), err)]
    async fn extract(&self, source: &SourceLocation) -> Result<(DataTable, SourceMetadata)> {
        let store = AmazonS3Builder::from_env()
            .with_bucket_name(&source.bucket)
            .with_region(&source.region)
            .build()
            .map_err(classify)?;

        let location = ObjectPath::from(source.key.as_str());
        let bytes = store
            .get(&location)
            .await
            .map_err(classify)?
            .bytes()
            .await
            .map_err(classify)?;

        tokio::fs::write(&source.local_path, &bytes)
            .await
            .map_err(|e| VitalsError::Io {
                path: source.local_path.clone(),
                source: e,
            })?;
        info!(
            bytes = bytes.len(),
            path = %source.local_path.display(),
            "S3 download complete"
        );

        let (table, metadata) = self.parser.parse_file(&source.local_path)?;
        info!(rows = table.row_count(), columns = table.column_count(), "extract complete");

        Ok((table, metadata))
    }
}

/// Sort an object store failure into connectivity vs everything else.
pub(crate) fn classify(err: object_store::Error) -> VitalsError {
    match err {
        object_store::Error::PermissionDenied { .. } | object_store::Error::Unauthenticated { .. } => {
            VitalsError::connectivity(Service::Storage, err)
        }
        // Timeouts and transport failures only surface in the message
        _ if is_connectivity_message(&err.to_string()) => {
            VitalsError::connectivity(Service::Storage, err)
        }
        _ => VitalsError::Storage(err),
    }
}

fn is_connectivity_message(message: &str) -> bool {
    let lowered = message.to_lowercase();
    CONNECTIVITY_MARKERS.iter().any(|m| lowered.contains(m))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_connectivity_messages() {
        assert!(is_connectivity_message("Operation timed out"));
        assert!(is_connectivity_message("Client error with status 403 Forbidden: AccessDenied"));
        assert!(is_connectivity_message("error sending request for url"));
        assert!(!is_connectivity_message("Object at location raw.csv not found"));
    }

    #[test]
    fn test_classify_not_found_is_storage_error() {
        let err = object_store::Error::NotFound {
            path: "raw.csv".to_string(),
            source: "no such key".into(),
        };
        assert!(matches!(classify(err), VitalsError::Storage(_)));
    }

    #[test]
    fn test_classify_access_variants_are_connectivity() {
        let denied = object_store::Error::PermissionDenied {
            path: "raw.csv".to_string(),
            source: "bucket policy".into(),
        };
        let unauthenticated = object_store::Error::Unauthenticated {
            path: "raw.csv".to_string(),
            source: "expired token".into(),
        };

        assert!(classify(denied).is_connectivity());
        assert!(classify(unauthenticated).is_connectivity());
    }

    #[test]
    fn test_classify_timeout_is_connectivity() {
        let err = object_store::Error::Generic {
            store: "S3",
            source: "request timed out".into(),
        };
        let classified = classify(err);
        assert!(classified.is_connectivity());
        assert!(classified.to_string().starts_with("object storage connection error"));
    }
}
