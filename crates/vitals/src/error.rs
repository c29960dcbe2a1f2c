//! Error types for the vitals library.

use std::fmt;
use std::path::PathBuf;

use thiserror::Error;

/// External system a connectivity error came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Service {
    /// Object storage holding the raw CSV.
    Storage,
    /// Relational database receiving the cleaned table.
    Database,
}

impl fmt::Display for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Service::Storage => write!(f, "object storage"),
            Service::Database => write!(f, "database"),
        }
    }
}

/// Main error type for vitals operations.
#[derive(Debug, Error)]
pub enum VitalsError {
    /// Error reading or writing a local file.
    #[error("IO error for '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the CSV library.
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    /// Empty file or no data to process.
    #[error("Empty data: {0}")]
    EmptyData(String),

    /// A required setting was not provided.
    #[error("Configuration error: {0} is not set")]
    MissingSetting(&'static str),

    /// A setting was provided but is unusable.
    #[error("Configuration error: {0}")]
    Config(String),

    /// A collaborator could not be reached, timed out, or denied access.
    #[error("{service} connection error: {message}")]
    Connectivity {
        service: Service,
        message: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// Object storage failure that is not a connectivity problem.
    #[error("Object storage error: {0}")]
    Storage(#[from] object_store::Error),

    /// Database failure after the connection was established.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// JSON serialization error.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl VitalsError {
    /// Wrap an underlying error as a connectivity failure of `service`.
    pub fn connectivity(
        service: Service,
        source: impl std::error::Error + Send + Sync + 'static,
    ) -> Self {
        Self::Connectivity {
            service,
            message: source.to_string(),
            source: Box::new(source),
        }
    }

    /// Returns true for configuration errors.
    pub fn is_config(&self) -> bool {
        matches!(self, Self::MissingSetting(_) | Self::Config(_))
    }

    /// Returns true for connectivity errors.
    pub fn is_connectivity(&self) -> bool {
        matches!(self, Self::Connectivity { .. })
    }
}

/// Result type alias for vitals operations.
pub type Result<T> = std::result::Result<T, VitalsError>;
