//! Run configuration.
//!
//! [`EtlSettings`] holds raw, optional values as they arrive from the
//! environment or command line. [`EtlConfig::from_settings`] validates them
//! and applies defaults once, before any collaborator is contacted.

use std::fmt;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{Result, VitalsError};

pub const DEFAULT_S3_KEY: &str = "messy_health_data.csv";
pub const DEFAULT_LOCAL_PATH: &str = "messy_health_data.csv";
pub const DEFAULT_REGION: &str = "us-east-2";
pub const DEFAULT_PORT: u16 = 5432;
pub const DEFAULT_DB_NAME: &str = "postgres";
pub const DEFAULT_TABLE: &str = "clinical_vitals";
pub const DEFAULT_BATCH_SIZE: usize = 1000;

/// Environment variable names for each setting.
pub mod env {
    pub const S3_BUCKET_NAME: &str = "S3_BUCKET_NAME";
    pub const S3_KEY: &str = "S3_KEY";
    pub const LOCAL_DATA_PATH: &str = "LOCAL_DATA_PATH";
    pub const S3_REGION: &str = "S3_REGION";
    pub const RDS_HOSTNAME: &str = "RDS_HOSTNAME";
    pub const RDS_PORT: &str = "RDS_PORT";
    pub const RDS_DB_NAME: &str = "RDS_DB_NAME";
    pub const RDS_USERNAME: &str = "RDS_USERNAME";
    pub const RDS_PASSWORD: &str = "RDS_PASSWORD";
    pub const VITALS_TABLE: &str = "VITALS_TABLE";
    pub const VITALS_BATCH_SIZE: &str = "VITALS_BATCH_SIZE";
}

/// Unvalidated settings. `None` means "not provided".
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EtlSettings {
    pub bucket: Option<String>,
    pub key: Option<String>,
    pub local_path: Option<PathBuf>,
    pub region: Option<String>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub database: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub table: Option<String>,
    pub batch_size: Option<usize>,
}

/// Where the raw CSV lives and where it is staged locally.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceLocation {
    pub bucket: String,
    pub key: String,
    pub region: String,
    pub local_path: PathBuf,
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "s3://{}/{}", self.bucket, self.key)
    }
}

/// Connection parameters for the target database.
#[derive(Clone, PartialEq, Eq)]
pub struct DatabaseTarget {
    pub host: String,
    pub port: u16,
    pub database: String,
    pub username: String,
    pub password: String,
}

// Keep the password out of logs.
impl fmt::Debug for DatabaseTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DatabaseTarget")
            .field("host", &self.host)
            .field("port", &self.port)
            .field("database", &self.database)
            .field("username", &self.username)
            .field("password", &"***")
            .finish()
    }
}

impl fmt::Display for DatabaseTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}/{}", self.host, self.port, self.database)
    }
}

/// Validated, immutable configuration for one pipeline run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EtlConfig {
    pub source: SourceLocation,
    pub database: DatabaseTarget,
    /// Target table; replaced on every run.
    pub table: String,
    /// Rows per INSERT statement.
    pub batch_size: usize,
}

impl EtlConfig {
    /// Validate settings and apply defaults.
    ///
    /// Fails with [`VitalsError::MissingSetting`] naming the environment
    /// variable of the first required setting that is absent or blank.
    pub fn from_settings(settings: EtlSettings) -> Result<Self> {
        let bucket = required(settings.bucket, env::S3_BUCKET_NAME)?;
        let host = required(settings.host, env::RDS_HOSTNAME)?;
        let username = required(settings.username, env::RDS_USERNAME)?;
        let password = required(settings.password, env::RDS_PASSWORD)?;

        let batch_size = settings.batch_size.unwrap_or(DEFAULT_BATCH_SIZE);
        if batch_size == 0 {
            return Err(VitalsError::Config(format!(
                "{} must be greater than zero",
                env::VITALS_BATCH_SIZE
            )));
        }

        let table = optional(settings.table).unwrap_or_else(|| DEFAULT_TABLE.to_string());

        Ok(Self {
            source: SourceLocation {
                bucket,
                key: optional(settings.key).unwrap_or_else(|| DEFAULT_S3_KEY.to_string()),
                region: optional(settings.region).unwrap_or_else(|| DEFAULT_REGION.to_string()),
                local_path: settings
                    .local_path
                    .unwrap_or_else(|| PathBuf::from(DEFAULT_LOCAL_PATH)),
            },
            database: DatabaseTarget {
                host,
                port: settings.port.unwrap_or(DEFAULT_PORT),
                database: optional(settings.database)
                    .unwrap_or_else(|| DEFAULT_DB_NAME.to_string()),
                username,
                password,
            },
            table,
            batch_size,
        })
    }
}

impl TryFrom<EtlSettings> for EtlConfig {
    type Error = VitalsError;

    fn try_from(settings: EtlSettings) -> Result<Self> {
        Self::from_settings(settings)
    }
}

fn optional(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

fn required(value: Option<String>, name: &'static str) -> Result<String> {
    optional(value).ok_or(VitalsError::MissingSetting(name))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn complete() -> EtlSettings {
        EtlSettings {
            bucket: Some("vitals-raw".to_string()),
            host: Some("db.internal".to_string()),
            username: Some("etl".to_string()),
            password: Some("secret".to_string()),
            ..Default::default()
        }
    }

    #[test]
    fn test_defaults_applied() {
        let config = EtlConfig::from_settings(complete()).unwrap();

        assert_eq!(config.source.key, "messy_health_data.csv");
        assert_eq!(config.source.local_path, PathBuf::from("messy_health_data.csv"));
        assert_eq!(config.source.region, "us-east-2");
        assert_eq!(config.database.port, 5432);
        assert_eq!(config.database.database, "postgres");
        assert_eq!(config.table, "clinical_vitals");
        assert_eq!(config.batch_size, 1000);
    }

    #[test]
    fn test_missing_required_setting_is_named() {
        for (settings, name) in [
            (EtlSettings { bucket: None, ..complete() }, "S3_BUCKET_NAME"),
            (EtlSettings { host: None, ..complete() }, "RDS_HOSTNAME"),
            (EtlSettings { username: None, ..complete() }, "RDS_USERNAME"),
            (EtlSettings { password: Some("  ".to_string()), ..complete() }, "RDS_PASSWORD"),
        ] {
            let err = EtlConfig::from_settings(settings).unwrap_err();
            assert!(err.is_config());
            assert!(err.to_string().contains(name), "{err} should name {name}");
        }
    }

    #[test]
    fn test_zero_batch_size_rejected() {
        let settings = EtlSettings {
            batch_size: Some(0),
            ..complete()
        };
        assert!(matches!(
            EtlConfig::from_settings(settings),
            Err(VitalsError::Config(_))
        ));
    }

    #[test]
    fn test_debug_hides_password() {
        let config = EtlConfig::from_settings(complete()).unwrap();
        let rendered = format!("{:?}", config);

        assert!(!rendered.contains("secret"));
        assert_eq!(config.database.to_string(), "db.internal:5432/postgres");
        assert_eq!(config.source.to_string(), "s3://vitals-raw/messy_health_data.csv");
    }
}
