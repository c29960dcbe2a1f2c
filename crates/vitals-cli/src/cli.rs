//! CLI argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use vitals::config::env;

/// Vitals: batch ETL for biomedical vital-sign data
#[derive(Parser)]
#[command(name = "vitals")]
#[command(version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Download, clean, and load the vitals table
    Run {
        #[command(flatten)]
        settings: SettingsArgs,

        /// Clean the already-staged local file instead of downloading it
        #[arg(long)]
        skip_download: bool,

        /// Output the run summary as JSON
        #[arg(long)]
        json: bool,
    },

    /// Clean a local CSV file without touching storage or the database
    Clean {
        /// Path to the data file (CSV/TSV)
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Output path for the cleaned data (default: <file>_clean.csv)
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Field delimiter of the input (default: auto-detect)
        #[arg(short, long)]
        delimiter: Option<char>,

        /// Output the cleaning report as JSON
        #[arg(long)]
        json: bool,
    },

    /// Make a messy copy of a clean CSV for testing the cleaner
    Jumble {
        /// Path to the clean data file (CSV/TSV)
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output path (default: messy_health_data.csv)
        #[arg(short, long, default_value = vitals::config::DEFAULT_LOCAL_PATH)]
        output: PathBuf,

        /// Share of each column to blank out
        #[arg(long, default_value = "0.1")]
        missing_fraction: f64,

        /// Share of rows to append again as duplicates
        #[arg(long, default_value = "0.05")]
        duplicate_fraction: f64,

        /// Seed for reproducible output
        #[arg(long)]
        seed: Option<u64>,
    },
}

/// Run settings; each falls back to its environment variable.
#[derive(Args, Debug, Default)]
pub struct SettingsArgs {
    /// Bucket holding the raw CSV
    #[arg(long, env = env::S3_BUCKET_NAME)]
    pub bucket: Option<String>,

    /// Object key of the raw CSV
    #[arg(long, env = env::S3_KEY)]
    pub key: Option<String>,

    /// Where the downloaded file is staged
    #[arg(long, env = env::LOCAL_DATA_PATH)]
    pub local_path: Option<PathBuf>,

    /// Object storage region
    #[arg(long, env = env::S3_REGION)]
    pub region: Option<String>,

    /// Database host
    #[arg(long, env = env::RDS_HOSTNAME)]
    pub db_host: Option<String>,

    /// Database port
    #[arg(long, env = env::RDS_PORT)]
    pub db_port: Option<u16>,

    /// Database name
    #[arg(long, env = env::RDS_DB_NAME)]
    pub db_name: Option<String>,

    /// Database user
    #[arg(long, env = env::RDS_USERNAME)]
    pub db_user: Option<String>,

    /// Database password
    #[arg(long, env = env::RDS_PASSWORD, hide_env_values = true)]
    pub db_password: Option<String>,

    /// Target table, replaced on every run
    #[arg(long, env = env::VITALS_TABLE)]
    pub table: Option<String>,

    /// Rows per INSERT statement
    #[arg(long, env = env::VITALS_BATCH_SIZE)]
    pub batch_size: Option<usize>,
}

impl From<SettingsArgs> for vitals::EtlSettings {
    fn from(args: SettingsArgs) -> Self {
        Self {
            bucket: args.bucket,
            key: args.key,
            local_path: args.local_path,
            region: args.region,
            host: args.db_host,
            port: args.db_port,
            database: args.db_name,
            username: args.db_user,
            password: args.db_password,
            table: args.table,
            batch_size: args.batch_size,
        }
    }
}
