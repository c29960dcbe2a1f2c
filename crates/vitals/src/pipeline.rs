//! Pipeline driver: extract, clean, load.

use std::fmt;

use serde::Serialize;
use tracing::{error, info};

use crate::config::{EtlConfig, EtlSettings};
use crate::error::Result;
use crate::extract::Extractor;
use crate::input::SourceMetadata;
use crate::load::{LoadSummary, Loader};
use crate::transform::{Cleaner, CleaningReport};

/// Stage of a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Extracting,
    Cleaning,
    Loading,
    Done,
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Stage::Extracting => write!(f, "extracting"),
            Stage::Cleaning => write!(f, "cleaning"),
            Stage::Loading => write!(f, "loading"),
            Stage::Done => write!(f, "done"),
        }
    }
}

/// Result of a completed run.
#[derive(Debug, Clone, Serialize)]
pub struct RunSummary {
    /// Metadata about the extracted file.
    pub source: SourceMetadata,
    /// What the cleaner did.
    pub cleaning: CleaningReport,
    /// What was written to the database.
    pub load: LoadSummary,
}

impl RunSummary {
    /// Serialize the summary as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}

/// Runs extract → clean → load once, without retries.
///
/// Any stage failure aborts the run; there is no partial-completion state to
/// resume from.
#[derive(Debug, Clone)]
pub struct Pipeline<'a> {
    config: &'a EtlConfig,
    cleaner: Cleaner,
}

impl<'a> Pipeline<'a> {
    /// Create a pipeline with the default cleaner.
    pub fn new(config: &'a EtlConfig) -> Self {
        Self {
            config,
            cleaner: Cleaner::new(),
        }
    }

    /// Use a custom cleaner.
    pub fn with_cleaner(mut self, cleaner: Cleaner) -> Self {
        self.cleaner = cleaner;
        self
    }

    /// Execute the run.
    pub async fn run<E, L>(&self, extractor: &E, loader: &L) -> Result<RunSummary>
    where
        E: Extractor,
        L: Loader,
    {
        enter(Stage::Extracting);
        let (table, source) = extractor
            .extract(&self.config.source)
            .await
            .inspect_err(|e| failed(Stage::Extracting, e))?;

        enter(Stage::Cleaning);
        let (table, cleaning) = self.cleaner.clean(table);

        enter(Stage::Loading);
        let load = loader
            .load(&self.config.database, &self.config.table, &table)
            .await
            .inspect_err(|e| failed(Stage::Loading, e))?;

        enter(Stage::Done);
        info!("ETL pipeline complete");

        Ok(RunSummary {
            source,
            cleaning,
            load,
        })
    }
}

/// Validate `settings` and run the pipeline.
///
/// Configuration problems are reported before either collaborator is used.
pub async fn run_with_settings<E, L>(
    settings: EtlSettings,
    extractor: &E,
    loader: &L,
) -> Result<RunSummary>
where
    E: Extractor,
    L: Loader,
{
    let config = EtlConfig::from_settings(settings)?;
    Pipeline::new(&config).run(extractor, loader).await
}

fn enter(stage: Stage) {
    info!(%stage, "pipeline stage");
}

fn failed(stage: Stage, err: &crate::VitalsError) {
    error!(%stage, error = %err, "pipeline stage failed");
}
