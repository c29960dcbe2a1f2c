//! Messy fixture generation.
//!
//! Turns a clean table into test input for the cleaner by blanking a random
//! share of every column and appending randomly chosen duplicate rows.

use indexmap::IndexMap;
use serde::Serialize;
use tracing::info;

use crate::error::{Result, VitalsError};
use crate::input::{DataTable, Value};

/// Configuration for [`Jumbler`].
#[derive(Debug, Clone)]
pub struct JumbleConfig {
    /// Share of rows blanked in each column, sampled independently per column.
    pub missing_fraction: f64,
    /// Share of rows appended again as duplicates.
    pub duplicate_fraction: f64,
    /// Seed for reproducible output (None = random).
    pub seed: Option<u64>,
}

impl Default for JumbleConfig {
    fn default() -> Self {
        Self {
            missing_fraction: 0.1,
            duplicate_fraction: 0.05,
            seed: None,
        }
    }
}

/// What the jumbler did.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct JumbleReport {
    /// Rows in the input table.
    pub rows_before: usize,
    /// Cells set to null, per column.
    pub nulls_injected: IndexMap<String, usize>,
    /// Duplicate rows appended.
    pub duplicates_added: usize,
}

/// Injects missing values and duplicate rows.
#[derive(Debug, Clone, Default)]
pub struct Jumbler {
    config: JumbleConfig,
}

impl Jumbler {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(config: JumbleConfig) -> Self {
        Self { config }
    }

    /// Jumble `table`.
    ///
    /// Nulls are injected first; the duplicate rows are sampled afterwards,
    /// so they may carry injected nulls too.
    pub fn jumble(&self, mut table: DataTable) -> Result<(DataTable, JumbleReport)> {
        let missing = fraction(self.config.missing_fraction, "missing fraction")?;
        let duplicates = fraction(self.config.duplicate_fraction, "duplicate fraction")?;

        let mut rng = match self.config.seed {
            Some(seed) => fastrand::Rng::with_seed(seed),
            None => fastrand::Rng::new(),
        };

        table.align_rows();
        let rows_before = table.row_count();
        let mut nulls_injected = IndexMap::new();

        for (col, name) in table.headers.iter().enumerate() {
            let picked = sample_indices(&mut rng, rows_before, sample_size(rows_before, missing));
            for &row in &picked {
                table.rows[row][col] = Value::Null;
            }
            nulls_injected.insert(name.clone(), picked.len());
        }

        let picked = sample_indices(&mut rng, rows_before, sample_size(rows_before, duplicates));
        let extra: Vec<_> = picked.iter().map(|&row| table.rows[row].clone()).collect();
        let duplicates_added = extra.len();
        table.rows.extend(extra);

        info!(
            rows_before,
            rows_after = table.row_count(),
            duplicates_added,
            "data jumbled"
        );

        Ok((
            table,
            JumbleReport {
                rows_before,
                nulls_injected,
                duplicates_added,
            },
        ))
    }
}

fn fraction(value: f64, what: &str) -> Result<f64> {
    if (0.0..=1.0).contains(&value) {
        Ok(value)
    } else {
        Err(VitalsError::Config(format!(
            "{} must be between 0 and 1, got {}",
            what, value
        )))
    }
}

/// Number of rows a fraction selects, rounded to the nearest row.
fn sample_size(rows: usize, fraction: f64) -> usize {
    ((rows as f64 * fraction).round() as usize).min(rows)
}

/// Pick `k` distinct indices from `0..n` (partial Fisher-Yates).
fn sample_indices(rng: &mut fastrand::Rng, n: usize, k: usize) -> Vec<usize> {
    let mut indices: Vec<usize> = (0..n).collect();
    for i in 0..k {
        let j = rng.usize(i..n);
        indices.swap(i, j);
    }
    indices.truncate(k);
    indices
}
