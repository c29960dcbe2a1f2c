//! Cleaning actions and the report they produce.

use serde::Serialize;

use crate::error::Result;
use crate::schema::ResolvedColumns;

/// A cleaning rule that was applied to a table.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "rule", rename_all = "snake_case")]
pub enum CleaningAction {
    /// Exact duplicate rows were removed.
    Deduplicate { removed: usize },

    /// Missing values were filled with the column median.
    ///
    /// `median` is `None` when the column had no present values; nothing is
    /// filled in that case.
    ImputeMedian {
        column: String,
        median: Option<f64>,
        filled: usize,
    },

    /// Rows with a value outside `[min, max]` were dropped.
    RejectOutliers {
        column: String,
        min: f64,
        max: f64,
        removed: usize,
    },

    /// Values were parsed as timestamps; rows that failed were dropped.
    NormalizeTimestamps { column: String, dropped: usize },
}

impl CleaningAction {
    /// Get a human-readable description of the action.
    pub fn description(&self) -> String {
        match self {
            CleaningAction::Deduplicate { removed } => {
                format!("Removed {} duplicate rows", removed)
            }
            CleaningAction::ImputeMedian {
                column,
                median: Some(median),
                filled,
            } => {
                format!(
                    "Filled {} missing '{}' values with median {}",
                    filled, column, median
                )
            }
            CleaningAction::ImputeMedian {
                column,
                median: None,
                ..
            } => {
                format!("No values present in '{}', left missing values as-is", column)
            }
            CleaningAction::RejectOutliers {
                column,
                min,
                max,
                removed,
            } => {
                format!(
                    "Removed {} '{}' outliers (<{} or >{})",
                    removed, column, min, max
                )
            }
            CleaningAction::NormalizeTimestamps { column, dropped } => {
                format!(
                    "Converted '{}' to timestamps, dropped {} rows with invalid values",
                    column, dropped
                )
            }
        }
    }

    /// Number of rows this action removed from the table.
    pub fn rows_removed(&self) -> usize {
        match self {
            CleaningAction::Deduplicate { removed } => *removed,
            CleaningAction::ImputeMedian { .. } => 0,
            CleaningAction::RejectOutliers { removed, .. } => *removed,
            CleaningAction::NormalizeTimestamps { dropped, .. } => *dropped,
        }
    }
}

/// Result of cleaning one table.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CleaningReport {
    /// Rows before cleaning.
    pub rows_before: usize,

    /// Rows after cleaning.
    pub rows_after: usize,

    /// Columns resolved for each role.
    pub columns: ResolvedColumns,

    /// Actions in the order they were applied.
    pub actions: Vec<CleaningAction>,
}

impl CleaningReport {
    /// Create an empty report.
    pub fn new(rows_before: usize, columns: ResolvedColumns) -> Self {
        Self {
            rows_before,
            rows_after: rows_before,
            columns,
            actions: Vec::new(),
        }
    }

    /// Add an action to the report.
    pub fn add_action(&mut self, action: CleaningAction) {
        self.rows_after -= action.rows_removed();
        self.actions.push(action);
    }

    /// Duplicate rows removed.
    pub fn duplicates_removed(&self) -> usize {
        self.actions
            .iter()
            .map(|a| match a {
                CleaningAction::Deduplicate { removed } => *removed,
                _ => 0,
            })
            .sum()
    }

    /// Values filled by median imputation, across all columns.
    pub fn values_imputed(&self) -> usize {
        self.actions
            .iter()
            .map(|a| match a {
                CleaningAction::ImputeMedian { filled, .. } => *filled,
                _ => 0,
            })
            .sum()
    }

    /// Rows dropped as heart-rate outliers.
    pub fn outliers_removed(&self) -> usize {
        self.actions
            .iter()
            .map(|a| match a {
                CleaningAction::RejectOutliers { removed, .. } => *removed,
                _ => 0,
            })
            .sum()
    }

    /// Rows dropped for an invalid timestamp.
    pub fn invalid_timestamps_dropped(&self) -> usize {
        self.actions
            .iter()
            .map(|a| match a {
                CleaningAction::NormalizeTimestamps { dropped, .. } => *dropped,
                _ => 0,
            })
            .sum()
    }

    /// Median used to fill `column`, if imputation ran on it.
    pub fn median_for(&self, column: &str) -> Option<f64> {
        self.actions.iter().find_map(|a| match a {
            CleaningAction::ImputeMedian {
                column: c, median, ..
            } if c == column => *median,
            _ => None,
        })
    }

    /// Serialize the report as pretty-printed JSON.
    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }
}
