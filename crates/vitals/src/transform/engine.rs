//! Cleaning engine for vital-sign tables.

use std::collections::HashSet;

use tracing::{debug, info, warn};

use crate::input::{DataTable, Value};
use crate::schema::{ColumnResolver, ResolvedColumns, VitalRole};

use super::operations::{CleaningAction, CleaningReport};
use super::timestamp::parse_timestamp;

/// Configuration for the cleaner.
#[derive(Debug, Clone)]
pub struct CleanerConfig {
    /// Lowest plausible heart rate; lower readings are sensor errors.
    pub heart_rate_min: f64,
    /// Highest plausible heart rate; higher readings are sensor errors.
    pub heart_rate_max: f64,
}

impl Default for CleanerConfig {
    fn default() -> Self {
        Self {
            heart_rate_min: 30.0,
            heart_rate_max: 200.0,
        }
    }
}

/// Applies the cleaning rules to a table.
///
/// Rules run in a fixed order, each seeing the rows left by the previous one:
///
/// 1. remove exact duplicate rows (first occurrence kept)
/// 2. fill missing heart rate and oxygen saturation with the column median
/// 3. drop rows whose heart rate is outside the plausible range
/// 4. parse the timestamp column and drop rows where parsing fails
///
/// A rule whose column does not resolve is skipped. Cleaning never fails.
#[derive(Debug, Clone, Default)]
pub struct Cleaner {
    config: CleanerConfig,
    resolver: ColumnResolver,
}

impl Cleaner {
    /// Create a cleaner with default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a cleaner with custom configuration.
    pub fn with_config(config: CleanerConfig) -> Self {
        Self {
            config,
            resolver: ColumnResolver::new(),
        }
    }

    /// Use a custom column resolver.
    pub fn with_resolver(mut self, resolver: ColumnResolver) -> Self {
        self.resolver = resolver;
        self
    }

    /// Clean `table`, returning the cleaned table and what was done to it.
    pub fn clean(&self, mut table: DataTable) -> (DataTable, CleaningReport) {
        table.align_rows();
        let columns = self.resolver.resolve_all(&table.headers);
        log_resolution(&columns);

        let mut report = CleaningReport::new(table.row_count(), columns.clone());

        let removed = deduplicate(&mut table);
        record(&mut report, CleaningAction::Deduplicate { removed });

        for role in [VitalRole::HeartRate, VitalRole::OxygenSaturation] {
            if let Some((name, idx)) = locate(&table, &columns, role) {
                let (median, filled) = impute_median(&mut table, idx);
                record(
                    &mut report,
                    CleaningAction::ImputeMedian {
                        column: name.to_string(),
                        median,
                        filled,
                    },
                );
            }
        }

        if let Some((name, idx)) = locate(&table, &columns, VitalRole::HeartRate) {
            let (min, max) = (self.config.heart_rate_min, self.config.heart_rate_max);
            let removed = reject_outliers(&mut table, idx, min, max);
            record(
                &mut report,
                CleaningAction::RejectOutliers {
                    column: name.to_string(),
                    min,
                    max,
                    removed,
                },
            );
        }

        if let Some((name, idx)) = locate(&table, &columns, VitalRole::Timestamp) {
            let dropped = normalize_timestamps(&mut table, idx);
            record(
                &mut report,
                CleaningAction::NormalizeTimestamps {
                    column: name.to_string(),
                    dropped,
                },
            );
        }

        info!(
            rows_before = report.rows_before,
            rows_after = report.rows_after,
            "data cleaned"
        );

        (table, report)
    }
}

fn log_resolution(columns: &ResolvedColumns) {
    for role in VitalRole::ALL {
        match columns.get(role) {
            Some(column) => debug!(%role, column, "resolved column"),
            None => warn!(%role, "no matching column, skipping its rules"),
        }
    }
}

fn record(report: &mut CleaningReport, action: CleaningAction) {
    info!("transform: {}", action.description());
    report.add_action(action);
}

fn locate<'a>(
    table: &DataTable,
    columns: &'a ResolvedColumns,
    role: VitalRole,
) -> Option<(&'a str, usize)> {
    let name = columns.get(role)?;
    Some((name, table.column_index(name)?))
}

/// Remove rows equal to an earlier row. Returns the number removed.
fn deduplicate(table: &mut DataTable) -> usize {
    let before = table.rows.len();
    let mut seen = HashSet::with_capacity(before);
    let rows = std::mem::take(&mut table.rows);

    for row in rows {
        if !seen.contains(&row) {
            seen.insert(row.clone());
            table.rows.push(row);
        }
    }

    before - table.rows.len()
}

/// Median of the present numeric values, averaging the middle pair for even
/// counts.
pub(crate) fn median(values: impl IntoIterator<Item = f64>) -> Option<f64> {
    let mut values: Vec<f64> = values.into_iter().collect();
    if values.is_empty() {
        return None;
    }

    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    if values.len() % 2 == 0 {
        Some((values[mid - 1] + values[mid]) / 2.0)
    } else {
        Some(values[mid])
    }
}

/// Fill nulls in column `idx` with its median. Returns the median (if any
/// value was present) and the number of cells filled.
fn impute_median(table: &mut DataTable, idx: usize) -> (Option<f64>, usize) {
    let Some(median) = median(table.column_values(idx).filter_map(Value::as_number)) else {
        return (None, 0);
    };

    let mut filled = 0;
    for row in &mut table.rows {
        if row[idx].is_null() {
            row[idx] = Value::Number(median);
            filled += 1;
        }
    }

    (Some(median), filled)
}

/// Drop rows whose numeric value in column `idx` is outside `[min, max]`.
/// Null and non-numeric cells are kept.
fn reject_outliers(table: &mut DataTable, idx: usize, min: f64, max: f64) -> usize {
    let before = table.rows.len();
    table.rows.retain(|row| match row[idx].as_number() {
        Some(v) => (min..=max).contains(&v),
        None => true,
    });
    before - table.rows.len()
}

/// Parse column `idx` as timestamps and drop rows that do not parse.
fn normalize_timestamps(table: &mut DataTable, idx: usize) -> usize {
    let before = table.rows.len();
    for row in &mut table.rows {
        row[idx] = parse_timestamp(&row[idx]).into();
    }
    table.rows.retain(|row| !row[idx].is_null());
    before - table.rows.len()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDateTime;

    fn table(headers: &[&str], rows: &[&[&str]]) -> DataTable {
        DataTable::from_raw(headers.iter().copied(), rows.iter().map(|r| r.iter().copied()))
    }

    #[test]
    fn test_median_odd_and_even() {
        assert_eq!(median([3.0, 1.0, 2.0]), Some(2.0));
        assert_eq!(median([4.0, 1.0, 3.0, 2.0]), Some(2.5));
        assert_eq!(median(Vec::new()), None);
    }

    #[test]
    fn test_deduplicate_keeps_first_occurrence() {
        let mut t = table(
            &["id", "hr"],
            &[&["a", "70"], &["b", "80"], &["a", "70"], &["c", "90"], &["b", "80"]],
        );

        assert_eq!(deduplicate(&mut t), 2);
        let ids: Vec<String> = t.column_values(0).map(|v| v.to_string()).collect();
        assert_eq!(ids, vec!["a", "b", "c"]);
    }

    #[test]
    fn test_impute_uses_median_before_filling() {
        let mut t = table(&["Heart Rate"], &[&["60"], &[""], &["80"], &["100"], &[""]]);

        let (median, filled) = impute_median(&mut t, 0);
        assert_eq!(median, Some(80.0));
        assert_eq!(filled, 2);
        assert!(t.column_values(0).all(|v| !v.is_null()));
    }

    #[test]
    fn test_impute_all_null_column_is_noop() {
        let mut t = table(&["SpO2"], &[&[""], &["NA"]]);

        assert_eq!(impute_median(&mut t, 0), (None, 0));
        assert!(t.column_values(0).all(Value::is_null));
    }

    #[test]
    fn test_reject_outliers_keeps_inclusive_bounds() {
        let mut t = table(
            &["hr"],
            &[&["29"], &["30"], &["120"], &["200"], &["201"], &[""]],
        );

        assert_eq!(reject_outliers(&mut t, 0, 30.0, 200.0), 2);
        let kept: Vec<String> = t.column_values(0).map(|v| v.to_string()).collect();
        assert_eq!(kept, vec!["30", "120", "200", ""]);
    }

    #[test]
    fn test_normalize_timestamps_drops_invalid() {
        let mut t = table(
            &["Timestamp"],
            &[&["2024-01-01 00:00:00"], &["bad"], &[""], &["2024-01-02"]],
        );

        assert_eq!(normalize_timestamps(&mut t, 0), 2);
        assert!(t.column_values(0).all(|v| v.as_timestamp().is_some()));
    }

    #[test]
    fn test_clean_end_to_end_scenario() {
        let t = table(
            &["hr", "spo2", "ts"],
            &[
                &["72", "98", "2024-01-01T00:00"],
                &["72", "98", "2024-01-01T00:00"],
                &["999", "", "bad"],
            ],
        );
        // "hr"/"ts" do not match the default rules on their own
        let resolver = ColumnResolver::new()
            .with_pattern(VitalRole::HeartRate, crate::schema::NamePattern::all_of(["hr"]))
            .with_pattern(VitalRole::Timestamp, crate::schema::NamePattern::all_of(["ts"]));
        let cleaner = Cleaner::new().with_resolver(resolver);

        let (cleaned, report) = cleaner.clean(t);

        assert_eq!(report.duplicates_removed(), 1);
        assert_eq!(report.median_for("spo2"), Some(98.0));
        assert_eq!(report.outliers_removed(), 1);
        assert_eq!(cleaned.row_count(), 1);

        let expected_ts =
            NaiveDateTime::parse_from_str("2024-01-01 00:00:00", "%Y-%m-%d %H:%M:%S").unwrap();
        assert_eq!(
            cleaned.rows[0],
            vec![Value::Number(72.0), Value::Number(98.0), Value::Timestamp(expected_ts)]
        );
    }

    #[test]
    fn test_clean_without_roles_only_deduplicates() {
        let t = table(&["a", "b"], &[&["1", "x"], &["1", "x"], &["", "bad"]]);

        let (cleaned, report) = Cleaner::new().clean(t);

        assert_eq!(cleaned.row_count(), 2);
        assert_eq!(report.actions, vec![CleaningAction::Deduplicate { removed: 1 }]);
        assert_eq!(cleaned.rows[1][0], Value::Null);
    }

    #[test]
    fn test_clean_pads_short_rows() {
        let t = DataTable::from_raw(
            ["Patient ID", "Heart Rate", "Timestamp"],
            vec![
                vec!["P1", "72", "2024-01-01"],
                vec!["P2"],
                vec!["P3", "80"],
                vec!["P4", "90", "2024-01-02", "extra"],
            ],
        );

        let (cleaned, report) = Cleaner::new().clean(t);

        // P2 gets the median heart rate; P2 and P3 have no timestamp and are dropped
        assert_eq!(report.values_imputed(), 1);
        assert_eq!(report.invalid_timestamps_dropped(), 2);
        assert!(cleaned.rows.iter().all(|row| row.len() == 3));
        let ids: Vec<String> = cleaned.column_values(0).map(|v| v.to_string()).collect();
        assert_eq!(ids, vec!["P1", "P4"]);
    }

    #[test]
    fn test_custom_bounds() {
        let t = table(&["Heart Rate"], &[&["45"], &["55"], &["150"]]);
        let cleaner = Cleaner::with_config(CleanerConfig {
            heart_rate_min: 50.0,
            heart_rate_max: 140.0,
        });

        let (cleaned, report) = cleaner.clean(t);

        assert_eq!(report.outliers_removed(), 2);
        assert_eq!(cleaned.rows, vec![vec![Value::Number(55.0)]]);
    }
}
