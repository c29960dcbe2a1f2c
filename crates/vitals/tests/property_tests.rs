//! Property-based tests for the cleaner.
//!
//! These tests use proptest to generate random vital-sign tables and verify
//! that the cleaning rules maintain their invariants under all inputs.
//!
//! # Running Property Tests
//!
//! ```bash
//! cargo test -p vitals --test property_tests
//!
//! # More cases (slower but more thorough)
//! PROPTEST_CASES=10000 cargo test -p vitals --test property_tests
//! ```

use std::collections::HashSet;

use proptest::prelude::*;

use vitals::{Cleaner, ColumnResolver, DataTable, Value, VitalRole};

// =============================================================================
// Test Strategies
// =============================================================================

const HEADERS: [&str; 4] = ["Patient ID", "Heart Rate", "SpO2", "Timestamp"];

/// Heart rates including sensor errors and gaps.
fn heart_rate() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => (40u32..180).prop_map(|v| v.to_string()),
        1 => (0u32..400).prop_map(|v| v.to_string()),
        1 => Just(String::new()),
    ]
}

fn spo2() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => (900u32..1000).prop_map(|v| format!("{:.1}", v as f64 / 10.0)),
        1 => Just("NaN".to_string()),
    ]
}

/// Timestamps in a few layouts plus garbage.
fn timestamp() -> impl Strategy<Value = String> {
    prop_oneof![
        4 => (1u32..28, 0u32..24).prop_map(|(d, h)| format!("2024-01-{:02} {:02}:00:00", d, h)),
        1 => (1u32..28).prop_map(|d| format!("2024-02-{:02}T06:30", d)),
        1 => "[a-z]{0,6}",
    ]
}

/// Rows drawn from a small id pool so duplicates are common.
fn row() -> impl Strategy<Value = Vec<String>> {
    (0u32..5, heart_rate(), spo2(), timestamp())
        .prop_map(|(id, hr, ox, ts)| vec![format!("P{}", id), hr, ox, ts])
}

fn table() -> impl Strategy<Value = DataTable> {
    prop::collection::vec(row(), 0..60).prop_map(|rows| DataTable::from_raw(HEADERS, rows))
}

/// Tables with no gaps and canonical timestamps, which cleaning cannot make
/// collide.
fn clean_input_table() -> impl Strategy<Value = DataTable> {
    let row = (0u32..5, 30u32..=200, 90u32..100, 1u32..28, 0u32..24).prop_map(
        |(id, hr, ox, d, h)| {
            vec![
                format!("P{}", id),
                hr.to_string(),
                ox.to_string(),
                format!("2024-01-{:02} {:02}:00:00", d, h),
            ]
        },
    );
    prop::collection::vec(row, 0..60).prop_map(|rows| DataTable::from_raw(HEADERS, rows))
}

fn median(mut values: Vec<f64>) -> Option<f64> {
    if values.is_empty() {
        return None;
    }
    values.sort_by(|a, b| a.total_cmp(b));
    let mid = values.len() / 2;
    Some(if values.len() % 2 == 0 {
        (values[mid - 1] + values[mid]) / 2.0
    } else {
        values[mid]
    })
}

// =============================================================================
// Cleaner Properties
// =============================================================================

proptest! {
    #[test]
    fn cleaning_never_adds_rows_or_columns(t in table()) {
        let rows_before = t.row_count();
        let (cleaned, report) = Cleaner::new().clean(t);

        prop_assert!(cleaned.row_count() <= rows_before);
        prop_assert_eq!(cleaned.headers.to_vec(), HEADERS.map(String::from).to_vec());
        prop_assert_eq!(report.rows_after, cleaned.row_count());
    }

    #[test]
    fn no_duplicate_rows_survive(t in table()) {
        let (cleaned, _) = Cleaner::new().clean(t);

        let unique: HashSet<&Vec<Value>> = cleaned.rows.iter().collect();
        prop_assert_eq!(unique.len(), cleaned.row_count());
    }

    #[test]
    fn survivors_keep_original_relative_order(t in table()) {
        // Patient IDs are never rewritten; survivors must appear as a
        // subsequence of the original ID column.
        let original_ids: Vec<Value> = t.column_values(0).cloned().collect();
        let (cleaned, _) = Cleaner::new().clean(t);

        let mut cursor = 0;
        for row in &cleaned.rows {
            let found = original_ids[cursor..].iter().position(|id| *id == row[0]);
            prop_assert!(found.is_some());
            cursor += found.unwrap_or(0) + 1;
        }
    }

    #[test]
    fn imputed_median_matches_original_values(t in table()) {
        let deduped: Vec<Vec<Value>> = {
            let mut seen = HashSet::new();
            t.rows.iter().filter(|r| seen.insert((*r).clone())).cloned().collect()
        };
        let expected = median(deduped.iter().filter_map(|r| r[1].as_number()).collect());

        let (cleaned, report) = Cleaner::new().clean(t);

        prop_assert_eq!(report.median_for("Heart Rate"), expected);
        if expected.is_some() {
            prop_assert!(cleaned.column_values(1).all(|v| !v.is_null()));
            prop_assert!(cleaned.column_values(2).all(|v| !v.is_null()) || report.median_for("SpO2").is_none());
        }
    }

    #[test]
    fn heart_rate_within_bounds(t in table()) {
        let (cleaned, _) = Cleaner::new().clean(t);

        for value in cleaned.column_values(1) {
            if let Some(hr) = value.as_number() {
                prop_assert!((30.0..=200.0).contains(&hr));
            }
        }
    }

    #[test]
    fn every_timestamp_is_parsed(t in table()) {
        let (cleaned, _) = Cleaner::new().clean(t);

        prop_assert!(cleaned.column_values(3).all(|v| v.as_timestamp().is_some()));
    }

    // Only gap-free, canonical inputs: on raw tables imputation and timestamp
    // parsing can create rows that match after deduplication already ran.
    #[test]
    fn cleaning_is_idempotent(t in clean_input_table()) {
        let cleaner = Cleaner::new();
        let (once, _) = cleaner.clean(t);
        let (twice, report) = cleaner.clean(once.clone());

        prop_assert_eq!(&twice, &once);
        prop_assert_eq!(report.duplicates_removed(), 0);
        prop_assert_eq!(report.values_imputed(), 0);
    }

    #[test]
    fn resolution_ignores_case(name in "(heart_rate|Heart Rate|HEART_RATE_BPM|resting heart rate)") {
        let variants = [name.to_lowercase(), name.to_uppercase(), name.clone()];
        let resolver = ColumnResolver::new();

        for variant in variants {
            let headers = vec!["id".to_string(), variant.clone()];
            prop_assert_eq!(resolver.resolve(&headers, VitalRole::HeartRate), Some(variant.as_str()));
        }
    }
}

#[test]
fn spo2_percent_resolves_to_oxygen_saturation() {
    let headers = vec!["SpO2_Percent".to_string()];
    assert_eq!(
        ColumnResolver::new().resolve(&headers, VitalRole::OxygenSaturation),
        Some("SpO2_Percent")
    );
}
