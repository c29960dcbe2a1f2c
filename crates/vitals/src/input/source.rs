//! Data source abstraction and metadata.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::value::Value;

/// Metadata about the source data file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SourceMetadata {
    /// File name without path.
    pub file: String,
    /// Full path to the file.
    pub path: PathBuf,
    /// SHA-256 hash of the file contents.
    pub hash: String,
    /// File size in bytes.
    pub size_bytes: u64,
    /// Detected format (csv, tsv, etc.).
    pub format: String,
    /// Number of data rows (excluding header).
    pub row_count: usize,
    /// Number of columns.
    pub column_count: usize,
    /// When the file was read.
    pub read_at: DateTime<Utc>,
}

impl SourceMetadata {
    /// Create metadata for a file that has been read.
    pub fn new(
        path: PathBuf,
        hash: String,
        size_bytes: u64,
        format: String,
        row_count: usize,
        column_count: usize,
    ) -> Self {
        let file = path
            .file_name()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default();

        Self {
            file,
            path,
            hash,
            size_bytes,
            format,
            row_count,
            column_count,
            read_at: Utc::now(),
        }
    }
}

/// A row of cells aligned with [`DataTable::headers`].
pub type Row = Vec<Value>;

/// Tabular data held in memory for one pipeline run.
#[derive(Debug, Clone, PartialEq)]
pub struct DataTable {
    /// Column headers.
    pub headers: Vec<String>,
    /// Row data (row-major order).
    pub rows: Vec<Row>,
}

impl DataTable {
    /// Create a new data table.
    pub fn new(headers: Vec<String>, rows: Vec<Row>) -> Self {
        Self { headers, rows }
    }

    /// Build a table from raw string fields, parsing each cell.
    pub fn from_raw<H, R, F>(headers: H, rows: R) -> Self
    where
        H: IntoIterator,
        H::Item: Into<String>,
        R: IntoIterator<Item = F>,
        F: IntoIterator,
        F::Item: AsRef<str>,
    {
        let headers: Vec<String> = headers.into_iter().map(Into::into).collect();
        let rows = rows
            .into_iter()
            .map(|fields| fields.into_iter().map(|f| Value::parse(f.as_ref())).collect())
            .collect();
        Self { headers, rows }
    }

    /// Get the number of columns.
    pub fn column_count(&self) -> usize {
        self.headers.len()
    }

    /// Get the number of rows (excluding header).
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Position of a column by exact name.
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.headers.iter().position(|h| h == name)
    }

    /// Get all values for a column by index.
    pub fn column_values(&self, index: usize) -> impl Iterator<Item = &Value> {
        self.rows.iter().map(move |row| row.get(index).unwrap_or(&Value::Null))
    }

    /// Get a column by name.
    pub fn column_by_name(&self, name: &str) -> Option<Vec<&Value>> {
        let index = self.column_index(name)?;
        Some(self.column_values(index).collect())
    }

    /// Pad short rows with nulls and truncate long ones so every row has
    /// one cell per header.
    pub fn align_rows(&mut self) {
        let width = self.headers.len();
        for row in &mut self.rows {
            row.resize(width, Value::Null);
        }
    }

    /// Get a specific cell value.
    pub fn get(&self, row: usize, col: usize) -> Option<&Value> {
        self.rows.get(row).and_then(|r| r.get(col))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw_parses_cells() {
        let table = DataTable::from_raw(["hr", "note"], [["72", "ok"], ["", "late"]]);

        assert_eq!(table.column_count(), 2);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, 0), Some(&Value::Number(72.0)));
        assert_eq!(table.get(1, 0), Some(&Value::Null));
        assert_eq!(table.get(1, 1), Some(&Value::Text("late".to_string())));
    }

    #[test]
    fn test_align_rows() {
        let mut table = DataTable::from_raw(
            ["a", "b"],
            vec![vec!["1"], vec!["2", "3", "4"], vec!["5", "6"]],
        );
        table.align_rows();

        assert_eq!(table.rows[0], vec![Value::Number(1.0), Value::Null]);
        assert_eq!(table.rows[1], vec![Value::Number(2.0), Value::Number(3.0)]);
        assert_eq!(table.rows[2], vec![Value::Number(5.0), Value::Number(6.0)]);
    }

    #[test]
    fn test_column_by_name() {
        let table = DataTable::from_raw(["a", "b"], [["1", "2"], ["3", "4"]]);

        let b = table.column_by_name("b").unwrap();
        assert_eq!(b, vec![&Value::Number(2.0), &Value::Number(4.0)]);
        assert!(table.column_by_name("missing").is_none());
    }
}
