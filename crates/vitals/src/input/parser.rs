//! CSV/TSV parser with delimiter detection.

use std::collections::HashSet;
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

use sha2::{Digest, Sha256};
use tracing::debug;

use super::source::{DataTable, SourceMetadata};
use super::value::Value;
use crate::error::{Result, VitalsError};

/// Delimiters to try when auto-detecting.
const DELIMITERS: &[u8] = &[b'\t', b',', b';', b'|'];

/// Parser configuration.
#[derive(Debug, Clone, Default)]
pub struct ParserConfig {
    /// Delimiter to use (None = auto-detect).
    pub delimiter: Option<u8>,
}

/// Parses delimited files with a header row into a [`DataTable`].
#[derive(Debug, Clone)]
pub struct Parser {
    config: ParserConfig,
}

impl Parser {
    /// Create a new parser with default configuration.
    pub fn new() -> Self {
        Self {
            config: ParserConfig::default(),
        }
    }

    /// Create a parser with custom configuration.
    pub fn with_config(config: ParserConfig) -> Self {
        Self { config }
    }

    /// Parse a file and return the data table and metadata.
    pub fn parse_file(&self, path: impl AsRef<Path>) -> Result<(DataTable, SourceMetadata)> {
        let path = path.as_ref();
        let io_err = |source| VitalsError::Io {
            path: path.to_path_buf(),
            source,
        };

        let mut file = File::open(path).map_err(io_err)?;
        let size_bytes = file.metadata().map_err(io_err)?.len();

        let mut contents = Vec::new();
        file.read_to_end(&mut contents).map_err(io_err)?;

        let mut hasher = Sha256::new();
        hasher.update(&contents);
        let hash = format!("sha256:{:x}", hasher.finalize());

        let delimiter = match self.config.delimiter {
            Some(d) => d,
            None => detect_delimiter(&contents)?,
        };

        let data_table = self.parse_bytes(&contents, delimiter)?;

        let format = match delimiter {
            b'\t' => "tsv",
            b',' => "csv",
            b';' => "csv-semicolon",
            b'|' => "psv",
            _ => "delimited",
        }
        .to_string();

        debug!(
            path = %path.display(),
            rows = data_table.row_count(),
            columns = data_table.column_count(),
            %format,
            "parsed delimited file"
        );

        let source_metadata = SourceMetadata::new(
            path.to_path_buf(),
            hash,
            size_bytes,
            format,
            data_table.row_count(),
            data_table.column_count(),
        );

        Ok((data_table, source_metadata))
    }

    /// Parse bytes with a known delimiter.
    pub fn parse_bytes(&self, bytes: &[u8], delimiter: u8) -> Result<DataTable> {
        let mut reader = csv::ReaderBuilder::new()
            .delimiter(delimiter)
            .has_headers(true)
            .flexible(true)
            .from_reader(bytes);

        let headers = disambiguate_headers(
            reader
                .headers()?
                .iter()
                .map(|s| s.trim_start_matches('\u{feff}').to_string()),
        );

        if headers.is_empty() || headers.iter().all(|h| h.is_empty()) {
            return Err(VitalsError::EmptyData("No columns found".to_string()));
        }

        let mut rows: Vec<Vec<Value>> = Vec::new();
        for result in reader.records() {
            let record = result?;
            rows.push(record.iter().map(Value::parse).collect());
        }

        // Short rows are padded with nulls, long rows truncated
        let mut table = DataTable::new(headers, rows);
        table.align_rows();
        Ok(table)
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new()
    }
}

/// Rename repeated header names to `name.1`, `name.2`, ... so that every
/// column can be addressed by name.
fn disambiguate_headers(headers: impl Iterator<Item = String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut result = Vec::new();

    for header in headers {
        let mut name = header.clone();
        let mut n = 1;
        while seen.contains(&name) {
            name = format!("{}.{}", header, n);
            n += 1;
        }
        seen.insert(name.clone());
        result.push(name);
    }

    result
}

/// Detect the delimiter by analyzing the first few lines.
fn detect_delimiter(bytes: &[u8]) -> Result<u8> {
    let reader = BufReader::new(bytes);
    let lines: Vec<String> = reader
        .lines()
        .take(10)
        .filter_map(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect();

    if lines.is_empty() {
        return Err(VitalsError::EmptyData("No lines to analyze".to_string()));
    }

    let mut best_delimiter = b',';
    let mut best_score = 0;

    for &delim in DELIMITERS {
        let counts: Vec<usize> = lines
            .iter()
            .map(|line| count_delimiter_in_line(line, delim))
            .collect();

        let first_count = counts[0];
        if first_count == 0 {
            continue;
        }

        let consistent = counts.iter().all(|&c| c == first_count);
        let variance: f64 = if counts.len() > 1 {
            let mean = counts.iter().sum::<usize>() as f64 / counts.len() as f64;
            counts.iter().map(|&c| (c as f64 - mean).powi(2)).sum::<f64>() / counts.len() as f64
        } else {
            0.0
        };

        // Higher count with lower variance wins; tab gets a small bonus
        let score = if consistent {
            first_count * 1000 + (if delim == b'\t' { 100 } else { 0 })
        } else if variance < 1.0 {
            first_count * 100
        } else {
            first_count
        };

        if score > best_score {
            best_score = score;
            best_delimiter = delim;
        }
    }

    Ok(best_delimiter)
}

/// Count delimiter occurrences in a line, respecting quotes.
fn count_delimiter_in_line(line: &str, delimiter: u8) -> usize {
    let delim_char = delimiter as char;
    let mut count = 0;
    let mut in_quotes = false;

    for ch in line.chars() {
        match ch {
            '"' => in_quotes = !in_quotes,
            c if c == delim_char && !in_quotes => count += 1,
            _ => {}
        }
    }

    count
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_delimiter_csv() {
        let data = b"a,b,c\n1,2,3\n4,5,6";
        assert_eq!(detect_delimiter(data).unwrap(), b',');
    }

    #[test]
    fn test_detect_delimiter_tsv() {
        let data = b"a\tb\tc\n1\t2\t3\n4\t5\t6";
        assert_eq!(detect_delimiter(data).unwrap(), b'\t');
    }

    #[test]
    fn test_detect_delimiter_ignores_quoted_commas() {
        let data = b"note;hr\n\"a, b\";72\n\"c, d\";80";
        assert_eq!(detect_delimiter(data).unwrap(), b';');
    }

    #[test]
    fn test_configured_delimiter_skips_detection() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        std::io::Write::write_all(&mut file, b"hr;note,x\n72;a,b\n").unwrap();

        let parser = Parser::with_config(ParserConfig {
            delimiter: Some(b';'),
        });
        let (table, source) = parser.parse_file(file.path()).unwrap();

        assert_eq!(source.format, "csv-semicolon");
        // Auto-detection would pick the comma here
        assert_eq!(detect_delimiter(b"hr;note,x\n72;a,b\n").unwrap(), b',');
        assert_eq!(table.headers, vec!["hr", "note,x"]);
        assert_eq!(table.get(0, 1), Some(&Value::Text("a,b".to_string())));
    }

    #[test]
    fn test_parse_csv() {
        let parser = Parser::new();
        let data = b"Patient ID,Heart Rate,Timestamp\nP1,72,2024-01-01 00:00\nP2,,2024-01-01 01:00";
        let table = parser.parse_bytes(data, b',').unwrap();

        assert_eq!(table.headers, vec!["Patient ID", "Heart Rate", "Timestamp"]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.get(0, 1), Some(&Value::Number(72.0)));
        assert_eq!(table.get(1, 1), Some(&Value::Null));
        assert_eq!(
            table.get(0, 2),
            Some(&Value::Text("2024-01-01 00:00".to_string()))
        );
    }

    #[test]
    fn test_parse_pads_short_rows() {
        let parser = Parser::new();
        let table = parser.parse_bytes(b"a,b,c\n1,2\n", b',').unwrap();

        assert_eq!(table.rows[0], vec![Value::Number(1.0), Value::Number(2.0), Value::Null]);
    }

    #[test]
    fn test_parse_header_only_yields_empty_table() {
        let parser = Parser::new();
        let table = parser.parse_bytes(b"a,b\n", b',').unwrap();

        assert_eq!(table.column_count(), 2);
        assert!(table.is_empty());
    }

    #[test]
    fn test_duplicate_headers_are_renamed() {
        let parser = Parser::new();
        let table = parser.parse_bytes(b"hr,hr,hr.1\n1,2,3\n", b',').unwrap();

        assert_eq!(table.headers, vec!["hr", "hr.1", "hr.1.1"]);
    }

    #[test]
    fn test_parse_empty_input_fails() {
        let parser = Parser::new();
        assert!(matches!(
            parser.parse_bytes(b"", b','),
            Err(VitalsError::EmptyData(_))
        ));
    }
}
