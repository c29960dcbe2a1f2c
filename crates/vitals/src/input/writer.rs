//! CSV output for cleaned or jumbled tables.

use std::io::Write;
use std::path::Path;

use crate::error::{Result, VitalsError};

use super::source::DataTable;

/// Write a table to `path` as comma-separated values with a header row.
pub fn write_csv(table: &DataTable, path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    let file = std::fs::File::create(path).map_err(|e| VitalsError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    write_table(table, file)?;
    Ok(())
}

/// Write a table as CSV to any writer.
pub fn write_table<W: Write>(table: &DataTable, writer: W) -> Result<()> {
    let mut writer = csv::Writer::from_writer(writer);
    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|v| v.to_string()))?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::Value;

    #[test]
    fn test_write_table_renders_nulls_as_empty() {
        let mut table = DataTable::from_raw(["hr", "spo2"], [["72", "98"]]);
        table.rows.push(vec![Value::Number(80.5), Value::Null]);

        let mut out = Vec::new();
        write_table(&table, &mut out).unwrap();

        assert_eq!(String::from_utf8(out).unwrap(), "hr,spo2\n72,98\n80.5,\n");
    }
}
