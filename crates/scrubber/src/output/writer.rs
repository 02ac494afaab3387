//! Save tables to delimited or JSON files.

use std::collections::HashSet;
use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;

use indexmap::IndexMap;

use crate::error::{Result, ScrubberError};
use crate::input::DataTable;

/// Output file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Csv,
    Tsv,
    Json,
}

impl OutputFormat {
    /// Pick a format from the file extension. Unknown extensions are CSV.
    pub fn from_path(path: &Path) -> Self {
        match path
            .extension()
            .map(|e| e.to_string_lossy().to_lowercase())
            .as_deref()
        {
            Some("tsv") | Some("tab") => OutputFormat::Tsv,
            Some("json") => OutputFormat::Json,
            _ => OutputFormat::Csv,
        }
    }
}

/// Writes a [`DataTable`] to disk.
pub struct Writer {
    format: Option<OutputFormat>,
}

impl Writer {
    /// Create a writer that infers the format from the path.
    pub fn new() -> Self {
        Self { format: None }
    }

    /// Create a writer with a fixed output format.
    pub fn with_format(format: OutputFormat) -> Self {
        Self {
            format: Some(format),
        }
    }

    /// Write the table to `path`, creating parent directories as needed.
    pub fn save(&self, table: &DataTable, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let io_err = |e| ScrubberError::Io {
            path: path.to_path_buf(),
            source: e,
        };

        let format = self.format.unwrap_or_else(|| OutputFormat::from_path(path));
        if format == OutputFormat::Json {
            // Checked before the file is created.
            check_unique_headers(table)?;
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(io_err)?;
            }
        }

        let file = File::create(path).map_err(io_err)?;
        let mut out = BufWriter::new(file);

        match format {
            OutputFormat::Csv => write_delimited(table, b',', &mut out)?,
            OutputFormat::Tsv => write_delimited(table, b'\t', &mut out)?,
            OutputFormat::Json => write_json(table, &mut out)?,
        }

        out.flush().map_err(io_err)?;

        tracing::debug!(
            path = %path.display(),
            ?format,
            rows = table.row_count(),
            "Saved table"
        );
        Ok(())
    }
}

impl Default for Writer {
    fn default() -> Self {
        Self::new()
    }
}

/// Write the table as delimited text. Nulls become empty fields.
pub(crate) fn write_delimited<W: Write>(table: &DataTable, delimiter: u8, out: W) -> Result<()> {
    let mut writer = csv::WriterBuilder::new()
        .delimiter(delimiter)
        .from_writer(out);

    writer.write_record(&table.headers)?;
    for row in &table.rows {
        writer.write_record(row.iter().map(|c| c.as_deref().unwrap_or("")))?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// JSON records are keyed by column name, so names must be unique.
fn check_unique_headers(table: &DataTable) -> Result<()> {
    let mut seen = HashSet::with_capacity(table.headers.len());
    match table.headers.iter().find(|h| !seen.insert(h.as_str())) {
        Some(column) => Err(ScrubberError::DuplicateColumn {
            column: column.clone(),
        }),
        None => Ok(()),
    }
}

/// Write the table as a JSON array of records, keyed in column order.
fn write_json<W: Write>(table: &DataTable, out: W) -> Result<()> {
    check_unique_headers(table)?;
    let records: Vec<IndexMap<&str, Option<&str>>> = table
        .rows
        .iter()
        .map(|row| {
            table
                .headers
                .iter()
                .map(String::as_str)
                .zip(row.iter().map(|c| c.as_deref()))
                .collect()
        })
        .collect();

    serde_json::to_writer_pretty(out, &records)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> DataTable {
        DataTable::from_rows(
            ["name", "city"],
            vec![
                vec![Some("Alice"), Some("New York, NY")],
                vec![Some("Bob"), None],
            ],
        )
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(OutputFormat::from_path(Path::new("a.tsv")), OutputFormat::Tsv);
        assert_eq!(OutputFormat::from_path(Path::new("a.JSON")), OutputFormat::Json);
        assert_eq!(OutputFormat::from_path(Path::new("a.csv")), OutputFormat::Csv);
        assert_eq!(OutputFormat::from_path(Path::new("a")), OutputFormat::Csv);
    }

    #[test]
    fn test_write_csv_quotes_and_nulls() {
        let mut buf = Vec::new();
        write_delimited(&sample(), b',', &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(text, "name,city\nAlice,\"New York, NY\"\nBob,\n");
    }

    #[test]
    fn test_write_json_records() {
        let mut buf = Vec::new();
        write_json(&sample(), &mut buf).unwrap();
        let value: serde_json::Value = serde_json::from_slice(&buf).unwrap();
        assert_eq!(value[0]["city"], "New York, NY");
        assert!(value[1]["city"].is_null());
    }

    #[test]
    fn test_json_rejects_duplicate_headers() {
        let table = DataTable::from_rows(
            ["firstName", "firstName"],
            vec![vec![Some("a"), Some("b")]],
        );
        let mut buf = Vec::new();
        let err = write_json(&table, &mut buf).unwrap_err();
        assert!(matches!(err, ScrubberError::DuplicateColumn { ref column } if column == "firstName"));
        assert!(buf.is_empty());

        // Delimited output keeps both columns.
        let mut buf = Vec::new();
        write_delimited(&table, b',', &mut buf).unwrap();
        assert_eq!(String::from_utf8(buf).unwrap(), "firstName,firstName\na,b\n");
    }

    #[test]
    fn test_save_json_duplicate_headers_creates_no_file() {
        let dir = tempfile::TempDir::new().unwrap();
        let path = dir.path().join("out.json");
        let table = DataTable::from_rows(["a", "b", "a"], vec![vec![Some("1"), Some("2"), Some("3")]]);

        let err = Writer::new().save(&table, &path).unwrap_err();
        assert!(matches!(err, ScrubberError::DuplicateColumn { .. }));
        assert!(!path.exists());
    }
}
