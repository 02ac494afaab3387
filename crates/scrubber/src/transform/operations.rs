//! Transform variants and how each one changes a table.

use std::collections::HashSet;
use std::path::PathBuf;

use chrono::Local;

use crate::error::{Result, ScrubberError};
use crate::input::{Cell, DataTable, Parser, ParserConfig};
use crate::output::Writer;

use super::column::{DateConverter, camel_case, is_valid_email};

/// A transform scoped to a single named column.
///
/// Only these can be wrapped by [`Filter`], which uses the column as the key
/// for its set difference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColumnTransform {
    /// Keep rows where the column is null.
    IsNa { column: String },

    /// Keep rows where the column is not null.
    NotNa { column: String },

    /// Remove the column.
    DropColumn { column: String },

    /// Lowercase string values.
    Lower { column: String },

    /// Trim surrounding whitespace from string values.
    Strip { column: String },

    /// Literal substring replacement, all occurrences.
    Replace {
        column: String,
        find: String,
        replace: String,
    },

    /// Keep rows whose value is a well-formed email address.
    ValidEmail { column: String },

    /// Reparse dates (read as UTC) and render them in the local timezone.
    DateConvert {
        column: String,
        converter: DateConverter,
    },
}

impl ColumnTransform {
    /// Registry name of this transform.
    pub fn name(&self) -> &'static str {
        match self {
            ColumnTransform::IsNa { .. } => "is-na",
            ColumnTransform::NotNa { .. } => "not-na",
            ColumnTransform::DropColumn { .. } => "drop-column",
            ColumnTransform::Lower { .. } => "lower",
            ColumnTransform::Strip { .. } => "strip",
            ColumnTransform::Replace { .. } => "replace",
            ColumnTransform::ValidEmail { .. } => "valid-email",
            ColumnTransform::DateConvert { .. } => "date-convert",
        }
    }

    /// The column this transform targets.
    pub fn column(&self) -> &str {
        match self {
            ColumnTransform::IsNa { column }
            | ColumnTransform::NotNa { column }
            | ColumnTransform::DropColumn { column }
            | ColumnTransform::Lower { column }
            | ColumnTransform::Strip { column }
            | ColumnTransform::Replace { column, .. }
            | ColumnTransform::ValidEmail { column }
            | ColumnTransform::DateConvert { column, .. } => column,
        }
    }

    /// Get a human-readable description of the operation.
    pub fn description(&self) -> String {
        match self {
            ColumnTransform::IsNa { column } => format!("Keep rows where '{}' is null", column),
            ColumnTransform::NotNa { column } => {
                format!("Keep rows where '{}' is not null", column)
            }
            ColumnTransform::DropColumn { column } => format!("Drop column '{}'", column),
            ColumnTransform::Lower { column } => format!("Lowercase '{}'", column),
            ColumnTransform::Strip { column } => format!("Strip whitespace in '{}'", column),
            ColumnTransform::Replace {
                column,
                find,
                replace,
            } => format!("Replace '{}' → '{}' in '{}'", find, replace, column),
            ColumnTransform::ValidEmail { column } => {
                format!("Keep rows with a valid email in '{}'", column)
            }
            ColumnTransform::DateConvert { column, converter } => format!(
                "Convert dates in '{}' from '{}' to '{}'",
                column,
                converter.parse_format(),
                converter.render_format()
            ),
        }
    }

    /// Apply the transform, returning the new table.
    pub fn apply(&self, table: DataTable) -> Result<DataTable> {
        let column = self.column();
        match self {
            ColumnTransform::IsNa { .. } => {
                let index = table.require_column(column)?;
                Ok(table.filter_rows(|row| cell(row, index).is_none()))
            }
            ColumnTransform::NotNa { .. } => {
                let index = table.require_column(column)?;
                Ok(table.filter_rows(|row| cell(row, index).is_some()))
            }
            ColumnTransform::DropColumn { .. } => table.drop_column(column),
            ColumnTransform::Lower { .. } => table.map_column(column, |v| Ok(v.to_lowercase())),
            ColumnTransform::Strip { .. } => table.map_column(column, |v| Ok(v.trim().to_string())),
            ColumnTransform::Replace { find, replace, .. } => {
                table.map_column(column, |v| Ok(v.replace(find.as_str(), replace)))
            }
            ColumnTransform::ValidEmail { .. } => {
                let index = table.require_column(column)?;
                Ok(table.filter_rows(|row| cell(row, index).is_some_and(is_valid_email)))
            }
            ColumnTransform::DateConvert { converter, .. } => {
                table.map_column(column, |v| converter.convert(v, &Local))
            }
        }
    }
}

/// A row's value at `index`. Cells past the end of a short row read as null.
fn cell(row: &[Cell], index: usize) -> Option<&str> {
    row.get(index).and_then(|c| c.as_deref())
}

/// Inverts a column transform: drops every row whose key survives the inner
/// transform.
///
/// The key is the inner transform's column. The inner transform runs on a
/// copy of the table; every original row whose key value appears in its
/// output is removed. Null keys match each other.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Filter {
    inner: ColumnTransform,
}

impl Filter {
    pub fn new(inner: ColumnTransform) -> Self {
        Self { inner }
    }

    pub fn inner(&self) -> &ColumnTransform {
        &self.inner
    }

    pub fn apply(&self, table: DataTable) -> Result<DataTable> {
        let key = self.inner.column();

        let kept = self.inner.apply(table.clone())?;
        let kept_index = kept.require_column(key)?;
        let kept_keys: HashSet<Option<&str>> = kept.column_values(kept_index).collect();

        let index = table.require_column(key)?;
        let before = table.row_count();
        let result = table.filter_rows(|row| !kept_keys.contains(&cell(row, index)));

        tracing::debug!(
            inner = self.inner.name(),
            key,
            removed = before - result.row_count(),
            "Filtered rows by key"
        );
        Ok(result)
    }
}

/// A constructed transform, ready to run against a table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Transform {
    /// Print the table to stdout.
    Print,

    /// Print the column names to stdout.
    PrintColumns,

    /// Replace the working table with one loaded from a file.
    Open {
        path: PathBuf,
        parser: ParserConfig,
    },

    /// Write the table to a file.
    Save { path: PathBuf },

    /// Rename every column to camelCase.
    CamelCase,

    /// Remove the rows an inner column transform would keep.
    Filter(Filter),

    /// A transform scoped to one column.
    Column(ColumnTransform),
}

impl Transform {
    /// Registry name of this transform.
    pub fn name(&self) -> &'static str {
        match self {
            Transform::Print => "print",
            Transform::PrintColumns => "print-columns",
            Transform::Open { .. } => "open",
            Transform::Save { .. } => "save",
            Transform::CamelCase => "camelcase",
            Transform::Filter(_) => "filter",
            Transform::Column(inner) => inner.name(),
        }
    }

    /// The target column, for column-scoped transforms.
    pub fn column(&self) -> Option<&str> {
        match self {
            Transform::Column(inner) => Some(inner.column()),
            _ => None,
        }
    }

    /// Get a human-readable description of the operation.
    pub fn description(&self) -> String {
        match self {
            Transform::Print => "Print table".to_string(),
            Transform::PrintColumns => "Print column names".to_string(),
            Transform::Open { path, .. } => format!("Open '{}'", path.display()),
            Transform::Save { path } => format!("Save to '{}'", path.display()),
            Transform::CamelCase => "Rename columns to camelCase".to_string(),
            Transform::Filter(filter) => {
                format!("Filter out: {}", filter.inner().description())
            }
            Transform::Column(inner) => inner.description(),
        }
    }

    /// Apply the transform to the working table.
    ///
    /// Everything except `open` needs a table.
    pub fn apply(&self, table: Option<DataTable>) -> Result<DataTable> {
        match self {
            Transform::Open { path, parser } => {
                if table.is_some() {
                    tracing::debug!(path = %path.display(), "Discarding working table");
                }
                let (loaded, source) = Parser::with_config(parser.clone()).parse_file(path)?;
                tracing::info!(
                    file = %source.file,
                    hash = %source.hash,
                    rows = source.row_count,
                    columns = source.column_count,
                    "Opened table"
                );
                Ok(loaded)
            }
            Transform::Print => {
                let table = self.require(table)?;
                println!("{}", table);
                Ok(table)
            }
            Transform::PrintColumns => {
                let table = self.require(table)?;
                println!("{}", table.columns_line());
                Ok(table)
            }
            Transform::Save { path } => {
                let table = self.require(table)?;
                Writer::new().save(&table, path)?;
                Ok(table)
            }
            Transform::CamelCase => Ok(self.require(table)?.rename_columns(camel_case)),
            Transform::Filter(filter) => filter.apply(self.require(table)?),
            Transform::Column(inner) => inner.apply(self.require(table)?),
        }
    }

    fn require(&self, table: Option<DataTable>) -> Result<DataTable> {
        table.ok_or_else(|| ScrubberError::NoTable {
            transform: self.name().to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn contacts() -> DataTable {
        DataTable::from_rows(
            ["id", "First Name", "email", "joined"],
            vec![
                vec![Some("1"), Some("  Alice "), Some("alice@example.com"), Some("2023-01-15 12:00")],
                vec![Some("2"), Some("BOB"), None, Some("2023-02-01 12:00")],
                vec![Some("3"), None, Some("not-an-email"), Some("2023-03-10 12:00")],
            ],
        )
    }

    fn column(name: &str) -> String {
        name.to_string()
    }

    #[test]
    fn test_is_na_and_not_na() {
        let is_na = ColumnTransform::IsNa { column: column("email") }
            .apply(contacts())
            .unwrap();
        assert_eq!(is_na.column_by_name("id").unwrap(), vec![Some("2")]);

        let not_na = ColumnTransform::NotNa { column: column("email") }
            .apply(contacts())
            .unwrap();
        assert_eq!(not_na.column_by_name("id").unwrap(), vec![Some("1"), Some("3")]);
    }

    #[test]
    fn test_drop_column() {
        let table = ColumnTransform::DropColumn { column: column("email") }
            .apply(contacts())
            .unwrap();
        assert_eq!(table.headers, vec!["id", "First Name", "joined"]);
        assert_eq!(table.row_count(), 3);
    }

    #[test]
    fn test_missing_column() {
        let err = ColumnTransform::Lower { column: column("nope") }
            .apply(contacts())
            .unwrap_err();
        assert!(matches!(err, ScrubberError::MissingColumn { ref column } if column == "nope"));
    }

    #[test]
    fn test_lower_and_strip_leave_nulls() {
        let table = ColumnTransform::Lower { column: column("First Name") }
            .apply(contacts())
            .unwrap();
        let table = ColumnTransform::Strip { column: column("First Name") }
            .apply(table)
            .unwrap();
        assert_eq!(
            table.column_by_name("First Name").unwrap(),
            vec![Some("alice"), Some("bob"), None]
        );
    }

    #[test]
    fn test_replace_is_literal() {
        let table = DataTable::from_rows(
            ["v"],
            vec![vec![Some("foobar")], vec![Some("a.b.c")], vec![None]],
        );
        let table = ColumnTransform::Replace {
            column: column("v"),
            find: "foo".to_string(),
            replace: "bar".to_string(),
        }
        .apply(table)
        .unwrap();
        let table = ColumnTransform::Replace {
            column: column("v"),
            find: ".".to_string(),
            replace: "-".to_string(),
        }
        .apply(table)
        .unwrap();
        assert_eq!(
            table.column_by_name("v").unwrap(),
            vec![Some("barbar"), Some("a-b-c"), None]
        );
    }

    #[test]
    fn test_valid_email_drops_nulls_and_invalid() {
        let table = ColumnTransform::ValidEmail { column: column("email") }
            .apply(contacts())
            .unwrap();
        assert_eq!(table.column_by_name("id").unwrap(), vec![Some("1")]);
    }

    #[test]
    fn test_date_convert_noon_keeps_day() {
        let converter = DateConverter::new("%Y-%m-%d %H:%M", "%m/%d/%Y").unwrap();
        let table = ColumnTransform::DateConvert {
            column: column("joined"),
            converter,
        }
        .apply(contacts())
        .unwrap();
        assert_eq!(
            table.column_by_name("joined").unwrap(),
            vec![Some("01/15/2023"), Some("02/01/2023"), Some("03/10/2023")]
        );
    }

    #[test]
    fn test_date_convert_parse_error() {
        let converter = DateConverter::new("%d/%m/%Y", "%Y").unwrap();
        let err = ColumnTransform::DateConvert {
            column: column("joined"),
            converter,
        }
        .apply(contacts())
        .unwrap_err();
        assert!(matches!(err, ScrubberError::DateParse { .. }));
    }

    #[test]
    fn test_camelcase_renames_all() {
        let table = Transform::CamelCase.apply(Some(contacts())).unwrap();
        assert_eq!(table.headers, vec!["id", "firstName", "email", "joined"]);
    }

    #[test]
    fn test_filter_inverts_not_na() {
        let filtered = Filter::new(ColumnTransform::NotNa { column: column("email") })
            .apply(contacts())
            .unwrap();
        let direct = ColumnTransform::IsNa { column: column("email") }
            .apply(contacts())
            .unwrap();
        assert_eq!(filtered, direct);
    }

    #[test]
    fn test_filter_inverts_is_na() {
        let filtered = Filter::new(ColumnTransform::IsNa { column: column("email") })
            .apply(contacts())
            .unwrap();
        assert_eq!(filtered.column_by_name("id").unwrap(), vec![Some("1"), Some("3")]);
    }

    #[test]
    fn test_filter_by_valid_email_keeps_invalid() {
        let filtered = Filter::new(ColumnTransform::ValidEmail { column: column("email") })
            .apply(contacts())
            .unwrap();
        assert_eq!(filtered.column_by_name("id").unwrap(), vec![Some("2"), Some("3")]);
    }

    #[test]
    fn test_filter_matches_on_transformed_keys() {
        let table = DataTable::from_rows(
            ["team"],
            vec![vec![Some("red")], vec![Some("RED")], vec![None]],
        );
        // Lowercasing turns "RED" into "red", so only the unchanged key and
        // the null survive in the kept set
        let filtered = Filter::new(ColumnTransform::Lower { column: column("team") })
            .apply(table)
            .unwrap();
        assert_eq!(filtered.column_by_name("team").unwrap(), vec![Some("RED")]);
    }

    #[test]
    fn test_filter_over_drop_column_fails() {
        let err = Filter::new(ColumnTransform::DropColumn { column: column("email") })
            .apply(contacts())
            .unwrap_err();
        assert!(matches!(err, ScrubberError::MissingColumn { .. }));
    }

    #[test]
    fn test_short_rows_read_as_null() {
        let ragged = || {
            DataTable::from_rows(
                ["id", "email"],
                vec![
                    vec![Some("1"), Some("alice@example.com")],
                    vec![Some("2")],
                    vec![],
                ],
            )
        };
        let ids = |table: DataTable| -> Vec<Option<String>> {
            table.rows.iter().map(|r| r.first().cloned().flatten()).collect()
        };

        let is_na = ColumnTransform::IsNa { column: column("email") }.apply(ragged()).unwrap();
        assert_eq!(ids(is_na), vec![Some("2".to_string()), None]);

        let not_na = ColumnTransform::NotNa { column: column("email") }.apply(ragged()).unwrap();
        assert_eq!(ids(not_na), vec![Some("1".to_string())]);

        let valid = ColumnTransform::ValidEmail { column: column("email") }
            .apply(ragged())
            .unwrap();
        assert_eq!(valid.row_count(), 1);

        let filtered = Filter::new(ColumnTransform::NotNa { column: column("email") })
            .apply(ragged())
            .unwrap();
        assert_eq!(ids(filtered), vec![Some("2".to_string()), None]);

        let filtered = Filter::new(ColumnTransform::IsNa { column: column("email") })
            .apply(ragged())
            .unwrap();
        assert_eq!(ids(filtered), vec![Some("1".to_string())]);
    }

    #[test]
    fn test_print_is_identity() {
        assert_eq!(Transform::Print.apply(Some(contacts())).unwrap(), contacts());
        assert_eq!(Transform::PrintColumns.apply(Some(contacts())).unwrap(), contacts());
    }
}
