//! Plain-text rendering of tables for terminal output.

use std::fmt;

use crate::input::DataTable;

/// How null cells are shown.
const NULL_MARKER: &str = "NaN";

impl DataTable {
    /// Render the column names as a single line.
    pub fn columns_line(&self) -> String {
        format!("Columns: [{}]", self.headers.join(", "))
    }
}

impl fmt::Display for DataTable {
    /// Right-aligned grid with a leading row index, two spaces between columns.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.rows.is_empty() {
            writeln!(f, "Empty table")?;
            writeln!(f, "{}", self.columns_line())?;
            return write!(f, "Rows: 0");
        }

        let index_width = (self.rows.len() - 1).to_string().len();
        let widths: Vec<usize> = self
            .headers
            .iter()
            .enumerate()
            .map(|(col, header)| {
                self.column_values(col)
                    .map(|v| v.unwrap_or(NULL_MARKER).chars().count())
                    .chain(std::iter::once(header.chars().count()))
                    .max()
                    .unwrap_or(0)
            })
            .collect();

        write!(f, "{:index_width$}", "")?;
        for (header, width) in self.headers.iter().zip(&widths) {
            write!(f, "  {:>width$}", header, width = *width)?;
        }

        for (idx, row) in self.rows.iter().enumerate() {
            writeln!(f)?;
            write!(f, "{:<index_width$}", idx)?;
            for (cell, width) in row.iter().zip(&widths) {
                let text = cell.as_deref().unwrap_or(NULL_MARKER);
                write!(f, "  {:>width$}", text, width = *width)?;
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_render_grid() {
        let table = DataTable::from_rows(
            ["name", "age"],
            vec![vec![Some("Alice"), Some("30")], vec![Some("Bob"), None]],
        );
        let expected = concat!(
            "    name  age\n",
            "0  Alice   30\n",
            "1    Bob  NaN",
        );
        assert_eq!(table.to_string(), expected);
    }

    #[test]
    fn test_render_empty() {
        let table = DataTable::from_rows(["a", "b"], Vec::new());
        assert_eq!(table.to_string(), "Empty table\nColumns: [a, b]\nRows: 0");
    }
}
