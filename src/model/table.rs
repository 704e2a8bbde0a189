//! Table structures for document model.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// A table in the document.
///
/// Cells are plain strings; the first row is the header row by convention.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    /// Table rows
    pub rows: Vec<Vec<String>>,
}

impl Table {
    /// Creates a new empty table.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a table from rows.
    pub fn from_rows(rows: Vec<Vec<String>>) -> Self {
        Self { rows }
    }

    /// Returns the number of rows.
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Returns the number of columns (based on first row).
    pub fn column_count(&self) -> usize {
        self.rows.first().map(|r| r.len()).unwrap_or(0)
    }

    /// Returns the header row, if any.
    pub fn header(&self) -> Option<&[String]> {
        self.rows.first().map(|r| r.as_slice())
    }

    /// Gets a cell at the specified position.
    pub fn get_cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col)).map(|c| c.as_str())
    }

    /// Pads short rows with empty cells and truncates long rows so every row
    /// has the header row's width.
    pub fn normalize_width(&mut self) {
        let width = self.column_count();
        for row in &mut self.rows {
            row.resize(width, String::new());
        }
    }

    /// Checks the table invariants: at least one row, every row non-empty,
    /// a consistent cell count, and no separator rows.
    pub fn validate(&self) -> Result<()> {
        if self.rows.is_empty() {
            return Err(Error::MalformedBlock("table without rows".into()));
        }

        let width = self.column_count();
        for (idx, row) in self.rows.iter().enumerate() {
            if row.is_empty() {
                return Err(Error::MalformedBlock(format!("table row {} is empty", idx)));
            }
            if row.len() != width {
                return Err(Error::MalformedBlock(format!(
                    "table row {} has {} cells, expected {}",
                    idx,
                    row.len(),
                    width
                )));
            }
            if is_separator_row(row) {
                return Err(Error::MalformedBlock(format!(
                    "table row {} is a separator row",
                    idx
                )));
            }
        }

        Ok(())
    }
}

/// Returns true if every cell is a run of dashes, optionally with alignment
/// colons (`---`, `:---`, `:---:`).
pub fn is_separator_row<S: AsRef<str>>(cells: &[S]) -> bool {
    !cells.is_empty()
        && cells.iter().all(|cell| {
            let cell = cell.as_ref();
            let inner = cell.strip_prefix(':').unwrap_or(cell);
            let inner = inner.strip_suffix(':').unwrap_or(inner);
            !inner.is_empty() && inner.chars().all(|c| c == '-')
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(cells: &[&str]) -> Vec<String> {
        cells.iter().map(|c| c.to_string()).collect()
    }

    #[test]
    fn test_separator_detection() {
        assert!(is_separator_row(&["---", "---"]));
        assert!(is_separator_row(&[":---", "---:", ":-:"]));
        assert!(!is_separator_row(&["---", "value"]));
        assert!(!is_separator_row::<&str>(&[]));
        assert!(!is_separator_row(&[""]));
        assert!(!is_separator_row(&["::"]));
    }

    #[test]
    fn test_normalize_width() {
        let mut table = Table::from_rows(vec![
            row(&["A", "B", "C"]),
            row(&["1"]),
            row(&["1", "2", "3", "4"]),
        ]);
        table.normalize_width();

        assert!(table.rows.iter().all(|r| r.len() == 3));
        assert_eq!(table.get_cell(1, 2), Some(""));
        assert!(table.validate().is_ok());
    }

    #[test]
    fn test_ragged_table_is_malformed() {
        let table = Table::from_rows(vec![row(&["A", "B"]), row(&["1"])]);
        assert!(matches!(table.validate(), Err(Error::MalformedBlock(_))));
    }

    #[test]
    fn test_empty_table_is_malformed() {
        assert!(Table::new().validate().is_err());
        assert_eq!(Table::new().column_count(), 0);
    }

    #[test]
    fn test_table_accessors() {
        let table = Table::from_rows(vec![row(&["Acronym", "Meaning"]), row(&["CR", "Change Request"])]);
        assert_eq!(table.row_count(), 2);
        assert_eq!(table.column_count(), 2);
        assert_eq!(table.header().map(|h| h.len()), Some(2));
        assert_eq!(table.get_cell(1, 1), Some("Change Request"));
        assert_eq!(table.get_cell(5, 0), None);
    }
}
