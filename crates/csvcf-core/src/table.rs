//! Core table types for representing tabular contact data

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::PathBuf;

/// A tabular dataset loaded from (or destined for) a CSV file
///
/// Every record holds exactly one value per column, in column order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TabularDataset {
    /// Column names, in file order
    pub columns: Vec<String>,
    /// Records, in file order
    pub records: Vec<Record>,
    /// Source file path, if the dataset was loaded from disk
    pub source_path: Option<PathBuf>,
}

impl TabularDataset {
    /// Create an empty dataset, validating the column list
    pub fn new(columns: Vec<String>, source_path: Option<PathBuf>) -> Result<Self> {
        let label = source_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("<memory>"));

        if columns.is_empty() || columns.iter().all(|c| c.trim().is_empty()) {
            return Err(Error::CsvParse {
                path: label,
                message: "no columns found in CSV".to_string(),
            });
        }

        let mut seen = HashSet::new();
        for name in &columns {
            if !seen.insert(name.as_str()) {
                return Err(Error::CsvParse {
                    path: label,
                    message: format!("duplicate column '{}'", name),
                });
            }
        }

        Ok(Self {
            columns,
            records: Vec::new(),
            source_path,
        })
    }

    /// Get the number of columns
    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Get the number of records
    pub fn record_count(&self) -> usize {
        self.records.len()
    }

    /// Find a column index by name
    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Look up a value by record index and column name
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.records.get(row).and_then(|r| r.get(col))
    }

    /// Append a record, padding short rows with empty values and truncating long ones
    ///
    /// Returns `true` if values had to be dropped.
    pub fn push_values(&mut self, mut values: Vec<String>) -> bool {
        let width = self.columns.len();
        let truncated = values.len() > width;
        values.resize(width, String::new());
        self.records.push(Record { values });
        truncated
    }

    /// Whether another dataset has the same column set, ignoring order
    pub fn same_columns(&self, other: &TabularDataset) -> bool {
        self.columns.len() == other.columns.len()
            && other.columns.iter().all(|c| self.column_index(c).is_some())
    }

    /// Label used in error messages
    pub fn label(&self) -> PathBuf {
        self.source_path
            .clone()
            .unwrap_or_else(|| PathBuf::from("<memory>"))
    }
}

/// One row of a tabular dataset
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Record {
    values: Vec<String>,
}

impl Record {
    /// Get a value by column index
    pub fn get(&self, index: usize) -> Option<&str> {
        self.values.get(index).map(String::as_str)
    }

    /// Overwrite a value by column index; out-of-range indices are ignored
    pub fn set(&mut self, index: usize, value: impl Into<String>) {
        if let Some(slot) = self.values.get_mut(index) {
            *slot = value.into();
        }
    }

    /// All values, in column order
    pub fn values(&self) -> &[String] {
        &self.values
    }
}

/// Column headers plus row values, ready for display
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TableView {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl TableView {
    /// Get the number of rows
    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get a cell by row and column index
    pub fn cell(&self, row: usize, col: usize) -> Option<&str> {
        self.rows.get(row).and_then(|r| r.get(col)).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cols(names: &[&str]) -> Vec<String> {
        names.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_new_rejects_duplicate_columns() {
        let err = TabularDataset::new(cols(&["name", "name"]), None).unwrap_err();
        assert!(err.to_string().contains("duplicate column"));
    }

    #[test]
    fn test_new_rejects_empty_header() {
        assert!(TabularDataset::new(Vec::new(), None).is_err());
        assert!(TabularDataset::new(cols(&[""]), None).is_err());
    }

    #[test]
    fn test_push_values_pads_and_truncates() {
        let mut ds = TabularDataset::new(cols(&["name", "phone"]), None).unwrap();

        assert!(!ds.push_values(cols(&["Bob"])));
        assert!(ds.push_values(cols(&["Ann", "111", "extra"])));

        assert_eq!(ds.value(0, "phone"), Some(""));
        assert_eq!(ds.records[1].values(), &cols(&["Ann", "111"])[..]);
    }

    #[test]
    fn test_same_columns_ignores_order() {
        let a = TabularDataset::new(cols(&["name", "phone"]), None).unwrap();
        let b = TabularDataset::new(cols(&["phone", "name"]), None).unwrap();
        let c = TabularDataset::new(cols(&["name", "email"]), None).unwrap();

        assert!(a.same_columns(&b));
        assert!(!a.same_columns(&c));
    }

    #[test]
    fn test_record_set_out_of_range() {
        let mut ds = TabularDataset::new(cols(&["name"]), None).unwrap();
        ds.push_values(cols(&["Bob"]));
        ds.records[0].set(5, "ignored");
        ds.records[0].set(0, "Rob");
        assert_eq!(ds.value(0, "name"), Some("Rob"));
    }
}
