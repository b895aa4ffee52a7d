//! In-memory store of loaded tabular datasets
//!
//! Holds the datasets the editor is working on and provides the bulk
//! operations over them: rename the first column, concatenate, save.

use crate::error::{Error, Result};
use crate::naming::NamingSequence;
use crate::parser::{parse_csv, write_csv};
use crate::table::{TabularDataset, TableView};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Outcome of loading several files; failures do not stop the others
#[derive(Debug, Default)]
pub struct LoadReport {
    /// Datasets that loaded, in input order
    pub datasets: Vec<TabularDataset>,
    /// Files that failed, with the reason
    pub failures: Vec<(PathBuf, Error)>,
}

/// Load each file independently
pub fn load_datasets<P: AsRef<Path>>(paths: &[P]) -> LoadReport {
    let mut report = LoadReport::default();

    for path in paths {
        let path = path.as_ref();
        match parse_csv(path) {
            Ok(dataset) => report.datasets.push(dataset),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "failed to load CSV");
                report.failures.push((path.to_path_buf(), e));
            }
        }
    }

    report
}

/// Overwrite the first column of every record with successive names
///
/// The datasets are treated as one sequence: dataset order first, then
/// record order within each dataset.
pub fn rename_first_column(datasets: &mut [TabularDataset], seq: &NamingSequence) -> Result<()> {
    if datasets.is_empty() {
        return Err(Error::config("no CSV files loaded"));
    }

    let mut names = seq.names();
    for dataset in datasets.iter_mut() {
        for record in &mut dataset.records {
            if let Some(name) = names.next() {
                record.set(0, name);
            }
        }
    }

    Ok(())
}

/// Row-wise concatenation of datasets sharing the same column set
///
/// Records of later datasets are re-ordered into the first dataset's
/// column order. Differing column sets are rejected.
pub fn concat_all(datasets: &[TabularDataset]) -> Result<TabularDataset> {
    let first = datasets
        .first()
        .ok_or_else(|| Error::config("no datasets to concatenate"))?;

    let mut merged = TabularDataset::new(first.columns.clone(), None)?;

    for dataset in datasets {
        if !first.same_columns(dataset) {
            return Err(Error::SchemaMismatch {
                expected: first.columns.join(", "),
                found: dataset.columns.join(", "),
                path: dataset.label(),
            });
        }

        let mapping: Vec<usize> = first
            .columns
            .iter()
            .filter_map(|c| dataset.column_index(c))
            .collect();

        for record in &dataset.records {
            let values = mapping
                .iter()
                .map(|&i| record.get(i).unwrap_or_default().to_string())
                .collect();
            merged.push_values(values);
        }
    }

    Ok(merged)
}

/// Write one dataset to disk
pub fn save<P: AsRef<Path>>(dataset: &TabularDataset, path: P) -> Result<()> {
    let path = path.as_ref();
    write_csv(dataset, path)?;
    info!(path = %path.display(), records = dataset.record_count(), "saved CSV");
    Ok(())
}

/// The datasets currently open in the editor
#[derive(Debug, Default)]
pub struct SessionState {
    datasets: Vec<TabularDataset>,
}

impl SessionState {
    /// Create an empty session
    pub fn new() -> Self {
        Self::default()
    }

    /// Loaded datasets, in load order
    pub fn datasets(&self) -> &[TabularDataset] {
        &self.datasets
    }

    /// Whether nothing is loaded
    pub fn is_empty(&self) -> bool {
        self.datasets.is_empty()
    }

    /// Total records across all datasets
    pub fn record_count(&self) -> usize {
        self.datasets.iter().map(TabularDataset::record_count).sum()
    }

    /// Load files, replacing the current contents if at least one loads
    pub fn load<P: AsRef<Path>>(&mut self, paths: &[P]) -> Result<LoadReport> {
        if paths.is_empty() {
            return Err(Error::config("no files selected"));
        }

        let mut report = load_datasets(paths);
        if !report.datasets.is_empty() {
            self.datasets = std::mem::take(&mut report.datasets);
        }
        Ok(report)
    }

    /// Rename the first column across every loaded dataset
    pub fn rename(&mut self, seq: &NamingSequence) -> Result<()> {
        rename_first_column(&mut self.datasets, seq)
    }

    /// Concatenate every loaded dataset and save the result
    pub fn save_merged<P: AsRef<Path>>(&self, path: P) -> Result<TabularDataset> {
        let merged = concat_all(&self.datasets)?;
        save(&merged, path)?;
        Ok(merged)
    }

    /// Headers of the first dataset plus the rows of all datasets
    pub fn view(&self) -> TableView {
        let Some(first) = self.datasets.first() else {
            return TableView::default();
        };

        let headers = first.columns.clone();
        let mut rows = Vec::with_capacity(self.record_count());

        for dataset in &self.datasets {
            let mapping: Vec<Option<usize>> =
                headers.iter().map(|h| dataset.column_index(h)).collect();
            for record in &dataset.records {
                rows.push(
                    mapping
                        .iter()
                        .map(|&idx| {
                            idx.and_then(|i| record.get(i))
                                .unwrap_or_default()
                                .to_string()
                        })
                        .collect(),
                );
            }
        }

        TableView { headers, rows }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_csv_str;
    use std::fs;

    fn dataset(csv: &str, name: &str) -> TabularDataset {
        parse_csv_str(csv, name).unwrap()
    }

    fn first_column(ds: &TabularDataset) -> Vec<&str> {
        ds.records.iter().map(|r| r.get(0).unwrap()).collect()
    }

    #[test]
    fn test_rename_spans_datasets_in_order() {
        let mut datasets = vec![
            dataset("name,phone\na,1\nb,2\n", "a.csv"),
            dataset("name,phone\nc,3\nd,4\ne,5\n", "b.csv"),
        ];

        rename_first_column(&mut datasets, &NamingSequence::new("X", 1)).unwrap();

        assert_eq!(first_column(&datasets[0]), vec!["X 001", "X 002"]);
        assert_eq!(first_column(&datasets[1]), vec!["X 003", "X 004", "X 005"]);
        assert_eq!(datasets[1].value(2, "phone"), Some("5"));
    }

    #[test]
    fn test_rename_without_datasets() {
        let err = rename_first_column(&mut [], &NamingSequence::new("X", 1)).unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Configuration);
    }

    #[test]
    fn test_concat_reorders_columns() {
        let a = dataset("name,phone\nBob,555\n", "a.csv");
        let b = dataset("phone,name\n111,Ann\n", "b.csv");

        let merged = concat_all(&[a, b]).unwrap();

        assert_eq!(merged.columns, vec!["name", "phone"]);
        assert_eq!(merged.value(1, "name"), Some("Ann"));
        assert_eq!(merged.value(1, "phone"), Some("111"));
        assert_eq!(merged.source_path, None);
    }

    #[test]
    fn test_concat_schema_mismatch() {
        let a = dataset("name,phone\nBob,555\n", "a.csv");
        let b = dataset("name,email\nAnn,ann@example.com\n", "b.csv");

        let err = concat_all(&[a, b]).unwrap_err();
        match err {
            Error::SchemaMismatch { path, .. } => assert_eq!(path, PathBuf::from("b.csv")),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_concat_nothing() {
        assert!(concat_all(&[]).is_err());
    }

    #[test]
    fn test_session_load_tolerates_failures() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.csv");
        fs::write(&good, "name,phone\nBob,555\n").unwrap();
        let missing = dir.path().join("missing.csv");

        let mut session = SessionState::new();
        let report = session.load(&[good, missing.clone()]).unwrap();

        assert_eq!(session.datasets().len(), 1);
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].0, missing);
    }

    #[test]
    fn test_session_load_all_failed_keeps_previous() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.csv");
        fs::write(&good, "name,phone\nBob,555\n").unwrap();

        let mut session = SessionState::new();
        session.load(&[&good]).unwrap();
        let report = session.load(&[dir.path().join("missing.csv")]).unwrap();

        assert!(report.datasets.is_empty());
        assert_eq!(session.record_count(), 1);
    }

    #[test]
    fn test_session_load_reports_every_failure() {
        let dir = tempfile::tempdir().unwrap();
        let good = dir.path().join("good.csv");
        fs::write(&good, "name,phone\nBob,555\n").unwrap();
        let missing = dir.path().join("missing.csv");
        let broken = dir.path().join("broken.csv");
        fs::write(&broken, "").unwrap();

        let mut session = SessionState::new();
        session.load(&[&good]).unwrap();
        let report = session.load(&[&missing, &broken]).unwrap();

        let failed: Vec<&PathBuf> = report.failures.iter().map(|(p, _)| p).collect();
        assert_eq!(failed, vec![&missing, &broken]);
        assert_eq!(report.failures[0].1.kind(), crate::ErrorKind::Io);
        assert_eq!(report.failures[1].1.kind(), crate::ErrorKind::Parse);
        assert_eq!(session.datasets()[0].source_path, Some(good));
    }

    #[test]
    fn test_session_load_requires_selection() {
        let mut session = SessionState::new();
        let paths: [PathBuf; 0] = [];
        assert!(session.load(&paths).is_err());
    }

    #[test]
    fn test_session_rename_and_save_merged() {
        let dir = tempfile::tempdir().unwrap();
        let a = dir.path().join("a.csv");
        let b = dir.path().join("b.csv");
        fs::write(&a, "name,phone\nx,1\ny,2\n").unwrap();
        fs::write(&b, "name,phone\nz,3\n").unwrap();

        let mut session = SessionState::new();
        session.load(&[&a, &b]).unwrap();
        session.rename(&NamingSequence::new("G", 10)).unwrap();

        let out = dir.path().join("merged.csv");
        session.save_merged(&out).unwrap();

        assert_eq!(
            fs::read_to_string(&out).unwrap(),
            "name,phone\nG 010,1\nG 011,2\nG 012,3\n"
        );
    }

    #[test]
    fn test_session_view() {
        let mut session = SessionState::new();
        assert_eq!(session.view(), TableView::default());

        session.datasets = vec![
            dataset("name,phone\nBob,555\n", "a.csv"),
            dataset("name,email\nAnn,ann@example.com\n", "b.csv"),
        ];
        let view = session.view();

        assert_eq!(view.headers, vec!["name", "phone"]);
        assert_eq!(view.row_count(), 2);
        assert_eq!(view.cell(1, 0), Some("Ann"));
        assert_eq!(view.cell(1, 1), Some(""));
    }
}
