//! CSV reading and writing for tabular datasets

use crate::error::{Error, Result};
use crate::table::TabularDataset;
use std::collections::HashSet;
use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};
use tracing::warn;

/// Parse a CSV file into a TabularDataset
pub fn parse_csv<P: AsRef<Path>>(path: P) -> Result<TabularDataset> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::FileRead {
        path: path.to_path_buf(),
        source: e,
    })?;

    parse_reader(BufReader::new(file), path.to_path_buf())
}

/// Parse CSV from a string (useful for testing)
pub fn parse_csv_str(content: &str, source_name: &str) -> Result<TabularDataset> {
    parse_reader(content.as_bytes(), PathBuf::from(source_name))
}

fn parse_reader<R: Read>(reader: R, path: PathBuf) -> Result<TabularDataset> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true) // Allow varying number of fields
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(|e| Error::Csv {
        path: path.clone(),
        source: e,
    })?;
    let columns = unique_headers(headers.iter());

    let mut dataset = TabularDataset::new(columns, Some(path.clone()))?;

    for (row_idx, result) in csv_reader.records().enumerate() {
        let record = result.map_err(|e| Error::Csv {
            path: path.clone(),
            source: e,
        })?;

        let values: Vec<String> = record.iter().map(str::to_string).collect();
        if dataset.push_values(values) {
            warn!(
                row = row_idx + 1,
                path = %path.display(),
                "row has more cells than columns, truncating"
            );
        }
    }

    Ok(dataset)
}

/// Make header names usable as column keys
///
/// Blank names become `Unnamed: {index}`; a repeated name gets a `.1`,
/// `.2`, ... suffix, skipping any suffix already taken.
fn unique_headers<'a>(headers: impl Iterator<Item = &'a str>) -> Vec<String> {
    let raw: Vec<String> = headers
        .enumerate()
        .map(|(i, name)| {
            if name.trim().is_empty() {
                format!("Unnamed: {}", i)
            } else {
                name.to_string()
            }
        })
        .collect();

    let mut taken: HashSet<String> = HashSet::new();
    let mut columns = Vec::with_capacity(raw.len());
    for name in raw {
        let mut unique = name.clone();
        let mut n = 1;
        while taken.contains(&unique) {
            unique = format!("{}.{}", name, n);
            n += 1;
        }
        taken.insert(unique.clone());
        columns.push(unique);
    }
    columns
}

/// Write a dataset as CSV: header row, then one row per record
pub fn write_csv<P: AsRef<Path>>(dataset: &TabularDataset, path: P) -> Result<()> {
    let path = path.as_ref();
    let file = File::create(path).map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })?;

    write_csv_to(dataset, BufWriter::new(file), path)
}

/// Write a dataset as CSV to any writer
pub fn write_csv_to<W: Write>(dataset: &TabularDataset, writer: W, path: &Path) -> Result<()> {
    let csv_error = |e| Error::Csv {
        path: path.to_path_buf(),
        source: e,
    };

    let mut csv_writer = csv::Writer::from_writer(writer);
    csv_writer.write_record(&dataset.columns).map_err(csv_error)?;
    for record in &dataset.records {
        csv_writer.write_record(record.values()).map_err(csv_error)?;
    }

    csv_writer.flush().map_err(|e| Error::FileWrite {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_simple_csv() {
        let csv = "Name,Phone Number 1,Phone Number 2\nBob,555,\nAnn,111,222\n";
        let ds = parse_csv_str(csv, "test.csv").unwrap();

        assert_eq!(ds.columns, vec!["Name", "Phone Number 1", "Phone Number 2"]);
        assert_eq!(ds.record_count(), 2);
        assert_eq!(ds.value(0, "Name"), Some("Bob"));
        assert_eq!(ds.value(0, "Phone Number 2"), Some(""));
        assert_eq!(ds.value(1, "Phone Number 2"), Some("222"));
    }

    #[test]
    fn test_parse_short_and_long_rows() {
        let csv = "name,phone\nBob\nAnn,111,extra\n";
        let ds = parse_csv_str(csv, "test.csv").unwrap();

        assert_eq!(ds.value(0, "phone"), Some(""));
        assert_eq!(ds.records[1].values().len(), 2);
    }

    #[test]
    fn test_parse_empty_input_has_no_header() {
        let err = parse_csv_str("", "empty.csv").unwrap_err();
        assert_eq!(err.kind(), crate::ErrorKind::Parse);
    }

    #[test]
    fn test_parse_missing_file() {
        let err = parse_csv("/definitely/not/here.csv").unwrap_err();
        assert!(matches!(err, Error::FileRead { .. }));
    }

    #[test]
    fn test_write_quotes_commas() {
        let ds = parse_csv_str("name,phone\n\"Doe, Jane\",555\n", "test.csv").unwrap();

        let mut out = Vec::new();
        write_csv_to(&ds, &mut out, Path::new("out.csv")).unwrap();

        assert_eq!(
            String::from_utf8(out).unwrap(),
            "name,phone\n\"Doe, Jane\",555\n"
        );
    }

    #[test]
    fn test_write_then_parse_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("out.csv");
        let ds = parse_csv_str("name,phone\nBob,555\n", "test.csv").unwrap();

        write_csv(&ds, &path).unwrap();
        let loaded = parse_csv(&path).unwrap();

        assert_eq!(loaded.columns, ds.columns);
        assert_eq!(loaded.records, ds.records);
        assert_eq!(loaded.source_path, Some(path));
    }

    #[test]
    fn test_parse_blank_and_repeated_headers() {
        let ds = parse_csv_str("Name,Phone,,\nBob,555,,\n", "export.csv").unwrap();
        assert_eq!(ds.columns, vec!["Name", "Phone", "Unnamed: 2", "Unnamed: 3"]);
        assert_eq!(ds.value(0, "Phone"), Some("555"));

        let ds = parse_csv_str("phone,phone,phone.1\n1,2,3\n", "dup.csv").unwrap();
        assert_eq!(ds.columns, vec!["phone", "phone.1", "phone.1.1"]);
        assert_eq!(ds.value(0, "phone.1"), Some("2"));
    }

    #[test]
    fn test_write_into_missing_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing").join("out.csv");
        let ds = parse_csv_str("name,phone\nBob,555\n", "test.csv").unwrap();

        let err = write_csv(&ds, &path).unwrap_err();
        assert!(matches!(err, Error::FileWrite { .. }));
        assert_eq!(err.kind(), crate::ErrorKind::Io);
    }
}
