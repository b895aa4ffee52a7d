//! Merge engine for combining several CSV files into one
//!
//! Files are ordered by the last number in their file name, so that
//! `part_2.csv` comes before `part_10.csv`, and then concatenated.

use crate::error::{Error, Result};
use crate::parser::parse_csv;
use crate::store::concat_all;
use crate::table::TabularDataset;
use once_cell::sync::Lazy;
use regex::Regex;
use std::cmp::Ordering;
use std::path::{Path, PathBuf};
use tracing::info;

static DIGIT_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"[0-9]+").unwrap());

/// Sort key taken from the last run of ASCII digits in a file name
///
/// Compares as an unbounded non-negative integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergeOrderKey {
    digits: String,
}

impl MergeOrderKey {
    /// Derive the key from a path's file name
    pub fn from_path(path: &Path) -> Result<Self> {
        let ambiguous = || Error::AmbiguousOrder {
            path: path.to_path_buf(),
        };

        let base = path
            .file_name()
            .and_then(|n| n.to_str())
            .ok_or_else(ambiguous)?;

        let run = DIGIT_RUN
            .find_iter(base)
            .last()
            .ok_or_else(ambiguous)?
            .as_str();

        let trimmed = run.trim_start_matches('0');
        Ok(Self {
            digits: if trimmed.is_empty() { "0" } else { trimmed }.to_string(),
        })
    }

    /// The key's digits without leading zeros
    pub fn as_str(&self) -> &str {
        &self.digits
    }
}

impl Ord for MergeOrderKey {
    fn cmp(&self, other: &Self) -> Ordering {
        self.digits
            .len()
            .cmp(&other.digits.len())
            .then_with(|| self.digits.cmp(&other.digits))
    }
}

impl PartialOrd for MergeOrderKey {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

/// Sort paths by their merge key; equal keys keep input order
pub fn sort_by_merge_order<P: AsRef<Path>>(paths: &[P]) -> Result<Vec<PathBuf>> {
    let mut keyed = paths
        .iter()
        .map(|p| {
            let path = p.as_ref();
            MergeOrderKey::from_path(path).map(|key| (key, path.to_path_buf()))
        })
        .collect::<Result<Vec<_>>>()?;

    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    Ok(keyed.into_iter().map(|(_, path)| path).collect())
}

/// Load files in merge-key order and concatenate them
///
/// Fails as a whole: any unreadable file or mismatched schema aborts the merge.
pub fn merge_ordered<P: AsRef<Path>>(paths: &[P]) -> Result<TabularDataset> {
    if paths.is_empty() {
        return Err(Error::config("no files selected for merging"));
    }

    let sorted = sort_by_merge_order(paths)?;
    let tables = sorted
        .iter()
        .map(parse_csv)
        .collect::<Result<Vec<_>>>()?;

    let merged = concat_all(&tables)?;
    info!(
        files = sorted.len(),
        records = merged.record_count(),
        "merged CSV files"
    );
    Ok(merged)
}

/// Append `b`'s records after `a`'s
pub fn concatenate_two(a: &TabularDataset, b: &TabularDataset) -> Result<TabularDataset> {
    concat_all(&[a.clone(), b.clone()])
}
