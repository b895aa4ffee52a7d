//! Batch conversion between contact CSV files and vCard files

use crate::error::{Error, ErrorKind, Result};
use crate::tabular::{read_contacts, write_contacts};
use crate::vcard::{read_vcf, write_vcf};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Which way to convert
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    /// CSV in, vCard out
    ToVcard,
    /// vCard in, CSV out
    ToTabular,
}

impl Direction {
    /// Extension of the files this direction reads
    pub fn source_extension(self) -> &'static str {
        match self {
            Direction::ToVcard => "csv",
            Direction::ToTabular => "vcf",
        }
    }

    /// Extension of the files this direction writes
    pub fn target_extension(self) -> &'static str {
        match self {
            Direction::ToVcard => "vcf",
            Direction::ToTabular => "csv",
        }
    }
}

/// Knobs for a conversion batch
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConvertOptions {
    /// Stop at the first failing file instead of carrying on
    #[serde(default)]
    pub fail_fast: bool,
}

/// What happened to one input file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum FileOutcome {
    Converted {
        input: PathBuf,
        output: PathBuf,
        records: usize,
    },
    Failed {
        input: PathBuf,
        kind: ErrorKind,
        message: String,
    },
}

impl FileOutcome {
    /// The input file this outcome is about
    pub fn input(&self) -> &Path {
        match self {
            FileOutcome::Converted { input, .. } | FileOutcome::Failed { input, .. } => input,
        }
    }

    /// Whether the file converted
    pub fn is_success(&self) -> bool {
        matches!(self, FileOutcome::Converted { .. })
    }
}

/// Per-file results of a conversion batch, in input order
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConvertReport {
    pub direction: Direction,
    pub output_dir: PathBuf,
    pub started_at: DateTime<Utc>,
    pub finished_at: DateTime<Utc>,
    pub outcomes: Vec<FileOutcome>,
}

impl ConvertReport {
    /// Paths of the files written
    pub fn converted_files(&self) -> Vec<&Path> {
        self.outcomes
            .iter()
            .filter_map(|o| match o {
                FileOutcome::Converted { output, .. } => Some(output.as_path()),
                FileOutcome::Failed { .. } => None,
            })
            .collect()
    }

    /// Number of files that failed
    pub fn failure_count(&self) -> usize {
        self.outcomes.iter().filter(|o| !o.is_success()).count()
    }

    /// Save the report as pretty JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), content).map_err(|e| Error::FileWrite {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }
}

/// Output path for `input`: same file name, target extension, inside `output_dir`
pub fn output_path(input: &Path, direction: Direction, output_dir: &Path) -> Result<PathBuf> {
    let file_name = input
        .file_name()
        .ok_or_else(|| Error::config(format!("'{}' is not a file path", input.display())))?;

    Ok(output_dir.join(Path::new(file_name).with_extension(direction.target_extension())))
}

/// Convert a single file, returning the output path and the number of records written
pub fn convert_file(input: &Path, direction: Direction, output_dir: &Path) -> Result<(PathBuf, usize)> {
    let output = output_path(input, direction, output_dir)?;

    let count = match direction {
        Direction::ToVcard => {
            let contacts = read_contacts(input)?;
            write_vcf(&contacts, &output)?;
            contacts.len()
        }
        Direction::ToTabular => {
            let contacts = read_vcf(input)?;
            write_contacts(&contacts, &output)?;
            contacts.len()
        }
    };

    Ok((output, count))
}

/// Convert every input file in order
///
/// A failing file is recorded in the report and the batch carries on,
/// unless `options.fail_fast` is set, in which case its error is returned.
pub fn convert<P: AsRef<Path>>(
    paths: &[P],
    direction: Direction,
    output_dir: &Path,
    options: ConvertOptions,
) -> Result<ConvertReport> {
    if paths.is_empty() {
        return Err(Error::config("no files selected for conversion"));
    }
    if output_dir.as_os_str().is_empty() {
        return Err(Error::config("no output directory selected"));
    }

    fs::create_dir_all(output_dir).map_err(|e| Error::FileWrite {
        path: output_dir.to_path_buf(),
        source: e,
    })?;

    let started_at = Utc::now();
    let mut outcomes = Vec::with_capacity(paths.len());

    for path in paths {
        let input = path.as_ref();
        match convert_file(input, direction, output_dir) {
            Ok((output, records)) => {
                info!(input = %input.display(), output = %output.display(), records, "converted");
                outcomes.push(FileOutcome::Converted {
                    input: input.to_path_buf(),
                    output,
                    records,
                });
            }
            Err(e) if options.fail_fast => return Err(e),
            Err(e) => {
                warn!(input = %input.display(), error = %e, "conversion failed");
                outcomes.push(FileOutcome::Failed {
                    input: input.to_path_buf(),
                    kind: e.kind(),
                    message: e.to_string(),
                });
            }
        }
    }

    Ok(ConvertReport {
        direction,
        output_dir: output_dir.to_path_buf(),
        started_at,
        finished_at: Utc::now(),
        outcomes,
    })
}
