//! JSON job files describing a conversion batch

use crate::converter::{convert, ConvertOptions, ConvertReport, Direction};
use crate::error::{Error, Result};
use crate::scanner::collect_inputs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// A saved conversion: inputs, direction and where to write
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConvertJob {
    /// Which way to convert
    pub direction: Direction,
    /// Input files or directories
    pub inputs: Vec<PathBuf>,
    /// Output directory for converted files
    pub output_dir: PathBuf,
    /// Stop at the first failing file
    #[serde(default)]
    pub fail_fast: bool,
}

impl ConvertJob {
    /// Load a job file from JSON
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| Error::FileRead {
            path: path.as_ref().to_path_buf(),
            source: e,
        })?;
        serde_json::from_str(&content).map_err(Error::Json)
    }

    /// Save the job file to JSON
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let content = serde_json::to_string_pretty(self)?;
        fs::write(path.as_ref(), content).map_err(|e| Error::FileWrite {
            path: path.as_ref().to_path_buf(),
            source: e,
        })
    }

    /// Expand the inputs and run the conversion
    pub fn run(&self) -> Result<ConvertReport> {
        let files = collect_inputs(&self.inputs, self.direction.source_extension())?;
        convert(
            &files,
            self.direction,
            &self.output_dir,
            ConvertOptions {
                fail_fast: self.fail_fast,
            },
        )
    }
}
