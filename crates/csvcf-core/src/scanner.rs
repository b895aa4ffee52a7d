//! Expand user-selected paths into the files to process

use crate::error::{Error, Result};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Expand directories into the files they contain with `extension`
///
/// Plain file paths are kept as given, whatever their extension. Files
/// found inside a directory are sorted by path; the order of the inputs
/// themselves is preserved.
pub fn collect_inputs<P: AsRef<Path>>(paths: &[P], extension: &str) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for path in paths {
        let path = path.as_ref();
        let metadata = std::fs::metadata(path).map_err(|e| Error::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;

        if !metadata.is_dir() {
            files.push(path.to_path_buf());
            continue;
        }

        let mut found = Vec::new();
        for entry in WalkDir::new(path).follow_links(true) {
            let entry = entry?;
            if entry.file_type().is_file() && has_extension(entry.path(), extension) {
                found.push(entry.into_path());
            }
        }
        found.sort();
        files.extend(found);
    }

    Ok(files)
}

fn has_extension(path: &Path, extension: &str) -> bool {
    path.extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case(extension))
}
