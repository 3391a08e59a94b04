//! Directory scanning and batch grouping for the bulk pipelines.
//!
//! All pipelines consume "every file with extension X under this
//! directory, in sorted path order". Sorting is what fixes the
//! sample→column mapping, so it happens here, once, and nowhere else.

use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{BisqueError, Result};

/// Recursively collect every regular file under `dir` with the given
/// extension (no leading dot), sorted by path.
pub fn collect_files(dir: &Path, extension: &str) -> Result<Vec<PathBuf>> {
    let mut out = Vec::new();
    walk(dir, extension, &mut out)?;
    out.sort();
    Ok(out)
}

fn walk(dir: &Path, extension: &str, out: &mut Vec<PathBuf>) -> Result<()> {
    let entries = fs::read_dir(dir).map_err(|e| BisqueError::io(dir, "read directory", e))?;
    for entry in entries {
        let entry = entry.map_err(|e| BisqueError::io(dir, "read directory", e))?;
        let path = entry.path();
        if path.is_dir() {
            walk(&path, extension, out)?;
        } else if path.extension().is_some_and(|ext| ext == extension) {
            out.push(path);
        }
    }
    Ok(())
}

/// File stem as a sample name; falls back to the full file name.
pub(crate) fn stem_name(path: &Path) -> String {
    path.file_stem()
        .or_else(|| path.file_name())
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}
