//! Bulk Cortex ingestion: `.ctx` directory → `.bqs` sample stores.
//!
//! Files are processed in parallel. A file that fails to parse is logged
//! with its path and reason and counted as failed; the batch always runs
//! to completion. Outputs that already exist are skipped, so an
//! interrupted ingestion can simply be rerun.

use rayon::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};

use crate::batch::{collect_files, stem_name};
use crate::constants::{CORTEX_EXT, SAMPLE_EXT};
use crate::cortex;
use crate::error::{BisqueError, Result};
use crate::timer::Timer;

/// Outcome counts of one bulk ingestion.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct IngestReport {
    /// Sample stores written.
    pub succeeded: usize,
    /// Inputs that failed to parse or write; details are in the log.
    pub failed: usize,
    /// Inputs skipped: empty files or outputs that already exist.
    pub skipped: usize,
}

enum FileOutcome {
    Written,
    Skipped,
    Failed,
}

/// Convert every `.ctx` file under `in_dir` into a `.bqs` file in `out_dir`.
///
/// Paths containing `"uncleaned"` are ignored (raw Cortex dumps sit next
/// to cleaned ones in the usual corpus layout). Returns the per-file
/// outcome counts; the accumulated phase timings land in `timer`.
pub fn ingest_cortex_dir(in_dir: &Path, out_dir: &Path, timer: &mut Timer) -> Result<IngestReport> {
    fs::create_dir_all(out_dir).map_err(|e| BisqueError::io(out_dir, "create directory", e))?;

    let inputs: Vec<PathBuf> = collect_files(in_dir, CORTEX_EXT)?
        .into_iter()
        .filter(|p| !p.to_string_lossy().contains("uncleaned"))
        .collect();
    log::info!("ingesting {} cortex files from {}", inputs.len(), in_dir.display());

    let outcomes: Vec<(FileOutcome, Timer)> = inputs
        .par_iter()
        .map(|path| {
            let mut t = Timer::new();
            let outcome = ingest_file(path, out_dir, &mut t);
            t.stop();
            (outcome, t)
        })
        .collect();

    let mut report = IngestReport::default();
    for (outcome, t) in outcomes {
        timer.merge(t);
        match outcome {
            FileOutcome::Written => report.succeeded += 1,
            FileOutcome::Skipped => report.skipped += 1,
            FileOutcome::Failed => report.failed += 1,
        }
    }

    log::info!(
        "ingestion finished: {} written, {} skipped, {} failed",
        report.succeeded,
        report.skipped,
        report.failed
    );
    Ok(report)
}

fn ingest_file(path: &Path, out_dir: &Path, t: &mut Timer) -> FileOutcome {
    let out_path = out_dir.join(format!("{}.{}", stem_name(path), SAMPLE_EXT));
    if out_path.exists() {
        log::info!("skipping {}: output exists", path.display());
        return FileOutcome::Skipped;
    }

    t.active("read");
    let sample = match cortex::parse_file(path) {
        Ok(Some(sample)) => sample,
        Ok(None) => {
            log::info!("skipping {}: empty file", path.display());
            return FileOutcome::Skipped;
        }
        Err(e) => {
            log::warn!("failed to ingest {}: {}", path.display(), e);
            return FileOutcome::Failed;
        }
    };

    t.active("write");
    match sample.save(&out_path) {
        Ok(()) => FileOutcome::Written,
        Err(e) => {
            log::warn!("failed to write {}: {}", out_path.display(), e);
            // Half-written output would poison a rerun
            let _ = fs::remove_file(&out_path);
            FileOutcome::Failed
        }
    }
}
