//! Handler for the `ingest-cortex` command.

use anyhow::{bail, Context, Result};
use std::path::Path;

use bisque::ingest::ingest_cortex_dir;
use bisque::Timer;

pub fn run_ingest(in_dir: &Path, out_dir: &Path) -> Result<()> {
    let mut timer = Timer::new();
    let report = ingest_cortex_dir(in_dir, out_dir, &mut timer)
        .context("cortex ingestion failed")?;
    log::info!("ingest timings:\n{}", timer);

    if report.succeeded == 0 && report.failed > 0 {
        bail!("all {} cortex files failed to ingest", report.failed);
    }
    if report.succeeded == 0 && report.skipped == 0 {
        log::warn!("no .ctx files found under {}", in_dir.display());
    }
    println!(
        "{} samples written, {} skipped, {} failed",
        report.succeeded, report.skipped, report.failed
    );
    Ok(())
}
