//! Handler for the `combine` command.

use anyhow::{Context, Result};
use std::path::Path;

use bisque::{combine_directory, Timer};

pub fn run_combine(in_dir: &Path, out_dir: &Path, batch_size: usize) -> Result<()> {
    let mut timer = Timer::new();
    let index = combine_directory(in_dir, out_dir, batch_size, &mut timer)
        .context("combine failed")?;
    log::info!("combine timings:\n{}", timer);

    println!("combined index written to {}", index.display());
    Ok(())
}
