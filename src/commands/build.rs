//! Handler for the `build-classic` command.

use anyhow::{anyhow, Context, Result};
use std::path::{Path, PathBuf};

use bisque::config::parse_build_config;
use bisque::{build_directory, ClassicParams, Timer};

pub struct BuildArgs<'a> {
    pub in_dir: &'a Path,
    pub out_dir: &'a Path,
    pub signature_size: Option<u64>,
    pub block_size: Option<u64>,
    pub hashes: u64,
    pub config: Option<PathBuf>,
}

pub fn run_build(args: BuildArgs) -> Result<()> {
    let params = resolve_params(&args)?;
    log::info!(
        "classic parameters: signature_size={} block_size={} hashes={}",
        params.signature_size,
        params.row_size,
        params.num_hashes
    );

    let mut timer = Timer::new();
    let batches = build_directory(args.in_dir, args.out_dir, params, &mut timer)
        .context("batch build failed")?;
    log::info!("build timings:\n{}", timer);

    println!(
        "{} batch matrices written to {}",
        batches.len(),
        args.out_dir.display()
    );
    Ok(())
}

fn resolve_params(args: &BuildArgs) -> Result<ClassicParams> {
    if let Some(config_path) = &args.config {
        return Ok(parse_build_config(config_path)?.classic_params()?);
    }
    let signature_size = args
        .signature_size
        .ok_or_else(|| anyhow!("--signature-size is required without --config"))?;
    let block_size = args
        .block_size
        .ok_or_else(|| anyhow!("--block-size is required without --config"))?;
    Ok(ClassicParams::new(signature_size, block_size, args.hashes)?)
}
