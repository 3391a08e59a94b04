//! TOML build-parameter files.
//!
//! Index parameters are easy to fat-finger on the command line and must be
//! identical across every batch that will later be combined, so they can
//! be pinned in a small config file and passed to `build-classic` with
//! `--config`:
//!
//! ```toml
//! [classic]
//! signature_size = 33554432
//! block_size = 1024
//! num_hashes = 3
//! ```

use anyhow::{anyhow, Context, Result};
use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::classic::ClassicParams;

#[derive(Debug, Deserialize)]
pub struct BuildConfig {
    pub classic: ClassicSettings,
}

#[derive(Debug, Deserialize)]
pub struct ClassicSettings {
    pub signature_size: u64,
    pub block_size: u64,
    #[serde(default = "default_num_hashes")]
    pub num_hashes: u64,
}

fn default_num_hashes() -> u64 {
    3
}

pub fn parse_build_config(path: &Path) -> Result<BuildConfig> {
    let contents = fs::read_to_string(path)
        .context(format!("Failed to read config file: {}", path.display()))?;

    let config: BuildConfig =
        toml::from_str(&contents).context("Failed to parse TOML config")?;

    if config.classic.signature_size == 0 {
        return Err(anyhow!("Config error: signature_size must be > 0"));
    }
    if config.classic.block_size == 0 {
        return Err(anyhow!("Config error: block_size must be > 0"));
    }
    if config.classic.num_hashes == 0 {
        return Err(anyhow!("Config error: num_hashes must be >= 1"));
    }

    Ok(config)
}

impl BuildConfig {
    /// The validated index parameters.
    pub fn classic_params(&self) -> crate::error::Result<ClassicParams> {
        ClassicParams::new(
            self.classic.signature_size,
            self.classic.block_size,
            self.classic.num_hashes,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::tempdir;

    #[test]
    fn test_parse_full_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("build.toml");
        fs::write(
            &path,
            "[classic]\nsignature_size = 4096\nblock_size = 8\nnum_hashes = 4\n",
        )
        .unwrap();

        let config = parse_build_config(&path).unwrap();
        assert_eq!(config.classic.signature_size, 4096);
        assert_eq!(config.classic.block_size, 8);
        assert_eq!(config.classic.num_hashes, 4);
        assert!(config.classic_params().is_ok());
    }

    #[test]
    fn test_num_hashes_defaults() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("build.toml");
        fs::write(&path, "[classic]\nsignature_size = 4096\nblock_size = 8\n").unwrap();
        let config = parse_build_config(&path).unwrap();
        assert_eq!(config.classic.num_hashes, 3);
    }

    #[test]
    fn test_zero_signature_size_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("build.toml");
        fs::write(&path, "[classic]\nsignature_size = 0\nblock_size = 8\n").unwrap();
        assert!(parse_build_config(&path).is_err());
    }

    #[test]
    fn test_missing_file_has_path_context() {
        let err = parse_build_config(Path::new("/no/such/build.toml")).unwrap_err();
        assert!(format!("{:#}", err).contains("/no/such/build.toml"));
    }
}
