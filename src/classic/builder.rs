//! Batch Bloom matrix construction.
//!
//! A batch takes up to `8 * row_size` sample stores and produces one
//! row-striped matrix file: sample at position `c` of the (sorted) input
//! list owns column `c`, and each of its k-mers sets `num_hashes` bits in
//! that column. The column assignment is fixed before any bit is set and
//! becomes permanent through combination.

use rayon::prelude::*;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use crate::batch::{collect_files, stem_name};
use crate::constants::{CLASSIC_EXT, SAMPLE_EXT};
use crate::error::{BisqueError, Result};
use crate::hasher::row_indices;
use crate::kmer::Kmer31;
use crate::sample::Sample;
use crate::timer::Timer;

use super::header::ClassicHeader;

/// Shared parameters of every matrix in one index.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClassicParams {
    /// Number of rows (the Bloom modulus).
    pub signature_size: u64,
    /// Bytes per row of one batch.
    pub row_size: u64,
    /// Hash seeds per k-mer.
    pub num_hashes: u64,
}

impl ClassicParams {
    pub fn new(signature_size: u64, row_size: u64, num_hashes: u64) -> Result<Self> {
        if signature_size == 0 {
            return Err(BisqueError::validation("signature size must be > 0"));
        }
        if row_size == 0 {
            return Err(BisqueError::validation("block size must be > 0"));
        }
        if num_hashes == 0 {
            return Err(BisqueError::validation("number of hashes must be >= 1"));
        }
        Ok(ClassicParams {
            signature_size,
            row_size,
            num_hashes,
        })
    }

    /// Samples per batch: one per column.
    pub fn samples_per_batch(&self) -> usize {
        (8 * self.row_size) as usize
    }
}

/// In-memory row-striped bit matrix for one batch under construction.
pub struct BloomMatrix {
    params: ClassicParams,
    data: Vec<u8>,
}

impl BloomMatrix {
    /// Allocate a zeroed `signature_size × row_size` matrix.
    pub fn new(params: ClassicParams) -> Self {
        BloomMatrix {
            params,
            data: vec![0u8; (params.signature_size * params.row_size) as usize],
        }
    }

    #[inline]
    fn set_bit(&mut self, row: u64, column: u64) {
        debug_assert!(row < self.params.signature_size);
        debug_assert!(column < 8 * self.params.row_size);
        let byte = (row * self.params.row_size + column / 8) as usize;
        self.data[byte] |= 1 << (column % 8);
    }

    #[inline]
    fn is_set(&self, row: u64, column: u64) -> bool {
        let byte = (row * self.params.row_size + column / 8) as usize;
        self.data[byte] & (1 << (column % 8)) != 0
    }

    /// Record one k-mer of the sample owning `column`.
    pub fn insert(&mut self, kmer: Kmer31, column: u64) {
        let (h, s) = (self.params.num_hashes, self.params.signature_size);
        for row in row_indices(kmer, h, s) {
            self.set_bit(row, column);
        }
    }

    /// Bloom membership test: possibly-present / definitely-absent.
    pub fn contains(&self, kmer: Kmer31, column: u64) -> bool {
        let (h, s) = (self.params.num_hashes, self.params.signature_size);
        row_indices(kmer, h, s).all(|row| self.is_set(row, column))
    }

    /// Write the batch file: header with `names` padded by empty strings
    /// to the full column count, then the body.
    pub fn write(&self, out_file: &Path, mut names: Vec<String>) -> Result<()> {
        names.resize(self.params.samples_per_batch(), String::new());
        let header = ClassicHeader::new(
            self.params.signature_size,
            self.params.row_size,
            self.params.num_hashes,
            names,
        )?;

        let file = File::create(out_file).map_err(|e| BisqueError::io(out_file, "create", e))?;
        let mut w = BufWriter::new(file);
        header
            .write_to(&mut w)
            .and_then(|_| w.write_all(&self.data))
            .and_then(|_| w.flush())
            .map_err(|e| BisqueError::io(out_file, "write", e))
    }
}

/// Build one batch matrix from `paths` (at most one per column).
///
/// Column `c` is the sample at `paths[c]`; names are the path stems.
pub fn build_batch(
    paths: &[PathBuf],
    out_file: &Path,
    params: ClassicParams,
    t: &mut Timer,
) -> Result<()> {
    if paths.is_empty() {
        return Err(BisqueError::validation("empty sample batch"));
    }
    if paths.len() > params.samples_per_batch() {
        return Err(BisqueError::validation(format!(
            "{} samples exceed batch capacity {}",
            paths.len(),
            params.samples_per_batch()
        )));
    }

    let mut matrix = BloomMatrix::new(params);
    for (column, path) in paths.iter().enumerate() {
        t.active("read");
        let sample = Sample::load(path)?;
        t.active("process");
        for &kmer in &sample.kmers {
            matrix.insert(kmer, column as u64);
        }
    }

    t.active("write");
    let names = paths.iter().map(|p| stem_name(p)).collect();
    matrix.write(out_file, names)?;
    t.stop();
    Ok(())
}

/// Build batch matrices for every `.bqs` file under `in_dir`.
///
/// Inputs are path-sorted, chunked into batches of `8 * row_size`, and the
/// batches are built in parallel. Returns the batch file paths in column
/// order. A failing batch fails the whole build; per-file problems were
/// already handled at ingestion.
pub fn build_directory(
    in_dir: &Path,
    out_dir: &Path,
    params: ClassicParams,
    timer: &mut Timer,
) -> Result<Vec<PathBuf>> {
    std::fs::create_dir_all(out_dir)
        .map_err(|e| BisqueError::io(out_dir, "create directory", e))?;

    let samples = collect_files(in_dir, SAMPLE_EXT)?;
    if samples.is_empty() {
        return Err(BisqueError::validation(format!(
            "no .{} files under {}",
            SAMPLE_EXT,
            in_dir.display()
        )));
    }

    let batches: Vec<(usize, &[PathBuf])> = samples
        .chunks(params.samples_per_batch())
        .enumerate()
        .collect();
    log::info!(
        "building {} batches from {} samples",
        batches.len(),
        samples.len()
    );

    let results: Vec<(PathBuf, Result<()>, Timer)> = batches
        .par_iter()
        .map(|(i, chunk)| {
            let out_file = out_dir.join(format!("batch_{:05}.{}", i, CLASSIC_EXT));
            let mut t = Timer::new();
            let result = build_batch(chunk, &out_file, params, &mut t);
            (out_file, result, t)
        })
        .collect();

    let mut outputs = Vec::with_capacity(results.len());
    for (out_file, result, t) in results {
        timer.merge(t);
        result?;
        outputs.push(out_file);
    }
    Ok(outputs)
}
