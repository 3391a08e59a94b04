//! The classic search engine.
//!
//! A query string is decomposed into canonical 31-mers; each k-mer selects
//! `num_hashes` rows, the rows are AND-ed together, and every surviving
//! bit increments the counter of its sample column. A sample is a
//! candidate when its counter reaches `ceil(threshold * Q)` for Q query
//! k-mers. Ranking is score descending, then sample position ascending,
//! so identical inputs always rank identically on either storage backend.

use rayon::prelude::*;
use std::path::{Path, PathBuf};

use crate::error::{BisqueError, Result};
use crate::hasher::row_indices;
use crate::kmer::{scan_kmers, Kmer31};
use crate::timer::Timer;

use super::storage::{AccessMode, SearchFile};

/// One ranked hit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultEntry {
    /// Number of query k-mers whose Bloom test this sample survived.
    pub score: u16,
    /// Sample name from the matrix header.
    pub name: String,
}

/// Why a search returned what it did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchStatus {
    /// Query decomposed into at least one k-mer.
    Ok,
    /// Query had no valid 31-mer after filtering; result is empty.
    NoKmers,
}

/// Result of one query.
#[derive(Debug)]
pub struct SearchOutcome {
    pub status: SearchStatus,
    /// Ranked candidates, best first.
    pub hits: Vec<ResultEntry>,
    /// Number of k-mers the query decomposed into.
    pub kmer_count: usize,
    /// 31-base windows skipped for containing a non-ACGT base.
    pub ignored_kmers: usize,
}

/// Query engine over one or more final matrix files.
///
/// Multiple files form a sharded deployment over disjoint sample sets;
/// each is searched independently and the rankings are merged globally.
pub struct ClassicSearch {
    files: Vec<SearchFile>,
}

impl ClassicSearch {
    /// Open the given matrix files and verify they agree on
    /// `signature_size` and `num_hashes`.
    pub fn open(paths: &[PathBuf], mode: AccessMode) -> Result<Self> {
        if paths.is_empty() {
            return Err(BisqueError::validation("no index files given"));
        }
        let mut files = Vec::with_capacity(paths.len());
        for path in paths {
            files.push(SearchFile::open(path, mode)?);
        }

        let first = files[0].header();
        let (signature_size, num_hashes) = (first.signature_size, first.num_hashes);
        for file in &files[1..] {
            let h = file.header();
            if h.signature_size != signature_size {
                return Err(BisqueError::mismatch(
                    file.path(),
                    "signature_size",
                    signature_size,
                    h.signature_size,
                ));
            }
            if h.num_hashes != num_hashes {
                return Err(BisqueError::mismatch(
                    file.path(),
                    "num_hashes",
                    num_hashes,
                    h.num_hashes,
                ));
            }
        }
        Ok(ClassicSearch { files })
    }

    /// Convenience wrapper for the common single-file case.
    pub fn open_single(path: &Path, mode: AccessMode) -> Result<Self> {
        Self::open(std::slice::from_ref(&path.to_path_buf()), mode)
    }

    /// Total number of named (non-padding) samples across all files.
    pub fn num_samples(&self) -> usize {
        self.files
            .iter()
            .map(|f| f.header().file_names.iter().filter(|n| !n.is_empty()).count())
            .sum()
    }

    /// Run one query.
    ///
    /// `threshold` is the minimum fraction of query k-mers a candidate
    /// must match, in `[0, 1]`. `num_results = 0` returns all candidates.
    pub fn search(
        &self,
        query: &str,
        threshold: f64,
        num_results: usize,
        t: &mut Timer,
    ) -> Result<SearchOutcome> {
        if !(0.0..=1.0).contains(&threshold) {
            return Err(BisqueError::validation(format!(
                "threshold {} outside [0, 1]",
                threshold
            )));
        }

        t.active("hashes");
        let scan = scan_kmers(query.as_bytes());
        let kmer_count = scan.kmers.len();
        if kmer_count == 0 {
            t.stop();
            return Ok(SearchOutcome {
                status: SearchStatus::NoKmers,
                hits: Vec::new(),
                kmer_count: 0,
                ignored_kmers: scan.ignored,
            });
        }
        let min_score = (threshold * kmer_count as f64).ceil() as u64;

        // (score, file position, column): the sort key for global ranking
        let mut candidates: Vec<(u16, usize, u64)> = Vec::new();
        for (file_idx, file) in self.files.iter().enumerate() {
            let counts = count_matches(file, &scan.kmers, t)?;
            let names = &file.header().file_names;
            for (column, &count) in counts.iter().enumerate() {
                if u64::from(count) < min_score {
                    continue;
                }
                // Padding columns have no name and never surface
                if names.get(column).map_or(true, |n| n.is_empty()) {
                    continue;
                }
                candidates.push((count, file_idx, column as u64));
            }
        }

        t.active("rank");
        candidates.sort_by(|a, b| b.0.cmp(&a.0).then(a.1.cmp(&b.1)).then(a.2.cmp(&b.2)));
        if num_results > 0 {
            candidates.truncate(num_results);
        }

        let hits = candidates
            .into_iter()
            .map(|(score, file_idx, column)| ResultEntry {
                score,
                name: self.files[file_idx].header().file_names[column as usize].clone(),
            })
            .collect();
        t.stop();

        Ok(SearchOutcome {
            status: SearchStatus::Ok,
            hits,
            kmer_count,
            ignored_kmers: scan.ignored,
        })
    }
}

/// Per-column match counts of `kmers` against one file.
///
/// Returns `8 * row_size` saturating u16 counters.
fn count_matches(file: &SearchFile, kmers: &[Kmer31], t: &mut Timer) -> Result<Vec<u16>> {
    let header = file.header();
    let s = header.signature_size;
    let w = header.row_size as usize;
    let h = header.num_hashes as usize;
    let num_columns = header.num_columns() as usize;

    t.active("hashes");
    let mut selected: Vec<u64> = Vec::with_capacity(kmers.len() * h);
    for &kmer in kmers {
        selected.extend(row_indices(kmer, header.num_hashes, s));
    }

    t.active("read rows");
    let mut rows = vec![0u8; selected.len() * w];
    file.read_rows(&selected, &mut rows)?;

    // Parallel reduction over k-mers: AND the H rows of each k-mer, then
    // fold the surviving bits into per-thread counters.
    t.active("count");
    let counts = rows
        .par_chunks_exact(h * w)
        .fold(
            || vec![0u16; num_columns],
            |mut acc, group| {
                let mut anded = group[..w].to_vec();
                for row in group.chunks_exact(w).skip(1) {
                    for (a, b) in anded.iter_mut().zip(row) {
                        *a &= b;
                    }
                }
                for (i, &byte) in anded.iter().enumerate() {
                    let mut bits = byte;
                    while bits != 0 {
                        let bit = bits.trailing_zeros() as usize;
                        let column = i * 8 + bit;
                        acc[column] = acc[column].saturating_add(1);
                        bits &= bits - 1;
                    }
                }
                acc
            },
        )
        .reduce(
            || vec![0u16; num_columns],
            |mut a, b| {
                for (x, y) in a.iter_mut().zip(b) {
                    *x = x.saturating_add(y);
                }
                a
            },
        );
    Ok(counts)
}
