//! bisque: a classic Bloom-filter search index for genomic k-mer sets.
//!
//! Each "document" is one sample's set of 31-mers; the corpus holds
//! thousands to millions of samples. The index answers approximate
//! membership queries ("which samples probably contain at least a
//! fraction θ of this DNA string's 31-mers?") with tolerated false
//! positives and no false negatives.
//!
//! # Pipeline
//!
//! 1. [`ingest`]: Cortex `.ctx` files → normalized `.bqs` sample stores.
//! 2. [`classic::builder`]: batches of samples → row-striped Bloom
//!    matrices, one column per sample.
//! 3. [`classic::combine`]: horizontal concatenation of batches into one
//!    wide matrix covering every sample.
//! 4. [`classic::search`]: memory-mapped (or streamed) query engine that
//!    hashes a query into row selectors, ANDs the rows per k-mer, and
//!    ranks samples by how many k-mers they match.

pub mod batch;
pub mod classic;
pub mod config;
pub mod constants;
pub mod cortex;
mod encoding;
pub mod error;
pub mod hasher;
pub mod ingest;
pub mod kmer;
pub mod logging;
pub mod sample;
pub mod timer;

pub use classic::{
    build_batch, build_directory, combine_directory, combine_group, AccessMode, BloomMatrix,
    ClassicHeader, ClassicParams, ClassicSearch, ResultEntry, SearchFile, SearchOutcome,
    SearchStatus,
};
pub use error::{BisqueError, Result};
pub use hasher::row_indices;
pub use ingest::{ingest_cortex_dir, IngestReport};
pub use kmer::{scan_kmers, Kmer31, KmerScan, KMER_BYTES, KMER_LEN};
pub use sample::Sample;
pub use timer::Timer;
