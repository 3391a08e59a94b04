//! Command-line argument definitions for the bisque CLI.

use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "bisque")]
#[command(about = "Bit-sliced Bloom-filter search over large collections of k-mer sets")]
#[command(
    long_about = "Bisque: approximate membership search over large collections of genomic
31-mer sets. Samples become columns of one wide Bloom bit matrix; a query
reports every sample that probably contains at least a threshold fraction
of the query's 31-mers. False positives are possible, false negatives are
not.

WORKFLOW:
  1. Ingest Cortex graphs:   bisque ingest-cortex ctx/ samples/
  2. Build batch matrices:   bisque build-classic samples/ batches/ \\
                               --signature-size 33554432 --block-size 1024 --hashes 3
  3. Combine into one index: bisque combine batches/ index/ --batch-size 32
  4. Query it:               bisque query index/index.bqx ACGT... --threshold 0.9"
)]
pub struct Cli {
    /// Enable verbose progress output with timestamps
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Convert Cortex .ctx files into sample store (.bqs) files
    #[command(after_help = "Per-file parse failures are logged and skipped; the run only fails
if no file could be ingested at all. Existing outputs are not rewritten,
so an interrupted run can simply be restarted.")]
    IngestCortex {
        /// Directory scanned recursively for .ctx files
        in_dir: PathBuf,
        /// Output directory for .bqs sample stores
        out_dir: PathBuf,
    },

    /// Build batch Bloom matrices (.bqx) from sample stores
    #[command(after_help = "EXAMPLES:
  # 2^25 rows, 8192 samples per batch, 3 hash functions
  bisque build-classic samples/ batches/ -s 33554432 -b 1024 --hashes 3

  # Same parameters pinned in a config file
  bisque build-classic samples/ batches/ --config build.toml")]
    BuildClassic {
        /// Directory scanned recursively for .bqs files
        in_dir: PathBuf,
        /// Output directory for batch matrices
        out_dir: PathBuf,
        /// Matrix rows (the Bloom modulus)
        #[arg(short, long, required_unless_present = "config")]
        signature_size: Option<u64>,
        /// Bytes per matrix row; one batch holds 8x this many samples
        #[arg(short, long, required_unless_present = "config")]
        block_size: Option<u64>,
        /// Hash functions per k-mer
        #[arg(long, default_value_t = 3)]
        hashes: u64,
        /// TOML file with a [classic] section; overrides the flags above
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Combine batch matrices into a single index file
    Combine {
        /// Directory scanned recursively for .bqx files
        in_dir: PathBuf,
        /// Output directory; the result lands at <out_dir>/index.bqx
        out_dir: PathBuf,
        /// Files concatenated per pass
        #[arg(short, long, default_value_t = 32)]
        batch_size: usize,
    },

    /// Query an index for samples containing the query's 31-mers
    #[command(after_help = "EXAMPLES:
  # Direct query string, top 20 hits
  bisque query index.bqx ACGTACGT... -t 0.9 -n 20

  # One search per FASTA record
  bisque query index.bqx --query-file reads.fasta

  # Sharded deployment: additional indices over disjoint samples
  bisque query index_a.bqx ACGT... --extra-index index_b.bqx")]
    Query {
        /// Index file (.bqx)
        index: PathBuf,
        /// DNA query string; or use --query-file
        query: Option<String>,
        /// FASTA file; each record becomes one query
        #[arg(short = 'f', long, conflicts_with = "query")]
        query_file: Option<PathBuf>,
        /// Minimum fraction of query k-mers a hit must match
        #[arg(short, long, default_value_t = 0.9)]
        threshold: f64,
        /// Maximum hits reported; 0 means all
        #[arg(short, long, default_value_t = 0)]
        num_results: usize,
        /// Additional index files over disjoint sample sets
        #[arg(long)]
        extra_index: Vec<PathBuf>,
        /// Positioned reads instead of memory-mapping the index
        #[arg(long)]
        no_mmap: bool,
        /// Write results here instead of stdout
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}
