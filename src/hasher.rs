//! Row selection hashing shared by the build and query paths.
//!
//! Each of the `num_hashes` Bloom positions of a k-mer is
//! `XXH32(kmer_bytes, seed = i) % signature_size`. The same modular
//! reduction runs on both sides; any divergence here turns into false
//! negatives, so this is the only place row indices are ever computed.

use xxhash_rust::xxh32::xxh32;

use crate::kmer::{Kmer31, KMER_BYTES};

/// Row indices of one k-mer under seeds `0..num_hashes`.
///
/// Pure and allocation-free; yields values in `[0, signature_size)`.
#[inline]
pub fn row_indices(
    kmer: Kmer31,
    num_hashes: u64,
    signature_size: u64,
) -> impl Iterator<Item = u64> {
    debug_assert!(signature_size > 0);
    let bytes: [u8; KMER_BYTES] = kmer.to_le_bytes();
    (0..num_hashes).map(move |seed| xxh32(&bytes, seed as u32) as u64 % signature_size)
}
