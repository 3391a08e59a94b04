//! Cortex v6 `.ctx` parser (input collaborator).
//!
//! Only the subset this pipeline consumes is understood: version 6, k = 31,
//! exactly one color, header bounded by the magic word `"CORTEX"` on both
//! sides. Each record is `8 * num_words_per_kmer` k-mer bytes followed by
//! `5 * num_colors` per-color bytes; the parser keeps the first 8 bytes
//! (the packed k-mer) and skips the rest.
//!
//! Parse failures are per-file: callers log them and move on to the next
//! input, they never abort a bulk ingestion.

use std::fs;
use std::path::Path;

use crate::constants::{CORTEX_MAGIC, CORTEX_VERSION, MAX_NAME_LENGTH};
use crate::error::{BisqueError, Result};
use crate::kmer::{Kmer31, KMER_BYTES};
use crate::sample::Sample;

/// Parse a `.ctx` file into a [`Sample`].
///
/// Returns `Ok(None)` for an empty file, which the original pipeline
/// silently skips rather than treating as an error.
pub fn parse_file(path: &Path) -> Result<Option<Sample>> {
    let data = fs::read(path).map_err(|e| BisqueError::io(path, "read", e))?;
    if data.is_empty() {
        return Ok(None);
    }
    parse_bytes(&data, path).map(Some)
}

fn parse_bytes(data: &[u8], path: &Path) -> Result<Sample> {
    let mut cur = Cursor { data, pos: 0, path };

    cur.magic()?;
    let version = cur.u32()?;
    if version != CORTEX_VERSION {
        return Err(cur.invalid(format!("unsupported .ctx version {}", version)));
    }
    let kmer_size = cur.u32()?;
    if kmer_size != 31 {
        return Err(cur.invalid(format!("kmer size is {}, expected 31", kmer_size)));
    }
    let num_words = cur.u32()? as usize;
    if num_words == 0 {
        return Err(cur.invalid("num_words_per_kmer is zero"));
    }
    let num_colors = cur.u32()? as usize;
    if num_colors != 1 {
        return Err(cur.invalid(format!("{} colors, expected 1", num_colors)));
    }

    for _ in 0..num_colors {
        cur.u32()?; // mean read length
        cur.u64()?; // total sequence length
    }
    let mut name = String::new();
    for _ in 0..num_colors {
        name = cur.string()?;
    }
    // Per-color error rate (16 bytes each)
    cur.skip(16 * num_colors)?;
    for _ in 0..num_colors {
        // Cleaning flags and thresholds
        cur.skip(12)?;
        let graph_name_len = cur.u32()? as usize;
        cur.skip(graph_name_len)?;
    }
    cur.magic()?;

    let record_len = 8 * num_words + 5 * num_colors;
    let body = cur.rest();
    if body.len() % record_len != 0 {
        return Err(BisqueError::format(path, "corrupted .ctx file"));
    }

    let mut kmers = Vec::with_capacity(body.len() / record_len);
    for record in body.chunks_exact(record_len) {
        let mut bytes = [0u8; KMER_BYTES];
        bytes.copy_from_slice(&record[..KMER_BYTES]);
        kmers.push(Kmer31::from_le_bytes(bytes));
    }

    Ok(Sample { name, kmers })
}

struct Cursor<'a> {
    data: &'a [u8],
    pos: usize,
    path: &'a Path,
}

impl<'a> Cursor<'a> {
    fn invalid(&self, detail: impl Into<String>) -> BisqueError {
        BisqueError::format(self.path, detail)
    }

    fn take(&mut self, n: usize) -> Result<&'a [u8]> {
        if self.pos + n > self.data.len() {
            return Err(self.invalid("truncated .ctx header"));
        }
        let slice = &self.data[self.pos..self.pos + n];
        self.pos += n;
        Ok(slice)
    }

    fn skip(&mut self, n: usize) -> Result<()> {
        self.take(n).map(|_| ())
    }

    fn u32(&mut self) -> Result<u32> {
        let bytes = self.take(4)?;
        Ok(u32::from_le_bytes(bytes.try_into().unwrap()))
    }

    fn u64(&mut self) -> Result<u64> {
        let bytes = self.take(8)?;
        Ok(u64::from_le_bytes(bytes.try_into().unwrap()))
    }

    fn string(&mut self) -> Result<String> {
        let len = self.u32()? as usize;
        if len > MAX_NAME_LENGTH {
            return Err(self.invalid(format!("name length {} exceeds limit", len)));
        }
        let bytes = self.take(len)?;
        String::from_utf8(bytes.to_vec()).map_err(|_| self.invalid("name is not valid UTF-8"))
    }

    fn magic(&mut self) -> Result<()> {
        let bytes = self.take(CORTEX_MAGIC.len())?;
        if bytes != CORTEX_MAGIC {
            return Err(self.invalid("magic mismatch"));
        }
        Ok(())
    }

    fn rest(self) -> &'a [u8] {
        &self.data[self.pos..]
    }
}


#[cfg(test)]
mod tests {
    use super::test_support::ctx_bytes;
    use super::*;
    use crate::kmer::scan_kmers;
    use std::fs;
    use tempfile::tempdir;

    fn kmers() -> Vec<Kmer31> {
        let seq: Vec<u8> = b"ACGGTCA".iter().copied().cycle().take(60).collect();
        scan_kmers(&seq).kmers
    }

    #[test]
    fn test_parse_roundtrip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("s1.ctx");
        let kmers = kmers();
        fs::write(&path, ctx_bytes("sample_one", &kmers)).unwrap();

        let sample = parse_file(&path).unwrap().expect("non-empty");
        assert_eq!(sample.name, "sample_one");
        assert_eq!(sample.kmers, kmers);
    }

    #[test]
    fn test_empty_file_is_skipped() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("empty.ctx");
        fs::write(&path, b"").unwrap();
        assert!(parse_file(&path).unwrap().is_none());
    }

    #[test]
    fn test_bad_magic() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("bad.ctx");
        let mut bytes = ctx_bytes("s", &kmers());
        bytes[0] = b'X';
        fs::write(&path, bytes).unwrap();
        match parse_file(&path) {
            Err(BisqueError::Format { detail, .. }) => assert!(detail.contains("magic")),
            other => panic!("expected format error, got {:?}", other),
        }
    }

    #[test]
    fn test_wrong_version() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("v5.ctx");
        let mut bytes = ctx_bytes("s", &kmers());
        bytes[6..10].copy_from_slice(&5u32.to_le_bytes());
        fs::write(&path, bytes).unwrap();
        match parse_file(&path) {
            Err(BisqueError::Format { detail, .. }) => assert!(detail.contains("version")),
            other => panic!("expected format error, got {:?}", other),
        }
    }

    #[test]
    fn test_ragged_records_rejected() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("ragged.ctx");
        let mut bytes = ctx_bytes("s", &kmers());
        bytes.truncate(bytes.len() - 3);
        fs::write(&path, bytes).unwrap();
        match parse_file(&path) {
            Err(BisqueError::Format { detail, .. }) => assert!(detail.contains("corrupted")),
            other => panic!("expected format error, got {:?}", other),
        }
    }

    #[test]
    fn test_truncated_header() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("short.ctx");
        fs::write(&path, &ctx_bytes("s", &[])[..12]).unwrap();
        assert!(matches!(
            parse_file(&path),
            Err(BisqueError::Format { .. })
        ));
    }
}
