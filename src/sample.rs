//! Sample store: the normalized on-disk form of one sample's k-mer set.
//!
//! A `.bqs` file is the handoff point between ingestion (Cortex parsing)
//! and the Bloom builder: a small header followed by raw packed 31-mers.
//! Files are written once and read-only afterwards.
//!
//! # File Format (v1)
//! - magic `"SAMPLE\0\0"` (8 bytes)
//! - version u32 = 1
//! - k u32 = 31
//! - sample name (u32 length + UTF-8)
//! - body: concatenated 8-byte little-endian k-mers

use std::fs::File;
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;

use crate::constants::{MAX_NAME_LENGTH, SAMPLE_MAGIC, SAMPLE_VERSION};
use crate::encoding::{map_read_err, read_str, read_u32, write_str, write_u32};
use crate::error::{BisqueError, Result};
use crate::kmer::{Kmer31, KMER_BYTES, KMER_LEN};

/// One sample: a name and its k-mer set.
///
/// K-mer order is immaterial and duplicates are harmless; the Bloom
/// builder treats the collection as a multiset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Sample {
    pub name: String,
    pub kmers: Vec<Kmer31>,
}

impl Sample {
    pub fn new(name: impl Into<String>, kmers: Vec<Kmer31>) -> Self {
        Sample {
            name: name.into(),
            kmers,
        }
    }

    /// Write the sample store file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let file = File::create(path).map_err(|e| BisqueError::io(path, "create", e))?;
        let mut w = BufWriter::new(file);
        self.write_to(&mut w)
            .map_err(|e| BisqueError::io(path, "write", e))
    }

    fn write_to<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_all(&SAMPLE_MAGIC)?;
        write_u32(w, SAMPLE_VERSION)?;
        write_u32(w, KMER_LEN as u32)?;
        write_str(w, &self.name)?;
        for kmer in &self.kmers {
            w.write_all(&kmer.to_le_bytes())?;
        }
        w.flush()
    }

    /// Read a sample store file back.
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).map_err(|e| BisqueError::io(path, "open", e))?;
        let mut r = BufReader::new(file);

        let mut magic = [0u8; 8];
        r.read_exact(&mut magic)
            .map_err(|e| BisqueError::io(path, "read header", e))?;
        if magic != SAMPLE_MAGIC {
            return Err(BisqueError::format(path, "magic mismatch"));
        }

        let version =
            read_u32(&mut r).map_err(|e| map_read_err(path, "read header", e))?;
        if version != SAMPLE_VERSION {
            return Err(BisqueError::format(
                path,
                format!("unsupported version {}", version),
            ));
        }

        let k = read_u32(&mut r).map_err(|e| map_read_err(path, "read header", e))?;
        if k as usize != KMER_LEN {
            return Err(BisqueError::format(path, format!("k is {}, expected 31", k)));
        }

        let name = read_str(&mut r, MAX_NAME_LENGTH)
            .map_err(|e| map_read_err(path, "read header", e))?;

        let mut body = Vec::new();
        r.read_to_end(&mut body)
            .map_err(|e| BisqueError::io(path, "read body", e))?;
        if body.len() % KMER_BYTES != 0 {
            return Err(BisqueError::format(
                path,
                format!("body length {} is not a multiple of {}", body.len(), KMER_BYTES),
            ));
        }

        let kmers = body
            .chunks_exact(KMER_BYTES)
            .map(|chunk| {
                let mut bytes = [0u8; KMER_BYTES];
                bytes.copy_from_slice(chunk);
                Kmer31::from_le_bytes(bytes)
            })
            .collect();

        Ok(Sample { name, kmers })
    }
}
