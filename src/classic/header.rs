//! Classic matrix file header.
//!
//! Shared by batch files and combined indices; a batch is simply a narrow
//! classic file. All integers little-endian.
//!
//! # Layout (v1)
//! - magic `"CLASSIC\0"` (8 bytes)
//! - version u32 = 1
//! - signature_size u64 (rows; the Bloom modulus, > 0)
//! - row_size u64 (bytes per row, > 0)
//! - num_hashes u64 (≥ 1)
//! - num_names u64 (≤ 8 * row_size)
//! - names: num_names × (u32 length + UTF-8)
//! - body: signature_size * row_size bytes, row-major

use std::io::{Read, Write};
use std::path::Path;

use crate::constants::{CLASSIC_MAGIC, CLASSIC_VERSION, MAX_NAME_LENGTH, MAX_NUM_NAMES};
use crate::encoding::{map_read_err, read_str, read_u32, read_u64, str_len, write_str, write_u32, write_u64};
use crate::error::{BisqueError, Result};

/// Parsed header of a classic matrix file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassicHeader {
    /// Number of rows (the Bloom modulus).
    pub signature_size: u64,
    /// Bytes per row.
    pub row_size: u64,
    /// Hash seeds per k-mer.
    pub num_hashes: u64,
    /// Sample name per column; empty strings are padding columns.
    pub file_names: Vec<String>,
}

impl ClassicHeader {
    pub fn new(
        signature_size: u64,
        row_size: u64,
        num_hashes: u64,
        file_names: Vec<String>,
    ) -> Result<Self> {
        if signature_size == 0 {
            return Err(BisqueError::validation("signature_size must be > 0"));
        }
        if row_size == 0 {
            return Err(BisqueError::validation("row_size must be > 0"));
        }
        if num_hashes == 0 {
            return Err(BisqueError::validation("num_hashes must be >= 1"));
        }
        if file_names.len() as u64 > 8 * row_size {
            return Err(BisqueError::validation(format!(
                "{} names for {} columns",
                file_names.len(),
                8 * row_size
            )));
        }
        Ok(ClassicHeader {
            signature_size,
            row_size,
            num_hashes,
            file_names,
        })
    }

    /// Number of sample columns, including padding.
    pub fn num_columns(&self) -> u64 {
        8 * self.row_size
    }

    /// Exact size of the bit-matrix body.
    pub fn body_bytes(&self) -> u64 {
        self.signature_size * self.row_size
    }

    /// Serialized header size; the body starts at this offset.
    pub fn serialized_len(&self) -> u64 {
        let fixed = CLASSIC_MAGIC.len() as u64 + 4 + 8 * 4;
        fixed + self.file_names.iter().map(|n| str_len(n)).sum::<u64>()
    }

    pub fn write_to<W: Write>(&self, w: &mut W) -> std::io::Result<()> {
        w.write_all(&CLASSIC_MAGIC)?;
        write_u32(w, CLASSIC_VERSION)?;
        write_u64(w, self.signature_size)?;
        write_u64(w, self.row_size)?;
        write_u64(w, self.num_hashes)?;
        write_u64(w, self.file_names.len() as u64)?;
        for name in &self.file_names {
            write_str(w, name)?;
        }
        Ok(())
    }

    /// Parse and validate a header. `path` is used for error context only.
    pub fn read_from<R: Read>(r: &mut R, path: &Path) -> Result<Self> {
        let mut magic = [0u8; 8];
        r.read_exact(&mut magic)
            .map_err(|e| BisqueError::io(path, "read header", e))?;
        if magic != CLASSIC_MAGIC {
            return Err(BisqueError::format(path, "magic mismatch"));
        }

        let version = read_u32(r).map_err(|e| map_read_err(path, "read header", e))?;
        if version != CLASSIC_VERSION {
            return Err(BisqueError::format(
                path,
                format!("unsupported version {}", version),
            ));
        }

        let signature_size = read_u64(r).map_err(|e| map_read_err(path, "read header", e))?;
        if signature_size == 0 {
            return Err(BisqueError::format(path, "signature_size is zero"));
        }
        let row_size = read_u64(r).map_err(|e| map_read_err(path, "read header", e))?;
        if row_size == 0 {
            return Err(BisqueError::format(path, "row_size is zero"));
        }
        let num_hashes = read_u64(r).map_err(|e| map_read_err(path, "read header", e))?;
        if num_hashes == 0 {
            return Err(BisqueError::format(path, "num_hashes is zero"));
        }

        let num_names = read_u64(r).map_err(|e| map_read_err(path, "read header", e))?;
        if num_names > 8 * row_size || num_names > MAX_NUM_NAMES {
            return Err(BisqueError::format(
                path,
                format!("{} names for {} columns", num_names, 8 * row_size),
            ));
        }

        let mut file_names = Vec::with_capacity(num_names as usize);
        for _ in 0..num_names {
            file_names.push(
                read_str(r, MAX_NAME_LENGTH).map_err(|e| map_read_err(path, "read header", e))?,
            );
        }

        Ok(ClassicHeader {
            signature_size,
            row_size,
            num_hashes,
            file_names,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;
    use std::path::PathBuf;

    fn header() -> ClassicHeader {
        ClassicHeader::new(
            1024,
            2,
            3,
            vec!["a".into(), "b".into(), String::new(), "d".into()],
        )
        .unwrap()
    }

    #[test]
    fn test_roundtrip() {
        let h = header();
        let mut buf = Vec::new();
        h.write_to(&mut buf).unwrap();
        assert_eq!(buf.len() as u64, h.serialized_len());

        let parsed =
            ClassicHeader::read_from(&mut Cursor::new(&buf), &PathBuf::from("t.bqx")).unwrap();
        assert_eq!(parsed, h);
    }

    #[test]
    fn test_rejects_zero_signature_size() {
        assert!(ClassicHeader::new(0, 2, 3, vec![]).is_err());

        let h = header();
        let mut buf = Vec::new();
        h.write_to(&mut buf).unwrap();
        buf[12..20].copy_from_slice(&0u64.to_le_bytes());
        match ClassicHeader::read_from(&mut Cursor::new(&buf), &PathBuf::from("t.bqx")) {
            Err(BisqueError::Format { detail, .. }) => {
                assert!(detail.contains("signature_size"))
            }
            other => panic!("expected format error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_bad_magic() {
        let h = header();
        let mut buf = Vec::new();
        h.write_to(&mut buf).unwrap();
        buf[0] ^= 0xFF;
        match ClassicHeader::read_from(&mut Cursor::new(&buf), &PathBuf::from("t.bqx")) {
            Err(BisqueError::Format { detail, .. }) => assert!(detail.contains("magic")),
            other => panic!("expected format error, got {:?}", other),
        }
    }

    #[test]
    fn test_rejects_wrong_version() {
        let h = header();
        let mut buf = Vec::new();
        h.write_to(&mut buf).unwrap();
        buf[8..12].copy_from_slice(&9u32.to_le_bytes());
        assert!(matches!(
            ClassicHeader::read_from(&mut Cursor::new(&buf), &PathBuf::from("t.bqx")),
            Err(BisqueError::Format { .. })
        ));
    }

    #[test]
    fn test_rejects_name_overflow() {
        let names = vec![String::new(); 17];
        assert!(ClassicHeader::new(16, 2, 1, names).is_err());
    }

    #[test]
    fn test_truncated_header_is_io_error() {
        let h = header();
        let mut buf = Vec::new();
        h.write_to(&mut buf).unwrap();
        buf.truncate(20);
        assert!(matches!(
            ClassicHeader::read_from(&mut Cursor::new(&buf), &PathBuf::from("t.bqx")),
            Err(BisqueError::Io { .. })
        ));
    }

    #[test]
    fn test_column_and_body_arithmetic() {
        let h = header();
        assert_eq!(h.num_columns(), 16);
        assert_eq!(h.body_bytes(), 2048);
    }
}
