//! Little-endian primitives shared by the on-disk formats.
//!
//! Every integer field is written explicitly via `to_le_bytes`, never by
//! copying in-memory representations, so the formats stay stable on any
//! host. Strings are u32 length-prefixed UTF-8.

use std::io::{self, Read, Write};
use std::path::Path;

use crate::error::BisqueError;

pub(crate) fn write_u32<W: Write>(w: &mut W, value: u32) -> io::Result<()> {
    w.write_all(&value.to_le_bytes())
}

pub(crate) fn write_u64<W: Write>(w: &mut W, value: u64) -> io::Result<()> {
    w.write_all(&value.to_le_bytes())
}

pub(crate) fn write_str<W: Write>(w: &mut W, s: &str) -> io::Result<()> {
    write_u32(w, s.len() as u32)?;
    w.write_all(s.as_bytes())
}

pub(crate) fn read_u32<R: Read>(r: &mut R) -> io::Result<u32> {
    let mut buf = [0u8; 4];
    r.read_exact(&mut buf)?;
    Ok(u32::from_le_bytes(buf))
}

pub(crate) fn read_u64<R: Read>(r: &mut R) -> io::Result<u64> {
    let mut buf = [0u8; 8];
    r.read_exact(&mut buf)?;
    Ok(u64::from_le_bytes(buf))
}

/// Read a length-prefixed string, rejecting lengths above `max_len`.
///
/// Oversized lengths and invalid UTF-8 surface as `InvalidData`, which
/// [`map_read_err`] turns into a format error.
pub(crate) fn read_str<R: Read>(r: &mut R, max_len: usize) -> io::Result<String> {
    let len = read_u32(r)? as usize;
    if len > max_len {
        return Err(io::Error::new(
            io::ErrorKind::InvalidData,
            format!("string length {} exceeds limit {}", len, max_len),
        ));
    }
    let mut buf = vec![0u8; len];
    r.read_exact(&mut buf)?;
    String::from_utf8(buf)
        .map_err(|_| io::Error::new(io::ErrorKind::InvalidData, "string is not valid UTF-8"))
}

/// Serialized size of a length-prefixed string.
pub(crate) fn str_len(s: &str) -> u64 {
    4 + s.len() as u64
}

/// Classify a read error: `InvalidData` means the bytes were readable but
/// wrong (format error), anything else is I/O.
pub(crate) fn map_read_err(path: &Path, operation: &'static str, e: io::Error) -> BisqueError {
    if e.kind() == io::ErrorKind::InvalidData {
        BisqueError::format(path, e.to_string())
    } else {
        BisqueError::io(path, operation, e)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn test_u64_roundtrip() {
        let mut buf = Vec::new();
        write_u64(&mut buf, 0x0123_4567_89AB_CDEF).unwrap();
        assert_eq!(buf.len(), 8);
        assert_eq!(buf[0], 0xEF, "least significant byte first");
        let v = read_u64(&mut Cursor::new(&buf)).unwrap();
        assert_eq!(v, 0x0123_4567_89AB_CDEF);
    }

    #[test]
    fn test_str_roundtrip() {
        let mut buf = Vec::new();
        write_str(&mut buf, "sample_007").unwrap();
        assert_eq!(buf.len() as u64, str_len("sample_007"));
        let s = read_str(&mut Cursor::new(&buf), 100).unwrap();
        assert_eq!(s, "sample_007");
    }

    #[test]
    fn test_str_length_limit() {
        let mut buf = Vec::new();
        write_str(&mut buf, "0123456789").unwrap();
        let err = read_str(&mut Cursor::new(&buf), 5).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_str_invalid_utf8() {
        let mut buf = Vec::new();
        write_u32(&mut buf, 2).unwrap();
        buf.extend_from_slice(&[0xFF, 0xFE]);
        let err = read_str(&mut Cursor::new(&buf), 100).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
    }

    #[test]
    fn test_short_read_is_eof() {
        let buf = [0u8; 3];
        let err = read_u32(&mut Cursor::new(&buf[..])).unwrap_err();
        assert_eq!(err.kind(), io::ErrorKind::UnexpectedEof);
    }
}
