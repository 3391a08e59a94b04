//! Read access to a finished matrix file.
//!
//! Two backends with one contract: fetch selected rows into a caller
//! buffer. The mmap backend hands out slices of the mapped body and lets
//! the OS page on demand; the streamed backend issues positioned reads.
//! Search results must be byte-identical across the two.

use memmap2::Mmap;
use rayon::prelude::*;
use std::fs::File;
use std::io::BufReader;
use std::os::unix::fs::FileExt;
use std::path::{Path, PathBuf};

use crate::error::{BisqueError, Result};

use super::header::ClassicHeader;

/// How a matrix body is accessed during queries.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AccessMode {
    /// Map the file and copy rows out of the mapping.
    #[default]
    Mmap,
    /// Positioned reads against the file descriptor.
    Stream,
}

enum Backend {
    Mmap(Mmap),
    Stream(File),
}

/// An open, validated matrix file.
///
/// Owns the file descriptor and (for [`AccessMode::Mmap`]) the mapping;
/// both are released when the value drops. Search code holds shared
/// references only.
pub struct SearchFile {
    path: PathBuf,
    header: ClassicHeader,
    body_offset: u64,
    backend: Backend,
}

impl SearchFile {
    /// Open a matrix file: validate magic, version and field sanity, check
    /// that the body is exactly `signature_size * row_size` bytes, then
    /// attach the chosen backend.
    pub fn open(path: &Path, mode: AccessMode) -> Result<Self> {
        let file = File::open(path).map_err(|e| BisqueError::io(path, "open", e))?;
        let file_len = file
            .metadata()
            .map_err(|e| BisqueError::io(path, "stat", e))?
            .len();

        let mut reader = BufReader::new(&file);
        let header = ClassicHeader::read_from(&mut reader, path)?;
        let body_offset = header.serialized_len();

        let body_found = file_len.saturating_sub(body_offset);
        if body_found != header.body_bytes() {
            return Err(BisqueError::truncated(path, header.body_bytes(), body_found));
        }

        let backend = match mode {
            AccessMode::Mmap => {
                // Safety: the file is opened read-only and the mapping is
                // never outlived by the slices handed out below.
                let map =
                    unsafe { Mmap::map(&file) }.map_err(|e| BisqueError::io(path, "mmap", e))?;
                Backend::Mmap(map)
            }
            AccessMode::Stream => Backend::Stream(file),
        };

        Ok(SearchFile {
            path: path.to_path_buf(),
            header,
            body_offset,
            backend,
        })
    }

    pub fn header(&self) -> &ClassicHeader {
        &self.header
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Copy the selected rows into `out`, one `row_size` slice per entry
    /// of `rows`, in order. Row indices must already be reduced mod
    /// `signature_size`.
    pub fn read_rows(&self, rows: &[u64], out: &mut [u8]) -> Result<()> {
        let w = self.header.row_size as usize;
        debug_assert_eq!(out.len(), rows.len() * w);

        match &self.backend {
            Backend::Mmap(map) => {
                let body = &map[self.body_offset as usize..];
                debug_assert_eq!(body.len() as u64, self.header.body_bytes());
                out.par_chunks_mut(w)
                    .zip(rows.par_iter())
                    .for_each(|(chunk, &row)| {
                        let offset = row as usize * w;
                        debug_assert!(offset + w <= body.len());
                        chunk.copy_from_slice(&body[offset..offset + w]);
                    });
                Ok(())
            }
            Backend::Stream(file) => {
                for (chunk, &row) in out.chunks_mut(w).zip(rows) {
                    file.read_exact_at(chunk, self.body_offset + row * w as u64)
                        .map_err(|e| BisqueError::io(&self.path, "read row", e))?;
                }
                Ok(())
            }
        }
    }
}
