//! Horizontal concatenation of batch matrices.
//!
//! Row `r` of the output is the byte-wise concatenation of row `r` of every
//! input, in input order (never a bitwise merge). The sample at column `c`
//! of input `j` therefore lands at column `8 * (W_0 + .. + W_{j-1}) + c`,
//! and the concatenated (padded) name lists stay aligned with the columns.
//!
//! Inputs must agree on `signature_size` and `num_hashes`; each input's
//! body length is checked against its header before any output is written.

use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::{Path, PathBuf};

use crate::batch::collect_files;
use crate::constants::CLASSIC_EXT;
use crate::error::{BisqueError, Result};
use crate::timer::Timer;

use super::header::ClassicHeader;

/// Concatenate a group of batch files into one wider matrix file.
pub fn combine_group(paths: &[PathBuf], out_file: &Path, t: &mut Timer) -> Result<()> {
    if paths.is_empty() {
        return Err(BisqueError::validation("empty combine group"));
    }

    t.active("open");
    let mut inputs = Vec::with_capacity(paths.len());
    let mut signature_size = 0u64;
    let mut num_hashes = 0u64;
    let mut total_row_size = 0u64;
    let mut file_names = Vec::new();

    for (j, path) in paths.iter().enumerate() {
        let file = File::open(path).map_err(|e| BisqueError::io(path, "open", e))?;
        let file_len = file
            .metadata()
            .map_err(|e| BisqueError::io(path, "stat", e))?
            .len();
        let mut reader = BufReader::new(file);
        let header = ClassicHeader::read_from(&mut reader, path)?;

        let body_found = file_len.saturating_sub(header.serialized_len());
        if body_found != header.body_bytes() {
            return Err(BisqueError::truncated(path, header.body_bytes(), body_found));
        }

        if j == 0 {
            signature_size = header.signature_size;
            num_hashes = header.num_hashes;
        } else {
            if header.signature_size != signature_size {
                return Err(BisqueError::mismatch(
                    path,
                    "signature_size",
                    signature_size,
                    header.signature_size,
                ));
            }
            if header.num_hashes != num_hashes {
                return Err(BisqueError::mismatch(
                    path,
                    "num_hashes",
                    num_hashes,
                    header.num_hashes,
                ));
            }
        }

        total_row_size += header.row_size;
        let mut names = header.file_names.clone();
        names.resize(header.num_columns() as usize, String::new());
        file_names.extend(names);

        inputs.push((reader, header.row_size as usize, path));
    }

    let out_header = ClassicHeader::new(signature_size, total_row_size, num_hashes, file_names)?;
    let out = File::create(out_file).map_err(|e| BisqueError::io(out_file, "create", e))?;
    let mut writer = BufWriter::new(out);
    out_header
        .write_to(&mut writer)
        .map_err(|e| BisqueError::io(out_file, "write header", e))?;

    // Inputs are row-major, so walking rows keeps every reader sequential.
    let mut row = vec![0u8; total_row_size as usize];
    for _ in 0..signature_size {
        let mut pos = 0usize;
        t.active("read");
        for (reader, width, path) in inputs.iter_mut() {
            reader
                .read_exact(&mut row[pos..pos + *width])
                .map_err(|e| BisqueError::io(path.as_path(), "read row", e))?;
            pos += *width;
        }
        t.active("write");
        writer
            .write_all(&row)
            .map_err(|e| BisqueError::io(out_file, "write row", e))?;
    }
    writer
        .flush()
        .map_err(|e| BisqueError::io(out_file, "write row", e))?;
    t.stop();
    Ok(())
}

/// Combine every `.bqx` file under `in_dir` into a single index file.
///
/// Runs passes of group-of-`batch_size` concatenations (intermediate
/// generations in `pass_NN/` subdirectories of `out_dir`) until one file
/// remains, which ends up at `out_dir/index.bqx`.
pub fn combine_directory(
    in_dir: &Path,
    out_dir: &Path,
    batch_size: usize,
    t: &mut Timer,
) -> Result<PathBuf> {
    if batch_size < 2 {
        return Err(BisqueError::validation("combine batch size must be >= 2"));
    }
    fs::create_dir_all(out_dir).map_err(|e| BisqueError::io(out_dir, "create directory", e))?;

    let mut current = collect_files(in_dir, CLASSIC_EXT)?;
    if current.is_empty() {
        return Err(BisqueError::validation(format!(
            "no .{} files under {}",
            CLASSIC_EXT,
            in_dir.display()
        )));
    }

    let final_path = out_dir.join(format!("index.{}", CLASSIC_EXT));
    if current.len() == 1 {
        fs::copy(&current[0], &final_path)
            .map_err(|e| BisqueError::io(&final_path, "copy", e))?;
        return Ok(final_path);
    }

    let mut pass = 0u32;
    while current.len() > 1 {
        pass += 1;
        let pass_dir = out_dir.join(format!("pass_{:02}", pass));
        fs::create_dir_all(&pass_dir)
            .map_err(|e| BisqueError::io(&pass_dir, "create directory", e))?;
        log::info!("combine pass {}: {} inputs", pass, current.len());

        let mut next = Vec::new();
        for (i, group) in current.chunks(batch_size).enumerate() {
            let out_file = pass_dir.join(format!("combined_{:05}.{}", i, CLASSIC_EXT));
            combine_group(group, &out_file, t)?;
            next.push(out_file);
        }
        current = next;
    }

    fs::rename(&current[0], &final_path).map_err(|e| BisqueError::io(&final_path, "rename", e))?;
    Ok(final_path)
}
