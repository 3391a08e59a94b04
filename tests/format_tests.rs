//! On-disk format validation: corrupted and inconsistent files must fail
//! loudly, with the right error kind, before any query runs.

use std::fs;
use std::path::{Path, PathBuf};

use bisque::{
    build_batch, scan_kmers, AccessMode, BisqueError, ClassicParams, ClassicSearch, Sample,
    SearchFile, Timer,
};
use tempfile::tempdir;

fn build_index(dir: &Path) -> PathBuf {
    let seq: Vec<u8> = b"ACGTGGTCA".iter().copied().cycle().take(64).collect();
    let sample_path = dir.join("s0.bqs");
    Sample::new("s0", scan_kmers(&seq).kmers)
        .save(&sample_path)
        .unwrap();

    let index = dir.join("index.bqx");
    let mut t = Timer::new();
    build_batch(
        &[sample_path],
        &index,
        ClassicParams::new(256, 2, 3).unwrap(),
        &mut t,
    )
    .unwrap();
    index
}

#[test]
fn file_size_equals_header_plus_body() {
    let dir = tempdir().unwrap();
    let index = build_index(dir.path());

    let file = SearchFile::open(&index, AccessMode::Stream).unwrap();
    let header = file.header();
    assert_eq!(
        fs::metadata(&index).unwrap().len(),
        header.serialized_len() + header.body_bytes()
    );
}

#[test]
fn corrupted_magic_is_a_format_error() {
    let dir = tempdir().unwrap();
    let index = build_index(dir.path());

    let mut bytes = fs::read(&index).unwrap();
    bytes[0] ^= 0x01;
    fs::write(&index, bytes).unwrap();

    match ClassicSearch::open_single(&index, AccessMode::Mmap) {
        Err(BisqueError::Format { detail, path }) => {
            assert!(detail.contains("magic"));
            assert_eq!(path, index);
        }
        other => panic!("expected format error, got {:?}", other.err()),
    }
}

#[test]
fn declared_body_longer_than_file_is_truncation() {
    let dir = tempdir().unwrap();
    let index = build_index(dir.path());

    let bytes = fs::read(&index).unwrap();
    fs::write(&index, &bytes[..bytes.len() - 37]).unwrap();

    match ClassicSearch::open_single(&index, AccessMode::Stream) {
        Err(BisqueError::Truncated {
            expected, found, ..
        }) => {
            assert_eq!(expected, 512);
            assert_eq!(found, 512 - 37);
        }
        other => panic!("expected truncated error, got {:?}", other.err()),
    }
}

#[test]
fn oversized_file_is_rejected_too() {
    let dir = tempdir().unwrap();
    let index = build_index(dir.path());

    let mut bytes = fs::read(&index).unwrap();
    bytes.extend_from_slice(&[0u8; 16]);
    fs::write(&index, bytes).unwrap();

    assert!(matches!(
        ClassicSearch::open_single(&index, AccessMode::Mmap),
        Err(BisqueError::Truncated { .. })
    ));
}

#[test]
fn unsupported_version_is_a_format_error() {
    let dir = tempdir().unwrap();
    let index = build_index(dir.path());

    let mut bytes = fs::read(&index).unwrap();
    bytes[8..12].copy_from_slice(&7u32.to_le_bytes());
    fs::write(&index, bytes).unwrap();

    match ClassicSearch::open_single(&index, AccessMode::Mmap) {
        Err(BisqueError::Format { detail, .. }) => assert!(detail.contains("version")),
        other => panic!("expected format error, got {:?}", other.err()),
    }
}

#[test]
fn sample_store_bad_magic_is_a_format_error() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("s.bqs");
    fs::write(&path, b"WRONGMAG\x01\x00\x00\x00").unwrap();
    assert!(matches!(
        Sample::load(&path),
        Err(BisqueError::Format { .. })
    ));
}
