//! Unit tests for codec.rs

use super::*;

fn repetitive(len: usize) -> Vec<u8> {
    (0..len).map(|i| (i % 7) as u8).collect()
}

#[test]
fn test_empty_block_stays_empty() {
    let stored = compress_block(&[], 9).unwrap();
    assert!(stored.is_empty());
    assert_eq!(decompress_block(&stored, 0, true).unwrap(), Vec::<u8>::new());
}

#[test]
fn test_repetitive_data_shrinks() {
    let raw = repetitive(4096);
    let stored = compress_block(&raw, 9).unwrap();
    assert!(stored.len() < raw.len());
    assert_eq!(decompress_block(&stored, raw.len(), true).unwrap(), raw);
}

#[test]
fn test_incompressible_data_is_stored_raw() {
    // Too short for LZ4 to gain anything
    let raw = vec![0x2a, 0x00, 0x00, 0x00];
    let stored = compress_block(&raw, 9).unwrap();
    assert_eq!(stored, raw);
    assert_eq!(decompress_block(&stored, raw.len(), true).unwrap(), raw);
}

#[test]
fn test_strict_size_mismatch_is_error() {
    let raw = repetitive(1024);
    let stored = compress_block(&raw, 9).unwrap();
    let err = decompress_block(&stored, raw.len() + 16, true).unwrap_err();
    assert_eq!(err, Error::SizeMismatch { expected: raw.len() + 16, actual: raw.len() });
}

#[test]
fn test_lenient_size_mismatch_returns_buffer() {
    let raw = repetitive(1024);
    let stored = compress_block(&raw, 9).unwrap();
    let decoded = decompress_block(&stored, raw.len() + 16, false).unwrap();
    assert_eq!(decoded, raw);
}

#[test]
fn test_garbage_fails_to_decode() {
    let garbage = vec![0xffu8; 8];
    assert!(decompress_block(&garbage, 64, true).is_err());
}
