//! Unit tests for format.rs

use super::*;
use std::io::Cursor;

fn sample_table() -> FileTable {
    FileTable::build(vec![
        (Guid(10), ResourceType::Binary, 4, 4),
        (Guid(20), ResourceType::Model, 300, 120),
        (Guid(30), ResourceType::Binary, 0, 0),
        (Guid(40), ResourceType::Texture, 64, 20),
    ])
    .unwrap()
}

fn encode(table: &FileTable) -> Vec<u8> {
    let mut bytes = Vec::new();
    table.write_to(&mut bytes).unwrap();
    bytes
}

// ============================================================================
// LAYOUT
// ============================================================================

#[test]
fn test_record_sizes() {
    let mut bytes = Vec::new();
    Metadata { filetable_size: 8, lut_size: 1, version: PACK_VERSION }
        .write_to(&mut bytes)
        .unwrap();
    assert_eq!(bytes.len(), METADATA_SIZE);

    bytes.clear();
    LutEntry::sentinel(0).write_to(&mut bytes).unwrap();
    assert_eq!(bytes.len(), LUT_ENTRY_SIZE);
}

#[test]
fn test_encoded_header_length_matches_header_len() {
    let table = sample_table();
    assert_eq!(encode(&table).len() as u64, table.header_len());
}

#[test]
fn test_metadata_counts_sentinel() {
    let table = sample_table();
    let meta = Metadata::for_table(&table);
    assert_eq!(meta.lut_size, 5);
    assert_eq!(meta.filetable_size, FILE_TABLE_HEADER_SIZE as u64);
    assert_eq!(meta.version, PACK_VERSION);
}

// ============================================================================
// BUILD
// ============================================================================

#[test]
fn test_offsets_are_running_sum() {
    let table = sample_table();
    let offsets: Vec<u64> = table.entries().iter().map(|e| e.offset).collect();
    assert_eq!(offsets, vec![0, 4, 124, 124, 144]);
    assert_eq!(table.total_stored(), 144);
    assert!(table.sentinel().unwrap().is_sentinel());
}

#[test]
fn test_offsets_are_monotonic() {
    let table = sample_table();
    for pair in table.entries().windows(2) {
        assert!(pair[0].offset <= pair[1].offset);
    }
}

#[test]
fn test_empty_table_has_only_sentinel() {
    let table = FileTable::build(Vec::new()).unwrap();
    assert_eq!(table.lut_size(), 1);
    assert_eq!(table.resource_count(), 0);
    assert_eq!(table.total_stored(), 0);
    assert_eq!(table.find(Guid::SENTINEL), None);
}

#[test]
fn test_find_and_chunk_len() {
    let table = sample_table();
    assert_eq!(table.find(Guid(20)), Some(1));
    assert_eq!(table.chunk_len(1), Some(120));
    assert_eq!(table.find(Guid(30)), Some(2));
    assert_eq!(table.chunk_len(2), Some(0));
    assert_eq!(table.find(Guid(99)), None);
    assert_eq!(table.find(Guid::SENTINEL), None);
    assert_eq!(table.chunk_len(4), None);
}

// ============================================================================
// READ BACK
// ============================================================================

#[test]
fn test_table_reads_back_identical() {
    let table = sample_table();
    let bytes = encode(&table);
    let read = FileTable::read_from(&mut Cursor::new(bytes)).unwrap();
    assert_eq!(read, table);
}

#[test]
fn test_version_mismatch_is_rejected() {
    let mut bytes = encode(&sample_table());
    bytes[16] = PACK_VERSION + 1;
    let err = FileTable::read_from(&mut Cursor::new(bytes)).unwrap_err();
    assert_eq!(err, Error::VersionMismatch { expected: PACK_VERSION, found: PACK_VERSION + 1 });
}

#[test]
fn test_truncated_table_is_io_error() {
    let bytes = encode(&sample_table());
    let truncated = bytes[..bytes.len() - 3].to_vec();
    let err = FileTable::read_from(&mut Cursor::new(truncated)).unwrap_err();
    assert!(matches!(err, Error::Io(_)));
}

#[test]
fn test_header_size_disagreement_is_corrupt() {
    let mut bytes = encode(&sample_table());
    // Table header lut_size lives right after the metadata
    bytes[METADATA_SIZE..METADATA_SIZE + 8].copy_from_slice(&9u64.to_ne_bytes());
    let err = FileTable::read_from(&mut Cursor::new(bytes)).unwrap_err();
    assert!(matches!(err, Error::CorruptPack(_)));
}

#[test]
fn test_unknown_type_tag_is_corrupt() {
    let mut bytes = encode(&sample_table());
    // Type tag of the first entry is its last four bytes
    let tag_at = METADATA_SIZE + FILE_TABLE_HEADER_SIZE + LUT_ENTRY_SIZE - 4;
    bytes[tag_at..tag_at + 4].copy_from_slice(&77i32.to_ne_bytes());
    let err = FileTable::read_from(&mut Cursor::new(bytes)).unwrap_err();
    assert!(matches!(err, Error::CorruptPack(_)));
}

#[test]
fn test_missing_sentinel_is_corrupt() {
    let mut bytes = encode(&sample_table());
    // Overwrite the sentinel GUID with an ordinary one
    let sentinel_at = METADATA_SIZE + FILE_TABLE_HEADER_SIZE + 4 * LUT_ENTRY_SIZE;
    bytes[sentinel_at..sentinel_at + 4].copy_from_slice(&5u32.to_ne_bytes());
    let err = FileTable::read_from(&mut Cursor::new(bytes)).unwrap_err();
    assert!(matches!(err, Error::CorruptPack(_)));
}

// ============================================================================
// OFFSET OVERFLOW
// ============================================================================

fn entry(guid: u32, offset: u64) -> LutEntry {
    LutEntry { guid: Guid(guid), offset, uncompressed_size: 4, resource_type: ResourceType::Binary }
}

#[test]
fn test_blob_region_past_offset_range_is_corrupt() {
    let table = FileTable::from_entries(vec![
        entry(5, u64::MAX - 8),
        LutEntry::sentinel(u64::MAX - 4),
    ]);
    assert!(matches!(table.validate(), Err(Error::CorruptPack(_))));
    assert_eq!(table.blob_start(0), None);
}

#[test]
fn test_overflowing_offsets_are_rejected_on_read() {
    let table = FileTable::from_entries(vec![
        entry(5, u64::MAX - 8),
        LutEntry::sentinel(u64::MAX - 4),
    ]);
    let bytes = encode(&table);
    let err = FileTable::read_from(&mut Cursor::new(bytes)).unwrap_err();
    assert!(matches!(err, Error::CorruptPack(_)));
}

#[test]
#[cfg(target_pointer_width = "64")]
fn test_build_rejects_overflowing_stored_sizes() {
    let err = FileTable::build(vec![
        (Guid(1), ResourceType::Binary, 0, usize::MAX),
        (Guid(2), ResourceType::Binary, 0, usize::MAX),
    ])
    .unwrap_err();
    assert!(matches!(err, Error::CorruptPack(_)));

    // Running sum fits but the header pushes the region past the range
    let err = FileTable::build(vec![(Guid(1), ResourceType::Binary, 0, usize::MAX)]).unwrap_err();
    assert!(matches!(err, Error::CorruptPack(_)));
}

#[test]
fn test_blob_start_follows_header() {
    let table = sample_table();
    assert_eq!(table.blob_start(0), Some(table.header_len()));
    assert_eq!(table.blob_start(1), Some(table.header_len() + 4));
    assert_eq!(table.blob_start(9), None);
}
