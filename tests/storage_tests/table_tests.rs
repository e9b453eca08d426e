//! Tests for table files
//!
//! These tests verify:
//! - Build then read back via point lookups and iteration
//! - Key ordering enforcement in the builder
//! - Header, checksum and magic validation on open

use std::fs;
use std::path::PathBuf;

use pagebench::storage::{TableBuilder, TableReader};
use pagebench::PageBenchError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_table() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("table_000001.tbl");
    (temp_dir, path)
}

fn build_table(path: &PathBuf, count: u8) {
    let mut builder = TableBuilder::new(path).unwrap();
    for i in 0..count {
        builder.add(&[i], &[i; 32]).unwrap();
    }
    builder.finish().unwrap();
}

// =============================================================================
// Build and Read Tests
// =============================================================================

#[test]
fn test_build_reports_metadata() {
    let (_temp, path) = setup_temp_table();

    let mut builder = TableBuilder::new(&path).unwrap();
    builder.add(b"a", b"1").unwrap();
    builder.add(b"b", b"2").unwrap();
    let info = builder.finish().unwrap();

    assert_eq!(info.entry_count, 2);
    assert_eq!(info.file_size, fs::metadata(&path).unwrap().len());
}

#[test]
fn test_point_lookups() {
    let (_temp, path) = setup_temp_table();
    build_table(&path, 10);

    let mut reader = TableReader::open(&path).unwrap();

    assert_eq!(reader.entry_count(), 10);
    for i in 0..10u8 {
        assert_eq!(reader.get(&[i]).unwrap(), Some(vec![i; 32]));
    }
    assert_eq!(reader.get(&[200]).unwrap(), None);
}

#[test]
fn test_might_contain_range() {
    let (_temp, path) = setup_temp_table();
    build_table(&path, 5);

    let reader = TableReader::open(&path).unwrap();

    assert!(reader.might_contain(&[0]));
    assert!(reader.might_contain(&[4]));
    assert!(!reader.might_contain(&[5]));
}

#[test]
fn test_iteration_in_key_order() {
    let (_temp, path) = setup_temp_table();
    build_table(&path, 4);

    let mut reader = TableReader::open(&path).unwrap();
    let entries: Vec<_> = reader.iter().unwrap().map(|e| e.unwrap()).collect();

    assert_eq!(entries.len(), 4);
    for (i, (key, value)) in entries.iter().enumerate() {
        assert_eq!(key, &vec![i as u8]);
        assert_eq!(value, &vec![i as u8; 32]);
    }
}

#[test]
fn test_empty_table() {
    let (_temp, path) = setup_temp_table();
    TableBuilder::new(&path).unwrap().finish().unwrap();

    let mut reader = TableReader::open(&path).unwrap();

    assert_eq!(reader.entry_count(), 0);
    assert_eq!(reader.get(b"x").unwrap(), None);
    assert_eq!(reader.iter().unwrap().count(), 0);
}

// =============================================================================
// Validation Tests
// =============================================================================

#[test]
fn test_out_of_order_keys_rejected() {
    let (_temp, path) = setup_temp_table();

    let mut builder = TableBuilder::new(&path).unwrap();
    builder.add(b"b", b"1").unwrap();

    assert!(matches!(
        builder.add(b"a", b"2"),
        Err(PageBenchError::Storage(_))
    ));
    assert!(builder.add(b"b", b"3").is_err());
}

#[test]
fn test_bad_magic_rejected() {
    let (_temp, path) = setup_temp_table();
    build_table(&path, 2);

    let mut bytes = fs::read(&path).unwrap();
    bytes[0] = b'X';
    fs::write(&path, &bytes).unwrap();

    assert!(matches!(
        TableReader::open(&path),
        Err(PageBenchError::Storage(_))
    ));
}

#[test]
fn test_data_corruption_rejected() {
    let (_temp, path) = setup_temp_table();
    build_table(&path, 2);

    // First value byte sits after header (14) + lengths (8) + key (1)
    let mut bytes = fs::read(&path).unwrap();
    bytes[14 + 8 + 1] ^= 0xFF;
    fs::write(&path, &bytes).unwrap();

    assert!(matches!(
        TableReader::open(&path),
        Err(PageBenchError::Storage(_))
    ));
}

#[test]
fn test_too_short_file_rejected() {
    let (_temp, path) = setup_temp_table();
    fs::write(&path, b"PGBT").unwrap();

    assert!(TableReader::open(&path).is_err());
}
