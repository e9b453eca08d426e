//! Tests for WAL Reader
//!
//! These tests verify:
//! - Reading entries written by the writer
//! - Iterator interface
//! - Torn tails (partial header, partial data) end reading cleanly
//! - Corrupted complete records surface as errors

use std::fs::{self, File};
use std::path::PathBuf;

use pagebench::config::WalSyncStrategy;
use pagebench::wal::{WalEntry, WalReader, WalWriter, HEADER_SIZE};
use pagebench::PageBenchError;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_wal() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let wal_path = temp_dir.path().join("test.wal");
    (temp_dir, wal_path)
}

fn write_entries(path: &PathBuf, count: u64) {
    let mut writer = WalWriter::open(path, WalSyncStrategy::EveryWrite).unwrap();
    for i in 0..count {
        writer.append(&i.to_le_bytes(), &[i as u8; 32]).unwrap();
    }
}

// =============================================================================
// Basic Reading Tests
// =============================================================================

#[test]
fn test_read_empty_file() {
    let (_temp, wal_path) = setup_temp_wal();
    File::create(&wal_path).unwrap();

    let mut reader = WalReader::open(&wal_path).unwrap();
    assert!(reader.next_entry().unwrap().is_none());
    assert!(!reader.has_torn_tail());
}

#[test]
fn test_read_multiple_entries() {
    let (_temp, wal_path) = setup_temp_wal();
    write_entries(&wal_path, 5);

    let mut reader = WalReader::open(&wal_path).unwrap();
    for i in 0..5u64 {
        let entry = reader.next_entry().unwrap().unwrap();
        assert_eq!(entry.lsn, i + 1);
        assert_eq!(entry.key, i.to_le_bytes().to_vec());
        assert_eq!(entry.value, vec![i as u8; 32]);
    }
    assert!(reader.next_entry().unwrap().is_none());
    assert_eq!(reader.position(), fs::metadata(&wal_path).unwrap().len());
}

#[test]
fn test_iterator_collects_all() {
    let (_temp, wal_path) = setup_temp_wal();
    write_entries(&wal_path, 10);

    let reader = WalReader::open(&wal_path).unwrap();
    let lsns: Vec<u64> = reader.entries().map(|e| e.unwrap().lsn).collect();

    assert_eq!(lsns, (1..=10).collect::<Vec<_>>());
}

// =============================================================================
// Torn Tail Tests
// =============================================================================

#[test]
fn test_partial_header() {
    let (_temp, wal_path) = setup_temp_wal();
    write_entries(&wal_path, 1);

    let mut bytes = fs::read(&wal_path).unwrap();
    bytes.extend_from_slice(&[1, 2, 3]);
    fs::write(&wal_path, &bytes).unwrap();

    let mut reader = WalReader::open(&wal_path).unwrap();
    assert!(reader.next_entry().unwrap().is_some());
    assert!(reader.next_entry().unwrap().is_none());
    assert!(reader.has_torn_tail());
}

#[test]
fn test_partial_data() {
    let (_temp, wal_path) = setup_temp_wal();

    let first = WalEntry::new(1, b"a".to_vec(), b"1".to_vec()).serialize().unwrap();
    let mut second = WalEntry::new(2, b"b".to_vec(), b"2".to_vec()).serialize().unwrap();
    second.truncate(HEADER_SIZE + 4);

    let mut bytes = first.clone();
    bytes.extend_from_slice(&second);
    fs::write(&wal_path, &bytes).unwrap();

    let mut reader = WalReader::open(&wal_path).unwrap();
    assert!(reader.next_entry().unwrap().is_some());
    assert!(reader.next_entry().unwrap().is_none());
    assert!(reader.has_torn_tail());
    assert_eq!(reader.position(), first.len() as u64);
}

// =============================================================================
// Corruption Tests
// =============================================================================

#[test]
fn test_corrupted_record_is_error() {
    let (_temp, wal_path) = setup_temp_wal();
    write_entries(&wal_path, 2);

    let mut bytes = fs::read(&wal_path).unwrap();
    let last = bytes.len() - 1;
    bytes[last] ^= 0xFF;
    fs::write(&wal_path, &bytes).unwrap();

    let mut reader = WalReader::open(&wal_path).unwrap();
    assert!(reader.next_entry().unwrap().is_some());
    assert!(matches!(
        reader.next_entry(),
        Err(PageBenchError::WalCorruption(_))
    ));
    // Reading stops after the corrupt record
    assert!(reader.next_entry().unwrap().is_none());
}
