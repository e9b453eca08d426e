//! Tests for WAL Writer
//!
//! These tests verify:
//! - Writing entries to WAL
//! - LSN generation and sequencing
//! - Sync strategies (EveryWrite, EveryNEntries)
//! - Truncation

use std::path::PathBuf;

use pagebench::config::WalSyncStrategy;
use pagebench::wal::{WalReader, WalWriter};
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

fn setup_temp_wal() -> (TempDir, PathBuf) {
    let temp_dir = TempDir::new().unwrap();
    let wal_path = temp_dir.path().join("test.wal");
    (temp_dir, wal_path)
}

fn read_all(path: &PathBuf) -> Vec<(u64, Vec<u8>, Vec<u8>)> {
    WalReader::open(path)
        .unwrap()
        .entries()
        .map(|e| {
            let e = e.unwrap();
            (e.lsn, e.key, e.value)
        })
        .collect()
}

// =============================================================================
// Basic Writing Tests
// =============================================================================

#[test]
fn test_write_single_entry() {
    let (_temp, wal_path) = setup_temp_wal();

    let mut writer = WalWriter::open(&wal_path, WalSyncStrategy::EveryWrite).unwrap();
    let lsn = writer.append(b"key1", b"value1").unwrap();

    assert_eq!(lsn, 1);
    assert_eq!(writer.current_lsn(), 2);
}

#[test]
fn test_lsn_sequential() {
    let (_temp, wal_path) = setup_temp_wal();

    let mut writer = WalWriter::open(&wal_path, WalSyncStrategy::EveryWrite).unwrap();

    for i in 0..100u64 {
        let lsn = writer.append(&i.to_le_bytes(), &[i as u8; 32]).unwrap();
        assert_eq!(lsn, i + 1);
    }
}

#[test]
fn test_written_entries_are_readable() {
    let (_temp, wal_path) = setup_temp_wal();

    {
        let mut writer = WalWriter::open(&wal_path, WalSyncStrategy::EveryWrite).unwrap();
        writer.append(b"a", b"1").unwrap();
        writer.append(b"b", b"2").unwrap();
    }

    let entries = read_all(&wal_path);
    assert_eq!(
        entries,
        vec![
            (1, b"a".to_vec(), b"1".to_vec()),
            (2, b"b".to_vec(), b"2".to_vec()),
        ]
    );
}

#[test]
fn test_reopen_continues_lsn() {
    let (_temp, wal_path) = setup_temp_wal();

    {
        let mut writer = WalWriter::open(&wal_path, WalSyncStrategy::EveryWrite).unwrap();
        writer.append(b"a", b"1").unwrap();
        writer.append(b"b", b"2").unwrap();
    }

    let mut writer = WalWriter::open(&wal_path, WalSyncStrategy::EveryWrite).unwrap();
    assert_eq!(writer.current_lsn(), 3);
    assert_eq!(writer.append(b"c", b"3").unwrap(), 3);

    assert_eq!(read_all(&wal_path).len(), 3);
}

#[test]
fn test_reopen_stops_lsn_scan_at_corruption() {
    let (_temp, wal_path) = setup_temp_wal();

    {
        let mut writer = WalWriter::open(&wal_path, WalSyncStrategy::EveryWrite).unwrap();
        writer.append(b"k1", b"v1").unwrap();
        writer.append(b"k2", b"v2").unwrap();
        writer.append(b"k3", b"v3").unwrap();
    }

    // Flip a payload byte of the third record
    let mut bytes = std::fs::read(&wal_path).unwrap();
    let record_len = bytes.len() / 3;
    bytes[2 * record_len + 20] ^= 0xFF;
    std::fs::write(&wal_path, &bytes).unwrap();

    let writer = WalWriter::open(&wal_path, WalSyncStrategy::EveryWrite).unwrap();
    assert_eq!(writer.current_lsn(), 3);
}

// =============================================================================
// Sync Strategy Tests
// =============================================================================

#[test]
fn test_every_write_leaves_nothing_unsynced() {
    let (_temp, wal_path) = setup_temp_wal();

    let mut writer = WalWriter::open(&wal_path, WalSyncStrategy::EveryWrite).unwrap();
    writer.append(b"a", b"1").unwrap();

    assert_eq!(writer.unsynced(), 0);
}

#[test]
fn test_every_n_entries_batches_syncs() {
    let (_temp, wal_path) = setup_temp_wal();

    let mut writer =
        WalWriter::open(&wal_path, WalSyncStrategy::EveryNEntries { count: 3 }).unwrap();

    writer.append(b"a", b"1").unwrap();
    writer.append(b"b", b"2").unwrap();
    assert_eq!(writer.unsynced(), 2);

    writer.append(b"c", b"3").unwrap();
    assert_eq!(writer.unsynced(), 0);

    writer.append(b"d", b"4").unwrap();
    writer.sync().unwrap();
    assert_eq!(writer.unsynced(), 0);
}

// =============================================================================
// Truncation Tests
// =============================================================================

#[test]
fn test_truncate_empties_file_and_keeps_lsn() {
    let (_temp, wal_path) = setup_temp_wal();

    let mut writer = WalWriter::open(&wal_path, WalSyncStrategy::EveryWrite).unwrap();
    writer.append(b"a", b"1").unwrap();
    writer.append(b"b", b"2").unwrap();

    writer.truncate().unwrap();
    assert_eq!(std::fs::metadata(&wal_path).unwrap().len(), 0);

    let lsn = writer.append(b"c", b"3").unwrap();
    assert_eq!(lsn, 3);

    let entries = read_all(&wal_path);
    assert_eq!(entries, vec![(3, b"c".to_vec(), b"3".to_vec())]);
}
