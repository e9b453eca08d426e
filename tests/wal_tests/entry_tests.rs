//! Tests for WAL Entry serialization and deserialization
//!
//! These tests verify:
//! - Round-trip serialization
//! - CRC32 corruption detection
//! - Edge cases (truncation, malformed data, large values)

use pagebench::wal::{WalEntry, HEADER_SIZE, MAX_PAYLOAD_SIZE};
use pagebench::PageBenchError;

// =============================================================================
// Serialization Round-Trip Tests
// =============================================================================

#[test]
fn test_serialize_deserialize_page_record() {
    let entry = WalEntry::new(1, 7u64.to_le_bytes().to_vec(), vec![0xAB; 32]);

    let bytes = entry.serialize().unwrap();
    let recovered = WalEntry::deserialize(&bytes).unwrap();

    assert_eq!(entry, recovered);
}

#[test]
fn test_serialize_deserialize_empty_value() {
    let entry = WalEntry::new(101, b"key_with_empty_value".to_vec(), vec![]);

    let bytes = entry.serialize().unwrap();
    let recovered = WalEntry::deserialize(&bytes).unwrap();

    assert_eq!(entry, recovered);
}

#[test]
fn test_header_carries_lsn_and_length() {
    let entry = WalEntry::new(42, b"k".to_vec(), b"v".to_vec());
    let bytes = entry.serialize().unwrap();

    let lsn = u64::from_le_bytes(bytes[0..8].try_into().unwrap());
    let len = u32::from_le_bytes(bytes[12..16].try_into().unwrap()) as usize;

    assert_eq!(lsn, 42);
    assert_eq!(bytes.len(), HEADER_SIZE + len);
}

// =============================================================================
// CRC Corruption Detection Tests
// =============================================================================

#[test]
fn test_crc_corruption_detected() {
    let entry = WalEntry::new(1, b"key".to_vec(), b"value".to_vec());
    let mut bytes = entry.serialize().unwrap();

    if let Some(byte) = bytes.last_mut() {
        *byte ^= 0xFF;
    }

    let result = WalEntry::deserialize(&bytes);
    assert!(matches!(result, Err(PageBenchError::WalCorruption(_))));
}

#[test]
fn test_crc_corruption_in_header_detected() {
    let entry = WalEntry::new(1, b"key".to_vec(), b"value".to_vec());
    let mut bytes = entry.serialize().unwrap();

    // CRC bytes live at 8..12
    bytes[8] ^= 0xFF;

    assert!(WalEntry::deserialize(&bytes).is_err());
}

#[test]
fn test_lsn_corruption_detected() {
    let entry = WalEntry::new(5, b"key".to_vec(), b"value".to_vec());
    let mut bytes = entry.serialize().unwrap();

    bytes[0] ^= 0x01;

    assert!(matches!(
        WalEntry::deserialize(&bytes),
        Err(PageBenchError::WalCorruption(_))
    ));
}

// =============================================================================
// Edge Case Tests
// =============================================================================

#[test]
fn test_truncated_entry() {
    let entry = WalEntry::new(1, b"key".to_vec(), b"value".to_vec());
    let bytes = entry.serialize().unwrap();

    let result = WalEntry::deserialize(&bytes[..HEADER_SIZE + 2]);
    assert!(matches!(result, Err(PageBenchError::WalCorruption(_))));
}

#[test]
fn test_header_too_small() {
    let result = WalEntry::deserialize(&[0u8; HEADER_SIZE - 1]);
    assert!(matches!(result, Err(PageBenchError::WalCorruption(_))));
}

#[test]
fn test_empty_buffer() {
    assert!(WalEntry::deserialize(&[]).is_err());
}

#[test]
fn test_implausible_length_rejected() {
    let mut bytes = vec![0u8; HEADER_SIZE];
    bytes[12..16].copy_from_slice(&((MAX_PAYLOAD_SIZE as u32) + 1).to_le_bytes());

    assert!(matches!(
        WalEntry::deserialize(&bytes),
        Err(PageBenchError::WalCorruption(_))
    ));
}

#[test]
fn test_compute_crc_consistency() {
    let a = WalEntry::compute_crc(1, 3, b"abc");
    let b = WalEntry::compute_crc(1, 3, b"abc");
    let c = WalEntry::compute_crc(2, 3, b"abc");

    assert_eq!(a, b);
    assert_ne!(a, c);
}
