//! WAL Entry definitions
//!
//! Defines the structure of individual WAL log entries and their framing.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};

use crate::error::{PageBenchError, Result};

/// Frame header size: LSN (8) + CRC (4) + Len (4)
pub const HEADER_SIZE: usize = 16;

/// Upper bound on a single payload; larger lengths are treated as corruption
pub const MAX_PAYLOAD_SIZE: usize = 64 * 1024 * 1024;

/// A single put recorded in the WAL
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WalEntry {
    /// Log Sequence Number - monotonically increasing
    pub lsn: u64,

    pub key: Vec<u8>,

    pub value: Vec<u8>,

    /// Timestamp (unix millis) when entry was created
    pub timestamp: u64,
}

impl WalEntry {
    /// Create an entry stamped with the current time
    pub fn new(lsn: u64, key: Vec<u8>, value: Vec<u8>) -> Self {
        let timestamp = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);

        Self {
            lsn,
            key,
            value,
            timestamp,
        }
    }

    /// Encode as a framed record: `[LSN][CRC][Len][Data]`
    pub fn serialize(&self) -> Result<Vec<u8>> {
        let payload = bincode::serialize(self)
            .map_err(|e| PageBenchError::Serialization(e.to_string()))?;

        if payload.len() > MAX_PAYLOAD_SIZE {
            return Err(PageBenchError::Serialization(format!(
                "WAL entry of {} bytes exceeds limit",
                payload.len()
            )));
        }

        let len = payload.len() as u32;
        let crc = Self::compute_crc(self.lsn, len, &payload);

        let mut bytes = Vec::with_capacity(HEADER_SIZE + payload.len());
        bytes.extend_from_slice(&self.lsn.to_le_bytes());
        bytes.extend_from_slice(&crc.to_le_bytes());
        bytes.extend_from_slice(&len.to_le_bytes());
        bytes.extend_from_slice(&payload);
        Ok(bytes)
    }

    /// Decode one framed record from the start of `bytes`
    pub fn deserialize(bytes: &[u8]) -> Result<Self> {
        let (lsn, crc, len) = Self::parse_header(bytes)?;

        let end = HEADER_SIZE + len as usize;
        if bytes.len() < end {
            return Err(PageBenchError::WalCorruption(format!(
                "truncated entry: need {} bytes, have {}",
                end,
                bytes.len()
            )));
        }

        Self::decode_payload(lsn, crc, len, &bytes[HEADER_SIZE..end])
    }

    /// Split a frame header into (lsn, crc, len)
    pub(super) fn parse_header(bytes: &[u8]) -> Result<(u64, u32, u32)> {
        if bytes.len() < HEADER_SIZE {
            return Err(PageBenchError::WalCorruption(format!(
                "header too small: {} bytes",
                bytes.len()
            )));
        }

        let lsn = u64::from_le_bytes(bytes[0..8].try_into().unwrap());
        let crc = u32::from_le_bytes(bytes[8..12].try_into().unwrap());
        let len = u32::from_le_bytes(bytes[12..16].try_into().unwrap());

        if len as usize > MAX_PAYLOAD_SIZE {
            return Err(PageBenchError::WalCorruption(format!(
                "implausible payload length {}",
                len
            )));
        }

        Ok((lsn, crc, len))
    }

    /// Verify the checksum and decode a payload
    pub(super) fn decode_payload(lsn: u64, crc: u32, len: u32, payload: &[u8]) -> Result<Self> {
        let actual = Self::compute_crc(lsn, len, payload);
        if actual != crc {
            return Err(PageBenchError::WalCorruption(format!(
                "CRC mismatch at lsn {}: stored {:#010x}, computed {:#010x}",
                lsn, crc, actual
            )));
        }

        let entry: WalEntry = bincode::deserialize(payload)
            .map_err(|e| PageBenchError::WalCorruption(format!("undecodable payload: {}", e)))?;

        if entry.lsn != lsn {
            return Err(PageBenchError::WalCorruption(format!(
                "LSN mismatch: header {}, payload {}",
                lsn, entry.lsn
            )));
        }

        Ok(entry)
    }

    /// Checksum over the LSN, length and payload
    pub fn compute_crc(lsn: u64, len: u32, payload: &[u8]) -> u32 {
        let mut hasher = crc32fast::Hasher::new();
        hasher.update(&lsn.to_le_bytes());
        hasher.update(&len.to_le_bytes());
        hasher.update(payload);
        hasher.finalize()
    }
}
