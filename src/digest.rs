//! Digest Engine
//!
//! SHA-256 fingerprints of page contents.

use std::fmt;

use sha2::{Digest, Sha256};

/// Length of a page digest in bytes
pub const DIGEST_SIZE: usize = 32;

/// A 32-byte SHA-256 fingerprint of one page
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct PageDigest([u8; DIGEST_SIZE]);

impl PageDigest {
    /// Raw digest bytes
    pub fn as_bytes(&self) -> &[u8; DIGEST_SIZE] {
        &self.0
    }

    /// Rebuild a digest from stored bytes; `None` unless exactly 32 bytes
    pub fn from_slice(bytes: &[u8]) -> Option<Self> {
        let arr: [u8; DIGEST_SIZE] = bytes.try_into().ok()?;
        Some(Self(arr))
    }
}

impl fmt::Display for PageDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.0 {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

/// Hash a buffer. Accepts any length, including empty.
pub fn digest(bytes: &[u8]) -> PageDigest {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    PageDigest(hasher.finalize().into())
}
