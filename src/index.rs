//! Index Store Adapter
//!
//! Associates page indexes with page digests in the store.
//!
//! Record layout: key = page index as 8 little-endian bytes, value = the
//! 32 raw digest bytes. Nothing else is written.
//!
//! Every failure is reported at the store boundary: `StoreOpen` while
//! opening, `StoreWrite` for a put or close. Both are fatal for a run.

use crate::config::StoreConfig;
use crate::digest::PageDigest;
use crate::error::{PageBenchError, Result};
use crate::store::Store;

/// Encoded key length
pub const KEY_SIZE: usize = 8;

/// Encode a page index as a store key
pub fn encode_key(index: u64) -> [u8; KEY_SIZE] {
    index.to_le_bytes()
}

/// Decode a store key; `None` unless exactly 8 bytes
pub fn decode_key(key: &[u8]) -> Option<u64> {
    let bytes: [u8; KEY_SIZE] = key.try_into().ok()?;
    Some(u64::from_le_bytes(bytes))
}

/// Owns the store handle for the length of a run
pub struct PageIndex {
    store: Store,
}

impl PageIndex {
    /// Open the store behind the index
    pub fn open(config: &StoreConfig) -> Result<Self> {
        let store = Store::open(config.clone()).map_err(|e| {
            PageBenchError::StoreOpen(format!("{}: {}", config.data_dir.display(), e))
        })?;
        Ok(Self { store })
    }

    /// Wrap an already-open store
    pub fn from_store(store: Store) -> Self {
        Self { store }
    }

    /// Durably associate `index` with `digest`
    pub fn put_page_digest(&self, index: u64, digest: &PageDigest) -> Result<()> {
        self.store
            .put(&encode_key(index), digest.as_bytes())
            .map_err(|e| PageBenchError::StoreWrite(format!("page {}: {}", index, e)))
    }

    /// Digest stored for `index`, if any
    pub fn digest_at(&self, index: u64) -> Result<Option<PageDigest>> {
        let value = match self.store.get(&encode_key(index))? {
            Some(v) => v,
            None => return Ok(None),
        };

        PageDigest::from_slice(&value).map(Some).ok_or_else(|| {
            PageBenchError::Storage(format!(
                "page {} holds a {}-byte value, not a digest",
                index,
                value.len()
            ))
        })
    }

    /// Flush and release the store
    pub fn close(self) -> Result<()> {
        self.store
            .close()
            .map_err(|e| PageBenchError::StoreWrite(format!("close: {}", e)))
    }

    /// The underlying store
    pub fn store(&self) -> &Store {
        &self.store
    }
}
