//! Indexed record stores: integer key → (label, compressed image payload).
//!
//! The iterator only needs three things from a store: the ordered key list,
//! O(1) lookup of a record by key, and the record count. Anything providing
//! those through [`RecordStore`] plugs in; the crate ships a file-backed
//! implementation ([`IndexedRecordFile`]) and an in-memory one
//! ([`InMemoryStore`]).

pub mod indexed_file;
pub mod memory;

pub use indexed_file::{IndexedRecordFile, IndexedRecordWriter};
pub use memory::InMemoryStore;

use crate::error::Result;

/// One entry of a record store.
#[derive(Debug, Clone)]
pub struct Record {
    /// Scalar class label.
    pub label: f32,
    /// Compressed image bytes (JPEG, PNG, ...).
    pub payload: Vec<u8>,
}

/// Read-only indexed access to encoded image records.
///
/// Implementations must support concurrent reads through `&self`; the
/// iterator copies the key list at construction and never writes back.
pub trait RecordStore: Send + Sync {
    /// Keys in index order, fixed at load time.
    fn keys(&self) -> &[u64];

    /// Reads the record stored under `key`.
    fn read(&self, key: u64) -> Result<Record>;

    /// Number of records.
    fn len(&self) -> usize {
        self.keys().len()
    }

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
