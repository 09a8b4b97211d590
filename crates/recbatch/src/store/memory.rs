//! In-memory record store, mainly for tests and small datasets.

use std::collections::HashMap;
use std::io;

use super::{Record, RecordStore};
use crate::error::{Error, Result};

/// Holds every record in a map; key order is insertion order.
pub struct InMemoryStore {
    keys: Vec<u64>,
    records: HashMap<u64, Record>,
}

impl InMemoryStore {
    /// Builds a store from `(key, label, payload)` triples.
    pub fn new(entries: Vec<(u64, f32, Vec<u8>)>) -> Self {
        let mut keys = Vec::with_capacity(entries.len());
        let mut records = HashMap::with_capacity(entries.len());
        for (key, label, payload) in entries {
            keys.push(key);
            records.insert(key, Record { label, payload });
        }
        Self { keys, records }
    }
}

impl RecordStore for InMemoryStore {
    fn keys(&self) -> &[u64] {
        &self.keys
    }

    fn read(&self, key: u64) -> Result<Record> {
        self.records.get(&key).cloned().ok_or_else(|| Error::StoreRead {
            key,
            source: io::Error::new(io::ErrorKind::NotFound, "key not in store"),
        })
    }
}
