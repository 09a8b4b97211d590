//! File-backed indexed record store.
//!
//! A store is a `<prefix>.idx` / `<prefix>.rec` pair:
//!
//! ```text
//! <prefix>.idx   one line per record: "<key>\t<byte offset into .rec>"
//! <prefix>.rec   at each offset (all integers little-endian):
//!                magic(u32 = 0x52454342 "RECB") | label(f32) |
//!                payload_len(u32) | payload bytes
//! ```
//!
//! The `.rec` file is read fully into memory at open time, so lookups are a
//! slice index and concurrent reads through `&self` are safe. This is not a
//! bit-compatible reader for any external container format; use
//! [`IndexedRecordWriter`] to produce stores.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};

use super::{Record, RecordStore};
use crate::error::{Error, Result};

const RECORD_MAGIC: u32 = 0x5245_4342; // "RECB"
const HEADER_LEN: usize = 12; // magic + label + payload_len

/// Appends `suffix` to `prefix` without treating it as an extension swap, so
/// `data/train` becomes `data/train.idx` even if the prefix contains dots.
fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut os = prefix.as_os_str().to_os_string();
    os.push(suffix);
    PathBuf::from(os)
}

/// Read-only store over a `.idx`/`.rec` pair.
#[derive(Debug)]
pub struct IndexedRecordFile {
    keys: Vec<u64>,
    offsets: HashMap<u64, u64>,
    data: Vec<u8>,
    rec_path: PathBuf,
}

impl IndexedRecordFile {
    /// Opens `<prefix>.idx` and `<prefix>.rec`, loading the index and the
    /// record data into memory.
    pub fn open(prefix: impl AsRef<Path>) -> Result<Self> {
        let idx_path = with_suffix(prefix.as_ref(), ".idx");
        let rec_path = with_suffix(prefix.as_ref(), ".rec");

        let idx_text = fs::read_to_string(&idx_path).map_err(|source| Error::StoreIo {
            path: idx_path.clone(),
            source,
        })?;

        let mut keys = Vec::new();
        let mut offsets = HashMap::new();
        for (lineno, line) in idx_text.lines().enumerate() {
            if line.is_empty() {
                continue;
            }
            let malformed = |reason: String| Error::MalformedStore {
                path: idx_path.clone(),
                reason: format!("line {}: {}", lineno + 1, reason),
            };

            let (key_text, offset_text) = line
                .split_once('\t')
                .ok_or_else(|| malformed("expected \"<key>\\t<offset>\"".to_string()))?;
            let key: u64 = key_text
                .parse()
                .map_err(|e| malformed(format!("bad key {key_text:?}: {e}")))?;
            let offset: u64 = offset_text
                .parse()
                .map_err(|e| malformed(format!("bad offset {offset_text:?}: {e}")))?;

            if offsets.insert(key, offset).is_some() {
                return Err(malformed(format!("duplicate key {key}")));
            }
            keys.push(key);
        }

        let data = fs::read(&rec_path).map_err(|source| Error::StoreIo {
            path: rec_path.clone(),
            source,
        })?;

        Ok(Self {
            keys,
            offsets,
            data,
            rec_path,
        })
    }

    fn record_at(&self, key: u64, offset: u64) -> Result<Record> {
        let bad = |reason: String| Error::StoreRead {
            key,
            source: io::Error::new(io::ErrorKind::InvalidData, reason),
        };

        let start = offset as usize;
        let header = self
            .data
            .get(start..start + HEADER_LEN)
            .ok_or_else(|| bad(format!("offset {offset} past end of {}", self.rec_path.display())))?;

        let magic = u32::from_le_bytes([header[0], header[1], header[2], header[3]]);
        if magic != RECORD_MAGIC {
            return Err(bad(format!(
                "bad record magic {magic:#010x} at offset {offset}"
            )));
        }
        let label = f32::from_le_bytes([header[4], header[5], header[6], header[7]]);
        let payload_len = u32::from_le_bytes([header[8], header[9], header[10], header[11]]) as usize;

        let payload = self
            .data
            .get(start + HEADER_LEN..start + HEADER_LEN + payload_len)
            .ok_or_else(|| bad(format!("truncated payload at offset {offset}")))?;

        Ok(Record {
            label,
            payload: payload.to_vec(),
        })
    }
}

impl RecordStore for IndexedRecordFile {
    fn keys(&self) -> &[u64] {
        &self.keys
    }

    fn read(&self, key: u64) -> Result<Record> {
        let offset = *self.offsets.get(&key).ok_or_else(|| Error::StoreRead {
            key,
            source: io::Error::new(io::ErrorKind::NotFound, "key not in index"),
        })?;
        self.record_at(key, offset)
    }
}

/// Writes a `.idx`/`.rec` pair record by record.
pub struct IndexedRecordWriter {
    idx: BufWriter<File>,
    rec: BufWriter<File>,
    idx_path: PathBuf,
    rec_path: PathBuf,
    offset: u64,
}

impl IndexedRecordWriter {
    pub fn create(prefix: impl AsRef<Path>) -> Result<Self> {
        let idx_path = with_suffix(prefix.as_ref(), ".idx");
        let rec_path = with_suffix(prefix.as_ref(), ".rec");

        let idx = File::create(&idx_path).map_err(|source| Error::StoreIo {
            path: idx_path.clone(),
            source,
        })?;
        let rec = File::create(&rec_path).map_err(|source| Error::StoreIo {
            path: rec_path.clone(),
            source,
        })?;

        Ok(Self {
            idx: BufWriter::new(idx),
            rec: BufWriter::new(rec),
            idx_path,
            rec_path,
            offset: 0,
        })
    }

    /// Appends one record and its index entry.
    pub fn append(&mut self, key: u64, label: f32, payload: &[u8]) -> Result<()> {
        let rec_err = |source| Error::StoreIo {
            path: self.rec_path.clone(),
            source,
        };

        self.rec.write_all(&RECORD_MAGIC.to_le_bytes()).map_err(rec_err)?;
        self.rec.write_all(&label.to_le_bytes()).map_err(rec_err)?;
        self.rec
            .write_all(&(payload.len() as u32).to_le_bytes())
            .map_err(rec_err)?;
        self.rec.write_all(payload).map_err(rec_err)?;

        writeln!(self.idx, "{}\t{}", key, self.offset).map_err(|source| Error::StoreIo {
            path: self.idx_path.clone(),
            source,
        })?;

        self.offset += (HEADER_LEN + payload.len()) as u64;
        Ok(())
    }

    /// Flushes both files.
    pub fn finish(mut self) -> Result<()> {
        self.rec.flush().map_err(|source| Error::StoreIo {
            path: self.rec_path.clone(),
            source,
        })?;
        self.idx.flush().map_err(|source| Error::StoreIo {
            path: self.idx_path.clone(),
            source,
        })
    }
}
