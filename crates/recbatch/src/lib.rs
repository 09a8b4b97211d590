//! Batch production for image-classification training.
//!
//! `recbatch` turns an indexed store of compressed image records into an
//! endless-until-exhausted sequence of fixed-size batches of augmented,
//! channel-first `f32` image tensors plus their scalar labels.
//!
//! # Architecture
//!
//! ```text
//!   ┌──────────────┐
//!   │ RecordStore  │ (IndexedRecordFile, InMemoryStore, ...)
//!   └──────┬───────┘
//!          │ (label, compressed payload) by integer key
//!          ↓
//!   ┌──────────────┐
//!   │   decode     │ payload → BGR pixel frame
//!   └──────┬───────┘
//!          ↓
//!   ┌──────────────┐
//!   │  Transforms  │ crop / resize / flip / rotate / BGR→RGB CHW
//!   └──────┬───────┘
//!          ↓
//!   ┌──────────────┐
//!   │  BatchIter   │ ←── BatchIterConfig (batch size, mode, shape, seed)
//!   └──────┬───────┘
//!          ↓
//!      Batch { images [B,3,H,W], labels [B], pad, index }
//! ```
//!
//! Everything runs synchronously on the caller's thread; `BatchIter` requires
//! `&mut self` for batch production, so the compiler enforces the
//! one-caller-at-a-time contract. Per-record failures (store read, decode,
//! degenerate geometry) abort the whole `next_batch` call — the store is
//! assumed pre-validated and no skip/retry logic exists.

pub mod decode;
pub mod error;
pub mod iter;
pub mod rng;
pub mod store;
pub mod transforms;

pub use decode::{decode_bgr, BgrFrame, DecodeError};
pub use error::{Error, Result};
pub use iter::{Batch, BatchIter, BatchIterConfig, Mode};
pub use store::{IndexedRecordFile, IndexedRecordWriter, InMemoryStore, Record, RecordStore};
pub use transforms::{AugmentPipeline, Transform};
