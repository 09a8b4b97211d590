//! The batch iterator.
//!
//! `BatchIter` walks a shuffled copy of a record store's key list and turns
//! it into fixed-size batches of augmented image tensors. One epoch is
//! `ceil(N / batch_size)` batches between two `reset()` calls; exhaustion is
//! reported as the typed [`Error::EndOfEpoch`](crate::Error::EndOfEpoch)
//! rather than a generic failure.
//!
//! ```text
//! iter/
//! ├── mod.rs     # docs + re-exports
//! ├── config.rs  # Mode, BatchIterConfig + builder
//! ├── batch.rs   # Batch
//! └── loader.rs  # BatchIter
//! ```
//!
//! # Example
//! ```ignore
//! let store = IndexedRecordFile::open("data/train")?;
//! let config = BatchIterConfig::builder()
//!     .batch_size(32)
//!     .mode(Mode::Train)
//!     .seed(42)
//!     .build();
//! let mut iter = BatchIter::new(store, config)?;
//!
//! loop {
//!     match iter.next_batch() {
//!         Ok(batch) => train_step(&batch.images, &batch.labels),
//!         Err(Error::EndOfEpoch) => iter.reset(),
//!         Err(err) => return Err(err),
//!     }
//! }
//! ```

mod batch;
mod config;
mod loader;

pub use batch::Batch;
pub use config::{BatchIterConfig, BatchIterConfigBuilder, Mode};
pub use loader::BatchIter;
