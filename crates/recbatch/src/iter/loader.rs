//! `BatchIter`: cursor management and batch production.

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;
use tch::{Device, Kind, Tensor};
use tracing::info;

use super::{Batch, BatchIterConfig};
use crate::decode::decode_bgr;
use crate::error::{Error, Result};
use crate::rng::init_iter_rng;
use crate::store::RecordStore;
use crate::transforms::AugmentPipeline;

/// Produces fixed-size batches of augmented image tensors from a record
/// store.
///
/// The key sequence is reshuffled on every `reset()`; within an epoch the
/// cursor advances by one batch per `next_batch()` call. Batch production
/// writes into reused internal buffers, so a returned [`Batch`] is only
/// valid until the next call.
///
/// Not `Sync`-safe by construction: `next_batch` takes `&mut self`, so two
/// threads cannot race on the buffers or the cursor. Run one iterator per
/// thread over a shared store instead.
pub struct BatchIter<S: RecordStore> {
    store: S,
    keys: Vec<u64>,
    config: BatchIterConfig,
    pipeline: AugmentPipeline,
    /// Index of the last produced batch; `-1` until the first `next_batch`.
    cursor: i64,
    /// Completed `reset()` count; salts the per-epoch shuffle seed.
    epoch: usize,
    images: Tensor,
    labels: Tensor,
}

impl<S: RecordStore> BatchIter<S> {
    /// Opens an iterator over `store`, copies its key list, allocates the
    /// reusable batch buffers, and performs the initial `reset()`.
    pub fn new(store: S, config: BatchIterConfig) -> Result<Self> {
        config.validate()?;

        let keys = store.keys().to_vec();
        if keys.is_empty() {
            return Err(Error::Config("record store is empty".to_string()));
        }

        let (channels, height, width) = config.shape;
        let batch = config.batch_size as i64;
        let images = Tensor::zeros(
            &[batch, channels, height, width],
            (Kind::Float, Device::Cpu),
        );
        let labels = Tensor::zeros(&[batch], (Kind::Float, Device::Cpu));
        let pipeline = AugmentPipeline::new(config.mode, height as u32, width as u32)?;

        let mut iter = Self {
            store,
            keys,
            config,
            pipeline,
            cursor: -1,
            epoch: 0,
            images,
            labels,
        };
        iter.reset();

        info!(
            total = iter.keys.len(),
            mode = ?iter.config.mode,
            batch_size = iter.config.batch_size,
            "record store loaded"
        );
        Ok(iter)
    }

    /// Rewinds to the pre-iteration sentinel and reshuffles the key
    /// sequence.
    ///
    /// With a configured seed the shuffle RNG is derived as `seed + epoch`,
    /// so every epoch sees a fresh but reproducible permutation; the
    /// thread-local transform RNG is re-seeded alongside. Without a seed both
    /// draw from process entropy.
    pub fn reset(&mut self) {
        self.cursor = -1;
        match self.config.seed {
            Some(seed) => {
                let mut rng = StdRng::seed_from_u64(seed.wrapping_add(self.epoch as u64));
                self.keys.shuffle(&mut rng);
                init_iter_rng(self.epoch, seed);
            }
            None => {
                self.keys.shuffle(&mut rand::rng());
            }
        }
        self.epoch += 1;
    }

    /// True iff another batch can be produced this epoch. Pure query: the
    /// cursor only moves inside [`next_batch`](Self::next_batch).
    pub fn has_next(&self) -> bool {
        ((self.cursor + 1) as usize) * self.config.batch_size
            < self.keys.len() + self.pad_amount()
    }

    /// Batches still to come this epoch.
    pub fn remaining_batches(&self) -> usize {
        self.batches_per_epoch() - (self.cursor + 1) as usize
    }

    /// `ceil(N / batch_size)`.
    pub fn batches_per_epoch(&self) -> usize {
        (self.keys.len() + self.pad_amount()) / self.config.batch_size
    }

    /// Filler slots in the epoch's final batch: `0` when the dataset size is
    /// a multiple of the batch size, `batch_size - N % batch_size`
    /// otherwise. Stable across an epoch.
    pub fn pad_amount(&self) -> usize {
        let rem = self.keys.len() % self.config.batch_size;
        if rem == 0 {
            0
        } else {
            self.config.batch_size - rem
        }
    }

    /// Index of the last produced batch (`-1` right after `reset()`).
    pub fn current_index(&self) -> i64 {
        self.cursor
    }

    pub fn get_batch_size(&self) -> usize {
        self.config.batch_size
    }

    /// Name and shape of the image tensor this iterator provides.
    pub fn provide_data_spec(&self) -> (&str, Vec<i64>) {
        let (channels, height, width) = self.config.shape;
        (
            self.config.data_name.as_str(),
            vec![self.config.batch_size as i64, channels, height, width],
        )
    }

    /// Name and shape of the label tensor this iterator provides.
    pub fn provide_label_spec(&self) -> (&str, Vec<i64>) {
        (
            self.config.label_name.as_str(),
            vec![self.config.batch_size as i64],
        )
    }

    /// Produces the next batch, or [`Error::EndOfEpoch`] once the epoch is
    /// exhausted (the buffers are left untouched in that case).
    ///
    /// Slot `i` of batch `c` reads `keys[(i + c) % N]`: the read window
    /// advances by **one key per batch**, not by `batch_size`, so
    /// consecutive batches overlap in all but one record. This reproduces
    /// the behavior the training results were obtained with; treat any
    /// change to a `batch_size` stride as a semantic break, not a cleanup.
    /// The modulo wraps the final batch's overhang back to the front of the
    /// shuffled sequence.
    ///
    /// Store read errors, decode failures, and degenerate images abort the
    /// whole call; no slot-level skipping is attempted.
    pub fn next_batch(&mut self) -> Result<Batch> {
        if !self.has_next() {
            return Err(Error::EndOfEpoch);
        }
        self.cursor += 1;

        let n = self.keys.len();
        for slot in 0..self.config.batch_size {
            let key = self.keys[(slot + self.cursor as usize) % n];
            let record = self.store.read(key)?;
            let frame =
                decode_bgr(&record.payload).map_err(|source| Error::Decode { key, source })?;
            let tensor = self.pipeline.apply(frame)?;

            let mut image_slot = self.images.get(slot as i64);
            image_slot.copy_(&tensor);
            let mut label_slot = self.labels.get(slot as i64);
            let _ = label_slot.fill_(record.label as f64);
        }

        let pad = if self.has_next() { 0 } else { self.pad_amount() };
        Ok(Batch {
            images: self.images.shallow_clone(),
            labels: self.labels.shallow_clone(),
            pad,
            index: self.cursor,
        })
    }
}
