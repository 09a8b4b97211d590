//! One produced batch.

use tch::Tensor;

/// A batch of augmented images and their labels.
///
/// `images` and `labels` are shallow views over the iterator's reused
/// internal buffers: they are valid only until the next `next_batch()` call
/// overwrites them. Callers that need a batch to outlive the iteration step
/// must copy (`Tensor::copy`) before advancing.
#[derive(Debug)]
pub struct Batch {
    /// `[batch_size, 3, H, W]` f32, RGB, channel-first.
    pub images: Tensor,
    /// `[batch_size]` f32 scalar labels.
    pub labels: Tensor,
    /// Number of filler slots. Non-zero only on the final batch of an epoch
    /// when the dataset size is not a multiple of the batch size; filler
    /// slots re-read earlier keys of the shuffled sequence rather than
    /// holding blank data.
    pub pad: usize,
    /// Zero-based batch index within the epoch.
    pub index: i64,
}
