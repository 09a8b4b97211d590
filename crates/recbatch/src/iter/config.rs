//! Iterator configuration and mode selection.

use crate::error::{Error, Result};

/// What the batches are for. Decides whether the random augmentation branch
/// runs and how dataset totals are logged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Train,
    Validation,
    Test,
}

impl Mode {
    /// Maps the conventional numeric flag: `1` = train, `2` = validation,
    /// anything else = test.
    pub fn from_code(code: i64) -> Self {
        match code {
            1 => Mode::Train,
            2 => Mode::Validation,
            _ => Mode::Test,
        }
    }

    pub fn is_train(self) -> bool {
        matches!(self, Mode::Train)
    }
}

/// Configuration for [`BatchIter`](super::BatchIter).
///
/// `rgb_mean` and `class_num` are reserved fields carried for callers that
/// record them alongside the iterator; batch production never reads them.
#[derive(Debug, Clone)]
pub struct BatchIterConfig {
    /// Output name for the image tensor.
    pub data_name: String,
    /// Output name for the label tensor.
    pub label_name: String,
    /// Samples per batch (>= 1).
    pub batch_size: usize,
    /// Train / validation / test.
    pub mode: Mode,
    /// Reserved: per-channel mean, unused by processing.
    pub rgb_mean: [f32; 3],
    /// Reserved: number of classes, unused by processing.
    pub class_num: usize,
    /// Target tensor shape `(channels, height, width)`; channels must be 3.
    pub shape: (i64, i64, i64),
    /// Base seed for key shuffling and random transforms. `None` uses
    /// process entropy (irreproducible epochs).
    pub seed: Option<u64>,
}

impl Default for BatchIterConfig {
    fn default() -> Self {
        Self {
            data_name: "data".to_string(),
            label_name: "softmax".to_string(),
            batch_size: 2,
            mode: Mode::Train,
            rgb_mean: [0.0, 0.0, 0.0],
            class_num: 2,
            shape: (3, 224, 224),
            seed: None,
        }
    }
}

impl BatchIterConfig {
    pub fn builder() -> BatchIterConfigBuilder {
        BatchIterConfigBuilder::default()
    }

    pub(crate) fn validate(&self) -> Result<()> {
        if self.batch_size == 0 {
            return Err(Error::Config("batch_size must be >= 1".to_string()));
        }
        let (channels, height, width) = self.shape;
        if channels != 3 {
            return Err(Error::Config(format!(
                "shape must have 3 channels (got {channels})"
            )));
        }
        if height <= 0 || width <= 0 {
            return Err(Error::Config(format!(
                "shape must have positive spatial dims (got {height}x{width})"
            )));
        }
        Ok(())
    }
}

/// Builder for [`BatchIterConfig`] with method chaining.
#[derive(Default)]
pub struct BatchIterConfigBuilder {
    config: BatchIterConfig,
}

impl BatchIterConfigBuilder {
    pub fn data_name(mut self, name: impl Into<String>) -> Self {
        self.config.data_name = name.into();
        self
    }

    pub fn label_name(mut self, name: impl Into<String>) -> Self {
        self.config.label_name = name.into();
        self
    }

    pub fn batch_size(mut self, size: usize) -> Self {
        self.config.batch_size = size;
        self
    }

    pub fn mode(mut self, mode: Mode) -> Self {
        self.config.mode = mode;
        self
    }

    pub fn rgb_mean(mut self, mean: [f32; 3]) -> Self {
        self.config.rgb_mean = mean;
        self
    }

    pub fn class_num(mut self, classes: usize) -> Self {
        self.config.class_num = classes;
        self
    }

    pub fn shape(mut self, shape: (i64, i64, i64)) -> Self {
        self.config.shape = shape;
        self
    }

    /// Sets the base seed controlling key shuffling and random transforms.
    pub fn seed(mut self, seed: u64) -> Self {
        self.config.seed = Some(seed);
        self
    }

    pub fn build(self) -> BatchIterConfig {
        self.config
    }
}
