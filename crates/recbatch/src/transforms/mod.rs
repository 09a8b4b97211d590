//! Composable image transforms.
//!
//! # Module Organization
//!
//! ```text
//! transforms/
//! ├── geometric.rs     → deterministic spatial ops (center crop, exact resize, random crop)
//! ├── augmentation.rs  → random train-time ops (flips, rotation)
//! ├── conversion.rs    → BGR frame → CHW RGB f32 tensor
//! └── pipeline.rs      → mode-dependent pipeline assembly
//! ```
//!
//! Transforms chain with `.then(...)` into a single statically-dispatched
//! pipeline; [`AugmentPipeline`] boxes the mode-specific chain behind one
//! object so train and eval paths share a call site.

pub mod augmentation;
pub mod conversion;
pub mod geometric;
pub mod pipeline;

pub use augmentation::{RandomHorizontalFlip, RandomRotation, RandomVerticalFlip};
pub use conversion::BgrToRgbChw;
pub use geometric::{CenterSquareCrop, RandomCrop, ResizeExact, CROP_JITTER};
pub use pipeline::AugmentPipeline;

use crate::error::Result;
use std::marker::PhantomData;

/// A stateless conversion from `I` to `O`.
///
/// `then()` works only when:
/// 1. **Types align**: `self: Transform<I, O>`, `next: Transform<O, M>`
/// 2. **Owned**: `Self: Sized` (boxed pipelines call `apply` directly)
/// 3. **Thread-safe**: intermediate and output types must be `Send`
pub trait Transform<I, O>: Send + Sync {
    /// Applies the transformation to the input.
    fn apply(&self, input: I) -> Result<O>;

    #[inline]
    fn then<T, M>(self, next: T) -> Chain<Self, T, O>
    where
        Self: Sized,
        T: Transform<O, M>,
        O: Send,
        M: Send,
    {
        Chain {
            first: self,
            second: next,
            _marker: PhantomData,
        }
    }
}

/// A chain of two transforms (`A` -> `B`).
/// `PhantomData<M>` enforces intermediate type alignment.
#[derive(Debug)]
pub struct Chain<A, B, M> {
    first: A,
    second: B,
    _marker: PhantomData<fn() -> M>,
}

impl<I, M, O, A, B> Transform<I, O> for Chain<A, B, M>
where
    A: Transform<I, M>,
    B: Transform<M, O>,
    M: Send,
{
    fn apply(&self, input: I) -> Result<O> {
        self.first
            .apply(input)
            .and_then(|mid| self.second.apply(mid))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Double;
    impl Transform<u32, u32> for Double {
        fn apply(&self, input: u32) -> Result<u32> {
            Ok(input * 2)
        }
    }

    struct Describe;
    impl Transform<u32, String> for Describe {
        fn apply(&self, input: u32) -> Result<String> {
            Ok(format!("value={input}"))
        }
    }

    #[test]
    fn test_chain_composition() -> Result<()> {
        let pipeline = Double.then(Double).then(Describe);
        assert_eq!(pipeline.apply(3)?, "value=12");
        Ok(())
    }

    #[test]
    fn test_chain_propagates_errors() {
        struct Fail;
        impl Transform<u32, u32> for Fail {
            fn apply(&self, _: u32) -> Result<u32> {
                Err(crate::Error::Config("boom".to_string()))
            }
        }

        let pipeline = Double.then(Fail).then(Describe);
        assert!(pipeline.apply(1).is_err());
    }
}
