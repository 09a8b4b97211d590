use std::io;
use std::path::PathBuf;

use crate::decode::DecodeError;

pub type Result<T> = std::result::Result<T, Error>;

/// All errors that can occur while producing batches.
///
/// `EndOfEpoch` is the one *expected* variant: it signals that the current
/// epoch is exhausted and the caller must `reset()` to continue. Every other
/// variant is fatal for the call that raised it; the crate performs no retry,
/// backoff, or partial-batch delivery.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The epoch is exhausted; call `reset()` to reshuffle and start over.
    #[error("epoch exhausted; call reset() to begin a new epoch")]
    EndOfEpoch,

    /// A record lookup failed (unknown key, truncated record, bad record
    /// framing).
    #[error("record store read failed for key {key}")]
    StoreRead {
        key: u64,
        #[source]
        source: io::Error,
    },

    /// A store file could not be opened, read, or written.
    #[error("record store I/O failed at {path}")]
    StoreIo {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The store's index file does not parse.
    #[error("malformed record store {path}: {reason}")]
    MalformedStore { path: PathBuf, reason: String },

    /// A compressed image payload could not be decoded.
    #[error("failed to decode image payload for key {key}")]
    Decode {
        key: u64,
        #[source]
        source: DecodeError,
    },

    /// An image whose geometry cannot go through the pipeline (zero-sized
    /// side, crop larger than the frame, ...).
    #[error("degenerate image {width}x{height}: {reason}")]
    DegenerateImage {
        width: u32,
        height: u32,
        reason: String,
    },

    /// Invalid iterator or transform configuration.
    #[error("invalid configuration: {0}")]
    Config(String),
}
