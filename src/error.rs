//! Error type shared by all fallible operations.
//!
//! Every variant is fatal for a running search: the orchestrator keeps no
//! replicated state, so a broken segment or a violated network/set
//! correspondence cannot be recovered from.

use std::io;
use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// Comparator is out of range, degenerate, or not in the `from > to` orientation.
    #[error("invalid comparator ({from}, {to}) for {n} inputs")]
    InvalidComparator { from: u8, to: u8, n: u8 },

    /// A network can not hold more than `capacity` comparators.
    #[error("network can not fit any more comparators (capacity {capacity})")]
    CapacityExceeded { capacity: u8 },

    /// An output set references a network id missing from its companion file.
    #[error("no network with id {id} in {handle}")]
    NetworkNotFound { id: u64, handle: String },

    #[error("unsupported number of inputs: {0}")]
    UnsupportedSize(u8),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),

    /// Segment file content does not match the expected layout.
    #[error("corrupt segment {handle}: {reason}")]
    Corrupt { handle: String, reason: String },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to build worker pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
}

impl Error {
    pub(crate) fn io(path: impl Into<PathBuf>, source: io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
