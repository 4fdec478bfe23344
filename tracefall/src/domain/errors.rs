//! Structured error types for tracefall
//!
//! Using thiserror for automatic Display implementation and error chaining.

use super::types::Pid;
use thiserror::Error;

/// Structural problems detected while deserializing or validating a dataset.
#[derive(Error, Debug)]
pub enum DatasetError {
    #[error("process #{pid} has start {start} after end {end}")]
    InvalidInterval { pid: Pid, start: f64, end: f64 },

    #[error("process #{pid} has a negative syscall duration")]
    NegativeDuration { pid: Pid },

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Json(#[from] serde_json::Error),
}

/// Fatal build failures. No partial bar tree is ever produced.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum BuildError {
    #[error("root process #{0} not found in dataset")]
    MissingRoot(Pid),

    #[error("viewport scale must be a positive finite number, got {0}")]
    InvalidViewport(f64),

    #[error("process tree contains a cycle through #{0}")]
    CyclicTree(Pid),
}

/// Selection failures. The prior selection is left unchanged.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum SelectionError {
    #[error("process #{0} not found in syscall index")]
    UnknownProcess(Pid),
}

/// Dataset load failure reported by a [`crate::loader::DatasetLoader`].
///
/// `status` and `message` are surfaced verbatim in the inline error shown
/// to the viewer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("Error: {status} {message}")]
pub struct LoadFailure {
    pub status: i32,
    pub message: String,
}

/// Anything that can take the viewer to its failed state.
#[derive(Error, Debug)]
pub enum ViewerError {
    #[error("Loading \"{url}\" failed. {source}")]
    Load {
        url: String,
        #[source]
        source: LoadFailure,
    },

    #[error("Building waterfall for \"{url}\" failed: {source}")]
    Build {
        url: String,
        #[source]
        source: BuildError,
    },
}
