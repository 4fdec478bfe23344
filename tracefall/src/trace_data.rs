//! Trace dataset model
//!
//! In-memory representation of a trace dataset: a tree of processes, each
//! owning an ordered syscall log, plus display properties. Deserialized from
//! JSON and structurally validated before any layout runs.

use std::collections::BTreeMap;
use std::path::Path;

use serde::Deserialize;

use crate::domain::{DatasetError, Pid};

/// One logged system call.
///
/// `duration` is cumulative: the *last* syscall of a process carries the
/// total process duration in milliseconds. Callers must read the last entry,
/// never sum over entries.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct Syscall {
    pub cmd: String,
    pub duration: f64,
}

/// A node in the trace tree with a time interval and syscall log.
///
/// Timestamps are in milliseconds. `children` is display order, not time
/// order, and is preserved verbatim. `parent` is a weak back-reference used
/// only to derive the parent-relative bar offset.
#[derive(Debug, Clone, Deserialize)]
pub struct Process {
    pub start: f64,
    pub end: f64,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub parent: Option<Pid>,
    #[serde(default)]
    pub children: Vec<Pid>,
    #[serde(default)]
    pub syscalls: Vec<Syscall>,
}

impl Process {
    /// Wall-clock duration of this process in milliseconds.
    pub fn duration_ms(&self) -> f64 {
        self.end - self.start
    }
}

/// Display properties shipped with the dataset.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Properties {
    /// Minimum process duration in *seconds* required for a process to be
    /// rendered at all.
    pub threshold: f64,
}

/// Visible time window and pixel scale, supplied by the embedding context.
///
/// `start`/`end` are milliseconds, `scale` is pixels per millisecond and
/// must be a positive finite number. Immutable for the lifetime of one build.
#[derive(Debug, Clone, Copy, Deserialize)]
pub struct Viewport {
    pub start: f64,
    pub end: f64,
    pub scale: f64,
}

/// A complete trace dataset, loaded once per load operation.
#[derive(Debug, Clone, Deserialize)]
pub struct TraceDataset {
    pub processes: BTreeMap<Pid, Process>,
    pub root: Pid,
    pub properties: Properties,
}

impl TraceDataset {
    /// Parse and validate a dataset from its JSON wire format.
    pub fn from_json(text: &str) -> Result<Self, DatasetError> {
        let dataset: TraceDataset = serde_json::from_str(text)?;
        dataset.validate()?;
        Ok(dataset)
    }

    /// Parse a dataset file from disk.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, DatasetError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Check per-process structural invariants.
    ///
    /// Root existence is deliberately left to the builder, which reports it
    /// as `BuildError::MissingRoot`.
    fn validate(&self) -> Result<(), DatasetError> {
        for (pid, process) in &self.processes {
            if process.start > process.end {
                return Err(DatasetError::InvalidInterval {
                    pid: pid.clone(),
                    start: process.start,
                    end: process.end,
                });
            }
            if process.syscalls.iter().any(|s| s.duration < 0.0) {
                return Err(DatasetError::NegativeDuration { pid: pid.clone() });
            }
        }
        Ok(())
    }
}
