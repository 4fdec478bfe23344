//! Waterfall layout engine
//!
//! Converts a trace dataset plus a viewport into pixel-accurate nested bar
//! geometry. The walk is depth-first and root-first: every visited process
//! is recorded in the syscall index, then checked against the duration
//! threshold, and only visible processes contribute a bar. A hidden process
//! prunes its whole subtree (thresholding out noise subtrees).
//!
//! Geometry is ceiling-rounded to avoid sub-pixel gaps accumulating leftward,
//! and each child's `left` is expressed in its parent's local coordinate
//! space, matching standard nested-box layout.

// Pixel geometry is derived from f64 millisecond timestamps
#![allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]

use std::collections::{BTreeMap, HashSet};

use log::warn;

use crate::domain::{BuildError, Pid};
use crate::trace_data::{Syscall, TraceDataset, Viewport};

/// PID -> ordered syscall log, populated during the traversal and queried
/// read-only afterwards.
pub type SyscallIndex = BTreeMap<Pid, Vec<Syscall>>;

/// One bar of the waterfall: a plain nested structure ready for
/// presentation, with no rendering logic.
///
/// `left` is in pixels relative to the parent bar's origin (absolute for a
/// top-level bar) and may be negative when a process starts before the
/// viewport. `children` preserves the dataset's display order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BarNode {
    pub id: Pid,
    pub class: String,
    pub left: i64,
    pub width: u64,
    pub children: Vec<BarNode>,
}

/// Recoverable oddities observed during a build.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildWarning {
    /// A PID listed in some process's `children` is absent from the dataset.
    /// The reference is skipped and the rest of the subtree is built.
    UnknownChild { parent: Pid, child: Pid },
}

impl std::fmt::Display for BuildWarning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildWarning::UnknownChild { parent, child } => {
                write!(f, "process #{child} not in dataset (referenced by #{parent})")
            }
        }
    }
}

/// Result of one build: an immutable snapshot. Re-running a build with a
/// different viewport or threshold produces an entirely new output.
#[derive(Debug, Clone)]
pub struct BuildOutput {
    /// Top-level bars. Nested mode yields at most one (the root, when it
    /// passes the threshold); flat mode yields one bar per visible process.
    pub bars: Vec<BarNode>,
    pub index: SyscallIndex,
    pub warnings: Vec<BuildWarning>,
}

/// Derives bar geometry from a dataset and viewport.
///
/// The flat, unfiltered layout that older viewers shipped as separate
/// implementations is configuration here: `flatten(true)` emits every
/// visible bar at its absolute offset with no nesting, and a threshold of
/// zero disables filtering.
#[derive(Debug, Clone, Copy, Default)]
pub struct WaterfallBuilder {
    flatten: bool,
}

impl WaterfallBuilder {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Emit visible bars as siblings at absolute offsets instead of nesting.
    #[must_use]
    pub fn flatten(mut self, flatten: bool) -> Self {
        self.flatten = flatten;
        self
    }

    /// Build the bar tree and syscall index for one dataset and viewport.
    ///
    /// # Errors
    ///
    /// `InvalidViewport` when the scale is not a positive finite number,
    /// `MissingRoot` when the declared root is absent from the process map,
    /// `CyclicTree` when the traversal revisits a process.
    pub fn build(
        &self,
        dataset: &TraceDataset,
        viewport: &Viewport,
    ) -> Result<BuildOutput, BuildError> {
        if !viewport.scale.is_finite() || viewport.scale <= 0.0 {
            return Err(BuildError::InvalidViewport(viewport.scale));
        }
        if !dataset.processes.contains_key(&dataset.root) {
            return Err(BuildError::MissingRoot(dataset.root.clone()));
        }

        let threshold_ms = dataset.properties.threshold * 1000.0;
        let mut bars = Vec::new();
        let mut index = SyscallIndex::new();
        let mut warnings = Vec::new();
        let mut visited = HashSet::new();

        self.walk(
            dataset,
            viewport,
            threshold_ms,
            &dataset.root,
            None,
            &mut bars,
            &mut index,
            &mut warnings,
            &mut visited,
        )?;

        Ok(BuildOutput { bars, index, warnings })
    }

    /// Visit `pid` and, if visible, append its bar (subtree included) to
    /// `sink`. `parent_origin` is the parent's unrounded absolute left in
    /// pixels; the parent geometry is computed once and passed down rather
    /// than recomputed per child.
    #[allow(clippy::too_many_arguments)]
    fn walk(
        &self,
        dataset: &TraceDataset,
        viewport: &Viewport,
        threshold_ms: f64,
        pid: &Pid,
        parent_origin: Option<f64>,
        sink: &mut Vec<BarNode>,
        index: &mut SyscallIndex,
        warnings: &mut Vec<BuildWarning>,
        visited: &mut HashSet<Pid>,
    ) -> Result<(), BuildError> {
        if !visited.insert(pid.clone()) {
            return Err(BuildError::CyclicTree(pid.clone()));
        }

        // Presence is guaranteed by the caller (root check / child lookup).
        let Some(process) = dataset.processes.get(pid) else {
            return Ok(());
        };

        // Index the syscalls even when the process is filtered out of the
        // visual tree, so inspection stays consistent across thresholds.
        index.insert(pid.clone(), process.syscalls.clone());

        // Hidden processes contribute no bar and prune their subtree.
        if process.duration_ms() < threshold_ms {
            return Ok(());
        }

        let abs_left = (process.start - viewport.start) * viewport.scale;
        let left = match parent_origin {
            Some(origin) => abs_left - origin,
            None => abs_left,
        };
        let mut bar = BarNode {
            id: pid.clone(),
            class: process.kind.clone(),
            left: left.ceil() as i64,
            width: (process.duration_ms() * viewport.scale).ceil() as u64,
            children: Vec::new(),
        };

        if self.flatten {
            // Flat layout: parent precedes its subtree, every bar absolute.
            sink.push(bar);
            for child in &process.children {
                if !dataset.processes.contains_key(child) {
                    report_unknown_child(pid, child, warnings);
                    continue;
                }
                self.walk(
                    dataset, viewport, threshold_ms, child, None, sink, index, warnings, visited,
                )?;
            }
        } else {
            for child in &process.children {
                if !dataset.processes.contains_key(child) {
                    report_unknown_child(pid, child, warnings);
                    continue;
                }
                self.walk(
                    dataset,
                    viewport,
                    threshold_ms,
                    child,
                    Some(abs_left),
                    &mut bar.children,
                    index,
                    warnings,
                    visited,
                )?;
            }
            sink.push(bar);
        }

        Ok(())
    }
}

fn report_unknown_child(parent: &Pid, child: &Pid, warnings: &mut Vec<BuildWarning>) {
    warn!("process #{child} not in dataset (referenced by #{parent})");
    warnings.push(BuildWarning::UnknownChild { parent: parent.clone(), child: child.clone() });
}
