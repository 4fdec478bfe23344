//! # tracefall - Process Trace Waterfall Viewer
//!
//! tracefall renders an execution trace - a tree of processes, each owning an
//! ordered log of system calls - as a horizontal waterfall timeline, and lets
//! the viewer drill into any process to inspect its syscall log.
//!
//! ## Architecture Overview
//!
//! ```text
//! dataset.json ──▶ DatasetLoader ──▶ TraceDataset
//!                                         │
//!                     viewport + threshold│
//!                                         ▼
//!                                 WaterfallBuilder
//!                                         │
//!                          ┌──────────────┴──────────────┐
//!                          ▼                             ▼
//!                      BarTree                     SyscallIndex
//!                          │                             │
//!                          ▼                             ▼
//!                  TUI waterfall pane ──click──▶ SelectionController
//!                                                        │
//!                                                        ▼
//!                                                  ProcessView
//! ```
//!
//! ## Module Structure
//!
//! - [`trace_data`]: Dataset model (processes, syscalls, properties, viewport)
//!   deserialized from JSON and structurally validated.
//!
//! - [`waterfall`]: The layout engine. Walks the process tree depth-first,
//!   derives pixel geometry relative to each parent's origin, filters
//!   sub-threshold processes and collects the syscall index.
//!
//! - [`selection`]: Selection state machine. Tracks the currently inspected
//!   process and produces a display view-model (duration, escaped commands).
//!
//! - [`loader`]: Dataset loading collaborator (trait seam + file-backed
//!   implementation).
//!
//! - [`viewer`]: Glue layer. Orchestrates load -> build -> auto-select,
//!   tracks load generations so a stale response never overwrites newer
//!   state, and formats the timeline description.
//!
//! - [`tui`]: Terminal presentation adapter built on ratatui. Renders the
//!   bar tree, wires keyboard navigation into the selection controller.
//!
//! - [`cli`]: Command-line argument parsing.
//!
//! - [`domain`]: Core domain types (Pid) and structured errors.
//!
//! ## Typical Usage
//!
//! ```bash
//! # Open a dataset in the interactive viewer
//! tracefall trace.json
//!
//! # Custom viewport and threshold, plain-text report
//! tracefall trace.json --end 80000 --scale 0.05 --threshold 0.5 --headless
//! ```

pub mod cli;
pub mod domain;
pub mod loader;
pub mod selection;
pub mod trace_data;
pub mod tui;
pub mod viewer;
pub mod waterfall;
