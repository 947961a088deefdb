//! Golden reference traces.
//!
//! Spike, run with `--log-commits`, logs every committed instruction. This module
//! turns that log into the harness trace format and compares a model trace
//! against it:
//! 1. **Commit log:** Window extraction, per-line parsing and boot-sequence NOP fill.
//! 2. **Compare:** Record-by-record comparison reporting the first divergence.

/// Spike commit-log conversion.
pub mod commit_log;

/// Trace comparison.
pub mod compare;

pub use commit_log::{convert_commit_log, fill_boot_sequence, parse_commit_log};
pub use compare::{Mismatch, TraceComparison, compare_traces};
