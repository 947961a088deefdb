//! RISC-V core testbench harness library.
//!
//! This crate implements the software side of a RISC-V core testbench. It provides:
//! 1. **Trace:** One line per retired instruction describing the architectural write-back.
//! 2. **Verdict:** Pass/fail classification from `a0` and `mcause`, with branch-prediction accuracy.
//! 3. **Simulation:** A reset and clock driver over an external hardware model (`Dut`).
//! 4. **Reference:** Conversion of Spike commit logs into the trace format, and trace comparison.
//! 5. **Reporting:** Test catalogs, the results ledger, summaries, and memory image preparation.

/// Common types (errors).
pub mod common;
/// Harness configuration (defaults and JSON deserialization).
pub mod config;
/// Trap causes and the instruction encodings the harness recognises.
pub mod isa;
/// Objdump section dump to memory image conversion.
pub mod memimage;
/// Spike commit-log conversion and trace comparison.
pub mod reference;
/// Test catalog, results ledger and outcome summary.
pub mod report;
/// Reset and clock driver over an external hardware model.
pub mod sim;
/// Branch statistics and prediction accuracy.
pub mod stats;
/// Per-instruction trace lines.
pub mod trace;
/// End-of-run verdict classification.
pub mod verdict;

/// Error type returned by every fallible harness operation.
pub use crate::common::HarnessError;
/// Root configuration type; use `Config::default()` or `Config::from_json`.
pub use crate::config::Config;
/// Clock driver and the trait a hardware model implements to be driven.
pub use crate::sim::{ClockDriver, Dut, DutEvent};
/// Branch statistics reported alongside a verdict.
pub use crate::stats::BranchStats;
/// One retired instruction and its formatter.
pub use crate::trace::{InstructionEvent, log_trace};
/// Classified run outcome and its formatter.
pub use crate::verdict::{Verdict, check};
