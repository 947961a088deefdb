//! Simulation driving.
//!
//! Provides the reset and clock loop that advances an external hardware model
//! and routes what the model reports to the trace and verdict formatters.

/// Clock driver, the `Dut` trait and the event monitor.
pub mod driver;

pub use driver::{ClockDriver, Dut, DutEvent, Monitor, RunSummary};
