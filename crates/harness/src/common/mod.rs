//! Common utilities and types used throughout the testbench harness.
//!
//! This module provides the building blocks shared across the harness components:
//! 1. **Error Handling:** The harness error type and its result alias.

/// Error types for I/O, configuration and parsing failures.
pub mod error;

pub use error::{HarnessError, Result};
