//! Privileged Architecture Definitions.
//!
//! Defines the trap cause codes and the fixed instruction encodings the harness
//! keys on.
//!
//! # Modules
//!
//! - `cause`: Exception cause codes and the `TrapCause` classification.
//! - `opcodes`: Fixed instruction words (ECALL, NOP, FENCE, boot markers).

/// Exception cause code definitions.
pub mod cause;

/// Fixed instruction encodings recognised in traces.
pub mod opcodes;

pub use cause::TrapCause;
