//! Instruction Set Architecture (ISA) Definitions.
//!
//! The harness never decodes instructions. It only needs the trap cause codes the
//! core reports in `mcause` and a handful of fixed encodings that delimit traces.
//!
//! # Modules
//!
//! * `privileged`: Trap causes and system instruction encodings.

/// Privileged architecture definitions (trap causes, system instructions).
pub mod privileged;
