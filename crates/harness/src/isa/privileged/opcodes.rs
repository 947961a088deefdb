//! Fixed instruction encodings recognised by the harness.
//!
//! These are whole 32-bit instruction words, not opcode fields. The trace
//! logger and the commit-log converter compare against them directly.

/// Environment Call (ECALL).
/// Ends a test program; the core traps and the verdict reports the result.
pub const ECALL: u32 = 0x0000_0073;

/// Canonical NOP (`addi x0, x0, 0`).
pub const NOP: u32 = 0x0000_0013;

/// `fence iorw, iorw`. The core under test does not implement fences, so the
/// reference trace records them as NOPs.
pub const FENCE: u32 = 0x0ff0_000f;

/// `csrr a0, mhartid`. First instruction of the riscv-tests boot sequence.
pub const CSRR_A0_MHARTID: u32 = 0xf140_2573;

/// `li gp, 2`. First instruction after the riscv-tests boot sequence.
pub const LI_GP_2: u32 = 0x0020_0193;

/// Trap vector the riscv-tests environment installs in `mtvec`.
pub const TRAP_VECTOR_PC: u64 = 0x8000_00e0;
