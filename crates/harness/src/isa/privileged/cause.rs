//! RISC-V Trap Cause Codes.
//!
//! This module defines the synchronous exception codes a core reports in `mcause`
//! when the test program stops, and a typed view over them. Codes the harness
//! does not know are kept verbatim in `TrapCause::Unknown`.

use std::fmt;

/// Exception definitions (MSB = 0).
pub mod exception {
    /// Instruction address misaligned (0).
    pub const INSTRUCTION_ADDRESS_MISALIGNED: u64 = 0;
    /// Instruction access fault (1).
    pub const INSTRUCTION_ACCESS_FAULT: u64 = 1;
    /// Illegal instruction (2).
    pub const ILLEGAL_INSTRUCTION: u64 = 2;
    /// Breakpoint (3).
    pub const BREAKPOINT: u64 = 3;
    /// Load address misaligned (4).
    pub const LOAD_ADDRESS_MISALIGNED: u64 = 4;
    /// Load access fault (5).
    pub const LOAD_ACCESS_FAULT: u64 = 5;
    /// Store/AMO address misaligned (6).
    pub const STORE_ADDRESS_MISALIGNED: u64 = 6;
    /// Store/AMO access fault (7).
    pub const STORE_ACCESS_FAULT: u64 = 7;
    /// Environment call from U-mode (8).
    pub const ENVIRONMENT_CALL_FROM_U_MODE: u64 = 8;
    /// Environment call from S-mode (9).
    pub const ENVIRONMENT_CALL_FROM_S_MODE: u64 = 9;
    /// Environment call from M-mode (11).
    pub const ENVIRONMENT_CALL_FROM_M_MODE: u64 = 11;
    /// Instruction page fault (12).
    pub const INSTRUCTION_PAGE_FAULT: u64 = 12;
    /// Load page fault (13).
    pub const LOAD_PAGE_FAULT: u64 = 13;
    /// Store/AMO page fault (15).
    pub const STORE_PAGE_FAULT: u64 = 15;
}

/// A trap cause as reported in `mcause` at the end of a test program.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TrapCause {
    /// Instruction address misaligned.
    InstructionAddressMisaligned,
    /// Instruction access fault.
    InstructionAccessFault,
    /// Illegal instruction, including instructions the core does not implement.
    IllegalInstruction,
    /// `EBREAK`; test programs may use it as their exit path.
    Breakpoint,
    /// Load address misaligned.
    LoadAddressMisaligned,
    /// Load access fault.
    LoadAccessFault,
    /// Store/AMO address misaligned.
    StoreAddressMisaligned,
    /// Store/AMO access fault.
    StoreAccessFault,
    /// `ECALL` from user mode.
    EnvironmentCallFromUMode,
    /// `ECALL` from supervisor mode.
    EnvironmentCallFromSMode,
    /// `ECALL` from machine mode; the normal exit path of a test program.
    EnvironmentCallFromMMode,
    /// Instruction page fault.
    InstructionPageFault,
    /// Load page fault.
    LoadPageFault,
    /// Store/AMO page fault.
    StorePageFault,
    /// Any code outside the standard exception table.
    Unknown(u64),
}

impl TrapCause {
    /// Decodes an `mcause` value.
    pub const fn from_code(code: u64) -> Self {
        match code {
            exception::INSTRUCTION_ADDRESS_MISALIGNED => Self::InstructionAddressMisaligned,
            exception::INSTRUCTION_ACCESS_FAULT => Self::InstructionAccessFault,
            exception::ILLEGAL_INSTRUCTION => Self::IllegalInstruction,
            exception::BREAKPOINT => Self::Breakpoint,
            exception::LOAD_ADDRESS_MISALIGNED => Self::LoadAddressMisaligned,
            exception::LOAD_ACCESS_FAULT => Self::LoadAccessFault,
            exception::STORE_ADDRESS_MISALIGNED => Self::StoreAddressMisaligned,
            exception::STORE_ACCESS_FAULT => Self::StoreAccessFault,
            exception::ENVIRONMENT_CALL_FROM_U_MODE => Self::EnvironmentCallFromUMode,
            exception::ENVIRONMENT_CALL_FROM_S_MODE => Self::EnvironmentCallFromSMode,
            exception::ENVIRONMENT_CALL_FROM_M_MODE => Self::EnvironmentCallFromMMode,
            exception::INSTRUCTION_PAGE_FAULT => Self::InstructionPageFault,
            exception::LOAD_PAGE_FAULT => Self::LoadPageFault,
            exception::STORE_PAGE_FAULT => Self::StorePageFault,
            other => Self::Unknown(other),
        }
    }

    /// Returns the raw `mcause` value.
    pub const fn code(self) -> u64 {
        match self {
            Self::InstructionAddressMisaligned => exception::INSTRUCTION_ADDRESS_MISALIGNED,
            Self::InstructionAccessFault => exception::INSTRUCTION_ACCESS_FAULT,
            Self::IllegalInstruction => exception::ILLEGAL_INSTRUCTION,
            Self::Breakpoint => exception::BREAKPOINT,
            Self::LoadAddressMisaligned => exception::LOAD_ADDRESS_MISALIGNED,
            Self::LoadAccessFault => exception::LOAD_ACCESS_FAULT,
            Self::StoreAddressMisaligned => exception::STORE_ADDRESS_MISALIGNED,
            Self::StoreAccessFault => exception::STORE_ACCESS_FAULT,
            Self::EnvironmentCallFromUMode => exception::ENVIRONMENT_CALL_FROM_U_MODE,
            Self::EnvironmentCallFromSMode => exception::ENVIRONMENT_CALL_FROM_S_MODE,
            Self::EnvironmentCallFromMMode => exception::ENVIRONMENT_CALL_FROM_M_MODE,
            Self::InstructionPageFault => exception::INSTRUCTION_PAGE_FAULT,
            Self::LoadPageFault => exception::LOAD_PAGE_FAULT,
            Self::StorePageFault => exception::STORE_PAGE_FAULT,
            Self::Unknown(code) => code,
        }
    }

    /// Whether the program reached its exit path (`ECALL` from M-mode or `EBREAK`)
    /// and left its result in `a0`.
    pub const fn is_program_exit(self) -> bool {
        matches!(self, Self::EnvironmentCallFromMMode | Self::Breakpoint)
    }
}

impl From<u64> for TrapCause {
    fn from(code: u64) -> Self {
        Self::from_code(code)
    }
}

impl fmt::Display for TrapCause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Unknown(code) => write!(f, "Unknown({code})"),
            other => write!(f, "{other:?}"),
        }
    }
}
