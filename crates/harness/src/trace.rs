//! Instruction trace.
//!
//! Every retired instruction produces one line describing the architectural
//! state it changed. The line format is shared with the reference traces built
//! from Spike commit logs, so the two can be compared line by line:
//!
//! ```text
//! PC: 0x0000000080000004, INSTR: 0x00000513, REG x10: 0x0000000000000000
//! PC: 0x0000000080000010, INSTR: 0x0000b083, REG x1: 0x00000000deadbeef, MEM 0x0000000080001000
//! PC: 0x0000000080000014, INSTR: 0x0020b023, MEM 0x0000000080001008: 0x0000000000000002
//! ```

use std::fmt;
use std::io::{self, Write};

use crate::isa::privileged::opcodes::ECALL;

/// Write-back signals of one retired instruction.
///
/// At most one write-back path is reported per line: a register write takes
/// priority over a memory write. A register write may carry the address of the
/// load that produced it when `mem_access` is set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct InstructionEvent {
    /// Program counter of the retired instruction.
    pub pc: u64,
    /// Encoded instruction word.
    pub instruction: u32,
    /// Register file write enable.
    pub reg_write_enable: bool,
    /// Destination register index.
    pub reg_address: u8,
    /// Value written to the destination register.
    pub reg_value: u64,
    /// A load address is observable for this register write.
    pub mem_access: bool,
    /// Memory write enable.
    pub mem_write_enable: bool,
    /// Address of the memory access (load or store).
    pub mem_address: u64,
    /// Value stored to memory.
    pub mem_value: u64,
}

impl InstructionEvent {
    /// Creates an event with no write-back.
    pub const fn new(pc: u64, instruction: u32) -> Self {
        Self {
            pc,
            instruction,
            reg_write_enable: false,
            reg_address: 0,
            reg_value: 0,
            mem_access: false,
            mem_write_enable: false,
            mem_address: 0,
            mem_value: 0,
        }
    }

    /// Adds a register write-back.
    #[must_use]
    pub const fn with_reg_write(mut self, address: u8, value: u64) -> Self {
        self.reg_write_enable = true;
        self.reg_address = address;
        self.reg_value = value;
        self
    }

    /// Marks the register write-back as produced by a load from `address`.
    #[must_use]
    pub const fn with_mem_access(mut self, address: u64) -> Self {
        self.mem_access = true;
        self.mem_address = address;
        self
    }

    /// Adds a memory write.
    #[must_use]
    pub const fn with_mem_write(mut self, address: u64, value: u64) -> Self {
        self.mem_write_enable = true;
        self.mem_address = address;
        self.mem_value = value;
        self
    }
}

impl fmt::Display for InstructionEvent {
    /// Formats the trace line without its terminating newline.
    ///
    /// `ECALL` has no `PC`/`INSTR` prefix: the verdict line reports how the
    /// program ended.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.instruction != ECALL {
            write!(f, "PC: 0x{:016x}, INSTR: 0x{:08x}", self.pc, self.instruction)?;
        }

        if self.reg_write_enable {
            write!(f, ", REG x{}: 0x{:016x}", self.reg_address, self.reg_value)?;
            if self.mem_access {
                write!(f, ", MEM 0x{:016x}", self.mem_address)?;
            }
        } else if self.mem_write_enable {
            write!(
                f,
                ", MEM 0x{:016x}: 0x{:016x}",
                self.mem_address, self.mem_value
            )?;
        }
        Ok(())
    }
}

/// Formats one trace line, newline included.
pub fn log_trace(event: &InstructionEvent) -> String {
    format!("{event}\n")
}

/// Writes trace lines to an output stream.
#[derive(Debug)]
pub struct TraceWriter<W: Write> {
    inner: W,
    lines: u64,
}

impl<W: Write> TraceWriter<W> {
    /// Wraps an output stream.
    pub const fn new(inner: W) -> Self {
        Self { inner, lines: 0 }
    }

    /// Writes the trace line for `event`.
    ///
    /// # Errors
    ///
    /// Propagates write failures of the underlying stream.
    pub fn log(&mut self, event: &InstructionEvent) -> io::Result<()> {
        writeln!(self.inner, "{event}")?;
        self.lines += 1;
        Ok(())
    }

    /// Number of lines written so far.
    pub const fn lines(&self) -> u64 {
        self.lines
    }

    /// Flushes the underlying stream.
    ///
    /// # Errors
    ///
    /// Propagates flush failures.
    pub fn flush(&mut self) -> io::Result<()> {
        self.inner.flush()
    }

    /// Mutable access to the underlying stream, for interleaving other lines.
    pub const fn get_mut(&mut self) -> &mut W {
        &mut self.inner
    }

    /// Returns the underlying stream.
    pub fn into_inner(self) -> W {
        self.inner
    }
}
