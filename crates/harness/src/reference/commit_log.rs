//! Spike commit-log conversion.
//!
//! A commit log line looks like one of:
//!
//! ```text
//! core   0: 3 0x0000000080000004 (0x00000513) x10 0x0000000000000000
//! core   0: 3 0x0000000080000010 (0x0000b083) x1  0x00000000deadbeef mem 0x0000000080001000
//! core   0: 3 0x0000000080000014 (0x0020b023) mem 0x0000000080001008 0x0000000000000002
//! ```
//!
//! Only the part of the log between Spike's ISA banner and the terminating `ecall`
//! belongs to the test program. Interactive debugger output (`(spike)` prompts,
//! `>>>>` disassembly headers and the line after them) and exception reports are
//! dropped. Instructions the core under test treats as no-ops (fences, the trap
//! vector entry) are recorded as NOPs so both traces agree.

use std::fs;
use std::path::Path;

use tracing::debug;

use crate::common::{HarnessError, Result};
use crate::isa::privileged::opcodes::{CSRR_A0_MHARTID, FENCE, LI_GP_2, NOP, TRAP_VECTOR_PC};
use crate::trace::{InstructionEvent, log_trace};

const PC_FIELD: usize = 3;
const INSTR_FIELD: usize = 4;
const REG_FIELD: usize = 5;
const REG_VALUE_FIELD: usize = 6;
const LOAD_ADDR_FIELD: usize = 8;
const STORE_ADDR_FIELD: usize = 6;
const STORE_VALUE_FIELD: usize = 7;

/// Extracts the test program's committed instructions from a Spike commit log.
///
/// Recording starts on the line after the one containing `isa_marker` and stops
/// at the first line mentioning `ecall`.
///
/// # Errors
///
/// Returns `HarnessError::Parse` with the 1-based line number when a recorded
/// line has no parsable pc or instruction word.
pub fn parse_commit_log(log: &str, isa_marker: &str) -> Result<Vec<InstructionEvent>> {
    let mut events = Vec::new();
    let mut recording = false;
    let mut skip_next = false;

    for (idx, line) in log.lines().enumerate() {
        if line.contains(isa_marker) {
            debug!(line = idx + 1, "commit log window opened");
            recording = true;
            continue;
        }
        if line.contains("ecall") {
            if recording {
                debug!(line = idx + 1, "commit log window closed");
            }
            recording = false;
        }
        if !recording || line.trim().is_empty() {
            continue;
        }

        let header = line.contains(">>>>");
        if skip_next || header || line.contains("(spike)") || line.contains("exception") {
            skip_next = header;
            continue;
        }

        events.push(parse_line(line, idx + 1)?);
    }

    Ok(events)
}

/// Parses one committed-instruction line.
fn parse_line(line: &str, lineno: usize) -> Result<InstructionEvent> {
    if line.contains("tval") {
        return Ok(InstructionEvent::new(TRAP_VECTOR_PC, NOP));
    }

    let fields: Vec<&str> = line.split_whitespace().collect();
    let field = |i: usize, what: &str| {
        fields
            .get(i)
            .copied()
            .ok_or_else(|| HarnessError::parse(lineno, format!("missing {what}")))
    };

    let pc = parse_hex(field(PC_FIELD, "pc")?, lineno)?;
    if line.contains(&format!("0x{FENCE:08x}")) {
        return Ok(InstructionEvent::new(pc, NOP));
    }

    let instr_text = field(INSTR_FIELD, "instruction word")?.trim_matches(['(', ')']);
    let instruction = u32::try_from(parse_hex(instr_text, lineno)?).map_err(|_| {
        HarnessError::parse(lineno, format!("instruction word out of range: {instr_text}"))
    })?;

    let mut event = InstructionEvent::new(pc, instruction);
    let is_mem = fields.contains(&"mem");

    if is_mem && fields.len() <= LOAD_ADDR_FIELD {
        let address = parse_hex(field(STORE_ADDR_FIELD, "store address")?, lineno)?;
        let value = parse_hex(field(STORE_VALUE_FIELD, "store value")?, lineno)?;
        return Ok(event.with_mem_write(address, value));
    }

    if fields.len() > REG_FIELD {
        if let Some(reg) = parse_gpr(fields[REG_FIELD]) {
            let value = parse_hex(field(REG_VALUE_FIELD, "register value")?, lineno)?;
            event = event.with_reg_write(reg, value);
            if is_mem {
                let address = parse_hex(field(LOAD_ADDR_FIELD, "load address")?, lineno)?;
                event = event.with_mem_access(address);
            }
        } else {
            debug!(line = lineno, dest = fields[REG_FIELD], "non-GPR destination not traced");
        }
    }

    Ok(event)
}

/// `x<n>` register names; FP and CSR destinations are not traced.
fn parse_gpr(name: &str) -> Option<u8> {
    name.strip_prefix('x')?.parse().ok().filter(|n| *n < 32)
}

fn parse_hex(text: &str, lineno: usize) -> Result<u64> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);
    u64::from_str_radix(digits, 16)
        .map_err(|e| HarnessError::parse(lineno, format!("bad hex value {text:?}: {e}")))
}

/// Replaces the riscv-tests boot sequence with NOPs.
///
/// The boot code between `csrr a0, mhartid` and `li gp, 2` probes CSRs the core
/// under test does not implement. Every record whose pc falls in that range is
/// dropped, and at the first such record one NOP per instruction slot of the
/// range is emitted at consecutive addresses. Logs without both markers are
/// returned unchanged.
pub fn fill_boot_sequence(events: Vec<InstructionEvent>) -> Vec<InstructionEvent> {
    let start = events.iter().find(|e| e.instruction == CSRR_A0_MHARTID).map(|e| e.pc);
    let end = events.iter().find(|e| e.instruction == LI_GP_2).map(|e| e.pc);
    let (Some(start), Some(end)) = (start, end) else {
        return events;
    };
    if end <= start {
        return events;
    }

    let slots = (end - start) / 4;
    let mut filled = Vec::with_capacity(events.len());
    let mut replaced = false;
    for event in events {
        if !(start..end).contains(&event.pc) {
            filled.push(event);
            continue;
        }
        if !replaced {
            filled.extend((0..slots).map(|i| InstructionEvent::new(event.pc + 4 * i, NOP)));
            replaced = true;
        }
    }
    debug!(start, end, slots, "boot sequence replaced with NOPs");
    filled
}

/// Converts a Spike commit log into trace text, one line per instruction.
///
/// # Errors
///
/// Same as [`parse_commit_log`].
pub fn convert_commit_log(log: &str, isa_marker: &str) -> Result<String> {
    let events = fill_boot_sequence(parse_commit_log(log, isa_marker)?);
    Ok(events.iter().map(log_trace).collect())
}

/// Converts the commit log at `input` and writes the trace to `output`.
///
/// Returns the number of trace lines written.
///
/// # Errors
///
/// Fails on I/O errors and on malformed commit lines.
pub fn convert_commit_log_file(input: &Path, output: &Path, isa_marker: &str) -> Result<usize> {
    let log = fs::read_to_string(input)?;
    let trace = convert_commit_log(&log, isa_marker)?;
    fs::write(output, &trace)?;
    Ok(trace.lines().count())
}
