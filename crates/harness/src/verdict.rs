//! End-of-run verdict.
//!
//! When the program under test stops, the core reports the value left in `a0`,
//! the trap cause from `mcause`, and its branch counters. This module classifies
//! those signals and renders the one-line summary that the results ledger and
//! downstream log scrapers consume.
//!
//! Classification rules:
//! 1. **Program exit** (`ECALL` from M-mode or `EBREAK`): `a0 == 0` passes,
//!    `a0 == 1` fails, any other value is undefined.
//! 2. **Illegal instruction and misaligned accesses**: reported by name.
//! 3. **Anything else**: undefined error.
//!
//! The line layout is a format contract; counts are right-aligned in five
//! columns and accuracy carries two fractional digits.

use std::fmt;
use std::io::{self, Write};
use std::str::FromStr;

use crate::common::HarnessError;
use crate::isa::privileged::TrapCause;
use crate::stats::BranchStats;

/// Line printed when the program exits with a value other than 0 or 1 in `a0`.
pub const UNDEFINED_EXIT_CODE: &str = "UNDEFINED value stored in a0 register";

/// Line printed for trap causes the harness does not classify.
pub const UNDEFINED_ERROR: &str = "UNDEFINED ERROR";

/// Classified outcome of one program run.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Verdict {
    /// Program exited with `a0 == 0`.
    Pass(BranchStats),
    /// Program exited with `a0 == 1`.
    Fail(BranchStats),
    /// Program exited with any other `a0` value.
    UndefinedExitCode,
    /// Core raised an illegal instruction exception.
    IllegalInstruction(BranchStats),
    /// Core raised an instruction address misaligned exception.
    InstructionAddrMisaligned(BranchStats),
    /// Core raised a load address misaligned exception.
    LoadAddrMisaligned(BranchStats),
    /// Core raised a store address misaligned exception.
    StoreAddrMisaligned(BranchStats),
    /// Any other trap cause.
    UndefinedError,
}

impl Verdict {
    /// Classifies the exit signals of one run.
    pub const fn classify(exit_code: i8, cause: TrapCause, branches: BranchStats) -> Self {
        if cause.is_program_exit() {
            return match exit_code {
                0 => Self::Pass(branches),
                1 => Self::Fail(branches),
                _ => Self::UndefinedExitCode,
            };
        }
        match cause {
            TrapCause::IllegalInstruction => Self::IllegalInstruction(branches),
            TrapCause::InstructionAddressMisaligned => Self::InstructionAddrMisaligned(branches),
            TrapCause::LoadAddressMisaligned => Self::LoadAddrMisaligned(branches),
            TrapCause::StoreAddressMisaligned => Self::StoreAddrMisaligned(branches),
            _ => Self::UndefinedError,
        }
    }

    /// Leading status token of the verdict line.
    pub const fn status(&self) -> &'static str {
        match self {
            Self::Pass(_) => "PASS",
            Self::Fail(_) => "FAIL",
            Self::UndefinedExitCode => UNDEFINED_EXIT_CODE,
            Self::IllegalInstruction(_) => "ILLEGAL INSTRUCTION",
            Self::InstructionAddrMisaligned(_) => "INSTRUCTION ADDR MISALIGNED",
            Self::LoadAddrMisaligned(_) => "LOAD ADDR MISALIGNED",
            Self::StoreAddrMisaligned(_) => "STORE ADDR MISALIGNED",
            Self::UndefinedError => UNDEFINED_ERROR,
        }
    }

    /// Branch statistics, for outcomes that report them.
    pub const fn branches(&self) -> Option<BranchStats> {
        match self {
            Self::Pass(b)
            | Self::Fail(b)
            | Self::IllegalInstruction(b)
            | Self::InstructionAddrMisaligned(b)
            | Self::LoadAddrMisaligned(b)
            | Self::StoreAddrMisaligned(b) => Some(*b),
            Self::UndefinedExitCode | Self::UndefinedError => None,
        }
    }

    /// Whether the run passed.
    pub const fn is_pass(&self) -> bool {
        matches!(self, Self::Pass(_))
    }

    /// Writes the verdict line, newline included.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn write_to<W: Write>(&self, out: &mut W) -> io::Result<()> {
        writeln!(out, "{self}")
    }

    fn from_status(status: &str, branches: BranchStats) -> Option<Self> {
        Some(match status {
            "PASS" => Self::Pass(branches),
            "FAIL" => Self::Fail(branches),
            "ILLEGAL INSTRUCTION" => Self::IllegalInstruction(branches),
            "INSTRUCTION ADDR MISALIGNED" => Self::InstructionAddrMisaligned(branches),
            "LOAD ADDR MISALIGNED" => Self::LoadAddrMisaligned(branches),
            "STORE ADDR MISALIGNED" => Self::StoreAddrMisaligned(branches),
            _ => return None,
        })
    }
}

impl fmt::Display for Verdict {
    /// Formats the verdict line without its terminating newline.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.branches() {
            Some(b) => write!(
                f,
                "{} | TOTAL BRANCH INSTRUCTIONS: {:>5} | TOTAL MISPREDICTED BRANCHES: {:>5} | ACCURACY: {}%",
                self.status(),
                b.total,
                b.mispredicted,
                b.accuracy()
            ),
            None => f.write_str(self.status()),
        }
    }
}

impl FromStr for Verdict {
    type Err = HarnessError;

    /// Parses a verdict line back into an outcome.
    ///
    /// Accuracy is derived from the counts, so its field is checked for shape
    /// only.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim_end_matches(['\r', '\n']);
        if line == UNDEFINED_EXIT_CODE {
            return Ok(Self::UndefinedExitCode);
        }
        if line == UNDEFINED_ERROR {
            return Ok(Self::UndefinedError);
        }

        let fields: Vec<&str> = line.split(" | ").collect();
        let [status, total, mispredicted, accuracy] = fields.as_slice() else {
            return Err(HarnessError::parse(0, format!("not a verdict line: {line:?}")));
        };

        let total = parse_count(total, "TOTAL BRANCH INSTRUCTIONS:")?;
        let mispredicted = parse_count(mispredicted, "TOTAL MISPREDICTED BRANCHES:")?;
        if !(accuracy.starts_with("ACCURACY: ") && accuracy.ends_with('%')) {
            return Err(HarnessError::parse(
                0,
                format!("malformed accuracy field: {accuracy:?}"),
            ));
        }

        Self::from_status(status, BranchStats::new(total, mispredicted))
            .ok_or_else(|| HarnessError::parse(0, format!("unknown verdict status: {status:?}")))
    }
}

fn parse_count(field: &str, label: &str) -> Result<u16, HarnessError> {
    field
        .strip_prefix(label)
        .and_then(|n| n.trim().parse().ok())
        .ok_or_else(|| HarnessError::parse(0, format!("expected `{label} <count>`, got {field:?}")))
}

/// Exit signals the core reports when the program under test stops.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ExitStatus {
    /// Value of `a0` (low byte).
    pub a0: i8,
    /// Raw `mcause` value.
    pub cause: u64,
    /// Branch counters at the time of the stop.
    pub branches: BranchStats,
}

impl ExitStatus {
    /// Classifies this exit.
    pub fn verdict(&self) -> Verdict {
        Verdict::classify(self.a0, TrapCause::from_code(self.cause), self.branches)
    }
}

/// Classifies the exit signals and formats the verdict line, newline included.
///
/// # Arguments
///
/// * `exit_code` - Value left in `a0`.
/// * `trap_cause` - Raw `mcause` value.
/// * `branch_total` - Branch instructions retired.
/// * `branch_mispredicted` - Mispredicted branches among them.
pub fn check(exit_code: i8, trap_cause: u64, branch_total: u16, branch_mispredicted: u16) -> String {
    let verdict = Verdict::classify(
        exit_code,
        TrapCause::from_code(trap_cause),
        BranchStats::new(branch_total, branch_mispredicted),
    );
    format!("{verdict}\n")
}
