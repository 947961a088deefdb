//! Ledger parsing and outcome tally.

use std::fmt;
use std::fs;
use std::path::Path;

use crate::common::Result;
use crate::report::ledger::{NOTE_PREFIXES, SWEEP_PREFIX};
use crate::verdict::Verdict;

/// One test entry read back from a ledger.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LedgerEntry {
    /// Test name.
    pub test: String,
    /// Parsed verdict; `None` when the model printed nothing or something else.
    pub verdict: Option<Verdict>,
}

/// Parses a ledger into its test entries.
///
/// The note, sweep headers and blank lines are skipped. The note is matched by
/// its leading words so ledgers carrying older note wordings read the same.
pub fn parse_ledger(text: &str) -> Vec<LedgerEntry> {
    text.lines()
        .filter(|line| !line.trim().is_empty())
        .filter(|line| !NOTE_PREFIXES.iter().any(|p| line.starts_with(p)))
        .filter(|line| !line.starts_with(SWEEP_PREFIX))
        .filter_map(|line| line.split_once(": "))
        .map(|(test, rest)| LedgerEntry {
            test: test.trim().to_string(),
            verdict: rest.trim_start().parse().ok(),
        })
        .collect()
}

/// Tally of outcomes over a ledger.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Summary {
    /// Tests that passed.
    pub pass: usize,
    /// Tests that failed.
    pub fail: usize,
    /// Tests stopped by an illegal instruction.
    pub illegal_instruction: usize,
    /// Tests stopped by a misaligned fetch, load or store.
    pub misaligned: usize,
    /// Tests with an undefined `a0` value or trap cause.
    pub undefined: usize,
    /// Tests without a verdict line.
    pub missing: usize,
}

impl Summary {
    /// Counts one outcome.
    pub const fn add(&mut self, verdict: Option<&Verdict>) {
        match verdict {
            Some(Verdict::Pass(_)) => self.pass += 1,
            Some(Verdict::Fail(_)) => self.fail += 1,
            Some(Verdict::IllegalInstruction(_)) => self.illegal_instruction += 1,
            Some(
                Verdict::InstructionAddrMisaligned(_)
                | Verdict::LoadAddrMisaligned(_)
                | Verdict::StoreAddrMisaligned(_),
            ) => self.misaligned += 1,
            Some(Verdict::UndefinedExitCode | Verdict::UndefinedError) => self.undefined += 1,
            None => self.missing += 1,
        }
    }

    /// Tallies a list of entries.
    pub fn from_entries<'a>(entries: impl IntoIterator<Item = &'a LedgerEntry>) -> Self {
        let mut summary = Self::default();
        for entry in entries {
            summary.add(entry.verdict.as_ref());
        }
        summary
    }

    /// Reads a ledger file and tallies it.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Io` if the file cannot be read.
    pub fn load(path: &Path) -> Result<(Vec<LedgerEntry>, Self)> {
        let entries = parse_ledger(&fs::read_to_string(path)?);
        let summary = Self::from_entries(&entries);
        Ok((entries, summary))
    }

    /// Number of tests counted.
    pub const fn total(&self) -> usize {
        self.pass + self.fail + self.illegal_instruction + self.misaligned + self.undefined + self.missing
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "TOTAL: {} | PASS: {} | FAIL: {} | ILLEGAL INSTRUCTION: {} | MISALIGNED: {} | UNDEFINED: {} | NO VERDICT: {}",
            self.total(),
            self.pass,
            self.fail,
            self.illegal_instruction,
            self.misaligned,
            self.undefined,
            self.missing
        )
    }
}
