//! Results ledger.
//!
//! The ledger collects the first output line of every test run:
//!
//! ```text
//! rv64ui-p-add:                PASS | TOTAL BRANCH INSTRUCTIONS:   245 | TOTAL MISPREDICTED BRANCHES:    31 | ACCURACY: 87.35%
//! rv64um-p-mul:                ILLEGAL INSTRUCTION | TOTAL BRANCH INSTRUCTIONS:     2 | TOTAL MISPREDICTED BRANCHES:     1 | ACCURACY: 50.00%
//! ```

use std::io::{self, Write};

use crate::config::ReportConfig;

/// Note written at the top of a ledger.
pub const NOTE: [&str; 2] = [
    "NOTE: ILLEGAL INSTRUCTION REFERS TO INSTRUCTIONS THAT WERE NOT (YET) IMPLEMENTED IN THE CORE UNDER TEST. THE SYSTEM RECOGNIZES THOSE INSTRUCTIONS AS ILLEGAL.",
    "THE LIST INCLUDES, BUT IS NOT LIMITED TO, MUL, DIV, AND FENCE INSTRUCTIONS.",
];

/// Leading words of the note lines, shared by every wording of the note.
pub const NOTE_PREFIXES: [&str; 2] = ["NOTE:", "THE LIST INCLUDES"];

/// Prefix of the header that separates cache configurations in a sweep.
pub const SWEEP_PREFIX: &str = "CACHE_LINE_WIDTH:";

/// Writes a results ledger.
#[derive(Debug)]
pub struct Ledger<W: Write> {
    out: W,
    name_width: usize,
    entries: usize,
}

impl<W: Write> Ledger<W> {
    /// Starts a ledger, writing the note when the configuration asks for it.
    ///
    /// # Errors
    ///
    /// Every ledger operation propagates write failures of `out`.
    pub fn new(mut out: W, config: &ReportConfig) -> io::Result<Self> {
        if config.include_note {
            for line in NOTE {
                writeln!(out, "{line}")?;
            }
        }
        Ok(Self {
            out,
            name_width: config.name_width,
            entries: 0,
        })
    }

    /// Records one test: its padded name and the first line of its output.
    ///
    /// A test that printed nothing gets an empty entry.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn record(&mut self, test: &str, output: &str) -> io::Result<()> {
        let label = format!("{test}: ");
        let first = output.lines().next().unwrap_or_default();
        writeln!(self.out, "{label:<width$}{first}", width = self.name_width)?;
        self.entries += 1;
        Ok(())
    }

    /// Writes the header that opens a cache configuration in a sweep.
    ///
    /// # Errors
    ///
    /// Propagates write failures.
    pub fn sweep_header(&mut self, line_width_bits: u32, set_count: u32) -> io::Result<()> {
        write!(
            self.out,
            "\n\n{SWEEP_PREFIX} {line_width_bits} bits, SET_COUNT: {set_count}\n"
        )
    }

    /// Number of test entries written.
    pub const fn entries(&self) -> usize {
        self.entries
    }

    /// Flushes and returns the underlying stream.
    ///
    /// # Errors
    ///
    /// Propagates flush failures.
    pub fn finish(mut self) -> io::Result<W> {
        self.out.flush()?;
        Ok(self.out)
    }
}
