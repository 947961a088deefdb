//! Trace comparison.
//!
//! Only trace records take part: lines starting with `PC: `. Blank lines (the
//! model's `ECALL` line) and the verdict line are ignored, so a model's full
//! output can be compared with a reference trace directly.

use std::fmt;

/// Where the two traces first diverge.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mismatch {
    /// 1-based index of the trace record.
    pub record: usize,
    /// Record from the model trace, `None` if the model trace ended first.
    pub dut: Option<String>,
    /// Record from the reference trace, `None` if the reference ended first.
    pub reference: Option<String>,
}

/// Result of comparing a model trace with a reference trace.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TraceComparison {
    /// Records that matched before the first divergence.
    pub matched: usize,
    /// Records in the model trace.
    pub dut_records: usize,
    /// Records in the reference trace.
    pub reference_records: usize,
    /// First divergence, if any.
    pub first_mismatch: Option<Mismatch>,
}

impl TraceComparison {
    /// Whether both traces hold exactly the same records.
    pub const fn is_match(&self) -> bool {
        self.first_mismatch.is_none()
    }
}

impl fmt::Display for TraceComparison {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.first_mismatch {
            None => write!(f, "MATCH | RECORDS: {}", self.matched),
            Some(m) => {
                writeln!(
                    f,
                    "MISMATCH at record {} ({} matched, dut {} / reference {} records)",
                    m.record, self.matched, self.dut_records, self.reference_records
                )?;
                writeln!(f, "  dut:       {}", m.dut.as_deref().unwrap_or("<end of trace>"))?;
                write!(
                    f,
                    "  reference: {}",
                    m.reference.as_deref().unwrap_or("<end of trace>")
                )
            }
        }
    }
}

fn records(trace: &str) -> impl Iterator<Item = &str> {
    trace
        .lines()
        .map(|l| l.trim_end_matches('\r'))
        .filter(|l| l.starts_with("PC: "))
}

/// Compares two traces record by record.
pub fn compare_traces(dut: &str, reference: &str) -> TraceComparison {
    let dut_records = records(dut).count();
    let reference_records = records(reference).count();

    let mut matched = 0;
    let mut first_mismatch = None;
    let mut lhs = records(dut);
    let mut rhs = records(reference);
    loop {
        match (lhs.next(), rhs.next()) {
            (None, None) => break,
            (Some(a), Some(b)) if a == b => matched += 1,
            (a, b) => {
                first_mismatch = Some(Mismatch {
                    record: matched + 1,
                    dut: a.map(str::to_string),
                    reference: b.map(str::to_string),
                });
                break;
            }
        }
    }

    TraceComparison {
        matched,
        dut_records,
        reference_records,
        first_mismatch,
    }
}
