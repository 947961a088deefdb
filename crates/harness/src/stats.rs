//! Branch prediction statistics.
//!
//! The hardware model counts retired branches and mispredictions itself and
//! reports both counters once, when the program halts. This module holds those
//! counters and derives the prediction accuracy shown in the verdict line.

use std::fmt;

/// Branch counters accumulated by the core over one program run.
///
/// `mispredicted <= total` is expected but not enforced; a larger misprediction
/// count simply yields an accuracy below zero.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub struct BranchStats {
    /// Branch instructions retired.
    pub total: u16,
    /// Retired branches whose direction was mispredicted.
    pub mispredicted: u16,
}

impl BranchStats {
    /// Creates a statistics record from the two hardware counters.
    pub const fn new(total: u16, mispredicted: u16) -> Self {
        Self {
            total,
            mispredicted,
        }
    }

    /// Prediction accuracy in percent: `100 - 100 * mispredicted / total`.
    ///
    /// With no branches retired the accuracy is `Undefined`, whatever the
    /// misprediction counter holds.
    pub fn accuracy(&self) -> Accuracy {
        if self.total == 0 {
            return Accuracy::Undefined;
        }
        let miss_rate = f64::from(self.mispredicted) / f64::from(self.total);
        Accuracy::Percent(100.0 - 100.0 * miss_rate)
    }
}

/// Branch prediction accuracy.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Accuracy {
    /// Accuracy in percent.
    Percent(f64),
    /// No branches retired, so the ratio has no value.
    Undefined,
}

impl Accuracy {
    /// Returns the percentage, or NaN when undefined.
    pub const fn as_f64(self) -> f64 {
        match self {
            Self::Percent(value) => value,
            Self::Undefined => f64::NAN,
        }
    }
}

impl fmt::Display for Accuracy {
    /// Formats with two fractional digits; `nan` when undefined.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Percent(value) => write!(f, "{value:.2}"),
            Self::Undefined => f.write_str("nan"),
        }
    }
}
