//! Harness error definitions.
//!
//! The trace and verdict formatters are infallible: every input produces exactly
//! one line. Errors only arise at the edges of the harness:
//! 1. **I/O:** Reading logs and dumps, writing traces and ledgers.
//! 2. **Configuration:** Malformed JSON configuration.
//! 3. **Parsing:** Malformed commit-log, dump, catalog or verdict lines.

use thiserror::Error;

/// Errors produced by the harness.
#[derive(Debug, Error)]
pub enum HarnessError {
    /// An underlying read or write failed.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The JSON configuration could not be deserialized.
    #[error("invalid configuration: {0}")]
    Config(#[from] serde_json::Error),

    /// A line of textual input could not be parsed.
    ///
    /// `line` is 1-based; zero means the input was a single value rather than a file.
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number of the offending input.
        line: usize,
        /// Description of what was expected.
        message: String,
    },
}

impl HarnessError {
    /// Creates a parse error for the given 1-based line.
    pub fn parse(line: usize, message: impl Into<String>) -> Self {
        Self::Parse {
            line,
            message: message.into(),
        }
    }
}

/// Result alias used across the harness.
pub type Result<T> = std::result::Result<T, HarnessError>;
