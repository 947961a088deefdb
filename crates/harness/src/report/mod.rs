//! Test reporting.
//!
//! This module covers everything around a regression run except the simulation
//! itself. It provides:
//! 1. **Catalog:** Test lists mapping test names to memory image paths.
//! 2. **Ledger:** The results file with one verdict line per test.
//! 3. **Summary:** Reading a ledger back and tallying its outcomes.

/// Test lists.
pub mod catalog;

/// Results ledger writer.
pub mod ledger;

/// Ledger parsing and outcome tally.
pub mod summary;

pub use catalog::TestCatalog;
pub use ledger::Ledger;
pub use summary::{LedgerEntry, Summary, parse_ledger};
