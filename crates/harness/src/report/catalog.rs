//! Test lists.
//!
//! The master list maps each test to the memory image the model loads, one
//! `name: path` pair per line. Group lists (one per test suite) hold bare test
//! names.

use std::fs;
use std::path::{Path, PathBuf};

use tracing::warn;

use crate::common::Result;

/// Ordered mapping from test name to memory image path.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TestCatalog {
    entries: Vec<(String, PathBuf)>,
}

impl TestCatalog {
    /// Parses a `name: path` list.
    ///
    /// Each line is split at its first colon and both halves are trimmed. Lines
    /// without a colon are skipped with a warning, blank lines silently. A name
    /// listed twice keeps its first position and its last path.
    pub fn parse(text: &str) -> Self {
        let mut catalog = Self::default();
        for (idx, raw) in text.lines().enumerate() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }
            let Some((name, path)) = line.split_once(':') else {
                warn!(line = idx + 1, text = line, "no colon found in test list line");
                continue;
            };
            catalog.insert(name.trim(), PathBuf::from(path.trim()));
        }
        catalog
    }

    /// Reads and parses a `name: path` list file.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Io` if the file cannot be read.
    pub fn load(path: &Path) -> Result<Self> {
        Ok(Self::parse(&fs::read_to_string(path)?))
    }

    fn insert(&mut self, name: &str, path: PathBuf) {
        match self.entries.iter_mut().find(|(n, _)| n == name) {
            Some(entry) => entry.1 = path,
            None => self.entries.push((name.to_string(), path)),
        }
    }

    /// Memory image path of `name`.
    pub fn get(&self, name: &str) -> Option<&Path> {
        self.entries
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, p)| p.as_path())
    }

    /// Test names in list order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(n, _)| n.as_str())
    }

    /// `(name, path)` pairs in list order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Path)> {
        self.entries.iter().map(|(n, p)| (n.as_str(), p.as_path()))
    }

    /// Number of tests.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the list holds no tests.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parses a group list: one test name per line, blank lines ignored.
pub fn parse_group(text: &str) -> Vec<String> {
    text.lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(str::to_string)
        .collect()
}
