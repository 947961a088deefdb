//! Configuration system for the testbench harness.
//!
//! This module defines the configuration structures used to parameterize the
//! harness. It provides:
//! 1. **Defaults:** Baseline constants of the regression flow (simulation
//!    length, reset duration, Spike ISA banner, ledger column width).
//! 2. **Structures:** One section each for the clock driver, tracing and reporting.
//!
//! Configuration is supplied as JSON; every field is optional and falls back to
//! its default. Use `Config::default()` when no file is given.

use serde::Deserialize;

use crate::common::Result;

/// Default configuration constants for the harness.
mod defaults {
    /// Simulation time limit in half clock periods.
    pub const MAX_SIM_TIME: u64 = 10_000_000;

    /// Reset is held for this many half clock periods after time zero.
    pub const RESET_DURATION: u64 = 100;

    /// ISA banner Spike prints before the first committed instruction.
    pub const ISA_MARKER: &str = "rv64i2p1_m2p0_a2p1_f2p2_d2p2_zicsr2p0_zifencei2p0_zmmul1p0";

    /// Width of the test name column in the results ledger, `": "` included.
    pub const NAME_WIDTH: usize = 29;
}

/// Root configuration structure containing all harness settings.
///
/// # Examples
///
/// ```
/// use rvtb_core::config::Config;
///
/// let config = Config::default();
/// assert_eq!(config.driver.max_sim_time, 10_000_000);
/// assert!(config.trace.enabled);
/// ```
///
/// Deserializing a partial JSON document:
///
/// ```
/// use rvtb_core::config::Config;
///
/// let config = Config::from_json(r#"{ "driver": { "reset_duration": 10 } }"#).unwrap();
/// assert_eq!(config.driver.reset_duration, 10);
/// assert_eq!(config.driver.max_sim_time, 10_000_000);
/// assert_eq!(config.report.name_width, 29);
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct Config {
    /// Clock driver settings
    #[serde(default)]
    pub driver: DriverConfig,
    /// Trace output and reference conversion settings
    #[serde(default)]
    pub trace: TraceConfig,
    /// Results ledger settings
    #[serde(default)]
    pub report: ReportConfig,
}

impl Config {
    /// Parses a JSON configuration document.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Config` for malformed JSON or mistyped fields.
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }
}

/// Clock driver settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DriverConfig {
    /// Simulation stops after this many half clock periods even if the model never finishes
    #[serde(default = "DriverConfig::default_max_sim_time")]
    pub max_sim_time: u64,

    /// Reset is asserted while simulation time is below this value
    #[serde(default = "DriverConfig::default_reset_duration")]
    pub reset_duration: u64,
}

impl DriverConfig {
    fn default_max_sim_time() -> u64 {
        defaults::MAX_SIM_TIME
    }

    fn default_reset_duration() -> u64 {
        defaults::RESET_DURATION
    }
}

impl Default for DriverConfig {
    fn default() -> Self {
        Self {
            max_sim_time: defaults::MAX_SIM_TIME,
            reset_duration: defaults::RESET_DURATION,
        }
    }
}

/// Trace settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TraceConfig {
    /// Write a trace line for every retired instruction
    #[serde(default = "TraceConfig::default_enabled")]
    pub enabled: bool,

    /// Commit-log line after which Spike's trace of the test program begins
    #[serde(default = "TraceConfig::default_isa_marker")]
    pub isa_marker: String,
}

impl TraceConfig {
    fn default_enabled() -> bool {
        true
    }

    fn default_isa_marker() -> String {
        defaults::ISA_MARKER.to_string()
    }
}

impl Default for TraceConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            isa_marker: defaults::ISA_MARKER.to_string(),
        }
    }
}

/// Results ledger settings.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Column width of the test name, including the `": "` separator
    #[serde(default = "ReportConfig::default_name_width")]
    pub name_width: usize,

    /// Start the ledger with the note explaining illegal-instruction results
    #[serde(default = "ReportConfig::default_include_note")]
    pub include_note: bool,
}

impl ReportConfig {
    fn default_name_width() -> usize {
        defaults::NAME_WIDTH
    }

    fn default_include_note() -> bool {
        true
    }
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            name_width: defaults::NAME_WIDTH,
            include_note: true,
        }
    }
}
