//! RISC-V testbench harness CLI.
//!
//! This binary exposes the harness operations a regression flow needs. It performs:
//! 1. **Verdict:** Classify exit signals into the one-line pass/fail summary.
//! 2. **Reference:** Convert a Spike commit log into a reference trace and compare traces.
//! 3. **Preparation:** Turn `objdump -s` dumps into memory images and list catalog tests.
//! 4. **Summary:** Tally the outcomes recorded in a results ledger.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt};

use rvtb_core::config::Config;
use rvtb_core::reference::{commit_log, compare_traces};
use rvtb_core::report::{Summary, TestCatalog, catalog};
use rvtb_core::{check, memimage};

#[derive(Parser, Debug)]
#[command(
    name = "rvtb",
    author,
    version,
    about = "RISC-V core testbench harness",
    long_about = "Verdicts, reference traces and reports for RISC-V core regression runs.\n\nExamples:\n  rvtb check --a0 0 --mcause 11 --branch-total 100 --branch-mispredicted 25\n  rvtb reference trace.log -o spike_log_trace/add-log-trace.log\n  rvtb compare dut.log spike_log_trace/add-log-trace.log\n  rvtb mem-image test/tests/dis-asm/riscv-tests test/tests/instr/riscv-tests"
)]
struct Cli {
    /// JSON configuration file; built-in defaults are used when omitted.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Increase log verbosity (-v debug, -vv trace). `RUST_LOG` overrides.
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Print the verdict line for the exit signals of one run.
    Check {
        /// Value left in a0.
        #[arg(long, allow_hyphen_values = true)]
        a0: i8,

        /// Trap cause reported in mcause.
        #[arg(long)]
        mcause: u64,

        /// Branch instructions retired.
        #[arg(long)]
        branch_total: u16,

        /// Mispredicted branches among them.
        #[arg(long)]
        branch_mispredicted: u16,
    },

    /// Convert a Spike commit log into a reference trace.
    Reference {
        /// Commit log written by `spike --log-commits`.
        log: PathBuf,

        /// Output trace file; stdout when omitted.
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Compare a model trace with a reference trace. Exits 1 on divergence.
    Compare {
        /// Trace printed by the model.
        dut: PathBuf,

        /// Reference trace.
        reference: PathBuf,
    },

    /// Convert objdump section dumps into memory images.
    MemImage {
        /// A dump file, or a directory of `.txt` dumps.
        input: PathBuf,

        /// Output image file, or output directory when `input` is a directory.
        output: PathBuf,
    },

    /// List the tests of a `name: path` test list, or of a group list.
    Tests {
        /// Master test list.
        list: PathBuf,

        /// Group list restricting the output to its tests.
        #[arg(short, long)]
        group: Option<PathBuf>,
    },

    /// Tally the outcomes recorded in a results ledger.
    Summarize {
        /// Results ledger.
        ledger: PathBuf,

        /// Also list every test that did not pass.
        #[arg(long)]
        failures: bool,
    },
}

fn main() {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    match run(cli) {
        Ok(code) => process::exit(code),
        Err(e) => {
            eprintln!("[!] {e:#}");
            process::exit(1);
        }
    }
}

/// Installs the stderr log subscriber; stdout carries only harness output.
fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    fmt::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .compact()
        .init();
}

fn load_config(path: Option<&Path>) -> Result<Config> {
    let Some(path) = path else {
        return Ok(Config::default());
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("could not read config '{}'", path.display()))?;
    Config::from_json(&json).with_context(|| format!("invalid config '{}'", path.display()))
}

/// Runs one subcommand and returns the process exit code.
fn run(cli: Cli) -> Result<i32> {
    let config = load_config(cli.config.as_deref())?;
    let mut stdout = io::stdout().lock();

    match cli.command {
        Commands::Check {
            a0,
            mcause,
            branch_total,
            branch_mispredicted,
        } => {
            stdout.write_all(check(a0, mcause, branch_total, branch_mispredicted).as_bytes())?;
        }

        Commands::Reference { log, output } => {
            let marker = &config.trace.isa_marker;
            if let Some(output) = output {
                let lines = commit_log::convert_commit_log_file(&log, &output, marker)
                    .with_context(|| format!("could not convert '{}'", log.display()))?;
                tracing::info!(lines, output = %output.display(), "reference trace written");
            } else {
                let text = fs::read_to_string(&log)
                    .with_context(|| format!("could not read '{}'", log.display()))?;
                stdout.write_all(commit_log::convert_commit_log(&text, marker)?.as_bytes())?;
            }
        }

        Commands::Compare { dut, reference } => {
            let dut_text = fs::read_to_string(&dut)
                .with_context(|| format!("could not read '{}'", dut.display()))?;
            let ref_text = fs::read_to_string(&reference)
                .with_context(|| format!("could not read '{}'", reference.display()))?;
            let comparison = compare_traces(&dut_text, &ref_text);
            writeln!(stdout, "{comparison}")?;
            if !comparison.is_match() {
                return Ok(1);
            }
        }

        Commands::MemImage { input, output } => {
            if input.is_dir() {
                let files = memimage::convert_dir(&input, &output)
                    .with_context(|| format!("could not convert '{}'", input.display()))?;
                writeln!(stdout, "{files} memory images written to {}", output.display())?;
            } else {
                let words = memimage::convert_file(&input, &output)
                    .with_context(|| format!("could not convert '{}'", input.display()))?;
                writeln!(stdout, "{words} words written to {}", output.display())?;
            }
        }

        Commands::Tests { list, group } => {
            let tests = TestCatalog::load(&list)
                .with_context(|| format!("could not read test list '{}'", list.display()))?;
            match group {
                Some(group) => {
                    let text = fs::read_to_string(&group)
                        .with_context(|| format!("could not read group '{}'", group.display()))?;
                    for name in catalog::parse_group(&text) {
                        match tests.get(&name) {
                            Some(path) => writeln!(stdout, "{name}: {}", path.display())?,
                            None => tracing::warn!(test = %name, "group test missing from test list"),
                        }
                    }
                }
                None => {
                    for name in tests.names() {
                        writeln!(stdout, "{name}")?;
                    }
                }
            }
        }

        Commands::Summarize { ledger, failures } => {
            let (entries, summary) = Summary::load(&ledger)
                .with_context(|| format!("could not read ledger '{}'", ledger.display()))?;
            if failures {
                for entry in entries.iter().filter(|e| !e.verdict.is_some_and(|v| v.is_pass())) {
                    match entry.verdict {
                        Some(v) => writeln!(stdout, "{}: {}", entry.test, v.status())?,
                        None => writeln!(stdout, "{}: NO VERDICT", entry.test)?,
                    }
                }
            }
            writeln!(stdout, "{summary}")?;
        }
    }

    stdout.flush()?;
    Ok(0)
}
