//! Clock driver: owns simulation time and drives the model under test.
//!
//! The hardware model is opaque. It is reset for a fixed number of half periods,
//! then clocked until it reports that it has finished or the time limit runs out.
//! Simulation time and the rising-edge count live in `ClockDriver` rather than in
//! globals, so several drivers can run side by side.

use std::io::{self, Write};

use tracing::{debug, info, warn};

use crate::common::Result;
use crate::config::{Config, DriverConfig};
use crate::isa::privileged::TrapCause;
use crate::trace::{InstructionEvent, TraceWriter};
use crate::verdict::{ExitStatus, Verdict};

/// Something the model reports during one evaluation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DutEvent {
    /// An instruction retired.
    Retired(InstructionEvent),
    /// The program under test stopped.
    Halted(ExitStatus),
}

/// A clocked hardware model, typically a generated RTL simulation.
pub trait Dut {
    /// Drives the asynchronous reset input.
    fn set_reset(&mut self, asserted: bool);

    /// Drives the clock input.
    fn set_clock(&mut self, high: bool);

    /// Evaluates the model after its inputs changed, appending what it reports.
    fn eval(&mut self, events: &mut Vec<DutEvent>);

    /// Whether the model requested the end of simulation.
    fn finished(&self) -> bool;
}

/// Routes model events to the trace and verdict output.
#[derive(Debug)]
pub struct Monitor<W: Write> {
    out: TraceWriter<W>,
    trace_enabled: bool,
    retired: u64,
    verdict: Option<Verdict>,
}

impl<W: Write> Monitor<W> {
    /// Creates a monitor writing to `out`. Retired instructions are only
    /// written when `trace_enabled` is set; the verdict line always is.
    pub const fn new(out: W, trace_enabled: bool) -> Self {
        Self {
            out: TraceWriter::new(out),
            trace_enabled,
            retired: 0,
            verdict: None,
        }
    }

    /// Handles one model event.
    ///
    /// # Errors
    ///
    /// Propagates write failures of the output stream.
    pub fn handle(&mut self, event: &DutEvent) -> io::Result<()> {
        match event {
            DutEvent::Retired(inst) => {
                if self.trace_enabled {
                    self.out.log(inst)?;
                }
                self.retired += 1;
            }
            DutEvent::Halted(status) => {
                let verdict = status.verdict();
                debug!(a0 = status.a0, cause = %TrapCause::from_code(status.cause), "program halted");
                verdict.write_to(self.out.get_mut())?;
                self.verdict = Some(verdict);
            }
        }
        Ok(())
    }

    /// Flushes the output stream.
    ///
    /// # Errors
    ///
    /// Propagates flush failures.
    pub fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    /// Instructions retired so far.
    pub const fn retired(&self) -> u64 {
        self.retired
    }

    /// Verdict of the last halt, if the program stopped.
    pub const fn verdict(&self) -> Option<Verdict> {
        self.verdict
    }

    /// Returns the output stream.
    pub fn into_inner(self) -> W {
        self.out.into_inner()
    }
}

/// Outcome of a complete run.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RunSummary {
    /// Half clock periods simulated.
    pub sim_time: u64,
    /// Rising clock edges driven.
    pub posedges: u64,
    /// Instructions the model retired.
    pub retired: u64,
    /// Verdict, if the program stopped.
    pub verdict: Option<Verdict>,
    /// The time limit ended the run before the model finished.
    pub timed_out: bool,
}

/// Reset and clock driver.
#[derive(Debug, Clone)]
pub struct ClockDriver {
    config: DriverConfig,
    sim_time: u64,
    posedges: u64,
    clock: bool,
    events: Vec<DutEvent>,
}

impl ClockDriver {
    /// Creates a driver at time zero with the clock low.
    pub fn new(config: &DriverConfig) -> Self {
        Self {
            config: config.clone(),
            sim_time: 0,
            posedges: 0,
            clock: false,
            events: Vec::new(),
        }
    }

    /// Creates a driver from the root configuration.
    pub fn from_config(config: &Config) -> Self {
        Self::new(&config.driver)
    }

    /// Half clock periods simulated so far.
    pub const fn sim_time(&self) -> u64 {
        self.sim_time
    }

    /// Rising clock edges driven so far.
    pub const fn posedges(&self) -> u64 {
        self.posedges
    }

    /// Current level of the clock.
    pub const fn clock(&self) -> bool {
        self.clock
    }

    /// Whether reset is asserted at the current simulation time.
    pub const fn in_reset(&self) -> bool {
        self.sim_time < self.config.reset_duration
    }

    /// Advances simulation by half a clock period.
    ///
    /// Drives reset, toggles the clock, evaluates the model and appends whatever
    /// it reports to `events`.
    pub fn step<D: Dut + ?Sized>(&mut self, dut: &mut D, events: &mut Vec<DutEvent>) {
        let reset = self.in_reset();
        if self.sim_time == self.config.reset_duration {
            debug!(sim_time = self.sim_time, "reset released");
        }
        dut.set_reset(reset);

        self.clock = !self.clock;
        dut.set_clock(self.clock);
        dut.eval(events);

        if self.clock {
            self.posedges += 1;
        }
        self.sim_time += 1;
    }

    /// Runs the model until it finishes or the time limit is reached.
    ///
    /// # Errors
    ///
    /// Returns `HarnessError::Io` if the monitor cannot write its output. The
    /// driver stops at that point and keeps the events not yet handled; calling
    /// `run` again hands them to the monitor before simulation resumes.
    pub fn run<D: Dut + ?Sized, W: Write>(
        &mut self,
        dut: &mut D,
        monitor: &mut Monitor<W>,
    ) -> Result<RunSummary> {
        // Events left undelivered by an interrupted run go out first.
        let mut events = std::mem::take(&mut self.events);
        let mut delivered = deliver(&mut events, monitor);

        while delivered.is_ok() && self.sim_time < self.config.max_sim_time && !dut.finished() {
            self.step(dut, &mut events);
            delivered = deliver(&mut events, monitor);
        }
        self.events = events;
        delivered?;
        monitor.flush()?;

        let timed_out = !dut.finished();
        if timed_out {
            warn!(
                sim_time = self.sim_time,
                "simulation time limit reached before the model finished"
            );
        }

        let summary = RunSummary {
            sim_time: self.sim_time,
            posedges: self.posedges,
            retired: monitor.retired(),
            verdict: monitor.verdict(),
            timed_out,
        };
        info!(
            sim_time = summary.sim_time,
            posedges = summary.posedges,
            retired = summary.retired,
            "simulation finished"
        );
        Ok(summary)
    }
}

/// Hands buffered events to the monitor in order, keeping those after a failure.
fn deliver<W: Write>(events: &mut Vec<DutEvent>, monitor: &mut Monitor<W>) -> io::Result<()> {
    let mut handled = 0;
    let result = events.iter().try_for_each(|event| {
        monitor.handle(event)?;
        handled += 1;
        Ok::<(), io::Error>(())
    });
    let _ = events.drain(..handled);
    result
}
