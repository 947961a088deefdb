//! # Clock Driver Tests
//!
//! The driver is exercised against a scripted model for end-to-end runs and
//! against a `mockall` double to pin down the exact input sequence.

use std::io::{self, Write};

use mockall::predicate::eq;
use pretty_assertions::assert_eq;
use rvtb_core::HarnessError;
use rvtb_core::config::{Config, DriverConfig};
use rvtb_core::sim::{ClockDriver, Dut, DutEvent, Monitor};
use rvtb_core::stats::BranchStats;
use rvtb_core::trace::InstructionEvent;
use rvtb_core::verdict::{ExitStatus, Verdict};

use crate::common::harness::{ScriptedDut, init_tracing, test_config};
use crate::common::mocks::dut::MockDut;

fn program() -> Vec<InstructionEvent> {
    vec![
        InstructionEvent::new(0x8000_0000, 0x0000_0513).with_reg_write(10, 0),
        InstructionEvent::new(0x8000_0004, 0x0020_b023).with_mem_write(0x8000_1008, 2),
        InstructionEvent::new(0x8000_0008, 0x0000_b083)
            .with_reg_write(1, 2)
            .with_mem_access(0x8000_1008),
    ]
}

fn pass_exit() -> ExitStatus {
    ExitStatus {
        a0: 0,
        cause: 11,
        branches: BranchStats::new(100, 25),
    }
}

#[test]
fn test_run_to_completion() {
    let config = test_config();
    let mut driver = ClockDriver::from_config(&config);
    let mut dut = ScriptedDut::new(program()).halting_with(pass_exit());
    let mut monitor = Monitor::new(Vec::new(), config.trace.enabled);

    let summary = driver.run(&mut dut, &mut monitor).unwrap();

    assert!(!summary.timed_out);
    assert_eq!(summary.retired, 3);
    assert_eq!(summary.verdict, Some(Verdict::Pass(BranchStats::new(100, 25))));
    // Out of reset at t=100; rising edges at t=100, 102, 104 retire, t=106 halts.
    assert_eq!(summary.sim_time, 107);
    assert_eq!(summary.posedges, 54);
    assert_eq!(dut.active_posedges, 4);

    let output = String::from_utf8(monitor.into_inner()).unwrap();
    assert_eq!(
        output,
        "PC: 0x0000000080000000, INSTR: 0x00000513, REG x10: 0x0000000000000000\n\
         PC: 0x0000000080000004, INSTR: 0x0020b023, MEM 0x0000000080001008: 0x0000000000000002\n\
         PC: 0x0000000080000008, INSTR: 0x0000b083, REG x1: 0x0000000000000002, MEM 0x0000000080001008\n\
         PASS | TOTAL BRANCH INSTRUCTIONS:   100 | TOTAL MISPREDICTED BRANCHES:    25 | ACCURACY: 75.00%\n"
    );
}

#[test]
fn test_reset_held_for_configured_duration() {
    let config = test_config();
    let mut driver = ClockDriver::from_config(&config);
    let mut dut = ScriptedDut::new(program()).halting_with(pass_exit());
    let mut monitor = Monitor::new(Vec::new(), true);

    let _ = driver.run(&mut dut, &mut monitor).unwrap();

    let released = dut.reset_history.iter().position(|r| !r).unwrap();
    assert_eq!(released, 100);
    assert!(dut.reset_history[released..].iter().all(|r| !r));
}

#[test]
fn test_trace_disabled_prints_only_verdict() {
    let config = test_config();
    let mut driver = ClockDriver::from_config(&config);
    let mut dut = ScriptedDut::new(program()).halting_with(ExitStatus {
        a0: 0,
        cause: 2,
        branches: BranchStats::new(2, 1),
    });
    let mut monitor = Monitor::new(Vec::new(), false);

    let summary = driver.run(&mut dut, &mut monitor).unwrap();

    assert_eq!(summary.retired, 3);
    assert_eq!(
        String::from_utf8(monitor.into_inner()).unwrap(),
        "ILLEGAL INSTRUCTION | TOTAL BRANCH INSTRUCTIONS:     2 | TOTAL MISPREDICTED BRANCHES:     1 | ACCURACY: 50.00%\n"
    );
}

#[test]
fn test_time_limit_ends_run() {
    init_tracing();
    let config = DriverConfig {
        max_sim_time: 1000,
        reset_duration: 100,
    };
    let mut driver = ClockDriver::new(&config);
    let mut dut = ScriptedDut::new(program());
    let mut monitor = Monitor::new(Vec::new(), true);

    let summary = driver.run(&mut dut, &mut monitor).unwrap();

    assert!(summary.timed_out);
    assert_eq!(summary.verdict, None);
    assert_eq!(summary.sim_time, 1000);
    assert_eq!(summary.posedges, 500);
    assert_eq!(summary.retired, 3);
}

#[test]
fn test_zero_time_limit_never_evaluates() {
    let config = DriverConfig {
        max_sim_time: 0,
        reset_duration: 100,
    };
    let mut driver = ClockDriver::new(&config);
    let mut dut = MockDut::new();
    dut.expect_finished().return_const(false);
    dut.expect_eval().never();
    let mut monitor = Monitor::new(Vec::new(), true);

    let summary = driver.run(&mut dut, &mut monitor).unwrap();

    assert!(summary.timed_out);
    assert_eq!(summary.sim_time, 0);
}

#[test]
fn test_input_sequence() {
    let config = DriverConfig {
        max_sim_time: 110,
        reset_duration: 100,
    };
    let mut dut = MockDut::new();
    dut.expect_finished().return_const(false);
    dut.expect_set_reset().with(eq(true)).times(100).return_const(());
    dut.expect_set_reset().with(eq(false)).times(10).return_const(());
    dut.expect_set_clock().with(eq(true)).times(55).return_const(());
    dut.expect_set_clock().with(eq(false)).times(55).return_const(());
    dut.expect_eval().times(110).return_const(());

    let mut driver = ClockDriver::new(&config);
    let mut monitor = Monitor::new(Vec::new(), true);
    let summary = driver.run(&mut dut, &mut monitor).unwrap();

    assert_eq!(summary.posedges, 55);
    assert!(summary.timed_out);
    assert!(monitor.into_inner().is_empty());
}

#[test]
fn test_finished_model_is_not_clocked() {
    let mut dut = MockDut::new();
    dut.expect_finished().return_const(true);
    dut.expect_eval().never();
    dut.expect_set_clock().never();

    let mut driver = ClockDriver::from_config(&Config::default());
    let mut monitor = Monitor::new(Vec::new(), true);
    let summary = driver.run(&mut dut, &mut monitor).unwrap();

    assert!(!summary.timed_out);
    assert_eq!(summary.posedges, 0);
}

#[test]
fn test_step_state() {
    let config = DriverConfig {
        max_sim_time: 10,
        reset_duration: 2,
    };
    let mut driver = ClockDriver::new(&config);
    let mut dut = ScriptedDut::new([InstructionEvent::new(0x8000_0000, 0x13)]);
    let mut events = Vec::new();

    assert!(driver.in_reset());
    assert!(!driver.clock());

    driver.step(&mut dut, &mut events);
    assert!(driver.clock());
    assert_eq!((driver.sim_time(), driver.posedges()), (1, 1));

    driver.step(&mut dut, &mut events);
    assert!(!driver.in_reset());
    assert!(events.is_empty());

    driver.step(&mut dut, &mut events);
    assert_eq!((driver.sim_time(), driver.posedges()), (3, 2));
    assert_eq!(
        events,
        vec![DutEvent::Retired(InstructionEvent::new(0x8000_0000, 0x13))]
    );
}

#[test]
fn test_drives_trait_objects() {
    let config = DriverConfig {
        max_sim_time: 1000,
        reset_duration: 4,
    };
    let mut scripted = ScriptedDut::new(program()).halting_with(pass_exit());
    let dut: &mut dyn Dut = &mut scripted;
    let mut monitor = Monitor::new(Vec::new(), false);

    let summary = ClockDriver::new(&config).run(dut, &mut monitor).unwrap();

    assert_eq!(summary.verdict.map(|v| v.is_pass()), Some(true));
}

#[test]
fn test_monitor_routes_events() {
    let mut monitor = Monitor::new(Vec::new(), true);
    monitor
        .handle(&DutEvent::Retired(InstructionEvent::new(0x8000_0000, 0x13)))
        .unwrap();
    monitor
        .handle(&DutEvent::Halted(ExitStatus {
            a0: 7,
            cause: 11,
            branches: BranchStats::default(),
        }))
        .unwrap();

    assert_eq!(monitor.retired(), 1);
    assert_eq!(monitor.verdict(), Some(Verdict::UndefinedExitCode));
    assert_eq!(
        String::from_utf8(monitor.into_inner()).unwrap(),
        "PC: 0x0000000080000000, INSTR: 0x00000013\nUNDEFINED value stored in a0 register\n"
    );
}

/// Output stream that rejects every write.
struct ClosedStream;

impl Write for ClosedStream {
    fn write(&mut self, _: &[u8]) -> io::Result<usize> {
        Err(io::Error::new(io::ErrorKind::BrokenPipe, "stream closed"))
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

#[test]
fn test_run_resumes_after_output_failure() {
    let config = test_config();
    let mut driver = ClockDriver::from_config(&config);
    let mut dut = ScriptedDut::new(program()).halting_with(pass_exit());

    let mut broken = Monitor::new(ClosedStream, true);
    let err = driver.run(&mut dut, &mut broken).unwrap_err();
    assert!(matches!(err, HarnessError::Io(_)));
    assert_eq!(broken.retired(), 0);
    assert_eq!(driver.sim_time(), 101);

    let mut monitor = Monitor::new(Vec::new(), true);
    let summary = driver.run(&mut dut, &mut monitor).unwrap();

    assert_eq!(summary.retired, 3);
    assert_eq!(summary.sim_time, 107);
    let output = String::from_utf8(monitor.into_inner()).unwrap();
    let lines: Vec<_> = output.lines().collect();
    assert_eq!(lines.len(), 4);
    assert!(lines[0].starts_with("PC: 0x0000000080000000"));
    assert!(lines[3].starts_with("PASS |"));
}
