//! # Commit Log Tests
//!
//! Conversion of Spike commit logs into reference trace lines.

use std::fs;

use pretty_assertions::assert_eq;
use rvtb_core::HarnessError;
use rvtb_core::isa::privileged::opcodes::{CSRR_A0_MHARTID, LI_GP_2, NOP, TRAP_VECTOR_PC};
use rvtb_core::reference::commit_log::convert_commit_log_file;
use rvtb_core::reference::{convert_commit_log, fill_boot_sequence, parse_commit_log};
use rvtb_core::trace::InstructionEvent;
use tempfile::tempdir;

use crate::common::harness::{ISA, commit, commit_log, init_tracing};

#[test]
fn test_register_write() {
    let log = commit_log(&[commit(0x8000_0004, 0x0000_0513, " x10 0x0000000000000000")]);
    let events = parse_commit_log(&log, ISA).unwrap();
    assert_eq!(
        events,
        vec![InstructionEvent::new(0x8000_0004, 0x0000_0513).with_reg_write(10, 0)]
    );
}

#[test]
fn test_load_keeps_address() {
    let log = commit_log(&[commit(
        0x8000_0010,
        0x0000_b083,
        " x1  0x00000000deadbeef mem 0x0000000080001000",
    )]);
    let events = parse_commit_log(&log, ISA).unwrap();
    assert_eq!(
        events,
        vec![
            InstructionEvent::new(0x8000_0010, 0x0000_b083)
                .with_reg_write(1, 0xdead_beef)
                .with_mem_access(0x8000_1000)
        ]
    );
}

#[test]
fn test_store() {
    let log = commit_log(&[commit(
        0x8000_0014,
        0x0020_b023,
        " mem 0x0000000080001008 0x0000000000000002",
    )]);
    let events = parse_commit_log(&log, ISA).unwrap();
    assert_eq!(
        events,
        vec![InstructionEvent::new(0x8000_0014, 0x0020_b023).with_mem_write(0x8000_1008, 2)]
    );
}

#[test]
fn test_fence_and_trap_entry_become_nops() {
    let log = commit_log(&[
        commit(0x8000_0020, 0x0ff0_000f, ""),
        "core   0: exception trap_illegal_instruction, epc 0x0000000080000024".to_string(),
        "core   0:           tval 0x0000000002b7b533".to_string(),
    ]);
    let events = parse_commit_log(&log, ISA).unwrap();
    assert_eq!(
        events,
        vec![
            InstructionEvent::new(0x8000_0020, NOP),
            InstructionEvent::new(TRAP_VECTOR_PC, NOP),
        ]
    );
}

#[test]
fn test_debugger_output_is_skipped() {
    let log = commit_log(&[
        "(spike) until pc 0 80000040".to_string(),
        ">>>>  test_2".to_string(),
        "core   0: 0x0000000080000030 (0x00000093) li      ra, 0".to_string(),
        commit(0x8000_0030, 0x0000_0093, " x1  0x0000000000000000"),
        String::new(),
    ]);
    let events = parse_commit_log(&log, ISA).unwrap();
    assert_eq!(
        events,
        vec![InstructionEvent::new(0x8000_0030, 0x0000_0093).with_reg_write(1, 0)]
    );
}

#[test]
fn test_csr_destination_is_not_traced() {
    let log = commit_log(&[commit(0x8000_0008, 0x3052_9073, " c773_mtvec 0x0000000080000004")]);
    let events = parse_commit_log(&log, ISA).unwrap();
    assert_eq!(events, vec![InstructionEvent::new(0x8000_0008, 0x3052_9073)]);
}

#[test]
fn test_window_excludes_preamble_and_tail() {
    let log = commit_log(&[
        commit(0x8000_0000, 0x0000_0013, ""),
        commit(0x8000_0004, 0x0000_0013, ""),
    ]);
    let events = parse_commit_log(&log, ISA).unwrap();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| (0x8000_0000..0x8000_0044).contains(&e.pc)));
}

#[test]
fn test_missing_marker_records_nothing() {
    let log = commit_log(&[commit(0x8000_0000, 0x0000_0013, "")]);
    assert!(parse_commit_log(&log, "rv32imc").unwrap().is_empty());
}

#[test]
fn test_malformed_pc_reports_line() {
    init_tracing();
    let log = commit_log(&["core   0: 3 0xnothex (0x00000513) x10 0x0".to_string()]);
    let err = parse_commit_log(&log, ISA).unwrap_err();
    assert!(matches!(err, HarnessError::Parse { line: 4, .. }));
}

fn boot_events() -> Vec<InstructionEvent> {
    vec![
        InstructionEvent::new(0x8000_0000, CSRR_A0_MHARTID).with_reg_write(10, 0),
        InstructionEvent::new(0x8000_0004, 0x3052_9073),
        InstructionEvent::new(TRAP_VECTOR_PC, NOP),
        InstructionEvent::new(0x8000_0008, 0x3420_22f3).with_reg_write(5, 2),
        InstructionEvent::new(0x8000_0010, LI_GP_2).with_reg_write(3, 2),
        InstructionEvent::new(0x8000_0014, 0x0000_0013),
    ]
}

#[test]
fn test_boot_sequence_becomes_nops() {
    let filled = fill_boot_sequence(boot_events());
    assert_eq!(
        filled,
        vec![
            InstructionEvent::new(0x8000_0000, NOP),
            InstructionEvent::new(0x8000_0004, NOP),
            InstructionEvent::new(0x8000_0008, NOP),
            InstructionEvent::new(0x8000_000c, NOP),
            InstructionEvent::new(TRAP_VECTOR_PC, NOP),
            InstructionEvent::new(0x8000_0010, LI_GP_2).with_reg_write(3, 2),
            InstructionEvent::new(0x8000_0014, 0x0000_0013),
        ]
    );
}

#[test]
fn test_boot_fill_needs_both_markers() {
    let mut events = boot_events();
    events.retain(|e| e.instruction != LI_GP_2);
    assert_eq!(fill_boot_sequence(events.clone()), events);
}

#[test]
fn test_boot_fill_needs_ordered_markers() {
    let events = vec![
        InstructionEvent::new(0x8000_0010, CSRR_A0_MHARTID),
        InstructionEvent::new(0x8000_0000, LI_GP_2),
    ];
    assert_eq!(fill_boot_sequence(events.clone()), events);
}

#[test]
fn test_convert_commit_log_text() {
    let log = commit_log(&[
        commit(0x8000_0004, 0x0000_0513, " x10 0x0000000000000000"),
        commit(0x8000_0014, 0x0020_b023, " mem 0x0000000080001008 0x0000000000000002"),
    ]);
    assert_eq!(
        convert_commit_log(&log, ISA).unwrap(),
        "PC: 0x0000000080000004, INSTR: 0x00000513, REG x10: 0x0000000000000000\n\
         PC: 0x0000000080000014, INSTR: 0x0020b023, MEM 0x0000000080001008: 0x0000000000000002\n"
    );
}

#[test]
fn test_convert_commit_log_file() {
    let dir = tempdir().unwrap();
    let input = dir.path().join("add.log");
    let output = dir.path().join("add-log-trace.log");
    let log = commit_log(&[
        commit(0x8000_0000, 0x0000_0013, ""),
        commit(0x8000_0004, 0x0000_0013, ""),
        commit(0x8000_0008, 0x0000_0013, ""),
    ]);
    fs::write(&input, log).unwrap();

    assert_eq!(convert_commit_log_file(&input, &output, ISA).unwrap(), 3);
    let trace = fs::read_to_string(&output).unwrap();
    assert_eq!(trace.lines().last(), Some("PC: 0x0000000080000008, INSTR: 0x00000013"));
}
