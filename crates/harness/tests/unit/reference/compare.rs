//! # Trace Comparison Tests

use pretty_assertions::assert_eq;
use rvtb_core::reference::{Mismatch, compare_traces};

const REFERENCE: &str = "\
PC: 0x0000000080000000, INSTR: 0x00000013
PC: 0x0000000080000004, INSTR: 0x00000513, REG x10: 0x0000000000000000
PC: 0x0000000080000008, INSTR: 0x00100593, REG x11: 0x0000000000000001
";

#[test]
fn test_identical_traces_match() {
    let result = compare_traces(REFERENCE, REFERENCE);
    assert!(result.is_match());
    assert_eq!(result.matched, 3);
    assert_eq!(result.to_string(), "MATCH | RECORDS: 3");
}

#[test]
fn test_model_output_lines_are_ignored() {
    let dut = format!(
        "{REFERENCE}\nPASS | TOTAL BRANCH INSTRUCTIONS:     0 | TOTAL MISPREDICTED BRANCHES:     0 | ACCURACY: nan%\n"
    );
    let result = compare_traces(&dut, REFERENCE);
    assert!(result.is_match());
    assert_eq!(result.dut_records, 3);
}

#[test]
fn test_crlf_line_endings() {
    let dut = REFERENCE.replace('\n', "\r\n");
    assert!(compare_traces(&dut, REFERENCE).is_match());
}

#[test]
fn test_first_divergence_is_reported() {
    let dut = REFERENCE.replace("REG x11: 0x0000000000000001", "REG x11: 0x0000000000000002");
    let result = compare_traces(&dut, REFERENCE);
    assert!(!result.is_match());
    assert_eq!(result.matched, 2);
    assert_eq!(
        result.first_mismatch,
        Some(Mismatch {
            record: 3,
            dut: Some("PC: 0x0000000080000008, INSTR: 0x00100593, REG x11: 0x0000000000000002".to_string()),
            reference: Some("PC: 0x0000000080000008, INSTR: 0x00100593, REG x11: 0x0000000000000001".to_string()),
        })
    );
}

#[test]
fn test_shorter_model_trace() {
    let dut: String = REFERENCE.lines().take(2).map(|l| format!("{l}\n")).collect();
    let result = compare_traces(&dut, REFERENCE);
    let mismatch = result.first_mismatch.clone().unwrap();
    assert_eq!(mismatch.record, 3);
    assert_eq!(mismatch.dut, None);
    assert_eq!(
        result.to_string(),
        "MISMATCH at record 3 (2 matched, dut 2 / reference 3 records)\n  \
         dut:       <end of trace>\n  \
         reference: PC: 0x0000000080000008, INSTR: 0x00100593, REG x11: 0x0000000000000001"
    );
}

#[test]
fn test_longer_model_trace() {
    let dut = format!("{REFERENCE}PC: 0x000000008000000c, INSTR: 0x00000013\n");
    let mismatch = compare_traces(&dut, REFERENCE).first_mismatch.unwrap();
    assert_eq!(mismatch.record, 4);
    assert_eq!(mismatch.reference, None);
}

#[test]
fn test_empty_traces_match() {
    let result = compare_traces("", "");
    assert!(result.is_match());
    assert_eq!(result.matched, 0);
}
