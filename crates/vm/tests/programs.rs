//! Runs complete LS-8 programs, from source text to printed output.

use ls8_vm::cpu::{Flags, STACK_TOP};
use ls8_vm::error::Error;
use ls8_vm::program::Program;
use ls8_vm::trace::{NoopTrace, WriterTrace};
use ls8_vm::Vm;
use pretty_assertions::assert_eq;
use rstest::rstest;

/// Loads and runs `source`, returning the machine and everything it printed.
fn run_source(source: &str) -> (Vm, String) {
    let program = Program::parse(source).unwrap();
    let mut vm = Vm::new();
    vm.load(&program).unwrap();

    let mut out = Vec::new();
    vm.run(&mut out, &mut NoopTrace).unwrap();
    (vm, String::from_utf8(out).unwrap())
}

#[rstest]
#[case::print8(include_str!("../../../demos/print8.ls8"), "8\n")]
#[case::add(include_str!("../../../demos/add.ls8"), "15\n")]
#[case::mult(include_str!("../../../demos/mult.ls8"), "72\n")]
#[case::stack(include_str!("../../../demos/stack.ls8"), "2\n4\n1\n")]
#[case::sctest(include_str!("../../../demos/sctest.ls8"), "1\n2\n3\n")]
fn demo_output(#[case] source: &str, #[case] expected: &str) {
    let (vm, out) = run_source(source);
    assert_eq!(out, expected);
    assert!(!vm.is_running());
}

#[test]
fn stack_is_balanced_after_demo() {
    let (vm, _) = run_source(include_str!("../../../demos/stack.ls8"));
    assert_eq!(vm.cpu().registers.sp(), STACK_TOP);
}

#[test]
fn add_program_state() {
    let (vm, _) = run_source(include_str!("../../../demos/add.ls8"));
    let regs = vm.cpu().registers.as_array();
    assert_eq!(regs, &[15, 10, 0, 0, 0, 0, 0, STACK_TOP]);
    assert_eq!(vm.cpu().flags, Flags::empty());
    // LDI, LDI, ADD, PRN, HLT
    assert_eq!(vm.cpu().pc, 3 + 3 + 3 + 2 + 1);
}

#[test]
fn sctest_leaves_equal_flag() {
    let (vm, _) = run_source(include_str!("../../../demos/sctest.ls8"));
    assert_eq!(vm.cpu().flags, Flags::EQUAL);
}

#[test]
fn loads_demo_from_file() {
    let path = concat!(env!("CARGO_MANIFEST_DIR"), "/../../demos/print8.ls8");
    let from_file = Program::from_file(path).unwrap();
    let parsed = Program::parse(include_str!("../../../demos/print8.ls8")).unwrap();
    assert_eq!(from_file, parsed);
    assert_eq!(
        from_file.as_bytes(),
        &[0b1000_0010, 0, 8, 0b0100_0111, 0, 0b0000_0001]
    );
}

#[test]
fn counts_executed_instructions() {
    let program = Program::parse(include_str!("../../../demos/print8.ls8")).unwrap();
    let mut vm = Vm::new();
    vm.load(&program).unwrap();
    assert_eq!(vm.run(&mut Vec::new(), &mut NoopTrace).unwrap(), 3);
}

#[test]
fn countdown_loop() {
    // R0 counts down from 3 by adding 255 until it compares equal to R2. Prints 3, 2, 1.
    let source = "\
10000010 # LDI R0,3
00000000
00000011
10000010 # LDI R1,255
00000001
11111111
10000010 # LDI R2,0
00000010
00000000
10000010 # LDI R3,15 (loop)
00000011
00001111
10000010 # LDI R4,27 (exit)
00000100
00011011

# loop
01000111 # PRN R0
00000000
10100000 # ADD R0,R1
00000000
00000001
10100111 # CMP R0,R2
00000000
00000010
01010101 # JEQ R4
00000100
01010100 # JMP R3
00000011

# exit
00000001 # HLT
";
    let (vm, out) = run_source(source);
    assert_eq!(out, "3\n2\n1\n");
    assert_eq!(vm.cpu().registers.get(0).unwrap(), 0);
    assert_eq!(vm.cpu().pc, 28);
}

#[test]
fn trace_runs_alongside_execution() {
    let program = Program::parse(include_str!("../../../demos/print8.ls8")).unwrap();
    let mut vm = Vm::new();
    vm.load(&program).unwrap();

    let mut out = Vec::new();
    let mut trace = WriterTrace::new(Vec::new());
    vm.run(&mut out, &mut trace).unwrap();

    let trace = String::from_utf8(trace.into_inner()).unwrap();
    let lines: Vec<&str> = trace.lines().collect();
    assert_eq!(
        lines,
        [
            "TRACE: 00 | 82 00 08 | 00 00 00 00 00 00 00 F4",
            "TRACE: 03 | 47 00 01 | 08 00 00 00 00 00 00 F4",
            "TRACE: 05 | 01 00 00 | 08 00 00 00 00 00 00 F4",
        ]
    );
    assert_eq!(out, b"8\n");
}

#[test]
fn fatal_errors_stop_execution() {
    // PRN R0, then a byte that is not an instruction.
    let program = Program::from_bytes([0b0100_0111, 0, 0b0000_0000]).unwrap();
    let mut vm = Vm::new();
    vm.load(&program).unwrap();

    let mut out = Vec::new();
    let err = vm.run(&mut out, &mut NoopTrace).unwrap_err();
    assert!(matches!(err, Error::UnknownOpcode { opcode: 0, pc: 2 }));
    assert_eq!(out, b"0\n");
    assert!(vm.is_running());
}
