//! Structural fault detection and the exit codes it maps to.

use lt64_vm::{BufferConsole, END_STACK, Fault, Lt64, Opcode};

fn run_fault(words: &[i16]) -> Fault {
    let mut vm = Lt64::new();
    vm.load(words).expect("image fits");
    let mut console = BufferConsole::new("");
    vm.run(&mut console).expect_err("program must fault")
}

#[test]
fn pop_on_empty_stack_underflows() {
    let fault = run_fault(&[Opcode::Pop as i16, Opcode::Halt as i16]);
    assert!(matches!(fault, Fault::DataUnderflow { .. }));
    assert_eq!(fault.exit_code(), 5);
}

#[test]
fn push_past_end_of_stack_overflows() {
    let mut words = Vec::new();
    for _ in 0..=END_STACK {
        words.push(Opcode::Push as i16);
        words.push(7);
    }
    words.push(Opcode::Halt as i16);

    let fault = run_fault(&words);
    assert!(matches!(fault, Fault::DataOverflow { .. }));
    assert_eq!(fault.exit_code(), 4);
}

#[test]
fn jump_outside_program_region() {
    let fault = run_fault(&[Opcode::Push as i16, -1, Opcode::Jump as i16]);
    assert!(matches!(fault, Fault::PcOutOfBounds { .. }));
    assert_eq!(fault.exit_code(), 6);
}

#[test]
fn running_off_the_program_end() {
    let fault = run_fault(&[Opcode::Push as i16, 5]);
    assert!(matches!(fault, Fault::PcOutOfBounds { .. }));
    assert_eq!(fault.exit_code(), 6);
}

#[test]
fn unknown_opcodes_fault() {
    for byte in [0x33, 0x3d, 0x70, 0xff] {
        let fault = run_fault(&[byte, Opcode::Halt as i16]);
        assert_eq!(fault, Fault::UnknownOp { op: byte as u8 });
        assert_eq!(fault.exit_code(), 7);
    }
}

#[test]
fn return_on_empty_return_stack_underflows() {
    let fault = run_fault(&[Opcode::Ret as i16]);
    assert!(matches!(fault, Fault::ReturnUnderflow { .. }));
    assert_eq!(fault.exit_code(), 11);
}

#[test]
fn unbounded_rpush_overflows_return_stack() {
    // PUSH 7; RPUSH; PUSH 0; JUMP 0 — loops until the return stack
    // pointer climbs past its end.
    let fault = run_fault(&[
        Opcode::Push as i16,
        7,
        Opcode::Rpush as i16,
        Opcode::Push as i16,
        0,
        Opcode::Jump as i16,
    ]);
    assert!(matches!(fault, Fault::ReturnOverflow { .. }));
    assert_eq!(fault.exit_code(), 10);
}

#[test]
#[should_panic(expected = "divide by zero")]
fn division_by_zero_is_unguarded() {
    let mut vm = Lt64::new();
    vm.load(&[
        Opcode::Push as i16,
        1,
        Opcode::Push as i16,
        0,
        Opcode::Div as i16,
        Opcode::Halt as i16,
    ])
    .expect("image fits");
    let mut console = BufferConsole::new("");
    let _ = vm.run(&mut console);
}
