
use evm_debugger::{ExitError, Opcode};
use mock::{run_code, run_to_end, vm_with_code};
use primitive_types::U256;
use std::collections::BTreeSet;

#[test]
fn stop_halts_with_empty_return_value() {
	let mut vm = vm_with_code(vec![0x00, 0x60, 0x01]);
	vm.step().unwrap();
	assert!(vm.stopped());
	assert!(vm.return_value().is_empty());
	// Further steps are no-ops.
	vm.step().unwrap();
	assert_eq!(vm.stack().len(), 0);
}

#[test]
fn fall_off_end_stops() {
	let mut vm = vm_with_code(vec![0x60, 0x2a]);
	vm.step().unwrap();
	assert!(!vm.stopped());
	vm.step().unwrap();
	assert!(vm.stopped());
}

#[test]
fn jump_to_non_jumpdest_fails() {
	// PUSH1 5; JUMP. Byte 5 is not a JUMPDEST.
	let mut vm = vm_with_code(vec![0x60, 0x05, 0x56, 0x00, 0x00, 0x00, 0x00]);
	vm.step().unwrap();
	assert_eq!(vm.step(), Err(ExitError::InvalidJump(5)));
	assert!(!vm.stopped());
}

#[test]
fn jump_into_push_immediate_fails() {
	// PUSH1 4; JUMP; PUSH2 0x5b00. Byte 4 is a 0x5b inside the immediate.
	let mut vm = vm_with_code(vec![0x60, 0x04, 0x56, 0x61, 0x5b, 0x00]);
	vm.step().unwrap();
	assert_eq!(vm.step(), Err(ExitError::InvalidJump(4)));
}

#[test]
fn jump_to_jumpdest_succeeds() {
	// PUSH1 5; JUMP; STOP; STOP; JUMPDEST; PUSH1 42
	let vm = run_code(&[0x60, 0x05, 0x56, 0x00, 0x00, 0x5b, 0x60, 0x2a]);
	assert!(vm.stopped());
	assert_eq!(vm.stack().peek(0).unwrap(), U256::from(42));
}

#[test]
fn jumpi_taken_and_not_taken() {
	// PUSH1 1; PUSH1 7; JUMPI; STOP; ...; JUMPDEST; PUSH1 1
	let vm = run_code(&[0x60, 0x01, 0x60, 0x07, 0x57, 0x00, 0x00, 0x5b, 0x60, 0x01]);
	assert_eq!(vm.stack().len(), 1);

	// Condition zero falls through to the STOP.
	let vm = run_code(&[0x60, 0x00, 0x60, 0x07, 0x57, 0x00, 0x00, 0x5b, 0x60, 0x01]);
	assert_eq!(vm.stack().len(), 0);
}

#[test]
fn jumpi_invalid_target_only_fails_when_taken() {
	let mut vm = vm_with_code(vec![0x60, 0x01, 0x60, 0x03, 0x57]);
	vm.step().unwrap();
	vm.step().unwrap();
	assert_eq!(vm.step(), Err(ExitError::InvalidJump(3)));

	let mut vm = vm_with_code(vec![0x60, 0x00, 0x60, 0x03, 0x57, 0x00]);
	run_to_end(&mut vm);
	assert!(vm.stopped());
}

#[test]
fn pc_pushes_opcode_position() {
	// PC; PUSH1 1; POP; PC; STOP
	let vm = run_code(&[0x58, 0x60, 0x01, 0x50, 0x58, 0x00]);
	assert_eq!(vm.stack().data(), &vec![U256::zero(), U256::from(4)]);
}

#[test]
fn jumpdest_is_a_noop() {
	let vm = run_code(&[0x5b, 0x60, 0x01, 0x00]);
	assert_eq!(vm.stack().data(), &vec![U256::one()]);
}

#[test]
fn invalid_opcode_fails_distinctly() {
	let mut vm = vm_with_code(vec![0xfe]);
	assert_eq!(
		vm.step(),
		Err(ExitError::InvalidOpcode(Opcode::INVALID))
	);
	assert!(!vm.stopped());
}

#[test]
fn undefined_opcode_fails_with_its_byte() {
	let mut vm = vm_with_code(vec![0x0c]);
	assert_eq!(vm.step(), Err(ExitError::InvalidOpcode(Opcode(0x0c))));
}

#[test]
fn run_until_halts_at_breakpoint_non_stopped() {
	// PUSH1 2; PUSH1 3; ADD; STOP with a breakpoint on the ADD.
	let mut vm = vm_with_code(vec![0x60, 0x02, 0x60, 0x03, 0x01, 0x00]);
	let breakpoints: BTreeSet<usize> = [4].into_iter().collect();

	vm.run_until(&breakpoints).unwrap();
	assert_eq!(vm.pc(), 4);
	assert!(!vm.stopped());
	assert_eq!(vm.stack().len(), 2);

	// Resuming past the breakpoint finishes the program.
	vm.step().unwrap();
	vm.run_until(&breakpoints).unwrap();
	assert!(vm.stopped());
	assert_eq!(vm.stack().peek(0).unwrap(), U256::from(5));
}

#[test]
fn run_until_with_no_breakpoints_runs_to_stop() {
	let mut vm = vm_with_code(vec![0x60, 0x02, 0x60, 0x03, 0x01, 0x00]);
	vm.run_until(&BTreeSet::new()).unwrap();
	assert!(vm.stopped());
	assert_eq!(vm.stack().peek(0).unwrap(), U256::from(5));
}

#[test]
fn run_until_rejects_pc_inside_immediate() {
	// Park the counter in the middle of a PUSH2 immediate.
	let mut vm = vm_with_code(vec![0x61, 0x01, 0x02, 0x00]);
	vm.set_pc(1);
	assert_eq!(vm.run_until(&BTreeSet::new()), Err(ExitError::InvalidPC(1)));
}

#[test]
fn every_pc_after_a_step_is_an_instruction_boundary() {
	let code = vec![0x60, 0x05, 0x56, 0x00, 0x00, 0x5b, 0x61, 0x2a, 0x2b, 0x00];
	let mut vm = vm_with_code(code);
	while !vm.stopped() {
		vm.step().unwrap();
		let position = vm.pc();
		assert!(
			position >= vm.code().len() || vm.frame().metadata().is_valid_pc(position),
			"pc {position} not on an instruction boundary"
		);
	}
}
