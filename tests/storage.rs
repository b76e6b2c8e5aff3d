
use evm_debugger::{ExecutionContext, ExitError};
use mock::{run_to_end, vm_with_code, MockAccount, MockBackend};
use primitive_types::{H160, U256};

fn context_at(address: H160) -> ExecutionContext {
	ExecutionContext {
		address,
		..Default::default()
	}
}

#[test]
fn sstore_sload_round_trip_without_provider() {
	// PUSH1 42; PUSH1 1; SSTORE; PUSH1 1; SLOAD; STOP
	let mut vm = vm_with_code(vec![0x60, 0x2a, 0x60, 0x01, 0x55, 0x60, 0x01, 0x54, 0x00]);
	run_to_end(&mut vm);
	assert_eq!(vm.stack().peek(0).unwrap(), U256::from(42));
}

#[test]
fn sload_of_unset_slot_is_zero() {
	let mut vm = vm_with_code(vec![0x60, 0x07, 0x54, 0x00]);
	run_to_end(&mut vm);
	assert_eq!(vm.stack().peek(0).unwrap(), U256::zero());
}

#[test]
fn sstore_zero_is_stored_not_erased() {
	// Writing zero then reading it back still reads zero; the slot write
	// goes through the same path as any other value.
	let mut vm = vm_with_code(vec![
		0x60, 0x05, 0x60, 0x01, 0x55, // SSTORE(1, 5)
		0x60, 0x00, 0x60, 0x01, 0x55, // SSTORE(1, 0)
		0x60, 0x01, 0x54, 0x00, // SLOAD(1)
	]);
	run_to_end(&mut vm);
	assert_eq!(vm.stack().peek(0).unwrap(), U256::zero());
}

#[test]
fn sstore_delegates_to_the_provider_keyed_by_address() {
	let backend = MockBackend::new();
	let contract = H160::from_low_u64_be(0xc0de);
	backend.insert_account(contract, MockAccount::default());

	let mut vm = vm_with_code(vec![0x60, 0x2a, 0x60, 0x01, 0x55, 0x00]);
	vm.set_context(context_at(contract));
	vm.set_state_provider(backend.handle());
	run_to_end(&mut vm);

	let account = backend.account(contract).unwrap();
	assert_eq!(account.storage.get(&U256::one()), Some(&U256::from(42)));
}

#[test]
fn sload_reads_the_provider() {
	let backend = MockBackend::new();
	let contract = H160::from_low_u64_be(0xc0de);
	let mut account = MockAccount::default();
	account.storage.insert(U256::from(9), U256::from(1234));
	backend.insert_account(contract, account);

	let mut vm = vm_with_code(vec![0x60, 0x09, 0x54, 0x00]);
	vm.set_context(context_at(contract));
	vm.set_state_provider(backend.handle());
	run_to_end(&mut vm);
	assert_eq!(vm.stack().peek(0).unwrap(), U256::from(1234));
}

#[test]
fn tstore_tload_round_trip() {
	// PUSH1 7; PUSH1 3; TSTORE; PUSH1 3; TLOAD; STOP
	let mut vm = vm_with_code(vec![0x60, 0x07, 0x60, 0x03, 0x5d, 0x60, 0x03, 0x5c, 0x00]);
	run_to_end(&mut vm);
	assert_eq!(vm.stack().peek(0).unwrap(), U256::from(7));
	assert_eq!(vm.read_transient_storage(U256::from(3)), U256::from(7));
}

#[test]
fn transient_storage_is_separate_from_persistent() {
	// TSTORE(1, 7) then SLOAD(1) reads zero.
	let mut vm = vm_with_code(vec![0x60, 0x07, 0x60, 0x01, 0x5d, 0x60, 0x01, 0x54, 0x00]);
	run_to_end(&mut vm);
	assert_eq!(vm.stack().peek(0).unwrap(), U256::zero());
}

#[test]
fn transient_storage_host_controls() {
	let mut vm = vm_with_code(vec![0x60, 0x05, 0x5c, 0x00]); // TLOAD(5)
	vm.write_transient_storage(U256::from(5), U256::from(99));
	run_to_end(&mut vm);
	assert_eq!(vm.stack().peek(0).unwrap(), U256::from(99));

	vm.clear_transient_storage();
	assert_eq!(vm.read_transient_storage(U256::from(5)), U256::zero());
}

#[test]
fn tstore_requires_two_stack_values() {
	let mut vm = vm_with_code(vec![0x60, 0x01, 0x5d, 0x00]);
	vm.step().unwrap();
	assert_eq!(vm.step(), Err(ExitError::StackUnderflow));
}
