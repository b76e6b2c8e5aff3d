use super::misc::copy_padded;
use crate::{
	frame::{CallScheme, Frame},
	interpreter::DebuggerVM,
	runtime::{ExecutionContext, Log},
	utils::{h160_to_u256, h256_to_u256, u256_to_h160, u256_to_h256},
	ExitError,
};
use alloc::{rc::Rc, vec::Vec};
use log::trace;
use primitive_types::{H160, U256};
use sha3::{Digest, Keccak256};

pub fn sha3(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	pop_u256!(vm, offset, size);
	let data = vm.frame_mut().memory.get(as_usize!(offset), as_usize!(size));
	let hash = Keccak256::digest(&data);
	push_u256!(vm, U256::from_big_endian(hash.as_slice()));
	Ok(())
}

pub fn address(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	let value = h160_to_u256(vm.require_context("ADDRESS")?.address);
	push_u256!(vm, value);
	Ok(())
}

pub fn caller(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	let value = h160_to_u256(vm.require_context("CALLER")?.caller);
	push_u256!(vm, value);
	Ok(())
}

pub fn origin(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	let value = h160_to_u256(vm.require_context("ORIGIN")?.origin);
	push_u256!(vm, value);
	Ok(())
}

pub fn callvalue(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	let value = vm.require_context("CALLVALUE")?.value;
	push_u256!(vm, value);
	Ok(())
}

pub fn gasprice(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	let value = vm.require_context("GASPRICE")?.gas_price;
	push_u256!(vm, value);
	Ok(())
}

pub fn gas(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	let value = U256::from(vm.require_context("GAS")?.gas);
	push_u256!(vm, value);
	Ok(())
}

pub fn selfbalance(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	let value = vm.require_context("SELFBALANCE")?.balance;
	push_u256!(vm, value);
	Ok(())
}

pub fn balance(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	pop_u256!(vm, address);
	let address = u256_to_h160(address);
	let value = match vm.provider.as_ref() {
		Some(provider) => provider.balance(address),
		None => vm.require_context("BALANCE")?.balance,
	};
	push_u256!(vm, value);
	Ok(())
}

pub fn extcodesize(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	pop_u256!(vm, address);
	let address = u256_to_h160(address);
	let size = match vm.provider.as_ref() {
		Some(provider) => U256::from(provider.code(address).len()),
		None => U256::zero(),
	};
	push_u256!(vm, size);
	Ok(())
}

pub fn extcodecopy(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	pop_u256!(vm, address, memory_offset, code_offset, len);
	let address = u256_to_h160(address);
	let code = match vm.provider.as_ref() {
		Some(provider) => provider.code(address),
		None => Vec::new(),
	};
	let data = copy_padded(&code, as_usize!(code_offset), as_usize!(len));
	vm.frame_mut().memory.set(as_usize!(memory_offset), &data);
	Ok(())
}

pub fn extcodehash(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	pop_u256!(vm, address);
	let address = u256_to_h160(address);
	let hash = match vm.provider.as_ref() {
		Some(provider) if provider.exists(address) => {
			U256::from_big_endian(Keccak256::digest(provider.code(address)).as_slice())
		}
		_ => U256::zero(),
	};
	push_u256!(vm, hash);
	Ok(())
}

pub fn returndatasize(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	let len = U256::from(vm.last_return_data.len());
	push_u256!(vm, len);
	Ok(())
}

pub fn returndatacopy(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	pop_u256!(vm, memory_offset, data_offset, len);

	let end = data_offset
		.checked_add(len)
		.ok_or(ExitError::ReturnDataOutOfBounds)?;
	if end > U256::from(vm.last_return_data.len()) {
		return Err(ExitError::ReturnDataOutOfBounds);
	}

	let data = vm.last_return_data[as_usize!(data_offset)..as_usize!(end)].to_vec();
	vm.frame_mut().memory.set(as_usize!(memory_offset), &data);
	Ok(())
}

pub fn blockhash(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	pop_u256!(vm, number);

	let current = vm
		.require_context("BLOCKHASH")?
		.block
		.as_ref()
		.map(|block| block.number);
	let requested = number.low_u64();

	// Only the 256 most recent complete blocks are visible.
	let hash = match current {
		Some(current)
			if requested < current && !(current > 256 && requested <= current - 256) =>
		{
			match vm.provider.as_ref() {
				Some(provider) => h256_to_u256(provider.block_hash(requested)),
				None => U256::zero(),
			}
		}
		_ => U256::zero(),
	};
	push_u256!(vm, hash);
	Ok(())
}

pub fn coinbase(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	let context = vm.require_context("COINBASE")?;
	let value = match context.block.as_ref() {
		Some(block) => h160_to_u256(block.coinbase),
		None => return Err(ExitError::MissingContext("COINBASE block context")),
	};
	push_u256!(vm, value);
	Ok(())
}

pub fn timestamp(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	let context = vm.require_context("TIMESTAMP")?;
	let value = context
		.block
		.as_ref()
		.map(|block| U256::from(block.timestamp))
		.unwrap_or_default();
	push_u256!(vm, value);
	Ok(())
}

pub fn number(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	let context = vm.require_context("NUMBER")?;
	let value = context
		.block
		.as_ref()
		.map(|block| U256::from(block.number))
		.unwrap_or_default();
	push_u256!(vm, value);
	Ok(())
}

pub fn difficulty(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	let context = vm.require_context("DIFFICULTY")?;
	let value = context
		.block
		.as_ref()
		.map(|block| block.difficulty)
		.unwrap_or_default();
	push_u256!(vm, value);
	Ok(())
}

pub fn gaslimit(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	let context = vm.require_context("GASLIMIT")?;
	let value = context
		.block
		.as_ref()
		.map(|block| U256::from(block.gas_limit))
		.unwrap_or_default();
	push_u256!(vm, value);
	Ok(())
}

pub fn chainid(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	let context = vm.require_context("CHAINID")?;
	let value = context
		.block
		.as_ref()
		.map(|block| block.chain_id)
		.unwrap_or_default();
	push_u256!(vm, value);
	Ok(())
}

pub fn basefee(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	let context = vm.require_context("BASEFEE")?;
	let value = context
		.block
		.as_ref()
		.map(|block| block.base_fee)
		.unwrap_or_default();
	push_u256!(vm, value);
	Ok(())
}

pub fn blobbasefee(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	let context = vm.require_context("BLOBBASEFEE")?;
	let value = context
		.block
		.as_ref()
		.map(|block| block.blob_base_fee)
		.unwrap_or_default();
	push_u256!(vm, value);
	Ok(())
}

pub fn blobhash(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	pop_u256!(vm, index);
	let index = as_usize!(index);
	let value = {
		let context = vm.require_context("BLOBHASH")?;
		context
			.block
			.as_ref()
			.and_then(|block| block.blob_hashes.get(index))
			.map(|hash| h256_to_u256(*hash))
			.unwrap_or_default()
	};
	push_u256!(vm, value);
	Ok(())
}

pub fn sload(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	pop_u256!(vm, slot);
	let value = vm.read_storage(slot)?;
	push_u256!(vm, value);
	Ok(())
}

pub fn sstore(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	if vm.frame().is_static {
		return Err(ExitError::StaticCallStateChange);
	}

	pop_u256!(vm, slot, value);
	vm.write_storage(slot, value)
}

pub fn tload(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	pop_u256!(vm, slot);
	let value = vm.transaction.transient_get(slot);
	push_u256!(vm, value);
	Ok(())
}

pub fn tstore(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	if vm.frame().is_static {
		return Err(ExitError::StaticCallStateChange);
	}

	pop_u256!(vm, slot, value);
	vm.transaction.transient_set(slot, value);
	Ok(())
}

pub fn log(vm: &mut DebuggerVM, n: usize) -> Result<(), ExitError> {
	if vm.frame().is_static {
		return Err(ExitError::StaticCallStateChange);
	}

	vm.frame().stack.require(2 + n)?;
	let address = vm.require_context("LOG")?.address;

	pop_u256!(vm, offset, size);
	let mut topics = Vec::with_capacity(n);
	for _ in 0..n {
		let topic = vm.frame_mut().stack.pop()?;
		topics.push(u256_to_h256(topic));
	}

	let data = vm.frame_mut().memory.get(as_usize!(offset), as_usize!(size));
	vm.logs.push(Log {
		address,
		topics,
		data,
	});
	Ok(())
}

/// Shared setup and teardown for the `CALL` opcode family.
pub fn call(vm: &mut DebuggerVM, scheme: CallScheme) -> Result<(), ExitError> {
	let has_value = matches!(scheme, CallScheme::Call | CallScheme::CallCode);
	vm.frame().stack.require(if has_value { 7 } else { 6 })?;

	pop_u256!(vm, gas, to);
	let value = if has_value {
		let value = vm.frame_mut().stack.pop()?;
		value
	} else {
		U256::zero()
	};
	pop_u256!(vm, args_offset, args_size, ret_offset, ret_size);

	let target = u256_to_h160(to);

	// Debugger convenience mode: without a provider every call is a
	// successful no-op.
	let (exists, target_code) = match vm.provider.as_ref() {
		Some(provider) => (provider.exists(target), provider.code(target)),
		None => {
			push_u256!(vm, U256::one());
			return Ok(());
		}
	};

	if !exists {
		push_u256!(vm, U256::zero());
		return Ok(());
	}

	if target_code.is_empty() {
		// Nothing to run; clear the requested return-data region.
		if ret_size != U256::zero() {
			vm.frame_mut()
				.memory
				.set_zeroed(as_usize!(ret_offset), as_usize!(ret_size));
		}
		push_u256!(vm, U256::one());
		return Ok(());
	}

	let parent = vm.require_context("CALL")?.clone();
	let call_data = if args_size == U256::zero() {
		Vec::new()
	} else {
		vm.frame_mut()
			.memory
			.get(as_usize!(args_offset), as_usize!(args_size))
	};

	let is_static = vm.frame().is_static || scheme == CallScheme::StaticCall;
	let mut frame = Frame::new(Rc::new(target_code), scheme, is_static);
	frame.gas = gas.low_u64();

	let balance_of = match scheme {
		CallScheme::Call | CallScheme::StaticCall => target,
		CallScheme::CallCode | CallScheme::DelegateCall => parent.address,
	};
	let sub_balance = vm
		.provider
		.as_ref()
		.map(|provider| provider.balance(balance_of))
		.unwrap_or_default();

	let sub_context = ExecutionContext {
		caller: match scheme {
			CallScheme::Call | CallScheme::StaticCall => parent.address,
			CallScheme::CallCode | CallScheme::DelegateCall => parent.caller,
		},
		address: match scheme {
			CallScheme::Call | CallScheme::StaticCall => target,
			CallScheme::CallCode | CallScheme::DelegateCall => parent.address,
		},
		origin: parent.origin,
		value: match scheme {
			CallScheme::Call | CallScheme::CallCode => value,
			CallScheme::DelegateCall => parent.value,
			CallScheme::StaticCall => U256::zero(),
		},
		call_data,
		gas_price: parent.gas_price,
		gas: gas.low_u64(),
		balance: sub_balance,
		block: parent.block.clone(),
	};

	if vm.push_frame(frame).is_err() {
		// The depth limit is a failed call, not a failed step.
		push_u256!(vm, U256::zero());
		return Ok(());
	}
	let saved_context = vm.context.replace(sub_context);

	let result = vm.execute_call();
	let sub_reverted = vm.frame().reverted;

	vm.pop_frame()?;
	vm.context = saved_context;

	if let Err(error) = &result {
		trace!(target: "evm-debugger", "sub-call failed: {error:?}");
	}
	let success = result.is_ok() && !sub_reverted;

	if ret_size != U256::zero() {
		let ret_size = as_usize!(ret_size);
		let mut data = vm.last_return_data.clone();
		data.truncate(ret_size);
		vm.frame_mut().memory.set(as_usize!(ret_offset), &data);
	}

	push_u256!(
		vm,
		if success { U256::one() } else { U256::zero() }
	);
	Ok(())
}

/// Contract address for `CREATE`: `keccak256(rlp([sender, nonce]))[12..]`.
fn create_address(sender: H160, nonce: u64) -> H160 {
	let mut stream = rlp::RlpStream::new_list(2);
	stream.append(&sender);
	stream.append(&nonce);
	let hash = Keccak256::digest(&stream.out());
	H160::from_slice(&hash.as_slice()[12..])
}

/// Contract address for `CREATE2`:
/// `keccak256(0xff ++ sender ++ salt ++ keccak256(init_code))[12..]`.
fn create2_address(sender: H160, salt: U256, init_code: &[u8]) -> H160 {
	let code_hash = Keccak256::digest(init_code);
	let mut hasher = Keccak256::new();
	hasher.update([0xff]);
	hasher.update(sender.as_bytes());
	hasher.update(u256_to_h256(salt).as_bytes());
	hasher.update(code_hash);
	let hash = hasher.finalize();
	H160::from_slice(&hash.as_slice()[12..])
}

/// Shared body of `CREATE` and `CREATE2`.
pub fn create(vm: &mut DebuggerVM, is_create2: bool) -> Result<(), ExitError> {
	if vm.frame().is_static {
		return Err(ExitError::StaticCallStateChange);
	}

	let sender = vm.require_context("CREATE")?.address;
	vm.frame().stack.require(if is_create2 { 4 } else { 3 })?;

	pop_u256!(vm, value, offset, size);
	let salt = if is_create2 {
		let salt = vm.frame_mut().stack.pop()?;
		Some(salt)
	} else {
		None
	};
	let init_code = vm.frame_mut().memory.get(as_usize!(offset), as_usize!(size));

	let new_address;
	let created;
	{
		let Some(provider) = vm.provider.as_mut() else {
			return Err(ExitError::MissingContext("CREATE state provider"));
		};

		let nonce = provider.nonce(sender);
		new_address = match salt {
			Some(salt) => create2_address(sender, salt, &init_code),
			None => create_address(sender, nonce),
		};
		provider.set_nonce(sender, nonce + 1);

		created = !provider.exists(new_address)
			&& provider.create_account(new_address, init_code, value).is_ok();
	}

	if created {
		trace!(target: "evm-debugger", "created account {new_address:?}");
		if is_create2 {
			vm.transaction.mark_created(new_address);
		}
		push_u256!(vm, h160_to_u256(new_address));
	} else {
		push_u256!(vm, U256::zero());
	}
	Ok(())
}

pub fn selfdestruct(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	if vm.frame().is_static {
		return Err(ExitError::StaticCallStateChange);
	}

	let address = vm.require_context("SELFDESTRUCT")?.address;
	pop_u256!(vm, beneficiary);
	let beneficiary = u256_to_h160(beneficiary);

	let created_in_transaction = vm.transaction.is_created(address);
	let Some(provider) = vm.provider.as_mut() else {
		return Err(ExitError::MissingContext("SELFDESTRUCT state provider"));
	};

	let balance = provider.balance(address);
	if created_in_transaction {
		// Account newly created in this transaction: delete it wholesale.
		// A self beneficiary burns the balance along with the account.
		if !balance.is_zero() && beneficiary != address {
			let target = provider.balance(beneficiary);
			provider.set_balance(beneficiary, target.overflowing_add(balance).0);
		}
		provider.delete_account(address)?;
	} else if !balance.is_zero() && beneficiary != address {
		// EIP-6780: pre-existing accounts only move their balance.
		let target = provider.balance(beneficiary);
		provider.set_balance(beneficiary, target.overflowing_add(balance).0);
		provider.set_balance(address, U256::zero());
	}

	vm.stopped = true;
	Ok(())
}
