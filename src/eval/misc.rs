use crate::{interpreter::DebuggerVM, ExitError};
use alloc::{vec, vec::Vec};
use primitive_types::U256;

/// Copy `size` bytes out of `source` starting at `offset`, zero filling
/// past the end of the source.
pub fn copy_padded(source: &[u8], offset: usize, size: usize) -> Vec<u8> {
	let mut data = vec![0u8; size];
	#[allow(clippy::needless_range_loop)]
	for i in 0..size {
		data[i] = offset
			.checked_add(i)
			.and_then(|position| source.get(position))
			.copied()
			.unwrap_or(0);
	}
	data
}

pub fn stop(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	vm.return_value.clear();
	vm.stopped = true;
	Ok(())
}

pub fn push0(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	push_u256!(vm, U256::zero());
	Ok(())
}

pub fn push(vm: &mut DebuggerVM, n: usize) -> Result<(), ExitError> {
	let position = vm.frame().position;
	let code = vm.frame().code_rc();
	let end = position + n;
	if end > code.len() {
		return Err(ExitError::InvalidPC(position));
	}

	let value = U256::from_big_endian(&code[position..end]);
	vm.frame_mut().position = end;
	push_u256!(vm, value);
	Ok(())
}

pub fn dup(vm: &mut DebuggerVM, n: usize) -> Result<(), ExitError> {
	let value = vm.frame().stack.peek(n - 1)?;
	push_u256!(vm, value);
	Ok(())
}

pub fn swap(vm: &mut DebuggerVM, n: usize) -> Result<(), ExitError> {
	vm.frame_mut().stack.swap(n)
}

pub fn pop(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	pop_u256!(vm, _any);
	Ok(())
}

pub fn mload(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	pop_u256!(vm, index);
	let value = vm.frame_mut().memory.read_word(as_usize!(index));
	push_u256!(vm, value);
	Ok(())
}

pub fn mstore(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	pop_u256!(vm, index, value);
	vm.frame_mut().memory.write_word(as_usize!(index), value);
	Ok(())
}

pub fn mstore8(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	pop_u256!(vm, index, value);
	let value = (value.low_u32() & 0xff) as u8;
	vm.frame_mut().memory.set(as_usize!(index), &[value]);
	Ok(())
}

pub fn mcopy(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	pop_u256!(vm, dest_offset, offset, size);
	if size == U256::zero() {
		return Ok(());
	}

	let memory = &mut vm.frame_mut().memory;
	let data = memory.get(as_usize!(offset), as_usize!(size));
	memory.set(as_usize!(dest_offset), &data);
	Ok(())
}

pub fn msize(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	let size = U256::from(vm.frame().memory.accessed_size());
	push_u256!(vm, size);
	Ok(())
}

pub fn jump(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	pop_u256!(vm, dest);
	let dest = as_usize!(dest);
	if !vm.frame().metadata().is_jump_dest(dest) {
		return Err(ExitError::InvalidJump(dest));
	}

	vm.frame_mut().position = dest;
	Ok(())
}

pub fn jumpi(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	pop_u256!(vm, dest, value);
	if value == U256::zero() {
		return Ok(());
	}

	let dest = as_usize!(dest);
	if !vm.frame().metadata().is_jump_dest(dest) {
		return Err(ExitError::InvalidJump(dest));
	}

	vm.frame_mut().position = dest;
	Ok(())
}

/// Pushes the PC of the opcode itself, before the interpreter advanced
/// past the opcode byte.
pub fn pc(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	let position = U256::from(vm.frame().position - 1);
	push_u256!(vm, position);
	Ok(())
}

pub fn ret(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	pop_u256!(vm, offset, size);
	let data = vm.frame_mut().memory.get(as_usize!(offset), as_usize!(size));
	vm.frame_mut().return_data = data.clone();
	vm.return_value = data;
	vm.stopped = true;
	Ok(())
}

pub fn revert(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	pop_u256!(vm, offset, size);
	let data = vm.frame_mut().memory.get(as_usize!(offset), as_usize!(size));
	let frame = vm.frame_mut();
	frame.return_data = data.clone();
	frame.reverted = true;
	vm.return_value = data;
	vm.reverted = true;
	vm.stopped = true;
	Ok(())
}

pub fn calldataload(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	pop_u256!(vm, index);

	let mut load = [0u8; 32];
	{
		let call_data = &vm.require_context("CALLDATALOAD")?.call_data;
		#[allow(clippy::needless_range_loop)]
		for i in 0..32 {
			if let Some(p) = index.checked_add(U256::from(i)) {
				if p <= U256::from(usize::MAX) {
					let p = p.as_usize();
					if p < call_data.len() {
						load[i] = call_data[p];
					}
				}
			}
		}
	}

	push_u256!(vm, U256::from_big_endian(&load));
	Ok(())
}

pub fn calldatasize(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	let len = U256::from(vm.require_context("CALLDATASIZE")?.call_data.len());
	push_u256!(vm, len);
	Ok(())
}

pub fn calldatacopy(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	pop_u256!(vm, memory_offset, data_offset, len);

	let data = {
		let call_data = &vm.require_context("CALLDATACOPY")?.call_data;
		copy_padded(call_data, as_usize!(data_offset), as_usize!(len))
	};
	vm.frame_mut().memory.set(as_usize!(memory_offset), &data);
	Ok(())
}

pub fn codesize(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	let size = U256::from(vm.frame().code().len());
	push_u256!(vm, size);
	Ok(())
}

pub fn codecopy(vm: &mut DebuggerVM) -> Result<(), ExitError> {
	pop_u256!(vm, memory_offset, code_offset, len);

	let code = vm.frame().code_rc();
	let data = copy_padded(&code, as_usize!(code_offset), as_usize!(len));
	vm.frame_mut().memory.set(as_usize!(memory_offset), &data);
	Ok(())
}
