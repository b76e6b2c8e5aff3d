//! Opcode handlers and the dispatch table.

#[macro_use]
mod macros;
mod arithmetic;
mod bitwise;
mod misc;
mod system;

use crate::{frame::CallScheme, interpreter::DebuggerVM, ExitError, Opcode};
use core::ops::{BitAnd, BitOr, BitXor, Deref, DerefMut};
use primitive_types::U256;

/// Handler function type. Handlers run after the interpreter advanced the
/// PC past the opcode byte; they mutate the current frame and the VM
/// observables through the interpreter's primitives.
pub type OpcodeFn = fn(&mut DebuggerVM, Opcode) -> Result<(), ExitError>;

/// Dense opcode dispatch table: one handler per byte value. Undefined
/// bytes and the designated invalid opcode fail the step.
pub struct OpcodeTable([OpcodeFn; 256]);

impl OpcodeTable {
	/// The full opcode table of the debugger.
	#[must_use]
	pub const fn core() -> Self {
		Self(table())
	}
}

impl Default for OpcodeTable {
	fn default() -> Self {
		Self::core()
	}
}

impl Deref for OpcodeTable {
	type Target = [OpcodeFn; 256];

	fn deref(&self) -> &[OpcodeFn; 256] {
		&self.0
	}
}

impl DerefMut for OpcodeTable {
	fn deref_mut(&mut self) -> &mut [OpcodeFn; 256] {
		&mut self.0
	}
}

#[inline]
pub(crate) fn eval(vm: &mut DebuggerVM, opcode: Opcode) -> Result<(), ExitError> {
	let f = vm.table()[opcode.as_usize()];
	f(vm, opcode)
}

fn eval_unknown(_vm: &mut DebuggerVM, opcode: Opcode) -> Result<(), ExitError> {
	Err(ExitError::InvalidOpcode(opcode))
}

fn eval_stop(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::misc::stop(vm)
}

fn eval_add(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	op2_u256_tuple!(vm, overflowing_add)
}

fn eval_mul(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	op2_u256_tuple!(vm, overflowing_mul)
}

fn eval_sub(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	op2_u256_tuple!(vm, overflowing_sub)
}

fn eval_div(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	op2_u256_fn!(vm, self::arithmetic::div)
}

fn eval_sdiv(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	op2_u256_fn!(vm, self::arithmetic::sdiv)
}

fn eval_mod(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	op2_u256_fn!(vm, self::arithmetic::rem)
}

fn eval_smod(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	op2_u256_fn!(vm, self::arithmetic::srem)
}

fn eval_addmod(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	op3_u256_fn!(vm, self::arithmetic::addmod)
}

fn eval_mulmod(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	op3_u256_fn!(vm, self::arithmetic::mulmod)
}

fn eval_exp(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	op2_u256_fn!(vm, self::arithmetic::exp)
}

fn eval_signextend(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	op2_u256_fn!(vm, self::arithmetic::signextend)
}

fn eval_lt(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	op2_u256_bool_ref!(vm, lt)
}

fn eval_gt(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	op2_u256_bool_ref!(vm, gt)
}

fn eval_slt(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	op2_u256_fn!(vm, self::bitwise::slt)
}

fn eval_sgt(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	op2_u256_fn!(vm, self::bitwise::sgt)
}

fn eval_eq(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	op2_u256_bool_ref!(vm, eq)
}

fn eval_iszero(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	op1_u256_fn!(vm, self::bitwise::iszero)
}

fn eval_and(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	op2_u256!(vm, bitand)
}

fn eval_or(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	op2_u256!(vm, bitor)
}

fn eval_xor(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	op2_u256!(vm, bitxor)
}

fn eval_not(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	op1_u256_fn!(vm, self::bitwise::not)
}

fn eval_byte(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	op2_u256_fn!(vm, self::bitwise::byte)
}

fn eval_shl(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	op2_u256_fn!(vm, self::bitwise::shl)
}

fn eval_shr(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	op2_u256_fn!(vm, self::bitwise::shr)
}

fn eval_sar(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	op2_u256_fn!(vm, self::bitwise::sar)
}

fn eval_sha3(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::sha3(vm)
}

fn eval_address(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::address(vm)
}

fn eval_balance(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::balance(vm)
}

fn eval_origin(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::origin(vm)
}

fn eval_caller(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::caller(vm)
}

fn eval_callvalue(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::callvalue(vm)
}

fn eval_calldataload(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::misc::calldataload(vm)
}

fn eval_calldatasize(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::misc::calldatasize(vm)
}

fn eval_calldatacopy(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::misc::calldatacopy(vm)
}

fn eval_codesize(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::misc::codesize(vm)
}

fn eval_codecopy(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::misc::codecopy(vm)
}

fn eval_gasprice(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::gasprice(vm)
}

fn eval_extcodesize(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::extcodesize(vm)
}

fn eval_extcodecopy(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::extcodecopy(vm)
}

fn eval_returndatasize(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::returndatasize(vm)
}

fn eval_returndatacopy(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::returndatacopy(vm)
}

fn eval_extcodehash(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::extcodehash(vm)
}

fn eval_blockhash(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::blockhash(vm)
}

fn eval_coinbase(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::coinbase(vm)
}

fn eval_timestamp(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::timestamp(vm)
}

fn eval_number(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::number(vm)
}

fn eval_difficulty(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::difficulty(vm)
}

fn eval_gaslimit(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::gaslimit(vm)
}

fn eval_chainid(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::chainid(vm)
}

fn eval_selfbalance(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::selfbalance(vm)
}

fn eval_basefee(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::basefee(vm)
}

fn eval_blobhash(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::blobhash(vm)
}

fn eval_blobbasefee(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::blobbasefee(vm)
}

fn eval_pop(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::misc::pop(vm)
}

fn eval_mload(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::misc::mload(vm)
}

fn eval_mstore(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::misc::mstore(vm)
}

fn eval_mstore8(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::misc::mstore8(vm)
}

fn eval_sload(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::sload(vm)
}

fn eval_sstore(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::sstore(vm)
}

fn eval_jump(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::misc::jump(vm)
}

fn eval_jumpi(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::misc::jumpi(vm)
}

fn eval_pc(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::misc::pc(vm)
}

fn eval_msize(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::misc::msize(vm)
}

fn eval_gas(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::gas(vm)
}

fn eval_jumpdest(_vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	Ok(())
}

fn eval_tload(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::tload(vm)
}

fn eval_tstore(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::tstore(vm)
}

fn eval_mcopy(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::misc::mcopy(vm)
}

fn eval_push0(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::misc::push0(vm)
}

fn eval_push(vm: &mut DebuggerVM, opcode: Opcode) -> Result<(), ExitError> {
	self::misc::push(vm, (opcode.0 - Opcode::PUSH1.0) as usize + 1)
}

fn eval_dup(vm: &mut DebuggerVM, opcode: Opcode) -> Result<(), ExitError> {
	self::misc::dup(vm, (opcode.0 - Opcode::DUP1.0) as usize + 1)
}

fn eval_swap(vm: &mut DebuggerVM, opcode: Opcode) -> Result<(), ExitError> {
	self::misc::swap(vm, (opcode.0 - Opcode::SWAP1.0) as usize + 1)
}

fn eval_log(vm: &mut DebuggerVM, opcode: Opcode) -> Result<(), ExitError> {
	self::system::log(vm, (opcode.0 - Opcode::LOG0.0) as usize)
}

fn eval_create(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::create(vm, false)
}

fn eval_call(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::call(vm, CallScheme::Call)
}

fn eval_callcode(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::call(vm, CallScheme::CallCode)
}

fn eval_return(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::misc::ret(vm)
}

fn eval_delegatecall(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::call(vm, CallScheme::DelegateCall)
}

fn eval_create2(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::create(vm, true)
}

fn eval_staticcall(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::call(vm, CallScheme::StaticCall)
}

fn eval_revert(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::misc::revert(vm)
}

fn eval_invalid(_vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	// The designated invalid opcode is explicitly reserved to fail.
	Err(ExitError::InvalidOpcode(Opcode::INVALID))
}

fn eval_selfdestruct(vm: &mut DebuggerVM, _opcode: Opcode) -> Result<(), ExitError> {
	self::system::selfdestruct(vm)
}

const fn table() -> [OpcodeFn; 256] {
	let mut table = [eval_unknown as OpcodeFn; 256];

	table[Opcode::STOP.as_usize()] = eval_stop;
	table[Opcode::ADD.as_usize()] = eval_add;
	table[Opcode::MUL.as_usize()] = eval_mul;
	table[Opcode::SUB.as_usize()] = eval_sub;
	table[Opcode::DIV.as_usize()] = eval_div;
	table[Opcode::SDIV.as_usize()] = eval_sdiv;
	table[Opcode::MOD.as_usize()] = eval_mod;
	table[Opcode::SMOD.as_usize()] = eval_smod;
	table[Opcode::ADDMOD.as_usize()] = eval_addmod;
	table[Opcode::MULMOD.as_usize()] = eval_mulmod;
	table[Opcode::EXP.as_usize()] = eval_exp;
	table[Opcode::SIGNEXTEND.as_usize()] = eval_signextend;
	table[Opcode::LT.as_usize()] = eval_lt;
	table[Opcode::GT.as_usize()] = eval_gt;
	table[Opcode::SLT.as_usize()] = eval_slt;
	table[Opcode::SGT.as_usize()] = eval_sgt;
	table[Opcode::EQ.as_usize()] = eval_eq;
	table[Opcode::ISZERO.as_usize()] = eval_iszero;
	table[Opcode::AND.as_usize()] = eval_and;
	table[Opcode::OR.as_usize()] = eval_or;
	table[Opcode::XOR.as_usize()] = eval_xor;
	table[Opcode::NOT.as_usize()] = eval_not;
	table[Opcode::BYTE.as_usize()] = eval_byte;
	table[Opcode::SHL.as_usize()] = eval_shl;
	table[Opcode::SHR.as_usize()] = eval_shr;
	table[Opcode::SAR.as_usize()] = eval_sar;
	table[Opcode::SHA3.as_usize()] = eval_sha3;
	table[Opcode::ADDRESS.as_usize()] = eval_address;
	table[Opcode::BALANCE.as_usize()] = eval_balance;
	table[Opcode::ORIGIN.as_usize()] = eval_origin;
	table[Opcode::CALLER.as_usize()] = eval_caller;
	table[Opcode::CALLVALUE.as_usize()] = eval_callvalue;
	table[Opcode::CALLDATALOAD.as_usize()] = eval_calldataload;
	table[Opcode::CALLDATASIZE.as_usize()] = eval_calldatasize;
	table[Opcode::CALLDATACOPY.as_usize()] = eval_calldatacopy;
	table[Opcode::CODESIZE.as_usize()] = eval_codesize;
	table[Opcode::CODECOPY.as_usize()] = eval_codecopy;
	table[Opcode::GASPRICE.as_usize()] = eval_gasprice;
	table[Opcode::EXTCODESIZE.as_usize()] = eval_extcodesize;
	table[Opcode::EXTCODECOPY.as_usize()] = eval_extcodecopy;
	table[Opcode::RETURNDATASIZE.as_usize()] = eval_returndatasize;
	table[Opcode::RETURNDATACOPY.as_usize()] = eval_returndatacopy;
	table[Opcode::EXTCODEHASH.as_usize()] = eval_extcodehash;
	table[Opcode::BLOCKHASH.as_usize()] = eval_blockhash;
	table[Opcode::COINBASE.as_usize()] = eval_coinbase;
	table[Opcode::TIMESTAMP.as_usize()] = eval_timestamp;
	table[Opcode::NUMBER.as_usize()] = eval_number;
	table[Opcode::DIFFICULTY.as_usize()] = eval_difficulty;
	table[Opcode::GASLIMIT.as_usize()] = eval_gaslimit;
	table[Opcode::CHAINID.as_usize()] = eval_chainid;
	table[Opcode::SELFBALANCE.as_usize()] = eval_selfbalance;
	table[Opcode::BASEFEE.as_usize()] = eval_basefee;
	table[Opcode::BLOBHASH.as_usize()] = eval_blobhash;
	table[Opcode::BLOBBASEFEE.as_usize()] = eval_blobbasefee;
	table[Opcode::POP.as_usize()] = eval_pop;
	table[Opcode::MLOAD.as_usize()] = eval_mload;
	table[Opcode::MSTORE.as_usize()] = eval_mstore;
	table[Opcode::MSTORE8.as_usize()] = eval_mstore8;
	table[Opcode::SLOAD.as_usize()] = eval_sload;
	table[Opcode::SSTORE.as_usize()] = eval_sstore;
	table[Opcode::JUMP.as_usize()] = eval_jump;
	table[Opcode::JUMPI.as_usize()] = eval_jumpi;
	table[Opcode::PC.as_usize()] = eval_pc;
	table[Opcode::MSIZE.as_usize()] = eval_msize;
	table[Opcode::GAS.as_usize()] = eval_gas;
	table[Opcode::JUMPDEST.as_usize()] = eval_jumpdest;
	table[Opcode::TLOAD.as_usize()] = eval_tload;
	table[Opcode::TSTORE.as_usize()] = eval_tstore;
	table[Opcode::MCOPY.as_usize()] = eval_mcopy;
	table[Opcode::PUSH0.as_usize()] = eval_push0;

	let mut position = Opcode::PUSH1.as_usize();
	while position <= Opcode::PUSH32.as_usize() {
		table[position] = eval_push;
		position += 1;
	}

	let mut position = Opcode::DUP1.as_usize();
	while position <= Opcode::DUP16.as_usize() {
		table[position] = eval_dup;
		position += 1;
	}

	let mut position = Opcode::SWAP1.as_usize();
	while position <= Opcode::SWAP16.as_usize() {
		table[position] = eval_swap;
		position += 1;
	}

	let mut position = Opcode::LOG0.as_usize();
	while position <= Opcode::LOG4.as_usize() {
		table[position] = eval_log;
		position += 1;
	}

	table[Opcode::CREATE.as_usize()] = eval_create;
	table[Opcode::CALL.as_usize()] = eval_call;
	table[Opcode::CALLCODE.as_usize()] = eval_callcode;
	table[Opcode::RETURN.as_usize()] = eval_return;
	table[Opcode::DELEGATECALL.as_usize()] = eval_delegatecall;
	table[Opcode::CREATE2.as_usize()] = eval_create2;
	table[Opcode::STATICCALL.as_usize()] = eval_staticcall;
	table[Opcode::REVERT.as_usize()] = eval_revert;
	table[Opcode::INVALID.as_usize()] = eval_invalid;
	table[Opcode::SELFDESTRUCT.as_usize()] = eval_selfdestruct;

	table
}
