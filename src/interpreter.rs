use crate::{
	eval::{eval, OpcodeTable},
	frame::{CallScheme, Frame, CALL_DEPTH_LIMIT},
	runtime::{ExecutionContext, Log, TransactionState},
	ExitError, Memory, Opcode, Stack, StateProvider,
};
use alloc::{
	borrow::Cow,
	boxed::Box,
	collections::{BTreeMap, BTreeSet},
	rc::Rc,
	vec,
	vec::Vec,
};
use log::trace;
use primitive_types::{H160, U256};

/// Step-wise EVM interpreter.
///
/// The VM owns the chain of call frames, the per-transaction state and the
/// execution observables. It advances one instruction per [`step`] and can
/// run freely until a breakpoint with [`run_until`]. World state is read
/// and written through an attached [`StateProvider`]; without one the VM
/// keeps a contract-local storage map and treats call targets as
/// successful no-ops.
///
/// [`step`]: Self::step
/// [`run_until`]: Self::run_until
pub struct DebuggerVM {
	frames: Vec<Frame>,
	table: OpcodeTable,
	/// Contract-local persistent storage, used when no provider is wired.
	pub(crate) storage: BTreeMap<U256, U256>,
	/// Per-transaction ephemeral state.
	pub(crate) transaction: TransactionState,
	/// Current execution context; sub-calls swap it out and back.
	pub(crate) context: Option<ExecutionContext>,
	/// External world state, if attached.
	pub(crate) provider: Option<Box<dyn StateProvider>>,
	/// Log entries, in emission order.
	pub(crate) logs: Vec<Log>,
	/// Bytes produced by the most recent `RETURN` or `REVERT`.
	pub(crate) return_value: Vec<u8>,
	/// Return data of the last completed sub-call.
	pub(crate) last_return_data: Vec<u8>,
	/// Whether execution has stopped.
	pub(crate) stopped: bool,
	/// Whether execution ended in `REVERT`.
	pub(crate) reverted: bool,
}

impl DebuggerVM {
	/// Create a VM with a root frame over the given code.
	#[must_use]
	pub fn new(code: Vec<u8>, table: OpcodeTable) -> Self {
		let frame = Frame::new(Rc::new(code), CallScheme::Call, false);

		Self {
			frames: vec![frame],
			table,
			storage: BTreeMap::new(),
			transaction: TransactionState::default(),
			context: None,
			provider: None,
			logs: Vec::new(),
			return_value: Vec::new(),
			last_return_data: Vec::new(),
			stopped: false,
			reverted: false,
		}
	}

	/// Advance execution by exactly one instruction.
	///
	/// Reaching the end of code (or being already stopped) sets the
	/// stopped flag and succeeds.
	///
	/// # Errors
	/// The error of the failing handler; the VM is left as the handler
	/// left it.
	pub fn step(&mut self) -> Result<(), ExitError> {
		let position = self.frame().position;
		if self.stopped || position >= self.frame().code().len() {
			self.stopped = true;
			return Ok(());
		}

		let opcode = Opcode(self.frame().code()[position]);
		self.frame_mut().position = position + 1;

		trace!(
			target: "evm-debugger",
			"step depth={} pc={position} opcode={opcode}",
			self.frames.len(),
		);

		eval(self, opcode)
	}

	/// Step until a breakpoint is reached, the VM stops, or a handler
	/// fails. Halting at a breakpoint leaves the VM non-stopped.
	///
	/// # Errors
	/// `InvalidPC` when the counter lands inside a PUSH immediate, or the
	/// error of the failing handler.
	pub fn run_until(&mut self, breakpoints: &BTreeSet<usize>) -> Result<(), ExitError> {
		loop {
			let position = self.frame().position;
			if self.stopped || position >= self.frame().code().len() {
				self.stopped = true;
				return Ok(());
			}

			if breakpoints.contains(&position) {
				trace!(target: "evm-debugger", "breakpoint hit at pc={position}");
				return Ok(());
			}

			if !self.frame().metadata().is_valid_pc(position) {
				return Err(ExitError::InvalidPC(position));
			}

			self.step()?;
		}
	}

	/// Run the newest frame to completion, preserving the outer execution
	/// flags. Used by the call-family handlers for sub-calls.
	pub(crate) fn execute_call(&mut self) -> Result<(), ExitError> {
		let stopped = self.stopped;
		let reverted = self.reverted;
		self.stopped = false;
		self.reverted = false;

		let result = self.run_to_completion();

		self.stopped = stopped;
		self.reverted = reverted;
		result
	}

	fn run_to_completion(&mut self) -> Result<(), ExitError> {
		while !self.stopped {
			let position = self.frame().position;
			if position >= self.frame().code().len() {
				break;
			}
			if !self.frame().metadata().is_valid_pc(position) {
				return Err(ExitError::InvalidPC(position));
			}

			self.step()?;
		}
		Ok(())
	}

	/// The current (innermost) frame.
	#[must_use]
	pub fn frame(&self) -> &Frame {
		self.frames.last().expect("the root frame is never popped")
	}

	pub(crate) fn frame_mut(&mut self) -> &mut Frame {
		self.frames
			.last_mut()
			.expect("the root frame is never popped")
	}

	pub(crate) fn push_frame(&mut self, frame: Frame) -> Result<(), ExitError> {
		if self.frames.len() >= CALL_DEPTH_LIMIT {
			return Err(ExitError::CallDepthLimit);
		}

		trace!(target: "evm-debugger", "enter frame depth={}", self.frames.len() + 1);
		self.frames.push(frame);
		Ok(())
	}

	pub(crate) fn pop_frame(&mut self) -> Result<(), ExitError> {
		if self.frames.len() <= 1 {
			return Err(ExitError::Other(Cow::Borrowed("cannot pop the root frame")));
		}

		if let Some(frame) = self.frames.pop() {
			self.last_return_data = frame.return_data;
		}
		trace!(target: "evm-debugger", "exit frame depth={}", self.frames.len());
		Ok(())
	}

	pub(crate) fn require_context(
		&self,
		what: &'static str,
	) -> Result<&ExecutionContext, ExitError> {
		self.context.as_ref().ok_or(ExitError::MissingContext(what))
	}

	/// Read a persistent storage slot: through the provider when one is
	/// attached, from the contract-local map otherwise. Unset slots read
	/// as zero.
	pub(crate) fn read_storage(&self, slot: U256) -> Result<U256, ExitError> {
		match self.provider.as_ref() {
			Some(provider) => {
				let address = self.require_context("SLOAD")?.address;
				Ok(provider.storage(address, slot))
			}
			None => Ok(self.storage.get(&slot).copied().unwrap_or_default()),
		}
	}

	/// Write a persistent storage slot. Zero values are stored, not
	/// erased.
	pub(crate) fn write_storage(&mut self, slot: U256, value: U256) -> Result<(), ExitError> {
		match self.provider.as_mut() {
			Some(provider) => {
				let address = self
					.context
					.as_ref()
					.ok_or(ExitError::MissingContext("SSTORE"))?
					.address;
				provider.set_storage(address, slot, value);
				Ok(())
			}
			None => {
				self.storage.insert(slot, value);
				Ok(())
			}
		}
	}

	/// Debit the context gas counter.
	///
	/// # Errors
	/// `OutOfGas` when the counter is insufficient, `MissingContext`
	/// without a context.
	pub fn use_gas(&mut self, amount: u64) -> Result<(), ExitError> {
		let context = self
			.context
			.as_mut()
			.ok_or(ExitError::MissingContext("gas accounting"))?;
		if context.gas < amount {
			return Err(ExitError::OutOfGas);
		}
		context.gas -= amount;
		Ok(())
	}
}

// Observables.
impl DebuggerVM {
	/// Program counter of the current frame.
	#[must_use]
	pub fn pc(&self) -> usize {
		self.frame().position
	}

	/// Stack of the current frame.
	#[must_use]
	pub fn stack(&self) -> &Stack {
		&self.frame().stack
	}

	/// Memory of the current frame.
	#[must_use]
	pub fn memory(&self) -> &Memory {
		&self.frame().memory
	}

	/// Code of the current frame.
	#[must_use]
	pub fn code(&self) -> &[u8] {
		self.frame().code()
	}

	/// Bytes produced by the most recent `RETURN` or `REVERT`.
	#[must_use]
	pub fn return_value(&self) -> &[u8] {
		&self.return_value
	}

	/// Return data of the last completed sub-call, as observed by
	/// `RETURNDATASIZE` and `RETURNDATACOPY`.
	#[must_use]
	pub fn return_data(&self) -> &[u8] {
		&self.last_return_data
	}

	/// Log entries emitted so far, in execution order.
	#[must_use]
	pub fn logs(&self) -> &[Log] {
		&self.logs
	}

	/// Whether execution has stopped.
	#[must_use]
	pub fn stopped(&self) -> bool {
		self.stopped
	}

	/// Whether execution ended in `REVERT`.
	#[must_use]
	pub fn reverted(&self) -> bool {
		self.reverted
	}

	/// Number of active frames. `1` outside of any sub-call.
	#[must_use]
	pub fn call_depth(&self) -> usize {
		self.frames.len()
	}

	/// The opcode dispatch table.
	#[must_use]
	pub fn table(&self) -> &OpcodeTable {
		&self.table
	}

	/// Mutable access to the dispatch table, e.g. for instrumenting
	/// single opcodes.
	pub fn table_mut(&mut self) -> &mut OpcodeTable {
		&mut self.table
	}

	/// The current execution context, if one is set.
	#[must_use]
	pub fn context(&self) -> Option<&ExecutionContext> {
		self.context.as_ref()
	}

	/// Mutable access to the current execution context.
	pub fn context_mut(&mut self) -> Option<&mut ExecutionContext> {
		self.context.as_mut()
	}
}

// Host mutators.
impl DebuggerVM {
	/// Set the execution context of the current message.
	pub fn set_context(&mut self, context: ExecutionContext) {
		self.context = Some(context);
	}

	/// Move the current frame's program counter, e.g. to replay a region.
	pub fn set_pc(&mut self, position: usize) {
		self.frame_mut().position = position;
	}

	/// Attach a world-state provider.
	pub fn set_state_provider(&mut self, provider: Box<dyn StateProvider>) {
		self.provider = Some(provider);
	}

	/// Read a transient storage slot. Unset slots read as zero.
	#[must_use]
	pub fn read_transient_storage(&self, slot: U256) -> U256 {
		self.transaction.transient_get(slot)
	}

	/// Write a transient storage slot, as `TSTORE` would.
	pub fn write_transient_storage(&mut self, slot: U256, value: U256) {
		self.transaction.transient_set(slot, value);
	}

	/// Drop all transient storage. Hosts call this between transactions.
	pub fn clear_transient_storage(&mut self) {
		self.transaction.clear_transient();
	}

	/// Record an address as created in the current transaction, for the
	/// EIP-6780 `SELFDESTRUCT` rule.
	pub fn mark_account_created_in_transaction(&mut self, address: H160) {
		self.transaction.mark_created(address);
	}

	/// Whether the address was created in the current transaction.
	#[must_use]
	pub fn is_account_created_in_transaction(&self, address: H160) -> bool {
		self.transaction.is_created(address)
	}

	/// Reset the whole per-transaction state: transient storage and the
	/// created-accounts set.
	pub fn clear_transaction_state(&mut self) {
		self.transaction.clear();
	}
}
