use crate::{CodeMetadata, Memory, Stack};
use alloc::{rc::Rc, vec::Vec};

/// Maximum number of nested call frames.
pub const CALL_DEPTH_LIMIT: usize = 1024;

/// Stack limit of each frame.
pub const STACK_LIMIT: usize = 1024;

/// The kind of call that created a frame.
#[derive(Clone, Copy, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CallScheme {
	/// `CALL`
	Call,
	/// `CALLCODE`
	CallCode,
	/// `DELEGATECALL`
	DelegateCall,
	/// `STATICCALL`
	StaticCall,
}

/// One activation record of a call.
///
/// A frame owns its stack, memory, program counter and return-data buffer.
/// It is pushed on entry to a sub-call or create, and popped when the
/// sub-execution finishes. The root frame is created by the VM constructor
/// and never popped.
#[derive(Clone, Debug)]
pub struct Frame {
	code: Rc<Vec<u8>>,
	metadata: Rc<CodeMetadata>,
	/// Program counter.
	pub position: usize,
	/// Frame stack.
	pub stack: Stack,
	/// Frame memory.
	pub memory: Memory,
	/// Bytes produced by this frame's `RETURN` or `REVERT`.
	pub return_data: Vec<u8>,
	/// Gas budget handed to this frame.
	pub gas: u64,
	/// The kind of call that created the frame.
	pub scheme: CallScheme,
	/// Whether state-changing opcodes are forbidden in this frame and its
	/// sub-tree.
	pub is_static: bool,
	/// Whether this frame exited via `REVERT`.
	pub reverted: bool,
}

impl Frame {
	/// Create a new frame over the given code, with a fresh stack and
	/// memory. The code is scanned for instruction metadata.
	#[must_use]
	pub fn new(code: Rc<Vec<u8>>, scheme: CallScheme, is_static: bool) -> Self {
		let metadata = Rc::new(CodeMetadata::parse(&code[..]));

		Self {
			code,
			metadata,
			position: 0,
			stack: Stack::new(STACK_LIMIT),
			memory: Memory::new(),
			return_data: Vec::new(),
			gas: 0,
			scheme,
			is_static,
			reverted: false,
		}
	}

	/// Frame code.
	#[inline]
	#[must_use]
	pub fn code(&self) -> &[u8] {
		&self.code
	}

	/// Shared handle on the frame code.
	#[inline]
	#[must_use]
	pub fn code_rc(&self) -> Rc<Vec<u8>> {
		Rc::clone(&self.code)
	}

	/// Instruction metadata of the frame code.
	#[inline]
	#[must_use]
	pub fn metadata(&self) -> &CodeMetadata {
		&self.metadata
	}
}
