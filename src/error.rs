use crate::Opcode;
use alloc::borrow::Cow;
use core::fmt;

/// Errors aborting a single `step`. The VM itself is left as the failing
/// handler left it; `stopped` and `reverted` are untouched unless the
/// handler set them before failing.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize))]
pub enum ExitError {
	/// Trying to pop from an empty stack.
	StackUnderflow,
	/// Trying to push into a stack over stack limit.
	StackOverflow,
	/// Jump destination is not a `JUMPDEST` of the current frame's code.
	InvalidJump(usize),
	/// Opcode byte has no handler, or is the designated invalid opcode.
	InvalidOpcode(Opcode),
	/// Program counter points inside a PUSH immediate.
	InvalidPC(usize),
	/// State-changing opcode attempted under a static call frame.
	StaticCallStateChange,
	/// Frame push would exceed the maximum call depth.
	CallDepthLimit,
	/// A context-dependent opcode ran without the required context field.
	MissingContext(&'static str),
	/// `RETURNDATACOPY` reads past the end of the return data buffer.
	ReturnDataOutOfBounds,
	/// The Keccak primitive rejected its input (unused with the bundled
	/// hasher; kept for hosts that swap in their own).
	InvalidSha3,
	/// The gas counter went below zero.
	OutOfGas,
	/// Other errors, raised by state backends.
	Other(Cow<'static, str>),
}

impl fmt::Display for ExitError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::StackUnderflow => write!(f, "stack underflow"),
			Self::StackOverflow => write!(f, "stack overflow"),
			Self::InvalidJump(dest) => write!(f, "invalid jump destination 0x{dest:x}"),
			Self::InvalidOpcode(opcode) => write!(f, "invalid opcode {opcode}"),
			Self::InvalidPC(position) => {
				write!(f, "invalid PC 0x{position:x} (inside a PUSH immediate)")
			}
			Self::StaticCallStateChange => {
				write!(f, "state change operation in static call context")
			}
			Self::CallDepthLimit => write!(f, "call depth limit exceeded"),
			Self::MissingContext(what) => write!(f, "execution context not set: {what}"),
			Self::ReturnDataOutOfBounds => write!(f, "return data read out of bounds"),
			Self::InvalidSha3 => write!(f, "invalid SHA3 hash calculation"),
			Self::OutOfGas => write!(f, "out of gas"),
			Self::Other(s) => write!(f, "{s}"),
		}
	}
}

#[cfg(feature = "std")]
impl std::error::Error for ExitError {}
