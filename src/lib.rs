//! Step-wise debugger and interpreter for EVM bytecode.
//!
//! The [`DebuggerVM`] executes one instruction at a time, exposing the
//! stack, memory, storage, transient storage, logs, return data and the
//! nested call-frame chain after every step, and can run freely until a
//! set of program-counter breakpoints is reached.
//!
//! World state (accounts, code, balances, persistent storage, block
//! hashes, nonces) is consumed through the [`StateProvider`] capability
//! and never implemented here. Gas is carried as scaffolding only: each
//! context has a counter and [`DebuggerVM::use_gas`] debits it, but
//! opcode handlers do not meter.
//!
//! ```
//! use evm_debugger::{DebuggerVM, OpcodeTable};
//! use primitive_types::U256;
//!
//! // PUSH1 2; PUSH1 3; ADD; STOP
//! let mut vm = DebuggerVM::new(vec![0x60, 0x02, 0x60, 0x03, 0x01, 0x00], OpcodeTable::core());
//! while !vm.stopped() {
//! 	vm.step().unwrap();
//! }
//! assert_eq!(vm.stack().data(), &vec![U256::from(5)]);
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

extern crate alloc;

mod backend;
mod error;
mod eval;
mod frame;
mod interpreter;
mod memory;
mod metadata;
mod opcode;
mod runtime;
mod stack;
pub mod utils;

pub use crate::backend::StateProvider;
pub use crate::error::ExitError;
pub use crate::eval::{OpcodeFn, OpcodeTable};
pub use crate::frame::{CallScheme, Frame, CALL_DEPTH_LIMIT, STACK_LIMIT};
pub use crate::interpreter::DebuggerVM;
pub use crate::memory::Memory;
pub use crate::metadata::CodeMetadata;
pub use crate::opcode::Opcode;
pub use crate::runtime::{BlockContext, ExecutionContext, Log, TransactionState};
pub use crate::stack::Stack;
