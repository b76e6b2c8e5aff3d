use crate::ExitError;
use alloc::vec::Vec;
use primitive_types::{H160, H256, U256};

/// World-state capability consumed by the VM.
///
/// The debugger core never implements this; hosts wire in their chain
/// state, test fixtures, or RPC-backed snapshots. Without a provider the
/// VM falls back to a contract-local storage map and treats every call
/// target as a successful no-op.
pub trait StateProvider {
	/// Get balance of address.
	fn balance(&self, address: H160) -> U256;
	/// Get code of address.
	fn code(&self, address: H160) -> Vec<u8>;
	/// Get storage value of address at slot.
	fn storage(&self, address: H160, slot: U256) -> U256;
	/// Set storage value of address at slot.
	fn set_storage(&mut self, address: H160, slot: U256, value: U256);
	/// Check whether an address exists.
	fn exists(&self, address: H160) -> bool;
	/// Get the hash of one of the 256 most recent complete blocks.
	fn block_hash(&self, number: u64) -> H256;
	/// Create a new account with the given code and balance.
	///
	/// # Errors
	/// Provider-defined; a failure makes the `CREATE`/`CREATE2` opcode
	/// push zero.
	fn create_account(&mut self, address: H160, code: Vec<u8>, balance: U256)
		-> Result<(), ExitError>;
	/// Get the nonce of address.
	fn nonce(&self, address: H160) -> u64;
	/// Set the nonce of address.
	fn set_nonce(&mut self, address: H160, nonce: u64);
	/// Set balance of address.
	fn set_balance(&mut self, address: H160, balance: U256);
	/// Delete an account wholesale: code, storage, nonce and balance.
	///
	/// # Errors
	/// Provider-defined; surfaces from the `SELFDESTRUCT` handler.
	fn delete_account(&mut self, address: H160) -> Result<(), ExitError>;
}
