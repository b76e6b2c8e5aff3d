use alloc::{
	collections::{BTreeMap, BTreeSet},
	vec::Vec,
};
use primitive_types::{H160, H256, U256};

/// Block information made visible to the executing code.
#[derive(Clone, Debug, Default)]
pub struct BlockContext {
	/// `COINBASE`: the block's beneficiary address.
	pub coinbase: H160,
	/// `TIMESTAMP`, in seconds since the unix epoch.
	pub timestamp: u64,
	/// `NUMBER`: the block height.
	pub number: u64,
	/// `DIFFICULTY` (`PREVRANDAO` after the merge).
	pub difficulty: U256,
	/// `GASLIMIT` of the block.
	pub gas_limit: u64,
	/// `CHAINID`.
	pub chain_id: U256,
	/// `BASEFEE` per gas.
	pub base_fee: U256,
	/// `BLOBBASEFEE` per blob gas.
	pub blob_base_fee: U256,
	/// Versioned hashes of the transaction blobs, for `BLOBHASH`.
	pub blob_hashes: Vec<H256>,
}

/// The message-level execution context. Sub-calls replace the VM's current
/// context and restore it when they return.
#[derive(Clone, Debug, Default)]
pub struct ExecutionContext {
	/// Address that made the current call.
	pub caller: H160,
	/// Address whose storage and balance the code acts on.
	pub address: H160,
	/// Transaction origin, constant across the call tree.
	pub origin: H160,
	/// Apparent value of the call, reported by `CALLVALUE`.
	pub value: U256,
	/// Input bytes of the call.
	pub call_data: Vec<u8>,
	/// `GASPRICE` of the transaction.
	pub gas_price: U256,
	/// Remaining gas counter.
	pub gas: u64,
	/// Balance observable through `SELFBALANCE` and `BALANCE`.
	pub balance: U256,
	/// Block context, if one is attached.
	pub block: Option<BlockContext>,
}

/// One emitted log entry.
#[derive(Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "with-serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Log {
	/// Address that emitted the log.
	pub address: H160,
	/// Log topics, zero to four of them.
	pub topics: Vec<H256>,
	/// Log payload.
	pub data: Vec<u8>,
}

/// Per-transaction ephemeral state: the transient storage map and the set
/// of accounts created during the current transaction (EIP-6780). Owned by
/// the VM; the host clears it between transactions.
#[derive(Clone, Debug, Default)]
pub struct TransactionState {
	created: BTreeSet<H160>,
	transient: BTreeMap<U256, U256>,
}

impl TransactionState {
	/// Whether the address was created during this transaction.
	#[must_use]
	pub fn is_created(&self, address: H160) -> bool {
		self.created.contains(&address)
	}

	/// Record an address as created during this transaction.
	pub fn mark_created(&mut self, address: H160) {
		self.created.insert(address);
	}

	/// Read a transient storage slot. Unset slots read as zero.
	#[must_use]
	pub fn transient_get(&self, slot: U256) -> U256 {
		self.transient.get(&slot).copied().unwrap_or_default()
	}

	/// Write a transient storage slot.
	pub fn transient_set(&mut self, slot: U256, value: U256) {
		self.transient.insert(slot, value);
	}

	/// Drop every transient storage slot.
	pub fn clear_transient(&mut self) {
		self.transient.clear();
	}

	/// Reset the whole per-transaction state.
	pub fn clear(&mut self) {
		self.created.clear();
		self.transient.clear();
	}
}
