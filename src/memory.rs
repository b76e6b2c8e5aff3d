use alloc::{vec, vec::Vec};
use primitive_types::U256;

/// A sequential memory: byte addressed, zero initialized, growing on
/// access.
///
/// Two sizes are observable. The backing store grows in 32-byte steps to
/// cover every touched window. The *accessed size* is the byte after the
/// highest offset any read or write has touched, rounded up to 32; this is
/// what `MSIZE` reports. Zero-sized operations touch nothing.
#[derive(Clone, Debug, Default)]
pub struct Memory {
	data: Vec<u8>,
	accessed_size: usize,
}

/// Round up to the next multiple of 32.
fn next_multiple_of_word(mut size: usize) -> usize {
	while size % 32 != 0 {
		size += 1;
	}
	size
}

impl Memory {
	/// Create a new, empty memory.
	#[must_use]
	pub fn new() -> Self {
		Self::default()
	}

	/// Length of the backing store. Always a multiple of 32.
	#[inline]
	#[must_use]
	pub fn len(&self) -> usize {
		self.data.len()
	}

	/// Return true if no byte has been touched yet.
	#[inline]
	#[must_use]
	pub fn is_empty(&self) -> bool {
		self.data.is_empty()
	}

	/// The accessed size: one past the highest touched byte, rounded up
	/// to 32. Monotonically non-decreasing.
	#[inline]
	#[must_use]
	pub fn accessed_size(&self) -> usize {
		self.accessed_size
	}

	/// The raw backing bytes.
	#[inline]
	#[must_use]
	pub fn data(&self) -> &[u8] {
		&self.data
	}

	/// Grow the backing store to cover `[offset, offset + size)` and raise
	/// the accessed size. `size == 0` is a no-op.
	fn touch(&mut self, offset: usize, size: usize) {
		if size == 0 {
			return;
		}

		let end = next_multiple_of_word(offset + size);
		if end > self.data.len() {
			self.data.resize(end, 0);
		}
		if end > self.accessed_size {
			self.accessed_size = end;
		}
	}

	/// Copy out a memory region, expanding memory to cover it.
	#[must_use]
	pub fn get(&mut self, offset: usize, size: usize) -> Vec<u8> {
		self.touch(offset, size);
		if size == 0 {
			return Vec::new();
		}

		self.data[offset..offset + size].to_vec()
	}

	/// Write a byte slice at the given offset, expanding memory to cover
	/// it.
	pub fn set(&mut self, offset: usize, value: &[u8]) {
		self.touch(offset, value.len());
		if value.is_empty() {
			return;
		}

		self.data[offset..offset + value.len()].copy_from_slice(value);
	}

	/// Read exactly 32 bytes at the given offset as a big-endian word.
	#[must_use]
	pub fn read_word(&mut self, offset: usize) -> U256 {
		self.touch(offset, 32);
		U256::from_big_endian(&self.data[offset..offset + 32])
	}

	/// Write a word at the given offset, big-endian, zero padded on the
	/// left.
	pub fn write_word(&mut self, offset: usize, value: U256) {
		let mut bytes = [0u8; 32];
		value.to_big_endian(&mut bytes);
		self.set(offset, &bytes);
	}

	/// Fill `[offset, offset + size)` with zero bytes.
	pub fn set_zeroed(&mut self, offset: usize, size: usize) {
		if size == 0 {
			return;
		}

		self.set(offset, &vec![0u8; size]);
	}
}
