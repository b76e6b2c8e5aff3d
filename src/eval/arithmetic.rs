use crate::utils::I256;
use core::ops::Rem;
use primitive_types::{U256, U512};

/// Truncate a 512-bit intermediate back to a word, mod 2^256.
fn u512_to_u256(value: U512) -> U256 {
	U256([value.0[0], value.0[1], value.0[2], value.0[3]])
}

#[inline]
pub fn div(op1: U256, op2: U256) -> U256 {
	if op2 == U256::zero() {
		U256::zero()
	} else {
		op1 / op2
	}
}

#[inline]
pub fn sdiv(op1: U256, op2: U256) -> U256 {
	let op1: I256 = op1.into();
	let op2: I256 = op2.into();
	let ret = op1 / op2;
	ret.into()
}

#[inline]
pub fn rem(op1: U256, op2: U256) -> U256 {
	if op2 == U256::zero() {
		U256::zero()
	} else {
		op1 % op2
	}
}

#[inline]
pub fn srem(op1: U256, op2: U256) -> U256 {
	if op2 == U256::zero() {
		U256::zero()
	} else {
		let op1: I256 = op1.into();
		let op2: I256 = op2.into();
		let ret = op1.rem(op2);
		ret.into()
	}
}

#[inline]
pub fn addmod(op1: U256, op2: U256, op3: U256) -> U256 {
	if op3 == U256::zero() {
		U256::zero()
	} else {
		let op1 = U512::from(op1);
		let op2 = U512::from(op2);
		let op3 = U512::from(op3);
		u512_to_u256((op1 + op2) % op3)
	}
}

#[inline]
pub fn mulmod(op1: U256, op2: U256, op3: U256) -> U256 {
	if op3 == U256::zero() {
		U256::zero()
	} else {
		let op1 = U512::from(op1);
		let op2 = U512::from(op2);
		let op3 = U512::from(op3);
		u512_to_u256((op1 * op2) % op3)
	}
}

#[inline]
pub fn exp(op1: U256, op2: U256) -> U256 {
	let mut op1 = op1;
	let mut op2 = op2;
	let mut r: U256 = 1.into();

	while op2 != U256::zero() {
		if op2.bit(0) {
			r = r.overflowing_mul(op1).0;
		}
		op2 = op2 >> 1;
		op1 = op1.overflowing_mul(op1).0;
	}

	r
}

/// Treat the byte at position `op1` (counting from the least significant
/// end) of `op2` as a signed byte and extend its sign bit upward. For
/// `op1 >= 31` the word is already fully extended.
#[inline]
pub fn signextend(op1: U256, op2: U256) -> U256 {
	if op1 >= U256::from(31) {
		op2
	} else {
		let bit = op1.as_usize() * 8 + 7;
		let mask = (U256::one() << (bit + 1)) - U256::one();
		if op2.bit(bit) {
			op2 | !mask
		} else {
			op2 & mask
		}
	}
}
