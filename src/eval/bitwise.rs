use crate::utils::{I256, Sign};
use primitive_types::U256;

#[inline]
pub fn slt(op1: U256, op2: U256) -> U256 {
	let op1: I256 = op1.into();
	let op2: I256 = op2.into();

	if op1.lt(&op2) {
		U256::one()
	} else {
		U256::zero()
	}
}

#[inline]
pub fn sgt(op1: U256, op2: U256) -> U256 {
	let op1: I256 = op1.into();
	let op2: I256 = op2.into();

	if op1.gt(&op2) {
		U256::one()
	} else {
		U256::zero()
	}
}

#[inline]
pub fn iszero(op1: U256) -> U256 {
	if op1 == U256::zero() {
		U256::one()
	} else {
		U256::zero()
	}
}

#[inline]
pub fn not(op1: U256) -> U256 {
	!op1
}

/// The `op1`-th byte of `op2`, counting from the most significant end.
#[inline]
pub fn byte(op1: U256, op2: U256) -> U256 {
	if op1 >= U256::from(32) {
		U256::zero()
	} else {
		U256::from(op2.byte(31 - op1.as_usize()))
	}
}

#[inline]
pub fn shl(shift: U256, value: U256) -> U256 {
	if value == U256::zero() || shift >= U256::from(256) {
		U256::zero()
	} else {
		value << shift.as_usize()
	}
}

#[inline]
pub fn shr(shift: U256, value: U256) -> U256 {
	if value == U256::zero() || shift >= U256::from(256) {
		U256::zero()
	} else {
		value >> shift.as_usize()
	}
}

#[inline]
pub fn sar(shift: U256, value: U256) -> U256 {
	let value = I256::from(value);

	if value == I256::zero() || shift >= U256::from(256) {
		let I256(sign, _) = value;
		match sign {
			// value is 0 or >=1, pushing 0
			Sign::Plus | Sign::Zero => U256::zero(),
			// value is <0, pushing -1
			Sign::Minus => I256(Sign::Minus, U256::one()).into(),
		}
	} else {
		let shift = shift.as_usize();

		match value.0 {
			Sign::Plus | Sign::Zero => value.1 >> shift,
			Sign::Minus => {
				let shifted = ((value.1.overflowing_sub(U256::one()).0) >> shift)
					.overflowing_add(U256::one())
					.0;
				I256(Sign::Minus, shifted).into()
			}
		}
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn byte_is_msb_indexed() {
		let value = U256::from_big_endian(&{
			let mut b = [0u8; 32];
			b[0] = 0xaa;
			b[31] = 0xbb;
			b
		});
		assert_eq!(byte(U256::zero(), value), U256::from(0xaa));
		assert_eq!(byte(U256::from(31), value), U256::from(0xbb));
		assert_eq!(byte(U256::from(32), value), U256::zero());
	}

	#[test]
	fn shifts_saturate_past_width() {
		assert_eq!(shl(U256::from(256), U256::one()), U256::zero());
		assert_eq!(shr(U256::from(256), U256::MAX), U256::zero());
		assert_eq!(shl(U256::from(1), U256::one()), U256::from(2));
		assert_eq!(shr(U256::from(1), U256::from(2)), U256::one());
	}

	#[test]
	fn sar_keeps_the_sign() {
		let minus_one = U256::MAX;
		assert_eq!(sar(U256::from(256), minus_one), minus_one);
		assert_eq!(sar(U256::from(256), U256::from(5)), U256::zero());
		// -8 >> 1 == -4
		let minus_eight = U256::zero().overflowing_sub(U256::from(8)).0;
		let minus_four = U256::zero().overflowing_sub(U256::from(4)).0;
		assert_eq!(sar(U256::one(), minus_eight), minus_four);
		assert_eq!(sar(U256::one(), U256::from(8)), U256::from(4));
	}
}
