
use mock::{run_binop, run_ternop, word_samples};
use primitive_types::{U256, U512};

const ADD: u8 = 0x01;
const MUL: u8 = 0x02;
const SUB: u8 = 0x03;
const DIV: u8 = 0x04;
const SDIV: u8 = 0x05;
const MOD: u8 = 0x06;
const SMOD: u8 = 0x07;
const ADDMOD: u8 = 0x08;
const MULMOD: u8 = 0x09;
const EXP: u8 = 0x0a;
const SIGNEXTEND: u8 = 0x0b;

fn neg(value: u64) -> U256 {
	U256::zero().overflowing_sub(U256::from(value)).0
}

#[test]
fn add_wraps() {
	assert_eq!(run_binop(ADD, U256::from(2), U256::from(3)), U256::from(5));
	assert_eq!(run_binop(ADD, U256::MAX, U256::one()), U256::zero());
}

#[test]
fn add_is_commutative() {
	for &a in &word_samples() {
		for &b in &word_samples() {
			assert_eq!(run_binop(ADD, a, b), run_binop(ADD, b, a));
		}
	}
}

#[test]
fn mul_wraps() {
	assert_eq!(run_binop(MUL, U256::from(6), U256::from(7)), U256::from(42));
	// (2^255) * 2 wraps to zero.
	assert_eq!(run_binop(MUL, U256::one() << 255, U256::from(2)), U256::zero());
}

#[test]
fn mul_is_commutative() {
	for &a in &word_samples() {
		for &b in &word_samples() {
			assert_eq!(run_binop(MUL, a, b), run_binop(MUL, b, a));
		}
	}
}

#[test]
fn sub_takes_top_minus_second() {
	// a on top of the stack, result a - b.
	assert_eq!(run_binop(SUB, U256::from(5), U256::from(3)), U256::from(2));
	assert_eq!(run_binop(SUB, U256::from(3), U256::from(5)), neg(2));
}

#[test]
fn sub_of_self_is_zero() {
	for &a in &word_samples() {
		assert_eq!(run_binop(SUB, a, a), U256::zero());
	}
}

#[test]
fn div_is_unsigned_and_total() {
	assert_eq!(run_binop(DIV, U256::from(7), U256::from(2)), U256::from(3));
	assert_eq!(run_binop(DIV, U256::from(7), U256::zero()), U256::zero());
	for &a in &word_samples() {
		if a != U256::zero() {
			assert_eq!(run_binop(DIV, a, a), U256::one());
		}
	}
}

#[test]
fn sdiv_signed_semantics() {
	assert_eq!(run_binop(SDIV, neg(6), U256::from(2)), neg(3));
	assert_eq!(run_binop(SDIV, neg(6), neg(2)), U256::from(3));
	assert_eq!(run_binop(SDIV, U256::from(6), U256::zero()), U256::zero());
}

#[test]
fn sdiv_min_signed_by_minus_one_wraps() {
	let min_signed = U256::one() << 255;
	assert_eq!(run_binop(SDIV, min_signed, U256::MAX), min_signed);
}

#[test]
fn mod_is_unsigned_and_total() {
	assert_eq!(run_binop(MOD, U256::from(7), U256::from(3)), U256::one());
	assert_eq!(run_binop(MOD, U256::from(7), U256::zero()), U256::zero());
	for &a in &word_samples() {
		if a != U256::zero() {
			assert_eq!(run_binop(MOD, a, a), U256::zero());
		}
	}
}

#[test]
fn smod_takes_sign_of_dividend() {
	assert_eq!(run_binop(SMOD, neg(5), U256::from(3)), neg(2));
	assert_eq!(run_binop(SMOD, U256::from(5), neg(3)), U256::from(2));
	assert_eq!(run_binop(SMOD, neg(5), U256::zero()), U256::zero());
}

#[test]
fn addmod_matches_wide_arithmetic() {
	for &a in &word_samples() {
		for &b in &word_samples() {
			let m = U256::from(0xffff_fffbu64);
			let wide = (U512::from(a) + U512::from(b)) % U512::from(m);
			assert_eq!(run_ternop(ADDMOD, a, b, m), U256::from(wide.as_u64()));
		}
	}
}

#[test]
fn addmod_by_zero_is_zero() {
	assert_eq!(
		run_ternop(ADDMOD, U256::from(5), U256::from(6), U256::zero()),
		U256::zero()
	);
}

#[test]
fn mulmod_matches_wide_arithmetic() {
	let m = U256::from(997u64);
	for &a in &word_samples() {
		for &b in &word_samples() {
			let wide = (U512::from(a) * U512::from(b)) % U512::from(m);
			assert_eq!(run_ternop(MULMOD, a, b, m), U256::from(wide.as_u64()));
		}
	}
	assert_eq!(
		run_ternop(MULMOD, U256::MAX, U256::MAX, U256::zero()),
		U256::zero()
	);
}

#[test]
fn exp_modular() {
	assert_eq!(run_binop(EXP, U256::zero(), U256::zero()), U256::one());
	assert_eq!(
		run_binop(EXP, U256::from(2), U256::from(10)),
		U256::from(1024)
	);
	assert_eq!(run_binop(EXP, U256::from(2), U256::from(256)), U256::zero());
	assert_eq!(run_binop(EXP, U256::MAX, U256::from(2)), U256::one());
}

#[test]
fn signextend_behavior() {
	assert_eq!(
		run_binop(SIGNEXTEND, U256::zero(), U256::from(0xff)),
		U256::MAX
	);
	assert_eq!(
		run_binop(SIGNEXTEND, U256::zero(), U256::from(0x7f)),
		U256::from(0x7f)
	);
	// Byte 1 of 0x00ff is 0x00: positive, upper bits cleared.
	assert_eq!(
		run_binop(SIGNEXTEND, U256::one(), U256::from(0xff)),
		U256::from(0xff)
	);
	// k >= 31 leaves the word unchanged.
	for &k in &[U256::from(31), U256::from(32), U256::MAX] {
		assert_eq!(
			run_binop(SIGNEXTEND, k, U256::from(0x1234)),
			U256::from(0x1234)
		);
	}
}
