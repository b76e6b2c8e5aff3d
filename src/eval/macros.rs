macro_rules! pop_u256 {
	( $vm:expr, $( $x:ident ),* ) => (
		$(
			let $x = $vm.frame_mut().stack.pop()?;
		)*
	);
}

macro_rules! push_u256 {
	( $vm:expr, $( $x:expr ),* ) => (
		$(
			$vm.frame_mut().stack.push($x)?;
		)*
	);
}

/// Truncate a word to a `usize` offset, taking the low 64 bits.
macro_rules! as_usize {
	( $v:expr ) => {
		$v.low_u64() as usize
	};
}

macro_rules! op1_u256_fn {
	( $vm:expr, $op:path ) => {{
		pop_u256!($vm, op1);
		push_u256!($vm, $op(op1));
		Ok(())
	}};
}

macro_rules! op2_u256 {
	( $vm:expr, $op:ident ) => {{
		pop_u256!($vm, op1, op2);
		push_u256!($vm, op1.$op(op2));
		Ok(())
	}};
}

macro_rules! op2_u256_tuple {
	( $vm:expr, $op:ident ) => {{
		pop_u256!($vm, op1, op2);
		push_u256!($vm, op1.$op(op2).0);
		Ok(())
	}};
}

macro_rules! op2_u256_fn {
	( $vm:expr, $op:path ) => {{
		pop_u256!($vm, op1, op2);
		push_u256!($vm, $op(op1, op2));
		Ok(())
	}};
}

macro_rules! op2_u256_bool_ref {
	( $vm:expr, $op:ident ) => {{
		pop_u256!($vm, op1, op2);
		let result = if op1.$op(&op2) {
			U256::one()
		} else {
			U256::zero()
		};
		push_u256!($vm, result);
		Ok(())
	}};
}

macro_rules! op3_u256_fn {
	( $vm:expr, $op:path ) => {{
		pop_u256!($vm, op1, op2, op3);
		push_u256!($vm, $op(op1, op2, op3));
		Ok(())
	}};
}
