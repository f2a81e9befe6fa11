use crate::error::CfracError;
use crate::interrupt::{test_int, Interrupt};
use crate::result::CResult;
use num_bigint::{BigInt, BigUint};

/// Cancellation and magnitude ceiling shared by all arithmetic in a single
/// computation. A new computation always gets a new `Bounds`.
pub(crate) struct Bounds<'a, I: Interrupt> {
	int: &'a I,
	max_magnitude: BigUint,
}

impl<'a, I: Interrupt> Bounds<'a, I> {
	pub(crate) fn new(int: &'a I, max_digits: usize) -> Self {
		// largest integer with `max_digits` decimal digits
		let max_magnitude = num_traits::pow(BigUint::from(10_u32), max_digits) - 1_u32;
		Self { int, max_magnitude }
	}

	pub(crate) fn check_cancelled(&self) -> CResult<()> {
		test_int(self.int)
	}

	pub(crate) fn check_magnitude(&self, value: &BigUint) -> CResult<()> {
		if value > &self.max_magnitude {
			return Err(CfracError::OutOfRange);
		}
		Ok(())
	}

	pub(crate) fn check_signed_magnitude(&self, value: &BigInt) -> CResult<()> {
		self.check_magnitude(value.magnitude())
	}

	/// One step of an exponent-elimination loop.
	pub(crate) fn times_ten(&self, value: BigUint) -> CResult<BigUint> {
		self.check_cancelled()?;
		let value = value * 10_u32;
		self.check_magnitude(&value)?;
		Ok(value)
	}

	pub(crate) fn scale_by_ten(&self, mut value: BigUint, times: u64) -> CResult<BigUint> {
		for _ in 0..times {
			value = self.times_ten(value)?;
		}
		Ok(value)
	}
}

#[cfg(test)]
mod tests {
	use super::Bounds;
	use crate::error::CfracError;
	use crate::interrupt::{Interrupt, Never};
	use num_bigint::BigUint;

	struct Always;
	impl Interrupt for Always {
		fn should_interrupt(&self) -> bool {
			true
		}
	}

	#[test]
	fn magnitude_ceiling() {
		let bounds = Bounds::new(&Never, 3);
		assert!(bounds.check_magnitude(&BigUint::from(999_u32)).is_ok());
		assert_eq!(
			bounds.check_magnitude(&BigUint::from(1000_u32)),
			Err(CfracError::OutOfRange)
		);
	}

	#[test]
	fn scaling_stops_at_the_ceiling() {
		let bounds = Bounds::new(&Never, 3);
		assert_eq!(
			bounds.scale_by_ten(BigUint::from(7_u32), 2),
			Ok(BigUint::from(700_u32))
		);
		assert_eq!(
			bounds.scale_by_ten(BigUint::from(7_u32), u64::MAX),
			Err(CfracError::OutOfRange)
		);
	}

	#[test]
	fn cancellation_wins() {
		let bounds = Bounds::new(&Always, 300);
		assert_eq!(bounds.check_cancelled(), Err(CfracError::Interrupted));
		assert_eq!(
			bounds.times_ten(BigUint::from(1_u32)),
			Err(CfracError::Interrupted)
		);
	}
}
