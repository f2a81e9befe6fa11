// Notes:
// https://perl.plover.com/classes/cftalk/INFO/gosper.html
// https://en.wikipedia.org/wiki/Periodic_continued_fraction

use crate::bounds::Bounds;
use crate::error::CfracError;
use crate::interrupt::Interrupt;
use crate::num::bigrat::BigRat;
use crate::result::CResult;
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};
use std::mem;

/// Lazily expands `num / den` into regular continued fraction terms using
/// Euclid's algorithm.
pub(crate) struct Expansion<'b, 'a, I: Interrupt> {
	num: BigUint,
	den: BigUint,
	done: bool,
	bounds: &'b Bounds<'a, I>,
}

pub(crate) fn expand<'b, 'a, I: Interrupt>(
	num: BigUint,
	den: BigUint,
	bounds: &'b Bounds<'a, I>,
) -> CResult<Expansion<'b, 'a, I>> {
	if den.is_zero() {
		return Err(CfracError::DivideByZero);
	}
	Ok(Expansion {
		num,
		den,
		done: false,
		bounds,
	})
}

impl<I: Interrupt> Iterator for Expansion<'_, '_, I> {
	type Item = CResult<BigUint>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.done {
			return None;
		}
		if let Err(e) = self.bounds.check_cancelled() {
			self.done = true;
			return Some(Err(e));
		}
		let (quotient, remainder) = self.num.div_rem(&self.den);
		if remainder.is_zero() {
			self.done = true;
		} else {
			self.num = mem::replace(&mut self.den, remainder);
		}
		Some(Ok(quotient))
	}
}

/// Produces the convergents `(h, k)` of a continued fraction whose last
/// `period` terms repeat forever. A `period` of zero means the terms are
/// finite.
///
/// The recurrence is seeded with `h(-2) = 0, h(-1) = 1, k(-2) = 1, k(-1) = 0`.
/// Every step checks for cancellation, and every numerator and denominator
/// is checked against the magnitude ceiling.
pub(crate) struct Convergents<'t, 'b, 'a, I: Interrupt> {
	terms: &'t [BigInt],
	period: usize,
	max_convergents: Option<usize>,
	emitted: usize,
	h: (BigInt, BigInt),
	k: (BigInt, BigInt),
	failed: bool,
	bounds: &'b Bounds<'a, I>,
}

/// Without a `max_convergents` cap, a periodic expansion never ends.
pub(crate) fn convergents<'t, 'b, 'a, I: Interrupt>(
	terms: &'t [BigInt],
	period: usize,
	max_convergents: Option<usize>,
	bounds: &'b Bounds<'a, I>,
) -> CResult<Convergents<'t, 'b, 'a, I>> {
	if terms.is_empty() {
		return Err(CfracError::EmptyContinuedFraction);
	}
	if period > terms.len() {
		return Err(CfracError::InvalidPeriod {
			period,
			len: terms.len(),
		});
	}
	Ok(Convergents {
		terms,
		period,
		max_convergents,
		emitted: 0,
		h: (BigInt::zero(), BigInt::one()),
		k: (BigInt::one(), BigInt::zero()),
		failed: false,
		bounds,
	})
}

impl<I: Interrupt> Convergents<'_, '_, '_, I> {
	fn term(&self, i: usize) -> Option<&BigInt> {
		if self.period == 0 {
			return self.terms.get(i);
		}
		let before_period = self.terms.len() - self.period;
		if i < before_period {
			self.terms.get(i)
		} else {
			self.terms
				.get(before_period + (i - before_period) % self.period)
		}
	}

	fn step(&mut self) -> CResult<Option<(BigInt, BigInt)>> {
		if self
			.max_convergents
			.is_some_and(|max| self.emitted >= max)
		{
			return Ok(None);
		}
		let Some(a) = self.term(self.emitted) else {
			return Ok(None);
		};
		self.bounds.check_cancelled()?;
		let h = a * &self.h.1 + &self.h.0;
		let k = a * &self.k.1 + &self.k.0;
		self.bounds.check_signed_magnitude(&h)?;
		self.bounds.check_signed_magnitude(&k)?;
		self.h = (mem::replace(&mut self.h.1, h.clone()), h.clone());
		self.k = (mem::replace(&mut self.k.1, k.clone()), k.clone());
		self.emitted += 1;
		Ok(Some((h, k)))
	}
}

impl<I: Interrupt> Iterator for Convergents<'_, '_, '_, I> {
	type Item = CResult<(BigInt, BigInt)>;

	fn next(&mut self) -> Option<Self::Item> {
		if self.failed {
			return None;
		}
		match self.step() {
			Ok(item) => item.map(Ok),
			Err(e) => {
				self.failed = true;
				Some(Err(e))
			}
		}
	}
}

/// Rewrites the terms of `x` into terms of `-x`, changing at most the first
/// three terms.
pub(crate) fn negate(terms: &[BigInt]) -> CResult<Vec<BigInt>> {
	let Some((a0, rest)) = terms.split_first() else {
		return Err(CfracError::EmptyContinuedFraction);
	};
	let floor = -a0 - 1_u32;
	Ok(match rest {
		[] => vec![-a0],
		[a1, tail @ ..] if !a1.is_one() => [floor, BigInt::one(), a1.clone() - 1_u32]
			.into_iter()
			.chain(tail.iter().cloned())
			.collect(),
		// [a0; 1] is just a0 + 1
		[_] => vec![floor],
		[_, a2, tail @ ..] => [floor, a2.clone() + 1_u32]
			.into_iter()
			.chain(tail.iter().cloned())
			.collect(),
	})
}

/// Value of a finite continued fraction, i.e. its last convergent.
pub(crate) fn evaluate<I: Interrupt>(terms: &[BigInt], bounds: &Bounds<'_, I>) -> CResult<BigRat> {
	let mut last = None;
	for convergent in convergents(terms, 0, None, bounds)? {
		last = Some(convergent?);
	}
	let (h, k) = last.ok_or(CfracError::EmptyContinuedFraction)?;
	Ok(BigRat::from_ratio(h, k))
}

/// Outcome of re-expanding a value and comparing it with the terms the
/// user entered.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Canonicity {
	Regular,
	Corrected(Vec<BigInt>),
	Unverified,
}

/// Compares `terms` against the regular expansion of `value`, which must
/// be the value those terms evaluate to. Values whose expansion needs more
/// than `max_terms` terms, and values without a regular expansion, are left
/// unverified.
pub(crate) fn check_canonical<I: Interrupt>(
	value: &BigRat,
	terms: &[BigInt],
	max_terms: usize,
	bounds: &Bounds<'_, I>,
) -> CResult<Canonicity> {
	if !value.is_finite() {
		return Ok(Canonicity::Unverified);
	}
	let (expected, truncated) = value.to_continued_fraction_terms(bounds, max_terms)?;
	if truncated {
		return Ok(Canonicity::Unverified);
	}
	if expected == terms {
		Ok(Canonicity::Regular)
	} else {
		tracing::debug!(
			entered = terms.len(),
			regular = expected.len(),
			"continued fraction is not in regular form"
		);
		Ok(Canonicity::Corrected(expected))
	}
}

#[cfg(test)]
mod tests {
	use super::{check_canonical, convergents, evaluate, expand, negate, Canonicity};
	use crate::bounds::Bounds;
	use crate::error::CfracError;
	use crate::interrupt::{Interrupt, Never};
	use crate::num::bigrat::BigRat;
	use num_bigint::{BigInt, BigUint};
	use proptest::prelude::*;
	use std::cell::Cell;

	fn ints(values: &[i64]) -> Vec<BigInt> {
		values.iter().copied().map(BigInt::from).collect()
	}

	fn pairs(values: &[(i64, i64)]) -> Vec<(BigInt, BigInt)> {
		values
			.iter()
			.map(|&(h, k)| (BigInt::from(h), BigInt::from(k)))
			.collect()
	}

	#[test]
	fn expansion_of_649_over_200() -> Result<(), CfracError> {
		let bounds = Bounds::new(&Never, 300);
		let terms = expand(649_u32.into(), 200_u32.into(), &bounds)?
			.collect::<Result<Vec<_>, _>>()?;
		assert_eq!(terms, [3_u32, 4, 12, 4].map(BigUint::from));
		Ok(())
	}

	#[test]
	fn expansion_of_zero_and_integers() -> Result<(), CfracError> {
		let bounds = Bounds::new(&Never, 300);
		let zero = expand(0_u32.into(), 5_u32.into(), &bounds)?
			.collect::<Result<Vec<_>, _>>()?;
		assert_eq!(zero, [BigUint::from(0_u32)]);
		let seven = expand(14_u32.into(), 2_u32.into(), &bounds)?
			.collect::<Result<Vec<_>, _>>()?;
		assert_eq!(seven, [BigUint::from(7_u32)]);
		assert!(matches!(
			expand(1_u32.into(), 0_u32.into(), &bounds),
			Err(CfracError::DivideByZero)
		));
		Ok(())
	}

	#[test]
	fn convergents_of_649_over_200() -> Result<(), CfracError> {
		let bounds = Bounds::new(&Never, 300);
		let terms = ints(&[3, 4, 12, 4]);
		let result = convergents(&terms, 0, None, &bounds)?.collect::<Result<Vec<_>, _>>()?;
		assert_eq!(result, pairs(&[(3, 1), (13, 4), (159, 49), (649, 200)]));
		Ok(())
	}

	#[test]
	fn periodic_convergents_respect_the_cap() -> Result<(), CfracError> {
		let bounds = Bounds::new(&Never, 300);
		let terms = ints(&[1, 2]);
		let result = convergents(&terms, 1, Some(10), &bounds)?.collect::<Result<Vec<_>, _>>()?;
		assert_eq!(result.len(), 10);
		assert_eq!(
			result[..4],
			pairs(&[(1, 1), (3, 2), (7, 5), (17, 12)])[..]
		);
		let two = BigRat::from(2);
		let mut previous_sign = None;
		for (h, k) in result {
			let square = BigRat::from_ratio(&h * &h, &k * &k);
			let below = square.compare(&two, &bounds)?.is_lt();
			assert_ne!(previous_sign, Some(below));
			previous_sign = Some(below);
		}
		Ok(())
	}

	#[test]
	fn whole_list_period() -> Result<(), CfracError> {
		let bounds = Bounds::new(&Never, 300);
		let terms = ints(&[1, 2]);
		let result = convergents(&terms, 2, Some(4), &bounds)?.collect::<Result<Vec<_>, _>>()?;
		// [1; 2, 1, 2, ...]
		assert_eq!(result, pairs(&[(1, 1), (3, 2), (4, 3), (11, 8)]));
		Ok(())
	}

	#[test]
	fn invalid_convergent_requests() {
		let bounds = Bounds::new(&Never, 300);
		assert!(matches!(
			convergents(&[], 0, None, &bounds),
			Err(CfracError::EmptyContinuedFraction)
		));
		assert!(matches!(
			convergents(&ints(&[1, 2]), 3, None, &bounds),
			Err(CfracError::InvalidPeriod { period: 3, len: 2 })
		));
	}

	#[test]
	fn convergents_hit_the_ceiling() -> Result<(), CfracError> {
		let bounds = Bounds::new(&Never, 3);
		let terms = ints(&[10, 10, 10, 10]);
		let result = convergents(&terms, 0, None, &bounds)?.collect::<Vec<_>>();
		assert_eq!(result.len(), 3);
		assert_eq!(result[2], Err(CfracError::OutOfRange));
		Ok(())
	}

	#[test]
	fn convergents_can_be_cancelled() -> Result<(), CfracError> {
		struct AfterCalls(Cell<usize>);
		impl Interrupt for AfterCalls {
			fn should_interrupt(&self) -> bool {
				let remaining = self.0.get();
				self.0.set(remaining.saturating_sub(1));
				remaining == 0
			}
		}
		let int = AfterCalls(Cell::new(5));
		let bounds = Bounds::new(&int, 300);
		let terms = ints(&[1]);
		let result = convergents(&terms, 1, None, &bounds)?.collect::<Vec<_>>();
		assert_eq!(result.len(), 6);
		assert_eq!(result.last(), Some(&Err(CfracError::Interrupted)));
		Ok(())
	}

	#[test]
	fn negation_cases() -> Result<(), CfracError> {
		assert_eq!(negate(&ints(&[5]))?, ints(&[-5]));
		assert_eq!(negate(&ints(&[2, 1]))?, ints(&[-3]));
		assert_eq!(negate(&ints(&[2, 3, 4]))?, ints(&[-3, 1, 2, 4]));
		assert_eq!(negate(&ints(&[-3, 1, 2, 4]))?, ints(&[2, 3, 4]));
		assert_eq!(negate(&ints(&[0, 1, 5]))?, ints(&[-1, 6]));
		assert_eq!(negate(&[]), Err(CfracError::EmptyContinuedFraction));
		Ok(())
	}

	#[test]
	fn canonical_check() -> Result<(), CfracError> {
		let bounds = Bounds::new(&Never, 300);
		let regular = ints(&[3, 4, 12, 4]);
		let value = evaluate(&regular, &bounds)?;
		assert_eq!(
			check_canonical(&value, &regular, 100, &bounds)?,
			Canonicity::Regular
		);
		let irregular = ints(&[3, 4, 12, 3, 1]);
		let value = evaluate(&irregular, &bounds)?;
		assert_eq!(
			check_canonical(&value, &irregular, 100, &bounds)?,
			Canonicity::Corrected(regular)
		);
		assert_eq!(
			check_canonical(&BigRat::PositiveInfinity, &ints(&[0, 0]), 100, &bounds)?,
			Canonicity::Unverified
		);
		Ok(())
	}

	proptest! {
		#[test]
		fn consecutive_convergents_are_adjacent(
			terms in proptest::collection::vec(1_i64..1000, 1..30)
		) {
			let bounds = Bounds::new(&Never, 300);
			let terms = ints(&terms);
			let result = convergents(&terms, 0, None, &bounds)
				.unwrap()
				.collect::<Result<Vec<_>, _>>()
				.unwrap();
			for (i, pair) in result.windows(2).enumerate() {
				let ((h0, k0), (h1, k1)) = (&pair[0], &pair[1]);
				let expected = if i % 2 == 0 { 1 } else { -1 };
				prop_assert_eq!(h1 * k0 - h0 * k1, BigInt::from(expected));
			}
		}

		#[test]
		fn regular_terms_are_reproduced(
			first in -1000_i64..1000,
			rest in proptest::collection::vec(1_i64..1000, 0..12),
			max_terms in 1_usize..16
		) {
			let mut rest = rest;
			if let Some(last) = rest.last_mut() {
				*last = (*last).max(2);
			}
			let mut terms = vec![first];
			terms.extend(rest);
			let terms = ints(&terms);
			let bounds = Bounds::new(&Never, 300);
			let value = evaluate(&terms, &bounds).unwrap();

			let (expanded, truncated) = value.to_continued_fraction_terms(&bounds, 100).unwrap();
			prop_assert!(!truncated);
			prop_assert_eq!(&expanded, &terms);

			let expected = if terms.len() <= max_terms {
				Canonicity::Regular
			} else {
				Canonicity::Unverified
			};
			prop_assert_eq!(check_canonical(&value, &terms, max_terms, &bounds).unwrap(), expected);

			let (prefix, truncated) = value.to_continued_fraction_terms(&bounds, max_terms).unwrap();
			prop_assert_eq!(truncated, terms.len() > max_terms);
			prop_assert_eq!(&prefix[..], &terms[..terms.len().min(max_terms)]);
		}

		#[test]
		fn negation_is_an_involution(
			first in -1000_i64..1000,
			rest in proptest::collection::vec(2_i64..1000, 0..10)
		) {
			let mut terms = vec![first];
			terms.extend(rest);
			let terms = ints(&terms);
			let negated = negate(&terms).unwrap();
			prop_assert_eq!(negate(&negated).unwrap(), terms.clone());

			let bounds = Bounds::new(&Never, 300);
			let value = evaluate(&terms, &bounds).unwrap();
			prop_assert_eq!(evaluate(&negated, &bounds).unwrap(), -value);
		}
	}
}
