use crate::bounds::Bounds;
use crate::error::CfracError;
use crate::interrupt::Interrupt;
use crate::num::continued_fraction;
use crate::result::CResult;
use num_bigint::{BigInt, BigUint};
use num_integer::Integer;
use num_traits::{One, Zero};
use std::cmp::Ordering;
use std::collections::HashMap;
use std::ops::Neg;

pub(crate) mod sign {
	#[derive(Debug, Clone, Copy, PartialEq, Eq)]
	pub(crate) enum Sign {
		Positive,
		Negative,
	}

	impl Sign {
		pub(crate) const fn flip(self) -> Self {
			match self {
				Self::Positive => Self::Negative,
				Self::Negative => Self::Positive,
			}
		}

		pub(crate) const fn sign_of_product(a: Self, b: Self) -> Self {
			match (a, b) {
				(Self::Positive, Self::Positive) | (Self::Negative, Self::Negative) => {
					Self::Positive
				}
				(Self::Positive, Self::Negative) | (Self::Negative, Self::Positive) => {
					Self::Negative
				}
			}
		}

		pub(crate) fn of(value: &num_bigint::BigInt) -> Self {
			if value.sign() == num_bigint::Sign::Minus {
				Self::Negative
			} else {
				Self::Positive
			}
		}
	}
}

use sign::Sign;

/// A nonzero finite value `sign * num / den * 10^exp` with `num` and `den`
/// coprime.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Finite {
	sign: Sign,
	num: BigUint,
	den: BigUint,
	exp: i64,
	approx: bool,
}

/// An exact rational number, extended with the two infinities and an
/// undefined value so that division by zero can be represented.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum BigRat {
	Normal(Finite),
	Zero,
	PositiveInfinity,
	NegativeInfinity,
	Undefined,
}

impl BigRat {
	/// Classifies and reduces `sign * num / den * 10^exp`.
	pub(crate) fn from_parts(sign: Sign, num: BigUint, den: BigUint, exp: i64) -> Self {
		match (num.is_zero(), den.is_zero()) {
			(true, true) => Self::Undefined,
			(false, true) => match sign {
				Sign::Positive => Self::PositiveInfinity,
				Sign::Negative => Self::NegativeInfinity,
			},
			(true, false) => Self::Zero,
			(false, false) => {
				let gcd = num.gcd(&den);
				Self::Normal(Finite {
					sign,
					num: num / &gcd,
					den: den / &gcd,
					exp,
					approx: false,
				})
			}
		}
	}

	/// Builds `num / den` from a pair of signed integers, such as a
	/// convergent. A zero denominator yields an infinity signed like `num`.
	pub(crate) fn from_ratio(num: BigInt, den: BigInt) -> Self {
		let sign = Sign::sign_of_product(Sign::of(&num), Sign::of(&den));
		Self::from_parts(sign, num.into_parts().1, den.into_parts().1, 0)
	}

	pub(crate) fn pi() -> Self {
		Self::constant(31_415_926_535_897_932_384_626_433_832_795_028_841, -37)
	}

	pub(crate) fn euler_number() -> Self {
		Self::constant(27_182_818_284_590_452_353_602_874_713_526_624_977, -37)
	}

	fn constant(digits: u128, exp: i64) -> Self {
		Self::from_parts(Sign::Positive, digits.into(), BigUint::one(), exp).into_approx()
	}

	pub(crate) fn into_approx(self) -> Self {
		match self {
			Self::Normal(f) => Self::Normal(Finite { approx: true, ..f }),
			other => other,
		}
	}

	pub(crate) fn is_approx(&self) -> bool {
		matches!(self, Self::Normal(Finite { approx: true, .. }))
	}

	pub(crate) fn is_finite(&self) -> bool {
		matches!(self, Self::Normal(_) | Self::Zero)
	}

	pub(crate) fn is_negative(&self) -> bool {
		matches!(
			self,
			Self::Normal(Finite {
				sign: Sign::Negative,
				..
			}) | Self::NegativeInfinity
		)
	}

	pub(crate) fn abs(self) -> Self {
		match self {
			Self::Normal(f) => Self::Normal(Finite {
				sign: Sign::Positive,
				..f
			}),
			Self::NegativeInfinity => Self::PositiveInfinity,
			other => other,
		}
	}

	pub(crate) fn add<I: Interrupt>(self, rhs: Self, bounds: &Bounds<'_, I>) -> CResult<Self> {
		Ok(match (self, rhs) {
			(Self::Undefined, _)
			| (_, Self::Undefined)
			| (Self::PositiveInfinity, Self::NegativeInfinity)
			| (Self::NegativeInfinity, Self::PositiveInfinity) => Self::Undefined,
			(inf @ (Self::PositiveInfinity | Self::NegativeInfinity), _)
			| (_, inf @ (Self::PositiveInfinity | Self::NegativeInfinity)) => inf,
			(Self::Zero, x) | (x, Self::Zero) => x,
			(Self::Normal(a), Self::Normal(b)) => Finite::add(a, b, bounds)?,
		})
	}

	pub(crate) fn sub<I: Interrupt>(self, rhs: Self, bounds: &Bounds<'_, I>) -> CResult<Self> {
		self.add(-rhs, bounds)
	}

	/// Total order over everything except `Undefined`.
	pub(crate) fn compare<I: Interrupt>(
		&self,
		other: &Self,
		bounds: &Bounds<'_, I>,
	) -> CResult<Ordering> {
		let rank = |value: &Self| match value {
			Self::NegativeInfinity => Ok(0),
			Self::Normal(_) | Self::Zero => Ok(1),
			Self::PositiveInfinity => Ok(2),
			Self::Undefined => Err(CfracError::Incomparable),
		};
		let (a, b) = (rank(self)?, rank(other)?);
		if a != b || a != 1 {
			return Ok(a.cmp(&b));
		}
		Ok(match self.clone().sub(other.clone(), bounds)? {
			Self::Zero => Ordering::Equal,
			diff if diff.is_negative() => Ordering::Less,
			_ => Ordering::Greater,
		})
	}

	/// Moves the decimal exponent into the numerator or denominator and
	/// reduces the result. Fails if either part exceeds the magnitude
	/// ceiling on the way.
	pub(crate) fn simplify<I: Interrupt>(self, bounds: &Bounds<'_, I>) -> CResult<Self> {
		let Finite {
			sign,
			mut num,
			mut den,
			mut exp,
			approx,
		} = match self {
			Self::Normal(f) => f,
			other => return Ok(other),
		};
		let ten = BigUint::from(10_u32);
		while exp < 0 {
			bounds.check_cancelled()?;
			let (q, r) = num.div_rem(&ten);
			if r.is_zero() {
				num = q;
			} else {
				den = bounds.times_ten(den)?;
			}
			exp += 1;
		}
		while exp > 0 {
			bounds.check_cancelled()?;
			let (q, r) = den.div_rem(&ten);
			if r.is_zero() {
				den = q;
			} else {
				num = bounds.times_ten(num)?;
			}
			exp -= 1;
		}
		bounds.check_magnitude(&num)?;
		bounds.check_magnitude(&den)?;
		let res = Self::from_parts(sign, num, den, 0);
		Ok(if approx { res.into_approx() } else { res })
	}

	/// Returns the value as a signed numerator over a positive denominator
	/// with no decimal exponent. The result is not necessarily reduced.
	pub(crate) fn to_plain_form<I: Interrupt>(
		&self,
		bounds: &Bounds<'_, I>,
	) -> CResult<(BigInt, BigUint)> {
		match self {
			Self::Zero => Ok((BigInt::zero(), BigUint::one())),
			Self::Normal(f) => {
				let (num, den) = f.plain_magnitudes(bounds)?;
				let num = match f.sign {
					Sign::Positive => BigInt::from(num),
					Sign::Negative => -BigInt::from(num),
				};
				Ok((num, den))
			}
			_ => Err(CfracError::NonFiniteValue),
		}
	}

	/// Renders the value as a decimal. Recurring digits are wrapped in
	/// parentheses. If more than `max_digits` fractional digits would be
	/// needed, the output is cut short and prefixed with `≈`.
	pub(crate) fn to_float_string<I: Interrupt>(
		&self,
		bounds: &Bounds<'_, I>,
		max_digits: usize,
	) -> CResult<String> {
		let f = match self {
			Self::Normal(f) => f,
			Self::Zero => return Ok("0".to_string()),
			_ => return Ok(self.non_finite_token().to_string()),
		};
		let (num, den) = f.plain_magnitudes(bounds)?;
		let (integer, mut rem) = num.div_rem(&den);
		let mut digits = String::new();
		let mut seen: HashMap<BigUint, usize> = HashMap::new();
		let mut recurring_from = None;
		let mut truncated = false;
		while !rem.is_zero() {
			bounds.check_cancelled()?;
			if !f.approx {
				if let Some(&start) = seen.get(&rem) {
					recurring_from = Some(start);
					break;
				}
			}
			if digits.len() >= max_digits {
				truncated = true;
				break;
			}
			if !f.approx {
				seen.insert(rem.clone(), digits.len());
			}
			let (digit, next) = (rem * 10_u32).div_rem(&den);
			digits.push_str(&digit.to_string());
			rem = next;
		}

		let mut res = String::new();
		if f.approx || truncated {
			res.push('≈');
		}
		if f.sign == Sign::Negative {
			res.push('-');
		}
		res.push_str(&integer.to_string());
		if !digits.is_empty() {
			res.push('.');
			match recurring_from {
				Some(start) => {
					res.push_str(&digits[..start]);
					res.push('(');
					res.push_str(&digits[start..]);
					res.push(')');
				}
				None => res.push_str(&digits),
			}
		}
		Ok(res)
	}

	/// Renders the value as `n`, `n / d`, or with a decimal exponent as
	/// `ne+E / d`. Integers longer than `max_digits` are shortened with an
	/// ellipsis in the middle.
	pub(crate) fn to_rational_string(&self, max_digits: usize) -> String {
		let f = match self {
			Self::Normal(f) => f,
			Self::Zero => return "0".to_string(),
			_ => return self.non_finite_token().to_string(),
		};
		let mut res = String::new();
		if f.approx {
			res.push('≈');
		}
		if f.sign == Sign::Negative {
			res.push('-');
		}
		res.push_str(&elide(f.num.to_string(), max_digits));
		if f.exp != 0 {
			res.push_str(&format!("e{:+}", f.exp));
		}
		if !f.den.is_one() {
			res.push_str(" / ");
			res.push_str(&elide(f.den.to_string(), max_digits));
		}
		res
	}

	/// Expands the value into regular continued fraction terms, keeping at
	/// most `max_terms` of them. The flag is set when the full expansion is
	/// longer than `max_terms`, in which case the terms are only a prefix
	/// of it.
	pub(crate) fn to_continued_fraction_terms<I: Interrupt>(
		&self,
		bounds: &Bounds<'_, I>,
		max_terms: usize,
	) -> CResult<(Vec<BigInt>, bool)> {
		let f = match self {
			Self::Normal(f) => f,
			Self::Zero => return Ok((vec![BigInt::zero()], false)),
			_ => return Err(CfracError::NonFiniteValue),
		};
		let (num, den) = f.plain_magnitudes(bounds)?;
		// negation can drop a leading term, so expand one extra to still
		// see past max_terms afterwards
		let terms = continued_fraction::expand(num, den, bounds)?
			.take(max_terms.saturating_add(2))
			.map(|term| term.map(BigInt::from))
			.collect::<CResult<Vec<_>>>()?;
		// negation only rewrites the first three terms, so a cut expansion
		// negates into a prefix of the negated expansion
		let mut terms = match f.sign {
			Sign::Positive => terms,
			Sign::Negative => continued_fraction::negate(&terms)?,
		};
		let truncated = terms.len() > max_terms;
		terms.truncate(max_terms);
		Ok((terms, truncated))
	}

	fn non_finite_token(&self) -> &'static str {
		match self {
			Self::PositiveInfinity => "+Infinity",
			Self::NegativeInfinity => "-Infinity",
			_ => "Undefined",
		}
	}
}

impl Finite {
	fn add<I: Interrupt>(a: Self, b: Self, bounds: &Bounds<'_, I>) -> CResult<BigRat> {
		let approx = a.approx || b.approx;
		let exp = a.exp.min(b.exp);
		let a_num = bounds.scale_by_ten(a.num, a.exp.abs_diff(exp))?;
		let b_num = bounds.scale_by_ten(b.num, b.exp.abs_diff(exp))?;
		let lhs = signed(a.sign, a_num * &b.den);
		let rhs = signed(b.sign, b_num * &a.den);
		let sum = lhs + rhs;
		let sign = Sign::of(&sum);
		let res = BigRat::from_parts(sign, sum.into_parts().1, a.den * b.den, exp);
		Ok(if approx { res.into_approx() } else { res })
	}

	fn plain_magnitudes<I: Interrupt>(&self, bounds: &Bounds<'_, I>) -> CResult<(BigUint, BigUint)> {
		if self.exp >= 0 {
			let num = bounds.scale_by_ten(self.num.clone(), self.exp.unsigned_abs())?;
			Ok((num, self.den.clone()))
		} else {
			let den = bounds.scale_by_ten(self.den.clone(), self.exp.unsigned_abs())?;
			Ok((self.num.clone(), den))
		}
	}
}

fn signed(sign: Sign, magnitude: BigUint) -> BigInt {
	match sign {
		Sign::Positive => BigInt::from(magnitude),
		Sign::Negative => -BigInt::from(magnitude),
	}
}

fn elide(digits: String, max_digits: usize) -> String {
	if max_digits < 2 || digits.len() <= max_digits {
		return digits;
	}
	let head = max_digits / 2;
	let tail = max_digits - head;
	format!("{}…{}", &digits[..head], &digits[digits.len() - tail..])
}

impl Neg for BigRat {
	type Output = Self;

	fn neg(self) -> Self {
		match self {
			Self::Normal(f) => Self::Normal(Finite {
				sign: f.sign.flip(),
				..f
			}),
			Self::PositiveInfinity => Self::NegativeInfinity,
			Self::NegativeInfinity => Self::PositiveInfinity,
			other => other,
		}
	}
}

impl From<u64> for BigRat {
	fn from(i: u64) -> Self {
		Self::from_parts(Sign::Positive, i.into(), BigUint::one(), 0)
	}
}

#[cfg(test)]
mod tests {
	use super::sign::Sign;
	use super::BigRat;
	use crate::bounds::Bounds;
	use crate::error::CfracError;
	use crate::interrupt::Never;
	use num_bigint::{BigInt, BigUint};
	use std::cmp::Ordering;

	fn rat(num: i64, den: i64) -> BigRat {
		BigRat::from_ratio(num.into(), den.into())
	}

	fn scaled(num: u64, exp: i64) -> BigRat {
		BigRat::from_parts(Sign::Positive, num.into(), 1_u64.into(), exp)
	}

	#[test]
	fn construction_classifies() {
		assert_eq!(rat(0, 0), BigRat::Undefined);
		assert_eq!(rat(3, 0), BigRat::PositiveInfinity);
		assert_eq!(rat(-3, 0), BigRat::NegativeInfinity);
		assert_eq!(rat(0, -5), BigRat::Zero);
		assert_eq!(rat(-4, -6), rat(2, 3));
		assert_eq!(rat(4, -6), -rat(2, 3));
	}

	#[test]
	fn addition() -> Result<(), CfracError> {
		let bounds = Bounds::new(&Never, 300);
		assert_eq!(rat(1, 2).add(rat(1, 3), &bounds)?, rat(5, 6));
		assert_eq!(rat(1, 2).sub(rat(1, 2), &bounds)?, BigRat::Zero);
		assert_eq!(
			BigRat::PositiveInfinity.add(BigRat::NegativeInfinity, &bounds)?,
			BigRat::Undefined
		);
		assert_eq!(
			rat(7, 1).add(BigRat::NegativeInfinity, &bounds)?,
			BigRat::NegativeInfinity
		);
		let sum = scaled(5, -1).add(scaled(25, -2), &bounds)?.simplify(&bounds)?;
		assert_eq!(sum, rat(3, 4));
		Ok(())
	}

	#[test]
	fn comparison() -> Result<(), CfracError> {
		let bounds = Bounds::new(&Never, 300);
		assert_eq!(rat(16, 9).compare(&rat(2, 1), &bounds)?, Ordering::Less);
		assert_eq!(rat(36, 49).compare(&rat(3, 4), &bounds)?, Ordering::Less);
		assert_eq!(
			BigRat::PositiveInfinity.compare(&rat(1000, 1), &bounds)?,
			Ordering::Greater
		);
		assert_eq!(
			BigRat::NegativeInfinity.compare(&BigRat::NegativeInfinity, &bounds)?,
			Ordering::Equal
		);
		assert_eq!(
			BigRat::Undefined.compare(&BigRat::Zero, &bounds),
			Err(CfracError::Incomparable)
		);
		Ok(())
	}

	#[test]
	fn simplify_removes_the_exponent() -> Result<(), CfracError> {
		let bounds = Bounds::new(&Never, 300);
		assert_eq!(scaled(5, -1).simplify(&bounds)?, rat(1, 2));
		assert_eq!(scaled(30, -1).simplify(&bounds)?, rat(3, 1));
		assert_eq!(scaled(12, 2).simplify(&bounds)?, rat(1200, 1));
		Ok(())
	}

	#[test]
	fn simplify_respects_the_ceiling() {
		let bounds = Bounds::new(&Never, 300);
		assert_eq!(
			scaled(1, 400).simplify(&bounds),
			Err(CfracError::OutOfRange)
		);
		assert_eq!(
			scaled(1, -400).simplify(&bounds),
			Err(CfracError::OutOfRange)
		);
	}

	#[test]
	fn plain_form() -> Result<(), CfracError> {
		let bounds = Bounds::new(&Never, 300);
		assert_eq!(
			(-scaled(25, -2)).to_plain_form(&bounds)?,
			(BigInt::from(-25), BigUint::from(100_u32))
		);
		assert_eq!(
			BigRat::Undefined.to_plain_form(&bounds),
			Err(CfracError::NonFiniteValue)
		);
		Ok(())
	}

	#[test]
	fn float_strings() -> Result<(), CfracError> {
		let bounds = Bounds::new(&Never, 300);
		assert_eq!(rat(1, 3).to_float_string(&bounds, 20)?, "0.(3)");
		assert_eq!(rat(-1, 6).to_float_string(&bounds, 20)?, "-0.1(6)");
		assert_eq!(rat(1, 7).to_float_string(&bounds, 20)?, "0.(142857)");
		assert_eq!(rat(22, 7).to_float_string(&bounds, 4)?, "≈3.1428");
		assert_eq!(rat(649, 200).to_float_string(&bounds, 20)?, "3.245");
		assert_eq!(rat(5, 1).to_float_string(&bounds, 20)?, "5");
		assert_eq!(BigRat::Zero.to_float_string(&bounds, 20)?, "0");
		assert_eq!(
			BigRat::NegativeInfinity.to_float_string(&bounds, 20)?,
			"-Infinity"
		);
		assert_eq!(BigRat::pi().to_float_string(&bounds, 5)?, "≈3.14159");
		Ok(())
	}

	#[test]
	fn rational_strings() {
		assert_eq!(rat(649, 200).to_rational_string(200), "649 / 200");
		assert_eq!(rat(-7, 1).to_rational_string(200), "-7");
		assert_eq!(scaled(3, 5).to_rational_string(200), "3e+5");
		assert_eq!(
			BigRat::from_parts(Sign::Negative, 1_u64.into(), 3_u64.into(), -2)
				.to_rational_string(200),
			"-1e-2 / 3"
		);
		assert_eq!(rat(1234567, 1).to_rational_string(4), "12…67");
		assert_eq!(BigRat::Undefined.to_rational_string(200), "Undefined");
	}

	#[test]
	fn continued_fraction_terms() -> Result<(), CfracError> {
		let bounds = Bounds::new(&Never, 300);
		let terms = |value: BigRat| -> Result<Vec<i64>, CfracError> {
			let (terms, truncated) = value.to_continued_fraction_terms(&bounds, 100)?;
			assert!(!truncated);
			Ok(terms
				.iter()
				.map(|t| i64::try_from(t).unwrap())
				.collect())
		};
		assert_eq!(terms(rat(649, 200))?, [3, 4, 12, 4]);
		assert_eq!(terms(rat(-649, 200))?, [-4, 1, 3, 12, 4]);
		assert_eq!(terms(BigRat::Zero)?, [0]);
		assert_eq!(terms(scaled(125, -2))?, [1, 4]);
		assert_eq!(
			BigRat::PositiveInfinity.to_continued_fraction_terms(&bounds, 100),
			Err(CfracError::NonFiniteValue)
		);
		Ok(())
	}

	#[test]
	fn long_expansions_are_cut() -> Result<(), CfracError> {
		let bounds = Bounds::new(&Never, 300);
		let (terms, truncated) = BigRat::pi().to_continued_fraction_terms(&bounds, 5)?;
		assert!(truncated);
		assert_eq!(terms, [3, 7, 15, 1, 292].map(BigInt::from));

		// -99/169 is [-1; 2, 2, 2, 2, 2, 2] and 99/169 is [0; 1, 1, 2, 2, 2, 2, 2]
		let (terms, truncated) = rat(-99, 169).to_continued_fraction_terms(&bounds, 3)?;
		assert!(truncated);
		assert_eq!(terms, [-1, 2, 2].map(BigInt::from));
		let (terms, truncated) = rat(-99, 169).to_continued_fraction_terms(&bounds, 7)?;
		assert!(!truncated);
		assert_eq!(terms, [-1, 2, 2, 2, 2, 2, 2].map(BigInt::from));

		// exactly max_terms terms fit
		let (terms, truncated) = rat(649, 200).to_continued_fraction_terms(&bounds, 4)?;
		assert!(!truncated);
		assert_eq!(terms.len(), 4);
		Ok(())
	}
}
