use crate::error::CfracError;
use crate::num::bigrat::{sign::Sign, BigRat};
use crate::result::CResult;
use num_bigint::{BigInt, BigUint};
use num_traits::One;

/// A continued fraction as typed, before any evaluation.
///
/// `negative` is the sign written in front of the brackets, and applies to
/// the value of the whole fraction rather than to its first term. The last
/// `period` terms repeat forever.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct ContinuedFractionInput {
	pub(crate) negative: bool,
	pub(crate) terms: Vec<BigInt>,
	pub(crate) period: usize,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum Input {
	ContinuedFraction(ContinuedFractionInput),
	Number(BigRat),
}

fn parse_char(input: &str) -> CResult<(char, &str)> {
	input
		.chars()
		.next()
		.map_or(Err(CfracError::UnexpectedEndOfInput), |ch| {
			let (_, b) = input.split_at(ch.len_utf8());
			Ok((ch, b))
		})
}

fn parse_fixed_char(input: &str, ch: char) -> CResult<((), &str)> {
	let (parsed_ch, input) = parse_char(input)?;
	if parsed_ch == ch {
		Ok(((), input))
	} else {
		Err(CfracError::ExpectedChar(ch, parsed_ch))
	}
}

fn skip_char(input: &str, ch: char) -> Option<&str> {
	parse_fixed_char(input, ch).ok().map(|((), rest)| rest)
}

fn unexpected(input: &str) -> CfracError {
	match parse_char(input) {
		Ok((ch, _)) => CfracError::UnexpectedChar(ch),
		Err(e) => e,
	}
}

fn parse_sign(input: &str) -> (Sign, &str) {
	if let Some(rest) = skip_char(input, '-') {
		(Sign::Negative, rest)
	} else if let Some(rest) = skip_char(input, '+') {
		(Sign::Positive, rest)
	} else {
		(Sign::Positive, input)
	}
}

// Parses one or more ASCII digits, returning their value and count.
fn parse_digits(input: &str) -> CResult<(BigUint, usize, &str)> {
	let len = input
		.find(|ch: char| !ch.is_ascii_digit())
		.unwrap_or(input.len());
	if len == 0 {
		let (ch, _) = parse_char(input)?;
		return Err(CfracError::ExpectedADigit(ch));
	}
	let (digits, rest) = input.split_at(len);
	let value = BigUint::parse_bytes(digits.as_bytes(), 10)
		.ok_or(CfracError::ExpectedADigit(digits.chars().next().unwrap_or('0')))?;
	Ok((value, len, rest))
}

fn parse_optional_digits(input: &str) -> CResult<(BigUint, usize, &str)> {
	if input.starts_with(|ch: char| ch.is_ascii_digit()) {
		parse_digits(input)
	} else {
		Ok((BigUint::default(), 0, input))
	}
}

fn parse_integer(input: &str) -> CResult<(BigInt, &str)> {
	let (sign, input) = parse_sign(input);
	let (magnitude, _, rest) = parse_digits(input.trim_start())?;
	let value = BigInt::from(magnitude);
	Ok((
		match sign {
			Sign::Positive => value,
			Sign::Negative => -value,
		},
		rest,
	))
}

fn pow10(len: usize) -> BigUint {
	num_traits::pow(BigUint::from(10_u32), len)
}

fn parse_exponent(input: &str) -> CResult<(i64, &str)> {
	let Some(input) = input.strip_prefix(|ch: char| ch == 'e' || ch == 'E') else {
		return Ok((0, input));
	};
	let (sign, input) = parse_sign(input);
	let len = input
		.find(|ch: char| !ch.is_ascii_digit())
		.unwrap_or(input.len());
	if len == 0 {
		return Err(unexpected(input).digit_expected());
	}
	let (digits, rest) = input.split_at(len);
	let value: i64 = digits.parse().map_err(|_| CfracError::ExponentTooLarge)?;
	Ok((
		match sign {
			Sign::Positive => value,
			Sign::Negative => -value,
		},
		rest,
	))
}

impl CfracError {
	fn digit_expected(self) -> Self {
		match self {
			Self::UnexpectedChar(ch) => Self::ExpectedADigit(ch),
			other => other,
		}
	}
}

fn parse_constant(input: &str) -> Option<BigRat> {
	match input.to_lowercase().as_str() {
		"pi" | "π" => Some(BigRat::pi()),
		"e" => Some(BigRat::euler_number()),
		_ => None,
	}
}

/// Parses an integer, a decimal with an optional recurring tail such as
/// `0.1(6)`, an optional exponent, a fraction `n/d`, or one of the
/// constants `pi` and `e`.
pub(crate) fn parse_number(input: &str) -> CResult<BigRat> {
	let input = input.trim();
	if input.is_empty() {
		return Err(CfracError::EmptyInput);
	}
	if let Some(constant) = parse_constant(input) {
		return Ok(constant);
	}
	let (sign, rest) = parse_sign(input);
	let rest = rest.trim_start();
	let (integer, rest) = if rest.starts_with('.') {
		(BigUint::default(), rest)
	} else {
		let (integer, _, rest) = parse_digits(rest)?;
		(integer, rest)
	};

	let mut num = integer;
	let mut den = BigUint::one();
	let mut exp: i64 = 0;
	let mut is_decimal = false;
	let mut rest = rest;
	if let Some(after_point) = skip_char(rest, '.') {
		is_decimal = true;
		let (fraction, fraction_len, after_fraction) = parse_optional_digits(after_point)?;
		let significand = num * pow10(fraction_len) + fraction;
		if let Some(after_paren) = skip_char(after_fraction, '(') {
			let (repeating, repeating_len, after_repeating) = parse_digits(after_paren)?;
			rest = skip_char(after_repeating, ')').ok_or(CfracError::UnterminatedPeriod)?;
			let shift = pow10(repeating_len);
			num = (&significand * &shift + repeating) - significand;
			den = pow10(fraction_len) * (shift - 1_u32);
		} else {
			rest = after_fraction;
			num = significand;
			exp = -i64::try_from(fraction_len).map_err(|_| CfracError::ExponentTooLarge)?;
		}
	}

	let (e, after_exponent) = parse_exponent(rest)?;
	exp = exp.checked_add(e).ok_or(CfracError::ExponentTooLarge)?;
	let mut sign = sign;
	rest = after_exponent.trim_start();

	if let Some(after_slash) = skip_char(rest, '/') {
		if is_decimal {
			return Err(CfracError::UnexpectedChar('/'));
		}
		let (den_sign, after_sign) = parse_sign(after_slash.trim_start());
		let (denominator, _, after_den) = parse_digits(after_sign.trim_start())?;
		sign = Sign::sign_of_product(sign, den_sign);
		den = denominator;
		rest = after_den.trim_start();
	}

	if !rest.is_empty() {
		return Err(unexpected(rest));
	}
	Ok(BigRat::from_parts(sign, num, den, exp))
}

// Whitespace is a separator on its own, so remember whether any was skipped.
fn skip_whitespace(input: &str) -> (&str, bool) {
	let trimmed = input.trim_start();
	(trimmed, trimmed.len() != input.len())
}

/// Parses a continued fraction such as `[3; 4, 12, 4]`, `-[0; 2, (1, 3)]`
/// or `1 (2)`. Terms may be separated by commas, semicolons or whitespace.
/// A parenthesised group of trailing terms repeats forever, and
/// parentheses around the whole bracketed list make every term repeat.
pub(crate) fn parse_continued_fraction(input: &str) -> CResult<ContinuedFractionInput> {
	let input = input.trim();
	if input.is_empty() {
		return Err(CfracError::EmptyInput);
	}
	let (sign, after_sign) = parse_sign(input);
	let after_sign = after_sign.trim_start();
	let (negative, wrapped, bracketed, mut rest) = if let Some(rest) = skip_char(after_sign, '[') {
		(sign == Sign::Negative, false, true, rest)
	} else if let Some(rest) =
		skip_char(after_sign, '(').and_then(|rest| skip_char(rest.trim_start(), '['))
	{
		(sign == Sign::Negative, true, true, rest)
	} else {
		// without brackets, a leading sign belongs to the first term
		(false, false, false, input)
	};
	if bracketed && rest.trim_start().starts_with(']') {
		return Err(CfracError::EmptyContinuedFraction);
	}

	let mut terms = vec![];
	let mut period_start = None;
	let mut period_closed = false;
	loop {
		rest = rest.trim_start();
		if period_start.is_none() {
			if let Some(after_paren) = skip_char(rest, '(') {
				period_start = Some(terms.len());
				rest = after_paren.trim_start();
			}
		}
		let (term, after_term) = parse_integer(rest)?;
		terms.push(term);
		let (mut after_term, mut separated) = skip_whitespace(after_term);
		if period_start.is_some() && !period_closed {
			if let Some(after_paren) = skip_char(after_term, ')') {
				period_closed = true;
				(after_term, separated) = skip_whitespace(after_paren);
			}
		}
		if let Some(after_separator) = after_term.strip_prefix(|ch: char| ch == ',' || ch == ';') {
			separated = true;
			after_term = after_separator.trim_start();
		}
		if bracketed {
			if let Some(after_bracket) = skip_char(after_term, ']') {
				rest = after_bracket;
				break;
			}
			if after_term.is_empty() {
				return Err(CfracError::UnexpectedEndOfInput);
			}
		} else if after_term.is_empty() {
			rest = after_term;
			break;
		}
		if period_closed || !separated {
			return Err(unexpected(after_term));
		}
		rest = after_term;
	}

	let mut rest = rest.trim_start();
	if wrapped {
		if period_start.is_some() {
			return Err(CfracError::UnexpectedChar('('));
		}
		rest = skip_char(rest, ')')
			.ok_or(CfracError::UnterminatedPeriod)?
			.trim_start();
		period_start = Some(0);
		period_closed = true;
	}
	if period_start.is_some() && !period_closed {
		return Err(CfracError::UnterminatedPeriod);
	}
	if !rest.is_empty() {
		return Err(unexpected(rest));
	}
	let period = period_start.map_or(0, |start| terms.len() - start);
	Ok(ContinuedFractionInput {
		negative,
		terms,
		period,
	})
}

/// Decides whether `input` is a number or a continued fraction. Brackets,
/// commas and semicolons only occur in continued fractions, and anything
/// else that is not a valid number is tried as one.
pub(crate) fn parse_input(input: &str) -> CResult<Input> {
	let input = input.trim();
	if input.is_empty() {
		return Err(CfracError::EmptyInput);
	}
	if input.contains(&['[', ']', ',', ';'][..]) {
		return parse_continued_fraction(input).map(Input::ContinuedFraction);
	}
	match parse_number(input) {
		Ok(number) => Ok(Input::Number(number)),
		Err(number_error) => parse_continued_fraction(input)
			.map(Input::ContinuedFraction)
			.map_err(|_| number_error),
	}
}
