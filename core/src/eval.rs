use crate::bounds::Bounds;
use crate::error::CfracError;
use crate::interrupt::Interrupt;
use crate::num::bigrat::BigRat;
use crate::num::continued_fraction::{self, Canonicity};
use crate::parser::{ContinuedFractionInput, Input};
use crate::result::CResult;
use crate::{Canonical, CfracResult, Context, Limits, Warning};
use num_bigint::BigInt;
use num_traits::One;

pub(crate) fn evaluate_input<I: Interrupt>(
	input: Input,
	context: &Context,
	bounds: &Bounds<'_, I>,
) -> CResult<CfracResult> {
	match input {
		Input::ContinuedFraction(cf) => from_continued_fraction(cf, context, bounds),
		Input::Number(value) => from_number(value, context, bounds),
	}
}

pub(crate) fn from_continued_fraction<I: Interrupt>(
	input: ContinuedFractionInput,
	context: &Context,
	bounds: &Bounds<'_, I>,
) -> CResult<CfracResult> {
	let ContinuedFractionInput {
		negative,
		terms,
		period,
	} = input;
	let limits = context.limits();
	let mut warnings = vec![];
	let periodic = period != 0;
	// a periodic expansion is only cut off by this cap
	let cap = periodic.then(|| {
		limits
			.max_convergents
			.max(terms.len().saturating_add(period.saturating_mul(2)))
	});

	let mut values = vec![];
	for convergent in continued_fraction::convergents(&terms, period, cap, bounds)? {
		match convergent {
			Ok((h, k)) => values.push(BigRat::from_ratio(h, k)),
			Err(CfracError::OutOfRange) if periodic && !values.is_empty() => {
				tracing::debug!(
					generated = values.len(),
					"periodic expansion reached the magnitude limit"
				);
				warnings.push(Warning::MagnitudeExceeded);
				break;
			}
			Err(e) => return Err(e),
		}
	}
	tracing::trace!(count = values.len(), "generated convergents");

	let mut value = values
		.last()
		.cloned()
		.ok_or(CfracError::EmptyContinuedFraction)?;
	if periodic {
		value = value.into_approx();
		warnings.push(Warning::Approximate);
		if context
			.convergence_policy()
			.is_abnormal(&values, period, bounds)?
		{
			warnings.push(Warning::NonConvergent);
			value = BigRat::Undefined;
		}
	}
	let value = value.simplify(bounds)?;
	if !value.is_finite() {
		warnings.push(Warning::NotANumber);
	}

	let sign = if negative { "-" } else { "" };
	let canonical = if periodic {
		Canonical::NotVerified
	} else {
		match continued_fraction::check_canonical(&value, &terms, limits.max_terms, bounds)? {
			Canonicity::Regular => Canonical::Verified,
			Canonicity::Corrected(regular) => {
				Canonical::Corrected(format!("{sign}{}", format_terms(&regular, 0, false)))
			}
			Canonicity::Unverified => Canonical::NotVerified,
		}
	};
	let value = if negative { -value } else { value };

	let convergents = convergent_lines(&values, true, limits, bounds, &mut warnings)?;
	Ok(CfracResult {
		continued_fraction: format!("{sign}{}", format_terms(&terms, period, false)),
		decimal: format_decimal(&value, limits, bounds)?,
		rational: value.to_rational_string(limits.rational_digits),
		convergents,
		canonical,
		warnings,
	})
}

pub(crate) fn from_number<I: Interrupt>(
	value: BigRat,
	context: &Context,
	bounds: &Bounds<'_, I>,
) -> CResult<CfracResult> {
	let limits = context.limits();
	let mut warnings = vec![];
	if value.is_approx() {
		warnings.push(Warning::Approximate);
	}
	if !value.is_finite() {
		warnings.push(Warning::NotANumber);
		return Ok(CfracResult {
			continued_fraction: "Undefined".to_string(),
			decimal: value.to_float_string(bounds, limits.decimal_digits)?,
			rational: value.to_rational_string(limits.rational_digits),
			convergents: vec![],
			canonical: Canonical::NotVerified,
			warnings,
		});
	}

	let value = value.simplify(bounds)?;
	let max_terms = limits.max_terms.max(1);
	let (terms, truncated) = value.to_continued_fraction_terms(bounds, max_terms)?;
	if truncated {
		tracing::debug!(max_terms, "continued fraction expansion truncated");
		warnings.push(Warning::TooManyTerms);
	}
	let values = continued_fraction::convergents(&terms, 0, None, bounds)?
		.map(|convergent| convergent.map(|(h, k)| BigRat::from_ratio(h, k)))
		.collect::<CResult<Vec<_>>>()?;
	let convergents = convergent_lines(&values, false, limits, bounds, &mut warnings)?;

	Ok(CfracResult {
		continued_fraction: format_terms(&terms, 0, truncated),
		decimal: format_decimal(&value, limits, bounds)?,
		rational: value.to_rational_string(limits.rational_digits),
		convergents,
		canonical: Canonical::Verified,
		warnings,
	})
}

/// Renders terms as `[ a0; a1, a2 ]`, wrapping the last `period` terms in
/// parentheses.
fn format_terms(terms: &[BigInt], period: usize, truncated: bool) -> String {
	let period_start = (period != 0).then(|| terms.len().saturating_sub(period));
	let mut res = String::from("[ ");
	for (i, term) in terms.iter().enumerate() {
		match i {
			0 => (),
			1 => res.push_str("; "),
			_ => res.push_str(", "),
		}
		if Some(i) == period_start {
			res.push('(');
		}
		res.push_str(&term.to_string());
	}
	if period_start.is_some() {
		res.push(')');
	}
	res.push_str(if truncated { " ... ]" } else { " ]" });
	res
}

// Prefers the exact recurring form, falling back to a short approximation
// when the period is too long to show.
fn format_decimal<I: Interrupt>(
	value: &BigRat,
	limits: &Limits,
	bounds: &Bounds<'_, I>,
) -> CResult<String> {
	if !value.is_approx() {
		let exact = value.to_float_string(bounds, limits.recurring_digits)?;
		if !exact.starts_with('≈') {
			return Ok(exact);
		}
	}
	value.to_float_string(bounds, limits.decimal_digits)
}

/// With `bare_integer_head`, a whole first convergent is shown without its
/// denominator.
fn convergent_lines<I: Interrupt>(
	values: &[BigRat],
	bare_integer_head: bool,
	limits: &Limits,
	bounds: &Bounds<'_, I>,
	warnings: &mut Vec<Warning>,
) -> CResult<Vec<String>> {
	if values.len() > limits.max_convergent_lines {
		warnings.push(Warning::TooManyConvergents);
	}
	values
		.iter()
		.take(limits.max_convergent_lines)
		.enumerate()
		.map(|(i, value)| {
			format_convergent(i, value, bare_integer_head && i == 0, limits.convergent_digits, bounds)
		})
		.collect()
}

fn format_convergent<I: Interrupt>(
	index: usize,
	value: &BigRat,
	bare_integer: bool,
	digits: usize,
	bounds: &Bounds<'_, I>,
) -> CResult<String> {
	let decimal = value.to_float_string(bounds, digits)?;
	if !value.is_finite() {
		return Ok(format!("{index:>2}: {decimal}"));
	}
	let (num, den) = value.to_plain_form(bounds)?;
	if bare_integer && den.is_one() {
		return Ok(format!("{index:>2}: {decimal}"));
	}
	let (relation, decimal) = match decimal.strip_prefix('≈') {
		Some(rest) => ('≈', rest.to_string()),
		None => ('=', decimal),
	};
	Ok(format!("{index:>2}: {num} / {den} {relation} {decimal}"))
}
