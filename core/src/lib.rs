//! Converts between continued fractions, exact rationals and recurring
//! decimals.
//!
//! ```
//! let context = cfrac_core::Context::new();
//! let result = cfrac_core::evaluate("[3; 4, 12, 4]", &context).unwrap();
//! assert_eq!(result.get_decimal(), "3.245");
//! assert_eq!(result.get_rational(), "649 / 200");
//! ```

#![forbid(unsafe_code)]

mod bounds;
mod error;
mod eval;
mod interrupt;
mod num;
mod parser;
mod result;

use std::fmt;

pub use error::CfracError;
pub use interrupt::Interrupt;
pub use num::ConvergencePolicy;

/// Ceilings that keep every computation bounded in time and memory.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Limits {
	/// No numerator or denominator may have more decimal digits than this.
	pub max_digits: usize,
	/// Longest continued fraction produced when expanding a number.
	pub max_terms: usize,
	/// Minimum number of convergents generated for a periodic fraction.
	pub max_convergents: usize,
	/// Convergents beyond this many are computed but not listed.
	pub max_convergent_lines: usize,
	/// Fractional digits shown for each convergent.
	pub convergent_digits: usize,
	/// Fractional digits shown when the exact decimal is too long.
	pub decimal_digits: usize,
	/// Longest exact decimal expansion (including the recurring part).
	pub recurring_digits: usize,
	/// Integers in the rational form longer than this are shortened.
	pub rational_digits: usize,
}

impl Default for Limits {
	fn default() -> Self {
		Self {
			max_digits: 300,
			max_terms: 100,
			max_convergents: 100,
			max_convergent_lines: 100,
			convergent_digits: 30,
			decimal_digits: 20,
			recurring_digits: 1000,
			rational_digits: 200,
		}
	}
}

/// Settings shared by all evaluations.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Context {
	limits: Limits,
	policy: ConvergencePolicy,
}

impl Context {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn limits(&self) -> &Limits {
		&self.limits
	}

	pub fn set_limits(&mut self, limits: Limits) {
		self.limits = limits;
	}

	pub fn convergence_policy(&self) -> ConvergencePolicy {
		self.policy
	}

	pub fn set_convergence_policy(&mut self, policy: ConvergencePolicy) {
		self.policy = policy;
	}
}

/// Something worth pointing out about a result.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum Warning {
	TooManyTerms,
	TooManyConvergents,
	MagnitudeExceeded,
	NotANumber,
	Approximate,
	NonConvergent,
}

impl fmt::Display for Warning {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::TooManyTerms => write!(f, "The continued fraction is too long."),
			Self::TooManyConvergents => write!(f, "Only the first convergents are shown."),
			Self::MagnitudeExceeded => write!(
				f,
				"The convergents exceed the supported limits, so fewer were computed."
			),
			Self::NotANumber => write!(f, "The value is not a number."),
			Self::Approximate => write!(f, "The value is approximate."),
			Self::NonConvergent => write!(f, "The continued fraction does not converge."),
		}
	}
}

/// Whether a continued fraction that was entered is in regular form.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Canonical {
	Verified,
	/// Holds the regular form of the same value.
	Corrected(String),
	NotVerified,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CfracResult {
	continued_fraction: String,
	decimal: String,
	rational: String,
	convergents: Vec<String>,
	canonical: Canonical,
	warnings: Vec<Warning>,
}

impl CfracResult {
	fn empty() -> Self {
		Self {
			continued_fraction: String::new(),
			decimal: String::new(),
			rational: String::new(),
			convergents: vec![],
			canonical: Canonical::NotVerified,
			warnings: vec![],
		}
	}

	pub fn is_empty(&self) -> bool {
		self.continued_fraction.is_empty() && self.decimal.is_empty()
	}

	pub fn get_continued_fraction(&self) -> &str {
		self.continued_fraction.as_str()
	}

	pub fn get_decimal(&self) -> &str {
		self.decimal.as_str()
	}

	pub fn get_rational(&self) -> &str {
		self.rational.as_str()
	}

	pub fn get_convergents(&self) -> impl Iterator<Item = &str> {
		self.convergents.iter().map(String::as_str)
	}

	pub fn get_canonical(&self) -> &Canonical {
		&self.canonical
	}

	pub fn get_warnings(&self) -> &[Warning] {
		&self.warnings
	}
}

impl fmt::Display for CfracResult {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_empty() {
			return Ok(());
		}
		writeln!(f, "{}", self.continued_fraction)?;
		writeln!(f, "= {}", self.rational)?;
		write!(f, "= {}", self.decimal)?;
		if let Canonical::Corrected(regular) = &self.canonical {
			write!(f, "\nRegular form: {regular}")?;
		}
		if !self.convergents.is_empty() {
			write!(f, "\nConvergents:")?;
			for line in &self.convergents {
				write!(f, "\n{line}")?;
			}
		}
		for warning in &self.warnings {
			write!(f, "\n⚠ {warning}")?;
		}
		Ok(())
	}
}

/// Evaluates a number or a continued fraction, deciding which from the
/// shape of the input. Blank input gives an empty result.
pub fn evaluate(input: &str, context: &Context) -> Result<CfracResult, CfracError> {
	evaluate_with_interrupt(input, context, &interrupt::Never)
}

pub fn evaluate_with_interrupt<I: Interrupt>(
	input: &str,
	context: &Context,
	int: &I,
) -> Result<CfracResult, CfracError> {
	if input.trim().is_empty() {
		return Ok(CfracResult::empty());
	}
	tracing::debug!(input, "evaluating");
	let parsed = parser::parse_input(input)?;
	let bounds = bounds::Bounds::new(int, context.limits.max_digits);
	eval::evaluate_input(parsed, context, &bounds)
}

/// Evaluates `input` as a continued fraction such as `[1; (2)]`.
pub fn evaluate_continued_fraction<I: Interrupt>(
	input: &str,
	context: &Context,
	int: &I,
) -> Result<CfracResult, CfracError> {
	let parsed = parser::parse_continued_fraction(input)?;
	let bounds = bounds::Bounds::new(int, context.limits.max_digits);
	eval::from_continued_fraction(parsed, context, &bounds)
}

/// Evaluates `input` as a number such as `0.1(6)` or `-22/7`.
pub fn evaluate_number<I: Interrupt>(
	input: &str,
	context: &Context,
	int: &I,
) -> Result<CfracResult, CfracError> {
	let parsed = parser::parse_number(input)?;
	let bounds = bounds::Bounds::new(int, context.limits.max_digits);
	eval::from_number(parsed, context, &bounds)
}

const fn get_version_as_str() -> &'static str {
	env!("CARGO_PKG_VERSION")
}

pub fn get_version() -> String {
	get_version_as_str().to_string()
}
