use std::{error, fmt};

/// Every way a computation can fail.
///
/// `Interrupted` is the cooperative cancellation signal and should never be
/// shown to a user. Grammar failures all render with a common
/// "could not parse input" prefix.
#[derive(Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum CfracError {
	Interrupted,
	OutOfRange,
	EmptyInput,
	ExpectedADigit(char),
	ExpectedChar(char, char),
	UnexpectedChar(char),
	UnexpectedEndOfInput,
	UnterminatedPeriod,
	ExponentTooLarge,
	EmptyContinuedFraction,
	InvalidPeriod { period: usize, len: usize },
	DivideByZero,
	NonFiniteValue,
	Incomparable,
}

impl CfracError {
	/// Cancellation is expected whenever a newer request supersedes this one.
	pub fn is_interrupted(&self) -> bool {
		matches!(self, Self::Interrupted)
	}

	/// Returns true if the input text did not match the input grammar.
	pub fn is_malformed_input(&self) -> bool {
		matches!(
			self,
			Self::EmptyInput
				| Self::ExpectedADigit(_)
				| Self::ExpectedChar(_, _)
				| Self::UnexpectedChar(_)
				| Self::UnexpectedEndOfInput
				| Self::UnterminatedPeriod
				| Self::ExponentTooLarge
		)
	}
}

impl fmt::Display for CfracError {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		if self.is_malformed_input() {
			write!(f, "could not parse input: ")?;
		}
		match self {
			Self::Interrupted => write!(f, "interrupted"),
			Self::OutOfRange => write!(f, "the number exceeds the supported limits"),
			Self::EmptyInput => write!(f, "expected a number or a continued fraction"),
			Self::ExpectedADigit(ch) => write!(f, "expected a digit, found '{ch}'"),
			Self::ExpectedChar(ex, fnd) => write!(f, "expected '{ex}', found '{fnd}'"),
			Self::UnexpectedChar(ch) => write!(f, "unexpected character '{ch}'"),
			Self::UnexpectedEndOfInput => write!(f, "unexpected end of input"),
			Self::UnterminatedPeriod => write!(f, "the periodic part is missing a closing ')'"),
			Self::ExponentTooLarge => write!(f, "exponent too large"),
			Self::EmptyContinuedFraction => write!(f, "the continued fraction is empty"),
			Self::InvalidPeriod { period, len } => write!(
				f,
				"a period of {period} does not fit a continued fraction with {len} terms"
			),
			Self::DivideByZero => write!(f, "division by zero"),
			Self::NonFiniteValue => write!(f, "expected a finite number"),
			Self::Incomparable => write!(f, "undefined values cannot be compared"),
		}
	}
}

impl error::Error for CfracError {}

#[cfg(test)]
mod tests {
	use super::CfracError;

	#[test]
	fn parse_errors_share_a_prefix() {
		assert_eq!(
			CfracError::ExpectedADigit('x').to_string(),
			"could not parse input: expected a digit, found 'x'"
		);
		assert_eq!(
			CfracError::OutOfRange.to_string(),
			"the number exceeds the supported limits"
		);
	}

	#[test]
	fn classification() {
		assert!(CfracError::Interrupted.is_interrupted());
		assert!(!CfracError::OutOfRange.is_interrupted());
		assert!(CfracError::UnterminatedPeriod.is_malformed_input());
		assert!(!CfracError::DivideByZero.is_malformed_input());
	}
}
