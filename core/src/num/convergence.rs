use crate::bounds::Bounds;
use crate::interrupt::Interrupt;
use crate::num::bigrat::BigRat;
use crate::result::CResult;
use std::cmp::Ordering;

/// Controls how many trailing convergents of a periodic continued fraction
/// are inspected before its value is trusted.
///
/// The inspected tail is `max(period_multiple * period, generated / cap_divisor)`
/// convergents long, clipped to the number actually generated.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ConvergencePolicy {
	period_multiple: usize,
	cap_divisor: usize,
}

impl Default for ConvergencePolicy {
	fn default() -> Self {
		Self {
			period_multiple: 2,
			cap_divisor: 2,
		}
	}
}

impl ConvergencePolicy {
	/// A `cap_divisor` of zero inspects every generated convergent.
	pub fn new(period_multiple: usize, cap_divisor: usize) -> Self {
		Self {
			period_multiple,
			cap_divisor,
		}
	}

	fn tail_len(self, period: usize, generated: usize) -> usize {
		let share = generated.checked_div(self.cap_divisor).unwrap_or(generated);
		period
			.saturating_mul(self.period_multiple)
			.max(share)
			.min(generated)
	}

	/// A tail is abnormal if it mixes finite and non-finite values, or if the
	/// gap between two consecutive convergents ever grows.
	pub(crate) fn is_abnormal<I: Interrupt>(
		self,
		convergents: &[BigRat],
		period: usize,
		bounds: &Bounds<'_, I>,
	) -> CResult<bool> {
		let tail = &convergents[convergents.len() - self.tail_len(period, convergents.len())..];
		let finite = tail.iter().filter(|c| c.is_finite()).count();
		if finite == 0 {
			return Ok(false);
		}
		if finite != tail.len() {
			tracing::debug!(finite, tail = tail.len(), "tail mixes finite and infinite values");
			return Ok(true);
		}
		let mut previous_gap: Option<BigRat> = None;
		for pair in tail.windows(2) {
			bounds.check_cancelled()?;
			let gap = pair[0].clone().sub(pair[1].clone(), bounds)?.abs();
			if let Some(previous_gap) = previous_gap {
				if previous_gap.compare(&gap, bounds)? == Ordering::Less {
					tracing::debug!("convergent gaps stopped shrinking");
					return Ok(true);
				}
			}
			previous_gap = Some(gap);
		}
		Ok(false)
	}
}
