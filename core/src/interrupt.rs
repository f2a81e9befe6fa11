use crate::error::CfracError;
use crate::result::CResult;

/// Lets the caller abort a computation that is taking too long, or that
/// has been superseded by a newer request.
pub trait Interrupt {
	fn should_interrupt(&self) -> bool;
}

pub(crate) fn test_int<I: Interrupt>(int: &I) -> CResult<()> {
	if int.should_interrupt() {
		Err(CfracError::Interrupted)
	} else {
		Ok(())
	}
}

#[derive(Default)]
pub(crate) struct Never;
impl Interrupt for Never {
	fn should_interrupt(&self) -> bool {
		false
	}
}
