use std::sync::atomic::{AtomicBool, Ordering};
use std::{process, sync::Arc};

/// A shared flag that interrupts every computation holding a clone of it.
#[derive(Clone, Default)]
pub struct CancelToken {
	cancelled: Arc<AtomicBool>,
}

impl CancelToken {
	pub fn cancel(&self) {
		self.cancelled.store(true, Ordering::SeqCst);
	}

	pub fn is_cancelled(&self) -> bool {
		self.cancelled.load(Ordering::SeqCst)
	}

	fn clear(&self) {
		self.cancelled.store(false, Ordering::SeqCst);
	}
}

impl cfrac_core::Interrupt for CancelToken {
	fn should_interrupt(&self) -> bool {
		self.cancelled.load(Ordering::Relaxed)
	}
}

/// Raised by Ctrl-C and cleared before each new line is evaluated.
pub struct CtrlC {
	token: CancelToken,
}

impl cfrac_core::Interrupt for CtrlC {
	fn should_interrupt(&self) -> bool {
		self.token.should_interrupt()
	}
}

impl CtrlC {
	pub fn reset(&self) {
		self.token.clear();
	}
}

pub fn register_handler() -> CtrlC {
	let token = CancelToken::default();
	let pressed = token.clone();
	let handler = move || {
		if pressed.is_cancelled() {
			// a second Ctrl-C before the next line quits
			process::exit(1);
		}
		pressed.cancel();
	};
	if let Err(e) = ctrlc::set_handler(handler) {
		tracing::warn!("unable to set Ctrl-C handler: {e}");
	}
	CtrlC { token }
}
