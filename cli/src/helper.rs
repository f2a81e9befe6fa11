use crate::config;
use std::time;

pub struct HintInterrupt {
	start: time::Instant,
	duration: time::Duration,
}

impl cfrac_core::Interrupt for HintInterrupt {
	fn should_interrupt(&self) -> bool {
		time::Instant::now().duration_since(self.start) >= self.duration
	}
}

impl Default for HintInterrupt {
	fn default() -> Self {
		Self {
			start: time::Instant::now(),
			duration: time::Duration::from_millis(20),
		}
	}
}

pub struct Hint(String);

impl rustyline::hint::Hint for Hint {
	fn display(&self) -> &str {
		self.0.as_str()
	}

	fn completion(&self) -> Option<&str> {
		None
	}
}

pub struct Helper {
	ctx: cfrac_core::Context,
	enable_hints: bool,
}

impl Helper {
	pub fn new(config: &config::Config) -> Self {
		Self {
			ctx: config.context(),
			enable_hints: config.enable_hints,
		}
	}

	// Previews the fraction for a continued fraction and the continued
	// fraction for anything else.
	fn preview(&self, line: &str) -> Option<String> {
		let int = HintInterrupt::default();
		let result = cfrac_core::evaluate_with_interrupt(line, &self.ctx, &int).ok()?;
		let preview = if line.contains('[') || line.contains(',') {
			result.get_rational()
		} else {
			result.get_continued_fraction()
		};
		if preview.is_empty() || preview.len() > 50 || preview.trim() == line.trim() {
			return None;
		}
		Some(format!("\n= {preview}"))
	}
}

impl rustyline::hint::Hinter for Helper {
	type Hint = Hint;

	fn hint(&self, line: &str, _pos: usize, _ctx: &rustyline::Context<'_>) -> Option<Hint> {
		if !self.enable_hints {
			return None;
		}
		self.preview(line).map(Hint)
	}
}

impl rustyline::highlight::Highlighter for Helper {}

impl rustyline::validate::Validator for Helper {}

impl rustyline::completion::Completer for Helper {
	type Candidate = String;
}

impl rustyline::Helper for Helper {}
