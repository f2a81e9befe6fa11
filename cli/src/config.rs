use crate::file_paths;
use serde::Deserialize;
use std::{fmt, fs, io, time};

#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
pub struct Config {
	pub prompt: String,
	pub enable_hints: bool,
	pub max_history_size: usize,
	grace_period_ms: u64,
	limits: LimitsConfig,
	convergence: ConvergenceConfig,
}

impl Default for Config {
	fn default() -> Self {
		Self {
			prompt: "> ".to_string(),
			enable_hints: true,
			max_history_size: 1000,
			grace_period_ms: 99,
			limits: LimitsConfig::default(),
			convergence: ConvergenceConfig::default(),
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
struct LimitsConfig {
	max_digits: usize,
	max_terms: usize,
	max_convergents: usize,
	max_convergent_lines: usize,
	convergent_digits: usize,
	decimal_digits: usize,
	recurring_digits: usize,
	rational_digits: usize,
}

impl Default for LimitsConfig {
	fn default() -> Self {
		let limits = cfrac_core::Limits::default();
		Self {
			max_digits: limits.max_digits,
			max_terms: limits.max_terms,
			max_convergents: limits.max_convergents,
			max_convergent_lines: limits.max_convergent_lines,
			convergent_digits: limits.convergent_digits,
			decimal_digits: limits.decimal_digits,
			recurring_digits: limits.recurring_digits,
			rational_digits: limits.rational_digits,
		}
	}
}

impl From<LimitsConfig> for cfrac_core::Limits {
	fn from(config: LimitsConfig) -> Self {
		Self {
			max_digits: config.max_digits,
			max_terms: config.max_terms,
			max_convergents: config.max_convergents,
			max_convergent_lines: config.max_convergent_lines,
			convergent_digits: config.convergent_digits,
			decimal_digits: config.decimal_digits,
			recurring_digits: config.recurring_digits,
			rational_digits: config.rational_digits,
		}
	}
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
struct ConvergenceConfig {
	period_multiple: usize,
	cap_divisor: usize,
}

impl Default for ConvergenceConfig {
	fn default() -> Self {
		Self {
			period_multiple: 2,
			cap_divisor: 2,
		}
	}
}

impl Config {
	pub fn context(&self) -> cfrac_core::Context {
		let mut context = cfrac_core::Context::new();
		context.set_limits(self.limits.into());
		context.set_convergence_policy(cfrac_core::ConvergencePolicy::new(
			self.convergence.period_multiple,
			self.convergence.cap_divisor,
		));
		context
	}

	pub fn grace_period(&self) -> time::Duration {
		time::Duration::from_millis(self.grace_period_ms)
	}
}

pub static DEFAULT_CONFIG_FILE: &str = include_str!("default_config.toml");

enum ReadConfigErr {
	FileReadingError(io::Error),
	DeserializationError(toml::de::Error),
}

impl fmt::Display for ReadConfigErr {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			Self::FileReadingError(e) => write!(f, "failed to read config file: {e}"),
			Self::DeserializationError(e) => write!(f, "invalid config file: {e}"),
		}
	}
}

impl From<io::Error> for ReadConfigErr {
	fn from(err: io::Error) -> Self {
		Self::FileReadingError(err)
	}
}

impl From<toml::de::Error> for ReadConfigErr {
	fn from(err: toml::de::Error) -> Self {
		Self::DeserializationError(err)
	}
}

fn parse(contents: &str) -> Result<Config, toml::de::Error> {
	toml::from_str(contents)
}

// A missing config file is not an error.
fn read_config_file() -> Result<Option<Config>, ReadConfigErr> {
	let Some(path) = file_paths::get_config_file_location() else {
		return Ok(None);
	};
	let contents = match fs::read_to_string(&path) {
		Ok(contents) => contents,
		Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
		Err(e) => return Err(e.into()),
	};
	tracing::debug!(path = %path.display(), "reading config file");
	Ok(Some(parse(&contents)?))
}

pub fn read() -> Config {
	match read_config_file() {
		Ok(config) => config.unwrap_or_default(),
		Err(e) => {
			eprintln!("Error: {e}");
			eprintln!("Using the default configuration");
			Config::default()
		}
	}
}
