#![forbid(unsafe_code)]
#![deny(clippy::all)]

use std::{env, io, process};
use tokio::io::AsyncBufReadExt;

mod args;
mod config;
mod file_paths;
mod helper;
mod interrupt;
mod session;
mod terminal;

enum EvalResult {
	Ok,
	Err,
	NoInput,
}

fn eval_and_print_res(
	line: &str,
	context: &cfrac_core::Context,
	int: &impl cfrac_core::Interrupt,
) -> EvalResult {
	print_res(cfrac_core::evaluate_with_interrupt(line, context, int))
}

fn print_res(result: Result<cfrac_core::CfracResult, cfrac_core::CfracError>) -> EvalResult {
	match result {
		Ok(res) => {
			if res.is_empty() {
				return EvalResult::NoInput;
			}
			println!("{res}");
			EvalResult::Ok
		}
		Err(e) if e.is_interrupted() => {
			eprintln!("Interrupted");
			EvalResult::Err
		}
		Err(e) => {
			eprintln!("Error: {e}");
			EvalResult::Err
		}
	}
}

fn print_help(explain_quitting: bool) {
	println!("Converts between continued fractions, fractions and recurring decimals.");
	println!();
	println!("Examples:");
	println!("  [3; 4, 12, 4]     continued fraction");
	println!("  -[0; 2, (1, 3)]   negated, with a repeating tail");
	println!("  0.1(6)            recurring decimal");
	println!("  649/200, 1.5e-3   fractions and exponents");
	println!("  pi, e             built-in constants");
	println!();
	println!("Usage: cfrac [--watch | --default-config | --version | --help] [INPUT...]");
	println!();
	println!("Version: {}", cfrac_core::get_version());
	if let Some(config_path) = file_paths::get_config_file_location() {
		println!("Config file: {}", config_path.to_string_lossy());
	} else {
		println!("Failed to get config file location");
	}
	if let Ok(history_path) = file_paths::get_history_file_location(file_paths::DirMode::DontCreate)
	{
		println!("History file: {}", history_path.to_string_lossy());
	} else {
		println!("Failed to get history file location");
	}
	if explain_quitting {
		println!("\nTo quit, type `quit`.");
	}
}

fn repl_loop(config: &config::Config) -> i32 {
	let context = config.context();
	let mut prompt_state = match terminal::init_prompt(config) {
		Ok(prompt_state) => prompt_state,
		Err(err) => {
			eprintln!("Error: {err}");
			return 1;
		}
	};
	let mut initial_run = true; // set to false after first successful command
	let mut last_command_success = true;
	let interrupt = interrupt::register_handler();
	loop {
		match prompt_state.read_line() {
			Ok(line) => match line.as_str() {
				"exit" | "exit()" | ".exit" | ":exit" | "quit" | "quit()" | ":quit" | ":q"
				| ":wq" | ":q!" | ":wq!" | ":qa" | ":wqa" | ":qa!" | ":wqa!" => break,
				"help" | "?" => {
					print_help(true);
				}
				line => {
					interrupt.reset();
					match eval_and_print_res(line, &context, &interrupt) {
						EvalResult::Ok => {
							last_command_success = true;
							initial_run = false;
						}
						EvalResult::NoInput => {
							last_command_success = true;
						}
						EvalResult::Err => {
							last_command_success = false;
						}
					}
				}
			},
			Err(terminal::ReadLineError::Interrupted) => {
				if initial_run {
					break;
				}
				println!("Use Ctrl-D (i.e. EOF) to exit");
			}
			Err(terminal::ReadLineError::Eof) => break,
			Err(terminal::ReadLineError::Error(err)) => {
				eprintln!("Error: {err}");
				break;
			}
		}
	}
	i32::from(!last_command_success)
}

// Evaluates each line of a non-interactive stdin in turn.
fn batch_loop(config: &config::Config) -> i32 {
	let context = config.context();
	let interrupt = interrupt::register_handler();
	let mut success = true;
	for line in io::stdin().lines() {
		let Ok(line) = line else {
			return 1;
		};
		interrupt.reset();
		if let EvalResult::Err = eval_and_print_res(&line, &context, &interrupt) {
			success = false;
		}
	}
	i32::from(!success)
}

async fn watch_loop(config: &config::Config) -> io::Result<i32> {
	let mut session = session::Session::new(config.context(), config.grace_period());
	let mut lines = tokio::io::BufReader::new(tokio::io::stdin()).lines();
	let mut last = EvalResult::NoInput;
	loop {
		tokio::select! {
			line = lines.next_line() => match line? {
				Some(line) => session.submit(line).await,
				None => break,
			},
			Some(outcome) = session.next_result() => {
				last = print_res(outcome.result);
				println!();
			}
			_ = tokio::signal::ctrl_c() => {
				session.stop().await;
				return Ok(1);
			}
		}
	}
	if let Some(outcome) = session.finish().await {
		last = print_res(outcome.result);
	}
	Ok(i32::from(matches!(last, EvalResult::Err)))
}

fn init_logging() {
	let filter = tracing_subscriber::EnvFilter::try_from_env("CFRAC_LOG")
		.unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn"));
	tracing_subscriber::fmt()
		.with_env_filter(filter)
		.with_writer(io::stderr)
		.init();
}

fn main() {
	init_logging();
	process::exit(real_main())
}

fn real_main() -> i32 {
	// Assemble the action from all but the first argument.
	let action: args::Action = env::args().skip(1).collect();
	match action {
		args::Action::Help => {
			print_help(false);
			0
		}
		args::Action::Version => {
			println!("{}", cfrac_core::get_version());
			0
		}
		args::Action::DefaultConfig => {
			print!("{}", config::DEFAULT_CONFIG_FILE);
			0
		}
		args::Action::Eval(expr) => {
			let config = config::read();
			let interrupt = interrupt::register_handler();
			match eval_and_print_res(expr.as_str(), &config.context(), &interrupt) {
				EvalResult::Ok | EvalResult::NoInput => 0,
				EvalResult::Err => 1,
			}
		}
		args::Action::Watch => {
			let config = config::read();
			let runtime = match tokio::runtime::Builder::new_multi_thread()
				.enable_all()
				.build()
			{
				Ok(runtime) => runtime,
				Err(e) => {
					eprintln!("Error: failed to start runtime: {e}");
					return 1;
				}
			};
			match runtime.block_on(watch_loop(&config)) {
				Ok(code) => code,
				Err(e) => {
					eprintln!("Error: {e}");
					1
				}
			}
		}
		args::Action::Repl => {
			let config = config::read();
			if terminal::is_terminal_stdin() {
				repl_loop(&config)
			} else {
				batch_loop(&config)
			}
		}
	}
}
