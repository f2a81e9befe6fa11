use crate::{config, file_paths, helper};
use std::{error, io, mem, path};

// contains wrapper code for terminal handling, using third-party
// libraries where necessary

pub fn is_terminal_stdin() -> bool {
	// check if stdin is a tty (used for whether to show an
	// interactive prompt)
	io::IsTerminal::is_terminal(&io::stdin())
}

type Editor = rustyline::Editor<helper::Helper, rustyline::history::FileHistory>;

pub struct PromptState<'a> {
	rl: Editor,
	config: &'a config::Config,
	history_path: Option<path::PathBuf>,
}

pub fn init_prompt(config: &config::Config) -> Result<PromptState<'_>, Box<dyn error::Error>> {
	let mut rl = Editor::with_config(
		rustyline::config::Builder::new()
			.history_ignore_space(true)
			.auto_add_history(true)
			.max_history_size(config.max_history_size)?
			.build(),
	)?;
	rl.set_helper(Some(helper::Helper::new(config)));
	let history_path = match file_paths::get_history_file_location(file_paths::DirMode::DontCreate)
	{
		Ok(history_path) => {
			// ignore error if e.g. no history file exists
			mem::drop(rl.load_history(history_path.as_path()));
			Some(history_path)
		}
		Err(e) => {
			tracing::warn!("history disabled: {e}");
			None
		}
	};
	Ok(PromptState {
		rl,
		config,
		history_path,
	})
}

pub enum ReadLineError {
	Interrupted, // e.g. Ctrl-C
	Eof,
	Error(Box<dyn error::Error>),
}

impl From<rustyline::error::ReadlineError> for ReadLineError {
	fn from(err: rustyline::error::ReadlineError) -> Self {
		match err {
			rustyline::error::ReadlineError::Interrupted => ReadLineError::Interrupted,
			rustyline::error::ReadlineError::Eof => ReadLineError::Eof,
			err => ReadLineError::Error(err.into()),
		}
	}
}

fn save_history(rl: &mut Editor, path: Option<&path::PathBuf>) -> io::Result<()> {
	if let Some(history_path) = path {
		file_paths::get_state_dir(file_paths::DirMode::Create)?;
		if let Err(e) = rl.save_history(history_path.as_path()) {
			tracing::debug!("failed to save history: {e}");
		}
	}
	Ok(())
}

impl PromptState<'_> {
	pub fn read_line(&mut self) -> Result<String, ReadLineError> {
		let res = self.rl.readline(self.config.prompt.as_str());
		// ignore errors when saving history
		mem::drop(save_history(&mut self.rl, self.history_path.as_ref()));
		Ok(res?)
	}
}
