/// Which action should be executed?
///
/// This implements [`FromIterator`] and can be `collect`ed from
/// the [`std::env::args()`]`.skip(1)` iterator.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Action {
	/// Print the help message (without quitting explanation).
	Help,
	/// Print the current version.
	Version,
	/// Enter the REPL.
	Repl,
	/// Evaluate the arguments once.
	Eval(String),
	/// Read lines from stdin, each one superseding the computation before it.
	Watch,
	/// Show the default config file
	DefaultConfig,
}

impl FromIterator<String> for Action {
	fn from_iter<T: IntoIterator<Item = String>>(iter: T) -> Self {
		iter.into_iter().fold(Action::Repl, |action, arg| {
			use Action::{DefaultConfig, Eval, Help, Repl, Version, Watch};
			match (action, arg.as_str()) {
				// If any argument is shouting for help, print help!
				(_, "help" | "--help" | "-h") | (Help, _) => Help,
				// Once we're set on printing the version, only a request for help
				// can overwrite that
				(Repl | Eval(_) | Watch | DefaultConfig, "--version" | "-v" | "-V")
				| (Version, _) => Version,
				(Repl | Eval(_) | Watch, "--default-config") | (DefaultConfig, _) => DefaultConfig,
				(Repl | Eval(_), "--watch" | "-w") | (Watch, _) => Watch,
				// Ignore empty arguments, so that `$ cfrac "" ""` will enter the repl.
				(Repl, arg) if !arg.trim().is_empty() => Eval(String::from(arg)),
				(Repl, _) => Repl,
				(Eval(eval), arg) => Eval(eval + " " + arg),
			}
		})
	}
}
