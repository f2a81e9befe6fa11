use std::{env, fs, io, path};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum DirMode {
	Create,
	DontCreate,
}

fn get_home_dir() -> Option<path::PathBuf> {
	let userdirs = directories::UserDirs::new()?;
	let home_dir = userdirs.home_dir();
	Some(path::PathBuf::from(home_dir))
}

fn no_home_dir() -> io::Error {
	io::Error::new(io::ErrorKind::NotFound, "could not determine home directory")
}

// Resolves $<env_var>, then $<xdg_var>/cfrac, then $HOME/<fallback>/cfrac.
fn find_dir(env_var: &str, xdg_var: &str, fallback: &[&str]) -> Option<path::PathBuf> {
	if let Some(dir) = env::var_os(env_var) {
		return Some(path::PathBuf::from(dir));
	}
	if let Some(xdg_dir) = env::var_os(xdg_var) {
		let mut res = path::PathBuf::from(xdg_dir);
		res.push("cfrac");
		return Some(res);
	}
	let mut res = get_home_dir()?;
	for component in fallback {
		res.push(component);
	}
	res.push("cfrac");
	Some(res)
}

fn get_config_dir() -> Option<path::PathBuf> {
	find_dir("CFRAC_CONFIG_DIR", "XDG_CONFIG_HOME", &[".config"])
}

pub fn get_config_file_location() -> Option<path::PathBuf> {
	let mut config_path = get_config_dir()?;
	config_path.push("config.toml");
	Some(config_path)
}

pub fn get_state_dir(mode: DirMode) -> io::Result<path::PathBuf> {
	let dir = find_dir("CFRAC_STATE_DIR", "XDG_STATE_HOME", &[".local", "state"])
		.ok_or_else(no_home_dir)?;
	if mode == DirMode::Create {
		fs::create_dir_all(&dir)?;
	}
	Ok(dir)
}

pub fn get_history_file_location(mode: DirMode) -> io::Result<path::PathBuf> {
	let mut history_path = get_state_dir(mode)?;
	history_path.push("history");
	Ok(history_path)
}
