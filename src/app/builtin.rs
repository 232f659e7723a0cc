use std::env;
use std::ffi::OsStr;
use std::path::PathBuf;

use log::debug;

use crate::error::ShellError;

/// `cd [path]`. With no path, goes to the home directory. On failure the
/// working directory is unchanged.
pub fn change_dir(target: Option<&OsStr>) -> Result<PathBuf, ShellError> {
    let path = match target {
        Some(path) => PathBuf::from(path),
        None => dirs::home_dir().ok_or(ShellError::NoHomeDir)?,
    };
    env::set_current_dir(&path).map_err(|source| ShellError::Navigation {
        path: path.clone(),
        source,
    })?;
    debug!("Changed directory to {}.", path.display());
    Ok(path)
}
