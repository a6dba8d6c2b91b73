//! XDG Base Directory lookup for configuration files.

use crate::error::DriveError;
use std::path::PathBuf;

const APP_DIR: &str = "blossom-drive";

/// Get XDG config home directory
///
/// Returns `$XDG_CONFIG_HOME` if set, otherwise defaults to `$HOME/.config`
pub fn config_home() -> Result<PathBuf, DriveError> {
    if let Ok(xdg_config_home) = std::env::var("XDG_CONFIG_HOME") {
        if !xdg_config_home.is_empty() {
            return Ok(PathBuf::from(xdg_config_home));
        }
    }

    let home = std::env::var("HOME").map_err(|_| {
        DriveError::Config("Could not determine XDG config home directory (HOME not set)".to_string())
    })?;

    Ok(PathBuf::from(home).join(".config"))
}

/// Path of the global config file; it need not exist
pub fn global_config_path() -> Result<PathBuf, DriveError> {
    Ok(config_home()?.join(APP_DIR).join("config.toml"))
}
