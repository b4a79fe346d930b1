use std::path::PathBuf;
use tracing::{debug, warn};

use crate::types::MonitorError;

use super::Config;

impl Config {
    /// Get the root directory of the application
    pub fn app_root_dir() -> Result<PathBuf, MonitorError> {
        let config_path = get_config_path()?;
        match config_path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => Ok(parent.to_path_buf()),
            Some(_) => std::env::current_dir().map_err(|err| {
                MonitorError::Config(format!("Failed to determine app root: {err}"))
            }),
            None => Err(MonitorError::Config(
                "Unable to determine app root directory".to_string(),
            )),
        }
    }

    /// Resolve the session token file; relative paths are taken from the app root
    pub fn session_token_path(&self) -> Result<Option<PathBuf>, MonitorError> {
        let Some(file) = self.session_token_file.as_deref() else {
            return Ok(None);
        };
        let path = PathBuf::from(file);
        if path.is_absolute() {
            return Ok(Some(path));
        }
        Ok(Some(Self::app_root_dir()?.join(path)))
    }
}

/// Get the path to the config.json file
/// Looks for config.json in the app directory (parent of the bin folder)
pub(super) fn get_config_path() -> Result<PathBuf, MonitorError> {
    // Executable is at: app_root/bin/satusehat-sync-monitor
    // Config should be at: app_root/config.json
    if let Ok(exe_path) = std::env::current_exe() {
        debug!(path = %exe_path.display(), "Executable path detected");

        if let Some(app_root) = exe_path.parent().and_then(|bin_dir| bin_dir.parent()) {
            let config_path = app_root.join("config.json");
            debug!(path = %config_path.display(), "Looking for config");
            if config_path.exists() {
                return Ok(config_path);
            }
        }
    }

    warn!("Using fallback: looking for config.json in current directory");
    Ok(PathBuf::from("config.json"))
}
