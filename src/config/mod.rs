pub mod settings;

pub use settings::{GitSettings, ProbeBackend, Settings, ToolSettings};

use crate::errors::{Result, StackscopeError};
use std::path::PathBuf;

/// Environment variable that overrides the config file location
pub const CONFIG_PATH_ENV: &str = "STACKSCOPE_CONFIG";

/// Get the Stackscope configuration directory (~/.stackscope/)
pub fn get_config_dir() -> Result<PathBuf> {
    let home_dir =
        dirs::home_dir().ok_or_else(|| StackscopeError::config("Could not find home directory"))?;
    Ok(home_dir.join(".stackscope"))
}

/// Path of the settings file, honouring `STACKSCOPE_CONFIG`
pub fn config_file_path() -> Result<PathBuf> {
    if let Some(path) = std::env::var_os(CONFIG_PATH_ENV).filter(|p| !p.is_empty()) {
        return Ok(PathBuf::from(path));
    }
    Ok(get_config_dir()?.join("config.json"))
}

/// Load settings from the configured location
pub fn load_settings() -> Result<Settings> {
    let path = config_file_path()?;
    Settings::load_from_file(&path)
}
