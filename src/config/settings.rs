use crate::errors::{Result, StackscopeError};
use crate::stack::tool::GRAPHITE_METADATA_MARKER;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub tool: ToolSettings,
    pub git: GitSettings,
}

/// How the stacked-diff CLI is invoked
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ToolSettings {
    /// Executable name or path of the Graphite CLI
    pub program: String,
    /// Ceiling for the stack report command
    pub timeout_secs: u64,
    /// Ceiling for the one-time availability probe
    pub probe_timeout_secs: u64,
    /// File in the git dir that marks an initialized repository
    pub metadata_marker: String,
}

/// How live repository state is read
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GitSettings {
    pub program: String,
    pub timeout_secs: u64,
    pub backend: ProbeBackend,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProbeBackend {
    /// Shell out to `git`
    #[default]
    Cli,
    /// Read the repository in-process
    Libgit2,
}

impl fmt::Display for ProbeBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeBackend::Cli => f.write_str("cli"),
            ProbeBackend::Libgit2 => f.write_str("libgit2"),
        }
    }
}

impl FromStr for ProbeBackend {
    type Err = StackscopeError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "cli" | "git" => Ok(ProbeBackend::Cli),
            "libgit2" | "git2" => Ok(ProbeBackend::Libgit2),
            other => Err(StackscopeError::config(format!(
                "Invalid git backend: {other}. Valid options: cli, libgit2"
            ))),
        }
    }
}

impl Default for ToolSettings {
    fn default() -> Self {
        Self {
            program: "gt".to_string(),
            timeout_secs: 10,
            probe_timeout_secs: 5,
            metadata_marker: GRAPHITE_METADATA_MARKER.to_string(),
        }
    }
}

impl Default for GitSettings {
    fn default() -> Self {
        Self {
            program: "git".to_string(),
            timeout_secs: 10,
            backend: ProbeBackend::Cli,
        }
    }
}

impl ToolSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }
}

impl GitSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

fn parse_secs(key: &str, value: &str) -> Result<u64> {
    value
        .trim()
        .parse()
        .map_err(|_| StackscopeError::config(format!("Invalid number of seconds for {key}: {value}")))
}

impl Settings {
    /// Load settings from a file, falling back to defaults when it is absent
    pub fn load_from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!("No config at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .map_err(|e| StackscopeError::config(format!("Failed to read config file: {e}")))?;

        let settings: Settings = serde_json::from_str(&content)
            .map_err(|e| StackscopeError::config(format!("Failed to parse config file: {e}")))?;

        settings.validate()?;
        Ok(settings)
    }

    /// Save settings to a file, creating its directory if needed
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StackscopeError::config(format!("Failed to create config directory: {e}"))
            })?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| StackscopeError::config(format!("Failed to serialize config: {e}")))?;

        fs::write(path, content)
            .map_err(|e| StackscopeError::config(format!("Failed to write config file: {e}")))?;

        Ok(())
    }

    /// Every settable key, in display order
    pub fn keys() -> &'static [&'static str] {
        &[
            "tool.program",
            "tool.timeout_secs",
            "tool.probe_timeout_secs",
            "tool.metadata_marker",
            "git.program",
            "git.timeout_secs",
            "git.backend",
        ]
    }

    /// Update a configuration value by key
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match split_key(key)? {
            ("tool", "program") => self.tool.program = value.to_string(),
            ("tool", "timeout_secs") => self.tool.timeout_secs = parse_secs(key, value)?,
            ("tool", "probe_timeout_secs") => {
                self.tool.probe_timeout_secs = parse_secs(key, value)?
            }
            ("tool", "metadata_marker") => self.tool.metadata_marker = value.to_string(),
            ("git", "program") => self.git.program = value.to_string(),
            ("git", "timeout_secs") => self.git.timeout_secs = parse_secs(key, value)?,
            ("git", "backend") => self.git.backend = value.parse()?,
            _ => return Err(StackscopeError::config(format!("Unknown config key: {key}"))),
        }

        Ok(())
    }

    /// Get a configuration value by key
    pub fn get_value(&self, key: &str) -> Result<String> {
        let value = match split_key(key)? {
            ("tool", "program") => self.tool.program.clone(),
            ("tool", "timeout_secs") => self.tool.timeout_secs.to_string(),
            ("tool", "probe_timeout_secs") => self.tool.probe_timeout_secs.to_string(),
            ("tool", "metadata_marker") => self.tool.metadata_marker.clone(),
            ("git", "program") => self.git.program.clone(),
            ("git", "timeout_secs") => self.git.timeout_secs.to_string(),
            ("git", "backend") => self.git.backend.to_string(),
            _ => return Err(StackscopeError::config(format!("Unknown config key: {key}"))),
        };

        Ok(value)
    }

    /// Reset a key to its default value
    pub fn unset_value(&mut self, key: &str) -> Result<()> {
        let defaults = Settings::default();
        let default_value = defaults.get_value(key)?;
        self.set_value(key, &default_value)
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<()> {
        if self.tool.program.trim().is_empty() {
            return Err(StackscopeError::config("tool.program must not be empty"));
        }
        if self.git.program.trim().is_empty() {
            return Err(StackscopeError::config("git.program must not be empty"));
        }
        if self.tool.metadata_marker.trim().is_empty() {
            return Err(StackscopeError::config("tool.metadata_marker must not be empty"));
        }
        if self.tool.timeout_secs == 0
            || self.tool.probe_timeout_secs == 0
            || self.git.timeout_secs == 0
        {
            return Err(StackscopeError::config("Timeouts must be at least one second"));
        }

        Ok(())
    }
}

fn split_key(key: &str) -> Result<(&str, &str)> {
    key.split_once('.')
        .filter(|(section, name)| !section.is_empty() && !name.is_empty() && !name.contains('.'))
        .ok_or_else(|| StackscopeError::config(format!("Invalid config key format: {key}")))
}
