//! Configuration for imsource
//!
//! Where data files live and how verbose logging is. Loaded from
//! `<config dir>/imsource/config.toml` when present:
//!
//! ```toml
//! data_dir = "/home/me/.local/share/imsource"
//! log_filter = "imsource=debug"
//!
//! [files]
//! active = "sources.json"
//! bin = "recycle_bin.json"
//! aliases = "aliases.json"
//! pinned = "pinned.txt"
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Top-level configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ImsourceConfig {
    /// Directory holding all data files
    pub data_dir: PathBuf,
    /// `tracing_subscriber::EnvFilter` directive used when `RUST_LOG` is unset
    pub log_filter: String,
    /// Data file names, relative to `data_dir`
    pub files: FileNames,
}

/// Data file names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FileNames {
    pub active: String,
    pub bin: String,
    pub aliases: String,
    pub pinned: String,
    pub log: String,
}

impl Default for FileNames {
    fn default() -> Self {
        Self {
            active: "sources.json".to_string(),
            bin: "recycle_bin.json".to_string(),
            aliases: "aliases.json".to_string(),
            pinned: "pinned.txt".to_string(),
            log: "imsource.log".to_string(),
        }
    }
}

impl Default for ImsourceConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            log_filter: "imsource=info".to_string(),
            files: FileNames::default(),
        }
    }
}

fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .map(|dir| dir.join("imsource"))
        .unwrap_or_else(|| PathBuf::from("data"))
}

impl ImsourceConfig {
    /// Create a new configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Standard config file location
    pub fn default_path() -> Option<PathBuf> {
        dirs::config_dir().map(|dir| dir.join("imsource").join("config.toml"))
    }

    /// Load from the standard location, falling back to defaults when absent.
    pub fn load_standard() -> Result<Self, ConfigError> {
        match Self::default_path() {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Load and validate a TOML config file
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|e| ConfigError::Io(e.to_string()))?;
        let config = Self::from_toml(&text)?;
        config.validate()?;
        Ok(config)
    }

    /// Parse configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(toml_str)?)
    }

    /// Serialize configuration to TOML
    pub fn to_toml(&self) -> Result<String, ConfigError> {
        toml::to_string_pretty(self).map_err(|e| ConfigError::Parse(e.to_string()))
    }

    /// Validate configuration values
    pub fn validate(&self) -> Result<(), ConfigError> {
        let files = [
            ("active", &self.files.active),
            ("bin", &self.files.bin),
            ("aliases", &self.files.aliases),
            ("pinned", &self.files.pinned),
            ("log", &self.files.log),
        ];
        for (name, file) in files {
            if file.trim().is_empty() {
                return Err(ConfigError::OutOfRange(format!(
                    "files.{name} must not be empty"
                )));
            }
        }
        Ok(())
    }

    pub fn active_path(&self) -> PathBuf {
        self.data_dir.join(&self.files.active)
    }

    pub fn bin_path(&self) -> PathBuf {
        self.data_dir.join(&self.files.bin)
    }

    pub fn aliases_path(&self) -> PathBuf {
        self.data_dir.join(&self.files.aliases)
    }

    pub fn pinned_path(&self) -> PathBuf {
        self.data_dir.join(&self.files.pinned)
    }

    pub fn log_path(&self) -> PathBuf {
        self.data_dir.join(&self.files.log)
    }
}
