//! Config file handling

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::Deserialize;

use crate::context::Environment;
use crate::errors::BbgurlError;
use crate::output::JsonFormatterOptions;

/// Environment variable overriding the config directory
pub const CONFIG_DIR_ENV: &str = "BBGURL_CONFIG_DIR";

const CONFIG_FILE: &str = "config.toml";

/// `[format]` table
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct FormatConfig {
    /// Spaces per indentation level for `--pretty`
    pub indent: usize,
    pub sort_keys: bool,
}

impl Default for FormatConfig {
    fn default() -> Self {
        let json = JsonFormatterOptions::default();
        Self {
            indent: json.indent,
            sort_keys: json.sort_keys,
        }
    }
}

/// `[progress]` table
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct ProgressSection {
    /// Rate smoothing window in milliseconds
    pub smoothing_window_ms: Option<u64>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct DefaultsSection {
    options: Vec<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    defaults: DefaultsSection,
    format: FormatConfig,
    progress: ProgressSection,
}

/// bbgurl configuration
#[derive(Debug, Clone)]
pub struct Config {
    pub config_dir: PathBuf,
    /// Flags prepended to every command line
    pub default_options: Vec<String>,
    pub format: FormatConfig,
    pub progress: ProgressSection,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            config_dir: Self::default_config_dir(),
            default_options: Vec::new(),
            format: FormatConfig::default(),
            progress: ProgressSection::default(),
        }
    }
}

impl Config {
    /// Load configuration from the config file (TOML format)
    pub fn load(env: &Environment) -> Result<Self, BbgurlError> {
        let config_dir = env
            .config_dir
            .clone()
            .unwrap_or_else(Self::default_config_dir);
        Self::load_from(&config_dir)
    }

    /// Load `config.toml` from a specific directory
    ///
    /// A missing file is not an error.
    pub fn load_from(config_dir: &Path) -> Result<Self, BbgurlError> {
        let config_file = config_dir.join(CONFIG_FILE);

        if !config_file.exists() {
            return Ok(Self {
                config_dir: config_dir.to_path_buf(),
                ..Self::default()
            });
        }

        let content = std::fs::read_to_string(&config_file)
            .map_err(|e| BbgurlError::Config(format!("Failed to read config: {}", e)))?;

        let file: ConfigFile = toml::from_str(&content)
            .map_err(|e| BbgurlError::Config(format!("Invalid config TOML: {}", e)))?;

        Ok(Self {
            config_dir: config_dir.to_path_buf(),
            default_options: file.defaults.options,
            format: file.format,
            progress: file.progress,
        })
    }

    /// JSON formatting options for the pretty-print sink
    pub fn json_options(&self) -> JsonFormatterOptions {
        JsonFormatterOptions {
            indent: self.format.indent,
            sort_keys: self.format.sort_keys,
        }
    }

    /// Configured rate smoothing window, if any
    pub fn smoothing_window(&self) -> Option<Duration> {
        self.progress
            .smoothing_window_ms
            .filter(|ms| *ms > 0)
            .map(Duration::from_millis)
    }

    /// Get the default config directory
    fn default_config_dir() -> PathBuf {
        dirs::config_dir()
            .map(|p| p.join("bbgurl"))
            .unwrap_or_else(|| PathBuf::from(".bbgurl"))
    }
}
