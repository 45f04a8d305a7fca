//! Tool configuration, persisted as TOML in `$XDG_CONFIG_HOME/worklog/`.
//!
//! Every field has a default, so a missing config file is not an error and a
//! partial file only overrides what it names. The note core never reads this
//! directly; `main` resolves a [`Config`] once and passes the values down.

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors from loading or writing the config file.
#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("cannot determine home directory")]
    #[diagnostic(
        code(worklog::config::no_home),
        help("Set the HOME environment variable or ensure a valid user profile exists.")
    )]
    NoHome,

    #[error("failed to read config: {path}")]
    #[diagnostic(
        code(worklog::config::read),
        help("Ensure the config file exists and is readable.")
    )]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config: {path}")]
    #[diagnostic(
        code(worklog::config::parse),
        help("Check the TOML syntax in the config file.")
    )]
    Parse { path: String, message: String },

    #[error("failed to write config: {path}")]
    #[diagnostic(
        code(worklog::config::write),
        help("Ensure you have write permissions to the config directory.")
    )]
    Write {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

pub type ConfigResult<T> = std::result::Result<T, ConfigError>;

/// Worklog configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Directory holding the work notes. A leading `~/` expands to `$HOME`.
    #[serde(default = "default_notes_dir")]
    pub notes_dir: String,
    /// Default workplace name.
    #[serde(default = "default_workplace")]
    pub workplace: String,
    /// All configured workplaces. Normalized on load: an empty list becomes
    /// just the default workplace.
    #[serde(default)]
    pub workplaces: Vec<String>,
    /// Base URL of the OpenCode server used for AI summaries.
    #[serde(default = "default_server")]
    pub opencode_server: String,
    /// Provider id sent with summary requests.
    #[serde(default = "default_ai_provider")]
    pub ai_provider: String,
    /// Model id sent with summary requests.
    #[serde(default = "default_ai_model")]
    pub ai_model: String,
}

fn default_notes_dir() -> String {
    "~/Documents/obsidian-notes/Inbox/work".into()
}
fn default_workplace() -> String {
    "Work".into()
}
fn default_server() -> String {
    "http://127.0.0.1:4096".into()
}
fn default_ai_provider() -> String {
    "google".into()
}
fn default_ai_model() -> String {
    "gemini-2.0-flash".into()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            notes_dir: default_notes_dir(),
            workplace: default_workplace(),
            workplaces: Vec::new(),
            opencode_server: default_server(),
            ai_provider: default_ai_provider(),
            ai_model: default_ai_model(),
        }
        .normalized()
    }
}

impl Config {
    /// Path of the config file: `$XDG_CONFIG_HOME/worklog/config.toml`,
    /// falling back to `~/.config/worklog/config.toml`.
    pub fn config_file() -> ConfigResult<PathBuf> {
        let config_home = match std::env::var("XDG_CONFIG_HOME") {
            Ok(dir) => PathBuf::from(dir),
            Err(_) => {
                let home = std::env::var("HOME")
                    .map(PathBuf::from)
                    .map_err(|_| ConfigError::NoHome)?;
                home.join(".config")
            }
        };
        Ok(config_home.join("worklog").join("config.toml"))
    }

    /// Load the config file if it exists, defaults otherwise.
    pub fn load_or_default() -> ConfigResult<Self> {
        let path = Self::config_file()?;
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load from a TOML file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::Read {
            path: path.display().to_string(),
            source: e,
        })?;
        let config: Config = toml::from_str(&content).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        Ok(config.normalized())
    }

    /// Save to a TOML file, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> ConfigResult<()> {
        let content = toml::to_string_pretty(self).map_err(|e| ConfigError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })?;
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(|e| ConfigError::Write {
                path: parent.display().to_string(),
                source: e,
            })?;
        }
        std::fs::write(path, content).map_err(|e| ConfigError::Write {
            path: path.display().to_string(),
            source: e,
        })
    }

    /// The notes directory as a concrete path, with `~/` expanded.
    pub fn notes_path(&self) -> ConfigResult<PathBuf> {
        if let Some(rest) = self.notes_dir.strip_prefix("~/") {
            let home = std::env::var("HOME")
                .map(PathBuf::from)
                .map_err(|_| ConfigError::NoHome)?;
            Ok(home.join(rest))
        } else {
            Ok(PathBuf::from(&self.notes_dir))
        }
    }

    fn normalized(mut self) -> Self {
        self.workplaces.retain(|w| !w.trim().is_empty());
        if self.workplaces.is_empty() {
            self.workplaces = vec![self.workplace.clone()];
        }
        self
    }
}
