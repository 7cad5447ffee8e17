//! Configuration management

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;

use crate::errors::{AppError, AppResult};

/// Archive format used by the pack operation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackFormat {
    Zip,
    Tar,
}

impl PackFormat {
    /// File extension including the dot
    pub fn extension(&self) -> &'static str {
        match self {
            PackFormat::Zip => ".zip",
            PackFormat::Tar => ".tar",
        }
    }
}

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct Config {
    /// Server endpoints
    pub server: ServerConfig,
    /// Credentials for REST and the operator handshake
    pub auth: AuthConfig,
    /// Live operator link settings
    pub operator: OperatorConfig,
    /// Confirmation settings
    pub confirmations: ConfirmConfig,
    /// Pack settings
    pub pack: PackConfig,
    /// Terminal panel settings
    pub terminal: TerminalConfig,
    /// Display settings
    pub display: DisplayConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Base URL of the REST API (e.g., "http://localhost:8000")
    pub url: String,
    /// Address of the operator socket (host:port)
    pub operator_addr: String,
    /// Server tree is backed by an external storage provider.
    /// The operator cannot run operations there, so the link is never started.
    pub external_fs: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            url: "http://localhost:8000".to_string(),
            operator_addr: "localhost:8001".to_string(),
            external_fs: false,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct AuthConfig {
    /// Username for REST basic auth and the operator handshake
    pub username: String,
    /// Password (stored in plain text; protect the config file)
    pub password: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OperatorConfig {
    /// Use the live operator link for file operations when available
    pub enabled: bool,
    /// Seconds between reconnect attempts
    pub reconnect_secs: u64,
    /// Seconds to wait for an operation to complete over the link
    pub call_timeout_secs: u64,
}

impl Default for OperatorConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            reconnect_secs: 5,
            call_timeout_secs: 600,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConfirmConfig {
    /// Confirm before overwriting on copy
    pub copy: bool,
    /// Confirm before overwriting on move
    #[serde(rename = "move")]
    pub mv: bool,
    /// Confirm before delete
    pub delete: bool,
}

impl Default for ConfirmConfig {
    fn default() -> Self {
        Self {
            copy: true,
            mv: true,
            delete: true,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackConfig {
    /// Archive format: "zip" or "tar"
    pub format: String,
}

impl Default for PackConfig {
    fn default() -> Self {
        Self {
            format: "tar".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct TerminalConfig {
    /// Enable the terminal panel
    pub enabled: bool,
    /// Override shell executable (empty = $SHELL or /bin/sh)
    pub shell: String,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            enabled: true,
            shell: String::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplayConfig {
    /// Show hidden files (starting with .)
    pub show_hidden: bool,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self { show_hidden: true }
    }
}

/// Get the config directory path for the current platform
pub fn config_dir() -> Option<PathBuf> {
    #[cfg(target_os = "linux")]
    {
        // Linux: ~/.config/wharf (XDG_CONFIG_HOME honored)
        std::env::var("XDG_CONFIG_HOME")
            .ok()
            .map(PathBuf::from)
            .or_else(|| std::env::var("HOME").ok().map(|p| PathBuf::from(p).join(".config")))
            .map(|p| p.join("wharf"))
    }

    #[cfg(target_os = "macos")]
    {
        // macOS: ~/.config/wharf (consistent with other CLI tools)
        std::env::var("HOME")
            .ok()
            .map(|p| PathBuf::from(p).join(".config/wharf"))
    }

    #[cfg(target_os = "windows")]
    {
        // Windows: %APPDATA%\wharf
        std::env::var("APPDATA")
            .ok()
            .map(|p| PathBuf::from(p).join("wharf"))
    }

    #[cfg(not(any(target_os = "linux", target_os = "macos", target_os = "windows")))]
    {
        std::env::var("HOME").ok().map(|p| PathBuf::from(p).join(".config/wharf"))
    }
}

/// Get the config file path
pub fn config_file() -> Option<PathBuf> {
    config_dir().map(|p| p.join("config.toml"))
}

/// Get the log file path (used when WHARF_LOG is set)
pub fn log_file() -> Option<PathBuf> {
    config_dir().map(|p| p.join("wharf.log"))
}

/// Default config file content with comments
fn default_config() -> &'static str {
    r##"# wharf configuration
# This file is auto-generated. Edit as needed.

[server]
# Base URL of the REST API
url = "http://localhost:8000"

# Address of the operator socket used for live file operations
operator_addr = "localhost:8001"

# Set to true when the server tree is backed by an external storage
# provider; the operator link is never started in that case
external_fs = false

[auth]
# Credentials sent as HTTP basic auth and in the operator handshake
username = ""
password = ""

[operator]
# Run file operations over the live operator link when it is connected
# and authenticated; REST is used as the fallback either way
enabled = true

# Seconds between reconnect attempts when the link drops
reconnect_secs = 5

# Seconds to wait for a single operation to complete over the link
call_timeout_secs = 600

[confirmations]
# Ask before overwriting an existing entry on copy
copy = true

# Ask before overwriting an existing entry on move
move = true

# Ask before deleting files
delete = true

[pack]
# Archive format for the pack operation: "zip" or "tar"
format = "tar"

[terminal]
# Enable the terminal panel (Ctrl+O)
enabled = true

# Shell to use (leave empty for $SHELL or /bin/sh)
shell = ""

[display]
# Show hidden files (starting with .)
show_hidden = true
"##
}

impl Config {
    /// Load configuration from file, creating default if it doesn't exist
    pub fn load() -> Self {
        let Some(config_path) = config_file() else {
            eprintln!("Warning: Could not determine config directory");
            return Config::default();
        };

        // Create config directory if it doesn't exist
        if let Some(config_dir) = config_path.parent()
            && !config_dir.exists()
                && let Err(e) = fs::create_dir_all(config_dir) {
                    eprintln!("Warning: Could not create config directory: {}", e);
                    return Config::default();
                }

        // Create default config if it doesn't exist
        if !config_path.exists()
            && let Err(e) = fs::write(&config_path, default_config()) {
                eprintln!("Warning: Could not create config file: {}", e);
                return Config::default();
            }

        // Read and parse config
        match fs::read_to_string(&config_path) {
            Ok(content) => match toml_edit::de::from_str(&content) {
                Ok(config) => config,
                Err(e) => {
                    eprintln!("Warning: Could not parse config file: {}", e);
                    eprintln!("Using default configuration");
                    Config::default()
                }
            },
            Err(e) => {
                eprintln!("Warning: Could not read config file: {}", e);
                Config::default()
            }
        }
    }

    /// Validate settings that must fail fast rather than fall back.
    /// Call once at startup, before the TUI takes over the terminal.
    pub fn validate(&self) -> AppResult<()> {
        self.packer()?;
        if self.server.url.is_empty() {
            return Err(AppError::Config("server.url must not be empty".to_string()));
        }
        Ok(())
    }

    /// The configured pack format. An unknown format is a configuration
    /// error, not something to silently default away.
    pub fn packer(&self) -> AppResult<PackFormat> {
        match self.pack.format.as_str() {
            "zip" => Ok(PackFormat::Zip),
            "tar" => Ok(PackFormat::Tar),
            other => Err(AppError::Config(format!(
                "pack.format must be \"zip\" or \"tar\", got \"{}\"",
                other
            ))),
        }
    }

    /// Whether the operator link should be started at all
    pub fn operator_wanted(&self) -> bool {
        self.operator.enabled && !self.server.external_fs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_parses() {
        let config: Config = toml_edit::de::from_str(default_config()).unwrap();
        assert!(config.operator.enabled);
        assert!(config.confirmations.copy);
        assert!(config.confirmations.mv);
        assert_eq!(config.pack.format, "tar");
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_packer_zip() {
        let mut config = Config::default();
        config.pack.format = "zip".to_string();
        assert_eq!(config.packer().unwrap(), PackFormat::Zip);
        assert_eq!(config.packer().unwrap().extension(), ".zip");
    }

    #[test]
    fn test_packer_unknown_is_fatal() {
        let mut config = Config::default();
        config.pack.format = "rar".to_string();
        assert!(config.packer().is_err());
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_operator_gating() {
        let mut config = Config::default();
        assert!(config.operator_wanted());
        config.server.external_fs = true;
        assert!(!config.operator_wanted());
        config.server.external_fs = false;
        config.operator.enabled = false;
        assert!(!config.operator_wanted());
    }
}
