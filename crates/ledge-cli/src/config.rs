//! CLI configuration
//!
//! Where to find the sync server and who to log in as. Saved by
//! `ledge login`, read by every command that touches the network. The
//! password is never stored; it comes from the LEDGE_PASSWORD
//! environment variable at call time.

use std::fs;
use std::path::PathBuf;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// Environment variable holding the sync server password
pub const PASSWORD_ENV: &str = "LEDGE_PASSWORD";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    pub server_url: String,
    pub email: String,
}

impl Config {
    /// Build a config, normalizing the server URL (no trailing slash).
    pub fn new(server_url: &str, email: &str) -> Self {
        Self {
            server_url: server_url.trim_end_matches('/').to_string(),
            email: email.to_string(),
        }
    }

    /// Path of the config file (~/.config/ledge/config.toml on Linux).
    pub fn path() -> Result<PathBuf> {
        let dir = dirs::config_dir().context("Could not determine the platform config directory")?;
        Ok(dir.join("ledge").join("config.toml"))
    }

    /// Load the saved config, or explain how to create one.
    pub fn load() -> Result<Self> {
        let path = Self::path()?;
        let raw = fs::read_to_string(&path)
            .with_context(|| format!("Not logged in ({} missing). Run 'ledge login' first.", path.display()))?;
        let config = toml::from_str(&raw)
            .with_context(|| format!("Malformed config at {}", path.display()))?;
        Ok(config)
    }

    /// Persist the config for later commands.
    pub fn save(&self) -> Result<()> {
        let path = Self::path()?;
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("Failed to create {}", parent.display()))?;
        }
        let raw = toml::to_string_pretty(self).context("Failed to serialize config")?;
        fs::write(&path, raw).with_context(|| format!("Failed to write {}", path.display()))?;
        Ok(())
    }

    /// Read the password from the environment.
    pub fn password() -> Result<String> {
        std::env::var(PASSWORD_ENV)
            .with_context(|| format!("Set {} with your server password", PASSWORD_ENV))
    }
}
