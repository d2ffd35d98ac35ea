//! XDG Base Directory Support
//!
//! Resolves where docmine looks for its config file and where it
//! mines to when no destination root is configured.

use std::env;
use std::path::PathBuf;

/// XDG directory structure for docmine
#[derive(Debug, Clone)]
pub struct XdgDirs {
    pub config_dir: PathBuf,
    pub data_dir: PathBuf,
}

impl XdgDirs {
    /// Resolve directories.
    ///
    /// Priority order (highest to lowest):
    /// 1. `DOCMINE_CONFIG_DIR` / `DOCMINE_DATA_DIR`
    /// 2. `XDG_CONFIG_HOME` / `XDG_DATA_HOME`
    /// 3. XDG defaults (~/.config, ~/.local/share)
    pub fn new() -> Self {
        Self {
            config_dir: Self::resolve("DOCMINE_CONFIG_DIR", "XDG_CONFIG_HOME", &[".config"]),
            data_dir: Self::resolve("DOCMINE_DATA_DIR", "XDG_DATA_HOME", &[".local", "share"]),
        }
    }

    fn resolve(own_var: &str, xdg_var: &str, default_parts: &[&str]) -> PathBuf {
        if let Ok(dir) = env::var(own_var) {
            return PathBuf::from(dir);
        }

        if let Ok(xdg) = env::var(xdg_var) {
            return PathBuf::from(xdg).join("docmine");
        }

        let mut path = dirs::home_dir().unwrap_or_else(|| PathBuf::from("."));
        for part in default_parts {
            path.push(part);
        }
        path.join("docmine")
    }

    /// Get config file path
    pub fn config_file(&self) -> PathBuf {
        self.config_dir.join("config.toml")
    }

    /// Default destination root for mined data
    pub fn default_data_root(&self) -> PathBuf {
        self.data_dir.clone()
    }

    /// Log the resolved XDG paths
    pub fn log_paths(&self) {
        tracing::debug!("XDG directories resolved:");
        tracing::debug!("  Config: {:?}", self.config_dir);
        tracing::debug!("  Data: {:?}", self.data_dir);
    }
}

impl Default for XdgDirs {
    fn default() -> Self {
        Self::new()
    }
}
