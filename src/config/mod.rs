//! Configuration management for thank-you-stars

pub mod schema;

pub use schema::Config;

use crate::error::{StarsError, StarsResult};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Environment variable consulted after the CLI and the config file
pub const TOKEN_ENV: &str = "GITHUB_TOKEN";

/// Configuration manager
pub struct ConfigManager {
    config_path: PathBuf,
}

impl ConfigManager {
    /// Create a new config manager with default path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
        }
    }

    /// Create a config manager with a custom path
    pub fn with_path(path: PathBuf) -> Self {
        Self { config_path: path }
    }

    /// Get the default config file path
    pub fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("thank-you-stars")
            .join("config.toml")
    }

    /// Get the default cache root
    pub fn default_cache_dir() -> PathBuf {
        dirs::cache_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("thank-you-stars")
    }

    /// Load configuration, using defaults if the file does not exist
    pub fn load(&self) -> StarsResult<Config> {
        if !self.config_path.exists() {
            debug!("Config file {} not found, using defaults", self.config_path.display());
            return Ok(Config::default());
        }

        self.load_from_file(&self.config_path)
    }

    /// Load configuration from a specific file
    pub fn load_from_file(&self, path: &Path) -> StarsResult<Config> {
        let content = fs::read_to_string(path)
            .map_err(|e| StarsError::io(format!("reading config from {}", path.display()), e))?;

        let config: Config = toml::from_str(&content).map_err(|e| StarsError::ConfigInvalid {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate().map_err(|reason| StarsError::ConfigInvalid {
            path: path.to_path_buf(),
            reason,
        })?;

        Ok(config)
    }

    /// Save configuration to file
    pub fn save(&self, config: &Config) -> StarsResult<()> {
        self.ensure_config_dir()?;

        let content = toml::to_string_pretty(config)?;
        fs::write(&self.config_path, content).map_err(|e| {
            StarsError::io(
                format!("writing config to {}", self.config_path.display()),
                e,
            )
        })?;

        // The file may carry a token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let perms = fs::Permissions::from_mode(0o600);
            fs::set_permissions(&self.config_path, perms)
                .map_err(|e| StarsError::io("setting config file permissions", e))?;
        }

        info!("Configuration saved to {}", self.config_path.display());
        Ok(())
    }

    /// Ensure the config directory exists
    fn ensure_config_dir(&self) -> StarsResult<()> {
        if let Some(parent) = self.config_path.parent() {
            fs::create_dir_all(parent).map_err(|e| StarsError::ConfigDirCreate {
                path: parent.to_path_buf(),
                source: e,
            })?;
        }
        Ok(())
    }

    /// Get the config file path
    pub fn path(&self) -> &Path {
        &self.config_path
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}

/// Pick the GitHub token: explicit flag, then config file, then environment.
pub fn resolve_token(explicit: Option<&str>, config: &Config) -> StarsResult<String> {
    if let Some(token) = explicit.map(str::trim).filter(|t| !t.is_empty()) {
        return Ok(token.to_string());
    }

    if let Some(token) = config.github.token() {
        debug!("Using GitHub token from the config file");
        return Ok(token.to_string());
    }

    match std::env::var(TOKEN_ENV) {
        Ok(token) if !token.trim().is_empty() => {
            debug!("Using GitHub token from {}", TOKEN_ENV);
            Ok(token.trim().to_string())
        }
        _ => {
            debug!("{} not defined", TOKEN_ENV);
            Err(StarsError::TokenMissing)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serial_test::serial;
    use tempfile::TempDir;

    #[test]
    fn load_default_when_missing() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nonexistent.toml");
        let manager = ConfigManager::with_path(path);

        let config = manager.load().unwrap();
        assert_eq!(config.registry.url, "https://pypi.org/pypi");
    }

    #[test]
    fn save_and_load_roundtrip() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("nested").join("config.toml");
        let manager = ConfigManager::with_path(path);

        let mut config = Config::default();
        config.github.token = Some("ghp_saved".to_string());

        manager.save(&config).unwrap();
        let loaded = manager.load().unwrap();

        assert_eq!(loaded.github.token(), Some("ghp_saved"));
    }

    #[cfg(unix)]
    #[test]
    fn saved_config_is_private() {
        use std::os::unix::fs::PermissionsExt;

        let temp = TempDir::new().unwrap();
        let manager = ConfigManager::with_path(temp.path().join("config.toml"));
        manager.save(&Config::default()).unwrap();

        let mode = fs::metadata(manager.path()).unwrap().permissions().mode();
        assert_eq!(mode & 0o777, 0o600);
    }

    #[test]
    fn invalid_config_reports_path() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[github\ntoken = 1").unwrap();

        let err = ConfigManager::with_path(path.clone()).load().unwrap_err();
        assert!(matches!(err, StarsError::ConfigInvalid { path: p, .. } if p == path));
    }

    #[test]
    fn empty_show_command_is_rejected_on_load() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        fs::write(&path, "[package]\nshow_command = []\n").unwrap();

        let err = ConfigManager::with_path(path).load().unwrap_err();
        assert!(matches!(err, StarsError::ConfigInvalid { ref reason, .. } if reason.contains("show_command")));
        assert_eq!(err.exit_code(), 22);
    }

    #[test]
    #[serial]
    fn token_precedence() {
        std::env::set_var(TOKEN_ENV, "from-env");

        let mut config = Config::default();
        config.github.token = Some("from-config".to_string());

        assert_eq!(resolve_token(Some("from-cli"), &config).unwrap(), "from-cli");
        assert_eq!(resolve_token(None, &config).unwrap(), "from-config");

        config.github.token = None;
        assert_eq!(resolve_token(None, &config).unwrap(), "from-env");

        std::env::remove_var(TOKEN_ENV);
    }

    #[test]
    #[serial]
    fn missing_token_is_error() {
        std::env::remove_var(TOKEN_ENV);
        let err = resolve_token(Some("  "), &Config::default()).unwrap_err();
        assert!(matches!(err, StarsError::TokenMissing));
    }
}
