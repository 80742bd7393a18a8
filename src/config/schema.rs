//! Configuration schema for thank-you-stars
//!
//! Configuration is stored at `~/.config/thank-you-stars/config.toml`

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Root configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// General settings
    pub general: GeneralConfig,

    /// GitHub API settings
    pub github: GithubConfig,

    /// PyPI registry settings
    pub registry: RegistryConfig,

    /// Local cache settings
    pub cache: CacheConfig,

    /// Local package manager settings
    pub package: PackageConfig,
}

impl Config {
    /// Reject values that parse but cannot work
    pub fn validate(&self) -> Result<(), String> {
        let program = self.package.show_command.first();
        if program.map_or(true, |program| program.trim().is_empty()) {
            return Err("package.show_command must not be empty".to_string());
        }
        Ok(())
    }
}

/// General application settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneralConfig {
    /// Log format: "text" or "json"
    pub log_format: String,
}

impl Default for GeneralConfig {
    fn default() -> Self {
        Self {
            log_format: "text".to_string(),
        }
    }
}

/// GitHub settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GithubConfig {
    /// Personal access token with public_repo scope
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,

    /// REST API base URL (for GitHub Enterprise)
    pub api_url: String,

    /// Upper bound on pages fetched when listing starred repositories
    pub max_starred_pages: u32,

    /// Contributors whose display names are looked up per candidate repository
    pub max_contributors: usize,
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            token: None,
            api_url: "https://api.github.com".to_string(),
            max_starred_pages: 100,
            max_contributors: 30,
        }
    }
}

impl GithubConfig {
    /// Token from the config file, ignoring blank values
    pub fn token(&self) -> Option<&str> {
        self.token
            .as_deref()
            .map(str::trim)
            .filter(|t| !t.is_empty())
    }
}

/// PyPI registry settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RegistryConfig {
    /// JSON API base URL
    pub url: String,

    /// Give up retrying transient failures after this many seconds
    pub max_retry_secs: u64,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            url: "https://pypi.org/pypi".to_string(),
            max_retry_secs: 30,
        }
    }
}

/// Cache settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CacheConfig {
    /// Cache root (defaults to the platform cache dir)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,

    /// Lifetime of cache entries in days
    pub lifetime_days: u64,

    /// Lifetime used for network-backed caches when --no-cache is given
    pub disabled_lifetime_secs: u64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            dir: None,
            lifetime_days: 14,
            disabled_lifetime_secs: 10,
        }
    }
}

/// Local package manager settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct PackageConfig {
    /// Command used to describe an installed package; the package name is appended
    pub show_command: Vec<String>,
}

impl Default for PackageConfig {
    fn default() -> Self {
        Self {
            show_command: vec!["pip".to_string(), "show".to_string()],
        }
    }
}
