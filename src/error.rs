//! Error types for thank-you-stars
//!
//! All modules use `StarsResult<T>` as their return type.

use chrono::{DateTime, Utc};
use std::path::PathBuf;
use thiserror::Error;

/// Process exit codes surfaced by the binary
pub mod exit_codes {
    pub const SUCCESS: u8 = 0;
    pub const FAILURE: u8 = 1;
    /// ENOENT: no resolvable package information
    pub const NOT_FOUND: u8 = 2;
    /// The target package is not installed locally
    pub const PACKAGE_NOT_INSTALLED: u8 = 3;
    /// EINVAL: bad depth, missing credentials, invalid config
    pub const INVALID_ARGUMENT: u8 = 22;
}

/// Result type alias for thank-you-stars operations
pub type StarsResult<T> = Result<T, StarsError>;

/// All errors that can occur in thank-you-stars
#[derive(Error, Debug)]
pub enum StarsError {
    // Configuration errors
    #[error("max depth must be greater than or equal to zero, got {0}")]
    InvalidDepth(i64),

    #[error("GitHub personal access token not found")]
    TokenMissing,

    #[error("Invalid configuration at {path}: {reason}")]
    ConfigInvalid { path: PathBuf, reason: String },

    #[error("Invalid configuration value {key}: {reason}")]
    ConfigValue { key: &'static str, reason: String },

    #[error("Failed to create config directory {path}: {source}")]
    ConfigDirCreate {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // Local package errors
    #[error("failed to fetch '{name}' package info: require an installed PyPI package name")]
    PackageNotInstalled { name: String },

    #[error("No Python package found at {0}")]
    NoPackageFound(PathBuf),

    #[error("starred information not found")]
    NoStarredInfo,

    #[error("Invalid resolution result: {0}")]
    InvalidResolution(String),

    // GitHub errors
    #[error("GitHub API rate limit exceeded{}", reset_suffix(.reset))]
    RateLimited { reset: Option<DateTime<Utc>> },

    #[error("GitHub repository not found: {0}")]
    RepositoryNotFound(String),

    #[error("GitHub rejected the personal access token")]
    Unauthorized,

    #[error("GitHub API error ({status}) for {endpoint}: {message}")]
    GithubApi {
        endpoint: String,
        status: u16,
        message: String,
    },

    // Registry errors
    #[error("PyPI request failed for {package}: {reason}")]
    Registry { package: String, reason: String },

    #[error("HTTP error: {0}")]
    Http(#[from] ureq::Error),

    // IO errors
    #[error("IO error: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },

    // Process errors
    #[error("Command failed: {command}")]
    CommandFailed {
        command: String,
        #[source]
        source: std::io::Error,
    },

    // Serialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("TOML serialize error: {0}")]
    TomlSerialize(#[from] toml::ser::Error),

    // General errors
    #[error("{0}")]
    User(String),
}

fn reset_suffix(reset: &Option<DateTime<Utc>>) -> String {
    match reset {
        Some(at) => format!(" (resets at {})", at.format("%Y-%m-%d %H:%M:%S UTC")),
        None => String::new(),
    }
}

impl StarsError {
    /// Create an IO error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Create a command failed error
    pub fn command_failed(command: impl Into<String>, source: std::io::Error) -> Self {
        Self::CommandFailed {
            command: command.into(),
            source,
        }
    }

    /// Whether the GitHub API refused the call because the quota is spent
    pub fn is_rate_limited(&self) -> bool {
        matches!(self, Self::RateLimited { .. })
    }

    /// Fatal errors end the run; everything else degrades a single package.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::InvalidDepth(_)
                | Self::TokenMissing
                | Self::ConfigInvalid { .. }
                | Self::ConfigValue { .. }
                | Self::ConfigDirCreate { .. }
                | Self::PackageNotInstalled { .. }
                | Self::NoPackageFound(_)
                | Self::Unauthorized
                | Self::Io { .. }
                | Self::CommandFailed { .. }
        )
    }

    /// Exit code reported by the binary for this error
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::InvalidDepth(_)
            | Self::TokenMissing
            | Self::ConfigInvalid { .. }
            | Self::ConfigValue { .. }
            | Self::TomlParse(_) => exit_codes::INVALID_ARGUMENT,
            Self::NoPackageFound(_) | Self::NoStarredInfo => exit_codes::NOT_FOUND,
            Self::PackageNotInstalled { .. } => exit_codes::PACKAGE_NOT_INSTALLED,
            _ => exit_codes::FAILURE,
        }
    }

    /// Get actionable hint for the error
    pub fn hint(&self) -> Option<&'static str> {
        match self {
            Self::TokenMissing => Some(
                "Pass --token TOKEN, run with --setup, or set GITHUB_TOKEN (public_repo scope)",
            ),
            Self::Unauthorized => Some("Check the token, or store a new one with --setup"),
            Self::PackageNotInstalled { .. } => {
                Some("Install the package first, e.g.: pip install <package>")
            }
            Self::NoPackageFound(_) => {
                Some("Pass a package name, or run inside a directory with pyproject.toml or setup.py")
            }
            Self::CommandFailed { .. } => Some("Make sure pip is installed and on PATH"),
            Self::RateLimited { .. } => Some("Wait for the rate limit to reset and run again"),
            _ => None,
        }
    }
}
