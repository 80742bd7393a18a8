//! Time-boxed, multi-namespace file cache
//!
//! Every lookup against pip, PyPI and GitHub goes through here so repeated
//! runs do not burn the GitHub rate limit.
//!
//! # Layout
//!
//! ```text
//! <cache root>/<github login>/<namespace>/<scope segments...>/<purpose>
//! ```
//!
//! | Namespace | Dir | Contents |
//! |-----------|-----|----------|
//! | Dependency | `pip` | raw `pip show` output |
//! | Registry | `pypi` | PyPI info, resolution results, package negative entries |
//! | Repository | `github` | search results, contributors, code search hits, starred list |
//!
//! Inside `github`, per-repository entries sit under `<owner>/<repo>/`; search
//! results, organization e-mails and starred lists sit under `_search/`,
//! `_orgs/` and `_users/` respectively.
//!
//! An entry is live while `now - mtime < lifetime`. Turning the cache off
//! shortens the lifetime instead of bypassing the store, so the same code
//! path runs and the files stay on disk for inspection.

pub mod key;
pub mod store;

pub use key::CacheKey;
pub use store::CacheStore;

use std::fmt;
use std::path::Path;
use std::time::Duration;

/// The independent cache partitions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CacheNamespace {
    /// Local package manager output
    Dependency,
    /// Package registry metadata
    Registry,
    /// Source hosting data
    Repository,
}

impl CacheNamespace {
    /// Directory name below the per-user cache root
    pub fn dir_name(&self) -> &'static str {
        match self {
            Self::Dependency => "pip",
            Self::Registry => "pypi",
            Self::Repository => "github",
        }
    }

    /// Entry lifetime for this namespace under `policy`
    pub fn lifetime(&self, policy: &CachePolicy) -> Duration {
        match self {
            // pip output only changes when the local environment does
            Self::Dependency => policy.lifetime,
            Self::Registry | Self::Repository if policy.enabled => policy.lifetime,
            Self::Registry | Self::Repository => policy.disabled_lifetime,
        }
    }

    pub fn all() -> &'static [Self] {
        &[Self::Dependency, Self::Registry, Self::Repository]
    }
}

impl fmt::Display for CacheNamespace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Dependency => "pip",
            Self::Registry => "PyPI",
            Self::Repository => "GitHub",
        };
        write!(f, "{}", name)
    }
}

/// Lifetimes chosen once per run
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CachePolicy {
    pub enabled: bool,
    pub lifetime: Duration,
    pub disabled_lifetime: Duration,
}

impl CachePolicy {
    pub const DEFAULT_LIFETIME: Duration = Duration::from_secs(14 * 24 * 3600);
    pub const DISABLED_LIFETIME: Duration = Duration::from_secs(10);

    /// Policy from the config's day/second settings
    pub fn new(enabled: bool, lifetime_days: u64, disabled_lifetime_secs: u64) -> Self {
        Self {
            enabled,
            lifetime: Duration::from_secs(lifetime_days.saturating_mul(24 * 3600)),
            disabled_lifetime: Duration::from_secs(disabled_lifetime_secs),
        }
    }
}

impl Default for CachePolicy {
    fn default() -> Self {
        Self {
            enabled: true,
            lifetime: Self::DEFAULT_LIFETIME,
            disabled_lifetime: Self::DISABLED_LIFETIME,
        }
    }
}

/// One store per namespace for a single acting user
#[derive(Debug, Clone)]
pub struct CacheSet {
    dependency: CacheStore,
    registry: CacheStore,
    repository: CacheStore,
}

impl CacheSet {
    pub fn open(base: &Path, user: &str, policy: &CachePolicy) -> Self {
        let store = |ns: CacheNamespace| CacheStore::new(base, user, ns, ns.lifetime(policy));
        Self {
            dependency: store(CacheNamespace::Dependency),
            registry: store(CacheNamespace::Registry),
            repository: store(CacheNamespace::Repository),
        }
    }

    pub fn get(&self, namespace: CacheNamespace) -> &CacheStore {
        match namespace {
            CacheNamespace::Dependency => &self.dependency,
            CacheNamespace::Registry => &self.registry,
            CacheNamespace::Repository => &self.repository,
        }
    }

    pub fn dependency(&self) -> &CacheStore {
        &self.dependency
    }

    pub fn registry(&self) -> &CacheStore {
        &self.registry
    }

    pub fn repository(&self) -> &CacheStore {
        &self.repository
    }
}
