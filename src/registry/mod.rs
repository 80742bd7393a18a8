//! Package registry metadata (PyPI JSON API)

pub mod pypi;

pub use pypi::PypiClient;

use crate::cache::{CacheKey, CacheStore};
use crate::error::StarsResult;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, warn};

/// Cache purpose for the raw registry `info` object
pub const REGISTRY_INFO_PURPOSE: &str = "registry-info";

/// Registry metadata endpoint
pub trait RegistryApi {
    /// The project's `info` object, or `None` when the registry has no such project
    fn project_info(&self, name: &str) -> StarsResult<Option<Value>>;
}

/// The registry fields used for repository attribution
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RegistryInfo {
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub author_email: Option<String>,
}

impl RegistryInfo {
    pub fn from_value(info: Value) -> Self {
        serde_json::from_value(info).unwrap_or_else(|e| {
            warn!("unexpected registry info shape: {}", e);
            Self::default()
        })
    }

    pub fn description(&self) -> &str {
        self.description.as_deref().unwrap_or_default()
    }

    /// Author email, ignoring blanks
    pub fn author_email(&self) -> Option<&str> {
        self.author_email
            .as_deref()
            .map(str::trim)
            .filter(|email| !email.is_empty())
    }
}

/// Reads registry info through the registry cache
pub struct RegistryFetcher<'a> {
    store: &'a CacheStore,
    api: &'a dyn RegistryApi,
}

impl<'a> RegistryFetcher<'a> {
    pub fn new(store: &'a CacheStore, api: &'a dyn RegistryApi) -> Self {
        Self { store, api }
    }

    pub fn fetch(&self, name: &str) -> StarsResult<Option<RegistryInfo>> {
        let key = CacheKey::package(name, REGISTRY_INFO_PURPOSE);

        if let Some(info) = self.store.read_json::<Value>(&key) {
            debug!("load PyPI info cache: {}", self.store.path(&key).display());
            return Ok(Some(RegistryInfo::from_value(info)));
        }

        let Some(info) = self.api.project_info(name)? else {
            debug!("no PyPI info for {}", name);
            return Ok(None);
        };

        self.store.write_json(&key, &info)?;
        Ok(Some(RegistryInfo::from_value(info)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cache::CacheNamespace;
    use crate::test_support::FakeRegistry;
    use serde_json::json;
    use std::time::Duration;
    use tempfile::TempDir;

    fn store(temp: &TempDir) -> CacheStore {
        CacheStore::new(
            temp.path(),
            "octocat",
            CacheNamespace::Registry,
            Duration::from_secs(3600),
        )
    }

    #[test]
    fn info_fields_tolerate_nulls() {
        let info = RegistryInfo::from_value(json!({
            "description": null,
            "author_email": "  ",
            "version": "1.0"
        }));
        assert_eq!(info.description(), "");
        assert_eq!(info.author_email(), None);
    }

    #[test]
    fn fetch_is_cache_first() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        let api = FakeRegistry::new().with(
            "foo",
            json!({"description": "see https://github.com/foo/foo", "author_email": "a@foo.io"}),
        );
        let fetcher = RegistryFetcher::new(&store, &api);

        let first = fetcher.fetch("foo").unwrap().unwrap();
        let second = fetcher.fetch("FOO").unwrap().unwrap();

        assert_eq!(first, second);
        assert_eq!(first.author_email(), Some("a@foo.io"));
        assert_eq!(api.calls(), 1);
    }

    #[test]
    fn malformed_cache_refetches() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        store
            .write(&CacheKey::package("foo", REGISTRY_INFO_PURPOSE), "{\"desc")
            .unwrap();

        let api = FakeRegistry::new().with("foo", json!({"description": "ok"}));
        let info = RegistryFetcher::new(&store, &api).fetch("foo").unwrap().unwrap();

        assert_eq!(info.description(), "ok");
        assert_eq!(api.calls(), 1);
    }

    #[test]
    fn unknown_project_is_none() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp);
        let api = FakeRegistry::new();

        assert!(RegistryFetcher::new(&store, &api).fetch("nope").unwrap().is_none());
    }
}
