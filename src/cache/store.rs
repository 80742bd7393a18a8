//! File-backed cache store with modification-time expiry

use super::key::{sanitize_segment, CacheKey};
use super::CacheNamespace;
use crate::error::{StarsError, StarsResult};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, warn};

fn hours(duration: Duration) -> f64 {
    duration.as_secs_f64() / 3600.0
}

/// One namespace of the cache, rooted at `<base>/<user>/<namespace>`
#[derive(Debug, Clone)]
pub struct CacheStore {
    namespace: CacheNamespace,
    root: PathBuf,
    lifetime: Duration,
}

impl CacheStore {
    /// Open the store for `namespace` of `user` below `base`
    pub fn new(base: &Path, user: &str, namespace: CacheNamespace, lifetime: Duration) -> Self {
        Self {
            namespace,
            root: base
                .join(sanitize_segment(&user.to_lowercase()))
                .join(namespace.dir_name()),
            lifetime,
        }
    }

    pub fn namespace(&self) -> CacheNamespace {
        self.namespace
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn lifetime(&self) -> Duration {
        self.lifetime
    }

    /// Path of the file backing `key`
    pub fn path(&self, key: &CacheKey) -> PathBuf {
        self.root.join(key.relative_path())
    }

    /// Whether an entry exists and was written less than one lifetime ago.
    pub fn available(&self, key: &CacheKey) -> bool {
        let path = self.path(key);

        let modified = match fs::metadata(&path) {
            Ok(meta) if meta.is_file() => match meta.modified() {
                Ok(modified) => modified,
                Err(_) => return false,
            },
            _ => {
                debug!("cache not found: {}", path.display());
                return false;
            }
        };

        let modified: DateTime<Utc> = modified.into();
        let Ok(elapsed) = Utc::now().signed_duration_since(modified).to_std() else {
            // mtime in the future
            debug!("cache has a future timestamp: {}", path.display());
            return false;
        };

        let detail = format!(
            "path={}, lifetime={:.1}h, elapsed={:.1}h",
            path.display(),
            hours(self.lifetime),
            hours(elapsed)
        );

        if elapsed < self.lifetime {
            debug!("cache available: {}", detail);
            true
        } else {
            debug!("cache expired: {}", detail);
            false
        }
    }

    /// Read a live entry as text
    pub fn read(&self, key: &CacheKey) -> Option<String> {
        if !self.available(key) {
            return None;
        }

        let path = self.path(key);
        match fs::read_to_string(&path) {
            Ok(content) => Some(content),
            Err(e) => {
                warn!("failed to read cache file '{}': {}", path.display(), e);
                None
            }
        }
    }

    /// Read a live entry as JSON; a truncated or malformed payload is a miss
    pub fn read_json<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let content = self.read(key)?;

        match serde_json::from_str(&content) {
            Ok(value) => Some(value),
            Err(e) => {
                warn!(
                    "failed to load cache file '{}': {}",
                    self.path(key).display(),
                    e
                );
                None
            }
        }
    }

    /// Write (or overwrite) an entry
    pub fn write(&self, key: &CacheKey, payload: &str) -> StarsResult<()> {
        let path = self.path(key);

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                StarsError::io(format!("creating cache directory {}", parent.display()), e)
            })?;
        }

        fs::write(&path, payload)
            .map_err(|e| StarsError::io(format!("writing cache file {}", path.display()), e))?;

        debug!("write {} cache: {}", self.namespace, path.display());
        Ok(())
    }

    /// Write an entry as pretty-printed JSON
    pub fn write_json<T: Serialize>(&self, key: &CacheKey, value: &T) -> StarsResult<()> {
        let content = serde_json::to_string_pretty(value)?;
        self.write(key, &content)
    }

    /// Record a marker entry with no payload (used for negative caches)
    pub fn touch(&self, key: &CacheKey) -> StarsResult<()> {
        self.write(key, "")
    }

    /// Remove an entry; removing a missing entry is not an error
    pub fn invalidate(&self, key: &CacheKey) -> StarsResult<()> {
        let path = self.path(key);
        debug!("remove cache: {}", path.display());

        match fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StarsError::io(
                format!("removing cache file {}", path.display()),
                e,
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::SystemTime;
    use tempfile::TempDir;

    const TWO_WEEKS: Duration = Duration::from_secs(14 * 24 * 3600);

    fn store(temp: &TempDir, lifetime: Duration) -> CacheStore {
        CacheStore::new(temp.path(), "Octocat", CacheNamespace::Registry, lifetime)
    }

    fn set_mtime(path: &Path, time: SystemTime) {
        let file = fs::File::options().write(true).open(path).unwrap();
        file.set_modified(time).unwrap();
    }

    #[test]
    fn root_is_partitioned_by_user_and_namespace() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp, TWO_WEEKS);
        assert_eq!(store.root(), temp.path().join("octocat").join("pypi"));
    }

    #[test]
    fn write_then_read() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp, TWO_WEEKS);
        let key = CacheKey::package("Requests", "show");

        assert!(!store.available(&key));
        store.write(&key, "Name: requests").unwrap();

        assert!(store.available(&key));
        assert_eq!(store.read(&key).as_deref(), Some("Name: requests"));
    }

    #[test]
    fn zero_lifetime_always_misses_but_still_writes() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp, Duration::ZERO);
        let key = CacheKey::package("requests", "show");

        store.write(&key, "payload").unwrap();
        assert!(store.path(&key).is_file());
        assert!(!store.available(&key));
        assert!(store.read(&key).is_none());
    }

    #[test]
    fn expired_entries_are_unavailable() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp, TWO_WEEKS);
        let key = CacheKey::package("requests", "show");
        store.write(&key, "payload").unwrap();

        set_mtime(
            &store.path(&key),
            SystemTime::now() - Duration::from_secs(15 * 24 * 3600),
        );
        assert!(!store.available(&key));

        set_mtime(
            &store.path(&key),
            SystemTime::now() - Duration::from_secs(13 * 24 * 3600),
        );
        assert!(store.available(&key));
    }

    #[test]
    fn future_mtime_is_unavailable() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp, TWO_WEEKS);
        let key = CacheKey::package("requests", "show");
        store.write(&key, "payload").unwrap();

        set_mtime(&store.path(&key), SystemTime::now() + Duration::from_secs(3600));
        assert!(!store.available(&key));
    }

    #[test]
    fn malformed_json_is_a_miss() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp, TWO_WEEKS);
        let key = CacheKey::package("requests", "registry-info");

        store.write(&key, "{\"description\": \"trunc").unwrap();
        let value: Option<serde_json::Value> = store.read_json(&key);
        assert!(value.is_none());
    }

    #[test]
    fn json_roundtrip() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp, TWO_WEEKS);
        let key = CacheKey::scoped("acme/widget", "contributors");

        store.write_json(&key, &vec!["a", "b"]).unwrap();
        let value: Vec<String> = store.read_json(&key).unwrap();
        assert_eq!(value, vec!["a", "b"]);
    }

    #[test]
    fn reserved_entries_coexist_with_same_named_repositories() {
        let temp = TempDir::new().unwrap();
        let store = CacheStore::new(
            temp.path(),
            "octocat",
            CacheNamespace::Repository,
            TWO_WEEKS,
        );

        // Package "acme" search results next to a repository acme/search
        let search = CacheKey::reserved("search", "acme", "search");
        let negative = CacheKey::scoped("acme/search", "negative");
        let starred = CacheKey::reserved("users", "octocat", "starred");
        let repo = CacheKey::scoped("octocat/starred", "contributors");

        store.write(&search, "[]").unwrap();
        store.touch(&negative).unwrap();
        store.write(&starred, "acme/widget").unwrap();
        store.write_json(&repo, &Vec::<String>::new()).unwrap();

        assert!(store.available(&search));
        assert!(store.available(&negative));
        assert!(store.available(&starred));
        assert!(store.available(&repo));
    }

    #[test]
    fn touch_and_invalidate() {
        let temp = TempDir::new().unwrap();
        let store = store(&temp, TWO_WEEKS);
        let key = CacheKey::package("requests", "negative");

        store.touch(&key).unwrap();
        assert!(store.available(&key));
        assert_eq!(store.read(&key).as_deref(), Some(""));

        store.invalidate(&key).unwrap();
        assert!(!store.available(&key));

        // Invalidating twice is fine
        store.invalidate(&key).unwrap();
    }
}
