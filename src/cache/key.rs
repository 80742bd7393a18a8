//! Cache keys and path-segment sanitization

use sha2::{Digest, Sha256};
use std::path::PathBuf;

/// Longest segment kept verbatim; longer ones are shortened and suffixed with a digest
const MAX_SEGMENT_LEN: usize = 120;

/// Identifies one cache entry inside a namespace
///
/// `scope` is a package name or a `/`-separated repository path such as
/// `owner/repo/author_name`; `purpose` names what is stored for it.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    scope: String,
    purpose: String,
}

impl CacheKey {
    /// Key scoped to a package; package names are case-insensitive
    pub fn package(name: &str, purpose: &str) -> Self {
        Self {
            scope: name.to_lowercase(),
            purpose: purpose.to_string(),
        }
    }

    /// Key scoped to an arbitrary `/`-separated path (repository id, user login, ...)
    pub fn scoped(scope: &str, purpose: &str) -> Self {
        Self {
            scope: scope.to_string(),
            purpose: purpose.to_string(),
        }
    }

    /// Key in a `_<group>` subtree, apart from the `owner/repo` entries.
    /// GitHub logins cannot start with `_`, so the two never share a path.
    pub fn reserved(group: &str, scope: &str, purpose: &str) -> Self {
        Self {
            scope: format!("_{}/{}", group, scope),
            purpose: purpose.to_string(),
        }
    }

    pub fn scope(&self) -> &str {
        &self.scope
    }

    pub fn purpose(&self) -> &str {
        &self.purpose
    }

    /// Relative path of the entry below the namespace root
    pub fn relative_path(&self) -> PathBuf {
        let mut path: PathBuf = self.scope.split('/').map(sanitize_segment).collect();
        path.push(sanitize_segment(&self.purpose));
        path
    }
}

/// Turn arbitrary text into a single safe file name.
pub fn sanitize_segment(raw: &str) -> String {
    let cleaned: String = raw
        .trim()
        .chars()
        .map(|c| {
            if c.is_ascii_alphanumeric() || matches!(c, '.' | '_' | '-') {
                c
            } else {
                '_'
            }
        })
        .collect();

    if cleaned.is_empty() || cleaned.chars().all(|c| c == '.') {
        return "_".to_string();
    }

    if cleaned.len() <= MAX_SEGMENT_LEN {
        return cleaned;
    }

    let digest = Sha256::digest(raw.as_bytes());
    format!(
        "{}-{}",
        &cleaned[..MAX_SEGMENT_LEN - 17],
        hex::encode(&digest[..8])
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn package_keys_are_lowercased() {
        let key = CacheKey::package("PyYAML", "show");
        assert_eq!(key.relative_path(), PathBuf::from("pyyaml/show"));
    }

    #[test]
    fn scoped_keys_nest_by_segment() {
        let key = CacheKey::scoped("acme/widget/author_email", "dev@acme.io");
        assert_eq!(
            key.relative_path(),
            PathBuf::from("acme/widget/author_email/dev_acme.io")
        );
    }

    #[test]
    fn reserved_keys_live_under_an_underscore_group() {
        let key = CacheKey::reserved("search", "widget", "search");
        assert_eq!(key.relative_path(), PathBuf::from("_search/widget/search"));
    }

    #[test]
    fn traversal_segments_are_neutralized() {
        assert_eq!(sanitize_segment(".."), "_");
        assert_eq!(sanitize_segment(""), "_");
        assert_eq!(sanitize_segment("a b/c"), "a_b_c");

        let key = CacheKey::scoped("../../etc", "passwd");
        assert_eq!(key.relative_path(), PathBuf::from("_/_/etc/passwd"));
    }

    #[test]
    fn long_segments_are_shortened_deterministically() {
        let long = "x".repeat(500);
        let a = sanitize_segment(&long);
        let b = sanitize_segment(&long);
        assert_eq!(a, b);
        assert_eq!(a.len(), MAX_SEGMENT_LEN);

        let other = sanitize_segment(&format!("{}y", "x".repeat(499)));
        assert_ne!(a, other);
    }
}
