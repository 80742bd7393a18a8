//! `pip show` parsing and the cached metadata reader

use super::show::PackageShow;
use crate::cache::{CacheKey, CacheStore};
use crate::error::StarsResult;
use crate::walk::DependencySource;
use tracing::debug;

/// Cache purpose for raw `pip show` output
pub const SHOW_PURPOSE: &str = "show";

/// Parsed `pip show` output for one package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageMetadata {
    raw: String,
    name: Option<String>,
    author: Option<String>,
    requires: Vec<String>,
}

impl PackageMetadata {
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let mut name = None;
        let mut author = None;
        let mut requires = Vec::new();

        for line in raw.lines() {
            if let Some(value) = field(line, "Name") {
                name.get_or_insert_with(|| value.to_string());
            } else if let Some(value) = field(line, "Author") {
                author.get_or_insert_with(|| value.to_string());
            } else if let Some(value) = line.strip_prefix("Requires:") {
                if requires.is_empty() {
                    requires = value
                        .split(',')
                        .map(str::trim)
                        .filter(|dep| !dep.is_empty())
                        .map(str::to_string)
                        .collect();
                }
            }
        }

        Self {
            raw,
            name,
            author,
            requires,
        }
    }

    /// Unparsed command output, kept for URL extraction
    pub fn raw(&self) -> &str {
        &self.raw
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    pub fn author(&self) -> Option<&str> {
        self.author.as_deref()
    }

    /// Individual author names from a comma-separated `Author:` line
    pub fn author_tokens(&self) -> Vec<&str> {
        self.author
            .as_deref()
            .map(|author| {
                author
                    .split(',')
                    .map(str::trim)
                    .filter(|token| !token.is_empty())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Direct dependencies in declaration order
    pub fn requires(&self) -> &[String] {
        &self.requires
    }
}

/// Non-empty value of a `Key: value` line
fn field<'a>(line: &'a str, key: &str) -> Option<&'a str> {
    let value = line.strip_prefix(key)?.strip_prefix(':')?.trim();
    (!value.is_empty()).then_some(value)
}

/// Reads package metadata through the dependency cache
pub struct MetadataReader<'a> {
    store: &'a CacheStore,
    show: &'a dyn PackageShow,
}

impl<'a> MetadataReader<'a> {
    pub fn new(store: &'a CacheStore, show: &'a dyn PackageShow) -> Self {
        Self { store, show }
    }

    pub fn fetch(&self, name: &str) -> StarsResult<PackageMetadata> {
        let key = CacheKey::package(name, SHOW_PURPOSE);

        if let Some(raw) = self.store.read(&key) {
            debug!("load pip show cache: {}", self.store.path(&key).display());
            return Ok(PackageMetadata::parse(raw));
        }

        let raw = self.show.show(name)?;
        self.store.write(&key, &raw)?;

        Ok(PackageMetadata::parse(raw))
    }
}

impl DependencySource for MetadataReader<'_> {
    fn dependencies(&self, name: &str) -> StarsResult<Vec<String>> {
        Ok(self.fetch(name)?.requires().to_vec())
    }
}
