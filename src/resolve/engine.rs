//! The resolution cascade

use super::matching::{author_matches, email_stem, ratio, repository_urls, MATCH_THRESHOLD};
use super::{
    RepositoryCandidate, ResolutionResult, CONTRIBUTORS_PURPOSE, NEGATIVE_PURPOSE,
    ORGANIZATION_EMAIL_PURPOSE, RESOLUTION_PURPOSE, SEARCH_PURPOSE,
};
use crate::cache::{CacheKey, CacheSet};
use crate::error::{StarsError, StarsResult};
use crate::github::{Contributor, HostingApi, RepositorySummary};
use crate::package::{MetadataReader, PackageMetadata, PackageShow};
use crate::registry::{RegistryApi, RegistryFetcher, RegistryInfo};
use crate::starred::StarredSet;
use tracing::{debug, warn};

/// Search results considered per package
const MAX_SEARCH_CANDIDATES: usize = 5;

/// Resolves packages for one acting user against one starred set
pub struct Resolver<'a> {
    caches: &'a CacheSet,
    metadata: MetadataReader<'a>,
    registry: RegistryFetcher<'a>,
    hosting: &'a dyn HostingApi,
    user: &'a str,
    starred: &'a StarredSet,
}

impl<'a> Resolver<'a> {
    pub fn new(
        caches: &'a CacheSet,
        show: &'a dyn PackageShow,
        registry: &'a dyn RegistryApi,
        hosting: &'a dyn HostingApi,
        user: &'a str,
        starred: &'a StarredSet,
    ) -> Self {
        Self {
            caches,
            metadata: MetadataReader::new(caches.dependency(), show),
            registry: RegistryFetcher::new(caches.registry(), registry),
            hosting,
            user,
            starred,
        }
    }

    /// Resolve `name` to a repository and classify it.
    ///
    /// Only local failures (pip, cache directory) are returned as errors;
    /// GitHub and PyPI failures become `not available`.
    pub fn resolve(&self, name: &str) -> StarsResult<ResolutionResult> {
        let key = CacheKey::package(name, RESOLUTION_PURPOSE);

        if let Some(cached) = self.load_cached(&key, name) {
            return Ok(cached);
        }

        match self.attribute(name) {
            Ok(Some(candidate)) => self.register(name, &candidate),
            Ok(None) => {
                debug!("GitHub repository not found: {}", name);
                Ok(ResolutionResult::not_found(name))
            }
            Err(e) if e.is_fatal() => Err(e),
            Err(e) if e.is_rate_limited() => {
                warn!("{}: {}", name, e);
                Ok(ResolutionResult::not_available(name))
            }
            Err(e) => {
                warn!("failed to resolve {}: {}", name, e);
                Ok(ResolutionResult::not_available(name))
            }
        }
    }

    fn load_cached(&self, key: &CacheKey, name: &str) -> Option<ResolutionResult> {
        let store = self.caches.registry();
        let cached: ResolutionResult = store.read_json(key)?;

        if let Err(e) = cached.validate() {
            debug!("failed to load cache {}: {}", store.path(key).display(), e);
            return None;
        }

        if !cached.package_name.eq_ignore_ascii_case(name) {
            debug!(
                "cache {} belongs to {}",
                store.path(key).display(),
                cached.package_name
            );
            return None;
        }

        debug!("load resolution cache: {}", store.path(key).display());
        Some(cached)
    }

    fn attribute(&self, name: &str) -> StarsResult<Option<RepositoryCandidate>> {
        let metadata = self.metadata.fetch(name)?;

        if let Some((owner, repo)) = repository_urls(metadata.raw()).next() {
            if let Some(candidate) = self.verify(&owner, &repo)? {
                debug!("found in pip show: {}", candidate.id());
                return Ok(Some(candidate));
            }
        }

        let negative = CacheKey::package(name, NEGATIVE_PURPOSE);
        let registry_store = self.caches.registry();
        if registry_store.available(&negative) {
            debug!(
                "negative cache for a PyPI package found: {}",
                registry_store.path(&negative).display()
            );
            return Ok(None);
        }

        let info = self.registry.fetch(name)?;

        if let Some(info) = &info {
            for (owner, repo) in repository_urls(info.description()) {
                if !repo.eq_ignore_ascii_case(name) {
                    continue;
                }

                if let Some(candidate) = self.verify(&owner, &repo)? {
                    debug!("found in PyPI description: {}", candidate.id());
                    return Ok(Some(candidate));
                }
            }
        }

        let found = self.search(name, &metadata, info.as_ref())?;
        if found.is_none() {
            debug!(
                "create negative cache for a PyPI package: {}",
                registry_store.path(&negative).display()
            );
            registry_store.touch(&negative)?;
        }

        Ok(found)
    }

    /// Confirm `owner/repo` exists, remembering repositories that do not
    fn verify(&self, owner: &str, repo: &str) -> StarsResult<Option<RepositoryCandidate>> {
        let store = self.caches.repository();
        let negative = CacheKey::scoped(&format!("{}/{}", owner, repo), NEGATIVE_PURPOSE);

        if store.available(&negative) {
            debug!("negative cache for {}/{} found", owner, repo);
            return Ok(None);
        }

        match self.hosting.get_repository(owner, repo) {
            Ok(summary) => Ok(Some(RepositoryCandidate::from(&summary))),
            Err(StarsError::RepositoryNotFound(id)) => {
                debug!("create negative cache for a GitHub repo: {}", id);
                store.touch(&negative)?;
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    fn search(
        &self,
        name: &str,
        metadata: &PackageMetadata,
        info: Option<&RegistryInfo>,
    ) -> StarsResult<Option<RepositoryCandidate>> {
        let results = self.search_results(name)?;
        let authors = metadata.author_tokens();
        let author_email = info.and_then(RegistryInfo::author_email);

        for summary in results.iter().take(MAX_SEARCH_CANDIDATES) {
            let score = ratio(name, &summary.name);
            if score < MATCH_THRESHOLD {
                debug!("skip {}: name ratio {:.2}", summary.id(), score);
                continue;
            }

            let candidate = RepositoryCandidate::from(summary);
            if self.accept(&candidate, &authors, metadata.author(), author_email)? {
                return Ok(Some(candidate));
            }
        }

        Ok(None)
    }

    fn search_results(&self, name: &str) -> StarsResult<Vec<RepositorySummary>> {
        let store = self.caches.repository();
        let key = CacheKey::reserved("search", &name.to_lowercase(), SEARCH_PURPOSE);

        if let Some(results) = store.read_json(&key) {
            debug!("load search cache: {}", store.path(&key).display());
            return Ok(results);
        }

        let query = format!("{} language:python", name);
        debug!("search at github: {}", query);
        let results = self.hosting.search_repositories(&query)?;
        store.write_json(&key, &results)?;

        Ok(results)
    }

    /// Whether the package's author can be tied to `candidate`
    fn accept(
        &self,
        candidate: &RepositoryCandidate,
        authors: &[&str],
        author: Option<&str>,
        author_email: Option<&str>,
    ) -> StarsResult<bool> {
        let id = candidate.id();

        if author_matches(authors, &candidate.owner) {
            debug!("author matches the owner: {}", id);
            return Ok(true);
        }

        if !authors.is_empty() {
            let contributors = self.contributors(candidate)?;
            let hit = contributors.iter().find(|c| {
                author_matches(authors, &c.login)
                    || c.name.as_deref().is_some_and(|n| author_matches(authors, n))
            });
            if let Some(contributor) = hit {
                debug!("found contributor: repo={}, login={}", id, contributor.login);
                return Ok(true);
            }
        }

        if let (true, Some(email)) = (candidate.is_organization, author_email) {
            if let Some(org_email) = self.organization_email(&candidate.owner)? {
                if email_stem(email) == email_stem(&org_email) {
                    debug!("author email matches the organization: {}", id);
                    return Ok(true);
                }
            }
        }

        if let (Some(author), Some(email)) = (author, author_email) {
            if self.source_contains(candidate, "author_name", author)?
                && self.source_contains(candidate, "author_email", email)?
            {
                debug!("source includes author name and email: {}", id);
                return Ok(true);
            }
        }

        Ok(false)
    }

    fn contributors(&self, candidate: &RepositoryCandidate) -> StarsResult<Vec<Contributor>> {
        let store = self.caches.repository();
        let key = CacheKey::scoped(&candidate.id(), CONTRIBUTORS_PURPOSE);

        if let Some(contributors) = store.read_json(&key) {
            debug!("load contributors cache: {}", store.path(&key).display());
            return Ok(contributors);
        }

        debug!("find contributors: {}", candidate.id());
        let contributors = self.hosting.contributors(&candidate.owner, &candidate.name)?;
        store.write_json(&key, &contributors)?;

        Ok(contributors)
    }

    fn organization_email(&self, org: &str) -> StarsResult<Option<String>> {
        let store = self.caches.repository();
        let key = CacheKey::reserved("orgs", &org.to_lowercase(), ORGANIZATION_EMAIL_PURPOSE);

        if let Some(email) = store.read(&key) {
            let email = email.trim();
            return Ok((!email.is_empty()).then(|| email.to_string()));
        }

        let email = self.hosting.organization_email(org)?;
        store.write(&key, email.as_deref().unwrap_or_default())?;

        Ok(email)
    }

    /// Code search inside the candidate for `term`, cached as `1`/`0`
    fn source_contains(
        &self,
        candidate: &RepositoryCandidate,
        category: &str,
        term: &str,
    ) -> StarsResult<bool> {
        let store = self.caches.repository();
        let key = CacheKey::scoped(&format!("{}/{}", candidate.id(), category), term);

        if let Some(flag) = store.read(&key) {
            match flag.trim() {
                "1" => return Ok(true),
                "0" => return Ok(false),
                other => warn!(
                    "unexpected value '{}' in {}",
                    other,
                    store.path(&key).display()
                ),
            }
        }

        let query = format!("{} in:file language:python repo:{}", term, candidate.id());
        debug!("search {}: {}", category, query);

        let needle = term.to_lowercase();
        let found = self
            .hosting
            .search_code(&query)?
            .iter()
            .flat_map(|hit| hit.fragments.iter())
            .any(|fragment| fragment.to_lowercase().contains(&needle));

        debug!(
            "source {} include {}: repo={}",
            if found { "found" } else { "not found" },
            category,
            candidate.id()
        );
        store.write(&key, if found { "1" } else { "0" })?;

        Ok(found)
    }

    fn register(
        &self,
        name: &str,
        candidate: &RepositoryCandidate,
    ) -> StarsResult<ResolutionResult> {
        let result = ResolutionResult::matched(
            name,
            candidate,
            self.starred.contains(&candidate.id()),
            candidate.owner.eq_ignore_ascii_case(self.user),
        );

        let store = self.caches.registry();
        let key = CacheKey::package(name, RESOLUTION_PURPOSE);
        debug!("write resolution cache: {}", store.path(&key).display());
        store.write_json(&key, &result)?;

        Ok(result)
    }
}
