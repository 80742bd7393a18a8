//! The acting user's starred repositories and star mutations

use crate::cache::{CacheKey, CacheSet};
use crate::error::{StarsError, StarsResult};
use crate::github::HostingApi;
use crate::resolve::{ResolutionResult, StarStatus, RESOLUTION_PURPOSE};
use std::collections::HashSet;
use tracing::{debug, error, info};

pub const STARRED_PURPOSE: &str = "starred";

/// Page size for listing starred repositories (the API maximum)
pub const STARRED_PER_PAGE: u32 = 100;

/// Repository ids the user has starred; lookups ignore ASCII case
#[derive(Debug, Clone, Default)]
pub struct StarredSet {
    ids: Vec<String>,
    index: HashSet<String>,
}

impl StarredSet {
    pub fn new(ids: Vec<String>) -> Self {
        let index = ids.iter().map(|id| id.to_ascii_lowercase()).collect();
        Self { ids, index }
    }

    /// One `owner/name` per line
    pub fn parse(text: &str) -> Self {
        Self::new(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty())
                .map(str::to_string)
                .collect(),
        )
    }

    pub fn to_lines(&self) -> String {
        self.ids.iter().map(|id| format!("{}\n", id)).collect()
    }

    pub fn contains(&self, id: &str) -> bool {
        self.index.contains(&id.to_ascii_lowercase())
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }
}

/// Controls for [`StarredSync::star_all`]
#[derive(Debug, Clone, Copy, Default)]
pub struct StarOptions {
    pub include_owner_repo: bool,
    pub dry_run: bool,
}

/// What a starring pass did
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StarSummary {
    pub starred: usize,
    pub would_star: usize,
    pub already_starred: usize,
    pub owned: usize,
    pub unresolved: usize,
    pub failed: usize,
}

/// Keeps the starred list cache in step with star mutations
pub struct StarredSync<'a> {
    caches: &'a CacheSet,
    hosting: &'a dyn HostingApi,
    user: &'a str,
    max_pages: u32,
}

impl<'a> StarredSync<'a> {
    pub fn new(
        caches: &'a CacheSet,
        hosting: &'a dyn HostingApi,
        user: &'a str,
        max_pages: u32,
    ) -> Self {
        Self {
            caches,
            hosting,
            user,
            max_pages,
        }
    }

    fn starred_key(&self) -> CacheKey {
        CacheKey::reserved("users", &self.user.to_lowercase(), STARRED_PURPOSE)
    }

    /// Starred repositories, cache first
    pub fn fetch(&self) -> StarsResult<StarredSet> {
        let store = self.caches.repository();
        let key = self.starred_key();

        if let Some(content) = store.read(&key) {
            debug!(
                "load starred repositories cache: user={}, path={}",
                self.user,
                store.path(&key).display()
            );
            return Ok(StarredSet::parse(&content));
        }

        let starred = StarredSet::new(
            self.hosting
                .starred_repositories(STARRED_PER_PAGE, self.max_pages)?,
        );
        debug!(
            "write starred repositories cache: user={}, count={}",
            self.user,
            starred.len()
        );
        store.write(&key, &starred.to_lines())?;

        Ok(starred)
    }

    /// Star the result's repository.
    ///
    /// Returns `false` when GitHub answers 404, which also happens when the
    /// token lacks the `public_repo` scope.
    pub fn apply_star(&self, result: &ResolutionResult) -> StarsResult<bool> {
        let Some((owner, name)) = result.repository() else {
            return Ok(false);
        };

        match self.hosting.star(owner, name) {
            Ok(()) => {
                self.caches
                    .registry()
                    .invalidate(&CacheKey::package(&result.package_name, RESOLUTION_PURPOSE))?;
                self.caches.repository().invalidate(&self.starred_key())?;
                Ok(true)
            }
            Err(StarsError::RepositoryNotFound(id)) => {
                error!(
                    "failed to star {}: the repository is gone or the personal access token lacks the public_repo scope",
                    id
                );
                Ok(false)
            }
            Err(e) => Err(e),
        }
    }

    /// Star every eligible result in package-name order
    pub fn star_all(
        &self,
        results: &[ResolutionResult],
        options: StarOptions,
    ) -> StarsResult<StarSummary> {
        let mut ordered: Vec<&ResolutionResult> = results.iter().collect();
        ordered.sort_by(|a, b| a.package_name.cmp(&b.package_name));

        let mut summary = StarSummary::default();

        for result in ordered {
            match result.star_status {
                StarStatus::Starred => {
                    info!("skip already starred: {}", result.repository_id);
                    summary.already_starred += 1;
                    continue;
                }
                StarStatus::NotFound => {
                    info!("skip GitHub repository not found: {}", result.package_name);
                    summary.unresolved += 1;
                    continue;
                }
                StarStatus::NotAvailable => {
                    info!(
                        "skip repository that could not get info: {}",
                        result.package_name
                    );
                    summary.unresolved += 1;
                    continue;
                }
                StarStatus::NotStarred => {}
            }

            if result.is_owned == Some(true) && !options.include_owner_repo {
                info!("skip owned repository: {}", result.repository_id);
                summary.owned += 1;
                continue;
            }

            info!("star to {}", result.repository_id);
            if options.dry_run {
                summary.would_star += 1;
                continue;
            }

            match self.apply_star(result) {
                Ok(true) => summary.starred += 1,
                Ok(false) => summary.failed += 1,
                Err(e) if e.is_fatal() => return Err(e),
                Err(e) => {
                    error!("failed to star {}: {}", result.repository_id, e);
                    summary.failed += 1;
                }
            }
        }

        Ok(summary)
    }
}
