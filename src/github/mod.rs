//! Source hosting API (GitHub)

pub mod client;
pub mod types;

pub use client::GithubClient;
pub use types::{CodeHit, Contributor, Owner, RepositorySummary};

use crate::error::StarsResult;

/// The GitHub operations used for attribution and starring.
///
/// Paginated collections return only their first page unless stated
/// otherwise.
pub trait HostingApi {
    /// Login of the token's owner
    fn current_user(&self) -> StarsResult<String>;

    /// Fails with `RepositoryNotFound` on 404
    fn get_repository(&self, owner: &str, name: &str) -> StarsResult<RepositorySummary>;

    /// Repository search sorted by stars, descending
    fn search_repositories(&self, query: &str) -> StarsResult<Vec<RepositorySummary>>;

    /// Code search with text-match fragments
    fn search_code(&self, query: &str) -> StarsResult<Vec<CodeHit>>;

    /// Contributors with display names
    fn contributors(&self, owner: &str, name: &str) -> StarsResult<Vec<Contributor>>;

    /// Public email of an organization; `None` when unset or unknown
    fn organization_email(&self, org: &str) -> StarsResult<Option<String>>;

    /// `owner/name` of every repository the user starred, up to `max_pages` pages
    fn starred_repositories(&self, per_page: u32, max_pages: u32) -> StarsResult<Vec<String>>;

    /// Fails with `RepositoryNotFound` on 404
    fn star(&self, owner: &str, name: &str) -> StarsResult<()>;
}
