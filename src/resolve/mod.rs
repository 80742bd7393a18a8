//! Package to GitHub repository attribution
//!
//! Strategies run in order and the first hit wins:
//!
//! 1. a github.com URL in the package's own `pip show` output
//! 2. a github.com URL in the PyPI description whose repository name equals
//!    the package name
//! 3. repository search, accepting one of the top five results only when the
//!    name is similar and the author can be tied to the repository
//!
//! Every network answer is cached; failed lookups leave negative entries so a
//! rerun inside the cache lifetime does not repeat them.

pub mod engine;
pub mod matching;
pub mod status;

pub use engine::Resolver;
pub use status::{ResolutionResult, StarStatus, RATE_LIMIT_EXCEEDED, REPOSITORY_NOT_FOUND};

use crate::github::RepositorySummary;

pub const RESOLUTION_PURPOSE: &str = "resolution";
pub const NEGATIVE_PURPOSE: &str = "negative";
pub const SEARCH_PURPOSE: &str = "search";
pub const CONTRIBUTORS_PURPOSE: &str = "contributors";
pub const ORGANIZATION_EMAIL_PURPOSE: &str = "organization-email";

/// A repository under consideration for a package
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepositoryCandidate {
    pub owner: String,
    pub name: String,
    pub is_organization: bool,
}

impl RepositoryCandidate {
    pub fn new(owner: &str, name: &str, is_organization: bool) -> Self {
        Self {
            owner: owner.to_string(),
            name: name.to_string(),
            is_organization,
        }
    }

    /// `owner/name`
    pub fn id(&self) -> String {
        format!("{}/{}", self.owner, self.name)
    }

    pub fn url(&self) -> String {
        format!("https://github.com/{}", self.id())
    }
}

impl From<&RepositorySummary> for RepositoryCandidate {
    fn from(summary: &RepositorySummary) -> Self {
        Self::new(
            &summary.owner.login,
            &summary.name,
            summary.owner.is_organization(),
        )
    }
}
