//! Resolution outcome for one package

use super::RepositoryCandidate;
use crate::error::{StarsError, StarsResult};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Placeholder repository id when nothing matched
pub const REPOSITORY_NOT_FOUND: &str = "[Repository not found]";

/// Placeholder repository id when GitHub could not be queried
pub const RATE_LIMIT_EXCEEDED: &str = "Exceed API rate limit";

/// Relationship between the acting user and the package's repository
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StarStatus {
    #[serde(rename = "starred")]
    Starred,
    #[serde(rename = "not starred")]
    NotStarred,
    /// Looked, found nothing
    #[serde(rename = "not found")]
    NotFound,
    /// Could not look (rate limit or API failure)
    #[serde(rename = "not available")]
    NotAvailable,
}

impl StarStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Starred => "starred",
            Self::NotStarred => "not starred",
            Self::NotFound => "not found",
            Self::NotAvailable => "not available",
        }
    }

    /// Whether a repository was identified
    pub fn is_resolved(&self) -> bool {
        matches!(self, Self::Starred | Self::NotStarred)
    }
}

impl fmt::Display for StarStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Persisted result of resolving one package
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolutionResult {
    pub package_name: String,
    pub repository_id: String,
    pub star_status: StarStatus,
    pub is_owned: Option<bool>,
    pub url: Option<String>,
}

impl ResolutionResult {
    pub fn matched(
        package_name: &str,
        candidate: &RepositoryCandidate,
        starred: bool,
        owned: bool,
    ) -> Self {
        Self {
            package_name: package_name.to_string(),
            repository_id: candidate.id(),
            star_status: if starred {
                StarStatus::Starred
            } else {
                StarStatus::NotStarred
            },
            is_owned: Some(owned),
            url: Some(candidate.url()),
        }
    }

    pub fn not_found(package_name: &str) -> Self {
        Self::unresolved(package_name, REPOSITORY_NOT_FOUND, StarStatus::NotFound)
    }

    pub fn not_available(package_name: &str) -> Self {
        Self::unresolved(package_name, RATE_LIMIT_EXCEEDED, StarStatus::NotAvailable)
    }

    fn unresolved(package_name: &str, sentinel: &str, star_status: StarStatus) -> Self {
        Self {
            package_name: package_name.to_string(),
            repository_id: sentinel.to_string(),
            star_status,
            is_owned: None,
            url: None,
        }
    }

    /// Check the status/ownership pairing
    pub fn validate(&self) -> StarsResult<()> {
        if self.package_name.trim().is_empty() {
            return Err(StarsError::InvalidResolution(
                "empty package name".to_string(),
            ));
        }

        match (self.star_status.is_resolved(), self.is_owned, &self.url) {
            (true, Some(_), Some(_)) => {
                if self.repository().is_none() {
                    return Err(StarsError::InvalidResolution(format!(
                        "{}: malformed repository id '{}'",
                        self.package_name, self.repository_id
                    )));
                }
                Ok(())
            }
            (false, None, None) => Ok(()),
            _ => Err(StarsError::InvalidResolution(format!(
                "{}: status '{}' with owner {:?} and url {:?}",
                self.package_name, self.star_status, self.is_owned, self.url
            ))),
        }
    }

    /// `(owner, name)` for resolved results
    pub fn repository(&self) -> Option<(&str, &str)> {
        if !self.star_status.is_resolved() {
            return None;
        }

        self.repository_id
            .split_once('/')
            .filter(|(owner, name)| !owner.is_empty() && !name.is_empty() && !name.contains('/'))
    }
}
