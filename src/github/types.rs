//! GitHub REST API payloads

use serde::{Deserialize, Serialize};

/// Repository owner
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Owner {
    pub login: String,
    /// "User" or "Organization"
    #[serde(rename = "type", default)]
    pub kind: String,
}

impl Owner {
    pub fn is_organization(&self) -> bool {
        self.kind == "Organization"
    }
}

/// The subset of a repository object used for attribution
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RepositorySummary {
    pub name: String,
    pub owner: Owner,
    #[serde(default)]
    pub html_url: String,
}

impl RepositorySummary {
    pub fn new(owner: &str, name: &str, organization: bool) -> Self {
        Self {
            name: name.to_string(),
            owner: Owner {
                login: owner.to_string(),
                kind: if organization { "Organization" } else { "User" }.to_string(),
            },
            html_url: format!("https://github.com/{}/{}", owner, name),
        }
    }

    /// `owner/name`
    pub fn id(&self) -> String {
        format!("{}/{}", self.owner.login, self.name)
    }
}

/// A repository contributor with the display name from their profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Contributor {
    pub login: String,
    #[serde(default)]
    pub name: Option<String>,
}

/// A file returned by code search with its matched fragments
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeHit {
    pub path: String,
    pub fragments: Vec<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SearchPage<T> {
    #[serde(default = "Vec::new")]
    pub items: Vec<T>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct CodeItem {
    pub path: String,
    #[serde(default)]
    pub text_matches: Vec<TextMatch>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TextMatch {
    #[serde(default)]
    pub fragment: String,
}

impl From<CodeItem> for CodeHit {
    fn from(item: CodeItem) -> Self {
        Self {
            path: item.path,
            fragments: item.text_matches.into_iter().map(|m| m.fragment).collect(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct Login {
    pub login: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Profile {
    #[serde(default)]
    pub name: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct Organization {
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Deserialize)]
pub(crate) struct ApiMessage {
    pub message: String,
}
