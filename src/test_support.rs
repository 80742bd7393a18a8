//! In-memory collaborators for unit tests

use crate::error::{StarsError, StarsResult};
use crate::github::{CodeHit, Contributor, HostingApi, RepositorySummary};
use crate::package::PackageShow;
use crate::registry::RegistryApi;
use serde_json::Value;
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};

/// `pip show` stand-in; unknown packages are not installed
#[derive(Default)]
pub struct FakeShow {
    outputs: HashMap<String, String>,
    calls: Cell<usize>,
}

impl FakeShow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, output: &str) -> Self {
        self.outputs.insert(name.to_lowercase(), output.to_string());
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl PackageShow for FakeShow {
    fn show(&self, name: &str) -> StarsResult<String> {
        self.calls.set(self.calls.get() + 1);
        self.outputs
            .get(&name.to_lowercase())
            .cloned()
            .ok_or_else(|| StarsError::PackageNotInstalled {
                name: name.to_string(),
            })
    }
}

/// PyPI stand-in keyed by lower-cased package name
#[derive(Default)]
pub struct FakeRegistry {
    infos: HashMap<String, Value>,
    calls: Cell<usize>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, name: &str, info: Value) -> Self {
        self.infos.insert(name.to_lowercase(), info);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.get()
    }
}

impl RegistryApi for FakeRegistry {
    fn project_info(&self, name: &str) -> StarsResult<Option<Value>> {
        self.calls.set(self.calls.get() + 1);
        Ok(self.infos.get(&name.to_lowercase()).cloned())
    }
}

/// GitHub stand-in that counts calls per method
#[derive(Default)]
pub struct FakeHosting {
    user: String,
    repos: HashMap<String, RepositorySummary>,
    search: Vec<RepositorySummary>,
    search_fails: bool,
    code: HashMap<String, Vec<String>>,
    contributors: HashMap<String, Vec<Contributor>>,
    org_emails: HashMap<String, String>,
    starred: RefCell<Vec<String>>,
    rate_limited: Cell<bool>,
    rate_limited_repos: HashSet<String>,
    calls: RefCell<HashMap<&'static str, usize>>,
}

impl FakeHosting {
    pub fn new(user: &str) -> Self {
        Self {
            user: user.to_string(),
            ..Default::default()
        }
    }

    pub fn with_repo(mut self, owner: &str, name: &str, organization: bool) -> Self {
        let repo = RepositorySummary::new(owner, name, organization);
        self.repos.insert(repo.id().to_lowercase(), repo);
        self
    }

    pub fn with_search(mut self, results: Vec<RepositorySummary>) -> Self {
        self.search = results;
        self
    }

    pub fn failing_search(mut self) -> Self {
        self.search_fails = true;
        self
    }

    /// A code-search fragment returned for any query scoped to `repo`
    pub fn with_code(mut self, repo: &str, fragment: &str) -> Self {
        self.code
            .entry(repo.to_lowercase())
            .or_default()
            .push(fragment.to_string());
        self
    }

    pub fn with_contributors(mut self, repo: &str, contributors: Vec<Contributor>) -> Self {
        self.contributors.insert(repo.to_lowercase(), contributors);
        self
    }

    pub fn with_org_email(mut self, org: &str, email: &str) -> Self {
        self.org_emails.insert(org.to_lowercase(), email.to_string());
        self
    }

    pub fn with_starred(self, id: &str) -> Self {
        self.starred.borrow_mut().push(id.to_string());
        self
    }

    /// Lookups of this one repository fail with a rate limit
    pub fn rate_limited_repo(mut self, id: &str) -> Self {
        self.rate_limited_repos.insert(id.to_lowercase());
        self
    }

    pub fn set_rate_limited(&self, limited: bool) {
        self.rate_limited.set(limited);
    }

    pub fn calls(&self, method: &str) -> usize {
        self.calls.borrow().get(method).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.borrow().values().sum()
    }

    pub fn starred(&self) -> Vec<String> {
        self.starred.borrow().clone()
    }

    fn record(&self, method: &'static str) -> StarsResult<()> {
        *self.calls.borrow_mut().entry(method).or_insert(0) += 1;
        if self.rate_limited.get() {
            return Err(StarsError::RateLimited { reset: None });
        }
        Ok(())
    }
}

impl HostingApi for FakeHosting {
    fn current_user(&self) -> StarsResult<String> {
        self.record("current_user")?;
        Ok(self.user.clone())
    }

    fn get_repository(&self, owner: &str, name: &str) -> StarsResult<RepositorySummary> {
        self.record("get_repository")?;
        let id = format!("{}/{}", owner, name);
        if self.rate_limited_repos.contains(&id.to_lowercase()) {
            return Err(StarsError::RateLimited { reset: None });
        }
        self.repos
            .get(&id.to_lowercase())
            .cloned()
            .ok_or(StarsError::RepositoryNotFound(id))
    }

    fn search_repositories(&self, _query: &str) -> StarsResult<Vec<RepositorySummary>> {
        self.record("search_repositories")?;
        if self.search_fails {
            return Err(StarsError::GithubApi {
                endpoint: "/search/repositories".to_string(),
                status: 503,
                message: "Service Unavailable".to_string(),
            });
        }
        Ok(self.search.clone())
    }

    fn search_code(&self, query: &str) -> StarsResult<Vec<CodeHit>> {
        self.record("search_code")?;
        let repo = query
            .split_whitespace()
            .find_map(|token| token.strip_prefix("repo:"))
            .unwrap_or_default()
            .to_lowercase();

        Ok(self
            .code
            .get(&repo)
            .map(|fragments| {
                vec![CodeHit {
                    path: "setup.py".to_string(),
                    fragments: fragments.clone(),
                }]
            })
            .unwrap_or_default())
    }

    fn contributors(&self, owner: &str, name: &str) -> StarsResult<Vec<Contributor>> {
        self.record("contributors")?;
        Ok(self
            .contributors
            .get(&format!("{}/{}", owner, name).to_lowercase())
            .cloned()
            .unwrap_or_default())
    }

    fn organization_email(&self, org: &str) -> StarsResult<Option<String>> {
        self.record("organization_email")?;
        Ok(self.org_emails.get(&org.to_lowercase()).cloned())
    }

    fn starred_repositories(&self, _per_page: u32, _max_pages: u32) -> StarsResult<Vec<String>> {
        self.record("starred_repositories")?;
        Ok(self.starred())
    }

    fn star(&self, owner: &str, name: &str) -> StarsResult<()> {
        self.record("star")?;
        let id = format!("{}/{}", owner, name);
        if !self.repos.contains_key(&id.to_lowercase()) {
            return Err(StarsError::RepositoryNotFound(id));
        }
        self.starred.borrow_mut().push(id);
        Ok(())
    }
}
