//! Blocking GitHub REST client

use super::types::{
    ApiMessage, CodeHit, CodeItem, Contributor, Login, Organization, Profile, RepositorySummary,
    SearchPage,
};
use super::HostingApi;
use crate::config::schema::GithubConfig;
use crate::error::{StarsError, StarsResult};
use crate::registry::pypi::USER_AGENT;
use chrono::DateTime;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};
use ureq::http::Response;
use ureq::{Agent, Body, RequestBuilder};

const API_VERSION: &str = "2022-11-28";
const ACCEPT_JSON: &str = "application/vnd.github+json";
const ACCEPT_TEXT_MATCH: &str = "application/vnd.github.text-match+json";

/// Map a non-success status to an error.
///
/// GitHub reports an exhausted quota as 403 (primary limit) or 429
/// (secondary limit); plain 403s are permission problems.
fn check_status(
    endpoint: &str,
    status: u16,
    remaining: Option<&str>,
    reset: Option<&str>,
    body: &str,
) -> StarsResult<()> {
    if (200..300).contains(&status) {
        return Ok(());
    }

    let message = serde_json::from_str::<ApiMessage>(body)
        .map(|m| m.message)
        .unwrap_or_else(|_| body.trim().to_string());

    if status == 401 {
        return Err(StarsError::Unauthorized);
    }

    let exhausted = remaining.map(str::trim) == Some("0");
    if (status == 403 || status == 429)
        && (exhausted || message.to_lowercase().contains("rate limit"))
    {
        let reset = reset
            .and_then(|value| value.trim().parse::<i64>().ok())
            .and_then(|secs| DateTime::from_timestamp(secs, 0));
        return Err(StarsError::RateLimited { reset });
    }

    Err(StarsError::GithubApi {
        endpoint: endpoint.to_string(),
        status,
        message,
    })
}

/// GitHub client authenticated with a personal access token
pub struct GithubClient {
    agent: Agent,
    api_url: String,
    token: String,
    max_contributors: usize,
}

impl GithubClient {
    pub fn new(token: impl Into<String>, config: &GithubConfig) -> Self {
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            api_url: config.api_url.trim_end_matches('/').to_string(),
            token: token.into(),
            max_contributors: config.max_contributors,
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.api_url, path)
    }

    fn prepare<B>(&self, request: RequestBuilder<B>, accept: &str) -> RequestBuilder<B> {
        request
            .header("Authorization", format!("Bearer {}", self.token))
            .header("Accept", accept)
            .header("X-GitHub-Api-Version", API_VERSION)
            .header("User-Agent", USER_AGENT)
    }

    /// Body of a successful response; `None` for 404 and empty 204 replies
    fn read(&self, endpoint: &str, mut response: Response<Body>) -> StarsResult<Option<String>> {
        let status = response.status().as_u16();
        if status == 404 || status == 204 {
            debug!("{} returned {}", endpoint, status);
            return Ok(None);
        }

        let body = response.body_mut().read_to_string()?;
        let headers = response.headers();
        let header = |name: &str| headers.get(name).and_then(|value| value.to_str().ok());

        check_status(
            endpoint,
            status,
            header("x-ratelimit-remaining"),
            header("x-ratelimit-reset"),
            &body,
        )?;

        Ok(Some(body))
    }

    fn get_json<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
        accept: &str,
    ) -> StarsResult<Option<T>> {
        let url = self.url(path);
        debug!("GET {}", url);

        let mut request = self.prepare(self.agent.get(&url), accept);
        for (key, value) in query {
            request = request.query(*key, value.as_str());
        }

        let response = request.call()?;
        match self.read(path, response)? {
            Some(body) => Ok(Some(serde_json::from_str(&body)?)),
            None => Ok(None),
        }
    }

    fn display_name(&self, login: &str) -> StarsResult<Option<String>> {
        let profile: Option<Profile> = self.get_json(&format!("/users/{}", login), &[], ACCEPT_JSON)?;
        Ok(profile
            .and_then(|p| p.name)
            .filter(|name| !name.trim().is_empty()))
    }
}

impl HostingApi for GithubClient {
    fn current_user(&self) -> StarsResult<String> {
        let user: Option<Login> = self.get_json("/user", &[], ACCEPT_JSON)?;
        user.map(|u| u.login).ok_or(StarsError::Unauthorized)
    }

    fn get_repository(&self, owner: &str, name: &str) -> StarsResult<RepositorySummary> {
        let path = format!("/repos/{}/{}", owner, name);
        self.get_json(&path, &[], ACCEPT_JSON)?
            .ok_or_else(|| StarsError::RepositoryNotFound(format!("{}/{}", owner, name)))
    }

    fn search_repositories(&self, query: &str) -> StarsResult<Vec<RepositorySummary>> {
        let params = [
            ("q", query.to_string()),
            ("sort", "stars".to_string()),
            ("order", "desc".to_string()),
        ];
        let page: Option<SearchPage<RepositorySummary>> =
            self.get_json("/search/repositories", &params, ACCEPT_JSON)?;
        Ok(page.map(|p| p.items).unwrap_or_default())
    }

    fn search_code(&self, query: &str) -> StarsResult<Vec<CodeHit>> {
        let params = [("q", query.to_string())];
        let page: Option<SearchPage<CodeItem>> =
            self.get_json("/search/code", &params, ACCEPT_TEXT_MATCH)?;
        Ok(page
            .map(|p| p.items.into_iter().map(CodeHit::from).collect())
            .unwrap_or_default())
    }

    fn contributors(&self, owner: &str, name: &str) -> StarsResult<Vec<Contributor>> {
        let path = format!("/repos/{}/{}/contributors", owner, name);
        let per_page = self.max_contributors.clamp(1, 100);
        let logins: Vec<Login> = self
            .get_json(&path, &[("per_page", per_page.to_string())], ACCEPT_JSON)?
            .unwrap_or_default();

        let mut contributors = Vec::with_capacity(logins.len());
        for Login { login } in logins.into_iter().take(self.max_contributors) {
            let name = self.display_name(&login)?;
            contributors.push(Contributor { login, name });
        }

        Ok(contributors)
    }

    fn organization_email(&self, org: &str) -> StarsResult<Option<String>> {
        let organization: Option<Organization> =
            self.get_json(&format!("/orgs/{}", org), &[], ACCEPT_JSON)?;
        Ok(organization
            .and_then(|o| o.email)
            .filter(|email| !email.trim().is_empty()))
    }

    fn starred_repositories(&self, per_page: u32, max_pages: u32) -> StarsResult<Vec<String>> {
        let mut starred = Vec::new();

        for page in 1..=max_pages {
            let params = [
                ("per_page", per_page.to_string()),
                ("page", page.to_string()),
            ];
            let repos: Vec<RepositorySummary> = self
                .get_json("/user/starred", &params, ACCEPT_JSON)?
                .unwrap_or_default();

            let count = repos.len();
            starred.extend(repos.iter().map(RepositorySummary::id));

            if count < per_page as usize {
                return Ok(starred);
            }
        }

        warn!(
            "stopped listing starred repositories after {} pages ({} repositories)",
            max_pages,
            starred.len()
        );
        Ok(starred)
    }

    fn star(&self, owner: &str, name: &str) -> StarsResult<()> {
        let path = format!("/user/starred/{}/{}", owner, name);
        let url = self.url(&path);
        debug!("PUT {}", url);

        let response = self
            .prepare(self.agent.put(&url), ACCEPT_JSON)
            .send_empty()?;

        if response.status().as_u16() == 404 {
            return Err(StarsError::RepositoryNotFound(format!("{}/{}", owner, name)));
        }

        self.read(&path, response).map(|_| ())
    }
}
