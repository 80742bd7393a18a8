//! Blocking PyPI JSON API client

use super::RegistryApi;
use crate::config::schema::RegistryConfig;
use crate::error::{StarsError, StarsResult};
use backoff::ExponentialBackoff;
use serde_json::Value;
use std::time::Duration;
use tracing::{debug, warn};
use ureq::Agent;

pub(crate) const USER_AGENT: &str = concat!("thank-you-stars/", env!("CARGO_PKG_VERSION"));

/// Statuses worth another attempt
fn is_retryable(status: u16) -> bool {
    status == 429 || (500..600).contains(&status)
}

fn project_url(base_url: &str, name: &str) -> String {
    format!("{}/{}/json", base_url.trim_end_matches('/'), name)
}

/// PyPI client retrying transient failures with exponential backoff
pub struct PypiClient {
    agent: Agent,
    base_url: String,
    max_retry: Duration,
}

impl PypiClient {
    pub fn new(config: &RegistryConfig) -> Self {
        let agent: Agent = Agent::config_builder()
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            base_url: config.url.clone(),
            max_retry: Duration::from_secs(config.max_retry_secs),
        }
    }

    fn get_once(&self, url: &str, name: &str) -> Result<Option<Value>, backoff::Error<StarsError>> {
        debug!("GET {}", url);

        let mut response = self
            .agent
            .get(url)
            .header("User-Agent", USER_AGENT)
            .header("Accept", "application/json")
            .call()
            .map_err(|e| backoff::Error::transient(StarsError::from(e)))?;

        let status = response.status().as_u16();
        if is_retryable(status) {
            return Err(backoff::Error::transient(StarsError::Registry {
                package: name.to_string(),
                reason: format!("HTTP {}", status),
            }));
        }

        if status != 200 {
            debug!("PyPI returned {} for {}", status, name);
            return Ok(None);
        }

        let body = response
            .body_mut()
            .read_to_string()
            .map_err(|e| backoff::Error::permanent(StarsError::from(e)))?;
        let payload: Value = serde_json::from_str(&body)
            .map_err(|e| backoff::Error::permanent(StarsError::from(e)))?;

        Ok(payload.get("info").cloned())
    }
}

impl RegistryApi for PypiClient {
    fn project_info(&self, name: &str) -> StarsResult<Option<Value>> {
        let url = project_url(&self.base_url, name);
        let policy = ExponentialBackoff {
            max_elapsed_time: Some(self.max_retry),
            ..Default::default()
        };

        match backoff::retry(policy, || self.get_once(&url, name)) {
            Ok(info) => Ok(info),
            Err(backoff::Error::Permanent(err)) => Err(err),
            Err(backoff::Error::Transient { err, .. }) => {
                warn!("PyPI request for {} kept failing: {}", name, err);
                match err {
                    // The registry answered, just never with a 200
                    StarsError::Registry { .. } => Ok(None),
                    other => Err(other),
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn url_joins_base_and_name() {
        assert_eq!(
            project_url("https://pypi.org/pypi/", "requests"),
            "https://pypi.org/pypi/requests/json"
        );
    }

    #[test]
    fn retryable_statuses() {
        assert!(is_retryable(429));
        assert!(is_retryable(503));
        assert!(!is_retryable(404));
        assert!(!is_retryable(200));
    }

    #[test]
    fn user_agent_carries_version() {
        assert!(USER_AGENT.starts_with("thank-you-stars/"));
    }
}
