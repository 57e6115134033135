//! GitHub REST API client.
//!
//! Provides a sync HTTP client for the read-only parts of the GitHub REST API
//! needed to walk a repository: branches, git trees, and raw blobs.

mod branches;
mod trees;

use std::collections::HashMap;
use std::time::Duration;

use tracing::debug;
use ureq::Agent;
use ureq::http::HeaderMap;

use crate::error::SourceError;
use crate::source::{RepoTreeSource, TreeEntry};

/// Default HTTP timeout in seconds.
const DEFAULT_TIMEOUT: u64 = 30;

/// API version pinned in every request.
const API_VERSION: &str = "2022-11-28";

/// Media type for JSON responses.
const ACCEPT_JSON: &str = "application/vnd.github+json";

/// Media type that makes the blobs endpoint return raw content.
const ACCEPT_RAW: &str = "application/vnd.github.raw";

/// GitHub REST API client.
pub struct GithubClient {
    agent: Agent,
    api_url: String,
    user_agent: String,
}

impl GithubClient {
    /// Create a client for the given API base URL (e.g., `https://api.github.com`).
    #[must_use]
    pub fn new(api_url: &str) -> Self {
        let agent = Agent::config_builder()
            .timeout_global(Some(Duration::from_secs(DEFAULT_TIMEOUT)))
            .http_status_as_error(false)
            .build()
            .into();

        Self {
            agent,
            api_url: api_url.trim_end_matches('/').to_owned(),
            user_agent: concat!("ghdocs/", env!("CARGO_PKG_VERSION")).to_owned(),
        }
    }

    /// Override the `User-Agent` header sent with every request.
    #[must_use]
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Get the repository base URL.
    fn repo_url(&self, owner: &str, repo: &str) -> String {
        format!("{}/repos/{owner}/{repo}", self.api_url)
    }

    /// Issue a GET request and return the response body.
    ///
    /// Error statuses are mapped to [`SourceError::RateLimited`] or
    /// [`SourceError::HttpResponse`].
    fn get(&self, url: &str, accept: &str) -> Result<String, SourceError> {
        debug!("GET {url}");

        let response = self
            .agent
            .get(url)
            .header("Accept", accept)
            .header("User-Agent", &self.user_agent)
            .header("X-GitHub-Api-Version", API_VERSION)
            .call()?;

        let status = response.status().as_u16();
        if is_rate_limited(status, response.headers()) {
            let reset = header_u64(response.headers(), "x-ratelimit-reset");
            return Err(SourceError::RateLimited { reset });
        }

        let mut body_reader = response.into_body();

        if status >= 400 {
            let error_body = body_reader
                .read_to_string()
                .unwrap_or_else(|_| "(unable to read error body)".to_owned());
            return Err(SourceError::HttpResponse {
                status,
                body: error_body,
            });
        }

        Ok(body_reader.read_to_string()?)
    }
}

impl RepoTreeSource for GithubClient {
    fn branches(&self, owner: &str, repo: &str) -> Result<HashMap<String, String>, SourceError> {
        self.list_branches(owner, repo)
    }

    fn tree(&self, owner: &str, repo: &str, sha: &str) -> Result<Vec<TreeEntry>, SourceError> {
        self.get_tree(owner, repo, sha)
    }

    fn blob(&self, owner: &str, repo: &str, sha: &str) -> Result<String, SourceError> {
        self.get_raw_blob(owner, repo, sha)
    }
}

/// GitHub signals an exhausted quota with 403 or 429 and zero remaining calls.
fn is_rate_limited(status: u16, headers: &HeaderMap) -> bool {
    matches!(status, 403 | 429) && header_u64(headers, "x-ratelimit-remaining") == Some(0)
}

fn header_u64(headers: &HeaderMap, name: &str) -> Option<u64> {
    headers.get(name)?.to_str().ok()?.trim().parse().ok()
}
