//! Branch operations for GitHub API.

use std::collections::HashMap;

use serde::Deserialize;
use tracing::{info, warn};

use super::{ACCEPT_JSON, GithubClient};
use crate::error::SourceError;

/// Branches requested per page (GitHub maximum).
const PER_PAGE: usize = 100;

/// Upper bound on pages followed for a single listing.
const MAX_PAGES: usize = 50;

/// Branch as returned by `GET /repos/{owner}/{repo}/branches`.
#[derive(Debug, Deserialize)]
struct Branch {
    name: String,
    commit: CommitRef,
}

#[derive(Debug, Deserialize)]
struct CommitRef {
    sha: String,
}

impl GithubClient {
    /// List all branches, following pagination, as `name -> tip SHA`.
    pub(crate) fn list_branches(
        &self,
        owner: &str,
        repo: &str,
    ) -> Result<HashMap<String, String>, SourceError> {
        let mut branches = HashMap::new();

        for page in 1..=MAX_PAGES {
            let url = format!(
                "{}/branches?per_page={PER_PAGE}&page={page}",
                self.repo_url(owner, repo)
            );
            let batch = parse_branches(&self.get(&url, ACCEPT_JSON)?)?;
            let count = batch.len();
            branches.extend(batch);

            if count < PER_PAGE {
                info!("Found {} branches in {owner}/{repo}", branches.len());
                return Ok(branches);
            }
        }

        warn!("Branch listing for {owner}/{repo} exceeded {MAX_PAGES} pages, result truncated");
        Ok(branches)
    }
}

/// Decode one page of the branch listing into `(name, sha)` pairs.
fn parse_branches(body: &str) -> Result<Vec<(String, String)>, SourceError> {
    let branches: Vec<Branch> = serde_json::from_str(body)?;
    Ok(branches
        .into_iter()
        .map(|b| (b.name, b.commit.sha))
        .collect())
}
