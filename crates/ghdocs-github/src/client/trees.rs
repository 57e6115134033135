//! Git tree and blob operations for GitHub API.

use serde::Deserialize;
use tracing::warn;

use super::{ACCEPT_JSON, ACCEPT_RAW, GithubClient};
use crate::error::SourceError;
use crate::source::TreeEntry;

/// Response of `GET /repos/{owner}/{repo}/git/trees/{sha}`.
#[derive(Debug, Deserialize)]
struct TreeResponse {
    sha: String,
    tree: Vec<TreeEntry>,
    #[serde(default)]
    truncated: bool,
}

impl GithubClient {
    /// List one level of a git tree.
    pub(crate) fn get_tree(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<Vec<TreeEntry>, SourceError> {
        let url = format!("{}/git/trees/{sha}", self.repo_url(owner, repo));
        let response = parse_tree(&self.get(&url, ACCEPT_JSON)?)?;

        if response.truncated {
            warn!(
                "Tree {} in {owner}/{repo} was truncated by the API, some entries are missing",
                response.sha
            );
        }

        Ok(response.tree)
    }

    /// Fetch the raw content of a blob.
    pub(crate) fn get_raw_blob(
        &self,
        owner: &str,
        repo: &str,
        sha: &str,
    ) -> Result<String, SourceError> {
        let url = format!("{}/git/blobs/{sha}", self.repo_url(owner, repo));
        self.get(&url, ACCEPT_RAW)
    }
}

fn parse_tree(body: &str) -> Result<TreeResponse, SourceError> {
    Ok(serde_json::from_str(body)?)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::source::EntryKind;

    #[test]
    fn test_parse_tree_preserves_order() {
        let body = r#"{
            "sha": "9fb037999f264ba9a7fc6274d15fa3ae2ab98312",
            "url": "https://api.github.com/repos/laravel/docs/git/trees/9fb0379",
            "tree": [
                { "path": "readme.md", "mode": "100644", "type": "blob", "sha": "B1", "size": 30 },
                { "path": "quickstart", "mode": "040000", "type": "tree", "sha": "T1" },
                { "path": "installation.md", "mode": "100644", "type": "blob", "sha": "B2", "size": 12 }
            ],
            "truncated": false
        }"#;

        let response = parse_tree(body).unwrap();

        assert!(!response.truncated);
        assert_eq!(
            response.tree,
            vec![
                TreeEntry::blob("readme.md", "B1"),
                TreeEntry::tree("quickstart", "T1"),
                TreeEntry::blob("installation.md", "B2"),
            ]
        );
    }

    #[test]
    fn test_parse_tree_with_submodule() {
        let body = r#"{
            "sha": "abc",
            "tree": [
                { "path": "vendor", "mode": "160000", "type": "commit", "sha": "C1" }
            ]
        }"#;

        let response = parse_tree(body).unwrap();

        assert_eq!(response.tree[0].kind, EntryKind::Commit);
        assert!(!response.truncated);
    }

    #[test]
    fn test_parse_tree_truncated_flag() {
        let body = r#"{ "sha": "abc", "tree": [], "truncated": true }"#;

        assert!(parse_tree(body).unwrap().truncated);
    }

    #[test]
    fn test_parse_tree_malformed() {
        let result = parse_tree(r#"{"message": "Not Found"}"#);

        assert!(matches!(result, Err(SourceError::Json(_))));
    }
}
