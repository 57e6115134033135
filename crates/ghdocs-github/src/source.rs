//! Repository tree source trait and entry types.
//!
//! # Traversal Model
//!
//! A repository snapshot is walked top-down:
//! - a branch name resolves to the SHA of its tip commit
//! - a commit or tree SHA lists one level of [`TreeEntry`] values
//! - a blob SHA resolves to the raw file content
//!
//! Tree listings are not recursive. Descending into a subdirectory means
//! listing the tree SHA of the corresponding [`EntryKind::Tree`] entry.

use std::collections::HashMap;

use serde::Deserialize;

use crate::error::SourceError;

/// Kind of object a tree entry points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// File content.
    Blob,
    /// Subdirectory.
    Tree,
    /// Submodule commit.
    Commit,
}

/// One entry of a tree listing.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct TreeEntry {
    /// Entry name within its parent tree (e.g., "installation.md", "quickstart").
    #[serde(rename = "path")]
    pub name: String,
    /// Object kind.
    #[serde(rename = "type")]
    pub kind: EntryKind,
    /// Object SHA.
    pub sha: String,
}

impl TreeEntry {
    /// Create a new entry.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: EntryKind, sha: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            kind,
            sha: sha.into(),
        }
    }

    /// Create a blob (file) entry.
    #[must_use]
    pub fn blob(name: impl Into<String>, sha: impl Into<String>) -> Self {
        Self::new(name, EntryKind::Blob, sha)
    }

    /// Create a tree (directory) entry.
    #[must_use]
    pub fn tree(name: impl Into<String>, sha: impl Into<String>) -> Self {
        Self::new(name, EntryKind::Tree, sha)
    }
}

/// Read-only access to a hosted repository's branches, trees, and blobs.
///
/// Implementations handle transport details like HTTP, pagination, and
/// response decoding. Transport failures are reported as [`SourceError`];
/// callers decide whether to retry.
pub trait RepoTreeSource: Send + Sync {
    /// List all branches with the SHA of their tip commit.
    ///
    /// # Arguments
    ///
    /// * `owner` - Repository owner (e.g., "laravel")
    /// * `repo` - Repository name (e.g., "docs")
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the listing cannot be fetched or decoded.
    fn branches(&self, owner: &str, repo: &str) -> Result<HashMap<String, String>, SourceError>;

    /// List the entries of a tree, in the order the backend returns them.
    ///
    /// # Arguments
    ///
    /// * `sha` - Commit or tree SHA
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the SHA is unknown or the request fails.
    fn tree(&self, owner: &str, repo: &str, sha: &str) -> Result<Vec<TreeEntry>, SourceError>;

    /// Fetch the raw content of a blob.
    ///
    /// # Errors
    ///
    /// Returns [`SourceError`] if the SHA is unknown or the request fails.
    fn blob(&self, owner: &str, repo: &str, sha: &str) -> Result<String, SourceError>;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_tree_entry_constructors() {
        assert_eq!(
            TreeEntry::blob("intro.md", "S2"),
            TreeEntry {
                name: "intro.md".to_owned(),
                kind: EntryKind::Blob,
                sha: "S2".to_owned(),
            }
        );
        assert_eq!(TreeEntry::tree("quickstart", "S1").kind, EntryKind::Tree);
    }

    #[test]
    fn test_tree_entry_deserialize_github_shape() {
        let json = r#"{
            "path": "installation.md",
            "mode": "100644",
            "type": "blob",
            "sha": "3d21ec53a331a6f037a91c368710b99387d012c1",
            "size": 1234,
            "url": "https://api.github.com/repos/laravel/docs/git/blobs/3d21ec53"
        }"#;

        let entry: TreeEntry = serde_json::from_str(json).unwrap();

        assert_eq!(
            entry,
            TreeEntry::blob("installation.md", "3d21ec53a331a6f037a91c368710b99387d012c1")
        );
    }

    #[test]
    fn test_entry_kind_deserialize_all_variants() {
        let kinds: Vec<EntryKind> = serde_json::from_str(r#"["blob", "tree", "commit"]"#).unwrap();

        assert_eq!(kinds, vec![EntryKind::Blob, EntryKind::Tree, EntryKind::Commit]);
    }

    #[test]
    fn test_entry_kind_rejects_unknown() {
        let result: Result<EntryKind, _> = serde_json::from_str(r#""symlink""#);

        assert!(result.is_err());
    }
}
