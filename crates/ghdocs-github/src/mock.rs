//! Mock tree source implementation for testing.
//!
//! Provides [`MockTreeSource`] for unit testing without network access.

use std::collections::HashMap;
use std::sync::{Mutex, RwLock};

use crate::error::SourceError;
use crate::source::{RepoTreeSource, TreeEntry};

/// Operation of [`RepoTreeSource`], used to target injected failures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MockOperation {
    /// [`RepoTreeSource::branches`].
    Branches,
    /// [`RepoTreeSource::tree`].
    Tree,
    /// [`RepoTreeSource::blob`].
    Blob,
}

/// A recorded call against [`MockTreeSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockCall {
    /// Branch listing for `owner/repo`.
    Branches {
        /// Repository owner.
        owner: String,
        /// Repository name.
        repo: String,
    },
    /// Tree listing of `sha`.
    Tree {
        /// Repository owner.
        owner: String,
        /// Repository name.
        repo: String,
        /// Requested tree SHA.
        sha: String,
    },
    /// Blob fetch of `sha`.
    Blob {
        /// Repository owner.
        owner: String,
        /// Repository name.
        repo: String,
        /// Requested blob SHA.
        sha: String,
    },
}

impl MockCall {
    fn operation(&self) -> MockOperation {
        match self {
            Self::Branches { .. } => MockOperation::Branches,
            Self::Tree { .. } => MockOperation::Tree,
            Self::Blob { .. } => MockOperation::Blob,
        }
    }
}

/// Mock tree source for testing.
///
/// Stores branches, trees, and blobs in memory and records every call. The
/// mock serves the same data for any owner/repo; recorded calls keep the
/// owner/repo so tests can assert on them. Unknown tree or blob SHAs fail
/// with a 404 [`SourceError::HttpResponse`], as the GitHub API does.
///
/// # Example
///
/// ```ignore
/// use ghdocs_github::{MockTreeSource, RepoTreeSource, TreeEntry};
///
/// let source = MockTreeSource::new()
///     .with_branch("master", "C1")
///     .with_tree("C1", vec![TreeEntry::blob("intro.md", "B1")])
///     .with_blob("B1", "# Intro");
///
/// let tree = source.tree("laravel", "docs", "C1").unwrap();
/// assert_eq!(source.tree_calls(), 1);
/// ```
#[derive(Debug, Default)]
pub struct MockTreeSource {
    branches: RwLock<HashMap<String, String>>,
    trees: RwLock<HashMap<String, Vec<TreeEntry>>>,
    blobs: RwLock<HashMap<String, String>>,
    failures: RwLock<HashMap<MockOperation, String>>,
    calls: Mutex<Vec<MockCall>>,
}

impl MockTreeSource {
    /// Create a new empty mock source.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a branch pointing at `sha`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_branch(self, name: impl Into<String>, sha: impl Into<String>) -> Self {
        self.branches
            .write()
            .unwrap()
            .insert(name.into(), sha.into());
        self
    }

    /// Add a tree listing for `sha`, returned in the given order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_tree(self, sha: impl Into<String>, entries: Vec<TreeEntry>) -> Self {
        self.trees.write().unwrap().insert(sha.into(), entries);
        self
    }

    /// Add raw blob content for `sha`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_blob(self, sha: impl Into<String>, content: impl Into<String>) -> Self {
        self.blobs
            .write()
            .unwrap()
            .insert(sha.into(), content.into());
        self
    }

    /// Make every call of `operation` fail with a 503 carrying `message`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failure(self, operation: MockOperation, message: impl Into<String>) -> Self {
        self.failures
            .write()
            .unwrap()
            .insert(operation, message.into());
        self
    }

    /// All recorded calls, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn calls(&self) -> Vec<MockCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of recorded branch listings.
    #[must_use]
    pub fn branch_calls(&self) -> usize {
        self.count(MockOperation::Branches)
    }

    /// Number of recorded tree listings.
    #[must_use]
    pub fn tree_calls(&self) -> usize {
        self.count(MockOperation::Tree)
    }

    /// Number of recorded blob fetches.
    #[must_use]
    pub fn blob_calls(&self) -> usize {
        self.count(MockOperation::Blob)
    }

    /// Number of recorded calls of any kind.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn total_calls(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    fn count(&self, operation: MockOperation) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.operation() == operation)
            .count()
    }

    fn record(&self, call: MockCall) -> Result<(), SourceError> {
        let operation = call.operation();
        self.calls.lock().unwrap().push(call);

        match self.failures.read().unwrap().get(&operation) {
            Some(message) => Err(SourceError::HttpResponse {
                status: 503,
                body: message.clone(),
            }),
            None => Ok(()),
        }
    }
}

fn not_found(what: &str, sha: &str) -> SourceError {
    SourceError::HttpResponse {
        status: 404,
        body: format!("{what} {sha} not found"),
    }
}

impl RepoTreeSource for MockTreeSource {
    fn branches(&self, owner: &str, repo: &str) -> Result<HashMap<String, String>, SourceError> {
        self.record(MockCall::Branches {
            owner: owner.to_owned(),
            repo: repo.to_owned(),
        })?;
        Ok(self.branches.read().unwrap().clone())
    }

    fn tree(&self, owner: &str, repo: &str, sha: &str) -> Result<Vec<TreeEntry>, SourceError> {
        self.record(MockCall::Tree {
            owner: owner.to_owned(),
            repo: repo.to_owned(),
            sha: sha.to_owned(),
        })?;
        self.trees
            .read()
            .unwrap()
            .get(sha)
            .cloned()
            .ok_or_else(|| not_found("tree", sha))
    }

    fn blob(&self, owner: &str, repo: &str, sha: &str) -> Result<String, SourceError> {
        self.record(MockCall::Blob {
            owner: owner.to_owned(),
            repo: repo.to_owned(),
            sha: sha.to_owned(),
        })?;
        self.blobs
            .read()
            .unwrap()
            .get(sha)
            .cloned()
            .ok_or_else(|| not_found("blob", sha))
    }
}
