//! Documentation page resolution.
//!
//! [`DocResolver`] maps a `(page, section, branch)` triple to the raw markdown
//! of a file in a hosted repository, using the cache first and walking the
//! remote tree only on a miss:
//!
//! ```text
//! cache.get(key) ──hit──▶ return
//!      │ miss
//!      ▼
//! branches() ─▶ tree(branch sha) ─▶ [tree(section sha)] ─▶ blob(page sha)
//!      │
//!      ▼
//! cache.put(key, markdown, ttl) ─▶ return
//! ```
//!
//! At most four remote calls are made per miss, none on a hit. Nothing is
//! cached when the page cannot be found.

use std::sync::Arc;
use std::time::Duration;

use ghdocs_cache::CacheStore;
use ghdocs_github::{EntryKind, RepoTreeSource, SourceError, TreeEntry};
use tracing::{debug, info};

use crate::error::ResolveError;
use crate::key::{CacheKey, PAGE_EXTENSION};

/// Branch used when the caller does not name one.
pub const DEFAULT_BRANCH: &str = "master";

/// How long a resolved page stays cached.
pub const DEFAULT_TTL: Duration = Duration::from_secs(60);

/// Repository the documentation lives in.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepoRef {
    /// Repository owner (e.g., "laravel").
    pub owner: String,
    /// Repository name (e.g., "docs").
    pub repo: String,
}

impl RepoRef {
    /// Create a repository reference.
    #[must_use]
    pub fn new(owner: impl Into<String>, repo: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            repo: repo.into(),
        }
    }
}

impl Default for RepoRef {
    fn default() -> Self {
        Self::new("laravel", "docs")
    }
}

/// Resolves documentation pages through a [`RepoTreeSource`], cache-aside.
///
/// Holds no per-call state, so one resolver can serve concurrent callers.
/// Concurrent misses for the same key may each fetch and write the page;
/// the writes are identical overwrites.
pub struct DocResolver {
    source: Arc<dyn RepoTreeSource>,
    cache: Arc<dyn CacheStore>,
    repo: RepoRef,
    ttl: Duration,
}

impl DocResolver {
    /// Create a resolver over `source`, caching in `cache`.
    #[must_use]
    pub fn new(source: Arc<dyn RepoTreeSource>, cache: Arc<dyn CacheStore>, repo: RepoRef) -> Self {
        Self {
            source,
            cache,
            repo,
            ttl: DEFAULT_TTL,
        }
    }

    /// Override the cache time-to-live (defaults to [`DEFAULT_TTL`]).
    #[must_use]
    pub fn with_ttl(mut self, ttl: Duration) -> Self {
        self.ttl = ttl;
        self
    }

    /// Repository pages are resolved from.
    #[must_use]
    pub fn repo(&self) -> &RepoRef {
        &self.repo
    }

    /// Get a page's markdown.
    ///
    /// # Arguments
    ///
    /// * `page` - Page name without extension (e.g., "installation")
    /// * `section` - Section directory at the repository root, or `None`
    /// * `branch` - Branch name (e.g., "master")
    ///
    /// # Returns
    ///
    /// - `Ok(Some(markdown))` - from the cache, or resolved and then cached
    /// - `Ok(None)` - the branch, section, or page does not exist
    ///
    /// # Errors
    ///
    /// Returns [`ResolveError`] when the tree source or the cache fails. No
    /// retry is attempted.
    pub fn page(
        &self,
        page: &str,
        section: Option<&str>,
        branch: &str,
    ) -> Result<Option<String>, ResolveError> {
        let file_name = format!("{page}{PAGE_EXTENSION}");
        let key = CacheKey::new(section, &file_name, branch);

        if let Some(cached) = self.cache.get(key.as_str())? {
            debug!(%key, "page cache hit");
            return Ok(Some(cached));
        }
        debug!(%key, "page cache miss");

        let Some(markdown) = self.resolve(&file_name, section, branch)? else {
            debug!(%key, "page not found");
            return Ok(None);
        };

        self.cache.put(key.as_str(), &markdown, self.ttl)?;
        info!(%key, ttl_secs = self.ttl.as_secs(), "cached page");

        Ok(Some(markdown))
    }

    /// Get a page's markdown from [`DEFAULT_BRANCH`].
    ///
    /// # Errors
    ///
    /// See [`DocResolver::page`].
    pub fn page_default(
        &self,
        page: &str,
        section: Option<&str>,
    ) -> Result<Option<String>, ResolveError> {
        self.page(page, section, DEFAULT_BRANCH)
    }

    /// Walk branch -> root tree -> optional section tree -> blob.
    fn resolve(
        &self,
        file_name: &str,
        section: Option<&str>,
        branch: &str,
    ) -> Result<Option<String>, SourceError> {
        let Some(sha) = self.branch_sha(branch)? else {
            debug!(branch, "branch not found");
            return Ok(None);
        };

        let root = self.source.tree(&self.repo.owner, &self.repo.repo, &sha)?;

        let tree = match section {
            None => root,
            Some(section) => match self.section_tree(section, &root)? {
                Some(tree) => tree,
                None => {
                    debug!(section, "section not found");
                    return Ok(None);
                }
            },
        };

        self.page_from_tree(file_name, &tree)
    }

    /// SHA of the tip of `branch`, if the branch exists.
    fn branch_sha(&self, branch: &str) -> Result<Option<String>, SourceError> {
        let mut branches = self.source.branches(&self.repo.owner, &self.repo.repo)?;
        Ok(branches.remove(branch))
    }

    /// Entries of the directory named `section` in `tree`.
    fn section_tree(
        &self,
        section: &str,
        tree: &[TreeEntry],
    ) -> Result<Option<Vec<TreeEntry>>, SourceError> {
        let Some(entry) = find_entry(tree, section, EntryKind::Tree) else {
            return Ok(None);
        };
        self.source
            .tree(&self.repo.owner, &self.repo.repo, &entry.sha)
            .map(Some)
    }

    /// Raw content of the file named `file_name` in `tree`.
    fn page_from_tree(
        &self,
        file_name: &str,
        tree: &[TreeEntry],
    ) -> Result<Option<String>, SourceError> {
        let Some(entry) = find_entry(tree, file_name, EntryKind::Blob) else {
            return Ok(None);
        };
        self.source
            .blob(&self.repo.owner, &self.repo.repo, &entry.sha)
            .map(Some)
    }
}

/// First entry in listing order with the given name and kind.
///
/// When a listing holds several matching entries, the earliest wins.
#[must_use]
pub fn find_entry<'a>(
    entries: &'a [TreeEntry],
    name: &str,
    kind: EntryKind,
) -> Option<&'a TreeEntry> {
    entries
        .iter()
        .find(|entry| entry.kind == kind && entry.name == name)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use ghdocs_cache::{CacheError, MemoryCache};
    use ghdocs_github::{MockOperation, MockTreeSource};
    use pretty_assertions::assert_eq;

    use super::*;

    /// Memory cache that records writes.
    #[derive(Default)]
    struct RecordingCache {
        inner: MemoryCache,
        puts: Mutex<Vec<(String, String, Duration)>>,
    }

    impl RecordingCache {
        fn puts(&self) -> Vec<(String, String, Duration)> {
            self.puts.lock().unwrap().clone()
        }
    }

    impl CacheStore for RecordingCache {
        fn get(&self, key: &str) -> Result<Option<String>, CacheError> {
            self.inner.get(key)
        }

        fn put(&self, key: &str, value: &str, ttl: Duration) -> Result<(), CacheError> {
            self.puts
                .lock()
                .unwrap()
                .push((key.to_owned(), value.to_owned(), ttl));
            self.inner.put(key, value, ttl)
        }
    }

    /// Cache whose every operation fails.
    struct BrokenCache;

    impl CacheStore for BrokenCache {
        fn get(&self, _key: &str) -> Result<Option<String>, CacheError> {
            Err(CacheError::Poisoned)
        }

        fn put(&self, _key: &str, _value: &str, _ttl: Duration) -> Result<(), CacheError> {
            Err(CacheError::Poisoned)
        }
    }

    /// Repository with a root page, a section, and a few traps.
    fn docs_source() -> MockTreeSource {
        MockTreeSource::new()
            .with_branch("master", "C-master")
            .with_branch("develop", "C-develop")
            .with_tree(
                "C-master",
                vec![
                    TreeEntry::blob("installation.md", "B-install"),
                    TreeEntry::tree("quickstart", "T-quick-master"),
                    TreeEntry::tree("routing.md", "T-weird"),
                    TreeEntry::blob("guide", "B-guide-file"),
                ],
            )
            .with_tree("C-develop", vec![TreeEntry::tree("quickstart", "S1")])
            .with_tree("T-quick-master", vec![TreeEntry::blob("intro.md", "B-intro-master")])
            .with_tree("S1", vec![TreeEntry::blob("intro.md", "S2")])
            .with_blob("B-install", "# Installation")
            .with_blob("B-intro-master", "# Intro (master)")
            .with_blob("S2", "# Intro")
    }

    fn resolver(source: &Arc<MockTreeSource>, cache: &Arc<RecordingCache>) -> DocResolver {
        DocResolver::new(
            Arc::clone(source) as Arc<dyn RepoTreeSource>,
            Arc::clone(cache) as Arc<dyn CacheStore>,
            RepoRef::default(),
        )
    }

    fn setup() -> (Arc<MockTreeSource>, Arc<RecordingCache>, DocResolver) {
        let source = Arc::new(docs_source());
        let cache = Arc::new(RecordingCache::default());
        let resolver = resolver(&source, &cache);
        (source, cache, resolver)
    }

    #[test]
    fn test_section_drill_down() {
        let (source, cache, resolver) = setup();

        let page = resolver.page("intro", Some("quickstart"), "develop").unwrap();

        assert_eq!(page.as_deref(), Some("# Intro"));
        assert_eq!(
            cache.get("docs.quickstart.intro.develop").unwrap().as_deref(),
            Some("# Intro")
        );
        assert_eq!(source.branch_calls(), 1);
        assert_eq!(source.tree_calls(), 2);
        assert_eq!(source.blob_calls(), 1);
    }

    #[test]
    fn test_root_page() {
        let (source, cache, resolver) = setup();

        let page = resolver.page("installation", None, "master").unwrap();

        assert_eq!(page.as_deref(), Some("# Installation"));
        assert_eq!(
            cache.puts(),
            vec![(
                "docs.root.installation.master".to_owned(),
                "# Installation".to_owned(),
                DEFAULT_TTL
            )]
        );
        assert_eq!(source.branch_calls(), 1);
        assert_eq!(source.tree_calls(), 1);
        assert_eq!(source.blob_calls(), 1);
    }

    #[test]
    fn test_miss_then_hit() {
        let (source, cache, resolver) = setup();

        let first = resolver.page("intro", Some("quickstart"), "master").unwrap();
        let calls_after_miss = source.total_calls();
        let second = resolver.page("intro", Some("quickstart"), "master").unwrap();

        assert_eq!(first.as_deref(), Some("# Intro (master)"));
        assert_eq!(first, second);
        assert_eq!(calls_after_miss, 4);
        assert_eq!(source.total_calls(), 4);
        assert_eq!(cache.puts().len(), 1);
    }

    #[test]
    fn test_cache_hit_makes_no_remote_calls() {
        let source = Arc::new(MockTreeSource::new());
        let cache = Arc::new(RecordingCache::default());
        cache
            .inner
            .put("docs.root.installation.master", "# Cached", DEFAULT_TTL)
            .unwrap();
        let resolver = resolver(&source, &cache);

        let page = resolver.page("installation", None, "master").unwrap();

        assert_eq!(page.as_deref(), Some("# Cached"));
        assert_eq!(source.total_calls(), 0);
        assert!(cache.puts().is_empty());
    }

    #[test]
    fn test_expired_entry_is_resolved_again() {
        let source = Arc::new(docs_source());
        let cache = Arc::new(RecordingCache::default());
        let resolver = resolver(&source, &cache).with_ttl(Duration::ZERO);

        resolver.page("installation", None, "master").unwrap();
        resolver.page("installation", None, "master").unwrap();

        assert_eq!(source.blob_calls(), 2);
        assert_eq!(cache.puts().len(), 2);
    }

    #[test]
    fn test_with_ttl_is_used_for_writes() {
        let source = Arc::new(docs_source());
        let cache = Arc::new(RecordingCache::default());
        let resolver = resolver(&source, &cache).with_ttl(Duration::from_secs(3600));

        resolver.page("installation", None, "master").unwrap();

        assert_eq!(cache.puts()[0].2, Duration::from_secs(3600));
    }

    #[test]
    fn test_max_ttl_is_accepted() {
        let source = Arc::new(docs_source());
        let cache = Arc::new(RecordingCache::default());
        let resolver = resolver(&source, &cache).with_ttl(Duration::MAX);

        let first = resolver.page("installation", None, "master").unwrap();
        let second = resolver.page("installation", None, "master").unwrap();

        assert_eq!(first.as_deref(), Some("# Installation"));
        assert_eq!(first, second);
        assert_eq!(source.blob_calls(), 1);
    }

    #[test]
    fn test_unknown_branch_returns_none_without_tree_calls() {
        let (source, cache, resolver) = setup();

        let page = resolver.page("installation", None, "no-such-branch").unwrap();

        assert_eq!(page, None);
        assert_eq!(source.branch_calls(), 1);
        assert_eq!(source.tree_calls(), 0);
        assert_eq!(source.blob_calls(), 0);
        assert!(cache.puts().is_empty());
    }

    #[test]
    fn test_unknown_section_returns_none() {
        let (source, cache, resolver) = setup();

        let page = resolver.page("intro", Some("missing"), "master").unwrap();

        assert_eq!(page, None);
        assert_eq!(source.tree_calls(), 1);
        assert_eq!(source.blob_calls(), 0);
        assert!(cache.puts().is_empty());
    }

    #[test]
    fn test_section_must_be_a_tree() {
        let (source, _cache, resolver) = setup();

        // "guide" exists at the root, but as a file
        let page = resolver.page("intro", Some("guide"), "master").unwrap();

        assert_eq!(page, None);
        assert_eq!(source.tree_calls(), 1);
    }

    #[test]
    fn test_page_must_be_a_blob() {
        let (source, _cache, resolver) = setup();

        // "routing.md" exists at the root, but as a directory
        let page = resolver.page("routing", None, "master").unwrap();

        assert_eq!(page, None);
        assert_eq!(source.blob_calls(), 0);
    }

    #[test]
    fn test_missing_page_is_not_cached() {
        let (source, cache, resolver) = setup();

        assert_eq!(resolver.page("nope", None, "master").unwrap(), None);
        assert_eq!(resolver.page("nope", None, "master").unwrap(), None);

        assert!(cache.puts().is_empty());
        // Each not-found call walks the tree again
        assert_eq!(source.branch_calls(), 2);
        assert_eq!(source.tree_calls(), 2);
    }

    #[test]
    fn test_first_matching_entry_wins() {
        let source = Arc::new(
            MockTreeSource::new()
                .with_branch("master", "C1")
                .with_tree(
                    "C1",
                    vec![
                        TreeEntry::tree("faq.md", "T-dir"),
                        TreeEntry::blob("faq.md", "B-first"),
                        TreeEntry::blob("faq.md", "B-second"),
                    ],
                )
                .with_blob("B-first", "first")
                .with_blob("B-second", "second"),
        );
        let cache = Arc::new(RecordingCache::default());

        let page = resolver(&source, &cache).page("faq", None, "master").unwrap();

        assert_eq!(page.as_deref(), Some("first"));
    }

    #[test]
    fn test_page_default_uses_master() {
        let (_source, cache, resolver) = setup();

        let page = resolver.page_default("installation", None).unwrap();

        assert_eq!(page.as_deref(), Some("# Installation"));
        assert_eq!(cache.puts()[0].0, "docs.root.installation.master");
    }

    #[test]
    fn test_repo_is_passed_to_source() {
        let source = Arc::new(docs_source());
        let cache = Arc::new(RecordingCache::default());
        let resolver = DocResolver::new(
            Arc::clone(&source) as Arc<dyn RepoTreeSource>,
            Arc::clone(&cache) as Arc<dyn CacheStore>,
            RepoRef::new("acme", "handbook"),
        );

        resolver.page("installation", None, "master").unwrap();

        assert_eq!(resolver.repo().owner, "acme");
        assert!(source.calls().iter().all(|call| match call {
            ghdocs_github::MockCall::Branches { owner, repo }
            | ghdocs_github::MockCall::Tree { owner, repo, .. }
            | ghdocs_github::MockCall::Blob { owner, repo, .. } => {
                owner == "acme" && repo == "handbook"
            }
        }));
    }

    #[test]
    fn test_source_failure_propagates() {
        let source = Arc::new(docs_source().with_failure(MockOperation::Blob, "boom"));
        let cache = Arc::new(RecordingCache::default());

        let err = resolver(&source, &cache)
            .page("installation", None, "master")
            .unwrap_err();

        assert!(matches!(
            err,
            ResolveError::Source(SourceError::HttpResponse { status: 503, .. })
        ));
        assert_eq!(err.to_string(), "HTTP error: 503 - boom");
        assert!(cache.puts().is_empty());
    }

    #[test]
    fn test_branch_listing_failure_propagates() {
        let source = Arc::new(docs_source().with_failure(MockOperation::Branches, "rate"));
        let cache = Arc::new(RecordingCache::default());

        let result = resolver(&source, &cache).page("installation", None, "master");

        assert!(matches!(result, Err(ResolveError::Source(_))));
        assert_eq!(source.tree_calls(), 0);
    }

    #[test]
    fn test_cache_failure_propagates() {
        let source = Arc::new(docs_source());
        let resolver = DocResolver::new(
            Arc::clone(&source) as Arc<dyn RepoTreeSource>,
            Arc::new(BrokenCache),
            RepoRef::default(),
        );

        let err = resolver.page("installation", None, "master").unwrap_err();

        assert!(matches!(err, ResolveError::Cache(CacheError::Poisoned)));
        assert_eq!(source.total_calls(), 0);
    }

    #[test]
    fn test_find_entry() {
        let entries = vec![
            TreeEntry::tree("a", "T1"),
            TreeEntry::blob("a", "B1"),
            TreeEntry::blob("b", "B2"),
        ];

        let sha = |name, kind| find_entry(&entries, name, kind).map(|e| e.sha.as_str());

        assert_eq!(sha("a", EntryKind::Blob), Some("B1"));
        assert_eq!(sha("a", EntryKind::Tree), Some("T1"));
        assert_eq!(find_entry(&entries, "c", EntryKind::Blob), None);
        assert_eq!(find_entry(&[], "a", EntryKind::Blob), None);
    }

    #[test]
    fn test_resolver_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<DocResolver>();
    }
}
