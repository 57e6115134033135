//! Cache key construction.
//!
//! Keys have the form `docs.<section>.<page>.<branch>`:
//!
//! - `<section>` is the section name, or `root` when no section is given
//! - `<page>` is the page file name with its `.md` suffix removed
//! - `<branch>` is the branch name, verbatim
//!
//! Section and page names are escaped so that no two distinct
//! `(section, page, branch)` triples map to the same key: `%` becomes `%25`,
//! `.` becomes `%2E`, and an explicit section literally named `root` is
//! written `%72oot`. Names without those characters appear unchanged. The
//! branch is the last component, so dots in it cannot shift the boundaries
//! of the components before it.
//!
//! Compatibility: keys for dotted section or page names (e.g. `5.x-upgrade`
//! becomes `5%2Ex-upgrade`) differ from the plain unescaped form. A cache
//! shared with a writer that does not escape will miss on those pages and
//! refetch them; all other keys are unchanged.

use std::borrow::Cow;
use std::fmt;

/// Literal prefix shared by every documentation cache key.
pub const NAMESPACE: &str = "docs";

/// Section placeholder used for pages at the repository root.
pub const ROOT_SECTION: &str = "root";

/// File extension appended to page identifiers.
pub const PAGE_EXTENSION: &str = ".md";

/// Escaped form of a section that is literally named [`ROOT_SECTION`].
const ESCAPED_ROOT: &str = "%72oot";

/// Cache key identifying one `(section, page, branch)` triple.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey(String);

impl CacheKey {
    /// Build the key for a page.
    ///
    /// # Arguments
    ///
    /// * `section` - Section directory, or `None` for the repository root
    /// * `page_file` - Page file name (e.g., "intro.md"); one trailing `.md` is stripped
    /// * `branch` - Branch name (e.g., "master")
    #[must_use]
    pub fn new(section: Option<&str>, page_file: &str, branch: &str) -> Self {
        let section = match section {
            None => Cow::Borrowed(ROOT_SECTION),
            Some(ROOT_SECTION) => Cow::Borrowed(ESCAPED_ROOT),
            Some(name) => escape(name),
        };
        let page = page_file.strip_suffix(PAGE_EXTENSION).unwrap_or(page_file);

        Self(format!("{NAMESPACE}.{section}.{}.{branch}", escape(page)))
    }

    /// The key as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl AsRef<str> for CacheKey {
    fn as_ref(&self) -> &str {
        &self.0
    }
}

fn escape(component: &str) -> Cow<'_, str> {
    if !component.contains(['.', '%']) {
        return Cow::Borrowed(component);
    }
    Cow::Owned(component.replace('%', "%25").replace('.', "%2E"))
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_key_with_section() {
        let key = CacheKey::new(Some("quickstart"), "intro.md", "develop");

        assert_eq!(key.as_str(), "docs.quickstart.intro.develop");
    }

    #[test]
    fn test_key_without_section_uses_root() {
        let key = CacheKey::new(None, "installation.md", "master");

        assert_eq!(key.as_str(), "docs.root.installation.master");
    }

    #[test]
    fn test_key_strips_extension_once() {
        let key = CacheKey::new(None, "notes.md.md", "master");

        assert_eq!(key.as_str(), "docs.root.notes%2Emd.master");
    }

    #[test]
    fn test_key_without_extension_is_kept() {
        let key = CacheKey::new(None, "readme", "master");

        assert_eq!(key.as_str(), "docs.root.readme.master");
    }

    #[test]
    fn test_key_dotted_page_is_escaped() {
        let key = CacheKey::new(Some("upgrade"), "5.x-upgrade.md", "master");

        assert_eq!(key.as_str(), "docs.upgrade.5%2Ex-upgrade.master");
    }

    #[test]
    fn test_key_branch_with_dots_is_verbatim() {
        let key = CacheKey::new(None, "installation.md", "5.8");

        assert_eq!(key.as_str(), "docs.root.installation.5.8");
    }

    #[test]
    fn test_key_is_deterministic() {
        let a = CacheKey::new(Some("guide"), "routing.md", "master");
        let b = CacheKey::new(Some("guide"), "routing.md", "master");

        assert_eq!(a, b);
        assert_eq!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_explicit_root_section_differs_from_no_section() {
        let implicit = CacheKey::new(None, "intro.md", "master");
        let explicit = CacheKey::new(Some("root"), "intro.md", "master");

        assert_ne!(implicit, explicit);
        assert_eq!(explicit.as_str(), "docs.%72oot.intro.master");
    }

    #[test]
    fn test_dotted_components_do_not_collide() {
        let triples: &[(Option<&str>, &str, &str)] = &[
            (Some("a.b"), "c.md", "d"),
            (Some("a"), "b.c.md", "d"),
            (Some("a"), "b.md", "c.d"),
            (Some("a%2Eb"), "c.md", "d"),
            (Some("%72oot"), "c.md", "d"),
            (Some("root"), "c.md", "d"),
            (None, "c.md", "d"),
            (None, "c", "d"),
        ];

        let keys: HashSet<String> = triples
            .iter()
            .map(|(s, p, b)| CacheKey::new(*s, p, b).to_string())
            .collect();

        // "c.md" and "c" are the same page once the suffix is stripped
        assert_eq!(keys.len(), triples.len() - 1);
    }

    #[test]
    fn test_escape() {
        assert_eq!(escape("plain"), "plain");
        assert_eq!(escape("a.b"), "a%2Eb");
        assert_eq!(escape("100%"), "100%25");
        assert!(matches!(escape("plain"), Cow::Borrowed(_)));
    }
}
