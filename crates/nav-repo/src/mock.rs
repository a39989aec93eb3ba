//! Mock repository implementation for testing.
//!
//! Provides [`MockRepository`] for unit testing without a snapshot file.

use std::collections::{HashMap, HashSet};
use std::sync::RwLock;
use std::sync::atomic::{AtomicUsize, Ordering};

use crate::ids::{ContentId, FolderId, VariantId};
use crate::repository::{
    ChildRef, ContentRepository, NodeSummary, ParentRef, RepositoryError, RepositoryErrorKind,
};

const BACKEND: &str = "Mock";

/// Mock repository for testing.
///
/// Stores navigation items in memory. Use the builder methods to configure
/// the mock with test data. [`MockRepository::with_child`] records both
/// directions of the relationship; [`MockRepository::with_parent`] adds a
/// parent without a matching child link, which is how broken structures
/// are simulated.
///
/// # Example
///
/// ```ignore
/// use nav_repo::{ContentId, ContentRepository, MockRepository};
///
/// let repo = MockRepository::new()
///     .with_node(1, "Home", 311)
///     .with_node(2, "Products", 310)
///     .with_child(1, 2);
///
/// let children = repo.find_child_links(ContentId(1)).unwrap();
/// ```
#[derive(Debug, Default)]
pub struct MockRepository {
    nodes: RwLock<HashMap<ContentId, NodeSummary>>,
    parents: RwLock<HashMap<ContentId, Vec<ParentRef>>>,
    children: RwLock<HashMap<ContentId, Vec<ChildRef>>>,
    folders: RwLock<HashMap<ContentId, FolderId>>,
    renderings: RwLock<HashMap<(VariantId, ContentId), String>>,
    variant_urls: RwLock<HashMap<VariantId, String>>,
    themes: RwLock<HashMap<String, String>>,
    failing: RwLock<HashSet<ContentId>>,
    summary_calls: AtomicUsize,
    child_calls: AtomicUsize,
    render_calls: AtomicUsize,
}

impl MockRepository {
    /// Create a new empty mock repository.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an item with revision 1.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_node(self, id: u64, name: impl Into<String>, content_type_id: u64) -> Self {
        self.nodes.write().unwrap().insert(
            ContentId(id),
            NodeSummary {
                id: ContentId(id),
                revision: 1,
                name: name.into(),
                content_type_id,
                community_id: None,
            },
        );
        self
    }

    /// Set the revision of an item added earlier.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_revision(self, id: u64, revision: u32) -> Self {
        if let Some(node) = self.nodes.write().unwrap().get_mut(&ContentId(id)) {
            node.revision = revision;
        }
        self
    }

    /// Place an item in a folder. Applies to child links added afterwards.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_folder(self, id: u64, folder_id: u64) -> Self {
        self.folders
            .write()
            .unwrap()
            .insert(ContentId(id), FolderId(folder_id));
        self
    }

    /// Link `child` under `parent`, appended after existing children.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_child(self, parent: u64, child: u64) -> Self {
        let mut link = ChildRef::new(ContentId(child));
        if let Some(folder) = self.folders.read().unwrap().get(&ContentId(child)) {
            link = link.with_folder(*folder);
        }
        self.children
            .write()
            .unwrap()
            .entry(ContentId(parent))
            .or_default()
            .push(link);
        self.parents
            .write()
            .unwrap()
            .entry(ContentId(child))
            .or_default()
            .push(ParentRef {
                id: ContentId(parent),
            });
        self
    }

    /// Record a structural parent without a child link.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_parent(self, child: u64, parent: u64) -> Self {
        self.parents
            .write()
            .unwrap()
            .entry(ContentId(child))
            .or_default()
            .push(ParentRef {
                id: ContentId(parent),
            });
        self
    }

    /// Set the rendering of `variant` for `item`.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_rendering(self, variant: u64, item: u64, output: impl Into<String>) -> Self {
        self.renderings
            .write()
            .unwrap()
            .insert((VariantId(variant), ContentId(item)), output.into());
        self
    }

    /// Set the URL template of a variant.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_variant_url(self, variant: u64, url: impl Into<String>) -> Self {
        self.variant_urls
            .write()
            .unwrap()
            .insert(VariantId(variant), url.into());
        self
    }

    /// Set the theme of a site.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_theme(self, site_id: impl Into<String>, theme: impl Into<String>) -> Self {
        self.themes
            .write()
            .unwrap()
            .insert(site_id.into(), theme.into());
        self
    }

    /// Make every query about `id` fail with an unavailable error.
    ///
    /// # Panics
    ///
    /// Panics if the internal lock is poisoned.
    #[must_use]
    pub fn with_failure(self, id: u64) -> Self {
        self.failing.write().unwrap().insert(ContentId(id));
        self
    }

    /// Number of `load_node_summary` calls so far.
    #[must_use]
    pub fn summary_calls(&self) -> usize {
        self.summary_calls.load(Ordering::Relaxed)
    }

    /// Number of `find_child_links` calls so far.
    #[must_use]
    pub fn child_calls(&self) -> usize {
        self.child_calls.load(Ordering::Relaxed)
    }

    /// Number of `render_variant` calls so far.
    #[must_use]
    pub fn render_calls(&self) -> usize {
        self.render_calls.load(Ordering::Relaxed)
    }

    fn check(&self, id: ContentId) -> Result<(), RepositoryError> {
        if self.failing.read().unwrap().contains(&id) {
            return Err(RepositoryError::new(RepositoryErrorKind::Unavailable)
                .with_backend(BACKEND)
                .with_id(id)
                .with_message("simulated failure"));
        }
        Ok(())
    }
}

impl ContentRepository for MockRepository {
    fn load_node_summary(&self, id: ContentId) -> Result<Option<NodeSummary>, RepositoryError> {
        self.summary_calls.fetch_add(1, Ordering::Relaxed);
        self.check(id)?;
        Ok(self.nodes.read().unwrap().get(&id).cloned())
    }

    fn structural_parents(&self, id: ContentId) -> Result<Vec<ParentRef>, RepositoryError> {
        self.check(id)?;
        Ok(self
            .parents
            .read()
            .unwrap()
            .get(&id)
            .cloned()
            .unwrap_or_default())
    }

    fn find_child_links(&self, parent: ContentId) -> Result<Vec<ChildRef>, RepositoryError> {
        self.child_calls.fetch_add(1, Ordering::Relaxed);
        self.check(parent)?;
        Ok(self
            .children
            .read()
            .unwrap()
            .get(&parent)
            .cloned()
            .unwrap_or_default())
    }

    fn render_variant(
        &self,
        variant: VariantId,
        item: ContentId,
    ) -> Result<Option<String>, RepositoryError> {
        self.render_calls.fetch_add(1, Ordering::Relaxed);
        self.check(item)?;
        Ok(self.renderings.read().unwrap().get(&(variant, item)).cloned())
    }

    fn variant_url(&self, variant: VariantId) -> Result<Option<String>, RepositoryError> {
        Ok(self.variant_urls.read().unwrap().get(&variant).cloned())
    }

    fn lookup_theme(&self, site_id: &str) -> Result<Option<String>, RepositoryError> {
        Ok(self.themes.read().unwrap().get(site_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_with_child_records_both_directions() {
        let repo = MockRepository::new()
            .with_node(1, "Home", 311)
            .with_node(2, "Products", 310)
            .with_folder(2, 20)
            .with_child(1, 2);

        let children = repo.find_child_links(ContentId(1)).unwrap();

        assert_eq!(children, vec![ChildRef::new(ContentId(2)).with_folder(FolderId(20))]);
        assert_eq!(
            repo.find_structural_parent(ContentId(2)).unwrap(),
            Some(ParentRef { id: ContentId(1) })
        );
    }

    #[test]
    fn test_with_parent_creates_duplicate() {
        let repo = MockRepository::new().with_child(1, 3).with_parent(3, 2);

        let err = repo.find_structural_parent(ContentId(3)).unwrap_err();

        assert_eq!(err.kind, RepositoryErrorKind::DuplicateParent);
    }

    #[test]
    fn test_failure_is_unavailable() {
        let repo = MockRepository::new().with_node(1, "Home", 311).with_failure(1);

        let err = repo.load_node_summary(ContentId(1)).unwrap_err();

        assert_eq!(err.kind, RepositoryErrorKind::Unavailable);
        assert_eq!(err.backend, Some("Mock"));
    }

    #[test]
    fn test_call_counters() {
        let repo = MockRepository::new().with_rendering(510, 1, "<navinfo/>");

        let _ = repo.load_node_summary(ContentId(1));
        let _ = repo.render_variant(VariantId(510), ContentId(1));
        let _ = repo.render_variant(VariantId(510), ContentId(2));

        assert_eq!(repo.summary_calls(), 1);
        assert_eq!(repo.render_calls(), 2);
        assert_eq!(repo.child_calls(), 0);
    }

    #[test]
    fn test_with_revision() {
        let repo = MockRepository::new().with_node(1, "Home", 311).with_revision(1, 3);

        let summary = repo.load_node_summary(ContentId(1)).unwrap().unwrap();

        assert_eq!(summary.revision, 3);
    }
}
