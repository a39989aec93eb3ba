//! Repository trait and error types.
//!
//! Provides the [`ContentRepository`] trait through which the navigation
//! engine reads navigation items, their relationships and their rendered
//! variants, along with [`RepositoryError`] for unified error handling across
//! backends.
//!
//! Lookups that may legitimately find nothing return `Ok(None)`; the caller
//! decides whether an absent value is fatal or best-effort.

use serde::{Deserialize, Serialize};

use crate::ids::{ContentId, FolderId, VariantId};

/// Basic metadata of a content item.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NodeSummary {
    /// Content id.
    pub id: ContentId,
    /// Current revision.
    pub revision: u32,
    /// Display name (title).
    pub name: String,
    /// Content type id (navtree, navon, or anything else).
    pub content_type_id: u64,
    /// Owning community, if any.
    pub community_id: Option<u64>,
}

/// Reference to the structural container of a navigation item.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ParentRef {
    /// Content id of the parent navigation item.
    pub id: ContentId,
}

/// Reference to a child navigation item, in persisted order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ChildRef {
    /// Content id of the child.
    pub id: ContentId,
    /// Folder holding the child, if known.
    pub folder_id: Option<FolderId>,
    /// Slot the child is related through, if known.
    pub slot: Option<String>,
}

impl ChildRef {
    /// Create a child reference without folder or slot information.
    #[must_use]
    pub fn new(id: ContentId) -> Self {
        Self {
            id,
            folder_id: None,
            slot: None,
        }
    }

    /// Attach folder id.
    #[must_use]
    pub fn with_folder(mut self, folder_id: FolderId) -> Self {
        self.folder_id = Some(folder_id);
        self
    }

    /// Attach slot name.
    #[must_use]
    pub fn with_slot(mut self, slot: impl Into<String>) -> Self {
        self.slot = Some(slot.into());
        self
    }
}

/// Semantic error categories.
#[derive(Debug, PartialEq, Eq)]
#[non_exhaustive]
pub enum RepositoryErrorKind {
    /// Item does not exist.
    NotFound,
    /// An item has more than one structural parent.
    DuplicateParent,
    /// Backend is unavailable (connection, I/O).
    Unavailable,
    /// Backend returned data that cannot be interpreted.
    InvalidData,
    /// Other/unknown error category.
    Other,
}

/// Repository error with semantic kind and backend-specific source.
#[derive(Debug)]
pub struct RepositoryError {
    /// Semantic error category.
    pub kind: RepositoryErrorKind,
    /// Content id context (if applicable).
    pub id: Option<ContentId>,
    /// Backend identifier (e.g., "Snapshot", "Mock").
    pub backend: Option<&'static str>,
    source: Option<Box<dyn std::error::Error + Send + Sync>>,
}

impl RepositoryError {
    /// Create a new repository error.
    #[must_use]
    pub fn new(kind: RepositoryErrorKind) -> Self {
        Self {
            kind,
            id: None,
            backend: None,
            source: None,
        }
    }

    /// Attach content id context.
    #[must_use]
    pub fn with_id(mut self, id: ContentId) -> Self {
        self.id = Some(id);
        self
    }

    /// Attach backend identifier.
    #[must_use]
    pub fn with_backend(mut self, backend: &'static str) -> Self {
        self.backend = Some(backend);
        self
    }

    /// Attach the underlying error source.
    #[must_use]
    pub fn with_source(mut self, source: impl std::error::Error + Send + Sync + 'static) -> Self {
        self.source = Some(Box::new(source));
        self
    }

    /// Attach a plain message as the error source.
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.source = Some(message.into().into());
        self
    }

    /// Downcast the source error to a concrete type.
    #[must_use]
    pub fn downcast_source<E: std::error::Error + 'static>(&self) -> Option<&E> {
        self.source.as_ref()?.downcast_ref()
    }

    /// Create a not found error for a content id.
    #[must_use]
    pub fn not_found(id: ContentId) -> Self {
        Self::new(RepositoryErrorKind::NotFound).with_id(id)
    }
}

impl std::fmt::Display for RepositoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        // Format: "[Backend] Kind: message (id: 42)"
        if let Some(backend) = self.backend {
            write!(f, "[{backend}] ")?;
        }

        let kind_str = match self.kind {
            RepositoryErrorKind::NotFound => "Not found",
            RepositoryErrorKind::DuplicateParent => "Duplicate parent",
            RepositoryErrorKind::Unavailable => "Unavailable",
            RepositoryErrorKind::InvalidData => "Invalid data",
            RepositoryErrorKind::Other => "Error",
        };

        write!(f, "{kind_str}")?;

        if let Some(source) = &self.source {
            write!(f, ": {source}")?;
        }

        if let Some(id) = self.id {
            write!(f, " (id: {id})")?;
        }

        Ok(())
    }
}

impl std::error::Error for RepositoryError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.source
            .as_ref()
            .map(|s| s.as_ref() as &(dyn std::error::Error + 'static))
    }
}

/// Content repository holding navigation items and their relationships.
///
/// Every call blocks the calling thread. Implementations must be safe to
/// share across concurrent requests.
pub trait ContentRepository: Send + Sync {
    /// Fetch basic metadata for a content item.
    ///
    /// Returns `Ok(None)` if the item does not exist.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the backend cannot be queried.
    fn load_node_summary(&self, id: ContentId) -> Result<Option<NodeSummary>, RepositoryError>;

    /// List every structural container of an item.
    ///
    /// A well-formed navigation structure yields at most one entry.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the backend cannot be queried.
    fn structural_parents(&self, id: ContentId) -> Result<Vec<ParentRef>, RepositoryError>;

    /// Find the unique structural container of an item.
    ///
    /// # Errors
    ///
    /// Returns a [`RepositoryErrorKind::DuplicateParent`] error when more than
    /// one container is found, or any error from [`Self::structural_parents`].
    fn find_structural_parent(&self, id: ContentId) -> Result<Option<ParentRef>, RepositoryError> {
        let mut parents = self.structural_parents(id)?;
        match parents.len() {
            0 | 1 => Ok(parents.pop()),
            count => Err(RepositoryError::new(RepositoryErrorKind::DuplicateParent)
                .with_id(id)
                .with_message(format!("{count} structural parents"))),
        }
    }

    /// Enumerate the children of a navigation item in persisted order.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the backend cannot be queried.
    fn find_child_links(&self, parent: ContentId) -> Result<Vec<ChildRef>, RepositoryError>;

    /// Render a template variant of an item.
    ///
    /// Returns `Ok(None)` if the variant does not apply to the item.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if rendering fails.
    fn render_variant(
        &self,
        variant: VariantId,
        item: ContentId,
    ) -> Result<Option<String>, RepositoryError>;

    /// URL template of a variant.
    ///
    /// Returns `Ok(None)` if the variant is unknown.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the backend cannot be queried.
    fn variant_url(&self, variant: VariantId) -> Result<Option<String>, RepositoryError>;

    /// Theme configured for a site.
    ///
    /// Default implementation knows no themes.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryError`] if the backend cannot be queried.
    fn lookup_theme(&self, _site_id: &str) -> Result<Option<String>, RepositoryError> {
        Ok(None)
    }
}
