//! Error types for navigation tree building and rendering.

use nav_repo::{ContentId, FolderId, RepositoryError, RepositoryErrorKind, UrlError};

/// Violation of the navigation structure invariants.
#[derive(Debug, thiserror::Error)]
pub enum StructureError {
    /// An item is reachable through more than one structural parent.
    #[error("duplicate parent of content {0}")]
    DuplicateParent(ContentId),

    /// More than one navigation item lives in the same folder.
    #[error("multiple navons in folder {folder} under content {parent}")]
    MultipleNavons { parent: ContentId, folder: FolderId },

    /// Walking up the parents revisits an item.
    #[error("cycle through content {0}")]
    Cycle(ContentId),

    /// The start item is not a navtree or navon.
    #[error("content {id} of type {content_type_id} is not a navigation item")]
    NotNavigation { id: ContentId, content_type_id: u64 },

    /// Descending from the root never reaches the start item.
    #[error("content {0} is not listed as a child of its parent")]
    SelfNotReached(ContentId),
}

/// Error building or rendering a navigation tree.
#[derive(Debug, thiserror::Error)]
pub enum NavError {
    /// A repository call failed or returned nothing where a value is required.
    #[error("navigation lookup failed: {context}")]
    Lookup {
        context: String,
        #[source]
        source: RepositoryError,
    },

    /// The stored navigation structure is invalid.
    #[error("invalid tree structure: {0}")]
    InvalidStructure(#[from] StructureError),

    /// A stored link URL cannot be rebuilt.
    #[error("link rebuild failed for {url:?}")]
    LinkRebuild {
        url: String,
        #[source]
        source: UrlError,
    },
}

impl NavError {
    /// Wrap a repository error raised while looking up `id`.
    ///
    /// Duplicate parents reported by the repository are structural violations,
    /// everything else is a lookup failure.
    pub(crate) fn repository(context: impl Into<String>, id: ContentId, err: RepositoryError) -> Self {
        if err.kind == RepositoryErrorKind::DuplicateParent {
            return Self::InvalidStructure(StructureError::DuplicateParent(err.id.unwrap_or(id)));
        }
        Self::Lookup {
            context: context.into(),
            source: err,
        }
    }

    /// Lookup failure for an item the repository does not know.
    pub(crate) fn missing(context: impl Into<String>, id: ContentId) -> Self {
        Self::Lookup {
            context: context.into(),
            source: RepositoryError::not_found(id),
        }
    }
}
