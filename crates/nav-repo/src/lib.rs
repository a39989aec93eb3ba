//! Content repository abstraction for the managed navigation engine.
//!
//! This crate provides the [`ContentRepository`] trait through which the
//! navigation engine reads navigation items, together with the request and
//! link types shared between the engine and its hosts:
//!
//! - **Strong ids** ([`ContentId`], [`FolderId`], [`VariantId`])
//! - **Request context** with the standard `sys_*` parameters
//! - **Link URL handling** ([`parse_link_url`], [`UrlBuilder`])
//!
//! # Architecture
//!
//! The crate provides:
//! - [`ContentRepository`] trait for node summaries, structural parents, child
//!   links, variant renderings and variant URL templates
//! - [`SnapshotRepository`] backed by a YAML snapshot file
//! - [`MockRepository`] for testing (behind `mock` feature flag)
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use nav_repo::{ContentId, ContentRepository, SnapshotRepository};
//!
//! let repo = SnapshotRepository::from_path(Path::new("navigation.yaml"))?;
//! for child in repo.find_child_links(ContentId(1))? {
//!     println!("{}", child.id);
//! }
//! ```

mod ids;
#[cfg(feature = "mock")]
mod mock;
mod repository;
mod request;
mod snapshot;
mod url;

pub use ids::{ContentId, FolderId, VariantId};
#[cfg(feature = "mock")]
pub use mock::MockRepository;
pub use repository::{
    ChildRef, ContentRepository, NodeSummary, ParentRef, RepositoryError, RepositoryErrorKind,
};
pub use request::{RELATED_ITEM_PARAM, RequestContext, StandardParam, StandardParams};
pub use snapshot::SnapshotRepository;
pub use url::{LinkQuery, ParsedUrl, QueryUrlBuilder, UrlBuilder, UrlError, parse_link_url};
