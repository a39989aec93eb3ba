//! Managed navigation engine.
//!
//! Builds classified navigation trees from a [`ContentRepository`] and
//! renders them as XML documents ready for the current request.
//!
//! # Architecture
//!
//! - [`NodeType`] and [`AncestorChain`] classify nodes relative to the node
//!   being rendered ("self")
//! - [`TreeLinker`] walks up to the root, then builds the tree top-down
//! - [`compose`], [`override_theme`] and [`relink`] turn a tree into a
//!   render-ready [`XmlElement`]
//! - [`Navigator`] ties these together with a tree cache
//!
//! # Example
//!
//! ```ignore
//! use std::sync::Arc;
//! use nav_repo::{ContentId, QueryUrlBuilder, RequestContext, SnapshotRepository};
//! use nav_tree::{NavSettings, Navigator};
//!
//! let repo = SnapshotRepository::from_path("navigation.yaml".as_ref())?;
//! let navigator = Navigator::new(
//!     Arc::new(repo),
//!     Arc::new(QueryUrlBuilder::new("http://127.0.0.1:9992/Rhythmyx")),
//!     NavSettings::default(),
//! );
//! let xml = navigator.render(ContentId(42), &RequestContext::new())?;
//! ```
//!
//! [`ContentRepository`]: nav_repo::ContentRepository
//! [`XmlElement`]: nav_xml::XmlElement

mod cache;
mod classify;
mod compose;
mod error;
mod info;
mod linker;
mod model;
mod navigator;
mod settings;

pub use cache::{FileTreeCache, NullTreeCache, TreeCache};
pub use classify::{AncestorChain, NodeType};
pub use compose::{LinkParams, compose, override_theme, relink};
pub use error::{NavError, StructureError};
pub use info::NodeInfo;
pub use linker::TreeLinker;
pub use model::{ImageLink, LandingPage, NavNode, NavTree, NodeIter};
pub use navigator::Navigator;
pub use settings::NavSettings;
