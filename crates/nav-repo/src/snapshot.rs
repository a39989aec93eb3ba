//! Repository backed by a YAML snapshot of navigation content.
//!
//! The snapshot lists navigation items with their children in persisted
//! order, the URL templates of variants and the themes of sites:
//!
//! ```yaml
//! nodes:
//!   - id: 1
//!     name: Home
//!     content_type: 311
//!     folder: 100
//!     children: [2, 3]
//!     info: |
//!       <navinfo><theme>blue</theme></navinfo>
//!   - id: 2
//!     name: Products
//!     content_type: 310
//!     folder: 101
//! variants:
//!   7: assembler/render
//! themes:
//!   "5": blue
//! ```
//!
//! A node's `info` field is returned as its info variant rendering. Structural
//! parents are derived from the `children` lists, so an item listed by two
//! nodes has two parents.

use std::collections::{BTreeMap, HashMap};
use std::path::Path;

use serde::Deserialize;

use crate::ids::{ContentId, FolderId, VariantId};
use crate::repository::{
    ChildRef, ContentRepository, NodeSummary, ParentRef, RepositoryError, RepositoryErrorKind,
};

const BACKEND: &str = "Snapshot";

/// One navigation item as written in the snapshot.
#[derive(Debug, Deserialize)]
struct SnapshotNode {
    id: ContentId,
    name: String,
    #[serde(default = "default_revision")]
    revision: u32,
    content_type: u64,
    #[serde(default)]
    community: Option<u64>,
    #[serde(default)]
    folder: Option<FolderId>,
    #[serde(default)]
    slot: Option<String>,
    #[serde(default)]
    children: Vec<ContentId>,
    #[serde(default)]
    info: Option<String>,
}

fn default_revision() -> u32 {
    1
}

/// Snapshot file layout.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SnapshotFile {
    nodes: Vec<SnapshotNode>,
    variants: BTreeMap<u64, String>,
    themes: BTreeMap<String, String>,
}

/// Read-only repository over a YAML snapshot.
#[derive(Debug)]
pub struct SnapshotRepository {
    nodes: HashMap<ContentId, SnapshotNode>,
    parents: HashMap<ContentId, Vec<ContentId>>,
    variants: BTreeMap<u64, String>,
    themes: BTreeMap<String, String>,
    info_variant: Option<VariantId>,
}

impl SnapshotRepository {
    /// Load a snapshot from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryErrorKind::Unavailable`] if the file cannot be read
    /// and [`RepositoryErrorKind::InvalidData`] if it is not a valid snapshot.
    pub fn from_path(path: &Path) -> Result<Self, RepositoryError> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            RepositoryError::new(RepositoryErrorKind::Unavailable)
                .with_backend(BACKEND)
                .with_source(e)
        })?;
        tracing::debug!(path = %path.display(), "Loading navigation snapshot");
        Self::from_yaml_str(&content)
    }

    /// Parse a snapshot from YAML text.
    ///
    /// # Errors
    ///
    /// Returns [`RepositoryErrorKind::InvalidData`] on malformed YAML or when a
    /// content id appears twice.
    pub fn from_yaml_str(content: &str) -> Result<Self, RepositoryError> {
        let file: SnapshotFile = if content.trim().is_empty() {
            SnapshotFile::default()
        } else {
            serde_yaml::from_str(content).map_err(|e| {
                RepositoryError::new(RepositoryErrorKind::InvalidData)
                    .with_backend(BACKEND)
                    .with_source(e)
            })?
        };

        let mut nodes = HashMap::with_capacity(file.nodes.len());
        let mut parents: HashMap<ContentId, Vec<ContentId>> = HashMap::new();
        for node in file.nodes {
            for child in &node.children {
                parents.entry(*child).or_default().push(node.id);
            }
            let id = node.id;
            if nodes.insert(id, node).is_some() {
                return Err(RepositoryError::new(RepositoryErrorKind::InvalidData)
                    .with_backend(BACKEND)
                    .with_id(id)
                    .with_message("content id listed twice"));
            }
        }

        tracing::debug!(node_count = nodes.len(), "Navigation snapshot loaded");

        Ok(Self {
            nodes,
            parents,
            variants: file.variants,
            themes: file.themes,
            info_variant: None,
        })
    }

    /// Only answer `render_variant` for the given info variant.
    ///
    /// Without this, every variant renders the node's `info` text.
    #[must_use]
    pub fn with_info_variant(mut self, variant: VariantId) -> Self {
        self.info_variant = Some(variant);
        self
    }

    /// Number of items in the snapshot.
    #[must_use]
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Whether the snapshot holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Content ids of every item with the given content type, sorted.
    #[must_use]
    pub fn ids_of_type(&self, content_type_id: u64) -> Vec<ContentId> {
        let mut ids: Vec<_> = self
            .nodes
            .values()
            .filter(|node| node.content_type == content_type_id)
            .map(|node| node.id)
            .collect();
        ids.sort_unstable();
        ids
    }

    fn node(&self, id: ContentId) -> Result<&SnapshotNode, RepositoryError> {
        self.nodes.get(&id).ok_or_else(|| {
            RepositoryError::not_found(id).with_backend(BACKEND)
        })
    }
}

impl ContentRepository for SnapshotRepository {
    fn load_node_summary(&self, id: ContentId) -> Result<Option<NodeSummary>, RepositoryError> {
        Ok(self.nodes.get(&id).map(|node| NodeSummary {
            id: node.id,
            revision: node.revision,
            name: node.name.clone(),
            content_type_id: node.content_type,
            community_id: node.community,
        }))
    }

    fn structural_parents(&self, id: ContentId) -> Result<Vec<ParentRef>, RepositoryError> {
        Ok(self
            .parents
            .get(&id)
            .map(|ids| ids.iter().map(|id| ParentRef { id: *id }).collect())
            .unwrap_or_default())
    }

    fn find_child_links(&self, parent: ContentId) -> Result<Vec<ChildRef>, RepositoryError> {
        let node = self.node(parent)?;
        Ok(node
            .children
            .iter()
            .map(|child_id| {
                let child = self.nodes.get(child_id);
                ChildRef {
                    id: *child_id,
                    folder_id: child.and_then(|c| c.folder),
                    slot: child.and_then(|c| c.slot.clone()),
                }
            })
            .collect())
    }

    fn render_variant(
        &self,
        variant: VariantId,
        item: ContentId,
    ) -> Result<Option<String>, RepositoryError> {
        if self.info_variant.is_some_and(|info| info != variant) {
            return Ok(None);
        }
        Ok(self.node(item)?.info.clone())
    }

    fn variant_url(&self, variant: VariantId) -> Result<Option<String>, RepositoryError> {
        Ok(self.variants.get(&variant.get()).cloned())
    }

    fn lookup_theme(&self, site_id: &str) -> Result<Option<String>, RepositoryError> {
        Ok(self.themes.get(site_id).cloned())
    }
}
