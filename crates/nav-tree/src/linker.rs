//! Navigation tree construction.
//!
//! [`TreeLinker`] builds a [`NavTree`] for one navigation item in two passes:
//!
//! 1. Walk up through structural parents until an item of the navtree content
//!    type is found, recording the [`AncestorChain`].
//! 2. Descend from the root in repository order, classifying every child
//!    against the chain and attaching links parsed from its info rendering.
//!
//! If the upward walk runs out of parents before reaching a navtree item, the
//! last item visited becomes the root.
//!
//! The ancestor chain is always loaded, even below `max_depth`; only the
//! chain item itself is followed past the limit.

use std::collections::HashSet;

use nav_repo::{ContentId, ContentRepository, NodeSummary, RequestContext};

use crate::classify::{AncestorChain, NodeType};
use crate::error::{NavError, StructureError};
use crate::info::NodeInfo;
use crate::model::{NavNode, NavTree};
use crate::settings::NavSettings;

/// Builds classified navigation trees from a content repository.
pub struct TreeLinker<'a> {
    repo: &'a dyn ContentRepository,
    settings: &'a NavSettings,
}

/// Position of a node being built.
#[derive(Clone, Copy)]
struct Placement {
    node_type: NodeType,
    relative_level: i32,
    absolute_level: u32,
}

impl<'a> TreeLinker<'a> {
    /// Create a linker reading from `repo`.
    #[must_use]
    pub fn new(repo: &'a dyn ContentRepository, settings: &'a NavSettings) -> Self {
        Self { repo, settings }
    }

    /// Build the tree containing `start`, with `start` as self.
    ///
    /// # Errors
    ///
    /// Returns [`NavError::Lookup`] when a repository call fails or an item
    /// is missing, and [`NavError::InvalidStructure`] on duplicate parents,
    /// multiple navons in one folder, parent cycles, a start item that is not
    /// a navigation item, or a start item its parent does not list as child.
    pub fn link(&self, start: ContentId, request: &RequestContext) -> Result<NavTree, NavError> {
        let start_summary = self.summary(start, "start node")?;
        if !self.settings.is_navigation_type(start_summary.content_type_id) {
            return Err(StructureError::NotNavigation {
                id: start,
                content_type_id: start_summary.content_type_id,
            }
            .into());
        }
        let (chain, root_summary) = self.ancestor_chain(start_summary)?;

        let depth = i32::try_from(chain.depth()).unwrap_or(i32::MAX);
        let root_type = if depth == 0 {
            NodeType::SelfNode
        } else {
            NodeType::Root
        };
        let root_info = self.node_info(root_summary.id);

        // Request overrides are applied when composing, not stored.
        let theme = root_info.theme.clone();
        let variable_selector = root_info.variable_selector.clone();
        let image_selector = root_info.image_selector.clone();

        let mut seen = HashSet::from([root_summary.id]);
        let root = self.build_node(
            root_summary,
            root_info,
            Placement {
                node_type: root_type,
                relative_level: -depth,
                absolute_level: 0,
            },
            &chain,
            &mut seen,
        )?;

        if root.find(start).is_none_or(|node| node.node_type != NodeType::SelfNode) {
            return Err(StructureError::SelfNotReached(start).into());
        }

        tracing::debug!(
            content_id = %start,
            root_id = %root.id,
            depth,
            node_count = seen.len(),
            "Navigation tree linked"
        );

        Ok(NavTree {
            root,
            self_id: start,
            theme,
            variable_selector,
            image_selector,
            params: request.standard_params(),
        })
    }

    /// Walk up from `start` until a navtree item or the last parent.
    fn ancestor_chain(
        &self,
        start: NodeSummary,
    ) -> Result<(AncestorChain, NodeSummary), NavError> {
        let mut upward = vec![start.id];
        let mut current = start;

        while current.content_type_id != self.settings.navtree_type {
            let parent = self
                .repo
                .find_structural_parent(current.id)
                .map_err(|e| NavError::repository(format!("parent of {}", current.id), current.id, e))?;
            let Some(parent) = parent else {
                tracing::warn!(
                    content_id = %current.id,
                    "No navtree above navigation item, using it as root"
                );
                break;
            };
            if upward.contains(&parent.id) {
                return Err(StructureError::Cycle(parent.id).into());
            }
            current = self.summary(parent.id, "ancestor")?;
            upward.push(current.id);
        }

        Ok((AncestorChain::from_upward(upward), current))
    }

    fn build_node(
        &self,
        summary: NodeSummary,
        info: NodeInfo,
        placement: Placement,
        chain: &AncestorChain,
        seen: &mut HashSet<ContentId>,
    ) -> Result<NavNode, NavError> {
        let mut node = NavNode {
            id: summary.id,
            revision: summary.revision,
            name: summary.name,
            content_type_id: summary.content_type_id,
            relative_level: placement.relative_level,
            absolute_level: placement.absolute_level,
            node_type: placement.node_type,
            landing_page: info.landing_page,
            info_url: info.info_url,
            images: info.images,
            children: Vec::new(),
        };

        let at_limit = self
            .settings
            .max_depth
            .is_some_and(|max| placement.absolute_level >= max);
        let chain_child = if chain.expected_at(placement.absolute_level) == Some(node.id) {
            chain.expected_at(placement.absolute_level + 1)
        } else {
            None
        };
        if at_limit && chain_child.is_none() {
            return Ok(node);
        }

        let links = self
            .repo
            .find_child_links(node.id)
            .map_err(|e| NavError::repository(format!("children of {}", node.id), node.id, e))?;

        let mut folders = HashSet::new();
        for link in links {
            if at_limit && Some(link.id) != chain_child {
                continue;
            }
            let child = self.summary(link.id, "child")?;
            if !self.settings.is_navigation_type(child.content_type_id) {
                tracing::debug!(
                    parent_id = %node.id,
                    content_id = %child.id,
                    content_type = child.content_type_id,
                    "Skipping non-navigation child"
                );
                continue;
            }
            if !seen.insert(child.id) {
                return Err(StructureError::DuplicateParent(child.id).into());
            }
            if let Some(folder) = link.folder_id
                && !folders.insert(folder)
            {
                return Err(StructureError::MultipleNavons {
                    parent: node.id,
                    folder,
                }
                .into());
            }

            let absolute_level = placement.absolute_level + 1;
            let child_placement = Placement {
                node_type: chain.classify(
                    placement.node_type,
                    placement.relative_level,
                    child.id,
                    absolute_level,
                ),
                relative_level: placement.relative_level + 1,
                absolute_level,
            };
            let child_info = self.node_info(child.id);
            node.children
                .push(self.build_node(child, child_info, child_placement, chain, seen)?);
        }

        Ok(node)
    }

    fn summary(&self, id: ContentId, role: &str) -> Result<NodeSummary, NavError> {
        self.repo
            .load_node_summary(id)
            .map_err(|e| NavError::repository(format!("{role} {id}"), id, e))?
            .ok_or_else(|| NavError::missing(format!("{role} {id}"), id))
    }

    /// Links of a node from its info rendering; misses leave the node bare.
    fn node_info(&self, id: ContentId) -> NodeInfo {
        let rendering = match self.repo.render_variant(self.settings.info_variant, id) {
            Ok(Some(rendering)) => rendering,
            Ok(None) => {
                tracing::debug!(content_id = %id, "No info rendering");
                return NodeInfo::default();
            }
            Err(e) => {
                tracing::warn!(content_id = %id, error = %e, "Failed to render info variant");
                return NodeInfo::default();
            }
        };
        NodeInfo::parse(&rendering).unwrap_or_else(|e| {
            tracing::warn!(content_id = %id, error = %e, "Invalid info rendering");
            NodeInfo::default()
        })
    }
}
