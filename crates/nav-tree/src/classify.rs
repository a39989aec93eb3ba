//! Relational classification of navigation nodes.
//!
//! Every node of a tree is classified relative to the node being rendered
//! ("self"). Classification happens top-down: a child's category follows from
//! its parent's category and relative level, except along the ancestor chain
//! recorded by the upward walk, where the chain itself decides.

use std::fmt;

use nav_repo::ContentId;
use serde::{Deserialize, Serialize};

/// Category of a node relative to the self node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NodeType {
    /// Tree root (when it is not self).
    Root,
    /// Node on the path between root and self.
    Ancestor,
    /// Child of root or an ancestor that is neither on the path nor a sibling.
    AncestorSibling,
    /// Another child of self's parent.
    Sibling,
    /// The node being rendered.
    #[serde(rename = "self")]
    SelfNode,
    /// Node below self.
    Descendant,
    /// Anything else.
    Other,
}

impl NodeType {
    /// Category of a child not on the ancestor chain.
    ///
    /// `parent_relative_level` is the relative level of the parent: the
    /// children of self's parent (relative level -1) are siblings.
    #[must_use]
    pub const fn next(parent: Self, parent_relative_level: i32) -> Self {
        match parent {
            Self::Root | Self::Ancestor if parent_relative_level == -1 => Self::Sibling,
            Self::Root | Self::Ancestor => Self::AncestorSibling,
            Self::SelfNode | Self::Descendant => Self::Descendant,
            Self::Sibling | Self::AncestorSibling | Self::Other => Self::Other,
        }
    }

    /// Label used in rendered documents.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Root => "root",
            Self::Ancestor => "ancestor",
            Self::AncestorSibling => "ancestor-sibling",
            Self::Sibling => "sibling",
            Self::SelfNode => "self",
            Self::Descendant => "descendant",
            Self::Other => "other",
        }
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Content ids on the path from the root (index 0) down to self (last).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AncestorChain {
    ids: Vec<ContentId>,
}

impl AncestorChain {
    /// Build a chain from ids collected while walking up from self.
    ///
    /// `upward[0]` is self, the last entry is the root.
    #[must_use]
    pub fn from_upward(mut upward: Vec<ContentId>) -> Self {
        upward.reverse();
        Self { ids: upward }
    }

    /// Content id of the root.
    #[must_use]
    pub fn root(&self) -> Option<ContentId> {
        self.ids.first().copied()
    }

    /// Content id of self.
    #[must_use]
    pub fn self_id(&self) -> Option<ContentId> {
        self.ids.last().copied()
    }

    /// Number of generations between root and self.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.ids.len().saturating_sub(1)
    }

    /// Content id expected on the chain at `absolute_level`.
    #[must_use]
    pub fn expected_at(&self, absolute_level: u32) -> Option<ContentId> {
        usize::try_from(absolute_level)
            .ok()
            .and_then(|level| self.ids.get(level))
            .copied()
    }

    /// Whether `id` is on the chain.
    #[must_use]
    pub fn contains(&self, id: ContentId) -> bool {
        self.ids.contains(&id)
    }

    /// Chain ids from root to self.
    #[must_use]
    pub fn ids(&self) -> &[ContentId] {
        &self.ids
    }

    /// Classify a child given its parent's category and relative level.
    ///
    /// Children of root or ancestor that sit on the chain at their absolute
    /// level are ancestors (above self) or self (at self's level); all other
    /// children follow [`NodeType::next`].
    #[must_use]
    pub fn classify(
        &self,
        parent: NodeType,
        parent_relative_level: i32,
        child: ContentId,
        child_absolute_level: u32,
    ) -> NodeType {
        let child_relative_level = parent_relative_level + 1;
        if matches!(parent, NodeType::Root | NodeType::Ancestor)
            && self.expected_at(child_absolute_level) == Some(child)
        {
            if child_relative_level < 0 {
                return NodeType::Ancestor;
            }
            if child_relative_level == 0 {
                return NodeType::SelfNode;
            }
        }
        NodeType::next(parent, parent_relative_level)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn chain(ids: &[u64]) -> AncestorChain {
        AncestorChain {
            ids: ids.iter().copied().map(ContentId).collect(),
        }
    }

    #[test]
    fn test_next_transition_table() {
        assert_eq!(NodeType::next(NodeType::Root, -1), NodeType::Sibling);
        assert_eq!(NodeType::next(NodeType::Ancestor, -1), NodeType::Sibling);
        assert_eq!(NodeType::next(NodeType::Root, -2), NodeType::AncestorSibling);
        assert_eq!(NodeType::next(NodeType::Ancestor, -3), NodeType::AncestorSibling);
        assert_eq!(NodeType::next(NodeType::SelfNode, 0), NodeType::Descendant);
        assert_eq!(NodeType::next(NodeType::Descendant, 4), NodeType::Descendant);
        assert_eq!(NodeType::next(NodeType::Sibling, 0), NodeType::Other);
        assert_eq!(NodeType::next(NodeType::AncestorSibling, -1), NodeType::Other);
        assert_eq!(NodeType::next(NodeType::Other, 2), NodeType::Other);
    }

    #[test]
    fn test_labels() {
        assert_eq!(NodeType::SelfNode.as_str(), "self");
        assert_eq!(NodeType::AncestorSibling.to_string(), "ancestor-sibling");
        assert_eq!(
            serde_json::to_string(&NodeType::SelfNode).unwrap(),
            "\"self\""
        );
        assert_eq!(
            serde_json::from_str::<NodeType>("\"ancestor-sibling\"").unwrap(),
            NodeType::AncestorSibling
        );
    }

    #[test]
    fn test_from_upward_reverses() {
        let chain = AncestorChain::from_upward(vec![ContentId(3), ContentId(2), ContentId(1)]);

        assert_eq!(chain.ids(), &[ContentId(1), ContentId(2), ContentId(3)]);
        assert_eq!(chain.root(), Some(ContentId(1)));
        assert_eq!(chain.self_id(), Some(ContentId(3)));
        assert_eq!(chain.depth(), 2);
        assert_eq!(chain.expected_at(1), Some(ContentId(2)));
        assert_eq!(chain.expected_at(3), None);
    }

    #[test]
    fn test_classify_follows_chain() {
        // root 1 -> ancestor 2 -> self 3
        let chain = chain(&[1, 2, 3]);

        assert_eq!(chain.classify(NodeType::Root, -2, ContentId(2), 1), NodeType::Ancestor);
        assert_eq!(chain.classify(NodeType::Ancestor, -1, ContentId(3), 2), NodeType::SelfNode);
    }

    #[test]
    fn test_classify_off_chain_children() {
        let chain = chain(&[1, 2, 3]);

        assert_eq!(
            chain.classify(NodeType::Root, -2, ContentId(9), 1),
            NodeType::AncestorSibling
        );
        assert_eq!(chain.classify(NodeType::Ancestor, -1, ContentId(8), 2), NodeType::Sibling);
        assert_eq!(chain.classify(NodeType::SelfNode, 0, ContentId(7), 3), NodeType::Descendant);
    }

    #[test]
    fn test_classify_chain_id_under_non_ancestor_is_not_promoted() {
        let chain = chain(&[1, 2, 3]);

        assert_eq!(chain.classify(NodeType::Sibling, 0, ContentId(3), 2), NodeType::Other);
    }

    #[test]
    fn test_empty_chain_depth() {
        assert_eq!(chain(&[]).depth(), 0);
        assert_eq!(chain(&[5]).depth(), 0);
        assert_eq!(chain(&[5]).self_id(), Some(ContentId(5)));
    }
}
