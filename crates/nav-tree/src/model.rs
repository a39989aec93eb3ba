//! Navigation tree data model.

use nav_repo::{ContentId, FolderId, StandardParams, VariantId};
use serde::{Deserialize, Serialize};

use crate::classify::NodeType;

/// Link to the page a navigation node leads to.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LandingPage {
    /// URL as stored in the info rendering.
    pub href: String,
    /// Content id of the landing page.
    pub content_id: ContentId,
    /// Revision of the landing page.
    pub revision: u32,
    /// Template variant the page is rendered with.
    pub variant_id: VariantId,
    /// Folder of the landing page, if known.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<FolderId>,
}

/// Image associated with a navigation node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageLink {
    /// Image URL.
    pub href: String,
    /// Color selector the image belongs to.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selector: Option<String>,
}

/// One node of a navigation tree.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavNode {
    pub id: ContentId,
    pub revision: u32,
    pub name: String,
    pub content_type_id: u64,
    /// Signed generations from self (self is 0).
    pub relative_level: i32,
    /// Generations below the root (root is 0).
    pub absolute_level: u32,
    pub node_type: NodeType,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub landing_page: Option<LandingPage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub info_url: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub images: Vec<ImageLink>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<NavNode>,
}

impl NavNode {
    /// Iterate over this node and its descendants in depth-first order.
    pub fn iter(&self) -> NodeIter<'_> {
        NodeIter { stack: vec![self] }
    }

    /// Find a node by content id.
    #[must_use]
    pub fn find(&self, id: ContentId) -> Option<&NavNode> {
        self.iter().find(|node| node.id == id)
    }
}

/// Depth-first iterator over navigation nodes.
#[derive(Debug)]
pub struct NodeIter<'a> {
    stack: Vec<&'a NavNode>,
}

impl<'a> Iterator for NodeIter<'a> {
    type Item = &'a NavNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

/// A classified navigation tree built for one self node.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct NavTree {
    /// Tree root.
    pub root: NavNode,
    /// Content id of the node the tree was built for.
    pub self_id: ContentId,
    /// Default theme from the root's info rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub theme: Option<String>,
    /// Default variable selector from the root's info rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variable_selector: Option<String>,
    /// Default image selector from the root's info rendering.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image_selector: Option<String>,
    /// Standard parameters of the request the tree was built for.
    #[serde(default)]
    pub params: StandardParams,
}

impl NavTree {
    /// Iterate over all nodes in depth-first order.
    pub fn iter(&self) -> NodeIter<'_> {
        self.root.iter()
    }

    /// Find a node by content id.
    #[must_use]
    pub fn find(&self, id: ContentId) -> Option<&NavNode> {
        self.root.find(id)
    }

    /// The node the tree was built for.
    #[must_use]
    pub fn self_node(&self) -> Option<&NavNode> {
        self.find(self.self_id)
    }

    /// Number of nodes in the tree.
    #[must_use]
    pub fn node_count(&self) -> usize {
        self.iter().count()
    }
}
