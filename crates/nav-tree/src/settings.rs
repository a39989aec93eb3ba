//! Settings shared by tree linking and composition.

use nav_repo::VariantId;

/// Content type ids, variant ids and request parameter names used while
/// building and rendering trees.
///
/// Constructed once by the host (usually from the configuration file) and
/// passed by reference.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NavSettings {
    /// Content type of tree roots.
    pub navtree_type: u64,
    /// Content type of ordinary navigation items.
    pub navon_type: u64,
    /// Variant rendering a node's links and defaults.
    pub info_variant: VariantId,
    /// Request parameter overriding the theme.
    pub theme_param: String,
    /// Request parameter overriding the variable selector.
    pub variable_selector_param: String,
    /// Request parameter overriding the image selector.
    pub image_selector_param: String,
    /// Query parameter carrying the session id in rebuilt links.
    pub session_param: String,
    /// Command value of "edit related content" requests.
    pub edit_related_command: String,
    /// Maximum absolute level to descend to. `None` loads the whole tree.
    pub max_depth: Option<u32>,
}

impl NavSettings {
    /// Whether a content type belongs in a navigation tree.
    #[must_use]
    pub fn is_navigation_type(&self, content_type_id: u64) -> bool {
        content_type_id == self.navon_type || content_type_id == self.navtree_type
    }

    /// Limit descent to `max_depth` levels below the root.
    #[must_use]
    pub fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = Some(max_depth);
        self
    }
}

impl Default for NavSettings {
    fn default() -> Self {
        Self {
            navtree_type: 311,
            navon_type: 310,
            info_variant: VariantId(510),
            theme_param: "nav_theme".to_owned(),
            variable_selector_param: "nav_variableselector".to_owned(),
            image_selector_param: "nav_imageselector".to_owned(),
            session_param: "pssessionid".to_owned(),
            edit_related_command: "editrc".to_owned(),
            max_depth: None,
        }
    }
}
