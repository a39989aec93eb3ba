//! Request context consumed by the navigation engine.
//!
//! The surrounding rendering pipeline hands over the HTTP-like parameters of
//! the current request together with the session id. The navigation engine
//! only reads from it.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Parameter carrying the related item id in "edit related content" mode.
pub const RELATED_ITEM_PARAM: &str = "sys_relateditemid";

/// The fixed set of context parameters every navigation render carries.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StandardParam {
    ContentId,
    Revision,
    Context,
    AuthType,
    View,
    VariantId,
    SiteId,
    FolderId,
    Command,
}

impl StandardParam {
    /// All standard parameters in rendering order.
    pub const ALL: [Self; 9] = [
        Self::ContentId,
        Self::Revision,
        Self::Context,
        Self::AuthType,
        Self::View,
        Self::VariantId,
        Self::SiteId,
        Self::FolderId,
        Self::Command,
    ];

    /// Request parameter name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::ContentId => "sys_contentid",
            Self::Revision => "sys_revision",
            Self::Context => "sys_context",
            Self::AuthType => "sys_authtype",
            Self::View => "sys_view",
            Self::VariantId => "sys_variantid",
            Self::SiteId => "sys_siteid",
            Self::FolderId => "sys_folderid",
            Self::Command => "sys_command",
        }
    }
}

/// Values of the standard parameters captured from one request.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandardParams {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub revision: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub context: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub auth_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub view: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub variant_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub site_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub folder_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
}

impl StandardParams {
    /// Value of one standard parameter.
    #[must_use]
    pub fn get(&self, param: StandardParam) -> Option<&str> {
        self.slot(param).as_deref()
    }

    /// Set one standard parameter.
    pub fn set(&mut self, param: StandardParam, value: impl Into<String>) {
        *self.slot_mut(param) = Some(value.into());
    }

    /// Iterate over present parameters as `(name, value)` in rendering order.
    pub fn iter(&self) -> impl Iterator<Item = (&'static str, &str)> {
        StandardParam::ALL
            .into_iter()
            .filter_map(|param| self.get(param).map(|value| (param.as_str(), value)))
    }

    /// Combine with `fallback`, keeping own values where present.
    #[must_use]
    pub fn or(&self, fallback: &Self) -> Self {
        let mut merged = self.clone();
        for param in StandardParam::ALL {
            if merged.get(param).is_none()
                && let Some(value) = fallback.get(param)
            {
                merged.set(param, value);
            }
        }
        merged
    }

    fn slot(&self, param: StandardParam) -> &Option<String> {
        match param {
            StandardParam::ContentId => &self.content_id,
            StandardParam::Revision => &self.revision,
            StandardParam::Context => &self.context,
            StandardParam::AuthType => &self.auth_type,
            StandardParam::View => &self.view,
            StandardParam::VariantId => &self.variant_id,
            StandardParam::SiteId => &self.site_id,
            StandardParam::FolderId => &self.folder_id,
            StandardParam::Command => &self.command,
        }
    }

    fn slot_mut(&mut self, param: StandardParam) -> &mut Option<String> {
        match param {
            StandardParam::ContentId => &mut self.content_id,
            StandardParam::Revision => &mut self.revision,
            StandardParam::Context => &mut self.context,
            StandardParam::AuthType => &mut self.auth_type,
            StandardParam::View => &mut self.view,
            StandardParam::VariantId => &mut self.variant_id,
            StandardParam::SiteId => &mut self.site_id,
            StandardParam::FolderId => &mut self.folder_id,
            StandardParam::Command => &mut self.command,
        }
    }
}

/// Parameters and session state of the request being rendered.
#[derive(Clone, Debug, Default)]
pub struct RequestContext {
    params: BTreeMap<String, String>,
    session_id: Option<String>,
}

impl RequestContext {
    /// Create an empty request context.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a request context from `(name, value)` pairs.
    pub fn from_pairs<K, V>(pairs: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            params: pairs
                .into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
            session_id: None,
        }
    }

    /// Add a request parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.params.insert(name.into(), value.into());
        self
    }

    /// Set the session id.
    #[must_use]
    pub fn with_session_id(mut self, session_id: impl Into<String>) -> Self {
        self.session_id = Some(session_id.into());
        self
    }

    /// Value of a request parameter. Empty values count as absent.
    #[must_use]
    pub fn param(&self, name: &str) -> Option<&str> {
        self.params
            .get(name)
            .map(String::as_str)
            .filter(|value| !value.is_empty())
    }

    /// Session id of the request.
    #[must_use]
    pub fn session_id(&self) -> Option<&str> {
        self.session_id.as_deref()
    }

    /// Extract the standard context parameters.
    #[must_use]
    pub fn standard_params(&self) -> StandardParams {
        let mut params = StandardParams::default();
        for param in StandardParam::ALL {
            if let Some(value) = self.param(param.as_str()) {
                params.set(param, value);
            }
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn test_standard_params_extracted() {
        let request = RequestContext::from_pairs([
            ("sys_contentid", "100"),
            ("sys_context", "0"),
            ("sys_siteid", "5"),
            ("unrelated", "x"),
        ]);

        let params = request.standard_params();

        assert_eq!(params.content_id.as_deref(), Some("100"));
        assert_eq!(params.context.as_deref(), Some("0"));
        assert_eq!(params.site_id.as_deref(), Some("5"));
        assert!(params.revision.is_none());
    }

    #[test]
    fn test_empty_param_counts_as_absent() {
        let request = RequestContext::new().with_param("sys_folderid", "");

        assert_eq!(request.param("sys_folderid"), None);
        assert!(request.standard_params().folder_id.is_none());
    }

    #[test]
    fn test_standard_params_iter_in_order() {
        let mut params = StandardParams::default();
        params.set(StandardParam::SiteId, "5");
        params.set(StandardParam::ContentId, "100");

        let pairs: Vec<_> = params.iter().collect();

        assert_eq!(pairs, vec![("sys_contentid", "100"), ("sys_siteid", "5")]);
    }

    #[test]
    fn test_standard_params_or_keeps_own_values() {
        let mut own = StandardParams::default();
        own.set(StandardParam::ContentId, "1");
        let mut fallback = StandardParams::default();
        fallback.set(StandardParam::ContentId, "2");
        fallback.set(StandardParam::Context, "0");

        let merged = own.or(&fallback);

        assert_eq!(merged.get(StandardParam::ContentId), Some("1"));
        assert_eq!(merged.get(StandardParam::Context), Some("0"));
    }

    #[test]
    fn test_session_id() {
        let request = RequestContext::new().with_session_id("abc");
        assert_eq!(request.session_id(), Some("abc"));
        assert_eq!(RequestContext::new().session_id(), None);
    }
}
