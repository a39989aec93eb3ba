//! Rendering navigation trees as XML documents.
//!
//! A tree may be served from cache after being built for an earlier request,
//! so the composed document is made render-ready for the current request in
//! separate steps:
//!
//! 1. [`compose`] turns the tree into a `navtree` document.
//! 2. [`override_theme`] applies the request's theme (or the site's).
//! 3. [`relink`] rebuilds every outbound link with request parameters.
//!
//! Every step returns a new document; the input is never modified.

use nav_repo::{
    ContentRepository, LinkQuery, RELATED_ITEM_PARAM, RequestContext, StandardParam, UrlBuilder,
    VariantId, parse_link_url,
};
use nav_xml::XmlElement;

use crate::error::NavError;
use crate::model::{NavNode, NavTree};
use crate::settings::NavSettings;

/// Build the XML document for `tree` as seen by `request`.
///
/// Standard parameters come from the current request, falling back to those
/// captured when the tree was built. A theme or selectors requested
/// explicitly win over the tree's defaults.
#[must_use]
pub fn compose(tree: &NavTree, request: &RequestContext, settings: &NavSettings) -> XmlElement {
    let params = request.standard_params().or(&tree.params);
    let theme = request
        .param(&settings.theme_param)
        .or(tree.theme.as_deref());
    let variable_selector = request
        .param(&settings.variable_selector_param)
        .or(tree.variable_selector.as_deref());
    let image_selector = request
        .param(&settings.image_selector_param)
        .or(tree.image_selector.as_deref());

    let mut document = XmlElement::new("navtree");
    for (name, value) in params.iter() {
        document.set_attr(name, value);
    }

    document
        .with_opt_attr("theme", theme)
        .with_opt_attr("variableselector", variable_selector)
        .with_opt_attr("imageselector", image_selector)
        .with_child(
            XmlElement::new("shared")
                .with_child(XmlElement::new("displaytitle").with_text(&tree.root.name)),
        )
        .with_child(navon_element(&tree.root))
}

fn navon_element(node: &NavNode) -> XmlElement {
    let mut element = XmlElement::new("navon")
        .with_attr("id", node.id.to_string())
        .with_attr("revision", node.revision.to_string())
        .with_attr("name", &node.name)
        .with_attr("type", node.node_type.as_str())
        .with_attr("relative-level", node.relative_level.to_string())
        .with_attr("absolute-level", node.absolute_level.to_string());

    if let Some(url) = &node.info_url {
        element = element.with_child(link_element("info", url));
    }
    if let Some(page) = &node.landing_page {
        let mut landing = link_element("landingpage", &page.href)
            .with_attr(StandardParam::ContentId.as_str(), page.content_id.to_string())
            .with_attr(StandardParam::Revision.as_str(), page.revision.to_string())
            .with_attr(StandardParam::VariantId.as_str(), page.variant_id.to_string());
        if let Some(folder) = page.folder_id {
            landing = landing.with_attr(StandardParam::FolderId.as_str(), folder.to_string());
        }
        element = element.with_child(landing);
    }
    for image in &node.images {
        element = element.with_child(
            link_element("image", &image.href).with_opt_attr("selector", image.selector.as_deref()),
        );
    }

    element.with_children(node.children.iter().map(navon_element))
}

fn link_element(name: &str, url: &str) -> XmlElement {
    XmlElement::new(name).with_attr("href", url).with_text(url)
}

/// Extra query parameters added to every rebuilt link.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct LinkParams {
    extras: LinkQuery,
}

impl LinkParams {
    /// Collect the link parameters of a request.
    ///
    /// Context, site id, auth type and session id are carried over. In "edit
    /// related content" mode the related item id is added as well.
    #[must_use]
    pub fn from_request(request: &RequestContext, settings: &NavSettings) -> Self {
        let mut params = Self::default();
        for param in [
            StandardParam::Context,
            StandardParam::SiteId,
            StandardParam::AuthType,
        ] {
            if let Some(value) = request.param(param.as_str()) {
                params = params.with_param(param.as_str(), value);
            }
        }

        let session_id = request
            .session_id()
            .or_else(|| request.param(&settings.session_param));
        if let Some(session_id) = session_id {
            params = params.with_param(&settings.session_param, session_id);
        }

        let editing_related =
            request.param(StandardParam::Command.as_str()) == Some(settings.edit_related_command.as_str());
        if editing_related && let Some(related) = request.param(RELATED_ITEM_PARAM) {
            params = params.with_param(RELATED_ITEM_PARAM, related);
        }

        params
    }

    /// Add or replace one parameter.
    #[must_use]
    pub fn with_param(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.extras.insert(name.into(), value.into());
        self
    }

    /// The parameters, sorted by name.
    #[must_use]
    pub fn extras(&self) -> &LinkQuery {
        &self.extras
    }
}

/// Rebuild every landing page, image and info link of `document`.
///
/// Landing pages are rebuilt from their identifying attributes plus the
/// extras against their variant's URL template. Image and info links keep
/// their stored base and query and gain the extras. Rebuilt URLs replace the
/// old ones entirely, so relinking twice gives the same result.
///
/// A landing page whose variant has no URL template is left as is.
///
/// # Errors
///
/// Returns [`NavError::LinkRebuild`] if a stored URL cannot be parsed or
/// rebuilt, and [`NavError::Lookup`] if the repository fails.
pub fn relink(
    document: &XmlElement,
    params: &LinkParams,
    repo: &dyn ContentRepository,
    urls: &dyn UrlBuilder,
) -> Result<XmlElement, NavError> {
    let mut element = XmlElement {
        name: document.name.clone(),
        attrs: document.attrs.clone(),
        text: document.text.clone(),
        children: Vec::with_capacity(document.children.len()),
    };

    let url = match element.name.as_str() {
        "landingpage" => landing_page_url(&element, params, repo, urls)?,
        "image" | "info" => stored_link_url(&element, params, urls)?,
        _ => None,
    };
    if let Some(url) = url {
        element.set_attr("href", url.as_str());
        element.text = url;
    }

    for child in &document.children {
        element.children.push(relink(child, params, repo, urls)?);
    }
    Ok(element)
}

fn landing_page_url(
    element: &XmlElement,
    params: &LinkParams,
    repo: &dyn ContentRepository,
    urls: &dyn UrlBuilder,
) -> Result<Option<String>, NavError> {
    let Some(variant) = element
        .attr(StandardParam::VariantId.as_str())
        .and_then(|v| v.parse::<VariantId>().ok())
    else {
        tracing::warn!(href = element.attr("href"), "Landing page without variant id");
        return Ok(None);
    };

    let template = repo.variant_url(variant).map_err(|e| NavError::Lookup {
        context: format!("URL template of variant {variant}"),
        source: e,
    })?;
    let Some(template) = template else {
        tracing::warn!(variant_id = %variant, "No URL template for landing page variant");
        return Ok(None);
    };

    let mut query = LinkQuery::new();
    for param in [
        StandardParam::ContentId,
        StandardParam::Revision,
        StandardParam::VariantId,
        StandardParam::FolderId,
    ] {
        if let Some(value) = element.attr(param.as_str()).filter(|v| !v.is_empty()) {
            query.insert(param.as_str().to_owned(), value.to_owned());
        }
    }
    query.extend(params.extras().clone());

    urls.build_url(&template, &query)
        .map(Some)
        .map_err(|source| NavError::LinkRebuild {
            url: template,
            source,
        })
}

fn stored_link_url(
    element: &XmlElement,
    params: &LinkParams,
    urls: &dyn UrlBuilder,
) -> Result<Option<String>, NavError> {
    let stored = element
        .attr("href")
        .filter(|href| !href.trim().is_empty())
        .unwrap_or(element.text.as_str());
    if stored.trim().is_empty() {
        return Ok(None);
    }

    let rebuild_error = |source| NavError::LinkRebuild {
        url: stored.to_owned(),
        source,
    };
    let parsed = parse_link_url(stored).map_err(rebuild_error)?;
    let mut query = parsed.query;
    query.extend(params.extras().clone());
    urls.build_url(&parsed.base, &query)
        .map(Some)
        .map_err(rebuild_error)
}

/// Apply the request theme, or the site's theme, to a composed document.
///
/// An explicit `request_theme` wins. Otherwise the repository's theme for
/// `site_id` is used when it has one; lookup failures leave the document
/// unchanged.
#[must_use]
pub fn override_theme(
    document: &XmlElement,
    request_theme: Option<&str>,
    repo: &dyn ContentRepository,
    site_id: Option<&str>,
) -> XmlElement {
    let theme = match (request_theme, site_id) {
        (Some(theme), _) => Some(theme.to_owned()),
        (None, Some(site_id)) => repo.lookup_theme(site_id).unwrap_or_else(|e| {
            tracing::warn!(site_id, error = %e, "Theme lookup failed");
            None
        }),
        (None, None) => None,
    };

    let mut document = document.clone();
    if let Some(theme) = theme {
        document.set_attr("theme", theme);
    }
    document
}
