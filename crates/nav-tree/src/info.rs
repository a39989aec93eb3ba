//! Parsing of info variant renderings.
//!
//! Each navigation item renders an info variant describing its links. The
//! root's rendering also carries tree-wide defaults:
//!
//! ```xml
//! <navinfo>
//!   <landingpage href="/assembler/render?sys_contentid=100"
//!                sys_contentid="100" sys_revision="2" sys_variantid="7"/>
//!   <info href="/assembler/render?sys_contentid=1&amp;sys_variantid=510"/>
//!   <image href="/img/nav-red.gif" selector="red"/>
//!   <theme>blue</theme>
//!   <variableselector>dark</variableselector>
//!   <imageselector>red</imageselector>
//! </navinfo>
//! ```
//!
//! Parsing is lenient: malformed entries are logged and skipped.

use nav_repo::{ContentId, FolderId, VariantId};
use nav_xml::{XmlElement, XmlError, XmlParser};

use crate::model::{ImageLink, LandingPage};

/// Links and defaults read from an info rendering.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct NodeInfo {
    pub landing_page: Option<LandingPage>,
    pub info_url: Option<String>,
    pub images: Vec<ImageLink>,
    pub theme: Option<String>,
    pub variable_selector: Option<String>,
    pub image_selector: Option<String>,
}

impl NodeInfo {
    /// Parse an info rendering.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError`] if the rendering is not well-formed XML.
    pub fn parse(xml: &str) -> Result<Self, XmlError> {
        let root = XmlParser::new().parse(xml)?;
        Ok(Self::from_element(&root))
    }

    /// Read links and defaults from a parsed rendering.
    #[must_use]
    pub fn from_element(root: &XmlElement) -> Self {
        let landing_page = root.find("landingpage").and_then(landing_page);
        let info_url = root.find("info").and_then(href).map(str::to_owned);
        let images = root
            .descendants()
            .filter(|element| element.name == "image")
            .filter_map(|element| {
                let Some(href) = href(element) else {
                    tracing::warn!("Skipping image link without URL");
                    return None;
                };
                Some(ImageLink {
                    href: href.to_owned(),
                    selector: element.attr("selector").map(str::to_owned),
                })
            })
            .collect();

        Self {
            landing_page,
            info_url,
            images,
            theme: setting(root, "theme"),
            variable_selector: setting(root, "variableselector"),
            image_selector: setting(root, "imageselector"),
        }
    }
}

/// URL of a link element, from its `href` attribute or its text.
fn href(element: &XmlElement) -> Option<&str> {
    element
        .attr("href")
        .map(str::trim)
        .filter(|href| !href.is_empty())
        .or_else(|| Some(element.text.trim()).filter(|text| !text.is_empty()))
}

/// Tree-wide default, from an attribute of the root or a child element.
fn setting(root: &XmlElement, name: &str) -> Option<String> {
    root.attr(name)
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .or_else(|| root.child_text(name))
        .map(str::to_owned)
}

fn landing_page(element: &XmlElement) -> Option<LandingPage> {
    let Some(href) = href(element) else {
        tracing::warn!("Skipping landing page without URL");
        return None;
    };

    let content_id = element.attr("sys_contentid").map(str::parse::<ContentId>);
    let revision = element
        .attr("sys_revision")
        .map(|r| r.trim().parse::<u32>());
    let variant_id = element.attr("sys_variantid").map(str::parse::<VariantId>);
    let (Some(Ok(content_id)), Some(Ok(revision)), Some(Ok(variant_id))) =
        (content_id, revision, variant_id)
    else {
        tracing::warn!(href, "Skipping landing page with invalid identifying attributes");
        return None;
    };

    let folder_id = match element.attr("sys_folderid").map(str::parse::<FolderId>) {
        Some(Ok(folder)) => Some(folder),
        Some(Err(e)) => {
            tracing::warn!(href, error = %e, "Ignoring invalid landing page folder id");
            None
        }
        None => None,
    };

    Some(LandingPage {
        href: href.to_owned(),
        content_id,
        revision,
        variant_id,
        folder_id,
    })
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    const ROOT_INFO: &str = r#"<navinfo>
        <landingpage href="/assembler/render?sys_contentid=100"
                     sys_contentid="100" sys_revision="2" sys_variantid="7" sys_folderid="40"/>
        <info href="/assembler/render?sys_contentid=1&amp;sys_variantid=510"/>
        <image href="/img/nav-red.gif" selector="red"/>
        <image selector="blue">/img/nav-blue.gif</image>
        <theme>blue</theme>
        <variableselector> dark </variableselector>
    </navinfo>"#;

    #[test]
    fn test_parse_full_rendering() {
        let info = NodeInfo::parse(ROOT_INFO).unwrap();

        assert_eq!(
            info.landing_page,
            Some(LandingPage {
                href: "/assembler/render?sys_contentid=100".to_owned(),
                content_id: ContentId(100),
                revision: 2,
                variant_id: VariantId(7),
                folder_id: Some(FolderId(40)),
            })
        );
        assert_eq!(
            info.info_url.as_deref(),
            Some("/assembler/render?sys_contentid=1&sys_variantid=510")
        );
        assert_eq!(
            info.images,
            vec![
                ImageLink {
                    href: "/img/nav-red.gif".to_owned(),
                    selector: Some("red".to_owned()),
                },
                ImageLink {
                    href: "/img/nav-blue.gif".to_owned(),
                    selector: Some("blue".to_owned()),
                },
            ]
        );
        assert_eq!(info.theme.as_deref(), Some("blue"));
        assert_eq!(info.variable_selector.as_deref(), Some("dark"));
        assert_eq!(info.image_selector, None);
    }

    #[test]
    fn test_settings_from_root_attributes() {
        let info = NodeInfo::parse(r#"<navinfo theme="green" imageselector="red"/>"#).unwrap();

        assert_eq!(info.theme.as_deref(), Some("green"));
        assert_eq!(info.image_selector.as_deref(), Some("red"));
    }

    #[test]
    fn test_landing_page_with_bad_ids_skipped() {
        let info = NodeInfo::parse(
            r#"<navinfo><landingpage href="/x" sys_contentid="abc" sys_revision="1" sys_variantid="7"/></navinfo>"#,
        )
        .unwrap();

        assert_eq!(info.landing_page, None);
    }

    #[test]
    fn test_landing_page_missing_revision_skipped() {
        let info = NodeInfo::parse(
            r#"<navinfo><landingpage href="/x" sys_contentid="1" sys_variantid="7"/></navinfo>"#,
        )
        .unwrap();

        assert_eq!(info.landing_page, None);
    }

    #[test]
    fn test_landing_page_bad_folder_ignored() {
        let info = NodeInfo::parse(
            r#"<navinfo><landingpage href="/x" sys_contentid="1" sys_revision="1" sys_variantid="7" sys_folderid="?"/></navinfo>"#,
        )
        .unwrap();

        let page = info.landing_page.unwrap();
        assert_eq!(page.folder_id, None);
        assert_eq!(page.content_id, ContentId(1));
    }

    #[test]
    fn test_image_without_url_skipped() {
        let info = NodeInfo::parse(r#"<navinfo><image selector="red"/></navinfo>"#).unwrap();
        assert!(info.images.is_empty());
    }

    #[test]
    fn test_empty_rendering() {
        assert_eq!(NodeInfo::parse("<navinfo/>").unwrap(), NodeInfo::default());
    }

    #[test]
    fn test_malformed_rendering_is_error() {
        assert!(NodeInfo::parse("<navinfo><theme>").is_err());
    }
}
