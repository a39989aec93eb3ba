//! XML parser producing [`XmlElement`] trees.

#![allow(clippy::unused_self)] // Unit struct methods have &self for API consistency

use std::borrow::Cow;
use std::io::BufRead;

use quick_xml::events::{BytesStart, Event};
use quick_xml::reader::Reader;

use crate::element::XmlElement;
use crate::error::XmlError;

/// Parse XML text into an element tree.
///
/// Comments, processing instructions and the XML declaration are skipped.
/// Entity and character references are decoded. Whitespace-only text is
/// dropped.
#[derive(Debug)]
pub struct XmlParser;

impl XmlParser {
    /// Create a new parser.
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Parse a document and return its root element.
    ///
    /// # Errors
    ///
    /// Returns [`XmlError`] if the text is not well-formed XML or holds no
    /// element.
    pub fn parse(&self, xml: &str) -> Result<XmlElement, XmlError> {
        let mut reader = Reader::from_str(xml);
        reader.config_mut().trim_text(false);

        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let element = self.start_element(&reader, &e)?;
                    return self.parse_children(&mut reader, element);
                }
                Event::Empty(e) => return self.start_element(&reader, &e),
                Event::Eof => return Err(XmlError::NoRootElement),
                _ => {}
            }
            buf.clear();
        }
    }

    fn parse_children<R: BufRead>(
        &self,
        reader: &mut Reader<R>,
        mut element: XmlElement,
    ) -> Result<XmlElement, XmlError> {
        let mut buf = Vec::new();

        loop {
            match reader.read_event_into(&mut buf)? {
                Event::Start(e) => {
                    let child = self.start_element(reader, &e)?;
                    element.children.push(self.parse_children(reader, child)?);
                }
                Event::Empty(e) => {
                    let child = self.start_element(reader, &e)?;
                    element.children.push(child);
                }
                Event::Text(e) => {
                    element.text.push_str(&reader.decoder().decode(&e)?);
                }
                Event::GeneralRef(e) => {
                    let entity = reader.decoder().decode(&e)?;
                    element.text.push_str(&decode_entity(&entity));
                }
                Event::CData(e) => {
                    element.text.push_str(std::str::from_utf8(&e)?);
                }
                Event::End(_) => {
                    if element.text.trim().is_empty() {
                        element.text.clear();
                    }
                    return Ok(element);
                }
                Event::Eof => return Err(XmlError::UnexpectedEof(element.name)),
                Event::Comment(_) | Event::Decl(_) | Event::PI(_) | Event::DocType(_) => {}
            }
            buf.clear();
        }
    }

    fn start_element<R: BufRead>(
        &self,
        reader: &Reader<R>,
        e: &BytesStart,
    ) -> Result<XmlElement, XmlError> {
        let name = reader.decoder().decode(e.name().as_ref())?.into_owned();
        let mut element = XmlElement::new(name);
        for attr in e.attributes() {
            let attr = attr?;
            let key = reader.decoder().decode(attr.key.as_ref())?.into_owned();
            let value = attr.unescape_value()?.into_owned();
            element.attrs.push((key, value));
        }
        Ok(element)
    }
}

impl Default for XmlParser {
    fn default() -> Self {
        Self::new()
    }
}

/// Decode an entity reference name (without `&` and `;`).
fn decode_entity(entity: &str) -> Cow<'static, str> {
    match entity {
        "lt" => Cow::Borrowed("<"),
        "gt" => Cow::Borrowed(">"),
        "amp" => Cow::Borrowed("&"),
        "apos" => Cow::Borrowed("'"),
        "quot" => Cow::Borrowed("\""),
        s if s.starts_with('#') => {
            let code = if let Some(hex) = s.strip_prefix("#x").or_else(|| s.strip_prefix("#X")) {
                u32::from_str_radix(hex, 16).ok()
            } else {
                s[1..].parse::<u32>().ok()
            };
            code.and_then(char::from_u32).map_or_else(
                || Cow::Owned(format!("&{entity};")),
                |c| Cow::Owned(c.to_string()),
            )
        }
        // Unknown entity, kept verbatim
        _ => Cow::Owned(format!("&{entity};")),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn parse(xml: &str) -> XmlElement {
        XmlParser::new().parse(xml).unwrap()
    }

    #[test]
    fn test_parse_simple_element() {
        let root = parse("<theme>blue</theme>");

        assert_eq!(root.name, "theme");
        assert_eq!(root.text, "blue");
        assert!(root.children.is_empty());
    }

    #[test]
    fn test_parse_nested_with_attributes() {
        let root = parse(
            r#"<navinfo>
                <landingpage href="/render?a=1" sys_contentid="100"/>
                <image href="/img/a.gif" selector="red"></image>
            </navinfo>"#,
        );

        assert_eq!(root.text, "");
        assert_eq!(root.children.len(), 2);
        assert_eq!(root.children[0].attr("href"), Some("/render?a=1"));
        assert_eq!(root.children[0].attr("sys_contentid"), Some("100"));
        assert_eq!(root.children[1].attr("selector"), Some("red"));
    }

    #[test]
    fn test_parse_decodes_entities() {
        let root = parse(r#"<info href="/page?a=1&amp;b=2">x &lt; y &#233;&#x41;</info>"#);

        assert_eq!(root.attr("href"), Some("/page?a=1&b=2"));
        assert_eq!(root.text, "x < y éA");
    }

    #[test]
    fn test_parse_cdata() {
        let root = parse("<theme><![CDATA[a<b]]></theme>");
        assert_eq!(root.text, "a<b");
    }

    #[test]
    fn test_parse_skips_declaration_and_comments() {
        let root = parse("<?xml version=\"1.0\"?><!-- note --><navinfo><!-- x --><theme>t</theme></navinfo>");

        assert_eq!(root.name, "navinfo");
        assert_eq!(root.child_text("theme"), Some("t"));
    }

    #[test]
    fn test_parse_self_closing_root() {
        let root = parse(r#"<navinfo theme="x"/>"#);

        assert_eq!(root.name, "navinfo");
        assert_eq!(root.attr("theme"), Some("x"));
    }

    #[test]
    fn test_parse_empty_document() {
        let err = XmlParser::new().parse("   ").unwrap_err();
        assert!(matches!(err, XmlError::NoRootElement));
    }

    #[test]
    fn test_parse_mismatched_end_tag() {
        assert!(XmlParser::new().parse("<a><b></a>").is_err());
    }

    #[test]
    fn test_parse_unclosed_element() {
        assert!(XmlParser::new().parse("<a><b>text").is_err());
    }

    #[test]
    fn test_decode_unknown_entity_kept() {
        assert_eq!(decode_entity("nbsp"), "&nbsp;");
        assert_eq!(decode_entity("#zz"), "&#zz;");
    }
}
