//! XML serializer for [`XmlElement`] trees.

use crate::element::XmlElement;

const DECLARATION: &str = r#"<?xml version="1.0" encoding="UTF-8"?>"#;

/// Serialize element trees to XML text.
///
/// Output is compact by default. Elements without text and children are
/// self-closed.
#[derive(Clone, Debug, Default)]
pub struct XmlSerializer {
    indent: Option<usize>,
    declaration: bool,
}

impl XmlSerializer {
    /// Create a compact serializer without XML declaration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Indent nested elements by `width` spaces, one element per line.
    #[must_use]
    pub fn with_indent(mut self, width: usize) -> Self {
        self.indent = Some(width);
        self
    }

    /// Prefix the output with an XML declaration.
    #[must_use]
    pub fn with_declaration(mut self, declaration: bool) -> Self {
        self.declaration = declaration;
        self
    }

    /// Serialize a document rooted at `root`.
    #[must_use]
    pub fn serialize(&self, root: &XmlElement) -> String {
        let mut out = String::with_capacity(4096);
        if self.declaration {
            out.push_str(DECLARATION);
            if self.indent.is_some() {
                out.push('\n');
            }
        }
        self.write_element(root, 0, &mut out);
        if self.indent.is_some() {
            out.push('\n');
        }
        out
    }

    fn write_element(&self, element: &XmlElement, depth: usize, out: &mut String) {
        self.write_indent(depth, out);
        out.push('<');
        out.push_str(&element.name);
        for (key, value) in &element.attrs {
            out.push(' ');
            out.push_str(key);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }

        if element.children.is_empty() && element.text.is_empty() {
            out.push_str("/>");
            return;
        }
        out.push('>');
        out.push_str(&escape_text(&element.text));

        if !element.children.is_empty() {
            for child in &element.children {
                self.newline(out);
                self.write_element(child, depth + 1, out);
            }
            self.newline(out);
            self.write_indent(depth, out);
        }

        out.push_str("</");
        out.push_str(&element.name);
        out.push('>');
    }

    fn newline(&self, out: &mut String) {
        if self.indent.is_some() {
            out.push('\n');
        }
    }

    fn write_indent(&self, depth: usize, out: &mut String) {
        if let Some(width) = self.indent {
            out.extend(std::iter::repeat_n(' ', width * depth));
        }
    }
}

/// Escape text for XML content.
fn escape_text(text: &str) -> String {
    escape_xml(text, false)
}

/// Escape text for XML attribute values.
fn escape_attr(text: &str) -> String {
    escape_xml(text, true)
}

/// Escape XML special characters.
fn escape_xml(text: &str, escape_quotes: bool) -> String {
    let mut result = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => result.push_str("&amp;"),
            '<' => result.push_str("&lt;"),
            '>' => result.push_str("&gt;"),
            '"' if escape_quotes => result.push_str("&quot;"),
            '\'' if escape_quotes => result.push_str("&apos;"),
            _ => result.push(ch),
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::parser::XmlParser;

    fn sample() -> XmlElement {
        XmlElement::new("navtree")
            .with_attr("theme", "blue")
            .with_child(
                XmlElement::new("navon")
                    .with_attr("id", "1")
                    .with_child(XmlElement::new("info").with_text("/a?x=1&y=2")),
            )
            .with_child(XmlElement::new("navon").with_attr("id", "2"))
    }

    #[test]
    fn test_serialize_compact() {
        let xml = XmlSerializer::new().serialize(&sample());

        assert_eq!(
            xml,
            r#"<navtree theme="blue"><navon id="1"><info>/a?x=1&amp;y=2</info></navon><navon id="2"/></navtree>"#
        );
    }

    #[test]
    fn test_serialize_indented_with_declaration() {
        let xml = XmlSerializer::new()
            .with_indent(2)
            .with_declaration(true)
            .serialize(&sample());

        let expected = r#"<?xml version="1.0" encoding="UTF-8"?>
<navtree theme="blue">
  <navon id="1">
    <info>/a?x=1&amp;y=2</info>
  </navon>
  <navon id="2"/>
</navtree>
"#;
        assert_eq!(xml, expected);
    }

    #[test]
    fn test_escape_attribute_quotes() {
        let element = XmlElement::new("a").with_attr("title", r#"say "hi" & 'bye'"#);

        assert_eq!(
            XmlSerializer::new().serialize(&element),
            r#"<a title="say &quot;hi&quot; &amp; &apos;bye&apos;"/>"#
        );
    }

    #[test]
    fn test_escape_text_keeps_quotes() {
        let element = XmlElement::new("a").with_text(r#"1 < 2 "ok""#);

        assert_eq!(
            XmlSerializer::new().serialize(&element),
            r#"<a>1 &lt; 2 "ok"</a>"#
        );
    }

    #[test]
    fn test_serialize_then_parse_preserves_tree() {
        let tree = sample();

        let xml = XmlSerializer::new().with_indent(4).serialize(&tree);
        let parsed = XmlParser::new().parse(&xml).unwrap();

        assert_eq!(parsed, tree);
    }
}
