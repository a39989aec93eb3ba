//! XML element model.

/// An XML element with ordered attributes, text and child elements.
///
/// Mixed content is not modelled: text appearing anywhere directly inside an
/// element is collected into [`XmlElement::text`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct XmlElement {
    /// Tag name.
    pub name: String,
    /// Attributes in document order.
    pub attrs: Vec<(String, String)>,
    /// Character data.
    pub text: String,
    /// Child elements in document order.
    pub children: Vec<XmlElement>,
}

impl XmlElement {
    /// Create an empty element.
    #[must_use]
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    /// Set an attribute, replacing an existing value in place.
    #[must_use]
    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attr(name, value);
        self
    }

    /// Set an attribute only when a value is present.
    #[must_use]
    pub fn with_opt_attr(self, name: impl Into<String>, value: Option<impl Into<String>>) -> Self {
        match value {
            Some(value) => self.with_attr(name, value),
            None => self,
        }
    }

    /// Set the text content.
    #[must_use]
    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = text.into();
        self
    }

    /// Append a child element.
    #[must_use]
    pub fn with_child(mut self, child: XmlElement) -> Self {
        self.children.push(child);
        self
    }

    /// Append child elements.
    #[must_use]
    pub fn with_children(mut self, children: impl IntoIterator<Item = XmlElement>) -> Self {
        self.children.extend(children);
        self
    }

    /// Value of an attribute.
    #[must_use]
    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attrs
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }

    /// Set an attribute, replacing an existing value in place.
    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attrs.iter_mut().find(|(key, _)| *key == name) {
            Some((_, existing)) => *existing = value,
            None => self.attrs.push((name, value)),
        }
    }

    /// Remove an attribute, returning its value.
    pub fn remove_attr(&mut self, name: &str) -> Option<String> {
        let index = self.attrs.iter().position(|(key, _)| key == name)?;
        Some(self.attrs.remove(index).1)
    }

    /// First direct child with the given name.
    #[must_use]
    pub fn child(&self, name: &str) -> Option<&XmlElement> {
        self.children.iter().find(|child| child.name == name)
    }

    /// Direct children with the given name.
    pub fn children_named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a XmlElement> {
        self.children.iter().filter(move |child| child.name == name)
    }

    /// Text of the first direct child with the given name, trimmed.
    ///
    /// Returns `None` when the child is missing or its text is blank.
    #[must_use]
    pub fn child_text(&self, name: &str) -> Option<&str> {
        self.child(name)
            .map(|child| child.text.trim())
            .filter(|text| !text.is_empty())
    }

    /// First element named `name` in depth-first order, including `self`.
    #[must_use]
    pub fn find(&self, name: &str) -> Option<&XmlElement> {
        self.descendants().find(|element| element.name == name)
    }

    /// Iterate over `self` and all nested elements in depth-first order.
    pub fn descendants(&self) -> Descendants<'_> {
        Descendants { stack: vec![self] }
    }
}

/// Depth-first iterator over an element and its nested elements.
#[derive(Debug)]
pub struct Descendants<'a> {
    stack: Vec<&'a XmlElement>,
}

impl<'a> Iterator for Descendants<'a> {
    type Item = &'a XmlElement;

    fn next(&mut self) -> Option<Self::Item> {
        let element = self.stack.pop()?;
        self.stack.extend(element.children.iter().rev());
        Some(element)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn sample() -> XmlElement {
        XmlElement::new("navtree")
            .with_child(
                XmlElement::new("navon")
                    .with_attr("id", "1")
                    .with_child(XmlElement::new("navon").with_attr("id", "2")),
            )
            .with_child(XmlElement::new("navon").with_attr("id", "3"))
    }

    #[test]
    fn test_set_attr_replaces_in_place() {
        let element = XmlElement::new("a")
            .with_attr("x", "1")
            .with_attr("y", "2")
            .with_attr("x", "3");

        assert_eq!(
            element.attrs,
            vec![("x".to_owned(), "3".to_owned()), ("y".to_owned(), "2".to_owned())]
        );
    }

    #[test]
    fn test_with_opt_attr() {
        let element = XmlElement::new("a")
            .with_opt_attr("x", Some("1"))
            .with_opt_attr("y", None::<String>);

        assert_eq!(element.attr("x"), Some("1"));
        assert_eq!(element.attr("y"), None);
    }

    #[test]
    fn test_remove_attr() {
        let mut element = XmlElement::new("a").with_attr("x", "1");

        assert_eq!(element.remove_attr("x").as_deref(), Some("1"));
        assert_eq!(element.remove_attr("x"), None);
        assert!(element.attrs.is_empty());
    }

    #[test]
    fn test_descendants_depth_first() {
        let tree = sample();

        let ids: Vec<_> = tree.descendants().filter_map(|e| e.attr("id")).collect();

        assert_eq!(ids, vec!["1", "2", "3"]);
    }

    #[test]
    fn test_find_returns_first_match() {
        let tree = sample();

        assert_eq!(tree.find("navon").and_then(|e| e.attr("id")), Some("1"));
        assert!(tree.find("image").is_none());
        assert_eq!(tree.find("navtree").map(|e| e.name.as_str()), Some("navtree"));
    }

    #[test]
    fn test_child_text_trims_and_skips_blank() {
        let element = XmlElement::new("navinfo")
            .with_child(XmlElement::new("theme").with_text("  blue \n"))
            .with_child(XmlElement::new("imageselector").with_text("   "));

        assert_eq!(element.child_text("theme"), Some("blue"));
        assert_eq!(element.child_text("imageselector"), None);
        assert_eq!(element.child_text("missing"), None);
    }

    #[test]
    fn test_children_named() {
        let tree = sample();
        assert_eq!(tree.children_named("navon").count(), 2);
        assert_eq!(tree.children_named("image").count(), 0);
    }
}
