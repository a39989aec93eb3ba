//! Minimal XML element model for navigation documents.
//!
//! Navigation trees are composed as [`XmlElement`] values, transformed as
//! plain data and serialized once with [`XmlSerializer`]. [`XmlParser`] reads
//! info variant renderings and previously rendered documents back into the
//! same model.
//!
//! # Example
//!
//! ```
//! use nav_xml::{XmlElement, XmlParser, XmlSerializer};
//!
//! let doc = XmlElement::new("navtree").with_attr("theme", "blue");
//! let xml = XmlSerializer::new().serialize(&doc);
//! assert_eq!(xml, r#"<navtree theme="blue"/>"#);
//!
//! let parsed = XmlParser::new().parse(&xml).unwrap();
//! assert_eq!(parsed, doc);
//! ```

mod element;
mod error;
mod parser;
mod serializer;

pub use element::{Descendants, XmlElement};
pub use error::XmlError;
pub use parser::XmlParser;
pub use serializer::XmlSerializer;
