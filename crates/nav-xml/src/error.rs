//! Error types for XML parsing.

use std::str::Utf8Error;

/// Error parsing an XML document.
#[derive(Debug, thiserror::Error)]
pub enum XmlError {
    /// XML parsing error.
    #[error("XML parse error")]
    XmlParse(#[from] quick_xml::Error),

    /// UTF-8 decoding error.
    #[error("UTF-8 error")]
    Utf8(#[from] Utf8Error),

    /// XML attribute error.
    #[error("XML attribute error")]
    XmlAttr(#[from] quick_xml::events::attributes::AttrError),

    /// Encoding error during XML parsing.
    #[error("encoding error")]
    Encoding(#[from] quick_xml::encoding::EncodingError),

    /// Document contains no element.
    #[error("document has no root element")]
    NoRootElement,

    /// Document ended inside an element.
    #[error("unexpected end of document inside <{0}>")]
    UnexpectedEof(String),
}
