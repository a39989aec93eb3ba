//! Link URL parsing and assembly.
//!
//! Stored links are split into a base and a decoded query map with
//! [`parse_link_url`]; new links are assembled by a [`UrlBuilder`]. The
//! default [`QueryUrlBuilder`] resolves relative templates against a base
//! URL and writes the query in sorted order so the same parameters always
//! produce the same URL.

use std::collections::BTreeMap;
use std::str::Utf8Error;

use percent_encoding::{AsciiSet, NON_ALPHANUMERIC, percent_decode_str, percent_encode};

/// Query parameters of a link, sorted by name.
pub type LinkQuery = BTreeMap<String, String>;

/// Unreserved characters: A-Z a-z 0-9 - . _ ~
const QUERY_ENCODE_SET: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'.')
    .remove(b'_')
    .remove(b'~');

/// Error parsing or assembling a link URL.
#[derive(Debug, thiserror::Error)]
pub enum UrlError {
    /// URL (or its base) is empty.
    #[error("URL is empty")]
    Empty,
    /// Query contains a parameter without a name.
    #[error("query parameter without name: {0:?}")]
    MissingKey(String),
    /// Percent-encoded bytes are not valid UTF-8.
    #[error("invalid percent-encoding")]
    InvalidEncoding(#[from] Utf8Error),
}

/// A stored link split into base and query.
#[derive(Debug, PartialEq, Eq)]
pub struct ParsedUrl {
    /// Everything before `?`.
    pub base: String,
    /// Decoded query parameters.
    pub query: LinkQuery,
}

/// Split a stored link URL into base and decoded query parameters.
///
/// Fragments are dropped. Repeated parameters keep the last value.
///
/// # Errors
///
/// Returns [`UrlError`] if the URL has no base, a parameter has no name, or a
/// component does not decode to UTF-8.
pub fn parse_link_url(url: &str) -> Result<ParsedUrl, UrlError> {
    let url = url.trim();
    let url = url.split_once('#').map_or(url, |(before, _)| before);
    let (base, query_str) = url.split_once('?').unwrap_or((url, ""));
    if base.is_empty() {
        return Err(UrlError::Empty);
    }

    let mut query = LinkQuery::new();
    for pair in query_str.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        if key.is_empty() {
            return Err(UrlError::MissingKey(pair.to_owned()));
        }
        query.insert(decode_component(key)?, decode_component(value)?);
    }

    Ok(ParsedUrl {
        base: base.to_owned(),
        query,
    })
}

/// Decode one query component (`+` means space).
fn decode_component(raw: &str) -> Result<String, UrlError> {
    let spaced = raw.replace('+', " ");
    Ok(percent_decode_str(&spaced).decode_utf8()?.into_owned())
}

/// Percent-encode one query component.
fn encode_component(input: &str) -> String {
    percent_encode(input.as_bytes(), QUERY_ENCODE_SET).to_string()
}

/// Assembles absolute link URLs from a base and query parameters.
pub trait UrlBuilder: Send + Sync {
    /// Build a URL from `base` and `params`.
    ///
    /// Any query already present on `base` is replaced by `params`.
    ///
    /// # Errors
    ///
    /// Returns [`UrlError`] if `base` is empty.
    fn build_url(&self, base: &str, params: &LinkQuery) -> Result<String, UrlError>;
}

/// [`UrlBuilder`] that resolves relative bases against a server base URL.
#[derive(Clone, Debug)]
pub struct QueryUrlBuilder {
    base_url: String,
}

impl QueryUrlBuilder {
    /// Create a builder resolving relative bases against `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
        }
    }

    fn absolute(&self, base: &str) -> String {
        if base.starts_with("http://") || base.starts_with("https://") {
            return base.to_owned();
        }
        format!(
            "{}/{}",
            self.base_url.trim_end_matches('/'),
            base.trim_start_matches('/')
        )
    }
}

impl UrlBuilder for QueryUrlBuilder {
    fn build_url(&self, base: &str, params: &LinkQuery) -> Result<String, UrlError> {
        let base = base.trim();
        let base = base.split(['?', '#']).next().unwrap_or_default();
        if base.is_empty() {
            return Err(UrlError::Empty);
        }

        let mut url = self.absolute(base);
        if !params.is_empty() {
            let query = params
                .iter()
                .map(|(k, v)| format!("{}={}", encode_component(k), encode_component(v)))
                .collect::<Vec<_>>()
                .join("&");
            url.push('?');
            url.push_str(&query);
        }
        Ok(url)
    }
}
