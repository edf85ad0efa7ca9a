//! Data types produced and consumed by the resolver and fetcher.

use std::collections::BTreeMap;

use reqwest::header::HeaderMap;
use reqwest::Method;

use crate::config::DEFAULT_CONTENT_TYPE;

/// Outcome of redirect resolution.
///
/// `final_url` equals `requested_url` when no redirect occurred or when the
/// probe failed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTarget {
    /// Normalized URL the client asked for
    pub requested_url: String,
    /// URL reached after following the redirect chain
    pub final_url: String,
    /// Whether the probe observed at least one redirect
    pub redirected: bool,
    /// Every URL visited by the probe, starting with `requested_url`
    pub redirect_chain: Vec<String>,
}

impl ResolvedTarget {
    /// A resolution that did not (or could not) follow any redirect.
    pub fn unresolved(requested_url: &str) -> Self {
        Self {
            requested_url: requested_url.to_string(),
            final_url: requested_url.to_string(),
            redirected: false,
            redirect_chain: vec![requested_url.to_string()],
        }
    }
}

/// The parts of the inbound request the fetcher consumes.
#[derive(Debug, Clone)]
pub struct InboundRequest {
    pub method: Method,
    pub headers: HeaderMap,
    pub body: Vec<u8>,
}

impl InboundRequest {
    /// Convenience constructor for a body-less GET.
    pub fn get() -> Self {
        Self {
            method: Method::GET,
            headers: HeaderMap::new(),
            body: Vec::new(),
        }
    }
}

/// Response headers keyed by lowercase name.
///
/// Duplicate headers collapse to the last value seen.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ResponseHeaders(BTreeMap<String, String>);

impl ResponseHeaders {
    /// Builds the mapping from a header map; non-UTF-8 values are skipped.
    pub fn from_header_map(headers: &HeaderMap) -> Self {
        let mut map = BTreeMap::new();
        for (name, value) in headers.iter() {
            if let Ok(value) = value.to_str() {
                map.insert(name.as_str().to_ascii_lowercase(), value.to_string());
            }
        }
        Self(map)
    }

    /// Looks a header up by name, ignoring case.
    pub fn get(&self, name: &str) -> Option<&str> {
        self.0.get(&name.to_ascii_lowercase()).map(String::as_str)
    }

    /// Inserts or replaces a header.
    pub fn insert(&mut self, name: &str, value: &str) {
        self.0.insert(name.to_ascii_lowercase(), value.to_string());
    }

    /// Number of distinct header names.
    pub(crate) fn len(&self) -> usize {
        self.0.len()
    }
}

/// A fetched origin response, owned by one request's pipeline.
#[derive(Debug, Clone)]
pub struct FetchResult {
    /// Origin status code (any value, including 4xx/5xx)
    pub status: u16,
    /// Origin response headers
    pub headers: ResponseHeaders,
    /// Raw response body (already transfer-decoded)
    pub body: Vec<u8>,
    /// Declared content-type, or `text/html` when the origin declared none
    pub content_type: String,
    /// URL the transport actually ended up at
    pub url: String,
}

impl FetchResult {
    /// Derives the content-type from the headers, defaulting to `text/html`.
    pub fn content_type_from(headers: &ResponseHeaders) -> String {
        headers
            .get("content-type")
            .map(str::trim)
            .filter(|ct| !ct.is_empty())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_string()
    }
}
