//! Outbound request header policy.
//!
//! Origins receive a fixed, synthetic header set instead of a copy of the
//! inbound headers. This keeps proxy-internal headers (Origin, Referer,
//! X-Forwarded-*, the proxy's own Host and cookies) away from the origin.

use reqwest::header::{HeaderMap, ACCEPT, ACCEPT_ENCODING, ACCEPT_LANGUAGE, HOST, REFERER};

use crate::config::{
    OUTBOUND_ACCEPT, OUTBOUND_ACCEPT_ENCODING, OUTBOUND_ACCEPT_LANGUAGE, STRIPPED_INBOUND_HEADERS,
};

/// Realistic browser request headers sent with every outbound request.
///
/// The User-Agent is configured on the client itself, so it is not repeated here.
pub(crate) struct OutboundHeaders;

impl OutboundHeaders {
    /// Returns headers as (name, value) tuples, for logging and tests.
    pub(crate) fn as_vec() -> Vec<(String, String)> {
        vec![
            ("accept".to_string(), OUTBOUND_ACCEPT.to_string()),
            (
                "accept-language".to_string(),
                OUTBOUND_ACCEPT_LANGUAGE.to_string(),
            ),
            (
                "accept-encoding".to_string(),
                OUTBOUND_ACCEPT_ENCODING.to_string(),
            ),
        ]
    }

    /// Applies the synthetic header set (plus an optional Referer) to a request.
    pub(crate) fn apply_to_request_builder(
        builder: reqwest::RequestBuilder,
        referer: Option<&str>,
    ) -> reqwest::RequestBuilder {
        let builder = builder
            .header(ACCEPT, OUTBOUND_ACCEPT)
            .header(ACCEPT_LANGUAGE, OUTBOUND_ACCEPT_LANGUAGE)
            .header(ACCEPT_ENCODING, OUTBOUND_ACCEPT_ENCODING);
        match referer {
            Some(referer) => builder.header(REFERER, referer),
            None => builder,
        }
    }
}

/// Names of the proxy-internal headers present on the inbound request.
pub(crate) fn withheld_inbound_headers(inbound: &HeaderMap) -> Vec<&'static str> {
    STRIPPED_INBOUND_HEADERS
        .iter()
        .copied()
        .filter(|name| inbound.contains_key(*name))
        .collect()
}

/// Returns the inbound Referer if it may be forwarded to the origin.
///
/// A Referer pointing back at the proxy itself (same authority as the inbound
/// `Host` header) is self-referential: it would leak the proxy's address and
/// mean nothing to the origin, so it is dropped.
pub(crate) fn forwarded_referer(inbound: &HeaderMap) -> Option<String> {
    let referer = inbound.get(REFERER)?.to_str().ok()?.trim();
    let parsed = url::Url::parse(referer).ok()?;
    if !matches!(parsed.scheme(), "http" | "https") {
        return None;
    }

    let referer_authority = match (parsed.host_str(), parsed.port()) {
        (Some(host), Some(port)) => format!("{host}:{port}"),
        (Some(host), None) => host.to_string(),
        (None, _) => return None,
    };
    let proxy_host = inbound.get(HOST).and_then(|h| h.to_str().ok());
    match proxy_host {
        Some(proxy_host) if proxy_host.eq_ignore_ascii_case(&referer_authority) => None,
        _ => Some(referer.to_string()),
    }
}
