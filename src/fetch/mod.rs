//! Target resolution and content retrieval.
//!
//! This module provides:
//! - The URL Resolver (`resolve_target`), a best-effort redirect probe
//! - The Content Fetcher (`fetch_content`), the real retrieval request
//! - The outbound header policy shared by both
//!
//! HTTP error statuses are ordinary results here; only transport failures
//! become a `ProxyError`.

mod redirects;
mod request;
mod types;

use log::debug;
use reqwest::header::CONTENT_TYPE;
use reqwest::Method;

use crate::error_handling::{categorize_reqwest_error, ProxyError};

pub use redirects::{resolve_redirect_chain, resolve_target};
pub use types::{FetchResult, InboundRequest, ResolvedTarget, ResponseHeaders};

/// Returns true for methods whose inbound body is forwarded to the origin.
fn forwards_body(method: &Method) -> bool {
    *method == Method::POST || *method == Method::PUT
}

/// Fetches the resolved target with the inbound method and (where applicable) body.
///
/// The outbound header set is synthetic (see `request::OutboundHeaders`); the
/// inbound `Content-Type` accompanies a forwarded body, and a Referer is sent
/// only if the inbound one is not self-referential. The body is captured as
/// raw bytes whatever its content-type.
///
/// # Errors
///
/// Returns a classified `ProxyError` for transport failures (DNS, timeout,
/// TLS, connection). Any HTTP status from the origin is a success.
pub async fn fetch_content(
    client: &reqwest::Client,
    resolved: &ResolvedTarget,
    inbound: &InboundRequest,
) -> Result<FetchResult, ProxyError> {
    let target = resolved.final_url.as_str();
    debug!(
        "Sending {} request to final URL {target} with headers {:?}",
        inbound.method,
        request::OutboundHeaders::as_vec()
    );

    let withheld = request::withheld_inbound_headers(&inbound.headers);
    if !withheld.is_empty() {
        debug!("Withholding inbound headers from {target}: {withheld:?}");
    }

    let referer = request::forwarded_referer(&inbound.headers);
    let mut builder = request::OutboundHeaders::apply_to_request_builder(
        client.request(inbound.method.clone(), target),
        referer.as_deref(),
    );

    if forwards_body(&inbound.method) {
        if let Some(content_type) = inbound.headers.get(CONTENT_TYPE) {
            builder = builder.header(CONTENT_TYPE, content_type.clone());
        }
        builder = builder.body(inbound.body.clone());
    }

    let response = builder
        .send()
        .await
        .map_err(|e| categorize_reqwest_error(&e, target))?;

    let status = response.status().as_u16();
    let url = response.url().to_string();
    let headers = ResponseHeaders::from_header_map(response.headers());
    let content_type = FetchResult::content_type_from(&headers);

    let body = response
        .bytes()
        .await
        .map_err(|e| categorize_reqwest_error(&e, target))?
        .to_vec();

    debug!(
        "Fetched {url}: status {status}, {} bytes, {} headers, content-type {content_type}",
        body.len(),
        headers.len()
    );

    Ok(FetchResult {
        status,
        headers,
        body,
        content_type,
        url,
    })
}
