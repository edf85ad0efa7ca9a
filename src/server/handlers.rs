//! Front-end HTTP handlers.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, Method, StatusCode, Uri};
use axum::response::{IntoResponse, Response};
use axum::Json;

use super::types::{HealthResponse, UsageResponse};
use crate::config::TARGET_QUERY_PARAM;
use crate::dispatch::{apply_cors_headers, preflight_response, ErrorBody};
use crate::fetch::InboundRequest;
use crate::pipeline::{proxy_request, ProxyContext};
use crate::target::TargetSpec;

/// Extracts the `url` query parameter, percent-decoded.
fn query_target(uri: &Uri) -> Option<String> {
    let query = uri.query()?;
    url::form_urlencoded::parse(query.as_bytes())
        .find(|(key, _)| key == TARGET_QUERY_PARAM)
        .map(|(_, value)| value.into_owned())
}

/// Extracts the raw target of the path form: everything after `{mount}/`.
///
/// The raw path is used instead of a `Path` extractor so the target's own
/// escapes are not decoded a second time.
fn path_target<'u>(uri: &'u Uri, mount_path: &str) -> &'u str {
    uri.path()
        .strip_prefix(mount_path)
        .and_then(|rest| rest.strip_prefix('/'))
        .unwrap_or_default()
}

fn inbound(method: Method, headers: HeaderMap, body: Bytes) -> InboundRequest {
    InboundRequest {
        method,
        headers,
        body: body.to_vec(),
    }
}

/// `ANY {mount}?url=<target>` and `ANY /fetch?url=<target>`
pub async fn proxy_query_handler(
    State(ctx): State<ProxyContext>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if method == Method::OPTIONS {
        return preflight_response();
    }
    let target = TargetSpec::parse(query_target(&uri).as_deref());
    proxy_request(&ctx, target, inbound(method, headers, body)).await
}

/// `ANY {mount}/<target>`; the inbound query string belongs to the target.
pub async fn proxy_path_handler(
    State(ctx): State<ProxyContext>,
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    if method == Method::OPTIONS {
        return preflight_response();
    }
    let target = TargetSpec::from_path(path_target(&uri, &ctx.mount_path), uri.query());
    proxy_request(&ctx, target, inbound(method, headers, body)).await
}

/// `GET /`
pub async fn usage_handler(State(ctx): State<ProxyContext>) -> Response {
    let mut response = Json(UsageResponse::for_mount(&ctx.mount_path)).into_response();
    apply_cors_headers(response.headers_mut());
    response
}

/// `GET /health`
pub async fn health_handler() -> Response {
    let mut response = Json(HealthResponse {
        status: "OK",
        timestamp: chrono::Utc::now().to_rfc3339(),
    })
    .into_response();
    apply_cors_headers(response.headers_mut());
    response
}

/// Any route the proxy does not serve.
pub async fn not_found_handler(State(ctx): State<ProxyContext>, method: Method) -> Response {
    if method == Method::OPTIONS {
        return preflight_response();
    }
    let body = ErrorBody {
        error: "NotFound",
        message: format!(
            "Use {mount}/<url> or {mount}?{param}=<url>",
            mount = ctx.mount_path,
            param = TARGET_QUERY_PARAM
        ),
    };
    let mut response = (StatusCode::NOT_FOUND, Json(body)).into_response();
    apply_cors_headers(response.headers_mut());
    response
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_target_is_decoded() {
        let uri: Uri = "/proxy?url=https%3A%2F%2Fexample.com%2Fa%3Fb%3D1&x=2"
            .parse()
            .unwrap();
        assert_eq!(
            query_target(&uri).as_deref(),
            Some("https://example.com/a?b=1")
        );
    }

    #[test]
    fn test_query_target_absent() {
        let uri: Uri = "/proxy?other=1".parse().unwrap();
        assert_eq!(query_target(&uri), None);
        let uri: Uri = "/proxy".parse().unwrap();
        assert_eq!(query_target(&uri), None);
    }

    #[test]
    fn test_path_target_keeps_escapes() {
        let uri: Uri = "/proxy/https://example.com/a%20b?q=1".parse().unwrap();
        assert_eq!(path_target(&uri, "/proxy"), "https://example.com/a%20b");
    }

    #[test]
    fn test_path_target_requires_separator() {
        let uri: Uri = "/proxyhttps://example.com".parse().unwrap();
        assert_eq!(path_target(&uri, "/proxy"), "");
    }
}
