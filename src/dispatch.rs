//! The Response Dispatcher.
//!
//! Maps a fetch outcome onto the outbound response: origin status relayed
//! verbatim, content-type mirrored (or defaulted), a small allow-list of
//! passthrough headers, a recomputed `Content-Length`, and permissive CORS
//! headers on every response. Failures become a fixed status with a JSON body
//! `{ "error": <kind>, "message": <text> }`.

use axum::body::Body;
use axum::http::header::{
    HeaderName, HeaderValue, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, ACCESS_CONTROL_EXPOSE_HEADERS, CONTENT_LENGTH, CONTENT_TYPE,
    LOCATION,
};
use axum::http::{HeaderMap, Method, StatusCode};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::config::{
    CORS_ALLOW_HEADERS, CORS_ALLOW_METHODS, CORS_ALLOW_ORIGIN, CORS_EXPOSE_HEADERS,
    DEFAULT_CONTENT_TYPE, PASSTHROUGH_HEADERS,
};
use crate::error_handling::ProxyError;
use crate::fetch::FetchResult;
use crate::rewrite::{rewrite_reference, RewriteContext};

/// JSON body of an error response.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    pub error: &'static str,
    pub message: String,
}

impl From<&ProxyError> for ErrorBody {
    fn from(err: &ProxyError) -> Self {
        Self {
            error: err.kind().as_str(),
            message: err.to_string(),
        }
    }
}

/// Attaches the permissive cross-origin headers.
pub fn apply_cors_headers(headers: &mut HeaderMap) {
    headers.insert(
        ACCESS_CONTROL_ALLOW_ORIGIN,
        HeaderValue::from_static(CORS_ALLOW_ORIGIN),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_METHODS,
        HeaderValue::from_static(CORS_ALLOW_METHODS),
    );
    headers.insert(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static(CORS_ALLOW_HEADERS),
    );
    headers.insert(
        ACCESS_CONTROL_EXPOSE_HEADERS,
        HeaderValue::from_static(CORS_EXPOSE_HEADERS),
    );
}

/// Origin status as an outbound status.
///
/// Informational statuses cannot be sent as a final response and become 502.
fn relayed_status(status: u16) -> StatusCode {
    match StatusCode::from_u16(status) {
        Ok(code) if !code.is_informational() => code,
        _ => StatusCode::BAD_GATEWAY,
    }
}

/// Builds the response for a successful fetch.
///
/// `result.body` is sent as-is: the caller has already rewritten it (or left
/// it untouched for binary content). A `Location` header is rewritten through
/// `ctx` when one is given, so redirects the transport did not follow stay on
/// the proxy.
///
/// A HEAD response has no body to measure, so the origin's `Content-Length`
/// is relayed for it instead.
pub fn dispatch_success(
    result: FetchResult,
    ctx: Option<&RewriteContext>,
    method: &Method,
) -> Response {
    let mut headers = HeaderMap::new();

    let content_type = HeaderValue::from_str(&result.content_type)
        .unwrap_or_else(|_| HeaderValue::from_static(DEFAULT_CONTENT_TYPE));
    headers.insert(CONTENT_TYPE, content_type);

    for name in PASSTHROUGH_HEADERS {
        let Some(value) = result.headers.get(name) else {
            continue;
        };
        if let (Ok(name), Ok(value)) = (
            HeaderName::from_bytes(name.as_bytes()),
            HeaderValue::from_str(value),
        ) {
            headers.insert(name, value);
        }
    }

    if let (Some(location), Some(ctx)) = (result.headers.get("location"), ctx) {
        if let Ok(value) = HeaderValue::from_str(&rewrite_reference(location, ctx)) {
            headers.insert(LOCATION, value);
        }
    }

    let origin_length = result
        .headers
        .get("content-length")
        .and_then(|value| HeaderValue::from_str(value).ok());
    match origin_length {
        Some(length) if *method == Method::HEAD => {
            headers.insert(CONTENT_LENGTH, length);
        }
        _ => {
            headers.insert(CONTENT_LENGTH, HeaderValue::from(result.body.len()));
        }
    }
    apply_cors_headers(&mut headers);

    (relayed_status(result.status), headers, Body::from(result.body)).into_response()
}

/// Builds the response for a classified failure.
pub fn dispatch_error(err: &ProxyError) -> Response {
    let status =
        StatusCode::from_u16(err.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    let mut response = (status, axum::Json(ErrorBody::from(err))).into_response();
    apply_cors_headers(response.headers_mut());
    response
}

/// Builds the response to a CORS preflight request.
pub fn preflight_response() -> Response {
    let mut response = StatusCode::NO_CONTENT.into_response();
    apply_cors_headers(response.headers_mut());
    response
}
