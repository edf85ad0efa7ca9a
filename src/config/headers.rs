//! HTTP header constants.
//!
//! This module defines the outbound request header set, the response header
//! allow-list, and the cross-origin headers attached to every proxy response.

/// Accept header sent to the origin (matches a modern browser navigation)
pub const OUTBOUND_ACCEPT: &str =
    "text/html,application/xhtml+xml,application/xml;q=0.9,image/avif,image/webp,image/apng,*/*;q=0.8";
/// Accept-Language header sent to the origin
pub const OUTBOUND_ACCEPT_LANGUAGE: &str = "en-US,en;q=0.9";
/// Accept-Encoding header sent to the origin.
/// Only encodings the HTTP client can transparently decode are advertised.
pub const OUTBOUND_ACCEPT_ENCODING: &str = "gzip, deflate, br";

/// Inbound headers that are never copied to the origin.
///
/// The outbound set is synthetic, so these are withheld by construction and
/// only reported in debug logs. A Referer may still be sent, re-derived from
/// the inbound one when it does not point back at the proxy.
pub const STRIPPED_INBOUND_HEADERS: &[&str] = &[
    "origin",
    "referer",
    "x-forwarded-for",
    "x-forwarded-proto",
    "x-forwarded-host",
    "host",
    "cookie",
];

/// Origin response headers copied verbatim onto the proxy response.
///
/// `content-length` is absent: it is recomputed from the (possibly rewritten)
/// body, or relayed from the origin for HEAD.
pub const PASSTHROUGH_HEADERS: &[&str] = &["last-modified", "etag", "cache-control"];

/// Value of `Access-Control-Allow-Origin` on every proxy response
pub const CORS_ALLOW_ORIGIN: &str = "*";
/// Value of `Access-Control-Allow-Methods` on every proxy response
pub const CORS_ALLOW_METHODS: &str = "GET, POST, PUT, PATCH, DELETE, HEAD, OPTIONS";
/// Value of `Access-Control-Allow-Headers` on every proxy response
pub const CORS_ALLOW_HEADERS: &str = "*";
/// Value of `Access-Control-Expose-Headers` on every proxy response
pub const CORS_EXPOSE_HEADERS: &str = "*";
