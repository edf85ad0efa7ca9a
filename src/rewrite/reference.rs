//! Classification and wrapping of individual resource references.
//!
//! Every navigable reference is turned into `{base}?url={absolute}`, where
//! `{absolute}` is the fully qualified target percent-encoded exactly once.

use std::borrow::Cow;

use percent_encoding::{percent_decode_str, utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

use super::context::RewriteContext;
use crate::config::TARGET_QUERY_PARAM;
use crate::target::has_http_scheme;

/// Everything except RFC 3986 unreserved characters is encoded.
const WRAPPED_URL: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'~');

/// Prefixes of references that must never be routed through the proxy.
const NON_NAVIGABLE_PREFIXES: &[&str] = &["javascript:", "mailto:", "tel:", "data:", "blob:", "about:"];

/// How a reference is written, which decides how it is made absolute.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReferenceKind {
    /// `http://…` or `https://…`
    Absolute,
    /// `//host/path`
    ProtocolRelative,
    /// `/path`
    RootRelative,
    /// `path`
    DocumentRelative,
    /// `javascript:`, `mailto:`, `tel:`, `#fragment`, other schemes, empty
    NonNavigable,
    /// Already a proxy-relative wrapper
    AlreadyWrapped,
}

/// Returns true if the value starts with a URI scheme (`[a-z][a-z0-9+.-]*:`).
fn has_scheme(value: &str) -> bool {
    let Some(colon) = value.find(':') else {
        return false;
    };
    let scheme = &value[..colon];
    let mut chars = scheme.chars();
    matches!(chars.next(), Some(c) if c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}

/// Returns the query-form wrapper prefix, e.g. `/proxy?url=`.
fn wrapper_prefix(ctx: &RewriteContext) -> String {
    format!("{}?{}=", ctx.proxy_base_path(), TARGET_QUERY_PARAM)
}

/// Returns true if the value is a proxy-relative wrapper around an absolute URL.
fn is_wrapped(value: &str, ctx: &RewriteContext) -> bool {
    unwrap_reference(value, ctx.proxy_base_path()).is_some()
}

/// Classifies a reference (already trimmed and entity-decoded).
pub fn classify(value: &str, ctx: &RewriteContext) -> ReferenceKind {
    let lower = value.to_ascii_lowercase();
    if value.is_empty()
        || value.starts_with('#')
        || NON_NAVIGABLE_PREFIXES.iter().any(|p| lower.starts_with(p))
    {
        return ReferenceKind::NonNavigable;
    }
    if is_wrapped(value, ctx) {
        return ReferenceKind::AlreadyWrapped;
    }
    if has_http_scheme(value) {
        return ReferenceKind::Absolute;
    }
    if value.starts_with("//") {
        return ReferenceKind::ProtocolRelative;
    }
    if value.starts_with('/') {
        return ReferenceKind::RootRelative;
    }
    if has_scheme(value) {
        // ftp:, sms:, intent: and friends cannot be fetched through the proxy
        return ReferenceKind::NonNavigable;
    }
    ReferenceKind::DocumentRelative
}

/// Resolves a navigable reference to the absolute URL it designates.
///
/// Returns `None` for `NonNavigable` and `AlreadyWrapped` references.
pub fn absolutize(value: &str, kind: ReferenceKind, ctx: &RewriteContext) -> Option<String> {
    match kind {
        ReferenceKind::Absolute => Some(value.to_string()),
        ReferenceKind::ProtocolRelative => Some(format!("https:{value}")),
        ReferenceKind::RootRelative => Some(format!("{}{value}", ctx.origin())),
        ReferenceKind::DocumentRelative => Some(format!("{}/{value}", ctx.origin())),
        ReferenceKind::NonNavigable | ReferenceKind::AlreadyWrapped => None,
    }
}

/// Wraps an absolute URL into the proxy-relative form.
pub fn wrap(absolute: &str, ctx: &RewriteContext) -> String {
    format!(
        "{}{}",
        wrapper_prefix(ctx),
        utf8_percent_encode(absolute, WRAPPED_URL)
    )
}

/// Reverses `wrap`: returns the embedded absolute URL of a proxy-relative reference.
///
/// Both the query form (`{base}?url=<encoded>`) and the path form
/// (`{base}/<absolute>`) are recognized. Returns `None` if `value` is not a
/// wrapper or does not embed an absolute http(s) URL.
pub fn unwrap_reference(value: &str, proxy_base_path: &str) -> Option<String> {
    let rest = value.strip_prefix(proxy_base_path)?;

    let embedded = if let Some(query) = rest.strip_prefix('?') {
        let encoded = query.strip_prefix(TARGET_QUERY_PARAM)?.strip_prefix('=')?;
        percent_decode_str(encoded).decode_utf8().ok()?.into_owned()
    } else if let Some(path) = rest.strip_prefix('/') {
        path.to_string()
    } else {
        return None;
    };

    has_http_scheme(&embedded).then_some(embedded)
}

/// Rewrites one reference value, returning it unchanged when it is not navigable
/// or already wrapped.
///
/// Surrounding whitespace is ignored, as browsers do.
pub fn rewrite_reference<'a>(value: &'a str, ctx: &RewriteContext) -> Cow<'a, str> {
    let trimmed = value.trim();
    let kind = classify(trimmed, ctx);
    match absolutize(trimmed, kind, ctx) {
        Some(absolute) => Cow::Owned(wrap(&absolute, ctx)),
        None => Cow::Borrowed(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RewriteContext {
        RewriteContext::new("https://example.com", "/proxy")
    }

    #[test]
    fn test_classification_table() {
        let ctx = ctx();
        assert_eq!(classify("http://a.com/x", &ctx), ReferenceKind::Absolute);
        assert_eq!(classify("HTTPS://a.com/x", &ctx), ReferenceKind::Absolute);
        assert_eq!(classify("//cdn.a.com/x.js", &ctx), ReferenceKind::ProtocolRelative);
        assert_eq!(classify("/img/logo.png", &ctx), ReferenceKind::RootRelative);
        assert_eq!(classify("style.css", &ctx), ReferenceKind::DocumentRelative);
        assert_eq!(classify("javascript:alert(1)", &ctx), ReferenceKind::NonNavigable);
        assert_eq!(classify("JavaScript:void(0)", &ctx), ReferenceKind::NonNavigable);
        assert_eq!(classify("mailto:a@b.com", &ctx), ReferenceKind::NonNavigable);
        assert_eq!(classify("tel:+15551234", &ctx), ReferenceKind::NonNavigable);
        assert_eq!(classify("#top", &ctx), ReferenceKind::NonNavigable);
        assert_eq!(classify("data:image/png;base64,AAAA", &ctx), ReferenceKind::NonNavigable);
        assert_eq!(classify("ftp://files.a.com/", &ctx), ReferenceKind::NonNavigable);
        assert_eq!(classify("", &ctx), ReferenceKind::NonNavigable);
    }

    #[test]
    fn test_wrapped_reference_is_detected() {
        let ctx = ctx();
        let wrapped = wrap("https://example.com/a", &ctx);
        assert_eq!(classify(&wrapped, &ctx), ReferenceKind::AlreadyWrapped);
        assert_eq!(
            classify("/proxy/https://example.com/a", &ctx),
            ReferenceKind::AlreadyWrapped
        );
    }

    #[test]
    fn test_origin_path_named_like_mount_is_not_wrapped() {
        // The origin's own /proxy/settings page is a root-relative link
        assert_eq!(classify("/proxy/settings", &ctx()), ReferenceKind::RootRelative);
        assert_eq!(classify("/proxy?url=relative", &ctx()), ReferenceKind::RootRelative);
    }

    #[test]
    fn test_root_relative_rewrite() {
        let rewritten = rewrite_reference("/img/logo.png", &ctx());
        assert_eq!(
            rewritten,
            "/proxy?url=https%3A%2F%2Fexample.com%2Fimg%2Flogo.png"
        );
        assert_eq!(
            unwrap_reference(&rewritten, "/proxy").as_deref(),
            Some("https://example.com/img/logo.png")
        );
    }

    #[test]
    fn test_each_form_unwraps_to_intended_target() {
        let ctx = ctx();
        let cases = [
            ("http://other.org/page?a=1&b=2", "http://other.org/page?a=1&b=2"),
            ("//cdn.example.net/app.js", "https://cdn.example.net/app.js"),
            ("/about", "https://example.com/about"),
            ("about-us.html", "https://example.com/about-us.html"),
        ];
        for (input, expected) in cases {
            let rewritten = rewrite_reference(input, &ctx);
            assert_eq!(
                unwrap_reference(&rewritten, ctx.proxy_base_path()).as_deref(),
                Some(expected),
                "closure failed for {}",
                input
            );
        }
    }

    #[test]
    fn test_existing_escapes_are_encoded_once() {
        let ctx = ctx();
        let rewritten = rewrite_reference("/search?q=a%20b", &ctx);
        assert_eq!(
            rewritten,
            "/proxy?url=https%3A%2F%2Fexample.com%2Fsearch%3Fq%3Da%2520b"
        );
        assert_eq!(
            unwrap_reference(&rewritten, "/proxy").as_deref(),
            Some("https://example.com/search?q=a%20b")
        );
    }

    #[test]
    fn test_rewrite_is_idempotent() {
        let ctx = ctx();
        let once = rewrite_reference("/a/b.css", &ctx).into_owned();
        let twice = rewrite_reference(&once, &ctx).into_owned();
        assert_eq!(once, twice);
    }

    #[test]
    fn test_whitespace_is_ignored() {
        let rewritten = rewrite_reference("  /x  ", &ctx());
        assert_eq!(rewritten, "/proxy?url=https%3A%2F%2Fexample.com%2Fx");
    }

    #[test]
    fn test_non_navigable_is_borrowed_unchanged() {
        let value = "javascript:alert(1)";
        assert!(matches!(rewrite_reference(value, &ctx()), Cow::Borrowed(v) if v == value));
    }

    #[test]
    fn test_unwrap_rejects_non_wrappers() {
        assert_eq!(unwrap_reference("/other?url=http%3A%2F%2Fa.com", "/proxy"), None);
        assert_eq!(unwrap_reference("/proxyish?url=http%3A%2F%2Fa.com", "/proxy"), None);
        assert_eq!(unwrap_reference("/proxy?target=http%3A%2F%2Fa.com", "/proxy"), None);
    }
}
