//! The Rewrite Engine.
//!
//! Rewrites resource references inside HTML and CSS payloads into
//! proxy-relative wrappers so that follow-on navigation stays routed through
//! the proxy. Every other content-type passes through byte-for-byte.
//!
//! Reference forms and how they are resolved:
//!
//! | Form | Example | Embedded target |
//! |---|---|---|
//! | Absolute | `https://a.com/x` | unchanged |
//! | Protocol-relative | `//a.com/x` | `https:` + value |
//! | Root-relative | `/x` | origin + value |
//! | Document-relative | `x` | origin + `/` + value |
//! | Non-navigable | `#top`, `mailto:…` | not rewritten |

mod context;
mod markup;
mod reference;

pub use context::RewriteContext;
pub use markup::{rewrite_css, rewrite_html};
pub use reference::{
    absolutize, classify, rewrite_reference, unwrap_reference, wrap, ReferenceKind,
};

/// Payload families the engine knows how to rewrite.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextualKind {
    Html,
    Css,
}

/// Determines whether a content-type is rewritable markup or stylesheet text.
pub fn textual_kind(content_type: &str) -> Option<TextualKind> {
    let ct = content_type.to_ascii_lowercase();
    if ct.contains("text/html") || ct.contains("application/xhtml+xml") {
        Some(TextualKind::Html)
    } else if ct.contains("text/css") {
        Some(TextualKind::Css)
    } else {
        None
    }
}

/// Rewrites a payload according to its content-type.
///
/// Non-textual payloads are returned as-is without copying.
pub fn rewrite_payload(body: Vec<u8>, content_type: &str, ctx: &RewriteContext) -> Vec<u8> {
    match textual_kind(content_type) {
        Some(TextualKind::Html) => rewrite_html(&body, ctx),
        Some(TextualKind::Css) => rewrite_css(&body, ctx),
        None => body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ctx() -> RewriteContext {
        RewriteContext::new("https://example.com", "/proxy")
    }

    #[test]
    fn test_textual_kind_detection() {
        assert_eq!(textual_kind("text/html; charset=utf-8"), Some(TextualKind::Html));
        assert_eq!(textual_kind("TEXT/HTML"), Some(TextualKind::Html));
        assert_eq!(textual_kind("application/xhtml+xml"), Some(TextualKind::Html));
        assert_eq!(textual_kind("text/css"), Some(TextualKind::Css));
        assert_eq!(textual_kind("image/png"), None);
        assert_eq!(textual_kind("application/javascript"), None);
    }

    #[test]
    fn test_binary_payload_is_untouched() {
        // Bytes that would match the attribute pattern if treated as text
        let body = b"\x89PNG\r\n\x1a\n src=\"/a.png\" \x00\xff".to_vec();
        assert_eq!(rewrite_payload(body.clone(), "image/png", &ctx()), body);
    }

    #[test]
    fn test_css_payload_only_rewrites_urls() {
        let body = b"a{background:url(/bg.png)} /* href=\"/x\" */".to_vec();
        let out = rewrite_payload(body, "text/css", &ctx());
        assert_eq!(
            out,
            b"a{background:url(/proxy?url=https%3A%2F%2Fexample.com%2Fbg.png)} /* href=\"/x\" */"
                .to_vec()
        );
    }

    #[test]
    fn test_html_payload_is_rewritten() {
        let out = rewrite_payload(b"<a href=\"/a\">".to_vec(), "text/html", &ctx());
        assert_eq!(out, b"<a href=\"/proxy?url=https%3A%2F%2Fexample.com%2Fa\">".to_vec());
    }
}
