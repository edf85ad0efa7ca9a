//! Textual rewriting of HTML attributes and CSS `url(...)` references.
//!
//! This is a tolerant, regex-based transform over raw bytes, not an HTML
//! parse. Bytes outside matched references are never touched, so documents in
//! any ASCII-compatible encoding survive; malformed markup keeps whatever
//! matches succeed.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::bytes::{Captures, Regex};

use super::context::RewriteContext;
use super::reference::rewrite_reference;

/// `href=`, `src=` and `action=` with a double-quoted, single-quoted or unquoted value.
static ATTRIBUTE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i-u)(\b(?:href|src|action)\s*=\s*)(?:"([^"]*)"|'([^']*)'|([^\s"'=<>`]+))"#)
        .expect("attribute pattern is valid")
});

/// CSS `url(...)` with a double-quoted, single-quoted or bare value.
static CSS_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i-u)(\burl\(\s*)(?:"([^"]*)"|'([^']*)'|([^"'\s)]*))(\s*\))"#)
        .expect("css url pattern is valid")
});

/// Which quoting a matched value used.
#[derive(Clone, Copy)]
enum Quote {
    Double,
    Single,
    Bare,
}

impl Quote {
    fn as_bytes(self) -> &'static [u8] {
        match self {
            Quote::Double => b"\"",
            Quote::Single => b"'",
            Quote::Bare => b"",
        }
    }
}

/// Returns the value capture (groups 2–4) and its quoting.
fn value_capture<'h>(caps: &Captures<'h>) -> Option<(&'h [u8], Quote)> {
    caps.get(2)
        .map(|m| (m.as_bytes(), Quote::Double))
        .or_else(|| caps.get(3).map(|m| (m.as_bytes(), Quote::Single)))
        .or_else(|| caps.get(4).map(|m| (m.as_bytes(), Quote::Bare)))
}

/// Rewrites a raw value; non-UTF-8 values are left alone.
fn rewrite_value<'v>(raw: &'v [u8], ctx: &RewriteContext, decode_entities: bool) -> Cow<'v, [u8]> {
    let Ok(value) = std::str::from_utf8(raw) else {
        return Cow::Borrowed(raw);
    };
    let decoded = if decode_entities && value.contains("&amp;") {
        Cow::Owned(value.replace("&amp;", "&"))
    } else {
        Cow::Borrowed(value)
    };
    match rewrite_reference(&decoded, ctx) {
        Cow::Owned(rewritten) => Cow::Owned(rewritten.into_bytes()),
        Cow::Borrowed(_) => Cow::Borrowed(raw),
    }
}

/// Rebuilds a match as `prefix + quote + value + quote + suffix`.
///
/// `attribute` selects HTML attribute handling: entities are decoded and a
/// rewritten bare value is double-quoted (the wrapper contains `=`).
fn rebuild(caps: &Captures<'_>, ctx: &RewriteContext, attribute: bool) -> Vec<u8> {
    let whole = caps.get(0).map(|m| m.as_bytes()).unwrap_or_default();
    let Some((raw, quote)) = value_capture(caps) else {
        return whole.to_vec();
    };
    let prefix = caps.get(1).map(|m| m.as_bytes()).unwrap_or_default();
    let suffix = caps.get(5).map(|m| m.as_bytes()).unwrap_or_default();

    let value = rewrite_value(raw, ctx, attribute);
    let quote = match (quote, &value) {
        (Quote::Bare, Cow::Owned(_)) if attribute => Quote::Double,
        _ => quote,
    };
    let mut out = Vec::with_capacity(prefix.len() + value.len() + suffix.len() + 2);
    out.extend_from_slice(prefix);
    out.extend_from_slice(quote.as_bytes());
    out.extend_from_slice(&value);
    out.extend_from_slice(quote.as_bytes());
    out.extend_from_slice(suffix);
    out
}

/// Rewrites CSS `url(...)` references in a stylesheet or style block.
pub fn rewrite_css(input: &[u8], ctx: &RewriteContext) -> Vec<u8> {
    CSS_URL_RE
        .replace_all(input, |caps: &Captures<'_>| rebuild(caps, ctx, false))
        .into_owned()
}

/// Rewrites `href`, `src`, `action` attributes and CSS `url(...)` references
/// in an HTML document.
pub fn rewrite_html(input: &[u8], ctx: &RewriteContext) -> Vec<u8> {
    let attributes_done =
        ATTRIBUTE_RE.replace_all(input, |caps: &Captures<'_>| rebuild(caps, ctx, true));
    rewrite_css(&attributes_done, ctx)
}
