//! Target URL parsing and normalization.
//!
//! A `TargetSpec` is the client-supplied target string plus its normalized
//! form. Normalization decodes a percent-encoded target, repairs a scheme
//! whose double slash was collapsed by an intermediary, and prepends `http://`
//! when no recognized scheme is present.

use percent_encoding::percent_decode_str;

use crate::config::{DEFAULT_SCHEME, MAX_TARGET_LENGTH};
use crate::error_handling::ProxyError;

/// Client-supplied target and its normalized form.
///
/// Created per request and immutable after normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetSpec {
    raw: String,
    normalized: String,
}

/// Returns true if `value` starts with `http://` or `https://` (ASCII case-insensitive).
pub(crate) fn has_http_scheme(value: &str) -> bool {
    let lower = value
        .get(..8)
        .unwrap_or(value)
        .to_ascii_lowercase();
    lower.starts_with("http://") || lower.starts_with("https://")
}

/// Decodes a fully percent-encoded target such as `https%3A%2F%2Fexample.com%2F`.
///
/// Targets that already carry a readable scheme are returned unchanged so that
/// percent-escapes inside their path or query are not decoded a second time.
fn decode_if_encoded(value: &str) -> String {
    if has_http_scheme(value) || !value.contains('%') {
        return value.to_string();
    }
    match percent_decode_str(value).decode_utf8() {
        Ok(decoded) if has_http_scheme(&decoded) || decoded.starts_with("//") => {
            decoded.into_owned()
        }
        _ => value.to_string(),
    }
}

/// Restores `http:/host` to `http://host` (path segments often get merged slashes).
fn repair_collapsed_scheme(value: &str) -> String {
    for scheme in ["https:/", "http:/"] {
        let (Some(head), Some(tail)) = (value.get(..scheme.len()), value.get(scheme.len()..))
        else {
            continue;
        };
        if head.eq_ignore_ascii_case(scheme) && !tail.is_empty() && !tail.starts_with('/') {
            return format!("{head}/{tail}");
        }
    }
    value.to_string()
}

impl TargetSpec {
    /// Parses and normalizes a raw target.
    ///
    /// # Errors
    ///
    /// - `ProxyError::MissingTarget` if the target is absent or blank
    /// - `ProxyError::NetworkFailure` if the normalized target is not a valid
    ///   http(s) URL
    pub fn parse(raw: Option<&str>) -> Result<Self, ProxyError> {
        let raw = raw.map(str::trim).unwrap_or_default();
        if raw.is_empty() {
            return Err(ProxyError::MissingTarget);
        }
        if raw.len() > MAX_TARGET_LENGTH {
            return Err(ProxyError::NetworkFailure(format!(
                "Target URL exceeds the maximum length of {MAX_TARGET_LENGTH} characters"
            )));
        }

        let decoded = repair_collapsed_scheme(&decode_if_encoded(raw));
        let normalized = if has_http_scheme(&decoded) {
            decoded
        } else if let Some(rest) = decoded.strip_prefix("//") {
            format!("{DEFAULT_SCHEME}://{rest}")
        } else {
            format!("{DEFAULT_SCHEME}://{decoded}")
        };

        match url::Url::parse(&normalized) {
            Ok(parsed) if parsed.host_str().is_some() => Ok(Self {
                raw: raw.to_string(),
                normalized,
            }),
            _ => Err(ProxyError::NetworkFailure(format!(
                "Invalid target URL: {}",
                crate::utils::sanitize::sanitize_and_truncate_error_message(raw)
            ))),
        }
    }

    /// Builds a target from the path form `/proxy/<target>`.
    ///
    /// The inbound query string belongs to the target, not to the proxy, and
    /// is appended to it.
    pub fn from_path(path_target: &str, query: Option<&str>) -> Result<Self, ProxyError> {
        match query.filter(|q| !q.is_empty()) {
            Some(q) if !path_target.trim().is_empty() => {
                Self::parse(Some(&format!("{path_target}?{q}")))
            }
            _ => Self::parse(Some(path_target)),
        }
    }

    /// The target as supplied by the client (trimmed).
    pub fn raw(&self) -> &str {
        &self.raw
    }

    /// The normalized, scheme-qualified target URL.
    pub fn normalized(&self) -> &str {
        &self.normalized
    }
}
