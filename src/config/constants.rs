//! Configuration constants.
//!
//! This module defines the constants used throughout the proxy, including
//! timeouts, redirect limits, and other operational parameters. Most of them
//! serve as defaults for the matching `Config` fields.

/// Default listening port (overridden by `--port` or the `PORT` environment variable)
pub const DEFAULT_PORT: u16 = 3000;

/// Default bind address for the HTTP front end
pub const DEFAULT_BIND_ADDRESS: &str = "0.0.0.0";

/// Default mount point of the proxy route.
///
/// Rewritten references take the form `{mount}?url={encoded}`.
pub const DEFAULT_MOUNT_PATH: &str = "/proxy";

/// Alias route that only accepts the query-parameter form
pub const FETCH_ALIAS_PATH: &str = "/fetch";

/// Name of the query parameter carrying the target URL
pub const TARGET_QUERY_PARAM: &str = "url";

// Redirect probe (URL Resolver)
/// Timeout for the metadata-only redirect probe, in seconds.
/// This is an upper bound: larger configured values are clamped to it.
pub const PROBE_TIMEOUT_SECS: u64 = 10;
/// Maximum number of redirect hops the probe follows.
/// Larger configured values are clamped to it.
pub const PROBE_MAX_HOPS: usize = 5;

// Content fetch
/// Hard timeout for the main retrieval request, in seconds
pub const FETCH_TIMEOUT_SECS: u64 = 30;
/// Maximum number of redirects followed by the transport during the main fetch
pub const FETCH_MAX_REDIRECTS: usize = 10;
/// TCP connection timeout in seconds (applies to both probe and fetch)
pub const TCP_CONNECT_TIMEOUT_SECS: u64 = 10;

/// Default User-Agent string for outbound requests.
///
/// Mimics a modern Chrome browser on Windows. Origins frequently serve
/// degraded content (or block) clients that do not look like a browser.
/// Users can override this via the `--user-agent` CLI flag.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Scheme prepended to targets that do not carry one
pub const DEFAULT_SCHEME: &str = "http";

/// Content-type used when the origin does not declare one
pub const DEFAULT_CONTENT_TYPE: &str = "text/html";

/// Maximum length of the human-readable message in an error body.
/// Longer transport error descriptions are truncated.
pub const MAX_ERROR_MESSAGE_LENGTH: usize = 300;

/// Maximum accepted target URL length (matches common browser/server limits)
pub const MAX_TARGET_LENGTH: usize = 8192;
