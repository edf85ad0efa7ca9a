//! Error type definitions.
//!
//! This module defines the proxy error taxonomy surfaced to clients and the
//! errors that can occur while initializing the process.

use log::SetLoggerError;
use reqwest::Error as ReqwestError;
use strum_macros::EnumIter as EnumIterMacro;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
#[allow(clippy::enum_variant_names)] // All variants end with "Error" by convention
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),

    /// Error initializing an outbound HTTP client.
    #[error("HTTP client initialization error: {0}")]
    HttpClientError(#[from] ReqwestError),
}

/// A classified failure of one proxied request.
///
/// Every variant carries enough detail to render a short user-facing message;
/// none of them carry the raw transport error chain.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ProxyError {
    /// No target URL was supplied with the request.
    #[error("No target URL provided. Use /proxy?url=<url> or /proxy/<url>")]
    MissingTarget,

    /// The target host could not be resolved.
    #[error("Could not resolve host {host}")]
    UnresolvedHost {
        /// Host name (or the raw target when no host could be parsed)
        host: String,
    },

    /// The outbound request exceeded its deadline.
    #[error("The target did not respond in time")]
    Timeout,

    /// The origin answered with an HTTP error status.
    ///
    /// Ordinary error responses are relayed as successful fetches; this variant
    /// only exists so the status can be carried through the error path.
    #[error("The target responded with HTTP status {0}")]
    UpstreamStatus(u16),

    /// Any other transport-level failure (TLS, connection reset, unreachable).
    #[error("Proxy request failed: {0}")]
    NetworkFailure(String),
}

/// Tag identifying a `ProxyError` variant.
///
/// `as_str()` is the value of the `error` field in outbound error bodies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, EnumIterMacro)]
pub enum ErrorKind {
    MissingTarget,
    UnresolvedHost,
    Timeout,
    UpstreamStatus,
    NetworkFailure,
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl ErrorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ErrorKind::MissingTarget => "MissingTarget",
            ErrorKind::UnresolvedHost => "UnresolvedHost",
            ErrorKind::Timeout => "Timeout",
            ErrorKind::UpstreamStatus => "UpstreamStatus",
            ErrorKind::NetworkFailure => "NetworkFailure",
        }
    }
}

impl ProxyError {
    /// Returns the kind tag of this error.
    pub fn kind(&self) -> ErrorKind {
        match self {
            ProxyError::MissingTarget => ErrorKind::MissingTarget,
            ProxyError::UnresolvedHost { .. } => ErrorKind::UnresolvedHost,
            ProxyError::Timeout => ErrorKind::Timeout,
            ProxyError::UpstreamStatus(_) => ErrorKind::UpstreamStatus,
            ProxyError::NetworkFailure(_) => ErrorKind::NetworkFailure,
        }
    }

    /// Outbound HTTP status for this error.
    ///
    /// | Kind | Status |
    /// |---|---|
    /// | MissingTarget | 400 |
    /// | UnresolvedHost | 404 |
    /// | Timeout | 408 |
    /// | UpstreamStatus | origin status |
    /// | NetworkFailure | 500 |
    pub fn status_code(&self) -> u16 {
        match self {
            ProxyError::MissingTarget => 400,
            ProxyError::UnresolvedHost { .. } => 404,
            ProxyError::Timeout => 408,
            ProxyError::UpstreamStatus(code) => *code,
            ProxyError::NetworkFailure(_) => 500,
        }
    }
}
