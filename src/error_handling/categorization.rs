//! Error categorization.
//!
//! This module maps transport-level `reqwest::Error`s onto the `ProxyError`
//! taxonomy. HTTP error statuses never reach this code: the fetcher treats
//! every status as a successful response.

use std::error::Error as StdError;

use super::types::ProxyError;
use crate::utils::sanitize::sanitize_and_truncate_error_message;

/// Message fragments reported by the resolver stack when a host lookup fails.
const DNS_FAILURE_PATTERNS: &[&str] = &[
    "dns error",
    "failed to lookup address",
    "name or service not known",
    "nodename nor servname",
    "no such host",
    "name resolution",
    "no address associated",
    "failed to resolve",
];

/// Message fragments that identify TLS failures.
const TLS_FAILURE_PATTERNS: &[&str] = &["tls", "ssl", "certificate", "handshake"];

/// Collects the lowercase messages of an error and all of its sources.
fn error_chain_messages(error: &(dyn StdError + 'static)) -> Vec<String> {
    let mut messages = Vec::new();
    let mut current: Option<&(dyn StdError + 'static)> = Some(error);
    while let Some(err) = current {
        messages.push(err.to_string().to_lowercase());
        current = err.source();
    }
    messages
}

/// Returns true if any error in the chain is an I/O timeout.
fn chain_has_io_timeout(error: &(dyn StdError + 'static)) -> bool {
    let mut current: Option<&(dyn StdError + 'static)> = Some(error);
    while let Some(err) = current {
        if let Some(io) = err.downcast_ref::<std::io::Error>() {
            if io.kind() == std::io::ErrorKind::TimedOut {
                return true;
            }
        }
        current = err.source();
    }
    false
}

/// Extracts the host a failed request was aimed at.
///
/// Prefers the URL recorded on the error (which reflects redirects followed by
/// the transport) and falls back to the URL the request was issued for.
fn failed_host(error: &reqwest::Error, target_url: &str) -> String {
    error
        .url()
        .and_then(|u| u.host_str().map(str::to_string))
        .or_else(|| {
            url::Url::parse(target_url)
                .ok()
                .and_then(|u| u.host_str().map(str::to_string))
        })
        .unwrap_or_else(|| target_url.to_string())
}

/// Categorizes a transport-level `reqwest::Error` into a `ProxyError`.
///
/// - DNS/host-not-found → `UnresolvedHost`
/// - connect/read timeout → `Timeout`
/// - anything else → `NetworkFailure` with a short description
///
/// # Arguments
///
/// * `error` - The `reqwest::Error` to categorize
/// * `target_url` - The URL the request was issued for (used for the host name)
pub fn categorize_reqwest_error(error: &reqwest::Error, target_url: &str) -> ProxyError {
    if error.is_timeout() || chain_has_io_timeout(error) {
        return ProxyError::Timeout;
    }

    let messages = error_chain_messages(error);
    let matches_any = |patterns: &[&str]| {
        messages
            .iter()
            .any(|msg| patterns.iter().any(|pattern| msg.contains(pattern)))
    };

    if matches_any(DNS_FAILURE_PATTERNS) {
        return ProxyError::UnresolvedHost {
            host: failed_host(error, target_url),
        };
    }

    let detail = if matches_any(TLS_FAILURE_PATTERNS) {
        "TLS negotiation with the target failed".to_string()
    } else if error.is_redirect() {
        "The target redirected too many times".to_string()
    } else if error.is_connect() {
        "Could not connect to the target".to_string()
    } else if error.is_body() || error.is_decode() {
        "Failed to read the response body from the target".to_string()
    } else if error.is_builder() {
        "The target URL could not be requested".to_string()
    } else {
        // The top-level reqwest message is short and does not include the source chain
        sanitize_and_truncate_error_message(&error.to_string())
    };

    ProxyError::NetworkFailure(detail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_unresolvable_host_is_categorized_as_unresolved() {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .expect("client should build");
        let target = "http://this-host-does-not-exist.invalid/";
        let err = client
            .get(target)
            .send()
            .await
            .expect_err(".invalid hosts never resolve");

        match categorize_reqwest_error(&err, target) {
            ProxyError::UnresolvedHost { host } => {
                assert_eq!(host, "this-host-does-not-exist.invalid")
            }
            other => panic!("expected UnresolvedHost, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_refused_connection_is_network_failure() {
        // Bind then drop a listener so the port is known to be closed
        let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
        let addr = listener.local_addr().expect("addr");
        drop(listener);

        let client = reqwest::Client::new();
        let target = format!("http://{}/", addr);
        let err = client
            .get(&target)
            .send()
            .await
            .expect_err("closed port should refuse");

        match categorize_reqwest_error(&err, &target) {
            ProxyError::NetworkFailure(detail) => {
                assert_eq!(detail, "Could not connect to the target")
            }
            other => panic!("expected NetworkFailure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_slow_response_is_categorized_as_timeout() {
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
            .await
            .expect("bind");
        let addr = listener.local_addr().expect("addr");
        // Accept connections but never answer
        tokio::spawn(async move {
            let mut held = Vec::new();
            while let Ok((socket, _)) = listener.accept().await {
                held.push(socket);
            }
        });

        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(200))
            .build()
            .expect("client should build");
        let target = format!("http://{}/", addr);
        let err = client
            .get(&target)
            .send()
            .await
            .expect_err("silent server should time out");

        assert_eq!(categorize_reqwest_error(&err, &target), ProxyError::Timeout);
    }

    #[test]
    fn test_dns_patterns_are_lowercase() {
        // error_chain_messages lowercases, so patterns must be lowercase to match
        for pattern in DNS_FAILURE_PATTERNS.iter().chain(TLS_FAILURE_PATTERNS) {
            assert_eq!(*pattern, pattern.to_lowercase());
        }
    }
}
