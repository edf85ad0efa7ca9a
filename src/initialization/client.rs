//! HTTP client initialization.
//!
//! This module builds the two outbound clients the pipeline uses. Both are
//! created once per process and shared by every request; neither carries
//! per-request state (no cookie store).

use std::sync::Arc;
use std::time::Duration;

use reqwest::ClientBuilder;

use crate::config::{Config, TCP_CONNECT_TIMEOUT_SECS};

/// Applies the settings common to both clients.
fn base_builder(config: &Config) -> ClientBuilder {
    if config.danger_accept_invalid_certs {
        log::warn!("TLS certificate validation is DISABLED for outbound requests");
    }
    ClientBuilder::new()
        .user_agent(config.user_agent.clone())
        .connect_timeout(Duration::from_secs(TCP_CONNECT_TIMEOUT_SECS))
        .danger_accept_invalid_certs(config.danger_accept_invalid_certs)
}

/// Initializes the client used for the main content fetch.
///
/// Creates a `reqwest::Client` configured with:
/// - User-Agent header from the config
/// - Hard request timeout (`fetch_timeout_seconds`, 30s by default)
/// - Redirect following bounded by `fetch_max_redirects`
/// - Transparent gzip/deflate/brotli decoding, so rewriting sees plain text
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_client(config: &Config) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = base_builder(config)
        .timeout(config.fetch_timeout())
        .redirect(reqwest::redirect::Policy::limited(config.fetch_redirects()))
        .build()?;
    Ok(Arc::new(client))
}

/// Initializes the client for redirect resolution.
///
/// Creates a `reqwest::Client` with redirects disabled so the resolver can
/// follow the chain hop by hop, recording each URL and enforcing its own hop
/// limit. The per-request timeout is the probe timeout (≤10s).
///
/// # Errors
///
/// Returns a `reqwest::Error` if client creation fails.
pub fn init_redirect_client(config: &Config) -> Result<Arc<reqwest::Client>, reqwest::Error> {
    let client = base_builder(config)
        .redirect(reqwest::redirect::Policy::none())
        .timeout(config.probe_timeout())
        .build()?;
    Ok(Arc::new(client))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clients_build_with_default_config() {
        let config = Config::default();
        assert!(init_client(&config).is_ok());
        assert!(init_redirect_client(&config).is_ok());
    }

    #[test]
    fn test_clients_build_with_tls_validation_disabled() {
        let config = Config {
            danger_accept_invalid_certs: true,
            ..Default::default()
        };
        assert!(init_client(&config).is_ok());
        assert!(init_redirect_client(&config).is_ok());
    }
}
