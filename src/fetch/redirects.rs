//! HTTP redirect chain resolution (the URL Resolver).
//!
//! Before the real fetch, a metadata-only HEAD probe follows the target's
//! redirect chain hop by hop to discover the final URL. The probe is
//! best-effort: any failure degrades to using the requested URL.

use std::time::Duration;

use anyhow::{Error, Result};
use log::debug;
use reqwest::Url;

use super::request::OutboundHeaders;
use super::types::ResolvedTarget;
use crate::target::TargetSpec;

/// Resolves the redirect chain for a URL, following redirects up to a maximum number of hops.
///
/// # Arguments
///
/// * `start_url` - The initial URL to start from
/// * `max_hops` - Maximum number of redirects to follow
/// * `client` - HTTP client with redirects disabled (for manual tracking)
///
/// # Returns
///
/// A tuple of (final_url, redirect_chain) where `redirect_chain` lists every
/// URL visited, starting with `start_url` and ending with `final_url`.
///
/// # Errors
///
/// Returns an error if an HTTP request fails or a `Location` cannot be parsed.
pub async fn resolve_redirect_chain(
    start_url: &str,
    max_hops: usize,
    client: &reqwest::Client,
) -> Result<(String, Vec<String>), Error> {
    let mut chain: Vec<String> = vec![start_url.to_string()];
    let mut current = start_url.to_string();

    for _ in 0..max_hops {
        let resp = OutboundHeaders::apply_to_request_builder(client.head(&current), None)
            .send()
            .await?;

        if !resp.status().is_redirection() {
            break;
        }
        let Some(loc) = resp.headers().get(reqwest::header::LOCATION) else {
            log::warn!(
                "Redirect status {} for {} but no Location header",
                resp.status().as_u16(),
                current
            );
            break;
        };

        let loc = loc.to_str().unwrap_or("").to_string();
        let new_url = Url::parse(&current)?.join(&loc)?;
        current = new_url.to_string();
        chain.push(current.clone());
    }
    Ok((current, chain))
}

/// Resolves a target to its final URL. Never fails.
///
/// The whole probe is bounded by `probe_timeout`, on top of the per-request
/// timeout configured on the client. On any failure the requested URL is used
/// as the final URL and `redirected` is false.
pub async fn resolve_target(
    spec: &TargetSpec,
    client: &reqwest::Client,
    max_hops: usize,
    probe_timeout: Duration,
) -> ResolvedTarget {
    let requested = spec.normalized();
    debug!("Resolving redirects for {requested}");

    let outcome =
        tokio::time::timeout(probe_timeout, resolve_redirect_chain(requested, max_hops, client))
            .await;

    match outcome {
        Ok(Ok((final_url, chain))) => {
            // Url::join canonicalizes, so compare parsed forms to avoid
            // reporting "http://a.com" -> "http://a.com/" as a redirect
            let redirected = chain.len() > 1 && !same_url(requested, &final_url);
            if redirected {
                debug!(
                    "Resolved {requested} -> {final_url} in {} hop(s)",
                    chain.len() - 1
                );
                ResolvedTarget {
                    requested_url: requested.to_string(),
                    final_url,
                    redirected: true,
                    redirect_chain: chain,
                }
            } else {
                ResolvedTarget::unresolved(requested)
            }
        }
        Ok(Err(e)) => {
            debug!("Redirect probe failed for {requested}, using requested URL: {e}");
            ResolvedTarget::unresolved(requested)
        }
        Err(_) => {
            debug!(
                "Redirect probe timed out after {:?} for {requested}, using requested URL",
                probe_timeout
            );
            ResolvedTarget::unresolved(requested)
        }
    }
}

fn same_url(a: &str, b: &str) -> bool {
    match (Url::parse(a), Url::parse(b)) {
        (Ok(a), Ok(b)) => a == b,
        _ => a == b,
    }
}
