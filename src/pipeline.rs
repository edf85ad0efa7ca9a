//! Per-request pipeline: Resolve → Fetch → Rewrite (or passthrough) → Dispatch.
//!
//! The pipeline is stateless. Each request owns its `TargetSpec`,
//! `ResolvedTarget` and `FetchResult`; the only shared resources are the two
//! immutable outbound clients held by `ProxyContext`.

use std::sync::Arc;
use std::time::Duration;

use axum::response::Response;
use log::{info, warn};

use crate::config::Config;
use crate::dispatch::{dispatch_error, dispatch_success};
use crate::error_handling::{InitializationError, ProxyError};
use crate::fetch::{fetch_content, resolve_target, FetchResult, InboundRequest, ResolvedTarget};
use crate::initialization::{init_client, init_redirect_client};
use crate::rewrite::{rewrite_payload, RewriteContext};
use crate::target::TargetSpec;

/// Shared, read-only resources needed to proxy a request.
#[derive(Clone)]
pub struct ProxyContext {
    /// HTTP client for the main fetch (redirects followed by the transport)
    pub client: Arc<reqwest::Client>,
    /// HTTP client for redirect resolution (redirects disabled)
    pub redirect_client: Arc<reqwest::Client>,
    /// Path the proxy is mounted at, used in rewritten references
    pub mount_path: String,
    /// Maximum hops followed by the redirect probe
    pub probe_max_hops: usize,
    /// Overall deadline of the redirect probe
    pub probe_timeout: Duration,
}

impl ProxyContext {
    /// Creates a new `ProxyContext` with the given resources.
    pub fn new(
        client: Arc<reqwest::Client>,
        redirect_client: Arc<reqwest::Client>,
        mount_path: String,
        probe_max_hops: usize,
        probe_timeout: Duration,
    ) -> Self {
        Self {
            client,
            redirect_client,
            mount_path,
            probe_max_hops,
            probe_timeout,
        }
    }

    /// Builds the context (and both outbound clients) from configuration.
    ///
    /// # Errors
    ///
    /// Returns `InitializationError::HttpClientError` if a client cannot be built.
    pub fn from_config(config: &Config) -> Result<Self, InitializationError> {
        Ok(Self::new(
            init_client(config)?,
            init_redirect_client(config)?,
            config.normalized_mount_path(),
            config.probe_hops(),
            config.probe_timeout(),
        ))
    }
}

/// Runs resolution, fetch and rewriting, stopping at the first failure.
///
/// Returns the fetch result with its body already rewritten, and the context
/// used to rewrite it (absent when the fetched URL has no usable origin).
pub async fn execute(
    ctx: &ProxyContext,
    spec: &TargetSpec,
    inbound: &InboundRequest,
) -> Result<(ResolvedTarget, FetchResult, Option<RewriteContext>), ProxyError> {
    let resolved = resolve_target(
        spec,
        &ctx.redirect_client,
        ctx.probe_max_hops,
        ctx.probe_timeout,
    )
    .await;

    let mut result = fetch_content(&ctx.client, &resolved, inbound).await?;

    // The transport may follow further redirects; rewrite against where the
    // document actually came from
    let rewrite_ctx = RewriteContext::from_url(&result.url, &ctx.mount_path)
        .or_else(|| RewriteContext::from_url(&resolved.final_url, &ctx.mount_path));

    if let Some(rewrite_ctx) = &rewrite_ctx {
        let body = std::mem::take(&mut result.body);
        result.body = rewrite_payload(body, &result.content_type, rewrite_ctx);
    }

    Ok((resolved, result, rewrite_ctx))
}

/// Proxies one request and produces the outbound response.
///
/// `raw_target` is the client-supplied target (already split from the
/// inbound URL by the front end). Any failure is rendered by the dispatcher;
/// this function never returns an error.
pub async fn proxy_request(
    ctx: &ProxyContext,
    raw_target: Result<TargetSpec, ProxyError>,
    inbound: InboundRequest,
) -> Response {
    let spec = match raw_target {
        Ok(spec) => spec,
        Err(err) => {
            warn!("Rejected {} request: {}", inbound.method, err);
            return dispatch_error(&err);
        }
    };

    info!("Proxying {} request to: {}", inbound.method, spec.normalized());

    match execute(ctx, &spec, &inbound).await {
        Ok((resolved, result, rewrite_ctx)) => {
            if resolved.redirected {
                info!("{} redirected to {}", resolved.requested_url, resolved.final_url);
            }
            dispatch_success(result, rewrite_ctx.as_ref(), &inbound.method)
        }
        Err(err) => {
            warn!(
                "{} request to {} failed ({}): {}",
                inbound.method,
                spec.normalized(),
                err.kind(),
                err
            );
            dispatch_error(&err)
        }
    }
}
