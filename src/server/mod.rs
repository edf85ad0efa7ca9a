//! HTTP front end.
//!
//! Routes:
//! - `GET /` - usage information
//! - `GET /health` - liveness probe
//! - `ANY {mount}?url=<target>` - proxy, query form
//! - `ANY {mount}/<target>` - proxy, path form (an empty target is a 400)
//! - `ANY /fetch?url=<target>` - alias of the query form
//!
//! Everything else answers 404 with a JSON hint. `OPTIONS` on any route is a
//! CORS preflight and answers 204.

mod handlers;
mod types;

use axum::routing::{any, get};
use axum::Router;
use log::info;
use tokio::net::TcpListener;

use crate::config::{Config, FETCH_ALIAS_PATH};
use crate::pipeline::ProxyContext;
use handlers::{
    health_handler, not_found_handler, proxy_path_handler, proxy_query_handler, usage_handler,
};
pub use types::{HealthResponse, UsageForms, UsageResponse};

/// Paths served by fixed routes, which the mount path must not shadow.
const RESERVED_PATHS: &[&str] = &["/health"];

/// Builds the router for a proxy context.
pub fn build_router(ctx: ProxyContext) -> Router {
    let mount = ctx.mount_path.clone();
    let mut router = Router::new()
        .route("/", get(usage_handler))
        .route("/health", get(health_handler))
        .route(&mount, any(proxy_query_handler))
        // The catch-all does not match an empty remainder
        .route(&format!("{mount}/"), any(proxy_path_handler))
        .route(&format!("{mount}/{{*target}}"), any(proxy_path_handler));

    if mount != FETCH_ALIAS_PATH {
        router = router.route(FETCH_ALIAS_PATH, any(proxy_query_handler));
    }

    router.fallback(not_found_handler).with_state(ctx)
}

/// Serves the proxy on an already-bound listener until Ctrl-C.
pub async fn serve(listener: TcpListener, ctx: ProxyContext) -> Result<(), anyhow::Error> {
    let app = build_router(ctx);
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|e| anyhow::anyhow!("Proxy server error: {}", e))
}

/// Creates the outbound clients, binds the configured address and serves.
pub async fn run_server(config: Config) -> Result<(), anyhow::Error> {
    let mount = config.normalized_mount_path();
    if RESERVED_PATHS.contains(&mount.as_str()) {
        anyhow::bail!("Mount path {} collides with a built-in route", mount);
    }

    let ctx = ProxyContext::from_config(&config)?;
    let address = config.listen_address();
    let listener = TcpListener::bind(&address)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind proxy server to {}: {}", address, e))?;

    info!("Proxy server listening on http://{}/", address);
    info!("  - Query form: http://{}{}?url=<target>", address, mount);
    info!("  - Path form: http://{}{}/<target>", address, mount);
    info!("  - Health: http://{}/health", address);

    serve(listener, ctx).await
}

async fn shutdown_signal() {
    if tokio::signal::ctrl_c().await.is_ok() {
        info!("Shutdown signal received, draining connections");
    }
}
