// Shared test helpers for spinning up a proxy on an ephemeral port.
//
// Each test gets its own proxy instance and its own wiremock origins, so tests
// run in parallel without sharing state.

use std::time::Duration;

use rewrite_proxy::rewrite::wrap;
use rewrite_proxy::{serve, Config, ProxyContext, RewriteContext};
use tokio::net::TcpListener;

/// Config with short deadlines so failure tests finish quickly.
#[allow(dead_code)] // Used by other test files
pub fn test_config() -> Config {
    Config {
        probe_timeout_seconds: 2,
        fetch_timeout_seconds: 5,
        ..Default::default()
    }
}

/// Starts a proxy with the given config and returns its base URL
/// (e.g. `http://127.0.0.1:54321`).
#[allow(dead_code)]
pub async fn spawn_proxy_with(config: Config) -> String {
    let ctx = ProxyContext::from_config(&config).expect("Failed to build proxy context");
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("Failed to bind ephemeral port");
    let addr = listener.local_addr().expect("listener has an address");
    tokio::spawn(async move {
        let _ = serve(listener, ctx).await;
    });
    format!("http://{}", addr)
}

/// Starts a proxy with `test_config()`.
#[allow(dead_code)]
pub async fn spawn_proxy() -> String {
    spawn_proxy_with(test_config()).await
}

/// Client used to talk to the proxy. Redirects are not followed so relayed
/// 3xx responses can be inspected.
#[allow(dead_code)]
pub fn proxy_client() -> reqwest::Client {
    reqwest::Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(Duration::from_secs(20))
        .build()
        .expect("Failed to build test client")
}

/// The wrapper the proxy is expected to emit for `absolute`.
#[allow(dead_code)]
pub fn wrapped(absolute: &str) -> String {
    wrap(absolute, &RewriteContext::new("http://unused", "/proxy"))
}
