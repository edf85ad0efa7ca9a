//! rewrite_proxy library: a transparent HTTP rewriting proxy
//!
//! A client names a target URL; the proxy resolves its redirects, fetches it
//! with browser-like headers, rewrites every navigable reference inside HTML
//! and CSS so that follow-on requests come back through the proxy, and relays
//! the result with permissive CORS headers. Other content-types pass through
//! byte-for-byte.
//!
//! # Example
//!
//! ```no_run
//! use rewrite_proxy::{run_server, Config};
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config {
//!     port: 8080,
//!     ..Default::default()
//! };
//!
//! run_server(config).await?;
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your application
//! or ensure you're calling library functions within an async context.

pub mod config;
pub mod dispatch;
pub mod error_handling;
pub mod fetch;
pub mod initialization;
pub mod pipeline;
pub mod rewrite;
pub mod server;
pub mod target;
mod utils;

// Re-export public API
pub use config::{Config, LogFormat, LogLevel};
pub use error_handling::{ErrorKind, ProxyError};
pub use pipeline::{proxy_request, ProxyContext};
pub use rewrite::RewriteContext;
pub use server::{build_router, run_server, serve};
pub use target::TargetSpec;
