//! Application configuration and constants.
//!
//! This module provides:
//! - Configuration constants (timeouts, hop limits, defaults)
//! - HTTP header constants (outbound set, passthrough allow-list, CORS)
//! - CLI option types and parsing

mod constants;
mod headers;
mod types;

// Re-export all constants
pub use constants::*;
pub use headers::*;
pub use types::{Config, LogFormat, LogLevel};
