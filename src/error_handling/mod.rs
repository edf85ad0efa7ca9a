//! Error handling.
//!
//! This module provides:
//! - The `ProxyError` taxonomy returned to clients and its `ErrorKind` tags
//! - Initialization error types
//! - Categorization of transport errors into the taxonomy
//!
//! Failures are classified once and reported once; nothing in this crate
//! retries an outbound request.

mod categorization;
mod types;

// Re-export public API
pub use categorization::categorize_reqwest_error;
pub use types::{ErrorKind, InitializationError, ProxyError};
