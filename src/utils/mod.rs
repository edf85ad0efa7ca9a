//! Shared utility functions.
//!
//! This module provides:
//! - String sanitization for error details returned to clients

pub mod sanitize;
