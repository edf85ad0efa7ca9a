//! Front-end response bodies.

use serde::Serialize;

/// JSON response for `GET /`.
#[derive(Debug, Serialize)]
pub struct UsageResponse {
    pub message: &'static str,
    pub usage: UsageForms,
    pub examples: Vec<String>,
}

/// The two ways to name a target.
#[derive(Debug, Serialize)]
pub struct UsageForms {
    pub query_form: String,
    pub path_form: String,
}

impl UsageResponse {
    /// Usage text for a proxy mounted at `mount_path`.
    pub fn for_mount(mount_path: &str) -> Self {
        Self {
            message: "Transparent rewriting proxy",
            usage: UsageForms {
                query_form: format!("{mount_path}?url=<target-url>"),
                path_form: format!("{mount_path}/<target-url>"),
            },
            examples: vec![
                format!("{mount_path}?url=https%3A%2F%2Fexample.com%2F"),
                format!("{mount_path}/https://example.com/"),
            ],
        }
    }
}

/// JSON response for `GET /health`.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    pub status: &'static str,
    pub timestamp: String,
}
