//! Configuration types and CLI options.
//!
//! This module defines enums and structs used for command-line argument parsing
//! and configuration.

use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::config::constants::{
    DEFAULT_BIND_ADDRESS, DEFAULT_MOUNT_PATH, DEFAULT_PORT, DEFAULT_USER_AGENT,
    FETCH_MAX_REDIRECTS, FETCH_TIMEOUT_SECS, PROBE_MAX_HOPS, PROBE_TIMEOUT_SECS,
};

/// Logging level for the application.
///
/// Controls the verbosity of log output, from most restrictive (Error) to most
/// verbose (Trace).
#[derive(Clone, Debug, ValueEnum)]
pub enum LogLevel {
    /// Only error messages
    Error,
    /// Error and warning messages
    Warn,
    /// Error, warning, and informational messages
    Info,
    /// All messages except trace
    Debug,
    /// All messages including trace
    Trace,
}

impl From<LogLevel> for log::LevelFilter {
    fn from(l: LogLevel) -> Self {
        match l {
            LogLevel::Error => log::LevelFilter::Error,
            LogLevel::Warn => log::LevelFilter::Warn,
            LogLevel::Info => log::LevelFilter::Info,
            LogLevel::Debug => log::LevelFilter::Debug,
            LogLevel::Trace => log::LevelFilter::Trace,
        }
    }
}

/// Log output format.
///
/// Controls how log messages are formatted:
/// - `Plain`: Human-readable format with colors (default)
/// - `Json`: Structured JSON format for machine parsing
#[derive(Clone, Debug, ValueEnum)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Proxy configuration.
///
/// Parsed from the command line (with environment variable fallbacks) by the
/// binary, or constructed programmatically by library users and tests.
///
/// # Examples
///
/// ```no_run
/// use rewrite_proxy::Config;
///
/// let config = Config {
///     port: 8080,
///     fetch_timeout_seconds: 15,
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Parser)]
#[command(
    name = "rewrite_proxy",
    about = "Transparent HTTP proxy that rewrites HTML/CSS references to stay routed through the proxy"
)]
pub struct Config {
    /// Port to listen on
    #[arg(long, env = "PORT", default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Address to bind the listener to
    #[arg(long, env = "BIND_ADDRESS", default_value = DEFAULT_BIND_ADDRESS)]
    pub bind: String,

    /// Path the proxy route is mounted at (used when rewriting references)
    #[arg(long, default_value = DEFAULT_MOUNT_PATH)]
    pub mount_path: String,

    /// Timeout for the redirect probe in seconds (capped at 10)
    #[arg(long, default_value_t = PROBE_TIMEOUT_SECS)]
    pub probe_timeout_seconds: u64,

    /// Maximum redirect hops followed by the probe (capped at 5)
    #[arg(long, default_value_t = PROBE_MAX_HOPS)]
    pub probe_max_hops: usize,

    /// Timeout for the main fetch in seconds
    #[arg(long, default_value_t = FETCH_TIMEOUT_SECS)]
    pub fetch_timeout_seconds: u64,

    /// Maximum redirects followed by the main fetch (capped at 10)
    #[arg(long, default_value_t = FETCH_MAX_REDIRECTS)]
    pub fetch_max_redirects: usize,

    /// User-Agent sent to origins
    #[arg(long, default_value = DEFAULT_USER_AGENT)]
    pub user_agent: String,

    /// Disable TLS certificate validation for outbound requests.
    ///
    /// Only meant for constrained/private deployments talking to origins with
    /// self-signed certificates. Never enabled by default.
    #[arg(long, env = "DANGER_ACCEPT_INVALID_CERTS")]
    pub danger_accept_invalid_certs: bool,

    /// Log level
    #[arg(long, value_enum, default_value_t = LogLevel::Info)]
    pub log_level: LogLevel,

    /// Log format
    #[arg(long, value_enum, default_value_t = LogFormat::Plain)]
    pub log_format: LogFormat,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            port: DEFAULT_PORT,
            bind: DEFAULT_BIND_ADDRESS.to_string(),
            mount_path: DEFAULT_MOUNT_PATH.to_string(),
            probe_timeout_seconds: PROBE_TIMEOUT_SECS,
            probe_max_hops: PROBE_MAX_HOPS,
            fetch_timeout_seconds: FETCH_TIMEOUT_SECS,
            fetch_max_redirects: FETCH_MAX_REDIRECTS,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            danger_accept_invalid_certs: false,
            log_level: LogLevel::Info,
            log_format: LogFormat::Plain,
        }
    }
}

impl Config {
    /// Probe timeout, clamped to the 10 second upper bound.
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_seconds.clamp(1, PROBE_TIMEOUT_SECS))
    }

    /// Probe hop count, clamped to the 5 hop upper bound.
    pub fn probe_hops(&self) -> usize {
        self.probe_max_hops.min(PROBE_MAX_HOPS)
    }

    /// Timeout applied to the main fetch.
    pub fn fetch_timeout(&self) -> Duration {
        Duration::from_secs(self.fetch_timeout_seconds.max(1))
    }

    /// Redirect limit applied to the main fetch, clamped to 10.
    pub fn fetch_redirects(&self) -> usize {
        self.fetch_max_redirects.min(FETCH_MAX_REDIRECTS)
    }

    /// Mount path normalized to a leading slash and no trailing slash.
    pub fn normalized_mount_path(&self) -> String {
        let trimmed = self.mount_path.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            DEFAULT_MOUNT_PATH.to_string()
        } else if trimmed.starts_with('/') {
            trimmed.to_string()
        } else {
            format!("/{trimmed}")
        }
    }

    /// Address string the listener binds to.
    pub fn listen_address(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_log_level_conversion() {
        assert_eq!(
            log::LevelFilter::from(LogLevel::Error),
            log::LevelFilter::Error
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Warn),
            log::LevelFilter::Warn
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Info),
            log::LevelFilter::Info
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Debug),
            log::LevelFilter::Debug
        );
        assert_eq!(
            log::LevelFilter::from(LogLevel::Trace),
            log::LevelFilter::Trace
        );
    }

    #[test]
    fn test_config_default() {
        let config = Config::default();
        assert_eq!(config.port, 3000);
        assert_eq!(config.mount_path, "/proxy");
        assert_eq!(config.probe_timeout_seconds, 10);
        assert_eq!(config.probe_max_hops, 5);
        assert_eq!(config.fetch_timeout_seconds, 30);
        assert_eq!(config.fetch_max_redirects, 10);
        assert!(!config.danger_accept_invalid_certs);
    }

    #[test]
    fn test_probe_limits_are_clamped() {
        let config = Config {
            probe_timeout_seconds: 60,
            probe_max_hops: 50,
            fetch_max_redirects: 99,
            ..Default::default()
        };
        assert_eq!(config.probe_timeout(), Duration::from_secs(10));
        assert_eq!(config.probe_hops(), 5);
        assert_eq!(config.fetch_redirects(), 10);
    }

    #[test]
    fn test_normalized_mount_path() {
        let mut config = Config::default();
        config.mount_path = "relay/".to_string();
        assert_eq!(config.normalized_mount_path(), "/relay");
        config.mount_path = "/".to_string();
        assert_eq!(config.normalized_mount_path(), "/proxy");
        config.mount_path = "/p".to_string();
        assert_eq!(config.normalized_mount_path(), "/p");
    }

    #[test]
    fn test_cli_parsing_overrides_defaults() {
        let config = Config::try_parse_from([
            "rewrite_proxy",
            "--port",
            "8081",
            "--fetch-timeout-seconds",
            "5",
            "--danger-accept-invalid-certs",
            "--log-format",
            "json",
        ])
        .expect("arguments should parse");
        assert_eq!(config.port, 8081);
        assert_eq!(config.fetch_timeout(), Duration::from_secs(5));
        assert!(config.danger_accept_invalid_certs);
        assert!(matches!(config.log_format, LogFormat::Json));
    }
}
