//! Log output settings read from `SX_*` environment variables.

use std::env;

/// Service name stamped on events when none is configured.
pub const DEFAULT_SERVICE: &str = "sealed-bid-exchange";

/// Configuration for log output.
#[derive(Debug, Clone)]
pub struct TelemetryConfig {
    /// Name attached to the startup and shutdown events
    pub service_name: String,

    /// Level (trace, debug, info, warn, error) or a full `EnvFilter` directive
    pub log_level: String,

    /// Whether to write logs to stdout
    pub console_output: bool,

    /// JSON lines instead of human-readable output
    pub json_logs: bool,
}

impl Default for TelemetryConfig {
    fn default() -> Self {
        Self {
            service_name: DEFAULT_SERVICE.to_string(),
            log_level: "info".to_string(),
            console_output: true,
            json_logs: false,
        }
    }
}

/// `true`/`1` and `false`/`0`, case-insensitive. Anything else keeps `default`.
fn flag(value: Option<String>, default: bool) -> bool {
    match value.as_deref().map(str::trim) {
        Some(v) if v.eq_ignore_ascii_case("true") || v == "1" => true,
        Some(v) if v.eq_ignore_ascii_case("false") || v == "0" => false,
        _ => default,
    }
}

impl TelemetryConfig {
    /// Read configuration from the environment.
    ///
    /// # Environment Variables
    ///
    /// - `SX_SERVICE_NAME`: Service name (default: sealed-bid-exchange)
    /// - `SX_LOG_LEVEL` or `RUST_LOG`: Log level (default: info)
    /// - `SX_CONSOLE_OUTPUT`: Enable console output (default: true)
    /// - `SX_JSON_LOGS`: Enable JSON logs (default: false)
    pub fn from_env() -> Self {
        Self::from_env_with_level("info")
    }

    /// Like [`from_env`](Self::from_env), with `level` used when neither
    /// `SX_LOG_LEVEL` nor `RUST_LOG` is set.
    pub fn from_env_with_level(level: &str) -> Self {
        Self {
            service_name: env::var("SX_SERVICE_NAME").unwrap_or_else(|_| DEFAULT_SERVICE.to_string()),
            log_level: env::var("SX_LOG_LEVEL")
                .or_else(|_| env::var("RUST_LOG"))
                .unwrap_or_else(|_| level.to_string()),
            console_output: flag(env::var("SX_CONSOLE_OUTPUT").ok(), true),
            json_logs: flag(env::var("SX_JSON_LOGS").ok(), false),
        }
    }
}
