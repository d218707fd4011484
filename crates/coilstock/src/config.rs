use std::{env, time::Duration};

/// Application configuration loaded from environment variables.
///
/// Constructed once at process start and passed by reference to whatever
/// needs it; there is no ambient global configuration.
#[derive(Debug, Clone)]
pub struct Config {
    /// Path to SQLite database file (default: "coilstock.db")
    pub sqlite_path: String,
    /// Per-request timeout in seconds (default: 10)
    pub request_timeout_seconds: u64,
}

impl Config {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SQLITE_PATH` - SQLite database path (default: "coilstock.db")
    /// - `REQUEST_TIMEOUT_SECONDS` - per-request timeout (default: 10)
    pub fn from_env() -> Self {
        Self {
            sqlite_path: env::var("SQLITE_PATH").unwrap_or_else(|_| "coilstock.db".to_string()),
            request_timeout_seconds: env::var("REQUEST_TIMEOUT_SECONDS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(10),
        }
    }

    /// Get the request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for Config {
    fn default() -> Self {
        Self::from_env()
    }
}
