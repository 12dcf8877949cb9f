//! Configuration module for sitewatch.
//!
//! Loads configuration from environment variables with sensible defaults.

use std::env;
use std::time::Duration;

/// Server configuration loaded from environment variables.
#[derive(Debug, Clone)]
pub struct ServerConfig {
    /// HTTP port for the web server (default: 8080)
    pub http_port: u16,
    /// Path to the platform snapshot file (default: "platform.json")
    pub platform_path: String,
    /// Seconds between poll cycles (default: 30)
    pub refresh_seconds: u64,
    /// Per-check HTTP timeout in seconds (default: 10)
    pub check_timeout_seconds: u64,
    /// Maximum history entries retained per endpoint (default: 100)
    pub max_history: usize,
    /// Trailing window for health summaries, in hours (default: 24)
    pub summary_window_hours: i64,
    /// Accept invalid TLS certificates when probing (default: false)
    pub trust_all_certs: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            http_port: 8080,
            platform_path: "platform.json".to_string(),
            refresh_seconds: 30,
            check_timeout_seconds: 10,
            max_history: 100,
            summary_window_hours: 24,
            trust_all_certs: false,
        }
    }
}

impl ServerConfig {
    /// Load configuration from environment variables.
    ///
    /// Environment variables:
    /// - `SITEWATCH_HTTP_PORT`: HTTP port (default: 8080)
    /// - `SITEWATCH_PLATFORM_PATH`: platform snapshot file (default: "platform.json")
    /// - `SITEWATCH_REFRESH_SECONDS`: seconds between poll cycles (default: 30)
    /// - `SITEWATCH_CHECK_TIMEOUT_SECONDS`: per-check timeout (default: 10)
    /// - `SITEWATCH_MAX_HISTORY`: history entries per endpoint (default: 100)
    /// - `SITEWATCH_SUMMARY_WINDOW_HOURS`: summary window (default: 24)
    /// - `SITEWATCH_TRUST_ALL_CERTS`: accept invalid certificates (default: false)
    pub fn load() -> Self {
        let mut cfg = Self::default();

        if let Ok(port_str) = env::var("SITEWATCH_HTTP_PORT") {
            if let Ok(port) = port_str.parse() {
                cfg.http_port = port;
            }
        }

        if let Ok(path) = env::var("SITEWATCH_PLATFORM_PATH") {
            cfg.platform_path = path;
        }

        if let Ok(s) = env::var("SITEWATCH_REFRESH_SECONDS") {
            if let Ok(v) = s.parse::<u64>() {
                if v > 0 {
                    cfg.refresh_seconds = v;
                }
            }
        }

        if let Ok(s) = env::var("SITEWATCH_CHECK_TIMEOUT_SECONDS") {
            if let Ok(v) = s.parse::<u64>() {
                if v > 0 {
                    cfg.check_timeout_seconds = v;
                }
            }
        }

        if let Ok(s) = env::var("SITEWATCH_MAX_HISTORY") {
            if let Ok(v) = s.parse::<usize>() {
                if v > 0 {
                    cfg.max_history = v;
                }
            }
        }

        if let Ok(s) = env::var("SITEWATCH_SUMMARY_WINDOW_HOURS") {
            if let Ok(v) = s.parse::<i64>() {
                if v > 0 {
                    cfg.summary_window_hours = v;
                }
            }
        }

        if let Ok(s) = env::var("SITEWATCH_TRUST_ALL_CERTS") {
            cfg.trust_all_certs = s == "1" || s.eq_ignore_ascii_case("true");
        }

        cfg
    }

    /// Poll interval as a `Duration`.
    pub fn refresh_interval(&self) -> Duration {
        Duration::from_secs(self.refresh_seconds)
    }

    /// Per-check timeout as a `Duration`.
    pub fn check_timeout(&self) -> Duration {
        Duration::from_secs(self.check_timeout_seconds)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.http_port, 8080);
        assert_eq!(cfg.platform_path, "platform.json");
        assert_eq!(cfg.refresh_seconds, 30);
        assert_eq!(cfg.check_timeout_seconds, 10);
        assert_eq!(cfg.max_history, 100);
        assert_eq!(cfg.summary_window_hours, 24);
        assert!(!cfg.trust_all_certs);
    }

    #[test]
    fn test_durations() {
        let cfg = ServerConfig::default();
        assert_eq!(cfg.refresh_interval(), Duration::from_secs(30));
        assert_eq!(cfg.check_timeout(), Duration::from_secs(10));
    }
}
