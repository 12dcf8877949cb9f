//! Endpoint health checking.
//!
//! A single bounded-timeout HTTP GET per endpoint. The checker's contract
//! is "never raises; always returns an outcome": timeouts, transport
//! failures, and non-success responses are all data, not errors.

use std::time::{Duration, Instant};

use serde::Serialize;
use thiserror::Error;

/// Maximum response-body excerpt attached to a non-success outcome.
const MAX_BODY_EXCERPT: usize = 500;

/// Checker construction error types.
#[derive(Error, Debug)]
pub enum ProbeError {
    #[error("failed to build HTTP client: {0}")]
    Client(#[from] reqwest::Error),
}

/// TLS certificate policy for outgoing checks.
///
/// A deployment concern injected at construction; internal hosts often
/// serve self-signed certificates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TlsPolicy {
    Validated,
    TrustAll,
}

/// The result of one health check.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CheckOutcome {
    pub responding: bool,
    pub latency_ms: u64,
    pub status_code: Option<u16>,
    pub error: Option<String>,
}

impl CheckOutcome {
    pub fn up(latency_ms: u64, status_code: u16) -> Self {
        Self {
            responding: true,
            latency_ms,
            status_code: Some(status_code),
            error: None,
        }
    }

    pub fn down(latency_ms: u64, status_code: Option<u16>, error: impl Into<String>) -> Self {
        Self {
            responding: false,
            latency_ms,
            status_code,
            error: Some(error.into()),
        }
    }
}

/// Stateless HTTP health checker with a fixed per-request timeout.
pub struct EndpointChecker {
    client: reqwest::Client,
}

impl EndpointChecker {
    /// Create a checker with the given timeout and TLS policy.
    pub fn new(timeout: Duration, tls: TlsPolicy) -> Result<Self, ProbeError> {
        let mut builder = reqwest::Client::builder().timeout(timeout);
        if tls == TlsPolicy::TrustAll {
            builder = builder.danger_accept_invalid_certs(true);
        }
        Ok(Self {
            client: builder.build()?,
        })
    }

    /// Check a single URL. Always returns an outcome.
    ///
    /// Success means an HTTP response with a non-error status. A response
    /// with an error status captures the status line and up to 500
    /// characters of body as error context; a body-read failure is
    /// swallowed. Timeouts and transport failures report zero latency.
    pub async fn check(&self, url: &str) -> CheckOutcome {
        // Small start jitter so a large inventory doesn't fire as one burst
        let jitter = rand::random::<u64>() % 100;
        tokio::time::sleep(Duration::from_millis(jitter)).await;

        let start = Instant::now();

        match self.client.get(url).send().await {
            Ok(response) => {
                let latency_ms = start.elapsed().as_millis() as u64;
                let status = response.status();

                if status.is_client_error() || status.is_server_error() {
                    // StatusCode renders as "<code> <reason>", e.g. "503 Service Unavailable"
                    let mut error = format!("HTTP {}", status);
                    if let Ok(body) = response.text().await {
                        let excerpt: String = body.chars().take(MAX_BODY_EXCERPT).collect();
                        if !excerpt.trim().is_empty() {
                            error.push_str(": ");
                            error.push_str(excerpt.trim());
                        }
                    }
                    CheckOutcome::down(latency_ms, Some(status.as_u16()), error)
                } else {
                    CheckOutcome::up(latency_ms, status.as_u16())
                }
            }
            Err(e) if e.is_timeout() => CheckOutcome::down(0, None, "request timed out"),
            Err(e) => CheckOutcome::down(0, None, e.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_check_connection_refused() {
        let checker =
            EndpointChecker::new(Duration::from_millis(500), TlsPolicy::Validated).unwrap();
        // Port 1 on loopback is essentially never listening
        let outcome = checker.check("http://127.0.0.1:1/").await;
        assert!(!outcome.responding);
        assert_eq!(outcome.latency_ms, 0);
        assert!(outcome.status_code.is_none());
        assert!(outcome.error.is_some());
    }

    #[tokio::test]
    async fn test_check_unroutable_address() {
        let checker =
            EndpointChecker::new(Duration::from_millis(300), TlsPolicy::Validated).unwrap();
        // TEST-NET-1, guaranteed unroutable
        let outcome = checker.check("http://192.0.2.1/").await;
        assert!(!outcome.responding);
        assert!(outcome.status_code.is_none());
        assert!(outcome.error.is_some());
    }

    #[tokio::test]
    async fn test_check_malformed_url_is_an_outcome() {
        let checker =
            EndpointChecker::new(Duration::from_millis(300), TlsPolicy::Validated).unwrap();
        let outcome = checker.check("not a url").await;
        assert!(!outcome.responding);
        assert!(outcome.error.is_some());
    }

    #[test]
    fn test_outcome_constructors() {
        let up = CheckOutcome::up(12, 200);
        assert!(up.responding);
        assert_eq!(up.status_code, Some(200));
        assert!(up.error.is_none());

        let down = CheckOutcome::down(0, None, "request timed out");
        assert!(!down.responding);
        assert_eq!(down.error.as_deref(), Some("request timed out"));
    }
}
