//! Client configuration.
//!
//! Retry policy and timeouts are fixed for the lifetime of a
//! [`Client`](crate::Client). Only the endpoint can change afterwards.
//!
//! # Example
//!
//! ```ignore
//! use std::time::Duration;
//! use rc_link::ClientConfig;
//!
//! let config = ClientConfig::new()
//!     .with_max_attempts(10)
//!     .with_retry_delay(Duration::from_secs(1));
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// Constants
// ============================================================================

/// Endpoint used when none is configured (local development).
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8080";

/// Automatic reconnection attempts before giving up.
pub const DEFAULT_MAX_ATTEMPTS: u32 = 5;

/// Fixed pause between reconnection attempts.
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(3000);

/// Upper bound on a single connection handshake.
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(5);

// ============================================================================
// ClientConfig
// ============================================================================

/// Reconnect policy and timeouts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ClientConfig {
    /// Reconnect ceiling. Zero disables automatic reconnection.
    pub max_attempts: u32,

    /// Fixed delay between attempts (no backoff).
    pub retry_delay: Duration,

    /// Handshake timeout for the default connector.
    pub connect_timeout: Duration,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// Constructors
// ============================================================================

impl ClientConfig {
    /// Creates a config with the default policy.
    #[inline]
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
        }
    }
}

// ============================================================================
// Builder Methods
// ============================================================================

impl ClientConfig {
    /// Sets the reconnect ceiling.
    #[inline]
    #[must_use]
    pub const fn with_max_attempts(mut self, max_attempts: u32) -> Self {
        self.max_attempts = max_attempts;
        self
    }

    /// Sets the delay between attempts.
    #[inline]
    #[must_use]
    pub const fn with_retry_delay(mut self, retry_delay: Duration) -> Self {
        self.retry_delay = retry_delay;
        self
    }

    /// Sets the handshake timeout.
    #[inline]
    #[must_use]
    pub const fn with_connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.connect_timeout = connect_timeout;
        self
    }
}

// ============================================================================
// Validation
// ============================================================================

impl ClientConfig {
    /// Checks the config for values the client cannot run with.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the connect timeout is zero.
    pub fn validate(&self) -> Result<()> {
        if self.connect_timeout.is_zero() {
            return Err(Error::config("connect_timeout must be greater than zero"));
        }
        Ok(())
    }
}

/// Parses and checks a device endpoint.
///
/// # Errors
///
/// Returns [`Error::InvalidUrl`] if `endpoint` does not parse, is not
/// `ws`/`wss`, or has no host.
pub fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint).map_err(|e| Error::invalid_url(endpoint, e.to_string()))?;

    match url.scheme() {
        "ws" | "wss" => {}
        other => {
            return Err(Error::invalid_url(
                endpoint,
                format!("scheme must be ws or wss, got {other}"),
            ));
        }
    }

    if url.host_str().is_none_or(str::is_empty) {
        return Err(Error::invalid_url(endpoint, "missing host"));
    }

    Ok(url)
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = ClientConfig::default();
        assert_eq!(config.max_attempts, 5);
        assert_eq!(config.retry_delay, Duration::from_millis(3000));
        assert_eq!(config.connect_timeout, Duration::from_secs(5));
        assert_eq!(config, ClientConfig::new());
    }

    #[test]
    fn test_builder_methods() {
        let config = ClientConfig::new()
            .with_max_attempts(0)
            .with_retry_delay(Duration::from_millis(250))
            .with_connect_timeout(Duration::from_secs(1));

        assert_eq!(config.max_attempts, 0);
        assert_eq!(config.retry_delay, Duration::from_millis(250));
        assert_eq!(config.connect_timeout, Duration::from_secs(1));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_zero_connect_timeout_rejected() {
        let config = ClientConfig::new().with_connect_timeout(Duration::ZERO);
        assert!(matches!(config.validate(), Err(Error::Config { .. })));
    }

    #[test]
    fn test_parse_endpoint_accepts_ws_and_wss() {
        assert_eq!(
            parse_endpoint(DEFAULT_ENDPOINT).unwrap().as_str(),
            "ws://localhost:8080/"
        );
        assert!(parse_endpoint("wss://192.168.4.1/ws").is_ok());
    }

    #[test]
    fn test_parse_endpoint_rejects_other_schemes() {
        let err = parse_endpoint("http://192.168.4.1").unwrap_err();
        assert!(matches!(err, Error::InvalidUrl { .. }));
        assert!(err.to_string().contains("scheme must be ws or wss"));
    }

    #[test]
    fn test_parse_endpoint_rejects_garbage() {
        assert!(matches!(
            parse_endpoint("not a url"),
            Err(Error::InvalidUrl { .. })
        ));
    }
}
