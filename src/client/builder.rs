//! Builder pattern for client configuration.
//!
//! Provides a fluent API for configuring and creating [`Client`] instances.
//!
//! # Example
//!
//! ```no_run
//! use std::time::Duration;
//! use rc_link::Client;
//!
//! # async fn example() -> rc_link::Result<()> {
//! let client = Client::builder()
//!     .endpoint("ws://192.168.4.1/ws")
//!     .max_attempts(10)
//!     .retry_delay(Duration::from_secs(2))
//!     .build()?;
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use tokio::runtime::Handle;

use crate::error::{Error, Result};
use crate::transport::{Connector, WsConnector};

use super::config::{ClientConfig, DEFAULT_ENDPOINT, parse_endpoint};
use super::core::Client;

// ============================================================================
// ClientBuilder
// ============================================================================

/// Builder for configuring a [`Client`] instance.
///
/// Use [`Client::builder()`] to create a new builder.
#[derive(Default, Clone)]
pub struct ClientBuilder {
    /// Device endpoint.
    endpoint: Option<String>,
    /// Retry policy and timeouts.
    config: ClientConfig,
    /// Custom link factory.
    connector: Option<Arc<dyn Connector>>,
}

impl fmt::Debug for ClientBuilder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientBuilder")
            .field("endpoint", &self.endpoint)
            .field("config", &self.config)
            .field("custom_connector", &self.connector.is_some())
            .finish()
    }
}

// ============================================================================
// ClientBuilder Implementation
// ============================================================================

impl ClientBuilder {
    /// Creates a new builder with the default policy.
    #[inline]
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the device endpoint (`ws://` or `wss://`).
    #[inline]
    #[must_use]
    pub fn endpoint(mut self, endpoint: impl Into<String>) -> Self {
        self.endpoint = Some(endpoint.into());
        self
    }

    /// Sets the reconnect ceiling.
    #[inline]
    #[must_use]
    pub fn max_attempts(mut self, max_attempts: u32) -> Self {
        self.config.max_attempts = max_attempts;
        self
    }

    /// Sets the fixed delay between reconnection attempts.
    #[inline]
    #[must_use]
    pub fn retry_delay(mut self, retry_delay: Duration) -> Self {
        self.config.retry_delay = retry_delay;
        self
    }

    /// Sets the handshake timeout of the default connector.
    #[inline]
    #[must_use]
    pub fn connect_timeout(mut self, connect_timeout: Duration) -> Self {
        self.config.connect_timeout = connect_timeout;
        self
    }

    /// Replaces the whole config.
    #[inline]
    #[must_use]
    pub fn config(mut self, config: ClientConfig) -> Self {
        self.config = config;
        self
    }

    /// Uses a custom connector instead of [`WsConnector`].
    #[inline]
    #[must_use]
    pub fn connector(mut self, connector: Arc<dyn Connector>) -> Self {
        self.connector = Some(connector);
        self
    }

    /// Builds the client with validation.
    ///
    /// The client is created `Idle`; call [`Client::connect`] to start.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidUrl`] if the endpoint is not a `ws`/`wss` URL
    /// - [`Error::Config`] if the config is invalid
    /// - [`Error::Config`] if called outside a Tokio runtime
    pub fn build(self) -> Result<Client> {
        let endpoint = parse_endpoint(self.endpoint.as_deref().unwrap_or(DEFAULT_ENDPOINT))?;
        self.config.validate()?;

        let runtime = Handle::try_current().map_err(|_| {
            Error::config(
                "Client must be built inside a Tokio runtime.\n\
                 Example: call Client::builder().build() from #[tokio::main]",
            )
        })?;

        let connector = self
            .connector
            .unwrap_or_else(|| Arc::new(WsConnector::new(self.config.connect_timeout)));

        Ok(Client::new_with(runtime, endpoint, self.config, connector))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use crate::client::ClientState;

    #[test]
    fn test_builder_default() {
        let builder = ClientBuilder::new();
        assert!(builder.endpoint.is_none());
        assert!(builder.connector.is_none());
        assert_eq!(builder.config, ClientConfig::default());
    }

    #[test]
    fn test_builder_setters() {
        let builder = ClientBuilder::new()
            .endpoint("ws://10.0.0.2/ws")
            .max_attempts(3)
            .retry_delay(Duration::from_millis(100))
            .connect_timeout(Duration::from_secs(1));

        assert_eq!(builder.endpoint.as_deref(), Some("ws://10.0.0.2/ws"));
        assert_eq!(builder.config.max_attempts, 3);
        assert_eq!(builder.config.retry_delay, Duration::from_millis(100));
        assert_eq!(builder.config.connect_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_build_outside_runtime_fails() {
        let result = ClientBuilder::new().build();
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[tokio::test]
    async fn test_build_defaults() {
        let client = ClientBuilder::new().build().expect("build");
        assert_eq!(client.endpoint().as_str(), "ws://localhost:8080/");
        assert_eq!(client.state(), ClientState::Idle);
        assert_eq!(client.config().max_attempts, 5);
    }

    #[tokio::test]
    async fn test_build_rejects_http_endpoint() {
        let result = ClientBuilder::new().endpoint("http://192.168.4.1").build();
        assert!(matches!(result, Err(Error::InvalidUrl { .. })));
    }

    #[tokio::test]
    async fn test_build_rejects_invalid_config() {
        let result = ClientBuilder::new()
            .connect_timeout(Duration::ZERO)
            .build();
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
