//! Link establishment.
//!
//! A [`Connector`] opens one WebSocket link to the device. The client owns a
//! connector and asks it for a fresh link on every connection attempt, so
//! the retry policy never depends on how the socket is made.
//!
//! [`WsConnector`] is the production implementation over
//! `tokio-tungstenite`.

// ============================================================================
// Imports
// ============================================================================

use std::time::Duration;

use async_trait::async_trait;
use futures_util::{Sink, Stream};
use tokio::time::timeout;
use tokio_tungstenite::connect_async;
use tokio_tungstenite::tungstenite::{Error as WsError, Message};
use tracing::debug;
use url::Url;

use crate::error::{Error, Result};

// ============================================================================
// Types
// ============================================================================

/// A bidirectional WebSocket frame stream.
///
/// Implemented for every `WebSocketStream`, whatever the byte transport
/// underneath.
pub trait LinkStream:
    Stream<Item = std::result::Result<Message, WsError>>
    + Sink<Message, Error = WsError>
    + Send
    + Unpin
{
}

impl<T> LinkStream for T where
    T: Stream<Item = std::result::Result<Message, WsError>>
        + Sink<Message, Error = WsError>
        + Send
        + Unpin
{
}

/// Owned, type-erased link.
pub type BoxedLink = Box<dyn LinkStream>;

// ============================================================================
// Connector
// ============================================================================

/// Opens links to a device endpoint.
#[async_trait]
pub trait Connector: Send + Sync + 'static {
    /// Establishes a new link to `endpoint`.
    ///
    /// # Errors
    ///
    /// Any error means the attempt failed and the client should schedule
    /// a retry.
    async fn connect(&self, endpoint: &Url) -> Result<BoxedLink>;
}

// ============================================================================
// WsConnector
// ============================================================================

/// Connector using `tokio-tungstenite` over TCP.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct WsConnector {
    /// Upper bound on TCP connect plus WebSocket handshake.
    connect_timeout: Duration,
}

impl WsConnector {
    /// Creates a connector with the given handshake timeout.
    #[inline]
    #[must_use]
    pub const fn new(connect_timeout: Duration) -> Self {
        Self { connect_timeout }
    }

    /// Returns the handshake timeout.
    #[inline]
    #[must_use]
    pub const fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }
}

#[async_trait]
impl Connector for WsConnector {
    async fn connect(&self, endpoint: &Url) -> Result<BoxedLink> {
        let handshake = timeout(self.connect_timeout, connect_async(endpoint.as_str()))
            .await
            .map_err(|_| {
                Error::connection(format!(
                    "handshake with {endpoint} timed out after {}ms",
                    self.connect_timeout.as_millis()
                ))
            })?;

        let (ws_stream, response) =
            handshake.map_err(|e| Error::connection(format!("{endpoint}: {e}")))?;

        debug!(%endpoint, status = %response.status(), "WebSocket handshake completed");

        Ok(Box::new(ws_stream))
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use futures_util::{SinkExt, StreamExt};
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn test_connect_and_echo() {
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");

        let server = tokio::spawn(async move {
            let (stream, _) = listener.accept().await.expect("accept");
            let mut ws = tokio_tungstenite::accept_async(stream)
                .await
                .expect("upgrade");
            if let Some(Ok(message)) = ws.next().await {
                ws.send(message).await.expect("echo");
            }
        });

        let endpoint = Url::parse(&format!("ws://{addr}")).unwrap();
        let connector = WsConnector::new(Duration::from_secs(5));
        let mut link = connector.connect(&endpoint).await.expect("connect");

        link.send(Message::Text("ping".into())).await.expect("send");
        let reply = link.next().await.expect("frame").expect("ok");
        assert_eq!(reply, Message::Text("ping".into()));

        server.await.expect("server task");
    }

    #[tokio::test]
    async fn test_connect_refused() {
        // Bind then drop to get a port that is very likely closed.
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        drop(listener);

        let endpoint = Url::parse(&format!("ws://{addr}")).unwrap();
        let connector = WsConnector::new(Duration::from_secs(5));
        let result = connector.connect(&endpoint).await;

        assert!(matches!(result, Err(Error::Connection { .. })));
    }

    #[tokio::test]
    async fn test_handshake_timeout() {
        // Accepts TCP but never answers the upgrade request.
        let listener = TcpListener::bind("127.0.0.1:0").await.expect("bind");
        let addr = listener.local_addr().expect("local addr");
        let _server = tokio::spawn(async move {
            let (_stream, _) = listener.accept().await.expect("accept");
            std::future::pending::<()>().await;
        });

        let endpoint = Url::parse(&format!("ws://{addr}")).unwrap();
        let connector = WsConnector::new(Duration::from_millis(200));
        let err = connector.connect(&endpoint).await.err().expect("timeout");

        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_connect_timeout_accessor() {
        let connector = WsConnector::new(Duration::from_secs(2));
        assert_eq!(connector.connect_timeout(), Duration::from_secs(2));
    }
}
