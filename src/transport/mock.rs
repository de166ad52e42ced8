//! In-memory connector for tests.
//!
//! Each accepted attempt is backed by a `tokio::io::duplex` pipe with a real
//! WebSocket codec on both ends, so tests drive the device side with the
//! same frames a firmware would send.

// ============================================================================
// Imports
// ============================================================================

use std::collections::VecDeque;
use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::io::{DuplexStream, duplex};
use tokio::sync::mpsc;
use tokio_tungstenite::WebSocketStream;
use tokio_tungstenite::tungstenite::protocol::Role;
use url::Url;

use crate::error::{Error, Result};

use super::connector::{BoxedLink, Connector};

// ============================================================================
// Types
// ============================================================================

/// Device side of an accepted link.
pub(crate) type DeviceSocket = WebSocketStream<DuplexStream>;

/// Scripted result of one connection attempt.
#[derive(Debug, Clone)]
pub(crate) enum Outcome {
    /// Hand out a working link.
    Accept,
    /// Fail with a connection error.
    Refuse(String),
    /// Never complete.
    Hang,
}

#[derive(Default)]
struct Script {
    outcomes: VecDeque<Outcome>,
    endpoints: Vec<Url>,
}

// ============================================================================
// MockConnector
// ============================================================================

/// Connector half, given to the client.
pub(crate) struct MockConnector {
    script: Arc<Mutex<Script>>,
    devices: mpsc::UnboundedSender<DeviceSocket>,
}

/// Test half, used to script attempts and talk as the device.
pub(crate) struct MockHandle {
    script: Arc<Mutex<Script>>,
    devices: mpsc::UnboundedReceiver<DeviceSocket>,
}

/// Creates a connected connector/handle pair.
///
/// Attempts beyond the scripted outcomes are refused.
pub(crate) fn pair() -> (Arc<MockConnector>, MockHandle) {
    let script = Arc::new(Mutex::new(Script::default()));
    let (devices_tx, devices_rx) = mpsc::unbounded_channel();

    let connector = Arc::new(MockConnector {
        script: Arc::clone(&script),
        devices: devices_tx,
    });
    let handle = MockHandle {
        script,
        devices: devices_rx,
    };

    (connector, handle)
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(&self, endpoint: &Url) -> Result<BoxedLink> {
        let outcome = {
            let mut script = self.script.lock();
            script.endpoints.push(endpoint.clone());
            script
                .outcomes
                .pop_front()
                .unwrap_or_else(|| Outcome::Refuse("no scripted outcome".into()))
        };

        match outcome {
            Outcome::Accept => {
                let (client_io, device_io) = duplex(64 * 1024);
                let client = WebSocketStream::from_raw_socket(client_io, Role::Client, None).await;
                let device = WebSocketStream::from_raw_socket(device_io, Role::Server, None).await;
                let _ = self.devices.send(device);
                Ok(Box::new(client))
            }
            Outcome::Refuse(message) => Err(Error::connection(message)),
            Outcome::Hang => std::future::pending().await,
        }
    }
}

impl MockHandle {
    /// Appends an outcome for the next unscripted attempt.
    pub(crate) fn push(&self, outcome: Outcome) {
        self.script.lock().outcomes.push_back(outcome);
    }

    /// Number of attempts made so far.
    pub(crate) fn attempts(&self) -> usize {
        self.script.lock().endpoints.len()
    }

    /// Endpoints of all attempts, in order.
    pub(crate) fn endpoints(&self) -> Vec<String> {
        self.script
            .lock()
            .endpoints
            .iter()
            .map(|url| url.to_string())
            .collect()
    }

    /// Waits for the device side of the next accepted link.
    pub(crate) async fn next_device(&mut self) -> DeviceSocket {
        self.devices
            .recv()
            .await
            .expect("mock connector dropped before accepting")
    }
}
