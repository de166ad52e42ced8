//! Per-link I/O task.
//!
//! Each connection attempt spawns one task that first establishes the link
//! through a [`Connector`], then pumps frames in both directions until the
//! link closes or the owner shuts it down.
//!
//! # Event Order
//!
//! The task reports, in order: [`LinkEvent::Opened`] (or
//! [`LinkEvent::Failed`]), zero or more [`LinkEvent::Message`], then at most
//! one [`LinkEvent::Closed`]. An explicit shutdown ends the task without a
//! closing event.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use tokio::runtime::Handle;
use tokio::sync::mpsc;
use tokio_tungstenite::tungstenite::Message;
use tracing::{debug, trace, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::protocol::Payload;

use super::connector::{BoxedLink, Connector};

// ============================================================================
// Types
// ============================================================================

/// Lifecycle notifications emitted by a link task.
#[derive(Debug)]
pub(crate) enum LinkEvent {
    /// Handshake completed.
    Opened,
    /// Inbound frame, already decoded.
    Message(Payload),
    /// Link could not be established.
    Failed(Error),
    /// Open link ended without being asked to. Carries the socket error,
    /// if the link ended on one.
    Closed(Option<Error>),
}

/// Internal commands for the I/O task.
enum LinkCommand {
    /// Write one text frame.
    Send(String),
    /// Close the link and stop.
    Shutdown,
}

// ============================================================================
// Connection
// ============================================================================

/// Handle to a spawned link task.
///
/// Dropping the handle stops the task, so the owner releases the link just
/// by letting go of it.
pub(crate) struct Connection {
    /// Channel for sending commands to the I/O task.
    command_tx: mpsc::UnboundedSender<LinkCommand>,
}

impl Connection {
    /// Spawns the I/O task for a new link to `endpoint`.
    ///
    /// `on_event` runs on the task for every [`LinkEvent`].
    pub(crate) fn spawn<F>(
        runtime: &Handle,
        connector: Arc<dyn Connector>,
        endpoint: Url,
        on_event: F,
    ) -> Self
    where
        F: Fn(LinkEvent) + Send + Sync + 'static,
    {
        let (command_tx, command_rx) = mpsc::unbounded_channel();

        runtime.spawn(Self::run(connector, endpoint, command_rx, on_event));

        Self { command_tx }
    }

    /// Queues a text frame for transmission.
    ///
    /// # Errors
    ///
    /// Returns [`Error::ConnectionClosed`] if the task has already stopped.
    pub(crate) fn send(&self, text: String) -> Result<()> {
        self.command_tx
            .send(LinkCommand::Send(text))
            .map_err(|_| Error::ConnectionClosed)
    }

    /// Asks the task to close the link.
    pub(crate) fn shutdown(&self) {
        let _ = self.command_tx.send(LinkCommand::Shutdown);
    }

    /// Task body: establish, then pump frames.
    async fn run<F>(
        connector: Arc<dyn Connector>,
        endpoint: Url,
        mut command_rx: mpsc::UnboundedReceiver<LinkCommand>,
        on_event: F,
    ) where
        F: Fn(LinkEvent) + Send + Sync + 'static,
    {
        let connecting = connector.connect(&endpoint);
        tokio::pin!(connecting);

        let established = loop {
            tokio::select! {
                result = &mut connecting => break result,

                command = command_rx.recv() => match command {
                    Some(LinkCommand::Send(_)) => {
                        trace!("Dropping frame queued before open");
                    }
                    Some(LinkCommand::Shutdown) | None => {
                        debug!(%endpoint, "Connect aborted");
                        return;
                    }
                },
            }
        };

        let link = match established {
            Ok(link) => link,
            Err(e) => {
                on_event(LinkEvent::Failed(e));
                return;
            }
        };

        debug!(%endpoint, "Link open");
        on_event(LinkEvent::Opened);

        if let Some(reason) = Self::pump(link, &mut command_rx, &on_event).await {
            on_event(LinkEvent::Closed(reason));
        }

        debug!(%endpoint, "Link task terminated");
    }

    /// Moves frames until the link ends.
    ///
    /// Returns `None` on explicit shutdown, `Some(error)` when the link
    /// ended on its own.
    async fn pump<F>(
        mut link: BoxedLink,
        command_rx: &mut mpsc::UnboundedReceiver<LinkCommand>,
        on_event: &F,
    ) -> Option<Option<Error>>
    where
        F: Fn(LinkEvent),
    {
        loop {
            tokio::select! {
                // Incoming frames from the device
                message = link.next() => match message {
                    Some(Ok(Message::Text(text))) => {
                        on_event(LinkEvent::Message(Payload::decode(&text)));
                    }

                    Some(Ok(Message::Binary(bytes))) => {
                        let payload = match std::str::from_utf8(&bytes) {
                            Ok(text) => Payload::decode(text),
                            Err(_) => {
                                debug!(len = bytes.len(), "Non-UTF-8 binary frame; passing through lossy");
                                Payload::Raw(String::from_utf8_lossy(&bytes).into_owned())
                            }
                        };
                        on_event(LinkEvent::Message(payload));
                    }

                    Some(Ok(Message::Close(frame))) => {
                        debug!(?frame, "Link closed by device");
                        return Some(None);
                    }

                    Some(Err(e)) => {
                        warn!(error = %e, "Link error");
                        return Some(Some(Error::from(e)));
                    }

                    None => {
                        debug!("Link stream ended");
                        return Some(None);
                    }

                    // Ping/Pong are answered by tungstenite
                    Some(Ok(_)) => {}
                },

                // Commands from the client
                command = command_rx.recv() => match command {
                    Some(LinkCommand::Send(text)) => {
                        let len = text.len();
                        if let Err(e) = link.send(Message::Text(text.into())).await {
                            warn!(error = %e, "Failed to write frame");
                            return Some(Some(Error::from(e)));
                        }
                        trace!(len, "Frame sent");
                    }

                    Some(LinkCommand::Shutdown) | None => {
                        debug!("Shutdown requested");
                        let _ = link.close().await;
                        return None;
                    }
                },
            }
        }
    }
}

impl Drop for Connection {
    fn drop(&mut self) {
        // Only the client holds a handle; dropping it means the link is released.
        self.shutdown();
    }
}

// ============================================================================
// Tests
// ============================================================================
