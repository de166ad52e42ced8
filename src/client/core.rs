//! Reconnecting device client.
//!
//! The [`Client`] owns at most one link to the device and keeps it alive:
//! failed attempts and dropped links are retried after a fixed delay until
//! the configured ceiling is reached.
//!
//! # Example
//!
//! ```no_run
//! use rc_link::{Client, Payload};
//! use serde_json::json;
//!
//! # async fn example() -> rc_link::Result<()> {
//! let client = Client::builder().endpoint("ws://192.168.4.1/ws").build()?;
//!
//! client.on_connected(|| println!("device online"));
//! client.on_message(|payload| println!("device says {payload}"));
//! client.connect();
//!
//! client.send(json!({ "radio_mode": 0 }));
//! # Ok(())
//! # }
//! ```
//!
//! # Failure Handling
//!
//! Connection failures never surface as `Err` from client methods. They
//! become state transitions plus listener calls; a `send` while the link is
//! down is dropped with a warning.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;
use std::sync::{Arc, Weak};

use parking_lot::Mutex;
use tokio::runtime::Handle;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};
use url::Url;

use crate::error::{Error, Result};
use crate::protocol::Payload;
use crate::transport::{Connection, Connector, LinkEvent};

use super::builder::ClientBuilder;
use super::config::{ClientConfig, parse_endpoint};
use super::listeners::Listeners;
use super::state::{ClientState, ReadyState};

// ============================================================================
// Types
// ============================================================================

/// Mutable link bookkeeping, guarded by one lock.
struct LinkSlot {
    /// Current device endpoint.
    endpoint: Url,
    /// Lifecycle state.
    state: ClientState,
    /// Consecutive failed attempts since the last successful open.
    attempts: u32,
    /// Bumped whenever the live link or pending retry is replaced.
    /// Events tagged with an older generation are discarded.
    generation: u64,
    /// Live link, if any.
    connection: Option<Connection>,
    /// Pending retry timer, if any.
    retry: Option<JoinHandle<()>>,
}

impl LinkSlot {
    /// Releases the link and cancels the retry timer.
    fn release(&mut self) {
        if let Some(retry) = self.retry.take() {
            retry.abort();
        }
        if let Some(connection) = self.connection.take() {
            connection.shutdown();
        }
        self.generation += 1;
    }
}

/// Shared state behind every [`Client`] handle.
pub(crate) struct ClientInner {
    /// Runtime used for link tasks and retry timers.
    runtime: Handle,
    /// Retry policy.
    config: ClientConfig,
    /// Link factory.
    connector: Arc<dyn Connector>,
    /// Event callbacks.
    listeners: Listeners,
    /// Link state machine.
    slot: Mutex<LinkSlot>,
}

// ============================================================================
// Client
// ============================================================================

/// Reconnecting WebSocket client for one device.
///
/// Cheap to clone; clones share the same link. The link is torn down when
/// the last clone is dropped.
#[derive(Clone)]
pub struct Client {
    /// Shared inner state.
    pub(crate) inner: Arc<ClientInner>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let slot = self.inner.slot.lock();
        f.debug_struct("Client")
            .field("endpoint", &slot.endpoint.as_str())
            .field("state", &slot.state)
            .field("attempts", &slot.attempts)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Client - Constructors
// ============================================================================

impl Client {
    /// Creates a configuration builder for the client.
    #[inline]
    #[must_use]
    pub fn builder() -> ClientBuilder {
        ClientBuilder::new()
    }

    /// Creates a client for the default local endpoint.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if called outside a Tokio runtime.
    pub fn new() -> Result<Self> {
        ClientBuilder::new().build()
    }

    pub(crate) fn new_with(
        runtime: Handle,
        endpoint: Url,
        config: ClientConfig,
        connector: Arc<dyn Connector>,
    ) -> Self {
        debug!(%endpoint, ?config, "Client created");

        Self {
            inner: Arc::new(ClientInner {
                runtime,
                config,
                connector,
                listeners: Listeners::default(),
                slot: Mutex::new(LinkSlot {
                    endpoint,
                    state: ClientState::Idle,
                    attempts: 0,
                    generation: 0,
                    connection: None,
                    retry: None,
                }),
            }),
        }
    }
}

// ============================================================================
// Client - Lifecycle
// ============================================================================

impl Client {
    /// Starts connecting to the current endpoint.
    ///
    /// No-op while `Connecting` or `Open`. From `Reconnecting` the pending
    /// retry is cancelled and an attempt starts immediately. From
    /// `Exhausted` one attempt is made; the attempt counter is not reset, so
    /// a failure returns to `Exhausted` once the retry delay has passed.
    pub fn connect(&self) {
        self.inner.connect();
    }

    /// Closes the link and stops reconnecting.
    ///
    /// Cancels any pending retry and moves to `Idle`. The attempt counter is
    /// left untouched. Fires *disconnected* if the link was open.
    pub fn disconnect(&self) {
        let was_open = {
            let mut slot = self.inner.slot.lock();
            let was_open = slot.state == ClientState::Open;
            slot.release();
            slot.state = ClientState::Idle;
            info!(endpoint = %slot.endpoint, "Disconnected by request");
            was_open
        };

        if was_open {
            self.inner.listeners.emit_disconnected();
        }
    }

    /// Points the client at a new device endpoint.
    ///
    /// Does nothing if `endpoint` equals the current one. Otherwise tears
    /// down the current link (as [`disconnect`](Self::disconnect)) and
    /// connects to the new endpoint, even from `Exhausted`. The attempt
    /// counter carries over, so after exhaustion a failing endpoint gets a
    /// single attempt.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidUrl`] if `endpoint` is not a `ws`/`wss` URL.
    /// The current link is left untouched in that case.
    pub fn set_endpoint(&self, endpoint: &str) -> Result<()> {
        let endpoint = parse_endpoint(endpoint)?;

        let was_open = {
            let mut slot = self.inner.slot.lock();
            if slot.endpoint == endpoint {
                debug!(%endpoint, "Endpoint unchanged");
                return Ok(());
            }

            let was_open = slot.state == ClientState::Open;
            slot.release();
            slot.state = ClientState::Idle;
            info!(from = %slot.endpoint, to = %endpoint, "Endpoint changed");
            slot.endpoint = endpoint;
            was_open
        };

        if was_open {
            self.inner.listeners.emit_disconnected();
        }

        self.inner.connect();
        Ok(())
    }
}

// ============================================================================
// Client - Messaging
// ============================================================================

impl Client {
    /// Sends a payload if the link is open.
    ///
    /// Structured payloads go out as JSON text, raw text verbatim. While the
    /// link is not open the payload is dropped and a warning is logged.
    ///
    /// Returns `true` if the payload was handed to the link.
    pub fn send(&self, payload: impl Into<Payload>) -> bool {
        match self.try_send(payload) {
            Ok(()) => true,
            Err(e) => {
                warn!(error = %e, "Message dropped");
                false
            }
        }
    }

    /// Sends a payload, reporting why it could not be sent.
    ///
    /// # Errors
    ///
    /// - [`Error::NotConnected`] if the link is not open
    /// - [`Error::Json`] if the payload cannot be encoded
    /// - [`Error::ConnectionClosed`] if the link closed concurrently
    pub fn try_send(&self, payload: impl Into<Payload>) -> Result<()> {
        let slot = self.inner.slot.lock();
        let connection = match (slot.state, slot.connection.as_ref()) {
            (ClientState::Open, Some(connection)) => connection,
            (state, _) => return Err(Error::not_connected(state)),
        };

        let text = payload.into().encode()?;
        connection.send(text)
    }
}

// ============================================================================
// Client - Listeners
// ============================================================================

impl Client {
    /// Sets the callback for inbound messages, replacing any previous one.
    pub fn on_message<F>(&self, handler: F)
    where
        F: Fn(Payload) + Send + Sync + 'static,
    {
        self.inner.listeners.set_message(Arc::new(handler));
    }

    /// Sets the callback for link open, replacing any previous one.
    pub fn on_connected<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner.listeners.set_connected(Arc::new(handler));
    }

    /// Sets the callback for link loss, replacing any previous one.
    pub fn on_disconnected<F>(&self, handler: F)
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner.listeners.set_disconnected(Arc::new(handler));
    }

    /// Sets the callback for connection errors, replacing any previous one.
    pub fn on_error<F>(&self, handler: F)
    where
        F: Fn(&Error) + Send + Sync + 'static,
    {
        self.inner.listeners.set_error(Arc::new(handler));
    }
}

// ============================================================================
// Client - Accessors
// ============================================================================

impl Client {
    /// Returns `true` if the link is open.
    #[inline]
    #[must_use]
    pub fn is_connected(&self) -> bool {
        self.state() == ClientState::Open
    }

    /// Returns the client state.
    #[inline]
    #[must_use]
    pub fn state(&self) -> ClientState {
        self.inner.slot.lock().state
    }

    /// Returns the lifecycle of the underlying link.
    #[inline]
    #[must_use]
    pub fn ready_state(&self) -> ReadyState {
        self.state().ready_state()
    }

    /// Returns consecutive failed attempts since the last open.
    #[inline]
    #[must_use]
    pub fn attempts(&self) -> u32 {
        self.inner.slot.lock().attempts
    }

    /// Returns the current endpoint.
    #[must_use]
    pub fn endpoint(&self) -> Url {
        self.inner.slot.lock().endpoint.clone()
    }

    /// Returns the retry policy.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &ClientConfig {
        &self.inner.config
    }
}

// ============================================================================
// ClientInner - State Machine
// ============================================================================

impl ClientInner {
    /// Guarded entry into `Connecting`.
    fn connect(self: &Arc<Self>) {
        let mut slot = self.slot.lock();
        if slot.state.is_active() {
            debug!(state = %slot.state, "Link already active; connect ignored");
            return;
        }
        self.start_attempt(&mut slot);
    }

    /// Allocates a new link for the current endpoint.
    fn start_attempt(self: &Arc<Self>, slot: &mut LinkSlot) {
        slot.release();
        slot.state = ClientState::Connecting;

        let generation = slot.generation;
        let inner = Arc::downgrade(self);

        info!(
            endpoint = %slot.endpoint,
            attempt = slot.attempts + 1,
            "Connecting"
        );

        slot.connection = Some(Connection::spawn(
            &self.runtime,
            Arc::clone(&self.connector),
            slot.endpoint.clone(),
            move |event| {
                if let Some(inner) = inner.upgrade() {
                    inner.handle_link_event(generation, event);
                }
            },
        ));
    }

    /// Applies an event from the link task tagged `generation`.
    fn handle_link_event(self: &Arc<Self>, generation: u64, event: LinkEvent) {
        match event {
            LinkEvent::Opened => {
                {
                    let mut slot = self.slot.lock();
                    if slot.generation != generation {
                        return;
                    }
                    slot.state = ClientState::Open;
                    slot.attempts = 0;
                    info!(endpoint = %slot.endpoint, "Link open");
                }
                self.listeners.emit_connected();
            }

            LinkEvent::Message(payload) => {
                if self.slot.lock().generation != generation {
                    return;
                }
                self.listeners.emit_message(payload);
            }

            LinkEvent::Failed(error) => {
                {
                    let mut slot = self.slot.lock();
                    if slot.generation != generation {
                        return;
                    }
                    warn!(endpoint = %slot.endpoint, error = %error, "Connection attempt failed");
                    self.after_link_loss(&mut slot);
                }
                self.listeners.emit_error(&error);
            }

            LinkEvent::Closed(error) => {
                {
                    let mut slot = self.slot.lock();
                    if slot.generation != generation {
                        return;
                    }
                    warn!(endpoint = %slot.endpoint, "Link lost");
                    self.after_link_loss(&mut slot);
                }
                if let Some(error) = error {
                    self.listeners.emit_error(&error);
                }
                self.listeners.emit_disconnected();
            }
        }
    }

    /// Counts a lost link and arms the retry timer.
    ///
    /// The ceiling is checked when the timer fires, so the client stays
    /// `Reconnecting` for one delay even after the last allowed attempt.
    fn after_link_loss(self: &Arc<Self>, slot: &mut LinkSlot) {
        slot.release();

        let max_attempts = self.config.max_attempts;
        slot.attempts = slot.attempts.saturating_add(1).min(max_attempts);
        slot.state = ClientState::Reconnecting;

        info!(
            attempt = slot.attempts,
            max_attempts,
            delay = ?self.config.retry_delay,
            "Scheduling reconnect"
        );

        let generation = slot.generation;
        let delay = self.config.retry_delay;
        let inner: Weak<Self> = Arc::downgrade(self);

        slot.retry = Some(self.runtime.spawn(async move {
            tokio::time::sleep(delay).await;
            if let Some(inner) = inner.upgrade() {
                inner.retry_elapsed(generation);
            }
        }));
    }

    /// Retry timer callback.
    fn retry_elapsed(self: &Arc<Self>, generation: u64) {
        let mut slot = self.slot.lock();
        if slot.generation != generation || slot.state != ClientState::Reconnecting {
            debug!("Stale retry timer ignored");
            return;
        }

        // This timer is the running task; drop its handle instead of aborting.
        slot.retry = None;

        if slot.attempts >= self.config.max_attempts {
            slot.state = ClientState::Exhausted;
            warn!(attempts = slot.attempts, "Max reconnection attempts reached");
            return;
        }

        self.start_attempt(&mut slot);
    }
}

impl Drop for ClientInner {
    fn drop(&mut self) {
        self.slot.get_mut().release();
    }
}

// ============================================================================
// Tests
// ============================================================================
