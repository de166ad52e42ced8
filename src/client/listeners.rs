//! Event listener slots.
//!
//! One slot per event class. Registering replaces the previous callback.
//! Callbacks are cloned out of their slot before they run, so a callback may
//! register listeners or call back into the client.

// ============================================================================
// Imports
// ============================================================================

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::trace;

use crate::error::Error;
use crate::protocol::Payload;

// ============================================================================
// Types
// ============================================================================

/// Called for every inbound message.
pub type MessageHandler = Arc<dyn Fn(Payload) + Send + Sync>;

/// Called when a link opens or drops.
pub type LinkHandler = Arc<dyn Fn() + Send + Sync>;

/// Called when an attempt fails or an open link errors.
pub type ErrorHandler = Arc<dyn Fn(&Error) + Send + Sync>;

// ============================================================================
// Listeners
// ============================================================================

#[derive(Default)]
pub(crate) struct Listeners {
    message: Mutex<Option<MessageHandler>>,
    connected: Mutex<Option<LinkHandler>>,
    disconnected: Mutex<Option<LinkHandler>>,
    error: Mutex<Option<ErrorHandler>>,
}

impl Listeners {
    pub(crate) fn set_message(&self, handler: MessageHandler) {
        *self.message.lock() = Some(handler);
    }

    pub(crate) fn set_connected(&self, handler: LinkHandler) {
        *self.connected.lock() = Some(handler);
    }

    pub(crate) fn set_disconnected(&self, handler: LinkHandler) {
        *self.disconnected.lock() = Some(handler);
    }

    pub(crate) fn set_error(&self, handler: ErrorHandler) {
        *self.error.lock() = Some(handler);
    }

    pub(crate) fn emit_message(&self, payload: Payload) {
        let handler = self.message.lock().clone();
        match handler {
            Some(handler) => handler(payload),
            None => trace!("No message listener; frame discarded"),
        }
    }

    pub(crate) fn emit_connected(&self) {
        let handler = self.connected.lock().clone();
        if let Some(handler) = handler {
            handler();
        }
    }

    pub(crate) fn emit_disconnected(&self) {
        let handler = self.disconnected.lock().clone();
        if let Some(handler) = handler {
            handler();
        }
    }

    pub(crate) fn emit_error(&self, error: &Error) {
        let handler = self.error.lock().clone();
        if let Some(handler) = handler {
            handler(error);
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::atomic::{AtomicUsize, Ordering};

    #[test]
    fn test_last_registration_wins() {
        let listeners = Listeners::default();
        let first = Arc::new(AtomicUsize::new(0));
        let second = Arc::new(AtomicUsize::new(0));

        let counter = Arc::clone(&first);
        listeners.set_connected(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
        let counter = Arc::clone(&second);
        listeners.set_connected(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        listeners.emit_connected();

        assert_eq!(first.load(Ordering::SeqCst), 0);
        assert_eq!(second.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn test_emit_without_listener_is_noop() {
        let listeners = Listeners::default();
        listeners.emit_message(Payload::raw("x"));
        listeners.emit_connected();
        listeners.emit_disconnected();
        listeners.emit_error(&Error::ConnectionClosed);
    }

    #[test]
    fn test_handler_may_reregister_itself() {
        let listeners = Arc::new(Listeners::default());
        let hits = Arc::new(AtomicUsize::new(0));

        let inner = Arc::clone(&listeners);
        let counter = Arc::clone(&hits);
        listeners.set_error(Arc::new(move |_| {
            counter.fetch_add(1, Ordering::SeqCst);
            // Slot lock is not held while the handler runs.
            inner.set_error(Arc::new(|_| {}));
        }));

        listeners.emit_error(&Error::ConnectionClosed);
        listeners.emit_error(&Error::ConnectionClosed);

        assert_eq!(hits.load(Ordering::SeqCst), 1);
    }
}
