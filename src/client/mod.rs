//! Reconnecting device client.
//!
//! This module provides the main entry point for talking to a device.
//!
//! # Components
//!
//! | Type | Description |
//! |------|-------------|
//! | [`Client`] | Owns the link and reconnects on failure |
//! | [`ClientBuilder`] | Fluent configuration builder |
//! | [`ClientConfig`] | Retry ceiling, retry delay, handshake timeout |
//! | [`ClientState`] | Lifecycle of the client |
//! | [`ReadyState`] | Lifecycle of the underlying link |
//!
//! # Example
//!
//! ```no_run
//! use rc_link::{Client, Result};
//!
//! # async fn example() -> Result<()> {
//! let client = Client::builder()
//!     .endpoint("ws://192.168.4.1/ws")
//!     .build()?;
//!
//! client.on_message(|payload| println!("{payload}"));
//! client.connect();
//! # Ok(())
//! # }
//! ```

// ============================================================================
// Submodules
// ============================================================================

/// Fluent builder pattern for client configuration.
pub mod builder;

/// Retry policy and endpoint validation.
pub mod config;

/// Core client implementation.
pub mod core;

/// Client lifecycle states.
pub mod state;

/// Listener slots.
mod listeners;

// ============================================================================
// Re-exports
// ============================================================================

pub use builder::ClientBuilder;
pub use config::{
    ClientConfig, DEFAULT_CONNECT_TIMEOUT, DEFAULT_ENDPOINT, DEFAULT_MAX_ATTEMPTS,
    DEFAULT_RETRY_DELAY, parse_endpoint,
};
pub use core::Client;
pub use listeners::{ErrorHandler, LinkHandler, MessageHandler};
pub use state::{ClientState, ReadyState};
