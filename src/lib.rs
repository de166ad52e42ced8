//! RC Link - Reconnecting WebSocket client for RC transmitter configuration.
//!
//! This library keeps a live link to a transmitter or receiver that exposes
//! a WebSocket server on its configuration port, and ships the data model
//! the device speaks.
//!
//! # Architecture
//!
//! - **Client (Rust)**: Opens the link, reconnects on loss, dispatches frames
//! - **Device (firmware)**: Serves config and telemetry over WebSocket
//!
//! Key design principles:
//!
//! - One [`Client`] owns at most one link at a time
//! - Fixed retry delay with a hard ceiling (no backoff)
//! - Frames are JSON when they parse, raw text otherwise
//! - Failures surface as states and listener calls, never as panics
//!
//! # Quick Start
//!
//! ```no_run
//! use rc_link::{Client, ReceiverInfo, Result};
//!
//! #[tokio::main]
//! async fn main() -> Result<()> {
//!     let client = Client::builder()
//!         .endpoint("ws://192.168.4.1/ws")
//!         .build()?;
//!
//!     client.on_message(|payload| {
//!         if let Ok(info) = payload.parse::<ReceiverInfo>() {
//!             println!("battery {:.2} V", info.battery_voltage);
//!         }
//!     });
//!     client.connect();
//!
//!     tokio::signal::ctrl_c().await?;
//!     client.disconnect();
//!     Ok(())
//! }
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | [`client`] | [`Client`], builder, config and states |
//! | [`error`] | Error types and [`Result`] alias |
//! | [`protocol`] | Payload codec, device data model, normalization |
//! | [`transport`] | Connector seam and per-link I/O task |

// ============================================================================
// Modules
// ============================================================================

/// Reconnecting client.
///
/// Use [`Client::builder()`] to create a configured client.
pub mod client;

/// Error types and result aliases.
///
/// All fallible operations return [`Result<T>`] which uses [`Error`].
pub mod error;

/// Device protocol types.
///
/// Payload codec plus the channel, config and telemetry records.
pub mod protocol;

/// WebSocket transport layer.
///
/// [`Connector`] is the seam for custom link factories.
pub mod transport;

// ============================================================================
// Re-exports
// ============================================================================

// Client types
pub use client::{Client, ClientBuilder, ClientConfig, ClientState, ReadyState};

// Error types
pub use error::{Error, Result};

// Protocol types
pub use protocol::{
    ChannelSetting, ConfigData, DataOperation, DataPort, Payload, RadioMode, ReceiverInfo,
    XboxInput,
};

// Transport types
pub use transport::{Connector, WsConnector};
