//! WebSocket transport layer.
//!
//! This module opens links to the device and runs the I/O task behind each
//! one. The [`Client`](crate::Client) sits on top and decides when links are
//! created and released.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────┐                              ┌─────────────────┐
//! │  Client (Rust)  │                              │  Transmitter    │
//! │                 │         WebSocket            │  firmware       │
//! │  Connector      │─────────────────────────────►│                 │
//! │  → Connection   │◄────────────────────────────►│  WebSocket      │
//! │    (I/O task)   │       ws://device/ws         │  server         │
//! └─────────────────┘                              └─────────────────┘
//! ```
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `connector` | Link establishment seam and `tokio-tungstenite` connector |
//! | `connection` | Per-link I/O task |

// ============================================================================
// Submodules
// ============================================================================

/// Link establishment.
pub mod connector;

/// Per-link I/O task.
pub(crate) mod connection;

#[cfg(test)]
pub(crate) mod mock;

// ============================================================================
// Re-exports
// ============================================================================

pub use connector::{BoxedLink, Connector, LinkStream, WsConnector};
pub(crate) use connection::{Connection, LinkEvent};
