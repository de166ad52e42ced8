//! Client lifecycle states.

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

// ============================================================================
// ClientState
// ============================================================================

/// State of the reconnecting client.
///
/// ```text
///            connect()                 open
///   Idle ──────────────► Connecting ─────────► Open
///    ▲                    │      ▲              │
///    │ disconnect()  fail │      │ delay        │ close
///    │                    ▼      │              ▼
///    └──────────────── Reconnecting ◄───────────┘
///                         │
///                         │ ceiling reached
///                         ▼
///                      Exhausted
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum ClientState {
    /// No link and no attempt pending.
    #[default]
    Idle,
    /// Attempt in flight.
    Connecting,
    /// Link usable for sending.
    Open,
    /// Waiting out the retry delay.
    Reconnecting,
    /// Retry ceiling reached; waits for `connect()` or a new endpoint.
    Exhausted,
}

impl ClientState {
    /// Returns `true` while a link is open or being established.
    ///
    /// `connect()` is a no-op in these states.
    #[inline]
    #[must_use]
    pub const fn is_active(self) -> bool {
        matches!(self, Self::Connecting | Self::Open)
    }

    /// Returns the lifecycle of the underlying link.
    #[inline]
    #[must_use]
    pub const fn ready_state(self) -> ReadyState {
        match self {
            Self::Connecting => ReadyState::Connecting,
            Self::Open => ReadyState::Open,
            Self::Idle | Self::Reconnecting | Self::Exhausted => ReadyState::Closed,
        }
    }
}

impl fmt::Display for ClientState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Idle => "Idle",
            Self::Connecting => "Connecting",
            Self::Open => "Open",
            Self::Reconnecting => "Reconnecting",
            Self::Exhausted => "Exhausted",
        };
        f.write_str(name)
    }
}

// ============================================================================
// ReadyState
// ============================================================================

/// Lifecycle of the underlying link.
///
/// Links are released as soon as they close, so a closing link is never
/// observable through the client.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ReadyState {
    /// Handshake in progress.
    Connecting,
    /// Link open.
    Open,
    /// No link.
    Closed,
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_active() {
        assert!(ClientState::Connecting.is_active());
        assert!(ClientState::Open.is_active());
        assert!(!ClientState::Idle.is_active());
        assert!(!ClientState::Reconnecting.is_active());
        assert!(!ClientState::Exhausted.is_active());
    }

    #[test]
    fn test_ready_state_mapping() {
        assert_eq!(ClientState::Open.ready_state(), ReadyState::Open);
        assert_eq!(ClientState::Connecting.ready_state(), ReadyState::Connecting);
        assert_eq!(ClientState::Reconnecting.ready_state(), ReadyState::Closed);
        assert_eq!(ClientState::Exhausted.ready_state(), ReadyState::Closed);
    }

    #[test]
    fn test_display() {
        assert_eq!(ClientState::Reconnecting.to_string(), "Reconnecting");
        assert_eq!(ClientState::default(), ClientState::Idle);
    }
}
