//! Device protocol types.
//!
//! The link itself treats every frame as an opaque [`Payload`]. The typed
//! data model and normalization helpers here are what UI code builds those
//! payloads from.
//!
//! # Modules
//!
//! | Module | Description |
//! |--------|-------------|
//! | `payload` | JSON-or-raw frame codec |
//! | `device` | Channel, config and telemetry records |
//! | `channel` | Value normalization applied before sending |

// ============================================================================
// Submodules
// ============================================================================

/// JSON-or-raw frame codec.
pub mod payload;

/// Device data model.
pub mod device;

/// Channel value normalization helpers.
pub mod channel;

// ============================================================================
// Re-exports
// ============================================================================

pub use channel::{
    clamp, default_channels, normalize_config, normalize_name, normalize_range,
    pulse_from_input, radio_mode_options,
};
pub use device::{
    CHANNEL_COUNT, ChannelSetting, ConfigData, DataOperation, DataPort, PULSE_MAX, PULSE_MIN,
    RadioMode, ReceiverInfo, XboxInput,
};
pub use payload::Payload;
