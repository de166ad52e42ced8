//! Device data model.
//!
//! Typed forms of the JSON objects the transmitter firmware exchanges with
//! the configuration UI. Field names follow the firmware's snake_case keys
//! and every enum travels as its integer discriminant.
//!
//! These types are optional at the link layer: wrap them with
//! [`Payload::structured`](super::Payload::structured) to send, and use
//! [`Payload::parse`](super::Payload::parse) on received messages.
//!
//! # Example
//!
//! ```ignore
//! use rc_link::protocol::{ConfigData, Payload, RadioMode, default_channels};
//!
//! let config = ConfigData {
//!     radio_mode: RadioMode::EspNow,
//!     channel_settings: default_channels(),
//! };
//! let payload = Payload::structured(&config)?;
//! ```

// ============================================================================
// Imports
// ============================================================================

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::Error;

// ============================================================================
// Constants
// ============================================================================

/// Number of proportional channels on the receiver.
pub const CHANNEL_COUNT: usize = 4;

/// Lowest pulse width accepted for a channel endpoint, in microseconds.
pub const PULSE_MIN: i32 = 0;

/// Highest pulse width accepted for a channel endpoint, in microseconds.
pub const PULSE_MAX: i32 = 2500;

// ============================================================================
// Integer Enums
// ============================================================================

/// Declares a fieldless enum that travels as its `u8` discriminant.
macro_rules! wire_enum {
    (
        $(#[$meta:meta])*
        pub enum $name:ident {
            $( $(#[$vmeta:meta])* $variant:ident = $value:literal, )+
        }
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(try_from = "u8", into = "u8")]
        #[repr(u8)]
        pub enum $name {
            $( $(#[$vmeta])* $variant = $value, )+
        }

        impl $name {
            /// Every variant in discriminant order.
            pub const ALL: &'static [Self] = &[$( Self::$variant, )+];
        }

        impl From<$name> for u8 {
            #[inline]
            fn from(value: $name) -> Self {
                value as u8
            }
        }

        impl TryFrom<u8> for $name {
            type Error = Error;

            fn try_from(value: u8) -> Result<Self, Self::Error> {
                match value {
                    $( $value => Ok(Self::$variant), )+
                    other => Err(Error::protocol(format!(
                        concat!("Unknown ", stringify!($name), " value: {}"),
                        other
                    ))),
                }
            }
        }
    };
}

wire_enum! {
    /// Radio link used between transmitter and receiver.
    pub enum RadioMode {
        /// ESP-NOW peer-to-peer link.
        EspNow = 0,
        /// Bluetooth gamepad controller.
        BtController = 1,
    }
}

wire_enum! {
    /// Logical data port a message is addressed to.
    pub enum DataPort {
        /// Configuration synchronization.
        ConfigSync = 0,
        /// Configuration plus live channel synchronization.
        ConfigAndChannelSync = 1,
    }
}

wire_enum! {
    /// Direction of a data port operation.
    pub enum DataOperation {
        /// Read from the device.
        Read = 0,
        /// Write to the device.
        Write = 1,
    }
}

wire_enum! {
    /// Xbox controller input a channel is mapped to.
    ///
    /// Discriminant 17 is a sentinel on the firmware side and never appears
    /// on the wire.
    pub enum XboxInput {
        /// Not mapped.
        None = 0,
        BtnA = 1,
        BtnB = 2,
        BtnX = 3,
        BtnY = 4,
        BtnLb = 5,
        BtnRb = 6,
        BtnSelect = 7,
        BtnStart = 8,
        BtnXbox = 9,
        BtnLs = 10,
        BtnRs = 11,
        BtnShare = 12,
        DirUp = 13,
        DirRight = 14,
        DirDown = 15,
        DirLeft = 16,
        /// Left stick, horizontal axis.
        JoyLHori = 18,
        /// Left stick, vertical axis.
        JoyLVert = 19,
        /// Right stick, horizontal axis.
        JoyRHori = 20,
        /// Right stick, vertical axis.
        JoyRVert = 21,
        /// Left trigger.
        TrigLt = 22,
        /// Right trigger.
        TrigRt = 23,
    }
}

impl RadioMode {
    /// Human-readable label for selection lists.
    #[inline]
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::EspNow => "ESP-NOW",
            Self::BtController => "Bluetooth Controller",
        }
    }
}

impl fmt::Display for RadioMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl Default for RadioMode {
    #[inline]
    fn default() -> Self {
        Self::EspNow
    }
}

impl XboxInput {
    /// Returns `true` for digital buttons and the d-pad.
    #[inline]
    #[must_use]
    pub fn is_button(self) -> bool {
        (1..=16).contains(&u8::from(self))
    }

    /// Returns `true` for analog sticks and triggers.
    #[inline]
    #[must_use]
    pub fn is_axis(self) -> bool {
        u8::from(self) >= 18
    }
}

impl Default for XboxInput {
    #[inline]
    fn default() -> Self {
        Self::None
    }
}

// ============================================================================
// ChannelSetting
// ============================================================================

/// Calibration for one receiver output channel.
///
/// Pulse widths are microseconds.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChannelSetting {
    /// Zero-based channel index.
    pub id: u8,
    /// Display name.
    pub name: String,
    /// Low endpoint.
    pub min: i32,
    /// Neutral position.
    pub center: i32,
    /// High endpoint.
    pub max: i32,
    /// Invert channel direction.
    pub reverse: bool,
    /// Trim applied on top of the output.
    pub offset: i32,
    /// Controller input driving this channel in Bluetooth mode.
    pub xbox_input_key: XboxInput,
}

impl ChannelSetting {
    /// Creates a channel with factory calibration (1000/1500/2000).
    #[must_use]
    pub fn with_defaults(id: u8) -> Self {
        Self {
            id,
            name: format!("CH{}", u32::from(id) + 1),
            min: 1000,
            center: 1500,
            max: 2000,
            reverse: false,
            offset: 0,
            xbox_input_key: XboxInput::None,
        }
    }
}

// ============================================================================
// ConfigData
// ============================================================================

/// Full device configuration.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ConfigData {
    /// Active radio link.
    pub radio_mode: RadioMode,
    /// Per-channel calibration.
    pub channel_settings: Vec<ChannelSetting>,
}

// ============================================================================
// ReceiverInfo
// ============================================================================

/// Live telemetry reported by the receiver.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReceiverInfo {
    /// Signal strength seen by the ground unit, dBm.
    pub rssi_ground: i32,
    /// Signal strength seen by the air unit, dBm.
    pub rssi_air: i32,
    /// Receiver battery, volts.
    pub battery_voltage: f32,
    /// Receiver firmware version string.
    pub firmware_version: String,
    /// Current pulse width of each output.
    pub channel_outputs: [i32; CHANNEL_COUNT],
}

// ============================================================================
// Tests
// ============================================================================
