//! Channel value normalization.
//!
//! Pure helpers applied to user-edited settings before they are sent to
//! the device. After [`normalize_range`] a channel always satisfies
//! `PULSE_MIN <= min <= center <= max <= PULSE_MAX`.

// ============================================================================
// Imports
// ============================================================================

use super::device::{CHANNEL_COUNT, ChannelSetting, ConfigData, PULSE_MAX, PULSE_MIN, RadioMode};

// ============================================================================
// Functions
// ============================================================================

/// Bounds `value` to `[min, max]`.
///
/// Non-finite input (NaN, infinities) maps to `min`.
#[must_use]
pub fn clamp(value: f64, min: f64, max: f64) -> f64 {
    if !value.is_finite() {
        return min;
    }
    value.max(min).min(max)
}

/// Converts a raw UI input into a pulse width inside the device range.
#[must_use]
pub fn pulse_from_input(value: f64) -> i32 {
    clamp(value.floor(), f64::from(PULSE_MIN), f64::from(PULSE_MAX)) as i32
}

/// Repairs the endpoint ordering of a channel.
///
/// `min` and `max` are clamped to the device range, `max` is raised to
/// `min` when they cross, and `center` is pulled inside `[min, max]`.
#[must_use]
pub fn normalize_range(channel: ChannelSetting) -> ChannelSetting {
    let min = channel.min.clamp(PULSE_MIN, PULSE_MAX);
    let max = channel.max.clamp(PULSE_MIN, PULSE_MAX).max(min);
    let center = channel.center.clamp(min, max);

    ChannelSetting {
        min,
        center,
        max,
        ..channel
    }
}

/// Picks the display name for a channel.
///
/// Uses `name` when given, otherwise the channel's current name. Blank
/// results fall back to `CH{id + 1}`.
#[must_use]
pub fn normalize_name(channel: &ChannelSetting, name: Option<&str>) -> String {
    let candidate = name.unwrap_or(&channel.name).trim();
    if candidate.is_empty() {
        format!("CH{}", u32::from(channel.id) + 1)
    } else {
        candidate.to_owned()
    }
}

/// Applies [`normalize_range`] and [`normalize_name`] to every channel.
#[must_use]
pub fn normalize_config(config: ConfigData) -> ConfigData {
    let channel_settings = config
        .channel_settings
        .into_iter()
        .map(|channel| {
            let name = normalize_name(&channel, None);
            ChannelSetting {
                name,
                ..normalize_range(channel)
            }
        })
        .collect();

    ConfigData {
        channel_settings,
        ..config
    }
}

/// Builds the factory channel table.
#[must_use]
pub fn default_channels() -> Vec<ChannelSetting> {
    (0..CHANNEL_COUNT as u8)
        .map(ChannelSetting::with_defaults)
        .collect()
}

/// Lists radio modes as `(label, value)` pairs for selection widgets.
#[must_use]
pub fn radio_mode_options() -> Vec<(&'static str, RadioMode)> {
    RadioMode::ALL
        .iter()
        .map(|&mode| (mode.label(), mode))
        .collect()
}

// ============================================================================
// Tests
// ============================================================================
