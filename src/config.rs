//! Unit configuration.
//!
//! Uses `heapless::String` for `no_std` compatibility while remaining
//! ergonomic on desktop. Everything is fixed at construction — the port
//! set, the pin map, and the timing knobs never change at runtime.
//!
//! # Example
//!
//! ```rust
//! use portmux::config::{DeviceConfig, UnitConfig};
//!
//! // Use defaults
//! let config = UnitConfig::default();
//!
//! // Or customize
//! let config = UnitConfig::default()
//!     .with_spwm_freq_hz(1200)
//!     .with_device(DeviceConfig::default().with_name("bench unit"));
//! ```

use crate::pins::PinMap;
use heapless::String as HString;

/// Maximum length for identity strings (device names, ids).
pub const MAX_SHORT_STRING: usize = 64;

/// Type alias for identity strings.
pub type ShortString = HString<MAX_SHORT_STRING>;

/// Create a [`ShortString`] from a `&str`, truncating at a valid UTF-8
/// boundary if too long.
pub fn short_string(s: &str) -> ShortString {
    let mut hs = ShortString::new();
    let valid_end = s
        .char_indices()
        .take_while(|&(i, c)| i + c.len_utf8() <= MAX_SHORT_STRING)
        .last()
        .map(|(i, c)| i + c.len_utf8())
        .unwrap_or(0);
    let _ = hs.push_str(&s[..valid_end]);
    hs
}

/// Complete unit configuration.
#[derive(Clone, Debug, Default)]
pub struct UnitConfig {
    /// Pin and resource tables for this board.
    pub pinmap: PinMap,
    /// Timing and bring-up knobs.
    pub timing: TimingConfig,
    /// Device identification.
    pub device: DeviceConfig,
}

impl UnitConfig {
    /// Set the pin map.
    pub fn with_pinmap(mut self, pinmap: PinMap) -> Self {
        self.pinmap = pinmap;
        self
    }

    /// Set the timing configuration.
    pub fn with_timing(mut self, timing: TimingConfig) -> Self {
        self.timing = timing;
        self
    }

    /// Set the slow-PWM shared frequency.
    pub fn with_spwm_freq_hz(mut self, hz: u16) -> Self {
        self.timing.spwm_freq_hz = hz;
        self
    }

    /// Set the device configuration.
    pub fn with_device(mut self, device: DeviceConfig) -> Self {
        self.device = device;
        self
    }
}

/// Timing and bring-up knobs.
#[derive(Clone, Copy, Debug)]
pub struct TimingConfig {
    /// Shared frequency of the slow-PWM controller in Hz.
    pub spwm_freq_hz: u16,
    /// Settling delay after each port's accelerometer init, in ms.
    pub settle_delay_ms: u32,
    /// Maximum number of stale inbound packets drained at init.
    pub drain_limit: u32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            spwm_freq_hz: 1000,
            settle_delay_ms: 5,
            drain_limit: 100,
        }
    }
}

impl TimingConfig {
    /// Set the slow-PWM shared frequency.
    pub fn with_spwm_freq_hz(mut self, hz: u16) -> Self {
        self.spwm_freq_hz = hz;
        self
    }

    /// Set the post-init settling delay.
    pub fn with_settle_delay_ms(mut self, ms: u32) -> Self {
        self.settle_delay_ms = ms;
        self
    }

    /// Set the stale-packet drain bound.
    pub fn with_drain_limit(mut self, limit: u32) -> Self {
        self.drain_limit = limit;
        self
    }
}

/// Device identification configuration.
#[derive(Clone, Debug)]
pub struct DeviceConfig {
    /// Human-readable device name.
    pub name: ShortString,
    /// Unit id (for multi-unit installations).
    pub id: ShortString,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            name: short_string("portmux"),
            id: short_string("unit0"),
        }
    }
}

impl DeviceConfig {
    /// Set the device name.
    pub fn with_name(mut self, name: &str) -> Self {
        self.name = short_string(name);
        self
    }

    /// Set the unit id.
    pub fn with_id(mut self, id: &str) -> Self {
        self.id = short_string(id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_config() {
        let config = UnitConfig::default();
        assert_eq!(config.timing.spwm_freq_hz, 1000);
        assert_eq!(config.timing.settle_delay_ms, 5);
        assert_eq!(config.timing.drain_limit, 100);
        assert_eq!(config.device.name.as_str(), "portmux");
    }

    #[test]
    fn builder_pattern() {
        let config = UnitConfig::default()
            .with_spwm_freq_hz(1600)
            .with_timing(TimingConfig::default().with_drain_limit(10))
            .with_device(DeviceConfig::default().with_name("rig").with_id("u7"));

        // with_timing replaces the whole block, including earlier tweaks
        assert_eq!(config.timing.spwm_freq_hz, 1000);
        assert_eq!(config.timing.drain_limit, 10);
        assert_eq!(config.device.name.as_str(), "rig");
        assert_eq!(config.device.id.as_str(), "u7");
    }

    #[test]
    fn short_string_truncation() {
        let long_input = "a".repeat(100);
        let s = short_string(&long_input);
        assert!(s.len() <= MAX_SHORT_STRING);
    }

    #[test]
    fn short_string_utf8_boundary() {
        let input = "🛰️".repeat(20);
        let s = short_string(&input);
        assert!(!s.is_empty());
        assert!(s.len() <= MAX_SHORT_STRING);
        assert!(core::str::from_utf8(s.as_bytes()).is_ok());
    }
}
