//! Per-unit pin and resource tables.
//!
//! A [`PinMap`] is the single source of truth mapping a logical port index
//! to physical resources: native fast PWM pins, slow-controller channels,
//! analog input pins, the port's bus select code, and the shared select
//! line pins. Port construction reads the map exactly once; nothing else in
//! the core touches raw pin numbers.
//!
//! The default map describes the reference 6-port board: ports 2 and 5 have
//! no fast PWM routing and run all four output channels on the secondary
//! controller. The 16 slow channels are packed accordingly — two per
//! fast-capable port, four per slow-only port.

use crate::port::Tier;

/// Number of logical ports on a unit.
pub const PORT_COUNT: usize = 6;

/// Number of fast PWM pins routed to each port.
pub const FAST_PINS_PER_PORT: usize = 2;

/// Number of slow-controller channels routed to each port.
///
/// Fast-capable ports only consume the first two entries of their row; the
/// remaining slots repeat them and are never read.
pub const SLOW_CHANNELS_PER_PORT: usize = 4;

/// Number of analog input pins per port.
pub const ANALOG_PINS_PER_PORT: usize = 2;

/// Static pin/resource tables for one unit.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PinMap {
    /// Native fast PWM pins per port.
    pub fast_pwm: [[u8; FAST_PINS_PER_PORT]; PORT_COUNT],
    /// Slow-controller channels per port.
    pub slow_pwm: [[u8; SLOW_CHANNELS_PER_PORT]; PORT_COUNT],
    /// Analog input pins per port.
    pub analog: [[u8; ANALOG_PINS_PER_PORT]; PORT_COUNT],
    /// Bus multiplexer select code per port (3-bit).
    pub select_code: [u8; PORT_COUNT],
    /// GPIO pins driving the multiplexer select lines, LSB first.
    pub select_line_pins: [u8; crate::bus::SELECT_LINE_COUNT],
    /// Ports whose outputs are driven exclusively by the slow controller.
    pub slow_only: [bool; PORT_COUNT],
}

impl Default for PinMap {
    fn default() -> Self {
        Self {
            fast_pwm: [[3, 4], [5, 6], [9, 10], [20, 21], [22, 23], [25, 32]],
            slow_pwm: [
                [0, 1, 0, 1],
                [2, 3, 2, 3],
                [4, 5, 6, 7],
                [8, 9, 8, 9],
                [10, 11, 10, 11],
                [12, 13, 14, 15],
            ],
            analog: [[14, 15], [16, 17], [26, 27], [28, 31], [33, 34], [35, 36]],
            select_code: [0, 1, 2, 3, 4, 5],
            select_line_pins: [7, 8, 11],
            slow_only: [false, false, true, false, false, true],
        }
    }
}

impl PinMap {
    /// The capability tier of a port, derived from the slow-only set.
    ///
    /// Out-of-range ids are reported as [`Tier::SlowOnly`]; they never reach
    /// hardware because port construction validates the id first.
    pub fn tier(&self, port_id: usize) -> Tier {
        match self.slow_only.get(port_id) {
            Some(false) => Tier::FastCapable,
            _ => Tier::SlowOnly,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_map_marks_ports_2_and_5_slow_only() {
        let map = PinMap::default();
        for id in 0..PORT_COUNT {
            let expected = id == 2 || id == 5;
            assert_eq!(map.slow_only[id], expected, "port {id}");
            assert_eq!(
                map.tier(id),
                if expected {
                    Tier::SlowOnly
                } else {
                    Tier::FastCapable
                }
            );
        }
    }

    #[test]
    fn default_map_packs_sixteen_slow_channels() {
        let map = PinMap::default();
        let mut used = [false; 16];
        for (id, row) in map.slow_pwm.iter().enumerate() {
            let count = if map.slow_only[id] { 4 } else { 2 };
            for &ch in &row[..count] {
                assert!(!used[ch as usize], "channel {ch} assigned twice");
                used[ch as usize] = true;
            }
        }
        assert!(used.iter().all(|&u| u));
    }

    #[test]
    fn select_codes_fit_three_bits() {
        let map = PinMap::default();
        assert!(map.select_code.iter().all(|&c| c < 8));
    }
}
