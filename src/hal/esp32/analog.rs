//! Analog sampling over the ESP32 oneshot ADC.

use crate::traits::AnalogReader;
use alloc::boxed::Box;
use alloc::vec::Vec;

/// Pin-addressed analog sampler.
///
/// Each ESP32 ADC channel driver is its own concrete type, so the table
/// holds one sampling closure per pin instead of the drivers themselves.
/// Register a closure reading the matching `AdcChannelDriver` for every
/// analog pin in the unit's pin map; unknown pins read as `0`.
///
/// # Example
///
/// ```ignore
/// use portmux::hal::esp32::Esp32Analog;
///
/// let analog = Esp32Analog::new()
///     .with_channel(14, move || pressure_ch.read().unwrap_or(0))
///     .with_channel(15, move || flex_ch.read().unwrap_or(0));
/// ```
pub struct Esp32Analog<'d> {
    channels: Vec<(u8, Box<dyn FnMut() -> u16 + 'd>)>,
}

impl<'d> Esp32Analog<'d> {
    /// Creates an empty channel table.
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
        }
    }

    /// Registers a sampling closure under a pin number.
    pub fn with_channel(mut self, pin: u8, sample: impl FnMut() -> u16 + 'd) -> Self {
        self.channels.push((pin, Box::new(sample)));
        self
    }
}

impl Default for Esp32Analog<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl AnalogReader for Esp32Analog<'_> {
    fn read(&mut self, pin: u8) -> u16 {
        match self.channels.iter_mut().find(|(p, _)| *p == pin) {
            Some((_, sample)) => sample(),
            None => 0,
        }
    }
}
