//! PWM implementations: LEDC fast channels and the PCA9685 slow controller.
//!
//! Fast PWM uses the ESP32 LEDC peripheral, one channel per output pin, at
//! native frequency well above the slow tier. Slow PWM is a PCA9685
//! 16-channel 12-bit driver on its own I2C bus, one shared frequency for
//! all channels.

use crate::traits::{FastPwm, SlowPwm};
use alloc::vec::Vec;
use esp_idf_hal::delay::TickType;
use esp_idf_hal::i2c::I2cDriver;
use esp_idf_hal::ledc::LedcDriver;

/// LEDC-backed fast PWM, addressed by physical pin number.
///
/// Each output pin gets one pre-configured [`LedcDriver`]; the table maps
/// pin numbers to channels so duty writes stay a plain lookup. Duty levels
/// are 8-bit and rescaled to the channel's native resolution.
///
/// # Example
///
/// ```ignore
/// use portmux::hal::esp32::Esp32FastPwm;
///
/// let fast = Esp32FastPwm::new()
///     .with_channel(3, ledc_gpio3)
///     .with_channel(4, ledc_gpio4);
/// ```
pub struct Esp32FastPwm<'d> {
    channels: Vec<(u8, LedcDriver<'d>)>,
}

impl<'d> Esp32FastPwm<'d> {
    /// Creates an empty channel table.
    pub fn new() -> Self {
        Self {
            channels: Vec::new(),
        }
    }

    /// Registers a configured LEDC channel under a pin number.
    pub fn with_channel(mut self, pin: u8, driver: LedcDriver<'d>) -> Self {
        self.channels.push((pin, driver));
        self
    }
}

impl Default for Esp32FastPwm<'_> {
    fn default() -> Self {
        Self::new()
    }
}

impl FastPwm for Esp32FastPwm<'_> {
    fn set_duty(&mut self, pin: u8, level: u8) {
        if let Some((_, drv)) = self.channels.iter_mut().find(|(p, _)| *p == pin) {
            let max = drv.get_max_duty();
            let duty = u32::from(level) * max / 255;
            // A failed register write leaves the previous duty in place;
            // unknown pins are ignored, matching the trait contract.
            let _ = drv.set_duty(duty);
        }
    }
}

/// PCA9685 16-channel slow PWM controller.
///
/// The chip sits on its own I2C bus, separate from the multiplexed sensor
/// bus, so duty writes never contend with accelerometer traffic. One
/// prescaler sets the output frequency for all 16 channels; duty is 12-bit
/// per channel.
///
/// Transfer errors are dropped: the duty registers simply keep their
/// previous values, and the next write retries the transfer.
pub struct Esp32SlowPwm<'d> {
    i2c: I2cDriver<'d>,
    addr: u8,
    timeout: u32,
}

impl<'d> Esp32SlowPwm<'d> {
    /// MODE1 register
    const REG_MODE1: u8 = 0x00;

    /// First duty register (LED0_ON_L); each channel occupies four
    const REG_LED0_ON_L: u8 = 0x06;

    /// Prescaler register
    const REG_PRESCALE: u8 = 0xFE;

    /// MODE1: low-power sleep (oscillator off)
    const MODE1_SLEEP: u8 = 0x10;

    /// MODE1: register auto-increment
    const MODE1_AI: u8 = 0x20;

    /// MODE1: restart PWM after wake
    const MODE1_RESTART: u8 = 0x80;

    /// Internal oscillator frequency in Hz
    const OSC_HZ: u32 = 25_000_000;

    /// Per-transfer timeout in milliseconds
    const TIMEOUT_MS: u64 = 20;

    /// Wraps a configured I2C driver for the PCA9685 at `addr`.
    pub fn new(i2c: I2cDriver<'d>, addr: u8) -> Self {
        Self {
            i2c,
            addr,
            timeout: TickType::from(core::time::Duration::from_millis(Self::TIMEOUT_MS)).ticks(),
        }
    }

    fn write_reg(&mut self, reg: u8, value: u8) {
        let _ = self.i2c.write(self.addr, &[reg, value], self.timeout);
    }
}

impl SlowPwm for Esp32SlowPwm<'_> {
    fn begin(&mut self) {
        // Wake the oscillator and enable auto-increment for the 4-byte
        // duty writes.
        self.write_reg(Self::REG_MODE1, Self::MODE1_AI);
    }

    fn set_frequency(&mut self, freq_hz: u16) {
        let freq = u32::from(freq_hz.max(1));
        let prescale = (Self::OSC_HZ / (4096 * freq)).saturating_sub(1).min(255) as u8;

        // The prescaler only loads while the oscillator sleeps.
        self.write_reg(Self::REG_MODE1, Self::MODE1_AI | Self::MODE1_SLEEP);
        self.write_reg(Self::REG_PRESCALE, prescale);
        self.write_reg(Self::REG_MODE1, Self::MODE1_AI);
        self.write_reg(Self::REG_MODE1, Self::MODE1_AI | Self::MODE1_RESTART);
    }

    fn set_duty(&mut self, channel: u8, duty: u16) {
        if channel >= 16 {
            return;
        }
        let off = duty.min(4095);
        let reg = Self::REG_LED0_ON_L + channel * 4;
        // ON = 0, OFF = duty: leading-edge aligned, one auto-increment burst.
        let _ = self.i2c.write(
            self.addr,
            &[reg, 0, 0, (off & 0xFF) as u8, (off >> 8) as u8],
            self.timeout,
        );
    }
}
