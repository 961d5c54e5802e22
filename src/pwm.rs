//! PWM tier abstraction.
//!
//! Each physical output channel is either *fast* — a native variable-duty
//! pin — or *slow* — a channel on the secondary controller. Which one a
//! given logical output maps to is decided once, at port construction, and
//! stored as a [`PwmChannel`] variant; `write_duty` then takes a uniform
//! 0..=255 level regardless of tier.
//!
//! Slow channels live in a 12-bit duty space, so the 8-bit level is scaled
//! by [`SLOW_DUTY_SCALE`] (0..255 → 0..4080) on the way in. Slow writes go
//! through the shared controller and are bracketed by a critical section;
//! fast writes hit a dedicated per-pin register and need none.

use crate::critical::CriticalGuard;
use crate::traits::{FastPwm, SlowPwm, UnitHardware};

/// Linear scale factor from 8-bit levels to the slow controller's 12-bit
/// duty space.
pub const SLOW_DUTY_SCALE: u16 = 16;

/// One physical output channel, resolved to its owning peripheral.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PwmChannel {
    /// Driven by the native fast PWM peripheral.
    Fast {
        /// Physical fast PWM pin.
        pin: u8,
    },
    /// Driven by the secondary slow controller.
    Slow {
        /// Channel index on the slow controller.
        channel: u8,
    },
}

impl PwmChannel {
    /// Write a duty level (0..=255) to this channel.
    ///
    /// Callers validate the *logical* output index before resolving to a
    /// `PwmChannel`; at this point the target is known-good by
    /// construction, so there is no error channel.
    pub fn write_duty<H: UnitHardware>(&self, hw: &mut H, level: u8) {
        match *self {
            PwmChannel::Fast { pin } => hw.fast_pwm().set_duty(pin, level),
            PwmChannel::Slow { channel } => {
                let (irq, slow) = hw.slow_pwm();
                let _cs = CriticalGuard::new(irq);
                slow.set_duty(channel, u16::from(level) * SLOW_DUTY_SCALE);
            }
        }
    }

    /// Whether this channel is driven by the slow controller.
    pub fn is_slow(&self) -> bool {
        matches!(self, PwmChannel::Slow { .. })
    }
}
