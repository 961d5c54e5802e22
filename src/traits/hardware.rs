//! Hardware abstraction traits for the shared peripherals of a unit.
//!
//! A unit multiplexes several logical ports onto a small set of physical
//! resources. Each resource gets its own narrow trait:
//!
//! | Trait | Purpose |
//! |-------|---------|
//! | [`FastPwm`] | Native per-pin variable-duty PWM (8-bit duty) |
//! | [`SlowPwm`] | Secondary PWM controller: shared frequency, 12-bit per-channel duty |
//! | [`AnalogReader`] | Raw analog sampling, 16-bit widened |
//! | [`SelectLines`] | The bus multiplexer's GPIO select lines |
//! | [`I2cBus`] | Transactional access to the shared I2C bus |
//! | [`InterruptControl`] | Interrupt mask/unmask for critical sections |
//! | [`DelayMs`] | Bounded blocking delay |
//!
//! [`UnitHardware`] bundles them and hands out the *combinations* the core
//! needs (`irq + select lines + bus`, `irq + slow pwm`, ...) as disjoint
//! mutable borrows, so a critical-section guard can hold the interrupt
//! controller while the bus is driven.
//!
//! # Implementation
//!
//! For testing and desktop development, use the mocks from
//! [`crate::hal::mock`]. For ESP32 hardware, use the implementations from
//! `hal::esp32` (requires the `esp32` feature).

/// Native fast PWM peripheral, addressed by physical pin.
///
/// Duty is the raw 8-bit level; no scaling is applied at this layer.
/// There is no error channel: writes to pins that exist are infallible, and
/// pin validity is guaranteed by construction of the pin tables.
pub trait FastPwm {
    /// Set the duty level (0..=255) on a fast PWM pin.
    fn set_duty(&mut self, pin: u8, level: u8);
}

/// Secondary (slow) PWM controller with a shared frequency and a wider
/// per-channel duty register.
///
/// This models an external driver chip (PCA9685-class): one frequency for
/// all channels, 12-bit duty resolution. The duty registers are shared
/// mutable state across every port, so all calls must happen inside the
/// caller's critical section (see [`crate::critical::CriticalGuard`]).
pub trait SlowPwm {
    /// One-time controller start-up. Must be called before any duty write.
    fn begin(&mut self);

    /// Set the shared output frequency in Hz.
    fn set_frequency(&mut self, freq_hz: u16);

    /// Set the duty register (0..=4095) of one channel.
    fn set_duty(&mut self, channel: u8, duty: u16);
}

/// Raw analog input sampling.
pub trait AnalogReader {
    /// Read the instantaneous sample on an analog pin, widened to 16 bits.
    fn read(&mut self, pin: u8) -> u16;
}

/// The bus multiplexer's select lines.
///
/// Implementations drive one GPIO per line. Line indices are positions in
/// the unit's select-line table, not physical pin numbers.
pub trait SelectLines {
    /// Drive one select line high or low.
    fn drive(&mut self, line: usize, high: bool);
}

/// Whether an I2C transaction ends with a stop condition.
///
/// [`NoStop`](BusStop::NoStop) keeps the bus claimed for back-to-back
/// transactions to the same target, as used by the accelerometer
/// configuration writes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BusStop {
    /// Issue a stop condition; the bus is released.
    Stop,
    /// Hold the bus open after the transaction.
    NoStop,
}

/// Transactional access to the shared I2C bus.
///
/// The shape follows the classic wire protocol: open a write transaction,
/// queue bytes, commit with [`end`](I2cBus::end); or request a burst read
/// and drain it byte by byte. The transaction cursor is shared mutable
/// state, so every open-to-close sequence must run inside one critical
/// section.
///
/// # Timeout contract
///
/// Implementations must bound every transaction with a timeout. Expiry
/// surfaces as `Err` from [`end`](I2cBus::end) /
/// [`request_from`](I2cBus::request_from), or simply as fewer bytes
/// available than requested. Callers on the read path treat either outcome
/// as a short transfer, never as a distinct fatal condition.
pub trait I2cBus {
    /// Error type for bus transactions (timeouts, NAKs).
    type Error;

    /// Open a write transaction to a device address.
    fn begin_write(&mut self, addr: u8);

    /// Queue one byte into the open write transaction.
    fn write(&mut self, byte: u8);

    /// Commit the open write transaction.
    fn end(&mut self, stop: BusStop) -> Result<(), Self::Error>;

    /// Issue a burst read request; returns the number of bytes the device
    /// actually produced (may be short).
    fn request_from(&mut self, addr: u8, len: usize) -> Result<usize, Self::Error>;

    /// Take the next byte from the last read request, if one is available.
    fn read_byte(&mut self) -> Option<u8>;
}

/// Interrupt mask/unmask, the raw primitive under
/// [`CriticalGuard`](crate::critical::CriticalGuard).
///
/// Implementations must tolerate nesting if the platform requires it; the
/// core itself never nests guards. Prefer the guard over calling these
/// directly, so the unmask cannot be skipped on an early return.
pub trait InterruptControl {
    /// Mask interrupts.
    fn mask(&mut self);

    /// Restore interrupts.
    fn unmask(&mut self);
}

/// Bounded blocking delay.
///
/// The unit runs a single cooperative execution context, so delays are
/// plain busy-waits or timer spins; there are no suspension points.
pub trait DelayMs {
    /// Block for the given number of milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// The complete set of shared peripherals owned by one unit.
///
/// Ports never hold hardware themselves; they are plain pin bundles and
/// every operation takes `&mut impl UnitHardware`. The split accessors
/// return the disjoint pieces an operation needs so that the interrupt
/// controller can be borrowed by a guard while the other piece is driven:
///
/// ```rust
/// use portmux::traits::{I2cBus, UnitHardware};
/// use portmux::critical::CriticalGuard;
/// use portmux::hal::MockHardware;
///
/// let mut hw = MockHardware::new();
/// let (irq, _lines, bus) = hw.bus_session();
/// let _cs = CriticalGuard::new(irq);
/// bus.begin_write(0x53);
/// // ... guard drops here, interrupts restored
/// ```
pub trait UnitHardware {
    /// Native fast PWM peripheral.
    type Fast: FastPwm;
    /// Secondary slow PWM controller.
    type Slow: SlowPwm;
    /// Analog sampling peripheral.
    type Analog: AnalogReader;
    /// Bus multiplexer select lines.
    type Select: SelectLines;
    /// Shared I2C bus.
    type Bus: I2cBus;
    /// Interrupt controller.
    type Irq: InterruptControl;
    /// Host-facing packet transport.
    type Transport: super::PacketTransport;
    /// Delay source.
    type Delay: DelayMs;

    /// The fast PWM peripheral. Fast duty writes are single-register and
    /// need no critical section.
    fn fast_pwm(&mut self) -> &mut Self::Fast;

    /// Interrupt controller plus slow PWM controller, for bracketed duty
    /// writes.
    fn slow_pwm(&mut self) -> (&mut Self::Irq, &mut Self::Slow);

    /// Interrupt controller, select lines, and bus — everything one atomic
    /// select-then-transact sequence touches.
    fn bus_session(&mut self) -> (&mut Self::Irq, &mut Self::Select, &mut Self::Bus);

    /// The analog sampling peripheral.
    fn analog(&mut self) -> &mut Self::Analog;

    /// Interrupt controller plus host packet transport.
    fn host_link(&mut self) -> (&mut Self::Irq, &mut Self::Transport);

    /// The delay source.
    fn delay(&mut self) -> &mut Self::Delay;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bus_stop_copy_eq() {
        let stop = BusStop::Stop;
        let copied = stop;
        assert_eq!(stop, copied);
        assert_ne!(BusStop::Stop, BusStop::NoStop);
    }

    #[test]
    fn bus_stop_debug() {
        assert_eq!(format!("{:?}", BusStop::NoStop), "NoStop");
    }
}
