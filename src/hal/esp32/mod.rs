//! ESP32 hardware abstraction layer for the interface unit.
//!
//! This module provides hardware implementations for an ESP32 board driving
//! the unit's shared peripherals: LEDC fast PWM, a PCA9685 slow PWM
//! controller, the multiplexed sensor I2C bus with its GPIO select lines,
//! analog sampling, and a UART packet link to the host.
//!
//! # Hardware Configuration
//!
//! - **MCU**: ESP32 (dual-core Xtensa, 4MB Flash)
//! - **Slow PWM**: PCA9685 16-channel 12-bit PWM driver (I2C)
//! - **Accelerometers**: one 3-axis accelerometer per port behind the mux
//! - **Host link**: UART, fixed 64-byte command / 10-byte reply packets
//!
//! # Pin Assignments
//!
//! Per-port pin tables live in [`crate::pins::PinMap`]; the [`pins`] module
//! here carries only the board-level assignments (I2C, UART).

mod analog;
mod bus;
mod delay;
mod irq;
mod pwm;
mod transport;

pub use analog::Esp32Analog;
pub use bus::{Esp32Bus, Esp32SelectLines};
pub use delay::Esp32Delay;
pub use irq::Esp32Irq;
pub use pwm::{Esp32FastPwm, Esp32SlowPwm};
pub use transport::Esp32Transport;

use crate::traits::UnitHardware;

/// Board-level pin assignments.
///
/// Per-port resources (fast PWM pins, slow PWM channels, analog pins, mux
/// select codes) come from [`crate::pins::PinMap`]; these constants cover
/// the shared buses only.
pub mod pins {
    // =========================================================================
    // Shared sensor I2C bus
    // =========================================================================

    /// I2C data line for the multiplexed sensor bus
    pub const SENSOR_SDA: i32 = 21;

    /// I2C clock line for the multiplexed sensor bus
    pub const SENSOR_SCL: i32 = 22;

    // =========================================================================
    // Slow PWM controller (PCA9685)
    // =========================================================================

    /// Default I2C address of the PCA9685
    pub const PCA9685_ADDR: u8 = 0x40;

    // =========================================================================
    // Host UART
    // =========================================================================

    /// UART TX to the host
    pub const HOST_TX: i32 = 17;

    /// UART RX from the host
    pub const HOST_RX: i32 = 16;
}

/// The complete ESP32 peripheral bundle.
///
/// Construct each piece from the board's peripherals, then hand the bundle
/// to [`UnitCoordinator::new`](crate::UnitCoordinator::new).
///
/// # Example
///
/// ```ignore
/// use portmux::hal::esp32::*;
/// use portmux::{UnitConfig, UnitCoordinator};
/// use portmux::framing::EchoComposer;
///
/// let hw = Esp32Hardware {
///     fast,
///     slow,
///     analog,
///     select,
///     bus,
///     irq: Esp32Irq::new(),
///     transport,
///     delay: Esp32Delay::new(),
/// };
/// let mut unit = UnitCoordinator::new(hw, UnitConfig::default(), EchoComposer);
/// unit.init()?;
/// loop {
///     unit.poll();
/// }
/// ```
pub struct Esp32Hardware<'d> {
    /// LEDC fast PWM channels
    pub fast: Esp32FastPwm<'d>,
    /// PCA9685 slow PWM controller
    pub slow: Esp32SlowPwm<'d>,
    /// Analog sampling channels
    pub analog: Esp32Analog<'d>,
    /// Mux select line drivers
    pub select: Esp32SelectLines<'d>,
    /// Multiplexed sensor I2C bus
    pub bus: Esp32Bus<'d>,
    /// Interrupt controller
    pub irq: Esp32Irq,
    /// Host UART packet link
    pub transport: Esp32Transport<'d>,
    /// FreeRTOS delay source
    pub delay: Esp32Delay,
}

impl<'d> UnitHardware for Esp32Hardware<'d> {
    type Fast = Esp32FastPwm<'d>;
    type Slow = Esp32SlowPwm<'d>;
    type Analog = Esp32Analog<'d>;
    type Select = Esp32SelectLines<'d>;
    type Bus = Esp32Bus<'d>;
    type Irq = Esp32Irq;
    type Transport = Esp32Transport<'d>;
    type Delay = Esp32Delay;

    fn fast_pwm(&mut self) -> &mut Self::Fast {
        &mut self.fast
    }

    fn slow_pwm(&mut self) -> (&mut Self::Irq, &mut Self::Slow) {
        (&mut self.irq, &mut self.slow)
    }

    fn bus_session(&mut self) -> (&mut Self::Irq, &mut Self::Select, &mut Self::Bus) {
        (&mut self.irq, &mut self.select, &mut self.bus)
    }

    fn analog(&mut self) -> &mut Self::Analog {
        &mut self.analog
    }

    fn host_link(&mut self) -> (&mut Self::Irq, &mut Self::Transport) {
        (&mut self.irq, &mut self.transport)
    }

    fn delay(&mut self) -> &mut Self::Delay {
        &mut self.delay
    }
}
