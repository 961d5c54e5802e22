//! Core traits for hardware abstraction and host transport.
//!
//! Everything the firmware core touches on the outside goes through a trait
//! defined here, so the same logic runs against the mock HAL on desktop and
//! against real peripherals on hardware.

mod hardware;
mod transport;

pub use hardware::{
    AnalogReader, BusStop, DelayMs, FastPwm, I2cBus, InterruptControl, SelectLines, SlowPwm,
    UnitHardware,
};
pub use transport::{PacketTransport, INBOUND_PACKET_LEN, REPLY_PACKET_LEN};

/// Shorthand for the bus error type of a [`UnitHardware`] implementation.
pub type BusError<H> = <<H as UnitHardware>::Bus as I2cBus>::Error;
