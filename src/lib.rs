//! # portmux
//!
//! Firmware core for a multi-port interface unit: six device ports share
//! one I2C bus through a GPIO-driven mux, each port bundling accelerometer,
//! analog inputs, and a mix of fast on-chip PWM and slow external PWM
//! outputs. A fixed-size packet link connects the unit to its host.
//!
//! ## Architecture
//!
//! The crate is built around trait-based hardware abstraction:
//!
//! - [`traits`]: hardware and transport capability traits
//! - [`hal`]: concrete implementations (mock for desktop, ESP32 behind the
//!   `esp32` feature)
//! - [`critical`]: scoped interrupt masking
//! - [`pins`]: the board's pin and resource tables
//! - [`bus`]: mux target selection on the shared I2C bus
//! - [`pwm`]: the two-tier PWM output channel
//! - [`accel`]: accelerometer register map and sample decoding
//! - [`port`]: per-port pin bundles and bus transactions
//! - [`framing`]: host packet framing and the link state machine
//! - [`unit`]: the coordinator owning hardware, ports, and link
//! - [`config`]: construction-time configuration
//!
//! ## Quick start
//!
//! ```rust
//! use portmux::{framing::EchoComposer, hal::MockHardware, UnitConfig, UnitCoordinator};
//!
//! let hw = MockHardware::new();
//! let mut unit = UnitCoordinator::new(hw, UnitConfig::default(), EchoComposer);
//! unit.init().unwrap();
//!
//! unit.set_actuator_level(0, 0, 128);
//! let pressure = unit.read_port_analog(0, 0);
//! # let _ = pressure;
//! ```

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]

extern crate alloc;

pub mod accel;
pub mod bus;
pub mod config;
pub mod critical;
pub mod framing;
pub mod hal;
pub mod pins;
pub mod port;
pub mod pwm;
pub mod traits;
pub mod unit;

pub use accel::AccelReading;
pub use config::{DeviceConfig, TimingConfig, UnitConfig};
pub use critical::CriticalGuard;
pub use framing::{CommandHeader, EchoComposer, HostLink, LinkState, ReplyComposer};
pub use pins::{PinMap, PORT_COUNT};
pub use port::{ActuatorPort, DevicePort, IndicatorPort, PortCore, Tier};
pub use pwm::PwmChannel;
pub use unit::UnitCoordinator;
