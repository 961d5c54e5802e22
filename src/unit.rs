//! The unit coordinator.
//!
//! One [`UnitCoordinator`] owns every process-wide singleton: the hardware
//! bundle, the host link, the reply composer, and the fixed port array —
//! three actuator-bearing ports on ids 0–2 and three single-light ports on
//! ids 3–5, matching the reference board. Ports are plain pin bundles; the
//! coordinator pairs them with the hardware for every dispatch, so there is
//! no ambient global state anywhere.
//!
//! # Bring-up
//!
//! [`init`](UnitCoordinator::init) runs once:
//!
//! 1. start the slow-PWM controller and program its shared frequency
//!    (inside a critical section),
//! 2. run the accelerometer configuration for every accelerometer-bearing
//!    port,
//! 3. drain stale inbound packets, bounded by the configured limit — each
//!    drained packet is answered like a live one, and if the transport
//!    never reports empty, init proceeds anyway after the bound.
//!
//! # Example
//!
//! ```rust
//! use portmux::{framing::EchoComposer, hal::MockHardware, UnitConfig, UnitCoordinator};
//!
//! let mut unit = UnitCoordinator::new(MockHardware::new(), UnitConfig::default(), EchoComposer);
//! unit.init().unwrap();
//! unit.set_actuator_level(0, 1, 128);
//! while unit.poll() {}
//! ```

use crate::accel::AccelReading;
use crate::config::UnitConfig;
use crate::critical::CriticalGuard;
use crate::framing::{HostLink, ReplyComposer};
use crate::port::{ActuatorPort, IndicatorPort};
use crate::traits::{BusError, SlowPwm, UnitHardware};

/// Number of actuator-bearing ports (logical ids 0–2).
pub const ACTUATOR_PORT_COUNT: usize = 3;

/// Number of single-light ports (logical ids 3–5).
pub const LIGHT_PORT_COUNT: usize = 3;

/// Owner of all unit singletons and the fixed port array.
pub struct UnitCoordinator<H: UnitHardware, C: ReplyComposer> {
    hw: H,
    config: UnitConfig,
    link: HostLink,
    composer: C,
    actuator_ports: [ActuatorPort; ACTUATOR_PORT_COUNT],
    light_ports: [IndicatorPort; LIGHT_PORT_COUNT],
}

impl<H: UnitHardware, C: ReplyComposer> UnitCoordinator<H, C> {
    /// Wire up a unit: derive every port's pin bundle from the config's pin
    /// map and take ownership of the hardware. No hardware is touched until
    /// [`init`](Self::init).
    pub fn new(hw: H, config: UnitConfig, composer: C) -> Self {
        let pinmap = &config.pinmap;
        let actuator_ports = [
            ActuatorPort::new(pinmap, 0),
            ActuatorPort::new(pinmap, 1),
            ActuatorPort::new(pinmap, 2),
        ];
        let light_ports = [
            IndicatorPort::new(pinmap, 3),
            IndicatorPort::new(pinmap, 4),
            IndicatorPort::new(pinmap, 5),
        ];
        Self {
            hw,
            config,
            link: HostLink::new(),
            composer,
            actuator_ports,
            light_ports,
        }
    }

    /// One-time bring-up. Must complete before any output write or sensor
    /// read is trusted.
    pub fn init(&mut self) -> Result<(), BusError<H>> {
        {
            let (irq, slow) = self.hw.slow_pwm();
            let _cs = CriticalGuard::new(irq);
            slow.begin();
            slow.set_frequency(self.config.timing.spwm_freq_hz);
        }

        for port in &self.actuator_ports {
            port.init(&mut self.hw, self.config.timing.settle_delay_ms)?;
        }

        // Clear any backlog the host queued before we came up. Bounded, so
        // a persistently non-empty transport cannot stall bring-up.
        let mut drained = 0;
        while drained < self.config.timing.drain_limit {
            if !self.link.try_receive(&mut self.hw, &mut self.composer) {
                break;
            }
            drained += 1;
        }
        Ok(())
    }

    /// One main-loop iteration of the host link: handle at most one inbound
    /// packet. Returns whether a packet was handled.
    pub fn poll(&mut self) -> bool {
        self.link.try_receive(&mut self.hw, &mut self.composer)
    }

    /// Write an actuator duty level on an actuator port. Out-of-range port
    /// or channel ids are a no-op.
    pub fn set_actuator_level(&mut self, port: usize, id: usize, level: u8) {
        if let Some(p) = self.actuator_ports.get(port) {
            p.set_actuator_level(&mut self.hw, id, level);
        }
    }

    /// Write an indicator duty level on an actuator port. Out-of-range port
    /// or channel ids are a no-op.
    pub fn set_indicator_level(&mut self, port: usize, id: usize, level: u8) {
        if let Some(p) = self.actuator_ports.get(port) {
            p.set_indicator_level(&mut self.hw, id, level);
        }
    }

    /// Write the duty level of a light port (index into ids 3–5).
    /// Out-of-range indices are a no-op.
    pub fn set_light_level(&mut self, light: usize, level: u8) {
        if let Some(p) = self.light_ports.get(light) {
            p.set_level(&mut self.hw, level);
        }
    }

    /// Sample an analog input on an actuator port; `0` sentinel on invalid
    /// indices.
    pub fn read_port_analog(&mut self, port: usize, id: usize) -> u16 {
        match self.actuator_ports.get(port) {
            Some(p) => p.read_analog_state(&mut self.hw, id),
            None => 0,
        }
    }

    /// Sample the analog input of a light port; `0` sentinel on an invalid
    /// index.
    pub fn read_light_analog(&mut self, light: usize) -> u16 {
        match self.light_ports.get(light) {
            Some(p) => p.read_analog_state(&mut self.hw),
            None => 0,
        }
    }

    /// Read one acceleration sample from an actuator port. `None` on an
    /// invalid index or a short transfer.
    pub fn read_port_acceleration(&mut self, port: usize) -> Option<AccelReading> {
        self.actuator_ports
            .get(port)?
            .read_acc_state(&mut self.hw)
    }

    /// The actuator-bearing ports, for inspection.
    pub fn actuator_ports(&self) -> &[ActuatorPort; ACTUATOR_PORT_COUNT] {
        &self.actuator_ports
    }

    /// The light ports, for inspection.
    pub fn light_ports(&self) -> &[IndicatorPort; LIGHT_PORT_COUNT] {
        &self.light_ports
    }

    /// The unit configuration.
    pub fn config(&self) -> &UnitConfig {
        &self.config
    }

    /// The hardware bundle.
    pub fn hw(&self) -> &H {
        &self.hw
    }

    /// Mutable access to the hardware bundle (tests, diagnostics).
    pub fn hw_mut(&mut self) -> &mut H {
        &mut self.hw
    }
}
