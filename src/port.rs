//! Logical ports and their shapes.
//!
//! A port binds a logical index to a tier-dependent bundle of physical
//! resources: PWM output channels, analog inputs, and a bus select code for
//! its accelerometer. The binding is computed exactly once at construction
//! from the unit's [`PinMap`] and never mutated afterwards; constructing
//! the same `(pinmap, port_id)` twice yields identical bundles.
//!
//! The shared plumbing — pin derivation, the interrupt-safe accelerometer
//! session, analog sampling — lives in [`PortCore`]. Three thin shapes
//! compose it:
//!
//! - [`DevicePort`]: four generic output channels.
//! - [`ActuatorPort`]: two indicator channels plus two actuator channels
//!   (actuators always run on the slow controller).
//! - [`IndicatorPort`]: a single output channel and one analog input, no
//!   accelerometer.
//!
//! All logical indices are validated at the shape boundary: out-of-range
//! writes are silent no-ops and out-of-range reads return the `0` sentinel,
//! so a malformed host command can never crash the control loop.

use crate::accel::{
    decode_vector, AccelReading, ACCEL_ADDR, INIT_SEQUENCE, MIN_VECTOR_BYTES, REG_DATA_START,
    VECTOR_LEN,
};
use crate::bus::select_target;
use crate::critical::CriticalGuard;
use crate::pins::{PinMap, ANALOG_PINS_PER_PORT};
use crate::pwm::PwmChannel;
use crate::traits::{AnalogReader, BusError, BusStop, DelayMs, I2cBus, UnitHardware};

/// Number of output channels on a [`DevicePort`].
pub const DEVICE_OUTPUT_COUNT: usize = 4;

/// Number of indicator (and actuator) channels on an [`ActuatorPort`].
pub const ACTUATOR_CHANNEL_COUNT: usize = 2;

/// A port's output capability tier, fixed per port id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Tier {
    /// The port has native fast PWM routing for its primary channels.
    FastCapable,
    /// All output channels run on the secondary slow controller.
    SlowOnly,
}

/// The resource bundle and bus session shared by every port shape.
///
/// Holds no hardware — just the derived pin data. Every operation takes the
/// unit's hardware bundle by `&mut`, so ports stay plain data and the
/// hardware singletons keep a single owner.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PortCore {
    port_id: u8,
    tier: Tier,
    analog_pins: [u8; ANALOG_PINS_PER_PORT],
    select_code: u8,
}

impl PortCore {
    /// Derive the core bundle for `port_id` from the pin map.
    ///
    /// `port_id` must be below [`PORT_COUNT`](crate::pins::PORT_COUNT);
    /// ports are constructed from build-time tables, so an out-of-range id
    /// is a wiring bug and panics at construction rather than producing a
    /// port aimed at nonexistent pins.
    pub fn new(pinmap: &PinMap, port_id: usize) -> Self {
        Self {
            port_id: port_id as u8,
            tier: pinmap.tier(port_id),
            analog_pins: pinmap.analog[port_id],
            select_code: pinmap.select_code[port_id],
        }
    }

    /// The logical port index.
    pub fn port_id(&self) -> u8 {
        self.port_id
    }

    /// The port's capability tier.
    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// The 3-bit multiplexer code addressing this port's accelerometer.
    pub fn select_code(&self) -> u8 {
        self.select_code
    }

    /// Run the accelerometer configuration sequence, then wait `settle_ms`
    /// for the part to settle. Must complete once before analog or
    /// acceleration reads are trusted.
    pub fn init_accel<H: UnitHardware>(
        &self,
        hw: &mut H,
        settle_ms: u32,
    ) -> Result<(), BusError<H>> {
        for (reg, val) in INIT_SEQUENCE {
            self.write_accel_register(hw, reg, val)?;
        }
        hw.delay().delay_ms(settle_ms);
        Ok(())
    }

    /// Write one accelerometer register: mask interrupts, select this
    /// port's bus target, then address/value in a held-open transaction.
    ///
    /// The no-stop commit keeps the bus claimed for the back-to-back writes
    /// of the init sequence. The critical section is released on every exit
    /// path, including the `?` on a bus timeout.
    pub fn write_accel_register<H: UnitHardware>(
        &self,
        hw: &mut H,
        reg: u8,
        val: u8,
    ) -> Result<(), BusError<H>> {
        let (irq, lines, bus) = hw.bus_session();
        let _cs = CriticalGuard::new(irq);
        select_target(lines, self.select_code);
        bus.begin_write(ACCEL_ADDR);
        bus.write(reg);
        bus.write(val);
        bus.end(BusStop::NoStop)?;
        Ok(())
    }

    /// One burst read transaction: set the read pointer, request six bytes,
    /// drain whatever arrives. Returns the byte count actually received
    /// alongside the buffer; bus errors and timeouts surface as a short
    /// count, not as a distinct failure.
    pub fn read_accel_vector<H: UnitHardware>(&self, hw: &mut H) -> (usize, [u8; VECTOR_LEN]) {
        let mut buf = [0u8; VECTOR_LEN];
        let (irq, lines, bus) = hw.bus_session();
        let _cs = CriticalGuard::new(irq);
        select_target(lines, self.select_code);

        bus.begin_write(ACCEL_ADDR);
        bus.write(REG_DATA_START);
        if bus.end(BusStop::Stop).is_err() {
            return (0, buf);
        }
        if bus.request_from(ACCEL_ADDR, VECTOR_LEN).is_err() {
            return (0, buf);
        }

        let mut count = 0;
        while count < VECTOR_LEN {
            match bus.read_byte() {
                Some(byte) => {
                    buf[count] = byte;
                    count += 1;
                }
                None => break,
            }
        }
        (count, buf)
    }

    /// Read and decode one acceleration sample.
    ///
    /// Returns `None` when fewer than [`MIN_VECTOR_BYTES`] arrived — the
    /// sample is stale/unusable and callers must not treat it as zeros.
    /// There is no automatic retry.
    pub fn read_acc_state<H: UnitHardware>(&self, hw: &mut H) -> Option<AccelReading> {
        let (count, buf) = self.read_accel_vector(hw);
        if count >= MIN_VECTOR_BYTES {
            Some(decode_vector(&buf))
        } else {
            None
        }
    }

    /// Sample one analog input, 16-bit widened.
    ///
    /// An out-of-range `id` returns the `0` sentinel — callers must not
    /// conflate it with a true zero reading.
    pub fn read_analog_state<H: UnitHardware>(&self, hw: &mut H, id: usize) -> u16 {
        match self.analog_pins.get(id) {
            Some(&pin) => hw.analog().read(pin),
            None => 0,
        }
    }
}

fn device_outputs(pinmap: &PinMap, port_id: usize, tier: Tier) -> [PwmChannel; DEVICE_OUTPUT_COUNT] {
    let slow = &pinmap.slow_pwm[port_id];
    match tier {
        Tier::SlowOnly => [
            PwmChannel::Slow { channel: slow[0] },
            PwmChannel::Slow { channel: slow[1] },
            PwmChannel::Slow { channel: slow[2] },
            PwmChannel::Slow { channel: slow[3] },
        ],
        Tier::FastCapable => {
            let fast = &pinmap.fast_pwm[port_id];
            [
                PwmChannel::Fast { pin: fast[0] },
                PwmChannel::Fast { pin: fast[1] },
                PwmChannel::Slow { channel: slow[0] },
                PwmChannel::Slow { channel: slow[1] },
            ]
        }
    }
}

/// Generic four-output port.
///
/// Slots 0–1 are the primary channels (native fast PWM where the tier
/// allows), slots 2–3 the secondary channels (always slow).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DevicePort {
    core: PortCore,
    outputs: [PwmChannel; DEVICE_OUTPUT_COUNT],
}

impl DevicePort {
    /// Derive a device port from the pin map. See [`PortCore::new`] for the
    /// `port_id` contract.
    pub fn new(pinmap: &PinMap, port_id: usize) -> Self {
        let core = PortCore::new(pinmap, port_id);
        let outputs = device_outputs(pinmap, port_id, core.tier());
        Self { core, outputs }
    }

    /// The shared core bundle.
    pub fn core(&self) -> &PortCore {
        &self.core
    }

    /// The resolved output channels, for inspection.
    pub fn outputs(&self) -> &[PwmChannel; DEVICE_OUTPUT_COUNT] {
        &self.outputs
    }

    /// Run the accelerometer init sequence for this port.
    pub fn init<H: UnitHardware>(&self, hw: &mut H, settle_ms: u32) -> Result<(), BusError<H>> {
        self.core.init_accel(hw, settle_ms)
    }

    /// Write a duty level to output `id`. Out-of-range ids are a no-op.
    pub fn set_output_level<H: UnitHardware>(&self, hw: &mut H, id: usize, level: u8) {
        if let Some(channel) = self.outputs.get(id) {
            channel.write_duty(hw, level);
        }
    }

    /// Sample analog input `id`; `0` sentinel on invalid id.
    pub fn read_analog_state<H: UnitHardware>(&self, hw: &mut H, id: usize) -> u16 {
        self.core.read_analog_state(hw, id)
    }

    /// Read one acceleration sample; `None` on a short transfer.
    pub fn read_acc_state<H: UnitHardware>(&self, hw: &mut H) -> Option<AccelReading> {
        self.core.read_acc_state(hw)
    }
}

/// Port shape with two indicator channels and two actuator channels.
///
/// Actuator channels always run on the slow controller regardless of tier;
/// only the indicators get fast routing on fast-capable ports.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ActuatorPort {
    core: PortCore,
    indicators: [PwmChannel; ACTUATOR_CHANNEL_COUNT],
    actuators: [PwmChannel; ACTUATOR_CHANNEL_COUNT],
}

impl ActuatorPort {
    /// Derive an actuator port from the pin map.
    pub fn new(pinmap: &PinMap, port_id: usize) -> Self {
        let core = PortCore::new(pinmap, port_id);
        let slow = &pinmap.slow_pwm[port_id];
        let (indicators, actuators) = match core.tier() {
            Tier::SlowOnly => (
                [
                    PwmChannel::Slow { channel: slow[0] },
                    PwmChannel::Slow { channel: slow[1] },
                ],
                [
                    PwmChannel::Slow { channel: slow[2] },
                    PwmChannel::Slow { channel: slow[3] },
                ],
            ),
            Tier::FastCapable => {
                let fast = &pinmap.fast_pwm[port_id];
                (
                    [
                        PwmChannel::Fast { pin: fast[0] },
                        PwmChannel::Fast { pin: fast[1] },
                    ],
                    [
                        PwmChannel::Slow { channel: slow[0] },
                        PwmChannel::Slow { channel: slow[1] },
                    ],
                )
            }
        };
        Self {
            core,
            indicators,
            actuators,
        }
    }

    /// The shared core bundle.
    pub fn core(&self) -> &PortCore {
        &self.core
    }

    /// The resolved indicator channels.
    pub fn indicators(&self) -> &[PwmChannel; ACTUATOR_CHANNEL_COUNT] {
        &self.indicators
    }

    /// The resolved actuator channels.
    pub fn actuators(&self) -> &[PwmChannel; ACTUATOR_CHANNEL_COUNT] {
        &self.actuators
    }

    /// Run the accelerometer init sequence for this port.
    pub fn init<H: UnitHardware>(&self, hw: &mut H, settle_ms: u32) -> Result<(), BusError<H>> {
        self.core.init_accel(hw, settle_ms)
    }

    /// Write a duty level to indicator `id`. Out-of-range ids are a no-op.
    pub fn set_indicator_level<H: UnitHardware>(&self, hw: &mut H, id: usize, level: u8) {
        if let Some(channel) = self.indicators.get(id) {
            channel.write_duty(hw, level);
        }
    }

    /// Write a duty level to actuator `id`. Out-of-range ids are a no-op.
    pub fn set_actuator_level<H: UnitHardware>(&self, hw: &mut H, id: usize, level: u8) {
        if let Some(channel) = self.actuators.get(id) {
            channel.write_duty(hw, level);
        }
    }

    /// Sample analog input `id`; `0` sentinel on invalid id.
    pub fn read_analog_state<H: UnitHardware>(&self, hw: &mut H, id: usize) -> u16 {
        self.core.read_analog_state(hw, id)
    }

    /// Read one acceleration sample; `None` on a short transfer.
    pub fn read_acc_state<H: UnitHardware>(&self, hw: &mut H) -> Option<AccelReading> {
        self.core.read_acc_state(hw)
    }
}

/// Single-output port: one indicator channel, one analog input, no
/// accelerometer.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IndicatorPort {
    port_id: u8,
    tier: Tier,
    channel: PwmChannel,
    analog_pin: u8,
}

impl IndicatorPort {
    /// Derive an indicator port from the pin map.
    pub fn new(pinmap: &PinMap, port_id: usize) -> Self {
        let tier = pinmap.tier(port_id);
        let channel = match tier {
            Tier::SlowOnly => PwmChannel::Slow {
                channel: pinmap.slow_pwm[port_id][0],
            },
            Tier::FastCapable => PwmChannel::Fast {
                pin: pinmap.fast_pwm[port_id][0],
            },
        };
        Self {
            port_id: port_id as u8,
            tier,
            channel,
            analog_pin: pinmap.analog[port_id][0],
        }
    }

    /// The logical port index.
    pub fn port_id(&self) -> u8 {
        self.port_id
    }

    /// The port's capability tier.
    pub fn tier(&self) -> Tier {
        self.tier
    }

    /// The resolved output channel.
    pub fn channel(&self) -> PwmChannel {
        self.channel
    }

    /// Write the duty level of the single output channel.
    pub fn set_level<H: UnitHardware>(&self, hw: &mut H, level: u8) {
        self.channel.write_duty(hw, level);
    }

    /// Sample the port's analog input.
    pub fn read_analog_state<H: UnitHardware>(&self, hw: &mut H) -> u16 {
        hw.analog().read(self.analog_pin)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pins::PORT_COUNT;

    #[test]
    fn derivation_is_deterministic() {
        let pinmap = PinMap::default();
        for id in 0..PORT_COUNT {
            assert_eq!(DevicePort::new(&pinmap, id), DevicePort::new(&pinmap, id));
            assert_eq!(
                ActuatorPort::new(&pinmap, id),
                ActuatorPort::new(&pinmap, id)
            );
            assert_eq!(
                IndicatorPort::new(&pinmap, id),
                IndicatorPort::new(&pinmap, id)
            );
        }
    }

    #[test]
    fn slow_only_device_port_routes_all_channels_slow() {
        let pinmap = PinMap::default();
        for id in [2, 5] {
            let port = DevicePort::new(&pinmap, id);
            assert_eq!(port.core().tier(), Tier::SlowOnly);
            assert!(port.outputs().iter().all(PwmChannel::is_slow));
        }
    }

    #[test]
    fn fast_capable_device_port_splits_tiers() {
        let pinmap = PinMap::default();
        for id in [0, 1, 3, 4] {
            let port = DevicePort::new(&pinmap, id);
            assert!(!port.outputs()[0].is_slow());
            assert!(!port.outputs()[1].is_slow());
            assert!(port.outputs()[2].is_slow());
            assert!(port.outputs()[3].is_slow());
        }
    }

    #[test]
    fn actuator_channels_are_always_slow() {
        let pinmap = PinMap::default();
        for id in 0..PORT_COUNT {
            let port = ActuatorPort::new(&pinmap, id);
            assert!(port.actuators().iter().all(PwmChannel::is_slow));
        }
    }

    #[test]
    fn actuator_indicators_follow_the_tier() {
        let pinmap = PinMap::default();
        let fast = ActuatorPort::new(&pinmap, 0);
        assert!(fast.indicators().iter().all(|c| !c.is_slow()));
        let slow = ActuatorPort::new(&pinmap, 2);
        assert!(slow.indicators().iter().all(PwmChannel::is_slow));
    }

    #[test]
    fn indicator_port_channel_follows_the_tier() {
        let pinmap = PinMap::default();
        assert_eq!(
            IndicatorPort::new(&pinmap, 3).channel(),
            PwmChannel::Fast {
                pin: pinmap.fast_pwm[3][0]
            }
        );
        assert_eq!(
            IndicatorPort::new(&pinmap, 5).channel(),
            PwmChannel::Slow {
                channel: pinmap.slow_pwm[5][0]
            }
        );
    }

    #[test]
    fn select_codes_match_the_pinmap() {
        let pinmap = PinMap::default();
        for id in 0..PORT_COUNT {
            let core = PortCore::new(&pinmap, id);
            assert_eq!(core.select_code(), pinmap.select_code[id]);
            assert_eq!(core.port_id(), id as u8);
        }
    }
}
