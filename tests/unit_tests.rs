//! Integration tests for coordinator bring-up and dispatch.

use portmux::accel::{ACCEL_ADDR, INIT_SEQUENCE};
use portmux::framing::EchoComposer;
use portmux::hal::MockHardware;
use portmux::traits::INBOUND_PACKET_LEN;
use portmux::unit::ACTUATOR_PORT_COUNT;
use portmux::{PinMap, TimingConfig, UnitConfig, UnitCoordinator};

fn packet(mode: u8) -> [u8; INBOUND_PACKET_LEN] {
    let mut p = [0u8; INBOUND_PACKET_LEN];
    p[0] = 0xAA;
    p[INBOUND_PACKET_LEN - 2] = mode;
    p[INBOUND_PACKET_LEN - 1] = 0x55;
    p
}

fn unit(hw: MockHardware) -> UnitCoordinator<MockHardware, EchoComposer> {
    UnitCoordinator::new(hw, UnitConfig::default(), EchoComposer)
}

#[test]
fn init_starts_the_slow_controller_before_the_ports() {
    let mut unit = unit(MockHardware::new());
    unit.init().unwrap();

    let hw = unit.hw();
    assert!(hw.slow.begun);
    assert_eq!(hw.slow.frequency, Some(1000));

    // Three accelerometer-bearing ports, full register sequence each.
    assert_eq!(
        hw.bus.writes_to(ACCEL_ADDR).len(),
        INIT_SEQUENCE.len() * ACTUATOR_PORT_COUNT
    );
    assert_eq!(hw.delay.delays, vec![5, 5, 5]);
    assert!(hw.irq.balanced());
}

#[test]
fn init_honors_configured_timing() {
    let config = UnitConfig::default().with_timing(
        TimingConfig::default()
            .with_spwm_freq_hz(1600)
            .with_settle_delay_ms(12),
    );
    let mut unit = UnitCoordinator::new(MockHardware::new(), config, EchoComposer);
    unit.init().unwrap();

    assert_eq!(unit.hw().slow.frequency, Some(1600));
    assert_eq!(unit.hw().delay.delays, vec![12, 12, 12]);
}

#[test]
fn init_answers_every_drained_packet() {
    let mut hw = MockHardware::new();
    hw.transport.queue_inbound(packet(0x01));
    hw.transport.queue_inbound(packet(0x02));

    let mut unit = unit(hw);
    unit.init().unwrap();

    assert_eq!(unit.hw().transport.pending(), 0);
    assert_eq!(unit.hw().transport.sent.len(), 2);
    assert_eq!(unit.hw().transport.sent[0][1], 0x01);
    assert_eq!(unit.hw().transport.sent[1][1], 0x02);
}

#[test]
fn init_drain_is_bounded_on_a_never_empty_transport() {
    let mut hw = MockHardware::new();
    hw.transport.always_full = Some(packet(0x00));

    let mut unit = unit(hw);
    unit.init().unwrap();
    assert_eq!(unit.hw().transport.sent.len(), 100);
}

#[test]
fn poll_round_trips_one_packet_at_a_time() {
    let mut unit = unit(MockHardware::new());
    unit.init().unwrap();

    unit.hw_mut().transport.queue_inbound(packet(0x07));
    unit.hw_mut().transport.queue_inbound(packet(0x08));

    assert!(unit.poll());
    assert_eq!(unit.hw().transport.sent.len(), 1);
    assert!(unit.poll());
    assert!(!unit.poll());
    assert_eq!(unit.hw().transport.sent.len(), 2);
    assert_eq!(unit.hw().transport.sent[1][1], 0x08);
}

#[test]
fn actuator_dispatch_reaches_the_right_channels() {
    let pinmap = PinMap::default();
    let mut unit = unit(MockHardware::new());
    unit.init().unwrap();

    // Port 0 is fast-capable: actuators sit on its first slow channels.
    unit.set_actuator_level(0, 0, 255);
    assert_eq!(
        unit.hw().slow.last_duty(pinmap.slow_pwm[0][0]),
        Some(4080)
    );

    // Port 2 is slow-only: actuators sit on its upper slow channels.
    unit.set_actuator_level(2, 0, 128);
    assert_eq!(
        unit.hw().slow.last_duty(pinmap.slow_pwm[2][2]),
        Some(2048)
    );

    unit.set_indicator_level(0, 0, 99);
    assert_eq!(unit.hw().fast.last_duty(pinmap.fast_pwm[0][0]), Some(99));
}

#[test]
fn light_dispatch_follows_the_port_tier() {
    let pinmap = PinMap::default();
    let mut unit = unit(MockHardware::new());
    unit.init().unwrap();

    // Light 0 maps to port 3 (fast-capable), light 2 to port 5 (slow-only).
    unit.set_light_level(0, 77);
    assert_eq!(unit.hw().fast.last_duty(pinmap.fast_pwm[3][0]), Some(77));

    unit.set_light_level(2, 255);
    assert_eq!(
        unit.hw().slow.last_duty(pinmap.slow_pwm[5][0]),
        Some(4080)
    );
}

#[test]
fn analog_dispatch_samples_the_mapped_pins() {
    let pinmap = PinMap::default();
    let mut hw = MockHardware::new();
    hw.analog.set_value(pinmap.analog[0][1], 612);
    hw.analog.set_value(pinmap.analog[3][0], 48);

    let mut unit = unit(hw);
    unit.init().unwrap();

    assert_eq!(unit.read_port_analog(0, 1), 612);
    assert_eq!(unit.read_light_analog(0), 48);
}

#[test]
fn acceleration_dispatch_reads_through_the_mux() {
    let mut hw = MockHardware::new();
    hw.bus.load_vector(&[0x01, 0x00, 0x02, 0x00, 0x03, 0x00]);

    let mut unit = unit(hw);
    unit.init().unwrap();

    let reading = unit.read_port_acceleration(1).unwrap();
    assert_eq!((reading.x, reading.y, reading.z), (1, 2, 3));
    assert_eq!(unit.hw().select.current_code(), 1);
}
