//! Integration tests for port bus sessions and output routing.

use portmux::accel::{ACCEL_ADDR, INIT_SEQUENCE, REG_DATA_START};
use portmux::hal::MockHardware;
use portmux::traits::BusStop;
use portmux::{ActuatorPort, DevicePort, PinMap};

fn port(id: usize) -> ActuatorPort {
    ActuatorPort::new(&PinMap::default(), id)
}

#[test]
fn init_writes_the_full_register_sequence_in_order() {
    let mut hw = MockHardware::new();
    port(0).init(&mut hw, 5).unwrap();

    assert_eq!(hw.bus.writes_to(ACCEL_ADDR), INIT_SEQUENCE.to_vec());
    assert_eq!(hw.delay.delays, vec![5]);

    // One held-open transaction per register write, one critical section each.
    assert!(hw
        .bus
        .transactions
        .iter()
        .all(|&(addr, stop)| addr == ACCEL_ADDR && stop == BusStop::NoStop));
    assert_eq!(hw.irq.sections as usize, INIT_SEQUENCE.len());
    assert!(hw.irq.balanced());
}

#[test]
fn accel_read_selects_the_ports_bus_target() {
    let mut hw = MockHardware::new();
    hw.bus.load_vector(&[0; 6]);
    port(1).read_acc_state(&mut hw);
    assert_eq!(hw.select.current_code(), 1);

    hw.bus.load_vector(&[0; 6]);
    port(2).read_acc_state(&mut hw);
    assert_eq!(hw.select.current_code(), 2);
}

#[test]
fn accel_read_sets_pointer_then_releases_the_bus() {
    let mut hw = MockHardware::new();
    hw.bus.load_vector(&[0; 6]);
    port(0).read_acc_state(&mut hw);

    assert_eq!(hw.bus.pointer, Some(REG_DATA_START));
    assert_eq!(hw.bus.transactions, vec![(ACCEL_ADDR, BusStop::Stop)]);
    assert!(hw.irq.balanced());
}

#[test]
fn accel_read_decodes_a_full_vector() {
    let mut hw = MockHardware::new();
    hw.bus.load_vector(&[0x34, 0x12, 0x78, 0x56, 0xAB, 0xCD]);

    let reading = port(0).read_acc_state(&mut hw).unwrap();
    assert_eq!(reading.x, 0x1234);
    assert_eq!(reading.y, 0x5678);
    assert_eq!(reading.z, 0xCDABu16 as i16);
}

#[test]
fn five_byte_transfer_is_accepted() {
    let mut hw = MockHardware::new();
    hw.bus.load_vector(&[0x34, 0x12, 0x78, 0x56, 0xAB]);

    let reading = port(0).read_acc_state(&mut hw).unwrap();
    assert_eq!(reading.x, 0x1234);
    assert_eq!(reading.y, 0x5678);
    // The missing high byte of z reads as zero.
    assert_eq!(reading.z, 0x00AB);
}

#[test]
fn four_byte_transfer_is_rejected() {
    let mut hw = MockHardware::new();
    hw.bus.load_vector(&[0x34, 0x12, 0x78, 0x56]);
    assert!(port(0).read_acc_state(&mut hw).is_none());
}

#[test]
fn actuator_duty_is_scaled_onto_the_slow_controller() {
    let pinmap = PinMap::default();
    let mut hw = MockHardware::new();
    let p = ActuatorPort::new(&pinmap, 0);

    p.set_actuator_level(&mut hw, 0, 255);
    p.set_actuator_level(&mut hw, 1, 1);
    assert_eq!(hw.slow.last_duty(pinmap.slow_pwm[0][0]), Some(4080));
    assert_eq!(hw.slow.last_duty(pinmap.slow_pwm[0][1]), Some(16));
}

#[test]
fn fast_indicator_duty_is_unscaled() {
    let pinmap = PinMap::default();
    let mut hw = MockHardware::new();

    ActuatorPort::new(&pinmap, 0).set_indicator_level(&mut hw, 0, 200);
    assert_eq!(hw.fast.last_duty(pinmap.fast_pwm[0][0]), Some(200));
    assert!(hw.slow.writes.is_empty());
}

#[test]
fn device_port_routes_primary_and_secondary_slots() {
    let pinmap = PinMap::default();
    let mut hw = MockHardware::new();
    let p = DevicePort::new(&pinmap, 0);

    p.set_output_level(&mut hw, 0, 100);
    p.set_output_level(&mut hw, 2, 100);
    assert_eq!(hw.fast.last_duty(pinmap.fast_pwm[0][0]), Some(100));
    assert_eq!(hw.slow.last_duty(pinmap.slow_pwm[0][0]), Some(1600));
}

#[test]
fn out_of_range_channel_ids_are_no_ops() {
    let mut hw = MockHardware::new();
    let p = port(0);

    p.set_actuator_level(&mut hw, 2, 255);
    p.set_indicator_level(&mut hw, 9, 255);
    assert!(hw.fast.writes.is_empty());
    assert!(hw.slow.writes.is_empty());

    assert_eq!(p.read_analog_state(&mut hw, 2), 0);
    assert!(hw.analog.reads.is_empty());
}
