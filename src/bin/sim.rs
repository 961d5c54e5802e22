//! Desktop simulation of one interface unit.
//!
//! Runs the full coordinator against the mock hardware: bring-up, a few
//! host packets through the link, actuator and light writes, and sensor
//! reads from scripted data. Useful for exercising the whole stack without
//! a board attached.
//!
//! # Run
//!
//! ```bash
//! cargo run --bin sim
//! ```

use portmux::framing::EchoComposer;
use portmux::hal::MockHardware;
use portmux::traits::{INBOUND_PACKET_LEN, REPLY_PACKET_LEN};
use portmux::{UnitConfig, UnitCoordinator};

fn command_packet(mode: u8) -> [u8; INBOUND_PACKET_LEN] {
    let mut p = [0u8; INBOUND_PACKET_LEN];
    p[0] = 0xAA;
    p[INBOUND_PACKET_LEN - 2] = mode;
    p[INBOUND_PACKET_LEN - 1] = 0x55;
    p
}

fn main() -> anyhow::Result<()> {
    println!();
    println!("================================");
    println!("  portmux unit simulator");
    println!("================================");
    println!();

    // =========================================================================
    // Hardware and bring-up
    // =========================================================================
    let mut hw = MockHardware::new();

    // Scripted sensor data: one accelerometer sample and two analog inputs.
    hw.bus.load_vector(&[0x34, 0x12, 0x78, 0x56, 0xAB, 0xCD]);
    hw.analog.set_value(14, 612);
    hw.analog.set_value(15, 48);

    // Two stale packets queued before bring-up; init drains and answers them.
    hw.transport.queue_inbound(command_packet(0x01));
    hw.transport.queue_inbound(command_packet(0x02));

    let config = UnitConfig::default();
    let mut unit = UnitCoordinator::new(hw, config, EchoComposer);
    unit.init()
        .map_err(|e| anyhow::anyhow!("bring-up failed: {e:?}"))?;
    println!(
        "[OK] {} initialized, drained {} stale replies",
        unit.config().device.name,
        unit.hw().transport.sent.len()
    );

    // =========================================================================
    // Outputs
    // =========================================================================
    unit.set_actuator_level(0, 0, 128); // port 0: fast tier
    unit.set_actuator_level(2, 0, 128); // port 2: slow-only tier
    unit.set_indicator_level(0, 1, 255);
    unit.set_light_level(0, 64);
    println!(
        "[OK] outputs written: {} fast duty writes, {} slow duty writes",
        unit.hw().fast.writes.len(),
        unit.hw().slow.writes.len()
    );

    // =========================================================================
    // Sensors
    // =========================================================================
    match unit.read_port_acceleration(0) {
        Some(acc) => println!("[OK] port 0 accel: x={} y={} z={}", acc.x, acc.y, acc.z),
        None => println!("[!!] port 0 accel: short transfer"),
    }
    println!(
        "[OK] port 0 analog: a0={} a1={}",
        unit.read_port_analog(0, 0),
        unit.read_port_analog(0, 1)
    );

    // =========================================================================
    // Host link
    // =========================================================================
    unit.hw_mut().transport.queue_inbound(command_packet(0x07));
    while unit.poll() {}
    if let Some(reply) = unit.hw().transport.sent.last() {
        let tail = REPLY_PACKET_LEN - 1;
        println!(
            "[OK] live reply: front={:#04X} mode={:#04X} trailer={:#04X}",
            reply[0], reply[1], reply[tail]
        );
    }

    println!();
    println!("simulation complete");
    Ok(())
}
