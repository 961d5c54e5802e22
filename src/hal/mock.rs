//! Mock implementations for testing without hardware.
//!
//! Test doubles for every hardware trait, with public inspection fields so
//! tests can verify what reached the "hardware".
//!
//! | Mock | Trait | Purpose |
//! |------|-------|---------|
//! | [`MockFastPwm`] | [`FastPwm`] | Records per-pin duty writes |
//! | [`MockSlowPwm`] | [`SlowPwm`] | Records begin/frequency/duty writes |
//! | [`MockSelectLines`] | [`SelectLines`] | Tracks select line levels |
//! | [`MockBus`] | [`I2cBus`] | Scripted register device with failure injection |
//! | [`MockAnalog`] | [`AnalogReader`] | Per-pin scripted samples |
//! | [`MockIrq`] | [`InterruptControl`] | Mask/unmask balance tracking |
//! | [`MockTransport`] | [`PacketTransport`] | Queued inbound, captured replies |
//! | [`MockDelay`] | [`DelayMs`] | Records requested delays |
//!
//! [`MockHardware`] bundles them all behind [`UnitHardware`].
//!
//! # Example
//!
//! ```rust
//! use portmux::hal::MockHardware;
//! use portmux::{DevicePort, PinMap};
//!
//! let mut hw = MockHardware::new();
//! hw.bus.load_vector(&[0x34, 0x12, 0x78, 0x56, 0xAB, 0xCD]);
//!
//! let port = DevicePort::new(&PinMap::default(), 0);
//! let reading = port.read_acc_state(&mut hw).unwrap();
//! assert_eq!(reading.x, 0x1234);
//! assert!(hw.irq.balanced());
//! ```

use crate::bus::SELECT_LINE_COUNT;
use crate::traits::{
    AnalogReader, BusStop, DelayMs, FastPwm, I2cBus, InterruptControl, PacketTransport,
    SelectLines, SlowPwm, UnitHardware, INBOUND_PACKET_LEN, REPLY_PACKET_LEN,
};

use alloc::vec::Vec;

// ============================================================================
// PWM Mocks
// ============================================================================

/// Mock fast PWM peripheral; records every `(pin, level)` write.
#[derive(Debug, Default)]
pub struct MockFastPwm {
    /// All duty writes, in order.
    pub writes: Vec<(u8, u8)>,
}

impl MockFastPwm {
    /// Creates a mock with no recorded writes.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent duty written to `pin`, if any.
    pub fn last_duty(&self, pin: u8) -> Option<u8> {
        self.writes
            .iter()
            .rev()
            .find(|(p, _)| *p == pin)
            .map(|(_, level)| *level)
    }
}

impl FastPwm for MockFastPwm {
    fn set_duty(&mut self, pin: u8, level: u8) {
        self.writes.push((pin, level));
    }
}

/// Mock slow PWM controller; records lifecycle and duty writes.
#[derive(Debug, Default)]
pub struct MockSlowPwm {
    /// Whether `begin()` was called.
    pub begun: bool,
    /// The last programmed shared frequency.
    pub frequency: Option<u16>,
    /// All duty writes, in order.
    pub writes: Vec<(u8, u16)>,
}

impl MockSlowPwm {
    /// Creates an un-started mock controller.
    pub fn new() -> Self {
        Self::default()
    }

    /// The most recent duty written to `channel`, if any.
    pub fn last_duty(&self, channel: u8) -> Option<u16> {
        self.writes
            .iter()
            .rev()
            .find(|(c, _)| *c == channel)
            .map(|(_, duty)| *duty)
    }
}

impl SlowPwm for MockSlowPwm {
    fn begin(&mut self) {
        self.begun = true;
    }

    fn set_frequency(&mut self, freq_hz: u16) {
        self.frequency = Some(freq_hz);
    }

    fn set_duty(&mut self, channel: u8, duty: u16) {
        self.writes.push((channel, duty));
    }
}

// ============================================================================
// Bus Mocks
// ============================================================================

/// Mock select lines; tracks levels and every drive call.
#[derive(Debug, Default)]
pub struct MockSelectLines {
    /// Current level of each line.
    pub lines: [bool; SELECT_LINE_COUNT],
    /// Every `(line, high)` drive, in order.
    pub writes: Vec<(usize, bool)>,
}

impl MockSelectLines {
    /// Creates mock lines, all low.
    pub fn new() -> Self {
        Self::default()
    }

    /// The target code currently encoded on the lines.
    pub fn current_code(&self) -> u8 {
        self.lines
            .iter()
            .enumerate()
            .fold(0, |code, (i, &high)| code | (u8::from(high) << i))
    }
}

impl SelectLines for MockSelectLines {
    fn drive(&mut self, line: usize, high: bool) {
        self.lines[line] = high;
        self.writes.push((line, high));
    }
}

/// Error type of the mock bus.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MockBusError;

/// Mock I2C bus simulating a register-addressed device.
///
/// Two-byte committed writes are recorded as register writes, one-byte
/// writes as read-pointer updates. Read requests serve bytes previously
/// loaded with [`load_vector`](Self::load_vector) — load fewer than
/// requested to simulate a short transfer. `fail_writes` / `fail_reads`
/// inject bus timeouts.
#[derive(Debug, Default)]
pub struct MockBus {
    addr: u8,
    write_buf: Vec<u8>,
    pending: Vec<u8>,
    /// Committed register writes as `(device, register, value)`.
    pub register_writes: Vec<(u8, u8, u8)>,
    /// The last committed read-pointer register.
    pub pointer: Option<u8>,
    /// Bytes served on the next read request.
    pub read_data: Vec<u8>,
    /// Every committed transaction as `(device, stop_mode)`.
    pub transactions: Vec<(u8, BusStop)>,
    /// When set, `end()` fails with a timeout.
    pub fail_writes: bool,
    /// When set, `request_from()` fails with a timeout.
    pub fail_reads: bool,
}

impl MockBus {
    /// Creates an idle mock bus with no scripted data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the bytes the device produces on the next read request.
    pub fn load_vector(&mut self, bytes: &[u8]) {
        self.read_data = bytes.to_vec();
    }

    /// The committed register writes addressed to `device`.
    pub fn writes_to(&self, device: u8) -> Vec<(u8, u8)> {
        self.register_writes
            .iter()
            .filter(|(d, _, _)| *d == device)
            .map(|(_, reg, val)| (*reg, *val))
            .collect()
    }
}

impl I2cBus for MockBus {
    type Error = MockBusError;

    fn begin_write(&mut self, addr: u8) {
        self.addr = addr;
        self.write_buf.clear();
    }

    fn write(&mut self, byte: u8) {
        self.write_buf.push(byte);
    }

    fn end(&mut self, stop: BusStop) -> Result<(), MockBusError> {
        self.transactions.push((self.addr, stop));
        if self.fail_writes {
            return Err(MockBusError);
        }
        match self.write_buf.as_slice() {
            [pointer] => self.pointer = Some(*pointer),
            [reg, val] => self.register_writes.push((self.addr, *reg, *val)),
            _ => {}
        }
        self.write_buf.clear();
        Ok(())
    }

    fn request_from(&mut self, _addr: u8, len: usize) -> Result<usize, MockBusError> {
        if self.fail_reads {
            return Err(MockBusError);
        }
        let n = len.min(self.read_data.len());
        self.pending = self.read_data.drain(..n).collect();
        Ok(n)
    }

    fn read_byte(&mut self) -> Option<u8> {
        if self.pending.is_empty() {
            None
        } else {
            Some(self.pending.remove(0))
        }
    }
}

// ============================================================================
// Input / Interrupt / Delay Mocks
// ============================================================================

/// Mock analog reader with per-pin scripted samples.
#[derive(Debug, Default)]
pub struct MockAnalog {
    values: Vec<(u8, u16)>,
    /// Every pin read, in order.
    pub reads: Vec<u8>,
}

impl MockAnalog {
    /// Creates a reader where every pin samples as `0`.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script the sample returned for `pin`.
    pub fn set_value(&mut self, pin: u8, value: u16) {
        if let Some(entry) = self.values.iter_mut().find(|(p, _)| *p == pin) {
            entry.1 = value;
        } else {
            self.values.push((pin, value));
        }
    }
}

impl AnalogReader for MockAnalog {
    fn read(&mut self, pin: u8) -> u16 {
        self.reads.push(pin);
        self.values
            .iter()
            .find(|(p, _)| *p == pin)
            .map(|(_, v)| *v)
            .unwrap_or(0)
    }
}

/// Mock interrupt controller tracking mask/unmask balance.
#[derive(Debug, Default)]
pub struct MockIrq {
    /// Current nesting depth (masks minus unmasks).
    pub depth: i32,
    /// Highest nesting depth observed.
    pub max_depth: i32,
    /// Total mask calls — the number of critical sections entered.
    pub sections: u32,
    /// Total unmask calls.
    pub unmasks: u32,
}

impl MockIrq {
    /// Creates a controller with interrupts "enabled".
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether every mask was matched by an unmask and none went negative.
    pub fn balanced(&self) -> bool {
        self.depth == 0 && self.sections == self.unmasks
    }
}

impl InterruptControl for MockIrq {
    fn mask(&mut self) {
        self.depth += 1;
        self.max_depth = self.max_depth.max(self.depth);
        self.sections += 1;
    }

    fn unmask(&mut self) {
        self.depth -= 1;
        self.unmasks += 1;
    }
}

/// Mock delay source; records every requested delay.
#[derive(Debug, Default)]
pub struct MockDelay {
    /// Requested delays in ms, in order.
    pub delays: Vec<u32>,
}

impl MockDelay {
    /// Creates a delay source with no recorded delays.
    pub fn new() -> Self {
        Self::default()
    }

    /// Total milliseconds "slept".
    pub fn total_ms(&self) -> u64 {
        self.delays.iter().map(|&ms| u64::from(ms)).sum()
    }
}

impl DelayMs for MockDelay {
    fn delay_ms(&mut self, ms: u32) {
        self.delays.push(ms);
    }
}

// ============================================================================
// Transport Mock
// ============================================================================

/// Mock packet transport with a queued inbound side and captured replies.
///
/// Set [`always_full`](Self::always_full) to simulate a transport that
/// never reports empty (drain-bound testing): every poll then yields the
/// same packet regardless of the queue.
#[derive(Debug, Default)]
pub struct MockTransport {
    inbound: Vec<[u8; INBOUND_PACKET_LEN]>,
    /// Every transmitted reply, in order.
    pub sent: Vec<[u8; REPLY_PACKET_LEN]>,
    /// When set, every poll receives this packet.
    pub always_full: Option<[u8; INBOUND_PACKET_LEN]>,
    /// Number of `try_recv` polls.
    pub polls: u32,
}

impl MockTransport {
    /// Creates an empty transport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue one inbound packet.
    pub fn queue_inbound(&mut self, packet: [u8; INBOUND_PACKET_LEN]) {
        self.inbound.push(packet);
    }

    /// Number of queued packets not yet received.
    pub fn pending(&self) -> usize {
        self.inbound.len()
    }
}

impl PacketTransport for MockTransport {
    fn try_recv(&mut self, buf: &mut [u8; INBOUND_PACKET_LEN]) -> usize {
        self.polls += 1;
        if let Some(packet) = self.always_full {
            *buf = packet;
            return INBOUND_PACKET_LEN;
        }
        if self.inbound.is_empty() {
            0
        } else {
            *buf = self.inbound.remove(0);
            INBOUND_PACKET_LEN
        }
    }

    fn send(&mut self, packet: &[u8; REPLY_PACKET_LEN]) {
        self.sent.push(*packet);
    }
}

// ============================================================================
// Bundle
// ============================================================================

/// All mocks bundled behind [`UnitHardware`].
#[derive(Debug, Default)]
pub struct MockHardware {
    /// Fast PWM peripheral.
    pub fast: MockFastPwm,
    /// Slow PWM controller.
    pub slow: MockSlowPwm,
    /// Multiplexer select lines.
    pub select: MockSelectLines,
    /// Shared I2C bus.
    pub bus: MockBus,
    /// Analog sampling.
    pub analog: MockAnalog,
    /// Interrupt controller.
    pub irq: MockIrq,
    /// Host packet transport.
    pub transport: MockTransport,
    /// Delay source.
    pub delay: MockDelay,
}

impl MockHardware {
    /// Creates a fully mocked hardware bundle.
    pub fn new() -> Self {
        Self::default()
    }
}

impl UnitHardware for MockHardware {
    type Fast = MockFastPwm;
    type Slow = MockSlowPwm;
    type Analog = MockAnalog;
    type Select = MockSelectLines;
    type Bus = MockBus;
    type Irq = MockIrq;
    type Transport = MockTransport;
    type Delay = MockDelay;

    fn fast_pwm(&mut self) -> &mut MockFastPwm {
        &mut self.fast
    }

    fn slow_pwm(&mut self) -> (&mut MockIrq, &mut MockSlowPwm) {
        (&mut self.irq, &mut self.slow)
    }

    fn bus_session(&mut self) -> (&mut MockIrq, &mut MockSelectLines, &mut MockBus) {
        (&mut self.irq, &mut self.select, &mut self.bus)
    }

    fn analog(&mut self) -> &mut MockAnalog {
        &mut self.analog
    }

    fn host_link(&mut self) -> (&mut MockIrq, &mut MockTransport) {
        (&mut self.irq, &mut self.transport)
    }

    fn delay(&mut self) -> &mut MockDelay {
        &mut self.delay
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn mock_fast_pwm_tracks_last_duty_per_pin() {
        let mut pwm = MockFastPwm::new();
        pwm.set_duty(3, 10);
        pwm.set_duty(4, 20);
        pwm.set_duty(3, 30);
        assert_eq!(pwm.last_duty(3), Some(30));
        assert_eq!(pwm.last_duty(4), Some(20));
        assert_eq!(pwm.last_duty(9), None);
    }

    #[test]
    fn mock_slow_pwm_records_lifecycle() {
        let mut pwm = MockSlowPwm::new();
        assert!(!pwm.begun);
        pwm.begin();
        pwm.set_frequency(1000);
        pwm.set_duty(7, 4080);
        assert!(pwm.begun);
        assert_eq!(pwm.frequency, Some(1000));
        assert_eq!(pwm.last_duty(7), Some(4080));
    }

    #[test]
    fn mock_select_lines_encode_current_code() {
        let mut lines = MockSelectLines::new();
        lines.drive(0, true);
        lines.drive(2, true);
        assert_eq!(lines.current_code(), 0b101);
        assert_eq!(lines.writes.len(), 2);
    }

    #[test]
    fn mock_bus_records_register_writes() {
        let mut bus = MockBus::new();
        bus.begin_write(0x53);
        bus.write(0x2C);
        bus.write(0x0A);
        bus.end(BusStop::NoStop).unwrap();
        assert_eq!(bus.register_writes, vec![(0x53, 0x2C, 0x0A)]);
        assert_eq!(bus.transactions, vec![(0x53, BusStop::NoStop)]);
    }

    #[test]
    fn mock_bus_records_pointer_writes() {
        let mut bus = MockBus::new();
        bus.begin_write(0x53);
        bus.write(0x32);
        bus.end(BusStop::Stop).unwrap();
        assert_eq!(bus.pointer, Some(0x32));
        assert!(bus.register_writes.is_empty());
    }

    #[test]
    fn mock_bus_serves_scripted_reads() {
        let mut bus = MockBus::new();
        bus.load_vector(&[1, 2, 3]);
        assert_eq!(bus.request_from(0x53, 6), Ok(3));
        assert_eq!(bus.read_byte(), Some(1));
        assert_eq!(bus.read_byte(), Some(2));
        assert_eq!(bus.read_byte(), Some(3));
        assert_eq!(bus.read_byte(), None);
    }

    #[test]
    fn mock_bus_failure_injection() {
        let mut bus = MockBus::new();
        bus.fail_writes = true;
        bus.begin_write(0x53);
        bus.write(0x2C);
        assert_eq!(bus.end(BusStop::Stop), Err(MockBusError));

        bus.fail_reads = true;
        assert_eq!(bus.request_from(0x53, 6), Err(MockBusError));
    }

    #[test]
    fn mock_irq_balance() {
        let mut irq = MockIrq::new();
        irq.mask();
        assert!(!irq.balanced());
        irq.unmask();
        assert!(irq.balanced());
        assert_eq!(irq.sections, 1);
        assert_eq!(irq.max_depth, 1);
    }

    #[test]
    fn mock_analog_scripted_values() {
        let mut analog = MockAnalog::new();
        analog.set_value(14, 2048);
        analog.set_value(14, 1024);
        assert_eq!(analog.read(14), 1024);
        assert_eq!(analog.read(15), 0);
        assert_eq!(analog.reads, vec![14, 15]);
    }

    #[test]
    fn mock_transport_queue_and_capture() {
        let mut transport = MockTransport::new();
        let mut buf = [0u8; INBOUND_PACKET_LEN];
        assert_eq!(transport.try_recv(&mut buf), 0);

        let mut packet = [0u8; INBOUND_PACKET_LEN];
        packet[0] = 0xAA;
        transport.queue_inbound(packet);
        assert_eq!(transport.try_recv(&mut buf), INBOUND_PACKET_LEN);
        assert_eq!(buf[0], 0xAA);
        assert_eq!(transport.try_recv(&mut buf), 0);
        assert_eq!(transport.polls, 3);
    }

    #[test]
    fn mock_transport_always_full_never_drains() {
        let mut transport = MockTransport::new();
        transport.always_full = Some([0x11; INBOUND_PACKET_LEN]);
        let mut buf = [0u8; INBOUND_PACKET_LEN];
        for _ in 0..1000 {
            assert_eq!(transport.try_recv(&mut buf), INBOUND_PACKET_LEN);
        }
    }

    #[test]
    fn mock_delay_totals() {
        let mut delay = MockDelay::new();
        delay.delay_ms(5);
        delay.delay_ms(7);
        assert_eq!(delay.total_ms(), 12);
        assert_eq!(delay.delays, vec![5, 7]);
    }
}
