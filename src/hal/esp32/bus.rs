//! The multiplexed sensor I2C bus and its GPIO select lines.

use crate::bus::SELECT_LINE_COUNT;
use crate::traits::{BusStop, I2cBus, SelectLines};
use alloc::collections::VecDeque;
use alloc::vec;
use alloc::vec::Vec;
use esp_idf_hal::delay::TickType;
use esp_idf_hal::gpio::{AnyOutputPin, Output, PinDriver};
use esp_idf_hal::i2c::I2cDriver;
use esp_idf_hal::sys::EspError;

/// GPIO drivers for the mux select lines, indexed by table position.
pub struct Esp32SelectLines<'d> {
    lines: [PinDriver<'d, AnyOutputPin, Output>; SELECT_LINE_COUNT],
}

impl<'d> Esp32SelectLines<'d> {
    /// Wraps the three configured output pins, lowest-order line first.
    pub fn new(lines: [PinDriver<'d, AnyOutputPin, Output>; SELECT_LINE_COUNT]) -> Self {
        Self { lines }
    }
}

impl SelectLines for Esp32SelectLines<'_> {
    fn drive(&mut self, line: usize, high: bool) {
        if let Some(pin) = self.lines.get_mut(line) {
            let _ = if high { pin.set_high() } else { pin.set_low() };
        }
    }
}

/// The shared sensor bus, wrapped in the transactional write/read shape the
/// core expects.
///
/// Writes are buffered until [`end`](I2cBus::end) commits them in one
/// transfer; reads are fetched in one transfer and drained byte by byte.
/// Every transfer carries a bounded timeout, so a wedged device surfaces as
/// an `Err` or a short read rather than a hang.
///
/// ESP-IDF's master API issues a stop after every transfer, so
/// [`NoStop`](BusStop::NoStop) commits are accepted and transferred the
/// same way; the unit's devices tolerate this.
pub struct Esp32Bus<'d> {
    i2c: I2cDriver<'d>,
    addr: u8,
    write_buf: Vec<u8>,
    pending: VecDeque<u8>,
    timeout: u32,
}

impl<'d> Esp32Bus<'d> {
    /// Per-transfer timeout in milliseconds
    const TIMEOUT_MS: u64 = 20;

    /// Wraps a configured I2C driver for the sensor bus.
    pub fn new(i2c: I2cDriver<'d>) -> Self {
        Self {
            i2c,
            addr: 0,
            write_buf: Vec::new(),
            pending: VecDeque::new(),
            timeout: TickType::from(core::time::Duration::from_millis(Self::TIMEOUT_MS)).ticks(),
        }
    }
}

impl I2cBus for Esp32Bus<'_> {
    type Error = EspError;

    fn begin_write(&mut self, addr: u8) {
        self.addr = addr;
        self.write_buf.clear();
    }

    fn write(&mut self, byte: u8) {
        self.write_buf.push(byte);
    }

    fn end(&mut self, _stop: BusStop) -> Result<(), Self::Error> {
        let result = self.i2c.write(self.addr, &self.write_buf, self.timeout);
        self.write_buf.clear();
        result
    }

    fn request_from(&mut self, addr: u8, len: usize) -> Result<usize, Self::Error> {
        let mut buf = vec![0u8; len];
        self.i2c.read(addr, &mut buf, self.timeout)?;
        self.pending.clear();
        self.pending.extend(buf);
        Ok(len)
    }

    fn read_byte(&mut self) -> Option<u8> {
        self.pending.pop_front()
    }
}
