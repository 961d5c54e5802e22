//! Host packet transport over UART.

use crate::traits::{PacketTransport, INBOUND_PACKET_LEN, REPLY_PACKET_LEN};
use esp_idf_hal::delay::NON_BLOCK;
use esp_idf_hal::uart::UartDriver;

/// UART-backed packet link.
///
/// Inbound bytes accumulate in a fixed buffer until a full
/// [`INBOUND_PACKET_LEN`]-byte frame is present; partial frames stay
/// buffered across polls. Reads are non-blocking and replies go out as one
/// contiguous write.
pub struct Esp32Transport<'d> {
    uart: UartDriver<'d>,
    acc: [u8; INBOUND_PACKET_LEN],
    fill: usize,
}

impl<'d> Esp32Transport<'d> {
    /// Wraps a configured UART driver.
    pub fn new(uart: UartDriver<'d>) -> Self {
        Self {
            uart,
            acc: [0u8; INBOUND_PACKET_LEN],
            fill: 0,
        }
    }
}

impl PacketTransport for Esp32Transport<'_> {
    fn try_recv(&mut self, buf: &mut [u8; INBOUND_PACKET_LEN]) -> usize {
        if self.fill < INBOUND_PACKET_LEN {
            if let Ok(n) = self.uart.read(&mut self.acc[self.fill..], NON_BLOCK) {
                self.fill += n;
            }
        }
        if self.fill < INBOUND_PACKET_LEN {
            return 0;
        }
        buf.copy_from_slice(&self.acc);
        self.fill = 0;
        INBOUND_PACKET_LEN
    }

    fn send(&mut self, packet: &[u8; REPLY_PACKET_LEN]) {
        // TX queue full is the only failure mode here; the host treats a
        // missing reply like a dropped packet and re-polls.
        let _ = self.uart.write(packet);
    }
}
