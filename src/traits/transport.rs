//! Host-facing packet transport abstraction.
//!
//! The host channel is packetized: every inbound message is exactly
//! [`INBOUND_PACKET_LEN`] bytes, every reply exactly [`REPLY_PACKET_LEN`]
//! bytes. Framing on top of the raw link (USB HID report, UART accumulator,
//! ...) is the implementation's job; the core only ever sees whole packets.

/// Size of one inbound command packet in bytes.
pub const INBOUND_PACKET_LEN: usize = 64;

/// Size of one outbound reply packet in bytes.
pub const REPLY_PACKET_LEN: usize = 10;

/// Fixed-size packet transport to the host.
///
/// `try_recv` is the single polling point of the firmware's main loop and
/// must never block: if no complete packet is pending it returns `0`
/// immediately. Both methods are called from inside a critical section by
/// the framing layer, so implementations must not take unbounded time.
pub trait PacketTransport {
    /// Poll for one inbound packet. Copies it into `buf` and returns the
    /// byte count on receipt, or `0` if nothing is pending.
    fn try_recv(&mut self, buf: &mut [u8; INBOUND_PACKET_LEN]) -> usize;

    /// Transmit one reply packet.
    fn send(&mut self, packet: &[u8; REPLY_PACKET_LEN]);
}
