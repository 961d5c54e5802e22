//! Host command framing.
//!
//! The host speaks fixed-size packets: 64 bytes in, 10 bytes out. This
//! layer owns the byte-level frame — front signature at byte 0, mode byte
//! at `N-2`, trailer signature at `N-1` — and the one-in/one-out discipline:
//! every successfully received packet produces exactly one reply, and no
//! reply is ever sent unprompted.
//!
//! What goes *into* the reply is not this layer's business; a
//! [`ReplyComposer`] owns payload semantics. The state machine is two
//! states, [`Idle`](LinkState::Idle) and [`Processing`](LinkState::Processing),
//! and `try_receive` is the single non-blocking polling point of the main
//! loop.

use crate::critical::CriticalGuard;
use crate::traits::{PacketTransport, UnitHardware, INBOUND_PACKET_LEN, REPLY_PACKET_LEN};

/// The framing fields extracted from one inbound packet.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct CommandHeader {
    /// Byte 0 of the packet.
    pub front_signature: u8,
    /// Byte `N-1` of the packet.
    pub trailer_signature: u8,
    /// Byte `N-2`: the mode/setting byte selecting the reply variant.
    pub mode: u8,
}

impl CommandHeader {
    /// Extract the header fields from a raw inbound packet.
    pub fn parse(packet: &[u8; INBOUND_PACKET_LEN]) -> Self {
        Self {
            front_signature: packet[0],
            trailer_signature: packet[INBOUND_PACKET_LEN - 1],
            mode: packet[INBOUND_PACKET_LEN - 2],
        }
    }
}

/// Host link state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LinkState {
    /// No inbound packet pending.
    #[default]
    Idle,
    /// One inbound packet is being decoded and replied to.
    Processing,
}

/// Composes the reply packet for one inbound command.
///
/// Implementations own the payload semantics the framing layer excludes:
/// they see the parsed header plus the raw payload bytes `[1..N-2]` and
/// fill the 10-byte reply in place. Composition runs outside any critical
/// section.
pub trait ReplyComposer {
    /// Fill `reply` for the given inbound header and payload.
    fn compose(
        &mut self,
        header: &CommandHeader,
        payload: &[u8],
        reply: &mut [u8; REPLY_PACKET_LEN],
    );
}

/// Loopback composer: echoes the framing fields back to the host.
///
/// Byte 0 carries the front signature, byte 1 the mode byte, the last byte
/// the trailer signature. Useful for link bring-up and tests.
#[derive(Clone, Copy, Debug, Default)]
pub struct EchoComposer;

impl ReplyComposer for EchoComposer {
    fn compose(
        &mut self,
        header: &CommandHeader,
        _payload: &[u8],
        reply: &mut [u8; REPLY_PACKET_LEN],
    ) {
        reply[0] = header.front_signature;
        reply[1] = header.mode;
        reply[REPLY_PACKET_LEN - 1] = header.trailer_signature;
    }
}

/// The host link: inbound packet buffer plus the framing state machine.
///
/// Buffers are pre-allocated and fixed-size; nothing here allocates in
/// steady state.
#[derive(Debug)]
pub struct HostLink {
    state: LinkState,
    recv_buf: [u8; INBOUND_PACKET_LEN],
}

impl Default for HostLink {
    fn default() -> Self {
        Self::new()
    }
}

impl HostLink {
    /// Create an idle link.
    pub fn new() -> Self {
        Self {
            state: LinkState::Idle,
            recv_buf: [0u8; INBOUND_PACKET_LEN],
        }
    }

    /// Current state machine position.
    pub fn state(&self) -> LinkState {
        self.state
    }

    /// Poll the transport for one inbound packet.
    ///
    /// Returns `false` immediately when nothing is pending. On receipt:
    /// parse the header, hand header and payload to the composer, transmit
    /// the reply, and return `true`. Transport receive and send each run in
    /// their own critical section; composition runs between them with
    /// interrupts enabled.
    pub fn try_receive<H: UnitHardware, C: ReplyComposer>(
        &mut self,
        hw: &mut H,
        composer: &mut C,
    ) -> bool {
        let received = {
            let (irq, transport) = hw.host_link();
            let _cs = CriticalGuard::new(irq);
            transport.try_recv(&mut self.recv_buf)
        };
        if received == 0 {
            return false;
        }

        self.state = LinkState::Processing;
        let header = CommandHeader::parse(&self.recv_buf);
        let payload = &self.recv_buf[1..INBOUND_PACKET_LEN - 2];

        let mut reply = [0u8; REPLY_PACKET_LEN];
        composer.compose(&header, payload, &mut reply);

        {
            let (irq, transport) = hw.host_link();
            let _cs = CriticalGuard::new(irq);
            transport.send(&reply);
        }
        self.state = LinkState::Idle;
        true
    }
}
