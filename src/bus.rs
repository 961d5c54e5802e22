//! Bus multiplexer selection.
//!
//! One I2C bus serves every port's accelerometer; a hardware multiplexer
//! routes it based on a 3-bit code on GPIO select lines. Selection is just
//! three pin writes, but the line state is shared by all ports: the caller
//! must hold a [`CriticalGuard`](crate::critical::CriticalGuard) across
//! select *and* the transaction that follows, otherwise a concurrent call
//! path could retarget the bus mid-transfer.

use crate::traits::SelectLines;

/// Number of multiplexer select lines.
pub const SELECT_LINE_COUNT: usize = 3;

/// Maximum number of addressable bus targets.
pub const MAX_BUS_TARGETS: usize = 1 << SELECT_LINE_COUNT;

/// Drive the select lines to route the bus to `code`.
///
/// Bits above the line count are ignored. Completes before returning; the
/// first transaction byte may be issued immediately after. Not
/// interrupt-safe on its own — call inside the critical section that wraps
/// the whole select-then-transact sequence.
pub fn select_target<L: SelectLines>(lines: &mut L, code: u8) {
    for line in 0..SELECT_LINE_COUNT {
        lines.drive(line, code & (1 << line) != 0);
    }
}
