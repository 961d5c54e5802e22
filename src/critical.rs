//! Scoped interrupt masking.
//!
//! The select-line state, the bus transaction cursor, and the slow-PWM duty
//! registers are shared mutable state with no owning lock: atomicity against
//! ISRs comes from masking interrupts around every multi-step access.
//! [`CriticalGuard`] makes that bracketing structural — interrupts are
//! masked on construction and restored on drop, so every exit path out of a
//! bus or PWM sequence (including `?` early returns) releases the section.
//!
//! Sections must stay short: immediate hardware writes and bounded
//! hardware-protocol waits only, nothing open-ended.
//!
//! # Example
//!
//! ```rust
//! use portmux::critical::CriticalGuard;
//! use portmux::hal::MockIrq;
//! use portmux::traits::InterruptControl;
//!
//! let mut irq = MockIrq::new();
//! {
//!     let _cs = CriticalGuard::new(&mut irq);
//!     // bounded hardware work
//! }
//! assert!(irq.balanced());
//! ```

use crate::traits::InterruptControl;

/// RAII critical section: masks interrupts while alive.
///
/// Holding the guard mutably borrows the interrupt controller, so a second
/// guard cannot be constructed over the same controller while one is live.
#[must_use = "dropping the guard immediately re-enables interrupts"]
pub struct CriticalGuard<'a, I: InterruptControl> {
    irq: &'a mut I,
}

impl<'a, I: InterruptControl> CriticalGuard<'a, I> {
    /// Mask interrupts and enter the critical section.
    pub fn new(irq: &'a mut I) -> Self {
        irq.mask();
        Self { irq }
    }
}

impl<I: InterruptControl> Drop for CriticalGuard<'_, I> {
    fn drop(&mut self) {
        self.irq.unmask();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingIrq {
        masks: u32,
        unmasks: u32,
    }

    impl InterruptControl for CountingIrq {
        fn mask(&mut self) {
            self.masks += 1;
        }

        fn unmask(&mut self) {
            self.unmasks += 1;
        }
    }

    #[test]
    fn guard_masks_on_entry_and_unmasks_on_drop() {
        let mut irq = CountingIrq::default();
        {
            let _cs = CriticalGuard::new(&mut irq);
        }
        assert_eq!(irq.masks, 1);
        assert_eq!(irq.unmasks, 1);
    }

    #[test]
    fn guard_unmasks_on_early_return() {
        fn fallible(irq: &mut CountingIrq) -> Result<(), ()> {
            let _cs = CriticalGuard::new(irq);
            Err(())?;
            Ok(())
        }

        let mut irq = CountingIrq::default();
        assert!(fallible(&mut irq).is_err());
        assert_eq!(irq.masks, 1);
        assert_eq!(irq.unmasks, 1);
    }
}
