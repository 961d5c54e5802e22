//! Interrupt masking over the ESP-IDF spinlock critical section.

use crate::traits::InterruptControl;
use esp_idf_hal::interrupt::{IsrCriticalSection, IsrCriticalSectionGuard};

static SECTION: IsrCriticalSection = IsrCriticalSection::new();

/// Interrupt controller backed by a process-wide ISR critical section.
///
/// [`mask`](InterruptControl::mask) enters the section (disabling
/// interrupts on the current core and taking the spinlock),
/// [`unmask`](InterruptControl::unmask) releases it. Redundant masks are
/// absorbed; the core never nests its guards.
pub struct Esp32Irq {
    guard: Option<IsrCriticalSectionGuard<'static>>,
}

impl Esp32Irq {
    /// Creates the controller with interrupts unmasked.
    pub fn new() -> Self {
        Self { guard: None }
    }
}

impl Default for Esp32Irq {
    fn default() -> Self {
        Self::new()
    }
}

impl InterruptControl for Esp32Irq {
    fn mask(&mut self) {
        if self.guard.is_none() {
            self.guard = Some(SECTION.enter());
        }
    }

    fn unmask(&mut self) {
        self.guard = None;
    }
}
