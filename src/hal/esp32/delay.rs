//! Blocking delay over FreeRTOS.

use crate::traits::DelayMs;
use esp_idf_hal::delay::FreeRtos;

/// Millisecond delay via `vTaskDelay`.
///
/// Yields the task for the duration, which is all the settle delays in the
/// bring-up path need.
pub struct Esp32Delay;

impl Esp32Delay {
    /// Creates a new delay source.
    #[inline]
    pub fn new() -> Self {
        Self
    }
}

impl Default for Esp32Delay {
    fn default() -> Self {
        Self::new()
    }
}

impl DelayMs for Esp32Delay {
    #[inline]
    fn delay_ms(&mut self, ms: u32) {
        FreeRtos::delay_ms(ms);
    }
}
