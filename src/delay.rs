//! Blocking delay used for the latch wait after each frame.

use core::time::Duration;

use embedded_hal::delay::DelayNs;

/// [`DelayNs`] backed by [`std::thread::sleep`].
#[derive(Clone, Copy, Debug, Default)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        std::thread::sleep(Duration::from_nanos(u64::from(ns)));
    }

    fn delay_us(&mut self, us: u32) {
        std::thread::sleep(Duration::from_micros(u64::from(us)));
    }

    fn delay_ms(&mut self, ms: u32) {
        std::thread::sleep(Duration::from_millis(u64::from(ms)));
    }
}

/// Milliseconds a strip needs to latch a `len`-byte frame: about 1 ms per 100
/// bytes, never less than 1 ms.
#[must_use]
pub fn latch_ms(len: usize) -> u32 {
    let ms = len.div_ceil(100).max(1);
    u32::try_from(ms).unwrap_or(u32::MAX)
}
