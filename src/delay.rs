use embedded_hal::delay::DelayNs;
use std::thread::sleep;
use std::time::Duration;

/// Blocking delay backed by `std::thread::sleep`, which never returns early.
#[derive(Debug, Default, Clone, Copy)]
pub struct StdDelay;

impl DelayNs for StdDelay {
    fn delay_ns(&mut self, ns: u32) {
        sleep(Duration::from_nanos(ns.into()));
    }

    fn delay_us(&mut self, us: u32) {
        sleep(Duration::from_micros(us.into()));
    }

    fn delay_ms(&mut self, ms: u32) {
        sleep(Duration::from_millis(ms.into()));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Instant;

    #[test]
    fn test_delay_ms_waits_at_least_requested() {
        let start = Instant::now();
        StdDelay.delay_ms(16);
        assert!(start.elapsed() >= Duration::from_millis(16));
    }
}
