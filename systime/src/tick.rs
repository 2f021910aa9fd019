//! The millisecond tick counter.
//!
//! The counter is advanced exclusively from the periodic tick interrupt via
//! [`TickCounter::on_tick`]; everybody else reads it through [`TickCounter::now`].


use core::sync::atomic::{AtomicBool, AtomicU32, Ordering};


/// Elapsed milliseconds since startup.
///
/// Wraps to zero after 2<sup>32</sup> milliseconds (about 49.7 days).
pub type Millis = u32;


/// How many ticks pass between two toggles of the heartbeat output.
///
/// At the default tick rate of 1 kHz, this makes the heartbeat blink at 1 Hz (2 Hz toggle rate).
pub const HEARTBEAT_PERIOD_MS: Millis = 500;


/// Something that can be polled for the current time.
pub trait MonotonicClock {
    /// Returns the current time in milliseconds.
    fn now(&self) -> Millis;
}


/// An output line toggled periodically as a liveness indicator.
pub trait HeartbeatOutput {
    /// Toggles the output level.
    ///
    /// Called from interrupt context; must not block.
    fn toggle(&mut self);
}


/// A heartbeat output that does nothing.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NoHeartbeat;
impl HeartbeatOutput for NoHeartbeat {
    #[inline(always)]
    fn toggle(&mut self) {
    }
}


/// A free-running 32-bit millisecond counter.
///
/// There is exactly one writer (the tick interrupt) and any number of readers. The counter is a
/// single word accessed with plain atomic loads and stores, which is enough for that arrangement
/// and does not require read-modify-write atomics (which e.g. Cortex-M0+ lacks).
#[derive(Debug)]
pub struct TickCounter {
    millis: AtomicU32,
    heartbeat_enabled: AtomicBool,
    configured: AtomicBool,
}
impl TickCounter {
    /// Creates a new counter starting at zero.
    pub const fn new() -> Self {
        Self::starting_at(0)
    }

    /// Creates a new counter starting at the given value.
    ///
    /// Mostly interesting to observe behavior around wraparound without waiting for 49 days.
    pub const fn starting_at(millis: Millis) -> Self {
        Self {
            millis: AtomicU32::new(millis),
            heartbeat_enabled: AtomicBool::new(false),
            configured: AtomicBool::new(false),
        }
    }

    /// Returns the current value of the counter.
    #[inline]
    pub fn now(&self) -> Millis {
        self.millis.load(Ordering::Acquire)
    }

    /// Returns the number of milliseconds that have passed since `start`.
    ///
    /// Correct across a single wraparound of the counter.
    #[inline]
    pub fn elapsed_since(&self, start: Millis) -> Millis {
        self.now().wrapping_sub(start)
    }

    /// Advances the counter by one tick and returns the new value.
    ///
    /// Must only be called from the periodic tick interrupt. If the heartbeat has been enabled,
    /// `heartbeat` is toggled every [`HEARTBEAT_PERIOD_MS`] ticks.
    #[inline]
    pub fn on_tick<H: HeartbeatOutput>(&self, heartbeat: &mut H) -> Millis {
        // single writer => load + store cannot lose an increment
        let millis = self.millis.load(Ordering::Relaxed).wrapping_add(1);
        self.millis.store(millis, Ordering::Release);

        if millis % HEARTBEAT_PERIOD_MS == 0 && self.heartbeat_enabled.load(Ordering::Relaxed) {
            heartbeat.toggle();
        }
        millis
    }

    /// Whether the heartbeat toggle is active.
    pub fn heartbeat_enabled(&self) -> bool {
        self.heartbeat_enabled.load(Ordering::Relaxed)
    }

    pub(crate) fn set_heartbeat_enabled(&self, enabled: bool) {
        self.heartbeat_enabled.store(enabled, Ordering::Relaxed);
    }

    /// Whether the clock driving this counter has already been configured.
    pub fn is_configured(&self) -> bool {
        self.configured.load(Ordering::Acquire)
    }

    pub(crate) fn mark_configured(&self) {
        self.configured.store(true, Ordering::Release);
    }
}
impl Default for TickCounter {
    fn default() -> Self {
        Self::new()
    }
}
impl MonotonicClock for TickCounter {
    #[inline]
    fn now(&self) -> Millis {
        TickCounter::now(self)
    }
}


#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct CountingHeartbeat {
        toggles: u32,
    }
    impl HeartbeatOutput for CountingHeartbeat {
        fn toggle(&mut self) {
            self.toggles += 1;
        }
    }

    #[test]
    fn test_starts_at_zero() {
        let counter = TickCounter::new();
        assert_eq!(counter.now(), 0);
        assert!(!counter.heartbeat_enabled());
        assert!(!counter.is_configured());
    }

    #[test]
    fn test_on_tick_increments_by_one() {
        let counter = TickCounter::new();
        for expected in 1..=1000 {
            assert_eq!(counter.on_tick(&mut NoHeartbeat), expected);
            assert_eq!(counter.now(), expected);
        }
    }

    #[test]
    fn test_wraps_to_zero() {
        let counter = TickCounter::starting_at(Millis::MAX - 1);
        assert_eq!(counter.on_tick(&mut NoHeartbeat), Millis::MAX);
        assert_eq!(counter.on_tick(&mut NoHeartbeat), 0);
        assert_eq!(counter.on_tick(&mut NoHeartbeat), 1);
    }

    #[test]
    fn test_elapsed_since_across_wrap() {
        let counter = TickCounter::starting_at(Millis::MAX - 9);
        let start = counter.now();
        for _ in 0..25 {
            counter.on_tick(&mut NoHeartbeat);
        }
        assert_eq!(counter.now(), 15);
        assert_eq!(counter.elapsed_since(start), 25);
    }

    #[test]
    fn test_heartbeat_disabled_never_toggles() {
        let counter = TickCounter::new();
        let mut heartbeat = CountingHeartbeat::default();
        for _ in 0..5000 {
            counter.on_tick(&mut heartbeat);
        }
        assert_eq!(heartbeat.toggles, 0);
    }

    #[test]
    fn test_heartbeat_toggles_every_period() {
        let counter = TickCounter::new();
        counter.set_heartbeat_enabled(true);
        let mut heartbeat = CountingHeartbeat::default();

        for _ in 0..(HEARTBEAT_PERIOD_MS - 1) {
            counter.on_tick(&mut heartbeat);
        }
        assert_eq!(heartbeat.toggles, 0);

        counter.on_tick(&mut heartbeat);
        assert_eq!(heartbeat.toggles, 1);

        for _ in 0..(HEARTBEAT_PERIOD_MS * 9) {
            counter.on_tick(&mut heartbeat);
        }
        assert_eq!(heartbeat.toggles, 10);
    }

    #[test]
    fn test_heartbeat_toggles_when_wrapping_to_zero() {
        // 2**32 is not a multiple of 500, but 0 is
        let counter = TickCounter::starting_at(Millis::MAX);
        counter.set_heartbeat_enabled(true);
        let mut heartbeat = CountingHeartbeat::default();
        counter.on_tick(&mut heartbeat);
        assert_eq!(counter.now(), 0);
        assert_eq!(heartbeat.toggles, 1);
    }
}
