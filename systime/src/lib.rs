//! Monotonic millisecond timekeeping for bare-metal firmware.
//!
//! A periodic tick interrupt advances a free-running 32-bit millisecond counter. On top of that
//! counter, this crate offers busy-wait sleeps and rendering of elapsed time as `HHH:MM:SS.mmm`.
//!
//! The typical arrangement is:
//!
//! 1. At startup, with interrupts still disabled, the firmware calls [`initialize`] with its
//!    [`ClockHardware`] implementation.
//!
//! 2. The tick interrupt handler calls [`on_tick`].
//!
//! 3. The main loop uses [`now`], [`sleep_ms`] and [`format`].
//!
//! All of the above operate on one crate-global [`TickCounter`]. The same functionality is
//! available on individual counters for code that wants to own its counter.
#![cfg_attr(not(test), no_std)]


#[macro_use]
mod log;

pub mod clock;
pub mod format;
pub mod sleep;
pub mod tick;


use core::time::Duration;

pub use crate::clock::{
    ClockConfig, ClockError, ClockHardware, DEFAULT_TICK_RATE_HZ, TickConfiguration, configure,
};
pub use crate::format::{TIMESTAMP_LEN, Timestamp, format};
pub use crate::sleep::{MAX_SLEEP_MS, deadline_reached};
pub use crate::tick::{
    HEARTBEAT_PERIOD_MS, HeartbeatOutput, Millis, MonotonicClock, NoHeartbeat, TickCounter,
};


/// The system-wide millisecond counter.
static SYSTEM_TIME: TickCounter = TickCounter::new();


/// Brings up the clock and starts the system-wide millisecond counter.
///
/// Must be called exactly once at startup, before anything relies on the counter advancing; see
/// [`configure`] for details.
pub fn initialize<H: ClockHardware>(
    hardware: &mut H,
    config: &ClockConfig,
) -> Result<Option<TickConfiguration>, ClockError> {
    configure(hardware, &SYSTEM_TIME, config)
}

/// Advances the system-wide millisecond counter.
///
/// To be called from the periodic tick interrupt handler and nowhere else.
#[inline]
pub fn on_tick<H: HeartbeatOutput>(heartbeat: &mut H) -> Millis {
    SYSTEM_TIME.on_tick(heartbeat)
}

/// Milliseconds elapsed since startup.
#[inline]
pub fn now() -> Millis {
    SYSTEM_TIME.now()
}

/// Milliseconds elapsed since `start`, a value previously obtained from [`now`].
#[inline]
pub fn elapsed_since(start: Millis) -> Millis {
    SYSTEM_TIME.elapsed_since(start)
}

/// Busy-waits for at least `duration` milliseconds.
pub fn sleep_ms(duration: Millis) {
    crate::sleep::sleep_ms(&SYSTEM_TIME, duration)
}

/// Busy-waits for at least `duration`, truncated to whole milliseconds.
pub fn sleep(duration: Duration) {
    crate::sleep::sleep(&SYSTEM_TIME, duration)
}

/// The system-wide millisecond counter.
pub fn system_time() -> &'static TickCounter {
    &SYSTEM_TIME
}
