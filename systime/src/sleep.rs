//! Blocking delays measured against the tick counter.


use core::time::Duration;

use crate::tick::{Millis, MonotonicClock};


/// The longest sleep that can be measured with a wraparound-safe deadline comparison.
///
/// Deadlines are compared by looking at the sign of `now - deadline`, so a deadline may be at most
/// half the counter range away; at exactly 2<sup>31</sup>, the difference is still `i32::MIN`.
/// Longer sleeps are shortened to this value.
pub const MAX_SLEEP_MS: Millis = 1 << 31;


/// Whether `deadline` has been reached at time `now`.
///
/// Both values are points on the wrapping millisecond counter; the comparison stays correct as
/// long as `deadline` is at most 2<sup>31</sup> milliseconds after the point the wait started.
#[inline]
pub const fn deadline_reached(now: Millis, deadline: Millis) -> bool {
    (now.wrapping_sub(deadline) as i32) >= 0
}


/// Busy-waits until at least `duration` milliseconds have elapsed on `clock`.
///
/// This never yields and cannot be cancelled. If `clock` does not advance (e.g. because the tick
/// interrupt was never armed), any non-zero sleep never returns.
pub fn sleep_ms<C: MonotonicClock + ?Sized>(clock: &C, duration: Millis) {
    let duration = if duration > MAX_SLEEP_MS {
        warn!("sleep of {} ms shortened to {} ms", duration, MAX_SLEEP_MS);
        MAX_SLEEP_MS
    } else {
        duration
    };

    let deadline = clock.now().wrapping_add(duration);
    while !deadline_reached(clock.now(), deadline) {
        core::hint::spin_loop();
    }
}


/// Busy-waits until at least `duration` has elapsed on `clock`.
///
/// The duration is truncated to whole milliseconds.
pub fn sleep<C: MonotonicClock + ?Sized>(clock: &C, duration: Duration) {
    let ms_u128 = duration.as_millis();
    let ms = if ms_u128 > MAX_SLEEP_MS.into() {
        MAX_SLEEP_MS
    } else {
        ms_u128 as Millis
    };
    sleep_ms(clock, ms)
}
