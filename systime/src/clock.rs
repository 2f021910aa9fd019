//! One-shot clock bring-up.
//!
//! The hardware-specific parts (oscillators, the timer peripheral and the heartbeat pin) are
//! provided by the platform through [`ClockHardware`]; this module decides what gets programmed.


use core::fmt;

use crate::tick::TickCounter;


/// The tick rate used when nothing else is requested; one tick per millisecond.
pub const DEFAULT_TICK_RATE_HZ: u32 = 1_000;

/// The largest value that fits into the 24-bit SysTick reload register.
pub const SYSTICK_MAX_RELOAD: u32 = 0x00FF_FFFF;


/// How the clock should be set up.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ClockConfig {
    /// How many times per second the tick interrupt fires.
    ///
    /// Zero means that the tick interrupt is not armed at all and the counter stays at zero.
    pub tick_rate_hz: u32,

    /// Whether to toggle the heartbeat output every
    /// [`HEARTBEAT_PERIOD_MS`](crate::tick::HEARTBEAT_PERIOD_MS) ticks.
    pub heartbeat: bool,
}
impl ClockConfig {
    pub const fn new(tick_rate_hz: u32) -> Self {
        Self {
            tick_rate_hz,
            heartbeat: true,
        }
    }

    pub const fn with_heartbeat(mut self, heartbeat: bool) -> Self {
        self.heartbeat = heartbeat;
        self
    }
}
impl Default for ClockConfig {
    fn default() -> Self {
        Self::new(DEFAULT_TICK_RATE_HZ)
    }
}


/// The tick timer parameters derived from the core clock and the requested tick rate.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct TickConfiguration {
    tick_rate_hz: u32,
    period_cycles: u32,
}
impl TickConfiguration {
    /// Derives the timer parameters for the given core clock and tick rate.
    ///
    /// Returns `Ok(None)` if `tick_rate_hz` is zero, which means that no tick should be generated.
    pub const fn new(core_clock_hz: u32, tick_rate_hz: u32) -> Result<Option<Self>, ClockError> {
        if tick_rate_hz == 0 {
            return Ok(None);
        }

        let period_cycles = core_clock_hz / tick_rate_hz;
        if period_cycles < 2 {
            return Err(ClockError::TickRateTooHigh { tick_rate_hz, core_clock_hz });
        }
        if period_cycles - 1 > SYSTICK_MAX_RELOAD {
            return Err(ClockError::TickRateTooLow { tick_rate_hz, period_cycles });
        }

        Ok(Some(Self {
            tick_rate_hz,
            period_cycles,
        }))
    }

    /// The number of tick interrupts per second.
    pub const fn tick_rate_hz(&self) -> u32 {
        self.tick_rate_hz
    }

    /// The number of core clock cycles between two ticks.
    pub const fn period_cycles(&self) -> u32 {
        self.period_cycles
    }

    /// The value to load into the timer's reload register.
    ///
    /// The timer counts from the reload value down to zero inclusive, so a period of `n` cycles
    /// is programmed as `n - 1`.
    pub const fn reload_value(&self) -> u32 {
        self.period_cycles - 1
    }
}


/// The platform layer's part in bringing up the clock.
pub trait ClockHardware {
    /// The frequency the core runs at after [`setup_core_clock`](ClockHardware::setup_core_clock).
    const CORE_CLOCK_SPEED_HZ: u32;

    /// Switches the core to its target clock frequency.
    ///
    /// Waits for the oscillators to become ready; failure to do so is not reported.
    fn setup_core_clock(&mut self);

    /// Prepares the heartbeat output line.
    fn enable_heartbeat_output(&mut self);

    /// Programs and starts the periodic tick interrupt.
    fn start_tick_timer(&mut self, configuration: &TickConfiguration);
}


/// An error that may occur while configuring the clock.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub enum ClockError {
    /// The tick rate is so high that a tick would last less than two core clock cycles.
    TickRateTooHigh { tick_rate_hz: u32, core_clock_hz: u32 },

    /// The tick rate is so low that the period does not fit into the timer's reload register.
    TickRateTooLow { tick_rate_hz: u32, period_cycles: u32 },

    /// The clock has already been configured.
    AlreadyConfigured,
}
impl fmt::Display for ClockError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TickRateTooHigh { tick_rate_hz, core_clock_hz }
                => write!(f, "tick rate {} Hz too high for core clock of {} Hz", tick_rate_hz, core_clock_hz),
            Self::TickRateTooLow { tick_rate_hz, period_cycles }
                => write!(f, "tick rate {} Hz too low; period of {} cycles exceeds the reload register", tick_rate_hz, period_cycles),
            Self::AlreadyConfigured
                => write!(f, "clock already configured"),
        }
    }
}
#[cfg(feature = "defmt")]
impl defmt::Format for ClockError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            Self::TickRateTooHigh { tick_rate_hz, core_clock_hz }
                => defmt::write!(fmt, "tick rate {=u32} Hz too high for core clock of {=u32} Hz", tick_rate_hz, core_clock_hz),
            Self::TickRateTooLow { tick_rate_hz, period_cycles }
                => defmt::write!(fmt, "tick rate {=u32} Hz too low; period of {=u32} cycles exceeds the reload register", tick_rate_hz, period_cycles),
            Self::AlreadyConfigured
                => defmt::write!(fmt, "clock already configured"),
        }
    }
}


/// Brings up the clock and, unless the tick rate is zero, starts ticking `counter`.
///
/// The order is: core clock, heartbeat output (if requested), tick timer. The tick timer is only
/// armed once everything the tick interrupt touches is in place. Invalid configurations are
/// rejected before any hardware is touched.
///
/// May only succeed once per counter; subsequent calls return [`ClockError::AlreadyConfigured`].
/// The caller is responsible for not running this concurrently with itself.
pub fn configure<H: ClockHardware>(
    hardware: &mut H,
    counter: &TickCounter,
    config: &ClockConfig,
) -> Result<Option<TickConfiguration>, ClockError> {
    if counter.is_configured() {
        return Err(ClockError::AlreadyConfigured);
    }
    let tick_configuration = TickConfiguration::new(H::CORE_CLOCK_SPEED_HZ, config.tick_rate_hz)?;

    hardware.setup_core_clock();
    debug!("core clock running at {} Hz", H::CORE_CLOCK_SPEED_HZ);

    if config.heartbeat {
        hardware.enable_heartbeat_output();
    }
    counter.set_heartbeat_enabled(config.heartbeat);
    counter.mark_configured();

    match &tick_configuration {
        Some(tc) => {
            hardware.start_tick_timer(tc);
            info!("tick running at {} Hz (reload {})", tc.tick_rate_hz(), tc.reload_value());
        },
        None => {
            warn!("tick rate is zero; system time will not advance");
        },
    }

    Ok(tick_configuration)
}


#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_rate_has_no_configuration() {
        assert_eq!(TickConfiguration::new(48_000_000, 0), Ok(None));
    }

    #[test]
    fn test_one_khz_reload() {
        let tc = TickConfiguration::new(31_000_000, 1_000)
            .unwrap()
            .unwrap();
        assert_eq!(tc.tick_rate_hz(), 1_000);
        assert_eq!(tc.period_cycles(), 31_000);
        assert_eq!(tc.reload_value(), 30_999);
    }

    #[test]
    fn test_period_truncates() {
        let tc = TickConfiguration::new(168_000_000, 11)
            .unwrap()
            .unwrap();
        assert_eq!(tc.period_cycles(), 15_272_727);
        assert_eq!(tc.reload_value(), 15_272_726);
        let tc = TickConfiguration::new(1_000, 3)
            .unwrap()
            .unwrap();
        assert_eq!(tc.period_cycles(), 333);
    }

    #[test]
    fn test_rate_too_high() {
        assert_eq!(
            TickConfiguration::new(1_000_000, 600_000),
            Err(ClockError::TickRateTooHigh { tick_rate_hz: 600_000, core_clock_hz: 1_000_000 }),
        );
        assert!(TickConfiguration::new(1_000_000, 500_000).unwrap().is_some());
    }

    #[test]
    fn test_rate_too_low() {
        // 168 MHz / 10 Hz = 16.8 M cycles > 2**24
        assert_eq!(
            TickConfiguration::new(168_000_000, 10),
            Err(ClockError::TickRateTooLow { tick_rate_hz: 10, period_cycles: 16_800_000 }),
        );
        assert!(TickConfiguration::new(SYSTICK_MAX_RELOAD + 1, 1).unwrap().is_some());
        assert!(TickConfiguration::new(SYSTICK_MAX_RELOAD + 2, 1).is_err());
    }

    #[test]
    fn test_default_config() {
        let config = ClockConfig::default();
        assert_eq!(config.tick_rate_hz, DEFAULT_TICK_RATE_HZ);
        assert!(config.heartbeat);
        assert!(!config.with_heartbeat(false).heartbeat);
    }

    #[test]
    fn test_error_display() {
        assert_eq!(
            std::format!("{}", ClockError::TickRateTooHigh { tick_rate_hz: 5, core_clock_hz: 8 }),
            "tick rate 5 Hz too high for core clock of 8 Hz",
        );
        assert_eq!(std::format!("{}", ClockError::AlreadyConfigured), "clock already configured");
    }
}
