//! Initialization code.


use atsaml21g18b::Peripherals;
use systime::{ClockHardware, TickConfiguration};

use crate::pin::HeartbeatLed;


/// The speed of the core clock, timed by XOSC.
pub const CORE_CLOCK_SPEED_HZ: u32 = 31_000_000;


/// Sets up the core clock.
///
/// ```
/// ┌────────┐            ┌────────┐            ┌─────────────┐
/// │ XOSC   │            │ GCG0   │            │ CPU/SysTick │
/// │ 31 MHz ├────────────┤ 31 MHz ├────────────┤ 31 MHz      │
/// └────────┘            └────────┘            └─────────────┘
/// ```
///
/// The SysTick timer is clocked directly by the CPU clock.
pub(crate) fn setup_clocks(peripherals: &mut Peripherals) {
    // the external oscillator must keep running at all times: SysTick, and with it the
    // millisecond counter, stops whenever the core clock stops
    peripherals.OSCCTRL.xoscctrl.modify(|_, w| w
        .ondemand().clear_bit() // never wait for a clock request
        .runstdby().set_bit() // keep ticking in standby
        .xtalen().clear_bit() // external clock signal on XIN, no crystal driver
    );
    peripherals.OSCCTRL.xoscctrl.modify(|_, w| w
        .enable().set_bit()
    );

    // a lock failure leaves us spinning here; nothing above this layer can recover from that
    while peripherals.OSCCTRL.status.read().xoscrdy().bit_is_clear() {
    }

    // GCLK lives in its own clock domain; every write has to be waited out via SYNCBUSY

    // route XOSC 1:1 through GCG0, which feeds the CPU and therefore SysTick
    peripherals.GCLK.genctrl[0].modify(|_, w| w
        .divsel().clear_bit() // interpret divisor as DIV, not 2**(DIV+1)
        .div().variant(1) // divide by 1 (= no division)
        .runstdby().set_bit() // run even in standby
        .idc().clear_bit() // duty cycle correction only matters for odd divisors
        .oe().clear_bit() // keep the clock off the GCLK_IO pin
        .src().xosc() // take time from XOSC
    );
    while peripherals.GCLK.syncbusy.read().genctrl0().bit_is_set() {
    }

    // switch the CPU over; from here on, CORE_CLOCK_SPEED_HZ holds and SysTick reload values
    // derived from it are accurate
    peripherals.GCLK.genctrl[0].modify(|_, w| w
        .genen().set_bit()
    );
    while peripherals.GCLK.syncbusy.read().genctrl0().bit_is_set() {
    }

    // GCG0 is hard-wired to the CPU core (SAM L21 datasheet § 17.1, Note), so there is no
    // peripheral channel to enable for SysTick
}


/// Brings the core up to [`CORE_CLOCK_SPEED_HZ`].
///
/// Runs before the tick timer is armed, so no tick can observe the slower reset clock.
pub(crate) fn initialize_microcontroller(peripherals: &mut Peripherals) {
    // 31 MHz is beyond what PL0 allows; PL2 at 3.3V in turn needs two flash wait
    // states ("DUAL" in the SVD), which have to be in place before the clock goes up
    peripherals.NVMCTRL.ctrlb.modify(|_, w| w
        .rws().dual()
    );

    peripherals.PM.plcfg.modify(|_, w| w
        .plsel().pl2()
    );
    while peripherals.PM.intflag.read().plrdy().bit_is_clear() {
    }

    setup_clocks(peripherals);
}


/// The board as seen by the clock bring-up.
pub(crate) struct Board<'a> {
    peripherals: &'a mut Peripherals,
    core_peripherals: &'a mut cortex_m::Peripherals,
}
impl<'a> Board<'a> {
    pub fn new(peripherals: &'a mut Peripherals, core_peripherals: &'a mut cortex_m::Peripherals) -> Self {
        Self { peripherals, core_peripherals }
    }
}
impl ClockHardware for Board<'_> {
    const CORE_CLOCK_SPEED_HZ: u32 = CORE_CLOCK_SPEED_HZ;

    fn setup_core_clock(&mut self) {
        initialize_microcontroller(self.peripherals);
    }

    fn enable_heartbeat_output(&mut self) {
        HeartbeatLed::make_output();
    }

    fn start_tick_timer(&mut self, configuration: &TickConfiguration) {
        crate::tick::enable_tick_clock(self.core_peripherals, configuration);
    }
}
