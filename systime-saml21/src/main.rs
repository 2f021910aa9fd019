#![no_std]
#![no_main]


mod init;
mod pin;
mod tick;


use core::panic::PanicInfo;

use atsaml21g18b::Peripherals;
use cortex_m_rt::entry;
use defmt_rtt as _;
use systime::{ClockConfig, Millis};

use crate::init::Board;
use crate::pin::HeartbeatLed;


/// Ticks per second; one tick per millisecond.
const TICK_RATE_HZ: u32 = 1_000;

/// How often the elapsed time is reported.
const REPORT_INTERVAL_MS: Millis = 100;


defmt::timestamp!("{=u32:ms}", systime::now());


#[inline]
fn noppage() {
    for _ in 0..65536 {
        cortex_m::asm::nop();
    }
}


#[panic_handler]
fn panicked(reason: &PanicInfo) -> ! {
    cortex_m::interrupt::disable();
    defmt::error!("{}", defmt::Display2Format(reason));

    // blink faster than the heartbeat could
    HeartbeatLed::make_output();
    loop {
        HeartbeatLed::set_high();
        noppage();
        HeartbeatLed::set_low();
        noppage();
    }
}


#[entry]
fn main() -> ! {
    let mut peripherals = Peripherals::take()
        .expect("peripherals already taken?!");
    let mut core_peripherals = cortex_m::Peripherals::take()
        .expect("core peripherals already taken?!");

    // nothing may tick before the bring-up is complete
    let tick_configuration = cortex_m::interrupt::free(|_| {
        let mut board = Board::new(&mut peripherals, &mut core_peripherals);
        systime::initialize(&mut board, &ClockConfig::new(TICK_RATE_HZ))
    })
        .expect("clock configuration failed");

    if tick_configuration.is_none() {
        // time stands still; there is nothing to report periodically
        defmt::println!("{}", systime::format(systime::now()));
        loop {
            cortex_m::asm::wfi();
        }
    }

    loop {
        systime::sleep_ms(REPORT_INTERVAL_MS);
        defmt::println!("{}", systime::format(systime::now()));
    }
}
