use cortex_m::Peripherals;
use cortex_m_rt::exception;
use systime::TickConfiguration;

use crate::pin::HeartbeatLed;


#[exception]
fn SysTick() {
    systime::on_tick(&mut HeartbeatLed);
}

pub fn enable_tick_clock(core_peripherals: &mut Peripherals, configuration: &TickConfiguration) {
    const SYST_CSR_ENABLE_ENABLED: u32 = 1 << 0;
    const SYST_CSR_TICKINT_ENABLED: u32 = 1 << 1;
    const SYST_CSR_CLKSOURCE_MCK: u32 = 1 << 2;

    // load, clear, control (in that order, see ARMv6-M ARM § B3.3.1)
    unsafe {
        core_peripherals.SYST.rvr.write(configuration.reload_value())
    };
    unsafe {
        core_peripherals.SYST.cvr.write(0)
    };
    unsafe {
        core_peripherals.SYST.csr.write(
            SYST_CSR_ENABLE_ENABLED
            | SYST_CSR_TICKINT_ENABLED
            | SYST_CSR_CLKSOURCE_MCK
        )
    };
}
