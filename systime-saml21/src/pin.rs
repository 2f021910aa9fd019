//! Direct access to the board's LED pin.
//!
//! The LED is toggled from the SysTick handler, which has no access to the owned
//! [`Peripherals`](atsaml21g18b::Peripherals). The PORT set/clear/toggle registers only affect the
//! bits written as 1, so single writes to them are safe from any context.


/// The PORT register block; group A registers carry the suffix `0`.
#[inline(always)]
fn port() -> &'static atsaml21g18b::port::RegisterBlock {
    unsafe { &*atsaml21g18b::PORT::PTR }
}


/// The LED on PA27, used as the heartbeat indicator.
#[derive(Clone, Copy, Debug, Default)]
pub(crate) struct HeartbeatLed;
impl HeartbeatLed {
    const PIN: usize = 27;
    const MASK: u32 = 1 << Self::PIN;

    /// Turns the pin into a plain push-pull output, initially low.
    pub fn make_output() {
        let port = port();

        // no peripheral multiplexing, no input buffer, no pull
        port.pincfg0_[Self::PIN].write(|w| unsafe { w.bits(0) });
        port.outclr0.write(|w| unsafe { w.bits(Self::MASK) });
        port.dirset0.write(|w| unsafe { w.bits(Self::MASK) });
    }

    pub fn set_high() {
        port().outset0.write(|w| unsafe { w.bits(Self::MASK) });
    }

    pub fn set_low() {
        port().outclr0.write(|w| unsafe { w.bits(Self::MASK) });
    }
}
impl systime::HeartbeatOutput for HeartbeatLed {
    #[inline]
    fn toggle(&mut self) {
        port().outtgl0.write(|w| unsafe { w.bits(Self::MASK) });
    }
}
