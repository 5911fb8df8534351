use core::cell::Cell;

use arduino_hal::{pac::TC0, Delay};
use avr_device::interrupt::Mutex;
use embedded_hal::delay::DelayNs;
use mmucore::{Clock, MilliSeconds};

/// Timer counts per millisecond at 16 MHz with a prescaler of 64.
const TIMER_COUNTS: u8 = 250;

static MILLIS: Mutex<Cell<u32>> = Mutex::new(Cell::new(0));

#[avr_device::interrupt(atmega2560)]
fn TIMER0_COMPA() {
    avr_device::interrupt::free(|cs| {
        let counter = MILLIS.borrow(cs);
        counter.set(counter.get().wrapping_add(1));
    })
}

/// Board time: a millisecond counter driven by timer 0, plus busy waits.
///
/// Interrupts must be enabled globally for the counter to run.
pub struct BoardClock {
    delay: Delay,
}
impl BoardClock {
    /// Configures timer 0 to interrupt once per millisecond.
    pub fn start(tc0: TC0) -> Self {
        tc0.tccr0a().write(|w| w.wgm0().ctc());
        tc0.ocr0a().write(|w| w.set(TIMER_COUNTS - 1));
        tc0.tccr0b().write(|w| w.cs0().prescale_64());
        tc0.timsk0().write(|w| w.ocie0a().set_bit());
        avr_device::interrupt::free(|cs| MILLIS.borrow(cs).set(0));
        Self {
            delay: Delay::new(),
        }
    }
}

impl Clock for BoardClock {
    fn now(&self) -> MilliSeconds {
        MilliSeconds::new(avr_device::interrupt::free(|cs| {
            MILLIS.borrow(cs).get()
        }))
    }
}

impl DelayNs for BoardClock {
    fn delay_ns(&mut self, ns: u32) {
        self.delay.delay_ns(ns);
    }

    fn delay_us(&mut self, us: u32) {
        self.delay.delay_us(us);
    }

    fn delay_ms(&mut self, ms: u32) {
        self.delay.delay_ms(ms);
    }
}
