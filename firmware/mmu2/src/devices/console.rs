use core::convert::Infallible;

use arduino_hal::{
    hal::port::{PE0, PE1},
    pac::USART0,
    port::{
        mode::{Input, Output},
        Pin,
    },
    prelude::*,
    Usart,
};
use mmucore::Operator;
use ufmt::uWrite;

/// USB serial port of the board, used for logging and the debug console.
pub struct Console {
    serial: Usart<USART0, Pin<Input, PE0>, Pin<Output, PE1>>,
}
impl Console {
    /// Creates a new `Console`.
    pub fn new(serial: Usart<USART0, Pin<Input, PE0>, Pin<Output, PE1>>) -> Self {
        Self { serial }
    }
}

impl uWrite for Console {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.serial.write_str(s)
    }
}

impl Operator for Console {
    fn read(&mut self) -> Option<u8> {
        self.serial.read().ok()
    }

    fn wait_for_acknowledgement(&mut self) {
        nb::block!(self.serial.read()).unwrap_infallible();
        while self.serial.read().is_ok() {}
    }
}
