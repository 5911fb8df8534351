use arduino_hal::{
    default_serial,
    hal::port::{Dynamic, PD2, PD3},
    pac::USART1,
    pins,
    port::{
        mode::{Floating, Input, Output, PullUp},
        Pin, PinOps,
    },
    prelude::*,
    Delay, Peripherals, Pins, Usart,
};
use embedded_hal::digital::PinState;
use mmucore::config::{Config, PulseTiming};
use mmucore::path::Steppers;
use mmucore::{
    FilamentPath, Interactive, PinSensor, PinSensors, PinStepper, Protocol,
};

use crate::devices::{BoardClock, Console};

type BoardStepper = PinStepper<
    Pin<Output, Dynamic>,
    Pin<Output, Dynamic>,
    Pin<Output, Dynamic>,
    Delay,
>;
type BoardSensors = PinSensors<
    Pin<Input<Floating>, Dynamic>,
    Pin<Input<Floating>, Dynamic>,
    Pin<Input<PullUp>, Dynamic>,
>;
type PrinterLink = Usart<USART1, Pin<Input, PD2>, Pin<Output, PD3>>;

/// Longest line accepted from either serial port.
const LINE: usize = 32;

pub struct Machine {
    path: FilamentPath<BoardStepper, BoardSensors, BoardClock, Console>,
    printer: PrinterLink,
    protocol: Protocol<LINE>,
    interactive: Interactive<LINE>,
}

impl Machine {
    const BAUD_RATE: u32 = 115200;

    pub fn new() -> Self {
        let peripherals: Peripherals = unsafe { Peripherals::steal() };
        let pins: Pins = pins!(peripherals);

        // Serial ports: USB console on USART0, printer on USART1.
        let console = Console::new(default_serial!(
            peripherals,
            pins,
            Self::BAUD_RATE
        ));
        let printer = Usart::new(
            peripherals.USART1,
            pins.d19,
            pins.d18.into_output(),
            Self::BAUD_RATE.into_baudrate(),
        );

        let clock = BoardClock::start(peripherals.TC0);
        unsafe { avr_device::interrupt::enable() };

        let config = Config::default();
        let steppers = Steppers {
            idler: stepper(pins.d31, pins.d33, pins.d29, config.idler.timing),
            selector: stepper(
                pins.d25,
                pins.d23,
                pins.d27,
                config.selector.timing,
            ),
            extruder: stepper(
                pins.d37,
                pins.d39,
                pins.d35,
                config.extruder.timing,
            ),
        };
        let sensors = PinSensors {
            selector: PinSensor::new(
                pins.d11.into_floating_input().downgrade(),
                PinState::High,
            ),
            extruder: PinSensor::new(
                pins.d32.into_floating_input().downgrade(),
                PinState::Low,
            ),
            home: PinSensor::new(
                pins.d30.into_pull_up_input().downgrade(),
                PinState::Low,
            ),
        };

        let path = FilamentPath::new(&config, steppers, sensors, clock, console);

        Self {
            path,
            printer,
            protocol: Protocol::new(),
            interactive: Interactive::new(),
        }
    }

    /// Greets the console, homes, and tells the printer the unit is up.
    pub fn start(&mut self) {
        Interactive::<LINE>::greet(self.path.console());
        self.path.start();
        Protocol::<LINE>::announce(&mut self.printer);
    }

    /// One pass of the main loop: printer commands first, then the console.
    pub fn poll(&mut self) {
        while let Ok(byte) = self.printer.read() {
            self.protocol.receive(byte, &mut self.printer, &mut self.path);
        }
        self.interactive.poll(&mut self.path);
        self.path.pause_ms(1);
    }
}

/// Builds one axis driver from its step, direction and enable pins.
///
/// The enable pin starts high so the driver is off until first used.
fn stepper<P: PinOps, D: PinOps, E: PinOps>(
    pulse: Pin<Input<Floating>, P>,
    direction: Pin<Input<Floating>, D>,
    enable: Pin<Input<Floating>, E>,
    timing: PulseTiming,
) -> BoardStepper {
    PinStepper::new(
        pulse.into_output().downgrade(),
        direction.into_output().downgrade(),
        enable.into_output_high().downgrade(),
        Delay::new(),
        timing,
    )
}
