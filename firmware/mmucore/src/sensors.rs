use core::convert::Infallible;

use embedded_hal::digital::{InputPin, PinState};

use crate::infallible;

/// The binary inputs along the filament path.
///
/// Every call samples the input at that moment; nothing is cached or
/// debounced.
pub trait PathSensors {
    /// Filament is present at the selector exit.
    fn selector_presence(&mut self) -> bool;

    /// Filament is present at the printhead.
    fn extruder_presence(&mut self) -> bool;

    /// The selector endstop is engaged.
    fn selector_home(&mut self) -> bool;

    /// Samples all three inputs.
    fn snapshot(&mut self) -> SensorSnapshot {
        SensorSnapshot {
            selector_presence: self.selector_presence(),
            extruder_presence: self.extruder_presence(),
            selector_home: self.selector_home(),
        }
    }
}

/// All sensor readings taken together, for reporting.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SensorSnapshot {
    pub selector_presence: bool,
    pub extruder_presence: bool,
    pub selector_home: bool,
}

/// Sensor input wired to a pin.
///
/// # Type Parameters
///
/// - `P`: pin
pub struct PinSensor<P> {
    pin: P,
    active: PinState,
}
impl<P: InputPin<Error = Infallible>> PinSensor<P> {
    /// Creates a new `PinSensor`.
    ///
    /// # Parameters
    ///
    /// - `pin`: Pin the sensor is wired to.
    /// - `active`: Pin level at which the sensor reports "present" or
    ///   "engaged".
    pub fn new(pin: P, active: PinState) -> Self {
        Self { pin, active }
    }

    /// Returns `true` if the input is at its active level.
    pub fn is_active(&mut self) -> bool {
        let high = infallible(self.pin.is_high());
        match self.active {
            PinState::High => high,
            PinState::Low => !high,
        }
    }
}

/// The three path inputs read from pins.
pub struct PinSensors<F, X, H> {
    pub selector: PinSensor<F>,
    pub extruder: PinSensor<X>,
    pub home: PinSensor<H>,
}
impl<F, X, H> PathSensors for PinSensors<F, X, H>
where
    F: InputPin<Error = Infallible>,
    X: InputPin<Error = Infallible>,
    H: InputPin<Error = Infallible>,
{
    fn selector_presence(&mut self) -> bool {
        self.selector.is_active()
    }

    fn extruder_presence(&mut self) -> bool {
        self.extruder.is_active()
    }

    fn selector_home(&mut self) -> bool {
        self.home.is_active()
    }
}
