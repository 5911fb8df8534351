use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::PulseTiming;
use crate::infallible;
use crate::Direction;

/// Stepper motor driver.
///
/// This kind of stepper never fails to take a step (at least in principle).
/// Position tracking and pulse counting live in [crate::Axis].
pub trait Stepper {
    /// Switches the driver output stage on or off.
    ///
    /// # Parameters
    ///
    /// - `enabled`: `true` to energise the motor.
    fn set_enabled(&mut self, enabled: bool);

    /// Takes a single step in the supplied direction.
    ///
    /// # Parameters
    ///
    /// - `direction`: Direction in which to take the step.
    fn step(&mut self, direction: Direction);
}

/// Stepper driven through step, direction and enable pins.
///
/// The enable input of the driver is active low. Each step holds the pulse
/// pin high and then low for the configured times, then waits out the
/// inter-pulse interval, all as busy waits.
///
/// # Type Parameters
///
/// - `P`: pulse pin
/// - `D`: direction pin
/// - `E`: enable pin
/// - `T`: delay provider
pub struct PinStepper<P, D, E, T> {
    pin_pulse: P,
    pin_direction: D,
    pin_enable: E,
    delay: T,
    timing: PulseTiming,
    /// Stores the current direction.
    direction: Direction,
}
impl<P, D, E, T> PinStepper<P, D, E, T>
where
    P: OutputPin<Error = Infallible>,
    D: OutputPin<Error = Infallible>,
    E: OutputPin<Error = Infallible>,
    T: DelayNs,
{
    /// Creates a new `PinStepper`.
    ///
    /// The driver starts disabled.
    ///
    /// # Parameters
    ///
    /// - `pin_pulse`: Pin to use for pulse signals.
    /// - `pin_direction`: Pin to use for direction signals.
    /// - `pin_enable`: Pin to use for the (active low) enable signal.
    /// - `delay`: Busy-wait delay provider.
    /// - `timing`: Pulse timings for this axis.
    pub fn new(
        pin_pulse: P,
        pin_direction: D,
        pin_enable: E,
        delay: T,
        timing: PulseTiming,
    ) -> Self {
        let direction = Direction::Negative;
        let mut stepper = Self {
            pin_pulse,
            pin_direction,
            pin_enable,
            delay,
            timing,
            direction,
        };

        infallible(stepper.pin_enable.set_high());
        infallible(stepper.pin_pulse.set_low());
        // Ensure that the direction we think we have is really what's set on
        // the pin.
        stepper.force_set_direction(direction);

        stepper
    }

    /// Execute a step.
    fn do_step(&mut self, direction: Direction) {
        self.set_direction(direction);
        infallible(self.pin_pulse.set_high());
        self.wait(self.timing.pulse_high.get_value());
        infallible(self.pin_pulse.set_low());
        self.wait(self.timing.pulse_low.get_value());
        self.wait(self.timing.interval.get_value());
    }

    /// Set the direction, but only if it needs changing.
    fn set_direction(&mut self, direction: Direction) {
        if direction != self.direction {
            self.force_set_direction(direction);
        }
    }

    /// Force set the direction, waiting for the driver before and after.
    fn force_set_direction(&mut self, direction: Direction) {
        self.wait(self.timing.settle.get_value());
        match direction {
            Direction::Negative => infallible(self.pin_direction.set_low()),
            Direction::Positive => infallible(self.pin_direction.set_high()),
        }
        self.direction = direction;
        self.wait(self.timing.settle.get_value());
    }

    fn wait(&mut self, us: u32) {
        if us > 0 {
            self.delay.delay_us(us);
        }
    }
}
impl<P, D, E, T> Stepper for PinStepper<P, D, E, T>
where
    P: OutputPin<Error = Infallible>,
    D: OutputPin<Error = Infallible>,
    E: OutputPin<Error = Infallible>,
    T: DelayNs,
{
    fn set_enabled(&mut self, enabled: bool) {
        if enabled {
            infallible(self.pin_enable.set_low());
        } else {
            infallible(self.pin_enable.set_high());
        }
        self.wait(self.timing.settle.get_value());
    }

    fn step(&mut self, direction: Direction) {
        self.do_step(direction);
    }
}
