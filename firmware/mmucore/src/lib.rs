//! Controller core of a multi-material filament selector unit.
//!
//! The unit sits between a printer and five filament spools. On command from
//! the printer it selects a channel, drives filament to and from the
//! printhead, and reports its sensors. Everything here is hardware
//! independent: pins, delays, time and the consoles come in through traits,
//! so the whole core runs on the host against a simulated rig.
#![cfg_attr(not(test), no_std)]

#[macro_use]
mod log;

mod clock;
pub mod config;
mod error;
pub mod interactive;
mod kinematics;
mod microseconds;
mod operator;
pub mod path;
pub mod protocol;
mod sensors;
pub mod slot;

#[cfg(test)]
mod sim;

use core::convert::Infallible;

pub use clock::Clock;
pub use clock::Deadline;
pub use config::Config;
pub use error::Error;
pub use interactive::Interactive;
pub use kinematics::Axis;
pub use kinematics::Direction;
pub use kinematics::PinStepper;
pub use kinematics::SlotAxis;
pub use kinematics::Stepper;
pub use kinematics::Steps;
pub use kinematics::Travel;
pub use microseconds::MicroSeconds;
pub use microseconds::MilliSeconds;
pub use operator::Operator;
pub use path::FilamentPath;
pub use protocol::Protocol;
pub use sensors::PathSensors;
pub use sensors::PinSensor;
pub use sensors::PinSensors;
pub use sensors::SensorSnapshot;
pub use slot::Channel;
pub use slot::Slot;

/// Unwraps the result of a pin operation that cannot fail.
pub(crate) fn infallible<T>(result: Result<T, Infallible>) -> T {
    match result {
        Ok(value) => value,
        Err(never) => match never {},
    }
}
