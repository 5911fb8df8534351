use embedded_hal::delay::DelayNs;
use ufmt::{uwrite, uwriteln, uWrite};

use super::FilamentPath;
use crate::slot::CHANNELS;
use crate::{Clock, Error, Operator, PathSensors, Stepper, Travel};

impl<S, P, T, O> FilamentPath<S, P, T, O>
where
    S: Stepper,
    P: PathSensors,
    T: Clock + DelayNs,
    O: Operator,
{
    /// Turns the idler by `delta` full steps and stores the result as the
    /// coordinate of its current slot.
    pub fn nudge_idler(&mut self, delta: i32) -> Result<(), Error> {
        self.idler.nudge(delta, || false).map(|_| ())
    }

    /// Turns the selector by `delta` full steps and stores the result as the
    /// coordinate of its current slot.
    pub fn nudge_selector(&mut self, delta: i32) -> Result<(), Error> {
        let sensors = &mut self.sensors;
        let travel = self.selector.nudge(delta, || sensors.selector_home())?;
        if let Travel::Gated(_) = travel {
            warn!(self.operator, "Selector stopped early at the endstop.");
        }
        Ok(())
    }

    /// Feeds `delta_mm` and adds it to the feed length of the selected
    /// channel.
    ///
    /// # Returns
    ///
    /// - `Err(Error::InvalidState)`: if the selector is parked.
    pub fn nudge_feed_length(&mut self, delta_mm: i32) -> Result<(), Error> {
        let channel = self.selector.slot().channel().ok_or(Error::InvalidState)?;
        self.extruder.set_enabled(true);
        self.feed(delta_mm, false)?;
        self.extruder_config.feed_lengths[channel.index()] += delta_mm;
        Ok(())
    }

    /// Feed lengths currently in use, per channel, in mm.
    pub fn feed_lengths(&self) -> [i32; CHANNELS] {
        self.extruder_config.feed_lengths
    }

    /// Writes the calibration tables and the sensor readings to the
    /// console.
    pub fn report_status(&mut self) {
        let idler = *self.idler.coordinates();
        let selector = *self.selector.coordinates();
        let lengths = self.extruder_config.feed_lengths;

        let _ = uwriteln!(self.operator, "Idler coordinates:");
        self.write_row(&idler);
        let _ = uwriteln!(self.operator, "Selector coordinates:");
        self.write_row(&selector);
        let _ = uwriteln!(self.operator, "Feed lengths (mm):");
        self.write_row(&lengths);

        let snapshot = self.sensors.snapshot();
        let _ = uwriteln!(
            self.operator,
            "Selector sensor: {}",
            u8::from(snapshot.selector_presence)
        );
        let _ = uwriteln!(
            self.operator,
            "Selector endstop: {}",
            u8::from(snapshot.selector_home)
        );
        let _ = uwriteln!(
            self.operator,
            "Printhead sensor: {}",
            u8::from(snapshot.extruder_presence)
        );
        self.report_sensors();
    }

    fn write_row(&mut self, values: &[i32]) {
        for value in values {
            let _ = uwrite!(self.operator, "{} ", *value);
        }
        let _ = self.operator.write_str("\n");
    }
}
