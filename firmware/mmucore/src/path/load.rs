use embedded_hal::delay::DelayNs;

use super::{Feed, FilamentPath};
use crate::config::PrintheadSensor;
use crate::slot::{Channel, Slot};
use crate::{Clock, Deadline, Error, Operator, PathSensors, Stepper, Travel};

impl<S, P, T, O> FilamentPath<S, P, T, O>
where
    S: Stepper,
    P: PathSensors,
    T: Clock + DelayNs,
    O: Operator,
{
    /// Advances filament one millimetre at a time until it reaches the
    /// selector sensor.
    ///
    /// # Returns
    ///
    /// - `Err(Error::InvalidState)`: if the idler is engaged on a different
    ///   slot from the selector.
    /// - `Err(Error::LoadTimeout)`: if the sensor did not assert in time.
    pub fn load_to_sensor(&mut self) -> Result<(), Error> {
        self.repeat_change_suppress = false;
        self.check_alignment()?;
        self.extruder.set_enabled(true);

        let deadline = Deadline::start(&self.clock, self.timeouts.load);
        while !self.sensors.selector_presence() {
            if deadline.expired(&self.clock) {
                error!(self.operator, "{}", Error::LoadTimeout);
                return Err(Error::LoadTimeout);
            }
            self.feed(1, false)?;
        }
        Ok(())
    }

    /// Loads filament to the selector sensor and a little past it, leaving
    /// the tip at the selector exit.
    pub fn load_filament(&mut self) -> Result<(), Error> {
        self.repeat_change_suppress = false;
        if self.selector.slot().is_parked() {
            error!(self.operator, "No channel selected.");
            return Err(Error::InvalidState);
        }
        self.check_alignment()?;
        if self.sensors.selector_presence() {
            return Err(Error::FilamentAlreadyLoaded);
        }
        self.load_to_sensor()?;
        self.feed(self.extruder_config.load_after_sensor_mm, false)?;
        Ok(())
    }

    /// Checks that a channel loads: selects it, loads to the selector
    /// sensor, then unloads again.
    pub fn load_then_unload(&mut self, channel: Channel) -> Result<(), Error> {
        self.repeat_change_suppress = false;
        if self.sensors.selector_presence() {
            return Err(Error::FilamentAlreadyLoaded);
        }
        let slot = Slot::from(channel);
        self.move_idler(slot)?;
        self.move_selector(slot)?;
        self.load_to_sensor()?;
        self.unload()
    }

    /// Swaps the loaded filament for `channel` and feeds the new one to the
    /// printer.
    ///
    /// The idler stays engaged afterwards, ready for
    /// [FilamentPath::feed_to_printhead]. Every failure parks the idler.
    pub fn tool_change(&mut self, channel: Channel) -> Result<(), Error> {
        info!(self.operator, "Tool change to {}.", channel);
        self.repeat_change_suppress = false;
        self.unload()?;
        self.sync_if_due()?;

        let slot = Slot::from(channel);
        self.move_idler(slot)?;
        self.move_selector(slot)?;
        if let Err(error) = self.load_to_printer(channel) {
            self.park_idler()?;
            return Err(error);
        }

        self.repeat_change_suppress = true;
        Ok(())
    }

    /// Tool change to the channel after the selected one.
    pub fn next_tool(&mut self) -> Result<(), Error> {
        let channel = match self.selector.slot().channel() {
            Some(channel) => channel.next(),
            None => Channel::ALL[0],
        };
        self.tool_change(channel)
    }

    /// Tool change to the channel before the selected one.
    pub fn previous_tool(&mut self) -> Result<(), Error> {
        let channel = match self.selector.slot().channel() {
            Some(channel) => channel.previous(),
            None => Channel::ALL[Channel::ALL.len() - 1],
        };
        self.tool_change(channel)
    }

    fn load_to_printer(&mut self, channel: Channel) -> Result<(), Error> {
        self.load_to_sensor()?;

        let before_gear = self.printhead_sensor == PrintheadSensor::BeforeGear;
        let length = self.extruder_config.feed_lengths[channel.index()];
        let mut distance = match self.feed(length, before_gear)? {
            Travel::Completed => length,
            Travel::Gated(steps) => {
                steps.get_value() / i32::from(self.extruder_config.steps_per_mm)
            }
        };
        if !before_gear {
            return Ok(());
        }

        let mut deadline =
            Deadline::start(&self.clock, self.timeouts.printhead_feed);
        while !self.sensors.extruder_presence() {
            if deadline.expired(&self.clock) {
                self.operator_intervention(Error::PrintheadSensorTimeout);
                deadline.restart(&self.clock);
            }
            self.feed(1, true)?;
            distance += 1;
        }
        info!(self.operator, "Filament reached the printhead after {} mm.", distance);
        self.feed(self.extruder_config.gear_mm, false)?;
        Ok(())
    }

    /// Pushes the filament into the printhead drive gear and releases it.
    ///
    /// A request straight after a tool change is skipped once, because the
    /// tool change has already loaded the filament.
    ///
    /// # Returns
    ///
    /// - `Ok(feed)`: whether the filament was fed or the request skipped.
    /// - `Err(Error::NoFilamentPresent)`: if nothing is at the selector.
    /// - `Err(Error::PrintheadSensorTimeout)`: if a printhead sensor behind
    ///   the gear did not see the filament in time.
    pub fn feed_to_printhead(&mut self) -> Result<Feed, Error> {
        if self.repeat_change_suppress {
            self.repeat_change_suppress = false;
            info!(self.operator, "Filament already fed by the tool change.");
            return Ok(Feed::Suppressed);
        }
        if !self.sensors.selector_presence() {
            return Err(Error::NoFilamentPresent);
        }

        let slot = self.selector.slot();
        self.move_idler(slot)?;
        self.extruder.set_enabled(true);
        self.feed(self.extruder_config.gear_mm, false)?;
        self.park_idler()?;

        if self.printhead_sensor == PrintheadSensor::AfterGear {
            let deadline =
                Deadline::start(&self.clock, self.timeouts.printhead_grace);
            while !self.sensors.extruder_presence() {
                if deadline.expired(&self.clock) {
                    error!(self.operator, "{}", Error::PrintheadSensorTimeout);
                    return Err(Error::PrintheadSensorTimeout);
                }
                self.clock.delay_ms(1);
            }
        }
        Ok(Feed::Loaded)
    }
}
