use embedded_hal::delay::DelayNs;

use super::FilamentPath;
use crate::{Clock, Deadline, Error, Operator, PathSensors, Stepper};

impl<S, P, T, O> FilamentPath<S, P, T, O>
where
    S: Stepper,
    P: PathSensors,
    T: Clock + DelayNs,
    O: Operator,
{
    /// Pulls the filament back out of the printer until it clears the
    /// selector, then parks the idler.
    ///
    /// Succeeds without moving if no filament is present. Failures park the
    /// idler and are not retried.
    ///
    /// # Returns
    ///
    /// - `Err(Error::UnloadTimeout)`: if the selector sensor never cleared.
    /// - `Err(Error::FilamentStuckAtPrinthead)`: if the printhead sensor
    ///   stayed asserted for too long.
    pub fn unload(&mut self) -> Result<(), Error> {
        self.repeat_change_suppress = false;
        if !self.sensors.selector_presence() {
            info!(self.operator, "Filament already unloaded.");
            return Ok(());
        }

        let slot = self.selector.slot();
        self.move_idler(slot)?;
        self.extruder.set_enabled(true);

        if let Err(error) = self.retract_to_selector() {
            error!(self.operator, "{}", error);
            self.park_idler()?;
            return Err(error);
        }

        self.feed(-self.extruder_config.unload_clearance_mm, false)?;
        self.park_idler()
    }

    /// Retracts one millimetre at a time until the selector sensor clears.
    fn retract_to_selector(&mut self) -> Result<(), Error> {
        let deadline = Deadline::start(&self.clock, self.timeouts.unload);
        let mut stuck: Option<Deadline> = None;
        while self.sensors.selector_presence() {
            if self.sensors.extruder_presence() {
                let since = *stuck.get_or_insert_with(|| {
                    Deadline::start(&self.clock, self.timeouts.stuck)
                });
                if since.expired(&self.clock) {
                    return Err(Error::FilamentStuckAtPrinthead);
                }
            } else {
                stuck = None;
            }
            if deadline.expired(&self.clock) {
                return Err(Error::UnloadTimeout);
            }
            self.feed(-1, false)?;
        }
        Ok(())
    }
}
