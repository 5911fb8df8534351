use embedded_hal::delay::DelayNs;

use super::{FilamentPath, SlottedAxis};
use crate::{Clock, Error, Operator, PathSensors, Stepper};

impl<S, P, T, O> FilamentPath<S, P, T, O>
where
    S: Stepper,
    P: PathSensors,
    T: Clock + DelayNs,
    O: Operator,
{
    /// Power-on sequence: homes the idler, then the selector.
    ///
    /// While filament is present at the selector sensor the selector cannot
    /// be homed; the operator is asked to clear it until homing succeeds.
    pub fn start(&mut self) {
        info!(self.operator, "Homing the idler.");
        if let Err(error) = self.home_idler() {
            error!(self.operator, "{}", error);
        }
        info!(self.operator, "Homing the selector.");
        loop {
            match self.home_selector() {
                Err(Error::BlockingRecoveryRequired) => {
                    self.operator_intervention(Error::BlockingRecoveryRequired)
                }
                Err(error) => {
                    error!(self.operator, "{}", error);
                    break;
                }
                Ok(()) => break,
            }
        }
    }

    pub fn home_idler(&mut self) -> Result<(), Error> {
        self.idler.home(|| false)
    }

    /// Homes the selector against its endstop.
    ///
    /// # Returns
    ///
    /// - `Err(Error::BlockingRecoveryRequired)`: if filament is present at
    ///   the selector sensor. Nothing moved.
    pub fn home_selector(&mut self) -> Result<(), Error> {
        if self.sensors.selector_presence() {
            return Err(Error::BlockingRecoveryRequired);
        }
        let sensors = &mut self.sensors;
        self.selector.home(|| sensors.selector_home())
    }

    /// Parks the idler and the selector by homing them. The selector stays
    /// put if filament is present.
    pub fn park(&mut self) -> Result<(), Error> {
        self.home_idler()?;
        match self.home_selector() {
            Err(Error::BlockingRecoveryRequired) => {
                warn!(self.operator, "Unable to park the selector, remove the filament.");
                Ok(())
            }
            result => result,
        }
    }

    /// Removes accumulated drift from a slotted axis without re-homing it.
    pub fn sync(&mut self, axis: SlottedAxis) -> Result<(), Error> {
        match axis {
            SlottedAxis::Idler => self.idler.sync(|| false),
            SlottedAxis::Selector => {
                if self.sensors.selector_presence() {
                    return Err(Error::BlockingRecoveryRequired);
                }
                info!(
                    self.operator,
                    "Syncing the selector at slot {}.",
                    self.selector.slot()
                );
                let sensors = &mut self.sensors;
                self.selector.sync(|| sensors.selector_home())
            }
        }
    }

    /// Syncs the selector if enough tool changes have passed since the last
    /// sync.
    pub(super) fn sync_if_due(&mut self) -> Result<(), Error> {
        let Some(interval) = self.sync_interval else {
            return Ok(());
        };
        self.tool_changes = self.tool_changes.saturating_add(1);
        if self.tool_changes >= interval {
            self.sync(SlottedAxis::Selector)?;
            self.tool_changes = 0;
        }
        Ok(())
    }
}
