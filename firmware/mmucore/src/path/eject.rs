use embedded_hal::delay::DelayNs;

use super::FilamentPath;
use crate::slot::{Channel, Slot};
use crate::{Clock, Error, Operator, PathSensors, Stepper};

impl<S, P, T, O> FilamentPath<S, P, T, O>
where
    S: Stepper,
    P: PathSensors,
    T: Clock + DelayNs,
    O: Operator,
{
    /// Pushes the filament of `channel` out of the unit so it can be pulled
    /// away by hand.
    ///
    /// The selector moves out of the way (to the far side of the channel)
    /// and the filament is fed open loop. The channel is remembered for
    /// [FilamentPath::recover_after_eject].
    pub fn eject(&mut self, channel: Channel) -> Result<(), Error> {
        self.repeat_change_suppress = false;
        self.eject = Some(channel);
        if self.sensors.selector_presence() {
            self.unload()?;
        }

        let clear_of = if channel.index() <= 2 {
            Channel::ALL[4]
        } else {
            Channel::ALL[0]
        };
        self.move_idler(Slot::from(channel))?;
        self.move_selector(Slot::from(clear_of))?;
        self.extruder.set_enabled(true);
        self.feed(self.extruder_config.eject_mm, false)?;
        self.park_idler()
    }

    /// Pulls back the filament of the last eject.
    ///
    /// # Returns
    ///
    /// - `Err(Error::InvalidState)`: if there was no eject to recover from.
    pub fn recover_after_eject(&mut self) -> Result<(), Error> {
        self.repeat_change_suppress = false;
        let channel = self.eject.take().ok_or(Error::InvalidState)?;
        self.move_idler(Slot::from(channel))?;
        self.extruder.set_enabled(true);
        self.feed(-self.extruder_config.eject_mm, false)?;
        self.park_idler()
    }
}
