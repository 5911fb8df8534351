use embedded_hal::delay::DelayNs;

use super::FilamentPath;
use crate::slot::{Channel, Slot};
use crate::{Clock, Error, Operator, PathSensors, Stepper};

/// Tool sequence run by [FilamentPath::tool_change_cycle].
const TOOL_CHANGE_CYCLE: [usize; 6] = [0, 1, 2, 3, 4, 0];

/// Pause after each tool change of the cycle.
const CYCLE_PAUSE_MS: u32 = 2_000;

impl<S, P, T, O> FilamentPath<S, P, T, O>
where
    S: Stepper,
    P: PathSensors,
    T: Clock + DelayNs,
    O: Operator,
{
    /// Exercise run: homes, changes through every tool and back to the
    /// first, then unloads and parks.
    pub fn tool_change_cycle(&mut self) -> Result<(), Error> {
        info!(self.operator, "Tool change cycle.");
        self.home_selector()?;
        self.home_idler()?;
        for index in TOOL_CHANGE_CYCLE {
            self.tool_change(Channel::ALL[index])?;
            self.clock.delay_ms(CYCLE_PAUSE_MS);
        }
        self.unload()?;
        self.park_idler()
    }

    /// Exercise run: loads each channel, feeds it to the printhead and
    /// unloads it again.
    pub fn load_cycle(&mut self) -> Result<(), Error> {
        info!(self.operator, "Load and unload cycle.");
        for (count, channel) in Channel::ALL.into_iter().enumerate() {
            let slot = Slot::from(channel);
            self.move_idler(slot)?;
            self.move_selector(slot)?;
            self.load_filament()?;
            self.feed_to_printhead()?;
            self.unload()?;
            info!(self.operator, "Cycles: {}", count + 1);
        }
        Ok(())
    }
}
