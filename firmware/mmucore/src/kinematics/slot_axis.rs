use crate::config::SlotAxisConfig;
use crate::slot::{Channel, Slot, SLOTS};
use crate::{Axis, Direction, Error, Stepper, Steps, Travel};

/// Axis positioned by a calibrated table of slot coordinates.
///
/// Coordinates are in full steps, counted from the mechanical end of the
/// axis opposite the park slot. Every move is issued as one pulse train of
/// `coordinate delta * microsteps` pulses. Moves in the positive direction
/// (towards park) are gated by a `limit` predicate so that an endstop can
/// stop the axis before it runs into the frame.
pub struct SlotAxis<S> {
    axis: Axis<S>,
    coordinates: [i32; SLOTS],
    microsteps: u16,
    slot: Slot,
}
impl<S: Stepper> SlotAxis<S> {
    /// Creates a new `SlotAxis`.
    ///
    /// The logical slot starts at zero; it is only meaningful after
    /// [SlotAxis::home].
    pub fn new(stepper: S, config: &SlotAxisConfig) -> Self {
        Self {
            axis: Axis::new(stepper),
            coordinates: config.coordinates,
            microsteps: config.microsteps,
            slot: Slot::from(Channel::ALL[0]),
        }
    }

    /// Returns the current logical slot.
    pub fn slot(&self) -> Slot {
        self.slot
    }

    /// Returns the coordinate table.
    pub fn coordinates(&self) -> &[i32; SLOTS] {
        &self.coordinates
    }

    /// Returns `true` if the driver is currently energised.
    pub fn is_enabled(&self) -> bool {
        self.axis.is_enabled()
    }

    /// Switches the driver on or off. The logical slot is unaffected.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.axis.set_enabled(enabled);
    }

    /// Turns the axis by a signed number of full steps.
    ///
    /// Positive turns stop early if `limit` becomes true.
    pub fn turn<G>(&mut self, full_steps: i32, mut limit: G) -> Result<Travel, Error>
    where
        G: FnMut() -> bool,
    {
        let distance =
            Steps::scaled(full_steps, self.microsteps).ok_or(Error::AxisFault)?;
        let towards_limit =
            Direction::of_delta(full_steps) == Direction::Positive;
        self.axis.set_enabled(true);
        self.axis.travel(distance, || towards_limit && limit())
    }

    /// Drives the axis to a mechanical reference and marks it parked.
    ///
    /// The axis first travels its full range in the negative direction,
    /// then its full range back towards park (stopping at `limit`). The
    /// driver is switched off afterwards.
    pub fn home<G>(&mut self, limit: G) -> Result<(), Error>
    where
        G: FnMut() -> bool,
    {
        let range = self.coordinate(Slot::PARK);
        self.turn(-range, || false)?;
        self.turn(range, limit)?;
        self.axis.set_enabled(false);
        self.slot = Slot::PARK;
        Ok(())
    }

    /// Moves to an absolute slot.
    pub fn move_to<G>(&mut self, slot: Slot, limit: G) -> Result<Travel, Error>
    where
        G: FnMut() -> bool,
    {
        let delta = self.coordinate(slot) - self.coordinate(self.slot);
        let travel = self.turn(delta, limit)?;
        self.slot = slot;
        Ok(travel)
    }

    /// Removes accumulated drift without re-homing.
    ///
    /// Runs to the mechanical zero end, across the full range to park, and
    /// back to the current slot. The logical slot is never changed.
    pub fn sync<G>(&mut self, mut limit: G) -> Result<(), Error>
    where
        G: FnMut() -> bool,
    {
        let here = self.coordinate(self.slot);
        let range = self.coordinate(Slot::PARK);
        self.turn(-here, || false)?;
        self.turn(range, &mut limit)?;
        self.turn(here - range, || false)?;
        Ok(())
    }

    /// Calibration nudge: turns by `delta` full steps and shifts the
    /// coordinate of the current slot by the distance actually travelled.
    ///
    /// If `limit` stops the turn part way through a full step, the axis
    /// backs off to the last whole step so that the coordinate still
    /// matches the axis.
    pub fn nudge<G>(&mut self, delta: i32, limit: G) -> Result<Travel, Error>
    where
        G: FnMut() -> bool,
    {
        let start = self.axis.get_position().get_value();
        let travel = self.turn(delta, limit)?;
        let moved = self.axis.get_position().get_value() - start;
        let microsteps = i32::from(self.microsteps);
        let partial = moved % microsteps;
        if partial != 0 {
            self.axis.travel(Steps::new(-partial), || false)?;
        }
        let index = self.slot.index();
        self.coordinates[index] += moved / microsteps;
        Ok(travel)
    }

    fn coordinate(&self, slot: Slot) -> i32 {
        self.coordinates[slot.index()]
    }
}
