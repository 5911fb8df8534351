use crate::Direction;
use crate::Error;
use crate::Stepper;
use crate::Steps;

/// How a pulse train ended.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Travel {
    /// Every requested pulse was issued.
    Completed,
    /// The gate stopped the train after the contained number of pulses.
    Gated(Steps),
}

/// Stepper axis which tracks its own position.
///
/// An `Axis` executes its stepping commands by wrapping some underlying
/// [Stepper]. The tracked position is a model value: disabling the driver
/// does not reset it.
pub struct Axis<S> {
    stepper: S,
    position: Steps,
    enabled: bool,
}
impl<S: Stepper> Axis<S> {
    /// Creates a new axis.
    ///
    /// The new axis has an initial position of zero and a disabled driver.
    ///
    /// # Parameters
    ///
    /// - `stepper`: The underlying stepper to use.
    pub fn new(mut stepper: S) -> Self {
        stepper.set_enabled(false);
        Self {
            stepper,
            position: Steps::zero(),
            enabled: false,
        }
    }

    /// Switches the driver on or off.
    pub fn set_enabled(&mut self, enabled: bool) {
        self.stepper.set_enabled(enabled);
        self.enabled = enabled;
    }

    /// Returns `true` if the driver is currently energised.
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    /// Returns the current position of the axis.
    pub fn get_position(&self) -> Steps {
        self.position
    }

    /// Take a step.
    ///
    /// This takes a step with the underlying stepper provided that doing so
    /// would not overflow the step count.
    ///
    /// # Returns
    ///
    /// - `Some(steps)`: if the step could successfully be taken. This returns
    ///   the new position of the axis.
    /// - `None`: if no step could be taken without overflowing limits.
    pub fn step(&mut self, direction: Direction) -> Option<Steps> {
        let next_position_option = match direction {
            Direction::Negative => self.position.dec(),
            Direction::Positive => self.position.inc(),
        };

        if let Some(next_position) = next_position_option {
            self.stepper.step(direction);
            self.position = next_position;
        }

        next_position_option
    }

    /// Issues a bounded train of step pulses.
    ///
    /// Before every pulse the `gate` is evaluated; the train stops the first
    /// time it returns `true`, even if `count` is not exhausted.
    ///
    /// # Parameters
    ///
    /// - `count`: Maximum number of pulses. Must not be negative.
    /// - `direction`: Direction of travel.
    /// - `gate`: Predicate that ends the train early.
    ///
    /// # Returns
    ///
    /// - `Ok(travel)`: how the pulse train ended.
    /// - `Err(Error::AxisFault)`: if `count` is negative or the position
    ///   would overflow.
    pub fn step_pulses<G>(
        &mut self,
        count: Steps,
        direction: Direction,
        mut gate: G,
    ) -> Result<Travel, Error>
    where
        G: FnMut() -> bool,
    {
        if count < Steps::zero() {
            return Err(Error::AxisFault);
        }
        for taken in 0..count.get_value() {
            if gate() {
                return Ok(Travel::Gated(Steps::new(taken)));
            }
            self.step(direction).ok_or(Error::AxisFault)?;
        }
        Ok(Travel::Completed)
    }

    /// Travels a signed distance; negative distances travel in the negative
    /// direction.
    ///
    /// See [Axis::step_pulses] for the meaning of `gate`.
    pub fn travel<G>(&mut self, distance: Steps, gate: G) -> Result<Travel, Error>
    where
        G: FnMut() -> bool,
    {
        let direction = Direction::of_delta(distance.get_value());
        let count = distance.abs().ok_or(Error::AxisFault)?;
        self.step_pulses(count, direction, gate)
    }
}

#[cfg(test)]
mod test {
    use super::super::direction::test::direction;
    use super::*;
    use crate::sim::{Sim, SimAxis};
    use proptest::collection;
    use proptest::prelude::*;

    fn axis(sim: &Sim) -> Axis<crate::sim::TestStepper> {
        Axis::new(sim.stepper(SimAxis::Extruder))
    }

    #[test]
    fn test_new() {
        let sim = Sim::new();
        let axis = axis(&sim);
        assert_eq!(Steps::zero(), axis.get_position());
        assert!(!axis.is_enabled());
        assert!(!sim.state().axis(SimAxis::Extruder).enabled);
    }

    #[test]
    fn test_enable_keeps_position() {
        let sim = Sim::new();
        let mut axis = axis(&sim);
        axis.set_enabled(true);
        axis.step_pulses(Steps::new(12), Direction::Positive, || false)
            .unwrap();
        axis.set_enabled(false);

        assert_eq!(12, axis.get_position().get_value());
        assert!(!sim.state().axis(SimAxis::Extruder).enabled);
    }

    #[test]
    fn test_step_pulses_completes() {
        let sim = Sim::new();
        let mut axis = axis(&sim);
        let travel = axis
            .step_pulses(Steps::new(40), Direction::Negative, || false)
            .unwrap();

        assert_eq!(Travel::Completed, travel);
        assert_eq!(-40, axis.get_position().get_value());
        assert_eq!(40, sim.state().axis(SimAxis::Extruder).pulses);
    }

    #[test]
    fn test_step_pulses_gated() {
        let sim = Sim::new();
        let mut axis = axis(&sim);
        let mut evaluations = 0;
        let travel = axis
            .step_pulses(Steps::new(100), Direction::Positive, || {
                evaluations += 1;
                evaluations > 7
            })
            .unwrap();

        assert_eq!(Travel::Gated(Steps::new(7)), travel);
        assert_eq!(7, sim.state().axis(SimAxis::Extruder).pulses);
    }

    #[test]
    fn test_gate_already_true_takes_no_step() {
        let sim = Sim::new();
        let mut axis = axis(&sim);
        let travel = axis
            .step_pulses(Steps::new(100), Direction::Positive, || true)
            .unwrap();

        assert_eq!(Travel::Gated(Steps::zero()), travel);
        assert_eq!(0, sim.state().axis(SimAxis::Extruder).pulses);
    }

    #[test]
    fn test_negative_count_is_fault() {
        let sim = Sim::new();
        let mut axis = axis(&sim);
        assert_eq!(
            Err(Error::AxisFault),
            axis.step_pulses(Steps::new(-1), Direction::Positive, || false)
        );
        assert_eq!(0, sim.state().axis(SimAxis::Extruder).pulses);
    }

    #[test]
    fn test_travel_signed() {
        let sim = Sim::new();
        let mut axis = axis(&sim);
        axis.travel(Steps::new(-25), || false).unwrap();
        assert_eq!(-25, axis.get_position().get_value());
        axis.travel(Steps::new(30), || false).unwrap();
        assert_eq!(5, axis.get_position().get_value());
        assert_eq!(5, sim.state().axis(SimAxis::Extruder).position);
    }

    proptest! {
        #[test]
        fn test_multi_steps(
            single_steps in collection::vec(direction(), 1..64)
        ) {
            let mut pos: i32 = 0;
            let sim = Sim::new();
            let mut axis = axis(&sim);
            for dir in single_steps {
                match dir {
                    Direction::Positive => { pos += 1; }
                    Direction::Negative => { pos -= 1; }
                }

                let step_result = axis.step(dir);

                assert_eq!(Some(Steps::new(pos)), step_result);
                assert_eq!(pos, axis.get_position().get_value());
                assert_eq!(pos as i64, sim.state().axis(SimAxis::Extruder).position);
            }
        }
    }
}
