use ufmt_macros::uDebug;

/// Describes the direction for an axis movement.
///
/// For the slotted axes (idler and selector) the positive direction moves
/// towards higher calibrated coordinates, which is the park end. For the
/// extruder the positive direction advances filament towards the printer.
#[derive(Debug, uDebug, PartialEq, Eq, Clone, Copy)]
pub enum Direction {
    /// Positive direction is associated with a "high" direction signal.
    Positive,
    /// Negative direction is associated with a "low" direction signal.
    Negative,
}
impl Direction {
    /// Returns the direction needed to travel a signed distance.
    ///
    /// Zero travels in the positive direction.
    pub fn of_delta(delta: i32) -> Self {
        if delta < 0 {
            Direction::Negative
        } else {
            Direction::Positive
        }
    }
}

#[cfg(test)]
pub mod test {
    use super::*;
    use proptest::prelude::*;

    /// Generation strategy for directions.
    pub fn direction() -> impl Strategy<Value = Direction> {
        prop_oneof![Just(Direction::Positive), Just(Direction::Negative)]
    }

    #[test]
    fn test_of_delta() {
        assert_eq!(Direction::Negative, Direction::of_delta(-1));
        assert_eq!(Direction::Positive, Direction::of_delta(0));
        assert_eq!(Direction::Positive, Direction::of_delta(7));
    }
}
