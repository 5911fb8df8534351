/// Underlying type representing the number of steps.
type StepRepr = i32;

/// Number of steps.
///
/// `Steps` is careful to prevent overflows, so that it can be used safely to
/// track axis positions.
#[derive(Debug, PartialEq, Eq, Clone, Copy, PartialOrd, Ord)]
pub struct Steps(StepRepr);
impl Steps {
    /// Create a new number of steps.
    pub const fn new(steps: StepRepr) -> Self {
        Self(steps)
    }

    /// Zero steps.
    pub const fn zero() -> Self {
        Steps(0)
    }

    /// Scales a count of some physical unit (full steps, millimetres) by the
    /// number of steps each unit takes.
    ///
    /// Returns `None` if the result would overflow.
    pub fn scaled(units: StepRepr, steps_per_unit: u16) -> Option<Self> {
        units.checked_mul(StepRepr::from(steps_per_unit)).map(Steps)
    }

    /// Returns the value represented by `Steps`.
    pub fn get_value(&self) -> StepRepr {
        self.0
    }

    /// Returns the magnitude of the number of steps.
    ///
    /// Returns `None` for `StepRepr::MIN`, which has no positive counterpart.
    pub fn abs(&self) -> Option<Self> {
        self.0.checked_abs().map(Steps)
    }

    /// Increment the value if it's safe to do so without an overflow.
    pub fn inc(&self) -> Option<Self> {
        self.0.checked_add_unsigned(1).map(Steps)
    }

    /// Decrement the value if it's safe to do so without an overflow.
    pub fn dec(&self) -> Option<Self> {
        self.0.checked_sub_unsigned(1).map(Steps)
    }
}
