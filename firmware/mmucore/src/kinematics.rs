mod axis;
mod direction;
mod slot_axis;
mod stepper;
mod steps;

pub use axis::Axis;
pub use axis::Travel;
pub use direction::Direction;
pub use slot_axis::SlotAxis;
pub use stepper::PinStepper;
pub use stepper::Stepper;
pub use steps::Steps;
