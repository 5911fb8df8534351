//! Sequenced, sensor-gated filament operations.
//!
//! [FilamentPath] owns every axis and sensor of the unit and is the single
//! mutable context that the command front-ends operate on. Operations block
//! until they complete, are gated, or time out; nothing runs in the
//! background.

mod calibration;
mod cycles;
mod eject;
mod homing;
mod load;
mod recovery;
mod unload;

use embedded_hal::delay::DelayNs;

use crate::config::{Config, ExtruderConfig, PrintheadSensor, Timeouts};
use crate::slot::{Channel, Slot};
use crate::{
    Axis, Clock, Error, Operator, PathSensors, SlotAxis, Stepper, Steps,
    Travel,
};

/// The three steppers of the unit.
pub struct Steppers<S> {
    pub idler: S,
    pub selector: S,
    pub extruder: S,
}

/// How a feed to the printhead ended.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum Feed {
    /// Filament was pushed into the printhead drive gear.
    Loaded,
    /// The request repeated a tool change that had already loaded the
    /// filament; nothing moved.
    Suppressed,
}

/// The slotted axes.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SlottedAxis {
    Idler,
    Selector,
}

/// Snapshot of the logical tool state.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ToolState {
    pub selector: Slot,
    pub idler: Slot,
    /// Channel of the last eject, until recovered.
    pub eject: Option<Channel>,
    /// Set by a tool change; the next feed to the printhead is skipped.
    pub repeat_change_suppress: bool,
    /// Tool changes since the selector was last synchronised.
    pub tool_changes: u8,
}

/// The filament path of the unit: idler, selector, extruder drive and their
/// sensors.
///
/// # Type Parameters
///
/// - `S`: stepper driving each axis
/// - `P`: path sensors
/// - `T`: millisecond clock and busy-wait delay
/// - `O`: operator console
pub struct FilamentPath<S, P, T, O> {
    idler: SlotAxis<S>,
    selector: SlotAxis<S>,
    extruder: Axis<S>,
    sensors: P,
    clock: T,
    operator: O,
    extruder_config: ExtruderConfig,
    timeouts: Timeouts,
    printhead_sensor: PrintheadSensor,
    sync_interval: Option<u8>,
    eject: Option<Channel>,
    repeat_change_suppress: bool,
    tool_changes: u8,
}
impl<S, P, T, O> FilamentPath<S, P, T, O>
where
    S: Stepper,
    P: PathSensors,
    T: Clock + DelayNs,
    O: Operator,
{
    /// Creates a new `FilamentPath`.
    ///
    /// All drivers start disabled and nothing moves until
    /// [FilamentPath::start] homes the slotted axes.
    pub fn new(
        config: &Config,
        steppers: Steppers<S>,
        sensors: P,
        clock: T,
        operator: O,
    ) -> Self {
        Self {
            idler: SlotAxis::new(steppers.idler, &config.idler),
            selector: SlotAxis::new(steppers.selector, &config.selector),
            extruder: Axis::new(steppers.extruder),
            sensors,
            clock,
            operator,
            extruder_config: config.extruder,
            timeouts: config.timeouts,
            printhead_sensor: config.printhead_sensor,
            sync_interval: config.sync_interval,
            eject: None,
            repeat_change_suppress: false,
            tool_changes: 0,
        }
    }

    pub fn tool_state(&self) -> ToolState {
        ToolState {
            selector: self.selector.slot(),
            idler: self.idler.slot(),
            eject: self.eject,
            repeat_change_suppress: self.repeat_change_suppress,
            tool_changes: self.tool_changes,
        }
    }

    /// Returns `true` if filament is present at the selector sensor.
    pub fn selector_presence(&mut self) -> bool {
        self.sensors.selector_presence()
    }

    /// The operator console, for front-ends that log to it.
    pub fn console(&mut self) -> &mut O {
        &mut self.operator
    }

    /// Busy-waits for `ms` milliseconds.
    pub fn pause_ms(&mut self, ms: u32) {
        self.clock.delay_ms(ms);
    }

    /// Moves the idler to `slot`.
    pub fn move_idler(&mut self, slot: Slot) -> Result<(), Error> {
        self.idler.move_to(slot, || false)?;
        Ok(())
    }

    /// Moves the idler to park, releasing the filament.
    pub fn park_idler(&mut self) -> Result<(), Error> {
        self.move_idler(Slot::PARK)
    }

    /// Moves the selector to `slot`, unless filament is in the way.
    ///
    /// # Returns
    ///
    /// - `Ok(())`: if the selector moved.
    /// - `Err(Error::BlockingRecoveryRequired)`: if filament is present at
    ///   the selector sensor. Nothing moved.
    pub fn try_move_selector(&mut self, slot: Slot) -> Result<(), Error> {
        if self.sensors.selector_presence() {
            return Err(Error::BlockingRecoveryRequired);
        }
        let sensors = &mut self.sensors;
        let travel = self.selector.move_to(slot, || sensors.selector_home())?;
        if let (Travel::Gated(_), false) = (travel, slot.is_parked()) {
            warn!(self.operator, "Selector stopped early at the endstop.");
        }
        Ok(())
    }

    /// Moves the selector to `slot`, asking the operator to clear any
    /// filament in the way first.
    pub fn move_selector(&mut self, slot: Slot) -> Result<(), Error> {
        loop {
            match self.try_move_selector(slot) {
                Err(Error::BlockingRecoveryRequired) => {
                    self.operator_intervention(Error::BlockingRecoveryRequired)
                }
                result => return result,
            }
        }
    }

    /// Checks that the idler grips the filament the selector points at.
    fn check_alignment(&mut self) -> Result<(), Error> {
        let idler = self.idler.slot();
        if idler == self.selector.slot() || idler.is_parked() {
            Ok(())
        } else {
            error!(
                self.operator,
                "Idler at slot {} but selector at slot {}.",
                idler,
                self.selector.slot()
            );
            Err(Error::InvalidState)
        }
    }

    /// Moves the filament by `mm` millimetres; negative values retract.
    ///
    /// The extruder must already be enabled. With `stop_at_printhead` the
    /// move ends early once the printhead sensor asserts.
    fn feed(&mut self, mm: i32, stop_at_printhead: bool) -> Result<Travel, Error> {
        let distance = Steps::scaled(mm, self.extruder_config.steps_per_mm)
            .ok_or(Error::AxisFault)?;
        let sensors = &mut self.sensors;
        self.extruder
            .travel(distance, || stop_at_printhead && sensors.extruder_presence())
    }
}
