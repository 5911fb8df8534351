//! Simulated rig for host tests.
//!
//! All simulated devices share one [SimState] behind an `Arc<Mutex<_>>`, so a
//! test can hand devices to the code under test and still inspect or poke the
//! rig afterwards through [Sim::state].
//!
//! The filament is modelled as a single tip position measured in extruder
//! steps. The selector sensor reads the tip at step zero; every extruder step
//! moves the tip. Each step pulse of any axis advances the simulated clock by
//! [STEP_TIME_US].

use std::collections::VecDeque;
use std::string::String;
use std::sync::{Arc, Mutex, MutexGuard};

use core::convert::Infallible;

use embedded_hal::delay::DelayNs;
use ufmt::uWrite;

use crate::config::Config;
use crate::path::Steppers;
use crate::{
    Clock, Direction, FilamentPath, MilliSeconds, Operator, PathSensors,
    Stepper,
};

/// Simulated time taken by a single step pulse.
pub const STEP_TIME_US: u64 = 100;

/// Extruder steps per millimetre of the reference configuration.
pub const STEPS_PER_MM: i64 = 177;

/// Simulated axes.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum SimAxis {
    Idler,
    Selector,
    Extruder,
}
impl SimAxis {
    fn index(&self) -> usize {
        match self {
            SimAxis::Idler => 0,
            SimAxis::Selector => 1,
            SimAxis::Extruder => 2,
        }
    }
}

/// State of one simulated axis.
#[derive(Debug, Clone)]
pub struct SimAxisState {
    /// Physical position in microsteps.
    pub position: i64,
    pub enabled: bool,
    /// Total number of pulses received.
    pub pulses: u64,
    /// Mechanical travel limits, if any.
    pub range: Option<(i64, i64)>,
}

/// Shared state of the simulated rig.
#[derive(Debug)]
pub struct SimState {
    axes: [SimAxisState; 3],
    /// Filament tip, in extruder steps; `None` if no filament is in the
    /// unit at all.
    pub filament: Option<i64>,
    /// Tip position at which the printhead sensor asserts.
    pub extruder_sensor_at: Option<i64>,
    /// Forces the selector sensor reading.
    pub selector_presence: Option<bool>,
    /// Forces the printhead sensor reading.
    pub extruder_presence: Option<bool>,
    /// Selector position at which the endstop engages.
    pub endstop: i64,
    pub clock_us: u64,
    /// Everything written to the operator console.
    pub console: String,
    /// Bytes typed at the operator console, not yet read.
    pub input: VecDeque<u8>,
    /// Number of operator acknowledgements so far.
    pub acks: u32,
    /// Run on every acknowledgement: the operator "fixing" the rig.
    pub on_ack: Option<fn(&mut SimState)>,
}
impl SimState {
    pub fn axis(&self, axis: SimAxis) -> &SimAxisState {
        &self.axes[axis.index()]
    }

    pub fn axis_mut(&mut self, axis: SimAxis) -> &mut SimAxisState {
        &mut self.axes[axis.index()]
    }

    /// Queues text typed at the operator console.
    pub fn type_text(&mut self, text: &str) {
        self.input.extend(text.bytes());
    }

    pub fn selector_presence(&self) -> bool {
        self.selector_presence
            .unwrap_or(matches!(self.filament, Some(tip) if tip >= 0))
    }

    pub fn extruder_presence(&self) -> bool {
        self.extruder_presence.unwrap_or(
            match (self.filament, self.extruder_sensor_at) {
                (Some(tip), Some(at)) => tip >= at,
                _ => false,
            },
        )
    }

    pub fn selector_home(&self) -> bool {
        self.axis(SimAxis::Selector).position >= self.endstop
    }

    /// Filament tip in whole millimetres.
    pub fn tip_mm(&self) -> Option<i64> {
        self.filament.map(|tip| tip.div_euclid(STEPS_PER_MM))
    }

    fn step(&mut self, axis: SimAxis, direction: Direction) {
        let delta = match direction {
            Direction::Positive => 1,
            Direction::Negative => -1,
        };
        let state = self.axis_mut(axis);
        let mut position = state.position + delta;
        if let Some((low, high)) = state.range {
            position = position.clamp(low, high);
        }
        state.position = position;
        state.pulses += 1;
        if axis == SimAxis::Extruder {
            if let Some(tip) = self.filament.as_mut() {
                *tip += delta;
            }
        }
        self.clock_us += STEP_TIME_US;
    }
}

/// Handle on the simulated rig.
#[derive(Clone)]
pub struct Sim(Arc<Mutex<SimState>>);
impl Sim {
    /// Creates a rig at power-on.
    ///
    /// Both slotted axes sit at zero, the filament tip waits 10 mm short of
    /// the selector sensor and the printhead sensor sits 580 mm past it.
    pub fn new() -> Self {
        let axis = |range| SimAxisState {
            position: 0,
            enabled: false,
            pulses: 0,
            range,
        };
        let selector_end = 1888 * 16;
        Sim(Arc::new(Mutex::new(SimState {
            axes: [
                axis(Some((0, 133 * 16))),
                axis(Some((0, selector_end))),
                axis(None),
            ],
            filament: Some(-10 * STEPS_PER_MM),
            extruder_sensor_at: Some(580 * STEPS_PER_MM),
            selector_presence: None,
            extruder_presence: None,
            endstop: selector_end,
            clock_us: 0,
            console: String::new(),
            input: VecDeque::new(),
            acks: 0,
            on_ack: None,
        })))
    }

    pub fn state(&self) -> MutexGuard<'_, SimState> {
        self.0.lock().unwrap()
    }

    pub fn stepper(&self, axis: SimAxis) -> TestStepper {
        TestStepper {
            sim: self.clone(),
            axis,
        }
    }

    pub fn sensors(&self) -> TestSensors {
        TestSensors(self.clone())
    }

    pub fn clock(&self) -> TestClock {
        TestClock(self.clone())
    }

    pub fn operator(&self) -> TestOperator {
        TestOperator(self.clone())
    }
}

/// Stepper which moves one axis of the rig.
pub struct TestStepper {
    sim: Sim,
    axis: SimAxis,
}
impl Stepper for TestStepper {
    fn set_enabled(&mut self, enabled: bool) {
        self.sim.state().axis_mut(self.axis).enabled = enabled;
    }

    fn step(&mut self, direction: Direction) {
        self.sim.state().step(self.axis, direction);
    }
}

pub struct TestSensors(Sim);
impl PathSensors for TestSensors {
    fn selector_presence(&mut self) -> bool {
        self.0.state().selector_presence()
    }

    fn extruder_presence(&mut self) -> bool {
        self.0.state().extruder_presence()
    }

    fn selector_home(&mut self) -> bool {
        self.0.state().selector_home()
    }
}

/// Clock and delay provider; delays advance simulated time.
pub struct TestClock(Sim);
impl Clock for TestClock {
    fn now(&self) -> MilliSeconds {
        MilliSeconds::new((self.0.state().clock_us / 1000) as u32)
    }
}
impl DelayNs for TestClock {
    fn delay_ns(&mut self, ns: u32) {
        self.0.state().clock_us += u64::from(ns) / 1000;
    }
}

pub struct TestOperator(Sim);
impl uWrite for TestOperator {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        self.0.state().console.push_str(s);
        Ok(())
    }
}
impl Operator for TestOperator {
    fn read(&mut self) -> Option<u8> {
        self.0.state().input.pop_front()
    }

    fn wait_for_acknowledgement(&mut self) {
        let mut state = self.0.state();
        state.input.clear();
        state.acks += 1;
        assert!(state.acks < 100, "operator asked too often");
        let on_ack = state.on_ack;
        if let Some(fix) = on_ack {
            fix(&mut state);
        }
    }
}

/// The filament path as wired to the simulated rig.
pub type TestPath =
    FilamentPath<TestStepper, TestSensors, TestClock, TestOperator>;

impl Sim {
    /// Builds a filament path on this rig. Nothing is homed.
    pub fn path(&self, config: &Config) -> TestPath {
        FilamentPath::new(
            config,
            Steppers {
                idler: self.stepper(SimAxis::Idler),
                selector: self.stepper(SimAxis::Selector),
                extruder: self.stepper(SimAxis::Extruder),
            },
            self.sensors(),
            self.clock(),
            self.operator(),
        )
    }

    /// Builds a filament path on this rig and runs its start-up sequence.
    pub fn started_path(&self, config: &Config) -> TestPath {
        let mut path = self.path(config);
        path.start();
        path
    }
}

/// Printer link that records every reply.
#[derive(Default)]
pub struct TestLink(pub String);
impl uWrite for TestLink {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        self.0.push_str(s);
        Ok(())
    }
}
