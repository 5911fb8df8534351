//! Per-unit calibration and behaviour settings.
//!
//! [Config::default] holds the values of the reference unit. A board passes
//! its own [Config] to [crate::FilamentPath::new]; afterwards only the
//! interactive calibration nudges change the coordinate tables and feed
//! lengths, and only for the running session.

use crate::slot::{CHANNELS, SLOTS};
use crate::{MicroSeconds, MilliSeconds};

/// Step pulse timing for one axis.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct PulseTiming {
    /// Time the step pin is held high.
    pub pulse_high: MicroSeconds,
    /// Time the step pin is held low after a pulse.
    pub pulse_low: MicroSeconds,
    /// Additional wait between pulses; sets the axis speed.
    pub interval: MicroSeconds,
    /// Wait before and after changing direction or enable state.
    pub settle: MicroSeconds,
}

/// Calibration of a slotted axis (idler or selector).
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct SlotAxisConfig {
    /// Absolute coordinate of each slot in full steps; the last entry is the
    /// park position and also the full travel of the axis.
    pub coordinates: [i32; SLOTS],
    /// Microsteps per full step.
    pub microsteps: u16,
    pub timing: PulseTiming,
}

/// Calibration of the filament drive.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct ExtruderConfig {
    /// Extruder steps per millimetre of filament.
    pub steps_per_mm: u16,
    /// Length from the selector sensor to the printer, per channel, in mm.
    pub feed_lengths: [i32; CHANNELS],
    /// Length fed past the selector sensor when loading without a tool
    /// change, in mm.
    pub load_after_sensor_mm: i32,
    /// Length retracted after the selector sensor clears, in mm.
    pub unload_clearance_mm: i32,
    /// Length fed to cross into the printhead drive gear, in mm.
    pub gear_mm: i32,
    /// Length pushed out (and pulled back) by eject / recover, in mm.
    pub eject_mm: i32,
    pub timing: PulseTiming,
}

/// Time limits on sensor-gated operations.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Timeouts {
    /// Loading to the selector sensor.
    pub load: MilliSeconds,
    /// Unloading until the selector sensor clears.
    pub unload: MilliSeconds,
    /// The printhead sensor staying asserted while unloading.
    pub stuck: MilliSeconds,
    /// Waiting for the printhead sensor after feeding into the gear.
    pub printhead_grace: MilliSeconds,
    /// Creeping towards a printhead sensor that sits before the gear, before
    /// asking the operator for help.
    pub printhead_feed: MilliSeconds,
}

/// Where (if anywhere) the printer reports filament at the printhead.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum PrintheadSensor {
    /// No printhead sensor is wired.
    None,
    /// The sensor reads ahead of the drive gear; feeds stop on it.
    BeforeGear,
    /// The sensor reads behind the drive gear; it asserts only once the
    /// printer has pulled the filament in.
    AfterGear,
}

/// Complete controller configuration.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Config {
    pub idler: SlotAxisConfig,
    pub selector: SlotAxisConfig,
    pub extruder: ExtruderConfig,
    pub timeouts: Timeouts,
    pub printhead_sensor: PrintheadSensor,
    /// Resynchronise the selector after this many tool changes.
    pub sync_interval: Option<u8>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            idler: SlotAxisConfig {
                coordinates: [14, 33, 55, 78, 101, 133],
                microsteps: 16,
                timing: PulseTiming {
                    pulse_high: MicroSeconds::new(10),
                    pulse_low: MicroSeconds::new(0),
                    interval: MicroSeconds::new(540),
                    settle: MicroSeconds::new(1000),
                },
            },
            selector: SlotAxisConfig {
                coordinates: [30, 377, 714, 1066, 1418, 1888],
                microsteps: 16,
                timing: PulseTiming {
                    pulse_high: MicroSeconds::new(10),
                    pulse_low: MicroSeconds::new(10),
                    interval: MicroSeconds::new(72),
                    settle: MicroSeconds::new(1500),
                },
            },
            extruder: ExtruderConfig {
                steps_per_mm: 177,
                feed_lengths: [600; CHANNELS],
                load_after_sensor_mm: 20,
                unload_clearance_mm: 30,
                gear_mm: 30,
                eject_mm: 100,
                timing: PulseTiming {
                    pulse_high: MicroSeconds::new(10),
                    pulse_low: MicroSeconds::new(10),
                    interval: MicroSeconds::new(60),
                    settle: MicroSeconds::new(1000),
                },
            },
            timeouts: Timeouts {
                load: MilliSeconds::new(10_000),
                unload: MilliSeconds::new(20_000),
                stuck: MilliSeconds::new(2_000),
                printhead_grace: MilliSeconds::new(2_000),
                printhead_feed: MilliSeconds::new(20_000),
            },
            printhead_sensor: PrintheadSensor::None,
            sync_interval: Some(5),
        }
    }
}
