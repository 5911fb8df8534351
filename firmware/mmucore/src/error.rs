use core::fmt::{self, Display, Formatter};

use ufmt::{uDisplay, uWrite};
use ufmt_macros::uDebug;

/// Errors raised by filament path operations.
#[derive(Debug, uDebug, Copy, Clone, PartialEq, Eq)]
pub enum Error {
    /// A slot or channel number was out of range.
    InvalidArgument,
    /// The operation is not valid in the current tool state.
    InvalidState,
    /// Filament did not clear the selector sensor in time.
    UnloadTimeout,
    /// Filament did not reach the selector sensor in time.
    LoadTimeout,
    /// The printhead sensor stayed asserted while unloading.
    FilamentStuckAtPrinthead,
    /// The printhead sensor did not assert after feeding into the gear.
    PrintheadSensorTimeout,
    /// No filament is present at the selector sensor.
    NoFilamentPresent,
    /// Filament is already present at the selector sensor.
    FilamentAlreadyLoaded,
    /// A pulse train was requested with an impossible step count.
    AxisFault,
    /// Moving on would damage filament; an operator must intervene.
    BlockingRecoveryRequired,
}
impl Error {
    fn describe(&self) -> &'static str {
        match self {
            Error::InvalidArgument => "Invalid slot or channel.",
            Error::InvalidState => "Operation not valid in current state.",
            Error::UnloadTimeout => {
                "Filament stuck between the printer and the selector."
            }
            Error::LoadTimeout => "Filament not detected by selector sensor.",
            Error::FilamentStuckAtPrinthead => {
                "Filament not unloading, stuck in the printhead."
            }
            Error::PrintheadSensorTimeout => {
                "Filament not detected by printhead sensor."
            }
            Error::NoFilamentPresent => "No filament at selector sensor.",
            Error::FilamentAlreadyLoaded => "Filament already loaded.",
            Error::AxisFault => "Invalid step count.",
            Error::BlockingRecoveryRequired => {
                "Filament present in the selector, unload it."
            }
        }
    }
}
impl Display for Error {
    fn fmt(&self, f: &mut Formatter) -> fmt::Result {
        f.write_str(self.describe())
    }
}
impl uDisplay for Error {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        f.write_str(self.describe())
    }
}
