//! The printer link: line framing, command decoding and replies.
//!
//! Replies are bit-exact ASCII. A failed operation is answered with silence;
//! the printer notices the missing `ok` and asks the user for help, so the
//! only place failures are turned into silence is here.

mod frame;
mod line;

use embedded_hal::delay::DelayNs;
use ufmt::{uwrite, uWrite};
use winnow::Parser;

pub use frame::parse_argument;
pub use frame::parse_command;
pub use frame::Command;
pub use frame::NO_ARGUMENT;
pub use line::LineBuffer;
pub use line::LineError;

use crate::{
    Channel, Clock, Error, FilamentPath, Operator, PathSensors, Stepper,
};

/// Firmware version reported to `S1`.
pub const FW_VERSION: u16 = 90;

/// Build number reported to `S2`.
pub const FW_BUILD: u16 = 168;

/// Version banner for the console.
pub const BANNER: &str = "5.0  10/11/19";

/// Command engine for the printer link.
///
/// # Type Parameters
///
/// - `N`: capacity of the line buffer
pub struct Protocol<const N: usize> {
    line: LineBuffer<N>,
}
impl<const N: usize> Protocol<N> {
    pub fn new() -> Self {
        Self {
            line: LineBuffer::new(),
        }
    }

    /// Tells the printer that the unit is present. Sent once, after homing.
    pub fn announce<L: uWrite>(link: &mut L) {
        let _ = link.write_str("\nstart\n");
    }

    /// Feeds one byte received from the printer, handling the command it
    /// completes, if any.
    pub fn receive<L, S, P, T, O>(
        &mut self,
        byte: u8,
        link: &mut L,
        path: &mut FilamentPath<S, P, T, O>,
    ) where
        L: uWrite,
        S: Stepper,
        P: PathSensors,
        T: Clock + DelayNs,
        O: Operator,
    {
        match self.line.push(byte) {
            Ok(Some(line)) if !line.is_empty() => Self::handle(line, link, path),
            Ok(_) => {}
            Err(LineError::Overflow) => {
                error!(path.console(), "Printer link buffer overflow.")
            }
        }
    }

    /// Handles one complete command line and writes the reply.
    pub fn handle<L, S, P, T, O>(
        line: &str,
        link: &mut L,
        path: &mut FilamentPath<S, P, T, O>,
    ) where
        L: uWrite,
        S: Stepper,
        P: PathSensors,
        T: Clock + DelayNs,
        O: Operator,
    {
        let mut input = line;
        let command = match parse_command.parse_next(&mut input) {
            Ok(command) => command,
            Err(_) => {
                error!(path.console(), "Unrecognised printer command: \"{}\".", line);
                return;
            }
        };
        // The printer polls `P` continuously while loading.
        if command != Command::Presence {
            info!(path.console(), "Printer command: {}", line);
        }

        match command {
            Command::ToolChange(n) => {
                let result = channel(n).and_then(|c| path.tool_change(c));
                ack_on_success(link, path, result);
            }
            Command::LoadThenUnload(n) => {
                let result = channel(n).and_then(|c| path.load_then_unload(c));
                ack_on_success(link, path, result);
            }
            Command::Unload => {
                let result = path.unload();
                ack_on_success(link, path, result);
            }
            Command::FeedToPrinthead => {
                let result = path.feed_to_printhead().map(|_| ());
                ack_on_success(link, path, result);
            }
            Command::Eject(n) => {
                let result = channel(n).and_then(|c| path.eject(c));
                log_failure(path, result);
                ack(link);
            }
            Command::RecoverAfterEject => {
                let result = path.recover_after_eject();
                log_failure(path, result);
                ack(link);
            }
            Command::Presence => {
                let present = u8::from(path.selector_presence());
                let _ = uwrite!(link, "{}ok\n", present);
            }
            Command::Query(0) => ack(link),
            Command::Query(1) => {
                let _ = uwrite!(link, "{}ok\n", FW_VERSION);
            }
            Command::Query(2) => {
                info!(path.console(), "Printer link established.");
                let _ = uwrite!(link, "{}ok\n", FW_BUILD);
            }
            Command::Query(_) => {
                error!(path.console(), "Unable to process S command.")
            }
            Command::FilamentType(n) => {
                info!(path.console(), "Filament type selected: {}", n);
                ack(link);
            }
            Command::Mode(_)
            | Command::Reset
            | Command::WaitForUser
            | Command::Cut(_) => {
                warn!(path.console(), "Command not implemented: {:?}", command)
            }
        }
    }
}
impl<const N: usize> Default for Protocol<N> {
    fn default() -> Self {
        Self::new()
    }
}

fn channel(n: i32) -> Result<Channel, Error> {
    Channel::try_from(n)
}

fn ack<L: uWrite>(link: &mut L) {
    let _ = link.write_str("ok\n");
}

fn ack_on_success<L, S, P, T, O>(
    link: &mut L,
    path: &mut FilamentPath<S, P, T, O>,
    result: Result<(), Error>,
) where
    L: uWrite,
    S: Stepper,
    P: PathSensors,
    T: Clock + DelayNs,
    O: Operator,
{
    match result {
        Ok(()) => ack(link),
        Err(error) => error!(path.console(), "{}", error),
    }
}

fn log_failure<S, P, T, O>(
    path: &mut FilamentPath<S, P, T, O>,
    result: Result<(), Error>,
) where
    S: Stepper,
    P: PathSensors,
    T: Clock + DelayNs,
    O: Operator,
{
    if let Err(error) = result {
        error!(path.console(), "{}", error);
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::config::Config;
    use crate::sim::{Sim, SimAxis, TestLink, TestPath};
    use crate::Slot;

    fn send(path: &mut TestPath, line: &str) -> String {
        let mut link = TestLink::default();
        Protocol::<16>::handle(line, &mut link, path);
        link.0
    }

    #[test]
    fn test_announce() {
        let mut link = TestLink::default();
        Protocol::<16>::announce(&mut link);
        assert_eq!("\nstart\n", link.0);
    }

    #[test]
    fn test_identity_queries() {
        let sim = Sim::new();
        let mut path = sim.started_path(&Config::default());
        assert_eq!("ok\n", send(&mut path, "S0"));
        assert_eq!("90ok\n", send(&mut path, "S1"));
        assert_eq!("168ok\n", send(&mut path, "S2"));
        assert_eq!("", send(&mut path, "S3"));
        assert!(sim
            .state()
            .console
            .contains("ERROR: Unable to process S command.\n"));
    }

    #[test]
    fn test_presence() {
        let sim = Sim::new();
        let mut path = sim.started_path(&Config::default());
        assert_eq!("0ok\n", send(&mut path, "P0"));
        sim.state().filament = Some(0);
        assert_eq!("1ok\n", send(&mut path, "P0"));
        assert!(!sim.state().console.contains("Printer command: P0"));
    }

    #[test]
    fn test_tool_change() {
        let sim = Sim::new();
        let mut path = sim.started_path(&Config::default());
        assert_eq!("ok\n", send(&mut path, "T2"));
        assert_eq!(Slot::from(Channel::ALL[2]), path.tool_state().selector);
        assert!(sim.state().console.contains("INFO: Printer command: T2\n"));
    }

    #[test]
    fn test_tool_change_out_of_range_is_silent() {
        let sim = Sim::new();
        let mut path = sim.started_path(&Config::default());
        let pulses = sim.state().axis(SimAxis::Selector).pulses;
        assert_eq!("", send(&mut path, "T5"));
        assert_eq!("", send(&mut path, "T"));
        assert_eq!(pulses, sim.state().axis(SimAxis::Selector).pulses);
        assert!(sim
            .state()
            .console
            .contains("ERROR: Invalid slot or channel.\n"));
    }

    #[test]
    fn test_tool_change_failure_is_silent() {
        let sim = Sim::new();
        let mut path = sim.started_path(&Config::default());
        sim.state().filament = None;
        assert_eq!("", send(&mut path, "T1"));
    }

    #[test]
    fn test_feed_after_tool_change() {
        let sim = Sim::new();
        let mut path = sim.started_path(&Config::default());
        assert_eq!("ok\n", send(&mut path, "T0"));
        let pulses = sim.state().axis(SimAxis::Extruder).pulses;
        assert_eq!("ok\n", send(&mut path, "C0"));
        assert_eq!(pulses, sim.state().axis(SimAxis::Extruder).pulses);
        assert_eq!("ok\n", send(&mut path, "C0"));
        assert!(pulses < sim.state().axis(SimAxis::Extruder).pulses);
    }

    #[test]
    fn test_feed_without_filament_is_silent() {
        let sim = Sim::new();
        let mut path = sim.started_path(&Config::default());
        assert_eq!("", send(&mut path, "C0"));
    }

    #[test]
    fn test_unload_and_load_check() {
        let sim = Sim::new();
        let mut path = sim.started_path(&Config::default());
        assert_eq!("ok\n", send(&mut path, "U0"));
        assert_eq!("ok\n", send(&mut path, "L3"));
        assert_eq!(Slot::from(Channel::ALL[3]), path.tool_state().selector);
        assert_eq!("", send(&mut path, "L7"));
    }

    #[test]
    fn test_eject_and_recover_always_ack() {
        let sim = Sim::new();
        let mut path = sim.started_path(&Config::default());
        assert_eq!("ok\n", send(&mut path, "R0"));
        assert_eq!("ok\n", send(&mut path, "E9"));
        assert_eq!(None, path.tool_state().eject);
        assert_eq!("ok\n", send(&mut path, "E1"));
        assert_eq!(Some(Channel::ALL[1]), path.tool_state().eject);
        assert_eq!("ok\n", send(&mut path, "R0"));
        assert_eq!(None, path.tool_state().eject);
    }

    #[test]
    fn test_filament_type() {
        let sim = Sim::new();
        let mut path = sim.started_path(&Config::default());
        assert_eq!("ok\n", send(&mut path, "F1 2"));
        assert!(sim
            .state()
            .console
            .contains("INFO: Filament type selected: 1\n"));
    }

    #[test]
    fn test_unimplemented_commands_are_silent() {
        let sim = Sim::new();
        let mut path = sim.started_path(&Config::default());
        for line in ["M1", "X0", "W0", "K2"] {
            assert_eq!("", send(&mut path, line));
        }
        assert_eq!(4, sim.state().console.matches("WARN: Command not implemented").count());
    }

    #[test]
    fn test_unknown_command() {
        let sim = Sim::new();
        let mut path = sim.started_path(&Config::default());
        assert_eq!("", send(&mut path, "Q1"));
        assert!(sim
            .state()
            .console
            .contains("ERROR: Unrecognised printer command: \"Q1\".\n"));
    }

    #[test]
    fn test_receive_byte_stream() {
        let sim = Sim::new();
        let mut path = sim.started_path(&Config::default());
        let mut protocol: Protocol<8> = Protocol::new();
        let mut link = TestLink::default();
        for byte in b"S1\nS2\r\n\nP0\n" {
            protocol.receive(*byte, &mut link, &mut path);
        }
        assert_eq!("90ok\n168ok\n0ok\n", link.0);
    }

    #[test]
    fn test_receive_overflow() {
        let sim = Sim::new();
        let mut path = sim.started_path(&Config::default());
        let mut protocol: Protocol<4> = Protocol::new();
        let mut link = TestLink::default();
        for byte in b"S1111111\nS0\n" {
            protocol.receive(*byte, &mut link, &mut path);
        }
        assert_eq!("ok\n", link.0);
        assert!(sim
            .state()
            .console
            .contains("ERROR: Printer link buffer overflow.\n"));
    }
}
