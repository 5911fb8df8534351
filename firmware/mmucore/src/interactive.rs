//! The debug console: single-line commands typed by an operator.
//!
//! Each line is one command; an empty line repeats the previous one.
//! Anything unrecognised prints the help text. Results and failures are
//! logged to the console; nothing is sent to the printer.

use embedded_hal::delay::DelayNs;
use ufmt::{uWrite, uwriteln};
use ufmt_macros::uDebug;
use winnow::combinator::{alt, preceded};
use winnow::token::literal;
use winnow::{Parser, Result};

use crate::protocol::{parse_argument, LineBuffer, LineError, BANNER};
use crate::{
    Channel, Clock, Error, FilamentPath, Operator, PathSensors, Slot, Stepper,
};

/// Full steps moved by one selector nudge.
const SELECTOR_NUDGE: i32 = 5;

/// Console commands.
#[derive(Debug, uDebug, PartialEq, Eq, Clone, Copy)]
pub enum ConsoleCommand {
    /// `+`
    NextTool,
    /// `-`
    PreviousTool,
    /// `A`
    ToolChangeCycle,
    /// `C`
    FeedToPrinthead,
    /// `D`
    LoadCycle,
    /// `I<n>`
    MoveIdler(i32),
    /// `I+` / `I-`
    NudgeIdler(i32),
    /// `L<n>`
    LoadThenUnload(i32),
    /// `P`
    Park,
    /// `S<n>`
    MoveSelector(i32),
    /// `S+` / `S-`
    NudgeSelector(i32),
    /// `T<n>`
    ToolChange(i32),
    /// `T+` / `T-`
    NudgeFeedLength(i32),
    /// `U`
    Unload,
    /// `Z`
    Status,
    /// Anything else.
    Help,
}

/// Second character of `I`, `S` and `T` commands.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
enum Setting {
    Up,
    Down,
    Target(i32),
}
impl Setting {
    fn nudge_or(
        self,
        step: i32,
        nudge: fn(i32) -> ConsoleCommand,
        target: fn(i32) -> ConsoleCommand,
    ) -> ConsoleCommand {
        match self {
            Setting::Up => nudge(step),
            Setting::Down => nudge(-step),
            Setting::Target(n) => target(n),
        }
    }
}

/// Parses a console line. Never fails: unknown input asks for help.
pub fn parse_console_command(line: &str) -> ConsoleCommand {
    parse_known.parse(line).unwrap_or(ConsoleCommand::Help)
}

fn parse_known<'s>(input: &mut &'s str) -> Result<ConsoleCommand> {
    use ConsoleCommand::*;
    alt((
        literal("+").value(NextTool),
        literal("-").value(PreviousTool),
        literal("A").value(ToolChangeCycle),
        literal("C").value(FeedToPrinthead),
        literal("D").value(LoadCycle),
        preceded(literal("I"), parse_setting)
            .map(|s| s.nudge_or(1, NudgeIdler, MoveIdler)),
        preceded(literal("L"), parse_argument).map(LoadThenUnload),
        literal("P").value(Park),
        preceded(literal("S"), parse_setting)
            .map(|s| s.nudge_or(SELECTOR_NUDGE, NudgeSelector, MoveSelector)),
        preceded(literal("T"), parse_setting)
            .map(|s| s.nudge_or(1, NudgeFeedLength, ToolChange)),
        literal("U").value(Unload),
        literal("Z").value(Status),
    ))
    .parse_next(input)
}

fn parse_setting<'s>(input: &mut &'s str) -> Result<Setting> {
    alt((
        literal("+").value(Setting::Up),
        literal("-").value(Setting::Down),
        parse_argument.map(Setting::Target),
    ))
    .parse_next(input)
}

/// The debug console front-end.
///
/// # Type Parameters
///
/// - `N`: capacity of the line buffer
pub struct Interactive<const N: usize> {
    line: LineBuffer<N>,
    last: heapless::String<N>,
}
impl<const N: usize> Interactive<N> {
    pub fn new() -> Self {
        Self {
            line: LineBuffer::new(),
            last: heapless::String::new(),
        }
    }

    /// Writes the start-up banner.
    pub fn greet<W: uWrite>(console: &mut W) {
        let _ = uwriteln!(console, "MMU2 {}", BANNER);
        let _ = uwriteln!(console, "Type a command; anything else shows help.");
    }

    /// Reads and handles everything typed at the console so far.
    pub fn poll<S, P, T, O>(&mut self, path: &mut FilamentPath<S, P, T, O>)
    where
        S: Stepper,
        P: PathSensors,
        T: Clock + DelayNs,
        O: Operator,
    {
        while let Some(byte) = path.console().read() {
            self.receive(byte, path);
        }
    }

    /// Feeds one typed byte, running the command it completes, if any.
    pub fn receive<S, P, T, O>(
        &mut self,
        byte: u8,
        path: &mut FilamentPath<S, P, T, O>,
    ) where
        S: Stepper,
        P: PathSensors,
        T: Clock + DelayNs,
        O: Operator,
    {
        let command = match self.line.push(byte) {
            Ok(Some(line)) => Self::recall(&mut self.last, line),
            Ok(None) => return,
            Err(LineError::Overflow) => {
                error!(path.console(), "Console buffer overflow.");
                return;
            }
        };
        run(command, path);
    }

    /// Handles one complete line.
    pub fn handle<S, P, T, O>(
        &mut self,
        line: &str,
        path: &mut FilamentPath<S, P, T, O>,
    ) where
        S: Stepper,
        P: PathSensors,
        T: Clock + DelayNs,
        O: Operator,
    {
        let command = Self::recall(&mut self.last, line);
        run(command, path);
    }

    /// Remembers a non-empty line and parses the line to run.
    fn recall(last: &mut heapless::String<N>, line: &str) -> ConsoleCommand {
        if !line.is_empty() {
            last.clear();
            // The line came out of a buffer of the same capacity.
            let _ = last.push_str(line);
        }
        parse_console_command(last.as_str())
    }
}
impl<const N: usize> Default for Interactive<N> {
    fn default() -> Self {
        Self::new()
    }
}

fn run<S, P, T, O>(command: ConsoleCommand, path: &mut FilamentPath<S, P, T, O>)
where
    S: Stepper,
    P: PathSensors,
    T: Clock + DelayNs,
    O: Operator,
{
    use ConsoleCommand::*;
    let result: core::result::Result<(), Error> = match command {
        NextTool => path.next_tool(),
        PreviousTool => path.previous_tool(),
        ToolChangeCycle => path.tool_change_cycle(),
        FeedToPrinthead => path.feed_to_printhead().map(|_| ()),
        LoadCycle => path.load_cycle(),
        MoveIdler(n) => Slot::try_from(n).and_then(|slot| path.move_idler(slot)),
        NudgeIdler(delta) => path.nudge_idler(delta),
        LoadThenUnload(n) => {
            Channel::try_from(n).and_then(|channel| path.load_then_unload(channel))
        }
        Park => path.park(),
        MoveSelector(n) => {
            Slot::try_from(n).and_then(|slot| path.move_selector(slot))
        }
        NudgeSelector(delta) => path.nudge_selector(delta),
        ToolChange(n) => {
            Channel::try_from(n).and_then(|channel| path.tool_change(channel))
        }
        NudgeFeedLength(delta) => path.nudge_feed_length(delta),
        Unload => path.unload(),
        Status => {
            path.report_status();
            return;
        }
        Help => {
            write_help(path.console());
            return;
        }
    };
    match result {
        Ok(()) => info!(path.console(), "{:?}: ok", command),
        Err(error) => error!(path.console(), "{:?}: {}", command, error),
    }
}

fn write_help<W: uWrite>(console: &mut W) {
    const HELP: [&str; 19] = [
        "Available commands:",
        "'+' - Select next tool.",
        "'-' - Select previous tool.",
        "'A' - Tool change cycle.",
        "'C' - Feed filament into the printhead.",
        "'D' - Load and unload every channel.",
        "'I0'-'I5' - Move idler to slot (5 = park).",
        "'I+' - Nudge idler coordinate of the current slot up.",
        "'I-' - Nudge idler coordinate of the current slot down.",
        "'L0'-'L4' - Load to the selector sensor and unload.",
        "'P' - Park idler, and selector if no filament is present.",
        "'S0'-'S5' - Move selector to slot (5 = park).",
        "'S+' - Nudge selector coordinate of the current slot up.",
        "'S-' - Nudge selector coordinate of the current slot down.",
        "'T0'-'T4' - Tool change.",
        "'T+' - Increase feed length of the current channel.",
        "'T-' - Decrease feed length of the current channel.",
        "'U' - Unload filament.",
        "'Z' - Status.",
    ];
    for line in HELP {
        let _ = uwriteln!(console, "{}", line);
    }
}
