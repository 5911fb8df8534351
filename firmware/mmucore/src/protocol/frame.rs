use ufmt_macros::uDebug;
use winnow::combinator::{alt, opt, preceded};
use winnow::token::{any, literal};
use winnow::{Parser, Result};

/// Argument value read when a frame ends right after its opcode.
pub const NO_ARGUMENT: i32 = -('0' as i32);

/// Commands sent by the printer.
///
/// Arguments are carried as the offset of the argument character from `'0'`,
/// so `T3` carries `3` and `T` with no argument carries [NO_ARGUMENT].
#[derive(Debug, uDebug, PartialEq, Eq, Clone, Copy)]
pub enum Command {
    /// `T<n>`: change to tool `n`.
    ToolChange(i32),
    /// `L<n>`: load channel `n` to the selector sensor and unload it again.
    LoadThenUnload(i32),
    /// `U`: unload.
    Unload,
    /// `C`: feed the filament into the printhead gear.
    FeedToPrinthead,
    /// `E<n>`: eject channel `n`.
    Eject(i32),
    /// `R`: recover after an eject.
    RecoverAfterEject,
    /// `P`: report the selector sensor.
    Presence,
    /// `S<n>`: identity queries.
    Query(i32),
    /// `F<n> <type>`: filament type; acknowledged only.
    FilamentType(i32),
    /// `M<n>`: driver mode.
    Mode(i32),
    /// `X`: reset.
    Reset,
    /// `W`: wait for the user.
    WaitForUser,
    /// `K<n>`: cut filament.
    Cut(i32),
}

/// Parses a command frame.
///
/// The frame is an opcode character and an optional argument character;
/// anything after them is left in `input`.
pub fn parse_command<'s>(input: &mut &'s str) -> Result<Command> {
    alt((
        preceded(literal("T"), parse_argument).map(Command::ToolChange),
        preceded(literal("L"), parse_argument).map(Command::LoadThenUnload),
        literal("U").value(Command::Unload),
        literal("C").value(Command::FeedToPrinthead),
        preceded(literal("E"), parse_argument).map(Command::Eject),
        literal("R").value(Command::RecoverAfterEject),
        literal("P").value(Command::Presence),
        preceded(literal("S"), parse_argument).map(Command::Query),
        preceded(literal("F"), parse_argument).map(Command::FilamentType),
        preceded(literal("M"), parse_argument).map(Command::Mode),
        literal("X").value(Command::Reset),
        literal("W").value(Command::WaitForUser),
        preceded(literal("K"), parse_argument).map(Command::Cut),
    ))
    .parse_next(input)
}

/// Parse the argument character as its offset from `'0'`.
pub fn parse_argument<'s>(input: &mut &'s str) -> Result<i32> {
    opt(any)
        .map(|c: Option<char>| match c {
            Some(c) => c as i32 - '0' as i32,
            None => NO_ARGUMENT,
        })
        .parse_next(input)
}

#[cfg(test)]
mod test {
    use super::*;
    use proptest::prelude::*;

    fn parse(text: &str) -> Option<Command> {
        let mut input = text;
        parse_command.parse_next(&mut input).ok()
    }

    #[test]
    fn test_opcodes() {
        assert_eq!(Some(Command::ToolChange(3)), parse("T3"));
        assert_eq!(Some(Command::LoadThenUnload(0)), parse("L0"));
        assert_eq!(Some(Command::Unload), parse("U0"));
        assert_eq!(Some(Command::FeedToPrinthead), parse("C0"));
        assert_eq!(Some(Command::Eject(4)), parse("E4"));
        assert_eq!(Some(Command::RecoverAfterEject), parse("R0"));
        assert_eq!(Some(Command::Presence), parse("P0"));
        assert_eq!(Some(Command::Query(2)), parse("S2"));
        assert_eq!(Some(Command::FilamentType(1)), parse("F1 2"));
        assert_eq!(Some(Command::Mode(1)), parse("M1"));
        assert_eq!(Some(Command::Reset), parse("X0"));
        assert_eq!(Some(Command::WaitForUser), parse("W0"));
        assert_eq!(Some(Command::Cut(2)), parse("K2"));
    }

    #[test]
    fn test_argument_offsets() {
        assert_eq!(Some(Command::ToolChange(9)), parse("T9"));
        assert_eq!(Some(Command::ToolChange(-1)), parse("T/"));
        assert_eq!(Some(Command::ToolChange(17)), parse("TA"));
        assert_eq!(Some(Command::ToolChange(NO_ARGUMENT)), parse("T"));
    }

    #[test]
    fn test_unknown_opcodes() {
        assert_eq!(None, parse(""));
        assert_eq!(None, parse("Z0"));
        assert_eq!(None, parse("t1"));
        assert_eq!(None, parse(" T1"));
    }

    #[test]
    fn test_trailing_input_is_left() {
        let mut input = "F3 1";
        assert_eq!(
            Some(Command::FilamentType(3)),
            parse_command.parse_next(&mut input).ok()
        );
        assert_eq!(" 1", input);
    }

    proptest! {
        #[test]
        fn test_tool_change_digits(n in 0u8..10) {
            let text = [b'T', b'0' + n];
            let text = core::str::from_utf8(&text).unwrap();
            assert_eq!(Some(Command::ToolChange(i32::from(n))), parse(text));
        }
    }
}
