//! Console log macros.
//!
//! Each macro writes one prefixed line to a [ufmt::uWrite] sink. Write
//! errors are dropped: losing a log line must never stop the machine.
//!
//! The module is declared with `#[macro_use]` ahead of every user.

/// Write an info message, expanding its arguments.
macro_rules! info {
    ($out:expr, $($arg:tt)*) => {{
        let _ = ufmt::uwrite!($out, "INFO: ");
        let _ = ufmt::uwriteln!($out, $($arg)*);
    }};
}

/// Write a warning message, expanding its arguments.
macro_rules! warn {
    ($out:expr, $($arg:tt)*) => {{
        let _ = ufmt::uwrite!($out, "WARN: ");
        let _ = ufmt::uwriteln!($out, $($arg)*);
    }};
}

/// Write an error message, expanding its arguments.
macro_rules! error {
    ($out:expr, $($arg:tt)*) => {{
        let _ = ufmt::uwrite!($out, "ERROR: ");
        let _ = ufmt::uwriteln!($out, $($arg)*);
    }};
}
