use ufmt::uWrite;

/// The person at the debug console.
///
/// Diagnostics are written to the operator through [uWrite], and typed
/// commands are read back byte by byte. When the controller cannot recover
/// from a fault on its own it blocks in [Operator::wait_for_acknowledgement]
/// until the operator has cleared the problem.
pub trait Operator: uWrite {
    /// Returns the next byte typed at the console, if there is one. Never
    /// blocks.
    fn read(&mut self) -> Option<u8>;

    /// Blocks until the operator acknowledges, then discards any input that
    /// is still pending.
    fn wait_for_acknowledgement(&mut self);
}
