/// Problems while assembling a line.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub enum LineError {
    /// The line did not fit in the buffer. Its remainder is discarded up to
    /// the next terminator.
    Overflow,
}

/// Assembles bytes from a serial link into lines.
///
/// A line ends at `\n` or `\r`; a `\r\n` pair ends only one line. Terminators
/// are not part of the line.
///
/// # Type Parameters
///
/// - `N`: capacity of the line buffer
pub struct LineBuffer<const N: usize> {
    buffer: heapless::String<N>,
    /// The buffer holds a line that has already been returned.
    complete: bool,
    /// Skipping the rest of an overflowed line.
    discarding: bool,
    last_was_cr: bool,
}
impl<const N: usize> LineBuffer<N> {
    pub fn new() -> Self {
        Self {
            buffer: heapless::String::new(),
            complete: false,
            discarding: false,
            last_was_cr: false,
        }
    }

    /// Adds a byte.
    ///
    /// # Returns
    ///
    /// - `Ok(Some(line))`: if the byte completed a line. The line may be
    ///   empty.
    /// - `Ok(None)`: if the line is not complete yet.
    /// - `Err(LineError::Overflow)`: if the line no longer fits; reported
    ///   once per line.
    pub fn push(&mut self, byte: u8) -> Result<Option<&str>, LineError> {
        if self.complete {
            self.buffer.clear();
            self.complete = false;
        }
        let after_cr = core::mem::replace(&mut self.last_was_cr, byte == b'\r');

        match byte {
            b'\n' if after_cr => Ok(None),
            b'\n' | b'\r' => {
                if core::mem::replace(&mut self.discarding, false) {
                    self.buffer.clear();
                    return Ok(None);
                }
                self.complete = true;
                Ok(Some(self.buffer.as_str()))
            }
            _ if self.discarding => Ok(None),
            _ => match self.buffer.push(char::from(byte)) {
                Ok(()) => Ok(None),
                Err(()) => {
                    self.buffer.clear();
                    self.discarding = true;
                    Err(LineError::Overflow)
                }
            },
        }
    }
}
impl<const N: usize> Default for LineBuffer<N> {
    fn default() -> Self {
        Self::new()
    }
}
