/// Time in microseconds.
#[derive(Debug, PartialEq, PartialOrd, Eq, Ord, Copy, Clone)]
pub struct MicroSeconds(u32);
impl MicroSeconds {
    /// Creates a new `MicroSeconds`.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the value as a `u32`.
    pub fn get_value(&self) -> u32 {
        self.0
    }
}

/// Time in milliseconds.
///
/// Used both for timeout lengths and for readings of the free-running
/// millisecond [crate::Clock]. Readings wrap around at `u32::MAX`, so elapsed
/// times must always be computed with [MilliSeconds::since].
#[derive(Debug, PartialEq, PartialOrd, Eq, Ord, Copy, Clone)]
pub struct MilliSeconds(u32);
impl MilliSeconds {
    /// Creates a new `MilliSeconds`.
    pub const fn new(value: u32) -> Self {
        Self(value)
    }

    /// Returns the value as a `u32`.
    pub fn get_value(&self) -> u32 {
        self.0
    }

    /// Time elapsed from an `earlier` clock reading until this one.
    ///
    /// Wrapping of the underlying counter is handled.
    pub fn since(&self, earlier: MilliSeconds) -> MilliSeconds {
        MilliSeconds(self.0.wrapping_sub(earlier.0))
    }
}
