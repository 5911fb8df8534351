use crate::MilliSeconds;

/// Free-running millisecond time source.
pub trait Clock {
    /// Returns the current reading. Readings wrap around.
    fn now(&self) -> MilliSeconds;
}

/// Time limit measured against a [Clock].
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct Deadline {
    start: MilliSeconds,
    length: MilliSeconds,
}
impl Deadline {
    /// Starts a deadline which expires `length` from now.
    pub fn start<C: Clock + ?Sized>(clock: &C, length: MilliSeconds) -> Self {
        Self {
            start: clock.now(),
            length,
        }
    }

    /// Restarts the deadline from now, keeping its length.
    pub fn restart<C: Clock + ?Sized>(&mut self, clock: &C) {
        self.start = clock.now();
    }

    /// Time elapsed since the deadline was (re)started.
    pub fn elapsed<C: Clock + ?Sized>(&self, clock: &C) -> MilliSeconds {
        clock.now().since(self.start)
    }

    /// Returns `true` once strictly more than the length has elapsed.
    pub fn expired<C: Clock + ?Sized>(&self, clock: &C) -> bool {
        self.elapsed(clock) > self.length
    }
}
