use ufmt::{uDisplay, uWrite};
use ufmt_macros::uDebug;

use crate::Error;

/// Number of filament channels.
pub const CHANNELS: usize = 5;

/// Number of positions of a slotted axis: one per channel plus park.
pub const SLOTS: usize = CHANNELS + 1;

/// Logical position of a slotted axis (idler or selector).
///
/// Slots `0..=4` line up with a filament channel; slot `5` is parked.
#[derive(Debug, uDebug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub struct Slot(u8);
impl Slot {
    /// The parked (disengaged) slot.
    pub const PARK: Slot = Slot(CHANNELS as u8);

    /// Returns the slot as an index into a coordinate table.
    pub fn index(&self) -> usize {
        usize::from(self.0)
    }

    /// Returns `true` if this is the park slot.
    pub fn is_parked(&self) -> bool {
        *self == Slot::PARK
    }

    /// Returns the channel aligned with this slot, if any.
    pub fn channel(&self) -> Option<Channel> {
        Channel::try_from(i32::from(self.0)).ok()
    }
}
impl TryFrom<i32> for Slot {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self, Error> {
        match u8::try_from(value) {
            Ok(v) if usize::from(v) < SLOTS => Ok(Slot(v)),
            _ => Err(Error::InvalidArgument),
        }
    }
}
impl From<Channel> for Slot {
    fn from(channel: Channel) -> Self {
        Slot(channel.0)
    }
}
impl uDisplay for Slot {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        uDisplay::fmt(&self.0, f)
    }
}

/// Filament channel, `0..=4`.
#[derive(Debug, uDebug, PartialEq, Eq, PartialOrd, Ord, Clone, Copy)]
pub struct Channel(u8);
impl Channel {
    /// All channels in order.
    pub const ALL: [Channel; CHANNELS] =
        [Channel(0), Channel(1), Channel(2), Channel(3), Channel(4)];

    /// Returns the channel as an index into a per-channel table.
    pub fn index(&self) -> usize {
        usize::from(self.0)
    }

    /// The following channel, wrapping from the last back to the first.
    pub fn next(&self) -> Channel {
        Channel((self.0 + 1) % CHANNELS as u8)
    }

    /// The preceding channel, wrapping from the first to the last.
    pub fn previous(&self) -> Channel {
        Channel((self.0 + CHANNELS as u8 - 1) % CHANNELS as u8)
    }
}
impl TryFrom<i32> for Channel {
    type Error = Error;

    fn try_from(value: i32) -> Result<Self, Error> {
        match u8::try_from(value) {
            Ok(v) if usize::from(v) < CHANNELS => Ok(Channel(v)),
            _ => Err(Error::InvalidArgument),
        }
    }
}
impl uDisplay for Channel {
    fn fmt<W>(&self, f: &mut ufmt::Formatter<'_, W>) -> Result<(), W::Error>
    where
        W: uWrite + ?Sized,
    {
        uDisplay::fmt(&self.0, f)
    }
}
