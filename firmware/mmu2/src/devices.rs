mod clock;
mod console;

pub use clock::BoardClock;
pub use console::Console;
