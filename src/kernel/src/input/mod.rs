//! Keyboard input path: scan code translation, the interrupt-fed ring
//! buffer and the foreground line reader.

pub mod line;
pub mod ring;
pub mod scancode;

pub use line::{Line, LineReader};
pub use ring::{InputBuffer, RingBuffer};
pub use scancode::scan_to_char;
