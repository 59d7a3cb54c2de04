//! PikkuOS Hardware Abstraction Layer (HAL) traits.
//!
//! This crate defines the collaborators the kernel's input pipeline talks to:
//! raw port I/O, the character-cell display and the processor's interrupt
//! flag. The kernel core is written against these traits so it can run
//! unchanged on hardware and under host tests.

#![no_std]

/// Byte-granularity access to the x86 I/O address space.
///
/// Implementations for real hardware must only be constructed in ring 0.
pub trait PortIo {
    /// Reads one byte from `port`.
    fn read(&mut self, port: u16) -> u8;
    /// Writes one byte to `port`.
    fn write(&mut self, port: u16, value: u8);
}

/// VGA color codes.
///
/// Standard 16-color VGA palette for text mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Color {
    /// Black color.
    Black = 0,
    /// Blue color.
    Blue = 1,
    /// Green color.
    Green = 2,
    /// Cyan color.
    Cyan = 3,
    /// Red color.
    Red = 4,
    /// Magenta color.
    Magenta = 5,
    /// Brown color.
    Brown = 6,
    /// Light gray color.
    LightGray = 7,
    /// Dark gray color.
    DarkGray = 8,
    /// Light blue color.
    LightBlue = 9,
    /// Light green color.
    LightGreen = 10,
    /// Light cyan color.
    LightCyan = 11,
    /// Light red color.
    LightRed = 12,
    /// Pink color.
    Pink = 13,
    /// Yellow color.
    Yellow = 14,
    /// White color.
    White = 15,
}

/// Trait for a character-cell text console.
pub trait Console {
    /// Writes a single byte at the cursor and advances it.
    ///
    /// `b'\n'` moves the cursor to the start of the next line.
    fn write_byte(&mut self, byte: u8);

    /// Writes a string to the console.
    fn write_str(&mut self, s: &str) {
        for byte in s.bytes() {
            self.write_byte(byte);
        }
    }

    /// Moves the cursor back one cell and blanks it.
    fn backspace(&mut self);

    /// Clears the console screen and homes the cursor.
    fn clear(&mut self);

    /// Moves the cursor to the linear cell position `pos`.
    fn move_cursor(&mut self, pos: u16);

    /// Sets the foreground and background colors for subsequent writes.
    fn set_color(&mut self, foreground: Color, background: Color);
}

/// Trait for controlling the processor's interrupt flag and idle state.
pub trait Cpu {
    /// Returns whether maskable interrupts are currently enabled.
    fn interrupts_enabled(&self) -> bool;
    /// Globally enables interrupts.
    fn enable_interrupts(&self);
    /// Globally disables interrupts.
    fn disable_interrupts(&self);

    /// Atomically enables interrupts and idles until the next one arrives.
    ///
    /// Called with interrupts disabled; an interrupt that became pending
    /// while they were off wakes the processor immediately.
    fn enable_and_wait(&self);

    /// Idles until the next interrupt without touching the interrupt flag.
    fn wait(&self);

    /// Loads the interrupt vector table located at `base`.
    ///
    /// `limit` is the table size in bytes minus one.
    ///
    /// # Safety
    ///
    /// `base` must point to a complete, correctly formatted table that lives
    /// for the rest of the program. Every vector the hardware can raise must
    /// have a present gate.
    unsafe fn load_vector_table(&self, base: usize, limit: u16);

    /// Runs `f` with interrupts disabled, restoring the previous state after.
    fn without_interrupts<R, F: FnOnce() -> R>(&self, f: F) -> R
    where
        Self: Sized,
    {
        let enabled = self.interrupts_enabled();
        if enabled {
            self.disable_interrupts();
        }
        let result = f();
        if enabled {
            self.enable_interrupts();
        }
        result
    }
}
