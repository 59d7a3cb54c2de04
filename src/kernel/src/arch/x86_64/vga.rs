//! VGA text mode driver for x86_64.
//!
//! Provides colored text output to the VGA text buffer at 0xB8000 with a
//! linear cursor mirrored to the hardware cursor.

use crate::arch::x86_64::PortBus;
use core::fmt;
use core::ptr;
use pikku_hal::{Color, Console, PortIo};
use spin::Mutex;

/// VGA text buffer memory-mapped I/O address.
const VGA_BUFFER_ADDR: usize = 0xB8000;

/// Number of rows in VGA text mode.
pub const BUFFER_HEIGHT: usize = 25;

/// Number of columns in VGA text mode.
pub const BUFFER_WIDTH: usize = 80;

/// CRT controller index register.
const CRTC_COMMAND_PORT: u16 = 0x3D4;
/// CRT controller data register.
const CRTC_DATA_PORT: u16 = 0x3D5;
/// CRTC index of the cursor location high byte.
const CURSOR_HIGH_BYTE: u8 = 14;
/// CRTC index of the cursor location low byte.
const CURSOR_LOW_BYTE: u8 = 15;

/// Combined foreground and background color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(transparent)]
struct ColorCode(u8);

impl ColorCode {
    const fn new(foreground: Color, background: Color) -> ColorCode {
        ColorCode((background as u8) << 4 | (foreground as u8))
    }
}

/// A single character cell in the VGA buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(C)]
struct ScreenChar {
    ascii_character: u8,
    color_code: ColorCode,
}

/// The VGA text buffer layout.
#[repr(transparent)]
pub struct Buffer {
    chars: [[ScreenChar; BUFFER_WIDTH]; BUFFER_HEIGHT],
}

/// Global VGA writer instance.
pub static WRITER: spin::Once<Mutex<Writer<PortBus>>> = spin::Once::new();

/// Initializes the global VGA writer.
///
/// Idempotent.
pub fn init() {
    WRITER.call_once(|| {
        // SAFETY: 0xB8000 is the colour text buffer, identity mapped by the
        // bootloader. The CRTC ports are only touched by this writer.
        Mutex::new(unsafe { Writer::new(VGA_BUFFER_ADDR as *mut Buffer, PortBus::new()) })
    });
}

/// VGA text mode writer.
///
/// The cursor is a linear cell index, `row * BUFFER_WIDTH + column`.
pub struct Writer<P: PortIo> {
    position: usize,
    color_code: ColorCode,
    buffer: *mut Buffer,
    ports: P,
}

// SAFETY: Writer only accesses the VGA buffer through volatile operations.
// The buffer is memory-mapped hardware that exists for the kernel's lifetime.
// Access is synchronized through the WRITER spinlock.
unsafe impl<P: PortIo + Send> Send for Writer<P> {}

impl<P: PortIo> Writer<P> {
    /// Creates a writer over `buffer`, driving the hardware cursor via
    /// `ports`.
    ///
    /// # Safety
    ///
    /// `buffer` must be valid for reads and writes for the writer's lifetime
    /// and not accessed through any other path.
    pub unsafe fn new(buffer: *mut Buffer, ports: P) -> Self {
        Writer {
            position: 0,
            color_code: ColorCode::new(Color::White, Color::Black),
            buffer,
            ports,
        }
    }

    /// Current linear cursor position.
    pub fn position(&self) -> usize {
        self.position
    }

    /// Returns the character stored in cell `(row, col)`.
    pub fn char_at(&self, row: usize, col: usize) -> u8 {
        self.read_cell(row * BUFFER_WIDTH + col).ascii_character
    }

    fn read_cell(&self, pos: usize) -> ScreenChar {
        let (row, col) = (pos / BUFFER_WIDTH, pos % BUFFER_WIDTH);
        // SAFETY: Callers keep pos below BUFFER_WIDTH * BUFFER_HEIGHT; the
        // buffer pointer is valid per `new`. Volatile because the VGA
        // buffer is memory-mapped I/O.
        unsafe { ptr::read_volatile(&(*self.buffer).chars[row][col]) }
    }

    fn write_cell(&mut self, pos: usize, byte: u8) {
        let (row, col) = (pos / BUFFER_WIDTH, pos % BUFFER_WIDTH);
        let cell = ScreenChar {
            ascii_character: byte,
            color_code: self.color_code,
        };
        // SAFETY: As for `read_cell`.
        unsafe { ptr::write_volatile(&mut (*self.buffer).chars[row][col], cell) }
    }

    /// Moves everything up one row and blanks the last one.
    fn scroll(&mut self) {
        for pos in BUFFER_WIDTH..BUFFER_WIDTH * BUFFER_HEIGHT {
            let cell = self.read_cell(pos);
            // SAFETY: pos - BUFFER_WIDTH is a valid cell.
            unsafe {
                let (row, col) = ((pos - BUFFER_WIDTH) / BUFFER_WIDTH, pos % BUFFER_WIDTH);
                ptr::write_volatile(&mut (*self.buffer).chars[row][col], cell);
            }
        }
        let last_row = (BUFFER_HEIGHT - 1) * BUFFER_WIDTH;
        for pos in last_row..last_row + BUFFER_WIDTH {
            self.write_cell(pos, b' ');
        }
        self.position = last_row;
    }

    fn new_line(&mut self) {
        self.position = (self.position / BUFFER_WIDTH + 1) * BUFFER_WIDTH;
        if self.position >= BUFFER_WIDTH * BUFFER_HEIGHT {
            self.scroll();
        }
    }

    fn sync_cursor(&mut self) {
        // The hardware cursor register holds a cell index below 2000.
        self.move_cursor(self.position as u16);
    }
}

impl<P: PortIo> Console for Writer<P> {
    fn write_byte(&mut self, byte: u8) {
        match byte {
            b'\n' => self.new_line(),
            byte => {
                let byte = match byte {
                    0x20..=0x7e => byte,
                    // Non-printable: show placeholder
                    _ => 0xfe,
                };
                self.write_cell(self.position, byte);
                self.position += 1;
                if self.position >= BUFFER_WIDTH * BUFFER_HEIGHT {
                    self.scroll();
                }
            }
        }
        self.sync_cursor();
    }

    fn backspace(&mut self) {
        if self.position > 0 {
            self.position -= 1;
            self.write_cell(self.position, b' ');
            self.sync_cursor();
        }
    }

    fn clear(&mut self) {
        for pos in 0..BUFFER_WIDTH * BUFFER_HEIGHT {
            self.write_cell(pos, b' ');
        }
        self.position = 0;
        self.sync_cursor();
    }

    fn move_cursor(&mut self, pos: u16) {
        let [high, low] = pos.to_be_bytes();
        self.ports.write(CRTC_COMMAND_PORT, CURSOR_HIGH_BYTE);
        self.ports.write(CRTC_DATA_PORT, high);
        self.ports.write(CRTC_COMMAND_PORT, CURSOR_LOW_BYTE);
        self.ports.write(CRTC_DATA_PORT, low);
    }

    fn set_color(&mut self, foreground: Color, background: Color) {
        self.color_code = ColorCode::new(foreground, background);
    }
}

impl<P: PortIo> fmt::Write for Writer<P> {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        Console::write_str(self, s);
        Ok(())
    }
}

/// Console handle over the global writer.
///
/// Takes the writer lock for each call, so it can be held by the shell
/// while panics and boot messages still get through.
#[derive(Debug, Clone, Copy, Default)]
pub struct VgaConsole;

impl VgaConsole {
    fn with<R>(f: impl FnOnce(&mut Writer<PortBus>) -> R) -> Option<R> {
        init();
        WRITER.get().map(|writer| f(&mut *writer.lock()))
    }
}

impl Console for VgaConsole {
    fn write_byte(&mut self, byte: u8) {
        Self::with(|w| w.write_byte(byte));
    }

    fn write_str(&mut self, s: &str) {
        Self::with(|w| Console::write_str(w, s));
    }

    fn backspace(&mut self) {
        Self::with(|w| w.backspace());
    }

    fn clear(&mut self) {
        Self::with(|w| w.clear());
    }

    fn move_cursor(&mut self, pos: u16) {
        Self::with(|w| w.move_cursor(pos));
    }

    fn set_color(&mut self, foreground: Color, background: Color) {
        Self::with(|w| w.set_color(foreground, background));
    }
}

/// Prints to the VGA buffer without a newline.
#[macro_export]
macro_rules! print {
    ($($arg:tt)*) => {
        $crate::arch::x86_64::vga::_print(format_args!($($arg)*))
    };
}

/// Prints to the VGA buffer with a newline.
#[macro_export]
macro_rules! println {
    () => ($crate::print!("\n"));
    ($($arg:tt)*) => ($crate::print!("{}\n", format_args!($($arg)*)))
}

/// Internal print function used by macros.
#[doc(hidden)]
pub fn _print(args: fmt::Arguments) {
    use fmt::Write;
    VgaConsole::with(|w| {
        let _ = w.write_fmt(args);
    });
}

/// Sets the VGA output color.
pub fn set_color(foreground: Color, background: Color) {
    VgaConsole.set_color(foreground, background);
}
