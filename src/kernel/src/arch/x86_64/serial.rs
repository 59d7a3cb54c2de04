//! Serial port driver for x86_64.
//!
//! Provides serial output via COM1 (0x3F8) for the logger and panics.

use core::fmt::{self, Write};
use spin::Mutex;
use uart_16550::SerialPort;

/// COM1 I/O port address.
const COM1_PORT: u16 = 0x3F8;

/// Global serial port instance, lazily initialized.
///
/// Only foreground code prints here; interrupt handlers never take this
/// lock.
pub static SERIAL: spin::Once<Mutex<SerialPort>> = spin::Once::new();

/// Initializes the global serial port.
///
/// Idempotent.
pub fn init() {
    SERIAL.call_once(|| {
        // SAFETY: COM1 is the standard first UART and nothing else in the
        // kernel drives it.
        let mut serial = unsafe { SerialPort::new(COM1_PORT) };
        serial.init();
        Mutex::new(serial)
    });
}

/// Prints to the serial port without a newline.
#[macro_export]
macro_rules! serial_print {
    ($($arg:tt)*) => {
        $crate::arch::x86_64::serial::_print(format_args!($($arg)*))
    };
}

/// Prints to the serial port with a newline.
#[macro_export]
macro_rules! serial_println {
    () => ($crate::serial_print!("\n"));
    ($($arg:tt)*) => ($crate::serial_print!("{}\n", format_args!($($arg)*)))
}

/// Internal print function used by macros.
#[doc(hidden)]
pub fn _print(args: fmt::Arguments) {
    init();
    if let Some(serial) = SERIAL.get() {
        // The UART writer never reports an error.
        let _ = serial.lock().write_fmt(args);
    }
}
