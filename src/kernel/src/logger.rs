//! `log` backend writing to the serial port.
//!
//! Never log from interrupt context: the serial lock may be held by the
//! foreground code the interrupt preempted.

use core::fmt::{self, Write};
use log::{LevelFilter, Log, Metadata, Record, SetLoggerError};

/// `Log` implementation for serial
pub struct SerialLogger;

/// The static logger
pub static LOGGER: SerialLogger = SerialLogger;

impl SerialLogger {
    /// Installs the logger and sets the maximum level.
    pub fn init(&'static self, level: LevelFilter) -> Result<(), SetLoggerError> {
        log::set_logger(self)?;
        log::set_max_level(level);
        Ok(())
    }
}

impl Log for SerialLogger {
    fn enabled(&self, metadata: &Metadata) -> bool {
        metadata.level() <= log::max_level()
    }

    fn log(&self, record: &Record) {
        if !self.enabled(record.metadata()) {
            return;
        }
        #[cfg(target_arch = "x86_64")]
        {
            let _ = write_record(&mut SerialSink, record);
        }
    }

    fn flush(&self) {}
}

/// Formats one record as `[LEVEL] target: message`.
pub fn write_record(out: &mut impl Write, record: &Record) -> fmt::Result {
    writeln!(out, "[{}] {}: {}", record.level(), record.target(), record.args())
}

#[cfg(target_arch = "x86_64")]
struct SerialSink;

#[cfg(target_arch = "x86_64")]
impl Write for SerialSink {
    fn write_str(&mut self, s: &str) -> fmt::Result {
        crate::serial_print!("{}", s);
        Ok(())
    }
}
