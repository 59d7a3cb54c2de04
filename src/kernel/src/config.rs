//! Compile-time kernel configuration.
//!
//! PikkuOS reads no files or environment at runtime; everything that can be
//! tuned lives in [`BootConfig::DEFAULT`].

use crate::interrupts::InterruptConfig;

/// Operating system name shown by the banner and `version`.
pub const OS_NAME: &str = "PikkuOS";

/// Operating system version shown by the banner and `version`.
pub const OS_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Capacity of the keyboard input ring buffer.
pub const INPUT_BUFFER_SIZE: usize = 256;

/// Capacity of a line, terminator slot included.
pub const LINE_BUFFER_SIZE: usize = 128;

/// Size of the command-name scratch area; one byte is reserved for the
/// terminator, so names are cut to `COMMAND_NAME_SIZE - 1` characters.
pub const COMMAND_NAME_SIZE: usize = 32;

/// Code segment selector of the kernel's flat code descriptor.
pub const KERNEL_CODE_SELECTOR: u16 = 0x08;

/// Boot-time configuration for the input pipeline.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootConfig {
    /// Controller remapping and the enabled device line.
    pub interrupts: InterruptConfig,
    /// Maximum line length passed to the line reader.
    pub line_length: usize,
    /// Maximum level forwarded to the serial logger.
    pub log_level: log::LevelFilter,
}

impl BootConfig {
    /// Configuration used by the bootable image.
    pub const DEFAULT: BootConfig = BootConfig {
        interrupts: InterruptConfig::DEFAULT,
        line_length: LINE_BUFFER_SIZE,
        #[cfg(debug_assertions)]
        log_level: log::LevelFilter::Trace,
        #[cfg(not(debug_assertions))]
        log_level: log::LevelFilter::Info,
    };
}

impl Default for BootConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}
