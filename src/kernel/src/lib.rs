//! PikkuOS Kernel
//!
//! A minimal interrupt-driven kernel: keyboard interrupts feed a ring
//! buffer, a line reader drains it, and a small shell runs the lines.
//!
//! # Architecture
//!
//! The kernel is structured into the following modules:
//! - `interrupts`: 8259 controllers, vector table and the dispatcher
//! - `input`: scan-code translation, input ring buffer and line reader
//! - `terminal`: shell loop and built-in commands
//! - `arch`: Platform-specific code (VGA, serial, port I/O, CPU control)
//!
//! Everything outside `arch` is written against the `pikku-hal` traits and
//! runs in host unit tests.
//!
//! # Safety
//!
//! This is a `#![no_std]` kernel. All unsafe code is documented with safety
//! invariants explaining why the usage is correct.

#![cfg_attr(not(test), no_std)]
#![cfg_attr(feature = "bare-metal", feature(abi_x86_interrupt))]
#![warn(missing_docs)]

pub mod arch;
pub mod boot;
pub mod config;
pub mod input;
pub mod interrupts;
pub mod logger;
pub mod selftest;
pub mod terminal;

#[cfg(test)]
mod testutil;

/// Initializes core kernel subsystems.
///
/// Brings up the serial port, the logger and the VGA console. Called first
/// thing in the boot process, before interrupts are set up.
pub fn init(config: &config::BootConfig) {
    #[cfg(target_arch = "x86_64")]
    {
        arch::x86_64::serial::init();
        arch::x86_64::vga::init();
    }
    if logger::LOGGER.init(config.log_level).is_err() {
        #[cfg(target_arch = "x86_64")]
        crate::serial_println!("logger already installed");
    }
}
