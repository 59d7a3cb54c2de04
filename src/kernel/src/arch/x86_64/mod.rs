//! x86_64 architecture support.
//!
//! Provides the HAL implementations for real hardware: port I/O through
//! `in`/`out`, the interrupt flag and `hlt`, the VGA text console and the
//! COM1 serial port.

#[cfg(feature = "bare-metal")]
pub mod interrupts;
pub mod serial;
pub mod vga;

pub use serial::SERIAL;
pub use vga::{VgaConsole, Writer, WRITER};

use pikku_hal::{Cpu, PortIo};
use x86_64::instructions::{interrupts as flag, port::Port, tables};
use x86_64::structures::DescriptorTablePointer;
use x86_64::VirtAddr;

/// Halts the CPU until the next interrupt.
///
/// Used in idle loops to reduce power consumption.
#[inline]
pub fn hlt() {
    x86_64::instructions::hlt();
}

/// Halts the CPU in an infinite loop.
///
/// Used after unrecoverable errors (panics).
pub fn halt_loop() -> ! {
    loop {
        hlt();
    }
}

/// The processor's I/O address space.
#[derive(Debug)]
pub struct PortBus {
    _private: (),
}

impl PortBus {
    /// Creates a handle to the I/O ports.
    ///
    /// # Safety
    ///
    /// Port accesses have arbitrary hardware side effects. The caller must
    /// run in ring 0 and make sure each device is driven by one owner.
    pub const unsafe fn new() -> Self {
        Self { _private: () }
    }
}

impl PortIo for PortBus {
    fn read(&mut self, port: u16) -> u8 {
        // SAFETY: Constructing a PortBus is the unsafe step; its owner
        // vouched for the ports it talks to.
        unsafe { Port::<u8>::new(port).read() }
    }

    fn write(&mut self, port: u16, value: u8) {
        // SAFETY: As for `read`.
        unsafe { Port::<u8>::new(port).write(value) }
    }
}

/// The bootstrap processor.
#[derive(Debug, Clone, Copy, Default)]
pub struct X86Cpu;

impl Cpu for X86Cpu {
    fn interrupts_enabled(&self) -> bool {
        flag::are_enabled()
    }

    fn enable_interrupts(&self) {
        flag::enable();
    }

    fn disable_interrupts(&self) {
        flag::disable();
    }

    fn enable_and_wait(&self) {
        // `sti; hlt`: the one-instruction interrupt shadow after `sti`
        // guarantees a pending interrupt wakes the `hlt`.
        flag::enable_and_hlt();
    }

    fn wait(&self) {
        hlt();
    }

    unsafe fn load_vector_table(&self, base: usize, limit: u16) {
        let pointer = DescriptorTablePointer {
            limit,
            base: VirtAddr::new(base as u64),
        };
        // SAFETY: Forwarded to the caller.
        unsafe { tables::lidt(&pointer) };
    }
}
