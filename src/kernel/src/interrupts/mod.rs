//! Hardware interrupt plumbing.
//!
//! - `pic`: the cascaded 8259 controllers
//! - `table`: the interrupt vector table
//!
//! [`Dispatcher`] is what the keyboard trampoline calls into. It owns the
//! controllers, the keyboard data port and the input buffer, and is built
//! once by the start-up routine before interrupts are enabled.

pub mod pic;
pub mod table;

pub use pic::ChainedControllers;
pub use table::{Gate, LongModeGate, NativeGate, ProtectedModeGate, TableDescriptor, VectorTable};

use crate::input::{scan_to_char, InputBuffer};
use pikku_common::ControllerError;
use pikku_hal::PortIo;
use spin::Mutex;

/// PS/2 keyboard data port.
pub const KEYBOARD_DATA_PORT: u16 = 0x60;

/// Controller layout used at start-up.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InterruptConfig {
    /// First vector raised by the master (IRQ 0).
    pub master_offset: u8,
    /// First vector raised by the slave (IRQ 8).
    pub slave_offset: u8,
    /// Request line of the keyboard; the only line left unmasked.
    pub keyboard_irq: u8,
}

impl InterruptConfig {
    /// IRQs 0-15 on vectors 0x20-0x2F, keyboard on IRQ 1.
    pub const DEFAULT: InterruptConfig = InterruptConfig {
        master_offset: 0x20,
        slave_offset: 0x28,
        keyboard_irq: 1,
    };
}

impl Default for InterruptConfig {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Interrupt-context entry point.
///
/// Everything reachable from [`dispatch`](Self::dispatch) is bounded and
/// never waits: one port read, one table lookup, one buffer push and one
/// acknowledgment. Nothing here logs or draws.
pub struct Dispatcher<P: PortIo> {
    controllers: Mutex<ChainedControllers<P>>,
    // Locked only from interrupt context.
    keyboard: Mutex<P>,
    keyboard_vector: u8,
    input: InputBuffer,
}

impl<P: PortIo> Dispatcher<P> {
    /// Remaps the controllers and leaves only the keyboard line enabled.
    ///
    /// Must run with interrupts disabled.
    pub fn bring_up(
        config: &InterruptConfig,
        controller_ports: P,
        keyboard_ports: P,
    ) -> Result<Self, ControllerError> {
        let mut controllers = ChainedControllers::new(controller_ports);
        controllers.remap(config.master_offset, config.slave_offset)?;
        controllers.enable_only(config.keyboard_irq)?;
        let keyboard_vector = controllers.vector_for(config.keyboard_irq)?;

        log::info!(
            "keyboard on IRQ {} -> vector {:#04x}",
            config.keyboard_irq,
            keyboard_vector
        );

        Ok(Self {
            controllers: Mutex::new(controllers),
            keyboard: Mutex::new(keyboard_ports),
            keyboard_vector,
            input: InputBuffer::new(),
        })
    }

    /// Handles one interrupt on `vector`.
    ///
    /// For the keyboard vector the pending scan code is always read (the
    /// controller latches the next one only after that), translated, and
    /// pushed if it maps to a character. Every vector in the controllers'
    /// range is then acknowledged, whether or not it produced anything.
    pub fn dispatch(&self, vector: u8) {
        if vector == self.keyboard_vector {
            let code = self.keyboard.lock().read(KEYBOARD_DATA_PORT);
            if let Some(byte) = scan_to_char(code) {
                self.input.push_from_interrupt(byte);
            }
        }

        self.controllers.lock().acknowledge(vector);
    }

    /// The consumer side of the keyboard buffer.
    pub fn input(&self) -> &InputBuffer {
        &self.input
    }

    /// Vector the keyboard line was mapped to.
    pub fn keyboard_vector(&self) -> u8 {
        self.keyboard_vector
    }
}
