//! Keyboard interrupt wiring for the bootable image.
//!
//! The dispatcher and the vector table are set exactly once, by [`init`],
//! before the interrupt flag is raised. The trampoline only reads them.

use super::{PortBus, X86Cpu};
use crate::config::BootConfig;
use crate::interrupts::{Dispatcher, VectorTable};
use pikku_common::{InitError, TableError};
use pikku_hal::Cpu;
use spin::Once;
use x86_64::registers::segmentation::{Segment, CS};
use x86_64::structures::idt::InterruptStackFrame;

static DISPATCHER: Once<Dispatcher<PortBus>> = Once::new();
static VECTORS: Once<VectorTable> = Once::new();

/// Entry stub for the keyboard vector.
///
/// The `x86-interrupt` ABI saves and restores every register and returns
/// with `iretq`.
extern "x86-interrupt" fn keyboard_trampoline(_stack_frame: InterruptStackFrame) {
    if let Some(dispatcher) = DISPATCHER.get() {
        dispatcher.dispatch(dispatcher.keyboard_vector());
    }
}

/// Remaps the controllers, installs and loads the vector table, then
/// enables interrupts.
///
/// Must be called once, with interrupts disabled. Returns the dispatcher
/// whose input buffer the shell consumes.
pub fn init(config: &BootConfig, cpu: &X86Cpu) -> Result<&'static Dispatcher<PortBus>, InitError> {
    let dispatcher = DISPATCHER.try_call_once(|| {
        // SAFETY: Ring 0; the 8259 ports and the keyboard data port are
        // driven by the dispatcher alone from here on.
        let (controllers, keyboard) = unsafe { (PortBus::new(), PortBus::new()) };
        Dispatcher::bring_up(&config.interrupts, controllers, keyboard)
    })?;

    let vectors = VECTORS.try_call_once(|| {
        let mut table = VectorTable::new(CS::get_reg().0);
        table.install(
            usize::from(dispatcher.keyboard_vector()),
            keyboard_trampoline as usize,
        )?;
        Ok::<_, TableError>(table)
    })?;
    vectors.activate(cpu)?;

    cpu.enable_interrupts();
    log::info!("interrupts enabled");
    Ok(dispatcher)
}
