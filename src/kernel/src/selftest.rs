//! Boot-time self checks.
//!
//! Run in the image before interrupts are enabled; a failure panics, which
//! prints the assertion to serial and the screen.

use crate::config::KERNEL_CODE_SELECTOR;
use crate::input::{scan_to_char, RingBuffer};
use crate::interrupts::{Gate, ProtectedModeGate, VectorTable};
use crate::terminal::{commands, Flow};
use pikku_hal::{Color, Console};

/// Runs all self checks.
pub fn run_all() {
    log::debug!("running self checks");

    check_scan_table();
    check_ring_eviction();
    check_gate_layout();
    check_dispatch();

    log::info!("all self checks passed");
}

fn check_scan_table() {
    assert_eq!(scan_to_char(0x1E), Some(b'a'));
    assert_eq!(scan_to_char(0x1C), Some(b'\n'));
    assert!((0x80..=0xFFu8).all(|code| scan_to_char(code).is_none()));
    log::trace!("scan table [ok]");
}

fn check_ring_eviction() {
    let mut ring = RingBuffer::<4>::new();
    for byte in 1..=5 {
        ring.push(byte);
    }
    assert_eq!(ring.pop(), Some(2));
    assert_eq!(ring.len(), 3);
    log::trace!("ring eviction [ok]");
}

fn check_gate_layout() {
    let gate = ProtectedModeGate::interrupt_gate(0x1234_5678, KERNEL_CODE_SELECTOR);
    assert_eq!(
        gate.map(|g| g.to_bytes()),
        Ok([0x78, 0x56, 0x08, 0x00, 0x00, 0x8E, 0x34, 0x12])
    );
    let table = VectorTable::<ProtectedModeGate>::new(KERNEL_CODE_SELECTOR);
    assert_eq!(table.descriptor().limit, 0x7FF);
    log::trace!("gate layout [ok]");
}

/// Counts what the dispatcher writes without touching the screen.
#[derive(Default)]
struct Tally {
    bytes: usize,
    newlines: usize,
}

impl Console for Tally {
    fn write_byte(&mut self, byte: u8) {
        self.bytes += 1;
        if byte == b'\n' {
            self.newlines += 1;
        }
    }

    fn backspace(&mut self) {}

    fn clear(&mut self) {}

    fn move_cursor(&mut self, _pos: u16) {}

    fn set_color(&mut self, _foreground: Color, _background: Color) {}
}

fn check_dispatch() {
    let mut tally = Tally::default();
    assert_eq!(commands::execute(&mut tally, "echo ok"), Flow::Continue);
    assert_eq!((tally.bytes, tally.newlines), (3, 1));

    let mut tally = Tally::default();
    commands::execute(&mut tally, "help");
    assert_eq!(tally.newlines, 2 + commands::COMMANDS.len());
    log::trace!("command dispatch [ok]");
}

#[cfg(test)]
mod tests {
    #[test]
    fn test_self_checks_pass_on_host() {
        super::run_all();
    }
}
