//! Host-side doubles for the hardware collaborators.
//!
//! Compiled for unit tests only. Each double records what the code under
//! test did to it so tests can assert on exact port traffic, interrupt-flag
//! transitions or console output.

use crate::input::InputBuffer;
use pikku_hal::{Color, Console, Cpu, PortIo};
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex};

/// One recorded port access.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortAccess {
    /// A read from the port.
    Read(u16),
    /// A write of the value to the port.
    Write(u16, u8),
}

#[derive(Default)]
struct PortState {
    log: Vec<PortAccess>,
    scripted: HashMap<u16, VecDeque<u8>>,
}

/// Port bus that logs every access.
///
/// Clones share state, so a test can keep a handle after moving one into
/// the code under test. Reads return scripted values per port in order,
/// then zero.
#[derive(Clone, Default)]
pub struct RecordingPorts {
    state: Arc<Mutex<PortState>>,
}

impl RecordingPorts {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues `value` as the result of the next unscripted read of `port`.
    pub fn script_read(&self, port: u16, value: u8) {
        self.state
            .lock()
            .unwrap()
            .scripted
            .entry(port)
            .or_default()
            .push_back(value);
    }

    pub fn log(&self) -> Vec<PortAccess> {
        self.state.lock().unwrap().log.clone()
    }

    pub fn clear_log(&self) {
        self.state.lock().unwrap().log.clear();
    }
}

impl PortIo for RecordingPorts {
    fn read(&mut self, port: u16) -> u8 {
        let mut state = self.state.lock().unwrap();
        state.log.push(PortAccess::Read(port));
        state
            .scripted
            .get_mut(&port)
            .and_then(VecDeque::pop_front)
            .unwrap_or(0)
    }

    fn write(&mut self, port: u16, value: u8) {
        self.state
            .lock()
            .unwrap()
            .log
            .push(PortAccess::Write(port, value));
    }
}

/// Processor double that simulates keyboard interrupts.
///
/// Each `enable_and_wait` delivers the next scripted byte straight into the
/// input buffer, the way the keyboard interrupt would while the real
/// processor is halted. Waiting with nothing left to deliver panics instead
/// of hanging the test.
pub struct ScriptedCpu<'a> {
    input: &'a InputBuffer,
    script: RefCell<VecDeque<u8>>,
    enabled: Cell<bool>,
    critical_sections: Cell<usize>,
    waits: Cell<usize>,
    loaded_tables: RefCell<Vec<(usize, u16)>>,
}

impl<'a> ScriptedCpu<'a> {
    /// Starts with interrupts disabled, as after boot.
    pub fn new(input: &'a InputBuffer, script: &[u8]) -> Self {
        Self {
            input,
            script: RefCell::new(script.iter().copied().collect()),
            enabled: Cell::new(false),
            critical_sections: Cell::new(0),
            waits: Cell::new(0),
            loaded_tables: RefCell::new(Vec::new()),
        }
    }

    /// Number of times interrupts were disabled.
    pub fn critical_sections(&self) -> usize {
        self.critical_sections.get()
    }

    /// Number of low-power waits entered.
    pub fn waits(&self) -> usize {
        self.waits.get()
    }

    /// Every `(base, limit)` passed to `load_vector_table`.
    pub fn loaded_tables(&self) -> Vec<(usize, u16)> {
        self.loaded_tables.borrow().clone()
    }

    fn deliver(&self) {
        let byte = self
            .script
            .borrow_mut()
            .pop_front()
            .expect("waited for input but the script is exhausted");
        self.input.push_from_interrupt(byte);
    }
}

impl Cpu for ScriptedCpu<'_> {
    fn interrupts_enabled(&self) -> bool {
        self.enabled.get()
    }

    fn enable_interrupts(&self) {
        self.enabled.set(true);
    }

    fn disable_interrupts(&self) {
        self.critical_sections.set(self.critical_sections.get() + 1);
        self.enabled.set(false);
    }

    fn enable_and_wait(&self) {
        assert!(
            !self.enabled.get(),
            "enable_and_wait called with interrupts already enabled"
        );
        self.enabled.set(true);
        self.waits.set(self.waits.get() + 1);
        self.deliver();
    }

    fn wait(&self) {
        self.waits.set(self.waits.get() + 1);
    }

    unsafe fn load_vector_table(&self, base: usize, limit: u16) {
        self.loaded_tables.borrow_mut().push((base, limit));
    }
}

/// Console double that keeps the visible text.
#[derive(Default)]
pub struct TextConsole {
    text: String,
    backspaces: usize,
    clears: usize,
    colors: Vec<(Color, Color)>,
}

impl TextConsole {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written since the last clear, with backspaced characters
    /// removed.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn backspaces(&self) -> usize {
        self.backspaces
    }

    pub fn clears(&self) -> usize {
        self.clears
    }

    /// Color changes in order.
    pub fn colors(&self) -> &[(Color, Color)] {
        &self.colors
    }
}

impl Console for TextConsole {
    fn write_byte(&mut self, byte: u8) {
        self.text.push(char::from(byte));
    }

    fn backspace(&mut self) {
        self.text.pop();
        self.backspaces += 1;
    }

    fn clear(&mut self) {
        self.text.clear();
        self.clears += 1;
    }

    fn move_cursor(&mut self, _pos: u16) {}

    fn set_color(&mut self, foreground: Color, background: Color) {
        self.colors.push((foreground, background));
    }
}
