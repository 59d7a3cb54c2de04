//! Blocking line reader on top of the input buffer.

use super::ring::InputBuffer;
use super::scancode::{BACKSPACE, LINE_FEED};
use crate::config::LINE_BUFFER_SIZE;
use core::fmt;
use core::ops::Deref;
use pikku_hal::{Console, Cpu};

/// A bounded line of printable ASCII text.
///
/// Holds at most `LINE_BUFFER_SIZE - 1` characters; never contains the
/// line terminator or NUL.
#[derive(Clone)]
pub struct Line {
    bytes: [u8; LINE_BUFFER_SIZE],
    len: usize,
}

impl Line {
    /// Creates an empty line.
    pub const fn new() -> Self {
        Self {
            bytes: [0; LINE_BUFFER_SIZE],
            len: 0,
        }
    }

    /// Returns the line as a string slice.
    pub fn as_str(&self) -> &str {
        // Only printable ASCII is ever stored.
        core::str::from_utf8(&self.bytes[..self.len]).unwrap_or_default()
    }

    /// Number of characters in the line.
    pub const fn len(&self) -> usize {
        self.len
    }

    /// Returns `true` if the line has no characters.
    pub const fn is_empty(&self) -> bool {
        self.len == 0
    }

    fn push(&mut self, byte: u8) {
        self.bytes[self.len] = byte;
        self.len += 1;
    }

    fn pop(&mut self) -> Option<u8> {
        if self.len == 0 {
            return None;
        }
        self.len -= 1;
        Some(self.bytes[self.len])
    }
}

impl Default for Line {
    fn default() -> Self {
        Self::new()
    }
}

impl PartialEq for Line {
    fn eq(&self, other: &Self) -> bool {
        self.as_str() == other.as_str()
    }
}

impl Eq for Line {}

impl Deref for Line {
    type Target = str;

    fn deref(&self) -> &str {
        self.as_str()
    }
}

impl fmt::Debug for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self.as_str(), f)
    }
}

impl fmt::Display for Line {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Reads edited lines from the keyboard input buffer.
///
/// Echo and backspace editing happen here, in foreground context; the
/// interrupt handler only captures bytes.
pub struct LineReader<'a, C: Cpu> {
    input: &'a InputBuffer,
    cpu: &'a C,
}

impl<'a, C: Cpu> LineReader<'a, C> {
    /// Creates a reader consuming `input`.
    pub fn new(input: &'a InputBuffer, cpu: &'a C) -> Self {
        Self { input, cpu }
    }

    /// Reads one line of at most `max_len - 1` characters.
    ///
    /// Blocks in a low-power wait while the buffer is empty. Returns on a
    /// line feed (not included in the result) or as soon as `max_len - 1`
    /// characters are collected, leaving any further input buffered.
    /// `max_len` is clamped to [`LINE_BUFFER_SIZE`]; zero returns an empty
    /// line without consuming anything.
    pub fn read_line(&self, console: &mut impl Console, max_len: usize) -> Line {
        let mut line = Line::new();
        let limit = max_len.min(LINE_BUFFER_SIZE);
        if limit == 0 {
            return line;
        }

        while line.len() < limit - 1 {
            match self.input.pop_blocking(self.cpu) {
                LINE_FEED => return line,
                BACKSPACE => {
                    if line.pop().is_some() {
                        console.backspace();
                    }
                }
                byte @ 0x20..=0x7e => {
                    line.push(byte);
                    console.write_byte(byte);
                }
                _ => {}
            }
        }

        line
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testutil::{ScriptedCpu, TextConsole};

    fn preload(input: &InputBuffer, bytes: &[u8]) {
        for &b in bytes {
            input.push_from_interrupt(b);
        }
    }

    #[test]
    fn test_reads_until_line_feed() {
        let input = InputBuffer::new();
        let cpu = ScriptedCpu::new(&input, b"");
        cpu.enable_interrupts();
        preload(&input, b"hi\n");

        let mut console = TextConsole::new();
        let line = LineReader::new(&input, &cpu).read_line(&mut console, 128);

        assert_eq!(line.as_str(), "hi");
        assert_eq!(line.len(), 2);
        assert_eq!(input.available(&cpu), 0);
        assert_eq!(console.text(), "hi");
    }

    #[test]
    fn test_backspace_erases() {
        let input = InputBuffer::new();
        let cpu = ScriptedCpu::new(&input, b"");
        cpu.enable_interrupts();
        preload(&input, b"hi\x08\x08\n");

        let mut console = TextConsole::new();
        let line = LineReader::new(&input, &cpu).read_line(&mut console, 128);

        assert_eq!(line.as_str(), "");
        assert_eq!(console.backspaces(), 2);
        assert_eq!(console.text(), "");
    }

    #[test]
    fn test_backspace_on_empty_line_is_ignored() {
        let input = InputBuffer::new();
        let cpu = ScriptedCpu::new(&input, b"");
        cpu.enable_interrupts();
        preload(&input, b"\x08a\n");

        let mut console = TextConsole::new();
        let line = LineReader::new(&input, &cpu).read_line(&mut console, 128);

        assert_eq!(line.as_str(), "a");
        assert_eq!(console.backspaces(), 0);
    }

    #[test]
    fn test_truncates_at_max_len_minus_one() {
        let input = InputBuffer::new();
        let cpu = ScriptedCpu::new(&input, b"");
        cpu.enable_interrupts();
        preload(&input, b"abcdef\n");

        let mut console = TextConsole::new();
        let line = LineReader::new(&input, &cpu).read_line(&mut console, 3);

        assert_eq!(line.as_str(), "ab");
        assert_eq!(input.available(&cpu), 5);
        let rest: Vec<u8> = core::iter::from_fn(|| input.pop(&cpu)).collect();
        assert_eq!(rest, b"cdef\n");
    }

    #[test]
    fn test_non_printable_dropped() {
        let input = InputBuffer::new();
        let cpu = ScriptedCpu::new(&input, b"");
        cpu.enable_interrupts();
        preload(&input, b"a\x01\x7f\tb\n");

        let mut console = TextConsole::new();
        let line = LineReader::new(&input, &cpu).read_line(&mut console, 128);

        assert_eq!(line.as_str(), "ab");
        assert_eq!(console.text(), "ab");
    }

    #[test]
    fn test_waits_for_keys_as_they_arrive() {
        let input = InputBuffer::new();
        let cpu = ScriptedCpu::new(&input, b"ls\n");
        cpu.enable_interrupts();

        let mut console = TextConsole::new();
        let line = LineReader::new(&input, &cpu).read_line(&mut console, 128);

        assert_eq!(line.as_str(), "ls");
        assert_eq!(cpu.waits(), 3);
        assert!(cpu.interrupts_enabled());
    }

    #[test]
    fn test_zero_max_len_consumes_nothing() {
        let input = InputBuffer::new();
        let cpu = ScriptedCpu::new(&input, b"");
        cpu.enable_interrupts();
        preload(&input, b"x\n");

        let mut console = TextConsole::new();
        let line = LineReader::new(&input, &cpu).read_line(&mut console, 0);

        assert!(line.is_empty());
        assert_eq!(input.available(&cpu), 2);
    }

    #[test]
    fn test_each_call_starts_fresh() {
        let input = InputBuffer::new();
        let cpu = ScriptedCpu::new(&input, b"");
        cpu.enable_interrupts();
        preload(&input, b"one\ntwo\n");

        let mut console = TextConsole::new();
        let reader = LineReader::new(&input, &cpu);
        assert_eq!(reader.read_line(&mut console, 128).as_str(), "one");
        assert_eq!(reader.read_line(&mut console, 128).as_str(), "two");
    }

    #[test]
    fn test_equality_ignores_erased_bytes() {
        let input = InputBuffer::new();
        let cpu = ScriptedCpu::new(&input, b"");
        cpu.enable_interrupts();
        preload(&input, b"ab\x08\na\n");

        let mut console = TextConsole::new();
        let reader = LineReader::new(&input, &cpu);
        let edited = reader.read_line(&mut console, 128);
        let typed = reader.read_line(&mut console, 128);
        assert_eq!(edited, typed);
        assert_ne!(edited, Line::new());
    }

    #[test]
    fn test_max_len_clamped_to_capacity() {
        let input = InputBuffer::new();
        let cpu = ScriptedCpu::new(&input, b"");
        cpu.enable_interrupts();
        for _ in 0..200 {
            input.push_from_interrupt(b'z');
        }

        let mut console = TextConsole::new();
        let line = LineReader::new(&input, &cpu).read_line(&mut console, 1000);

        assert_eq!(line.len(), LINE_BUFFER_SIZE - 1);
        assert_eq!(input.available(&cpu), 200 - (LINE_BUFFER_SIZE - 1));
    }
}
