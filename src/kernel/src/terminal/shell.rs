//! Interactive shell loop.

use super::commands::{self, Flow};
use crate::config::OS_NAME;
use crate::input::{InputBuffer, LineReader};
use pikku_hal::{Color, Console, Cpu};

/// The foreground shell: prompt, read a line, run it, repeat.
pub struct Terminal<'a, C: Console, U: Cpu> {
    console: C,
    reader: LineReader<'a, U>,
    cpu: &'a U,
    line_length: usize,
}

impl<'a, C: Console, U: Cpu> Terminal<'a, C, U> {
    /// Creates a shell reading up to `line_length - 1` characters per line.
    pub fn new(console: C, input: &'a InputBuffer, cpu: &'a U, line_length: usize) -> Self {
        Self {
            console,
            reader: LineReader::new(input, cpu),
            cpu,
            line_length,
        }
    }

    /// Clears the screen and prints the greeting.
    pub fn greet(&mut self) {
        self.console.clear();
        self.console.write_str("=== ");
        self.console.write_str(OS_NAME);
        self.console.write_str(" Terminal ===\n");
        self.console
            .write_str("Type 'help' for available commands\n\n");
    }

    /// Display the shell prompt.
    pub fn prompt(&mut self) {
        self.console.set_color(Color::LightGreen, Color::Black);
        self.console.write_str("pikku");
        self.console.set_color(Color::White, Color::Black);
        self.console.write_str("> ");
    }

    /// Runs one prompt/read/execute cycle.
    pub fn step(&mut self) -> Flow {
        self.prompt();
        let line = self.reader.read_line(&mut self.console, self.line_length);
        self.console.write_byte(b'\n');

        if line.is_empty() {
            return Flow::Continue;
        }
        log::trace!("command line: {:?}", line);
        commands::execute(&mut self.console, &line)
    }

    /// Greets, then serves commands until one asks to halt.
    ///
    /// After a halt the processor idles forever; keyboard interrupts are
    /// still taken but nothing reads the buffer any more.
    pub fn run(&mut self) -> ! {
        self.greet();
        while self.step() == Flow::Continue {}

        log::info!("shell halted");
        loop {
            self.cpu.wait();
        }
    }

    /// The console the shell writes to.
    pub fn console(&self) -> &C {
        &self.console
    }
}
