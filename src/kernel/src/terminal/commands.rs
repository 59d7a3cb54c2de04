//! Built-in shell commands.
//!
//! Commands live in a static table scanned in declaration order; the first
//! entry whose name matches the command token exactly wins.

use crate::config::{COMMAND_NAME_SIZE, OS_NAME, OS_VERSION};
use pikku_hal::{Color, Console};

/// What the shell loop does after a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    /// Show the next prompt.
    Continue,
    /// Stop reading input and idle forever.
    Halt,
}

/// Signature of a command handler: the console and the argument string.
pub type Handler = fn(&mut dyn Console, &str) -> Flow;

/// One entry of a command table.
#[derive(Clone, Copy)]
pub struct CommandEntry {
    /// Exact, case-sensitive name typed at the prompt.
    pub name: &'static str,
    /// Invoked with everything after the name, leading spaces removed.
    pub handler: Handler,
    /// One-line summary shown by `help`.
    pub description: &'static str,
}

/// The built-in commands.
pub static COMMANDS: &[CommandEntry] = &[
    CommandEntry {
        name: "echo",
        handler: cmd_echo,
        description: "Display the provided text",
    },
    CommandEntry {
        name: "clear",
        handler: cmd_clear,
        description: "Clear the screen",
    },
    CommandEntry {
        name: "help",
        handler: cmd_help,
        description: "Display available commands",
    },
    CommandEntry {
        name: "version",
        handler: cmd_version,
        description: "Display OS version",
    },
    CommandEntry {
        name: "shutdown",
        handler: cmd_shutdown,
        description: "Prepare system for shutdown",
    },
];

/// Runs `line` against the built-in table.
pub fn execute(console: &mut dyn Console, line: &str) -> Flow {
    execute_with(COMMANDS, console, line)
}

/// Runs `line` against `table`.
///
/// Blank lines do nothing. The command name is cut to
/// `COMMAND_NAME_SIZE - 1` characters before lookup, so an overlong token
/// can only match (or be reported as) its prefix.
pub fn execute_with(table: &[CommandEntry], console: &mut dyn Console, line: &str) -> Flow {
    let line = line.trim_start_matches(' ');
    if line.is_empty() {
        return Flow::Continue;
    }

    let (token, args) = line.split_once(' ').unwrap_or((line, ""));
    let name = truncate_name(token);
    let args = args.trim_start_matches(' ');

    match table.iter().find(|entry| entry.name == name) {
        Some(entry) => (entry.handler)(console, args),
        None => {
            console.set_color(Color::LightRed, Color::Black);
            console.write_str("Unknown command: '");
            console.write_str(name);
            console.write_str("'\n");
            console.set_color(Color::White, Color::Black);
            console.write_str("Type 'help' for available commands\n");
            Flow::Continue
        }
    }
}

fn truncate_name(token: &str) -> &str {
    match token.char_indices().nth(COMMAND_NAME_SIZE - 1) {
        Some((end, _)) => &token[..end],
        None => token,
    }
}

fn cmd_echo(console: &mut dyn Console, args: &str) -> Flow {
    if args.is_empty() {
        console.write_str("Usage: echo <text>\n");
    } else {
        console.write_str(args);
        console.write_byte(b'\n');
    }
    Flow::Continue
}

fn cmd_clear(console: &mut dyn Console, _args: &str) -> Flow {
    console.clear();
    Flow::Continue
}

fn cmd_help(console: &mut dyn Console, _args: &str) -> Flow {
    console.set_color(Color::Cyan, Color::Black);
    console.write_str("Available commands:\n");
    console.write_str("===================\n");
    console.set_color(Color::White, Color::Black);

    for entry in COMMANDS {
        console.write_str("  ");
        console.write_str(entry.name);
        // Column alignment without tabs.
        console.write_str(if entry.name.len() < 8 { "        " } else { "    " });
        console.write_str("- ");
        console.write_str(entry.description);
        console.write_byte(b'\n');
    }
    Flow::Continue
}

fn cmd_version(console: &mut dyn Console, _args: &str) -> Flow {
    console.write_str(OS_NAME);
    console.write_str(" version ");
    console.write_str(OS_VERSION);
    console.write_byte(b'\n');
    console.write_str("Minimal interrupt-driven kernel shell\n");
    Flow::Continue
}

fn cmd_shutdown(console: &mut dyn Console, _args: &str) -> Flow {
    console.write_str("System is shutting down...\n");
    console.write_str("Thank you for using ");
    console.write_str(OS_NAME);
    console.write_str("!\n");
    Flow::Halt
}
