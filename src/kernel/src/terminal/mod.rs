//! Terminal subsystem for PikkuOS.
//!
//! # Architecture
//!
//! - `shell`: prompt loop on top of the line reader
//! - `commands`: command table and dispatcher

pub mod commands;
pub mod shell;

pub use commands::{execute, CommandEntry, Flow, COMMANDS};
pub use shell::Terminal;
