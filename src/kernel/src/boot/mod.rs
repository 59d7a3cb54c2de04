//! Boot logging with colored status indicators.
//!
//! Provides Linux-style boot messages with colored status brackets. Every
//! line also goes to the `log` backend.

pub mod banner;

use pikku_hal::{Color, Console};

/// Boot status indicators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// Success - `[ OK ]` in green
    Ok,
    /// Failure - `[FAIL]` in red
    Fail,
    /// Warning - `[WARN]` in yellow
    Warn,
    /// Informational - `[INFO]` in cyan
    Info,
}

impl Status {
    fn label(self) -> (&'static str, Color) {
        match self {
            Status::Ok => ("[ OK ]", Color::LightGreen),
            Status::Fail => ("[FAIL]", Color::LightRed),
            Status::Warn => ("[WARN]", Color::Yellow),
            Status::Info => ("[INFO]", Color::LightCyan),
        }
    }
}

/// Log a boot stage with status.
///
/// Format: `[ OK ] Message text`
pub fn log(console: &mut impl Console, status: Status, message: &str) {
    let (text, color) = status.label();
    console.set_color(color, Color::Black);
    console.write_str(text);
    console.set_color(Color::White, Color::Black);
    console.write_byte(b' ');
    console.write_str(message);
    console.write_byte(b'\n');

    match status {
        Status::Fail => log::error!("{}", message),
        Status::Warn => log::warn!("{}", message),
        Status::Ok | Status::Info => log::info!("{}", message),
    }
}

/// Log an indented detail line (for sub-items).
///
/// Format: `       Detail text` (aligned with message after status)
pub fn log_detail(console: &mut impl Console, message: &str) {
    console.write_str("       ");
    console.write_str(message);
    console.write_byte(b'\n');
}
