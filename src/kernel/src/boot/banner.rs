//! Boot banner and branding.

use crate::config::{OS_NAME, OS_VERSION};
use pikku_hal::{Color, Console};

const LOGO: [&str; 5] = [
    "  ____  _ _    _           ___  ____  ",
    " |  _ \\(_) | _| | ___   _ / _ \\/ ___| ",
    " | |_) | | |/ / |/ / | | | | | \\___ \\ ",
    " |  __/| |   <|   <| |_| | |_| |___) |",
    " |_|   |_|_|\\_\\_|\\_\\\\__,_|\\___/|____/ ",
];

/// Print the PikkuOS boot banner.
pub fn print_banner(console: &mut impl Console) {
    console.set_color(Color::Cyan, Color::Black);
    for line in LOGO {
        console.write_str(line);
        console.write_byte(b'\n');
    }
    console.write_byte(b'\n');
    console.set_color(Color::White, Color::Black);
    console.write_str(" ");
    console.write_str(OS_NAME);
    console.write_str(" v");
    console.write_str(OS_VERSION);
    console.write_str("\n\n");
}
