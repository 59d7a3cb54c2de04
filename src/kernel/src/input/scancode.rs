//! Scan code set 1 translation.
//!
//! Only the keys the shell needs are mapped: lowercase letters, space,
//! enter and backspace.

/// Bit set in every key-release ("break") code.
pub const RELEASE_BIT: u8 = 0x80;

/// ASCII backspace as stored in the input buffer.
pub const BACKSPACE: u8 = 0x08;

/// ASCII line feed as stored in the input buffer.
pub const LINE_FEED: u8 = b'\n';

/// Returns whether `code` reports a key being released.
#[inline]
pub const fn is_release(code: u8) -> bool {
    code & RELEASE_BIT != 0
}

/// Translates a raw scan code into the byte it stands for.
///
/// Key releases and unmapped keys yield `None`.
pub const fn scan_to_char(code: u8) -> Option<u8> {
    if is_release(code) {
        return None;
    }

    let byte = match code {
        0x10 => b'q',
        0x11 => b'w',
        0x12 => b'e',
        0x13 => b'r',
        0x14 => b't',
        0x15 => b'y',
        0x16 => b'u',
        0x17 => b'i',
        0x18 => b'o',
        0x19 => b'p',
        0x1E => b'a',
        0x1F => b's',
        0x20 => b'd',
        0x21 => b'f',
        0x22 => b'g',
        0x23 => b'h',
        0x24 => b'j',
        0x25 => b'k',
        0x26 => b'l',
        0x2C => b'z',
        0x2D => b'x',
        0x2E => b'c',
        0x2F => b'v',
        0x30 => b'b',
        0x31 => b'n',
        0x32 => b'm',
        0x39 => b' ',
        0x1C => LINE_FEED,
        0x0E => BACKSPACE,
        _ => return None,
    };
    Some(byte)
}
