//! Byte-to-text rendering helpers for the `%_p`, `%_c`, and `%_u`
//! conversions.

const OCTAL: &[u8; 8] = b"01234567";
const HEX: &[u8; 16] = b"0123456789abcdef";

/// ASCII mnemonics for the control range; `del` is handled separately.
const SHORT: [&[u8]; 32] = [
    b"nul", b"soh", b"stx", b"etx", b"eot", b"enq", b"ack", b"bel",
    b"bs", b"ht", b"lf", b"vt", b"ff", b"cr", b"so", b"si",
    b"dle", b"dc1", b"dc2", b"dc3", b"dc4", b"nak", b"syn", b"etb",
    b"can", b"em", b"sub", b"esc", b"fs", b"gs", b"rs", b"us",
];

/// Map a byte to itself when printable, `.` otherwise.
pub fn toprint(chr: u8) -> u8 {
    if (0x20..0x7f).contains(&chr) {
        chr
    } else {
        b'.'
    }
}

/// Render a byte as its printable form, a named escape, or three octal
/// digits, MSB first.
pub fn tooctal(buf: &mut [u8; 3], chr: u8) -> &[u8] {
    match chr {
        0x20..=0x7e => {
            buf[0] = chr;
            &buf[..1]
        }
        b'\0' => b"\\0",
        0x07 => b"\\a",
        0x08 => b"\\b",
        0x0c => b"\\f",
        b'\n' => b"\\n",
        b'\r' => b"\\r",
        b'\t' => b"\\t",
        0x0b => b"\\v",
        _ => {
            buf[0] = OCTAL[usize::from((chr >> 6) & 0x7)];
            buf[1] = OCTAL[usize::from((chr >> 3) & 0x7)];
            buf[2] = OCTAL[usize::from(chr & 0x7)];
            &buf[..]
        }
    }
}

/// Render a byte as its printable form, a control-character mnemonic, or
/// two lowercase hex digits.
pub fn toshort(buf: &mut [u8; 3], chr: u8) -> &[u8] {
    match chr {
        0x00..=0x1f => SHORT[usize::from(chr)],
        0x7f => b"del",
        0x20..=0x7e => {
            buf[0] = chr;
            &buf[..1]
        }
        _ => {
            buf[0] = HEX[usize::from(chr >> 4)];
            buf[1] = HEX[usize::from(chr & 0xf)];
            &buf[..2]
        }
    }
}
