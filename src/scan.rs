//! Format-string scanning: whitespace, integers, and conversion
//! specifications.

use bitflags::bitflags;

use crate::error::{Error, Result};

bitflags! {
    /// Conversion flags, with their printf spellings.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ConvFlags: u8 {
        /// `#`: alternate form.
        const HASH = 1;
        /// `0`: zero padding.
        const ZERO = 2;
        /// `-`: left adjustment.
        const MINUS = 4;
        /// ` `: recognized but never forwarded to number formatting.
        const SPACE = 8;
        /// `+`: explicit sign.
        const PLUS = 16;
    }
}

/// Pack a two-byte conversion code, second byte high.
pub const fn fc2(a: u8, b: u8) -> u16 {
    ((b as u16) << 8) | a as u16
}

/// `%_ad`: current input address, decimal.
pub const CNV_ADDR_DEC: u16 = fc2(b'_', b'd');
/// `%_ao`: current input address, octal.
pub const CNV_ADDR_OCT: u16 = fc2(b'_', b'o');
/// `%_ax`: current input address, hex.
pub const CNV_ADDR_HEX: u16 = fc2(b'_', b'x');
/// `%_Ad`: end-of-stream address, decimal.
pub const CNV_END_DEC: u16 = fc2(b'_', b'D');
/// `%_Ao`: end-of-stream address, octal.
pub const CNV_END_OCT: u16 = fc2(b'_', b'O');
/// `%_Ax`: end-of-stream address, hex.
pub const CNV_END_HEX: u16 = fc2(b'_', b'X');
/// `%_c`: C-style character escape.
pub const CNV_OCTAL_CHAR: u16 = fc2(b'_', b'c');
/// `%_p`: printable character or dot.
pub const CNV_PRINTABLE: u16 = fc2(b'_', b'p');
/// `%_u`: control-character mnemonic.
pub const CNV_MNEMONIC: u16 = fc2(b'_', b'u');

/// One scanned `%…` conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConvSpec {
    /// Flag set, possibly empty.
    pub flags: ConvFlags,
    /// Field width; `-1` when absent.
    pub width: i32,
    /// Precision; `-1` when absent.
    pub prec: i32,
    /// Input bytes one datum consumes.
    pub bytes: i32,
    /// Conversion code: an ASCII byte, or an [`fc2`] pair for the `%_X`
    /// family.
    pub code: u16,
}

/// Cursor over the bytes of a format description.
///
/// The byte past the end reads as `0`, which doubles as the end-of-input
/// sentinel the way a C string terminator does.
#[derive(Debug, Clone, Copy)]
pub struct Scanner<'a> {
    fmt: &'a [u8],
    pos: usize,
}

impl<'a> Scanner<'a> {
    pub fn new(fmt: &'a [u8]) -> Self {
        Scanner { fmt, pos: 0 }
    }

    /// Current byte, `0` at end of input.
    pub fn peek(&self) -> u8 {
        self.fmt.get(self.pos).copied().unwrap_or(0)
    }

    /// Advance one byte, saturating at end of input.
    pub fn bump(&mut self) {
        if self.pos < self.fmt.len() {
            self.pos += 1;
        }
    }

    /// Skip whitespace, preserving `\n` unless `nl` is set. Returns the
    /// byte the cursor lands on.
    pub fn skipws(&mut self, nl: bool) -> u8 {
        loop {
            match self.peek() {
                b'\t' | 0x0b | 0x0c | b'\r' | b' ' => self.bump(),
                b'\n' if nl => self.bump(),
                _ => break,
            }
        }
        self.peek()
    }

    /// Scan a non-negative decimal integer, or `-1` if the cursor is not on
    /// a digit. Digits that would push the accumulator past the clamp are
    /// left unconsumed.
    pub fn getint(&mut self) -> i32 {
        const LIMIT: i32 = (i32::MAX - (i32::MAX % 10) - 1) / 10;

        if !self.peek().is_ascii_digit() {
            return -1;
        }

        let mut i = 0;
        loop {
            i = i * 10 + i32::from(self.peek() - b'0');
            self.bump();
            if !self.peek().is_ascii_digit() || i > LIMIT {
                break;
            }
        }
        i
    }

    /// Scan one conversion specification; the cursor must be just past the
    /// `%`. On success the cursor is past the conversion code.
    pub fn getcnv(&mut self) -> Result<ConvSpec> {
        let mut flags = ConvFlags::empty();

        loop {
            match self.peek() {
                b'#' => flags |= ConvFlags::HASH,
                b'0' => flags |= ConvFlags::ZERO,
                b'-' => flags |= ConvFlags::MINUS,
                b' ' => flags |= ConvFlags::SPACE,
                b'+' => flags |= ConvFlags::PLUS,
                _ => break,
            }
            self.bump();
        }

        let width = self.getint();
        let prec = if self.peek() == b'.' {
            self.bump();
            self.getint()
        } else {
            -1
        };

        let mut bytes = 0;
        let code = match self.peek() {
            b'%' => u16::from(b'%'),
            b'c' => {
                bytes = 1;
                u16::from(b'c')
            }
            ch @ (b'd' | b'i' | b'o' | b'u' | b'X' | b'x') => {
                bytes = 4;
                u16::from(ch)
            }
            b's' => {
                if prec == -1 {
                    return Err(Error::Format);
                }
                bytes = prec;
                u16::from(b's')
            }
            b'_' => {
                self.bump();
                match self.peek() {
                    b'a' => {
                        self.bump();
                        match self.peek() {
                            b'd' => CNV_ADDR_DEC,
                            b'o' => CNV_ADDR_OCT,
                            b'x' => CNV_ADDR_HEX,
                            _ => return Err(Error::Format),
                        }
                    }
                    b'A' => {
                        self.bump();
                        match self.peek() {
                            b'd' => CNV_END_DEC,
                            b'o' => CNV_END_OCT,
                            b'x' => CNV_END_HEX,
                            _ => return Err(Error::Format),
                        }
                    }
                    b'c' => {
                        bytes = 1;
                        CNV_OCTAL_CHAR
                    }
                    b'p' => {
                        bytes = 1;
                        CNV_PRINTABLE
                    }
                    b'u' => {
                        bytes = 1;
                        CNV_MNEMONIC
                    }
                    _ => return Err(Error::Format),
                }
            }
            0 => return Err(Error::Format),
            // Any other byte compiles as-is; the conversion engine rejects
            // it at execution.
            ch => u16::from(ch),
        };
        self.bump();

        Ok(ConvSpec {
            flags,
            width,
            prec,
            bytes,
            code,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cnv(fmt: &str) -> Result<ConvSpec> {
        Scanner::new(fmt.as_bytes()).getcnv()
    }

    #[test]
    fn test_skipws() {
        let mut s = Scanner::new(b" \t\n x");
        assert_eq!(s.skipws(false), b'\n');
        assert_eq!(s.skipws(true), b'x');
    }

    #[test]
    fn test_getint() {
        let mut s = Scanner::new(b"16/1");
        assert_eq!(s.getint(), 16);
        assert_eq!(s.peek(), b'/');

        let mut s = Scanner::new(b"x");
        assert_eq!(s.getint(), -1);
        assert_eq!(s.peek(), b'x');

        let mut s = Scanner::new(b"0");
        assert_eq!(s.getint(), 0);
    }

    #[test]
    fn test_getint_clamps() {
        // Digits past the clamp stay in the stream.
        let mut s = Scanner::new(b"99999999999999999999");
        let i = s.getint();
        assert!(i > 0);
        assert!(s.peek().is_ascii_digit());
    }

    #[test]
    fn test_getcnv_simple() {
        let spec = cnv(".2x ").unwrap();
        assert_eq!(spec.flags, ConvFlags::empty());
        assert_eq!(spec.width, -1);
        assert_eq!(spec.prec, 2);
        assert_eq!(spec.bytes, 4);
        assert_eq!(spec.code, u16::from(b'x'));
    }

    #[test]
    fn test_getcnv_flags_and_width() {
        let spec = cnv("#0-+10.4X").unwrap();
        assert_eq!(
            spec.flags,
            ConvFlags::HASH | ConvFlags::ZERO | ConvFlags::MINUS | ConvFlags::PLUS
        );
        assert_eq!(spec.width, 10);
        assert_eq!(spec.prec, 4);
        assert_eq!(spec.code, u16::from(b'X'));
    }

    #[test]
    fn test_getcnv_underscore_family() {
        assert_eq!(cnv("_ax").unwrap().code, CNV_ADDR_HEX);
        assert_eq!(cnv("_ad").unwrap().code, CNV_ADDR_DEC);
        assert_eq!(cnv("_Ax").unwrap().code, CNV_END_HEX);
        assert_eq!(cnv("_c").unwrap().bytes, 1);
        assert_eq!(cnv("_p").unwrap().code, CNV_PRINTABLE);
        assert_eq!(cnv("_u").unwrap().code, CNV_MNEMONIC);
        assert!(cnv("_z").is_err());
        assert!(cnv("_aq").is_err());
    }

    #[test]
    fn test_getcnv_string_requires_precision() {
        assert!(cnv("s").is_err());
        let spec = cnv(".8s").unwrap();
        assert_eq!(spec.bytes, 8);
    }

    #[test]
    fn test_getcnv_percent_and_unknown() {
        assert_eq!(cnv("%").unwrap().bytes, 0);
        // Unknown specifiers scan; execution rejects them.
        assert_eq!(cnv("q").unwrap().code, u16::from(b'q'));
        // A bare `%` at end of input is malformed.
        assert!(cnv("").is_err());
    }
}
