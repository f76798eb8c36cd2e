//! Conversion engine: renders one datum per a scanned directive
//!
//! Numeric conversions follow printf semantics for the `#`, `0`, `-`, and
//! `+` flags with dynamic width and precision. The compiler folds an
//! unspecified width or precision to zero before pushing it, so a zero
//! precision here means "defaulted".

use crate::consts::CONV_BUF_SIZE;
use crate::error::{Error, Result};
use crate::render::{toprint, tooctal, toshort};
use crate::scan::{
    ConvFlags, CNV_ADDR_DEC, CNV_ADDR_HEX, CNV_ADDR_OCT, CNV_END_DEC, CNV_END_HEX, CNV_END_OCT,
    CNV_MNEMONIC, CNV_OCTAL_CHAR, CNV_PRINTABLE,
};

use super::Interpreter;

impl Interpreter {
    /// Execute one conversion request against the output buffer.
    pub(super) fn conv(
        &mut self,
        flags: i64,
        width: i64,
        prec: i64,
        code: i64,
        word: i64,
    ) -> Result<()> {
        let flags = ConvFlags::from_bits_truncate(flags as u8);
        let width = usize::try_from(width).map_err(|_| Error::Oops)?;
        let prec = i32::try_from(prec).map_err(|_| Error::Oops)?;
        let code = u16::try_from(code).map_err(|_| Error::NotSupported)?;

        // A pathological width or precision would not fit the intermediate
        // buffer no matter the datum.
        if width >= CONV_BUF_SIZE || prec >= CONV_BUF_SIZE as i32 {
            return Err(Error::Overflow);
        }

        let left = flags.contains(ConvFlags::MINUS);
        let mut tmp = Vec::new();
        let mut label = [0u8; 3];

        match code {
            CNV_OCTAL_CHAR => {
                let s = tooctal(&mut label, word as u8);
                let p = clamp_label(prec);
                pad_str(&mut tmp, &s[..s.len().min(p)], width, left);
            }
            CNV_MNEMONIC => {
                let s = toshort(&mut label, word as u8);
                let p = clamp_label(prec);
                pad_str(&mut tmp, &s[..s.len().min(p)], width, left);
            }
            CNV_PRINTABLE => {
                pad_str(&mut tmp, &[toprint(word as u8)], width, left);
            }
            CNV_ADDR_DEC | CNV_ADDR_OCT | CNV_ADDR_HEX => {
                let addr = self.input.address.wrapping_add(self.input.pos as u64) as i64;
                let base = match code {
                    CNV_ADDR_DEC => b'd',
                    CNV_ADDR_OCT => b'o',
                    _ => b'x',
                };
                format_int(&mut tmp, flags, width, prec, base, addr);
            }
            CNV_END_DEC | CNV_END_OCT | CNV_END_HEX => return Err(Error::NotSupported),
            _ => match u8::try_from(code) {
                Ok(b's') => {
                    let remaining = self.input.end - self.input.pos;
                    let p = match usize::try_from(prec) {
                        Ok(p) if p > 0 && p <= remaining => p,
                        _ => remaining,
                    };
                    let src = &self.input.buf[self.input.pos..self.input.pos + p];
                    pad_str(&mut tmp, src, width, left);
                }
                Ok(b'c') => pad_str(&mut tmp, &[word as u8], width, left),
                Ok(c @ (b'd' | b'i' | b'o' | b'u' | b'X' | b'x')) => {
                    format_int(&mut tmp, flags, width, prec, c, word);
                }
                _ => return Err(Error::NotSupported),
            },
        }

        if tmp.len() >= CONV_BUF_SIZE {
            return Err(Error::Overflow);
        }
        for &b in &tmp {
            self.putc(b);
        }

        Ok(())
    }
}

/// Precision for the three-character rendering helpers: bounded above by
/// the label width, defaulting to it.
fn clamp_label(prec: i32) -> usize {
    if prec > 0 {
        prec.min(3) as usize
    } else {
        3
    }
}

/// Pad `body` to `width` with spaces, left-adjusted on demand.
fn pad_str(tmp: &mut Vec<u8>, body: &[u8], width: usize, left: bool) {
    let pad = width.saturating_sub(body.len());
    if left {
        tmp.extend_from_slice(body);
        tmp.resize(tmp.len() + pad, b' ');
    } else {
        tmp.resize(tmp.len() + pad, b' ');
        tmp.extend_from_slice(body);
    }
}

/// Render an integer conversion with printf flag, width, and precision
/// semantics. The value is truncated to 32 bits first, signed for `d`/`i`
/// and unsigned otherwise, matching the host formatting contract.
fn format_int(tmp: &mut Vec<u8>, flags: ConvFlags, width: usize, prec: i32, code: u8, word: i64) {
    let (negative, magnitude) = match code {
        b'd' | b'i' => {
            let v = word as i32;
            (v < 0, u64::from(v.unsigned_abs()))
        }
        _ => (false, u64::from(word as u32)),
    };

    let mut digits = match code {
        b'o' => format!("{magnitude:o}"),
        b'x' => format!("{magnitude:x}"),
        b'X' => format!("{magnitude:X}"),
        _ => format!("{magnitude}"),
    };

    // Precision is the minimum digit count; the compiler folds "absent"
    // to zero, which keeps the natural single digit.
    if prec > 0 {
        let p = prec as usize;
        if digits.len() < p {
            digits = "0".repeat(p - digits.len()) + &digits;
        }
    }

    let mut prefix = String::new();
    if negative {
        prefix.push('-');
    } else if flags.contains(ConvFlags::PLUS) && matches!(code, b'd' | b'i') {
        prefix.push('+');
    }
    if flags.contains(ConvFlags::HASH) {
        match code {
            b'o' if !digits.starts_with('0') => digits.insert(0, '0'),
            b'x' if magnitude != 0 => prefix.push_str("0x"),
            b'X' if magnitude != 0 => prefix.push_str("0X"),
            _ => {}
        }
    }

    let body = prefix.len() + digits.len();
    let pad = width.saturating_sub(body);

    if flags.contains(ConvFlags::MINUS) {
        tmp.extend_from_slice(prefix.as_bytes());
        tmp.extend_from_slice(digits.as_bytes());
        tmp.resize(tmp.len() + pad, b' ');
    } else if flags.contains(ConvFlags::ZERO) && prec <= 0 {
        tmp.extend_from_slice(prefix.as_bytes());
        tmp.resize(tmp.len() + pad, b'0');
        tmp.extend_from_slice(digits.as_bytes());
    } else {
        tmp.resize(tmp.len() + pad, b' ');
        tmp.extend_from_slice(prefix.as_bytes());
        tmp.extend_from_slice(digits.as_bytes());
    }
}
