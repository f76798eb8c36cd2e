//! Opcode set for the format machine

use core::fmt;

use crate::error::Error;

/// Instruction representation for the format machine.
///
/// A program is a flat byte array; immediates follow their opcode inline
/// and are big-endian. The doc comment on each variant gives its stack
/// effect as `pops/pushes`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, strum::EnumIter)]
#[repr(u8)]
pub enum Opcode {
    /// `0/0` | end the program pass.
    HALT = 0x00,
    /// `0/0` | no operation.
    NOOP = 0x01,
    /// `0/0` | fault the machine.
    TRAP = 0x02,
    /// `0/1` | push the current program counter.
    PC = 0x03,
    /// `0/1` | push true.
    TRUE = 0x04,
    /// `0/1` | push false.
    FALSE = 0x05,
    /// `0/1` | push 0.
    ZERO = 0x06,
    /// `0/1` | push 1.
    ONE = 0x07,
    /// `0/1` | push 2.
    TWO = 0x08,
    /// `0/1` | push the next code byte, zero-extended.
    I8 = 0x09,
    /// `0/1` | push the next two code bytes, zero-extended.
    I16 = 0x0a,
    /// `0/1` | push the next four code bytes, zero-extended.
    I32 = 0x0b,
    /// `1/1` | arithmetic negation.
    NEG = 0x0c,
    /// `2/1` | `S(-2) - S(-1)`.
    SUB = 0x0d,
    /// `2/1` | `S(-2) + S(-1)`.
    ADD = 0x0e,
    /// `1/1` | logical not.
    NOT = 0x0f,
    /// `1/0` | discard the top of the stack.
    POP = 0x10,
    /// `1/2` | duplicate the top of the stack.
    DUP = 0x11,
    /// `2/2` | swap the top two stack entries.
    SWAP = 0x12,
    /// `1/1` | pop a count, read that many input bytes MSB-first into one
    /// word, bounded by the input window.
    READ = 0x13,
    /// `0/1` | push the count of unread input bytes.
    COUNT = 0x14,
    /// `0/0` | append the next code byte to the output buffer.
    PUTC = 0x15,
    /// `5/0` | pop `(conv, prec, width, flags, word)` and run the
    /// conversion engine.
    CONV = 0x16,
    /// `0/0` | strip trailing spaces and tabs from the output buffer.
    TRIM = 0x17,
    /// `2/0` | pop a target and a condition; jump when the condition holds.
    JMP = 0x18,
    /// `0/0` | rewind the input cursor to the window base.
    RESET = 0x19,
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

impl TryFrom<u8> for Opcode {
    type Error = Error;

    fn try_from(b: u8) -> Result<Self, Error> {
        use Opcode::*;
        Ok(match b {
            0x00 => HALT,
            0x01 => NOOP,
            0x02 => TRAP,
            0x03 => PC,
            0x04 => TRUE,
            0x05 => FALSE,
            0x06 => ZERO,
            0x07 => ONE,
            0x08 => TWO,
            0x09 => I8,
            0x0a => I16,
            0x0b => I32,
            0x0c => NEG,
            0x0d => SUB,
            0x0e => ADD,
            0x0f => NOT,
            0x10 => POP,
            0x11 => DUP,
            0x12 => SWAP,
            0x13 => READ,
            0x14 => COUNT,
            0x15 => PUTC,
            0x16 => CONV,
            0x17 => TRIM,
            0x18 => JMP,
            0x19 => RESET,
            _ => return Err(Error::Oops),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strum::IntoEnumIterator;

    #[test]
    fn test_u8_opcode_round_trip() {
        let last_known = Opcode::iter().last().unwrap() as u8;

        for op in Opcode::iter() {
            assert_eq!(Opcode::try_from(op as u8).unwrap(), op);
        }

        for b in (last_known + 1)..=255 {
            assert!(Opcode::try_from(b).is_err());
        }
    }

    #[test]
    fn test_mnemonics() {
        assert_eq!(Opcode::HALT.to_string(), "HALT");
        assert_eq!(Opcode::RESET.to_string(), "RESET");
    }
}
