//! Compiled program representation

use core::fmt;

use crate::consts::PROGRAM_SIZE;
use crate::opcode::Opcode;

/// A compiled format program.
///
/// The code region ends with a `HALT`; unused trailing bytes are `TRAP`.
/// The block size is the number of input bytes one program pass consumes.
#[derive(Clone)]
pub struct Program {
    code: [u8; PROGRAM_SIZE],
    blocksize: usize,
}

impl Program {
    pub(crate) fn new(code: [u8; PROGRAM_SIZE], blocksize: usize) -> Self {
        Program { code, blocksize }
    }

    /// Input bytes consumed per program pass.
    pub const fn blocksize(&self) -> usize {
        self.blocksize
    }

    /// Code byte at `pc`, if in bounds.
    pub(crate) fn byte(&self, pc: usize) -> Option<u8> {
        self.code.get(pc).copied()
    }
}

impl Default for Program {
    /// The empty program: a single `HALT` and a zero-length input block.
    fn default() -> Self {
        Program {
            code: [Opcode::HALT as u8; PROGRAM_SIZE],
            blocksize: 0,
        }
    }
}

impl fmt::Debug for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Program")
            .field("blocksize", &self.blocksize)
            .finish_non_exhaustive()
    }
}

/// Disassembly listing: the blocksize header followed by one line per
/// instruction, inline immediates decoded, up to the final `HALT`.
impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let at = |pc: usize| self.code.get(pc).copied().unwrap_or(0);

        writeln!(f, "-- blocksize: {}", self.blocksize)?;

        let mut pc = 0;
        while pc < PROGRAM_SIZE {
            write!(f, "{pc}: ")?;

            let Ok(op) = Opcode::try_from(at(pc)) else {
                writeln!(f, "-")?;
                pc += 1;
                continue;
            };

            match op {
                Opcode::I8 => {
                    writeln!(f, "{op} {}", at(pc + 1))?;
                    pc += 2;
                }
                Opcode::I16 => {
                    let n = (u32::from(at(pc + 1)) << 8) | u32::from(at(pc + 2));
                    writeln!(f, "{op} {n}")?;
                    pc += 3;
                }
                Opcode::I32 => {
                    let n = (u32::from(at(pc + 1)) << 24)
                        | (u32::from(at(pc + 2)) << 16)
                        | (u32::from(at(pc + 3)) << 8)
                        | u32::from(at(pc + 4));
                    writeln!(f, "{op} {n}")?;
                    pc += 5;
                }
                Opcode::PUTC => {
                    let chr = at(pc + 1);
                    match chr {
                        b'\n' => writeln!(f, "{op} \\n (0x0a)")?,
                        b'\r' => writeln!(f, "{op} \\r (0x0d)")?,
                        b'\t' => writeln!(f, "{op} \\t (0x09)")?,
                        c if c > 31 && c < 127 => writeln!(f, "{op} {} (0x{c:02x})", c as char)?,
                        c => writeln!(f, "{op} . (0x{c:02x})")?,
                    }
                    pc += 2;
                }
                Opcode::HALT => {
                    writeln!(f, "{op}")?;
                    break;
                }
                _ => {
                    writeln!(f, "{op}")?;
                    pc += 1;
                }
            }
        }

        Ok(())
    }
}
