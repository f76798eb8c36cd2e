//! Bytecode emission: opcodes, inline immediates, jump reservation and
//! back-patching.

use crate::consts::PROGRAM_SIZE;
use crate::error::{Error, Result};
use crate::opcode::Opcode;
use crate::program::Program;

/// Emits opcodes and inline immediates into a fixed-capacity program image.
///
/// Jumps are emitted in two steps: [`jump`](Emitter::jump) reserves a
/// fixed-width slot on the execution path, [`link`](Emitter::link) later
/// fills it in once the target is known, so patching never moves emitted
/// code.
pub(crate) struct Emitter {
    code: [u8; PROGRAM_SIZE],
    pc: usize,
}

/// Width of a reserved jump slot: `PC`, an `I16` displacement, `ADD` or
/// `SUB`, and the `JMP` itself.
const JUMP_SLOT: usize = 6;

impl Emitter {
    pub fn new() -> Self {
        Emitter {
            code: [0; PROGRAM_SIZE],
            pc: 0,
        }
    }

    /// Current emission position.
    pub fn pc(&self) -> usize {
        self.pc
    }

    fn byte(&mut self, b: u8) -> Result<()> {
        if self.pc >= PROGRAM_SIZE - 1 {
            return Err(Error::Overflow);
        }
        self.code[self.pc] = b;
        self.pc += 1;
        Ok(())
    }

    /// Emit one opcode.
    pub fn op(&mut self, op: Opcode) -> Result<()> {
        self.byte(op as u8)
    }

    /// Emit the minimal-width push of `i`, negating on the stack when
    /// `i < 0`. Magnitudes beyond 32 bits do not encode.
    pub fn int(&mut self, i: i64) -> Result<()> {
        let neg = i < 0;
        let mag = i.unsigned_abs();

        if mag > u64::from(u32::MAX) {
            return Err(Error::Range);
        } else if mag > u64::from(u16::MAX) {
            self.op(Opcode::I32)?;
            self.byte((mag >> 24) as u8)?;
            self.byte((mag >> 16) as u8)?;
            self.byte((mag >> 8) as u8)?;
            self.byte(mag as u8)?;
        } else if mag > u64::from(u8::MAX) {
            self.op(Opcode::I16)?;
            self.byte((mag >> 8) as u8)?;
            self.byte(mag as u8)?;
        } else {
            match mag {
                0 => self.op(Opcode::ZERO)?,
                1 => self.op(Opcode::ONE)?,
                2 => self.op(Opcode::TWO)?,
                _ => {
                    self.op(Opcode::I8)?;
                    self.byte(mag as u8)?;
                }
            }
        }

        if neg {
            self.op(Opcode::NEG)?;
        }

        Ok(())
    }

    /// Emit a literal output byte.
    pub fn putc(&mut self, chr: u8) -> Result<()> {
        self.op(Opcode::PUTC)?;
        self.byte(chr)
    }

    /// Reserve a jump slot at the current position and return its address.
    /// The execution path into the slot must push the jump condition.
    pub fn jump(&mut self) -> Result<usize> {
        let from = self.pc;
        for _ in 0..JUMP_SLOT {
            self.op(Opcode::TRAP)?;
        }
        Ok(from)
    }

    /// Fill the slot reserved at `from` with a jump to `to`.
    ///
    /// The target is reconstructed at run time from the program counter and
    /// a 16-bit displacement; spans beyond that do not encode.
    pub fn link(&mut self, from: usize, to: usize) -> Result<()> {
        let save = self.pc;
        self.pc = from;

        self.op(Opcode::PC)?;

        let (disp, dir) = if to < from {
            (from - to, Opcode::SUB)
        } else {
            (to - from, Opcode::ADD)
        };
        if disp > usize::from(u16::MAX) {
            return Err(Error::Range);
        }
        self.op(Opcode::I16)?;
        self.byte((disp >> 8) as u8)?;
        self.byte(disp as u8)?;
        self.op(dir)?;

        self.op(Opcode::JMP)?;

        self.pc = save;
        Ok(())
    }

    /// Terminate with `HALT`, fill the unused tail with `TRAP`, and produce
    /// the program.
    pub fn finish(mut self, blocksize: usize) -> Result<Program> {
        self.op(Opcode::HALT)?;
        for b in &mut self.code[self.pc..] {
            *b = Opcode::TRAP as u8;
        }
        Ok(Program::new(self.code, blocksize))
    }
}
