//! Dispatch loop for one program pass

use tracing::trace;

use crate::error::{Error, Result};
use crate::opcode::Opcode;

use super::Interpreter;

impl Interpreter {
    /// Execute the program from `pc = 0` to `HALT` against the current
    /// input window.
    pub(super) fn run(&mut self) -> Result<()> {
        self.pc = 0;
        self.sp = 0;
        self.output.floor = self.output.buf.len();

        trace!(
            address = self.input.address,
            window = self.input.end,
            "program pass"
        );

        loop {
            let op = self.fetch()?;

            match op {
                Opcode::HALT => return Ok(()),
                Opcode::NOOP => {}
                Opcode::TRAP => return Err(Error::Oops),
                Opcode::PC => self.push(self.pc as i64)?,
                Opcode::TRUE => self.push(1)?,
                Opcode::FALSE => self.push(0)?,
                Opcode::ZERO => self.push(0)?,
                Opcode::ONE => self.push(1)?,
                Opcode::TWO => self.push(2)?,
                Opcode::I8 => {
                    let v = self.immediate(1)?;
                    self.push(v)?;
                }
                Opcode::I16 => {
                    let v = self.immediate(2)?;
                    self.push(v)?;
                }
                Opcode::I32 => {
                    let v = self.immediate(4)?;
                    self.push(v)?;
                }
                Opcode::NEG => {
                    let v = self.pop()?;
                    self.push(v.wrapping_neg())?;
                }
                Opcode::SUB => {
                    let b = self.pop()?;
                    let a = self.pop()?;
                    self.push(a.wrapping_sub(b))?;
                }
                Opcode::ADD => {
                    let b = self.pop()?;
                    let a = self.pop()?;
                    self.push(a.wrapping_add(b))?;
                }
                Opcode::NOT => {
                    let v = self.pop()?;
                    self.push(i64::from(v == 0))?;
                }
                Opcode::POP => {
                    self.pop()?;
                }
                Opcode::DUP => {
                    let v = self.pop()?;
                    self.push(v)?;
                    self.push(v)?;
                }
                Opcode::SWAP => {
                    let x = self.pop()?;
                    let y = self.pop()?;
                    self.push(x)?;
                    self.push(y)?;
                }
                Opcode::READ => {
                    let n = self.pop()?;
                    let mut v: i64 = 0;
                    let mut i = 0;
                    while i < n && self.input.pos < self.input.end {
                        v = v.wrapping_shl(8) | i64::from(self.input.buf[self.input.pos]);
                        self.input.pos += 1;
                        i += 1;
                    }
                    self.push(v)?;
                }
                Opcode::COUNT => self.push((self.input.end - self.input.pos) as i64)?,
                Opcode::PUTC => {
                    let chr = self.immediate(1)? as u8;
                    self.putc(chr);
                }
                Opcode::CONV => {
                    let code = self.pop()?;
                    let prec = self.pop()?;
                    let width = self.pop()?;
                    let flags = self.pop()?;
                    let word = self.pop()?;
                    self.conv(flags, width, prec, code, word)?;
                }
                Opcode::TRIM => {
                    while self.output.buf.len() > self.output.floor
                        && matches!(self.output.buf.last(), Some(&(b' ' | b'\t')))
                    {
                        self.output.buf.pop();
                    }
                }
                Opcode::JMP => {
                    let target = self.pop()?;
                    let cond = self.pop()?;
                    if cond != 0 {
                        self.pc = usize::try_from(target).map_err(|_| Error::Oops)?;
                        continue;
                    }
                }
                Opcode::RESET => self.input.pos = 0,
            }

            self.pc += 1;
        }
    }

    fn fetch(&self) -> Result<Opcode> {
        let byte = self.program.byte(self.pc).ok_or(Error::Oops)?;
        Opcode::try_from(byte)
    }

    /// Read the next `n` code bytes as a big-endian unsigned immediate,
    /// leaving `pc` on the last byte consumed.
    fn immediate(&mut self, n: usize) -> Result<i64> {
        let mut v: i64 = 0;
        for _ in 0..n {
            self.pc += 1;
            let byte = self.program.byte(self.pc).ok_or(Error::Oops)?;
            v = (v << 8) | i64::from(byte);
        }
        Ok(v)
    }
}
