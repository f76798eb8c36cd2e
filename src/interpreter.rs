//! Format machine implementation
//!
//! The machine owns a compiled [`Program`], an operand stack, an input
//! window sized to the program's block size, and an elastic output buffer.
//! [`write`](Interpreter::write) runs one program pass per completed block;
//! [`flush`](Interpreter::flush) runs a final pass over a partial block;
//! [`read`](Interpreter::read) drains the formatted output.

use tracing::trace;

use crate::compiler;
use crate::consts::{OUTPUT_RESERVE, STACK_DEPTH};
use crate::error::{Error, Result};
use crate::program::Program;

mod conv;
mod exec;

/// Input window: `buf[pos..end]` is the unread remainder of the current
/// block. `end` equals the block size except during a flush, where it is
/// narrowed to the pending length.
#[derive(Debug, Default)]
struct Input {
    buf: Vec<u8>,
    pos: usize,
    end: usize,
    /// Input bytes fully processed before this block.
    address: u64,
    eof: bool,
}

/// Elastic output buffer. `floor` is the pending length at the start of
/// the current program pass and bounds `TRIM`.
#[derive(Debug, Default)]
struct Output {
    buf: Vec<u8>,
    floor: usize,
}

/// The format machine.
///
/// A machine is created empty; [`compile`](Interpreter::compile) installs a
/// program and sizes the input window. One machine drives one stream; it is
/// not safe for concurrent use.
#[derive(Debug)]
pub struct Interpreter {
    program: Program,
    stack: [i64; STACK_DEPTH],
    sp: usize,
    pc: usize,
    input: Input,
    output: Output,
}

impl Default for Interpreter {
    fn default() -> Self {
        Self::new()
    }
}

impl Interpreter {
    /// Create an empty machine.
    pub fn new() -> Self {
        Interpreter {
            program: Program::default(),
            stack: [0; STACK_DEPTH],
            sp: 0,
            pc: 0,
            input: Input::default(),
            output: Output::default(),
        }
    }

    /// The installed program.
    pub const fn program(&self) -> &Program {
        &self.program
    }

    /// Input bytes one program pass consumes.
    pub const fn blocksize(&self) -> usize {
        self.program.blocksize()
    }

    /// Count of input bytes fully processed so far.
    pub const fn address(&self) -> u64 {
        self.input.address
    }

    /// Whether the stream has been flushed.
    pub const fn is_eof(&self) -> bool {
        self.input.eof
    }

    /// Pending formatted bytes not yet read.
    pub fn pending(&self) -> usize {
        self.output.buf.len()
    }

    /// Compile `fmt` and install the result, replacing any previous
    /// program and resizing the input window.
    ///
    /// On error the machine is left reset with an empty program.
    pub fn compile(&mut self, fmt: &str) -> Result<()> {
        self.program = Program::default();
        self.input.buf.clear();
        self.input.end = 0;
        self.reset();

        let program = compiler::compile(fmt)?;

        self.input.buf = vec![0; program.blocksize()];
        self.input.end = self.input.buf.len();
        self.program = program;

        Ok(())
    }

    /// Clear the input address and all cursors without recompiling.
    /// Pending output is discarded.
    pub fn reset(&mut self) {
        self.input.address = 0;
        self.input.pos = 0;
        self.input.eof = false;
        self.output.buf.clear();
        self.output.floor = 0;
        self.pc = 0;
        self.sp = 0;
    }

    /// Append input bytes, running one program pass for every completed
    /// block. On error the input cursor rewinds to the block base so the
    /// caller can retry.
    pub fn write(&mut self, mut src: &[u8]) -> Result<()> {
        if self.input.buf.is_empty() {
            return Err(Error::Oops);
        }

        while !src.is_empty() {
            let n = src.len().min(self.input.end - self.input.pos);
            self.input.buf[self.input.pos..self.input.pos + n].copy_from_slice(&src[..n]);
            self.input.pos += n;
            src = &src[n..];

            if self.input.pos < self.input.end {
                break;
            }

            self.input.pos = 0;
            if let Err(e) = self.run() {
                self.input.pos = 0;
                return Err(e);
            }
            self.input.pos = 0;
            self.input.address += self.program.blocksize() as u64;
            trace!(address = self.input.address, "block consumed");
        }

        Ok(())
    }

    /// Run a final pass over any pending partial block. The window is
    /// narrowed for the pass; guarded conversions skip once it runs dry.
    pub fn flush(&mut self) -> Result<()> {
        if self.input.pos > 0 {
            let end = self.input.end;
            self.input.end = self.input.pos;
            self.input.pos = 0;

            let result = self.run();

            self.input.pos = 0;
            self.input.end = end;
            result?;
        }

        self.input.eof = true;

        Ok(())
    }

    /// Move up to `dst.len()` pending output bytes into `dst`, compacting
    /// the output buffer. Returns the number of bytes moved.
    pub fn read(&mut self, dst: &mut [u8]) -> usize {
        let n = dst.len().min(self.output.buf.len());
        dst[..n].copy_from_slice(&self.output.buf[..n]);
        self.output.buf.drain(..n);
        n
    }

    fn push(&mut self, v: i64) -> Result<()> {
        if self.sp >= STACK_DEPTH {
            return Err(Error::Oops);
        }
        self.stack[self.sp] = v;
        self.sp += 1;
        Ok(())
    }

    fn pop(&mut self) -> Result<i64> {
        if self.sp == 0 {
            return Err(Error::Oops);
        }
        self.sp -= 1;
        Ok(self.stack[self.sp])
    }

    fn putc(&mut self, chr: u8) {
        if self.output.buf.capacity() == 0 {
            self.output.buf.reserve(OUTPUT_RESERVE);
        }
        self.output.buf.push(chr);
    }
}
