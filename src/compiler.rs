//! Format compiler: translates a format description into a program

use tracing::debug;

use crate::error::{Error, Result};
use crate::opcode::Opcode;
use crate::program::Program;
use crate::scan::{ConvSpec, Scanner};

pub(crate) mod emitter;

use emitter::Emitter;

/// Compile a format description.
///
/// Each line compiles to a `RESET` followed by its units, so every line is
/// applied to the same input block; the program's block size is the largest
/// per-line total of `consumed · count` over the line's units.
pub fn compile(fmt: &str) -> Result<Program> {
    let mut scan = Scanner::new(fmt.as_bytes());
    let mut emit = Emitter::new();
    let mut blocksize = 0;

    while scan.skipws(true) != 0 {
        let mut line_size = 0;

        emit.op(Opcode::RESET)?;

        loop {
            let count = scan.getint();
            let limit = if scan.skipws(false) == b'/' {
                scan.bump();
                scan.getint()
            } else {
                -1
            };
            scan.skipws(false);

            unit(&mut emit, &mut scan, count, limit, &mut line_size)?;

            let lc = scan.skipws(false);
            if lc == 0 || lc == b'\n' {
                break;
            }
        }

        blocksize = blocksize.max(line_size);
    }

    let len = emit.pc();
    let program = emit.finish(blocksize)?;
    debug!(blocksize, bytes = len, "format compiled");

    Ok(program)
}

/// Compile one iteration unit: `count` passes over a `limit`-byte budget,
/// the body running to the next top-level whitespace or end of line.
fn unit(
    emit: &mut Emitter,
    scan: &mut Scanner<'_>,
    count: i32,
    limit: i32,
    blocksize: &mut usize,
) -> Result<()> {
    let count = if count < 0 { 1 } else { count };
    let mut consumed = 0;
    let mut quoted = false;
    let mut escaped = false;

    // Loop counter lives at the bottom of the unit's stack; the body
    // sequences below are all stack-neutral around it.
    emit.int(0)?;

    let top = emit.pc();
    emit.op(Opcode::DUP)?;
    emit.int(i64::from(count))?;
    emit.op(Opcode::SWAP)?;
    emit.op(Opcode::SUB)?;
    emit.op(Opcode::NOT)?;
    let exit = emit.jump()?;

    emit.int(1)?;
    emit.op(Opcode::ADD)?;

    loop {
        let ch = scan.peek();
        if ch == 0 {
            break;
        }
        match ch {
            b'%' if !escaped => {
                scan.bump();
                let spec = scan.getcnv()?;
                if spec.code == u16::from(b'%') {
                    emit.putc(b'%')?;
                    escaped = false;
                } else {
                    conv(emit, &spec, limit, &mut consumed)?;
                }
                // The scanner is already past the conversion.
                continue;
            }
            b' ' | b'\t' | b'\n' if !quoted && !escaped => break,
            b'"' if !escaped => quoted = !quoted,
            b'\\' if !escaped => escaped = true,
            _ => {
                let out = if escaped {
                    match ch {
                        b'0' => b'\0',
                        b'a' => 0x07,
                        b'b' => 0x08,
                        b'f' => 0x0c,
                        b'n' => b'\n',
                        b'r' => b'\r',
                        b't' => b'\t',
                        b'v' => 0x0b,
                        other => other,
                    }
                } else {
                    ch
                };
                emit.putc(out)?;
                escaped = false;
            }
        }
        scan.bump();
    }

    // Drain the iteration's unused byte budget so every pass consumes
    // exactly `limit` bytes.
    if count > 0 && consumed < limit {
        emit.int(i64::from(limit - consumed))?;
        emit.op(Opcode::READ)?;
        emit.op(Opcode::POP)?;
        consumed = limit;
    }

    emit.op(Opcode::TRUE)?;
    let back = emit.jump()?;
    emit.link(back, top)?;

    let after = emit.pc();
    emit.link(exit, after)?;
    emit.op(Opcode::POP)?;

    if count > 1 {
        emit.op(Opcode::TRIM)?;
    }

    *blocksize += consumed as usize * count as usize;

    Ok(())
}

/// Emit one conversion, guarded so an empty input window skips it.
fn conv(emit: &mut Emitter, spec: &ConvSpec, limit: i32, consumed: &mut i32) -> Result<()> {
    let mut bytes = spec.bytes;

    if limit >= 0 && bytes > 0 {
        bytes = bytes.min(limit - *consumed);
        if bytes == 0 {
            return Err(Error::Drained);
        }
    }
    *consumed += bytes;

    let guard = if bytes > 0 {
        emit.op(Opcode::COUNT)?;
        emit.op(Opcode::NOT)?;
        Some(emit.jump()?)
    } else {
        None
    };

    // `%s` reads nothing here; the conversion engine takes its bytes from
    // the input cursor directly.
    emit.int(if spec.code == u16::from(b's') {
        0
    } else {
        i64::from(bytes)
    })?;
    emit.op(Opcode::READ)?;
    emit.int(i64::from(spec.flags.bits()))?;
    emit.int(i64::from(spec.width.max(0)))?;
    emit.int(i64::from(spec.prec.max(0)))?;
    emit.int(i64::from(spec.code))?;
    emit.op(Opcode::CONV)?;

    if let Some(from) = guard {
        let after = emit.pc();
        emit.link(from, after)?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_format_blocksize() {
        let program = compile("16/1 \"%.2x \"").unwrap();
        assert_eq!(program.blocksize(), 16);
    }

    #[test]
    fn test_blocksize_is_line_maximum() {
        // Units on one line consume sequentially; lines revisit the block.
        let program = compile("8/1 \"%.2x\" 8/1 \"%.2x\"\n2/4 \"%d\"").unwrap();
        assert_eq!(program.blocksize(), 16);
    }

    #[test]
    fn test_unbounded_unit_consumes_conversion_width() {
        let program = compile("\"%d\"").unwrap();
        assert_eq!(program.blocksize(), 4);
    }

    #[test]
    fn test_zero_count_unit() {
        let program = compile("0/4 \"%.2x\"").unwrap();
        assert_eq!(program.blocksize(), 0);
    }

    #[test]
    fn test_limit_clamps_conversion() {
        // One-byte budget clamps the four-byte conversion.
        let program = compile("4/1 \"%.2x \"").unwrap();
        assert_eq!(program.blocksize(), 4);
    }

    #[test]
    fn test_drained_unit_is_rejected() {
        // The second conversion has no budget left.
        assert!(matches!(
            compile("1/1 \"%.2x%.2x\""),
            Err(Error::Drained)
        ));
        assert!(matches!(compile("1/0 \"%.2x\""), Err(Error::Drained)));
    }

    #[test]
    fn test_malformed_conversions() {
        // A bare `%` at end of input has no specifier.
        assert!(matches!(compile("%"), Err(Error::Format)));
        assert!(matches!(compile("\"%s\""), Err(Error::Format)));
        assert!(matches!(compile("\"%_z\""), Err(Error::Format)));
    }

    #[test]
    fn test_quoted_close_can_serve_as_specifier() {
        // `%"` grabs the quote as an (unknown) specifier; the engine
        // rejects it at execution, not here.
        assert!(compile("\"%\"").is_ok());
    }

    #[test]
    fn test_program_overflow() {
        let fmt = "x".repeat(3000);
        assert!(matches!(compile(&fmt), Err(Error::Overflow)));
    }
}
