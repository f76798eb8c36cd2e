//! Thin command-line driver for the hexfmt machine.

use std::env;
use std::fs::File;
use std::io::{self, Read, Write};
use std::process::ExitCode;

use hexfmt::prelude::*;

const DEFAULT_FORMAT: &str = "16/1 \"%.2x \"";

const USAGE: &str = "\
hexfmt [-e:f:Dh] [file ...]
  -e FMT   hexdump string format
  -f PATH  path to hexdump format file
  -D       dump the compiled machine
  -h       print usage help
";

fn main() -> ExitCode {
    let mut fmt = DEFAULT_FORMAT.to_string();
    let mut dump = false;
    let mut files = Vec::new();

    let mut args = env::args().skip(1);
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "-e" => match args.next() {
                Some(v) => fmt = v,
                None => return usage_error("-e requires an argument"),
            },
            "-f" => match args.next() {
                Some(path) => match read_format(&path) {
                    Ok(v) => fmt = v,
                    Err(e) => return fail(&path, &e.into()),
                },
                None => return usage_error("-f requires an argument"),
            },
            "-D" => dump = true,
            "-h" => {
                print!("{USAGE}");
                return ExitCode::SUCCESS;
            }
            _ if arg.starts_with('-') && arg.len() > 1 => {
                return usage_error(&format!("unknown option: {arg}"));
            }
            _ => files.push(arg),
        }
    }

    let mut machine = Interpreter::new();
    if let Err(e) = machine.compile(&fmt) {
        return fail(&fmt, &e);
    }

    if dump {
        print!("{}", machine.program());
        return ExitCode::SUCCESS;
    }

    if files.is_empty() {
        if let Err(e) = run(&mut machine, &mut io::stdin().lock(), true) {
            return fail("stdin", &e);
        }
    } else {
        for (i, path) in files.iter().enumerate() {
            let mut file = match File::open(path) {
                Ok(f) => f,
                Err(e) => return fail(path, &e.into()),
            };
            // Blocks may span file boundaries; only the last input flushes.
            let last = i + 1 == files.len();
            if let Err(e) = run(&mut machine, &mut file, last) {
                return fail(path, &e);
            }
        }
    }

    ExitCode::SUCCESS
}

/// Feed one input through the machine, draining formatted output to
/// stdout as it accumulates.
fn run(machine: &mut Interpreter, input: &mut dyn Read, flush: bool) -> Result<()> {
    let mut buf = [0u8; 4096];
    let mut out = [0u8; 4096];
    let mut stdout = io::stdout().lock();

    loop {
        let len = input.read(&mut buf)?;
        if len == 0 {
            break;
        }
        machine.write(&buf[..len])?;
        drain(machine, &mut out, &mut stdout)?;
    }

    if flush {
        machine.flush()?;
        drain(machine, &mut out, &mut stdout)?;
    }

    Ok(())
}

fn drain(machine: &mut Interpreter, out: &mut [u8], stdout: &mut impl Write) -> Result<()> {
    loop {
        let n = machine.read(out);
        if n == 0 {
            break;
        }
        stdout.write_all(&out[..n])?;
    }
    Ok(())
}

fn read_format(path: &str) -> io::Result<String> {
    let mut fmt = String::new();
    if path == "-" {
        io::stdin().lock().read_to_string(&mut fmt)?;
    } else {
        File::open(path)?.read_to_string(&mut fmt)?;
    }
    Ok(fmt)
}

fn usage_error(msg: &str) -> ExitCode {
    eprintln!("hexfmt: {msg}");
    eprint!("{USAGE}");
    ExitCode::FAILURE
}

fn fail(what: &str, error: &Error) -> ExitCode {
    eprintln!("hexfmt: {what}: {error}");
    ExitCode::FAILURE
}
