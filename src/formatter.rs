//! One-call convenience client over the format machine

use crate::error::Result;
use crate::interpreter::Interpreter;

/// Convenience client: compile once, format whole buffers.
///
/// For incremental streaming, drive an [`Interpreter`] directly.
#[derive(Debug)]
pub struct Formatter {
    machine: Interpreter,
}

impl AsRef<Interpreter> for Formatter {
    fn as_ref(&self) -> &Interpreter {
        &self.machine
    }
}

impl AsMut<Interpreter> for Formatter {
    fn as_mut(&mut self) -> &mut Interpreter {
        &mut self.machine
    }
}

impl Formatter {
    /// Compile `fmt` into a fresh machine.
    pub fn new(fmt: &str) -> Result<Self> {
        let mut machine = Interpreter::new();
        machine.compile(fmt)?;
        Ok(Formatter { machine })
    }

    /// Format `data` in full, flushing any trailing partial block.
    ///
    /// Each call starts from a clean machine, so repeated calls format
    /// independent streams.
    pub fn format(&mut self, data: &[u8]) -> Result<Vec<u8>> {
        self.machine.reset();
        self.machine.write(data)?;
        self.machine.flush()?;

        let mut out = Vec::with_capacity(self.machine.pending());
        let mut buf = [0u8; 256];
        loop {
            let n = self.machine.read(&mut buf);
            if n == 0 {
                break;
            }
            out.extend_from_slice(&buf[..n]);
        }

        Ok(out)
    }
}

impl From<Interpreter> for Formatter {
    fn from(machine: Interpreter) -> Self {
        Formatter { machine }
    }
}
