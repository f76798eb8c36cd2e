//! Compiler and machine error implementation

use std::io;
use thiserror::Error;

/// Result alias over the crate error.
pub type Result<T> = core::result::Result<T, Error>;

/// Base of the stable negative error space, distinct from positive system
/// errnos.
pub const EBASE: i32 = -(((b'D' as i32) << 24) | ((b'U' as i32) << 16) | ((b'M' as i32) << 8) | b'P' as i32);

/// Malformed format description.
pub const EFORMAT: i32 = EBASE;
/// A conversion would consume no bytes within its unit's byte budget.
pub const EDRAINED: i32 = EBASE + 1;
/// Unsupported conversion sequence.
pub const ENOTSUPP: i32 = EBASE + 2;
/// The machine trapped on an internal invariant.
pub const EOOPS: i32 = EBASE + 3;
/// One past the last assigned negative code.
pub const ELAST: i32 = EBASE + 4;

/// Error variants for format compilation and machine execution.
#[derive(Debug, Error)]
pub enum Error {
    /// The format description failed to parse.
    #[error("invalid format")]
    Format,
    /// A conversion in the unit would consume no bytes within the unit's
    /// byte budget. Detected at compile time.
    #[error("unit drains buffer")]
    Drained,
    /// The conversion is recognized by the grammar but cannot be executed.
    #[error("unsupported conversion sequence")]
    NotSupported,
    /// The machine trapped: a reserved instruction was reached or an
    /// internal invariant was violated.
    #[error("machine traps")]
    Oops,
    /// The program image or an intermediate conversion buffer ran out of
    /// space.
    #[error("out of buffer space")]
    Overflow,
    /// An emitted immediate or jump displacement exceeds its encoding.
    #[error("value out of encoding range")]
    Range,
    /// I/O and OS related errors.
    #[error("unrecoverable error: {0}")]
    Io(#[from] io::Error),
}

impl Error {
    /// Stable numeric code for this error.
    ///
    /// Compiler and machine faults map into the negative space based at
    /// [`EBASE`]; host errors report their raw OS error, or `0` when none
    /// is available. [`Overflow`](Self::Overflow) and [`Range`](Self::Range)
    /// report the conventional `ENOMEM`/`ERANGE` host values.
    pub fn code(&self) -> i32 {
        match self {
            Self::Format => EFORMAT,
            Self::Drained => EDRAINED,
            Self::NotSupported => ENOTSUPP,
            Self::Oops => EOOPS,
            Self::Overflow => 12,
            Self::Range => 34,
            Self::Io(e) => e.raw_os_error().unwrap_or(0),
        }
    }

    /// Map a stable numeric code back to an error, if it names one.
    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            EFORMAT => Some(Self::Format),
            EDRAINED => Some(Self::Drained),
            ENOTSUPP => Some(Self::NotSupported),
            EOOPS => Some(Self::Oops),
            12 => Some(Self::Overflow),
            34 => Some(Self::Range),
            c if c > 0 => Some(Self::Io(io::Error::from_raw_os_error(c))),
            _ => None,
        }
    }
}

/// Human-readable description for a stable numeric code.
///
/// Codes outside the negative space belong to the host; describe those with
/// [`io::Error::from_raw_os_error`] instead.
pub fn strerror(code: i32) -> &'static str {
    match code {
        EFORMAT => "invalid format",
        EDRAINED => "unit drains buffer",
        ENOTSUPP => "unsupported conversion sequence",
        EOOPS => "machine traps",
        _ => "unknown error (hexfmt)",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_round_trip() {
        for err in [Error::Format, Error::Drained, Error::NotSupported, Error::Oops] {
            let code = err.code();
            assert!(code < 0 && code >= EBASE && code < ELAST);
            assert_eq!(Error::from_code(code).unwrap().code(), code);
            assert_eq!(strerror(code), err.to_string());
        }
    }

    #[test]
    fn test_unknown_code() {
        assert_eq!(strerror(ELAST), "unknown error (hexfmt)");
        assert_eq!(strerror(-1), "unknown error (hexfmt)");
        assert!(Error::from_code(ELAST).is_none());
    }
}
