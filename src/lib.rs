//! Streaming formatter for arbitrary byte input, driven by the classical
//! `hexdump` format language.
//!
//! A format description is compiled once into a small bytecode program over
//! an input block; byte streams are then pushed through the machine with
//! [`Interpreter::write`] and formatted text is pulled out incrementally
//! with [`Interpreter::read`].
//!
//! ```
//! use hexfmt::prelude::*;
//!
//! let mut fmt = Formatter::new("16/1 \"%.2x \"").expect("valid format");
//! let out = fmt.format(b"Hello, World!\n\0\0").expect("formats");
//! assert_eq!(
//!     out,
//!     b"48 65 6c 6c 6f 2c 20 57 6f 72 6c 64 21 0a 00 00"
//! );
//! ```
//!
//! [`Interpreter::write`]: crate::interpreter::Interpreter::write
//! [`Interpreter::read`]: crate::interpreter::Interpreter::read

pub mod compiler;
pub mod consts;
pub mod error;
pub mod formatter;
pub mod interpreter;
pub mod opcode;
pub mod program;
pub mod render;
pub mod scan;

pub mod prelude {
    pub use crate::compiler::compile;
    pub use crate::error::{strerror, Error, Result};
    pub use crate::formatter::Formatter;
    pub use crate::interpreter::Interpreter;
    pub use crate::opcode::Opcode;
    pub use crate::program::Program;
    pub use crate::scan::ConvFlags;
}
