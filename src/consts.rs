//! Machine parameters

/// Capacity of a compiled program, in bytes.
///
/// Realistic formats compile to a few hundred bytes; exhausting this space
/// fails compilation with [`Error::Overflow`](crate::error::Error::Overflow)
/// rather than truncating.
pub const PROGRAM_SIZE: usize = 4096;

/// Depth of the operand stack.
///
/// A compiled unit never holds more than six live operands: the loop
/// counter plus the five conversion operands.
pub const STACK_DEPTH: usize = 8;

/// Initial reservation for the elastic output buffer, in bytes.
pub const OUTPUT_RESERVE: usize = 64;

/// Capacity of the intermediate buffer one conversion may render into.
pub const CONV_BUF_SIZE: usize = 256;
