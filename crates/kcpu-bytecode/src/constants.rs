//! Bytecode format constants.

/// Program format version emitted by producers of kcpu bytecode.
pub const VERSION: u16 = 1;

/// Number of general-purpose registers (`a` through `z`).
pub const REGISTER_COUNT: usize = 26;

/// Size of the opcode space; one slot per possible opcode byte.
pub const OPCODE_SLOTS: usize = 256;

/// Width of a floating operand (`f64`, little-endian).
pub const VALUE_WIDTH: usize = 8;

/// Width of a jump/call target (`u64` byte offset, little-endian).
pub const ADDRESS_WIDTH: usize = 8;

/// Tolerance used by `je`/`jne`.
pub const EQ_EPSILON: f64 = 1e-6;

/// Largest integer that round-trips exactly through `f64`.
///
/// Return addresses and memory indices travel through the operand stack as
/// floats; anything above this bound would lose precision.
pub const MAX_EXACT_ADDRESS: u64 = 1 << 53;
