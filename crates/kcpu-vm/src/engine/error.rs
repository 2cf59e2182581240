//! Reasons a run can fault.

use kcpu_bytecode::{DecodeError, Region};
use kcpu_core::StackError;

use super::host::HostError;

/// Terminal failure of a run, carried by `State::Faulted`.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Fault {
    #[error("invalid opcode {opcode} at offset {ip}")]
    InvalidOpcode { opcode: u8, ip: usize },

    /// Fewer values on the operand stack than the instruction consumes.
    #[error("`{name}` needs {needed} stack operand(s), found {available}")]
    MissingOperands {
        name: &'static str,
        needed: usize,
        available: usize,
    },

    #[error(transparent)]
    Stack(#[from] StackError),

    #[error(transparent)]
    Decode(#[from] DecodeError),

    /// A stack value used as an address or index is not a non-negative
    /// integer that `f64` represents exactly.
    #[error("invalid address {0}")]
    InvalidAddress(f64),

    #[error("register {0} out of range")]
    RegisterOutOfRange(u8),

    #[error("{region} index {index} out of range for {len} cell(s)")]
    MemoryOutOfRange {
        region: Region,
        index: u64,
        len: usize,
    },

    #[error("ram of {0} cell(s) is too large")]
    RamTooLarge(usize),

    #[error("screen {width}x{height} is too large")]
    ScreenTooLarge { width: u64, height: u64 },

    #[error("invalid operator {0:#04x}")]
    InvalidOperator(u8),

    #[error("host: {0}")]
    Host(#[from] HostError),

    #[error("execution fuel exhausted after {0} step(s)")]
    ExecFuelExhausted(u64),
}
