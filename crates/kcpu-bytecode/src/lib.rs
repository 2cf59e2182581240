//! Bytecode format and opcode table for kcpu.
//!
//! This crate contains:
//! - The declarative opcode list ([`for_each_opcode!`]) and the [`Opcode`] enum it generates
//! - The instruction stream reader used by the interpreter
//! - Instruction decoding and a human-readable disassembly dump
//! - [`ProgramBuilder`] for emitting program bytes from Rust

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod builder;
pub mod constants;
pub mod dump;
pub mod format;
pub mod instruction;
pub mod opcode;
pub mod stream;

#[cfg(test)]
mod builder_tests;
#[cfg(test)]
mod dump_tests;
#[cfg(test)]
mod format_tests;

pub use builder::{BuildError, Label, ProgramBuilder};
pub use constants::{
    ADDRESS_WIDTH, EQ_EPSILON, MAX_EXACT_ADDRESS, OPCODE_SLOTS, REGISTER_COUNT, VALUE_WIDTH,
    VERSION,
};
pub use dump::dump;
pub use format::{format_operand, format_value, register_name, width_for_count};
pub use instruction::{Instruction, Operand, decode_all};
pub use opcode::{Opcode, OperandKind, Region};
pub use stream::{DecodeError, InstructionStream, Target};
