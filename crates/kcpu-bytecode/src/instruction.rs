//! Whole-instruction decoding.
//!
//! The interpreter reads operands lazily inside each handler; this module
//! decodes an opcode together with its operand for tools that need the
//! complete instruction up front (disassembly, tests).

use crate::opcode::{Opcode, OperandKind};
use crate::stream::{DecodeError, InstructionStream, Target};

/// Decoded stream operand.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Operand {
    None,
    Constant(f64),
    Register(u8),
    Ram(f64),
    Vram(f64),
    Label(u64),
    Operator(u8),
}

impl From<Target> for Operand {
    fn from(target: Target) -> Self {
        match target {
            Target::Register(r) => Self::Register(r),
            Target::Ram(i) => Self::Ram(i),
            Target::Vram(i) => Self::Vram(i),
        }
    }
}

/// One decoded instruction.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Instruction {
    /// Byte offset of the opcode.
    pub offset: usize,
    pub opcode: Opcode,
    pub operand: Operand,
    /// Encoded size in bytes, opcode included.
    pub size: usize,
}

impl Instruction {
    /// Decode the instruction at the stream's cursor.
    ///
    /// On success the cursor sits after the operand; on failure it is left
    /// where it was.
    pub fn decode(stream: &mut InstructionStream) -> Result<Self, DecodeError> {
        let offset = stream.position();
        let decoded = Self::decode_at(stream, offset);
        if decoded.is_err() {
            // offset came from the stream, so this cannot fail
            let _ = stream.set_position(offset as u64);
        }
        decoded
    }

    fn decode_at(stream: &mut InstructionStream, offset: usize) -> Result<Self, DecodeError> {
        let byte = stream.read_byte()?;
        let opcode = Opcode::from_byte(byte).ok_or(DecodeError::InvalidOpcode {
            offset,
            opcode: byte,
        })?;

        let operand = match opcode.operand() {
            OperandKind::None => Operand::None,
            OperandKind::Constant => Operand::Constant(stream.read_value()?),
            OperandKind::Target => stream.read_target()?.into(),
            OperandKind::Label => Operand::Label(stream.read_address()?),
            OperandKind::Operator => Operand::Operator(stream.read_operator()?),
        };

        Ok(Self {
            offset,
            opcode,
            operand,
            size: stream.position() - offset,
        })
    }

    /// Offset of the instruction that follows this one.
    pub fn next_offset(&self) -> usize {
        self.offset + self.size
    }

    /// Jump target, for instructions that carry one.
    pub fn label(&self) -> Option<u64> {
        match self.operand {
            Operand::Label(target) => Some(target),
            _ => None,
        }
    }
}

/// Decode every instruction of a program, stopping at the first error.
///
/// Returns the instructions decoded so far together with the error, if any.
pub fn decode_all(bytes: &[u8]) -> (Vec<Instruction>, Option<DecodeError>) {
    let mut stream = InstructionStream::new(bytes.to_vec());
    let mut out = Vec::new();

    while !stream.is_at_end() {
        match Instruction::decode(&mut stream) {
            Ok(instr) => out.push(instr),
            Err(e) => return (out, Some(e)),
        }
    }

    (out, None)
}
