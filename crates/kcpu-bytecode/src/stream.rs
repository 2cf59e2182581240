//! Sequential reader over program bytes.
//!
//! The stream owns the program and a cursor. Every read either consumes the
//! full operand or fails without moving the cursor.

use crate::constants::{ADDRESS_WIDTH, VALUE_WIDTH};
use crate::opcode::Region;

/// Decoding failures.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DecodeError {
    #[error("unexpected end of program at offset {offset}: need {needed} byte(s), program is {len} byte(s)")]
    OutOfBounds {
        offset: usize,
        needed: usize,
        len: usize,
    },

    #[error("invalid region tag {tag} at offset {offset}")]
    InvalidRegion { offset: usize, tag: u8 },

    #[error("invalid opcode {opcode} at offset {offset}")]
    InvalidOpcode { offset: usize, opcode: u8 },

    #[error("jump target {target} outside program of {len} byte(s)")]
    JumpOutOfRange { target: u64, len: usize },
}

/// Decoded `Target` operand.
///
/// RAM and VRAM indices stay as raw `f64`; converting them to cell indices
/// is the interpreter's job.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Target {
    Register(u8),
    Ram(f64),
    Vram(f64),
}

impl Target {
    pub fn region(&self) -> Region {
        match self {
            Self::Register(_) => Region::Register,
            Self::Ram(_) => Region::Ram,
            Self::Vram(_) => Region::Vram,
        }
    }
}

/// Program bytes plus an instruction pointer.
#[derive(Clone, Debug, Default)]
pub struct InstructionStream {
    bytes: Box<[u8]>,
    ip: usize,
}

impl InstructionStream {
    pub fn new(bytes: impl Into<Box<[u8]>>) -> Self {
        Self {
            bytes: bytes.into(),
            ip: 0,
        }
    }

    #[inline]
    pub fn position(&self) -> usize {
        self.ip
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn is_at_end(&self) -> bool {
        self.ip >= self.bytes.len()
    }

    pub fn bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn read_byte(&mut self) -> Result<u8, DecodeError> {
        let [b] = self.take::<1>()?;
        Ok(b)
    }

    /// Read an 8-byte little-endian `f64`.
    pub fn read_value(&mut self) -> Result<f64, DecodeError> {
        self.take::<VALUE_WIDTH>().map(f64::from_le_bytes)
    }

    /// Read an 8-byte little-endian jump target.
    pub fn read_address(&mut self) -> Result<u64, DecodeError> {
        self.take::<ADDRESS_WIDTH>().map(u64::from_le_bytes)
    }

    /// Read a region tag and its index.
    pub fn read_target(&mut self) -> Result<Target, DecodeError> {
        let start = self.ip;
        let tag = self.read_byte()?;

        let target = match Region::from_tag(tag) {
            Some(Region::Register) => self.read_byte().map(Target::Register),
            Some(Region::Ram) => self.read_value().map(Target::Ram),
            Some(Region::Vram) => self.read_value().map(Target::Vram),
            None => Err(DecodeError::InvalidRegion { offset: start, tag }),
        };

        if target.is_err() {
            self.ip = start;
        }
        target
    }

    /// Read a single operator byte.
    ///
    /// The byte is returned as is; deciding whether it names a supported
    /// operator is left to the caller.
    pub fn read_operator(&mut self) -> Result<u8, DecodeError> {
        self.read_byte()
    }

    /// Move the cursor. `target == len` is allowed and means end of program.
    pub fn set_position(&mut self, target: u64) -> Result<(), DecodeError> {
        self.ip = self.check_target(target)?;
        Ok(())
    }

    /// Validate a jump target without moving the cursor.
    pub fn check_target(&self, target: u64) -> Result<usize, DecodeError> {
        let len = self.bytes.len();
        match usize::try_from(target) {
            Ok(pos) if pos <= len => Ok(pos),
            _ => Err(DecodeError::JumpOutOfRange { target, len }),
        }
    }

    fn take<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let end = self.ip.saturating_add(N);
        let Some(chunk) = self.bytes.get(self.ip..end) else {
            return Err(DecodeError::OutOfBounds {
                offset: self.ip,
                needed: N,
                len: self.bytes.len(),
            });
        };

        let mut array = [0u8; N];
        array.copy_from_slice(chunk);
        self.ip = end;
        Ok(array)
    }
}
