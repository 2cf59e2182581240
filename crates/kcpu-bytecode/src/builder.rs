//! Programmatic bytecode emitter.
//!
//! Labels may be referenced before they are bound; their operands are
//! patched in [`ProgramBuilder::finish`].

use std::fmt;
use std::sync::atomic::{AtomicU32, Ordering};

use crate::opcode::{Opcode, OperandKind};
use crate::stream::Target;

static NEXT_BUILDER_ID: AtomicU32 = AtomicU32::new(0);

/// Jump target handle issued by [`ProgramBuilder::label`].
///
/// A label is only meaningful to the builder that issued it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct Label {
    builder: u32,
    index: u32,
}

impl fmt::Display for Label {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "L{}", self.index)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BuildError {
    #[error("label {0} is referenced but never bound")]
    UnboundLabel(Label),

    #[error("label {0} is bound more than once")]
    AlreadyBound(Label),

    #[error("label {0} was issued by another builder")]
    UnknownLabel(Label),
}

/// Byte emitter for kcpu programs.
///
/// ```
/// use kcpu_bytecode::{Opcode, ProgramBuilder};
///
/// let mut b = ProgramBuilder::new();
/// b.push(3.0).push(4.0).op(Opcode::Add).op(Opcode::Out).op(Opcode::Halt);
/// let bytes = b.finish().unwrap();
/// assert_eq!(bytes.len(), 21);
/// ```
#[derive(Debug)]
pub struct ProgramBuilder {
    id: u32,
    bytes: Vec<u8>,
    /// Bound offset per label, indexed by label id.
    labels: Vec<Option<usize>>,
    /// Operand offsets waiting for a label address.
    fixups: Vec<(usize, Label)>,
    error: Option<BuildError>,
}

impl Default for ProgramBuilder {
    fn default() -> Self {
        Self {
            id: NEXT_BUILDER_ID.fetch_add(1, Ordering::Relaxed),
            bytes: Vec::new(),
            labels: Vec::new(),
            fixups: Vec::new(),
            error: None,
        }
    }
}

impl ProgramBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Offset the next emitted byte will land at.
    pub fn position(&self) -> usize {
        self.bytes.len()
    }

    /// Allocate a new, unbound label.
    pub fn label(&mut self) -> Label {
        let label = Label {
            builder: self.id,
            index: self.labels.len() as u32,
        };
        self.labels.push(None);
        label
    }

    /// Bind `label` to the current position.
    pub fn bind(&mut self, label: Label) -> &mut Self {
        let here = self.bytes.len();
        let err = match self.slot(label) {
            None => Some(BuildError::UnknownLabel(label)),
            Some(Some(_)) => Some(BuildError::AlreadyBound(label)),
            Some(slot) => {
                *slot = Some(here);
                None
            }
        };
        if let Some(err) = err {
            self.fail(err);
        }
        self
    }

    /// Emit a bare opcode byte.
    ///
    /// Operand-carrying opcodes should go through their dedicated methods;
    /// emitting them here produces an instruction without its operand.
    pub fn op(&mut self, opcode: Opcode) -> &mut Self {
        self.bytes.push(opcode.code());
        self
    }

    pub fn push(&mut self, value: f64) -> &mut Self {
        self.op(Opcode::Push);
        self.bytes.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn pop_to(&mut self, target: Target) -> &mut Self {
        self.op(Opcode::Pop).target(target)
    }

    pub fn load_from(&mut self, target: Target) -> &mut Self {
        self.op(Opcode::Load).target(target)
    }

    /// Emit a jump-family instruction (`jmp`, conditional jumps, `call`).
    pub fn jump(&mut self, opcode: Opcode, label: Label) -> &mut Self {
        debug_assert_eq!(opcode.operand(), OperandKind::Label);
        if self.slot(label).is_none() {
            self.fail(BuildError::UnknownLabel(label));
        }
        self.op(opcode);
        self.fixups.push((self.bytes.len(), label));
        self.bytes.extend_from_slice(&0u64.to_le_bytes());
        self
    }

    /// Emit a jump-family instruction with a literal address.
    pub fn jump_to(&mut self, opcode: Opcode, address: u64) -> &mut Self {
        self.op(opcode);
        self.bytes.extend_from_slice(&address.to_le_bytes());
        self
    }

    pub fn bin_op(&mut self, operator: u8) -> &mut Self {
        self.op(Opcode::BinOp);
        self.bytes.push(operator);
        self
    }

    /// Append raw bytes.
    pub fn raw(&mut self, bytes: &[u8]) -> &mut Self {
        self.bytes.extend_from_slice(bytes);
        self
    }

    /// Patch label operands and return the program.
    pub fn finish(self) -> Result<Vec<u8>, BuildError> {
        if let Some(err) = self.error {
            return Err(err);
        }

        let mut bytes = self.bytes;
        for (at, label) in self.fixups {
            let addr = self
                .labels
                .get(label.index as usize)
                .copied()
                .flatten()
                .ok_or(BuildError::UnboundLabel(label))?;
            bytes[at..at + 8].copy_from_slice(&(addr as u64).to_le_bytes());
        }
        Ok(bytes)
    }

    fn target(&mut self, target: Target) -> &mut Self {
        self.bytes.push(target.region().tag());
        match target {
            Target::Register(r) => self.bytes.push(r),
            Target::Ram(i) | Target::Vram(i) => self.bytes.extend_from_slice(&i.to_le_bytes()),
        }
        self
    }

    /// Bound offset slot for a label issued by this builder.
    fn slot(&mut self, label: Label) -> Option<&mut Option<usize>> {
        if label.builder != self.id {
            return None;
        }
        self.labels.get_mut(label.index as usize)
    }

    fn fail(&mut self, err: BuildError) {
        self.error.get_or_insert(err);
    }
}
