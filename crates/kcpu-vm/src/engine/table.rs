//! Opcode dispatch table.

use std::fmt;
use std::sync::LazyLock;

use kcpu_bytecode::{OPCODE_SLOTS, Opcode, OperandKind};

use super::cpu::Cpu;
use super::error::Fault;
use super::handlers::handler_for;
use super::host::Host;
use super::state::Control;

/// Instruction implementation.
pub type Handler = fn(&mut Cpu, &mut dyn Host) -> Result<Control, Fault>;

/// Everything the engine needs to know about one opcode.
#[derive(Clone, Copy)]
pub struct Descriptor {
    pub opcode: Opcode,
    pub name: &'static str,
    pub operand: OperandKind,
    /// Stack values that must be present before the handler runs.
    pub stack_inputs: usize,
    pub handler: Handler,
}

impl fmt::Debug for Descriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Descriptor")
            .field("opcode", &self.opcode)
            .field("name", &self.name)
            .field("operand", &self.operand)
            .field("stack_inputs", &self.stack_inputs)
            .finish_non_exhaustive()
    }
}

/// One slot per possible opcode byte; unassigned bytes are `None`.
pub struct OpcodeTable {
    slots: [Option<Descriptor>; OPCODE_SLOTS],
}

static TABLE: LazyLock<OpcodeTable> = LazyLock::new(OpcodeTable::build);

impl OpcodeTable {
    /// The process-wide table, built on first use.
    pub fn get() -> &'static OpcodeTable {
        &TABLE
    }

    fn build() -> Self {
        let mut slots = [None; OPCODE_SLOTS];
        for &opcode in Opcode::ALL {
            slots[opcode.code() as usize] = Some(Descriptor {
                opcode,
                name: opcode.name(),
                operand: opcode.operand(),
                stack_inputs: opcode.stack_inputs(),
                handler: handler_for(opcode),
            });
        }
        Self { slots }
    }

    #[inline]
    pub fn lookup(&self, byte: u8) -> Option<&Descriptor> {
        self.slots[byte as usize].as_ref()
    }

    /// Populated slots in opcode order.
    pub fn iter(&self) -> impl Iterator<Item = &Descriptor> {
        self.slots.iter().flatten()
    }
}
