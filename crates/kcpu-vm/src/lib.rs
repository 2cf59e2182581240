//! Runtime VM for executing kcpu programs.
//!
//! This crate provides the virtual machine that executes raw kcpu bytecode
//! against an operand stack, a register file, RAM and VRAM, talking to the
//! outside world through a [`Host`].

pub mod engine;

// Re-export commonly used items at crate root
pub use engine::{
    BufferHost, Control, Cpu, DEFAULT_SEED, Descriptor, Fault, Frame, FuelLimits, Host,
    HostError, MAX_RAM_CELLS, MAX_SCREEN_CELLS, Memory, NoopTracer, OpcodeTable, PrintTracer,
    Rng, Snapshot, State, StdHost, Tracer, VM, VMBuilder, Verbosity, to_address,
};
