//! Runtime engine for executing kcpu programs.
//!
//! One step fetches an opcode byte, looks its descriptor up in the opcode
//! table, checks stack depth and runs the handler. Handlers never move the
//! instruction pointer themselves; they return a [`Control`] the engine
//! applies.

mod cpu;
mod dump;
mod error;
mod handlers;
mod host;
mod memory;
mod rng;
mod snapshot;
mod state;
mod table;
mod trace;
mod vm;

#[cfg(test)]
mod dump_tests;
#[cfg(test)]
mod host_tests;
#[cfg(test)]
mod table_tests;

pub use cpu::Cpu;
pub use error::Fault;
pub use host::{BufferHost, Frame, Host, HostError, StdHost};
pub use memory::{MAX_RAM_CELLS, MAX_SCREEN_CELLS, Memory, to_address};
pub use rng::{DEFAULT_SEED, Rng};
pub use snapshot::Snapshot;
pub use state::{Control, State};
pub use table::{Descriptor, Handler, OpcodeTable};
pub use trace::{NoopTracer, PrintTracer, Tracer, Verbosity};
pub use vm::{FuelLimits, VM, VMBuilder};
