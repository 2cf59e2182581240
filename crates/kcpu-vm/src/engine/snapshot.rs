//! Serializable view of machine state.

use serde::Serialize;

use super::host::Host;
use super::state::State;
use super::vm::VM;

/// Point-in-time copy of the machine, for JSON output and tests.
///
/// RAM and VRAM are reduced to their non-zero cells.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fault: Option<String>,
    pub ip: usize,
    pub steps: u64,
    /// Bottom first.
    pub stack: Vec<f64>,
    pub registers: Vec<f64>,
    /// `(index, value)` pairs.
    pub ram: Vec<(usize, f64)>,
    pub screen: (usize, usize),
    pub vram: Vec<(usize, f64)>,
    pub graphics_active: bool,
}

impl<H: Host> VM<H> {
    pub fn snapshot(&self) -> Snapshot {
        let (state, fault) = match self.state() {
            State::Running => ("running", None),
            State::Halted => ("halted", None),
            State::Faulted(f) => ("faulted", Some(f.to_string())),
        };

        Snapshot {
            state: state.to_string(),
            fault,
            ip: self.ip(),
            steps: self.steps(),
            stack: self.stack().as_slice().to_vec(),
            registers: self.registers().to_vec(),
            ram: non_zero(self.ram()),
            screen: self.screen(),
            vram: non_zero(self.vram()),
            graphics_active: self.graphics_active(),
        }
    }
}

fn non_zero(cells: &[f64]) -> Vec<(usize, f64)> {
    cells
        .iter()
        .enumerate()
        .filter(|&(_, &v)| v != 0.0)
        .map(|(i, &v)| (i, v))
        .collect()
}
