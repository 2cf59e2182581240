use std::fmt;

use super::error::Fault;

/// Engine state.
///
/// `Halted` and `Faulted` are terminal: stepping a terminal machine returns
/// the same state and changes nothing.
#[derive(Clone, Debug, PartialEq)]
pub enum State {
    Running,
    Halted,
    Faulted(Fault),
}

impl State {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Running)
    }

    pub fn fault(&self) -> Option<&Fault> {
        match self {
            Self::Faulted(fault) => Some(fault),
            _ => None,
        }
    }
}

impl fmt::Display for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Running => f.write_str("running"),
            Self::Halted => f.write_str("halted"),
            Self::Faulted(fault) => write!(f, "faulted: {fault}"),
        }
    }
}

/// What a handler asks the engine to do next.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Control {
    /// Fall through to the next instruction.
    Continue,
    /// Move the instruction pointer to the given byte offset.
    Jump(u64),
    Halt,
}
