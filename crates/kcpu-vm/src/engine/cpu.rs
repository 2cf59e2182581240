//! Machine state operated on by the handlers.

use kcpu_bytecode::InstructionStream;
use kcpu_core::{Stack, StackError};

use super::error::Fault;
use super::host::Frame;
use super::memory::Memory;
use super::rng::Rng;

/// Everything an instruction can touch except the host.
#[derive(Clone, Debug)]
pub struct Cpu {
    pub(crate) stack: Stack<f64>,
    pub(crate) stream: InstructionStream,
    pub(crate) memory: Memory,
    /// Render VRAM after every step.
    pub(crate) graphics_active: bool,
    pub(crate) rng: Rng,
}

impl Cpu {
    pub(crate) fn new(
        stack: Stack<f64>,
        stream: InstructionStream,
        memory: Memory,
        rng: Rng,
    ) -> Self {
        Self {
            stack,
            stream,
            memory,
            graphics_active: false,
            rng,
        }
    }

    pub fn stack(&self) -> &Stack<f64> {
        &self.stack
    }

    pub fn stream(&self) -> &InstructionStream {
        &self.stream
    }

    pub fn memory(&self) -> &Memory {
        &self.memory
    }

    pub fn graphics_active(&self) -> bool {
        self.graphics_active
    }

    pub(crate) fn push(&mut self, value: f64) -> Result<(), Fault> {
        Ok(self.stack.push(value)?)
    }

    pub(crate) fn pop(&mut self) -> Result<f64, Fault> {
        Ok(self.stack.pop()?)
    }

    /// Pop two values and return them as `(second, first)`, `first` being
    /// the old top of the stack.
    pub(crate) fn pop_pair(&mut self) -> Result<(f64, f64), Fault> {
        let first = self.pop()?;
        let second = self.pop()?;
        Ok((second, first))
    }

    pub(crate) fn peek(&self) -> Result<f64, Fault> {
        Ok(self.stack.peek()?)
    }

    /// Read the top two values as `(second, first)` without popping.
    pub(crate) fn peek_pair(&self) -> Result<(f64, f64), Fault> {
        self.stack.valid()?;
        match self.stack.as_slice() {
            [.., second, first] => Ok((*second, *first)),
            _ => Err(StackError::Underflow.into()),
        }
    }

    pub(crate) fn frame(&self) -> Frame<'_> {
        let (width, height) = self.memory.screen();
        Frame {
            width,
            height,
            cells: self.memory.vram(),
        }
    }
}
