//! Diagnostic text rendering of machine state.

use std::fmt::Write as _;

use kcpu_bytecode::{format_value, register_name, width_for_count};
use kcpu_core::Colors;

use super::host::Host;
use super::state::State;
use super::vm::VM;

/// Stack entries shown, counted from the top.
const STACK_DEPTH: usize = 10;

impl<H: Host> VM<H> {
    /// Render state, stack, non-zero registers and RAM, and the screen.
    pub fn dump(&self, colors: Colors) -> String {
        let c = colors;
        let mut out = String::new();

        let state_role = match self.state() {
            State::Running => "",
            State::Halted => c.label,
            State::Faulted(_) => c.fault,
        };
        writeln!(out, "{}", c.paint(c.section, "[machine]")).unwrap();
        writeln!(out, "state = {}", c.paint(state_role, self.state())).unwrap();
        writeln!(out, "ip = {}", self.ip()).unwrap();
        writeln!(out, "steps = {}", self.steps()).unwrap();

        let stack = self.stack();
        writeln!(out).unwrap();
        writeln!(out, "{}", c.paint(c.section, "[stack]")).unwrap();
        writeln!(out, "size = {}", stack.size()).unwrap();
        writeln!(out, "capacity = {}", stack.capacity()).unwrap();
        let w = width_for_count(stack.size());
        for (depth, value) in stack.iter().take(STACK_DEPTH).enumerate() {
            let index = stack.size() - 1 - depth;
            writeln!(out, "  {:0w$}  {}", c.paint(c.muted, index), format_value(*value)).unwrap();
        }
        if stack.size() > STACK_DEPTH {
            let rest = stack.size() - STACK_DEPTH;
            writeln!(out, "  {}", c.paint(c.muted, format_args!("... {rest} more"))).unwrap();
        }

        writeln!(out).unwrap();
        writeln!(out, "{}", c.paint(c.section, "[registers]")).unwrap();
        for (i, &value) in self.registers().iter().enumerate() {
            if value != 0.0 {
                writeln!(out, "{} = {}", register_name(i as u8), format_value(value)).unwrap();
            }
        }

        let ram = self.ram();
        writeln!(out).unwrap();
        writeln!(out, "{}", c.paint(c.section, "[ram]")).unwrap();
        writeln!(out, "size = {}", ram.len()).unwrap();
        for (i, &value) in ram.iter().enumerate() {
            if value != 0.0 {
                writeln!(out, "[{i}] = {}", format_value(value)).unwrap();
            }
        }

        let (width, height) = self.screen();
        writeln!(out).unwrap();
        writeln!(out, "{}", c.paint(c.section, "[screen]")).unwrap();
        writeln!(out, "size = {width}x{height}").unwrap();
        writeln!(out, "drawing = {}", if self.graphics_active() { "on" } else { "off" }).unwrap();

        out
    }
}
