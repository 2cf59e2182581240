//! Execution tracing for debugging programs.
//!
//! The engine calls into a [`Tracer`] at fixed points of every step. With
//! [`NoopTracer`] all hooks are empty inline functions and compile away.
//! Formatting and any lookup tables live in the tracer itself.

use std::collections::BTreeMap;

use kcpu_bytecode::{
    Instruction, Opcode, decode_all, format_operand, format_value, width_for_count,
};
use kcpu_core::{Colors, Stack};

use super::error::Fault;

/// Verbosity level for trace output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Instructions, jumps and the final state.
    #[default]
    Default,
    /// (-v): also the top of the stack after every step.
    Verbose,
    /// (-vv): also the whole stack after every step.
    VeryVerbose,
}

/// Hooks invoked by the engine.
///
/// - `trace_instruction`: after the opcode is fetched, before it runs
/// - `trace_stack`: after an instruction completed without faulting
/// - `trace_jump`: when an instruction moved the instruction pointer
/// - `trace_halt`: when the machine halts
/// - `trace_fault`: when the machine faults
pub trait Tracer {
    fn trace_instruction(&mut self, ip: usize, opcode: Opcode);

    fn trace_stack(&mut self, stack: &Stack<f64>);

    fn trace_jump(&mut self, from: usize, target: u64);

    fn trace_halt(&mut self, ip: usize);

    fn trace_fault(&mut self, ip: usize, fault: &Fault);
}

/// Tracer that does nothing.
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_instruction(&mut self, _ip: usize, _opcode: Opcode) {}

    #[inline(always)]
    fn trace_stack(&mut self, _stack: &Stack<f64>) {}

    #[inline(always)]
    fn trace_jump(&mut self, _from: usize, _target: u64) {}

    #[inline(always)]
    fn trace_halt(&mut self, _ip: usize) {}

    #[inline(always)]
    fn trace_fault(&mut self, _ip: usize, _fault: &Fault) {}
}

/// Entries shown by `Verbose`.
const TOP_ENTRIES: usize = 3;

/// Tracer that collects a human-readable execution log.
pub struct PrintTracer {
    verbosity: Verbosity,
    /// Decoded program, keyed by offset, for operand display.
    instructions: BTreeMap<usize, Instruction>,
    /// Offset width.
    w: usize,
    lines: Vec<String>,
    colors: Colors,
}

impl PrintTracer {
    pub fn new(program: &[u8], verbosity: Verbosity, colors: Colors) -> Self {
        let (instrs, _) = decode_all(program);
        let instructions = instrs.into_iter().map(|i| (i.offset, i)).collect();

        Self {
            verbosity,
            instructions,
            w: width_for_count(program.len()).max(2),
            lines: Vec::new(),
            colors,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// All lines joined, each terminated by a newline.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    /// Print all trace lines to stderr.
    pub fn print(&self) {
        eprint!("{}", self.render());
    }

    fn add_subline(&mut self, content: String) {
        let indent = 2 + self.w + 2;
        self.lines.push(format!("{:indent$}{content}", ""));
    }
}

impl Tracer for PrintTracer {
    fn trace_instruction(&mut self, ip: usize, opcode: Opcode) {
        let c = self.colors;
        let w = self.w;
        let name = opcode.name();
        let operand = self
            .instructions
            .get(&ip)
            .and_then(|i| format_operand(&i.operand));

        let ip = c.paint(c.muted, ip);
        let line = match operand {
            Some(op) => format!("  {ip:0w$}  {:<10} {op}", c.paint(c.mnemonic, name)),
            None => format!("  {ip:0w$}  {}", c.paint(c.mnemonic, name)),
        };
        self.lines.push(line);
    }

    fn trace_stack(&mut self, stack: &Stack<f64>) {
        let shown = match self.verbosity {
            Verbosity::Default => return,
            Verbosity::Verbose => TOP_ENTRIES,
            Verbosity::VeryVerbose => usize::MAX,
        };

        let c = self.colors;
        let values = stack.as_slice();
        let skip = values.len().saturating_sub(shown);
        let mut parts: Vec<String> = values[skip..].iter().map(|&v| format_value(v)).collect();
        if skip > 0 {
            parts.insert(0, "..".to_string());
        }
        let listing = format!("stack: [{}]", parts.join(" "));
        self.add_subline(c.paint(c.muted, listing).to_string());
    }

    fn trace_jump(&mut self, _from: usize, target: u64) {
        let w = self.w;
        self.add_subline(format!("-> {target:0w$}"));
    }

    fn trace_halt(&mut self, _ip: usize) {
        let c = self.colors;
        self.add_subline(c.paint(c.label, "halted").to_string());
    }

    fn trace_fault(&mut self, _ip: usize, fault: &Fault) {
        let c = self.colors;
        self.add_subline(c.paint(c.fault, format_args!("fault: {fault}")).to_string());
    }
}
