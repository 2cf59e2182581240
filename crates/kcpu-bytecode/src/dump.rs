//! Human-readable disassembly.
//!
//! ```text
//! [header]
//! version = 1
//! size = 30
//!
//! [code]
//!   00  push       1
//!   09  jmp        L0
//!   18  push       2
//!
//! L0:
//!   27  out
//!   28  out_n
//!   29  halt
//! ```

use std::collections::BTreeMap;
use std::fmt::Write as _;

use kcpu_core::Colors;

use crate::constants::VERSION;
use crate::format::{format_operand, width_for_count};
use crate::instruction::{Instruction, Operand, decode_all};

/// Render the program as a `[header]` section followed by `[code]`.
pub fn dump(bytes: &[u8], colors: Colors) -> String {
    let c = colors;
    let (instrs, error) = decode_all(bytes);
    let labels = collect_labels(&instrs);
    let w = width_for_count(bytes.len()).max(2);

    let mut out = String::new();
    writeln!(out, "{}", c.paint(c.section, "[header]")).unwrap();
    writeln!(out, "version = {VERSION}").unwrap();
    writeln!(out, "size = {}", bytes.len()).unwrap();
    writeln!(out).unwrap();
    writeln!(out, "{}", c.paint(c.section, "[code]")).unwrap();

    for instr in &instrs {
        if let Some(n) = labels.get(&(instr.offset as u64)) {
            writeln!(out).unwrap();
            writeln!(out, "{}", c.paint(c.label, format_args!("L{n}:"))).unwrap();
        }

        let name = instr.opcode.name();
        let offset = c.paint(c.muted, instr.offset);
        match render_operand(instr, &labels, c) {
            Some(operand) => writeln!(out, "  {offset:0w$}  {name:<10} {operand}"),
            None => writeln!(out, "  {offset:0w$}  {name}"),
        }
        .unwrap();
    }

    if let Some(e) = error {
        writeln!(out, "  {}", c.paint(c.fault, format_args!("<error: {e}>"))).unwrap();
    }

    out
}

/// Number jump targets that land on an instruction start, in address order.
fn collect_labels(instrs: &[Instruction]) -> BTreeMap<u64, usize> {
    let starts: Vec<u64> = instrs.iter().map(|i| i.offset as u64).collect();
    let mut targets: Vec<u64> = instrs
        .iter()
        .filter_map(Instruction::label)
        .filter(|t| starts.binary_search(t).is_ok())
        .collect();
    targets.sort_unstable();
    targets.dedup();

    targets.into_iter().enumerate().map(|(n, t)| (t, n)).collect()
}

fn render_operand(
    instr: &Instruction,
    labels: &BTreeMap<u64, usize>,
    c: Colors,
) -> Option<String> {
    match instr.operand {
        Operand::Label(target) => match labels.get(&target) {
            Some(n) => Some(c.paint(c.label, format_args!("L{n}")).to_string()),
            None => format_operand(&instr.operand),
        },
        operand => format_operand(&operand),
    }
}
