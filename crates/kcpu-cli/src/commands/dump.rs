//! Show program disassembly.

use std::path::PathBuf;

use kcpu_bytecode::dump;
use kcpu_core::Colors;

use super::run_common;

pub struct DumpArgs {
    pub program: PathBuf,
    pub color: bool,
}

pub fn run(args: DumpArgs) {
    let program = run_common::load_program_or_exit(&args.program);
    print!("{}", dump(&program, Colors::new(args.color)));
}
