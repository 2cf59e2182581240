//! Run a program against the process streams.

use std::path::PathBuf;

use kcpu_core::Colors;

use super::run_common::{self, MachineConfig};

pub struct ExecArgs {
    pub program: PathBuf,
    pub machine: MachineConfig,
    pub dump: bool,
    pub snapshot: bool,
    pub color: bool,
}

pub fn run(args: ExecArgs) {
    let mut vm = run_common::prepare_vm(&args.program, &args.machine);
    vm.run();

    run_common::flush_output(&mut vm);
    let code = run_common::report_state(vm.state());
    run_common::print_reports(&vm, args.dump, args.snapshot, Colors::new(args.color));

    if code != 0 {
        std::process::exit(code);
    }
}
