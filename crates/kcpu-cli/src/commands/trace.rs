//! Trace program execution for debugging.

use std::path::PathBuf;

use kcpu_core::Colors;
use kcpu_vm::{PrintTracer, Verbosity};

use super::run_common::{self, MachineConfig};

pub struct TraceArgs {
    pub program: PathBuf,
    pub machine: MachineConfig,
    pub verbosity: Verbosity,
    pub dump: bool,
    pub snapshot: bool,
    pub color: bool,
}

pub fn run(args: TraceArgs) {
    let program = run_common::load_program_or_exit(&args.program);
    let colors = Colors::new(args.color);
    let mut tracer = PrintTracer::new(&program, args.verbosity, colors);

    let builder = run_common::configure(program, &args.machine)
        .host(run_common::std_host(run_common::is_stdin(&args.program)));
    let mut vm = run_common::build_or_exit(builder);
    vm.run_with(&mut tracer);

    // Program output first, then the trace.
    run_common::flush_output(&mut vm);
    tracer.print();
    let code = run_common::report_state(vm.state());
    run_common::print_reports(&vm, args.dump, args.snapshot, colors);

    if code != 0 {
        std::process::exit(code);
    }
}
