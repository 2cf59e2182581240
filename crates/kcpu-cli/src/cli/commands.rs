//! Command builders for the CLI.
//!
//! Each command is built using the shared arg builders from `args.rs`.
//! All three commands accept every machine flag; the ones a command ignores
//! are hidden from its `--help`.

use clap::Command;

use super::args::*;

/// Add hidden machine args (for commands that don't execute).
fn with_hidden_machine_args(cmd: Command) -> Command {
    cmd.arg(fuel_arg().hide(true))
        .arg(ram_arg().hide(true))
        .arg(screen_arg().hide(true))
}

/// Add hidden post-run output args (for commands that don't execute).
fn with_hidden_output_args(cmd: Command) -> Command {
    cmd.arg(dump_arg().hide(true))
        .arg(snapshot_arg().hide(true))
}

pub fn build_cli() -> Command {
    Command::new("kcpu")
        .about("Stack-machine bytecode interpreter")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .subcommand(exec_command())
        .subcommand(trace_command())
        .subcommand(dump_command())
}

/// Run a program.
pub fn exec_command() -> Command {
    Command::new("exec")
        .about("Run a program")
        .override_usage(
            "\
  kcpu exec <PROGRAM>
  kcpu exec <PROGRAM> --screen <WxH> --ram <CELLS>
  kcpu exec - < program.bin",
        )
        .after_help(
            r#"EXAMPLES:
  kcpu exec sum.bin                  # run, reading `in` values from stdin
  kcpu exec sum.bin --dump           # print the machine state afterwards
  kcpu exec plot.bin --screen 40x20  # start with a 40x20 screen
  kcpu exec sum.bin --snapshot | jq  # machine state as JSON"#,
        )
        .arg(program_arg())
        .arg(fuel_arg())
        .arg(ram_arg())
        .arg(screen_arg())
        .arg(dump_arg())
        .arg(snapshot_arg())
        .arg(color_arg())
        .arg(verbose_arg().hide(true))
}

/// Run a program and print an execution trace.
pub fn trace_command() -> Command {
    Command::new("trace")
        .about("Trace program execution for debugging")
        .override_usage(
            "\
  kcpu trace <PROGRAM>
  kcpu trace <PROGRAM> -v
  kcpu trace <PROGRAM> -vv --fuel <N>",
        )
        .after_help(
            r#"EXAMPLES:
  kcpu trace loop.bin               # instructions and jumps
  kcpu trace loop.bin -v            # plus the stack top after each step
  kcpu trace loop.bin -vv --fuel 50 # whole stack, stop after 50 steps"#,
        )
        .arg(program_arg())
        .arg(verbose_arg())
        .arg(fuel_arg())
        .arg(ram_arg())
        .arg(screen_arg())
        .arg(dump_arg())
        .arg(snapshot_arg())
        .arg(color_arg())
}

/// Disassemble a program.
pub fn dump_command() -> Command {
    let cmd = Command::new("dump")
        .about("Show program disassembly")
        .override_usage(
            "\
  kcpu dump <PROGRAM>
  kcpu dump - < program.bin",
        )
        .after_help(
            r#"EXAMPLES:
  kcpu dump loop.bin                # header and code with labels
  kcpu dump loop.bin --color never  # plain text"#,
        )
        .arg(program_arg())
        .arg(color_arg());

    with_hidden_output_args(with_hidden_machine_args(cmd.arg(verbose_arg().hide(true))))
}
