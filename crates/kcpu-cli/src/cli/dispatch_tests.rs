//! Tests for CLI dispatch logic.
//!
//! These tests verify:
//! 1. Unified flags: dump/exec/trace accept each other's flags without error
//! 2. Help visibility: hidden flags don't appear in --help
//! 3. Params extraction: correct fields are extracted from ArgMatches

use std::path::PathBuf;

use kcpu_vm::Verbosity;

use super::*;
use crate::cli::commands::{dump_command, exec_command, trace_command};
use crate::commands::exec::ExecArgs;
use crate::commands::trace::TraceArgs;

#[test]
fn exec_defaults() {
    let m = exec_command()
        .try_get_matches_from(["exec", "prog.bin"])
        .unwrap();
    let params = ExecParams::from_matches(&m);

    assert_eq!(params.program, PathBuf::from("prog.bin"));
    assert_eq!(params.fuel, 10_000_000);
    assert_eq!(params.ram, 1024);
    assert_eq!(params.screen, None);
    assert!(!params.dump);
    assert!(!params.snapshot);
    assert_eq!(params.color, ColorChoice::Auto);
}

#[test]
fn exec_machine_flags() {
    let m = exec_command()
        .try_get_matches_from([
            "exec", "prog.bin", "--fuel", "500", "--ram", "16", "--screen", "40x20", "--dump",
            "--snapshot", "--color", "never",
        ])
        .unwrap();
    let args: ExecArgs = ExecParams::from_matches(&m).into();

    assert_eq!(args.machine.fuel, 500);
    assert_eq!(args.machine.ram, 16);
    assert_eq!(args.machine.screen, Some((40, 20)));
    assert!(args.dump);
    assert!(args.snapshot);
    assert!(!args.color);
}

#[test]
fn exec_accepts_program_from_stdin() {
    let m = exec_command().try_get_matches_from(["exec", "-"]).unwrap();
    assert_eq!(ExecParams::from_matches(&m).program, PathBuf::from("-"));
}

#[test]
fn exec_requires_program() {
    assert!(exec_command().try_get_matches_from(["exec"]).is_err());
}

#[test]
fn exec_rejects_bad_screen() {
    let result = exec_command().try_get_matches_from(["exec", "prog.bin", "--screen", "40"]);
    assert!(result.is_err());
}

#[test]
fn exec_rejects_oversized_memory() {
    let ram = exec_command().try_get_matches_from(["exec", "prog.bin", "--ram", "99999999999"]);
    assert!(ram.is_err());

    let screen =
        trace_command().try_get_matches_from(["trace", "prog.bin", "--screen", "100000x100000"]);
    assert!(screen.is_err());
}

#[test]
fn exec_accepts_trace_flags() {
    let result = exec_command().try_get_matches_from(["exec", "prog.bin", "-vv"]);
    assert!(
        result.is_ok(),
        "exec should accept trace flags: {:?}",
        result.err()
    );
}

#[test]
fn trace_verbosity_levels() {
    let cases = [
        (vec!["trace", "p.bin"], Verbosity::Default),
        (vec!["trace", "p.bin", "-v"], Verbosity::Verbose),
        (vec!["trace", "p.bin", "-vv"], Verbosity::VeryVerbose),
        (vec!["trace", "p.bin", "-vvv"], Verbosity::VeryVerbose),
    ];

    for (argv, expected) in cases {
        let m = trace_command().try_get_matches_from(argv.clone()).unwrap();
        let args: TraceArgs = TraceParams::from_matches(&m).into();
        assert_eq!(args.verbosity, expected, "{argv:?}");
    }
}

#[test]
fn trace_machine_flags() {
    let m = trace_command()
        .try_get_matches_from(["trace", "p.bin", "--fuel", "50", "--screen", "2x3"])
        .unwrap();
    let params = TraceParams::from_matches(&m);

    assert_eq!(params.fuel, 50);
    assert_eq!(params.screen, Some((2, 3)));
    assert_eq!(params.verbose, 0);
}

#[test]
fn dump_accepts_exec_flags() {
    let result = dump_command().try_get_matches_from([
        "dump", "p.bin", "--fuel", "5", "--ram", "8", "--screen", "1x1", "--dump", "--snapshot",
        "-v",
    ]);
    assert!(
        result.is_ok(),
        "dump should accept exec flags: {:?}",
        result.err()
    );

    let params = DumpParams::from_matches(&result.unwrap());
    assert_eq!(params.program, PathBuf::from("p.bin"));
}

#[test]
fn dump_color_choice() {
    let m = dump_command()
        .try_get_matches_from(["dump", "p.bin", "--color", "always"])
        .unwrap();
    assert_eq!(DumpParams::from_matches(&m).color, ColorChoice::Always);

    let result = dump_command().try_get_matches_from(["dump", "p.bin", "--color", "sometimes"]);
    assert!(result.is_err());
}

#[test]
fn dump_help_hides_machine_flags() {
    let help = dump_command().render_help().to_string();

    assert!(help.contains("--color"));
    assert!(!help.contains("--fuel"));
    assert!(!help.contains("--screen"));
    assert!(!help.contains("--snapshot"));
}

#[test]
fn exec_help_hides_verbosity() {
    let help = exec_command().render_help().to_string();

    assert!(help.contains("--fuel"));
    assert!(help.contains("--dump"));
    assert!(!help.contains("Verbosity level"));
}

#[test]
fn cli_requires_subcommand() {
    assert!(build_cli().try_get_matches_from(["kcpu"]).is_err());
    assert!(
        build_cli()
            .try_get_matches_from(["kcpu", "dump", "p.bin"])
            .is_ok()
    );
}
