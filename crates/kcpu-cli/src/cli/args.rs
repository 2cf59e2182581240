//! Shared argument builders for CLI commands.
//!
//! Each function returns a `clap::Arg` that can be composed into commands.
//! Commands that ignore a flag still accept it, hidden from `--help`, so the
//! same command line works across `exec`, `trace` and `dump`.

use std::path::PathBuf;

use clap::{Arg, ArgAction, value_parser};
use kcpu_vm::{MAX_RAM_CELLS, MAX_SCREEN_CELLS};

/// Program file, or `-` for stdin (positional).
pub fn program_arg() -> Arg {
    Arg::new("program")
        .value_name("PROGRAM")
        .required(true)
        .value_parser(value_parser!(PathBuf))
        .help("Program bytecode file ('-' reads stdin)")
}

/// Execution fuel limit (--fuel).
pub fn fuel_arg() -> Arg {
    Arg::new("fuel")
        .long("fuel")
        .value_name("N")
        .default_value("10000000")
        .value_parser(value_parser!(u64))
        .help("Maximum number of executed instructions")
}

/// RAM size in cells (--ram).
pub fn ram_arg() -> Arg {
    Arg::new("ram")
        .long("ram")
        .value_name("CELLS")
        .default_value("1024")
        .value_parser(parse_ram)
        .help("Number of RAM cells")
}

/// Initial screen dimensions (--screen).
pub fn screen_arg() -> Arg {
    Arg::new("screen")
        .long("screen")
        .value_name("WxH")
        .value_parser(parse_screen)
        .help("Initial screen size, e.g. 40x20 (g_init replaces it)")
}

/// Print the machine state after the run (--dump).
pub fn dump_arg() -> Arg {
    Arg::new("dump")
        .long("dump")
        .action(ArgAction::SetTrue)
        .help("Print the machine state after the run")
}

/// Print a JSON snapshot of the machine after the run (--snapshot).
pub fn snapshot_arg() -> Arg {
    Arg::new("snapshot")
        .long("snapshot")
        .action(ArgAction::SetTrue)
        .help("Print a JSON snapshot of the machine after the run")
}

/// Color output control (--color).
pub fn color_arg() -> Arg {
    Arg::new("color")
        .long("color")
        .value_name("WHEN")
        .default_value("auto")
        .value_parser(["auto", "always", "never"])
        .help("Colorize output")
}

/// Verbosity level (-v, -vv).
pub fn verbose_arg() -> Arg {
    Arg::new("verbose")
        .short('v')
        .action(ArgAction::Count)
        .help("Verbosity level (-v for stack top, -vv for whole stack)")
}

/// Parse a RAM cell count no larger than [`MAX_RAM_CELLS`].
pub fn parse_ram(s: &str) -> Result<usize, String> {
    let cells = s
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid cell count '{s}': {e}"))?;
    if cells > MAX_RAM_CELLS {
        return Err(format!("at most {MAX_RAM_CELLS} cells, got {cells}"));
    }
    Ok(cells)
}

/// Parse `WxH` (also accepts `X` and `*` as separator), capped at
/// [`MAX_SCREEN_CELLS`] cells.
pub fn parse_screen(s: &str) -> Result<(usize, usize), String> {
    let Some((w, h)) = s.split_once(['x', 'X', '*']) else {
        return Err(format!("expected WxH, got '{s}'"));
    };
    let width = w
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid width '{w}': {e}"))?;
    let height = h
        .trim()
        .parse::<usize>()
        .map_err(|e| format!("invalid height '{h}': {e}"))?;
    let fits = width
        .checked_mul(height)
        .is_some_and(|cells| (cells as u64) <= MAX_SCREEN_CELLS);
    if !fits {
        return Err(format!("screen {width}x{height} exceeds {MAX_SCREEN_CELLS} cells"));
    }
    Ok((width, height))
}
