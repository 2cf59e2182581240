//! Dispatch logic: extract params from ArgMatches and convert to command args.
//!
//! - `*Params` structs mirror command `*Args` but are populated from clap
//! - `from_matches()` extractors pull the fields a command uses and ignore
//!   the hidden ones
//! - `From<*Params>` impls bridge dispatch to the command handlers

use std::path::PathBuf;

use clap::ArgMatches;
use kcpu_vm::Verbosity;

use super::ColorChoice;
use crate::commands::dump::DumpArgs;
use crate::commands::exec::ExecArgs;
use crate::commands::run_common::MachineConfig;
use crate::commands::trace::TraceArgs;

pub struct ExecParams {
    pub program: PathBuf,
    pub fuel: u64,
    pub ram: usize,
    pub screen: Option<(usize, usize)>,
    pub dump: bool,
    pub snapshot: bool,
    pub color: ColorChoice,
}

impl ExecParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            program: parse_program(m),
            fuel: parse_fuel(m),
            ram: parse_ram(m),
            screen: m.get_one::<(usize, usize)>("screen").copied(),
            dump: m.get_flag("dump"),
            snapshot: m.get_flag("snapshot"),
            color: parse_color(m),
        }
    }
}

impl From<ExecParams> for ExecArgs {
    fn from(p: ExecParams) -> Self {
        Self {
            program: p.program,
            machine: MachineConfig {
                fuel: p.fuel,
                ram: p.ram,
                screen: p.screen,
            },
            dump: p.dump,
            snapshot: p.snapshot,
            color: p.color.should_colorize(),
        }
    }
}

pub struct TraceParams {
    pub program: PathBuf,
    pub verbose: u8,
    pub fuel: u64,
    pub ram: usize,
    pub screen: Option<(usize, usize)>,
    pub dump: bool,
    pub snapshot: bool,
    pub color: ColorChoice,
}

impl TraceParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            program: parse_program(m),
            verbose: m.get_count("verbose"),
            fuel: parse_fuel(m),
            ram: parse_ram(m),
            screen: m.get_one::<(usize, usize)>("screen").copied(),
            dump: m.get_flag("dump"),
            snapshot: m.get_flag("snapshot"),
            color: parse_color(m),
        }
    }
}

impl From<TraceParams> for TraceArgs {
    fn from(p: TraceParams) -> Self {
        let verbosity = match p.verbose {
            0 => Verbosity::Default,
            1 => Verbosity::Verbose,
            _ => Verbosity::VeryVerbose,
        };

        Self {
            program: p.program,
            machine: MachineConfig {
                fuel: p.fuel,
                ram: p.ram,
                screen: p.screen,
            },
            verbosity,
            dump: p.dump,
            snapshot: p.snapshot,
            color: p.color.should_colorize(),
        }
    }
}

pub struct DumpParams {
    pub program: PathBuf,
    pub color: ColorChoice,
}

impl DumpParams {
    pub fn from_matches(m: &ArgMatches) -> Self {
        Self {
            program: parse_program(m),
            color: parse_color(m),
        }
    }
}

impl From<DumpParams> for DumpArgs {
    fn from(p: DumpParams) -> Self {
        Self {
            program: p.program,
            color: p.color.should_colorize(),
        }
    }
}

fn parse_program(m: &ArgMatches) -> PathBuf {
    // Required by clap.
    m.get_one::<PathBuf>("program").cloned().unwrap_or_default()
}

fn parse_fuel(m: &ArgMatches) -> u64 {
    m.get_one::<u64>("fuel").copied().unwrap_or(10_000_000)
}

fn parse_ram(m: &ArgMatches) -> usize {
    m.get_one::<usize>("ram").copied().unwrap_or(1024)
}

fn parse_color(m: &ArgMatches) -> ColorChoice {
    match m.get_one::<String>("color").map(|s| s.as_str()) {
        Some("always") => ColorChoice::Always,
        Some("never") => ColorChoice::Never,
        _ => ColorChoice::Auto,
    }
}
