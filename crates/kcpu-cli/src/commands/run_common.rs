//! Shared logic for exec and trace commands.

use std::fs;
use std::io::{self, BufRead, Read, StdoutLock};
use std::path::{Path, PathBuf};

use kcpu_core::Colors;
use kcpu_vm::{BufferHost, Host, State, StdHost, VM, VMBuilder};

/// Exit status for a program that faulted.
pub const EXIT_FAULT: i32 = 2;

/// Machine settings shared by the executing commands.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct MachineConfig {
    pub fuel: u64,
    pub ram: usize,
    pub screen: Option<(usize, usize)>,
}

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read '{}': {source}", path.display())]
    File { path: PathBuf, source: io::Error },
    #[error("failed to read program from stdin: {0}")]
    Stdin(io::Error),
}

/// Whether the program is read from stdin (`-`).
pub fn is_stdin(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Read program bytes from a file, or from stdin for `-`.
pub fn load_program(path: &Path) -> Result<Vec<u8>, LoadError> {
    let bytes = if is_stdin(path) {
        let mut buf = Vec::new();
        io::stdin()
            .read_to_end(&mut buf)
            .map_err(LoadError::Stdin)?;
        buf
    } else {
        fs::read(path).map_err(|source| LoadError::File {
            path: path.to_path_buf(),
            source,
        })?
    };
    tracing::debug!(path = %path.display(), size = bytes.len(), "program read");
    Ok(bytes)
}

/// Like [`load_program`], but report the error and exit with status 1.
pub fn load_program_or_exit(path: &Path) -> Vec<u8> {
    load_program(path).unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

/// Apply the machine settings to a builder.
pub fn configure(program: Vec<u8>, config: &MachineConfig) -> VMBuilder<BufferHost> {
    let builder = VM::builder(program)
        .exec_fuel(config.fuel)
        .ram_size(config.ram);
    match config.screen {
        Some((width, height)) => builder.screen(width, height),
        None => builder,
    }
}

pub type CliHost = StdHost<Box<dyn BufRead>, StdoutLock<'static>>;

/// Host wired to the process streams.
///
/// A program read from stdin leaves nothing for `in`, which then sees an
/// empty input.
pub fn std_host(program_from_stdin: bool) -> CliHost {
    let input: Box<dyn BufRead> = if program_from_stdin {
        Box::new(io::empty())
    } else {
        Box::new(io::stdin().lock())
    };
    StdHost::new(input, io::stdout().lock())
}

/// Build the VM, or report oversized machine settings and exit with status 1.
pub fn build_or_exit<H: Host>(builder: VMBuilder<H>) -> VM<H> {
    builder.build().unwrap_or_else(|e| {
        eprintln!("error: {e}");
        std::process::exit(1);
    })
}

/// Load the program and build a VM over the process streams.
pub fn prepare_vm(path: &Path, config: &MachineConfig) -> VM<CliHost> {
    let program = load_program_or_exit(path);
    build_or_exit(configure(program, config).host(std_host(is_stdin(path))))
}

/// Process exit status for a terminal machine state.
pub fn exit_code(state: &State) -> i32 {
    match state {
        State::Faulted(_) => EXIT_FAULT,
        State::Running | State::Halted => 0,
    }
}

/// Print the post-run reports requested on the command line.
pub fn print_reports<H: Host>(vm: &VM<H>, dump: bool, snapshot: bool, colors: Colors) {
    if dump {
        print!("{}", vm.dump(colors));
    }
    if snapshot {
        match serde_json::to_string_pretty(&vm.snapshot()) {
            Ok(json) => println!("{json}"),
            Err(e) => eprintln!("error: failed to serialize snapshot: {e}"),
        }
    }
}

/// Flush program output; a failed write exits with status 1.
pub fn flush_output(vm: &mut VM<CliHost>) {
    if let Err(e) = vm.host_mut().flush() {
        eprintln!("error: failed to write output: {e}");
        std::process::exit(1);
    }
}

/// Report a fault on stderr and return the exit status for the final state.
pub fn report_state(state: &State) -> i32 {
    if let State::Faulted(fault) = state {
        eprintln!("runtime error: {fault}");
    }
    exit_code(state)
}
