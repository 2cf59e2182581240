use std::io::Write;
use std::path::Path;

use kcpu_bytecode::{Opcode, ProgramBuilder};
use kcpu_vm::{Fault, State};

use super::run_common::{
    EXIT_FAULT, LoadError, MachineConfig, configure, exit_code, is_stdin, load_program,
};

fn config() -> MachineConfig {
    MachineConfig {
        fuel: 10_000_000,
        ram: 1024,
        screen: None,
    }
}

fn endless_loop() -> Vec<u8> {
    let mut b = ProgramBuilder::new();
    let top = b.label();
    b.bind(top).jump(Opcode::Jmp, top);
    b.finish().unwrap()
}

#[test]
fn loads_program_bytes_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(&[1, 0, 0, 0, 0, 0, 0, 0xf0, 0x3f, 51, 255])
        .unwrap();

    let bytes = load_program(file.path()).unwrap();
    assert_eq!(bytes.len(), 11);
    assert_eq!(bytes[0], Opcode::Push.code());
    assert_eq!(bytes[10], Opcode::Halt.code());
}

#[test]
fn missing_file_reports_path() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("missing.bin");

    let err = load_program(&path).unwrap_err();
    assert!(matches!(err, LoadError::File { .. }));
    assert!(
        err.to_string()
            .starts_with(&format!("failed to read '{}': ", path.display()))
    );
}

#[test]
fn dash_means_stdin() {
    assert!(is_stdin(Path::new("-")));
    assert!(!is_stdin(Path::new("./-")));
    assert!(!is_stdin(Path::new("prog.bin")));
}

#[test]
fn configure_applies_memory_settings() {
    let vm = configure(
        vec![],
        &MachineConfig {
            ram: 4,
            screen: Some((3, 2)),
            ..config()
        },
    )
    .build()
    .unwrap();

    assert_eq!(vm.ram().len(), 4);
    assert_eq!(vm.screen(), (3, 2));
    assert_eq!(vm.vram().len(), 6);
}

#[test]
fn configure_without_screen_keeps_it_empty() {
    let vm = configure(vec![], &config()).build().unwrap();
    assert_eq!(vm.screen(), (0, 0));
    assert_eq!(vm.ram().len(), 1024);
}

#[test]
fn configure_rejects_oversized_memory() {
    let huge_ram = MachineConfig {
        ram: usize::MAX,
        ..config()
    };
    let err = configure(vec![], &huge_ram).build().err().unwrap();
    assert_eq!(err, Fault::RamTooLarge(usize::MAX));

    let huge_screen = MachineConfig {
        screen: Some((1 << 20, 1 << 20)),
        ..config()
    };
    let err = configure(vec![], &huge_screen).build().err().unwrap();
    assert_eq!(
        err,
        Fault::ScreenTooLarge {
            width: 1 << 20,
            height: 1 << 20
        }
    );
}

#[test]
fn configure_applies_fuel() {
    let mut vm = configure(endless_loop(), &MachineConfig { fuel: 5, ..config() })
        .build()
        .unwrap();
    let state = vm.run().clone();

    assert_eq!(state, State::Faulted(Fault::ExecFuelExhausted(5)));
    assert_eq!(exit_code(&state), EXIT_FAULT);
}

#[test]
fn halted_exits_cleanly() {
    let mut b = ProgramBuilder::new();
    b.push(2.0).op(Opcode::Out).op(Opcode::Halt);
    let mut vm = configure(b.finish().unwrap(), &config()).build().unwrap();

    assert_eq!(exit_code(vm.run()), 0);
    assert_eq!(vm.host().output(), "2 ");
}
