use kcpu_bytecode::{Opcode, ProgramBuilder, Target};
use kcpu_core::Colors;

use super::{BufferHost, VM};

fn sample() -> VM<BufferHost> {
    let mut b = ProgramBuilder::new();
    b.push(1.5).pop_to(Target::Register(1));
    b.push(2.0).pop_to(Target::Ram(5.0));
    b.push(3.0).push(4.0).op(Opcode::Halt);

    let mut vm = VM::builder(b.finish().unwrap()).ram_size(8).build().unwrap();
    vm.run();
    vm
}

#[test]
fn dump_halted_machine() {
    let vm = sample();

    insta::assert_snapshot!(vm.dump(Colors::OFF), @r"
    [machine]
    state = halted
    ip = 50
    steps = 7

    [stack]
    size = 2
    capacity = 32
      1  4
      0  3

    [registers]
    b = 1.5

    [ram]
    size = 8
    [5] = 2

    [screen]
    size = 0x0
    drawing = off
    ");
}

#[test]
fn dump_limits_stack_depth() {
    let mut b = ProgramBuilder::new();
    for i in 0..12 {
        b.push(i as f64);
    }
    let mut vm = VM::builder(b.finish().unwrap()).ram_size(0).build().unwrap();
    vm.run();

    let out = vm.dump(Colors::OFF);
    assert!(out.contains("  11  11\n"));
    assert!(out.contains("  02  2\n"));
    assert!(!out.contains("  01  1\n"));
    assert!(out.contains("  ... 2 more\n"));
}

#[test]
fn dump_faulted_machine() {
    let mut vm = VM::builder(vec![0xEE]).build().unwrap();
    vm.run();

    let out = vm.dump(Colors::OFF);
    assert!(out.starts_with("[machine]\nstate = faulted: invalid opcode 238 at offset 0\nip = 0\n"));

    let colored = vm.dump(Colors::ON);
    assert!(colored.contains("state = \x1b[31mfaulted"));
}

#[test]
fn snapshot_serializes_to_json() {
    let vm = sample();
    let json = serde_json::to_value(vm.snapshot()).unwrap();

    assert_eq!(json["state"], "halted");
    assert!(json.get("fault").is_none());
    assert_eq!(json["ip"], 50);
    assert_eq!(json["steps"], 7);
    assert_eq!(json["stack"], serde_json::json!([3.0, 4.0]));
    assert_eq!(json["registers"][1], 1.5);
    assert_eq!(json["registers"].as_array().unwrap().len(), 26);
    assert_eq!(json["ram"], serde_json::json!([[5, 2.0]]));
    assert_eq!(json["screen"], serde_json::json!([0, 0]));
    assert_eq!(json["vram"], serde_json::json!([]));
    assert_eq!(json["graphics_active"], false);
}

#[test]
fn snapshot_of_faulted_machine_carries_the_reason() {
    let mut vm = VM::builder(vec![Opcode::Add.code()]).build().unwrap();
    vm.run();

    let snapshot = vm.snapshot();
    assert_eq!(snapshot.state, "faulted");
    assert_eq!(
        snapshot.fault.as_deref(),
        Some("`add` needs 2 stack operand(s), found 0")
    );
}
