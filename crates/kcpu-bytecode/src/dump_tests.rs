use kcpu_core::Colors;

use super::builder::ProgramBuilder;
use super::dump::dump;
use super::opcode::Opcode;
use super::stream::Target;

#[test]
fn dump_straight_line() {
    let mut b = ProgramBuilder::new();
    b.push(3.0).push(4.0).op(Opcode::Add).op(Opcode::Out).op(Opcode::Halt);
    let bytes = b.finish().unwrap();

    insta::assert_snapshot!(dump(&bytes, Colors::OFF), @r"
    [header]
    version = 1
    size = 21

    [code]
      00  push       3
      09  push       4
      18  add
      19  out
      20  halt
    ");
}

#[test]
fn dump_labels_jump_targets() {
    let mut b = ProgramBuilder::new();
    let body = b.label();
    let done = b.label();
    b.push(0.0).pop_to(Target::Register(0));
    b.bind(body);
    b.load_from(Target::Register(0))
        .push(10.0)
        .jump(Opcode::Jae, done)
        .load_from(Target::Register(0))
        .push(1.0)
        .bin_op(b'+')
        .pop_to(Target::Register(0))
        .jump(Opcode::Jmp, body);
    b.bind(done);
    b.op(Opcode::Halt);
    let bytes = b.finish().unwrap();

    insta::assert_snapshot!(dump(&bytes, Colors::OFF), @r"
    [header]
    version = 1
    size = 60

    [code]
      00  push       0
      09  pop        a

    L0:
      12  load       a
      15  push       10
      24  jae        L1
      33  load       a
      36  push       1
      45  bin_op     +
      47  pop        a
      50  jmp        L0

    L1:
      59  halt
    ");
}

#[test]
fn dump_memory_operands_and_raw_targets() {
    let mut b = ProgramBuilder::new();
    b.pop_to(Target::Ram(12.0))
        .load_from(Target::Vram(3.0))
        .pop_to(Target::Register(30))
        .jump_to(Opcode::Call, 5)
        .op(Opcode::Ret);
    let bytes = b.finish().unwrap();

    insta::assert_snapshot!(dump(&bytes, Colors::OFF), @r"
    [header]
    version = 1
    size = 33

    [code]
      00  pop        [12]
      10  load       vram[3]
      20  pop        r30
      23  call       @5
      32  ret
    ");
}

#[test]
fn dump_truncated_program() {
    let mut b = ProgramBuilder::new();
    b.op(Opcode::OutN).raw(&[Opcode::Push.code(), 0, 0]);
    let bytes = b.finish().unwrap();

    insta::assert_snapshot!(dump(&bytes, Colors::OFF), @r"
    [header]
    version = 1
    size = 4

    [code]
      00  out_n
      <error: unexpected end of program at offset 2: need 8 byte(s), program is 4 byte(s)>
    ");
}

#[test]
fn dump_with_colors() {
    let mut b = ProgramBuilder::new();
    b.op(Opcode::Halt);
    let out = dump(&b.finish().unwrap(), Colors::ON);

    assert!(out.starts_with("\x1b[34m[header]\x1b[0m\n"));
    assert!(out.contains("\x1b[2m00\x1b[0m  halt"));
}
