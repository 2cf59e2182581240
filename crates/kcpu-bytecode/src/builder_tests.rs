use super::builder::{BuildError, ProgramBuilder};
use super::instruction::{Instruction, Operand, decode_all};
use super::opcode::Opcode;
use super::stream::{DecodeError, InstructionStream, Target};

#[test]
fn emits_arithmetic_program() {
    let mut b = ProgramBuilder::new();
    b.push(3.0).push(4.0).op(Opcode::Add).op(Opcode::Out).op(Opcode::Halt);
    let bytes = b.finish().unwrap();

    let mut expected = vec![1];
    expected.extend_from_slice(&3.0f64.to_le_bytes());
    expected.push(1);
    expected.extend_from_slice(&4.0f64.to_le_bytes());
    expected.extend_from_slice(&[11, 51, 255]);
    assert_eq!(bytes, expected);
}

#[test]
fn forward_labels_are_patched() {
    let mut b = ProgramBuilder::new();
    let end = b.label();
    b.jump(Opcode::Jmp, end);
    b.push(1.0);
    b.bind(end);
    b.op(Opcode::Halt);
    let bytes = b.finish().unwrap();

    assert_eq!(&bytes[1..9], &18u64.to_le_bytes());
    assert_eq!(bytes[18], Opcode::Halt.code());
}

#[test]
fn backward_labels_are_patched() {
    let mut b = ProgramBuilder::new();
    let top = b.label();
    b.op(Opcode::OutN);
    b.bind(top);
    b.op(Opcode::Dup);
    b.jump(Opcode::Jne, top);
    let bytes = b.finish().unwrap();

    assert_eq!(&bytes[3..11], &1u64.to_le_bytes());
}

#[test]
fn unbound_label_fails() {
    let mut b = ProgramBuilder::new();
    let nowhere = b.label();
    b.jump(Opcode::Call, nowhere);

    assert_eq!(b.finish(), Err(BuildError::UnboundLabel(nowhere)));
}

#[test]
fn binding_twice_fails() {
    let mut b = ProgramBuilder::new();
    let l = b.label();
    b.bind(l).op(Opcode::Halt).bind(l);

    let err = b.finish().unwrap_err();
    assert_eq!(err, BuildError::AlreadyBound(l));
    assert_eq!(err.to_string(), "label L0 is bound more than once");
}

#[test]
fn labels_from_another_builder_fail() {
    let mut other = ProgramBuilder::new();
    let foreign = other.label();

    let mut b = ProgramBuilder::new();
    b.label();
    b.bind(foreign).op(Opcode::Halt);
    let err = b.finish().unwrap_err();
    assert_eq!(err, BuildError::UnknownLabel(foreign));
    assert_eq!(err.to_string(), "label L0 was issued by another builder");

    let mut b = ProgramBuilder::new();
    b.jump(Opcode::Jmp, foreign);
    assert_eq!(b.finish(), Err(BuildError::UnknownLabel(foreign)));

    other.bind(foreign);
    assert_eq!(other.finish(), Ok(Vec::new()));
}

#[test]
fn decodes_what_it_emits() {
    let mut b = ProgramBuilder::new();
    let l = b.label();
    b.bind(l)
        .pop_to(Target::Register(2))
        .load_from(Target::Ram(5.0))
        .pop_to(Target::Vram(1.0))
        .bin_op(b'*')
        .jump(Opcode::Ja, l);
    let bytes = b.finish().unwrap();

    let (instrs, err) = decode_all(&bytes);
    assert_eq!(err, None);

    let ops: Vec<(usize, Opcode, Operand)> = instrs
        .iter()
        .map(|i| (i.offset, i.opcode, i.operand))
        .collect();
    assert_eq!(
        ops,
        vec![
            (0, Opcode::Pop, Operand::Register(2)),
            (3, Opcode::Load, Operand::Ram(5.0)),
            (13, Opcode::Pop, Operand::Vram(1.0)),
            (23, Opcode::BinOp, Operand::Operator(b'*')),
            (25, Opcode::Ja, Operand::Label(0)),
        ]
    );
    assert_eq!(instrs[4].next_offset(), bytes.len());
}

#[test]
fn decode_failure_keeps_cursor() {
    let mut s = InstructionStream::new(vec![Opcode::Push.code(), 0, 0]);
    assert!(matches!(
        Instruction::decode(&mut s),
        Err(DecodeError::OutOfBounds { offset: 1, .. })
    ));
    assert_eq!(s.position(), 0);

    let mut s = InstructionStream::new(vec![7]);
    assert_eq!(
        Instruction::decode(&mut s),
        Err(DecodeError::InvalidOpcode {
            offset: 0,
            opcode: 7
        })
    );
    assert_eq!(s.position(), 0);
}

#[test]
fn decode_all_stops_at_first_error() {
    let mut b = ProgramBuilder::new();
    b.op(Opcode::OutN).raw(&[0xEE]).op(Opcode::Halt);
    let (instrs, err) = decode_all(&b.finish().unwrap());

    assert_eq!(instrs.len(), 1);
    assert_eq!(
        err,
        Some(DecodeError::InvalidOpcode {
            offset: 1,
            opcode: 0xEE
        })
    );
}
