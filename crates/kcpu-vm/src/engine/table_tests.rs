use kcpu_bytecode::Opcode;

use super::OpcodeTable;

#[test]
fn every_opcode_has_a_descriptor() {
    let table = OpcodeTable::get();
    for &opcode in Opcode::ALL {
        let desc = table.lookup(opcode.code()).unwrap();
        assert_eq!(desc.opcode, opcode);
        assert_eq!(desc.name, opcode.name());
        assert_eq!(desc.operand, opcode.operand());
        assert_eq!(desc.stack_inputs, opcode.stack_inputs());
    }
    assert_eq!(table.iter().count(), Opcode::ALL.len());
}

#[test]
fn unassigned_bytes_have_no_descriptor() {
    let table = OpcodeTable::get();
    for byte in 0..=u8::MAX {
        assert_eq!(
            table.lookup(byte).is_some(),
            Opcode::from_byte(byte).is_some(),
            "byte {byte}"
        );
    }
}

#[test]
fn iteration_is_in_code_order() {
    let codes: Vec<u8> = OpcodeTable::get().iter().map(|d| d.opcode.code()).collect();
    let mut sorted = codes.clone();
    sorted.sort_unstable();
    assert_eq!(codes, sorted);
}
