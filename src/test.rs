use crate::encode::*;
use crate::isa::*;
use std::collections::HashSet;

#[test]
fn ten_bit_round_trip() {
    for n in -512..=511i16 {
        assert_eq!(sign_extend(to_word(n)), n);
    }
}

#[test]
fn base4_is_injective_over_all_words() {
    let mut seen = HashSet::new();
    for word in 0..1024u16 {
        let text = word_to_base4(word);
        assert_eq!(text.len(), 5);
        assert!(seen.insert(text));
    }
}

#[test]
fn base4_spot_values() {
    assert_eq!(word_to_base4(0b0000000000), "aaaaa");
    assert_eq!(word_to_base4(0b1101000000), "dbaaa");
    assert_eq!(word_to_base4(0b1111101100), "ddcda");
    assert_eq!(address_to_base4(100), "bcba");
    assert_eq!(address_to_base4(0), "aaaa");
    assert_eq!(header_code_to_base4(3), "aad");
    assert_eq!(header_data_to_base4(0), "aa");
    assert_eq!(header_data_to_base4(4), "ba");
}

#[test]
fn binary_rendering_is_zero_padded() {
    assert_eq!(word_to_binary(0), "0000000000");
    assert_eq!(word_to_binary(0b111), "0000000111");
}

#[test]
fn mnemonic_lookup_is_exact() {
    assert_eq!(Opcode::from_mnemonic("mov"), Some(Opcode::MOV));
    assert_eq!(Opcode::from_mnemonic("stop"), Some(Opcode::STOP));
    assert_eq!(Opcode::from_mnemonic("MOV"), None);
    assert_eq!(Opcode::from_mnemonic("movx"), None);
    assert_eq!(Opcode::from_mnemonic(""), None);

    for (value, name) in MNEMONICS.iter().enumerate() {
        let opcode = Opcode::from_mnemonic(name).unwrap();
        assert_eq!(opcode.code(), value as u16);
        assert_eq!(opcode.mnemonic(), *name);
    }
}

#[test]
fn operand_counts() {
    assert_eq!(Opcode::MOV.operand_count(), 2);
    assert_eq!(Opcode::LEA.operand_count(), 2);
    assert_eq!(Opcode::CLR.operand_count(), 1);
    assert_eq!(Opcode::PRN.operand_count(), 1);
    assert_eq!(Opcode::RTS.operand_count(), 0);
    assert_eq!(Opcode::STOP.operand_count(), 0);
}

#[test]
fn addressing_legality() {
    assert!(Opcode::MOV.allows_source(AddressingMode::Immediate));
    assert!(Opcode::LEA.allows_source(AddressingMode::Direct));
    assert!(Opcode::LEA.allows_source(AddressingMode::Matrix));
    assert!(!Opcode::LEA.allows_source(AddressingMode::Immediate));
    assert!(!Opcode::LEA.allows_source(AddressingMode::Register));

    assert!(!Opcode::MOV.allows_destination(AddressingMode::Immediate));
    assert!(Opcode::MOV.allows_destination(AddressingMode::Register));
    assert!(Opcode::CMP.allows_destination(AddressingMode::Immediate));
    assert!(Opcode::PRN.allows_destination(AddressingMode::Immediate));
    assert!(!Opcode::RTS.allows_destination(AddressingMode::Direct));
    assert!(!Opcode::STOP.allows_destination(AddressingMode::Register));
}

#[test]
fn first_word_packing() {
    // prn #-5
    assert_eq!(
        make_instruction_word(Opcode::PRN, None, Some(AddressingMode::Immediate)),
        0b1101000000
    );
    // mov X, r3
    assert_eq!(
        make_instruction_word(
            Opcode::MOV,
            Some(AddressingMode::Direct),
            Some(AddressingMode::Register)
        ),
        0b0000011100
    );
    // jmp E
    assert_eq!(
        make_instruction_word(Opcode::JMP, None, Some(AddressingMode::Direct)),
        0b1001000100
    );
    assert_eq!(make_instruction_word(Opcode::STOP, None, None), 0b1111000000);
}

#[test]
fn operand_word_packing() {
    assert_eq!(make_immediate_word(-5), 0b1111101100);
    assert_eq!(make_immediate_word(0), 0b0000000000);

    assert_eq!(make_register_word(None, Some(Reg::R3)), 0b0000001100);
    assert_eq!(make_register_word(Some(Reg::R3), None), 0b0011000000);
    assert_eq!(make_register_word(Some(Reg::R2), Some(Reg::R5)), 0b0010010100);

    assert_eq!(make_address_word(103, Are::Relocatable), 0b0110011110);
    assert_eq!(make_address_word(0, Are::External), 0b0000000001);
}

#[test]
fn data_word_encoding() {
    assert_eq!(to_word(7), 0b0000000111);
    assert_eq!(to_word(-1), 0b1111111111);
    assert_eq!(char_word(b'a'), 97);
}
