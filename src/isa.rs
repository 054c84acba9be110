use crate::constants::*;
use crate::{Address, Word};
use num_derive::{FromPrimitive, ToPrimitive};
use num_traits::{FromPrimitive, ToPrimitive};
use std::fmt;

// Word layouts
//
//          +--------+-------+-------+-------+
//          |9      6|5     4|3     2|1     0|
//          +--------+-------+-------+-------+
// First    | opcode |  src  |  dst  |  0 0  |
// Operand  |      payload (8 bits)  |  ARE  |
// Register | src reg (4)| dst reg (4)|  0 0 |
//          +--------+-------+-------+-------+
//
// An absent operand leaves its mode field at zero. A register payload sits in
// the source nibble or the destination nibble of the payload field depending
// on which operand it is; an instruction whose operands are both registers
// fuses them into one word.

#[derive(Clone, Copy, PartialEq, Eq, Debug, FromPrimitive, ToPrimitive)]
pub enum Opcode {
    //  Mnemonic | Operands | Effect
    MOV,  // | 2 | dst = src
    CMP,  // | 2 | compare src against dst
    ADD,  // | 2 | dst += src
    SUB,  // | 2 | dst -= src
    LEA,  // | 2 | dst = address of src
    CLR,  // | 1 | dst = 0
    NOT,  // | 1 | dst = ~dst
    INC,  // | 1 | dst += 1
    DEC,  // | 1 | dst -= 1
    JMP,  // | 1 | jump to dst
    BNE,  // | 1 | branch to dst unless the last compare was equal
    JSR,  // | 1 | call the subroutine at dst
    RED,  // | 1 | read one character into dst
    PRN,  // | 1 | print dst
    RTS,  // | 0 | return from subroutine
    STOP, // | 0 | halt
}

/// Source-level mnemonics, indexed by opcode value.
pub const MNEMONICS: [&str; OPCODE_COUNT] = [
    "mov", "cmp", "add", "sub", "lea", "clr", "not", "inc", "dec", "jmp", "bne", "jsr", "red",
    "prn", "rts", "stop",
];

impl Opcode {
    /// Exact, case-sensitive mnemonic lookup.
    pub fn from_mnemonic(name: &str) -> Option<Opcode> {
        MNEMONICS
            .iter()
            .position(|m| *m == name)
            .and_then(Opcode::from_usize)
    }

    pub fn mnemonic(self) -> &'static str {
        MNEMONICS[self.to_usize().unwrap()]
    }

    pub fn code(self) -> Word {
        self.to_u16().unwrap()
    }

    pub fn operand_count(self) -> usize {
        match self {
            Opcode::MOV | Opcode::CMP | Opcode::ADD | Opcode::SUB | Opcode::LEA => 2,
            Opcode::RTS | Opcode::STOP => 0,
            _ => 1,
        }
    }

    /// Which addressing modes the opcode accepts for its source operand.
    pub fn allows_source(self, mode: AddressingMode) -> bool {
        match self {
            Opcode::MOV | Opcode::CMP | Opcode::ADD | Opcode::SUB => true,
            Opcode::LEA => match mode {
                AddressingMode::Direct | AddressingMode::Matrix => true,
                _ => false,
            },
            _ => false,
        }
    }

    /// Which addressing modes the opcode accepts for its destination operand.
    pub fn allows_destination(self, mode: AddressingMode) -> bool {
        match self {
            Opcode::CMP | Opcode::PRN => true,
            Opcode::RTS | Opcode::STOP => false,
            _ => mode != AddressingMode::Immediate,
        }
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, FromPrimitive, ToPrimitive)]
pub enum AddressingMode {
    Immediate, // #value
    Direct,    // label
    Matrix,    // label[rX][rY]
    Register,  // r0..r7
}

impl AddressingMode {
    pub fn bits(self) -> Word {
        self.to_u16().unwrap()
    }
}

impl fmt::Display for AddressingMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            AddressingMode::Immediate => "immediate",
            AddressingMode::Direct => "direct",
            AddressingMode::Matrix => "matrix",
            AddressingMode::Register => "register",
        })
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug, FromPrimitive, ToPrimitive)]
pub enum Reg {
    R0,
    R1,
    R2,
    R3,
    R4,
    R5,
    R6,
    R7,
}

impl Reg {
    pub fn from_index(index: u32) -> Option<Reg> {
        Reg::from_u32(index)
    }

    pub fn index(self) -> Word {
        self.to_u16().unwrap()
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "r{}", self.index())
    }
}

/// The two relocation bits at the low end of every operand word.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Are {
    Absolute = 0b00,
    External = 0b01,
    Relocatable = 0b10,
}

impl Are {
    pub fn bits(self) -> Word {
        self as Word
    }
}

#[inline]
pub fn make_instruction_word(
    oc: Opcode,
    src: Option<AddressingMode>,
    dst: Option<AddressingMode>,
) -> Word {
    ((oc.code() << OPCODE_OFFSET) & OPCODE_MASK)
        | ((src.map_or(0, AddressingMode::bits) << SRC_MODE_OFFSET) & SRC_MODE_MASK)
        | ((dst.map_or(0, AddressingMode::bits) << DST_MODE_OFFSET) & DST_MODE_MASK)
}

#[inline]
pub fn make_immediate_word(value: i16) -> Word {
    (((value as Word) << PAYLOAD_OFFSET) & PAYLOAD_MASK) | Are::Absolute.bits()
}

/// Operand word for register operands. A lone source register leaves the
/// destination nibble zero and vice versa; a register pair (either two
/// register operands or a matrix index pair) fills both.
#[inline]
pub fn make_register_word(src: Option<Reg>, dst: Option<Reg>) -> Word {
    ((src.map_or(0, Reg::index) << SRC_REG_OFFSET) & SRC_REG_MASK)
        | ((dst.map_or(0, Reg::index) << DST_REG_OFFSET) & DST_REG_MASK)
}

/// Operand word carrying a resolved symbol address and its relocation kind.
#[inline]
pub fn make_address_word(address: Address, are: Are) -> Word {
    (((address as Word) << PAYLOAD_OFFSET) & PAYLOAD_MASK) | are.bits()
}
