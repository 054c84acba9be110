use super::{Address, Word};

pub const WORD_WIDTH        : u32 = 10;
pub const OPCODE_WIDTH      : u32 = 4;
pub const MODE_WIDTH        : u32 = 2;
pub const PAYLOAD_WIDTH     : u32 = 8;
pub const REG_WIDTH         : u32 = 4;
pub const ARE_WIDTH         : u32 = 2;

pub const WORD_MASK         : Word = 0b1111111111;
pub const OPCODE_MASK       : Word = 0b1111000000;
pub const SRC_MODE_MASK     : Word = 0b0000110000;
pub const DST_MODE_MASK     : Word = 0b0000001100;
pub const PAYLOAD_MASK      : Word = 0b1111111100;
pub const SRC_REG_MASK      : Word = 0b1111000000;
pub const DST_REG_MASK      : Word = 0b0000111100;
pub const ARE_MASK          : Word = 0b0000000011;
pub const WORD_SIGN_MASK    : Word = 0b1000000000;

pub const OPCODE_OFFSET     : u32 = 6;
pub const SRC_MODE_OFFSET   : u32 = 4;
pub const DST_MODE_OFFSET   : u32 = 2;
pub const PAYLOAD_OFFSET    : u32 = 2;
pub const SRC_REG_OFFSET    : u32 = 6;
pub const DST_REG_OFFSET    : u32 = 2;

// The first instruction word of an image lives at address 100; data words are
// laid out behind the code once its final length is known.
pub const CODE_ORIGIN       : Address = 100;

// Field widths of the rendered text artifacts: addresses print their low
// eight bits, the object header prints the code length in six bits and the
// data length in four.
pub const ADDRESS_WIDTH     : u32 = 8;
pub const HEADER_CODE_WIDTH : u32 = 6;
pub const HEADER_DATA_WIDTH : u32 = 4;

pub const REGISTER_COUNT    : usize = 8;
pub const OPCODE_COUNT      : usize = 16;
