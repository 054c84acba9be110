//! Assembler for the ten-bit word machine modeled by the
//! [tencore](../tencore/index.html) crate.
//!
//! The crate exposes the two stages of the pipeline: [`expand_macros`] turns
//! a raw source into macro-free text, and [`assemble`] runs the layout and
//! resolution passes over that text and yields the assembled image plus the
//! entry and external tables, ready to be written with the
//! [tenobj](../tenobj/index.html) writers. Problems never abort a stage;
//! they accumulate per line in a [`Diagnostics`](diag::Diagnostics) list and
//! the caller decides whether to go on.
//!
//! Parsing the assembly language is implemented using [pest], with one
//! grammar parse per logical line so that a malformed line is reported and
//! the rest of the file is still checked.
//!
//! # Assembly Language
//!
//! A source is a sequence of lines, at most 80 characters each. A line is
//! blank, a comment (first non-blank character is `;`), or a statement with
//! an optional label:
//!
//! ```text
//! [LABEL:] mnemonic-or-directive operands
//! ```
//!
//! ## Instructions
//!
//! Sixteen mnemonics exist. Opcodes 0 to 4 take a source and a destination
//! operand separated by one comma, opcodes 5 to 13 take a destination only,
//! and the last two take none:
//!
//!  Mnemonic | Operands | Description
//! ----------|----------|---------------------------------
//! `mov`     | src, dst | copy
//! `cmp`     | src, dst | compare
//! `add`     | src, dst | add
//! `sub`     | src, dst | subtract
//! `lea`     | src, dst | load effective address
//! `clr`     | dst      | clear
//! `not`     | dst      | bitwise complement
//! `inc`     | dst      | increment
//! `dec`     | dst      | decrement
//! `jmp`     | dst      | jump
//! `bne`     | dst      | branch if not equal
//! `jsr`     | dst      | jump to subroutine
//! `red`     | dst      | read a character
//! `prn`     | dst      | print
//! `rts`     |          | return from subroutine
//! `stop`    |          | halt
//!
//! ## Addressing modes
//!
//!  Mode      | Syntax          | Example
//! -----------|-----------------|------------------
//! immediate  | `#value`        | `prn #-5`
//! direct     | `LABEL`         | `jmp LOOP`
//! matrix     | `LABEL[rX][rY]` | `mov M[r1][r2], r3`
//! register   | `r0`..`r7`      | `inc r4`
//!
//! Each mnemonic accepts a fixed subset of modes per operand; for example
//! `lea` requires a direct or matrix source, and only `cmp` and `prn` accept
//! an immediate destination.
//!
//! ## Directives
//!
//!  Directive | Syntax                  | Effect
//! -----------|-------------------------|--------------------------------------
//! `.data`    | `.data 1, -2, 3`        | append one data word per value
//! `.string`  | `.string "text"`        | one word per character plus terminator
//! `.mat`     | `.mat [R][C] v1, v2`    | reserve R*C words, zero-fill the rest
//! `.extern`  | `.extern NAME`          | declare a symbol imported elsewhere
//! `.entry`   | `.entry NAME`           | export a symbol defined here
//!
//! ## Macros
//!
//! A block between `mcro NAME` and `mcroend` is captured instead of
//! assembled; a later line holding just `NAME` is replaced by the captured
//! body. Macro names must not collide with mnemonics or directive keywords,
//! and macros take no arguments.
//!
//! [pest]: https://docs.rs/pest/

pub mod diag;
pub mod symbols;

mod first_pass;
mod int_util;
mod parser;
mod preprocess;
mod second_pass;


use crate::diag::Diagnostics;
use tencore::Address;
use tenobj::{AddressedWord, ObjectImage, TableEntry};

pub use crate::first_pass::{first_pass, CodeWord, Instruction, Layout, Operand};
pub use crate::preprocess::expand_macros;
pub use crate::second_pass::{second_pass, Resolution};

/// Longest accepted source line, excluding the terminator.
pub const MAX_LINE_LENGTH: usize = 80;
/// Longest accepted symbol or macro name.
pub const MAX_SYMBOL_LENGTH: usize = 30;
/// Longest accepted numeric literal, including its sign.
pub const MAX_NUMBER_LENGTH: usize = 4;

/// The directive keywords, without their leading dot.
pub const DIRECTIVES: [&str; 5] = ["data", "string", "mat", "extern", "entry"];

/// Everything the driver needs to emit the output files.
#[derive(Debug, PartialEq)]
pub struct AssemblyOutput {
    pub image: ObjectImage,
    pub entries: Vec<TableEntry>,
    pub externals: Vec<TableEntry>,
}

/// Runs both passes over macro-free source text. Returns `None` when either
/// pass recorded an error; the diagnostics tell which lines are at fault.
pub fn assemble(source: &str, diags: &mut Diagnostics) -> Option<AssemblyOutput> {
    let mut layout = first_pass(source, diags);
    if diags.has_errors() {
        return None;
    }
    let resolution = second_pass(source, &mut layout, diags);
    if diags.has_errors() {
        return None;
    }
    Some(build_output(layout, resolution))
}

fn build_output(layout: Layout, resolution: Resolution) -> AssemblyOutput {
    let code = layout
        .instructions
        .iter()
        .flat_map(|instruction| {
            instruction
                .words
                .iter()
                .enumerate()
                .map(move |(offset, word)| AddressedWord {
                    address: instruction.address + offset as Address,
                    word: match word {
                        CodeWord::Ready(word) => *word,
                        // a clean resolution pass leaves nothing unresolved
                        CodeWord::Unresolved { .. } => unreachable!(),
                    },
                })
        })
        .collect();

    // data words live behind the code in the final image
    let icf = layout.icf;
    let data = layout
        .data
        .iter()
        .enumerate()
        .map(|(offset, &word)| AddressedWord {
            address: icf + offset as Address,
            word,
        })
        .collect();

    AssemblyOutput {
        image: ObjectImage::from(code, data),
        entries: resolution.entries,
        externals: resolution.externals,
    }
}

/// True for every name the language claims for itself: mnemonics, directive
/// keywords, the macro delimiters and the register names.
pub fn is_reserved_word(name: &str) -> bool {
    tencore::Opcode::from_mnemonic(name).is_some()
        || DIRECTIVES.contains(&name)
        || name == "mcro"
        || name == "mcroend"
        || is_register_name(name)
}

fn is_register_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next() == Some('r')
        && chars.next().map_or(false, |c| ('0'..='7').contains(&c))
        && chars.next().is_none()
}

/// A symbol name: a letter followed by letters and digits.
pub(crate) fn is_symbol_name(name: &str) -> bool {
    let mut chars = name.chars();
    chars.next().map_or(false, |c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric())
}

pub(crate) fn is_blank_or_comment(line: &str) -> bool {
    let trimmed = line.trim_start();
    trimmed.is_empty() || trimmed.starts_with(';')
}
