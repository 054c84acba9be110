#![allow(clippy::cognitive_complexity)]

use crate::parser::{AsmParser, Rule};
use ::pest::*;

#[test]
fn symbol_token() {
    parses_to! {
        parser: AsmParser,
        input: "LOOP",
        rule: Rule::symbol,
        tokens: [ symbol(0, 4) ]
    };
    fails_with! {
        parser: AsmParser,
        input: "9abc",
        rule: Rule::symbol,
        positives: vec![Rule::symbol],
        negatives: vec![],
        pos: 0
    };
}

#[test]
fn int_token() {
    parses_to! {
        parser: AsmParser,
        input: "-45",
        rule: Rule::int,
        tokens: [ int(0, 3) ]
    };
    parses_to! {
        parser: AsmParser,
        input: "+7",
        rule: Rule::int,
        tokens: [ int(0, 2) ]
    };
}

#[test]
fn register_token() {
    parses_to! {
        parser: AsmParser,
        input: "r3",
        rule: Rule::register,
        tokens: [ register(0, 2) ]
    };
    assert!(AsmParser::parse(Rule::register, "r8").is_err());
    assert!(AsmParser::parse(Rule::register, "r3x").is_err());
}

#[test]
fn immediate_operand() {
    parses_to! {
        parser: AsmParser,
        input: "#-7",
        rule: Rule::immediate,
        tokens: [ immediate(0, 3, [ int(1, 3) ]) ]
    };
}

#[test]
fn matrix_operand() {
    parses_to! {
        parser: AsmParser,
        input: "M[r1][r2]",
        rule: Rule::matrix,
        tokens: [ matrix(0, 9, [ symbol(0, 1), register(2, 4), register(6, 8) ]) ]
    };
}

#[test]
fn label_needs_a_tight_colon() {
    parses_to! {
        parser: AsmParser,
        input: "X:",
        rule: Rule::label,
        tokens: [ label(0, 2, [ symbol(0, 1) ]) ]
    };
}

#[test]
fn two_operand_statement() {
    parses_to! {
        parser: AsmParser,
        input: "mov X, r3",
        rule: Rule::statement,
        tokens: [
            statement(0, 9, [
                instruction(0, 9, [
                    mnemonic(0, 3),
                    operand_list(4, 9, [
                        operand(4, 5, [ symbol(4, 5) ]),
                        operand(7, 9, [ register(7, 9) ])
                    ])
                ])
            ])
        ]
    };
}

#[test]
fn data_directive() {
    parses_to! {
        parser: AsmParser,
        input: ".data 1, -2",
        rule: Rule::directive,
        tokens: [
            directive(0, 11, [
                data_dir(0, 11, [
                    data_kw(0, 5),
                    int_list(6, 11, [ int(6, 7), int(9, 11) ])
                ])
            ])
        ]
    };
}

#[test]
fn string_directive() {
    parses_to! {
        parser: AsmParser,
        input: ".string \"ab\"",
        rule: Rule::directive,
        tokens: [
            directive(0, 12, [
                string_dir(0, 12, [
                    string_kw(0, 7),
                    quoted(8, 12, [ string_body(9, 11) ])
                ])
            ])
        ]
    };
}

#[test]
fn mat_directive() {
    parses_to! {
        parser: AsmParser,
        input: ".mat [2][3]",
        rule: Rule::directive,
        tokens: [
            directive(0, 11, [
                mat_dir(0, 11, [
                    mat_kw(0, 4),
                    dimensions(5, 11, [ int(6, 7), int(9, 10) ])
                ])
            ])
        ]
    };
}

#[test]
fn whole_lines() {
    assert!(AsmParser::parse(Rule::line, "MAIN: mov X, r3").is_ok());
    assert!(AsmParser::parse(Rule::line, "  stop  ").is_ok());
    assert!(AsmParser::parse(Rule::line, "X: .data 1, 2").is_ok());
    assert!(AsmParser::parse(Rule::line, ".extern WAIT").is_ok());
    assert!(AsmParser::parse(Rule::line, "jmp M[r1][r2]").is_ok());

    // a register index out of range degrades the operand to a plain symbol
    assert!(AsmParser::parse(Rule::line, "inc r9").is_ok());

    assert!(AsmParser::parse(Rule::line, "MAIN : stop").is_err());
    assert!(AsmParser::parse(Rule::line, "mov X r3").is_err());
    assert!(AsmParser::parse(Rule::line, ".data 1,").is_err());
    assert!(AsmParser::parse(Rule::line, ".dataX 5").is_err());
    assert!(AsmParser::parse(Rule::line, ".data-5").is_err());
    assert!(AsmParser::parse(Rule::line, ".mat[2][2] 1").is_err());
    assert!(AsmParser::parse(Rule::line, ".string \"open").is_err());
}
