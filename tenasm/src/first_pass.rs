//! The layout pass. Reads the expanded source one line at a time, assigns
//! addresses to labels, encodes every instruction word that does not depend
//! on a symbol, and collects the data image. Symbol references are left as
//! tagged unresolved words for the second pass to patch in place.

use crate::diag::{classify_comma_fault, DiagnosticKind, Diagnostics, OperandPosition};
use crate::int_util::{parse_dimension, parse_int};
use crate::parser::{AsmParser, Rule};
use crate::symbols::{SymbolKind, SymbolTable};
use crate::{is_blank_or_comment, is_reserved_word, is_symbol_name, MAX_LINE_LENGTH, MAX_SYMBOL_LENGTH};
use log::debug;
use matches::debug_assert_matches;
use pest::error::{Error as PestError, LineColLocation};
use pest::iterators::Pair;
use pest::Parser;
use tencore::constants::CODE_ORIGIN;
use tencore::encode::{char_word, to_word};
use tencore::{
    make_immediate_word, make_instruction_word, make_register_word, Address, AddressingMode,
    Opcode, Reg, Word,
};

/// One parsed operand, classified by addressing mode.
#[derive(Clone, Debug, PartialEq)]
pub enum Operand {
    Immediate(i16),
    Direct(String),
    Matrix(String, Reg, Reg),
    Register(Reg),
}

impl Operand {
    pub fn mode(&self) -> AddressingMode {
        match self {
            Operand::Immediate(_) => AddressingMode::Immediate,
            Operand::Direct(_) => AddressingMode::Direct,
            Operand::Matrix(..) => AddressingMode::Matrix,
            Operand::Register(_) => AddressingMode::Register,
        }
    }
}

/// A code word as laid out by this pass. Words that reference a symbol stay
/// unresolved, remembering the name and the line that used it.
#[derive(Clone, Debug, PartialEq)]
pub enum CodeWord {
    Ready(Word),
    Unresolved { symbol: String, line: usize },
}

/// One assembled instruction and the words it occupies, starting at
/// `address`.
#[derive(Clone, Debug, PartialEq)]
pub struct Instruction {
    pub address: Address,
    pub opcode: Opcode,
    pub words: Vec<CodeWord>,
}

/// Everything the layout pass produces. `icf` is the instruction counter
/// after the last instruction; data symbols have already been rebased by it
/// when the pass returns, data *words* are rebased by the caller at emission.
#[derive(Debug)]
pub struct Layout {
    pub symbols: SymbolTable,
    pub instructions: Vec<Instruction>,
    pub data: Vec<Word>,
    pub icf: Address,
}

pub fn first_pass(source: &str, diags: &mut Diagnostics) -> Layout {
    let mut layout = Layout {
        symbols: SymbolTable::new(),
        instructions: Vec::new(),
        data: Vec::new(),
        icf: CODE_ORIGIN,
    };
    let mut ic = CODE_ORIGIN;

    for (number, line) in source.lines().enumerate() {
        let number = number + 1;
        if line.chars().count() > MAX_LINE_LENGTH {
            diags.error(number, DiagnosticKind::LineTooLong(line.chars().count()));
        }
        if is_blank_or_comment(line) {
            continue;
        }
        process_line(line, number, &mut layout, &mut ic, diags);
    }

    layout.icf = ic;
    layout.symbols.shift_data(layout.icf);
    debug!(
        "layout: {} instruction(s), {} data word(s), {} symbol(s), icf={}",
        layout.instructions.len(),
        layout.data.len(),
        layout.symbols.len(),
        layout.icf
    );
    layout
}

fn process_line(
    line: &str,
    number: usize,
    layout: &mut Layout,
    ic: &mut Address,
    diags: &mut Diagnostics,
) {
    let parsed = match AsmParser::parse(Rule::line, line) {
        Ok(mut pairs) => pairs.next().unwrap(),
        Err(err) => {
            diags.error(number, refine_syntax_error(line, &err));
            return;
        }
    };

    let statement = parsed.into_inner().next().unwrap();
    debug_assert_matches!(statement.as_rule(), Rule::statement);
    let mut pairs = statement.into_inner();
    let first = pairs.next().unwrap();

    let (label, body) = if first.as_rule() == Rule::label {
        let name = first.into_inner().next().unwrap().as_str();
        (Some(name), pairs.next().unwrap())
    } else {
        (None, first)
    };

    match body.as_rule() {
        Rule::directive => {
            let directive = body.into_inner().next().unwrap();
            process_directive(directive, label, number, layout, diags);
        }
        Rule::instruction => process_instruction(body, label, number, layout, ic, diags),
        _ => unreachable!(),
    }
}

fn process_directive(
    pair: Pair<Rule>,
    label: Option<&str>,
    number: usize,
    layout: &mut Layout,
    diags: &mut Diagnostics,
) {
    let rule = pair.as_rule();
    let mut pairs = pair.into_inner();
    pairs.next(); // the keyword token

    match rule {
        Rule::data_dir => {
            define_label(layout, label, SymbolKind::Data, number, diags);
            process_int_list(pairs.next().unwrap(), number, layout, diags);
        }
        Rule::string_dir => {
            define_label(layout, label, SymbolKind::Data, number, diags);
            let body = pairs.next().unwrap().into_inner().next().unwrap();
            debug_assert_matches!(body.as_rule(), Rule::string_body);
            for byte in body.as_str().bytes() {
                layout.data.push(char_word(byte));
            }
            layout.data.push(0); // terminator word
        }
        Rule::mat_dir => {
            define_label(layout, label, SymbolKind::Data, number, diags);
            process_matrix(&mut pairs, number, layout, diags);
        }
        Rule::extern_dir => {
            if label.is_some() {
                diags.warning(number, DiagnosticKind::LabelIgnored(".extern"));
            }
            let name = pairs.next().unwrap().as_str();
            if valid_symbol_name(name, number, diags) {
                if let Err(kind) = layout.symbols.insert(name, 0, SymbolKind::External) {
                    diags.error(number, kind);
                }
            }
        }
        Rule::entry_dir => {
            // only checked for shape here; the second pass gives it meaning
            if label.is_some() {
                diags.warning(number, DiagnosticKind::LabelIgnored(".entry"));
            }
            let name = pairs.next().unwrap().as_str();
            if name.chars().count() > MAX_SYMBOL_LENGTH {
                diags.error(number, DiagnosticKind::SymbolTooLong(name.to_owned()));
            }
        }
        _ => unreachable!(),
    }
}

fn process_int_list(pair: Pair<Rule>, number: usize, layout: &mut Layout, diags: &mut Diagnostics) {
    debug_assert_matches!(pair.as_rule(), Rule::int_list);
    for int in pair.into_inner() {
        match parse_int(int.as_str()) {
            Ok(value) => layout.data.push(to_word(value)),
            Err(kind) => diags.error(number, kind),
        }
    }
}

fn process_matrix(
    pairs: &mut pest::iterators::Pairs<Rule>,
    number: usize,
    layout: &mut Layout,
    diags: &mut Diagnostics,
) {
    let dimensions = pairs.next().unwrap();
    debug_assert_matches!(dimensions.as_rule(), Rule::dimensions);
    let mut dimensions = dimensions.into_inner();
    let rows = parse_dimension(dimensions.next().unwrap().as_str());
    let cols = parse_dimension(dimensions.next().unwrap().as_str());
    let cells = match (rows, cols) {
        (Ok(rows), Ok(cols)) => rows * cols,
        (rows, cols) => {
            if let Err(kind) = rows {
                diags.error(number, kind);
            }
            if let Err(kind) = cols {
                diags.error(number, kind);
            }
            return;
        }
    };

    let start = layout.data.len();
    if let Some(list) = pairs.next() {
        process_int_list(list, number, layout, diags);
    }
    let given = layout.data.len() - start;
    if given > cells {
        diags.error(number, DiagnosticKind::SurplusInitializers { cells, given });
        layout.data.truncate(start + cells);
    } else {
        // absent trailing cells are implicitly zero
        layout.data.resize(start + cells, 0);
    }
}

fn process_instruction(
    pair: Pair<Rule>,
    label: Option<&str>,
    number: usize,
    layout: &mut Layout,
    ic: &mut Address,
    diags: &mut Diagnostics,
) {
    debug_assert_matches!(pair.as_rule(), Rule::instruction);
    if let Some(name) = label {
        if valid_symbol_name(name, number, diags) {
            if let Err(kind) = layout.symbols.insert(name, *ic, SymbolKind::Code) {
                diags.error(number, kind);
            }
        }
    }

    let mut pairs = pair.into_inner();
    let mnemonic = pairs.next().unwrap();
    let opcode = match Opcode::from_mnemonic(mnemonic.as_str()) {
        Some(opcode) => opcode,
        None => {
            diags.error(
                number,
                DiagnosticKind::UnknownOpcode(mnemonic.as_str().to_owned()),
            );
            return;
        }
    };

    let mut operands = Vec::new();
    if let Some(list) = pairs.next() {
        debug_assert_matches!(list.as_rule(), Rule::operand_list);
        for operand in list.into_inner() {
            match process_operand(operand, number, diags) {
                Some(operand) => operands.push(operand),
                None => return,
            }
        }
    }

    let expected = opcode.operand_count();
    if operands.len() != expected {
        diags.error(
            number,
            DiagnosticKind::WrongOperandCount {
                mnemonic: opcode.mnemonic(),
                expected,
                found: operands.len(),
            },
        );
        return;
    }

    let (src, dst) = match expected {
        2 => (Some(&operands[0]), Some(&operands[1])),
        1 => (None, Some(&operands[0])),
        _ => (None, None),
    };

    let mut legal = true;
    if let Some(operand) = src {
        if !opcode.allows_source(operand.mode()) {
            diags.error(
                number,
                DiagnosticKind::IllegalAddressing {
                    mnemonic: opcode.mnemonic(),
                    mode: operand.mode(),
                    position: OperandPosition::Source,
                },
            );
            legal = false;
        }
    }
    if let Some(operand) = dst {
        if !opcode.allows_destination(operand.mode()) {
            diags.error(
                number,
                DiagnosticKind::IllegalAddressing {
                    mnemonic: opcode.mnemonic(),
                    mode: operand.mode(),
                    position: OperandPosition::Destination,
                },
            );
            legal = false;
        }
    }
    if !legal {
        return;
    }

    let words = encode_words(opcode, src, dst, number);
    let address = *ic;
    *ic += words.len() as Address;
    layout.instructions.push(Instruction {
        address,
        opcode,
        words,
    });
}

fn process_operand(pair: Pair<Rule>, number: usize, diags: &mut Diagnostics) -> Option<Operand> {
    debug_assert_matches!(pair.as_rule(), Rule::operand);
    let inner = pair.into_inner().next().unwrap();
    match inner.as_rule() {
        Rule::immediate => {
            let int = inner.into_inner().next().unwrap();
            match parse_int(int.as_str()) {
                Ok(value) => Some(Operand::Immediate(value)),
                Err(kind) => {
                    diags.error(number, kind);
                    None
                }
            }
        }
        Rule::matrix => {
            let mut pairs = inner.into_inner();
            let symbol = operand_symbol(pairs.next().unwrap(), number, diags)?;
            let row = register_from(pairs.next().unwrap());
            let col = register_from(pairs.next().unwrap());
            Some(Operand::Matrix(symbol, row, col))
        }
        Rule::register => Some(Operand::Register(register_from(inner))),
        Rule::symbol => Some(Operand::Direct(operand_symbol(inner, number, diags)?)),
        _ => unreachable!(),
    }
}

fn operand_symbol(pair: Pair<Rule>, number: usize, diags: &mut Diagnostics) -> Option<String> {
    debug_assert_matches!(pair.as_rule(), Rule::symbol);
    let name = pair.as_str();
    if name.chars().count() > MAX_SYMBOL_LENGTH {
        diags.error(number, DiagnosticKind::SymbolTooLong(name.to_owned()));
        None
    } else {
        Some(name.to_owned())
    }
}

fn register_from(pair: Pair<Rule>) -> Reg {
    debug_assert_matches!(pair.as_rule(), Rule::register);
    let index = pair.as_str()[1..].parse::<u32>().unwrap();
    Reg::from_index(index).unwrap()
}

fn define_label(
    layout: &mut Layout,
    label: Option<&str>,
    kind: SymbolKind,
    number: usize,
    diags: &mut Diagnostics,
) {
    if let Some(name) = label {
        if valid_symbol_name(name, number, diags) {
            let value = layout.data.len() as Address;
            if let Err(kind) = layout.symbols.insert(name, value, kind) {
                diags.error(number, kind);
            }
        }
    }
}

fn valid_symbol_name(name: &str, number: usize, diags: &mut Diagnostics) -> bool {
    if name.chars().count() > MAX_SYMBOL_LENGTH {
        diags.error(number, DiagnosticKind::SymbolTooLong(name.to_owned()));
        false
    } else if is_reserved_word(name) {
        diags.error(number, DiagnosticKind::ReservedWord(name.to_owned()));
        false
    } else {
        true
    }
}

fn encode_words(
    opcode: Opcode,
    src: Option<&Operand>,
    dst: Option<&Operand>,
    line: usize,
) -> Vec<CodeWord> {
    let mut words = vec![CodeWord::Ready(make_instruction_word(
        opcode,
        src.map(Operand::mode),
        dst.map(Operand::mode),
    ))];

    match (src, dst) {
        // two register operands share a single fused word
        (Some(Operand::Register(src)), Some(Operand::Register(dst))) => {
            words.push(CodeWord::Ready(make_register_word(Some(*src), Some(*dst))));
        }
        _ => {
            if let Some(operand) = src {
                push_operand_words(&mut words, operand, OperandPosition::Source, line);
            }
            if let Some(operand) = dst {
                push_operand_words(&mut words, operand, OperandPosition::Destination, line);
            }
        }
    }
    words
}

fn push_operand_words(
    words: &mut Vec<CodeWord>,
    operand: &Operand,
    position: OperandPosition,
    line: usize,
) {
    match operand {
        Operand::Immediate(value) => words.push(CodeWord::Ready(make_immediate_word(*value))),
        Operand::Register(reg) => {
            let word = match position {
                OperandPosition::Source => make_register_word(Some(*reg), None),
                OperandPosition::Destination => make_register_word(None, Some(*reg)),
            };
            words.push(CodeWord::Ready(word));
        }
        Operand::Direct(symbol) => words.push(CodeWord::Unresolved {
            symbol: symbol.clone(),
            line,
        }),
        Operand::Matrix(symbol, row, col) => {
            words.push(CodeWord::Unresolved {
                symbol: symbol.clone(),
                line,
            });
            words.push(CodeWord::Ready(make_register_word(Some(*row), Some(*col))));
        }
    }
}

/// Turns a grammar rejection into the most specific diagnostic the line
/// supports, falling back to the failing column reported by the parser.
fn refine_syntax_error(line: &str, error: &PestError<Rule>) -> DiagnosticKind {
    let fallback = DiagnosticKind::Syntax {
        column: error_column(error),
    };
    let statement = strip_label(line).trim_start();

    if statement.starts_with('.') {
        let (keyword, payload) = split_token(statement);
        match keyword {
            ".data" => refine_int_list(payload).unwrap_or(fallback),
            ".mat" => refine_mat(payload).unwrap_or(fallback),
            ".string" => DiagnosticKind::InvalidString,
            ".extern" | ".entry" => DiagnosticKind::InvalidSymbol(payload.trim().to_owned()),
            _ => DiagnosticKind::UnknownDirective(keyword.to_owned()),
        }
    } else {
        let (keyword, payload) = split_token(statement);
        if Opcode::from_mnemonic(keyword).is_none() {
            // not even the mnemonic is recognizable, so the failing column
            // is the best lead there is
            return fallback;
        }
        if let Some(fault) = classify_comma_fault(payload) {
            fault
        } else if payload.contains('[') {
            DiagnosticKind::InvalidMatrixOperand
        } else if payload.contains('#') {
            DiagnosticKind::InvalidImmediate
        } else {
            fallback
        }
    }
}

fn error_column(error: &PestError<Rule>) -> usize {
    match error.line_col {
        LineColLocation::Pos((_, column)) => column,
        LineColLocation::Span((_, column), _) => column,
    }
}

fn strip_label(line: &str) -> &str {
    let trimmed = line.trim_start();
    match trimmed.find(':') {
        Some(at) if is_symbol_name(&trimmed[..at]) => &trimmed[at + 1..],
        _ => trimmed,
    }
}

fn split_token(text: &str) -> (&str, &str) {
    match text.find(char::is_whitespace) {
        Some(at) => (&text[..at], &text[at..]),
        None => (text, ""),
    }
}

fn refine_int_list(payload: &str) -> Option<DiagnosticKind> {
    classify_comma_fault(payload).or_else(|| {
        payload
            .split(|c: char| c == ',' || c.is_whitespace())
            .filter(|token| !token.is_empty())
            .find(|token| !is_int_literal(token))
            .map(|token| DiagnosticKind::InvalidNumber(token.to_owned()))
    })
}

fn refine_mat(payload: &str) -> Option<DiagnosticKind> {
    match dimensions_tail(payload.trim_start()) {
        Some(rest) => refine_int_list(rest),
        None => Some(DiagnosticKind::BadMatrixDimensions),
    }
}

/// Walks over a tight `[int][int]` prefix and returns what follows it.
fn dimensions_tail(text: &str) -> Option<&str> {
    let mut rest = text;
    for _ in 0..2 {
        if !rest.starts_with('[') {
            return None;
        }
        let close = rest.find(']')?;
        if !is_int_literal(&rest[1..close]) {
            return None;
        }
        rest = &rest[close + 1..];
    }
    Some(rest)
}

fn is_int_literal(text: &str) -> bool {
    let digits = match text.chars().next() {
        Some('+') | Some('-') => &text[1..],
        _ => text,
    };
    !digits.is_empty() && digits.chars().all(|c| c.is_ascii_digit())
}
