//! Per-line diagnostics. Nothing in the assembler aborts on the first
//! problem; every pass keeps going and records what it finds here, and the
//! driver decides from the collected list whether artifacts may be written.

use std::fmt;
use tencore::AddressingMode;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OperandPosition {
    Source,
    Destination,
}

impl fmt::Display for OperandPosition {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(match self {
            OperandPosition::Source => "source",
            OperandPosition::Destination => "destination",
        })
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum DiagnosticKind {
    // token-level
    InvalidSymbol(String),
    SymbolTooLong(String),
    InvalidNumber(String),
    NumberTooLong(String),
    InvalidImmediate,
    InvalidMatrixOperand,
    InvalidString,
    ReservedWord(String),

    // line structure
    LineTooLong(usize),
    LeadingComma,
    TrailingComma,
    DoubleComma,
    MissingComma,
    Syntax { column: usize },

    // statement meaning
    UnknownOpcode(String),
    UnknownDirective(String),
    WrongOperandCount {
        mnemonic: &'static str,
        expected: usize,
        found: usize,
    },
    IllegalAddressing {
        mnemonic: &'static str,
        mode: AddressingMode,
        position: OperandPosition,
    },
    DuplicateSymbol(String),
    ConflictingExtern(String),
    UndefinedSymbol(String),
    EntryUndefined(String),
    BadMatrixDimensions,
    SurplusInitializers { cells: usize, given: usize },
    LabelIgnored(&'static str),

    // macro blocks
    InvalidMacroName(String),
    ExtraMacroTokens(&'static str),
    UnterminatedMacro(String),
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            DiagnosticKind::InvalidSymbol(name) => write!(f, "\"{}\" is not a valid symbol", name),
            DiagnosticKind::SymbolTooLong(name) => {
                write!(f, "Symbol \"{}\" exceeds 30 characters", name)
            }
            DiagnosticKind::InvalidNumber(text) => write!(f, "\"{}\" is not a number", text),
            DiagnosticKind::NumberTooLong(text) => {
                write!(f, "Number \"{}\" exceeds 4 characters", text)
            }
            DiagnosticKind::InvalidImmediate => f.write_str("Invalid immediate operand"),
            DiagnosticKind::InvalidMatrixOperand => f.write_str("Invalid matrix operand"),
            DiagnosticKind::InvalidString => f.write_str("String must be enclosed in quotes"),
            DiagnosticKind::ReservedWord(name) => {
                write!(f, "\"{}\" is a reserved word", name)
            }
            DiagnosticKind::LineTooLong(len) => {
                write!(f, "Line is {} characters long, the limit is 80", len)
            }
            DiagnosticKind::LeadingComma => f.write_str("List starts with a comma"),
            DiagnosticKind::TrailingComma => f.write_str("List ends with a comma"),
            DiagnosticKind::DoubleComma => f.write_str("Two consecutive commas"),
            DiagnosticKind::MissingComma => f.write_str("Missing comma between values"),
            DiagnosticKind::Syntax { column } => write!(f, "Syntax error at column {}", column),
            DiagnosticKind::UnknownOpcode(name) => write!(f, "Invalid opcode \"{}\"", name),
            DiagnosticKind::UnknownDirective(name) => {
                write!(f, "Unknown directive \"{}\"", name)
            }
            DiagnosticKind::WrongOperandCount {
                mnemonic,
                expected,
                found,
            } => write!(
                f,
                "\"{}\" takes {} operand(s), found {}",
                mnemonic, expected, found
            ),
            DiagnosticKind::IllegalAddressing {
                mnemonic,
                mode,
                position,
            } => write!(
                f,
                "\"{}\" does not accept a {} {} operand",
                mnemonic, mode, position
            ),
            DiagnosticKind::DuplicateSymbol(name) => {
                write!(f, "Symbol \"{}\" already exists", name)
            }
            DiagnosticKind::ConflictingExtern(name) => {
                write!(f, "Symbol \"{}\" conflicts with an external declaration", name)
            }
            DiagnosticKind::UndefinedSymbol(name) => write!(f, "Undefined symbol \"{}\"", name),
            DiagnosticKind::EntryUndefined(name) => {
                write!(f, "Entry symbol \"{}\" does not exist", name)
            }
            DiagnosticKind::BadMatrixDimensions => {
                f.write_str("Matrix dimensions must be positive integers")
            }
            DiagnosticKind::SurplusInitializers { cells, given } => write!(
                f,
                "Matrix holds {} cell(s) but {} value(s) were given",
                cells, given
            ),
            DiagnosticKind::LabelIgnored(directive) => {
                write!(f, "Label before {} is ignored", directive)
            }
            DiagnosticKind::InvalidMacroName(name) => {
                write!(f, "\"{}\" is not a valid macro name", name)
            }
            DiagnosticKind::ExtraMacroTokens(keyword) => {
                write!(f, "Extra tokens after {}", keyword)
            }
            DiagnosticKind::UnterminatedMacro(name) => {
                write!(f, "Macro \"{}\" is never closed", name)
            }
        }
    }
}

#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub line: usize,
    pub severity: Severity,
    pub kind: DiagnosticKind,
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.severity {
            Severity::Warning => write!(f, "line {}: warning: {}", self.line, self.kind),
            Severity::Error => write!(f, "line {}: {}", self.line, self.kind),
        }
    }
}

/// The diagnostics collected while working on one source file.
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Diagnostics {
        Diagnostics::default()
    }

    pub fn error(&mut self, line: usize, kind: DiagnosticKind) {
        self.items.push(Diagnostic {
            line,
            severity: Severity::Error,
            kind,
        });
    }

    pub fn warning(&mut self, line: usize, kind: DiagnosticKind) {
        self.items.push(Diagnostic {
            line,
            severity: Severity::Warning,
            kind,
        });
    }

    pub fn has_errors(&self) -> bool {
        self.items
            .iter()
            .any(|item| item.severity == Severity::Error)
    }

    pub fn error_count(&self) -> usize {
        self.items
            .iter()
            .filter(|item| item.severity == Severity::Error)
            .count()
    }

    pub fn items(&self) -> &[Diagnostic] {
        &self.items[..]
    }
}

/// Tells apart the ways a comma-separated list can be malformed. Runs over
/// the raw list text once the grammar has rejected it; returns `None` when
/// the problem is not with the commas.
pub fn classify_comma_fault(list: &str) -> Option<DiagnosticKind> {
    let trimmed = list.trim();
    if trimmed.starts_with(',') {
        return Some(DiagnosticKind::LeadingComma);
    }
    if trimmed.ends_with(',') {
        return Some(DiagnosticKind::TrailingComma);
    }

    #[derive(PartialEq)]
    enum Token {
        Comma,
        Item,
    }

    let mut tokens = Vec::new();
    let mut chars = trimmed.chars().peekable();
    while let Some(c) = chars.next() {
        if c.is_whitespace() {
            continue;
        }
        if c == ',' {
            tokens.push(Token::Comma);
        } else {
            while let Some(&next) = chars.peek() {
                if next.is_whitespace() || next == ',' {
                    break;
                }
                chars.next();
            }
            tokens.push(Token::Item);
        }
    }

    for pair in tokens.windows(2) {
        if pair[0] == Token::Comma && pair[1] == Token::Comma {
            return Some(DiagnosticKind::DoubleComma);
        }
        if pair[0] == Token::Item && pair[1] == Token::Item {
            return Some(DiagnosticKind::MissingComma);
        }
    }
    None
}
