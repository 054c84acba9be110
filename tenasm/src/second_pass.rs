//! The resolution pass. Walks the expanded source once more to give `.entry`
//! directives their meaning, then patches every unresolved code word through
//! the symbol table and records where external symbols are used.

use crate::diag::{DiagnosticKind, Diagnostics};
use crate::first_pass::{CodeWord, Layout};
use crate::is_blank_or_comment;
use crate::parser::{AsmParser, Rule};
use crate::symbols::SymbolKind;
use log::debug;
use pest::Parser;
use tencore::{make_address_word, Address, Are};
use tenobj::TableEntry;

/// What resolution adds on top of the layout: the exported rows for `.ent`
/// and one row per external use site for `.ext`.
#[derive(Debug, Default, PartialEq)]
pub struct Resolution {
    pub entries: Vec<TableEntry>,
    pub externals: Vec<TableEntry>,
}

pub fn second_pass(source: &str, layout: &mut Layout, diags: &mut Diagnostics) -> Resolution {
    // entry directives wait until now so that labels defined anywhere in the
    // file are already in the table
    for (number, line) in source.lines().enumerate() {
        let number = number + 1;
        if is_blank_or_comment(line) {
            continue;
        }
        process_entry(line, number, layout, diags);
    }

    let externals = patch_references(layout, diags);
    let entries: Vec<TableEntry> = layout
        .symbols
        .iter()
        .filter(|symbol| symbol.kind == SymbolKind::Entry)
        .map(|symbol| TableEntry::new(symbol.name.clone(), symbol.value))
        .collect();

    debug!(
        "resolution: {} entry row(s), {} external use(s)",
        entries.len(),
        externals.len()
    );
    Resolution { entries, externals }
}

fn process_entry(line: &str, number: usize, layout: &mut Layout, diags: &mut Diagnostics) {
    // anything unparseable was already diagnosed by the layout pass
    let parsed = match AsmParser::parse(Rule::line, line) {
        Ok(mut pairs) => pairs.next().unwrap(),
        Err(_) => return,
    };

    let statement = parsed.into_inner().next().unwrap();
    let mut pairs = statement.into_inner();
    let mut body = pairs.next().unwrap();
    if body.as_rule() == Rule::label {
        body = pairs.next().unwrap();
    }
    if body.as_rule() != Rule::directive {
        return;
    }
    let directive = body.into_inner().next().unwrap();
    if directive.as_rule() != Rule::entry_dir {
        return;
    }

    let name = directive.into_inner().nth(1).unwrap().as_str();
    if layout.symbols.set_kind(name, SymbolKind::Entry) {
        debug!("exported symbol \"{}\"", name);
    } else {
        diags.error(number, DiagnosticKind::EntryUndefined(name.to_owned()));
    }
}

fn patch_references(layout: &mut Layout, diags: &mut Diagnostics) -> Vec<TableEntry> {
    let Layout {
        ref symbols,
        ref mut instructions,
        ..
    } = *layout;

    let mut externals = Vec::new();
    for instruction in instructions {
        for (offset, word) in instruction.words.iter_mut().enumerate() {
            let (symbol, line) = match word {
                CodeWord::Unresolved { symbol, line } => (symbol.clone(), *line),
                CodeWord::Ready(_) => continue,
            };
            let address = instruction.address + offset as Address;
            match symbols.get(&symbol) {
                None => diags.error(line, DiagnosticKind::UndefinedSymbol(symbol)),
                Some(target) if target.kind == SymbolKind::External => {
                    *word = CodeWord::Ready(make_address_word(target.value, Are::External));
                    externals.push(TableEntry::new(symbol, address));
                }
                Some(target) => {
                    *word = CodeWord::Ready(make_address_word(target.value, Are::Relocatable));
                }
            }
        }
    }
    externals
}
