//! Macro expansion, the step that turns a raw source into the text the two
//! passes read. A `mcro NAME` line opens a capture, `mcroend` closes it, and
//! a line holding nothing but a known macro name is replaced by the captured
//! body. Everything else is copied through verbatim, so running the expander
//! over an already-expanded file reproduces it exactly.

use crate::diag::{DiagnosticKind, Diagnostics};
use crate::{is_reserved_word, is_symbol_name, MAX_SYMBOL_LENGTH};
use log::debug;
use std::collections::HashMap;

const MACRO_BEGIN: &str = "mcro";
const MACRO_END: &str = "mcroend";

type MacroMap = HashMap<String, Vec<String>>;

/// Expands every macro invocation in `source`. The expanded text is returned
/// even when diagnostics were recorded, so the caller can decide what to do
/// with it; the driver refuses to go on when any of them is an error.
pub fn expand_macros(source: &str, diags: &mut Diagnostics) -> String {
    let mut macros = MacroMap::new();
    let mut capture: Option<(String, Vec<String>)> = None;
    let mut output = String::new();

    for (number, line) in source.lines().enumerate() {
        let number = number + 1;
        let mut tokens = line.split_whitespace();
        let first = tokens.next();

        if capture.is_some() {
            if first == Some(MACRO_END) {
                if tokens.next().is_some() {
                    diags.error(number, DiagnosticKind::ExtraMacroTokens(MACRO_END));
                }
                let (name, body) = capture.take().unwrap();
                debug!("captured macro \"{}\" with {} line(s)", name, body.len());
                macros.insert(name, body);
            } else {
                capture.as_mut().unwrap().1.push(line.to_owned());
            }
            continue;
        }

        match first {
            Some(MACRO_BEGIN) => {
                let name = match (tokens.next(), tokens.next()) {
                    (Some(name), None) => {
                        validate_macro_name(name, number, diags);
                        name
                    }
                    (Some(name), Some(_)) => {
                        diags.error(number, DiagnosticKind::ExtraMacroTokens(MACRO_BEGIN));
                        name
                    }
                    (None, _) => {
                        diags.error(number, DiagnosticKind::InvalidMacroName(String::new()));
                        ""
                    }
                };
                // A rejected definition still opens the block, so that its
                // mcroend is consumed instead of leaking into the output.
                capture = Some((name.to_owned(), Vec::new()));
            }
            Some(name) if is_invocation(line, name, &macros) => {
                for body_line in &macros[name] {
                    output.push_str(body_line);
                    output.push('\n');
                }
            }
            _ => {
                output.push_str(line);
                output.push('\n');
            }
        }
    }

    if let Some((name, _)) = capture {
        diags.error(source.lines().count(), DiagnosticKind::UnterminatedMacro(name));
    }

    output
}

/// An invocation is a line whose only token is a known macro name.
fn is_invocation(line: &str, first: &str, macros: &MacroMap) -> bool {
    macros.contains_key(first) && line.trim() == first
}

fn validate_macro_name(name: &str, number: usize, diags: &mut Diagnostics) {
    if !is_symbol_name(name) || name.chars().count() > MAX_SYMBOL_LENGTH {
        diags.error(number, DiagnosticKind::InvalidMacroName(name.to_owned()));
    } else if is_reserved_word(name) {
        diags.error(number, DiagnosticKind::ReservedWord(name.to_owned()));
    }
}
