use crate::diag::DiagnosticKind;
use std::collections::HashMap;
use tencore::Address;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SymbolKind {
    Data,
    Code,
    Entry,
    External,
}

#[derive(Clone, Debug, PartialEq)]
pub struct Symbol {
    pub name: String,
    pub value: Address,
    pub kind: SymbolKind,
}

/// Insertion-ordered symbol table: lookups go through a name index, while
/// `.ent` rows come out in the order the symbols were first declared.
#[derive(Debug, Default)]
pub struct SymbolTable {
    symbols: Vec<Symbol>,
    index: HashMap<String, usize>,
}

impl SymbolTable {
    pub fn new() -> SymbolTable {
        SymbolTable::default()
    }

    /// Declares a name. Re-declaring an external as external is a no-op; any
    /// other duplicate is refused.
    pub fn insert(
        &mut self,
        name: &str,
        value: Address,
        kind: SymbolKind,
    ) -> Result<(), DiagnosticKind> {
        if let Some(&at) = self.index.get(name) {
            let existing = self.symbols[at].kind;
            return if kind == SymbolKind::External && existing == SymbolKind::External {
                Ok(())
            } else if kind == SymbolKind::External {
                Err(DiagnosticKind::ConflictingExtern(name.to_owned()))
            } else {
                Err(DiagnosticKind::DuplicateSymbol(name.to_owned()))
            };
        }
        self.index.insert(name.to_owned(), self.symbols.len());
        self.symbols.push(Symbol {
            name: name.to_owned(),
            value,
            kind,
        });
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&Symbol> {
        self.index.get(name).map(|&at| &self.symbols[at])
    }

    /// Re-kinds an existing symbol, overwriting whatever was there. Returns
    /// false when the name is unknown.
    pub fn set_kind(&mut self, name: &str, kind: SymbolKind) -> bool {
        match self.index.get(name) {
            Some(&at) => {
                self.symbols[at].kind = kind;
                true
            }
            None => false,
        }
    }

    /// Rebases every data symbol once the final code length is known. Called
    /// exactly once, between the two passes.
    pub fn shift_data(&mut self, icf: Address) {
        for symbol in &mut self.symbols {
            if symbol.kind == SymbolKind::Data {
                symbol.value += icf;
            }
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = &Symbol> {
        self.symbols.iter()
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn duplicate_names_are_refused() {
        let mut table = SymbolTable::new();
        table.insert("L", 100, SymbolKind::Code).unwrap();
        assert_eq!(
            table.insert("L", 104, SymbolKind::Code),
            Err(DiagnosticKind::DuplicateSymbol("L".to_owned()))
        );
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn repeated_extern_is_a_no_op() {
        let mut table = SymbolTable::new();
        table.insert("E", 0, SymbolKind::External).unwrap();
        table.insert("E", 0, SymbolKind::External).unwrap();
        assert_eq!(table.len(), 1);

        table.insert("L", 100, SymbolKind::Code).unwrap();
        assert_eq!(
            table.insert("L", 0, SymbolKind::External),
            Err(DiagnosticKind::ConflictingExtern("L".to_owned()))
        );
    }

    #[test]
    fn shift_moves_only_data_symbols() {
        let mut table = SymbolTable::new();
        table.insert("MAIN", 100, SymbolKind::Code).unwrap();
        table.insert("X", 0, SymbolKind::Data).unwrap();
        table.insert("E", 0, SymbolKind::External).unwrap();

        table.shift_data(104);

        assert_eq!(table.get("MAIN").unwrap().value, 100);
        assert_eq!(table.get("X").unwrap().value, 104);
        assert_eq!(table.get("E").unwrap().value, 0);
    }

    #[test]
    fn iteration_keeps_insertion_order() {
        let mut table = SymbolTable::new();
        table.insert("B", 1, SymbolKind::Data).unwrap();
        table.insert("A", 2, SymbolKind::Data).unwrap();
        let names: Vec<_> = table.iter().map(|s| s.name.as_str()).collect();
        assert_eq!(names, ["B", "A"]);
    }
}
