use std::collections::HashMap;

use crate::ir::{FuncId, Value};

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Symbol {
    Value(Value),
    Function(FuncId),
}

/// Maps source names to emitted values and functions.
#[derive(Clone, Debug, Default)]
pub struct SymbolTable {
    table: HashMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name`, returning what it shadowed.
    pub fn bind(&mut self, name: &str, symbol: Symbol) -> Option<Symbol> {
        self.table.insert(name.to_string(), symbol)
    }

    pub fn lookup(&self, name: &str) -> Option<Symbol> {
        self.table.get(name).copied()
    }
}
