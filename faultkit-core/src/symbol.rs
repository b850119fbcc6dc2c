//! # Symbol resolution
//!
//! Resolve-by-name collaborator. Names are dotted (`com.example.Widget`) or
//! path-style (`std::string::String`); both split into module and item.

use crate::error::RawFailure;
use serde::Serialize;
use std::collections::HashMap;

/// A resolved symbol
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Symbol {
    /// Fully qualified name, as registered
    pub name: String,
    /// Everything before the last separator (empty for bare names)
    pub module: String,
    /// The last segment
    pub item: String,
}

impl Symbol {
    pub fn parse(name: &str) -> Self {
        let (module, item) = match (name.rfind("::"), name.rfind('.')) {
            (Some(i), Some(j)) if j > i => (&name[..j], &name[j + 1..]),
            (Some(i), _) => (&name[..i], &name[i + 2..]),
            (None, Some(j)) => (&name[..j], &name[j + 1..]),
            (None, None) => ("", name),
        };
        Self {
            name: name.to_string(),
            module: module.to_string(),
            item: item.to_string(),
        }
    }
}

/// Symbol resolver trait
pub trait SymbolResolver: Send + Sync {
    fn resolve(&self, name: &str) -> std::result::Result<Symbol, RawFailure>;
}

/// Registry of known symbols
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    symbols: HashMap<String, Symbol>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// A table preloaded with a few common names
    pub fn builtin() -> Self {
        Self::new()
            .with_symbol("java.lang.Object")
            .with_symbol("java.lang.String")
            .with_symbol("java.lang.Integer")
            .with_symbol("std::string::String")
            .with_symbol("std::vec::Vec")
    }

    pub fn with_symbol(mut self, name: &str) -> Self {
        self.register(name);
        self
    }

    pub fn register(&mut self, name: &str) {
        self.symbols.insert(name.to_string(), Symbol::parse(name));
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl SymbolResolver for SymbolTable {
    fn resolve(&self, name: &str) -> std::result::Result<Symbol, RawFailure> {
        let name = name.trim();
        if name.is_empty() {
            return Err(RawFailure::InvalidArgument(
                "symbol name must not be empty".to_string(),
            ));
        }
        self.symbols
            .get(name)
            .cloned()
            .ok_or_else(|| RawFailure::Symbol(name.to_string()))
    }
}
