use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// A function name paired with the include path of the file defining it
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FunctionSymbol {
    pub name: String,
    pub include_path: String,
}

impl FunctionSymbol {
    pub fn new(name: impl Into<String>, include_path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            include_path: include_path.into(),
        }
    }
}

/// Maps function names to the include path that defines them.
///
/// Holds at most one path per name; a later `set` for the same name
/// replaces the earlier path.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SymbolIndex {
    symbols: HashMap<String, String>,
}

impl SymbolIndex {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn clear(&mut self) {
        self.symbols.clear();
    }

    pub fn set(&mut self, name: impl Into<String>, include_path: impl Into<String>) {
        self.symbols.insert(name.into(), include_path.into());
    }

    pub fn insert(&mut self, symbol: FunctionSymbol) {
        self.set(symbol.name, symbol.include_path);
    }

    pub fn get(&self, name: &str) -> Option<&str> {
        self.symbols.get(name).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.symbols.len()
    }

    pub fn is_empty(&self) -> bool {
        self.symbols.is_empty()
    }
}

impl FromIterator<FunctionSymbol> for SymbolIndex {
    fn from_iter<T: IntoIterator<Item = FunctionSymbol>>(iter: T) -> Self {
        let mut index = Self::new();
        for symbol in iter {
            index.insert(symbol);
        }
        index
    }
}
