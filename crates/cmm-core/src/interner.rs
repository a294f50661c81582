//! String interning.
//!
//! Identifiers and string literals are interned once during lexing and
//! referred to everywhere else by a cheap `Copy` handle. This makes
//! symbol-table lookups and equality checks on identifiers O(1)
//! comparisons instead of string comparisons.

use std::collections::HashMap;

/// A handle to an interned string.
///
/// Two `Symbol`s compare equal iff the strings they were interned from
/// are equal, which makes this cheaper to carry around in AST nodes
/// than `String`/`&str`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Symbol(u32);

impl Symbol {
    /// The raw index into the owning `Interner`. Only meaningful when
    /// paired with the `Interner` that produced it.
    pub fn index(self) -> u32 {
        self.0
    }
}

/// Owns the backing storage for every `Symbol` handed out.
#[derive(Debug, Default)]
pub struct Interner {
    map: HashMap<String, Symbol>,
    strings: Vec<String>,
}

impl Interner {
    pub fn new() -> Self {
        Self::default()
    }

    /// Intern `s`, reusing an existing entry if one is already equal.
    pub fn intern(&mut self, s: &str) -> Symbol {
        if let Some(&sym) = self.map.get(s) {
            return sym;
        }
        self.intern_owned(s.to_string())
    }

    /// Intern an owned `String`, avoiding a copy when the caller
    /// already built one (e.g. after unescaping a string literal).
    pub fn intern_owned(&mut self, s: String) -> Symbol {
        if let Some(&sym) = self.map.get(&s) {
            return sym;
        }
        let sym = Symbol(self.strings.len() as u32);
        self.map.insert(s.clone(), sym);
        self.strings.push(s);
        sym
    }

    /// Resolve a `Symbol` back to its string.
    ///
    /// Panics if `sym` was not produced by this interner, which can
    /// only happen by mixing symbols from two different `Interner`s.
    pub fn resolve(&self, sym: Symbol) -> &str {
        self.try_resolve(sym)
            .expect("Symbol resolved against a foreign Interner")
    }

    pub fn try_resolve(&self, sym: Symbol) -> Option<&str> {
        self.strings.get(sym.0 as usize).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Symbol, &str)> {
        self.strings
            .iter()
            .enumerate()
            .map(|(i, s)| (Symbol(i as u32), s.as_str()))
    }
}
