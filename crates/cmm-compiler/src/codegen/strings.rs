//! String-literal table: literals are keyed by their verbatim quoted
//! lexeme (two occurrences of `"hi"` share one `.data` entry) rather
//! than by content after unescaping, matching how [`crate::ast::StrLit`]
//! stores them.

use std::collections::HashMap;

use cmm_core::Symbol;

#[derive(Debug, Default)]
pub struct StringTable {
    labels: HashMap<Symbol, String>,
    next: u32,
}

impl StringTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the label for `literal`, allocating a fresh one the
    /// first time this exact lexeme is seen. The bool is `true` on
    /// that first occurrence, telling the caller to also emit the
    /// `.data`/`.asciiz` entry.
    pub fn label_for(&mut self, literal: Symbol) -> (String, bool) {
        if let Some(label) = self.labels.get(&literal) {
            return (label.clone(), false);
        }
        let label = format!("_str{}", self.next);
        self.next += 1;
        self.labels.insert(literal, label.clone());
        (label, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn repeated_literal_reuses_its_label() {
        let mut interner = cmm_core::Interner::new();
        let mut table = StringTable::new();
        let lit = interner.intern("\"hi\"");
        let (l1, first) = table.label_for(lit);
        assert!(first);
        let (l2, second) = table.label_for(lit);
        assert!(!second);
        assert_eq!(l1, l2);
    }

    #[test]
    fn distinct_literals_get_distinct_labels() {
        let mut interner = cmm_core::Interner::new();
        let mut table = StringTable::new();
        let a = interner.intern("\"a\"");
        let b = interner.intern("\"b\"");
        let (la, _) = table.label_for(a);
        let (lb, _) = table.label_for(b);
        assert_ne!(la, lb);
    }
}
