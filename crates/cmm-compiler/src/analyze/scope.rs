//! The lexically-scoped symbol table (C3).

use indexmap::IndexMap;

use cmm_core::Symbol;

use super::symbol::SymbolId;

/// Invariant violation from misusing the scope stack. Every variant
/// here indicates a bug in the caller (name resolution), not a
/// property of the source program being compiled: callers are
/// expected to check [`ScopeTable::lookup_local`] before calling
/// [`ScopeTable::add_decl`], and to pair every `add_scope` with exactly
/// one `remove_scope`. Reaching one of these is an internal error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
    #[error("scope stack is empty")]
    EmptyScope,
    #[error("identifier already declared in this scope")]
    DuplicateLocal,
}

/// A stack of lexical scopes, innermost last.
#[derive(Debug, Default)]
pub struct ScopeTable {
    scopes: Vec<IndexMap<Symbol, SymbolId>>,
}

impl ScopeTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_scope(&mut self) {
        self.scopes.push(IndexMap::new());
    }

    pub fn remove_scope(&mut self) -> Result<(), ScopeError> {
        self.scopes.pop().map(|_| ()).ok_or(ScopeError::EmptyScope)
    }

    pub fn add_decl(&mut self, name: Symbol, sym: SymbolId) -> Result<(), ScopeError> {
        let top = self.scopes.last_mut().ok_or(ScopeError::EmptyScope)?;
        if top.contains_key(&name) {
            return Err(ScopeError::DuplicateLocal);
        }
        top.insert(name, sym);
        Ok(())
    }

    pub fn lookup_local(&self, name: Symbol) -> Option<SymbolId> {
        self.scopes.last()?.get(&name).copied()
    }

    pub fn lookup_global(&self, name: Symbol) -> Option<SymbolId> {
        self.scopes.iter().rev().find_map(|s| s.get(&name).copied())
    }

    pub fn depth(&self) -> usize {
        self.scopes.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analyze::symbol::{Offset, SymbolArena, SymbolData, SymbolKind};
    use crate::analyze::types::Type;

    fn sym(arena: &mut SymbolArena, name: Symbol) -> SymbolId {
        arena.alloc(SymbolData {
            name,
            kind: SymbolKind::Variable {
                ty: Type::Int,
                offset: Offset::Global,
            },
        })
    }

    #[test]
    fn add_decl_without_scope_is_empty_scope() {
        let mut scopes = ScopeTable::new();
        let mut arena = SymbolArena::new();
        let x = cmm_core::Interner::new().intern("x");
        let id = sym(&mut arena, x);
        assert_eq!(scopes.add_decl(x, id), Err(ScopeError::EmptyScope));
    }

    #[test]
    fn duplicate_decl_in_same_scope_is_rejected() {
        let mut scopes = ScopeTable::new();
        let mut arena = SymbolArena::new();
        let mut interner = cmm_core::Interner::new();
        let x = interner.intern("x");
        scopes.add_scope();
        let first = sym(&mut arena, x);
        scopes.add_decl(x, first).unwrap();
        let second = sym(&mut arena, x);
        assert_eq!(scopes.add_decl(x, second), Err(ScopeError::DuplicateLocal));
    }

    #[test]
    fn lookup_global_sees_through_nested_scopes() {
        let mut scopes = ScopeTable::new();
        let mut arena = SymbolArena::new();
        let mut interner = cmm_core::Interner::new();
        let x = interner.intern("x");
        scopes.add_scope();
        let id = sym(&mut arena, x);
        scopes.add_decl(x, id).unwrap();
        scopes.add_scope();
        assert_eq!(scopes.lookup_local(x), None);
        assert_eq!(scopes.lookup_global(x), Some(id));
    }

    #[test]
    fn remove_scope_on_empty_stack_errors() {
        let mut scopes = ScopeTable::new();
        assert_eq!(scopes.remove_scope(), Err(ScopeError::EmptyScope));
    }
}
