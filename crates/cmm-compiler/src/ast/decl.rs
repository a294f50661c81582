use std::cell::Cell;

use cmm_core::{Position, Symbol};

use crate::analyze::symbol::SymbolId;

use super::stmt::Block;
use super::ty::TypeNode;

/// A bare name as it appears at a declaration site: variable, formal,
/// function, struct tag, or struct field.
#[derive(Debug, Clone, Copy)]
pub struct DeclName {
    pub text: Symbol,
    pub pos: Position,
}

impl DeclName {
    pub fn new(text: Symbol, pos: Position) -> Self {
        Self { text, pos }
    }
}

#[derive(Debug)]
pub enum Decl {
    Var(VarDecl),
    Fn(FnDecl),
    Struct(StructDecl),
}

/// `T x;` — a variable declaration. Reused for formals' field lists and
/// struct fields, which share the same shape and analysis rules.
#[derive(Debug)]
pub struct VarDecl {
    pub ty: TypeNode,
    pub name: DeclName,
    /// Filled in by name resolution.
    pub sym: Cell<Option<SymbolId>>,
}

impl VarDecl {
    pub fn new(ty: TypeNode, name: DeclName) -> Self {
        Self {
            ty,
            name,
            sym: Cell::new(None),
        }
    }
}

#[derive(Debug)]
pub struct FormalDecl {
    pub ty: TypeNode,
    pub name: DeclName,
    pub sym: Cell<Option<SymbolId>>,
}

impl FormalDecl {
    pub fn new(ty: TypeNode, name: DeclName) -> Self {
        Self {
            ty,
            name,
            sym: Cell::new(None),
        }
    }
}

/// `T f(formals) { body }`.
#[derive(Debug)]
pub struct FnDecl {
    pub ret_ty: TypeNode,
    pub name: DeclName,
    pub formals: Vec<FormalDecl>,
    pub body: Block,
    pub sym: Cell<Option<SymbolId>>,
}

/// `struct S { fields };`.
#[derive(Debug)]
pub struct StructDecl {
    pub name: DeclName,
    pub fields: Vec<VarDecl>,
    pub sym: Cell<Option<SymbolId>>,
}
