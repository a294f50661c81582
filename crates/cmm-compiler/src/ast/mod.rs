//! The abstract syntax tree.
//!
//! Nodes are owned, tagged-variant trees (no arena, no `Rc<RefCell<_>>`):
//! `Box`/`Vec` for ownership, plain `Cell<Option<SymbolId>>` and
//! `Cell<TypeId>` for the handful of fields that later passes fill in.
//! Both of those payloads are `Copy`, so mutating them through a shared
//! `&Program` during name resolution and type checking needs no
//! interior-mutability ceremony beyond `Cell`.

mod decl;
mod expr;
mod stmt;
mod ty;

pub use decl::{Decl, DeclName, FnDecl, FormalDecl, StructDecl, VarDecl};
pub use expr::{
    Assign, BinaryExpr, BinaryOp, BoolLit, CallExpr, DotAccess, Expr, IdentExpr, IntLit, Loc,
    StrLit, UnaryExpr, UnaryOp,
};
pub use stmt::{Block, IfElseStmt, IfStmt, RepeatStmt, ReturnStmt, Stmt, WhileStmt};
pub use ty::TypeNode;

/// The whole compilation unit: an ordered list of top-level declarations.
#[derive(Debug, Default)]
pub struct Program {
    pub decls: Vec<Decl>,
}
