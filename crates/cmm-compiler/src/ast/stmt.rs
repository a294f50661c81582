use cmm_core::Position;

use super::decl::VarDecl;
use super::expr::{Assign, CallExpr, Expr, Loc};

/// `{ varDeclList stmtList }` — every brace-delimited body in the
/// language (function bodies, if/else arms, while/repeat bodies)
/// shares this shape: locals declared up front, then statements.
#[derive(Debug, Default)]
pub struct Block {
    pub decls: Vec<VarDecl>,
    pub stmts: Vec<Stmt>,
}

#[derive(Debug)]
pub struct IfStmt {
    pub cond: Expr,
    pub body: Block,
}

#[derive(Debug)]
pub struct IfElseStmt {
    pub cond: Expr,
    pub then_body: Block,
    pub else_body: Block,
}

#[derive(Debug)]
pub struct WhileStmt {
    pub cond: Expr,
    pub body: Block,
}

/// `repeat (e) { S }`. Name-analyzed and type-checked like `while`, but
/// intentionally not code-generated (see the emitter's `Stmt::Repeat`
/// arm).
#[derive(Debug)]
pub struct RepeatStmt {
    pub cond: Expr,
    pub body: Block,
}

#[derive(Debug)]
pub struct ReturnStmt {
    pub value: Option<Expr>,
    pub pos: Position,
}

#[derive(Debug)]
pub enum Stmt {
    Assign(Assign),
    PostInc(Loc, Position),
    PostDec(Loc, Position),
    Read(Loc),
    Write(Expr),
    If(IfStmt),
    IfElse(IfElseStmt),
    While(WhileStmt),
    Repeat(RepeatStmt),
    Call(CallExpr),
    Return(ReturnStmt),
}
