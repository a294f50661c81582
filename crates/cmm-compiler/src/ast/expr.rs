use std::cell::Cell;

use cmm_core::{Position, Symbol};

use crate::analyze::symbol::SymbolId;
use crate::analyze::types::TypeId;

use super::decl::DeclName;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Not,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    And,
    Or,
    Eq,
    Neq,
    Lt,
    Gt,
    Le,
    Ge,
}

impl BinaryOp {
    pub fn is_arithmetic(self) -> bool {
        matches!(self, Self::Add | Self::Sub | Self::Mul | Self::Div)
    }

    pub fn is_logical(self) -> bool {
        matches!(self, Self::And | Self::Or)
    }

    pub fn is_relational(self) -> bool {
        matches!(self, Self::Lt | Self::Gt | Self::Le | Self::Ge)
    }

    pub fn is_equality(self) -> bool {
        matches!(self, Self::Eq | Self::Neq)
    }
}

/// A use of an identifier in expression position (as opposed to
/// [`DeclName`], which is a declaration site).
#[derive(Debug)]
pub struct IdentExpr {
    pub name: Symbol,
    pub pos: Position,
    pub sym: Cell<Option<SymbolId>>,
    pub ty: Cell<TypeId>,
}

impl IdentExpr {
    pub fn new(name: Symbol, pos: Position) -> Self {
        Self {
            name,
            pos,
            sym: Cell::new(None),
            ty: Cell::new(TypeId::ERROR),
        }
    }
}

#[derive(Debug)]
pub struct IntLit {
    pub value: i32,
    pub pos: Position,
    pub ty: Cell<TypeId>,
}

#[derive(Debug)]
pub struct StrLit {
    /// The verbatim, still-quoted lexeme (e.g. `"hi\n"`), interned so
    /// identical literals share one `.data` entry during emission.
    pub value: Symbol,
    pub pos: Position,
    pub ty: Cell<TypeId>,
}

#[derive(Debug)]
pub struct BoolLit {
    pub value: bool,
    pub pos: Position,
    pub ty: Cell<TypeId>,
}

/// `loc . id` — field access. `field.sym` doubles as the "mySym" the
/// spec describes: once this access resolves to a struct-instance
/// field, a further dot-access on this node chains through `field.sym`
/// exactly as it would off a plain identifier.
#[derive(Debug)]
pub struct DotAccess {
    pub base: Expr,
    pub field: IdentExpr,
    /// Set when `base` did not resolve to a struct instance, to
    /// suppress cascading "Invalid struct field name" diagnostics.
    pub bad: Cell<bool>,
    pub ty: Cell<TypeId>,
}

/// An lvalue: the subset of expressions legal on the left of `=`, as
/// the target of `++`/`--`, or as the operand of `cin >>`.
#[derive(Debug)]
pub enum Loc {
    Id(IdentExpr),
    Dot(Box<DotAccess>),
}

impl Loc {
    pub fn position(&self) -> Position {
        match self {
            Loc::Id(id) => id.pos,
            Loc::Dot(dot) => dot.field.pos,
        }
    }

    pub fn ty(&self) -> TypeId {
        match self {
            Loc::Id(id) => id.ty.get(),
            Loc::Dot(dot) => dot.ty.get(),
        }
    }

    pub fn sym(&self) -> Option<SymbolId> {
        match self {
            Loc::Id(id) => id.sym.get(),
            Loc::Dot(dot) => dot.field.sym.get(),
        }
    }
}

#[derive(Debug)]
pub struct Assign {
    pub lhs: Loc,
    pub rhs: Expr,
    pub pos: Position,
    pub ty: Cell<TypeId>,
}

#[derive(Debug)]
pub struct CallExpr {
    pub callee: IdentExpr,
    pub args: Vec<Expr>,
    pub pos: Position,
    pub ty: Cell<TypeId>,
}

#[derive(Debug)]
pub struct UnaryExpr {
    pub op: UnaryOp,
    pub operand: Box<Expr>,
    pub pos: Position,
    pub ty: Cell<TypeId>,
}

#[derive(Debug)]
pub struct BinaryExpr {
    pub op: BinaryOp,
    pub lhs: Box<Expr>,
    pub rhs: Box<Expr>,
    pub pos: Position,
    pub ty: Cell<TypeId>,
}

#[derive(Debug)]
pub enum Expr {
    Int(IntLit),
    Str(StrLit),
    Bool(BoolLit),
    Ident(IdentExpr),
    Dot(Box<DotAccess>),
    Assign(Box<Assign>),
    Call(Box<CallExpr>),
    Unary(Box<UnaryExpr>),
    Binary(Box<BinaryExpr>),
}

impl Expr {
    pub fn position(&self) -> Position {
        match self {
            Expr::Int(n) => n.pos,
            Expr::Str(s) => s.pos,
            Expr::Bool(b) => b.pos,
            Expr::Ident(id) => id.pos,
            Expr::Dot(d) => d.field.pos,
            Expr::Assign(a) => a.pos,
            Expr::Call(c) => c.pos,
            Expr::Unary(u) => u.pos,
            Expr::Binary(b) => b.pos,
        }
    }

    pub fn ty(&self) -> TypeId {
        match self {
            Expr::Int(n) => n.ty.get(),
            Expr::Str(s) => s.ty.get(),
            Expr::Bool(b) => b.ty.get(),
            Expr::Ident(id) => id.ty.get(),
            Expr::Dot(d) => d.ty.get(),
            Expr::Assign(a) => a.ty.get(),
            Expr::Call(c) => c.ty.get(),
            Expr::Unary(u) => u.ty.get(),
            Expr::Binary(b) => b.ty.get(),
        }
    }

    pub fn set_ty(&self, ty: TypeId) {
        match self {
            Expr::Int(n) => n.ty.set(ty),
            Expr::Str(s) => s.ty.set(ty),
            Expr::Bool(b) => b.ty.set(ty),
            Expr::Ident(id) => id.ty.set(ty),
            Expr::Dot(d) => d.ty.set(ty),
            Expr::Assign(a) => a.ty.set(ty),
            Expr::Call(c) => c.ty.set(ty),
            Expr::Unary(u) => u.ty.set(ty),
            Expr::Binary(b) => b.ty.set(ty),
        }
    }

    /// `loc` stripped out of a general expression, for statement forms
    /// that require an lvalue after parsing already shaped it as one.
    pub fn as_loc(self) -> Option<Loc> {
        match self {
            Expr::Ident(id) => Some(Loc::Id(id)),
            Expr::Dot(dot) => Some(Loc::Dot(dot)),
            _ => None,
        }
    }
}

impl From<DeclName> for IdentExpr {
    fn from(name: DeclName) -> Self {
        IdentExpr::new(name.text, name.pos)
    }
}
