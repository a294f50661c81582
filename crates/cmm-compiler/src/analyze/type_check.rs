//! Type checking (C5): a post-order traversal of the linked AST that
//! computes and validates every expression's semantic type.
//!
//! Must run after [`super::name_resolution::resolve`] — it reads the
//! symbol links that pass populates and reports nothing about
//! undeclared names itself (that's name resolution's job; here an
//! unresolved identifier is simply `Type::Error`, already cascaded).

use cmm_core::Position;

use crate::ast::{
    Assign, BinaryExpr, BinaryOp, Block, CallExpr, Decl, DotAccess, Expr, FnDecl, IdentExpr,
    IfElseStmt, IfStmt, Loc, Program, RepeatStmt, ReturnStmt, Stmt, UnaryExpr, UnaryOp, WhileStmt,
};
use crate::diagnostics::{DiagnosticKind, Diagnostics};

use super::symbol::{SymbolArena, SymbolId, SymbolKind};
use super::types::{Type, TypeArena};

/// Runs type checking over `program`, returning the type arena every
/// expression's `TypeId` cell now indexes into. `symbols` must come
/// from a name-resolution pass over the same `program`.
pub fn check(program: &Program, symbols: &SymbolArena, diagnostics: &mut Diagnostics) -> TypeArena {
    let mut checker = TypeChecker {
        symbols,
        types: TypeArena::new(),
        diagnostics,
        current_fn_ret: None,
    };
    for decl in &program.decls {
        checker.decl(decl);
    }
    checker.types
}

struct TypeChecker<'a> {
    symbols: &'a SymbolArena,
    types: TypeArena,
    diagnostics: &'a mut Diagnostics,
    /// The enclosing function's declared return type, while checking
    /// its body; `None` at the top level (no `return` can occur there).
    current_fn_ret: Option<Type>,
}

impl<'a> TypeChecker<'a> {
    fn decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Var(_) => {}
            Decl::Fn(f) => self.fn_decl(f),
            Decl::Struct(_) => {}
        }
    }

    fn fn_decl(&mut self, f: &FnDecl) {
        let ret_ty = f
            .sym
            .get()
            .map(|id| self.fn_return_type(id))
            .unwrap_or(Type::Error);
        let saved = self.current_fn_ret.replace(ret_ty);
        self.block(&f.body);
        self.current_fn_ret = saved;
    }

    fn fn_return_type(&self, id: SymbolId) -> Type {
        match &self.symbols.get(id).kind {
            SymbolKind::Function { ret, .. } => ret.clone(),
            _ => Type::Error,
        }
    }

    fn type_of_symbol(&self, id: SymbolId) -> Type {
        let data = self.symbols.get(id);
        match &data.kind {
            SymbolKind::Variable { ty, .. } => ty.clone(),
            SymbolKind::Function { params, ret, .. } => Type::Fn {
                params: params.clone(),
                ret: Box::new(ret.clone()),
            },
            SymbolKind::StructDef { .. } => Type::StructDef(data.name),
        }
    }

    fn block(&mut self, block: &Block) {
        for stmt in &block.stmts {
            self.stmt(stmt);
        }
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Assign(a) => {
                self.assign_type(a);
            }
            Stmt::PostInc(loc, pos) | Stmt::PostDec(loc, pos) => {
                let ty = self.loc_type(loc);
                if !ty.is_error() && ty != Type::Int {
                    self.diagnostics
                        .report(*pos, DiagnosticKind::ArithmeticNonNumeric)
                        .emit();
                }
            }
            Stmt::Read(loc) => {
                let pos = loc.position();
                let ty = self.loc_type(loc);
                self.check_read_write(&ty, pos, true);
            }
            Stmt::Write(e) => {
                let pos = e.position();
                let ty = self.expr_type(e);
                self.check_read_write(&ty, pos, false);
            }
            Stmt::If(s) => self.if_stmt(s),
            Stmt::IfElse(s) => self.if_else_stmt(s),
            Stmt::While(s) => self.while_stmt(s),
            Stmt::Repeat(s) => self.repeat_stmt(s),
            Stmt::Call(c) => {
                self.call_type(c);
            }
            Stmt::Return(r) => self.return_stmt(r),
        }
    }

    fn if_stmt(&mut self, s: &IfStmt) {
        self.check_condition(&s.cond, DiagnosticKind::NonBoolIfCondition);
        self.block(&s.body);
    }

    fn if_else_stmt(&mut self, s: &IfElseStmt) {
        self.check_condition(&s.cond, DiagnosticKind::NonBoolIfCondition);
        self.block(&s.then_body);
        self.block(&s.else_body);
    }

    fn while_stmt(&mut self, s: &WhileStmt) {
        self.check_condition(&s.cond, DiagnosticKind::NonBoolWhileCondition);
        self.block(&s.body);
    }

    fn repeat_stmt(&mut self, s: &RepeatStmt) {
        let ty = self.expr_type(&s.cond);
        if !ty.is_error() && ty != Type::Int {
            self.diagnostics
                .report(s.cond.position(), DiagnosticKind::NonIntRepeatClause)
                .emit();
        }
        self.block(&s.body);
    }

    fn check_condition(&mut self, cond: &Expr, kind: DiagnosticKind) {
        let ty = self.expr_type(cond);
        if !ty.is_error() && ty != Type::Bool {
            self.diagnostics.report(cond.position(), kind).emit();
        }
    }

    fn check_read_write(&mut self, ty: &Type, pos: Position, is_read: bool) {
        if ty.is_error() {
            return;
        }
        if ty.is_fn() {
            let kind = if is_read {
                DiagnosticKind::ReadFunction
            } else {
                DiagnosticKind::WriteFunction
            };
            self.diagnostics.report(pos, kind).emit();
        } else if ty.is_struct_def() {
            let kind = if is_read {
                DiagnosticKind::ReadStructName
            } else {
                DiagnosticKind::WriteStructName
            };
            self.diagnostics.report(pos, kind).emit();
        } else if ty.is_struct_instance() {
            let kind = if is_read {
                DiagnosticKind::ReadStructVariable
            } else {
                DiagnosticKind::WriteStructVariable
            };
            self.diagnostics.report(pos, kind).emit();
        } else if !is_read && ty.is_void() {
            self.diagnostics.report(pos, DiagnosticKind::WriteVoid).emit();
        }
    }

    fn return_stmt(&mut self, r: &ReturnStmt) {
        let fn_ret = self.current_fn_ret.clone().unwrap_or(Type::Error);
        match &r.value {
            Some(e) => {
                let ty = self.expr_type(e);
                if fn_ret.is_void() {
                    self.diagnostics
                        .report(r.pos, DiagnosticKind::ReturnValueInVoidFunction)
                        .emit();
                } else if !ty.is_error() && !fn_ret.is_error() && ty != fn_ret {
                    self.diagnostics.report(r.pos, DiagnosticKind::BadReturnValue).emit();
                }
            }
            None => {
                if !fn_ret.is_void() && !fn_ret.is_error() {
                    self.diagnostics
                        .report(Position::new(0, 0), DiagnosticKind::MissingReturnValue)
                        .emit();
                }
            }
        }
    }

    fn expr_type(&mut self, e: &Expr) -> Type {
        let ty = match e {
            Expr::Int(_) => Type::Int,
            Expr::Str(_) => Type::String,
            Expr::Bool(_) => Type::Bool,
            Expr::Ident(id) => self.ident_type(id),
            Expr::Dot(dot) => self.dot_type(dot),
            Expr::Assign(a) => self.assign_type(a),
            Expr::Call(c) => self.call_type(c),
            Expr::Unary(u) => self.unary_type(u),
            Expr::Binary(b) => self.binary_type(b),
        };
        e.set_ty(self.types.intern(ty.clone()));
        ty
    }

    fn ident_type(&mut self, id: &IdentExpr) -> Type {
        let ty = match id.sym.get() {
            Some(sym) => self.type_of_symbol(sym),
            None => Type::Error,
        };
        id.ty.set(self.types.intern(ty.clone()));
        ty
    }

    fn dot_type(&mut self, dot: &DotAccess) -> Type {
        self.expr_type(&dot.base);
        let ty = if dot.bad.get() {
            Type::Error
        } else {
            match dot.field.sym.get() {
                Some(id) => self.type_of_symbol(id),
                None => Type::Error,
            }
        };
        dot.ty.set(self.types.intern(ty.clone()));
        ty
    }

    /// Shared by `Loc` (statement-level lvalues) and `Expr::Dot`/`Expr::Ident`
    /// (the same node appearing in expression position).
    fn loc_type(&mut self, loc: &Loc) -> Type {
        match loc {
            Loc::Id(id) => self.ident_type(id),
            Loc::Dot(dot) => self.dot_type(dot),
        }
    }

    fn assign_type(&mut self, a: &Assign) -> Type {
        let lhs_ty = self.loc_type(&a.lhs);
        let rhs_ty = self.expr_type(&a.rhs);
        let ty = if lhs_ty.is_fn() && rhs_ty.is_fn() {
            self.diagnostics.report(a.pos, DiagnosticKind::FunctionAssignment).emit();
            Type::Error
        } else if lhs_ty.is_struct_def() && rhs_ty.is_struct_def() {
            self.diagnostics
                .report(a.pos, DiagnosticKind::StructNameAssignment)
                .emit();
            Type::Error
        } else if lhs_ty.is_struct_instance() && rhs_ty.is_struct_instance() {
            self.diagnostics
                .report(a.pos, DiagnosticKind::StructVariableAssignment)
                .emit();
            Type::Error
        } else if lhs_ty.is_error() || rhs_ty.is_error() {
            Type::Error
        } else if lhs_ty != rhs_ty {
            self.diagnostics.report(a.pos, DiagnosticKind::TypeMismatch).emit();
            Type::Error
        } else {
            lhs_ty
        };
        a.ty.set(self.types.intern(ty.clone()));
        ty
    }

    fn call_type(&mut self, c: &CallExpr) -> Type {
        let arg_types: Vec<Type> = c.args.iter().map(|arg| self.expr_type(arg)).collect();
        let callee_ty = self.ident_type(&c.callee);

        let (params, ret) = match &callee_ty {
            Type::Fn { params, ret } => (params.clone(), (**ret).clone()),
            Type::Error => {
                c.ty.set(self.types.intern(Type::Error));
                return Type::Error;
            }
            _ => {
                self.diagnostics
                    .report(c.callee.pos, DiagnosticKind::AttemptCallNonFunction)
                    .emit();
                c.ty.set(self.types.intern(Type::Error));
                return Type::Error;
            }
        };

        if arg_types.len() != params.len() {
            self.diagnostics
                .report(c.callee.pos, DiagnosticKind::WrongNumberOfArgs)
                .emit();
        } else {
            for ((arg_expr, actual_ty), formal_ty) in c.args.iter().zip(arg_types.iter()).zip(params.iter())
            {
                if !actual_ty.is_error() && !formal_ty.is_error() && actual_ty != formal_ty {
                    self.diagnostics
                        .report(arg_expr.position(), DiagnosticKind::ActualFormalTypeMismatch)
                        .emit();
                }
            }
        }

        c.ty.set(self.types.intern(ret.clone()));
        ret
    }

    fn unary_type(&mut self, u: &UnaryExpr) -> Type {
        let operand_ty = self.expr_type(&u.operand);
        let ty = match u.op {
            UnaryOp::Neg => {
                if !operand_ty.is_error() && operand_ty != Type::Int {
                    self.diagnostics
                        .report(u.operand.position(), DiagnosticKind::ArithmeticNonNumeric)
                        .emit();
                }
                if operand_ty.is_error() { Type::Error } else { Type::Int }
            }
            UnaryOp::Not => {
                if !operand_ty.is_error() && operand_ty != Type::Bool {
                    self.diagnostics
                        .report(u.operand.position(), DiagnosticKind::LogicalNonBool)
                        .emit();
                }
                if operand_ty.is_error() { Type::Error } else { Type::Bool }
            }
        };
        u.ty.set(self.types.intern(ty.clone()));
        ty
    }

    fn binary_type(&mut self, b: &BinaryExpr) -> Type {
        let lhs_ty = self.expr_type(&b.lhs);
        let rhs_ty = self.expr_type(&b.rhs);

        let ty = if b.op.is_arithmetic() {
            self.require(&lhs_ty, Type::Int, DiagnosticKind::ArithmeticNonNumeric, b.lhs.position());
            self.require(&rhs_ty, Type::Int, DiagnosticKind::ArithmeticNonNumeric, b.rhs.position());
            self.primitive_result(&lhs_ty, &rhs_ty, Type::Int)
        } else if b.op.is_logical() {
            self.require(&lhs_ty, Type::Bool, DiagnosticKind::LogicalNonBool, b.lhs.position());
            self.require(&rhs_ty, Type::Bool, DiagnosticKind::LogicalNonBool, b.rhs.position());
            self.primitive_result(&lhs_ty, &rhs_ty, Type::Bool)
        } else if b.op.is_relational() {
            self.require(&lhs_ty, Type::Int, DiagnosticKind::RelationalNonNumeric, b.lhs.position());
            self.require(&rhs_ty, Type::Int, DiagnosticKind::RelationalNonNumeric, b.rhs.position());
            self.primitive_result(&lhs_ty, &rhs_ty, Type::Bool)
        } else {
            debug_assert!(b.op.is_equality(), "unhandled BinaryOp in type check: {:?}", b.op);
            self.equality_type(&lhs_ty, &rhs_ty, b.pos)
        };
        b.ty.set(self.types.intern(ty.clone()));
        ty
    }

    /// Reports `kind` at `pos` when `ty` is neither `expected` nor already
    /// `error` (an `error` operand never earns a second diagnostic).
    fn require(&mut self, ty: &Type, expected: Type, kind: DiagnosticKind, pos: Position) {
        if !ty.is_error() && *ty != expected {
            self.diagnostics.report(pos, kind).emit();
        }
    }

    /// The result of an arithmetic/logical/relational operator is always
    /// its expected primitive type, even when an operand's type was
    /// wrong (that's already been diagnosed by [`Self::require`]) —
    /// `error` only cascades when an operand's type genuinely was
    /// `error` already.
    fn primitive_result(&self, lhs: &Type, rhs: &Type, result: Type) -> Type {
        if lhs.is_error() || rhs.is_error() {
            Type::Error
        } else {
            result
        }
    }

    fn equality_type(&mut self, lhs: &Type, rhs: &Type, pos: Position) -> Type {
        let is_void_fn =
            |t: &Type| matches!(t, Type::Fn { ret, .. } if ret.is_void());
        if is_void_fn(lhs) && is_void_fn(rhs) {
            self.diagnostics
                .report(pos, DiagnosticKind::EqualityVoidFunctions)
                .emit();
            return Type::Error;
        }
        if lhs.is_fn() && rhs.is_fn() {
            self.diagnostics.report(pos, DiagnosticKind::EqualityFunctions).emit();
            return Type::Error;
        }
        if lhs.is_struct_def() && rhs.is_struct_def() {
            self.diagnostics
                .report(pos, DiagnosticKind::EqualityStructNames)
                .emit();
            return Type::Error;
        }
        if lhs.is_struct_instance() && rhs.is_struct_instance() {
            self.diagnostics
                .report(pos, DiagnosticKind::EqualityStructVariables)
                .emit();
            return Type::Error;
        }
        if lhs.is_error() || rhs.is_error() {
            return Type::Error;
        }
        if lhs != rhs {
            self.diagnostics.report(pos, DiagnosticKind::TypeMismatch).emit();
            return Type::Error;
        }
        Type::Bool
    }
}

#[cfg(test)]
mod tests {
    use std::cell::Cell;

    use cmm_core::Interner;

    use super::*;
    use crate::analyze::name_resolution::resolve;
    use crate::ast::{
        BinaryExpr, BinaryOp, DeclName, FormalDecl, IdentExpr, IntLit, Program, TypeNode, VarDecl,
    };

    fn pos(line: u32) -> cmm_core::Position {
        cmm_core::Position::new(line, 1)
    }

    fn name(interner: &mut Interner, text: &str, line: u32) -> DeclName {
        DeclName::new(interner.intern(text), pos(line))
    }

    fn ident(interner: &mut Interner, text: &str, line: u32) -> IdentExpr {
        IdentExpr::new(interner.intern(text), pos(line))
    }

    /// Builds `int main() { <stmts> return 0; }` with `x`/`y` int locals
    /// already declared, runs name resolution then type check, and
    /// returns the rendered diagnostics.
    fn check_stmts(build: impl FnOnce(&mut Interner) -> Vec<Stmt>) -> Vec<String> {
        let mut interner = Interner::new();
        let main = interner.intern("main");
        let x = VarDecl::new(TypeNode::Int, name(&mut interner, "x", 2));
        let y = VarDecl::new(TypeNode::Bool, name(&mut interner, "y", 3));
        let stmts = build(&mut interner);

        let body = Block {
            decls: vec![x, y],
            stmts,
        };
        let main_decl = FnDecl {
            ret_ty: TypeNode::Int,
            name: DeclName::new(main, pos(1)),
            formals: Vec::new(),
            body,
            sym: Cell::new(None),
        };
        let program = Program {
            decls: vec![Decl::Fn(main_decl)],
        };

        let mut diagnostics = Diagnostics::new();
        let symbols = resolve(&program, main, &mut diagnostics);
        assert!(!diagnostics.has_errors(), "name resolution failed: {diagnostics:?}");
        check(&program, &symbols, &mut diagnostics);
        diagnostics
            .iter()
            .map(|d| d.to_string())
            .collect()
    }

    #[test]
    fn arithmetic_on_bool_is_flagged() {
        let diags = check_stmts(|interner| {
            vec![Stmt::Write(Expr::Binary(Box::new(BinaryExpr {
                op: BinaryOp::Add,
                lhs: Box::new(Expr::Ident(ident(interner, "y", 4))),
                rhs: Box::new(Expr::Int(IntLit {
                    value: 1,
                    pos: pos(4),
                    ty: Cell::new(crate::analyze::types::TypeId::ERROR),
                })),
                pos: pos(4),
                ty: Cell::new(crate::analyze::types::TypeId::ERROR),
            })))]
        });
        assert!(diags.iter().any(|d| d.contains("Arithmetic operator applied to non-numeric operand")));
    }

    #[test]
    fn if_condition_must_be_bool() {
        let diags = check_stmts(|interner| {
            vec![Stmt::If(IfStmt {
                cond: Expr::Ident(ident(interner, "x", 4)),
                body: Block::default(),
            })]
        });
        assert!(diags.iter().any(|d| d.contains("Non-bool expression used as an if condition")));
    }

    #[test]
    fn repeat_condition_must_be_int() {
        let diags = check_stmts(|interner| {
            vec![Stmt::Repeat(RepeatStmt {
                cond: Expr::Ident(ident(interner, "y", 4)),
                body: Block::default(),
            })]
        });
        assert!(diags.iter().any(|d| d.contains("Non-integer expression used as a repeat clause")));
    }

    #[test]
    fn post_inc_requires_int() {
        let diags = check_stmts(|interner| {
            vec![Stmt::PostInc(Loc::Id(ident(interner, "y", 4)), pos(4))]
        });
        assert!(diags.iter().any(|d| d.contains("Arithmetic operator applied to non-numeric operand")));
    }

    #[test]
    fn write_void_call_is_flagged() {
        // void f() {} ... cout << f();
        let diags = {
            let mut interner = Interner::new();
            let main = interner.intern("main");
            let f = interner.intern("f");

            let f_decl = FnDecl {
                ret_ty: TypeNode::Void,
                name: DeclName::new(f, pos(1)),
                formals: Vec::new(),
                body: Block::default(),
                sym: Cell::new(None),
            };
            let call = CallExpr {
                callee: IdentExpr::new(f, pos(3)),
                args: Vec::new(),
                pos: pos(3),
                ty: Cell::new(crate::analyze::types::TypeId::ERROR),
            };
            let main_decl = FnDecl {
                ret_ty: TypeNode::Int,
                name: DeclName::new(main, pos(2)),
                formals: Vec::new(),
                body: Block {
                    decls: Vec::new(),
                    stmts: vec![Stmt::Write(Expr::Call(Box::new(call)))],
                },
                sym: Cell::new(None),
            };
            let program = Program {
                decls: vec![Decl::Fn(f_decl), Decl::Fn(main_decl)],
            };
            let mut diagnostics = Diagnostics::new();
            let symbols = resolve(&program, main, &mut diagnostics);
            check(&program, &symbols, &mut diagnostics);
            diagnostics.iter().map(|d| d.to_string()).collect::<Vec<_>>()
        };
        assert!(diags.iter().any(|d| d.contains("Attempt to write void")));
    }

    #[test]
    fn wrong_arg_count_is_flagged() {
        let diags = {
            let mut interner = Interner::new();
            let main = interner.intern("main");
            let g = interner.intern("g");
            let a = name(&mut interner, "a", 1);

            let g_decl = FnDecl {
                ret_ty: TypeNode::Int,
                name: DeclName::new(g, pos(1)),
                formals: vec![FormalDecl::new(TypeNode::Int, a)],
                body: Block {
                    decls: Vec::new(),
                    stmts: vec![Stmt::Return(ReturnStmt {
                        value: Some(Expr::Int(IntLit {
                            value: 0,
                            pos: pos(1),
                            ty: Cell::new(crate::analyze::types::TypeId::ERROR),
                        })),
                        pos: pos(1),
                    })],
                },
                sym: Cell::new(None),
            };
            let call = CallExpr {
                callee: IdentExpr::new(g, pos(3)),
                args: Vec::new(),
                pos: pos(3),
                ty: Cell::new(crate::analyze::types::TypeId::ERROR),
            };
            let main_decl = FnDecl {
                ret_ty: TypeNode::Int,
                name: DeclName::new(main, pos(2)),
                formals: Vec::new(),
                body: Block {
                    decls: Vec::new(),
                    stmts: vec![
                        Stmt::Call(call),
                        Stmt::Return(ReturnStmt {
                            value: Some(Expr::Int(IntLit {
                                value: 0,
                                pos: pos(3),
                                ty: Cell::new(crate::analyze::types::TypeId::ERROR),
                            })),
                            pos: pos(3),
                        }),
                    ],
                },
                sym: Cell::new(None),
            };
            let program = Program {
                decls: vec![Decl::Fn(g_decl), Decl::Fn(main_decl)],
            };
            let mut diagnostics = Diagnostics::new();
            let symbols = resolve(&program, main, &mut diagnostics);
            check(&program, &symbols, &mut diagnostics);
            diagnostics.iter().map(|d| d.to_string()).collect::<Vec<_>>()
        };
        assert!(diags.iter().any(|d| d.contains("Function call with wrong number of args")));
    }

    #[test]
    fn missing_return_value_is_flagged_at_origin() {
        let diags = {
            let mut interner = Interner::new();
            let main = interner.intern("main");
            let main_decl = FnDecl {
                ret_ty: TypeNode::Int,
                name: DeclName::new(main, pos(1)),
                formals: Vec::new(),
                body: Block {
                    decls: Vec::new(),
                    stmts: vec![Stmt::Return(ReturnStmt {
                        value: None,
                        pos: pos(5),
                    })],
                },
                sym: Cell::new(None),
            };
            let program = Program {
                decls: vec![Decl::Fn(main_decl)],
            };
            let mut diagnostics = Diagnostics::new();
            let symbols = resolve(&program, main, &mut diagnostics);
            check(&program, &symbols, &mut diagnostics);
            diagnostics.iter().map(|d| d.to_string()).collect::<Vec<_>>()
        };
        assert!(diags.iter().any(|d| d.contains("error at 0:0: Missing return value")));
    }
}
