//! Name analysis (C4): populates the symbol table, links every
//! identifier use to its declaration, and assigns frame offsets.

use indexmap::IndexMap;

use cmm_core::{Position, Symbol};

use crate::ast::{
    Assign, Block, CallExpr, Decl, DotAccess, Expr, FnDecl, FormalDecl, IdentExpr, IfElseStmt,
    IfStmt, Loc, Program, RepeatStmt, Stmt, StructDecl, TypeNode, VarDecl, WhileStmt,
};
use crate::diagnostics::{DiagnosticKind, Diagnostics};

use super::scope::ScopeTable;
use super::symbol::{Offset, SymbolArena, SymbolData, SymbolKind};
use super::types::Type;

/// Runs name analysis over `program`, returning the populated symbol
/// arena. `main` is the interned `"main"` symbol, used only to check
/// that the program defines an entry point.
pub fn resolve(program: &Program, main: Symbol, diagnostics: &mut Diagnostics) -> SymbolArena {
    let mut resolver = Resolver {
        diagnostics,
        symbols: SymbolArena::new(),
        scopes: ScopeTable::new(),
        offset_cursor: None,
        main,
    };
    resolver.scopes.add_scope();
    for decl in &program.decls {
        resolver.decl(decl);
    }
    resolver.check_main();
    resolver
        .scopes
        .remove_scope()
        .expect("global scope opened at the top of resolve() must still be open");
    resolver.symbols
}

struct Resolver<'a> {
    diagnostics: &'a mut Diagnostics,
    symbols: SymbolArena,
    scopes: ScopeTable,
    /// `Some(cursor)` while inside a function body, `None` at global
    /// scope. Starts at `-8`, decremented by 4 per declared local.
    offset_cursor: Option<i32>,
    main: Symbol,
}

impl<'a> Resolver<'a> {
    fn check_main(&mut self) {
        let is_main_fn = self
            .scopes
            .lookup_global(self.main)
            .is_some_and(|id| matches!(self.symbols.get(id).kind, SymbolKind::Function { .. }));
        if !is_main_fn {
            self.diagnostics
                .report(Position::new(0, 0), DiagnosticKind::NoMainFunction)
                .emit();
        }
    }

    fn decl(&mut self, decl: &Decl) {
        match decl {
            Decl::Var(v) => {
                self.var_decl(v);
            }
            Decl::Fn(f) => self.fn_decl(f),
            Decl::Struct(s) => self.struct_decl(s),
        }
    }

    /// Resolve a `TypeNode` to a semantic `Type`, reporting "Invalid
    /// name of struct type" and returning `None` if a `struct S`
    /// reference doesn't name a declared struct.
    fn resolve_type(&mut self, ty: &TypeNode) -> Option<Type> {
        match ty {
            TypeNode::Int => Some(Type::Int),
            TypeNode::Bool => Some(Type::Bool),
            TypeNode::Void => Some(Type::Void),
            TypeNode::Struct(tag) => {
                let is_struct_def = self
                    .scopes
                    .lookup_global(tag.text)
                    .is_some_and(|id| matches!(self.symbols.get(id).kind, SymbolKind::StructDef { .. }));
                if is_struct_def {
                    Some(Type::StructInstance(tag.text))
                } else {
                    self.diagnostics
                        .report(tag.pos, DiagnosticKind::InvalidNameOfStructType)
                        .emit();
                    None
                }
            }
        }
    }

    fn next_offset(&mut self) -> Offset {
        match &mut self.offset_cursor {
            None => Offset::Global,
            Some(cursor) => {
                let offset = Offset::Frame(*cursor);
                *cursor -= 4;
                offset
            }
        }
    }

    fn var_decl(&mut self, v: &VarDecl) {
        if matches!(v.ty, TypeNode::Void) {
            self.diagnostics
                .report(v.name.pos, DiagnosticKind::NonFunctionDeclaredVoid)
                .emit();
            return;
        }
        let Some(ty) = self.resolve_type(&v.ty) else {
            return;
        };
        if self.scopes.lookup_local(v.name.text).is_some() {
            self.diagnostics
                .report(v.name.pos, DiagnosticKind::MultiplyDeclaredIdentifier)
                .emit();
            return;
        }
        let offset = self.next_offset();
        let id = self.symbols.alloc(SymbolData {
            name: v.name.text,
            kind: SymbolKind::Variable { ty, offset },
        });
        self.scopes
            .add_decl(v.name.text, id)
            .expect("lookup_local just confirmed this name is free");
        v.sym.set(Some(id));
    }

    fn formal_decl(&mut self, formal: &FormalDecl, param_offset: &mut i32) {
        // Position in the calling convention is fixed by declaration
        // order regardless of whether the formal itself is well formed,
        // so the slot is reserved before any error can short-circuit it.
        let offset = Offset::Frame(*param_offset);
        *param_offset += 4;

        if matches!(formal.ty, TypeNode::Void) {
            self.diagnostics
                .report(formal.name.pos, DiagnosticKind::NonFunctionDeclaredVoid)
                .emit();
            return;
        }
        let Some(ty) = self.resolve_type(&formal.ty) else {
            return;
        };
        if self.scopes.lookup_local(formal.name.text).is_some() {
            self.diagnostics
                .report(formal.name.pos, DiagnosticKind::MultiplyDeclaredIdentifier)
                .emit();
            return;
        }
        let id = self.symbols.alloc(SymbolData {
            name: formal.name.text,
            kind: SymbolKind::Variable { ty, offset },
        });
        self.scopes
            .add_decl(formal.name.text, id)
            .expect("lookup_local just confirmed this name is free");
        formal.sym.set(Some(id));
    }

    fn fn_decl(&mut self, f: &FnDecl) {
        let ret_ty = self.resolve_type(&f.ret_ty).unwrap_or(Type::Error);
        let duplicate = self.scopes.lookup_local(f.name.text).is_some();
        if duplicate {
            self.diagnostics
                .report(f.name.pos, DiagnosticKind::MultiplyDeclaredIdentifier)
                .emit();
        }

        let param_types: Vec<Type> = f
            .formals
            .iter()
            .map(|formal| {
                if matches!(formal.ty, TypeNode::Void) {
                    Type::Error
                } else {
                    self.resolve_type_quietly(&formal.ty)
                }
            })
            .collect();

        let fn_id = if duplicate {
            None
        } else {
            let id = self.symbols.alloc(SymbolData {
                name: f.name.text,
                kind: SymbolKind::Function {
                    params: param_types,
                    ret: ret_ty,
                    size_locals: 0,
                    size_params: (f.formals.len() as i32) * 4,
                },
            });
            self.scopes
                .add_decl(f.name.text, id)
                .expect("lookup_local just confirmed this name is free");
            f.sym.set(Some(id));
            Some(id)
        };

        // A scope is opened for the body even on a duplicate
        // declaration, so the rest of the program is still analyzed.
        self.scopes.add_scope();
        let mut param_offset = 4;
        for formal in &f.formals {
            self.formal_decl(formal, &mut param_offset);
        }

        let saved_cursor = self.offset_cursor.replace(-8);
        for decl in &f.body.decls {
            self.var_decl(decl);
        }
        for stmt in &f.body.stmts {
            self.stmt(stmt);
        }
        let final_cursor = self
            .offset_cursor
            .take()
            .expect("just set to Some(-8) above");
        self.offset_cursor = saved_cursor;

        self.scopes
            .remove_scope()
            .expect("scope opened for this function body is still open");

        if let Some(id) = fn_id {
            if let SymbolKind::Function { size_locals, .. } = &mut self.symbols.get_mut(id).kind {
                *size_locals = -(final_cursor + 8);
            }
        }
    }

    /// Resolves a formal's type for the purpose of building the
    /// function symbol's parameter-type list, without re-reporting
    /// "Invalid name of struct type" (the per-formal pass below already
    /// reports it once).
    fn resolve_type_quietly(&self, ty: &TypeNode) -> Type {
        match ty {
            TypeNode::Int => Type::Int,
            TypeNode::Bool => Type::Bool,
            TypeNode::Void => Type::Void,
            TypeNode::Struct(tag) => {
                let is_struct_def = self
                    .scopes
                    .lookup_global(tag.text)
                    .is_some_and(|id| matches!(self.symbols.get(id).kind, SymbolKind::StructDef { .. }));
                if is_struct_def {
                    Type::StructInstance(tag.text)
                } else {
                    Type::Error
                }
            }
        }
    }

    fn struct_decl(&mut self, s: &StructDecl) {
        if self.scopes.lookup_local(s.name.text).is_some() {
            self.diagnostics
                .report(s.name.pos, DiagnosticKind::MultiplyDeclaredIdentifier)
                .emit();
            return;
        }

        self.scopes.add_scope();
        let mut fields = IndexMap::new();
        let mut field_index: i32 = 0;
        for field in &s.fields {
            if matches!(field.ty, TypeNode::Void) {
                self.diagnostics
                    .report(field.name.pos, DiagnosticKind::NonFunctionDeclaredVoid)
                    .emit();
                continue;
            }
            let Some(ty) = self.resolve_type(&field.ty) else {
                continue;
            };
            if self.scopes.lookup_local(field.name.text).is_some() {
                self.diagnostics
                    .report(field.name.pos, DiagnosticKind::MultiplyDeclaredIdentifier)
                    .emit();
                continue;
            }
            let id = self.symbols.alloc(SymbolData {
                name: field.name.text,
                kind: SymbolKind::Variable {
                    ty,
                    offset: Offset::Field(field_index * 4),
                },
            });
            field_index += 1;
            self.scopes
                .add_decl(field.name.text, id)
                .expect("lookup_local just confirmed this name is free");
            field.sym.set(Some(id));
            fields.insert(field.name.text, id);
        }
        self.scopes
            .remove_scope()
            .expect("scope opened for this struct body is still open");

        let def_id = self.symbols.alloc(SymbolData {
            name: s.name.text,
            kind: SymbolKind::StructDef { fields },
        });
        self.scopes
            .add_decl(s.name.text, def_id)
            .expect("lookup_local just confirmed this name is free");
        s.sym.set(Some(def_id));
    }

    fn block(&mut self, block: &Block) {
        self.scopes.add_scope();
        for decl in &block.decls {
            self.var_decl(decl);
        }
        for stmt in &block.stmts {
            self.stmt(stmt);
        }
        self.scopes
            .remove_scope()
            .expect("scope just opened for this block is still open");
    }

    fn if_stmt(&mut self, s: &IfStmt) {
        self.expr(&s.cond);
        self.block(&s.body);
    }

    fn if_else_stmt(&mut self, s: &IfElseStmt) {
        self.expr(&s.cond);
        let saved = self.offset_cursor;
        self.block(&s.then_body);
        let then_final = self.offset_cursor;
        self.offset_cursor = saved;
        self.block(&s.else_body);
        let else_final = self.offset_cursor;
        self.offset_cursor = match (then_final, else_final) {
            (Some(a), Some(b)) => Some(a.min(b)),
            (a, b) => a.or(b),
        };
    }

    fn while_stmt(&mut self, s: &WhileStmt) {
        self.expr(&s.cond);
        self.block(&s.body);
    }

    fn repeat_stmt(&mut self, s: &RepeatStmt) {
        self.expr(&s.cond);
        self.block(&s.body);
    }

    fn stmt(&mut self, stmt: &Stmt) {
        match stmt {
            Stmt::Assign(a) => self.assign(a),
            Stmt::PostInc(loc, _) | Stmt::PostDec(loc, _) => self.loc(loc),
            Stmt::Read(loc) => self.loc(loc),
            Stmt::Write(e) => self.expr(e),
            Stmt::If(s) => self.if_stmt(s),
            Stmt::IfElse(s) => self.if_else_stmt(s),
            Stmt::While(s) => self.while_stmt(s),
            Stmt::Repeat(s) => self.repeat_stmt(s),
            Stmt::Call(c) => self.call(c),
            Stmt::Return(r) => {
                if let Some(e) = &r.value {
                    self.expr(e);
                }
            }
        }
    }

    fn expr(&mut self, e: &Expr) {
        match e {
            Expr::Int(_) | Expr::Str(_) | Expr::Bool(_) => {}
            Expr::Ident(id) => self.ident(id),
            Expr::Dot(dot) => self.dot_access(dot),
            Expr::Assign(a) => self.assign(a),
            Expr::Call(c) => self.call(c),
            Expr::Unary(u) => self.expr(&u.operand),
            Expr::Binary(b) => {
                self.expr(&b.lhs);
                self.expr(&b.rhs);
            }
        }
    }

    fn ident(&mut self, id: &IdentExpr) {
        match self.scopes.lookup_global(id.name) {
            Some(sym) => id.sym.set(Some(sym)),
            None => {
                self.diagnostics
                    .report(id.pos, DiagnosticKind::UndeclaredIdentifier)
                    .emit();
            }
        }
    }

    fn loc(&mut self, loc: &Loc) {
        match loc {
            Loc::Id(id) => self.ident(id),
            Loc::Dot(dot) => self.dot_access(dot),
        }
    }

    fn dot_access(&mut self, dot: &DotAccess) {
        self.expr(&dot.base);
        let Some(def_id) = self.struct_def_of(&dot.base) else {
            self.diagnostics
                .report(dot.base.position(), DiagnosticKind::DotAccessOfNonStruct)
                .emit();
            dot.bad.set(true);
            return;
        };
        let field_id = match &self.symbols.get(def_id).kind {
            SymbolKind::StructDef { fields } => fields.get(&dot.field.name).copied(),
            _ => None,
        };
        match field_id {
            Some(id) => dot.field.sym.set(Some(id)),
            None => {
                self.diagnostics
                    .report(dot.field.pos, DiagnosticKind::InvalidStructFieldName)
                    .emit();
                dot.bad.set(true);
            }
        }
    }

    /// The struct-def symbol that `base` (already name-resolved) is an
    /// instance of, or `None` if it isn't a struct instance (including
    /// a `loc` already marked `bad`, to suppress cascading errors).
    fn struct_def_of(&self, base: &Expr) -> Option<super::symbol::SymbolId> {
        let sym_id = match base {
            Expr::Ident(id) => id.sym.get()?,
            Expr::Dot(dot) => {
                if dot.bad.get() {
                    return None;
                }
                dot.field.sym.get()?
            }
            _ => return None,
        };
        match &self.symbols.get(sym_id).kind {
            SymbolKind::Variable {
                ty: Type::StructInstance(tag),
                ..
            } => self.scopes.lookup_global(*tag),
            _ => None,
        }
    }

    fn assign(&mut self, a: &Assign) {
        self.loc(&a.lhs);
        self.expr(&a.rhs);
    }

    fn call(&mut self, c: &CallExpr) {
        self.ident(&c.callee);
        for arg in &c.args {
            self.expr(arg);
        }
    }
}
