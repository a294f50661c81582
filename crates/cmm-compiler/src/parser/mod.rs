//! Hand-written recursive-descent parser.
//!
//! Builds an [`ast::Program`] directly from a flat token stream (no
//! separate CST/pretty-printer layer). Errors are recovered from by
//! resynchronizing to the next safe boundary — a `;`/`}` at statement
//! level, the next type keyword at declaration level — so one syntax
//! mistake doesn't cascade into unrelated diagnostics for the rest of
//! the file.

use std::cell::Cell;

use crate::analyze::types::TypeId;
use crate::ast::{
    Assign, BinaryExpr, BinaryOp, Block, BoolLit, CallExpr, Decl, DeclName, DotAccess, Expr,
    FnDecl, FormalDecl, IdentExpr, IfElseStmt, IfStmt, IntLit, Loc, Program, RepeatStmt,
    ReturnStmt, Stmt, StrLit, StructDecl, TypeNode, UnaryExpr, UnaryOp, VarDecl, WhileStmt,
};
use crate::diagnostics::Diagnostics;
use crate::lexer::{LocatedToken, TokenKind};

/// Recursion guard for nested blocks (`if` inside `if` inside …) and
/// parenthesized expressions, so a pathological input fails with a
/// diagnostic instead of overflowing the stack.
const MAX_DEPTH: u32 = 512;

/// Parses a complete token stream (as produced by [`crate::lexer::lex`])
/// into a [`Program`], reporting syntax errors into `diagnostics`. The
/// result is always a best-effort `Program`; callers should check
/// `diagnostics.has_errors()` before trusting it for further passes.
pub fn parse(tokens: &[LocatedToken], diagnostics: &mut Diagnostics) -> Program {
    let mut parser = Parser {
        tokens,
        pos: 0,
        diagnostics,
        depth: 0,
    };
    let mut decls = Vec::new();
    while !parser.at_eof() {
        match parser.decl() {
            Some(d) => decls.push(d),
            None => parser.resync_to_decl_boundary(),
        }
    }
    Program { decls }
}

struct Parser<'a> {
    tokens: &'a [LocatedToken],
    pos: usize,
    diagnostics: &'a mut Diagnostics,
    depth: u32,
}

impl<'a> Parser<'a> {
    fn current_kind(&self) -> TokenKind {
        self.tokens[self.pos].kind
    }

    fn current_pos(&self) -> cmm_core::Position {
        self.tokens[self.pos].pos
    }

    fn peek_kind(&self, offset: usize) -> Option<TokenKind> {
        self.tokens.get(self.pos + offset).map(|t| t.kind)
    }

    fn at_eof(&self) -> bool {
        matches!(self.current_kind(), TokenKind::Eof)
    }

    fn advance(&mut self) {
        if !self.at_eof() {
            self.pos += 1;
        }
    }

    /// Consumes `kind` if it's current; otherwise reports and recovers
    /// by bumping past whatever actually is there.
    fn expect(&mut self, kind: TokenKind) -> bool {
        if self.current_kind() == kind {
            self.advance();
            true
        } else {
            self.error_and_bump(format!("expected {kind:?}, found {:?}", self.current_kind()));
            false
        }
    }

    fn error_and_bump(&mut self, message: impl Into<String>) {
        self.diagnostics.error(self.current_pos(), message).emit();
        self.advance();
    }

    fn enter_recursion(&mut self) -> bool {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            self.diagnostics
                .error(self.current_pos(), "expression or block nested too deeply")
                .emit();
            false
        } else {
            true
        }
    }

    fn exit_recursion(&mut self) {
        self.depth -= 1;
    }

    fn resync_to_decl_boundary(&mut self) {
        while !self.at_eof()
            && !matches!(
                self.current_kind(),
                TokenKind::Int | TokenKind::Bool | TokenKind::Void | TokenKind::Struct
            )
        {
            self.advance();
        }
    }

    fn resync_to_stmt_boundary(&mut self) {
        while !self.at_eof() && !matches!(self.current_kind(), TokenKind::Semicolon | TokenKind::RCurly) {
            self.advance();
        }
        if matches!(self.current_kind(), TokenKind::Semicolon) {
            self.advance();
        }
    }

    // --- Declarations --------------------------------------------------

    fn decl(&mut self) -> Option<Decl> {
        if matches!(self.current_kind(), TokenKind::Struct) && self.peek_is_struct_decl() {
            return self.struct_decl().map(Decl::Struct);
        }
        let ty = self.type_node()?;
        let name = self.decl_name()?;
        if matches!(self.current_kind(), TokenKind::LParen) {
            self.fn_decl(ty, name).map(Decl::Fn)
        } else {
            self.var_decl_tail(ty, name).map(Decl::Var)
        }
    }

    fn peek_is_struct_decl(&self) -> bool {
        matches!(self.peek_kind(1), Some(TokenKind::Ident(_))) && matches!(self.peek_kind(2), Some(TokenKind::LCurly))
    }

    fn type_node(&mut self) -> Option<TypeNode> {
        match self.current_kind() {
            TokenKind::Int => {
                self.advance();
                Some(TypeNode::Int)
            }
            TokenKind::Bool => {
                self.advance();
                Some(TypeNode::Bool)
            }
            TokenKind::Void => {
                self.advance();
                Some(TypeNode::Void)
            }
            TokenKind::Struct => {
                self.advance();
                let tag = self.decl_name()?;
                Some(TypeNode::Struct(tag))
            }
            _ => {
                self.error_and_bump("expected a type");
                None
            }
        }
    }

    fn decl_name(&mut self) -> Option<DeclName> {
        match self.current_kind() {
            TokenKind::Ident(sym) => {
                let pos = self.current_pos();
                self.advance();
                Some(DeclName::new(sym, pos))
            }
            _ => {
                self.error_and_bump("expected an identifier");
                None
            }
        }
    }

    fn ident_expr(&mut self) -> Option<IdentExpr> {
        self.decl_name().map(IdentExpr::from)
    }

    fn var_decl_tail(&mut self, ty: TypeNode, name: DeclName) -> Option<VarDecl> {
        self.expect(TokenKind::Semicolon);
        Some(VarDecl::new(ty, name))
    }

    fn formals(&mut self) -> Vec<FormalDecl> {
        self.expect(TokenKind::LParen);
        let mut formals = Vec::new();
        if !matches!(self.current_kind(), TokenKind::RParen) {
            loop {
                let ty = self.type_node();
                let name = self.decl_name();
                if let (Some(ty), Some(name)) = (ty, name) {
                    formals.push(FormalDecl::new(ty, name));
                }
                if matches!(self.current_kind(), TokenKind::Comma) {
                    self.advance();
                    continue;
                }
                break;
            }
        }
        self.expect(TokenKind::RParen);
        formals
    }

    fn fn_decl(&mut self, ret_ty: TypeNode, name: DeclName) -> Option<FnDecl> {
        let formals = self.formals();
        let body = self.block();
        Some(FnDecl {
            ret_ty,
            name,
            formals,
            body,
            sym: Cell::new(None),
        })
    }

    fn struct_decl(&mut self) -> Option<StructDecl> {
        self.expect(TokenKind::Struct);
        let name = self.decl_name()?;
        self.expect(TokenKind::LCurly);
        let mut fields = Vec::new();
        while !matches!(self.current_kind(), TokenKind::RCurly) && !self.at_eof() {
            let ty = self.type_node();
            let field_name = self.decl_name();
            self.expect(TokenKind::Semicolon);
            if let (Some(ty), Some(field_name)) = (ty, field_name) {
                fields.push(VarDecl::new(ty, field_name));
            }
        }
        self.expect(TokenKind::RCurly);
        self.expect(TokenKind::Semicolon);
        Some(StructDecl {
            name,
            fields,
            sym: Cell::new(None),
        })
    }

    // --- Blocks and statements ------------------------------------------

    fn block(&mut self) -> Block {
        if !self.enter_recursion() {
            return Block::default();
        }
        self.expect(TokenKind::LCurly);

        let mut decls = Vec::new();
        while matches!(
            self.current_kind(),
            TokenKind::Int | TokenKind::Bool | TokenKind::Void | TokenKind::Struct
        ) {
            let ty = self.type_node();
            let name = self.decl_name();
            self.expect(TokenKind::Semicolon);
            if let (Some(ty), Some(name)) = (ty, name) {
                decls.push(VarDecl::new(ty, name));
            }
        }

        let mut stmts = Vec::new();
        while !matches!(self.current_kind(), TokenKind::RCurly) && !self.at_eof() {
            match self.stmt() {
                Some(s) => stmts.push(s),
                None => self.resync_to_stmt_boundary(),
            }
        }
        self.expect(TokenKind::RCurly);

        self.exit_recursion();
        Block { decls, stmts }
    }

    fn stmt(&mut self) -> Option<Stmt> {
        match self.current_kind() {
            TokenKind::Cin => self.read_stmt(),
            TokenKind::Cout => self.write_stmt(),
            TokenKind::If => self.if_stmt(),
            TokenKind::While => self.while_stmt(),
            TokenKind::Repeat => self.repeat_stmt(),
            TokenKind::Return => self.return_stmt(),
            TokenKind::Ident(_) => self.ident_led_stmt(),
            _ => {
                self.error_and_bump("expected a statement");
                None
            }
        }
    }

    fn read_stmt(&mut self) -> Option<Stmt> {
        self.expect(TokenKind::Cin);
        self.expect(TokenKind::Read);
        let loc = self.loc()?;
        self.expect(TokenKind::Semicolon);
        Some(Stmt::Read(loc))
    }

    fn write_stmt(&mut self) -> Option<Stmt> {
        self.expect(TokenKind::Cout);
        self.expect(TokenKind::Write);
        let value = self.expr()?;
        self.expect(TokenKind::Semicolon);
        Some(Stmt::Write(value))
    }

    fn if_stmt(&mut self) -> Option<Stmt> {
        self.expect(TokenKind::If);
        self.expect(TokenKind::LParen);
        let cond = self.expr()?;
        self.expect(TokenKind::RParen);
        let body = self.block();
        if matches!(self.current_kind(), TokenKind::Else) {
            self.advance();
            let else_body = self.block();
            Some(Stmt::IfElse(IfElseStmt {
                cond,
                then_body: body,
                else_body,
            }))
        } else {
            Some(Stmt::If(IfStmt { cond, body }))
        }
    }

    fn while_stmt(&mut self) -> Option<Stmt> {
        self.expect(TokenKind::While);
        self.expect(TokenKind::LParen);
        let cond = self.expr()?;
        self.expect(TokenKind::RParen);
        let body = self.block();
        Some(Stmt::While(WhileStmt { cond, body }))
    }

    fn repeat_stmt(&mut self) -> Option<Stmt> {
        self.expect(TokenKind::Repeat);
        self.expect(TokenKind::LParen);
        let cond = self.expr()?;
        self.expect(TokenKind::RParen);
        let body = self.block();
        Some(Stmt::Repeat(RepeatStmt { cond, body }))
    }

    fn return_stmt(&mut self) -> Option<Stmt> {
        let pos = self.current_pos();
        self.expect(TokenKind::Return);
        if matches!(self.current_kind(), TokenKind::Semicolon) {
            self.advance();
            return Some(Stmt::Return(ReturnStmt { value: None, pos }));
        }
        let value = self.expr()?;
        self.expect(TokenKind::Semicolon);
        Some(Stmt::Return(ReturnStmt {
            value: Some(value),
            pos,
        }))
    }

    /// Dispatches the statement forms that start with an identifier:
    /// a call statement (`f(...)`), or an lvalue followed by `=`, `++`,
    /// or `--`.
    fn ident_led_stmt(&mut self) -> Option<Stmt> {
        if matches!(self.peek_kind(1), Some(TokenKind::LParen)) {
            let call = self.call_expr()?;
            self.expect(TokenKind::Semicolon);
            return Some(Stmt::Call(call));
        }

        let loc = self.loc()?;
        match self.current_kind() {
            TokenKind::Assign => {
                let pos = loc.position();
                self.advance();
                let rhs = self.expr()?;
                self.expect(TokenKind::Semicolon);
                Some(Stmt::Assign(Assign {
                    lhs: loc,
                    rhs,
                    pos,
                    ty: Cell::new(TypeId::ERROR),
                }))
            }
            TokenKind::PlusPlus => {
                let pos = self.current_pos();
                self.advance();
                self.expect(TokenKind::Semicolon);
                Some(Stmt::PostInc(loc, pos))
            }
            TokenKind::MinusMinus => {
                let pos = self.current_pos();
                self.advance();
                self.expect(TokenKind::Semicolon);
                Some(Stmt::PostDec(loc, pos))
            }
            _ => {
                self.error_and_bump("expected '=', '++', or '--'");
                None
            }
        }
    }

    /// An identifier, optionally followed by one or more `.field`
    /// accesses.
    fn loc(&mut self) -> Option<Loc> {
        let first = self.ident_expr()?;
        let mut result = Loc::Id(first);
        while matches!(self.current_kind(), TokenKind::Dot) {
            self.advance();
            let field = self.ident_expr()?;
            let base = loc_to_expr(result);
            result = Loc::Dot(Box::new(DotAccess {
                base,
                field,
                bad: Cell::new(false),
                ty: Cell::new(TypeId::ERROR),
            }));
        }
        Some(result)
    }

    fn call_expr(&mut self) -> Option<CallExpr> {
        let callee = self.ident_expr()?;
        let pos = callee.pos;
        self.expect(TokenKind::LParen);
        let mut args = Vec::new();
        if !matches!(self.current_kind(), TokenKind::RParen) {
            loop {
                args.push(self.expr()?);
                if matches!(self.current_kind(), TokenKind::Comma) {
                    self.advance();
                    continue;
                }
                break;
            }
        }
        self.expect(TokenKind::RParen);
        Some(CallExpr {
            callee,
            args,
            pos,
            ty: Cell::new(TypeId::ERROR),
        })
    }

    // --- Expressions, by ascending precedence ---------------------------
    //
    // expr (assignment) -> or -> and -> equality -> relational -> additive
    // -> multiplicative -> unary -> postfix (dot-chain) -> primary

    fn expr(&mut self) -> Option<Expr> {
        let lhs = self.or_expr()?;
        if matches!(self.current_kind(), TokenKind::Assign) {
            let pos = lhs.position();
            let Some(loc) = lhs.as_loc() else {
                self.diagnostics
                    .error(pos, "left side of an assignment must be a variable or field")
                    .emit();
                self.advance();
                return self.expr();
            };
            self.advance();
            let rhs = self.expr()?;
            return Some(Expr::Assign(Box::new(Assign {
                lhs: loc,
                rhs,
                pos,
                ty: Cell::new(TypeId::ERROR),
            })));
        }
        Some(lhs)
    }

    fn or_expr(&mut self) -> Option<Expr> {
        let mut lhs = self.and_expr()?;
        while matches!(self.current_kind(), TokenKind::Or) {
            let pos = self.current_pos();
            self.advance();
            let rhs = self.and_expr()?;
            lhs = binary(BinaryOp::Or, lhs, rhs, pos);
        }
        Some(lhs)
    }

    fn and_expr(&mut self) -> Option<Expr> {
        let mut lhs = self.equality_expr()?;
        while matches!(self.current_kind(), TokenKind::And) {
            let pos = self.current_pos();
            self.advance();
            let rhs = self.equality_expr()?;
            lhs = binary(BinaryOp::And, lhs, rhs, pos);
        }
        Some(lhs)
    }

    fn equality_expr(&mut self) -> Option<Expr> {
        let mut lhs = self.relational_expr()?;
        loop {
            let op = match self.current_kind() {
                TokenKind::Equals => BinaryOp::Eq,
                TokenKind::NotEquals => BinaryOp::Neq,
                _ => break,
            };
            let pos = self.current_pos();
            self.advance();
            let rhs = self.relational_expr()?;
            lhs = binary(op, lhs, rhs, pos);
        }
        Some(lhs)
    }

    fn relational_expr(&mut self) -> Option<Expr> {
        let mut lhs = self.additive_expr()?;
        loop {
            let op = match self.current_kind() {
                TokenKind::Less => BinaryOp::Lt,
                TokenKind::Greater => BinaryOp::Gt,
                TokenKind::LessEq => BinaryOp::Le,
                TokenKind::GreaterEq => BinaryOp::Ge,
                _ => break,
            };
            let pos = self.current_pos();
            self.advance();
            let rhs = self.additive_expr()?;
            lhs = binary(op, lhs, rhs, pos);
        }
        Some(lhs)
    }

    fn additive_expr(&mut self) -> Option<Expr> {
        let mut lhs = self.multiplicative_expr()?;
        loop {
            let op = match self.current_kind() {
                TokenKind::Plus => BinaryOp::Add,
                TokenKind::Minus => BinaryOp::Sub,
                _ => break,
            };
            let pos = self.current_pos();
            self.advance();
            let rhs = self.multiplicative_expr()?;
            lhs = binary(op, lhs, rhs, pos);
        }
        Some(lhs)
    }

    fn multiplicative_expr(&mut self) -> Option<Expr> {
        let mut lhs = self.unary_expr()?;
        loop {
            let op = match self.current_kind() {
                TokenKind::Times => BinaryOp::Mul,
                TokenKind::Divide => BinaryOp::Div,
                _ => break,
            };
            let pos = self.current_pos();
            self.advance();
            let rhs = self.unary_expr()?;
            lhs = binary(op, lhs, rhs, pos);
        }
        Some(lhs)
    }

    fn unary_expr(&mut self) -> Option<Expr> {
        match self.current_kind() {
            TokenKind::Not => {
                let pos = self.current_pos();
                self.advance();
                let operand = self.unary_expr()?;
                Some(unary(UnaryOp::Not, operand, pos))
            }
            TokenKind::Minus => {
                let pos = self.current_pos();
                self.advance();
                let operand = self.unary_expr()?;
                Some(unary(UnaryOp::Neg, operand, pos))
            }
            _ => self.postfix_expr(),
        }
    }

    fn postfix_expr(&mut self) -> Option<Expr> {
        let mut e = self.primary_expr()?;
        while matches!(self.current_kind(), TokenKind::Dot) {
            self.advance();
            let field = self.ident_expr()?;
            e = Expr::Dot(Box::new(DotAccess {
                base: e,
                field,
                bad: Cell::new(false),
                ty: Cell::new(TypeId::ERROR),
            }));
        }
        Some(e)
    }

    fn primary_expr(&mut self) -> Option<Expr> {
        match self.current_kind() {
            TokenKind::IntLiteral(value) => {
                let pos = self.current_pos();
                self.advance();
                Some(Expr::Int(IntLit {
                    value,
                    pos,
                    ty: Cell::new(TypeId::ERROR),
                }))
            }
            TokenKind::StringLiteral(value) => {
                let pos = self.current_pos();
                self.advance();
                Some(Expr::Str(StrLit {
                    value,
                    pos,
                    ty: Cell::new(TypeId::ERROR),
                }))
            }
            TokenKind::True => {
                let pos = self.current_pos();
                self.advance();
                Some(Expr::Bool(BoolLit {
                    value: true,
                    pos,
                    ty: Cell::new(TypeId::ERROR),
                }))
            }
            TokenKind::False => {
                let pos = self.current_pos();
                self.advance();
                Some(Expr::Bool(BoolLit {
                    value: false,
                    pos,
                    ty: Cell::new(TypeId::ERROR),
                }))
            }
            TokenKind::Ident(_) => {
                if matches!(self.peek_kind(1), Some(TokenKind::LParen)) {
                    self.call_expr().map(|c| Expr::Call(Box::new(c)))
                } else {
                    self.ident_expr().map(Expr::Ident)
                }
            }
            TokenKind::LParen => {
                if !self.enter_recursion() {
                    self.advance();
                    return None;
                }
                self.advance();
                let inner = self.expr();
                self.expect(TokenKind::RParen);
                self.exit_recursion();
                inner
            }
            _ => {
                self.error_and_bump("expected an expression");
                None
            }
        }
    }
}

fn loc_to_expr(loc: Loc) -> Expr {
    match loc {
        Loc::Id(id) => Expr::Ident(id),
        Loc::Dot(dot) => Expr::Dot(dot),
    }
}

fn binary(op: BinaryOp, lhs: Expr, rhs: Expr, pos: cmm_core::Position) -> Expr {
    Expr::Binary(Box::new(BinaryExpr {
        op,
        lhs: Box::new(lhs),
        rhs: Box::new(rhs),
        pos,
        ty: Cell::new(TypeId::ERROR),
    }))
}

fn unary(op: UnaryOp, operand: Expr, pos: cmm_core::Position) -> Expr {
    Expr::Unary(Box::new(UnaryExpr {
        op,
        operand: Box::new(operand),
        pos,
        ty: Cell::new(TypeId::ERROR),
    }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use cmm_core::Interner;

    fn parse_source(source: &str) -> (Program, Diagnostics) {
        let mut interner = Interner::new();
        let mut diagnostics = Diagnostics::new();
        let tokens = crate::lexer::lex(source, &mut interner, &mut diagnostics);
        let program = parse(&tokens, &mut diagnostics);
        (program, diagnostics)
    }

    #[test]
    fn parses_minimal_main() {
        let (program, diagnostics) =
            parse_source(r#"int main() { cout << "hi"; return 0; }"#);
        assert!(!diagnostics.has_errors(), "{diagnostics:?}");
        assert_eq!(program.decls.len(), 1);
        let Decl::Fn(main) = &program.decls[0] else {
            panic!("expected a function decl");
        };
        assert_eq!(main.body.stmts.len(), 2);
    }

    #[test]
    fn parses_struct_decl_and_instance() {
        let (program, diagnostics) = parse_source(
            "struct P { int x; int y; };\nint main() { struct P p; p.x = 1; return 0; }",
        );
        assert!(!diagnostics.has_errors(), "{diagnostics:?}");
        assert_eq!(program.decls.len(), 2);
        assert!(matches!(program.decls[0], Decl::Struct(_)));
    }

    #[test]
    fn parses_if_else_while_repeat() {
        let (program, diagnostics) = parse_source(
            "int main() { int x; if (x < 1) { x++; } else { x--; } while (x > 0) { x = x - 1; } repeat (x) { cout << x; } return 0; }",
        );
        assert!(!diagnostics.has_errors(), "{diagnostics:?}");
        let Decl::Fn(main) = &program.decls[0] else {
            panic!("expected a function decl");
        };
        assert_eq!(main.body.stmts.len(), 4);
    }

    #[test]
    fn assignment_is_right_associative() {
        let (program, diagnostics) =
            parse_source("int main() { int x; int y; x = y = 3; return 0; }");
        assert!(!diagnostics.has_errors(), "{diagnostics:?}");
        let Decl::Fn(main) = &program.decls[0] else {
            panic!("expected a function decl");
        };
        let Stmt::Assign(outer) = &main.body.stmts[0] else {
            panic!("expected an assignment statement");
        };
        assert!(matches!(outer.rhs, Expr::Assign(_)));
    }

    #[test]
    fn call_statement_and_call_expression() {
        let (program, diagnostics) = parse_source(
            "int f(int a) { return a; } int main() { int x; f(1); x = f(2); return 0; }",
        );
        assert!(!diagnostics.has_errors(), "{diagnostics:?}");
        let Decl::Fn(main) = &program.decls[1] else {
            panic!("expected a function decl");
        };
        assert!(matches!(main.body.stmts[0], Stmt::Call(_)));
    }

    #[test]
    fn precedence_places_multiplication_above_addition() {
        let (program, diagnostics) = parse_source("int main() { int x; x = 1 + 2 * 3; return 0; }");
        assert!(!diagnostics.has_errors(), "{diagnostics:?}");
        let Decl::Fn(main) = &program.decls[0] else {
            panic!("expected a function decl");
        };
        let Stmt::Assign(a) = &main.body.stmts[0] else {
            panic!("expected an assignment statement");
        };
        let Expr::Binary(b) = &a.rhs else {
            panic!("expected a binary expression");
        };
        assert_eq!(b.op, BinaryOp::Add);
        assert!(matches!(*b.rhs, Expr::Binary(_)));
    }

    #[test]
    fn missing_closing_brace_recovers_for_next_declaration() {
        let (program, diagnostics) = parse_source("int f() { return 0; int main() { return 0; }");
        assert!(diagnostics.has_errors());
        // Recovery should still surface a second top-level declaration
        // rather than losing the rest of the file to one missing `}`.
        assert!(program.decls.len() >= 1);
    }

    #[test]
    fn dot_chain_builds_nested_access() {
        let (program, diagnostics) = parse_source(
            "struct Inner { int v; }; struct Outer { struct Inner i; };\nint main() { struct Outer o; o.i.v = 1; return 0; }",
        );
        assert!(!diagnostics.has_errors(), "{diagnostics:?}");
        let Decl::Fn(main) = &program.decls[2] else {
            panic!("expected a function decl");
        };
        let Stmt::Assign(a) = &main.body.stmts[0] else {
            panic!("expected an assignment statement");
        };
        assert!(matches!(a.lhs, Loc::Dot(_)));
    }
}
