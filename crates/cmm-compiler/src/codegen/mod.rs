//! Code emission (C6): walks a name-resolved, type-checked [`Program`]
//! and produces textual MIPS-like assembly.
//!
//! Only called once [`crate::diagnostics::Diagnostics::has_errors`] is
//! `false` for the program — the emitter assumes every identifier is
//! linked and every expression is well typed, and panics (an internal
//! invariant violation, not a diagnostic) if that assumption doesn't
//! hold.

mod frame;
mod labels;
mod strings;

use cmm_core::{Interner, Symbol};

use crate::analyze::symbol::{SymbolArena, SymbolId, SymbolKind};
use crate::analyze::types::TypeId;
use crate::ast::{
    Assign, BinaryExpr, BinaryOp, Block, CallExpr, Decl, Expr, FnDecl, IfElseStmt, IfStmt, Loc,
    Program, ReturnStmt, Stmt, UnaryExpr, UnaryOp, WhileStmt,
};

use labels::LabelAllocator;
use strings::StringTable;

/// Generates the complete assembly text for `program`.
pub fn generate(program: &Program, symbols: &SymbolArena, interner: &Interner) -> String {
    let mut emitter = Emitter {
        symbols,
        interner,
        labels: LabelAllocator::new(),
        strings: StringTable::new(),
        lines: Vec::new(),
        fn_end_label: String::new(),
    };
    emitter.line(".data");
    emitter.globals(program);
    for decl in &program.decls {
        if let Decl::Fn(f) = decl {
            emitter.fn_decl(f);
        }
    }
    let mut text = emitter.lines.join("\n");
    text.push('\n');
    text
}

struct Emitter<'a> {
    symbols: &'a SymbolArena,
    interner: &'a Interner,
    labels: LabelAllocator,
    strings: StringTable,
    lines: Vec<String>,
    /// Where `return` branches to in the function currently being
    /// emitted.
    fn_end_label: String,
}

impl<'a> Emitter<'a> {
    fn line(&mut self, s: impl Into<String>) {
        self.lines.push(s.into());
    }

    fn label(&mut self, name: &str) {
        self.lines.push(format!("{name}:"));
    }

    fn push(&mut self, reg: &str) {
        for l in frame::push(reg) {
            self.line(l);
        }
    }

    fn pop(&mut self, reg: &str) {
        for l in frame::pop(reg) {
            self.line(l);
        }
    }

    fn symbol_name(&self, id: SymbolId) -> &str {
        self.interner.resolve(self.symbols.get(id).name)
    }

    fn callee_label(&self, id: SymbolId) -> String {
        let name = self.symbol_name(id);
        if name == "main" {
            "main".to_string()
        } else {
            format!("_{name}")
        }
    }

    // --- Top level -------------------------------------------------

    fn globals(&mut self, program: &Program) {
        for decl in &program.decls {
            if let Decl::Var(v) = decl {
                let id = v
                    .sym
                    .get()
                    .expect("name resolution linked every global declaration");
                let name = self.symbol_name(id).to_string();
                self.line(format!("_{name}: .word 0"));
            }
        }
    }

    fn fn_decl(&mut self, f: &FnDecl) {
        let fn_id = f
            .sym
            .get()
            .expect("name resolution linked every function declaration");
        let name = self.symbol_name(fn_id).to_string();
        let is_main = name == "main";
        let size_locals = match &self.symbols.get(fn_id).kind {
            SymbolKind::Function { size_locals, .. } => *size_locals,
            _ => panic!("function declaration's symbol is not a Function"),
        };

        let fn_end = self.labels.next_label();
        let saved_fn_end = std::mem::replace(&mut self.fn_end_label, fn_end.clone());

        self.line(".text");
        if is_main {
            self.label("main");
            self.label("_start");
        } else {
            self.label(&format!("_{name}"));
        }
        for l in frame::prologue(size_locals) {
            self.line(l);
        }

        self.block(&f.body);

        self.label(&fn_end);
        for l in frame::epilogue(is_main) {
            self.line(l);
        }

        self.fn_end_label = saved_fn_end;
    }

    fn block(&mut self, block: &Block) {
        for s in &block.stmts {
            self.stmt(s);
        }
    }

    // --- Statements --------------------------------------------------

    fn stmt(&mut self, s: &Stmt) {
        match s {
            Stmt::Assign(a) => self.codegen_assign(a),
            Stmt::PostInc(loc, _) => self.codegen_post_inc(loc),
            Stmt::PostDec(loc, _) => self.codegen_post_dec(loc),
            Stmt::Read(loc) => self.codegen_read(loc),
            Stmt::Write(e) => self.codegen_write(e),
            Stmt::If(s) => self.codegen_if(s),
            Stmt::IfElse(s) => self.codegen_if_else(s),
            Stmt::While(s) => self.codegen_while(s),
            // Ignored, per the language's emission conventions: `repeat`
            // is analyzed but never generates code.
            Stmt::Repeat(_) => {}
            Stmt::Call(c) => {
                self.codegen_call(c);
            }
            Stmt::Return(r) => self.codegen_return(r),
        }
    }

    fn codegen_if(&mut self, s: &IfStmt) {
        let true_l = self.labels.next_label();
        let done_l = self.labels.next_label();
        self.codegen_jump(&s.cond, &true_l, &done_l);
        self.label(&true_l);
        self.block(&s.body);
        self.label(&done_l);
    }

    fn codegen_if_else(&mut self, s: &IfElseStmt) {
        let true_l = self.labels.next_label();
        let false_l = self.labels.next_label();
        let done_l = self.labels.next_label();
        self.codegen_jump(&s.cond, &true_l, &false_l);
        self.label(&true_l);
        self.block(&s.then_body);
        self.line(format!("b {done_l}"));
        self.label(&false_l);
        self.block(&s.else_body);
        self.label(&done_l);
    }

    fn codegen_while(&mut self, s: &WhileStmt) {
        let cond_l = self.labels.next_label();
        let body_l = self.labels.next_label();
        let done_l = self.labels.next_label();
        self.label(&cond_l);
        self.codegen_jump(&s.cond, &body_l, &done_l);
        self.label(&body_l);
        self.block(&s.body);
        self.line(format!("b {cond_l}"));
        self.label(&done_l);
    }

    fn codegen_return(&mut self, r: &ReturnStmt) {
        if let Some(e) = &r.value {
            self.codegen(e);
            self.line("move $v0, $t0");
        }
        self.line(format!("b {}", self.fn_end_label));
    }

    fn codegen_read(&mut self, loc: &Loc) {
        self.codegen_addr(loc);
        self.line("li $v0, 5");
        self.line("syscall");
        if loc.ty() == TypeId::BOOL {
            self.line("sne $v0, $v0, 0");
        }
        self.pop("$t1");
        self.line("sw $v0, 0($t1)");
    }

    fn codegen_write(&mut self, e: &Expr) {
        self.codegen(e);
        self.line("move $a0, $t0");
        if e.ty() == TypeId::STRING {
            self.line("li $v0, 4");
        } else {
            self.line("li $v0, 1");
        }
        self.line("syscall");
    }

    fn codegen_post_inc(&mut self, loc: &Loc) {
        self.codegen_addr(loc);
        self.pop("$t1");
        self.line("lw $t0, 0($t1)");
        self.line("addu $t0, $t0, 1");
        self.line("sw $t0, 0($t1)");
    }

    fn codegen_post_dec(&mut self, loc: &Loc) {
        self.codegen_addr(loc);
        self.pop("$t1");
        self.line("lw $t0, 0($t1)");
        self.line("subu $t0, $t0, 1");
        self.line("sw $t0, 0($t1)");
    }

    fn codegen_assign(&mut self, a: &Assign) {
        self.codegen_addr(&a.lhs);
        self.codegen(&a.rhs);
        self.pop("$t1");
        self.line("sw $t0, 0($t1)");
    }

    fn codegen_call(&mut self, call: &CallExpr) {
        for arg in &call.args {
            self.codegen(arg);
            self.push("$t0");
        }
        let callee_id = call
            .callee
            .sym
            .get()
            .expect("name resolution linked every call's callee");
        let (label, size_params, ret_is_void) = match &self.symbols.get(callee_id).kind {
            SymbolKind::Function {
                ret,
                size_params,
                ..
            } => (self.callee_label(callee_id), *size_params, ret.is_void()),
            _ => panic!("call target's symbol is not a Function"),
        };
        self.line(format!("jal {label}"));
        if size_params > 0 {
            self.line(format!("add $sp, $sp, {size_params}"));
        }
        if !ret_is_void {
            self.line("move $t0, $v0");
        }
    }

    // --- Addressing ----------------------------------------------------
    //
    // A dot-access's address is its base's address: struct field
    // offsets are computed during name resolution but, as in the
    // language's own emitter, never consumed here (see `DESIGN.md`).

    fn codegen_addr(&mut self, loc: &Loc) {
        match loc {
            Loc::Id(id) => self.emit_addr_of(id.sym.get().expect("name resolution linked this identifier")),
            Loc::Dot(dot) => self.codegen_addr_of_base(&dot.base),
        }
        self.push("$t0");
    }

    fn codegen_addr_of_base(&mut self, e: &Expr) {
        match e {
            Expr::Ident(id) => self.emit_addr_of(id.sym.get().expect("name resolution linked this identifier")),
            Expr::Dot(dot) => self.codegen_addr_of_base(&dot.base),
            _ => unreachable!("a loc's base is always an identifier or a dot-access"),
        }
    }

    fn emit_addr_of(&mut self, id: SymbolId) {
        let offset = match &self.symbols.get(id).kind {
            SymbolKind::Variable { offset, .. } => *offset,
            _ => panic!("addressed symbol is not a variable"),
        };
        let name = self.symbol_name(id).to_string();
        self.line(frame::address_instruction(offset, &name));
    }

    fn operand_of_base(&self, e: &Expr) -> String {
        match e {
            Expr::Ident(id) => self.operand_of_symbol(id.sym.get().expect("name resolution linked this identifier")),
            Expr::Dot(dot) => self.operand_of_base(&dot.base),
            _ => unreachable!("a loc's base is always an identifier or a dot-access"),
        }
    }

    fn operand_of_symbol(&self, id: SymbolId) -> String {
        let offset = match &self.symbols.get(id).kind {
            SymbolKind::Variable { offset, .. } => *offset,
            _ => panic!("read symbol is not a variable"),
        };
        frame::operand(offset, self.symbol_name(id))
    }

    // --- Expressions -----------------------------------------------------

    fn codegen(&mut self, e: &Expr) {
        match e {
            Expr::Int(n) => self.line(format!("li $t0, {}", n.value)),
            Expr::Bool(b) => self.line(format!("li $t0, {}", if b.value { 1 } else { 0 })),
            Expr::Str(s) => {
                let label = self.string_label(s.value);
                self.line(format!("la $t0, {label}"));
            }
            Expr::Ident(id) => {
                let operand =
                    self.operand_of_symbol(id.sym.get().expect("name resolution linked this identifier"));
                self.line(format!("lw $t0, {operand}"));
            }
            Expr::Dot(dot) => {
                let operand = self.operand_of_base(&dot.base);
                self.line(format!("lw $t0, {operand}"));
            }
            Expr::Assign(a) => self.codegen_assign(a),
            Expr::Call(c) => self.codegen_call(c),
            Expr::Unary(u) => self.codegen_unary(u),
            Expr::Binary(b) if b.op.is_logical() => self.codegen_logical_value(b),
            Expr::Binary(b) => self.codegen_binary_value(b),
        }
    }

    fn string_label(&mut self, literal: Symbol) -> String {
        let (label, is_new) = self.strings.label_for(literal);
        if is_new {
            let text = self.interner.resolve(literal).to_string();
            self.line(".data");
            self.label(&label);
            self.line(format!(".asciiz {text}"));
            self.line(".text");
        }
        label
    }

    fn codegen_unary(&mut self, u: &UnaryExpr) {
        self.codegen(&u.operand);
        match u.op {
            UnaryOp::Neg => self.line("sub $t0, $zero, $t0"),
            UnaryOp::Not => self.line("seq $t0, $t0, 0"),
        }
    }

    fn codegen_binary_value(&mut self, b: &BinaryExpr) {
        self.codegen(&b.lhs);
        self.push("$t0");
        self.codegen(&b.rhs);
        self.push("$t0");
        self.pop("$t1");
        self.pop("$t0");
        match b.op {
            BinaryOp::Add => self.line("add $t0, $t0, $t1"),
            BinaryOp::Sub => self.line("sub $t0, $t0, $t1"),
            BinaryOp::Mul => {
                self.line("mult $t0, $t1");
                self.line("mflo $t0");
            }
            BinaryOp::Div => {
                self.line("div $t0, $t1");
                self.line("mflo $t0");
            }
            BinaryOp::Eq => self.line("seq $t0, $t0, $t1"),
            BinaryOp::Neq => self.line("sne $t0, $t0, $t1"),
            BinaryOp::Lt => self.line("slt $t0, $t0, $t1"),
            BinaryOp::Gt => self.line("sgt $t0, $t0, $t1"),
            BinaryOp::Le => self.line("sle $t0, $t0, $t1"),
            BinaryOp::Ge => self.line("sge $t0, $t0, $t1"),
            BinaryOp::And | BinaryOp::Or => unreachable!("logical operators use codegen_logical_value"),
        }
    }

    /// Short-circuit value form: `a && b` / `a || b` used as an
    /// ordinary value rather than as a statement's condition.
    fn codegen_logical_value(&mut self, b: &BinaryExpr) {
        let right_l = self.labels.next_label();
        let end_l = self.labels.next_label();
        match b.op {
            BinaryOp::And => self.codegen_jump(&b.lhs, &right_l, &end_l),
            BinaryOp::Or => self.codegen_jump(&b.lhs, &end_l, &right_l),
            _ => unreachable!("only And/Or reach codegen_logical_value"),
        }
        self.label(&right_l);
        self.codegen(&b.rhs);
        self.label(&end_l);
    }

    /// Jump form: branches to `true_label` or `false_label` instead of
    /// producing a value, short-circuiting `&&`/`||` and letting `!`
    /// flip its operand's labels instead of negating a computed value.
    fn codegen_jump(&mut self, e: &Expr, true_label: &str, false_label: &str) {
        match e {
            Expr::Unary(u) if u.op == UnaryOp::Not => {
                self.codegen_jump(&u.operand, false_label, true_label)
            }
            Expr::Binary(b) if b.op == BinaryOp::And => {
                let right_l = self.labels.next_label();
                self.codegen_jump(&b.lhs, &right_l, false_label);
                self.label(&right_l);
                self.codegen_jump(&b.rhs, true_label, false_label);
            }
            Expr::Binary(b) if b.op == BinaryOp::Or => {
                let right_l = self.labels.next_label();
                self.codegen_jump(&b.lhs, true_label, &right_l);
                self.label(&right_l);
                self.codegen_jump(&b.rhs, true_label, false_label);
            }
            _ => {
                self.codegen(e);
                self.line(format!("beq $t0, 0, {false_label}"));
                self.line(format!("b {true_label}"));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use indoc::indoc;

    use crate::compilation::compile;

    /// Scenario 1 from spec.md §8.
    #[test]
    fn hello_world() {
        let outcome = compile(indoc! {r#"
            int main() {
                cout << "hi";
                return 0;
            }
        "#});
        assert!(!outcome.has_errors(), "{:?}", outcome.diagnostics);
        let asm = outcome.assembly.unwrap();
        assert!(asm.starts_with(".data\n.text\nmain:\n_start:\n"));
        assert!(asm.contains(".asciiz \"hi\""));
        assert!(asm.contains("li $v0, 4\nsyscall"));
        assert!(asm.contains("li $v0, 10\nsyscall"));
        // determinism: a second run of the same input is byte-identical.
        assert_eq!(asm, compile(indoc! {r#"
            int main() {
                cout << "hi";
                return 0;
            }
        "#}).assembly.unwrap());
    }

    #[test]
    fn if_else_and_while_control_flow() {
        let outcome = compile(indoc! {r#"
            int main() {
                int x;
                x = 0;
                if (x < 10) {
                    x = x + 1;
                } else {
                    x = x - 1;
                }
                while (x > 0) {
                    x--;
                }
                return x;
            }
        "#});
        assert!(!outcome.has_errors(), "{:?}", outcome.diagnostics);
        let asm = outcome.assembly.unwrap();
        assert!(asm.contains("slt $t0, $t0, $t1"));
        assert!(asm.contains("sgt $t0, $t0, $t1"));
        // 7 labels total (fn-end, if/else's true/false/done, while's
        // cond/body/done), each declared once and referenced once.
        assert_eq!(asm.matches(".L").count(), 14);
    }

    #[test]
    fn short_circuit_and_or() {
        let outcome = compile(indoc! {r#"
            bool p(int a, int b) {
                return a < b && b < 10 || a == 0;
            }
            int main() {
                bool r;
                r = p(1, 2);
                return 0;
            }
        "#});
        assert!(!outcome.has_errors(), "{:?}", outcome.diagnostics);
        let asm = outcome.assembly.unwrap();
        // value-form && / || never materialize a boolean through seq/sne;
        // they only ever branch on the already-computed $t0.
        assert!(asm.contains("beq $t0, 0,"));
        assert!(asm.contains("jal _p"));
        assert!(asm.contains("add $sp, $sp, 8"));
    }

    #[test]
    fn struct_field_access_addresses_through_the_base() {
        let outcome = compile(indoc! {r#"
            struct Point {
                int x;
                int y;
            };
            int main() {
                struct Point p;
                p.x = 3;
                p.y = p.x + 1;
                return 0;
            }
        "#});
        assert!(!outcome.has_errors(), "{:?}", outcome.diagnostics);
        let asm = outcome.assembly.unwrap();
        // `p` is a single word at its frame offset; both `p.x` and `p.y`
        // address through that same slot, never a struct-relative one.
        assert_eq!(asm.matches("addu $t0, $fp, -8").count(), 2);
    }

    #[test]
    fn repeated_string_literal_shares_one_label() {
        let outcome = compile(indoc! {r#"
            int main() {
                cout << "same";
                cout << "same";
                return 0;
            }
        "#});
        assert!(!outcome.has_errors(), "{:?}", outcome.diagnostics);
        let asm = outcome.assembly.unwrap();
        assert_eq!(asm.matches(".asciiz \"same\"").count(), 1);
    }

    #[test]
    fn repeat_statement_analyzes_but_does_not_emit() {
        let outcome = compile(indoc! {r#"
            int main() {
                int x;
                x = 3;
                repeat (x) {
                    x = x - 1;
                }
                return 0;
            }
        "#});
        assert!(!outcome.has_errors(), "{:?}", outcome.diagnostics);
        let asm = outcome.assembly.unwrap();
        assert!(!asm.contains("x - 1"));
    }
}
