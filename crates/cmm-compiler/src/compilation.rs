//! The pipeline facade: wires lexer, parser, name resolution, type
//! checking, and code emission into the single entry point callers
//! actually want.
//!
//! Per spec.md §2, any error recorded by name resolution or type
//! checking skips code emission entirely; a parse error does too,
//! since the core passes assume a syntactically well-formed AST.

use cmm_core::Interner;

use crate::analyze::{name_resolution, type_check};
use crate::ast::Program;
use crate::diagnostics::Diagnostics;
use crate::{codegen, lexer, parser};

/// The result of compiling one source file.
///
/// `program`/`interner` are always returned (even on error) so a
/// caller that wants `--emit-ast` can still inspect the parsed tree;
/// `assembly` is only populated when [`Diagnostics::has_errors`] is
/// `false` on `diagnostics`.
pub struct CompileOutcome {
    pub program: Program,
    pub interner: Interner,
    pub diagnostics: Diagnostics,
    pub assembly: Option<String>,
    /// Set when lexing/parsing failed, before name resolution or type
    /// checking ever ran. Lets a caller distinguish a syntax error from
    /// a semantic one (`cmm-cli` reports these as different exit codes).
    pub parse_failed: bool,
}

impl CompileOutcome {
    pub fn has_errors(&self) -> bool {
        self.diagnostics.has_errors()
    }
}

/// Runs the full pipeline over `source`: lex, parse, name-resolve,
/// type-check, and — only if nothing reported an error along the way —
/// emit MIPS assembly text.
pub fn compile(source: &str) -> CompileOutcome {
    let mut interner = Interner::new();
    let mut diagnostics = Diagnostics::new();

    let tokens = lexer::lex(source, &mut interner, &mut diagnostics);
    let program = parser::parse(&tokens, &mut diagnostics);

    if diagnostics.has_errors() {
        return CompileOutcome {
            program,
            interner,
            diagnostics,
            assembly: None,
            parse_failed: true,
        };
    }

    let main = interner.intern("main");
    let symbols = name_resolution::resolve(&program, main, &mut diagnostics);
    type_check::check(&program, &symbols, &mut diagnostics);

    let assembly = if diagnostics.has_errors() {
        None
    } else {
        Some(codegen::generate(&program, &symbols, &interner))
    };

    CompileOutcome {
        program,
        interner,
        diagnostics,
        assembly,
        parse_failed: false,
    }
}
