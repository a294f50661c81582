//! Compiler for the C-- language: lexer, parser, semantic analysis, and
//! MIPS assembly emitter.
//!
//! The pipeline is a thin orchestration of independently testable
//! passes, wired together in [`compilation`]:
//!
//! ```text
//! source text -> lexer -> parser -> name resolution -> type check -> codegen -> assembly text
//! ```
//!
//! Each pass reports problems through [`diagnostics::Diagnostics`]
//! rather than failing fast, so a single invocation surfaces every
//! error it can find instead of stopping at the first one.

pub mod analyze;
pub mod ast;
pub mod codegen;
pub mod compilation;
pub mod diagnostics;
pub mod lexer;
pub mod parser;

pub use cmm_core::{Interner, Position, Symbol};
pub use compilation::{compile, CompileOutcome};
pub use diagnostics::{Diagnostics, DiagnosticsPrinter, Severity};
