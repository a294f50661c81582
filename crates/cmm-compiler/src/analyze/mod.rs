//! Semantic analysis: name resolution (C4) followed by type checking (C5).
//!
//! The two passes share the symbol/type infrastructure in [`symbol`],
//! [`scope`], and [`types`], but run strictly in sequence: name
//! resolution mutates the AST's symbol links and the frame-offset
//! fields, and only once it has finished does type checking read those
//! links to compute and check every expression's type.

pub mod name_resolution;
pub mod scope;
pub mod symbol;
pub mod type_check;
pub mod types;

pub use name_resolution::resolve;
pub use symbol::{SymbolArena, SymbolId, SymbolKind};
pub use type_check::check;
pub use types::{Type, TypeArena, TypeId};
