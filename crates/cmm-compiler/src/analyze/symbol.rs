//! Symbols: the semantic data attached to a declared name.

use indexmap::IndexMap;

use cmm_core::Symbol;

use super::types::Type;

/// A handle to a [`SymbolData`] stored in a [`SymbolArena`].
///
/// Stable once allocated: unlike the scope stack, which is torn down
/// as blocks close, the arena lives for the rest of the pipeline so
/// type checking and code generation can still resolve symbols linked
/// onto the AST during name resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SymbolId(u32);

/// A variable's location.
///
/// Globals live in `.data` and are addressed by label; locals and
/// formals are addressed relative to `$fp`; struct fields are
/// addressed relative to their owning instance's base address.
///
/// Every symbol occupies exactly one word (4 bytes), including struct
/// instances: a nested struct-typed field reserves one word rather
/// than being recursively flattened to its full size. The language's
/// diagnostics fully cover struct member access, but this keeps frame
/// and field arithmetic uniform everywhere else; revisit if
/// nested-struct-by-value layout becomes load-bearing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Offset {
    Global,
    Frame(i32),
    Field(i32),
}

#[derive(Debug)]
pub enum SymbolKind {
    Variable {
        ty: Type,
        offset: Offset,
    },
    Function {
        params: Vec<Type>,
        ret: Type,
        /// Bytes of locals below `$fp`, computed by name resolution's
        /// offset cursor.
        size_locals: i32,
        /// Bytes of formals above `$fp` (always `4 * formals.len()`).
        size_params: i32,
    },
    /// Owns the field table so it outlives every scope pop that
    /// occurred while analyzing the struct body. A variable whose type
    /// is `Type::StructInstance(tag)` has no symbol kind of its own
    /// beyond `Variable`; `tag` is looked back up in the global scope
    /// to reach this.
    StructDef { fields: IndexMap<Symbol, SymbolId> },
}

#[derive(Debug)]
pub struct SymbolData {
    pub name: Symbol,
    pub kind: SymbolKind,
}

/// Owns every [`SymbolData`] allocated while analyzing a program.
#[derive(Debug, Default)]
pub struct SymbolArena {
    data: Vec<SymbolData>,
}

impl SymbolArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, data: SymbolData) -> SymbolId {
        let id = SymbolId(self.data.len() as u32);
        self.data.push(data);
        id
    }

    pub fn get(&self, id: SymbolId) -> &SymbolData {
        &self.data[id.0 as usize]
    }

    pub fn get_mut(&mut self, id: SymbolId) -> &mut SymbolData {
        &mut self.data[id.0 as usize]
    }
}
