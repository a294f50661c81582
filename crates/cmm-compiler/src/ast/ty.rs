use super::decl::DeclName;

/// A type as written in source, before name resolution has confirmed
/// that a `struct` reference actually names a declared struct.
#[derive(Debug, Clone)]
pub enum TypeNode {
    Int,
    Bool,
    Void,
    /// `struct S`, carrying the tag's name and position for the
    /// "Invalid name of struct type" diagnostic.
    Struct(DeclName),
}
