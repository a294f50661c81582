//! The raw `logos` token set.
//!
//! This is a thin lexical layer only: keyword/punctuation spelling and
//! the shape of identifiers, integer literals, and string literals.
//! Payload conversion (interning, integer decoding, line/column
//! positions) happens one level up in [`super::lex`].

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
#[logos(skip r"[ \t\r\n]+")]
#[logos(skip r"//[^\n]*")]
#[logos(skip r"/\*([^*]|\*[^/])*\*/")]
pub enum RawToken<'src> {
    #[token("int", priority = 10)]
    Int,
    #[token("bool", priority = 10)]
    Bool,
    #[token("void", priority = 10)]
    Void,
    #[token("true", priority = 10)]
    True,
    #[token("false", priority = 10)]
    False,
    #[token("struct", priority = 10)]
    Struct,
    #[token("cin", priority = 10)]
    Cin,
    #[token("cout", priority = 10)]
    Cout,
    #[token("if", priority = 10)]
    If,
    #[token("else", priority = 10)]
    Else,
    #[token("while", priority = 10)]
    While,
    #[token("repeat", priority = 10)]
    Repeat,
    #[token("return", priority = 10)]
    Return,

    #[regex(r"[A-Za-z_][A-Za-z0-9_]*")]
    Ident(&'src str),

    #[regex(r"[0-9]+")]
    IntLiteral(&'src str),

    /// Verbatim including the surrounding quotes; no escape is
    /// interpreted here, the text is carried through unchanged.
    #[regex(r#""(?:[^"\\\n]|\\.)*""#)]
    StringLiteral(&'src str),

    #[token("{")]
    LCurly,
    #[token("}")]
    RCurly,
    #[token("(")]
    LParen,
    #[token(")")]
    RParen,
    #[token(";")]
    Semicolon,
    #[token(",")]
    Comma,
    #[token(".")]
    Dot,

    #[token("<<")]
    Write,
    #[token(">>")]
    Read,
    #[token("++")]
    PlusPlus,
    #[token("--")]
    MinusMinus,
    #[token("+")]
    Plus,
    #[token("-")]
    Minus,
    #[token("*")]
    Times,
    #[token("/")]
    Divide,
    #[token("!")]
    Not,
    #[token("&&")]
    And,
    #[token("||")]
    Or,
    #[token("==")]
    EqualsEquals,
    #[token("!=")]
    NotEquals,
    #[token("<=")]
    LessEq,
    #[token(">=")]
    GreaterEq,
    #[token("<")]
    Less,
    #[token(">")]
    Greater,
    #[token("=")]
    Assign,
}
