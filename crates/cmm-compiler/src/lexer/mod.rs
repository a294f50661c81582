//! Lexical analysis: turns source text into a flat token stream.
//!
//! Tokens carry 1-based `(line, column)` positions instead of byte
//! offsets, computed once via a [`LineIndex`] over the source, since
//! every diagnostic downstream is phrased in those terms. Identifiers
//! and string literals are interned immediately so later passes never
//! touch `&str` again.

mod token;

use logos::Logos;

use cmm_core::{Interner, Position, Symbol};

use crate::diagnostics::Diagnostics;
use token::RawToken;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Int,
    Bool,
    Void,
    True,
    False,
    Struct,
    Cin,
    Cout,
    If,
    Else,
    While,
    Repeat,
    Return,
    Ident(Symbol),
    IntLiteral(i32),
    /// Still wrapped in its surrounding quotes; see [`crate::ast::StrLit`].
    StringLiteral(Symbol),
    LCurly,
    RCurly,
    LParen,
    RParen,
    Semicolon,
    Comma,
    Dot,
    Write,
    Read,
    PlusPlus,
    MinusMinus,
    Plus,
    Minus,
    Times,
    Divide,
    Not,
    And,
    Or,
    Equals,
    NotEquals,
    Less,
    Greater,
    LessEq,
    GreaterEq,
    Assign,
    /// Synthetic end-of-input marker, so the parser never needs to
    /// special-case running off the end of the token vector.
    Eof,
}

#[derive(Debug, Clone, Copy)]
pub struct LocatedToken {
    pub kind: TokenKind,
    pub pos: Position,
}

/// Maps byte offsets into source text back to 1-based `(line, column)`.
struct LineIndex {
    /// Byte offset of the first character of each line; `line_starts[0]`
    /// is always `0`.
    line_starts: Vec<usize>,
}

impl LineIndex {
    fn new(source: &str) -> Self {
        let mut line_starts = vec![0];
        for (i, b) in source.bytes().enumerate() {
            if b == b'\n' {
                line_starts.push(i + 1);
            }
        }
        Self { line_starts }
    }

    fn position(&self, byte_offset: usize) -> Position {
        let line = self.line_starts.partition_point(|&start| start <= byte_offset) - 1;
        let column = byte_offset - self.line_starts[line] + 1;
        Position::new(line as u32 + 1, column as u32)
    }
}

/// Tokenizes `source`, interning identifiers and string literals into
/// `interner` and reporting any lexical errors into `diagnostics`.
/// Always returns a token stream terminated by [`TokenKind::Eof`], even
/// when errors were reported, so the parser can keep going.
pub fn lex(source: &str, interner: &mut Interner, diagnostics: &mut Diagnostics) -> Vec<LocatedToken> {
    let lines = LineIndex::new(source);
    let mut lexer = RawToken::lexer(source);
    let mut tokens = Vec::new();
    let mut error_start: Option<usize> = None;

    loop {
        match lexer.next() {
            Some(Ok(raw)) => {
                flush_error_run(source, &lines, &mut error_start, lexer.span().start, diagnostics);
                let pos = lines.position(lexer.span().start);
                let kind = convert(raw, interner, pos, diagnostics);
                tokens.push(LocatedToken { kind, pos });
            }
            Some(Err(())) => {
                error_start.get_or_insert(lexer.span().start);
            }
            None => {
                flush_error_run(source, &lines, &mut error_start, source.len(), diagnostics);
                break;
            }
        }
    }

    tokens.push(LocatedToken {
        kind: TokenKind::Eof,
        pos: lines.position(source.len()),
    });
    tokens
}

/// Reports a pending run of un-lexable bytes as a single diagnostic,
/// coalescing consecutive unrecognized characters instead of one
/// message per byte.
fn flush_error_run(
    source: &str,
    lines: &LineIndex,
    error_start: &mut Option<usize>,
    end: usize,
    diagnostics: &mut Diagnostics,
) {
    let Some(start) = error_start.take() else {
        return;
    };
    let pos = lines.position(start);
    let text = &source[start..end];
    if text.starts_with('"') {
        diagnostics.error(pos, "Unterminated string literal").emit();
    } else {
        diagnostics
            .error(pos, format!("Unrecognized character(s): {text:?}"))
            .emit();
    }
}

fn convert(raw: RawToken<'_>, interner: &mut Interner, pos: Position, diagnostics: &mut Diagnostics) -> TokenKind {
    match raw {
        RawToken::Int => TokenKind::Int,
        RawToken::Bool => TokenKind::Bool,
        RawToken::Void => TokenKind::Void,
        RawToken::True => TokenKind::True,
        RawToken::False => TokenKind::False,
        RawToken::Struct => TokenKind::Struct,
        RawToken::Cin => TokenKind::Cin,
        RawToken::Cout => TokenKind::Cout,
        RawToken::If => TokenKind::If,
        RawToken::Else => TokenKind::Else,
        RawToken::While => TokenKind::While,
        RawToken::Repeat => TokenKind::Repeat,
        RawToken::Return => TokenKind::Return,
        RawToken::Ident(text) => TokenKind::Ident(interner.intern(text)),
        RawToken::IntLiteral(digits) => TokenKind::IntLiteral(decode_int_literal(digits, pos, diagnostics)),
        RawToken::StringLiteral(text) => TokenKind::StringLiteral(interner.intern(text)),
        RawToken::LCurly => TokenKind::LCurly,
        RawToken::RCurly => TokenKind::RCurly,
        RawToken::LParen => TokenKind::LParen,
        RawToken::RParen => TokenKind::RParen,
        RawToken::Semicolon => TokenKind::Semicolon,
        RawToken::Comma => TokenKind::Comma,
        RawToken::Dot => TokenKind::Dot,
        RawToken::Write => TokenKind::Write,
        RawToken::Read => TokenKind::Read,
        RawToken::PlusPlus => TokenKind::PlusPlus,
        RawToken::MinusMinus => TokenKind::MinusMinus,
        RawToken::Plus => TokenKind::Plus,
        RawToken::Minus => TokenKind::Minus,
        RawToken::Times => TokenKind::Times,
        RawToken::Divide => TokenKind::Divide,
        RawToken::Not => TokenKind::Not,
        RawToken::And => TokenKind::And,
        RawToken::Or => TokenKind::Or,
        RawToken::EqualsEquals => TokenKind::Equals,
        RawToken::NotEquals => TokenKind::NotEquals,
        RawToken::LessEq => TokenKind::LessEq,
        RawToken::GreaterEq => TokenKind::GreaterEq,
        RawToken::Less => TokenKind::Less,
        RawToken::Greater => TokenKind::Greater,
        RawToken::Assign => TokenKind::Assign,
    }
}

/// Decodes an unsigned digit run, reporting (but not failing on)
/// overflow past `i32::MAX` — the scanner flags it, the parser still
/// accepts the literal, per the language's error-recovery policy.
fn decode_int_literal(digits: &str, pos: Position, diagnostics: &mut Diagnostics) -> i32 {
    match digits.parse::<i64>() {
        Ok(value) if value <= i32::MAX as i64 => value as i32,
        _ => {
            diagnostics
                .error(pos, format!("Integer literal out of range: {digits}"))
                .emit();
            i32::MAX
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        let mut interner = Interner::new();
        let mut diagnostics = Diagnostics::new();
        lex(source, &mut interner, &mut diagnostics)
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn keywords_and_punctuation() {
        let ks = kinds("int x; if (x) { x++; }");
        assert!(matches!(ks[0], TokenKind::Int));
        assert!(matches!(ks[1], TokenKind::Ident(_)));
        assert!(matches!(ks[2], TokenKind::Semicolon));
        assert!(matches!(ks.last().unwrap(), TokenKind::Eof));
    }

    #[test]
    fn keyword_prefix_is_not_swallowed_by_identifier() {
        // "intake" must lex as one identifier, not `int` + `ake`.
        let ks = kinds("intake");
        assert_eq!(ks.len(), 2);
        assert!(matches!(ks[0], TokenKind::Ident(_)));
    }

    #[test]
    fn shift_operators_are_maximal_munch() {
        let ks = kinds("cout << x; cin >> x;");
        assert!(matches!(ks[1], TokenKind::Write));
        assert!(matches!(ks[5], TokenKind::Read));
    }

    #[test]
    fn comparison_vs_equality_vs_shift() {
        let ks = kinds("a <= b; a < b; a == b; a != b;");
        assert!(matches!(ks[1], TokenKind::LessEq));
        assert!(matches!(ks[5], TokenKind::Less));
        assert!(matches!(ks[9], TokenKind::Equals));
        assert!(matches!(ks[13], TokenKind::NotEquals));
    }

    #[test]
    fn line_comments_and_block_comments_are_skipped() {
        let ks = kinds("int x; // trailing\n/* block */ int y;");
        assert_eq!(ks.len(), 7);
    }

    #[test]
    fn string_literal_keeps_quotes() {
        let mut interner = Interner::new();
        let mut diagnostics = Diagnostics::new();
        let tokens = lex(r#""hi\n""#, &mut interner, &mut diagnostics);
        match tokens[0].kind {
            TokenKind::StringLiteral(sym) => {
                assert_eq!(interner.resolve(sym), r#""hi\n""#);
            }
            _ => panic!("expected a string literal"),
        }
    }

    #[test]
    fn unterminated_string_is_reported() {
        let mut interner = Interner::new();
        let mut diagnostics = Diagnostics::new();
        lex("\"never closed", &mut interner, &mut diagnostics);
        assert!(diagnostics.has_errors());
        assert!(diagnostics.iter().any(|d| d.to_string().contains("Unterminated string literal")));
    }

    #[test]
    fn integer_overflow_is_reported_but_still_produces_a_token() {
        let mut interner = Interner::new();
        let mut diagnostics = Diagnostics::new();
        let tokens = lex("99999999999", &mut interner, &mut diagnostics);
        assert!(diagnostics.has_errors());
        assert!(matches!(tokens[0].kind, TokenKind::IntLiteral(i32::MAX)));
    }

    #[test]
    fn positions_advance_across_lines() {
        let mut interner = Interner::new();
        let mut diagnostics = Diagnostics::new();
        let tokens = lex("int x;\nint y;", &mut interner, &mut diagnostics);
        let idents: Vec<Position> = tokens
            .iter()
            .filter(|t| matches!(t.kind, TokenKind::Ident(_)))
            .map(|t| t.pos)
            .collect();
        assert_eq!(idents, vec![Position::new(1, 5), Position::new(2, 5)]);
        let second_int = tokens
            .iter()
            .filter(|t| matches!(t.kind, TokenKind::Int))
            .nth(1)
            .unwrap();
        assert_eq!(second_int.pos, Position::new(2, 1));
    }
}
