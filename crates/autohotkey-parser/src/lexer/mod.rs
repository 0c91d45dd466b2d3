//! Mode-aware lexer for AutoHotkey v2 source text.
//!
//! The lexer never fails: every byte of input becomes a token, with
//! uninterpretable characters surfaced as [`TokenKind::UnexpectedCharacter`]
//! and malformed constructs recorded as [`autohotkey_core::LexError`]s
//! alongside the token stream.

mod cursor;
mod lexer;
mod token;

pub use cursor::Cursor;
pub use lexer::{Lexer, Mode};
pub use token::{
    Channel, DirectiveKind, Token, TokenKind, is_line_continuation, lookup_directive,
    lookup_keyword,
};
