//! Lexer and parser for the AutoHotkey v2 scripting language.
//!
//! The lexer is mode-aware: hotkey and hotstring triggers, directive
//! arguments, and line continuation all depend on where in the line a token
//! sits, so the scanner tracks a mode stack, a bracket depth, and the last
//! code token instead of being a pure regular tokenizer. The parser is
//! recursive descent with precedence-climbing expressions and produces a
//! full concrete syntax tree with source spans.
//!
//! Parsing is total. [`parse`] always returns a [`Program`]; malformed
//! regions become error nodes in the tree and entries in the returned
//! diagnostic list.
//!
//! ```
//! use bumpalo::Bump;
//!
//! let arena = Bump::new();
//! let (program, diagnostics) = autohotkey_parser::parse("x := 1 + 2 * 3", &arena);
//! assert!(diagnostics.is_empty());
//! assert_eq!(program.elements.len(), 1);
//! ```

pub mod ast;
pub mod lexer;

pub use ast::{Parser, Program};
pub use autohotkey_core::{Diagnostic, DiagnosticKind, Diagnostics, LexError, Severity, Span};

use bumpalo::Bump;

/// Parse an AutoHotkey v2 source string.
///
/// The tree borrows from `arena`; diagnostics are returned in source order
/// and include both lexical and syntactic problems.
pub fn parse<'ast>(source: &str, arena: &'ast Bump) -> (Program<'ast>, Vec<Diagnostic>) {
    Parser::parse(source, arena)
}
