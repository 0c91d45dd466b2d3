//! Shared source-location and diagnostic types for the AutoHotkey v2 parser.
//!
//! This crate holds the types that cross the lexer/parser boundary:
//! [`Span`] for source positions, [`LexError`] for lexical failures, and
//! [`Diagnostic`]/[`Diagnostics`] for the ordered, non-fatal error list the
//! parser accumulates while it recovers.

mod error;
mod span;

pub use error::{Diagnostic, DiagnosticKind, Diagnostics, LexError, Severity};
pub use span::Span;
