//! Concrete syntax tree and the recursive-descent parser that builds it.
//!
//! All nodes are allocated in a [`bumpalo::Bump`] arena supplied by the
//! caller; the tree borrows from it with the `'ast` lifetime. Parsing is
//! total: every input produces a [`Program`], with unparseable regions
//! represented by error nodes and reported as diagnostics.

mod decl;
mod decl_parser;
mod expr;
mod expr_parser;
mod ops;
mod parser;
mod predicates;
mod stmt;
mod stmt_parser;

pub use decl::{
    Accessor, ClassDecl, ClassMember, Directive, DirectiveArg, FuncBody, FunctionDecl, Hotkey,
    Hotstring, HotstringBody, Param, Remap, SourceElement,
};
pub use expr::{DynamicPart, Expr, ObjectEntry};
pub use ops::{AssignOp, BinaryOp, PostfixOp, TERNARY_BP, POSTFIX_BP, UnaryOp};
pub use parser::Parser;
pub use stmt::{CaseClause, CatchClause, LoopKind, Scope, Stmt, VarInit};

use autohotkey_core::Span;

/// An identifier with its source location.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ident<'ast> {
    pub name: &'ast str,
    pub span: Span,
}

impl<'ast> Ident<'ast> {
    /// Create an identifier node.
    #[inline]
    pub fn new(name: &'ast str, span: Span) -> Self {
        Self { name, span }
    }
}

/// A parsed script: the ordered list of top-level elements.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Program<'ast> {
    pub elements: &'ast [SourceElement<'ast>],
    /// Span covering the whole source.
    pub span: Span,
}

impl<'ast> Program<'ast> {
    /// Whether the script has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}
