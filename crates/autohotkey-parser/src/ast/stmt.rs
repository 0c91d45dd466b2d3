//! Statement nodes.

use autohotkey_core::Span;

use super::Ident;
use super::decl::FunctionDecl;
use super::expr::Expr;

/// A statement.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Stmt<'ast> {
    /// `global x := 1, y` / `local` / `static`
    VarDecl {
        scope: Scope,
        vars: &'ast [VarInit<'ast>],
        span: Span,
    },
    /// `if cond ... else ...`
    If {
        cond: &'ast Expr<'ast>,
        then_branch: &'ast Stmt<'ast>,
        else_branch: Option<&'ast Stmt<'ast>>,
        span: Span,
    },
    /// `loop` with an optional count: `Loop 5 { ... }`
    Loop {
        count: Option<&'ast Expr<'ast>>,
        body: &'ast Stmt<'ast>,
        until: Option<&'ast Expr<'ast>>,
        /// Trailing `else`, run when the loop iterates zero times.
        else_branch: Option<&'ast Stmt<'ast>>,
        span: Span,
    },
    /// `Loop Files`, `Loop Read`, `Loop Reg`, `Loop Parse`
    SpecializedLoop {
        kind: LoopKind,
        args: &'ast [Expr<'ast>],
        body: &'ast Stmt<'ast>,
        until: Option<&'ast Expr<'ast>>,
        else_branch: Option<&'ast Stmt<'ast>>,
        span: Span,
    },
    /// `while cond { ... }`
    While {
        cond: &'ast Expr<'ast>,
        body: &'ast Stmt<'ast>,
        span: Span,
    },
    /// `for k, v in obj { ... }`
    ForIn {
        vars: &'ast [Ident<'ast>],
        iterable: &'ast Expr<'ast>,
        body: &'ast Stmt<'ast>,
        until: Option<&'ast Expr<'ast>>,
        else_branch: Option<&'ast Stmt<'ast>>,
        span: Span,
    },
    /// `break` with an optional loop label
    Break {
        label: Option<Ident<'ast>>,
        span: Span,
    },
    /// `continue` with an optional loop label
    Continue {
        label: Option<Ident<'ast>>,
        span: Span,
    },
    /// `return` with an optional value
    Return {
        value: Option<&'ast Expr<'ast>>,
        span: Span,
    },
    /// A `name:` label
    Label { name: Ident<'ast>, span: Span },
    /// `goto name`
    Goto { label: Ident<'ast>, span: Span },
    /// `switch subject { case ...: ... }`
    Switch {
        subject: Option<&'ast Expr<'ast>>,
        cases: &'ast [CaseClause<'ast>],
        span: Span,
    },
    /// `throw` with an optional value
    Throw {
        value: Option<&'ast Expr<'ast>>,
        span: Span,
    },
    /// `try ... catch ... else ... finally ...`
    Try {
        body: &'ast Stmt<'ast>,
        handlers: &'ast [CatchClause<'ast>],
        else_branch: Option<&'ast Stmt<'ast>>,
        finally: Option<&'ast Stmt<'ast>>,
        span: Span,
    },
    /// A named function definition
    FunctionDecl(&'ast FunctionDecl<'ast>),
    /// Command-style function call without parentheses: `MsgBox "hi", "t"`
    Command {
        target: &'ast Expr<'ast>,
        args: &'ast [Expr<'ast>],
        span: Span,
    },
    /// `{ ... }`
    Block {
        stmts: &'ast [Stmt<'ast>],
        span: Span,
    },
    /// A bare expression statement
    Expr { expr: &'ast Expr<'ast>, span: Span },
    /// Placeholder for source the parser could not interpret.
    Error(Span),
}

/// Scope of a variable declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Scope {
    Global,
    Local,
    Static,
}

/// One `name` or `name := init` in a variable declaration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VarInit<'ast> {
    pub name: Ident<'ast>,
    pub init: Option<&'ast Expr<'ast>>,
    pub span: Span,
}

/// The specialized loop families.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LoopKind {
    Files,
    Read,
    Reg,
    Parse,
}

impl LoopKind {
    /// Match a loop keyword argument case-insensitively.
    pub fn from_word(word: &str) -> Option<Self> {
        Some(match () {
            _ if word.eq_ignore_ascii_case("files") => Self::Files,
            _ if word.eq_ignore_ascii_case("read") => Self::Read,
            _ if word.eq_ignore_ascii_case("reg") => Self::Reg,
            _ if word.eq_ignore_ascii_case("parse") => Self::Parse,
            _ => return None,
        })
    }
}

/// One `case v1, v2:` (or `default:`) clause in a switch.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CaseClause<'ast> {
    /// Empty for the `default` clause.
    pub values: &'ast [Expr<'ast>],
    pub body: &'ast [Stmt<'ast>],
    pub span: Span,
}

/// One `catch Class1, Class2 as name` handler.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CatchClause<'ast> {
    /// Error classes this handler matches; empty matches everything.
    pub classes: &'ast [Expr<'ast>],
    /// The `as name` binding, if present.
    pub binding: Option<Ident<'ast>>,
    pub body: &'ast Stmt<'ast>,
    pub span: Span,
}

impl Stmt<'_> {
    /// The source span this statement covers.
    pub fn span(&self) -> Span {
        match self {
            Stmt::VarDecl { span, .. }
            | Stmt::If { span, .. }
            | Stmt::Loop { span, .. }
            | Stmt::SpecializedLoop { span, .. }
            | Stmt::While { span, .. }
            | Stmt::ForIn { span, .. }
            | Stmt::Break { span, .. }
            | Stmt::Continue { span, .. }
            | Stmt::Return { span, .. }
            | Stmt::Label { span, .. }
            | Stmt::Goto { span, .. }
            | Stmt::Switch { span, .. }
            | Stmt::Throw { span, .. }
            | Stmt::Try { span, .. }
            | Stmt::Command { span, .. }
            | Stmt::Block { span, .. }
            | Stmt::Expr { span, .. } => *span,
            Stmt::FunctionDecl(func) => func.span,
            Stmt::Error(span) => *span,
        }
    }
}
