//! Declaration and top-level script element nodes.
//!
//! An AutoHotkey script is a flat sequence of source elements: class and
//! function definitions, directives, hotkeys, remaps, hotstrings, and plain
//! statements, in any order.

use autohotkey_core::Span;

use super::Ident;
use super::expr::Expr;
use super::stmt::Stmt;
use crate::lexer::DirectiveKind;

/// A named function definition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FunctionDecl<'ast> {
    pub name: Ident<'ast>,
    pub params: &'ast [Param<'ast>],
    pub body: FuncBody<'ast>,
    pub span: Span,
}

/// A function body: either a brace block or a fat-arrow expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum FuncBody<'ast> {
    Block(&'ast Stmt<'ast>),
    Expr(&'ast Expr<'ast>),
}

/// One formal parameter.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Param<'ast> {
    pub name: Ident<'ast>,
    /// Declared `&name`, passed by reference.
    pub by_ref: bool,
    /// `name := default`
    pub default: Option<&'ast Expr<'ast>>,
    /// `name*`, collecting remaining arguments.
    pub variadic: bool,
    pub span: Span,
}

/// A class definition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClassDecl<'ast> {
    pub name: Ident<'ast>,
    /// The `extends` base, a possibly dotted name.
    pub extends: Option<&'ast Expr<'ast>>,
    pub members: &'ast [ClassMember<'ast>],
    pub span: Span,
}

/// One member of a class body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ClassMember<'ast> {
    /// `x := 1` or `static x := 1`
    Field {
        is_static: bool,
        name: Ident<'ast>,
        value: Option<&'ast Expr<'ast>>,
        span: Span,
    },
    /// A method definition.
    Method {
        is_static: bool,
        func: &'ast FunctionDecl<'ast>,
    },
    /// `Prop[params] { get => ... set => ... }`
    Property {
        is_static: bool,
        name: Ident<'ast>,
        params: &'ast [Param<'ast>],
        getter: Option<Accessor<'ast>>,
        setter: Option<Accessor<'ast>>,
        span: Span,
    },
    /// A nested class.
    Class(&'ast ClassDecl<'ast>),
    /// Placeholder for a member the parser could not interpret.
    Error(Span),
}

/// A property `get` or `set` body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Accessor<'ast> {
    pub body: FuncBody<'ast>,
    pub span: Span,
}

/// A `#Name` directive line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Directive<'ast> {
    /// The directive name including the `#`.
    pub name: &'ast str,
    /// What argument shape the directive takes, `None` if unrecognized.
    pub kind: Option<DirectiveKind>,
    pub arg: DirectiveArg<'ast>,
    pub span: Span,
}

/// The argument of a directive.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DirectiveArg<'ast> {
    /// No argument.
    None,
    /// Verbatim text to end of line.
    Text { text: &'ast str, span: Span },
    /// A parsed expression or value argument.
    Expr(&'ast Expr<'ast>),
}

/// A hotkey definition: trigger plus the bound body.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hotkey<'ast> {
    /// The trigger text including the `::`, e.g. `^!s::`.
    pub trigger: &'ast str,
    pub trigger_span: Span,
    pub body: &'ast Stmt<'ast>,
    pub span: Span,
}

/// A key remap: `a::b`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Remap<'ast> {
    /// The trigger text including the `::`.
    pub trigger: &'ast str,
    pub trigger_span: Span,
    /// The destination key name.
    pub target: Ident<'ast>,
    pub span: Span,
}

/// A hotstring definition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hotstring<'ast> {
    /// The trigger text including options and both `::`, e.g. `:*:btw::`.
    pub trigger: &'ast str,
    pub trigger_span: Span,
    pub expansion: HotstringBody<'ast>,
    pub span: Span,
}

/// What a hotstring expands to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HotstringBody<'ast> {
    /// Literal replacement text.
    Text { text: &'ast str, span: Span },
    /// Executable body (the `X` option).
    Code(&'ast Stmt<'ast>),
}

/// One top-level element of a script.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SourceElement<'ast> {
    Class(&'ast ClassDecl<'ast>),
    Directive(&'ast Directive<'ast>),
    Hotkey(&'ast Hotkey<'ast>),
    Remap(&'ast Remap<'ast>),
    Hotstring(&'ast Hotstring<'ast>),
    Statement(&'ast Stmt<'ast>),
}

impl SourceElement<'_> {
    /// The source span this element covers.
    pub fn span(&self) -> Span {
        match self {
            SourceElement::Class(c) => c.span,
            SourceElement::Directive(d) => d.span,
            SourceElement::Hotkey(h) => h.span,
            SourceElement::Remap(r) => r.span,
            SourceElement::Hotstring(h) => h.span,
            SourceElement::Statement(s) => s.span(),
        }
    }
}
