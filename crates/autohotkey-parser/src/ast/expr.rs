//! Expression nodes.
//!
//! Nodes are arena-allocated; children are `&'ast` references and lists are
//! arena slices. Every node carries the span of the source text it covers,
//! and a dedicated [`Expr::Error`] variant marks regions the parser had to
//! give up on so the tree stays complete under recovery.

use autohotkey_core::Span;

use super::Ident;
use super::decl::Param;
use super::ops::{AssignOp, BinaryOp, PostfixOp, UnaryOp};

/// An expression.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Expr<'ast> {
    /// Integer literal, lexeme kept verbatim: `42`, `0xFF`
    Int { lexeme: &'ast str, span: Span },
    /// Float literal: `3.14`, `1e3`
    Float { lexeme: &'ast str, span: Span },
    /// String literal including quotes: `"hi"`
    Str { lexeme: &'ast str, span: Span },
    /// `true` / `false`
    Bool { value: bool, span: Span },
    /// `unset`
    Unset(Span),
    /// `this`
    This(Span),
    /// `super`
    Super(Span),
    /// `base`
    Base(Span),
    /// A plain variable or function name
    Ident(Ident<'ast>),
    /// A name built from literal and `%...%` pieces: `arr%i%x`
    DynamicIdent {
        parts: &'ast [DynamicPart<'ast>],
        span: Span,
    },
    /// A standalone dereference: `%name%`
    Deref { expr: &'ast Expr<'ast>, span: Span },
    /// `&x` variable reference
    VarRef { expr: &'ast Expr<'ast>, span: Span },
    /// Prefix operator application
    Unary {
        op: UnaryOp,
        operand: &'ast Expr<'ast>,
        span: Span,
    },
    /// `x++` / `x--`
    Postfix {
        op: PostfixOp,
        operand: &'ast Expr<'ast>,
        span: Span,
    },
    /// Infix operator application, including implicit concatenation
    Binary {
        op: BinaryOp,
        lhs: &'ast Expr<'ast>,
        rhs: &'ast Expr<'ast>,
        span: Span,
    },
    /// `target := value` and the compound forms
    Assign {
        op: AssignOp,
        target: &'ast Expr<'ast>,
        value: &'ast Expr<'ast>,
        span: Span,
    },
    /// `cond ? a : b`
    Ternary {
        cond: &'ast Expr<'ast>,
        then_branch: &'ast Expr<'ast>,
        else_branch: &'ast Expr<'ast>,
        span: Span,
    },
    /// `f(a, b)`
    Call {
        callee: &'ast Expr<'ast>,
        args: &'ast [Expr<'ast>],
        span: Span,
    },
    /// `a.b`, `a?.b`, or `a.%name%`
    Member {
        object: &'ast Expr<'ast>,
        property: &'ast Expr<'ast>,
        optional: bool,
        span: Span,
    },
    /// `a[i]` (possibly multi-argument: `grid[x, y]`)
    Index {
        object: &'ast Expr<'ast>,
        args: &'ast [Expr<'ast>],
        span: Span,
    },
    /// `[1, 2, 3]`
    ArrayLit {
        elements: &'ast [Expr<'ast>],
        span: Span,
    },
    /// `{key: value, ...}`
    ObjectLit {
        entries: &'ast [ObjectEntry<'ast>],
        span: Span,
    },
    /// `(a, b) => a + b` or `x => x * 2`
    FatArrow {
        params: &'ast [Param<'ast>],
        body: &'ast Expr<'ast>,
        span: Span,
    },
    /// Placeholder for source the parser could not interpret.
    Error(Span),
}

/// One piece of a dynamic identifier.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DynamicPart<'ast> {
    /// A literal name fragment.
    Literal { text: &'ast str, span: Span },
    /// A `%...%` dereference fragment.
    Deref { expr: &'ast Expr<'ast>, span: Span },
}

/// One `key: value` entry in an object literal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ObjectEntry<'ast> {
    pub key: &'ast Expr<'ast>,
    pub value: &'ast Expr<'ast>,
    pub span: Span,
}

impl Expr<'_> {
    /// The source span this expression covers.
    pub fn span(&self) -> Span {
        match self {
            Expr::Int { span, .. }
            | Expr::Float { span, .. }
            | Expr::Str { span, .. }
            | Expr::Bool { span, .. }
            | Expr::DynamicIdent { span, .. }
            | Expr::Deref { span, .. }
            | Expr::VarRef { span, .. }
            | Expr::Unary { span, .. }
            | Expr::Postfix { span, .. }
            | Expr::Binary { span, .. }
            | Expr::Assign { span, .. }
            | Expr::Ternary { span, .. }
            | Expr::Call { span, .. }
            | Expr::Member { span, .. }
            | Expr::Index { span, .. }
            | Expr::ArrayLit { span, .. }
            | Expr::ObjectLit { span, .. }
            | Expr::FatArrow { span, .. } => *span,
            Expr::Unset(span)
            | Expr::This(span)
            | Expr::Super(span)
            | Expr::Base(span)
            | Expr::Error(span) => *span,
            Expr::Ident(ident) => ident.span,
        }
    }

    /// Whether this expression can appear on the left of an assignment.
    ///
    /// Valid targets are names (plain or dynamic), member accesses, index
    /// expressions, and dereferences. Error nodes count so recovery does not
    /// cascade a second diagnostic.
    pub fn is_assignable(&self) -> bool {
        matches!(
            self,
            Expr::Ident(_)
                | Expr::DynamicIdent { .. }
                | Expr::Deref { .. }
                | Expr::Member { .. }
                | Expr::Index { .. }
                | Expr::Error(_)
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn assignable_targets() {
        let span = Span::new(0, 1, 1, 1);
        let ident = Expr::Ident(Ident { name: "x", span });
        assert!(ident.is_assignable());

        let int = Expr::Int { lexeme: "1", span };
        assert!(!int.is_assignable());

        let member = Expr::Member {
            object: &ident,
            property: &ident,
            optional: false,
            span,
        };
        assert!(member.is_assignable());

        let call = Expr::Call {
            callee: &ident,
            args: &[],
            span,
        };
        assert!(!call.is_assignable());
    }

    #[test]
    fn span_accessor() {
        let span = Span::new(3, 4, 1, 4);
        assert_eq!(Expr::Error(span).span(), span);
        assert_eq!(Expr::Unset(span).span(), span);
        assert_eq!(Expr::Ident(Ident { name: "a", span }).span(), span);
    }
}
