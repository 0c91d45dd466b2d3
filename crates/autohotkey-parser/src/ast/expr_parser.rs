//! Expression parsing via precedence climbing.
//!
//! One loop handles every infix and postfix form: after a prefix term it
//! repeatedly checks, in order, postfix `++`/`--`, member access, calls,
//! indexing, the ternary, assignment, named binary operators, and finally
//! implicit concatenation (two terms separated by whitespace). Each form
//! proceeds only while its binding power is at least the minimum the caller
//! passed, which is what encodes precedence and associativity.

use autohotkey_core::{Diagnostic, DiagnosticKind, Span};
use bumpalo::collections::Vec as BumpVec;

use super::Ident;
use super::expr::{DynamicPart, Expr, ObjectEntry};
use super::ops::{AssignOp, BinaryOp, POSTFIX_BP, PostfixOp, TERNARY_BP, UnaryOp};
use super::parser::{ParseResult, Parser};
use crate::lexer::TokenKind;

impl<'ast> Parser<'ast> {
    /// Parse a full expression.
    pub(crate) fn parse_expression(&mut self) -> ParseResult<&'ast Expr<'ast>> {
        self.parse_expr_bp(0)
    }

    /// Parse an expression whose operators all bind at least as tightly as
    /// `min_bp`.
    pub(crate) fn parse_expr_bp(&mut self, min_bp: u8) -> ParseResult<&'ast Expr<'ast>> {
        let mut lhs = self.parse_prefix()?;

        loop {
            let token = self.peek();

            if let Some(op) = PostfixOp::from_token(token.kind) {
                if POSTFIX_BP < min_bp {
                    break;
                }
                self.advance();
                let span = lhs.span().merge(token.span);
                lhs = self.alloc(Expr::Postfix {
                    op,
                    operand: lhs,
                    span,
                });
                continue;
            }

            if matches!(token.kind, TokenKind::Dot | TokenKind::QuestionDot) {
                if POSTFIX_BP < min_bp {
                    break;
                }
                self.advance();
                lhs = self.parse_member(lhs, token.kind == TokenKind::QuestionDot)?;
                continue;
            }

            // A call or index requires the bracket glued to the callee;
            // with a space the bracket starts a fresh term instead.
            if token.kind == TokenKind::LeftParen && !self.gap_before_current() {
                if POSTFIX_BP < min_bp {
                    break;
                }
                self.advance();
                let args = self.parse_expr_list(TokenKind::RightParen)?;
                let close = self.expect(TokenKind::RightParen)?;
                let span = lhs.span().merge(close.span);
                lhs = self.alloc(Expr::Call {
                    callee: lhs,
                    args,
                    span,
                });
                continue;
            }

            if token.kind == TokenKind::LeftBracket && !self.gap_before_current() {
                if POSTFIX_BP < min_bp {
                    break;
                }
                self.advance();
                let args = self.parse_expr_list(TokenKind::RightBracket)?;
                let close = self.expect(TokenKind::RightBracket)?;
                let span = lhs.span().merge(close.span);
                lhs = self.alloc(Expr::Index {
                    object: lhs,
                    args,
                    span,
                });
                continue;
            }

            if token.kind == TokenKind::Question {
                if TERNARY_BP < min_bp {
                    break;
                }
                self.advance();
                let then_branch = self.parse_expr_bp(0)?;
                self.expect(TokenKind::Colon)?;
                // Right-associative: `a ? b : c ? d : e` nests to the right.
                let else_branch = self.parse_expr_bp(TERNARY_BP - 1)?;
                let span = lhs.span().merge(else_branch.span());
                lhs = self.alloc(Expr::Ternary {
                    cond: lhs,
                    then_branch,
                    else_branch,
                    span,
                });
                continue;
            }

            if let Some(op) = AssignOp::from_token(token.kind) {
                let (l_bp, r_bp) = op.binding_power();
                if l_bp < min_bp {
                    break;
                }
                if !lhs.is_assignable() {
                    self.report(Diagnostic::error(
                        DiagnosticKind::InvalidAssignmentTarget,
                        lhs.span(),
                        format!("cannot assign with '{op}' to this expression"),
                    ));
                }
                self.advance();
                let value = self.parse_expr_bp(r_bp)?;
                let span = lhs.span().merge(value.span());
                lhs = self.alloc(Expr::Assign {
                    op,
                    target: lhs,
                    value,
                    span,
                });
                continue;
            }

            if let Some(op) = BinaryOp::from_token(token.kind) {
                let (l_bp, r_bp) = op.binding_power();
                if l_bp < min_bp {
                    break;
                }
                self.advance();
                let rhs = self.parse_expr_bp(r_bp)?;
                let span = lhs.span().merge(rhs.span());
                lhs = self.alloc(Expr::Binary { op, lhs, rhs, span });
                continue;
            }

            // Implicit concatenation: `x := "a" var` joins adjacent terms.
            // Requires a whitespace gap; `{` is excluded because after an
            // expression it always opens a block.
            if token.kind.starts_term()
                && token.kind != TokenKind::LeftBrace
                && self.gap_before_current()
            {
                let (l_bp, r_bp) = BinaryOp::Concat.binding_power();
                if l_bp < min_bp {
                    break;
                }
                let rhs = self.parse_expr_bp(r_bp)?;
                let span = lhs.span().merge(rhs.span());
                lhs = self.alloc(Expr::Binary {
                    op: BinaryOp::Concat,
                    lhs,
                    rhs,
                    span,
                });
                continue;
            }

            break;
        }

        Ok(lhs)
    }

    fn parse_prefix(&mut self) -> ParseResult<&'ast Expr<'ast>> {
        let token = self.peek();
        match token.kind {
            TokenKind::IntLiteral => {
                self.advance();
                Ok(self.alloc(Expr::Int {
                    lexeme: token.lexeme,
                    span: token.span,
                }))
            }
            TokenKind::FloatLiteral => {
                self.advance();
                Ok(self.alloc(Expr::Float {
                    lexeme: token.lexeme,
                    span: token.span,
                }))
            }
            TokenKind::StringLiteral => {
                self.advance();
                Ok(self.alloc(Expr::Str {
                    lexeme: token.lexeme,
                    span: token.span,
                }))
            }
            TokenKind::True | TokenKind::False => {
                self.advance();
                Ok(self.alloc(Expr::Bool {
                    value: token.kind == TokenKind::True,
                    span: token.span,
                }))
            }
            TokenKind::Unset => {
                self.advance();
                Ok(self.alloc(Expr::Unset(token.span)))
            }
            TokenKind::This => {
                self.advance();
                Ok(self.alloc(Expr::This(token.span)))
            }
            TokenKind::Super => {
                self.advance();
                Ok(self.alloc(Expr::Super(token.span)))
            }
            TokenKind::Base => {
                self.advance();
                Ok(self.alloc(Expr::Base(token.span)))
            }
            TokenKind::Identifier => {
                // `x => x * 2` single-parameter fat arrow.
                if self.peek_nth(1).kind == TokenKind::Arrow {
                    return self.parse_single_param_arrow();
                }
                self.parse_name_or_dynamic()
            }
            TokenKind::DerefStart => self.parse_name_or_dynamic(),
            TokenKind::LeftParen => {
                if self.arrow_follows_paren_group() {
                    self.parse_paren_arrow()
                } else {
                    self.advance();
                    let inner = self.parse_expression()?;
                    self.expect(TokenKind::RightParen)?;
                    Ok(inner)
                }
            }
            TokenKind::LeftBracket => self.parse_array_literal(),
            TokenKind::LeftBrace => self.parse_object_literal(),
            TokenKind::Amp => {
                self.advance();
                let operand = self.parse_expr_bp(UnaryOp::LogicalNot.binding_power())?;
                let span = token.span.merge(operand.span());
                Ok(self.alloc(Expr::VarRef {
                    expr: operand,
                    span,
                }))
            }
            _ => {
                if let Some(op) = UnaryOp::from_token(token.kind) {
                    self.advance();
                    let operand = self.parse_expr_bp(op.binding_power())?;
                    let span = token.span.merge(operand.span());
                    return Ok(self.alloc(Expr::Unary { op, operand, span }));
                }
                Err(Diagnostic::error(
                    DiagnosticKind::ExpectedExpression,
                    token.span,
                    format!("expected expression, found {}", token.kind),
                ))
            }
        }
    }

    /// Parse a name made of identifier and `%...%` pieces. A single plain
    /// piece is an [`Expr::Ident`], a single deref is [`Expr::Deref`], and
    /// any glued mix is a dynamic identifier.
    fn parse_name_or_dynamic(&mut self) -> ParseResult<&'ast Expr<'ast>> {
        let mut parts = BumpVec::new_in(self.arena);

        loop {
            match self.peek_kind() {
                TokenKind::Identifier if parts.is_empty() || !self.gap_before_current() => {
                    let token = self.advance();
                    parts.push(DynamicPart::Literal {
                        text: token.lexeme,
                        span: token.span,
                    });
                }
                TokenKind::DerefStart if parts.is_empty() || !self.gap_before_current() => {
                    let open = self.advance();
                    let expr = self.parse_expression()?;
                    let close = self.expect(TokenKind::DerefEnd)?;
                    parts.push(DynamicPart::Deref {
                        expr,
                        span: open.span.merge(close.span),
                    });
                }
                _ => break,
            }
        }

        match parts.as_slice() {
            [] => Err(self.error_here(DiagnosticKind::ExpectedIdentifier, "expected a name")),
            [DynamicPart::Literal { text, span }] => {
                Ok(self.alloc(Expr::Ident(Ident::new(text, *span))))
            }
            [DynamicPart::Deref { expr, span }] => {
                Ok(self.alloc(Expr::Deref { expr, span: *span }))
            }
            _ => {
                let span = parts
                    .iter()
                    .map(|p| match p {
                        DynamicPart::Literal { span, .. } => *span,
                        DynamicPart::Deref { span, .. } => *span,
                    })
                    .reduce(Span::merge)
                    .unwrap_or_default();
                let parts = parts.into_bump_slice();
                Ok(self.alloc(Expr::DynamicIdent { parts, span }))
            }
        }
    }

    /// Parse the property after a consumed `.` or `?.`.
    pub(crate) fn parse_member(
        &mut self,
        object: &'ast Expr<'ast>,
        optional: bool,
    ) -> ParseResult<&'ast Expr<'ast>> {
        let token = self.peek();
        // Keywords are fine as property names: `obj.default`, `obj.base`.
        let property: &'ast Expr<'ast> = if token.kind == TokenKind::Identifier
            || token.kind.is_keyword()
        {
            self.advance();
            self.alloc(Expr::Ident(Ident::new(token.lexeme, token.span)))
        } else if token.kind == TokenKind::DerefStart {
            self.parse_name_or_dynamic()?
        } else {
            return Err(Diagnostic::error(
                DiagnosticKind::ExpectedIdentifier,
                token.span,
                format!("expected property name, found {}", token.kind),
            ));
        };
        let span = object.span().merge(property.span());
        Ok(self.alloc(Expr::Member {
            object,
            property,
            optional,
            span,
        }))
    }

    /// Parse a comma-separated expression list up to (not including) the
    /// closing token. Allows a trailing comma.
    pub(crate) fn parse_expr_list(
        &mut self,
        close: TokenKind,
    ) -> ParseResult<&'ast [Expr<'ast>]> {
        let mut items = BumpVec::new_in(self.arena);
        if !self.check(close) {
            loop {
                items.push(*self.parse_expression()?);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
                if self.check(close) {
                    break;
                }
            }
        }
        Ok(items.into_bump_slice())
    }

    fn parse_array_literal(&mut self) -> ParseResult<&'ast Expr<'ast>> {
        let open = self.expect(TokenKind::LeftBracket)?;
        let elements = self.parse_expr_list(TokenKind::RightBracket)?;
        let close = self.expect(TokenKind::RightBracket)?;
        Ok(self.alloc(Expr::ArrayLit {
            elements,
            span: open.span.merge(close.span),
        }))
    }

    fn parse_object_literal(&mut self) -> ParseResult<&'ast Expr<'ast>> {
        let open = self.expect(TokenKind::LeftBrace)?;
        let mut entries = BumpVec::new_in(self.arena);

        if !self.check(TokenKind::RightBrace) {
            loop {
                let key = self.parse_object_key()?;
                self.expect(TokenKind::Colon)?;
                let value = self.parse_expression()?;
                entries.push(ObjectEntry {
                    key,
                    value,
                    span: key.span().merge(value.span()),
                });
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
                if self.check(TokenKind::RightBrace) {
                    break;
                }
            }
        }

        let close = self.expect(TokenKind::RightBrace)?;
        let entries = entries.into_bump_slice();
        Ok(self.alloc(Expr::ObjectLit {
            entries,
            span: open.span.merge(close.span),
        }))
    }

    fn parse_object_key(&mut self) -> ParseResult<&'ast Expr<'ast>> {
        let token = self.peek();
        match token.kind {
            TokenKind::Identifier | TokenKind::DerefStart => self.parse_name_or_dynamic(),
            TokenKind::StringLiteral => {
                self.advance();
                Ok(self.alloc(Expr::Str {
                    lexeme: token.lexeme,
                    span: token.span,
                }))
            }
            k if k.is_keyword() => {
                self.advance();
                Ok(self.alloc(Expr::Ident(Ident::new(token.lexeme, token.span))))
            }
            _ => Err(Diagnostic::error(
                DiagnosticKind::ExpectedIdentifier,
                token.span,
                format!("expected object key, found {}", token.kind),
            )),
        }
    }

    /// Whether the parenthesized group at the current `(` is followed by
    /// `=>`, i.e. is a fat-arrow parameter list.
    fn arrow_follows_paren_group(&mut self) -> bool {
        debug_assert_eq!(self.peek_kind(), TokenKind::LeftParen);
        self.mark();
        self.advance();
        let mut depth = 1u32;
        while depth > 0 {
            match self.peek_kind() {
                TokenKind::LeftParen => depth += 1,
                TokenKind::RightParen => depth -= 1,
                TokenKind::Eof | TokenKind::Eol => break,
                _ => {}
            }
            self.advance();
        }
        let found = depth == 0 && self.check(TokenKind::Arrow);
        self.reset();
        found
    }

    fn parse_single_param_arrow(&mut self) -> ParseResult<&'ast Expr<'ast>> {
        let name = self.expect(TokenKind::Identifier)?;
        let params = self.alloc_single_param(name.lexeme, name.span);
        self.expect(TokenKind::Arrow)?;
        let body = self.parse_expr_bp(TERNARY_BP - 1)?;
        let span = name.span.merge(body.span());
        Ok(self.alloc(Expr::FatArrow { params, body, span }))
    }

    fn parse_paren_arrow(&mut self) -> ParseResult<&'ast Expr<'ast>> {
        let open = self.expect(TokenKind::LeftParen)?;
        let params = self.parse_param_list(TokenKind::RightParen)?;
        self.expect(TokenKind::RightParen)?;
        self.expect(TokenKind::Arrow)?;
        let body = self.parse_expr_bp(TERNARY_BP - 1)?;
        let span = open.span.merge(body.span());
        Ok(self.alloc(Expr::FatArrow { params, body, span }))
    }

    fn alloc_single_param(
        &self,
        name: &'ast str,
        span: Span,
    ) -> &'ast [super::decl::Param<'ast>] {
        let mut params = BumpVec::new_in(self.arena);
        params.push(super::decl::Param {
            name: Ident::new(name, span),
            by_ref: false,
            default: None,
            variadic: false,
            span,
        });
        params.into_bump_slice()
    }
}
