//! Top-level script elements: classes, functions, directives, hotkeys,
//! remaps, and hotstrings.

use autohotkey_core::{DiagnosticKind, Span};
use bumpalo::collections::Vec as BumpVec;

use super::{Ident, Program};
use super::decl::{
    Accessor, ClassDecl, ClassMember, Directive, DirectiveArg, FuncBody, FunctionDecl, Hotkey,
    Hotstring, HotstringBody, Param, Remap, SourceElement,
};
use super::expr::Expr;
use super::parser::{ParseResult, Parser};
use super::stmt::Stmt;
use crate::lexer::{DirectiveKind, TokenKind, lookup_directive};

impl<'ast> Parser<'ast> {
    /// Parse the whole token buffer into a program. Total: every malformed
    /// region becomes an error node plus diagnostics.
    pub(crate) fn parse_program(&mut self) -> Program<'ast> {
        let mut elements = BumpVec::new_in(self.arena);
        self.skip_newlines();
        while !self.check(TokenKind::Eof) {
            if self.check(TokenKind::RightBrace) {
                // A stray '}' would otherwise stall both the statement
                // parser and synchronization.
                let diag = self.error_here(DiagnosticKind::UnexpectedToken, "unmatched '}'");
                self.report(diag);
                self.advance();
            } else {
                elements.push(self.parse_source_element());
            }
            self.skip_newlines();
        }
        let end = self.peek().span.end();
        let elements = elements.into_bump_slice();
        Program {
            elements,
            span: Span::new(0, end, 1, 1),
        }
    }

    fn parse_source_element(&mut self) -> SourceElement<'ast> {
        match self.peek_kind() {
            TokenKind::Class => match self.parse_class() {
                Ok(class) => SourceElement::Class(class),
                Err(diagnostic) => {
                    let span = diagnostic.span;
                    self.report(diagnostic);
                    self.synchronize();
                    SourceElement::Statement(self.alloc(Stmt::Error(span)))
                }
            },
            TokenKind::Directive => self.parse_directive(),
            TokenKind::HotkeyTrigger => self.parse_hotkey(),
            TokenKind::HotstringTrigger => self.parse_hotstring(),
            _ => SourceElement::Statement(self.parse_statement()),
        }
    }

    // ===== Classes =====

    fn parse_class(&mut self) -> ParseResult<&'ast ClassDecl<'ast>> {
        let kw = self.expect(TokenKind::Class)?;
        let name_token = self.expect(TokenKind::Identifier)?;
        let name = Ident::new(name_token.lexeme, name_token.span);

        let extends = if self.eat(TokenKind::Extends).is_some() {
            Some(self.parse_dotted_name()?)
        } else {
            None
        };

        self.skip_newlines();
        self.expect(TokenKind::LeftBrace)?;
        self.skip_newlines();

        let mut members = BumpVec::new_in(self.arena);
        while !self.check(TokenKind::RightBrace) && !self.check(TokenKind::Eof) {
            match self.parse_class_member() {
                Ok(member) => members.push(member),
                Err(diagnostic) => {
                    let span = diagnostic.span;
                    self.report(diagnostic);
                    self.synchronize();
                    members.push(ClassMember::Error(span));
                }
            }
            self.skip_newlines();
        }
        let close = self.expect(TokenKind::RightBrace)?;

        let members = members.into_bump_slice();
        Ok(self.alloc(ClassDecl {
            name,
            extends,
            members,
            span: kw.span.merge(close.span),
        }))
    }

    /// `Name` or `Outer.Inner`, as in an `extends` clause.
    fn parse_dotted_name(&mut self) -> ParseResult<&'ast Expr<'ast>> {
        let first = self.expect(TokenKind::Identifier)?;
        let mut expr: &'ast Expr<'ast> =
            self.alloc(Expr::Ident(Ident::new(first.lexeme, first.span)));
        while self.check(TokenKind::Dot) && !self.gap_before_current() {
            self.advance();
            expr = self.parse_member(expr, false)?;
        }
        Ok(expr)
    }

    fn parse_class_member(&mut self) -> ParseResult<ClassMember<'ast>> {
        let is_static = self.eat(TokenKind::Static).is_some();

        if self.check(TokenKind::Class) {
            let class = self.parse_class()?;
            return Ok(ClassMember::Class(class));
        }

        if self.check(TokenKind::Identifier) {
            if self.is_function_definition() {
                let func = self.parse_function_decl()?;
                return Ok(ClassMember::Method { is_static, func });
            }
            if matches!(
                self.peek_nth(1).kind,
                TokenKind::LeftBracket | TokenKind::LeftBrace | TokenKind::Arrow
            ) {
                return self.parse_property(is_static);
            }

            let name_token = self.advance();
            let name = Ident::new(name_token.lexeme, name_token.span);
            let value = if self.eat(TokenKind::Assign).is_some() {
                Some(self.parse_expression()?)
            } else {
                None
            };
            self.expect_eos()?;
            let span = value.map_or(name.span, |v| name.span.merge(v.span()));
            return Ok(ClassMember::Field {
                is_static,
                name,
                value,
                span,
            });
        }

        Err(self.error_here(
            DiagnosticKind::ExpectedClassMember,
            "expected a field, method, property, or nested class",
        ))
    }

    fn parse_property(&mut self, is_static: bool) -> ParseResult<ClassMember<'ast>> {
        let name_token = self.advance();
        let name = Ident::new(name_token.lexeme, name_token.span);

        let params: &'ast [Param<'ast>] = if self.eat(TokenKind::LeftBracket).is_some() {
            let params = self.parse_param_list(TokenKind::RightBracket)?;
            self.expect(TokenKind::RightBracket)?;
            params
        } else {
            &[]
        };

        // `Prop => expr` is shorthand for a lone getter.
        if self.eat(TokenKind::Arrow).is_some() {
            let body = self.parse_expression()?;
            self.expect_eos()?;
            let span = name.span.merge(body.span());
            return Ok(ClassMember::Property {
                is_static,
                name,
                params,
                getter: Some(Accessor {
                    body: FuncBody::Expr(body),
                    span,
                }),
                setter: None,
                span,
            });
        }

        self.skip_newlines();
        self.expect(TokenKind::LeftBrace)?;
        self.skip_newlines();

        let mut getter = None;
        let mut setter = None;
        while !self.check(TokenKind::RightBrace) && !self.check(TokenKind::Eof) {
            let word = self.peek();
            let is_get = word.lexeme.eq_ignore_ascii_case("get");
            let is_set = word.lexeme.eq_ignore_ascii_case("set");
            if word.kind != TokenKind::Identifier || !(is_get || is_set) {
                return Err(self.error_here(
                    DiagnosticKind::InvalidDeclaration,
                    "expected 'get' or 'set' in a property body",
                ));
            }
            self.advance();

            let body = if self.eat(TokenKind::Arrow).is_some() {
                let expr = self.parse_expression()?;
                self.expect_eos()?;
                FuncBody::Expr(expr)
            } else {
                self.skip_newlines();
                FuncBody::Block(self.parse_block()?)
            };
            let end = match body {
                FuncBody::Expr(e) => e.span(),
                FuncBody::Block(s) => s.span(),
            };
            let accessor = Accessor {
                body,
                span: word.span.merge(end),
            };
            if is_get {
                getter = Some(accessor);
            } else {
                setter = Some(accessor);
            }
            self.skip_newlines();
        }
        let close = self.expect(TokenKind::RightBrace)?;
        self.expect_eos()?;

        Ok(ClassMember::Property {
            is_static,
            name,
            params,
            getter,
            setter,
            span: name.span.merge(close.span),
        })
    }

    // ===== Functions =====

    pub(crate) fn parse_function_decl(&mut self) -> ParseResult<&'ast FunctionDecl<'ast>> {
        let name_token = self.expect(TokenKind::Identifier)?;
        let name = Ident::new(name_token.lexeme, name_token.span);

        self.expect(TokenKind::LeftParen)?;
        let params = self.parse_param_list(TokenKind::RightParen)?;
        self.expect(TokenKind::RightParen)?;

        let body = if self.eat(TokenKind::Arrow).is_some() {
            let expr = self.parse_expression()?;
            self.expect_eos()?;
            FuncBody::Expr(expr)
        } else {
            self.skip_newlines();
            FuncBody::Block(self.parse_block()?)
        };
        let end = match body {
            FuncBody::Expr(e) => e.span(),
            FuncBody::Block(s) => s.span(),
        };

        Ok(self.alloc(FunctionDecl {
            name,
            params,
            body,
            span: name.span.merge(end),
        }))
    }

    /// The formal parameters up to (not including) `close`.
    pub(crate) fn parse_param_list(
        &mut self,
        close: TokenKind,
    ) -> ParseResult<&'ast [Param<'ast>]> {
        let mut params = BumpVec::new_in(self.arena);
        while !self.check(close) && !self.check(TokenKind::Eof) {
            let by_ref = self.eat(TokenKind::Amp).is_some();
            let name_token = self.expect(TokenKind::Identifier)?;
            let name = Ident::new(name_token.lexeme, name_token.span);

            let variadic = self.eat(TokenKind::Star).is_some();
            let default = if self.eat(TokenKind::Assign).is_some() {
                Some(self.parse_expression()?)
            } else if let Some(q) = self.eat(TokenKind::Question) {
                // `name?` marks the parameter omittable, same as `:= unset`.
                Some(self.alloc(Expr::Unset(q.span)))
            } else {
                None
            };

            let end = default.map_or(name.span, |d| d.span());
            params.push(Param {
                name,
                by_ref,
                default,
                variadic,
                span: name.span.merge(end),
            });
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        Ok(params.into_bump_slice())
    }

    // ===== Directives =====

    fn parse_directive(&mut self) -> SourceElement<'ast> {
        let token = self.advance();
        let name = token.lexeme;
        let kind = lookup_directive(&name[1..]);

        if kind.is_none() {
            let diag = autohotkey_core::Diagnostic::warning(
                DiagnosticKind::InvalidDirective,
                token.span,
                format!("unknown directive '{name}'"),
            );
            self.report(diag);
        }

        let arg = match kind {
            Some(DirectiveKind::Text) | None => {
                if let Some(text) = self.eat(TokenKind::DirectiveText) {
                    DirectiveArg::Text {
                        text: text.lexeme,
                        span: text.span,
                    }
                } else {
                    DirectiveArg::None
                }
            }
            Some(DirectiveKind::Bare) => DirectiveArg::None,
            Some(DirectiveKind::Number) | Some(DirectiveKind::HotIf) => {
                if self.at_eos() {
                    DirectiveArg::None
                } else {
                    match self.parse_expression() {
                        Ok(expr) => DirectiveArg::Expr(expr),
                        Err(diagnostic) => {
                            let span = diagnostic.span;
                            self.report(diagnostic);
                            DirectiveArg::Expr(self.alloc(Expr::Error(span)))
                        }
                    }
                }
            }
            // The word argument is optional: bare `#SingleInstance` is valid.
            Some(DirectiveKind::Word) if self.at_eos() => DirectiveArg::None,
            Some(DirectiveKind::Word) => match self.expect(TokenKind::Identifier) {
                Ok(word) => {
                    DirectiveArg::Expr(self.alloc(Expr::Ident(Ident::new(word.lexeme, word.span))))
                }
                Err(diagnostic) => {
                    self.report(diagnostic);
                    DirectiveArg::None
                }
            },
        };

        if let Err(diagnostic) = self.expect_eos() {
            self.report(diagnostic);
            self.synchronize();
        }

        let end = match arg {
            DirectiveArg::None => token.span,
            DirectiveArg::Text { span, .. } => span,
            DirectiveArg::Expr(e) => e.span(),
        };
        SourceElement::Directive(self.alloc(Directive {
            name,
            kind,
            arg,
            span: token.span.merge(end),
        }))
    }

    // ===== Hotkeys and hotstrings =====

    fn parse_hotkey(&mut self) -> SourceElement<'ast> {
        let trigger = self.advance();

        // `a::b` with a bare name as the whole body remaps one key to
        // another rather than running code.
        if self.check(TokenKind::Identifier)
            && matches!(self.peek_nth(1).kind, TokenKind::Eol | TokenKind::Eof)
        {
            let target_token = self.advance();
            let target = Ident::new(target_token.lexeme, target_token.span);
            self.skip_newlines();
            return SourceElement::Remap(self.alloc(Remap {
                trigger: trigger.lexeme,
                trigger_span: trigger.span,
                target,
                span: trigger.span.merge(target.span),
            }));
        }

        let body = if self.check(TokenKind::Eol) {
            self.skip_newlines();
            if self.check(TokenKind::Eof) {
                let diag = self.error_here(
                    DiagnosticKind::InvalidHotkey,
                    "hotkey has no body",
                );
                let span = diag.span;
                self.report(diag);
                self.alloc(Stmt::Error(span))
            } else {
                self.parse_statement()
            }
        } else {
            self.parse_statement()
        };

        SourceElement::Hotkey(self.alloc(Hotkey {
            trigger: trigger.lexeme,
            trigger_span: trigger.span,
            body,
            span: trigger.span.merge(body.span()),
        }))
    }

    fn parse_hotstring(&mut self) -> SourceElement<'ast> {
        let trigger = self.advance();

        let expansion = if let Some(text) = self.eat(TokenKind::HotstringText) {
            if let Err(diagnostic) = self.expect_eos() {
                self.report(diagnostic);
                self.synchronize();
            }
            HotstringBody::Text {
                text: text.lexeme,
                span: text.span,
            }
        } else if self.at_eos() {
            // `::btw::` with nothing after it replaces with the empty string.
            self.skip_newlines();
            HotstringBody::Text {
                text: "",
                span: Span::point(trigger.span.end(), trigger.span.line, trigger.span.col),
            }
        } else {
            HotstringBody::Code(self.parse_statement())
        };

        let end = match expansion {
            HotstringBody::Text { span, .. } => span,
            HotstringBody::Code(stmt) => stmt.span(),
        };
        SourceElement::Hotstring(self.alloc(Hotstring {
            trigger: trigger.lexeme,
            trigger_span: trigger.span,
            expansion,
            span: trigger.span.merge(end),
        }))
    }
}
