//! Statement parsing.
//!
//! `parse_statement` is the recovery boundary: productions below it return
//! `Result` and bail with `?`, and the wrapper turns a failure into a
//! diagnostic plus a [`Stmt::Error`] node, then skips to the next line.
//! Flow-control headers recover their condition and body separately, so a
//! broken `if` still produces an `If` node with error children rather than
//! dissolving the whole statement.

use autohotkey_core::DiagnosticKind;
use bumpalo::collections::Vec as BumpVec;

use super::Ident;
use super::expr::Expr;
use super::parser::{ParseResult, Parser};
use super::stmt::{CaseClause, CatchClause, Scope, Stmt, VarInit};
use crate::lexer::TokenKind;

impl<'ast> Parser<'ast> {
    /// Parse one statement, recovering to the next line on error.
    pub(crate) fn parse_statement(&mut self) -> &'ast Stmt<'ast> {
        match self.try_statement() {
            Ok(stmt) => stmt,
            Err(diagnostic) => {
                let span = diagnostic.span;
                self.report(diagnostic);
                self.synchronize();
                self.alloc(Stmt::Error(span))
            }
        }
    }

    pub(crate) fn try_statement(&mut self) -> ParseResult<&'ast Stmt<'ast>> {
        match self.peek_kind() {
            TokenKind::If => self.parse_if(),
            TokenKind::While => self.parse_while(),
            TokenKind::Loop => self.parse_loop(),
            TokenKind::For => self.parse_for(),
            TokenKind::Break | TokenKind::Continue => self.parse_break_continue(),
            TokenKind::Return => self.parse_return(),
            TokenKind::Goto => self.parse_goto(),
            TokenKind::Switch => self.parse_switch(),
            TokenKind::Throw => self.parse_throw(),
            TokenKind::Try => self.parse_try(),
            TokenKind::Global | TokenKind::Local | TokenKind::Static => self.parse_var_decl(),
            TokenKind::LeftBrace => self.parse_block(),
            TokenKind::Case | TokenKind::Default => Err(self.error_here(
                DiagnosticKind::InvalidCaseClause,
                "case clause outside of a switch",
            )),
            TokenKind::Else => Err(self.error_here(
                DiagnosticKind::InvalidStatement,
                "'else' without a matching 'if'",
            )),
            TokenKind::Until => Err(self.error_here(
                DiagnosticKind::InvalidStatement,
                "'until' without a matching loop",
            )),
            TokenKind::Catch | TokenKind::Finally => Err(self.error_here(
                DiagnosticKind::InvalidStatement,
                "handler clause without a matching 'try'",
            )),
            TokenKind::Identifier => {
                if self.is_label() {
                    self.parse_label()
                } else if self.is_function_definition() {
                    let func = self.parse_function_decl()?;
                    Ok(self.alloc(Stmt::FunctionDecl(func)))
                } else if self.is_command_statement() {
                    self.parse_command()
                } else {
                    self.parse_expr_statement()
                }
            }
            _ => self.parse_expr_statement(),
        }
    }

    // ===== Recovery helpers =====

    /// Parse an expression; on failure record the diagnostic, skip the rest
    /// of the line, and substitute an error node.
    pub(crate) fn parse_expr_or_error(&mut self) -> &'ast Expr<'ast> {
        match self.parse_expression() {
            Ok(expr) => expr,
            Err(diagnostic) => {
                let span = diagnostic.span;
                self.report(diagnostic);
                while !self.at_eos() {
                    self.advance();
                }
                self.alloc(Expr::Error(span))
            }
        }
    }

    /// Parse a flow-control body; on failure substitute an error node.
    fn parse_body_or_error(&mut self) -> &'ast Stmt<'ast> {
        match self.parse_flow_body() {
            Ok(stmt) => stmt,
            Err(diagnostic) => {
                let span = diagnostic.span;
                self.report(diagnostic);
                self.synchronize();
                self.alloc(Stmt::Error(span))
            }
        }
    }

    /// The body of a flow statement: a brace block (same line or the next),
    /// or a single statement.
    fn parse_flow_body(&mut self) -> ParseResult<&'ast Stmt<'ast>> {
        if self.check(TokenKind::LeftBrace) {
            return self.parse_block();
        }
        if self.check(TokenKind::Eol) {
            self.skip_newlines();
            if self.check(TokenKind::LeftBrace) {
                return self.parse_block();
            }
            if self.check(TokenKind::Eof) || self.check(TokenKind::RightBrace) {
                return Err(self.error_here(
                    DiagnosticKind::ExpectedBlock,
                    "expected a body for this statement",
                ));
            }
            return self.try_statement();
        }
        if self.check(TokenKind::Eof) || self.check(TokenKind::RightBrace) {
            return Err(self.error_here(
                DiagnosticKind::ExpectedBlock,
                "expected a body for this statement",
            ));
        }
        self.try_statement()
    }

    /// `{ stmt* }`
    pub(crate) fn parse_block(&mut self) -> ParseResult<&'ast Stmt<'ast>> {
        let open = self.expect(TokenKind::LeftBrace)?;
        self.skip_newlines();
        let mut stmts = BumpVec::new_in(self.arena);
        while !self.check(TokenKind::RightBrace) && !self.check(TokenKind::Eof) {
            stmts.push(*self.parse_statement());
            self.skip_newlines();
        }
        let close = self.expect(TokenKind::RightBrace)?;
        let stmts = stmts.into_bump_slice();
        Ok(self.alloc(Stmt::Block {
            stmts,
            span: open.span.merge(close.span),
        }))
    }

    // ===== Flow control =====

    fn parse_if(&mut self) -> ParseResult<&'ast Stmt<'ast>> {
        let kw = self.advance();
        let cond = self.parse_expr_or_error();
        let then_branch = self.parse_body_or_error();
        let else_branch = self.parse_else_tail();
        let end = else_branch.map_or(then_branch.span(), |s| s.span());
        Ok(self.alloc(Stmt::If {
            cond,
            then_branch,
            else_branch,
            span: kw.span.merge(end),
        }))
    }

    /// `else` may sit on the same line as the closing brace or on the next.
    fn parse_else_tail(&mut self) -> Option<&'ast Stmt<'ast>> {
        self.mark();
        self.skip_newlines();
        if self.check(TokenKind::Else) {
            self.release();
            self.advance();
            Some(self.parse_body_or_error())
        } else {
            self.reset();
            None
        }
    }

    /// `until cond` after a loop body, same line or the next.
    fn parse_until_tail(&mut self) -> Option<&'ast Expr<'ast>> {
        self.mark();
        self.skip_newlines();
        if self.check(TokenKind::Until) {
            self.release();
            self.advance();
            let cond = self.parse_expr_or_error();
            if let Err(diagnostic) = self.expect_eos() {
                self.report(diagnostic);
                self.synchronize();
            }
            Some(cond)
        } else {
            self.reset();
            None
        }
    }

    fn parse_while(&mut self) -> ParseResult<&'ast Stmt<'ast>> {
        let kw = self.advance();
        let cond = self.parse_expr_or_error();
        let body = self.parse_body_or_error();
        Ok(self.alloc(Stmt::While {
            cond,
            body,
            span: kw.span.merge(body.span()),
        }))
    }

    fn parse_loop(&mut self) -> ParseResult<&'ast Stmt<'ast>> {
        let kw = self.advance();

        if let Some(kind) = self.loop_specialization() {
            self.advance();
            let mut args = BumpVec::new_in(self.arena);
            if !self.at_eos() && !self.check(TokenKind::LeftBrace) {
                loop {
                    args.push(*self.parse_expression()?);
                    if self.eat(TokenKind::Comma).is_none() {
                        break;
                    }
                }
            }
            let args = args.into_bump_slice();
            let body = self.parse_body_or_error();
            let until = self.parse_until_tail();
            let else_branch = self.parse_else_tail();
            let end = else_branch
                .map(|s| s.span())
                .or(until.map(|e| e.span()))
                .unwrap_or(body.span());
            return Ok(self.alloc(Stmt::SpecializedLoop {
                kind,
                args,
                body,
                until,
                else_branch,
                span: kw.span.merge(end),
            }));
        }

        let count = if self.at_eos() || self.check(TokenKind::LeftBrace) {
            None
        } else {
            Some(self.parse_expr_or_error())
        };
        let body = self.parse_body_or_error();
        let until = self.parse_until_tail();
        let else_branch = self.parse_else_tail();
        let end = else_branch
            .map(|s| s.span())
            .or(until.map(|e| e.span()))
            .unwrap_or(body.span());
        Ok(self.alloc(Stmt::Loop {
            count,
            body,
            until,
            else_branch,
            span: kw.span.merge(end),
        }))
    }

    fn parse_for(&mut self) -> ParseResult<&'ast Stmt<'ast>> {
        let kw = self.advance();
        let mut vars = BumpVec::new_in(self.arena);
        loop {
            let token = self.expect(TokenKind::Identifier)?;
            vars.push(Ident::new(token.lexeme, token.span));
            if self.eat(TokenKind::Comma).is_none() {
                break;
            }
        }
        self.expect(TokenKind::In)?;
        let iterable = self.parse_expr_or_error();
        let body = self.parse_body_or_error();
        let until = self.parse_until_tail();
        let else_branch = self.parse_else_tail();
        let end = else_branch
            .map(|s| s.span())
            .or(until.map(|e| e.span()))
            .unwrap_or(body.span());
        let vars = vars.into_bump_slice();
        Ok(self.alloc(Stmt::ForIn {
            vars,
            iterable,
            body,
            until,
            else_branch,
            span: kw.span.merge(end),
        }))
    }

    fn parse_break_continue(&mut self) -> ParseResult<&'ast Stmt<'ast>> {
        let kw = self.advance();
        let label = if self.check(TokenKind::Identifier) {
            let token = self.advance();
            Some(Ident::new(token.lexeme, token.span))
        } else {
            None
        };
        self.expect_eos()?;
        let span = label.map_or(kw.span, |l| kw.span.merge(l.span));
        Ok(self.alloc(if kw.kind == TokenKind::Break {
            Stmt::Break { label, span }
        } else {
            Stmt::Continue { label, span }
        }))
    }

    fn parse_return(&mut self) -> ParseResult<&'ast Stmt<'ast>> {
        let kw = self.advance();
        let value = if self.at_eos() {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_eos()?;
        let span = value.map_or(kw.span, |v| kw.span.merge(v.span()));
        Ok(self.alloc(Stmt::Return { value, span }))
    }

    fn parse_throw(&mut self) -> ParseResult<&'ast Stmt<'ast>> {
        let kw = self.advance();
        let value = if self.at_eos() {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.expect_eos()?;
        let span = value.map_or(kw.span, |v| kw.span.merge(v.span()));
        Ok(self.alloc(Stmt::Throw { value, span }))
    }

    fn parse_goto(&mut self) -> ParseResult<&'ast Stmt<'ast>> {
        let kw = self.advance();
        let token = self.expect(TokenKind::Identifier)?;
        let label = Ident::new(token.lexeme, token.span);
        self.expect_eos()?;
        Ok(self.alloc(Stmt::Goto {
            label,
            span: kw.span.merge(token.span),
        }))
    }

    fn parse_label(&mut self) -> ParseResult<&'ast Stmt<'ast>> {
        let token = self.expect(TokenKind::Identifier)?;
        let colon = self.expect(TokenKind::Colon)?;
        self.expect_eos()?;
        Ok(self.alloc(Stmt::Label {
            name: Ident::new(token.lexeme, token.span),
            span: token.span.merge(colon.span),
        }))
    }

    fn parse_switch(&mut self) -> ParseResult<&'ast Stmt<'ast>> {
        let kw = self.advance();
        let subject = if self.check(TokenKind::LeftBrace) || self.check(TokenKind::Eol) {
            None
        } else {
            Some(self.parse_expression()?)
        };
        self.skip_newlines();
        self.expect(TokenKind::LeftBrace)?;
        self.skip_newlines();

        let mut cases = BumpVec::new_in(self.arena);
        while !self.check(TokenKind::RightBrace) && !self.check(TokenKind::Eof) {
            match self.peek_kind() {
                TokenKind::Case => {
                    let case_kw = self.advance();
                    let mut values = BumpVec::new_in(self.arena);
                    loop {
                        values.push(*self.parse_expression()?);
                        if self.eat(TokenKind::Comma).is_none() {
                            break;
                        }
                    }
                    self.expect(TokenKind::Colon)?;
                    let body = self.parse_case_body();
                    let end = body.last().map_or(case_kw.span, |s| s.span());
                    let values = values.into_bump_slice();
                    cases.push(CaseClause {
                        values,
                        body,
                        span: case_kw.span.merge(end),
                    });
                }
                TokenKind::Default => {
                    let default_kw = self.advance();
                    self.expect(TokenKind::Colon)?;
                    let body = self.parse_case_body();
                    let end = body.last().map_or(default_kw.span, |s| s.span());
                    cases.push(CaseClause {
                        values: &[],
                        body,
                        span: default_kw.span.merge(end),
                    });
                }
                _ => {
                    let diagnostic = self.error_here(
                        DiagnosticKind::InvalidCaseClause,
                        "expected 'case' or 'default'",
                    );
                    self.report(diagnostic);
                    self.synchronize();
                }
            }
            self.skip_newlines();
        }

        let close = self.expect(TokenKind::RightBrace)?;
        let cases = cases.into_bump_slice();
        Ok(self.alloc(Stmt::Switch {
            subject,
            cases,
            span: kw.span.merge(close.span),
        }))
    }

    fn parse_case_body(&mut self) -> &'ast [Stmt<'ast>] {
        let mut stmts = BumpVec::new_in(self.arena);
        self.skip_newlines();
        while !matches!(
            self.peek_kind(),
            TokenKind::Case | TokenKind::Default | TokenKind::RightBrace | TokenKind::Eof
        ) {
            stmts.push(*self.parse_statement());
            self.skip_newlines();
        }
        stmts.into_bump_slice()
    }

    fn parse_try(&mut self) -> ParseResult<&'ast Stmt<'ast>> {
        let kw = self.advance();
        let body = self.parse_body_or_error();

        let mut handlers = BumpVec::new_in(self.arena);
        loop {
            self.mark();
            self.skip_newlines();
            if self.check(TokenKind::Catch) {
                self.release();
                handlers.push(self.parse_catch()?);
            } else {
                self.reset();
                break;
            }
        }

        let else_branch = self.parse_else_tail();

        self.mark();
        self.skip_newlines();
        let finally = if self.check(TokenKind::Finally) {
            self.release();
            self.advance();
            Some(self.parse_body_or_error())
        } else {
            self.reset();
            None
        };

        let end = finally
            .map(|s| s.span())
            .or(else_branch.map(|s| s.span()))
            .or(handlers.last().map(|h: &CatchClause| h.span))
            .unwrap_or(body.span());
        let handlers = handlers.into_bump_slice();
        Ok(self.alloc(Stmt::Try {
            body,
            handlers,
            else_branch,
            finally,
            span: kw.span.merge(end),
        }))
    }

    fn parse_catch(&mut self) -> ParseResult<CatchClause<'ast>> {
        let kw = self.advance();

        let mut classes = BumpVec::new_in(self.arena);
        if self.check(TokenKind::Identifier) {
            loop {
                classes.push(*self.parse_expression()?);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }

        let binding = if self.eat(TokenKind::As).is_some() {
            let token = self.expect(TokenKind::Identifier)?;
            Some(Ident::new(token.lexeme, token.span))
        } else {
            None
        };

        let body = self.parse_body_or_error();
        let classes = classes.into_bump_slice();
        Ok(CatchClause {
            classes,
            binding,
            body,
            span: kw.span.merge(body.span()),
        })
    }

    // ===== Declarations and calls =====

    fn parse_var_decl(&mut self) -> ParseResult<&'ast Stmt<'ast>> {
        let kw = self.advance();
        let scope = match kw.kind {
            TokenKind::Global => Scope::Global,
            TokenKind::Local => Scope::Local,
            _ => Scope::Static,
        };

        let mut vars = BumpVec::new_in(self.arena);
        // A bare `global` or `local` sets the function's assume mode.
        if !self.at_eos() {
            loop {
                let token = self.expect(TokenKind::Identifier)?;
                let name = Ident::new(token.lexeme, token.span);
                let init = if self.eat(TokenKind::Assign).is_some() {
                    Some(self.parse_expression()?)
                } else {
                    None
                };
                let span = init.map_or(name.span, |i| name.span.merge(i.span()));
                vars.push(VarInit { name, init, span });
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect_eos()?;

        let end = vars.last().map_or(kw.span, |v: &VarInit| v.span);
        let vars = vars.into_bump_slice();
        Ok(self.alloc(Stmt::VarDecl {
            scope,
            vars,
            span: kw.span.merge(end),
        }))
    }

    fn parse_command(&mut self) -> ParseResult<&'ast Stmt<'ast>> {
        let first = self.expect(TokenKind::Identifier)?;
        let mut target: &'ast Expr<'ast> =
            self.alloc(Expr::Ident(Ident::new(first.lexeme, first.span)));
        while self.check(TokenKind::Dot) && !self.gap_before_current() {
            self.advance();
            target = self.parse_member(target, false)?;
        }

        let mut args = BumpVec::new_in(self.arena);
        if !self.at_eos() {
            loop {
                args.push(*self.parse_expression()?);
                if self.eat(TokenKind::Comma).is_none() {
                    break;
                }
            }
        }
        self.expect_eos()?;

        let end = args.last().map_or(target.span(), |a: &Expr| a.span());
        let args = args.into_bump_slice();
        Ok(self.alloc(Stmt::Command {
            target,
            args,
            span: target.span().merge(end),
        }))
    }

    fn parse_expr_statement(&mut self) -> ParseResult<&'ast Stmt<'ast>> {
        let expr = self.parse_expression()?;
        self.expect_eos()?;
        Ok(self.alloc(Stmt::Expr {
            expr,
            span: expr.span(),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ast::ops::BinaryOp;
    use crate::ast::stmt::LoopKind;
    use bumpalo::Bump;

    fn parse_stmt<'ast>(source: &str, arena: &'ast Bump) -> &'ast Stmt<'ast> {
        let mut parser = Parser::new(source, arena);
        let stmt = parser.parse_statement();
        assert!(
            parser.errors.is_empty(),
            "unexpected diagnostics: {:?}",
            parser.errors
        );
        stmt
    }

    #[test]
    fn assignment_statement() {
        let arena = Bump::new();
        let stmt = parse_stmt("x := 1 + 2 * 3", &arena);
        let Stmt::Expr { expr, .. } = stmt else {
            panic!("expected expression statement, got {stmt:?}");
        };
        assert!(matches!(expr, Expr::Assign { .. }));
    }

    #[test]
    fn if_with_block_and_else() {
        let arena = Bump::new();
        let stmt = parse_stmt("if x > 1 {\n  y := 2\n} else {\n  y := 3\n}", &arena);
        let Stmt::If {
            cond, else_branch, ..
        } = stmt
        else {
            panic!("expected if, got {stmt:?}");
        };
        assert!(matches!(
            cond,
            Expr::Binary {
                op: BinaryOp::Greater,
                ..
            }
        ));
        assert!(else_branch.is_some());
    }

    #[test]
    fn if_with_parenthesized_condition() {
        let arena = Bump::new();
        let stmt = parse_stmt("if (x > 1)\n  y := 2", &arena);
        assert!(matches!(stmt, Stmt::If { .. }));
    }

    #[test]
    fn else_if_chain() {
        let arena = Bump::new();
        let stmt = parse_stmt("if a {\n} else if b {\n}", &arena);
        let Stmt::If { else_branch, .. } = stmt else {
            panic!("expected if");
        };
        assert!(matches!(else_branch, Some(Stmt::If { .. })));
    }

    #[test]
    fn generic_loop_with_count() {
        let arena = Bump::new();
        let stmt = parse_stmt("Loop 5 {\n  total += 1\n}", &arena);
        let Stmt::Loop { count, until, .. } = stmt else {
            panic!("expected loop, got {stmt:?}");
        };
        assert!(matches!(count, Some(Expr::Int { lexeme: "5", .. })));
        assert!(until.is_none());
    }

    #[test]
    fn infinite_loop_without_count() {
        let arena = Bump::new();
        let stmt = parse_stmt("Loop {\n  x := 1\n}", &arena);
        assert!(matches!(stmt, Stmt::Loop { count: None, .. }));
    }

    #[test]
    fn loop_files_is_specialized() {
        let arena = Bump::new();
        let stmt = parse_stmt("Loop Files \"*.txt\" {\n}", &arena);
        let Stmt::SpecializedLoop { kind, args, .. } = stmt else {
            panic!("expected specialized loop, got {stmt:?}");
        };
        assert_eq!(*kind, LoopKind::Files);
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn loop_files_with_mode_argument() {
        let arena = Bump::new();
        let stmt = parse_stmt("Loop Files \"*.ahk\", \"R\" {\n}", &arena);
        let Stmt::SpecializedLoop { args, .. } = stmt else {
            panic!("expected specialized loop");
        };
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn loop_with_variable_count_is_generic() {
        let arena = Bump::new();
        let stmt = parse_stmt("Loop count {\n}", &arena);
        assert!(matches!(stmt, Stmt::Loop { count: Some(_), .. }));
    }

    #[test]
    fn loop_until() {
        let arena = Bump::new();
        let stmt = parse_stmt("Loop {\n  x += 1\n} until x > 3", &arena);
        let Stmt::Loop { until, .. } = stmt else {
            panic!("expected loop");
        };
        assert!(until.is_some());
    }

    #[test]
    fn loop_else_runs_on_zero_iterations() {
        let arena = Bump::new();
        let stmt = parse_stmt("Loop Files \"*.log\" {\n  n += 1\n} else\n  MsgBox \"none\"", &arena);
        let Stmt::SpecializedLoop { else_branch, .. } = stmt else {
            panic!("expected specialized loop, got {stmt:?}");
        };
        assert!(else_branch.is_some());
    }

    #[test]
    fn for_else() {
        let arena = Bump::new();
        let stmt = parse_stmt("for x in list {\n} else {\n  y := 1\n}", &arena);
        let Stmt::ForIn { else_branch, .. } = stmt else {
            panic!("expected for, got {stmt:?}");
        };
        assert!(else_branch.is_some());
    }

    #[test]
    fn while_loop() {
        let arena = Bump::new();
        let stmt = parse_stmt("while x < 10\n  x += 1", &arena);
        assert!(matches!(stmt, Stmt::While { .. }));
    }

    #[test]
    fn for_in_with_two_vars() {
        let arena = Bump::new();
        let stmt = parse_stmt("for k, v in map {\n}", &arena);
        let Stmt::ForIn { vars, .. } = stmt else {
            panic!("expected for, got {stmt:?}");
        };
        assert_eq!(vars.len(), 2);
        assert_eq!(vars[0].name, "k");
        assert_eq!(vars[1].name, "v");
    }

    #[test]
    fn break_continue_with_labels() {
        let arena = Bump::new();
        assert!(matches!(
            parse_stmt("break", &arena),
            Stmt::Break { label: None, .. }
        ));
        let stmt = parse_stmt("continue outer", &arena);
        let Stmt::Continue { label, .. } = stmt else {
            panic!("expected continue");
        };
        assert_eq!(label.map(|l| l.name), Some("outer"));
    }

    #[test]
    fn return_with_and_without_value() {
        let arena = Bump::new();
        assert!(matches!(
            parse_stmt("return", &arena),
            Stmt::Return { value: None, .. }
        ));
        assert!(matches!(
            parse_stmt("return x + 1", &arena),
            Stmt::Return { value: Some(_), .. }
        ));
    }

    #[test]
    fn label_and_goto() {
        let arena = Bump::new();
        let stmt = parse_stmt("Retry:", &arena);
        let Stmt::Label { name, .. } = stmt else {
            panic!("expected label, got {stmt:?}");
        };
        assert_eq!(name.name, "Retry");

        assert!(matches!(parse_stmt("goto Retry", &arena), Stmt::Goto { .. }));
    }

    #[test]
    fn switch_with_cases_and_default() {
        let arena = Bump::new();
        let stmt = parse_stmt(
            "switch x {\ncase 1, 2:\n  y := 1\ncase 3:\n  y := 2\ndefault:\n  y := 0\n}",
            &arena,
        );
        let Stmt::Switch { subject, cases, .. } = stmt else {
            panic!("expected switch, got {stmt:?}");
        };
        assert!(subject.is_some());
        assert_eq!(cases.len(), 3);
        assert_eq!(cases[0].values.len(), 2);
        assert!(cases[2].values.is_empty()); // default
    }

    #[test]
    fn try_catch_finally() {
        let arena = Bump::new();
        let stmt = parse_stmt(
            "try {\n  Risky()\n} catch TypeError as e {\n  Log(e)\n} finally {\n  Cleanup()\n}",
            &arena,
        );
        let Stmt::Try {
            handlers, finally, ..
        } = stmt
        else {
            panic!("expected try, got {stmt:?}");
        };
        assert_eq!(handlers.len(), 1);
        assert_eq!(handlers[0].classes.len(), 1);
        assert_eq!(handlers[0].binding.map(|b| b.name), Some("e"));
        assert!(finally.is_some());
    }

    #[test]
    fn bare_catch_matches_everything() {
        let arena = Bump::new();
        let stmt = parse_stmt("try {\n} catch {\n}", &arena);
        let Stmt::Try { handlers, .. } = stmt else {
            panic!("expected try");
        };
        assert!(handlers[0].classes.is_empty());
    }

    #[test]
    fn throw_statement() {
        let arena = Bump::new();
        assert!(matches!(
            parse_stmt("throw ValueError(\"bad\")", &arena),
            Stmt::Throw { value: Some(_), .. }
        ));
    }

    #[test]
    fn var_declarations() {
        let arena = Bump::new();
        let stmt = parse_stmt("global x := 1, y", &arena);
        let Stmt::VarDecl { scope, vars, .. } = stmt else {
            panic!("expected declaration, got {stmt:?}");
        };
        assert_eq!(*scope, Scope::Global);
        assert_eq!(vars.len(), 2);
        assert!(vars[0].init.is_some());
        assert!(vars[1].init.is_none());

        assert!(matches!(
            parse_stmt("static count := 0", &arena),
            Stmt::VarDecl {
                scope: Scope::Static,
                ..
            }
        ));
    }

    #[test]
    fn bare_scope_keyword() {
        let arena = Bump::new();
        let stmt = parse_stmt("local", &arena);
        let Stmt::VarDecl { scope, vars, .. } = stmt else {
            panic!("expected declaration");
        };
        assert_eq!(*scope, Scope::Local);
        assert!(vars.is_empty());
    }

    #[test]
    fn command_call_without_parens() {
        let arena = Bump::new();
        let stmt = parse_stmt("MsgBox \"hello\", \"title\"", &arena);
        let Stmt::Command { target, args, .. } = stmt else {
            panic!("expected command, got {stmt:?}");
        };
        assert!(matches!(target, Expr::Ident(_)));
        assert_eq!(args.len(), 2);
    }

    #[test]
    fn command_on_member_chain() {
        let arena = Bump::new();
        let stmt = parse_stmt("gui.Show \"w200 h100\"", &arena);
        let Stmt::Command { target, args, .. } = stmt else {
            panic!("expected command, got {stmt:?}");
        };
        assert!(matches!(target, Expr::Member { .. }));
        assert_eq!(args.len(), 1);
    }

    #[test]
    fn parenthesized_call_is_an_expression_statement() {
        let arena = Bump::new();
        let stmt = parse_stmt("MsgBox(\"hello\")", &arena);
        let Stmt::Expr { expr, .. } = stmt else {
            panic!("expected expression statement, got {stmt:?}");
        };
        assert!(matches!(expr, Expr::Call { .. }));
    }

    #[test]
    fn function_definition_statement() {
        let arena = Bump::new();
        let stmt = parse_stmt("Add(a, b) {\n  return a + b\n}", &arena);
        let Stmt::FunctionDecl(func) = stmt else {
            panic!("expected function definition, got {stmt:?}");
        };
        assert_eq!(func.name.name, "Add");
        assert_eq!(func.params.len(), 2);
    }

    #[test]
    fn broken_if_keeps_the_if_node() {
        let arena = Bump::new();
        let mut parser = Parser::new("if (x >", &arena);
        let stmt = parser.parse_statement();
        let Stmt::If {
            cond, then_branch, ..
        } = stmt
        else {
            panic!("expected if node under recovery, got {stmt:?}");
        };
        assert!(matches!(cond, Expr::Error(_)));
        assert!(matches!(then_branch, Stmt::Error(_)));
        assert!(!parser.errors.is_empty());
    }

    #[test]
    fn error_statement_recovers_to_next_line() {
        let arena = Bump::new();
        let mut parser = Parser::new("1 + * 2\nx := 3", &arena);
        let first = parser.parse_statement();
        assert!(matches!(first, Stmt::Error(_)));
        assert!(!parser.errors.is_empty());

        let second = parser.parse_statement();
        assert!(matches!(second, Stmt::Expr { .. }));
    }

    #[test]
    fn case_outside_switch_is_an_error() {
        let arena = Bump::new();
        let mut parser = Parser::new("case 1:", &arena);
        let stmt = parser.parse_statement();
        assert!(matches!(stmt, Stmt::Error(_)));
        assert!(
            parser
                .errors
                .iter()
                .any(|d| d.kind == DiagnosticKind::InvalidCaseClause)
        );
    }
}
