//! Parser state: the token buffer, navigation, speculation, and recovery.
//!
//! The whole source is lexed up front into a buffer holding every channel.
//! Navigation only ever stops on code-channel tokens, but the trivia stays
//! addressable so the expression parser can ask whether two tokens were
//! separated by whitespace (implicit concatenation) and the disambiguation
//! predicates can scan a bounded window.
//!
//! Statement-level productions return `Result` and propagate errors with
//! `?`; the statement loop catches them, records the diagnostic, emits an
//! error node, and resynchronizes at the next line. Parsing as a whole
//! never fails.

use autohotkey_core::{Diagnostic, DiagnosticKind, Diagnostics, Span};
use bumpalo::Bump;

use super::Program;
use super::expr::Expr;
use super::stmt::Stmt;
use crate::lexer::{Channel, Lexer, Token, TokenKind};

/// Outcome of one grammar production. The error is recorded and recovered
/// from by the nearest statement boundary, never surfaced to the caller of
/// [`Parser::parse`].
pub(crate) type ParseResult<T> = Result<T, Diagnostic>;

/// Recursive-descent parser for AutoHotkey v2.
pub struct Parser<'ast> {
    pub(crate) arena: &'ast Bump,
    /// Every token of the source, all channels, ending with `Eof`.
    buffer: Vec<Token<'ast>>,
    /// Index of the current code-channel token.
    position: usize,
    /// Saved positions for speculative parsing.
    marks: Vec<usize>,
    pub(crate) errors: Diagnostics,
}

impl<'ast> Parser<'ast> {
    /// Parse a source string into a program and its diagnostics.
    ///
    /// Never fails: malformed regions become error nodes in the tree and
    /// entries in the diagnostic list.
    pub fn parse(source: &str, arena: &'ast Bump) -> (Program<'ast>, Vec<Diagnostic>) {
        let mut parser = Parser::new(source, arena);
        let program = parser.parse_program();
        (program, parser.errors.into_vec())
    }

    /// Parse a single statement, with the same recovery guarantees as
    /// [`Parser::parse`].
    pub fn statement(source: &str, arena: &'ast Bump) -> (&'ast Stmt<'ast>, Vec<Diagnostic>) {
        let mut parser = Parser::new(source, arena);
        let stmt = parser.parse_statement();
        (stmt, parser.errors.into_vec())
    }

    /// Parse a single expression; malformed input yields an error node.
    pub fn expression(source: &str, arena: &'ast Bump) -> (&'ast Expr<'ast>, Vec<Diagnostic>) {
        let mut parser = Parser::new(source, arena);
        let expr = parser.parse_expr_or_error();
        (expr, parser.errors.into_vec())
    }

    pub(crate) fn new(source: &str, arena: &'ast Bump) -> Self {
        let (buffer, lex_errors) = Lexer::tokenize(source, arena);
        let mut parser = Parser {
            arena,
            buffer,
            position: 0,
            marks: Vec::new(),
            errors: lex_errors.into_iter().map(Diagnostic::from).collect(),
        };
        parser.skip_trivia();
        parser
    }

    /// Allocate a node in the tree arena.
    #[inline]
    pub(crate) fn alloc<T>(&self, value: T) -> &'ast T {
        self.arena.alloc(value)
    }

    // ===== Navigation =====

    /// Move `position` forward to the next code-channel token.
    fn skip_trivia(&mut self) {
        while self
            .buffer
            .get(self.position)
            .is_some_and(|t| !t.is_code())
        {
            self.position += 1;
        }
    }

    /// The current token. The buffer always ends with `Eof`, so this is
    /// total.
    #[inline]
    pub(crate) fn peek(&self) -> Token<'ast> {
        self.buffer
            .get(self.position)
            .copied()
            .unwrap_or_else(|| self.eof_token())
    }

    fn eof_token(&self) -> Token<'ast> {
        // Reachable only if navigation walked past the buffer end.
        let span = self
            .buffer
            .last()
            .map(|t| t.span)
            .unwrap_or_else(|| Span::point(0, 1, 1));
        Token::new(TokenKind::Eof, "", span, Channel::Code)
    }

    /// Kind of the current token.
    #[inline]
    pub(crate) fn peek_kind(&self) -> TokenKind {
        self.peek().kind
    }

    /// The nth code token ahead of the current one (1 = next).
    pub(crate) fn peek_nth(&self, n: usize) -> Token<'ast> {
        let mut idx = self.position;
        let mut remaining = n;
        while remaining > 0 {
            idx += 1;
            while self.buffer.get(idx).is_some_and(|t| !t.is_code()) {
                idx += 1;
            }
            if idx >= self.buffer.len() {
                return self.eof_token();
            }
            remaining -= 1;
        }
        self.buffer
            .get(idx)
            .copied()
            .unwrap_or_else(|| self.eof_token())
    }

    /// Consume and return the current token.
    pub(crate) fn advance(&mut self) -> Token<'ast> {
        let token = self.peek();
        if token.kind != TokenKind::Eof {
            self.position += 1;
            self.skip_trivia();
        }
        token
    }

    /// Whether the current token has the given kind.
    #[inline]
    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.peek_kind() == kind
    }

    /// Consume the current token if it has the given kind.
    pub(crate) fn eat(&mut self, kind: TokenKind) -> Option<Token<'ast>> {
        if self.check(kind) {
            Some(self.advance())
        } else {
            None
        }
    }

    /// Consume a token of the given kind or produce a diagnostic.
    pub(crate) fn expect(&mut self, kind: TokenKind) -> ParseResult<Token<'ast>> {
        if self.check(kind) {
            Ok(self.advance())
        } else {
            let found = self.peek();
            Err(Diagnostic::error(
                DiagnosticKind::ExpectedToken,
                found.span,
                format!("expected {}, found {}", kind, found.kind),
            ))
        }
    }

    /// Whether any trivia (whitespace, comment, or hidden newline) separates
    /// the previously consumed token from the current one.
    pub(crate) fn gap_before_current(&self) -> bool {
        self.position
            .checked_sub(1)
            .and_then(|i| self.buffer.get(i))
            .is_some_and(|t| !t.is_code())
    }

    // ===== Speculation =====

    /// Save the current position for a speculative scan.
    pub(crate) fn mark(&mut self) {
        self.marks.push(self.position);
    }

    /// Discard the most recent mark, keeping the current position.
    pub(crate) fn release(&mut self) {
        self.marks.pop();
    }

    /// Rewind to the most recent mark and discard it.
    pub(crate) fn reset(&mut self) {
        if let Some(position) = self.marks.pop() {
            self.position = position;
        }
    }

    // ===== Statement boundaries and recovery =====

    /// Whether the current token terminates a statement.
    pub(crate) fn at_eos(&self) -> bool {
        matches!(
            self.peek_kind(),
            TokenKind::Eol | TokenKind::Eof | TokenKind::RightBrace
        )
    }

    /// Require a statement terminator. Newlines are consumed; `}` and end
    /// of file satisfy the boundary but stay for the enclosing block.
    pub(crate) fn expect_eos(&mut self) -> ParseResult<()> {
        match self.peek_kind() {
            TokenKind::Eol => {
                self.skip_newlines();
                Ok(())
            }
            TokenKind::Eof | TokenKind::RightBrace => Ok(()),
            _ => {
                let found = self.peek();
                Err(Diagnostic::error(
                    DiagnosticKind::UnexpectedToken,
                    found.span,
                    format!("expected end of line, found {}", found.kind),
                ))
            }
        }
    }

    /// Consume any run of newline tokens.
    pub(crate) fn skip_newlines(&mut self) {
        while self.check(TokenKind::Eol) {
            self.advance();
        }
    }

    /// Skip to the start of the next statement after an error.
    ///
    /// Advances past the next newline; stops early at `}` or end of file so
    /// enclosing blocks can close.
    pub(crate) fn synchronize(&mut self) {
        loop {
            match self.peek_kind() {
                TokenKind::Eof | TokenKind::RightBrace => return,
                TokenKind::Eol => {
                    self.skip_newlines();
                    return;
                }
                _ => {
                    self.advance();
                }
            }
        }
    }

    /// Record a diagnostic.
    pub(crate) fn report(&mut self, diagnostic: Diagnostic) {
        self.errors.push(diagnostic);
    }

    /// Build an error diagnostic at the current token.
    pub(crate) fn error_here(
        &self,
        kind: DiagnosticKind,
        message: impl Into<String>,
    ) -> Diagnostic {
        Diagnostic::error(kind, self.peek().span, message)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn with_parser<R>(source: &str, f: impl for<'ast> FnOnce(&mut Parser<'ast>) -> R) -> R {
        let arena = Bump::new();
        let mut parser = Parser::new(source, &arena);
        f(&mut parser)
    }

    #[test]
    fn navigation_skips_trivia() {
        with_parser("x := 1 ; note", |p| {
            assert_eq!(p.peek_kind(), TokenKind::Identifier);
            assert_eq!(p.advance().kind, TokenKind::Identifier);
            assert_eq!(p.peek_kind(), TokenKind::Assign);
            assert_eq!(p.peek_nth(1).kind, TokenKind::IntLiteral);
            assert_eq!(p.peek_nth(2).kind, TokenKind::Eof);
        });
    }

    #[test]
    fn advance_stops_at_eof() {
        with_parser("x", |p| {
            p.advance();
            assert_eq!(p.advance().kind, TokenKind::Eof);
            assert_eq!(p.advance().kind, TokenKind::Eof);
        });
    }

    #[test]
    fn eat_and_expect() {
        with_parser("(x)", |p| {
            assert!(p.eat(TokenKind::LeftParen).is_some());
            assert!(p.eat(TokenKind::RightParen).is_none());
            assert!(p.expect(TokenKind::Identifier).is_ok());
            assert!(p.expect(TokenKind::Comma).is_err());
            assert!(p.expect(TokenKind::RightParen).is_ok());
        });
    }

    #[test]
    fn mark_and_reset() {
        with_parser("a b c", |p| {
            p.mark();
            p.advance();
            p.advance();
            assert_eq!(p.peek().lexeme, "c");
            p.reset();
            assert_eq!(p.peek().lexeme, "a");

            p.mark();
            p.advance();
            p.release();
            assert_eq!(p.peek().lexeme, "b");
        });
    }

    #[test]
    fn gap_detection() {
        with_parser("f(x) g", |p| {
            p.advance(); // f
            assert!(!p.gap_before_current()); // '(' glued to 'f'
            p.advance(); // (
            p.advance(); // x
            p.advance(); // )
            assert!(p.gap_before_current()); // space before 'g'
        });
    }

    #[test]
    fn synchronize_stops_after_newline() {
        with_parser("junk $ more\nnext", |p| {
            p.synchronize();
            assert_eq!(p.peek().lexeme, "next");
        });
    }

    #[test]
    fn synchronize_stops_at_closing_brace() {
        with_parser("junk }", |p| {
            p.synchronize();
            assert_eq!(p.peek_kind(), TokenKind::RightBrace);
        });
    }

    #[test]
    fn lex_and_parse_errors_share_the_accumulator() {
        let arena = Bump::new();
        let (_, diagnostics) = Parser::parse("x := @\n1 + * 2\n", &arena);
        assert!(diagnostics.len() >= 2, "{diagnostics:?}");
        // Lexical failures come first, then the parse errors, in reported
        // order.
        assert_eq!(diagnostics[0].kind, DiagnosticKind::UnexpectedCharacter);
    }

    #[test]
    fn eos_at_line_end_and_eof() {
        with_parser("x\ny", |p| {
            p.advance();
            assert!(p.at_eos());
            assert!(p.expect_eos().is_ok());
            assert_eq!(p.peek().lexeme, "y");
            p.advance();
            assert!(p.at_eos()); // Eof
            assert!(p.expect_eos().is_ok());
        });
    }
}
