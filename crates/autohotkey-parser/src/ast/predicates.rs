//! Disambiguation predicates.
//!
//! AutoHotkey's grammar has spots where the right production depends on
//! tokens further along the line: a name at statement start may open a
//! command-style call or an expression, `Loop` may take a count expression
//! or a specialization word, and `name:` may be a label. These predicates
//! answer those questions with a bounded speculative scan; crossing the
//! bound records a warning and falls back to the more general production.

use autohotkey_core::{Diagnostic, DiagnosticKind};

use super::ops::{AssignOp, BinaryOp};
use super::parser::Parser;
use super::stmt::LoopKind;
use crate::lexer::TokenKind;

/// Most tokens a predicate may inspect before giving up.
pub(crate) const LOOKAHEAD_LIMIT: usize = 24;

impl<'ast> Parser<'ast> {
    /// Whether the name at the current position starts a command-style call
    /// (`MsgBox "hi", "title"`) rather than an expression statement.
    ///
    /// Scans the leading member chain, then classifies the first token after
    /// it: a statement end or an argument separated by whitespace means a
    /// command, an operator or a glued `(` means an expression.
    pub(crate) fn is_command_statement(&mut self) -> bool {
        debug_assert_eq!(self.peek_kind(), TokenKind::Identifier);
        self.mark();
        self.advance();
        let mut scanned = 1usize;

        // obj.method "arg" is still a command call.
        while self.check(TokenKind::Dot) && !self.gap_before_current() {
            if scanned + 2 > LOOKAHEAD_LIMIT {
                let diag = Diagnostic::warning(
                    DiagnosticKind::LookaheadLimit,
                    self.peek().span,
                    "name is too long to classify; parsing as an expression",
                );
                self.report(diag);
                self.reset();
                return false;
            }
            self.advance();
            if self.check(TokenKind::Identifier) {
                self.advance();
                scanned += 2;
            } else {
                self.reset();
                return false;
            }
        }

        let gapped = self.gap_before_current();
        let next = self.peek_kind();
        let result = match next {
            // A bare name on its own line calls with no arguments.
            TokenKind::Eol | TokenKind::Eof | TokenKind::RightBrace => true,
            // Glued '(' is an ordinary call expression; with a space the
            // parenthesized expression is the first argument.
            TokenKind::LeftParen => gapped,
            // `MsgBox, "hi"` is v1 syntax; flag it and let expression
            // parsing produce the concrete error.
            TokenKind::Comma => {
                let diag = self.error_here(
                    DiagnosticKind::CommandCommaSyntax,
                    "comma after a command name is v1 syntax; omit the comma",
                );
                self.report(diag);
                false
            }
            TokenKind::PlusPlus
            | TokenKind::MinusMinus
            | TokenKind::Question
            | TokenKind::QuestionDot
            | TokenKind::Arrow
            | TokenKind::LeftBracket
            | TokenKind::LeftBrace
            | TokenKind::Colon
            | TokenKind::Dot => false,
            // `&` reads as a reference argument only with the command-call
            // spacing: a gap before it and the operand glued after, as in
            // `MsgBox &ref`. Symmetric spacing stays a bitwise and.
            TokenKind::Amp => {
                self.advance();
                gapped && !self.gap_before_current() && self.peek_kind().starts_term()
            }
            k if AssignOp::from_token(k).is_some() => false,
            k if BinaryOp::from_token(k).is_some() => false,
            // `MsgBox "hi"`, `MsgBox !x`
            k if k.starts_term() => gapped,
            TokenKind::Bang | TokenKind::Not => gapped,
            _ => false,
        };
        self.reset();
        result
    }

    /// The specialization word after `Loop`, if the next token is one.
    ///
    /// `Files`, `Read`, `Reg`, and `Parse` are ordinary identifiers
    /// everywhere else, so this matches by lexeme, case-insensitively.
    pub(crate) fn loop_specialization(&self) -> Option<LoopKind> {
        let token = self.peek();
        if token.kind != TokenKind::Identifier {
            return None;
        }
        LoopKind::from_word(token.lexeme)
    }

    /// Whether the name at the current position opens a function definition:
    /// `Name(params...)` followed by `{`, `=>`, or a newline and `{`.
    pub(crate) fn is_function_definition(&mut self) -> bool {
        if !self.check(TokenKind::Identifier) {
            return false;
        }
        self.mark();
        self.advance();
        if !self.check(TokenKind::LeftParen) || self.gap_before_current() {
            self.reset();
            return false;
        }
        self.advance();

        let mut depth = 1usize;
        let mut scanned = 2usize;
        loop {
            if scanned > LOOKAHEAD_LIMIT {
                self.reset();
                return false;
            }
            match self.peek_kind() {
                TokenKind::LeftParen | TokenKind::LeftBracket | TokenKind::LeftBrace => depth += 1,
                TokenKind::RightParen => {
                    depth -= 1;
                    if depth == 0 {
                        self.advance();
                        break;
                    }
                }
                TokenKind::RightBracket | TokenKind::RightBrace => {
                    depth = depth.saturating_sub(1)
                }
                TokenKind::Eol | TokenKind::Eof => {
                    self.reset();
                    return false;
                }
                _ => {}
            }
            self.advance();
            scanned += 1;
        }

        let result = match self.peek_kind() {
            TokenKind::LeftBrace | TokenKind::Arrow => true,
            TokenKind::Eol => {
                self.skip_newlines();
                self.check(TokenKind::LeftBrace)
            }
            _ => false,
        };
        self.reset();
        result
    }

    /// Whether the current position is a `name:` label line.
    ///
    /// The colon must be glued to the name and followed by the end of the
    /// line, so `x: 1` stays an error and ternaries are unaffected.
    pub(crate) fn is_label(&mut self) -> bool {
        if !self.check(TokenKind::Identifier) {
            return false;
        }
        self.mark();
        self.advance();
        let mut ok = self.check(TokenKind::Colon) && !self.gap_before_current();
        if ok {
            self.advance();
            ok = matches!(self.peek_kind(), TokenKind::Eol | TokenKind::Eof);
        }
        self.reset();
        ok
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;

    fn check_command(source: &str) -> bool {
        let arena = Bump::new();
        let mut parser = Parser::new(source, &arena);
        parser.is_command_statement()
    }

    #[test]
    fn command_with_string_argument() {
        assert!(check_command("MsgBox \"hi\""));
    }

    #[test]
    fn command_with_no_arguments() {
        assert!(check_command("ExitApp"));
        assert!(check_command("ExitApp\nx := 1"));
    }

    #[test]
    fn glued_paren_is_an_expression_call() {
        assert!(!check_command("MsgBox(\"hi\")"));
    }

    #[test]
    fn spaced_paren_is_a_command_argument() {
        assert!(check_command("MsgBox (1 + 2)"));
    }

    #[test]
    fn assignment_is_not_a_command() {
        assert!(!check_command("x := 1"));
        assert!(!check_command("x += 1"));
        assert!(!check_command("x ??= 1"));
    }

    #[test]
    fn operators_are_not_commands() {
        assert!(!check_command("x + 1"));
        assert!(!check_command("x++"));
        assert!(!check_command("x ? a : b"));
    }

    #[test]
    fn reference_argument_needs_command_spacing() {
        assert!(check_command("MsgBox &ref"));
        assert!(!check_command("x & y"));
        assert!(!check_command("x &"));
    }

    #[test]
    fn member_chain_command() {
        assert!(check_command("gui.Show \"w200\""));
        assert!(!check_command("gui.Show(\"w200\")"));
    }

    #[test]
    fn predicate_does_not_move_the_position() {
        let arena = Bump::new();
        let mut parser = Parser::new("MsgBox \"hi\"", &arena);
        parser.is_command_statement();
        assert_eq!(parser.peek().lexeme, "MsgBox");
    }

    #[test]
    fn command_comma_reports_v1_syntax() {
        let arena = Bump::new();
        let mut parser = Parser::new("MsgBox, \"hi\"", &arena);
        assert!(!parser.is_command_statement());
        assert!(
            parser
                .errors
                .iter()
                .any(|d| d.kind == DiagnosticKind::CommandCommaSyntax)
        );
    }

    #[test]
    fn long_member_chain_hits_the_lookahead_limit() {
        let chain = format!("a{} \"arg\"", ".b".repeat(20));
        let arena = Bump::new();
        let mut parser = Parser::new(&chain, &arena);
        assert!(!parser.is_command_statement());
        assert!(
            parser
                .errors
                .iter()
                .any(|d| d.kind == DiagnosticKind::LookaheadLimit)
        );
        assert_eq!(parser.peek().lexeme, "a");
    }

    #[test]
    fn loop_specialization_words() {
        let arena = Bump::new();
        let parser = Parser::new("Files \"*.txt\"", &arena);
        assert_eq!(parser.loop_specialization(), Some(LoopKind::Files));

        let parser = Parser::new("parse x", &arena);
        assert_eq!(parser.loop_specialization(), Some(LoopKind::Parse));

        let parser = Parser::new("5", &arena);
        assert_eq!(parser.loop_specialization(), None);

        let parser = Parser::new("count", &arena);
        assert_eq!(parser.loop_specialization(), None);
    }

    #[test]
    fn function_definition_detection() {
        let arena = Bump::new();
        let mut parser = Parser::new("Add(a, b) {\n}", &arena);
        assert!(parser.is_function_definition());
        assert_eq!(parser.peek().lexeme, "Add");

        let mut parser = Parser::new("Add(a, b) => a + b", &arena);
        assert!(parser.is_function_definition());

        let mut parser = Parser::new("Add(a, b)\n{\n}", &arena);
        assert!(parser.is_function_definition());

        let mut parser = Parser::new("Add(1, 2)", &arena);
        assert!(!parser.is_function_definition());

        let mut parser = Parser::new("Add (a, b) {\n}", &arena);
        assert!(!parser.is_function_definition());
    }

    #[test]
    fn label_detection() {
        let arena = Bump::new();
        let mut parser = Parser::new("Retry:\nx := 1", &arena);
        assert!(parser.is_label());
        assert_eq!(parser.peek().lexeme, "Retry");

        let mut parser = Parser::new("x : y", &arena);
        assert!(!parser.is_label());

        let mut parser = Parser::new("x := 1", &arena);
        assert!(!parser.is_label());
    }
}
