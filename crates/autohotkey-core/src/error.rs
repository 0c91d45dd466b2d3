//! Diagnostic types shared by the lexer and parser.
//!
//! Lexical failures are modeled twice: the lexer emits an error *token* so the
//! parser always sees a real token stream, and records a [`LexError`] so the
//! failure also surfaces in the final diagnostic list.

use crate::span::Span;
use std::fmt;

/// A lexical error recorded while scanning.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LexError {
    /// A character with no valid interpretation in the current lexer mode.
    #[error("unexpected character '{ch}' at {span}")]
    UnexpectedCharacter { ch: char, span: Span },

    /// A quoted string that reached end-of-line or end-of-file unterminated.
    #[error("unterminated string starting at {span}")]
    UnterminatedString { span: Span },

    /// A `%` dereference left open at end-of-line.
    #[error("unterminated '%' dereference at {span}")]
    UnterminatedDeref { span: Span },
}

impl LexError {
    /// The location of the error.
    pub fn span(&self) -> Span {
        match self {
            LexError::UnexpectedCharacter { span, .. } => *span,
            LexError::UnterminatedString { span } => *span,
            LexError::UnterminatedDeref { span } => *span,
        }
    }
}

/// How serious a diagnostic is.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Severity {
    Error,
    Warning,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
        }
    }
}

/// The kind of problem a diagnostic reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DiagnosticKind {
    // Lexical
    /// A character the lexer could not interpret.
    UnexpectedCharacter,
    /// A string literal without a closing quote.
    UnterminatedString,
    /// A `%` dereference without a closing `%`.
    UnterminatedDeref,

    // Token-level
    /// Expected a specific token but found something else.
    ExpectedToken,
    /// Unexpected token in this context.
    UnexpectedToken,
    /// Unexpected end of file.
    UnexpectedEof,

    // Expressions
    /// Expected an expression.
    ExpectedExpression,
    /// Invalid expression syntax.
    InvalidExpression,
    /// Assignment target is not an assignable chain.
    InvalidAssignmentTarget,

    // Statements
    /// Expected a statement.
    ExpectedStatement,
    /// Invalid statement syntax.
    InvalidStatement,
    /// Expected a block or single-statement body.
    ExpectedBlock,
    /// `case`/`default` clause outside a switch, or malformed.
    InvalidCaseClause,

    // Declarations
    /// Invalid declaration syntax.
    InvalidDeclaration,
    /// Expected a class member.
    ExpectedClassMember,
    /// Expected a parameter list.
    ExpectedParameters,
    /// Expected an identifier.
    ExpectedIdentifier,

    // Script-level constructs
    /// Malformed directive line.
    InvalidDirective,
    /// Malformed hotkey definition.
    InvalidHotkey,
    /// Malformed hotstring definition.
    InvalidHotstring,
    /// Comma after a command name (removed v1 syntax).
    CommandCommaSyntax,

    // Recovery
    /// A disambiguation predicate ran out of lookahead.
    LookaheadLimit,
}

impl fmt::Display for DiagnosticKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        use DiagnosticKind::*;
        let msg = match self {
            UnexpectedCharacter => "unexpected character",
            UnterminatedString => "unterminated string",
            UnterminatedDeref => "unterminated dereference",
            ExpectedToken => "expected token",
            UnexpectedToken => "unexpected token",
            UnexpectedEof => "unexpected end of file",
            ExpectedExpression => "expected expression",
            InvalidExpression => "invalid expression",
            InvalidAssignmentTarget => "invalid assignment target",
            ExpectedStatement => "expected statement",
            InvalidStatement => "invalid statement",
            ExpectedBlock => "expected block",
            InvalidCaseClause => "invalid case clause",
            InvalidDeclaration => "invalid declaration",
            ExpectedClassMember => "expected class member",
            ExpectedParameters => "expected parameter list",
            ExpectedIdentifier => "expected identifier",
            InvalidDirective => "invalid directive",
            InvalidHotkey => "invalid hotkey",
            InvalidHotstring => "invalid hotstring",
            CommandCommaSyntax => "comma after command name is not valid in v2",
            LookaheadLimit => "lookahead limit reached",
        };
        write!(f, "{}", msg)
    }
}

/// A single diagnostic with location and message.
#[derive(Debug, Clone, PartialEq)]
pub struct Diagnostic {
    /// How serious the problem is.
    pub severity: Severity,
    /// The type of problem.
    pub kind: DiagnosticKind,
    /// The location in source.
    pub span: Span,
    /// Additional context or message.
    pub message: String,
}

impl Diagnostic {
    /// Create an error-severity diagnostic.
    pub fn error(kind: DiagnosticKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            kind,
            span,
            message: message.into(),
        }
    }

    /// Create a warning-severity diagnostic.
    pub fn warning(kind: DiagnosticKind, span: Span, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            kind,
            span,
            message: message.into(),
        }
    }

    /// Format the diagnostic with source context for display.
    pub fn display_with_source(&self, source: &str) -> String {
        let mut output = String::new();

        let line = self.span.line;
        let column = self.span.col;

        output.push_str(&format!(
            "{} at {}:{}: {}\n",
            self.severity, line, column, self.kind
        ));

        if !self.message.is_empty() {
            output.push_str(&format!("  {}\n", self.message));
        }

        if let Some(line_text) = Self::get_line(source, line) {
            output.push_str("  |\n");
            output.push_str(&format!("{:>3} | {}\n", line, line_text));

            let indent = " ".repeat(column.saturating_sub(1) as usize);
            let pointer = if self.span.len <= 1 {
                "^".to_string()
            } else {
                "^".to_string() + &"~".repeat((self.span.len - 1) as usize)
            };
            output.push_str(&format!("  | {}{}\n", indent, pointer));
        }

        output
    }

    fn get_line(source: &str, line_num: u32) -> Option<String> {
        source
            .lines()
            .nth((line_num as usize).checked_sub(1)?)
            .map(|s| s.to_string())
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}: {} at {:?}{}",
            self.severity,
            self.kind,
            self.span,
            if self.message.is_empty() {
                String::new()
            } else {
                format!(": {}", self.message)
            }
        )
    }
}

impl std::error::Error for Diagnostic {}

impl From<LexError> for Diagnostic {
    fn from(error: LexError) -> Self {
        let kind = match error {
            LexError::UnexpectedCharacter { .. } => DiagnosticKind::UnexpectedCharacter,
            LexError::UnterminatedString { .. } => DiagnosticKind::UnterminatedString,
            LexError::UnterminatedDeref { .. } => DiagnosticKind::UnterminatedDeref,
        };
        Diagnostic::error(kind, error.span(), error.to_string())
    }
}

/// An ordered collection of diagnostics.
///
/// Parsing never aborts; diagnostics accumulate here in the order they were
/// reported.
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    diagnostics: Vec<Diagnostic>,
}

impl Diagnostics {
    /// Create a new empty collection.
    pub fn new() -> Self {
        Self {
            diagnostics: Vec::new(),
        }
    }

    /// Add a diagnostic.
    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    /// Check if the collection is empty.
    pub fn is_empty(&self) -> bool {
        self.diagnostics.is_empty()
    }

    /// Get the number of diagnostics.
    pub fn len(&self) -> usize {
        self.diagnostics.len()
    }

    /// Whether any diagnostic has error severity.
    pub fn has_errors(&self) -> bool {
        self.diagnostics
            .iter()
            .any(|d| d.severity == Severity::Error)
    }

    /// Get all diagnostics.
    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Iterate over the diagnostics in reported order.
    pub fn iter(&self) -> std::slice::Iter<'_, Diagnostic> {
        self.diagnostics.iter()
    }

    /// Consume and return the diagnostics.
    pub fn into_vec(self) -> Vec<Diagnostic> {
        self.diagnostics
    }
}

impl From<Diagnostic> for Diagnostics {
    fn from(diagnostic: Diagnostic) -> Self {
        let mut diagnostics = Diagnostics::new();
        diagnostics.push(diagnostic);
        diagnostics
    }
}

impl<'a> IntoIterator for &'a Diagnostics {
    type Item = &'a Diagnostic;
    type IntoIter = std::slice::Iter<'a, Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.diagnostics.iter()
    }
}

impl FromIterator<Diagnostic> for Diagnostics {
    fn from_iter<T: IntoIterator<Item = Diagnostic>>(iter: T) -> Self {
        Self {
            diagnostics: iter.into_iter().collect(),
        }
    }
}

impl fmt::Display for Diagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.diagnostics.is_empty() {
            write!(f, "no diagnostics")
        } else if self.diagnostics.len() == 1 {
            write!(f, "{}", self.diagnostics[0])
        } else {
            writeln!(f, "{} diagnostics:", self.diagnostics.len())?;
            for (i, diagnostic) in self.diagnostics.iter().enumerate() {
                writeln!(f, "  {}: {}", i + 1, diagnostic)?;
            }
            Ok(())
        }
    }
}

impl std::error::Error for Diagnostics {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lex_error_span() {
        let error = LexError::UnexpectedCharacter {
            ch: '\u{1}',
            span: Span::new(3, 1, 1, 4),
        };
        assert_eq!(error.span(), Span::new(3, 1, 1, 4));
        assert!(error.to_string().contains("unexpected character"));
    }

    #[test]
    fn diagnostic_display() {
        let diagnostic = Diagnostic::error(
            DiagnosticKind::ExpectedToken,
            Span::new(5, 3, 1, 6),
            "expected ')'",
        );
        let display = format!("{}", diagnostic);
        assert!(display.contains("error"));
        assert!(display.contains("expected token"));
        assert!(display.contains("expected ')'"));
    }

    #[test]
    fn diagnostic_with_source() {
        let source = "x := 1 +\ny := 2";
        let diagnostic = Diagnostic::error(
            DiagnosticKind::ExpectedExpression,
            Span::point(8, 1, 9),
            "expected expression after '+'",
        );
        let display = diagnostic.display_with_source(source);
        assert!(display.contains("1:9"));
        assert!(display.contains("x := 1 +"));
        assert!(display.contains('^'));
    }

    #[test]
    fn diagnostic_with_source_multichar_span() {
        let source = "Loop Files";
        let diagnostic = Diagnostic::error(
            DiagnosticKind::ExpectedExpression,
            Span::new(5, 5, 1, 6),
            "",
        );
        let display = diagnostic.display_with_source(source);
        assert!(display.contains("^~~~~"));
    }

    #[test]
    fn diagnostic_with_source_invalid_line() {
        let source = "x := 1";
        let diagnostic = Diagnostic::error(
            DiagnosticKind::ExpectedToken,
            Span::new(0, 1, 100, 1),
            "past the end",
        );
        let display = diagnostic.display_with_source(source);
        assert!(display.contains("100:1"));
    }

    #[test]
    fn lex_error_to_diagnostic() {
        let error = LexError::UnterminatedString {
            span: Span::new(0, 6, 1, 1),
        };
        let diagnostic = Diagnostic::from(error);
        assert_eq!(diagnostic.kind, DiagnosticKind::UnterminatedString);
        assert_eq!(diagnostic.severity, Severity::Error);
    }

    #[test]
    fn diagnostics_collection() {
        let mut diagnostics = Diagnostics::new();
        assert!(diagnostics.is_empty());
        assert!(!diagnostics.has_errors());
        assert_eq!(format!("{}", diagnostics), "no diagnostics");

        diagnostics.push(Diagnostic::warning(
            DiagnosticKind::LookaheadLimit,
            Span::point(0, 1, 1),
            "",
        ));
        assert!(!diagnostics.has_errors());

        diagnostics.push(Diagnostic::error(
            DiagnosticKind::ExpectedStatement,
            Span::point(4, 1, 5),
            "",
        ));
        assert_eq!(diagnostics.len(), 2);
        assert!(diagnostics.has_errors());

        let display = format!("{}", diagnostics);
        assert!(display.contains("2 diagnostics:"));
    }

    #[test]
    fn diagnostics_ordering_preserved() {
        let spans = [Span::point(9, 2, 3), Span::point(0, 1, 1)];
        let diagnostics: Diagnostics = spans
            .iter()
            .map(|s| Diagnostic::error(DiagnosticKind::UnexpectedToken, *s, ""))
            .collect();

        // Reported order, not source order
        let collected = diagnostics.into_vec();
        assert_eq!(collected[0].span, spans[0]);
        assert_eq!(collected[1].span, spans[1]);
    }
}
