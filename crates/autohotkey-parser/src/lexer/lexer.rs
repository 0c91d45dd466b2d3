//! Mode-aware tokenizer for AutoHotkey v2.
//!
//! AutoHotkey is line-oriented: a newline usually terminates a statement, so
//! end-of-line is a code token rather than skipped trivia. The lexer tracks
//! three pieces of context to decide what a character means:
//!
//! - the *mode stack*, for regions with their own micro-syntax (directive
//!   arguments, hotstring options, literal hotstring expansions),
//! - *beginning-of-statement*, because hotkey/hotstring triggers, directives,
//!   and block comments are only recognized at the start of a logical line,
//! - *bracket depth* and the last code token, which decide whether a newline
//!   terminates the statement, is plain whitespace inside a group, or is
//!   hidden by a trailing line-continuation operator.

use autohotkey_core::{LexError, Span};
use bumpalo::Bump;

use super::cursor::{Cursor, is_hws, is_ident_continue, is_ident_start};
use super::token::{Channel, Token, TokenKind, is_line_continuation, lookup_keyword};

/// Lexer mode, stacked so nested contexts restore their parent on exit.
///
/// The stack is never empty; [`Mode::Default`] sits at the bottom.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Normal statement and expression scanning.
    Default,
    /// Inside a directive line whose arguments are ordinary tokens.
    Directive,
    /// Inside a directive line whose argument is verbatim text.
    DirectiveText,
    /// Inside the abbreviation segment of a hotstring trigger.
    Hotstring,
    /// Inside the options segment of a hotstring trigger.
    HotstringOptions,
    /// After a literal hotstring trigger, where the rest of the line is
    /// replacement text.
    HotstringExpansion,
}

/// Result of speculatively matching a hotstring trigger at line start.
struct HotstringScan {
    /// Bytes between the first and second `:`.
    options_len: usize,
    /// Bytes between the second `:` and the closing `::`.
    abbrev_len: usize,
    /// Whether the options contain an `X` flag, making the expansion code.
    executable: bool,
}

/// Tokenizes AutoHotkey v2 source code.
///
/// Lexemes are allocated in the arena (`'ast`), so tokens outlive the source
/// string (`'src`). Lexing is total: malformed input produces error tokens
/// and [`LexError`]s, never a panic or an early stop.
pub struct Lexer<'src, 'ast> {
    cursor: Cursor<'src>,
    arena: &'ast Bump,
    /// Mode stack; index 0 is always [`Mode::Default`].
    modes: Vec<Mode>,
    /// Open `(`/`[`/`{`/`%` groups. Newlines inside a group do not
    /// terminate the statement.
    depth: u32,
    /// Whether the next `%` closes a dereference.
    deref_open: bool,
    /// Offset where the current dereference opened, for error reporting.
    deref_start: u32,
    /// True at the start of a logical line.
    bos: bool,
    /// Kind of the most recent code-channel token.
    last_code_kind: Option<TokenKind>,
    errors: Vec<LexError>,
    emitted_eof: bool,
}

impl<'src, 'ast> Lexer<'src, 'ast> {
    /// Create a new lexer for the given source.
    pub fn new(source: &'src str, arena: &'ast Bump) -> Self {
        Self {
            cursor: Cursor::new(source),
            arena,
            modes: vec![Mode::Default],
            depth: 0,
            deref_open: false,
            deref_start: 0,
            bos: true,
            last_code_kind: None,
            errors: Vec::new(),
            emitted_eof: false,
        }
    }

    /// Lex an entire source into a token buffer.
    ///
    /// The buffer always ends with a single [`TokenKind::Eof`] token.
    pub fn tokenize(source: &'src str, arena: &'ast Bump) -> (Vec<Token<'ast>>, Vec<LexError>) {
        let mut lexer = Lexer::new(source, arena);
        let mut tokens = Vec::new();
        loop {
            let token = lexer.next_token();
            let done = token.kind == TokenKind::Eof;
            tokens.push(token);
            if done {
                break;
            }
        }
        (tokens, lexer.errors)
    }

    /// The current mode (top of the mode stack).
    #[inline]
    pub fn mode(&self) -> Mode {
        *self.modes.last().unwrap_or(&Mode::Default)
    }

    fn push_mode(&mut self, mode: Mode) {
        self.modes.push(mode);
    }

    fn pop_mode(&mut self) {
        if self.modes.len() > 1 {
            self.modes.pop();
        }
    }

    /// Pop any line-scoped modes at a statement-terminating newline.
    fn pop_to_default(&mut self) {
        while self.modes.len() > 1 {
            self.modes.pop();
        }
    }

    /// Scan the next token and update line context.
    pub fn next_token(&mut self) -> Token<'ast> {
        let token = self.scan_token();

        match token.channel {
            Channel::Code => {
                self.bos = token.kind == TokenKind::Eol;
                self.last_code_kind = Some(token.kind);
            }
            // Trivia keeps both the statement-start flag and the
            // continuation context.
            Channel::Whitespace | Channel::Comment | Channel::Hidden => {}
        }

        token
    }

    fn scan_token(&mut self) -> Token<'ast> {
        match self.mode() {
            Mode::DirectiveText => return self.scan_raw_text(TokenKind::DirectiveText),
            Mode::HotstringExpansion => return self.scan_raw_text(TokenKind::HotstringText),
            _ => {}
        }

        let start = self.start();

        let Some(ch) = self.cursor.peek() else {
            self.emitted_eof = true;
            return self.make_token(TokenKind::Eof, start, Channel::Code);
        };

        // Newlines and horizontal whitespace first; they feed the
        // line-continuation rules below.
        if ch == '\n' || ch == '\r' {
            return self.scan_eol(start);
        }
        if is_hws(ch) {
            self.cursor.eat_while(is_hws);
            let channel = if self.last_code_kind.is_some_and(is_line_continuation) {
                Channel::Hidden
            } else {
                Channel::Whitespace
            };
            return self.make_token(TokenKind::Whitespace, start, channel);
        }

        // Comments. A `;` comment must be at line start or follow whitespace,
        // so `x;y` stays an expression. Block comments open only at
        // statement start.
        if ch == ';' && self.comment_possible() {
            while self.cursor.check(|c| c != '\n' && c != '\r') {
                self.cursor.advance();
            }
            return self.make_token(TokenKind::Comment, start, Channel::Comment);
        }
        if ch == '/' && self.bos && self.cursor.check_str("/*") {
            return self.scan_block_comment(start);
        }

        // Line-leading constructs: hotkey and hotstring triggers, directives.
        if self.bos && self.mode() == Mode::Default {
            if ch == ':' {
                if let Some(scan) = scan_hotstring(self.cursor.rest()) {
                    return self.scan_hotstring_trigger(start, scan);
                }
            } else if is_key_char(ch) {
                if let Some(len) = scan_hotkey(self.cursor.rest()) {
                    self.cursor.advance_bytes(len);
                    return self.make_token(TokenKind::HotkeyTrigger, start, Channel::Code);
                }
            }
            if ch == '#' && self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_alphabetic()) {
                return self.scan_directive(start);
            }
        }

        if ch.is_ascii_digit() {
            return self.scan_number(start);
        }
        if ch == '"' || ch == '\'' {
            return self.scan_string(start, ch);
        }
        if is_ident_start(ch) {
            self.cursor.advance();
            self.cursor.eat_while(is_ident_continue);
            let lexeme = self.cursor.slice_from(start.0);
            let kind = lookup_keyword(lexeme).unwrap_or(TokenKind::Identifier);
            return self.make_token(kind, start, Channel::Code);
        }

        self.scan_operator(start, ch)
    }

    /// Byte offset, line, and column at the start of the current token.
    #[inline]
    fn start(&self) -> (u32, u32, u32) {
        (self.cursor.offset(), self.cursor.line(), self.cursor.column())
    }

    fn make_token(&self, kind: TokenKind, start: (u32, u32, u32), channel: Channel) -> Token<'ast> {
        let (offset, line, col) = start;
        let text = self.cursor.slice_from(offset);
        let span = Span::new(offset, text.len() as u32, line, col);
        let lexeme: &'ast str = self.arena.alloc_str(text);
        Token::new(kind, lexeme, span, channel)
    }

    fn comment_possible(&self) -> bool {
        match self.cursor.prev_byte() {
            None => true,
            Some(b) => b == b' ' || b == b'\t' || b == b'\n' || b == b'\r',
        }
    }

    fn scan_eol(&mut self, start: (u32, u32, u32)) -> Token<'ast> {
        // \r\n counts as one terminator.
        if !self.cursor.eat('\r') || self.cursor.peek() == Some('\n') {
            self.cursor.eat('\n');
        }

        // An unclosed `%` cannot span lines.
        if self.deref_open {
            let span = Span::new(self.deref_start, 1, start.1, start.2);
            self.errors.push(LexError::UnterminatedDeref { span });
            self.deref_open = false;
            self.depth = self.depth.saturating_sub(1);
        }

        if self.depth > 0 {
            // Inside a group the newline is just spacing.
            return self.make_token(TokenKind::Eol, start, Channel::Whitespace);
        }

        let continued = self
            .last_code_kind
            .is_some_and(|k| is_line_continuation(k) && k != TokenKind::LeftBrace);
        if continued {
            return self.make_token(TokenKind::Eol, start, Channel::Hidden);
        }

        self.pop_to_default();
        self.make_token(TokenKind::Eol, start, Channel::Code)
    }

    fn scan_block_comment(&mut self, start: (u32, u32, u32)) -> Token<'ast> {
        self.cursor.advance_bytes(2);
        while !self.cursor.is_eof() {
            if self.cursor.check_str("*/") {
                self.cursor.advance_bytes(2);
                break;
            }
            self.cursor.advance();
        }
        // An unterminated block comment swallows the rest of the file, which
        // is what AutoHotkey itself does.
        self.make_token(TokenKind::Comment, start, Channel::Comment)
    }

    fn scan_directive(&mut self, start: (u32, u32, u32)) -> Token<'ast> {
        self.cursor.advance(); // '#'
        self.cursor.eat_while(|c| c.is_ascii_alphanumeric());

        let name = &self.cursor.slice_from(start.0)[1..];
        // Unknown directives get the most permissive treatment so the rest
        // of the line cannot cascade into bogus expression errors.
        match super::token::lookup_directive(name) {
            Some(super::token::DirectiveKind::Text) | None => {
                self.push_mode(Mode::DirectiveText);
            }
            Some(_) => self.push_mode(Mode::Directive),
        }

        self.make_token(TokenKind::Directive, start, Channel::Code)
    }

    /// Scan the rest of the line verbatim in a text-argument mode.
    fn scan_raw_text(&mut self, kind: TokenKind) -> Token<'ast> {
        let start = self.start();

        // Leading spacing stays trivia so the text token spans exactly the
        // argument.
        if self.cursor.check(is_hws) {
            self.cursor.eat_while(is_hws);
            return self.make_token(TokenKind::Whitespace, start, Channel::Whitespace);
        }

        if self.cursor.is_eof() || self.cursor.check(|c| c == '\n' || c == '\r') {
            // Empty argument; let the default mode emit the EOL or EOF.
            self.pop_mode();
            return self.scan_token();
        }

        // A `;` right after the spacing means the whole argument is a
        // comment, so the argument itself is empty.
        if self.cursor.peek() == Some(';') && self.comment_possible() {
            self.pop_mode();
            return self.scan_token();
        }

        // The argument runs to end of line, except that a whitespace-led
        // `;` starts a trailing comment.
        let rest = self.cursor.rest();
        let line = &rest[..rest.find(['\n', '\r']).unwrap_or(rest.len())];
        let mut text_len = line.len();
        for (i, _) in line.match_indices(';') {
            if line[..i].ends_with(is_hws) {
                text_len = line[..i].trim_end_matches(is_hws).len();
                break;
            }
        }
        self.cursor.advance_bytes(text_len);
        self.pop_mode();
        self.make_token(kind, start, Channel::Code)
    }

    /// Consume a hotstring trigger already validated by [`scan_hotstring`].
    ///
    /// Walks the trigger segment by segment, entering the options and
    /// abbreviation modes as it goes. A literal hotstring leaves the lexer
    /// in [`Mode::HotstringExpansion`] for the rest of the line.
    fn scan_hotstring_trigger(&mut self, start: (u32, u32, u32), scan: HotstringScan) -> Token<'ast> {
        self.push_mode(Mode::Hotstring);

        self.cursor.advance(); // first ':'
        self.push_mode(Mode::HotstringOptions);
        self.cursor.advance_bytes(scan.options_len);
        self.pop_mode();

        self.cursor.advance(); // second ':'
        self.cursor.advance_bytes(scan.abbrev_len);
        self.cursor.advance_bytes(2); // closing '::'
        self.pop_mode();

        if !scan.executable {
            self.push_mode(Mode::HotstringExpansion);
        }

        self.make_token(TokenKind::HotstringTrigger, start, Channel::Code)
    }

    fn scan_number(&mut self, start: (u32, u32, u32)) -> Token<'ast> {
        if self.cursor.check_str("0x") || self.cursor.check_str("0X") {
            self.cursor.advance_bytes(2);
            self.cursor.eat_while(|c| c.is_ascii_hexdigit());
            return self.make_token(TokenKind::IntLiteral, start, Channel::Code);
        }

        self.cursor.eat_while(|c| c.is_ascii_digit());
        let mut is_float = false;

        // Only consume '.' when a digit follows, so `1.x` stays a member
        // access on the integer 1.
        if self.cursor.peek() == Some('.') && self.cursor.peek_nth(1).is_some_and(|c| c.is_ascii_digit())
        {
            is_float = true;
            self.cursor.advance();
            self.cursor.eat_while(|c| c.is_ascii_digit());
        }

        if self.cursor.check(|c| c == 'e' || c == 'E') {
            let mut n = 1;
            if matches!(self.cursor.peek_nth(1), Some('+') | Some('-')) {
                n = 2;
            }
            if self.cursor.peek_nth(n).is_some_and(|c| c.is_ascii_digit()) {
                is_float = true;
                self.cursor.advance(); // e
                if n == 2 {
                    self.cursor.advance(); // sign
                }
                self.cursor.eat_while(|c| c.is_ascii_digit());
            }
        }

        let kind = if is_float {
            TokenKind::FloatLiteral
        } else {
            TokenKind::IntLiteral
        };
        self.make_token(kind, start, Channel::Code)
    }

    fn scan_string(&mut self, start: (u32, u32, u32), quote: char) -> Token<'ast> {
        self.cursor.advance(); // opening quote

        loop {
            match self.cursor.peek() {
                None | Some('\n') | Some('\r') => {
                    let (offset, line, col) = start;
                    let len = self.cursor.offset() - offset;
                    self.errors.push(LexError::UnterminatedString {
                        span: Span::new(offset, len, line, col),
                    });
                    break;
                }
                Some('`') => {
                    // Backtick escapes the next character, including quotes.
                    self.cursor.advance();
                    self.cursor.advance();
                }
                Some(c) if c == quote => {
                    self.cursor.advance();
                    break;
                }
                Some(_) => {
                    self.cursor.advance();
                }
            }
        }

        self.make_token(TokenKind::StringLiteral, start, Channel::Code)
    }

    fn scan_operator(&mut self, start: (u32, u32, u32), ch: char) -> Token<'ast> {
        use TokenKind::*;

        // Maximal munch via explicit multi-char checks, longest first.
        let kind = match ch {
            '(' => {
                self.depth += 1;
                self.cursor.advance();
                LeftParen
            }
            ')' => {
                self.depth = self.depth.saturating_sub(1);
                self.cursor.advance();
                RightParen
            }
            '[' => {
                self.depth += 1;
                self.cursor.advance();
                LeftBracket
            }
            ']' => {
                self.depth = self.depth.saturating_sub(1);
                self.cursor.advance();
                RightBracket
            }
            '{' => {
                self.cursor.advance();
                LeftBrace
            }
            '}' => {
                self.cursor.advance();
                RightBrace
            }
            ',' => {
                self.cursor.advance();
                Comma
            }
            '%' => {
                self.cursor.advance();
                if self.deref_open {
                    self.deref_open = false;
                    self.depth = self.depth.saturating_sub(1);
                    DerefEnd
                } else {
                    self.deref_open = true;
                    self.deref_start = start.0;
                    self.depth += 1;
                    DerefStart
                }
            }
            ':' => {
                self.cursor.advance();
                if self.cursor.eat('=') { Assign } else { Colon }
            }
            '+' => {
                self.cursor.advance();
                if self.cursor.eat('+') {
                    PlusPlus
                } else if self.cursor.eat('=') {
                    PlusAssign
                } else {
                    Plus
                }
            }
            '-' => {
                self.cursor.advance();
                if self.cursor.eat('-') {
                    MinusMinus
                } else if self.cursor.eat('=') {
                    MinusAssign
                } else {
                    Minus
                }
            }
            '*' => {
                self.cursor.advance();
                if self.cursor.eat('*') {
                    StarStar
                } else if self.cursor.eat('=') {
                    StarAssign
                } else {
                    Star
                }
            }
            '/' => {
                self.cursor.advance();
                if self.cursor.eat('/') {
                    if self.cursor.eat('=') { SlashSlashAssign } else { SlashSlash }
                } else if self.cursor.eat('=') {
                    SlashAssign
                } else {
                    Slash
                }
            }
            '.' => self.scan_dot(),
            '=' => {
                self.cursor.advance();
                if self.cursor.eat('=') {
                    EqualEqual
                } else if self.cursor.eat('>') {
                    Arrow
                } else {
                    Equal
                }
            }
            '!' => {
                self.cursor.advance();
                if self.cursor.check_str("==") {
                    self.cursor.advance_bytes(2);
                    NotEqualEqual
                } else if self.cursor.eat('=') {
                    NotEqual
                } else {
                    Bang
                }
            }
            '<' => {
                self.cursor.advance();
                if self.cursor.check_str("<=") {
                    self.cursor.advance_bytes(2);
                    ShlAssign
                } else if self.cursor.eat('<') {
                    Shl
                } else if self.cursor.eat('=') {
                    LessEqual
                } else {
                    Less
                }
            }
            '>' => {
                self.cursor.advance();
                if self.cursor.check_str(">>=") {
                    self.cursor.advance_bytes(3);
                    ShrlAssign
                } else if self.cursor.check_str(">>") {
                    self.cursor.advance_bytes(2);
                    Shrl
                } else if self.cursor.check_str(">=") {
                    self.cursor.advance_bytes(2);
                    ShrAssign
                } else if self.cursor.eat('>') {
                    Shr
                } else if self.cursor.eat('=') {
                    GreaterEqual
                } else {
                    Greater
                }
            }
            '&' => {
                self.cursor.advance();
                if self.cursor.eat('&') {
                    AmpAmp
                } else if self.cursor.eat('=') {
                    AmpAssign
                } else {
                    Amp
                }
            }
            '|' => {
                self.cursor.advance();
                if self.cursor.eat('|') {
                    PipePipe
                } else if self.cursor.eat('=') {
                    PipeAssign
                } else {
                    Pipe
                }
            }
            '^' => {
                self.cursor.advance();
                if self.cursor.eat('=') { CaretAssign } else { Caret }
            }
            '~' => {
                self.cursor.advance();
                if self.cursor.eat('=') { RegexMatch } else { Tilde }
            }
            '?' => {
                self.cursor.advance();
                if self.cursor.check_str("?=") {
                    self.cursor.advance_bytes(2);
                    CoalesceAssign
                } else if self.cursor.eat('?') {
                    QuestionQuestion
                } else if self.cursor.eat('.') {
                    QuestionDot
                } else {
                    Question
                }
            }
            _ => {
                self.cursor.advance();
                let (offset, line, col) = start;
                let len = self.cursor.offset() - offset;
                self.errors.push(LexError::UnexpectedCharacter {
                    ch,
                    span: Span::new(offset, len, line, col),
                });
                UnexpectedCharacter
            }
        };

        self.make_token(kind, start, Channel::Code)
    }

    /// `.` is three tokens in one character: `.=` assigns, whitespace on both
    /// sides concatenates, anything else is member access.
    fn scan_dot(&mut self) -> TokenKind {
        let spaced_before = self
            .cursor
            .prev_byte()
            .is_some_and(|b| b == b' ' || b == b'\t');
        self.cursor.advance();

        if self.cursor.eat('=') {
            return TokenKind::ConcatAssign;
        }

        let spaced_after = self.cursor.check(is_hws);
        if spaced_before && spaced_after {
            TokenKind::ConcatDot
        } else {
            TokenKind::Dot
        }
    }
}

impl<'ast> Iterator for Lexer<'_, 'ast> {
    type Item = Token<'ast>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.emitted_eof {
            return None;
        }
        Some(self.next_token())
    }
}

/// Characters that can appear in a hotkey name before the `::`, including
/// modifier symbols (`#!^+<>*~$`), `&` for custom combinations, and spaces.
fn is_key_char(c: char) -> bool {
    c.is_ascii_alphanumeric()
        || c == '_'
        || matches!(c, '#' | '!' | '^' | '+' | '<' | '>' | '*' | '~' | '$' | '&' | ' ' | '\t')
}

/// Try to match a hotkey trigger (`F1::`, `^!s::`, `a & b::`) at the start
/// of `rest`. Returns the byte length of the trigger including the `::`.
fn scan_hotkey(rest: &str) -> Option<usize> {
    for (i, c) in rest.char_indices() {
        if rest[i..].starts_with("::") {
            return if i > 0 { Some(i + 2) } else { None };
        }
        // Non-ASCII characters are valid single-character key names.
        if c.is_ascii() && !is_key_char(c) {
            return None;
        }
    }
    None
}

/// Try to match a hotstring trigger (`:options:abbrev::`) at the start of
/// `rest`. The `X` option (not followed by `0`) marks the expansion as
/// executable code rather than replacement text.
fn scan_hotstring(rest: &str) -> Option<HotstringScan> {
    let mut chars = rest.char_indices();
    let (_, first) = chars.next()?;
    if first != ':' {
        return None;
    }

    // Options segment: everything up to the next ':'.
    let mut executable = false;
    let mut options_end = None;
    let mut prev_x = false;
    for (i, c) in chars.by_ref() {
        match c {
            ':' => {
                options_end = Some(i);
                break;
            }
            '\n' | '\r' => return None,
            'x' | 'X' => {
                executable = true;
                prev_x = true;
            }
            '0' => {
                if prev_x {
                    executable = false;
                }
                prev_x = false;
            }
            c if c.is_ascii_graphic() => prev_x = false,
            _ => return None,
        }
    }
    let options_end = options_end?;

    // Abbreviation segment: non-empty, ends at '::', single line.
    let abbrev_start = options_end + 1;
    let tail = &rest[abbrev_start..];
    let mut end = None;
    for (i, c) in tail.char_indices() {
        if tail[i..].starts_with("::") {
            end = Some(i);
            break;
        }
        if c == '\n' || c == '\r' {
            return None;
        }
    }
    let abbrev_len = end?;
    if abbrev_len == 0 {
        return None;
    }

    Some(HotstringScan {
        options_len: options_end - 1,
        abbrev_len,
        executable,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> (Vec<TokenKind>, Vec<LexError>) {
        let arena = Bump::new();
        let (tokens, errors) = Lexer::tokenize(source, &arena);
        let kinds = tokens
            .iter()
            .filter(|t| t.is_code())
            .map(|t| t.kind)
            .collect();
        (kinds, errors)
    }

    fn lex_ok(source: &str) -> Vec<TokenKind> {
        let (kinds, errors) = lex(source);
        assert!(errors.is_empty(), "unexpected lex errors: {errors:?}");
        kinds
    }

    #[test]
    fn assignment_statement() {
        use TokenKind::*;
        assert_eq!(
            lex_ok("x := 1 + 2 * 3"),
            vec![Identifier, Assign, IntLiteral, Plus, IntLiteral, Star, IntLiteral, Eof]
        );
    }

    #[test]
    fn keywords_are_case_insensitive() {
        use TokenKind::*;
        assert_eq!(lex_ok("IF x")[..2], [If, Identifier]);
        assert_eq!(lex_ok("Loop 5")[..2], [Loop, IntLiteral]);
        assert_eq!(lex_ok("WHILE x")[..2], [While, Identifier]);
    }

    #[test]
    fn keyword_lexeme_preserves_case() {
        let arena = Bump::new();
        let (tokens, _) = Lexer::tokenize("If x", &arena);
        assert_eq!(tokens[0].kind, TokenKind::If);
        assert_eq!(tokens[0].lexeme, "If");
    }

    #[test]
    fn number_forms() {
        use TokenKind::*;
        assert_eq!(lex_ok("42")[0], IntLiteral);
        assert_eq!(lex_ok("0xFF")[0], IntLiteral);
        assert_eq!(lex_ok("3.14")[0], FloatLiteral);
        assert_eq!(lex_ok("1e3")[0], FloatLiteral);
        assert_eq!(lex_ok("2.5e-4")[0], FloatLiteral);
    }

    #[test]
    fn dot_after_int_is_member_access() {
        use TokenKind::*;
        assert_eq!(lex_ok("1.x")[..3], [IntLiteral, Dot, Identifier]);
    }

    #[test]
    fn string_with_escape() {
        let arena = Bump::new();
        let (tokens, errors) = Lexer::tokenize(r#""say `"hi`"""#, &arena);
        assert!(errors.is_empty());
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].lexeme, r#""say `"hi`"""#);
    }

    #[test]
    fn single_quoted_string() {
        assert_eq!(lex_ok("'hi'")[0], TokenKind::StringLiteral);
    }

    #[test]
    fn unterminated_string_reports_error() {
        let (kinds, errors) = lex("x := \"oops\ny := 1");
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], LexError::UnterminatedString { .. }));
        // Lexing continues on the next line.
        assert!(kinds.contains(&TokenKind::Eol));
        assert_eq!(kinds.last(), Some(&TokenKind::Eof));
    }

    #[test]
    fn semicolon_comment_requires_leading_whitespace() {
        use TokenKind::*;
        // Comment at line start and after a space.
        assert_eq!(lex_ok("; note"), vec![Eof]);
        assert_eq!(lex_ok("x := 1 ; note")[..3], [Identifier, Assign, IntLiteral]);
        // Glued to an identifier it is not a comment.
        let (kinds, errors) = lex("x;y");
        assert_eq!(kinds[0], Identifier);
        assert!(!errors.is_empty()); // bare ';' has no other meaning
    }

    #[test]
    fn block_comment_at_line_start() {
        use TokenKind::*;
        assert_eq!(lex_ok("/* one\ntwo */\nx"), vec![Eol, Identifier, Eof]);
        // Mid-expression '/' '*' stays division and multiplication.
        assert_eq!(lex_ok("a / *b")[..2], [Identifier, Slash]);
    }

    #[test]
    fn eol_terminates_statement() {
        use TokenKind::*;
        assert_eq!(
            lex_ok("x := 1\ny := 2"),
            vec![
                Identifier, Assign, IntLiteral, Eol, Identifier, Assign, IntLiteral, Eof
            ]
        );
    }

    #[test]
    fn eol_inside_parens_is_whitespace() {
        use TokenKind::*;
        assert_eq!(
            lex_ok("f(\n  1,\n  2\n)"),
            vec![Identifier, LeftParen, IntLiteral, Comma, IntLiteral, RightParen, Eof]
        );
    }

    #[test]
    fn eol_after_binary_operator_is_hidden() {
        use TokenKind::*;
        // The newline after '+' continues the expression.
        assert_eq!(
            lex_ok("x := 1 +\n2"),
            vec![Identifier, Assign, IntLiteral, Plus, IntLiteral, Eof]
        );
    }

    #[test]
    fn eol_after_open_brace_is_not_hidden() {
        use TokenKind::*;
        assert_eq!(
            lex_ok("loop 5 {\n}"),
            vec![Loop, IntLiteral, LeftBrace, Eol, RightBrace, Eof]
        );
    }

    #[test]
    fn deref_toggles() {
        use TokenKind::*;
        assert_eq!(
            lex_ok("x := %name%"),
            vec![Identifier, Assign, DerefStart, Identifier, DerefEnd, Eof]
        );
    }

    #[test]
    fn unterminated_deref_reports_error() {
        let (_, errors) = lex("x := %name\ny := 1");
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], LexError::UnterminatedDeref { .. }));
    }

    #[test]
    fn hotkey_trigger() {
        let arena = Bump::new();
        let (tokens, errors) = Lexer::tokenize("F1::MsgBox(\"hi\")", &arena);
        assert!(errors.is_empty());
        let code: Vec<_> = tokens.iter().filter(|t| t.is_code()).collect();
        assert_eq!(code[0].kind, TokenKind::HotkeyTrigger);
        assert_eq!(code[0].lexeme, "F1::");
        assert_eq!(code[1].kind, TokenKind::Identifier);
    }

    #[test]
    fn hotkey_trigger_with_modifiers() {
        let arena = Bump::new();
        let (tokens, _) = Lexer::tokenize("^!s::Save()", &arena);
        assert_eq!(tokens[0].kind, TokenKind::HotkeyTrigger);
        assert_eq!(tokens[0].lexeme, "^!s::");
    }

    #[test]
    fn custom_combination_hotkey() {
        let arena = Bump::new();
        let (tokens, _) = Lexer::tokenize("a & b::c", &arena);
        assert_eq!(tokens[0].kind, TokenKind::HotkeyTrigger);
        assert_eq!(tokens[0].lexeme, "a & b::");
    }

    #[test]
    fn assignment_is_not_a_hotkey() {
        use TokenKind::*;
        assert_eq!(lex_ok("x := 1")[..2], [Identifier, Assign]);
    }

    #[test]
    fn literal_hotstring() {
        let arena = Bump::new();
        let (tokens, errors) = Lexer::tokenize("::btw::by the way", &arena);
        assert!(errors.is_empty());
        let code: Vec<_> = tokens.iter().filter(|t| t.is_code()).collect();
        assert_eq!(code[0].kind, TokenKind::HotstringTrigger);
        assert_eq!(code[0].lexeme, "::btw::");
        assert_eq!(code[1].kind, TokenKind::HotstringText);
        assert_eq!(code[1].lexeme, "by the way");
    }

    #[test]
    fn executable_hotstring_lexes_code() {
        let arena = Bump::new();
        let (tokens, _) = Lexer::tokenize(":X:btw::MsgBox(\"hi\")", &arena);
        let code: Vec<_> = tokens.iter().filter(|t| t.is_code()).collect();
        assert_eq!(code[0].kind, TokenKind::HotstringTrigger);
        assert_eq!(code[1].kind, TokenKind::Identifier);
        assert_eq!(code[1].lexeme, "MsgBox");
    }

    #[test]
    fn x0_option_stays_literal() {
        let arena = Bump::new();
        let (tokens, _) = Lexer::tokenize(":X0:btw::not code", &arena);
        let code: Vec<_> = tokens.iter().filter(|t| t.is_code()).collect();
        assert_eq!(code[0].kind, TokenKind::HotstringTrigger);
        assert_eq!(code[1].kind, TokenKind::HotstringText);
    }

    #[test]
    fn textual_directive() {
        let arena = Bump::new();
        let (tokens, errors) = Lexer::tokenize("#Include lib\\util.ahk", &arena);
        assert!(errors.is_empty());
        let code: Vec<_> = tokens.iter().filter(|t| t.is_code()).collect();
        assert_eq!(code[0].kind, TokenKind::Directive);
        assert_eq!(code[0].lexeme, "#Include");
        assert_eq!(code[1].kind, TokenKind::DirectiveText);
        assert_eq!(code[1].lexeme, "lib\\util.ahk");
    }

    #[test]
    fn directive_text_stops_before_a_trailing_comment() {
        let arena = Bump::new();
        let (tokens, _) = Lexer::tokenize("#Include a;b.ahk ; the lib", &arena);
        let code: Vec<_> = tokens.iter().filter(|t| t.is_code()).collect();
        // A ';' glued to the text is part of it; only a whitespace-led ';'
        // opens a comment.
        assert_eq!(code[1].lexeme, "a;b.ahk");
        assert!(
            tokens
                .iter()
                .any(|t| t.kind == TokenKind::Comment && t.lexeme == "; the lib")
        );
    }

    #[test]
    fn directive_with_only_a_comment_has_no_text() {
        let arena = Bump::new();
        let (tokens, errors) = Lexer::tokenize("#Include ; note", &arena);
        assert!(errors.is_empty());
        assert!(tokens.iter().all(|t| t.kind != TokenKind::DirectiveText));
        assert!(
            tokens
                .iter()
                .any(|t| t.kind == TokenKind::Comment && t.lexeme == "; note")
        );
    }

    #[test]
    fn numeric_directive_lexes_argument_as_code() {
        let arena = Bump::new();
        let (tokens, _) = Lexer::tokenize("#MaxThreads 20", &arena);
        let code: Vec<_> = tokens.iter().filter(|t| t.is_code()).collect();
        assert_eq!(code[0].kind, TokenKind::Directive);
        assert_eq!(code[1].kind, TokenKind::IntLiteral);
    }

    #[test]
    fn unknown_directive_falls_back_to_text() {
        let arena = Bump::new();
        let (tokens, _) = Lexer::tokenize("#FutureThing a b c", &arena);
        let code: Vec<_> = tokens.iter().filter(|t| t.is_code()).collect();
        assert_eq!(code[0].kind, TokenKind::Directive);
        assert_eq!(code[1].kind, TokenKind::DirectiveText);
        assert_eq!(code[1].lexeme, "a b c");
    }

    #[test]
    fn dot_disambiguation() {
        use TokenKind::*;
        assert_eq!(lex_ok("a.b")[..3], [Identifier, Dot, Identifier]);
        assert_eq!(lex_ok("a . b")[..3], [Identifier, ConcatDot, Identifier]);
        assert_eq!(lex_ok("a .= b")[..3], [Identifier, ConcatAssign, Identifier]);
        // One-sided spacing is member access.
        assert_eq!(lex_ok("a. b")[..3], [Identifier, Dot, Identifier]);
    }

    #[test]
    fn question_family() {
        use TokenKind::*;
        assert_eq!(lex_ok("a ?? b")[1], QuestionQuestion);
        assert_eq!(lex_ok("a ??= b")[1], CoalesceAssign);
        assert_eq!(lex_ok("a?.b")[1], QuestionDot);
        assert_eq!(lex_ok("a ? b : c")[1], Question);
    }

    #[test]
    fn shift_operators() {
        use TokenKind::*;
        assert_eq!(lex_ok("a >> b")[1], Shr);
        assert_eq!(lex_ok("a >>> b")[1], Shrl);
        assert_eq!(lex_ok("a >>>= b")[1], ShrlAssign);
        assert_eq!(lex_ok("a >>= b")[1], ShrAssign);
        assert_eq!(lex_ok("a << b")[1], Shl);
    }

    #[test]
    fn comparison_operators() {
        use TokenKind::*;
        assert_eq!(lex_ok("a = b")[1], Equal);
        assert_eq!(lex_ok("a == b")[1], EqualEqual);
        assert_eq!(lex_ok("a != b")[1], NotEqual);
        assert_eq!(lex_ok("a !== b")[1], NotEqualEqual);
        assert_eq!(lex_ok("a ~= b")[1], RegexMatch);
    }

    #[test]
    fn unexpected_character_is_a_token() {
        let (kinds, errors) = lex("x := @");
        assert_eq!(errors.len(), 1);
        assert!(matches!(errors[0], LexError::UnexpectedCharacter { ch: '@', .. }));
        assert!(kinds.contains(&TokenKind::UnexpectedCharacter));
        assert_eq!(kinds.last(), Some(&TokenKind::Eof));
    }

    #[test]
    fn crlf_is_one_eol() {
        use TokenKind::*;
        assert_eq!(lex_ok("x\r\ny"), vec![Identifier, Eol, Identifier, Eof]);
    }

    #[test]
    fn whitespace_after_continuation_operator_is_hidden() {
        let arena = Bump::new();
        let (tokens, _) = Lexer::tokenize("x := 1", &arena);
        let after_assign = tokens
            .iter()
            .skip_while(|t| t.kind != TokenKind::Assign)
            .nth(1)
            .copied();
        assert_eq!(after_assign.map(|t| t.channel), Some(Channel::Hidden));
    }

    #[test]
    fn spans_track_positions() {
        let arena = Bump::new();
        let (tokens, _) = Lexer::tokenize("x := 1\ny := 2", &arena);
        let second_line: Vec<_> = tokens.iter().filter(|t| t.span.line == 2).collect();
        assert!(!second_line.is_empty());
        assert_eq!(second_line[0].lexeme, "y");
        assert_eq!(second_line[0].span.col, 1);
        assert_eq!(second_line[0].span.start, 7);
    }

    #[test]
    fn hotstring_scan_rejects_unclosed() {
        assert!(scan_hotstring("::btw").is_none());
        assert!(scan_hotstring(":opts").is_none());
        assert!(scan_hotstring("::::").is_none()); // empty abbreviation
    }

    #[test]
    fn hotkey_scan_rejects_plain_lines() {
        assert!(scan_hotkey("MsgBox(\"hi\")").is_none());
        assert!(scan_hotkey("x := 1").is_none());
        assert_eq!(scan_hotkey("F1::body"), Some(4));
    }
}
