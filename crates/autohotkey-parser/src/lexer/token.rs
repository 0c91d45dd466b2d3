//! Token types and definitions for the AutoHotkey v2 lexer.
//!
//! AutoHotkey keywords are case-insensitive, so [`lookup_keyword`] and
//! [`lookup_directive`] both fold case before matching.

use autohotkey_core::Span;
use std::fmt;

/// The channel a token is emitted on.
///
/// The parser's filtered view only sees [`Channel::Code`] tokens, but the
/// other channels stay in the buffer: concatenation-by-adjacency needs to see
/// whether whitespace separated two terms, and line-continuation rules demote
/// the newline after a binary operator to [`Channel::Hidden`] rather than
/// deleting it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Channel {
    /// Significant tokens, including statement-terminating newlines.
    Code,
    /// Insignificant horizontal whitespace (and newlines inside groups).
    Whitespace,
    /// `;` and `/* */` comments.
    Comment,
    /// Whitespace/newlines swallowed by a line continuation.
    Hidden,
}

/// A token from the source code.
///
/// The `'ast` lifetime refers to the arena where the lexeme string is
/// allocated, so the source string can be freed after lexing.
#[derive(Clone, Copy, PartialEq)]
pub struct Token<'ast> {
    /// The type of token.
    pub kind: TokenKind,
    /// The source text of this token (allocated in arena).
    pub lexeme: &'ast str,
    /// Location in source.
    pub span: Span,
    /// Channel this token was emitted on.
    pub channel: Channel,
}

impl<'ast> Token<'ast> {
    /// Create a new token.
    #[inline]
    pub fn new(kind: TokenKind, lexeme: &'ast str, span: Span, channel: Channel) -> Self {
        Self {
            kind,
            lexeme,
            span,
            channel,
        }
    }

    /// Whether this token is on the code channel.
    #[inline]
    pub fn is_code(&self) -> bool {
        self.channel == Channel::Code
    }
}

impl fmt::Debug for Token<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}({:?} @ {:?})", self.kind, self.lexeme, self.span)
    }
}

/// All possible token types in AutoHotkey v2.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // =========================================
    // Literals
    // =========================================
    /// Integer literal: `42`, `0xFF`
    IntLiteral,
    /// Float literal: `3.14`, `1e3`
    FloatLiteral,
    /// String literal: `"hello"`, `'hi'`
    StringLiteral,

    // =========================================
    // Identifiers
    // =========================================
    /// User-defined identifier
    Identifier,

    // =========================================
    // Keywords - Control Flow
    // =========================================
    /// `if`
    If,
    /// `else`
    Else,
    /// `while`
    While,
    /// `loop`
    Loop,
    /// `for`
    For,
    /// `until`
    Until,
    /// `break`
    Break,
    /// `continue`
    Continue,
    /// `return`
    Return,
    /// `goto`
    Goto,
    /// `switch`
    Switch,
    /// `case`
    Case,
    /// `default`
    Default,
    /// `try`
    Try,
    /// `catch`
    Catch,
    /// `finally`
    Finally,
    /// `throw`
    Throw,

    // =========================================
    // Keywords - Declarations
    // =========================================
    /// `class`
    Class,
    /// `extends`
    Extends,
    /// `static`
    Static,
    /// `global`
    Global,
    /// `local`
    Local,

    // =========================================
    // Keywords - Operators (word form)
    // =========================================
    /// `and` (same as `&&`)
    And,
    /// `or` (same as `||`)
    Or,
    /// `not`
    Not,
    /// `is`
    Is,
    /// `in`
    In,
    /// `contains`
    Contains,
    /// `as` (catch binding)
    As,

    // =========================================
    // Keywords - Values
    // =========================================
    /// `true`
    True,
    /// `false`
    False,
    /// `unset`
    Unset,
    /// `this`
    This,
    /// `super`
    Super,
    /// `base`
    Base,

    // =========================================
    // Operators - Assignment
    // =========================================
    /// `:=`
    Assign,
    /// `+=`
    PlusAssign,
    /// `-=`
    MinusAssign,
    /// `*=`
    StarAssign,
    /// `/=`
    SlashAssign,
    /// `//=`
    SlashSlashAssign,
    /// `.=`
    ConcatAssign,
    /// `|=`
    PipeAssign,
    /// `&=`
    AmpAssign,
    /// `^=`
    CaretAssign,
    /// `<<=`
    ShlAssign,
    /// `>>=`
    ShrAssign,
    /// `>>>=`
    ShrlAssign,
    /// `??=`
    CoalesceAssign,

    // =========================================
    // Operators - Arithmetic
    // =========================================
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `*`
    Star,
    /// `/`
    Slash,
    /// `//` integer division
    SlashSlash,
    /// `**` power
    StarStar,

    // =========================================
    // Operators - Comparison
    // =========================================
    /// `=` case-insensitive equality
    Equal,
    /// `==` case-sensitive equality
    EqualEqual,
    /// `!=`
    NotEqual,
    /// `!==`
    NotEqualEqual,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `~=` regex match
    RegexMatch,

    // =========================================
    // Operators - Bitwise
    // =========================================
    /// `&`
    Amp,
    /// `|`
    Pipe,
    /// `^`
    Caret,
    /// `~`
    Tilde,
    /// `<<`
    Shl,
    /// `>>` arithmetic shift
    Shr,
    /// `>>>` logical shift
    Shrl,

    // =========================================
    // Operators - Logical
    // =========================================
    /// `&&`
    AmpAmp,
    /// `||`
    PipePipe,
    /// `!`
    Bang,

    // =========================================
    // Operators - Other
    // =========================================
    /// `.` member access (no surrounding whitespace)
    Dot,
    /// `.` concatenation (whitespace on both sides)
    ConcatDot,
    /// `?`
    Question,
    /// `??` null coalesce
    QuestionQuestion,
    /// `?.` optional member access
    QuestionDot,
    /// `:`
    Colon,
    /// `=>` fat arrow
    Arrow,
    /// `++`
    PlusPlus,
    /// `--`
    MinusMinus,

    // =========================================
    // Delimiters
    // =========================================
    /// `(`
    LeftParen,
    /// `)`
    RightParen,
    /// `[`
    LeftBracket,
    /// `]`
    RightBracket,
    /// `{`
    LeftBrace,
    /// `}`
    RightBrace,
    /// `,`
    Comma,
    /// `%` opening a dereference
    DerefStart,
    /// `%` closing a dereference
    DerefEnd,

    // =========================================
    // Script constructs
    // =========================================
    /// `#Name` at the start of a directive line
    Directive,
    /// The verbatim text argument of a textual directive
    DirectiveText,
    /// `F1::` — a hotkey trigger including the `::`
    HotkeyTrigger,
    /// `::btw::` — a hotstring trigger including options and both `::`
    HotstringTrigger,
    /// The literal expansion text of a hotstring
    HotstringText,

    // =========================================
    // Layout
    // =========================================
    /// End of line (`\n`, `\r\n`, or `\r`)
    Eol,
    /// Horizontal whitespace run
    Whitespace,
    /// `;` or `/* */` comment
    Comment,

    // =========================================
    // Special
    // =========================================
    /// End of file
    Eof,
    /// A character with no valid interpretation (lexing never throws)
    UnexpectedCharacter,
}

impl TokenKind {
    /// Check if this token kind is a keyword.
    pub fn is_keyword(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            If | Else
                | While
                | Loop
                | For
                | Until
                | Break
                | Continue
                | Return
                | Goto
                | Switch
                | Case
                | Default
                | Try
                | Catch
                | Finally
                | Throw
                | Class
                | Extends
                | Static
                | Global
                | Local
                | And
                | Or
                | Not
                | Is
                | In
                | Contains
                | As
                | True
                | False
                | Unset
                | This
                | Super
                | Base
        )
    }

    /// Check if this token kind is a literal.
    pub fn is_literal(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            IntLiteral | FloatLiteral | StringLiteral | True | False | Unset
        )
    }

    /// Check if this token kind is an assignment operator.
    pub fn is_assign_op(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            Assign
                | PlusAssign
                | MinusAssign
                | StarAssign
                | SlashAssign
                | SlashSlashAssign
                | ConcatAssign
                | PipeAssign
                | AmpAssign
                | CaretAssign
                | ShlAssign
                | ShrAssign
                | ShrlAssign
                | CoalesceAssign
        )
    }

    /// Check if this token kind can begin an expression term.
    ///
    /// Drives concatenation-by-adjacency: `a b` concatenates only when the
    /// token after the whitespace could start a fresh term.
    pub fn starts_term(self) -> bool {
        use TokenKind::*;
        matches!(
            self,
            IntLiteral
                | FloatLiteral
                | StringLiteral
                | Identifier
                | True
                | False
                | Unset
                | This
                | Super
                | Base
                | LeftParen
                | LeftBracket
                | LeftBrace
                | DerefStart
        )
    }

    /// Get the string representation of this token kind for error messages.
    pub fn description(self) -> &'static str {
        use TokenKind::*;
        match self {
            IntLiteral => "integer literal",
            FloatLiteral => "float literal",
            StringLiteral => "string literal",
            Identifier => "identifier",
            If => "'if'",
            Else => "'else'",
            While => "'while'",
            Loop => "'loop'",
            For => "'for'",
            Until => "'until'",
            Break => "'break'",
            Continue => "'continue'",
            Return => "'return'",
            Goto => "'goto'",
            Switch => "'switch'",
            Case => "'case'",
            Default => "'default'",
            Try => "'try'",
            Catch => "'catch'",
            Finally => "'finally'",
            Throw => "'throw'",
            Class => "'class'",
            Extends => "'extends'",
            Static => "'static'",
            Global => "'global'",
            Local => "'local'",
            And => "'and'",
            Or => "'or'",
            Not => "'not'",
            Is => "'is'",
            In => "'in'",
            Contains => "'contains'",
            As => "'as'",
            True => "'true'",
            False => "'false'",
            Unset => "'unset'",
            This => "'this'",
            Super => "'super'",
            Base => "'base'",
            Assign => "':='",
            PlusAssign => "'+='",
            MinusAssign => "'-='",
            StarAssign => "'*='",
            SlashAssign => "'/='",
            SlashSlashAssign => "'//='",
            ConcatAssign => "'.='",
            PipeAssign => "'|='",
            AmpAssign => "'&='",
            CaretAssign => "'^='",
            ShlAssign => "'<<='",
            ShrAssign => "'>>='",
            ShrlAssign => "'>>>='",
            CoalesceAssign => "'??='",
            Plus => "'+'",
            Minus => "'-'",
            Star => "'*'",
            Slash => "'/'",
            SlashSlash => "'//'",
            StarStar => "'**'",
            Equal => "'='",
            EqualEqual => "'=='",
            NotEqual => "'!='",
            NotEqualEqual => "'!=='",
            Less => "'<'",
            LessEqual => "'<='",
            Greater => "'>'",
            GreaterEqual => "'>='",
            RegexMatch => "'~='",
            Amp => "'&'",
            Pipe => "'|'",
            Caret => "'^'",
            Tilde => "'~'",
            Shl => "'<<'",
            Shr => "'>>'",
            Shrl => "'>>>'",
            AmpAmp => "'&&'",
            PipePipe => "'||'",
            Bang => "'!'",
            Dot => "'.'",
            ConcatDot => "'.' (concatenation)",
            Question => "'?'",
            QuestionQuestion => "'??'",
            QuestionDot => "'?.'",
            Colon => "':'",
            Arrow => "'=>'",
            PlusPlus => "'++'",
            MinusMinus => "'--'",
            LeftParen => "'('",
            RightParen => "')'",
            LeftBracket => "'['",
            RightBracket => "']'",
            LeftBrace => "'{'",
            RightBrace => "'}'",
            Comma => "','",
            DerefStart => "'%'",
            DerefEnd => "'%'",
            Directive => "directive",
            DirectiveText => "directive text",
            HotkeyTrigger => "hotkey trigger",
            HotstringTrigger => "hotstring trigger",
            HotstringText => "hotstring text",
            Eol => "end of line",
            Whitespace => "whitespace",
            Comment => "comment",
            Eof => "end of file",
            UnexpectedCharacter => "unexpected character",
        }
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Map a keyword string to its [`TokenKind`], or `None` if not a keyword.
///
/// AutoHotkey keywords are case-insensitive (`If`, `IF`, and `if` are the
/// same keyword). The specialized-loop words (`Files`, `Read`, `Reg`,
/// `Parse`) and property accessors (`get`, `set`) are contextual and stay
/// plain identifiers here.
pub fn lookup_keyword(ident: &str) -> Option<TokenKind> {
    use TokenKind::*;
    let lower = ident.to_ascii_lowercase();
    Some(match lower.as_str() {
        // Control flow
        "if" => If,
        "else" => Else,
        "while" => While,
        "loop" => Loop,
        "for" => For,
        "until" => Until,
        "break" => Break,
        "continue" => Continue,
        "return" => Return,
        "goto" => Goto,
        "switch" => Switch,
        "case" => Case,
        "default" => Default,
        "try" => Try,
        "catch" => Catch,
        "finally" => Finally,
        "throw" => Throw,

        // Declarations
        "class" => Class,
        "extends" => Extends,
        "static" => Static,
        "global" => Global,
        "local" => Local,

        // Word operators
        "and" => And,
        "or" => Or,
        "not" => Not,
        "is" => Is,
        "in" => In,
        "contains" => Contains,
        "as" => As,

        // Values
        "true" => True,
        "false" => False,
        "unset" => Unset,
        "this" => This,
        "super" => Super,
        "base" => Base,

        _ => return None,
    })
}

/// What argument shape a directive takes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DirectiveKind {
    /// Verbatim text to end-of-line (`#Include`, `#Requires`, ...)
    Text,
    /// A numeric argument (`#MaxThreads 20`)
    Number,
    /// An optional word argument (`#SingleInstance Force`)
    Word,
    /// No argument (`#NoTrayIcon`)
    Bare,
    /// An optional expression argument (`#HotIf WinActive("A")`)
    HotIf,
}

/// Classify a directive by name (without the leading `#`), or `None` for an
/// unknown directive. Case-insensitive.
pub fn lookup_directive(name: &str) -> Option<DirectiveKind> {
    use DirectiveKind::*;
    let lower = name.to_ascii_lowercase();
    Some(match lower.as_str() {
        "include" | "includeagain" | "dllload" | "requires" | "errorstdout" | "hotstring" => Text,
        "clipboardtimeout" | "hotiftimeout" | "inputlevel" | "maxthreads"
        | "maxthreadsperhotkey" => Number,
        "singleinstance" | "suspendexempt" | "usehook" | "warn" | "maxthreadsbuffer"
        | "persistent" => Word,
        "notrayicon" | "winactivateforce" => Bare,
        "hotif" => HotIf,
        _ => return None,
    })
}

/// Whether a token kind allows the following newline/whitespace to be a line
/// continuation.
///
/// After one of these, the next EOL is demoted to the hidden channel so the
/// expression continues on the next physical line. `{` is in the set for
/// whitespace purposes but never hides an EOL (a block opener ends its
/// logical line).
pub fn is_line_continuation(kind: TokenKind) -> bool {
    use TokenKind::*;
    matches!(
        kind,
        LeftParen
            | LeftBracket
            | LeftBrace
            | DerefStart
            | Comma
            | Assign
            | PlusAssign
            | MinusAssign
            | StarAssign
            | SlashAssign
            | SlashSlashAssign
            | ConcatAssign
            | PipeAssign
            | AmpAssign
            | CaretAssign
            | ShlAssign
            | ShrAssign
            | ShrlAssign
            | CoalesceAssign
            | Plus
            | Minus
            | Star
            | Slash
            | SlashSlash
            | StarStar
            | Equal
            | EqualEqual
            | NotEqual
            | NotEqualEqual
            | Less
            | LessEqual
            | Greater
            | GreaterEqual
            | RegexMatch
            | Amp
            | Pipe
            | Caret
            | Shl
            | Shr
            | Shrl
            | AmpAmp
            | PipePipe
            | And
            | Or
            | Dot
            | ConcatDot
            | Question
            | QuestionQuestion
            | QuestionDot
            | Arrow
    )
}
