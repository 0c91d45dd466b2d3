//! Operator definitions and precedence tables.
//!
//! Binding powers encode precedence for the expression parser: higher binds
//! tighter. Left-associative operators use `(n, n + 1)`, right-associative
//! ones `(n, n - 1)`. The ladder, loosest to tightest: assignment, ternary,
//! `??`, `||`/`or`, `&&`/`and`, `is`/`in`/`contains`, equality, relational,
//! `~=`, concatenation, `|`, `^`, `&`, shifts, additive, multiplicative,
//! power, then the unary and postfix forms.

use std::fmt;

use crate::lexer::TokenKind;

/// Binary operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    /// `+`
    Add,
    /// `-`
    Sub,
    /// `*`
    Mul,
    /// `/`
    Div,
    /// `//` integer division
    IntDiv,
    /// `**` power (right-associative)
    Pow,
    /// String concatenation, written `.` or by plain adjacency
    Concat,
    /// `~=` regex match
    RegexMatch,
    /// `<`
    Less,
    /// `<=`
    LessEqual,
    /// `>`
    Greater,
    /// `>=`
    GreaterEqual,
    /// `=` case-insensitive equality
    Equal,
    /// `==` case-sensitive equality
    CaseEqual,
    /// `!=`
    NotEqual,
    /// `!==`
    CaseNotEqual,
    /// `is` type check
    Is,
    /// `in` membership
    In,
    /// `contains`
    Contains,
    /// `&&` or `and`
    LogicalAnd,
    /// `||` or `or`
    LogicalOr,
    /// `??` null coalesce
    Coalesce,
    /// `&`
    BitAnd,
    /// `|`
    BitOr,
    /// `^`
    BitXor,
    /// `<<`
    Shl,
    /// `>>` arithmetic shift right
    Shr,
    /// `>>>` logical shift right
    Shrl,
}

impl BinaryOp {
    /// Convert a token kind to a binary operator, if it is one.
    ///
    /// `&` doubles as the reference operator and `.` as member access; the
    /// expression parser only asks for a binary reading in infix position.
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        use TokenKind::*;
        Some(match kind {
            Plus => Self::Add,
            Minus => Self::Sub,
            Star => Self::Mul,
            Slash => Self::Div,
            SlashSlash => Self::IntDiv,
            StarStar => Self::Pow,
            ConcatDot => Self::Concat,
            RegexMatch => Self::RegexMatch,
            Less => Self::Less,
            LessEqual => Self::LessEqual,
            Greater => Self::Greater,
            GreaterEqual => Self::GreaterEqual,
            Equal => Self::Equal,
            EqualEqual => Self::CaseEqual,
            NotEqual => Self::NotEqual,
            NotEqualEqual => Self::CaseNotEqual,
            Is => Self::Is,
            In => Self::In,
            Contains => Self::Contains,
            AmpAmp | And => Self::LogicalAnd,
            PipePipe | Or => Self::LogicalOr,
            QuestionQuestion => Self::Coalesce,
            Amp => Self::BitAnd,
            Pipe => Self::BitOr,
            Caret => Self::BitXor,
            Shl => Self::Shl,
            Shr => Self::Shr,
            Shrl => Self::Shrl,
            _ => return None,
        })
    }

    /// Get the binding power (precedence) for this binary operator.
    ///
    /// Returns (left, right) binding powers. `**` is the only
    /// right-associative binary operator.
    pub fn binding_power(self) -> (u8, u8) {
        match self {
            Self::Coalesce => (5, 6),
            Self::LogicalOr => (7, 8),
            Self::LogicalAnd => (9, 10),
            Self::Is | Self::In | Self::Contains => (11, 12),
            Self::Equal | Self::CaseEqual | Self::NotEqual | Self::CaseNotEqual => (13, 14),
            Self::Less | Self::LessEqual | Self::Greater | Self::GreaterEqual => (15, 16),
            Self::RegexMatch => (17, 18),
            Self::Concat => (19, 20),
            Self::BitOr => (21, 22),
            Self::BitXor => (23, 24),
            Self::BitAnd => (25, 26),
            Self::Shl | Self::Shr | Self::Shrl => (27, 28),
            Self::Add | Self::Sub => (29, 30),
            Self::Mul | Self::Div | Self::IntDiv => (31, 32),
            Self::Pow => (34, 33),
        }
    }
}

impl fmt::Display for BinaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Add => "+",
            Self::Sub => "-",
            Self::Mul => "*",
            Self::Div => "/",
            Self::IntDiv => "//",
            Self::Pow => "**",
            Self::Concat => ".",
            Self::RegexMatch => "~=",
            Self::Less => "<",
            Self::LessEqual => "<=",
            Self::Greater => ">",
            Self::GreaterEqual => ">=",
            Self::Equal => "=",
            Self::CaseEqual => "==",
            Self::NotEqual => "!=",
            Self::CaseNotEqual => "!==",
            Self::Is => "is",
            Self::In => "in",
            Self::Contains => "contains",
            Self::LogicalAnd => "&&",
            Self::LogicalOr => "||",
            Self::Coalesce => "??",
            Self::BitAnd => "&",
            Self::BitOr => "|",
            Self::BitXor => "^",
            Self::Shl => "<<",
            Self::Shr => ">>",
            Self::Shrl => ">>>",
        };
        write!(f, "{s}")
    }
}

/// Unary prefix operators.
///
/// `&` in prefix position builds a variable reference node instead, and `%`
/// opens a dereference, so neither appears here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    /// `+`
    Plus,
    /// `-`
    Minus,
    /// `!`
    LogicalNot,
    /// `not` (binds looser than the symbol form)
    WordNot,
    /// `~`
    BitNot,
    /// `++x`
    Increment,
    /// `--x`
    Decrement,
}

impl UnaryOp {
    /// Convert a token kind to a unary operator, if it is one.
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        use TokenKind::*;
        Some(match kind {
            Plus => Self::Plus,
            Minus => Self::Minus,
            Bang => Self::LogicalNot,
            Not => Self::WordNot,
            Tilde => Self::BitNot,
            PlusPlus => Self::Increment,
            MinusMinus => Self::Decrement,
            _ => return None,
        })
    }

    /// Binding power of the operand.
    ///
    /// `not x ** y` negates the power, while `!x ** y` raises the negation,
    /// so `not` sits just below `**` and the symbol forms just above it.
    pub fn binding_power(self) -> u8 {
        match self {
            Self::WordNot => 33,
            _ => 37,
        }
    }
}

impl fmt::Display for UnaryOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Plus => "+",
            Self::Minus => "-",
            Self::LogicalNot => "!",
            Self::WordNot => "not",
            Self::BitNot => "~",
            Self::Increment => "++",
            Self::Decrement => "--",
        };
        write!(f, "{s}")
    }
}

/// Postfix operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PostfixOp {
    /// `++`
    Increment,
    /// `--`
    Decrement,
}

impl PostfixOp {
    /// Convert a token kind to a postfix operator, if it is one.
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        match kind {
            TokenKind::PlusPlus => Some(Self::Increment),
            TokenKind::MinusMinus => Some(Self::Decrement),
            _ => None,
        }
    }
}

impl fmt::Display for PostfixOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Increment => "++",
            Self::Decrement => "--",
        };
        write!(f, "{s}")
    }
}

/// Left binding power of call, index, member access, and the postfix
/// operators. Tighter than every prefix operator.
pub const POSTFIX_BP: u8 = 39;

/// Left binding power of the ternary conditional.
pub const TERNARY_BP: u8 = 3;

/// Assignment operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AssignOp {
    /// `:=`
    Assign,
    /// `+=`
    Add,
    /// `-=`
    Sub,
    /// `*=`
    Mul,
    /// `/=`
    Div,
    /// `//=`
    IntDiv,
    /// `.=`
    Concat,
    /// `|=`
    BitOr,
    /// `&=`
    BitAnd,
    /// `^=`
    BitXor,
    /// `<<=`
    Shl,
    /// `>>=`
    Shr,
    /// `>>>=`
    Shrl,
    /// `??=`
    Coalesce,
}

impl AssignOp {
    /// Convert a token kind to an assignment operator, if it is one.
    pub fn from_token(kind: TokenKind) -> Option<Self> {
        use TokenKind::*;
        Some(match kind {
            Assign => Self::Assign,
            PlusAssign => Self::Add,
            MinusAssign => Self::Sub,
            StarAssign => Self::Mul,
            SlashAssign => Self::Div,
            SlashSlashAssign => Self::IntDiv,
            ConcatAssign => Self::Concat,
            PipeAssign => Self::BitOr,
            AmpAssign => Self::BitAnd,
            CaretAssign => Self::BitXor,
            ShlAssign => Self::Shl,
            ShrAssign => Self::Shr,
            ShrlAssign => Self::Shrl,
            CoalesceAssign => Self::Coalesce,
            _ => return None,
        })
    }

    /// Get the binding power for assignment (right-associative, lowest).
    pub fn binding_power(self) -> (u8, u8) {
        (2, 1)
    }
}

impl fmt::Display for AssignOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Assign => ":=",
            Self::Add => "+=",
            Self::Sub => "-=",
            Self::Mul => "*=",
            Self::Div => "/=",
            Self::IntDiv => "//=",
            Self::Concat => ".=",
            Self::BitOr => "|=",
            Self::BitAnd => "&=",
            Self::BitXor => "^=",
            Self::Shl => "<<=",
            Self::Shr => ">>=",
            Self::Shrl => ">>>=",
            Self::Coalesce => "??=",
        };
        write!(f, "{s}")
    }
}
