#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Or,     // ||
    And,    // &&
    Eq,     // ==
    NotEq,  // !=
    Lt,     // <
    LtEq,   // <=
    Gt,     // >
    GtEq,   // >=
    Add,    // +
    Sub,    // -
    Mul,    // *
    Div,    // /
    Mod,    // %
}

impl BinaryOp {
    /// Name under which the operator's overloads live in the function table.
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Or    => "||",
            Self::And   => "&&",
            Self::Eq    => "==",
            Self::NotEq => "!=",
            Self::Lt    => "<",
            Self::LtEq  => "<=",
            Self::Gt    => ">",
            Self::GtEq  => ">=",
            Self::Add   => "+",
            Self::Sub   => "-",
            Self::Mul   => "*",
            Self::Div   => "/",
            Self::Mod   => "%",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum UnaryOp {
    Neg, // -
    Not, // !
}

impl UnaryOp {
    pub fn symbol(self) -> &'static str {
        match self {
            Self::Neg => "-",
            Self::Not => "!",
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq)]
pub enum TokenKind {
    Id(String),
    /// Literal text as written, including any leading `-` and `f` suffix.
    Number(String),
    BinaryOp(BinaryOp),
    UnaryOp(UnaryOp),

    LParen,     // (
    RParen,     // )
    LBracket,   // [
    RBracket,   // ]
    Comma,      // ,
    Dot,        // .
}

impl TokenKind {
    /// True when a token of this kind ends an operand, so that whatever
    /// follows it stands in operator position.
    pub fn ends_operand(&self) -> bool {
        matches!(self, Self::Id(_) | Self::Number(_) | Self::RParen | Self::RBracket)
    }
}

impl std::fmt::Display for TokenKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Id(name)      => write!(f, "identifier `{name}`"),
            Self::Number(text)  => write!(f, "number `{text}`"),
            Self::BinaryOp(op)  => write!(f, "`{}`", op.symbol()),
            Self::UnaryOp(op)   => write!(f, "`{}`", op.symbol()),
            Self::LParen        => f.write_str("`(`"),
            Self::RParen        => f.write_str("`)`"),
            Self::LBracket      => f.write_str("`[`"),
            Self::RBracket      => f.write_str("`]`"),
            Self::Comma         => f.write_str("`,`"),
            Self::Dot           => f.write_str("`.`"),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    /// Byte offset of the token's first character.
    pub position: usize,
}

impl Token {
    pub fn new(kind: TokenKind, position: usize) -> Self {
        Self { kind, position }
    }
}
